// cli.rs - Command-line interface configuration
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "pixelblit")]
#[command(about = "CPU framebuffer presentation harness", long_about = None)]
pub struct Cli {
    /// Framebuffer width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Framebuffer height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Vertical sync interval (0 disables vsync)
    #[arg(long = "vsync", default_value_t = 1)]
    pub vsync_interval: u32,

    /// Start with the diagnostic overlay hidden
    #[arg(long = "no-overlay", default_value_t = false)]
    pub no_overlay: bool,
}
