use std::collections::VecDeque;

use pixelblit::core::QUAD_VERTEX_COUNT;
use pixelblit::{
    BackendFault, Color, DeviceBackend, FramePresenter, FrameState, GraphicsError, SurfaceError,
};

/// Scripted backend for driving the presenter without a device.
///
/// Records every call; `upload_results` and `present_results` can be
/// preloaded with faults to exercise the error paths.
#[derive(Default)]
struct MockBackend {
    uploads: Vec<(usize, u32)>,
    draws: Vec<u32>,
    new_frame_calls: usize,
    overlay_renders: Vec<String>,
    presents: Vec<u32>,
    upload_results: VecDeque<Result<(), BackendFault>>,
    present_results: VecDeque<Result<(), BackendFault>>,
    diagnostics: Vec<String>,
}

impl MockBackend {
    fn total_calls(&self) -> usize {
        self.uploads.len()
            + self.draws.len()
            + self.new_frame_calls
            + self.overlay_renders.len()
            + self.presents.len()
    }
}

impl DeviceBackend for MockBackend {
    fn upload_full(&mut self, bytes: &[u8], row_pitch: u32) -> Result<(), BackendFault> {
        self.uploads.push((bytes.len(), row_pitch));
        self.upload_results.pop_front().unwrap_or(Ok(()))
    }

    fn draw(&mut self, vertex_count: u32) -> Result<(), BackendFault> {
        self.draws.push(vertex_count);
        Ok(())
    }

    fn new_overlay_frame(&mut self) {
        self.new_frame_calls += 1;
    }

    fn render_overlay(&mut self, stats: &str) -> Result<(), BackendFault> {
        self.overlay_renders.push(stats.to_string());
        Ok(())
    }

    fn present(&mut self, sync_interval: u32) -> Result<(), BackendFault> {
        self.presents.push(sync_interval);
        self.present_results.pop_front().unwrap_or(Ok(()))
    }

    fn take_diagnostics(&mut self) -> Vec<String> {
        std::mem::take(&mut self.diagnostics)
    }
}

fn presenter(width: u32, height: u32) -> FramePresenter<MockBackend> {
    FramePresenter::new(MockBackend::default(), width, height).unwrap()
}

// ============================================================================
// Happy-path frame cycle
// ============================================================================

#[test]
fn full_cycle_uploads_draws_and_presents() {
    let mut p = presenter(64, 48);
    p.begin_frame(true, Color::BLACK).unwrap();
    p.put_pixel(10, 10, Color::RED).unwrap();
    p.end_frame().unwrap();

    let backend = p.backend();
    assert_eq!(backend.uploads, vec![(64 * 48 * 4, 64 * 4)]);
    assert_eq!(backend.draws, vec![QUAD_VERTEX_COUNT]);
    assert_eq!(backend.new_frame_calls, 1);
    assert_eq!(backend.overlay_renders.len(), 1);
    assert_eq!(backend.presents, vec![1]);
    assert_eq!(p.state(), FrameState::Idle);
}

#[test]
fn composed_pixels_survive_between_frames_without_clear() {
    let mut p = presenter(800, 600);
    p.begin_frame(true, Color::BLACK).unwrap();
    p.put_pixel(400, 300, Color::new(0, 255, 255)).unwrap();
    p.end_frame().unwrap();

    p.begin_frame(false, Color::BLACK).unwrap();
    assert_eq!(p.get_pixel(400, 300).unwrap(), Color::new(0, 255, 255));
    assert_eq!(p.get_pixel(0, 0).unwrap(), Color::BLACK);
    p.end_frame().unwrap();
}

#[test]
fn put_pixel_variants_agree() {
    let mut p = presenter(16, 16);
    p.put_pixel(1, 2, Color::new(9, 8, 7)).unwrap();
    p.put_pixel_at((3, 4), Color::new(9, 8, 7)).unwrap();
    p.put_pixel_rgb(5, 6, 9, 8, 7).unwrap();

    assert_eq!(p.get_pixel(1, 2).unwrap(), p.get_pixel(3, 4).unwrap());
    assert_eq!(p.get_pixel(3, 4).unwrap(), p.get_pixel(5, 6).unwrap());
}

#[test]
fn out_of_bounds_put_pixel_propagates() {
    let mut p = presenter(8, 8);
    assert!(matches!(
        p.put_pixel(8, 8, Color::WHITE),
        Err(SurfaceError::OutOfBounds { .. })
    ));
}

// ============================================================================
// Vsync configuration
// ============================================================================

#[test]
fn vsync_toggle_sequence() {
    let mut p = presenter(8, 8);
    p.enable_vsync();
    assert!(p.is_vsync_enabled());
    p.disable_vsync();
    assert!(!p.is_vsync_enabled());
    p.set_vsync_interval(3);
    assert!(p.is_vsync_enabled());
}

#[test]
fn configured_interval_reaches_present() {
    let mut p = presenter(8, 8);
    p.set_vsync_interval(3);
    p.begin_frame(true, Color::BLACK).unwrap();
    p.end_frame().unwrap();

    p.disable_vsync();
    p.begin_frame(true, Color::BLACK).unwrap();
    p.end_frame().unwrap();

    assert_eq!(p.backend().presents, vec![3, 0]);
}

// ============================================================================
// Overlay gating
// ============================================================================

#[test]
fn overlay_render_is_gated_but_new_frame_is_not() {
    let mut p = presenter(8, 8);
    p.disable_overlay();

    p.begin_frame(true, Color::BLACK).unwrap();
    p.end_frame().unwrap();

    // New-frame bookkeeping still ran; the render was suppressed.
    assert_eq!(p.backend().new_frame_calls, 1);
    assert!(p.backend().overlay_renders.is_empty());

    p.enable_overlay();
    p.begin_frame(true, Color::BLACK).unwrap();
    p.end_frame().unwrap();
    assert_eq!(p.backend().overlay_renders.len(), 1);
}

#[test]
fn overlay_receives_current_statistics() {
    let mut p = presenter(320, 240);
    p.begin_frame(true, Color::BLACK).unwrap();
    p.end_frame().unwrap();

    let rendered = &p.backend().overlay_renders[0];
    assert!(rendered.contains("ms/frame"));
    assert!(rendered.contains("(320x240)"));
    assert_eq!(rendered, p.frame_statistics());
}

// ============================================================================
// Frame sequencing
// ============================================================================

#[test]
fn strict_alternation_is_enforced() {
    let mut p = presenter(8, 8);

    assert!(matches!(
        p.end_frame(),
        Err(GraphicsError::FrameSequence { operation: "end_frame", state: FrameState::Idle })
    ));

    p.begin_frame(true, Color::BLACK).unwrap();
    assert!(matches!(
        p.begin_frame(true, Color::BLACK),
        Err(GraphicsError::FrameSequence {
            operation: "begin_frame",
            state: FrameState::Recording,
        })
    ));
}

// ============================================================================
// Error paths
// ============================================================================

#[test]
fn device_removed_faults_the_presenter() {
    let mut backend = MockBackend::default();
    backend
        .present_results
        .push_back(Err(BackendFault::device_removed(0x13, "surface lost")));
    let mut p = FramePresenter::new(backend, 8, 8).unwrap();

    p.begin_frame(true, Color::BLACK).unwrap();
    let err = p.end_frame().unwrap_err();
    assert!(matches!(err, GraphicsError::DeviceRemoved { code: 0x13, .. }));
    assert_eq!(p.state(), FrameState::Faulted);

    // Later frame calls are rejected without touching the backend.
    let calls_before = p.backend().total_calls();
    assert!(matches!(
        p.begin_frame(true, Color::BLACK),
        Err(GraphicsError::FrameSequence { state: FrameState::Faulted, .. })
    ));
    assert!(matches!(
        p.end_frame(),
        Err(GraphicsError::FrameSequence { state: FrameState::Faulted, .. })
    ));
    assert_eq!(p.backend().total_calls(), calls_before);
}

#[test]
fn present_failure_carries_code_message_and_diagnostics() {
    let mut backend = MockBackend::default();
    backend
        .present_results
        .push_back(Err(BackendFault::new(0x42, "submission rejected")));
    backend.diagnostics.push("validation: sampler state".to_string());
    let mut p = FramePresenter::new(backend, 8, 8).unwrap();

    p.begin_frame(true, Color::BLACK).unwrap();
    match p.end_frame().unwrap_err() {
        GraphicsError::Present { code, message, info, at } => {
            assert_eq!(code, 0x42);
            assert_eq!(message, "submission rejected");
            assert_eq!(info, vec!["validation: sampler state".to_string()]);
            assert!(at.file.ends_with("presenter.rs"));
        }
        other => panic!("expected Present error, got {other:?}"),
    }
    assert_eq!(p.state(), FrameState::Faulted);
}

#[test]
fn upload_failure_aborts_before_draw() {
    let mut backend = MockBackend::default();
    backend
        .upload_results
        .push_back(Err(BackendFault::new(0x10, "upload rejected")));
    let mut p = FramePresenter::new(backend, 8, 8).unwrap();

    p.begin_frame(true, Color::BLACK).unwrap();
    let err = p.end_frame().unwrap_err();
    assert!(matches!(err, GraphicsError::Backend { code: 0x10, .. }));
    assert_eq!(p.state(), FrameState::Faulted);
    assert!(p.backend().draws.is_empty());
    assert!(p.backend().presents.is_empty());
}

#[test]
fn device_removed_during_upload_is_classified() {
    let mut backend = MockBackend::default();
    backend
        .upload_results
        .push_back(Err(BackendFault::device_removed(0x14, "out of device memory")));
    let mut p = FramePresenter::new(backend, 8, 8).unwrap();

    p.begin_frame(true, Color::BLACK).unwrap();
    assert!(matches!(
        p.end_frame().unwrap_err(),
        GraphicsError::DeviceRemoved { .. }
    ));
}

// ============================================================================
// Frame statistics
// ============================================================================

#[test]
fn statistics_only_valid_after_first_end_frame() {
    let mut p = presenter(640, 480);
    assert_eq!(p.frame_statistics(), "");

    p.begin_frame(true, Color::BLACK).unwrap();
    assert_eq!(p.frame_statistics(), "");
    p.end_frame().unwrap();

    let stats = p.frame_statistics();
    assert!(stats.contains("ms/frame"));
    assert!(stats.contains("FPS"));
    assert!(stats.contains("(640x480)"));
}
