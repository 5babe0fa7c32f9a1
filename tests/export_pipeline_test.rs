// Export pipeline behaviour against an in-memory host

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use cv_viewer_wasm::export::{ExportError, ExportHost, ExportOutcome, ExportPipeline, ExportSettings, ExportState};
use cv_viewer_wasm::renderers::pdf::JpegImage;
use cv_viewer_wasm::theme::Theme;
use futures::executor::block_on;

/// Pending once, then ready; lets a second export start mid-flight
#[derive(Default)]
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[derive(Default)]
struct MockHost {
    markup: Option<String>,
    fail_raster: bool,
    fail_encode: bool,
    fail_save: bool,
    yield_on_settle: bool,
    open: Cell<usize>,
    max_open: Cell<usize>,
    opened: Cell<usize>,
    discarded: Cell<usize>,
    stylesheet: RefCell<Option<String>>,
    background: RefCell<Option<String>>,
    saved: RefCell<Vec<(String, Vec<u8>)>>,
}

impl MockHost {
    fn with_page() -> Self {
        Self {
            markup: Some("<article class=\"cv-page\">Ada</article>".to_string()),
            ..Self::default()
        }
    }
}

impl ExportHost for MockHost {
    type Surface = usize;
    type Bitmap = (u32, u32);

    fn target_markup(&self) -> Option<String> {
        self.markup.clone()
    }

    fn open_surface(&self, _markup: &str, stylesheet: &str) -> Result<usize, ExportError> {
        self.opened.set(self.opened.get() + 1);
        self.open.set(self.open.get() + 1);
        self.max_open.set(self.max_open.get().max(self.open.get()));
        *self.stylesheet.borrow_mut() = Some(stylesheet.to_string());
        Ok(self.opened.get())
    }

    async fn settle(&self, _delay_ms: u32) {
        if self.yield_on_settle {
            YieldOnce::default().await;
        }
    }

    async fn rasterize(&self, _surface: &usize, pixel_ratio: f64, background: &str) -> Result<(u32, u32), ExportError> {
        *self.background.borrow_mut() = Some(background.to_string());
        if self.fail_raster {
            return Err(ExportError::Rasterization("canvas tainted".to_string()));
        }
        let scale = pixel_ratio as u32;
        Ok((794 * scale, 1123 * scale))
    }

    fn discard_surface(&self, _surface: usize) {
        self.open.set(self.open.get() - 1);
        self.discarded.set(self.discarded.get() + 1);
    }

    async fn encode_jpeg(&self, bitmap: &(u32, u32), _quality: f64) -> Result<JpegImage, ExportError> {
        if self.fail_encode {
            return Err(ExportError::Encoding("toDataURL returned data:,".to_string()));
        }
        Ok(JpegImage {
            width_px: bitmap.0,
            height_px: bitmap.1,
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 0xFF, 0xD9],
        })
    }

    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), ExportError> {
        if self.fail_save {
            return Err(ExportError::Save("download blocked".to_string()));
        }
        self.saved
            .borrow_mut()
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[test]
fn test_export_saves_exactly_one_cv_pdf() {
    let host = MockHost::with_page();
    let pipeline = ExportPipeline::new(ExportSettings::default());

    let outcome = block_on(pipeline.run(&host, Theme::Light)).expect("export should succeed");

    let saved = host.saved.borrow();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, "CV.pdf");
    assert!(saved[0].1.starts_with(b"%PDF"));
    assert_eq!(
        outcome,
        ExportOutcome::Saved {
            file_name: "CV.pdf".to_string(),
            size: saved[0].1.len()
        }
    );
    assert_eq!(pipeline.state(), ExportState::Saved);
    assert_eq!(host.discarded.get(), 1);
    assert_eq!(host.open.get(), 0);
}

#[test]
fn test_export_without_target_saves_nothing() {
    let host = MockHost::default();
    let pipeline = ExportPipeline::new(ExportSettings::default());

    let result = block_on(pipeline.run(&host, Theme::Light));

    assert_eq!(result, Err(ExportError::TargetMissing));
    assert_eq!(ExportError::TargetMissing.to_string(), "no target");
    assert!(host.saved.borrow().is_empty());
    assert_eq!(host.opened.get(), 0);
    assert_eq!(pipeline.state(), ExportState::Failed);
}

#[test]
fn test_rasterization_failure_discards_surface() {
    let host = MockHost {
        fail_raster: true,
        ..MockHost::with_page()
    };
    let pipeline = ExportPipeline::new(ExportSettings::default());

    let result = block_on(pipeline.run(&host, Theme::Light));

    let err = result.unwrap_err();
    assert!(matches!(err, ExportError::Rasterization(_)));
    assert!(err.is_user_visible());
    assert_eq!(host.opened.get(), 1);
    assert_eq!(host.discarded.get(), 1);
    assert!(host.saved.borrow().is_empty());
    assert_eq!(pipeline.state(), ExportState::Failed);
}

#[test]
fn test_encoding_failure_saves_nothing() {
    let host = MockHost {
        fail_encode: true,
        ..MockHost::with_page()
    };
    let pipeline = ExportPipeline::new(ExportSettings::default());

    let err = block_on(pipeline.run(&host, Theme::Light)).unwrap_err();

    assert!(matches!(err, ExportError::Encoding(_)));
    assert!(err.is_user_visible());
    assert_eq!(pipeline.state(), ExportState::Failed);
    assert!(host.saved.borrow().is_empty());
    assert_eq!(host.discarded.get(), 1);
    assert_eq!(host.open.get(), 0);
}

#[test]
fn test_save_failure_is_logged_not_shown() {
    let host = MockHost {
        fail_save: true,
        ..MockHost::with_page()
    };
    let pipeline = ExportPipeline::new(ExportSettings::default());

    let err = block_on(pipeline.run(&host, Theme::Light)).unwrap_err();

    assert!(matches!(err, ExportError::Save(_)));
    assert!(!err.is_user_visible());
    assert_eq!(pipeline.state(), ExportState::Failed);
    assert!(host.saved.borrow().is_empty());
    assert_eq!(host.discarded.get(), 1);
    assert_eq!(host.open.get(), 0);
}

#[test]
fn test_concurrent_export_is_ignored() {
    let host = MockHost {
        yield_on_settle: true,
        ..MockHost::with_page()
    };
    let pipeline = ExportPipeline::new(ExportSettings::default());

    let (first, second) = block_on(async {
        futures::join!(pipeline.run(&host, Theme::Light), pipeline.run(&host, Theme::Light))
    });

    assert!(matches!(first, Ok(ExportOutcome::Saved { .. })));
    assert_eq!(second, Ok(ExportOutcome::Busy));
    assert_eq!(host.max_open.get(), 1);
    assert_eq!(host.opened.get(), 1);
    assert_eq!(host.saved.borrow().len(), 1);
}

#[test]
fn test_export_can_run_again_after_completion() {
    let host = MockHost::with_page();
    let pipeline = ExportPipeline::new(ExportSettings::default());

    block_on(pipeline.run(&host, Theme::Light)).unwrap();
    block_on(pipeline.run(&host, Theme::Light)).unwrap();

    assert_eq!(host.saved.borrow().len(), 2);
    assert_eq!(host.max_open.get(), 1);
    assert_eq!(pipeline.average_export_ms(), Some(0.0));
}

#[test]
fn test_dark_theme_palette_reaches_host() {
    let host = MockHost::with_page();
    let pipeline = ExportPipeline::new(ExportSettings::default());

    block_on(pipeline.run(&host, Theme::Dark)).unwrap();

    assert_eq!(host.background.borrow().as_deref(), Some("#1a1a1a"));
    let stylesheet = host.stylesheet.borrow().clone().unwrap();
    assert!(stylesheet.contains("--cv-page-bg: #1a1a1a;"));
    assert!(stylesheet.contains("297mm"));
}

#[test]
fn test_custom_file_name() {
    let host = MockHost::with_page();
    let settings = ExportSettings {
        file_name: "Ada-CV.pdf".to_string(),
        ..ExportSettings::default()
    };
    let pipeline = ExportPipeline::new(settings);

    block_on(pipeline.run(&host, Theme::Light)).unwrap();

    assert_eq!(host.saved.borrow()[0].0, "Ada-CV.pdf");
}
