//! Export pipeline
//!
//! Idle → Capturing → Rendering → Saved | Failed
//!
//! The pipeline owns ordering, the non-reentrancy rule and surface cleanup.
//! Everything that touches the page goes through `ExportHost`, so the same
//! sequence runs against the browser and against test hosts.

use serde::Serialize;
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::cell::{Cell, RefCell};

use super::errors::ExportError;
use crate::models::ViewerConfig;
use crate::renderers::pdf::{single_image_pdf, JpegImage, PageSize};
use crate::renderers::styles::{render_stylesheet, Palette, StyleTemplate};
use crate::theme::Theme;
use crate::utils::PerformanceMonitor;

/// Pipeline state, exposed to JavaScript as a number
#[derive(Serialize_repr, Deserialize_repr, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ExportState {
    #[default]
    Idle = 0,
    Capturing = 1,
    Rendering = 2,
    Saved = 3,
    Failed = 4,
}

impl ExportState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ExportState::Capturing | ExportState::Rendering)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ExportOutcome {
    /// A file was handed to the browser
    #[serde(rename_all = "camelCase")]
    Saved { file_name: String, size: usize },

    /// Another export was in flight; this trigger was ignored
    Busy,
}

/// Fixed parameters of one export
#[derive(Clone, Debug, PartialEq)]
pub struct ExportSettings {
    pub file_name: String,
    pub settle_delay_ms: u32,
    pub pixel_ratio: f64,
    pub jpeg_quality: f64,
    pub page: PageSize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for ExportSettings {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            file_name: config.file_name.clone(),
            settle_delay_ms: config.settle_delay_ms,
            pixel_ratio: config.pixel_ratio,
            jpeg_quality: config.jpeg_quality,
            page: PageSize::A4,
        }
    }
}

/// Page access needed by the pipeline
#[allow(async_fn_in_trait)]
pub trait ExportHost {
    /// Offscreen rendering context
    type Surface;

    /// Rasterized page
    type Bitmap;

    /// Markup of the on-screen page node, if one is mounted
    fn target_markup(&self) -> Option<String>;

    /// Create an isolated page-sized surface holding `markup` styled by `stylesheet`
    fn open_surface(&self, markup: &str, stylesheet: &str) -> Result<Self::Surface, ExportError>;

    /// Let layout and fonts resolve in the surface
    async fn settle(&self, delay_ms: u32);

    async fn rasterize(
        &self,
        surface: &Self::Surface,
        pixel_ratio: f64,
        background: &str,
    ) -> Result<Self::Bitmap, ExportError>;

    fn discard_surface(&self, surface: Self::Surface);

    async fn encode_jpeg(&self, bitmap: &Self::Bitmap, quality: f64) -> Result<JpegImage, ExportError>;

    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), ExportError>;

    /// Milliseconds from an arbitrary origin, for timing
    fn now_ms(&self) -> f64 {
        0.0
    }
}

/// Discards the surface when dropped, whichever way the pipeline exits
struct SurfaceGuard<'h, H: ExportHost> {
    host: &'h H,
    surface: Option<H::Surface>,
}

impl<'h, H: ExportHost> SurfaceGuard<'h, H> {
    fn new(host: &'h H, surface: H::Surface) -> Self {
        Self {
            host,
            surface: Some(surface),
        }
    }

    fn surface(&self) -> Option<&H::Surface> {
        self.surface.as_ref()
    }
}

impl<H: ExportHost> Drop for SurfaceGuard<'_, H> {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.take() {
            self.host.discard_surface(surface);
        }
    }
}

/// Returns the state to Idle if a run is abandoned mid-flight
struct InFlight<'a> {
    state: &'a Cell<ExportState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.state.get().is_busy() {
            self.state.set(ExportState::Idle);
        }
    }
}

pub struct ExportPipeline {
    settings: ExportSettings,
    state: Cell<ExportState>,
    monitor: RefCell<PerformanceMonitor>,
}

impl ExportPipeline {
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            settings,
            state: Cell::new(ExportState::Idle),
            monitor: RefCell::new(PerformanceMonitor::new()),
        }
    }

    pub fn state(&self) -> ExportState {
        self.state.get()
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Average duration of completed runs, if any were timed
    pub fn average_export_ms(&self) -> Option<f32> {
        self.monitor.borrow().get_average_time("export")
    }

    /// Run one export with the palette of `theme`.
    ///
    /// A call while another run is in flight returns `Busy` without touching
    /// the host.
    pub async fn run<H: ExportHost>(&self, host: &H, theme: Theme) -> Result<ExportOutcome, ExportError> {
        if self.state.get().is_busy() {
            log::info!("Export already in progress; ignoring trigger");
            return Ok(ExportOutcome::Busy);
        }

        self.state.set(ExportState::Capturing);
        let _in_flight = InFlight { state: &self.state };
        let started = host.now_ms();

        let result = self.run_steps(host, theme).await;
        match &result {
            Ok(outcome) => {
                self.state.set(ExportState::Saved);
                let elapsed = (host.now_ms() - started) as f32;
                self.monitor.borrow_mut().record_measurement("export", elapsed);
                log::info!("Export completed in {:.0}ms: {:?}", elapsed, outcome);
            }
            Err(e) => {
                self.state.set(ExportState::Failed);
                match e {
                    ExportError::TargetMissing => log::warn!("Export aborted: {}", e),
                    _ => log::error!("Export failed: {}", e),
                }
            }
        }
        result
    }

    async fn run_steps<H: ExportHost>(&self, host: &H, theme: Theme) -> Result<ExportOutcome, ExportError> {
        let settings = &self.settings;

        let markup = host.target_markup().ok_or(ExportError::TargetMissing)?;
        let stylesheet = render_stylesheet(StyleTemplate::Offscreen, theme)
            .map_err(|e| ExportError::Surface(e.to_string()))?;

        let surface = SurfaceGuard::new(host, host.open_surface(&markup, &stylesheet)?);
        log::debug!("Offscreen surface opened ({} bytes of markup)", markup.len());

        host.settle(settings.settle_delay_ms).await;

        self.state.set(ExportState::Rendering);
        let background = Palette::for_theme(theme).page_background;
        let bitmap = match surface.surface() {
            Some(s) => host.rasterize(s, settings.pixel_ratio, background).await,
            None => Err(ExportError::Surface("surface already discarded".to_string())),
        };
        drop(surface);
        let bitmap = bitmap?;

        let jpeg = host.encode_jpeg(&bitmap, settings.jpeg_quality).await?;
        log::debug!(
            "Encoded {}x{} JPEG ({} bytes)",
            jpeg.width_px,
            jpeg.height_px,
            jpeg.bytes.len()
        );

        let pdf = single_image_pdf(&jpeg, settings.page)?;
        host.save(&settings.file_name, &pdf)?;

        Ok(ExportOutcome::Saved {
            file_name: settings.file_name.clone(),
            size: pdf.len(),
        })
    }
}
