//! CV viewer container
//!
//! `CvViewer` owns the view state, the theme preference and the export
//! pipeline, builds the page DOM, and wires pointer, toolbar and sidebar
//! events to state updates. All state lives behind one `Rc<RefCell<..>>`;
//! event closures hold weak references and never keep a borrow across an
//! `.await`.

use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, Element, EventTarget, HtmlElement, MouseEvent, Window};

use super::controls::{Sidebar, Toolbar};
use super::helpers::{build_dom, config_from_js, create_with_class, cv_from_js, dom_error, ViewerError};
use crate::export::{BrowserExportHost, ExportOutcome, ExportPipeline, ExportSettings, ExportState};
use crate::models::{CvData, ExportMode, PointerOffset, ViewState, ViewerConfig, ViewerIntent};
use crate::renderers::document::render_document;
use crate::renderers::styles::{render_stylesheet, StyleTemplate};
use crate::theme::transition::RevealPlan;
use crate::theme::web::{start_reveal, LocalStorage, RootClassMarker};
use crate::theme::{DetachedMarker, MemoryStorage, Theme, ThemeMarker, ThemePreference, ThemeStorage};
use crate::viewport::{TransformFrame, ViewportTransform};

const STYLESHEET_ID: &str = "cv-viewer-styles";
const TOAST_MS: i32 = 4000;

type Shared = Rc<RefCell<ViewerInner>>;

/// A registered DOM listener, removed on `destroy`
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

/// DOM nodes the viewer updates after mount
struct ViewerDom {
    stage: HtmlElement,
    frame: HtmlElement,
    reflection: HtmlElement,
    toolbar: Toolbar,
    sidebar: Sidebar,
}

struct ViewerInner {
    window: Window,
    document: Document,
    root: Element,
    dom: ViewerDom,
    config: ViewerConfig,
    view: ViewState,
    transform: ViewportTransform,
    theme: ThemePreference,
    pipeline: Rc<ExportPipeline>,
    ticker: Option<Closure<dyn FnMut(f64)>>,
    frame_request: Option<i32>,
    last_frame_ms: Option<f64>,
    listeners: Vec<Listener>,
}

impl ViewerInner {
    /// Apply an intent; repaint controls and start the animation on change
    fn dispatch(&mut self, intent: ViewerIntent) {
        if self.view.apply(intent) {
            log::debug!("{:?} -> zoom {:.2}, 3d {}", intent, self.view.zoom(), self.view.is_3d());
            self.transform.sync(&self.view);
            self.sync_controls();
            self.request_frame();
        }
    }

    fn sync_controls(&self) {
        let dom = &self.dom;
        dom.toolbar.sync(self.view.zoom_percent());
        dom.sidebar
            .sync(self.view.is_3d(), self.theme.read(), &self.config.labels);
        if let Err(e) = dom.frame.class_list().toggle_with_force("is-3d", self.view.is_3d()) {
            log::warn!("Could not update 3D class: {:?}", e);
        }
    }

    fn paint(&self, frame: &TransformFrame) {
        set_style(&self.dom.frame.style(), "transform", &frame.css_transform());

        let reflection = self.dom.reflection.style();
        match frame.reflection_opacity {
            Some(opacity) => {
                set_style(&reflection, "display", "block");
                set_style(&reflection, "opacity", &format!("{:.3}", opacity));
            }
            None => set_style(&reflection, "display", "none"),
        }
    }

    /// Stop the animation and unregister every DOM listener
    fn detach(&mut self) {
        if let Some(handle) = self.frame_request.take() {
            if let Err(e) = self.window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
        self.ticker = None;
        for listener in self.listeners.drain(..) {
            if let Err(e) = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.closure.as_ref().unchecked_ref(),
            ) {
                log::warn!("Could not remove {} listener: {:?}", listener.event, e);
            }
        }
    }

    fn request_frame(&mut self) {
        if self.frame_request.is_some() {
            return;
        }
        let Some(ticker) = self.ticker.as_ref() else {
            return;
        };
        match self.window.request_animation_frame(ticker.as_ref().unchecked_ref()) {
            Ok(handle) => self.frame_request = Some(handle),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn tick(&mut self, timestamp: f64) {
        self.frame_request = None;
        let dt = self.last_frame_ms.map_or(16.0, |last| timestamp - last);
        let frame = self.transform.step(dt);
        self.paint(&frame);

        if frame.settled {
            self.last_frame_ms = None;
        } else {
            self.last_frame_ms = Some(timestamp);
            self.request_frame();
        }
    }

    fn show_toast(&self, message: &str) {
        let toast = match create_with_class(&self.document, "div", "cv-toast") {
            Ok(toast) => toast,
            Err(e) => {
                log::warn!("Toast not shown: {}", e);
                return;
            }
        };
        toast.set_attribute("role", "status").ok();
        toast.set_text_content(Some(message));
        if self.dom.stage.append_child(&toast).is_err() {
            return;
        }

        let dismiss = Closure::once_into_js(move || toast.remove());
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(dismiss.unchecked_ref(), TOAST_MS)
        {
            log::warn!("Toast timer failed: {:?}", e);
        }
    }

    fn export_host(&self) -> BrowserExportHost {
        BrowserExportHost::new(self.window.clone(), self.document.clone(), self.root.clone())
    }
}

/// Result of `exportPdf` as seen from JavaScript
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ExportReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Interactive CV viewer mounted into a host element
#[wasm_bindgen]
pub struct CvViewer {
    inner: Shared,
}

#[wasm_bindgen]
impl CvViewer {
    /// Mount the viewer into the element with id `root_id`.
    ///
    /// `data` is the CV as an object, JSON string or YAML string; `options`
    /// is an optional `ViewerConfig` object.
    #[wasm_bindgen(js_name = mount)]
    pub fn mount(root_id: &str, data: JsValue, options: JsValue) -> Result<CvViewer, JsValue> {
        let cv = cv_from_js(data)?;
        let config = config_from_js(options)?;
        Ok(Self::mount_with(root_id, &cv, config)?)
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) {
        self.inner.borrow_mut().dispatch(ViewerIntent::ZoomIn);
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) {
        self.inner.borrow_mut().dispatch(ViewerIntent::ZoomOut);
    }

    pub fn reset(&self) {
        self.inner.borrow_mut().dispatch(ViewerIntent::Reset);
    }

    #[wasm_bindgen(js_name = toggle3d)]
    pub fn toggle_3d(&self) {
        self.inner.borrow_mut().dispatch(ViewerIntent::Toggle3d);
    }

    /// Flip the theme without an origin point (no reveal animation)
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) {
        toggle_theme(&self.inner, None);
    }

    /// Run the raster export; resolves to `{status, fileName?, size?, reason?}`
    #[wasm_bindgen(js_name = exportPdf)]
    pub fn export_pdf(&self) -> js_sys::Promise {
        export_pdf(&self.inner)
    }

    /// Open the browser print dialog
    pub fn print(&self) {
        print(&self.inner.borrow().window);
    }

    pub fn zoom(&self) -> f64 {
        self.inner.borrow().view.zoom()
    }

    #[wasm_bindgen(js_name = is3d)]
    pub fn is_3d(&self) -> bool {
        self.inner.borrow().view.is_3d()
    }

    #[wasm_bindgen(js_name = isDark)]
    pub fn is_dark(&self) -> bool {
        self.inner.borrow().theme.read()
    }

    /// Current export state (0 idle, 1 capturing, 2 rendering, 3 saved, 4 failed)
    #[wasm_bindgen(js_name = exportState)]
    pub fn export_state(&self) -> JsValue {
        let state: ExportState = self.inner.borrow().pipeline.state();
        serde_wasm_bindgen::to_value(&state).unwrap_or(JsValue::NULL)
    }

    /// Remove listeners, stop animation and detach the viewer's DOM
    pub fn destroy(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.detach();
        inner.dom.stage.remove();
        log::info!("CV viewer destroyed");
    }
}

// `free()` from JS without `destroy()` must not leave dropped closures registered
impl Drop for CvViewer {
    fn drop(&mut self) {
        match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.detach(),
            Err(_) => log::warn!("CvViewer dropped while borrowed; listeners left attached"),
        }
    }
}

impl CvViewer {
    /// Mount with already-parsed data and config
    pub fn mount_with(root_id: &str, cv: &CvData, config: ViewerConfig) -> Result<CvViewer, ViewerError> {
        let window = web_sys::window().ok_or(ViewerError::NoWindow)?;
        let document = window
            .document()
            .ok_or_else(|| ViewerError::Dom("window has no document".to_string()))?;
        let root = document
            .get_element_by_id(root_id)
            .ok_or_else(|| ViewerError::MissingElement(root_id.to_string()))?;

        if let Err(e) = cv.validate() {
            log::warn!("CV data: {}", e);
        }

        install_stylesheet(&document)?;
        let theme = init_theme(&document, &config);

        let view = ViewState::with_default_zoom(config.default_zoom);
        let dom = build_viewer_dom(&document, cv, &config)?;
        root.append_child(&dom.stage).map_err(dom_error("appendChild"))?;

        let inner = ViewerInner {
            window,
            document,
            root,
            dom,
            transform: ViewportTransform::new(&view),
            pipeline: Rc::new(ExportPipeline::new(ExportSettings::from(&config))),
            config,
            view,
            theme,
            ticker: None,
            frame_request: None,
            last_frame_ms: None,
            listeners: Vec::new(),
        };
        let shared: Shared = Rc::new(RefCell::new(inner));

        install_ticker(&shared);
        wire_events(&shared)?;

        {
            let inner = shared.borrow();
            inner.sync_controls();
            inner.paint(&inner.transform.frame());
        }
        log::info!("CV viewer mounted into #{}", root_id);

        Ok(CvViewer { inner: shared })
    }
}

fn set_style(style: &CssStyleDeclaration, property: &str, value: &str) {
    if let Err(e) = style.set_property(property, value) {
        log::warn!("Could not set {}: {:?}", property, e);
    }
}

fn install_stylesheet(document: &Document) -> Result<(), ViewerError> {
    if document.get_element_by_id(STYLESHEET_ID).is_some() {
        return Ok(());
    }
    let css = render_stylesheet(StyleTemplate::Live, Theme::Light)
        .map_err(|e| ViewerError::Dom(format!("stylesheet: {}", e)))?;
    let style = document
        .create_element("style")
        .map_err(dom_error("createElement"))?;
    style.set_id(STYLESHEET_ID);
    style.set_text_content(Some(&css));
    let head = document
        .head()
        .ok_or_else(|| ViewerError::Dom("document has no head".to_string()))?;
    head.append_child(&style).map_err(dom_error("appendChild"))?;
    Ok(())
}

fn init_theme(document: &Document, config: &ViewerConfig) -> ThemePreference {
    let storage: Box<dyn ThemeStorage> = match LocalStorage::open() {
        Some(storage) => Box::new(storage),
        None => {
            log::warn!("Theme will not persist: localStorage unavailable");
            Box::new(MemoryStorage::new())
        }
    };
    let marker: Box<dyn ThemeMarker> = match RootClassMarker::new(document) {
        Some(marker) => Box::new(marker),
        None => Box::new(DetachedMarker::default()),
    };
    ThemePreference::init(storage, marker, config.storage_key.clone())
}

fn build_viewer_dom(document: &Document, cv: &CvData, config: &ViewerConfig) -> Result<ViewerDom, ViewerError> {
    let stage = create_with_class(document, "div", "cv-stage")?;
    let dots = create_with_class(document, "div", "cv-dots")?;
    let sidebar = Sidebar::build(document, &config.labels)?;
    let toolbar = Toolbar::build(document, &config.labels)?;
    let perspective = create_with_class(document, "div", "cv-perspective")?;
    let frame = create_with_class(document, "div", "cv-frame")?;
    let reflection = create_with_class(document, "div", "cv-reflection")?;
    let page = build_dom(document, &render_document(cv, &config.labels))?;

    frame.append_child(&reflection).map_err(dom_error("appendChild"))?;
    frame.append_child(&page).map_err(dom_error("appendChild"))?;
    perspective.append_child(&frame).map_err(dom_error("appendChild"))?;
    for child in [&dots, &sidebar.root, &toolbar.root, &perspective] {
        stage.append_child(child).map_err(dom_error("appendChild"))?;
    }

    Ok(ViewerDom {
        stage,
        frame,
        reflection,
        toolbar,
        sidebar,
    })
}

fn install_ticker(shared: &Shared) {
    let weak: Weak<RefCell<ViewerInner>> = Rc::downgrade(shared);
    let ticker = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
        if let Some(shared) = weak.upgrade() {
            shared.borrow_mut().tick(timestamp);
        }
    });
    shared.borrow_mut().ticker = Some(ticker);
}

/// Register `handler` for `event` on `target`
fn listen<F>(shared: &Shared, target: &EventTarget, event: &'static str, handler: F) -> Result<(), ViewerError>
where
    F: Fn(&Shared, web_sys::Event) + 'static,
{
    let weak = Rc::downgrade(shared);
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |e: web_sys::Event| {
        if let Some(shared) = weak.upgrade() {
            handler(&shared, e);
        }
    });
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(dom_error("addEventListener"))?;
    shared.borrow_mut().listeners.push(Listener {
        target: target.clone(),
        event,
        closure,
    });
    Ok(())
}

fn wire_events(shared: &Shared) -> Result<(), ViewerError> {
    let (frame, toolbar, sidebar) = {
        let inner = shared.borrow();
        let dom = &inner.dom;
        (
            dom.frame.clone(),
            [
                dom.toolbar.zoom_out.clone(),
                dom.toolbar.zoom_in.clone(),
                dom.toolbar.reset.clone(),
                dom.toolbar.download.clone(),
            ],
            [dom.sidebar.toggle_3d.clone(), dom.sidebar.toggle_theme.clone()],
        )
    };
    let [zoom_out, zoom_in, reset, download] = toolbar;
    let [toggle_3d, toggle_theme_button] = sidebar;

    listen(shared, &frame, "mousemove", |shared, e| {
        let Some(e) = e.dyn_ref::<MouseEvent>() else {
            return;
        };
        let mut inner = shared.borrow_mut();
        if !inner.view.is_3d() {
            return;
        }
        let rect = inner.dom.frame.get_bounding_client_rect();
        let offset = PointerOffset::from_client(
            e.client_x() as f64,
            e.client_y() as f64,
            rect.left(),
            rect.top(),
            rect.width(),
            rect.height(),
        );
        inner.dispatch(ViewerIntent::PointerMove(offset));
    })?;
    listen(shared, &frame, "mouseleave", |shared, _| {
        shared.borrow_mut().dispatch(ViewerIntent::PointerLeave);
    })?;

    listen(shared, &zoom_out, "click", |shared, _| {
        shared.borrow_mut().dispatch(ViewerIntent::ZoomOut);
    })?;
    listen(shared, &zoom_in, "click", |shared, _| {
        shared.borrow_mut().dispatch(ViewerIntent::ZoomIn);
    })?;
    listen(shared, &reset, "click", |shared, _| {
        shared.borrow_mut().dispatch(ViewerIntent::Reset);
    })?;
    listen(shared, &download, "click", |shared, _| {
        let mode = shared.borrow().config.export_mode;
        match mode {
            ExportMode::Raster => {
                // Outcome is logged by the pipeline; nothing to surface here
                let _ = export_pdf(shared);
            }
            ExportMode::Print => print(&shared.borrow().window),
        }
    })?;

    listen(shared, &toggle_3d, "click", |shared, _| {
        shared.borrow_mut().dispatch(ViewerIntent::Toggle3d);
    })?;
    listen(shared, &toggle_theme_button, "click", |shared, e| {
        let origin = e
            .dyn_ref::<MouseEvent>()
            .map(|m| (m.client_x() as f64, m.client_y() as f64));
        toggle_theme(shared, origin);
    })?;

    Ok(())
}

/// Flip the theme, animating a circular reveal from `origin` when supported
fn toggle_theme(shared: &Shared, origin: Option<(f64, f64)>) {
    let (document, plan) = {
        let inner = shared.borrow();
        let to_dark = !inner.theme.read();
        let plan = origin.map(|(x, y)| {
            let width = inner.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let height = inner.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            RevealPlan::new(x, y, width, height, to_dark, inner.config.transition_ms)
        });
        (inner.document.clone(), plan)
    };

    let update = theme_update(shared);
    let animated = match plan {
        Some(plan) => start_reveal(&document, plan, Rc::clone(&update)),
        None => false,
    };
    if !animated {
        update();
    }
}

/// One-shot theme flip, run now or from a view transition callback.
///
/// Flips whatever theme is current when it runs, so clicks queued behind a
/// pending transition each take effect.
fn theme_update(shared: &Shared) -> Rc<dyn Fn()> {
    let weak = Rc::downgrade(shared);
    let done = Cell::new(false);
    Rc::new(move || {
        if done.replace(true) {
            return;
        }
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Ok(mut inner) = shared.try_borrow_mut() else {
            log::warn!("Theme update skipped: viewer busy");
            return;
        };
        let dark = inner.theme.toggle();
        inner.sync_controls();
        log::info!("Theme set to {}", Theme::from_dark(dark).as_str());
    })
}

fn export_pdf(shared: &Shared) -> js_sys::Promise {
    let (pipeline, host, theme) = {
        let inner = shared.borrow();
        (Rc::clone(&inner.pipeline), inner.export_host(), inner.theme.theme())
    };
    let weak = Rc::downgrade(shared);

    wasm_bindgen_futures::future_to_promise(async move {
        let report = match pipeline.run(&host, theme).await {
            Ok(ExportOutcome::Saved { file_name, size }) => ExportReport {
                status: "saved",
                file_name: Some(file_name),
                size: Some(size),
                reason: None,
            },
            Ok(ExportOutcome::Busy) => ExportReport {
                status: "busy",
                file_name: None,
                size: None,
                reason: None,
            },
            Err(e) => {
                if e.is_user_visible() {
                    if let Some(shared) = weak.upgrade() {
                        let inner = shared.borrow();
                        if inner.config.failure_toast {
                            inner.show_toast(&inner.config.labels.export_failed);
                        }
                    }
                }
                ExportReport {
                    status: "failed",
                    file_name: None,
                    size: None,
                    reason: Some(e.to_string()),
                }
            }
        };
        serde_wasm_bindgen::to_value(&report).map_err(JsValue::from)
    })
}

fn print(window: &Window) {
    if let Err(e) = window.print() {
        log::warn!("Print failed: {:?}", e);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const CV_JSON: &str = r#"{
      "profile": {"name": "Ada", "role": "Dev", "summary": "React.", "email": "a@b.c", "linkedin": "l", "github": "g"},
      "experience": [],
      "education": []
    }"#;

    fn mount(id: &str) -> CvViewer {
        let document = web_sys::window().unwrap().document().unwrap();
        let host = document.create_element("div").unwrap();
        host.set_id(id);
        document.body().unwrap().append_child(&host).unwrap();
        let cv = CvData::from_json(CV_JSON).unwrap();
        CvViewer::mount_with(id, &cv, ViewerConfig::default()).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_queued_theme_updates_each_flip_once() {
        let viewer = mount("cv-unit-theme");
        let before = viewer.is_dark();

        // Two clicks whose transition callbacks have not run yet
        let first = theme_update(&viewer.inner);
        let second = theme_update(&viewer.inner);
        first();
        assert_eq!(viewer.is_dark(), !before);
        second();
        assert_eq!(viewer.is_dark(), before);

        // Fallback call after the callback already ran is a no-op
        first();
        assert_eq!(viewer.is_dark(), before);
        viewer.destroy();
    }

    #[wasm_bindgen_test]
    fn test_drop_without_destroy_detaches_listeners() {
        let viewer = mount("cv-unit-drop");
        let shared = Rc::clone(&viewer.inner);
        assert!(!shared.borrow().listeners.is_empty());

        drop(viewer);

        let inner = shared.borrow();
        assert!(inner.listeners.is_empty());
        assert!(inner.ticker.is_none());
        assert!(inner.frame_request.is_none());
        inner.dom.stage.remove();
    }
}
