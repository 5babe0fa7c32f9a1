//! WASM build test
//!
//! Mounts the viewer in a real browser document and drives it through the
//! JavaScript-facing API.

use cv_viewer_wasm::api::render_cv_html;
use cv_viewer_wasm::CvViewer;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const CV_JSON: &str = r#"{
  "profile": {
    "name": "Ada Quispe",
    "role": "Frontend Engineer",
    "summary": "Interfaces in React.\n\nServices in Python.",
    "email": "ada@example.com",
    "linkedin": "linkedin.com/in/ada",
    "github": "github.com/ada"
  },
  "experience": [{ "id": "acme", "company": "Acme", "role": "Dev", "period": "2022", "bullets": ["Shipped Docker images."] }],
  "education": [{ "id": "uni", "degree": "BSc", "institution": "UNI", "period": "2018" }]
}"#;

fn mount_point(id: &str) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let host = document.create_element("div").unwrap();
    host.set_id(id);
    document.body().unwrap().append_child(&host).unwrap();
    host
}

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn field(report: &JsValue, name: &str) -> JsValue {
    js_sys::Reflect::get(report, &JsValue::from_str(name)).unwrap()
}

async fn export(viewer: &CvViewer) -> JsValue {
    JsFuture::from(viewer.export_pdf())
        .await
        .expect("export promise resolves")
}

fn mount(id: &str) -> CvViewer {
    mount_point(id);
    CvViewer::mount(id, JsValue::from_str(CV_JSON), JsValue::UNDEFINED).expect("viewer mounts")
}

#[wasm_bindgen_test]
fn test_viewer_mounts_page() {
    let viewer = mount("cv-mount-page");
    let document = web_sys::window().unwrap().document().unwrap();

    let page = document.query_selector(".cv-page").unwrap().expect("page rendered");
    assert!(page.text_content().unwrap().contains("Ada Quispe"));
    assert_eq!(viewer.zoom(), 0.85);
    assert!(!viewer.is_3d());
    viewer.destroy();
}

#[wasm_bindgen_test]
fn test_missing_root_is_an_error() {
    let result = CvViewer::mount("no-such-element", JsValue::from_str(CV_JSON), JsValue::UNDEFINED);
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn test_zoom_toggle_and_reset() {
    let viewer = mount("cv-mount-controls");

    viewer.zoom_in();
    viewer.zoom_in();
    assert!((viewer.zoom() - 1.05).abs() < 1e-9);

    viewer.toggle_3d();
    assert!(viewer.is_3d());

    viewer.reset();
    assert_eq!(viewer.zoom(), 0.85);
    assert!(!viewer.is_3d());
    viewer.destroy();
}

#[wasm_bindgen_test]
fn test_toggle_theme_marks_root() {
    let viewer = mount("cv-mount-theme");
    let root = web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .document_element()
        .unwrap();

    let before = viewer.is_dark();
    viewer.toggle_theme();
    assert_eq!(viewer.is_dark(), !before);
    assert_eq!(root.class_list().contains("dark"), !before);

    // Leave the document as found for the other tests
    viewer.toggle_theme();
    viewer.destroy();
}

#[wasm_bindgen_test]
fn test_render_cv_html() {
    let html = render_cv_html(JsValue::from_str(CV_JSON), JsValue::UNDEFINED).unwrap();
    assert!(html.starts_with("<article class=\"cv-page\">"));
    assert!(html.contains("<strong>React</strong>"));
    assert!(html.contains("https://github.com/ada"));
}

#[wasm_bindgen_test]
async fn test_export_saves_pdf_and_removes_surface() {
    let viewer = mount("cv-mount-export");

    let report = export(&viewer).await;

    assert_eq!(field(&report, "status").as_string().as_deref(), Some("saved"));
    assert_eq!(field(&report, "fileName").as_string().as_deref(), Some("CV.pdf"));
    assert!(field(&report, "size").as_f64().unwrap() > 0.0);
    assert_eq!(viewer.export_state().as_f64(), Some(3.0));
    assert!(document().query_selector("iframe").unwrap().is_none());
    viewer.destroy();
}

#[wasm_bindgen_test]
async fn test_export_after_destroy_has_no_target() {
    let viewer = mount("cv-mount-destroyed");
    viewer.destroy();

    let report = export(&viewer).await;

    assert_eq!(field(&report, "status").as_string().as_deref(), Some("failed"));
    assert_eq!(field(&report, "reason").as_string().as_deref(), Some("no target"));
    assert_eq!(viewer.export_state().as_f64(), Some(4.0));
    assert!(document().query_selector("iframe").unwrap().is_none());
}
