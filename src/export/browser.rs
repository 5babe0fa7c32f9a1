//! Browser export host
//!
//! The offscreen surface is an iframe parked outside the viewport. Its
//! document is serialized into an SVG `foreignObject`, drawn onto a canvas at
//! the requested pixel ratio, and read back as a JPEG data URL.

use base64::Engine;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, Document, Element, HtmlAnchorElement,
    HtmlCanvasElement, HtmlIFrameElement, HtmlImageElement, Url, Window, XmlSerializer,
};

use super::errors::ExportError;
use super::pipeline::ExportHost;
use crate::renderers::pdf::JpegImage;
use crate::renderers::PAGE_CLASS;

/// 210mm at 96 CSS pixels per inch
pub const PAGE_WIDTH_CSS_PX: f64 = 793.7;

/// 297mm at 96 CSS pixels per inch
pub const PAGE_HEIGHT_CSS_PX: f64 = 1122.5;

const SURFACE_STYLE: &str =
    "position:fixed;left:-10000px;top:0;width:210mm;height:297mm;border:0;pointer-events:none;";

pub struct BrowserExportHost {
    window: Window,
    document: Document,
    root: Element,
}

impl BrowserExportHost {
    /// Host that captures the page node inside `root`
    pub fn new(window: Window, document: Document, root: Element) -> Self {
        Self {
            window,
            document,
            root,
        }
    }

    fn page_node(&self) -> Option<Element> {
        self.root
            .query_selector(&format!(".{}", PAGE_CLASS))
            .ok()
            .flatten()
    }
}

fn js_err(context: &str, e: JsValue) -> String {
    format!("{}: {:?}", context, e)
}

impl ExportHost for BrowserExportHost {
    type Surface = HtmlIFrameElement;
    type Bitmap = HtmlCanvasElement;

    fn target_markup(&self) -> Option<String> {
        self.page_node().map(|node| node.outer_html())
    }

    fn open_surface(&self, markup: &str, stylesheet: &str) -> Result<HtmlIFrameElement, ExportError> {
        let surface = |e| ExportError::Surface(js_err("iframe", e));

        let iframe: HtmlIFrameElement = self
            .document
            .create_element("iframe")
            .map_err(surface)?
            .dyn_into()
            .map_err(|_| ExportError::Surface("iframe element has wrong type".to_string()))?;
        iframe.set_attribute("style", SURFACE_STYLE).map_err(surface)?;
        iframe.set_attribute("aria-hidden", "true").map_err(surface)?;

        let body = self
            .document
            .body()
            .ok_or_else(|| ExportError::Surface("document has no body".to_string()))?;
        body.append_child(&iframe).map_err(surface)?;

        let filled = (|| -> Result<(), ExportError> {
            let inner = iframe
                .content_document()
                .ok_or_else(|| ExportError::Surface("iframe has no document".to_string()))?;
            let html = inner
                .document_element()
                .ok_or_else(|| ExportError::Surface("iframe document is empty".to_string()))?;
            // Both strings come from our own serializer and stylesheet template
            html.set_inner_html(&format!(
                "<head><meta charset=\"utf-8\"><style>{}</style></head><body>{}</body>",
                stylesheet, markup
            ));
            Ok(())
        })();

        match filled {
            Ok(()) => Ok(iframe),
            Err(e) => {
                iframe.remove();
                Err(e)
            }
        }
    }

    async fn settle(&self, delay_ms: u32) {
        let window = self.window.clone();
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay_ms as i32)
                .is_err()
            {
                log::warn!("setTimeout failed; settling immediately");
                if let Err(e) = resolve.call0(&JsValue::NULL) {
                    log::warn!("Settle resolve failed: {:?}", e);
                }
            }
        });
        let _ = JsFuture::from(promise).await;
    }

    async fn rasterize(
        &self,
        surface: &HtmlIFrameElement,
        pixel_ratio: f64,
        background: &str,
    ) -> Result<HtmlCanvasElement, ExportError> {
        let raster = |context: &str, e: JsValue| ExportError::Rasterization(js_err(context, e));

        let inner = surface
            .content_document()
            .ok_or_else(|| ExportError::Rasterization("surface has no document".to_string()))?;
        let html = inner
            .document_element()
            .ok_or_else(|| ExportError::Rasterization("surface document is empty".to_string()))?;

        let serializer = XmlSerializer::new().map_err(|e| raster("XMLSerializer", e))?;
        let xhtml = serializer
            .serialize_to_string(&html)
            .map_err(|e| raster("serialize", e))?;

        let svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\">\
             <foreignObject x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\">{body}</foreignObject></svg>",
            w = PAGE_WIDTH_CSS_PX,
            h = PAGE_HEIGHT_CSS_PX,
            body = xhtml
        );
        let url = format!(
            "data:image/svg+xml;charset=utf-8,{}",
            String::from(js_sys::encode_uri_component(&svg))
        );

        let image = HtmlImageElement::new().map_err(|e| raster("image", e))?;
        let loaded = js_sys::Promise::new(&mut |resolve, reject| {
            image.set_onload(Some(&resolve));
            image.set_onerror(Some(&reject));
        });
        image.set_src(&url);
        JsFuture::from(loaded)
            .await
            .map_err(|e| raster("image load", e))?;
        image.set_onload(None);
        image.set_onerror(None);

        let canvas: HtmlCanvasElement = self
            .document
            .create_element("canvas")
            .map_err(|e| raster("canvas", e))?
            .dyn_into()
            .map_err(|_| ExportError::Rasterization("canvas element has wrong type".to_string()))?;
        canvas.set_width((PAGE_WIDTH_CSS_PX * pixel_ratio).round() as u32);
        canvas.set_height((PAGE_HEIGHT_CSS_PX * pixel_ratio).round() as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| raster("context", e))?
            .ok_or_else(|| ExportError::Rasterization("2d context unavailable".to_string()))?
            .dyn_into()
            .map_err(|_| ExportError::Rasterization("2d context has wrong type".to_string()))?;

        ctx.scale(pixel_ratio, pixel_ratio).map_err(|e| raster("scale", e))?;
        ctx.set_fill_style_str(background);
        ctx.fill_rect(0.0, 0.0, PAGE_WIDTH_CSS_PX, PAGE_HEIGHT_CSS_PX);
        ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &image,
            0.0,
            0.0,
            PAGE_WIDTH_CSS_PX,
            PAGE_HEIGHT_CSS_PX,
        )
        .map_err(|e| raster("draw", e))?;

        Ok(canvas)
    }

    fn discard_surface(&self, surface: HtmlIFrameElement) {
        surface.remove();
        log::debug!("Offscreen surface discarded");
    }

    async fn encode_jpeg(&self, canvas: &HtmlCanvasElement, quality: f64) -> Result<JpegImage, ExportError> {
        let data_url = canvas
            .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(quality))
            .map_err(|e| ExportError::Encoding(js_err("toDataURL", e)))?;
        let payload = data_url
            .strip_prefix("data:image/jpeg;base64,")
            .ok_or_else(|| ExportError::Encoding("canvas did not produce a JPEG".to_string()))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ExportError::Encoding(e.to_string()))?;

        Ok(JpegImage {
            width_px: canvas.width(),
            height_px: canvas.height(),
            bytes,
        })
    }

    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), ExportError> {
        let save = |context: &str, e: JsValue| ExportError::Save(js_err(context, e));

        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type("application/pdf");
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| save("blob", e))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|e| save("object url", e))?;

        let anchor: HtmlAnchorElement = self
            .document
            .create_element("a")
            .map_err(|e| save("anchor", e))?
            .dyn_into()
            .map_err(|_| ExportError::Save("anchor element has wrong type".to_string()))?;
        anchor.set_href(&url);
        anchor.set_download(file_name);

        let body = self
            .document
            .body()
            .ok_or_else(|| ExportError::Save("document has no body".to_string()))?;
        let clicked = body.append_child(&anchor).map(|_| anchor.click());
        anchor.remove();
        if let Err(e) = Url::revoke_object_url(&url) {
            log::warn!("Could not revoke object URL: {:?}", e);
        }
        clicked.map_err(|e| save("append", e))
    }

    fn now_ms(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }
}
