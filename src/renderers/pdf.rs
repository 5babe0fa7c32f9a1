//! Single-page image PDF
//!
//! Wraps one JPEG as the only, full-bleed image of a fixed-size page. There is
//! no pagination: a raster taller than the page is scaled into it, never split.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;

/// A4 width in points (210mm)
pub const A4_WIDTH_PT: f32 = 595.28;

/// A4 height in points (297mm)
pub const A4_HEIGHT_PT: f32 = 841.89;

const IMAGE_NAME: &str = "Im1";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Image is not a JPEG")]
    NotJpeg,

    #[error("Image has no pixels ({0}x{1})")]
    EmptyImage(u32, u32),

    #[error("PDF encoding failed: {0}")]
    Encode(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Physical page size in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width_pt: A4_WIDTH_PT,
        height_pt: A4_HEIGHT_PT,
    };
}

/// An encoded JPEG with its pixel dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct JpegImage {
    pub width_px: u32,
    pub height_px: u32,
    pub bytes: Vec<u8>,
}

impl JpegImage {
    pub fn is_jpeg(&self) -> bool {
        self.bytes.starts_with(&[0xFF, 0xD8])
    }
}

/// Build a one-page PDF whose only content is `image` stretched to the page
pub fn single_image_pdf(image: &JpegImage, page: PageSize) -> Result<Vec<u8>, PdfError> {
    if !image.is_jpeg() {
        return Err(PdfError::NotJpeg);
    }
    if image.width_px == 0 || image.height_px == 0 {
        return Err(PdfError::EmptyImage(image.width_px, image.height_px));
    }

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let image_stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width_px as i64,
            "Height" => image.height_px as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "DCTDecode",
        },
        image.bytes.clone(),
    )
    .with_compression(false);
    let image_id = doc.add_object(image_stream);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    page.width_pt.into(),
                    0_i64.into(),
                    0_i64.into(),
                    page.height_pt.into(),
                    0_i64.into(),
                    0_i64.into(),
                ],
            ),
            Operation::new("Do", vec![IMAGE_NAME.into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0_i64.into(), 0_i64.into(), page.width_pt.into(), page.height_pt.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_NAME => image_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1_i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("CV"),
        "Producer" => Object::string_literal(concat!("cv-viewer-wasm ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}
