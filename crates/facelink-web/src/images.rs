//! Uploaded face images, prerendered once into the variants the painter
//! composites every frame: a grayscaled base plus one tinted copy per
//! RGB-split channel.

use facelink_core::{ImageId, FACE_SIZE};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub struct FaceImage {
    pub base: web::HtmlCanvasElement,
    /// Red, green and blue multiplied copies used by the glitch pass.
    pub tints: [web::HtmlCanvasElement; 3],
}

#[derive(Default)]
pub struct ImageStore {
    entries: Vec<FaceImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ImageId) -> Option<&FaceImage> {
        self.entries.get(id.0)
    }

    /// Prerender a decoded upload and hand back its handle for the scene.
    pub fn insert(
        &mut self,
        document: &web::Document,
        img: &web::HtmlImageElement,
    ) -> Result<ImageId, JsValue> {
        let size = FACE_SIZE as f64;
        let (base, bctx) = offscreen_canvas(document, FACE_SIZE as u32)?;
        bctx.set_filter("grayscale(100%)");
        bctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, size, size)?;
        bctx.set_filter("none");

        let tints = [
            tinted_copy(document, &base, "#ff0000")?,
            tinted_copy(document, &base, "#00ff00")?,
            tinted_copy(document, &base, "#0000ff")?,
        ];

        self.entries.push(FaceImage { base, tints });
        Ok(ImageId(self.entries.len() - 1))
    }
}

fn offscreen_canvas(
    document: &web::Document,
    size: u32,
) -> Result<(web::HtmlCanvasElement, web::CanvasRenderingContext2d), JsValue> {
    let canvas: web::HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(size);
    canvas.set_height(size);
    let ctx: web::CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    Ok((canvas, ctx))
}

/// Multiply the base with a flat color, keeping the base's alpha.
fn tinted_copy(
    document: &web::Document,
    base: &web::HtmlCanvasElement,
    color: &str,
) -> Result<web::HtmlCanvasElement, JsValue> {
    let size = FACE_SIZE as f64;
    let (canvas, ctx) = offscreen_canvas(document, FACE_SIZE as u32)?;
    ctx.draw_image_with_html_canvas_element(base, 0.0, 0.0)?;
    ctx.set_global_composite_operation("multiply")?;
    ctx.set_fill_style_str(color);
    ctx.fill_rect(0.0, 0.0, size, size);
    ctx.set_global_composite_operation("destination-in")?;
    ctx.draw_image_with_html_canvas_element(base, 0.0, 0.0)?;
    ctx.set_global_composite_operation("source-over")?;
    Ok(canvas)
}
