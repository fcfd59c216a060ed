use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub fn context_2d(canvas: &web::HtmlCanvasElement) -> Option<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .ok()
}

pub fn input_element(document: &web::Document, element_id: &str) -> Option<web::HtmlInputElement> {
    document
        .get_element_by_id(element_id)?
        .dyn_into::<web::HtmlInputElement>()
        .ok()
}

pub fn set_cursor(canvas: &web::HtmlCanvasElement, cursor: &str) {
    let _ = canvas.style().set_property("cursor", cursor);
}
