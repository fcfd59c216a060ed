//! DOM event wiring: pointer handlers on the canvas, the control buttons,
//! topic submission and the face upload pipeline. Every handler runs to
//! completion between frames; the scene is only ever touched from here and
//! from the frame tick.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use facelink_core::{LinkOutcome, PressOutcome, Scene};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::audio::SoundBank;
use crate::dom;
use crate::images::ImageStore;
use crate::input::{self, MouseState};

pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub scene: Rc<RefCell<Scene>>,
    pub mouse: Rc<RefCell<MouseState>>,
    pub sounds: Rc<RefCell<Option<SoundBank>>>,
}

pub struct UiWiring {
    pub document: web::Document,
    pub scene: Rc<RefCell<Scene>>,
    pub ctx: web::CanvasRenderingContext2d,
    pub sounds: Rc<RefCell<Option<SoundBank>>>,
    pub images: Rc<RefCell<ImageStore>>,
}

static SOUND_TRIED: AtomicBool = AtomicBool::new(false);

// Audio may only start inside a user gesture; one attempt, then the bank
// stays absent and triggers no-op for the rest of the session.
fn ensure_sound(sounds: &Rc<RefCell<Option<SoundBank>>>) {
    if SOUND_TRIED.swap(true, Ordering::SeqCst) {
        return;
    }
    match SoundBank::new() {
        Ok(bank) => *sounds.borrow_mut() = Some(bank),
        Err(()) => log::error!("sound init failed; continuing without audio"),
    }
}

pub fn wire_pointer_handlers(w: InputWiring) {
    // pointermove: track position, drive an active drag
    {
        let mouse_m = w.mouse.clone();
        let scene_m = w.scene.clone();
        let canvas_m = w.canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let pos = input::pointer_canvas_px(&ev, &canvas_m);
            {
                let mut ms = mouse_m.borrow_mut();
                ms.x = pos.x;
                ms.y = pos.y;
            }
            let mut scene = scene_m.borrow_mut();
            if scene.dragged.is_some() {
                scene.drag_to(pos);
            }
        }) as Box<dyn FnMut(_)>);
        if let Some(wnd) = web::window() {
            let _ =
                wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    // pointerdown: break a hovered link or begin a drag
    {
        let mouse_d = w.mouse.clone();
        let scene_d = w.scene.clone();
        let sounds_d = w.sounds.clone();
        let canvas_d = w.canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            ensure_sound(&sounds_d);
            let pos = input::pointer_canvas_px(&ev, &canvas_d);
            {
                let mut ms = mouse_d.borrow_mut();
                ms.x = pos.x;
                ms.y = pos.y;
                ms.down = true;
            }
            if scene_d.borrow_mut().pointer_down(pos) == PressOutcome::LinkBroken {
                log::info!("link broken by press");
            }
            let _ = canvas_d.set_pointer_capture(ev.pointer_id());
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        let _ = w
            .canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // pointerup: release the drag
    {
        let mouse_u = w.mouse.clone();
        let scene_u = w.scene.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            mouse_u.borrow_mut().down = false;
            scene_u.borrow_mut().pointer_up();
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        if let Some(wnd) = web::window() {
            let _ =
                wnd.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }
}

fn submit_topic(
    document: &web::Document,
    scene: &Rc<RefCell<Scene>>,
    ctx: &web::CanvasRenderingContext2d,
) {
    let Some(field) = dom::input_element(document, "topic-input") else {
        return;
    };
    let label = field.value();
    // Measure with the same font the painter uses for topic labels.
    ctx.set_font("16px 'Courier New', monospace");
    let text_width = ctx
        .measure_text(&label)
        .map(|m| m.width() as f32)
        .unwrap_or(0.0);
    if scene.borrow_mut().add_topic(&label, text_width) {
        field.set_value("");
    }
}

pub fn wire_ui(w: UiWiring) {
    {
        let scene = w.scene.clone();
        let sounds = w.sounds.clone();
        dom::add_click_listener(&w.document, "link-button", move || {
            let outcome = scene.borrow_mut().link_random();
            if let Some(bank) = sounds.borrow().as_ref() {
                match outcome {
                    LinkOutcome::Linked { note_hz, .. } => bank.play_link(note_hz),
                    LinkOutcome::NoPair => bank.play_failure(),
                }
            }
        });
    }
    {
        let scene = w.scene.clone();
        dom::add_click_listener(&w.document, "reset-button", move || {
            scene.borrow_mut().reset_links();
        });
    }
    {
        let scene = w.scene.clone();
        dom::add_click_listener(&w.document, "remove-button", move || {
            scene.borrow_mut().remove_last();
        });
    }

    // Topic submission: button click or Enter in the text field.
    {
        let document = w.document.clone();
        let scene = w.scene.clone();
        let ctx = w.ctx.clone();
        dom::add_click_listener(&w.document, "add-topic", move || {
            submit_topic(&document, &scene, &ctx);
        });
    }
    if let Some(field) = dom::input_element(&w.document, "topic-input") {
        let document = w.document.clone();
        let scene = w.scene.clone();
        let ctx = w.ctx.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            if ev.key() == "Enter" {
                submit_topic(&document, &scene, &ctx);
            }
        }) as Box<dyn FnMut(_)>);
        let _ = field.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    wire_upload(&w.document, w.scene.clone(), w.images.clone());
}

// File picker -> object URL -> decoded image -> prerendered variants ->
// scene append. The append happens inside the onload callback, so it runs on
// the event thread like every other scene mutation.
fn wire_upload(
    document: &web::Document,
    scene: Rc<RefCell<Scene>>,
    images: Rc<RefCell<ImageStore>>,
) {
    let Some(picker) = document.get_element_by_id("upload-face") else {
        return;
    };
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        let Some(doc) = dom::window_document() else {
            return;
        };
        let Some(input) = dom::input_element(&doc, "upload-face") else {
            return;
        };
        let Some(file) = input.files().and_then(|fs| fs.get(0)) else {
            return;
        };
        let Ok(url) = web::Url::create_object_url_with_blob(&file) else {
            return;
        };
        let Ok(img) = web::HtmlImageElement::new() else {
            return;
        };

        let img_loaded = img.clone();
        let url_loaded = url.clone();
        let scene = scene.clone();
        let images = images.clone();
        let onload = Closure::wrap(Box::new(move || {
            if let Some(doc) = dom::window_document() {
                match images.borrow_mut().insert(&doc, &img_loaded) {
                    Ok(id) => {
                        let idx = scene.borrow_mut().add_face(id);
                        log::info!("face {} added from upload", idx);
                    }
                    Err(e) => log::error!("image prerender error: {:?}", e),
                }
            }
            let _ = web::Url::revoke_object_url(&url_loaded);
        }) as Box<dyn FnMut()>);
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();
        img.set_src(&url);
        // Clear the picker so re-selecting the same file fires again.
        input.set_value("");
    }) as Box<dyn FnMut(_)>);
    let _ = picker.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}
