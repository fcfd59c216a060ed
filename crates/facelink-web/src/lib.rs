#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use facelink_core::{Scene, CANVAS_HEIGHT, CANVAS_WIDTH};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod audio;
mod dom;
mod events;
mod frame;
mod images;
mod input;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("facelink-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    canvas.set_width(CANVAS_WIDTH as u32);
    canvas.set_height(CANVAS_HEIGHT as u32);
    let ctx = dom::context_2d(&canvas).ok_or_else(|| anyhow::anyhow!("no 2d context"))?;

    let seed = js_sys::Date::now() as u64;
    let scene = Rc::new(RefCell::new(Scene::new(CANVAS_WIDTH, CANVAS_HEIGHT, seed)));
    let images = Rc::new(RefCell::new(images::ImageStore::new()));
    let mouse = Rc::new(RefCell::new(input::MouseState::default()));
    let sounds: Rc<RefCell<Option<audio::SoundBank>>> = Rc::new(RefCell::new(None));

    events::wire_pointer_handlers(events::InputWiring {
        canvas: canvas.clone(),
        scene: scene.clone(),
        mouse: mouse.clone(),
        sounds: sounds.clone(),
    });
    events::wire_ui(events::UiWiring {
        document,
        scene: scene.clone(),
        ctx: ctx.clone(),
        sounds,
        images: images.clone(),
    });

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        scene,
        images,
        mouse,
        canvas,
        ctx,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
