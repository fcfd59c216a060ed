//! The per-frame tick: advance the scene, reflect the cursor, repaint.

use std::cell::RefCell;
use std::rc::Rc;

use facelink_core::Cursor;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;
use crate::images::ImageStore;
use crate::input::MouseState;
use crate::render;

pub struct FrameContext {
    pub scene: Rc<RefCell<facelink_core::Scene>>,
    pub images: Rc<RefCell<ImageStore>>,
    pub mouse: Rc<RefCell<MouseState>>,
    pub canvas: web::HtmlCanvasElement,
    pub ctx: web::CanvasRenderingContext2d,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let pointer = self.mouse.borrow().pos();
        let mut scene = self.scene.borrow_mut();
        scene.update(pointer);

        dom::set_cursor(
            &self.canvas,
            match scene.cursor() {
                Cursor::Grabbing => "grabbing",
                Cursor::Grab => "grab",
                Cursor::Default => "default",
            },
        );

        render::draw(&self.ctx, &scene, &self.images.borrow());
    }
}

/// Drive `frame` from requestAnimationFrame until the page goes away.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
