//! Canvas2D painter. Reads scene state, never mutates it; all cosmetic
//! per-frame noise (static, speckles, flicker, shake offset) comes from
//! `js_sys::Math::random` and is invisible to the core.

use facelink_core::{Face, Scene, Topic, FACE_SIZE};
use web_sys as web;

use crate::images::ImageStore;

#[inline]
fn rand_range(lo: f64, hi: f64) -> f64 {
    lo + js_sys::Math::random() * (hi - lo)
}

/// Trace a rounded rectangle centered on (cx, cy).
fn trace_rounded_rect(
    ctx: &web::CanvasRenderingContext2d,
    cx: f64,
    cy: f64,
    w: f64,
    h: f64,
    r: f64,
) {
    let (x, y) = (cx - w / 2.0, cy - h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
    let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
    let _ = ctx.arc_to(x, y + h, x, y, r);
    let _ = ctx.arc_to(x, y, x + w, y, r);
    ctx.close_path();
}

pub fn draw(ctx: &web::CanvasRenderingContext2d, scene: &Scene, images: &ImageStore) {
    let w = scene.width as f64;
    let h = scene.height as f64;

    ctx.save();
    if scene.shake > 0.0 {
        let s = scene.shake as f64;
        let _ = ctx.translate(rand_range(-s, s), rand_range(-s, s));
    }

    // Background, oversized so shake offsets never expose the page behind.
    ctx.set_fill_style_str("#000000");
    ctx.fill_rect(-20.0, -20.0, w + 40.0, h + 40.0);
    draw_static(ctx, w, h);

    draw_particles(ctx, scene);
    draw_zaps(ctx, scene);
    for face in &scene.faces {
        draw_face(ctx, face, images);
    }
    for topic in &scene.topics {
        draw_topic(ctx, topic);
    }
    draw_speckles(ctx, w, h);

    ctx.restore();
}

// Dim horizontal interference bars.
fn draw_static(ctx: &web::CanvasRenderingContext2d, w: f64, h: f64) {
    for _ in 0..10 {
        let g = rand_range(0.0, 50.0) as u8;
        let a = rand_range(10.0, 30.0) / 255.0;
        ctx.set_fill_style_str(&format!("rgba({g},{g},{g},{a:.3})"));
        let bw = rand_range(0.0, w / 2.0);
        let bh = rand_range(0.0, h / 10.0);
        ctx.fill_rect(
            rand_range(0.0, w) - bw / 2.0,
            rand_range(0.0, h) - bh / 2.0,
            bw,
            bh,
        );
    }
}

fn draw_speckles(ctx: &web::CanvasRenderingContext2d, w: f64, h: f64) {
    ctx.set_fill_style_str("rgba(255,255,255,0.06)");
    for _ in 0..300 {
        ctx.fill_rect(rand_range(0.0, w), rand_range(0.0, h), 1.0, 1.0);
    }
}

fn draw_particles(ctx: &web::CanvasRenderingContext2d, scene: &Scene) {
    for p in &scene.particles {
        let flicker = rand_range(100.0, 255.0) as u8;
        let a = (p.lifespan / 255.0).clamp(0.0, 1.0);
        ctx.set_fill_style_str(&format!("rgba({flicker},{flicker},{flicker},{a:.3})"));
        ctx.fill_rect(p.pos.x as f64 - 2.0, p.pos.y as f64 - 2.0, 4.0, 4.0);
    }
}

// Two-segment jagged arc, a wide yellow pass under a thin white one.
fn draw_zaps(ctx: &web::CanvasRenderingContext2d, scene: &Scene) {
    for z in &scene.zaps {
        let a = z.fade();
        let life = z.life as f64;
        for (color, width) in [
            (format!("rgba(255,255,0,{a:.3})"), 3.0 + life * 0.2),
            (format!("rgba(255,255,255,{a:.3})"), 1.0 + life * 0.1),
        ] {
            ctx.set_stroke_style_str(&color);
            ctx.set_line_width(width);
            ctx.begin_path();
            ctx.move_to(z.from.x as f64, z.from.y as f64);
            ctx.line_to(z.mid.x as f64, z.mid.y as f64);
            ctx.line_to(z.to.x as f64, z.to.y as f64);
            ctx.stroke();
        }
    }
}

fn draw_face(ctx: &web::CanvasRenderingContext2d, face: &Face, images: &ImageStore) {
    let Some(img) = images.get(face.image) else {
        return;
    };
    let size = FACE_SIZE as f64;

    ctx.save();
    let _ = ctx.translate(face.body.pos.x as f64, face.body.pos.y as f64);
    if face.body.hovered && !face.body.dragging {
        let _ = ctx.scale(1.05, 1.05);
    }

    if face.glitch > 0.0 {
        let (jx, jy) = (face.glitch_jitter.x as f64, face.glitch_jitter.y as f64);
        let _ = ctx.set_global_composite_operation("lighter");
        ctx.set_global_alpha((0.59 * face.glitch) as f64);
        let offsets = [(jx, jy), (-jx, -jy), (jx / 2.0, jy / 2.0)];
        for (tint, (ox, oy)) in img.tints.iter().zip(offsets) {
            let _ = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                tint,
                ox - size / 2.0,
                oy - size / 2.0,
                size,
                size,
            );
        }
        let _ = ctx.set_global_composite_operation("source-over");
        ctx.set_global_alpha((1.0 - face.glitch * 0.5) as f64);
    }

    let _ = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
        &img.base,
        -size / 2.0,
        -size / 2.0,
        size,
        size,
    );
    ctx.set_global_alpha(1.0);

    if face.body.hovered {
        ctx.set_stroke_style_str("#00ff00");
        ctx.set_line_width(3.0);
    } else {
        ctx.set_stroke_style_str("#ffffff");
        ctx.set_line_width(2.0);
    }
    trace_rounded_rect(ctx, 0.0, 0.0, size + 2.0, size + 2.0, 8.0);
    ctx.stroke();
    ctx.restore();
}

fn draw_topic(ctx: &web::CanvasRenderingContext2d, topic: &Topic) {
    let (w, h) = (topic.width as f64, topic.height as f64);

    ctx.save();
    let _ = ctx.translate(topic.body.pos.x as f64, topic.body.pos.y as f64);
    if topic.body.hovered && !topic.body.dragging {
        let _ = ctx.scale(1.05, 1.05);
    }

    ctx.set_font("16px 'Courier New', monospace");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");

    let (stroke, stroke_w) = if topic.body.hovered {
        ("#00ff00", 3.0)
    } else {
        ("#ffffff", 1.0)
    };

    if topic.is_linked {
        // Breathing halo behind the box; the eased alpha comes from the core.
        let glow = (topic.glow_alpha() / 255.0).clamp(0.0, 1.0);
        ctx.set_fill_style_str(&format!("rgba(255,255,255,{glow:.3})"));
        trace_rounded_rect(ctx, 0.0, 0.0, w + 5.0, h + 5.0, 8.0);
        ctx.fill();

        ctx.set_fill_style_str("#ffffff");
        trace_rounded_rect(ctx, 0.0, 0.0, w, h, 5.0);
        ctx.fill();
        ctx.set_stroke_style_str(stroke);
        ctx.set_line_width(stroke_w);
        ctx.stroke();

        ctx.set_fill_style_str("#000000");
        let _ = ctx.fill_text(&topic.label, 0.0, 0.0);
    } else {
        ctx.set_fill_style_str("#000000");
        trace_rounded_rect(ctx, 0.0, 0.0, w, h, 5.0);
        ctx.fill();
        ctx.set_stroke_style_str(stroke);
        ctx.set_line_width(stroke_w);
        ctx.stroke();

        ctx.set_fill_style_str("#ffffff");
        let _ = ctx.fill_text(&topic.label, 0.0, 0.0);
    }
    ctx.restore();
}
