//! Draggable scene entities.
//!
//! Faces and topics share one "draggable body" capability (position, hit
//! radius, hover/drag flags) and live in separate collections on the scene;
//! `DragTarget` tags which collection the active drag came from.

use glam::Vec2;
use rand::prelude::*;

use crate::constants::{
    FACE_SIZE, GLITCH_DECAY, GLITCH_JITTER, GLOW_ALPHA_BASE, GLOW_ALPHA_RANGE, PULSE_STEP,
    TOPIC_HEIGHT, TOPIC_PADDING,
};

/// Opaque handle to a decoded face image owned by the frontend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageId(pub usize);

/// Which collection the currently dragged item belongs to, by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragTarget {
    Face(usize),
    Topic(usize),
}

/// Shared capability of every user-manipulable item.
#[derive(Clone, Debug)]
pub struct Draggable {
    pub pos: Vec2,
    pub radius: f32,
    pub dragging: bool,
    pub drag_offset: Vec2,
    pub hovered: bool,
}

impl Draggable {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            dragging: false,
            drag_offset: Vec2::ZERO,
            hovered: false,
        }
    }

    /// Circular hit-test against the pointer. An item mid-drag never
    /// reports itself hovered.
    pub fn check_hover(&mut self, pointer: Vec2) -> bool {
        if self.dragging {
            self.hovered = false;
            return false;
        }
        self.hovered = pointer.distance(self.pos) < self.radius;
        self.hovered
    }
}

/// An uploaded face image, optionally linked to one topic.
#[derive(Clone, Debug)]
pub struct Face {
    pub body: Draggable,
    pub image: ImageId,
    pub linked_topic: Option<usize>,
    pub glitch: f32,
    pub glitch_jitter: Vec2,
}

impl Face {
    pub fn new(pos: Vec2, image: ImageId) -> Self {
        Self {
            body: Draggable::new(pos, FACE_SIZE / 2.0),
            image,
            linked_topic: None,
            glitch: 0.0,
            glitch_jitter: Vec2::ZERO,
        }
    }

    pub fn trigger_glitch(&mut self) {
        self.glitch = 1.0;
    }

    /// Decay the glitch and reroll its jitter so the RGB-split flickers.
    pub fn step(&mut self, rng: &mut StdRng) {
        self.glitch = (self.glitch - GLITCH_DECAY).max(0.0);
        self.glitch_jitter = if self.glitch > 0.0 {
            Vec2::new(
                rng.gen_range(-GLITCH_JITTER..GLITCH_JITTER),
                rng.gen_range(-GLITCH_JITTER..GLITCH_JITTER),
            ) * self.glitch
        } else {
            Vec2::ZERO
        };
    }
}

/// A typed label, optionally linked to one face.
#[derive(Clone, Debug)]
pub struct Topic {
    pub body: Draggable,
    pub label: String,
    pub width: f32,
    pub height: f32,
    pub is_linked: bool,
    pub linked_face: Option<usize>,
    pub pulse: f32,
    pub pulse_dir: f32,
}

impl Topic {
    /// `text_width` is the label's measured pixel width; the box and the
    /// circular hit radius are derived from it. The radius intentionally
    /// approximates the rounded-rect visual with a circle.
    pub fn new(pos: Vec2, label: String, text_width: f32, initial_pulse: f32) -> Self {
        let width = text_width + TOPIC_PADDING;
        Self {
            body: Draggable::new(pos, (width / 2.0).max(TOPIC_HEIGHT / 2.0)),
            label,
            width,
            height: TOPIC_HEIGHT,
            is_linked: false,
            linked_face: None,
            pulse: initial_pulse,
            pulse_dir: 1.0,
        }
    }

    /// Advance the breathing pulse, reversing direction at each bound.
    pub fn step_pulse(&mut self) {
        self.pulse += self.pulse_dir * PULSE_STEP;
        if self.pulse > 1.0 || self.pulse < 0.0 {
            self.pulse_dir = -self.pulse_dir;
            self.pulse = self.pulse.clamp(0.0, 1.0);
        }
    }

    /// Rendered glow opacity for the linked highlight. The cosine easing
    /// returns to the unpulsed minimum at both pulse bounds and peaks at
    /// mid-pulse.
    pub fn glow_alpha(&self) -> f32 {
        let eased = 0.5 * (1.0 - (self.pulse * std::f32::consts::TAU).cos());
        GLOW_ALPHA_BASE + eased * GLOW_ALPHA_RANGE
    }
}
