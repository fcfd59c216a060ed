//! The shared application state and its per-frame / per-event transitions.
//!
//! Everything here is synchronous and single-threaded: pointer callbacks and
//! UI callbacks run between frames, `update` runs once per frame. Links are
//! stored as indices into the two entity collections; only unlinked items are
//! ever removed, and removal shifts the stored indices on the surviving side.

use glam::Vec2;
use rand::prelude::*;

use crate::constants::{
    FACE_SIZE, LINK_BURST_COUNT, LINK_NOTES_HZ, SHAKE_ON_FAILURE, TOPIC_FOLLOW_GAP, TOPIC_HEIGHT,
    TOPIC_PADDING,
};
use crate::effects::{Particle, Zap};
use crate::entity::{DragTarget, Face, ImageId, Topic};

/// Pointer cursor the frontend should show this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Grab,
    Grabbing,
}

/// What a pointer press resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    /// The press landed on a linked topic and broke that pairing.
    LinkBroken,
    DragStarted(DragTarget),
    Miss,
}

/// Result of a random-link attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinkOutcome {
    Linked {
        face: usize,
        topic: usize,
        note_hz: f32,
    },
    /// One side had no unlinked candidate; shake was armed, caller plays
    /// the failure tone.
    NoPair,
}

pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub faces: Vec<Face>,
    pub topics: Vec<Topic>,
    pub particles: Vec<Particle>,
    pub zaps: Vec<Zap>,
    pub dragged: Option<DragTarget>,
    pub shake: f32,
    rng: StdRng,
}

impl Scene {
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self {
            width,
            height,
            faces: Vec::new(),
            topics: Vec::new(),
            particles: Vec::new(),
            zaps: Vec::new(),
            dragged: None,
            shake: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn random_x(&mut self, half_width: f32) -> f32 {
        let (lo, hi) = (half_width, self.width - half_width);
        if lo < hi {
            self.rng.gen_range(lo..hi)
        } else {
            self.width / 2.0
        }
    }

    /// Append a face at a random spot in the upper half of the canvas.
    pub fn add_face(&mut self, image: ImageId) -> usize {
        let x = self.random_x(FACE_SIZE / 2.0);
        let y = self.rng.gen_range(FACE_SIZE / 2.0..self.height / 2.0);
        self.faces.push(Face::new(Vec2::new(x, y), image));
        self.faces.len() - 1
    }

    /// Append a topic at a random spot in the lower half. Whitespace-only
    /// labels are rejected silently; returns whether the topic was added so
    /// the caller knows to clear its input.
    pub fn add_topic(&mut self, label: &str, text_width: f32) -> bool {
        if label.trim().is_empty() {
            return false;
        }
        let x = self.random_x((text_width + TOPIC_PADDING) / 2.0);
        let y = self
            .rng
            .gen_range(self.height / 2.0..self.height - TOPIC_HEIGHT / 2.0);
        let pulse = self.rng.gen::<f32>();
        self.topics
            .push(Topic::new(Vec2::new(x, y), label.to_string(), text_width, pulse));
        true
    }

    /// One frame of simulation: effect bookkeeping, hover resolution, then
    /// entity animation. Order matters and matches the redraw pass.
    pub fn update(&mut self, pointer: Vec2) {
        if self.shake > 0.0 {
            self.shake -= 1.0;
        }

        for p in self.particles.iter_mut() {
            p.step();
        }
        self.particles.retain(|p| !p.dead());

        for z in self.zaps.iter_mut() {
            z.step(&mut self.rng);
        }
        self.zaps.retain(|z| !z.dead());

        // Every topic then every face gets a fresh hover flag; the global
        // winner only picks the cursor, it does not gate per-item state.
        for t in self.topics.iter_mut().rev() {
            t.body.check_hover(pointer);
        }
        for f in self.faces.iter_mut().rev() {
            f.body.check_hover(pointer);
        }

        for f in self.faces.iter_mut() {
            f.step(&mut self.rng);
        }

        for t in self.topics.iter_mut() {
            if let Some(fi) = t.linked_face {
                let face = &self.faces[fi];
                let mut target_y =
                    face.body.pos.y - face.body.radius - t.height / 2.0 - TOPIC_FOLLOW_GAP;
                if target_y < t.height / 2.0 {
                    target_y = t.height / 2.0;
                }
                t.body.pos = Vec2::new(face.body.pos.x, target_y);
                t.step_pulse();
            }
        }
    }

    pub fn cursor(&self) -> Cursor {
        if self.dragged.is_some() {
            Cursor::Grabbing
        } else if self.topics.iter().any(|t| t.body.hovered)
            || self.faces.iter().any(|f| f.body.hovered)
        {
            Cursor::Grab
        } else {
            Cursor::Default
        }
    }

    /// Pointer press: a linked, hovered topic breaks its pairing and the
    /// press is consumed; otherwise the topmost hovered item (topics before
    /// faces, both in reverse insertion order) starts a drag.
    pub fn pointer_down(&mut self, pointer: Vec2) -> PressOutcome {
        for ti in (0..self.topics.len()).rev() {
            if self.topics[ti].is_linked && self.topics[ti].body.hovered {
                self.break_link(ti);
                return PressOutcome::LinkBroken;
            }
        }

        if self.dragged.is_none() {
            if let Some(ti) = self.topics.iter().rposition(|t| t.body.hovered) {
                self.dragged = Some(DragTarget::Topic(ti));
            } else if let Some(fi) = self.faces.iter().rposition(|f| f.body.hovered) {
                self.dragged = Some(DragTarget::Face(fi));
            }
        }

        match self.dragged {
            Some(target) => {
                let body = match target {
                    DragTarget::Face(i) => &mut self.faces[i].body,
                    DragTarget::Topic(i) => &mut self.topics[i].body,
                };
                body.dragging = true;
                body.drag_offset = body.pos - pointer;
                log::info!("begin drag on {:?}", target);
                PressOutcome::DragStarted(target)
            }
            None => PressOutcome::Miss,
        }
    }

    /// Reposition the dragged item so it keeps its press offset under the
    /// pointer. The only way a face or an unlinked topic moves after spawn.
    pub fn drag_to(&mut self, pointer: Vec2) {
        if let Some(target) = self.dragged {
            let body = match target {
                DragTarget::Face(i) => &mut self.faces[i].body,
                DragTarget::Topic(i) => &mut self.topics[i].body,
            };
            body.pos = pointer + body.drag_offset;
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some(target) = self.dragged.take() {
            match target {
                DragTarget::Face(i) => self.faces[i].body.dragging = false,
                DragTarget::Topic(i) => self.topics[i].body.dragging = false,
            }
        }
    }

    /// Symmetric clear of exactly one pairing.
    fn break_link(&mut self, ti: usize) {
        if let Some(fi) = self.topics[ti].linked_face {
            self.faces[fi].linked_topic = None;
        }
        self.topics[ti].is_linked = false;
        self.topics[ti].linked_face = None;
    }

    /// Pick one unlinked face and one unlinked topic uniformly at random and
    /// pair them, spawning the burst, zap and glitch. With no candidate on
    /// either side this arms the screen shake and reports `NoPair`.
    pub fn link_random(&mut self) -> LinkOutcome {
        let unlinked_faces: Vec<usize> = (0..self.faces.len())
            .filter(|&i| self.faces[i].linked_topic.is_none())
            .collect();
        let unlinked_topics: Vec<usize> = (0..self.topics.len())
            .filter(|&i| !self.topics[i].is_linked)
            .collect();

        if unlinked_faces.is_empty() || unlinked_topics.is_empty() {
            self.shake = SHAKE_ON_FAILURE;
            return LinkOutcome::NoPair;
        }

        let fi = *unlinked_faces.choose(&mut self.rng).unwrap_or(&0);
        let ti = *unlinked_topics.choose(&mut self.rng).unwrap_or(&0);

        self.faces[fi].linked_topic = Some(ti);
        self.topics[ti].is_linked = true;
        self.topics[ti].linked_face = Some(fi);
        self.faces[fi].trigger_glitch();

        let from = self.faces[fi].body.pos;
        let to = self.topics[ti].body.pos;
        for _ in 0..LINK_BURST_COUNT {
            let p = Particle::new(from, &mut self.rng);
            self.particles.push(p);
        }
        self.zaps.push(Zap::new(from, to));

        let note_hz = LINK_NOTES_HZ
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(LINK_NOTES_HZ[0]);
        log::info!("linked face {} to topic {}", fi, ti);
        LinkOutcome::Linked {
            face: fi,
            topic: ti,
            note_hz,
        }
    }

    /// Unconditionally clear every pairing. No effects are spawned.
    pub fn reset_links(&mut self) {
        for f in self.faces.iter_mut() {
            f.linked_topic = None;
        }
        for t in self.topics.iter_mut() {
            t.is_linked = false;
            t.linked_face = None;
        }
    }

    /// Remove the most-recently-added unlinked face and, independently, the
    /// most-recently-added unlinked topic. A kind whose items are all linked
    /// is left untouched; removal never deletes a linked participant.
    pub fn remove_last(&mut self) {
        if let Some(fi) = self.faces.iter().rposition(|f| f.linked_topic.is_none()) {
            self.faces.remove(fi);
            for t in self.topics.iter_mut() {
                if let Some(j) = t.linked_face {
                    if j > fi {
                        t.linked_face = Some(j - 1);
                    }
                }
            }
            self.dragged = match self.dragged {
                Some(DragTarget::Face(i)) if i == fi => None,
                Some(DragTarget::Face(i)) if i > fi => Some(DragTarget::Face(i - 1)),
                other => other,
            };
        }
        if let Some(ti) = self.topics.iter().rposition(|t| !t.is_linked) {
            self.topics.remove(ti);
            for f in self.faces.iter_mut() {
                if let Some(j) = f.linked_topic {
                    if j > ti {
                        f.linked_topic = Some(j - 1);
                    }
                }
            }
            self.dragged = match self.dragged {
                Some(DragTarget::Topic(i)) if i == ti => None,
                Some(DragTarget::Topic(i)) if i > ti => Some(DragTarget::Topic(i - 1)),
                other => other,
            };
        }
    }
}
