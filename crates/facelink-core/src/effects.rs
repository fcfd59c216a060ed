//! Transient visual effects: link particle bursts and zap arcs.
//!
//! Both are frame-driven and self-expiring; neither is owned by a face or
//! topic, they are rendering artifacts tied to a link event.

use glam::Vec2;
use rand::prelude::*;

use crate::constants::{PARTICLE_DRAG, ZAP_JITTER_PER_LIFE, ZAP_LIFE};

/// Uniformly random unit direction.
pub fn random_unit(rng: &mut StdRng) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec2::new(angle.cos(), angle.sin())
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub lifespan: f32,
    pub decay: f32,
}

impl Particle {
    pub fn new(pos: Vec2, rng: &mut StdRng) -> Self {
        Self {
            pos,
            vel: random_unit(rng) * rng.gen_range(2.0..6.0),
            lifespan: rng.gen_range(150.0..255.0),
            decay: rng.gen_range(3.0..6.0),
        }
    }

    pub fn step(&mut self) {
        self.pos += self.vel;
        self.vel *= PARTICLE_DRAG;
        self.lifespan -= self.decay;
    }

    pub fn dead(&self) -> bool {
        self.lifespan < 0.0
    }
}

#[derive(Clone, Debug)]
pub struct Zap {
    pub from: Vec2,
    pub to: Vec2,
    /// Jagged midpoint, rerolled every frame while the zap is alive.
    pub mid: Vec2,
    pub life: i32,
}

impl Zap {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self {
            from,
            to,
            mid: from.lerp(to, 0.5),
            life: ZAP_LIFE,
        }
    }

    /// Decrement life and reroll the midpoint; the jitter amplitude shrinks
    /// with remaining life so the arc settles as it fades.
    pub fn step(&mut self, rng: &mut StdRng) {
        self.life -= 1;
        self.mid = self.from.lerp(self.to, 0.5)
            + random_unit(rng) * (self.life.max(0) as f32 * ZAP_JITTER_PER_LIFE);
    }

    pub fn dead(&self) -> bool {
        self.life <= 0
    }

    /// Remaining life as a 0..1 fraction, for stroke width and alpha.
    pub fn fade(&self) -> f32 {
        self.life.max(0) as f32 / ZAP_LIFE as f32
    }
}
