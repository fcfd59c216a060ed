// Shared layout/animation tuning constants used by the web frontend.

// Canvas layout
pub const CANVAS_WIDTH: f32 = 800.0;
pub const CANVAS_HEIGHT: f32 = 500.0;

// Entity sizing
pub const FACE_SIZE: f32 = 80.0; // diameter of the face image
pub const TOPIC_HEIGHT: f32 = 30.0;
pub const TOPIC_PADDING: f32 = 30.0; // horizontal padding added around the label
pub const TOPIC_FOLLOW_GAP: f32 = 10.0; // gap between a linked topic and its face

// Link effects
pub const LINK_BURST_COUNT: usize = 45;
pub const ZAP_LIFE: i32 = 20;
pub const ZAP_JITTER_PER_LIFE: f32 = 1.5; // midpoint offset per remaining life unit

// Per-frame animation steps (fixed 60 fps frame grid)
pub const GLITCH_DECAY: f32 = 0.05;
pub const GLITCH_JITTER: f32 = 5.0; // max image offset at full glitch intensity
pub const PULSE_STEP: f32 = 0.05;
pub const PARTICLE_DRAG: f32 = 0.98;
pub const SHAKE_ON_FAILURE: f32 = 10.0;

// Linked-topic glow: alpha = base + eased pulse * range
pub const GLOW_ALPHA_BASE: f32 = 50.0;
pub const GLOW_ALPHA_RANGE: f32 = 100.0;

// Success tone table: A2, C3, D3, E3, G3, A3
pub const LINK_NOTES_HZ: [f32; 6] = [110.00, 130.81, 146.83, 164.81, 196.00, 220.00];
