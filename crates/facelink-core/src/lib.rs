pub mod constants;
pub mod effects;
pub mod entity;
pub mod scene;

pub use constants::*;
pub use effects::*;
pub use entity::*;
pub use scene::*;
