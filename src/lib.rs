//! Post-processing for real-time rendering.
//!
//! An [`EffectComposer`](composer::EffectComposer) runs an ordered list of
//! [`Pass`](passes::Pass)es over a ping-pong pair of frame buffers. The
//! [`EffectPass`](passes::effect::EffectPass) merges any number of
//! [`Effect`](effects::Effect)s into a single fullscreen shader so that a whole
//! chain of image-space effects costs one draw call.

// Lets the derive macros refer to `::postfx` from inside this crate as well
extern crate self as postfx;

pub mod composer;
pub mod core;
pub mod effects;
pub mod error;
pub mod libs;
pub mod materials;
pub mod passes;

pub use composer::{EffectComposer, PassId};
pub use error::MergeError;
