//! Camera system for 3D scene viewing.
//!
//! A free-fly camera with WASD-style movement and mouse look, plus the
//! GPU uniform it feeds.

/// Core camera struct and GPU uniform types.
pub mod core;
/// Free-fly camera and held-key movement state.
pub mod fly;
/// Window-event-based camera input handler.
#[cfg(feature = "viewer")]
pub mod input;
