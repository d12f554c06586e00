//! Holocube: a desktop renderer for the hologram parallax illusion.
//!
//! A single cube is drawn through an asymmetric frustum that reacts to
//! emulated device rotation, so the cube appears to sit at a fixed point in
//! space behind the screen. The numerical core lives in the `parallax`
//! crate; this crate provides the window, the wgpu renderer, and the
//! sensor-delivery threads.

pub mod app;
pub mod config;
pub mod renderer;
pub mod scene;
pub mod sensor;
