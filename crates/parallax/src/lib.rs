//! Core math and state for the hologram parallax illusion.
//!
//! A cube appears to hang in space behind the screen: device rotation is
//! dead-reckoned from gyroscope samples, and the running pitch/yaw angles
//! drive an asymmetric view frustum plus a counter-rotation of the cube so
//! it seems fixed in the world as the viewer moves.
//!
//! This crate is renderer-agnostic. The integrator publishes immutable
//! snapshots through [`SharedOrientation`]; the frustum model is a pure
//! function of the latest snapshot and the viewport aspect ratio.

pub mod frustum;
pub mod mesh;
pub mod orientation;

pub use frustum::{Distortion, FrustumParams};
pub use mesh::{MeshAsset, Vertex};
pub use orientation::{AngularSample, OrientationIntegrator, OrientationSnapshot, SharedOrientation};
