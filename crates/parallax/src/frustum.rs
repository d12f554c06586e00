//! Maps integrated device orientation onto an asymmetric view frustum.
//!
//! Instead of rotating the camera, the near-plane window slides along its
//! own plane as the device turns. That shear is what keeps the rendered
//! object visually pinned in world space, and shortening `near` with yaw
//! keeps the eye-to-viewport-center distance constant under the shear.

use glam::Mat4;

/// Smallest allowed near-plane distance. `cos(yaw)` crosses zero at ±90°;
/// a non-positive near plane is undefined behavior for the projection.
pub const NEAR_EPSILON: f32 = 1e-3;

/// Distance between the near and far planes.
pub const FRUSTUM_DEPTH: f32 = 100.0;

/// Planes of an off-axis viewing frustum. `near` is always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumParams {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl FrustumParams {
    /// Off-center perspective matrix in OpenGL clip-space conventions
    /// (z in [-1, 1]). Same layout as the fixed-function `glFrustum`.
    pub fn projection_matrix(&self) -> Mat4 {
        let (l, r) = (self.left, self.right);
        let (b, t) = (self.bottom, self.top);
        let (n, f) = (self.near, self.far);
        Mat4::from_cols_array(&[
            2.0 * n / (r - l), 0.0, 0.0, 0.0,
            0.0, 2.0 * n / (t - b), 0.0, 0.0,
            (r + l) / (r - l), (t + b) / (t - b), -(f + n) / (f - n), -1.0,
            0.0, 0.0, -2.0 * f * n / (f - n), 0.0,
        ])
    }
}

/// Per-frame distortion: the projection planes plus the counter-rotation
/// applied to the object so its orientation stays fixed to the world while
/// its silhouette shifts inside the sheared frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distortion {
    pub frustum: FrustumParams,
    /// Rotation about the X axis that cancels the accumulated pitch.
    pub counter_pitch_rad: f32,
    /// Rotation about the Y axis that cancels the accumulated yaw.
    pub counter_yaw_rad: f32,
}

/// Computes the frustum distortion for one frame.
///
/// Non-finite angles are treated as zero and a non-finite or non-positive
/// aspect ratio as 1, so the output is always safe to hand to the graphics
/// layer. Only yaw feeds the near-plane shortening; the original effect
/// never incorporated pitch there and the asymmetry is kept as-is.
pub fn compute(pitch_rad: f32, yaw_rad: f32, aspect_ratio: f32) -> Distortion {
    let pitch = finite_angle(pitch_rad);
    let yaw = finite_angle(yaw_rad);
    let aspect = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        aspect_ratio
    } else {
        1.0
    };

    let near = yaw.cos().max(NEAR_EPSILON);

    // Slide the viewport window along the near plane.
    let x_offset = yaw.sin();
    let y_offset = pitch.sin();

    Distortion {
        frustum: FrustumParams {
            left: -aspect + x_offset,
            right: aspect + x_offset,
            bottom: -1.0 - y_offset,
            top: 1.0 - y_offset,
            near,
            far: near + FRUSTUM_DEPTH,
        },
        counter_pitch_rad: -pitch,
        counter_yaw_rad: -yaw,
    }
}

fn finite_angle(a: f32) -> f32 {
    if a.is_finite() {
        a
    } else {
        log::warn!("non-finite orientation angle ({a}), using 0");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn identity_orientation_gives_centered_frustum() {
        let d = compute(0.0, 0.0, 1.5);
        assert_eq!(d.frustum.left, -1.5);
        assert_eq!(d.frustum.right, 1.5);
        assert_eq!(d.frustum.bottom, -1.0);
        assert_eq!(d.frustum.top, 1.0);
        assert_eq!(d.frustum.near, 1.0);
        assert_eq!(d.frustum.far, 101.0);
        assert_eq!(d.counter_pitch_rad, 0.0);
        assert_eq!(d.counter_yaw_rad, 0.0);
    }

    #[test]
    fn quarter_turn_yaw_clamps_near_and_shears_fully() {
        // One second at pi/2 rad/s lands exactly on the clamp boundary.
        let d = compute(0.0, FRAC_PI_2, 1.0);
        assert_eq!(d.frustum.near, NEAR_EPSILON);
        assert!((d.frustum.right - d.frustum.left - 2.0).abs() < 1e-6);
        let x_offset = (d.frustum.left + d.frustum.right) / 2.0;
        assert!((x_offset - 1.0).abs() < 1e-6);
    }

    #[test]
    fn near_stays_positive_for_any_yaw() {
        for yaw in [FRAC_PI_2, PI, 2.5, -2.0, 100.0] {
            let d = compute(0.0, yaw, 1.0);
            assert!(d.frustum.near >= NEAR_EPSILON, "yaw={yaw}");
            assert!((d.frustum.far - d.frustum.near - FRUSTUM_DEPTH).abs() < 1e-4);
        }
    }

    #[test]
    fn pitch_shifts_the_window_vertically_only() {
        let d = compute(0.5, 0.0, 1.0);
        let y_offset = 0.5f32.sin();
        assert!((d.frustum.bottom + 1.0 + y_offset).abs() < 1e-6);
        assert!((d.frustum.top - 1.0 + y_offset).abs() < 1e-6);
        // Pitch never feeds the near plane.
        assert_eq!(d.frustum.near, 1.0);
    }

    #[test]
    fn planes_are_symmetric_about_the_shear_offset() {
        let aspect = 1920.0 / 1080.0;
        let d = compute(0.3, 0.7, aspect);
        let x_offset = 0.7f32.sin();
        assert!((d.frustum.right - x_offset - aspect).abs() < 1e-6);
        assert!((d.frustum.left - x_offset + aspect).abs() < 1e-6);
    }

    #[test]
    fn non_finite_inputs_are_sanitized() {
        let d = compute(f32::NAN, f32::INFINITY, f32::NAN);
        assert_eq!(d, compute(0.0, 0.0, 1.0));
    }

    #[test]
    fn projection_maps_near_corners_to_ndc_corners() {
        let f = compute(0.2, 0.4, 1.78).frustum;
        let m = f.projection_matrix();

        let lower = m * Vec4::new(f.left, f.bottom, -f.near, 1.0);
        let lower = lower / lower.w;
        assert!((lower.x + 1.0).abs() < 1e-4);
        assert!((lower.y + 1.0).abs() < 1e-4);
        assert!((lower.z + 1.0).abs() < 1e-4);

        let upper = m * Vec4::new(f.right, f.top, -f.near, 1.0);
        let upper = upper / upper.w;
        assert!((upper.x - 1.0).abs() < 1e-4);
        assert!((upper.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn counter_rotation_negates_the_accumulated_angles() {
        let d = compute(0.25, -0.5, 1.0);
        assert_eq!(d.counter_pitch_rad, -0.25);
        assert_eq!(d.counter_yaw_rad, 0.5);
    }
}
