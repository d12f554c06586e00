//! Command-line and environment configuration.
//!
//! The two view settings are taken as raw strings and parsed leniently: a
//! value that fails to parse logs a warning and falls back to its default
//! rather than aborting the session.

use clap::Parser;

pub const DEFAULT_ROT_AXIS_Z_OFFSET: f32 = 0.0;
pub const DEFAULT_OBJECT_SCALE: f32 = 5.0;

/// `holocube-viewer` - renders a cube whose perspective reacts to device
/// rotation, producing a hologram parallax illusion.
///
/// By default the gyroscope is emulated from mouse motion; press `R` to
/// snap the view back to its rest framing, `Esc` to quit.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Z offset of the pivot the cube counter-rotates around.
    ///
    /// Values that fail to parse fall back to the default.
    #[arg(long, env = "HOLOCUBE_ROT_Z_OFFSET", default_value = "0.0")]
    pub rot_axis_z_offset: String,

    /// Uniform scale applied to the cube.
    ///
    /// Values that fail to parse fall back to the default.
    #[arg(long, env = "HOLOCUBE_SCALE", default_value = "5.0")]
    pub object_scale: String,

    /// Drive the view from a synthetic gyroscope sweep instead of the mouse.
    #[arg(long)]
    pub demo: bool,

    /// Radians of emulated device rotation per pixel of mouse motion.
    #[arg(long, default_value_t = 0.005)]
    pub mouse_sensitivity: f32,
}

/// Per-session view parameters, read once at session start and fixed for
/// the lifetime of the renderer session.
#[derive(Debug, Clone, Copy)]
pub struct ViewConfig {
    pub rot_axis_z_offset: f32,
    pub object_scale: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            rot_axis_z_offset: DEFAULT_ROT_AXIS_Z_OFFSET,
            object_scale: DEFAULT_OBJECT_SCALE,
        }
    }
}

impl Args {
    /// Parses the numeric settings, falling back to defaults on bad input.
    pub fn view_config(&self) -> ViewConfig {
        ViewConfig {
            rot_axis_z_offset: parse_or(
                &self.rot_axis_z_offset,
                DEFAULT_ROT_AXIS_Z_OFFSET,
                "rot-axis-z-offset",
            ),
            object_scale: parse_or(&self.object_scale, DEFAULT_OBJECT_SCALE, "object-scale"),
        }
    }
}

fn parse_or(raw: &str, default: f32, name: &str) -> f32 {
    match raw.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            log::warn!("invalid value {raw:?} for --{name}, using default {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(z: &str, scale: &str) -> Args {
        Args {
            rot_axis_z_offset: z.into(),
            object_scale: scale.into(),
            demo: false,
            mouse_sensitivity: 0.005,
        }
    }

    #[test]
    fn valid_strings_parse() {
        let cfg = args("2.5", "-1.25").view_config();
        assert_eq!(cfg.rot_axis_z_offset, 2.5);
        assert_eq!(cfg.object_scale, -1.25);
    }

    #[test]
    fn unparseable_strings_fall_back_to_defaults() {
        let cfg = args("not-a-number", "").view_config();
        assert_eq!(cfg.rot_axis_z_offset, DEFAULT_ROT_AXIS_Z_OFFSET);
        assert_eq!(cfg.object_scale, DEFAULT_OBJECT_SCALE);
    }

    #[test]
    fn non_finite_values_fall_back_to_defaults() {
        let cfg = args("NaN", "inf").view_config();
        assert_eq!(cfg.rot_axis_z_offset, DEFAULT_ROT_AXIS_Z_OFFSET);
        assert_eq!(cfg.object_scale, DEFAULT_OBJECT_SCALE);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let cfg = args(" 1.0 ", "\t8\n").view_config();
        assert_eq!(cfg.rot_axis_z_offset, 1.0);
        assert_eq!(cfg.object_scale, 8.0);
    }
}
