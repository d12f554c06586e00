//! Dead-reckoning orientation from gyroscope angular-velocity samples.
//!
//! The integrator is the sole writer of orientation state. Every call to
//! [`OrientationIntegrator::update`] publishes an immutable
//! [`OrientationSnapshot`] through a [`SharedOrientation`] cell; the render
//! loop only ever copies the latest published snapshot and never blocks on
//! sensor delivery.
//!
//! Angles accumulate without wraparound or clamping. This is dead reckoning,
//! not sensor fusion; unbounded drift is an accepted limitation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Nanoseconds to seconds.
const NS_TO_S: f64 = 1e-9;

/// One timestamped gyroscope reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularSample {
    /// Angular velocity about the device X axis, in radians per second.
    pub velocity_x: f32,
    /// Angular velocity about the device Y axis, in radians per second.
    pub velocity_y: f32,
    /// Sample time on a monotonic clock, in nanoseconds.
    pub timestamp_ns: u64,
}

/// Immutable orientation published to the render thread.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationSnapshot {
    /// Accumulated rotation about the X axis, radians.
    pub pitch_rad: f32,
    /// Accumulated rotation about the Y axis, radians.
    pub yaw_rad: f32,
}

/// Cross-thread cell holding the latest snapshot and a one-shot reset latch.
///
/// Writers: the integrator (snapshot) and any UI trigger (latch). Readers:
/// the render loop. The latch is consumed with an atomic swap so a reset is
/// neither lost nor applied twice.
#[derive(Debug, Default)]
pub struct SharedOrientation {
    snapshot: Mutex<OrientationSnapshot>,
    reset_requested: AtomicBool,
}

impl SharedOrientation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the latest published snapshot.
    pub fn snapshot(&self) -> OrientationSnapshot {
        match self.snapshot.lock() {
            Ok(guard) => *guard,
            // A poisoned lock still holds a whole snapshot; publishing is a
            // single assignment.
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Arms the one-shot reset latch. Fire-and-forget; the next `update`
    /// call consumes it.
    pub fn request_reset(&self) {
        self.reset_requested.store(true, Ordering::Release);
    }

    fn take_reset(&self) -> bool {
        self.reset_requested.swap(false, Ordering::AcqRel)
    }

    fn publish(&self, snap: OrientationSnapshot) {
        match self.snapshot.lock() {
            Ok(mut guard) => *guard = snap,
            Err(poisoned) => *poisoned.into_inner() = snap,
        }
    }
}

/// Integrates gyroscope samples into running pitch/yaw angles.
///
/// The first sample after construction or reset only seeds the stored
/// timestamp; integrating it would turn an arbitrary startup gap into a huge
/// rotation.
pub struct OrientationIntegrator {
    pitch_rad: f32,
    yaw_rad: f32,
    last_timestamp_ns: Option<u64>,
    shared: Arc<SharedOrientation>,
}

impl OrientationIntegrator {
    pub fn new(shared: Arc<SharedOrientation>) -> Self {
        Self {
            pitch_rad: 0.0,
            yaw_rad: 0.0,
            last_timestamp_ns: None,
            shared,
        }
    }

    /// The cell this integrator publishes through.
    pub fn shared(&self) -> &Arc<SharedOrientation> {
        &self.shared
    }

    /// Applies one sample and publishes the resulting snapshot.
    ///
    /// Samples must arrive in non-decreasing timestamp order. An
    /// out-of-order sample integrates nothing (logged at `warn`) but still
    /// advances the stored timestamp; equal timestamps give a zero `dt` and
    /// are a natural no-op. Non-finite velocities integrate as zero.
    pub fn update(&mut self, sample: AngularSample) -> OrientationSnapshot {
        if self.shared.take_reset() {
            self.pitch_rad = 0.0;
            self.yaw_rad = 0.0;
            // The sample that carries the reset re-seeds the timestamp,
            // exactly like the very first sample.
            self.last_timestamp_ns = None;
        }

        match self.last_timestamp_ns {
            None => {
                self.last_timestamp_ns = Some(sample.timestamp_ns);
            }
            Some(last) if sample.timestamp_ns < last => {
                log::warn!(
                    "out-of-order gyro sample ({} ns after {} ns), skipping integration",
                    sample.timestamp_ns,
                    last
                );
                self.last_timestamp_ns = Some(sample.timestamp_ns);
            }
            Some(last) => {
                let dt = (sample.timestamp_ns - last) as f64 * NS_TO_S;
                self.pitch_rad += finite_or_zero(sample.velocity_x, "velocity_x") * dt as f32;
                self.yaw_rad += finite_or_zero(sample.velocity_y, "velocity_y") * dt as f32;
                self.last_timestamp_ns = Some(sample.timestamp_ns);
            }
        }

        let snap = OrientationSnapshot {
            pitch_rad: self.pitch_rad,
            yaw_rad: self.yaw_rad,
        };
        self.shared.publish(snap);
        snap
    }
}

fn finite_or_zero(v: f32, what: &str) -> f32 {
    if v.is_finite() {
        v
    } else {
        log::warn!("non-finite gyro {what} ({v}), treating as zero");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn integrator() -> OrientationIntegrator {
        OrientationIntegrator::new(Arc::new(SharedOrientation::new()))
    }

    fn sample(vx: f32, vy: f32, ts: u64) -> AngularSample {
        AngularSample {
            velocity_x: vx,
            velocity_y: vy,
            timestamp_ns: ts,
        }
    }

    #[test]
    fn first_sample_seeds_without_integrating() {
        let mut integ = integrator();
        let snap = integ.update(sample(10.0, -10.0, 5_000));
        assert_eq!(snap, OrientationSnapshot::default());
    }

    #[test]
    fn integrates_velocity_times_dt() {
        let mut integ = integrator();
        integ.update(sample(0.0, FRAC_PI_2, 0));
        let snap = integ.update(sample(0.0, FRAC_PI_2, 1_000_000_000));
        assert!((snap.yaw_rad - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(snap.pitch_rad, 0.0);
    }

    #[test]
    fn zero_velocity_leaves_orientation_unchanged() {
        let mut integ = integrator();
        integ.update(sample(1.0, 1.0, 0));
        integ.update(sample(1.0, 1.0, 500_000_000));
        let before = integ.update(sample(0.0, 0.0, 600_000_000));
        let after = integ.update(sample(0.0, 0.0, 9_000_000_000));
        assert_eq!(before, after);
    }

    #[test]
    fn out_of_order_sample_is_a_no_op_but_advances_timestamp() {
        let mut integ = integrator();
        integ.update(sample(0.0, 0.0, 1_000_000_000));
        let snap = integ.update(sample(5.0, 5.0, 500_000_000));
        assert_eq!(snap, OrientationSnapshot::default());
        // The stored timestamp moved back with the sample, so the next
        // in-order sample integrates from 500ms, not 1s.
        let snap = integ.update(sample(0.0, 1.0, 1_500_000_000));
        assert!((snap.yaw_rad - 1.0).abs() < 1e-5);
    }

    #[test]
    fn equal_timestamps_integrate_nothing() {
        let mut integ = integrator();
        integ.update(sample(0.0, 0.0, 7));
        let snap = integ.update(sample(100.0, 100.0, 7));
        assert_eq!(snap, OrientationSnapshot::default());
    }

    #[test]
    fn reset_zeroes_state_and_discards_the_carrying_sample() {
        let mut integ = integrator();
        integ.update(sample(0.0, 1.0, 0));
        integ.update(sample(0.0, 1.0, 2_000_000_000));
        integ.shared().request_reset();
        let snap = integ.update(sample(50.0, 50.0, 3_000_000_000));
        assert_eq!(snap, OrientationSnapshot::default());
        // Next sample integrates from the re-seeded timestamp.
        let snap = integ.update(sample(0.0, 2.0, 3_500_000_000));
        assert!((snap.yaw_rad - 1.0).abs() < 1e-5);
    }

    #[test]
    fn reset_latch_is_one_shot() {
        let mut integ = integrator();
        integ.shared().request_reset();
        integ.update(sample(0.0, 0.0, 0));
        let snap = integ.update(sample(0.0, 1.0, 1_000_000_000));
        assert!(snap.yaw_rad > 0.9);
    }

    #[test]
    fn non_finite_velocity_integrates_as_zero() {
        let mut integ = integrator();
        integ.update(sample(0.0, 0.0, 0));
        let snap = integ.update(sample(f32::NAN, f32::INFINITY, 1_000_000_000));
        assert_eq!(snap, OrientationSnapshot::default());
    }

    #[test]
    fn update_publishes_to_the_shared_cell() {
        let shared = Arc::new(SharedOrientation::new());
        let mut integ = OrientationIntegrator::new(shared.clone());
        integ.update(sample(0.0, 1.0, 0));
        integ.update(sample(0.0, 1.0, 1_000_000_000));
        assert!((shared.snapshot().yaw_rad - 1.0).abs() < 1e-5);
    }
}
