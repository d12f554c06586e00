//! Gyroscope sample delivery.
//!
//! Samples flow through a bounded channel into a dedicated integrator
//! thread; the integrator is the only writer of orientation state and the
//! render loop never blocks on sensor input. Producers that can't keep up
//! with the channel drop samples rather than stall the event loop.
//!
//! On desktop the gyroscope is emulated: either from mouse motion
//! ([`MouseGyro`]) or from a synthetic sinusoidal sweep (`--demo`).

use crossbeam_channel::{bounded, Sender};
use parallax::{AngularSample, OrientationIntegrator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Channel depth; at gyro rates this is several hundred milliseconds of
/// headroom before samples are dropped.
const CHANNEL_CAPACITY: usize = 256;

/// Sample period of the synthetic gyroscope (~200 Hz).
const SYNTHETIC_PERIOD: Duration = Duration::from_millis(5);

/// Owns the sensor side of one renderer session: the integrator thread and
/// any sample-producer threads.
///
/// [`SensorSession::stop`] detaches producers first, closes the channel,
/// then joins the integrator thread, so no `update` call can race a
/// torn-down session.
pub struct SensorSession {
    tx: Option<Sender<AngularSample>>,
    stop: Arc<AtomicBool>,
    producers: Vec<thread::JoinHandle<()>>,
    integrator_thread: Option<thread::JoinHandle<()>>,
}

impl SensorSession {
    /// Moves `integrator` onto its own thread and starts draining samples.
    pub fn start(mut integrator: OrientationIntegrator) -> Self {
        let (tx, rx) = bounded::<AngularSample>(CHANNEL_CAPACITY);

        let integrator_thread = thread::spawn(move || {
            for sample in rx.iter() {
                integrator.update(sample);
            }
            log::debug!("gyro listener detached");
        });

        Self {
            tx: Some(tx),
            stop: Arc::new(AtomicBool::new(false)),
            producers: Vec::new(),
            integrator_thread: Some(integrator_thread),
        }
    }

    /// Delivers one sample from the event loop. Drops the sample if the
    /// integrator is behind or the session is stopping.
    pub fn push(&self, sample: AngularSample) {
        if let Some(tx) = &self.tx {
            if tx.try_send(sample).is_err() {
                log::debug!("dropped gyro sample (integrator busy)");
            }
        }
    }

    /// Spawns a synthetic gyroscope producer: a smooth pitch/yaw sweep for
    /// running the illusion without any input device.
    pub fn spawn_synthetic(&mut self) {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let stop = self.stop.clone();

        self.producers.push(thread::spawn(move || {
            let origin = Instant::now();
            while !stop.load(Ordering::Acquire) {
                thread::sleep(SYNTHETIC_PERIOD);
                let elapsed = origin.elapsed();
                let secs = elapsed.as_secs_f32();
                let sample = AngularSample {
                    velocity_x: 0.25 * (0.8 * secs).cos(),
                    velocity_y: 0.6 * (0.5 * secs).cos(),
                    timestamp_ns: elapsed.as_nanos() as u64,
                };
                if tx.send(sample).is_err() {
                    break;
                }
            }
        }));
    }

    /// Unregisters all producers, then waits for the integrator thread to
    /// drain and exit. Idempotent via `Drop`.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        for handle in self.producers.drain(..) {
            let _ = handle.join();
        }
        // Last sender gone => the integrator's receive loop terminates.
        self.tx = None;
        if let Some(handle) = self.integrator_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SensorSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Converts cursor motion into angular-velocity samples, emulating a device
/// gyroscope: horizontal motion reads as yaw rate, vertical as pitch rate.
pub struct MouseGyro {
    origin: Instant,
    last: Option<(f64, f64, Instant)>,
    /// Radians of device rotation per pixel of cursor travel.
    sensitivity: f32,
}

impl MouseGyro {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            origin: Instant::now(),
            last: None,
            sensitivity,
        }
    }

    /// Produces a sample for a cursor move, or `None` for the first move
    /// (no delta yet) and for moves inside the same clock tick.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Option<AngularSample> {
        let now = Instant::now();
        let sample = self.last.and_then(|(lx, ly, lt)| {
            let dt = (now - lt).as_secs_f32();
            if dt <= 0.0 {
                return None;
            }
            // Velocity over dt integrates back to exactly delta * sensitivity.
            Some(AngularSample {
                velocity_x: (y - ly) as f32 * self.sensitivity / dt,
                velocity_y: (x - lx) as f32 * self.sensitivity / dt,
                timestamp_ns: (now - self.origin).as_nanos() as u64,
            })
        });
        self.last = Some((x, y, now));
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax::SharedOrientation;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn session_integrates_pushed_samples() {
        let shared = Arc::new(SharedOrientation::new());
        let session = SensorSession::start(OrientationIntegrator::new(shared.clone()));

        session.push(AngularSample {
            velocity_x: 0.0,
            velocity_y: FRAC_PI_2,
            timestamp_ns: 0,
        });
        session.push(AngularSample {
            velocity_x: 0.0,
            velocity_y: 0.0,
            timestamp_ns: 1_000_000_000,
        });
        // stop() joins the integrator thread, so the snapshot is final.
        session.stop();

        let snap = shared.snapshot();
        assert!((snap.yaw_rad - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(snap.pitch_rad, 0.0);
    }

    #[test]
    fn reset_through_the_shared_cell_reaches_the_session() {
        let shared = Arc::new(SharedOrientation::new());
        let session = SensorSession::start(OrientationIntegrator::new(shared.clone()));

        session.push(AngularSample {
            velocity_x: 1.0,
            velocity_y: 1.0,
            timestamp_ns: 0,
        });
        session.push(AngularSample {
            velocity_x: 1.0,
            velocity_y: 1.0,
            timestamp_ns: 2_000_000_000,
        });
        shared.request_reset();
        session.push(AngularSample {
            velocity_x: 9.0,
            velocity_y: 9.0,
            timestamp_ns: 3_000_000_000,
        });
        session.stop();

        assert_eq!(shared.snapshot(), Default::default());
    }

    #[test]
    fn push_after_stop_is_harmless() {
        let shared = Arc::new(SharedOrientation::new());
        let mut session = SensorSession::start(OrientationIntegrator::new(shared));
        session.shutdown();
        session.push(AngularSample {
            velocity_x: 1.0,
            velocity_y: 1.0,
            timestamp_ns: 0,
        });
    }

    #[test]
    fn mouse_gyro_first_move_yields_no_sample() {
        let mut gyro = MouseGyro::new(0.005);
        assert!(gyro.on_cursor_moved(100.0, 100.0).is_none());
    }

    #[test]
    fn mouse_gyro_velocity_integrates_to_pixel_delta_times_sensitivity() {
        let mut gyro = MouseGyro::new(0.01);
        gyro.on_cursor_moved(0.0, 0.0);
        std::thread::sleep(Duration::from_millis(5));
        let sample = gyro.on_cursor_moved(20.0, -10.0).expect("second move");

        // Wall-clock dt varies, so check signs and the velocity ratio,
        // which cancels dt and the sensitivity.
        assert!(sample.timestamp_ns > 0);
        assert!(sample.velocity_y > 0.0); // +x cursor motion => +yaw rate
        assert!(sample.velocity_x < 0.0); // -y cursor motion => -pitch rate
        assert!((sample.velocity_y / sample.velocity_x - 20.0 / -10.0).abs() < 1e-3);
    }

    #[test]
    fn mouse_gyro_timestamps_are_monotonic() {
        let mut gyro = MouseGyro::new(0.005);
        gyro.on_cursor_moved(0.0, 0.0);
        let mut last = 0u64;
        for i in 1..5 {
            std::thread::sleep(Duration::from_millis(2));
            let s = gyro.on_cursor_moved(i as f64, 0.0).expect("sample");
            assert!(s.timestamp_ns > last);
            last = s.timestamp_ns;
        }
    }
}
