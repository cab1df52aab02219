//! Synthetic hand tracking
//!
//! Stands in for a camera pipeline: a capture thread produces MediaPipe
//! style landmarks for 0, 1 or 2 hands moving on slow orbits and delivers
//! them through the usual throttle and subscription.

use glam::{Vec2, Vec3};
use palm_physics::{HandDescriptor, HandSnapshot, LandmarkMapping, FINGERTIPS, MIDDLE_MCP};
use palm_simulation::{ControlSource, FrameThrottle, HandCallback, Subscription};
use std::f32::consts::TAU;
use std::thread;
use std::time::{Duration, Instant};

/// Rate at which the fake camera produces frames, before throttling
const CAPTURE_FPS: f32 = 60.0;
/// Seconds for one no hands -> one hand -> two hands cycle
const CYCLE_SECONDS: f32 = 15.0;
const LANDMARK_COUNT: usize = 21;

pub struct SyntheticHands {
    target_fps: f32,
    mapping: LandmarkMapping,
}

impl SyntheticHands {
    pub fn new(target_fps: f32) -> Self {
        Self {
            target_fps,
            mapping: LandmarkMapping::default(),
        }
    }
}

/// Landmarks of an open hand whose middle MCP sits at `palm` (normalized
/// image coordinates)
fn open_hand(palm: Vec2, spread: f32) -> [Vec3; LANDMARK_COUNT] {
    let mut landmarks = [Vec3::new(palm.x, palm.y + 0.08, 0.0); LANDMARK_COUNT];

    for (finger, &tip) in FINGERTIPS.iter().enumerate() {
        let angle = (finger as f32 - 2.0) * spread;
        let reach = if finger == 0 { 0.07 } else { 0.11 };
        let offset = Vec2::new(angle.sin(), -angle.cos()) * reach;
        // the three joints leading up to the tip
        for joint in 0..3 {
            let t = (joint + 1) as f32 / 4.0;
            landmarks[tip - 3 + joint] = (palm + offset * t).extend(-0.01 * t);
        }
        landmarks[tip] = (palm + offset).extend(-0.02);
    }
    landmarks[MIDDLE_MCP] = palm.extend(0.0);

    landmarks
}

/// Hands visible `seconds` into the capture
pub fn snapshot_at(seconds: f32, mapping: &LandmarkMapping) -> HandSnapshot {
    let phase = seconds.rem_euclid(CYCLE_SECONDS) / CYCLE_SECONDS;
    let hand_count = match phase {
        p if p < 0.2 => 0,
        p if p < 0.5 => 1,
        _ => 2,
    };

    let orbit = seconds * TAU / 8.0;
    let spread = 0.25 + 0.1 * (seconds * 1.3).sin();
    let palms = [
        Vec2::new(0.35 + 0.1 * orbit.cos(), 0.5 + 0.15 * orbit.sin()),
        Vec2::new(0.65 - 0.1 * orbit.cos(), 0.5 - 0.15 * orbit.sin()),
    ];

    HandSnapshot::new(palms.iter().take(hand_count).enumerate().filter_map(
        |(i, &palm)| HandDescriptor::from_landmarks(&open_hand(palm, spread), i as u8, mapping),
    ))
}

impl ControlSource for SyntheticHands {
    fn subscribe(&mut self, mut callback: HandCallback) -> Subscription {
        let (subscription, token) = Subscription::new();
        let mut throttle = FrameThrottle::new(self.target_fps);
        let mapping = self.mapping;
        let capture_interval = Duration::from_secs_f32(1.0 / CAPTURE_FPS);

        let worker = thread::Builder::new()
            .name("synthetic-hands".into())
            .spawn(move || {
                let start = Instant::now();
                let mut last_count = None;

                while token.is_active() {
                    let now = Instant::now();
                    if throttle.admit(now) {
                        let snapshot = snapshot_at((now - start).as_secs_f32(), &mapping);
                        if last_count != Some(snapshot.len()) {
                            log::debug!(
                                "synthetic capture now tracking {} hand(s)",
                                snapshot.len()
                            );
                            last_count = Some(snapshot.len());
                        }
                        callback(snapshot);
                    }
                    thread::sleep(capture_interval);
                }
            });

        match worker {
            Ok(handle) => {
                log::info!(
                    "✓ Synthetic hand capture started ({:.0} admitted frames/s)",
                    self.target_fps
                );
                subscription.with_worker(handle)
            }
            Err(e) => {
                // The simulations keep running with no hands
                log::warn!("Could not start hand capture thread: {}", e);
                subscription
            }
        }
    }
}
