//! Plumbing between the hand-tracking pipeline and the simulations
//!
//! The tracking side pushes snapshots from its own thread. They land in a
//! single shared slot where the newest one always wins; the frame loop picks
//! it up on its next tick. Nothing is ever queued.

use palm_physics::HandSnapshot;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Default number of admitted frames per second
pub const DEFAULT_TARGET_FPS: f32 = 30.0;

pub type HandCallback = Box<dyn FnMut(HandSnapshot) + Send + 'static>;

/// A push-style producer of hand snapshots
pub trait ControlSource {
    /// Deliver every admitted frame to `callback` until the returned
    /// subscription is cancelled or dropped.
    fn subscribe(&mut self, callback: HandCallback) -> Subscription;
}

/// Shared flag a source checks before delivering
#[derive(Debug, Clone)]
pub struct SubscriptionToken(Arc<AtomicBool>);

impl SubscriptionToken {
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Live subscription. Cancelling (or dropping) stops delivery and joins the
/// capture worker, if any.
#[derive(Debug)]
pub struct Subscription {
    token: SubscriptionToken,
    worker: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new() -> (Self, SubscriptionToken) {
        let token = SubscriptionToken(Arc::new(AtomicBool::new(true)));
        (
            Self {
                token: token.clone(),
                worker: None,
            },
            token,
        )
    }

    /// Attach the thread feeding this subscription so cancel can wait for it
    pub fn with_worker(mut self, worker: JoinHandle<()>) -> Self {
        self.worker = Some(worker);
        self
    }

    pub fn is_active(&self) -> bool {
        self.token.is_active()
    }

    pub fn cancel(&mut self) {
        self.token.0.store(false, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("control source worker panicked");
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Default)]
struct SlotState {
    snapshot: HandSnapshot,
    generation: u64,
}

/// Latest-snapshot slot, last write wins
#[derive(Debug, Clone, Default)]
pub struct ControlSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl ControlSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: HandSnapshot) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.snapshot = snapshot;
        state.generation += 1;
    }

    /// Current snapshot and its generation (0 before the first publish)
    pub fn latest(&self) -> (HandSnapshot, u64) {
        let state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        (state.snapshot.clone(), state.generation)
    }

    /// The snapshot if it was published after generation `seen`, updating `seen`
    pub fn take_newer(&self, seen: &mut u64) -> Option<HandSnapshot> {
        let state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if state.generation == *seen {
            return None;
        }
        *seen = state.generation;
        Some(state.snapshot.clone())
    }

    /// Callback writing every delivered snapshot into this slot
    pub fn sink(&self) -> HandCallback {
        let slot = self.clone();
        Box::new(move |snapshot| slot.publish(snapshot))
    }
}

/// Rate limiter for the capture side. Frames arriving faster than the
/// target rate are rejected; nothing waits.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: Duration,
    last_admitted: Option<Instant>,
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FPS)
    }
}

impl FrameThrottle {
    /// A non-positive rate admits everything; a vanishingly small one
    /// admits only the first frame
    pub fn new(target_fps: f32) -> Self {
        let interval = if target_fps > 0.0 && target_fps.is_finite() {
            Duration::try_from_secs_f32(1.0 / target_fps).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };

        Self {
            interval,
            last_admitted: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last_admitted {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_admitted = Some(now);
                true
            }
        }
    }
}
