//! Fan-out of frames and hand controls across a fixed set of instances
//!
//! Not a scheduler: each instance runs its own frame loop and the
//! orchestrator only forwards ticks, hand snapshots and resizes.

use crate::control::{ControlSlot, Subscription};
use crate::frame::AnimationLoop;
use palm_physics::HandSnapshot;
use std::time::Instant;

/// What the orchestrator needs from one simulation instance
pub trait SimulationHost {
    type Error: std::fmt::Display;

    fn update(&mut self, delta_time: f32);

    fn render(&mut self) -> Result<(), Self::Error>;

    fn animation(&mut self) -> &mut AnimationLoop;

    /// Ask the platform for another frame callback
    fn request_frame(&self);

    fn set_hand_controls(&mut self, controls: &HandSnapshot);

    /// Pick up the new size of the bound surface
    fn handle_resize(&mut self);

    /// Release every GPU resource. Only called once the loop is stopped.
    fn dispose(&mut self);

    fn start_animation(&mut self) {
        self.animation().start();
        self.request_frame();
    }

    fn stop_animation(&mut self) {
        self.animation().stop();
    }
}

pub struct Orchestrator<H: SimulationHost> {
    instances: Vec<H>,
    controls: ControlSlot,
    seen_generation: u64,
    subscription: Option<Subscription>,
    disposed: bool,
}

impl<H: SimulationHost> Orchestrator<H> {
    pub fn new(instances: Vec<H>, controls: ControlSlot) -> Self {
        log::info!("Orchestrating {} simulation instance(s)", instances.len());
        Self {
            instances,
            controls,
            seen_generation: 0,
            subscription: None,
            disposed: false,
        }
    }

    /// Keep the capture subscription alive for as long as the instances
    pub fn attach_subscription(&mut self, subscription: Subscription) {
        self.subscription = Some(subscription);
    }

    pub fn instances(&self) -> &[H] {
        &self.instances
    }

    pub fn instance_mut(&mut self, index: usize) -> Option<&mut H> {
        self.instances.get_mut(index)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn start(&mut self) {
        if self.disposed {
            return;
        }
        for instance in &mut self.instances {
            instance.start_animation();
        }
    }

    pub fn stop(&mut self) {
        for instance in &mut self.instances {
            instance.stop_animation();
        }
    }

    /// Hand the same snapshot to every instance
    pub fn broadcast(&mut self, controls: &HandSnapshot) {
        for instance in &mut self.instances {
            instance.set_hand_controls(controls);
        }
    }

    /// Broadcast the latest snapshot if it is newer than the last one seen.
    /// Returns whether anything was sent.
    pub fn pull_controls(&mut self) -> bool {
        match self.controls.take_newer(&mut self.seen_generation) {
            Some(snapshot) => {
                self.broadcast(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Run one frame of instance `index`: update, render, reschedule.
    ///
    /// Returns `Ok(false)` when the instance is not animating. A render error
    /// is returned after the next frame has already been requested.
    pub fn frame(&mut self, index: usize, now: Instant) -> Result<bool, H::Error> {
        if self.disposed {
            return Ok(false);
        }
        self.pull_controls();

        let Some(instance) = self.instances.get_mut(index) else {
            return Ok(false);
        };
        let Some(delta_time) = instance.animation().tick(now) else {
            return Ok(false);
        };

        instance.update(delta_time);
        let rendered = instance.render();
        instance.request_frame();

        rendered.map(|_| true)
    }

    pub fn resize(&mut self, index: usize) {
        if let Some(instance) = self.instances.get_mut(index) {
            instance.handle_resize();
        }
    }

    /// Tear everything down: stop frame loops, stop capture, then release
    /// each instance's GPU resources. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.stop();

        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
        }

        for instance in &mut self.instances {
            instance.dispose();
        }

        log::info!("Disposed {} simulation instance(s)", self.instances.len());
    }
}

impl<H: SimulationHost> Drop for Orchestrator<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use palm_physics::HandDescriptor;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    /// In-memory host recording what happened to it
    #[derive(Default)]
    struct RecordingHost {
        frame_loop: AnimationLoop,
        events: Rc<RefCell<Vec<String>>>,
        hands_seen: Vec<usize>,
        deltas: Vec<f32>,
        frame_requests: Cell<u32>,
        fail_render: bool,
        disposed: bool,
    }

    impl SimulationHost for RecordingHost {
        type Error = String;

        fn update(&mut self, delta_time: f32) {
            assert!(!self.disposed, "update after dispose");
            self.deltas.push(delta_time);
            self.events.borrow_mut().push("update".into());
        }

        fn render(&mut self) -> Result<(), String> {
            self.events.borrow_mut().push("render".into());
            if self.fail_render {
                Err("surface lost".into())
            } else {
                Ok(())
            }
        }

        fn animation(&mut self) -> &mut AnimationLoop {
            &mut self.frame_loop
        }

        fn request_frame(&self) {
            self.frame_requests.set(self.frame_requests.get() + 1);
        }

        fn set_hand_controls(&mut self, controls: &HandSnapshot) {
            self.hands_seen.push(controls.len());
        }

        fn handle_resize(&mut self) {
            self.events.borrow_mut().push("resize".into());
        }

        fn dispose(&mut self) {
            assert!(!self.frame_loop.is_running(), "disposed while animating");
            self.disposed = true;
            self.events.borrow_mut().push("dispose".into());
        }
    }

    fn orchestrator(n: usize) -> (Orchestrator<RecordingHost>, ControlSlot) {
        let slot = ControlSlot::new();
        let hosts = (0..n).map(|_| RecordingHost::default()).collect();
        (Orchestrator::new(hosts, slot.clone()), slot)
    }

    #[test]
    fn test_frame_runs_update_then_render_then_reschedules() {
        let (mut orch, _slot) = orchestrator(1);
        orch.start();
        let requests_after_start = orch.instances()[0].frame_requests.get();

        assert_eq!(orch.frame(0, Instant::now()), Ok(true));

        let host = &orch.instances()[0];
        assert_eq!(*host.events.borrow(), vec!["update", "render"]);
        assert_eq!(host.frame_requests.get(), requests_after_start + 1);
    }

    #[test]
    fn test_stopped_instances_do_not_tick() {
        let (mut orch, _slot) = orchestrator(2);
        assert_eq!(orch.frame(0, Instant::now()), Ok(false));
        assert!(orch.instances()[0].events.borrow().is_empty());
    }

    #[test]
    fn test_new_snapshot_reaches_every_instance_once() {
        let (mut orch, slot) = orchestrator(4);
        orch.start();

        slot.publish(HandSnapshot::new([
            HandDescriptor::new(Vec3::ZERO, 0),
            HandDescriptor::new(Vec3::X, 1),
        ]));
        let now = Instant::now();
        orch.frame(0, now).unwrap();
        orch.frame(1, now).unwrap();

        for host in orch.instances() {
            assert_eq!(host.hands_seen, vec![2]);
        }
    }

    #[test]
    fn test_stale_snapshots_are_superseded() {
        let (mut orch, slot) = orchestrator(1);
        slot.publish(HandSnapshot::new([HandDescriptor::new(Vec3::ZERO, 0)]));
        slot.publish(HandSnapshot::empty());

        assert!(orch.pull_controls());
        assert!(!orch.pull_controls());
        assert_eq!(orch.instances()[0].hands_seen, vec![0]);
    }

    #[test]
    fn test_render_error_still_reschedules() {
        let (mut orch, _slot) = orchestrator(1);
        orch.instance_mut(0).unwrap().fail_render = true;
        orch.start();
        let before = orch.instances()[0].frame_requests.get();

        assert!(orch.frame(0, Instant::now()).is_err());
        assert_eq!(orch.instances()[0].frame_requests.get(), before + 1);
    }

    #[test]
    fn test_elapsed_time_is_forwarded() {
        let (mut orch, _slot) = orchestrator(1);
        orch.start();
        let t0 = Instant::now();
        orch.frame(0, t0).unwrap();
        orch.frame(0, t0 + Duration::from_millis(25)).unwrap();

        let deltas = &orch.instances()[0].deltas;
        assert_eq!(deltas[0], 0.0);
        assert!((deltas[1] - 0.025).abs() < 1e-4);
    }

    #[test]
    fn test_resize_reaches_only_its_instance() {
        let (mut orch, _slot) = orchestrator(3);
        orch.resize(1);
        orch.resize(7);
        assert!(orch.instances()[0].events.borrow().is_empty());
        assert_eq!(*orch.instances()[1].events.borrow(), vec!["resize"]);
        assert!(orch.instances()[2].events.borrow().is_empty());
    }

    #[test]
    fn test_dispose_stops_loops_first_and_blocks_pending_frames() {
        let (mut orch, _slot) = orchestrator(2);
        let (subscription, token) = Subscription::new();
        orch.attach_subscription(subscription);
        orch.start();

        orch.dispose();

        assert!(!token.is_active());
        for host in orch.instances() {
            assert!(host.disposed);
        }
        // A redraw callback that was already queued must not touch the instance
        assert_eq!(orch.frame(0, Instant::now()), Ok(false));
        assert_eq!(orch.instances()[0].deltas.len(), 0);

        // Second dispose is a no-op
        orch.dispose();
        assert_eq!(
            orch.instances()[0]
                .events
                .borrow()
                .iter()
                .filter(|e| *e == "dispose")
                .count(),
            1
        );
    }
}
