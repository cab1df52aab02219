//! Multi-tick scenarios run through the public `Simulation` API

use glam::Vec3;
use palm_physics::{
    HandDescriptor, HandSnapshot, ShellGroup, IDLE_DRIVING_DISTANCE, SWARM_OUTER_MULTIPLIER,
    SWARM_SHELL_RADIUS,
};
use palm_simulation::{Behavior, Simulation, SimulationConfig, Tunables};

const DT: f32 = 1.0 / 60.0;

fn hands(palms: &[Vec3]) -> HandSnapshot {
    HandSnapshot::new(
        palms
            .iter()
            .enumerate()
            .map(|(i, &palm)| HandDescriptor::new(palm, i as u8)),
    )
}

fn run(sim: &mut Simulation, ticks: usize) {
    for _ in 0..ticks {
        sim.update(DT);
    }
}

#[test]
fn free_particles_never_leave_the_box() {
    for config in [SimulationConfig::responsive(), SimulationConfig::cohesive()] {
        let boundary = config.boundary;
        let mut sim = Simulation::new(config.with_count(300).with_seed(11));
        sim.set_hand_controls(hands(&[Vec3::new(19.0, 19.0, 19.0)]));

        for _ in 0..200 {
            sim.update(DT);
            for p in sim.particles() {
                assert!(p.position.abs().max_element() <= boundary);
            }
        }
    }
}

#[test]
fn responsive_particles_accelerate_toward_a_nearby_palm() {
    let config = SimulationConfig {
        boundary: 10.0,
        ..SimulationConfig::responsive()
    }
    .with_count(4)
    .with_seed(3)
    .with_tunables(Tunables {
        interaction_radius: Some(5.0),
        attraction_strength: Some(2.0),
        ..Default::default()
    });
    let mut sim = Simulation::new(config);

    let start = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, -2.0, 0.0),
        Vec3::new(0.0, 0.0, 3.0),
        Vec3::new(8.0, 8.0, 8.0),
    ];
    for (p, &position) in sim.particles_mut().iter_mut().zip(&start) {
        p.position = position;
        p.velocity = Vec3::ZERO;
    }

    sim.set_hand_controls(hands(&[Vec3::ZERO]));
    sim.update(DT);

    for (p, &position) in sim.particles().iter().zip(&start) {
        if position.length() < 5.0 {
            assert!(p.velocity.dot(-position) > 0.0, "{position} not pulled in");
        } else {
            // Outside the radius only jitter acts
            assert!(p.velocity.abs().max_element() < 0.05);
        }
    }
}

fn sphere(sim: &Simulation) -> &palm_simulation::behavior::NeedleSphere {
    match sim.behavior() {
        Behavior::NeedleSphere(b) => b,
        other => panic!("expected needle sphere, got {:?}", other.kind()),
    }
}

#[test]
fn needle_sphere_keeps_particles_on_their_shell() {
    let mut sim = Simulation::new(SimulationConfig::needle_sphere().with_count(400).with_seed(21));
    sim.set_hand_controls(hands(&[Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)]));

    for _ in 0..120 {
        sim.update(DT);

        let frame = sphere(&sim).frame();
        assert!(frame.center.length() < 1e-5);
        assert!((frame.driving_distance - 10.0).abs() < 1e-4);

        let inner = sphere(&sim).inner_radius();
        let outer = inner * sphere(&sim).outer_multiplier();
        for p in sim.particles() {
            let radius = match p.group() {
                ShellGroup::Inner => inner,
                ShellGroup::Outer => outer,
            };
            let offset = p.position - frame.center;
            assert!((offset.length() - radius).abs() < 1e-3);
            // No radial velocity survives a tick
            assert!(p.velocity.dot(offset.normalize()).abs() < 1e-4);
        }
    }
}

#[test]
fn needle_sphere_shell_follows_a_moving_hand() {
    let mut sim = Simulation::new(SimulationConfig::needle_sphere().with_count(50).with_seed(5));
    let mut palm = Vec3::ZERO;

    for _ in 0..60 {
        palm += Vec3::new(0.2, 0.1, 0.0);
        sim.set_hand_controls(hands(&[palm]));
        sim.update(DT);

        let inner = sphere(&sim).inner_radius();
        let outer = inner * sphere(&sim).outer_multiplier();
        for p in sim.particles() {
            let d = p.position.distance(palm);
            assert!((d - inner).abs() < 1e-3 || (d - outer).abs() < 1e-3);
        }
    }
}

#[test]
fn losing_the_hands_resets_the_sphere_frame() {
    let mut sim = Simulation::new(SimulationConfig::needle_sphere().with_count(20).with_seed(8));
    sim.set_hand_controls(hands(&[Vec3::new(3.0, 4.0, 0.0), Vec3::new(9.0, -4.0, 2.0)]));
    run(&mut sim, 10);

    sim.set_hand_controls(HandSnapshot::empty());
    sim.update(DT);

    let frame = sphere(&sim).frame();
    assert_eq!(frame.center, Vec3::ZERO);
    assert_eq!(frame.driving_distance, IDLE_DRIVING_DISTANCE);
}

#[test]
fn shell_groups_never_change() {
    let mut sim = Simulation::new(SimulationConfig::needle_swarm().with_count(64).with_seed(13));
    sim.set_hand_controls(hands(&[Vec3::new(-8.0, 0.0, 0.0), Vec3::new(8.0, 2.0, 0.0)]));
    run(&mut sim, 30);
    sim.set_hand_controls(HandSnapshot::empty());
    run(&mut sim, 30);

    for (i, p) in sim.particles().iter().enumerate() {
        assert_eq!(p.group(), ShellGroup::for_index(i));
    }
}

#[test]
fn idle_swarm_converges_onto_the_origin_shells() {
    let mut sim = Simulation::new(SimulationConfig::needle_swarm().with_count(200).with_seed(17));
    run(&mut sim, 80);

    for p in sim.particles() {
        let radius = match p.group() {
            ShellGroup::Inner => SWARM_SHELL_RADIUS,
            ShellGroup::Outer => SWARM_SHELL_RADIUS * SWARM_OUTER_MULTIPLIER,
        };
        assert!((p.position.length() - radius).abs() < 1e-3);
        assert!(p.velocity.dot(p.position.normalize()).abs() < 1e-4);
        assert_eq!(p.assigned_center, None);
    }
}

#[test]
fn swarm_binds_to_palms_and_rebinds_when_one_leaves() {
    let a = Vec3::new(-10.0, 0.0, 0.0);
    let mut sim = Simulation::new(SimulationConfig::needle_swarm().with_count(100).with_seed(23));

    sim.set_hand_controls(hands(&[a]));
    run(&mut sim, 60);
    assert!(sim.particles().iter().all(|p| p.assigned_center == Some(0)));

    // A second, far away hand does not steal anything
    sim.set_hand_controls(hands(&[a, Vec3::new(60.0, 0.0, 0.0)]));
    run(&mut sim, 5);
    assert!(sim.particles().iter().all(|p| p.assigned_center == Some(0)));

    // Center 0 moves far away and center 1 takes the old spot
    sim.set_hand_controls(hands(&[Vec3::new(-100.0, 0.0, 0.0), a]));
    sim.update(DT);
    assert!(sim.particles().iter().all(|p| p.assigned_center == Some(1)));
}

fn single_swarm_particle_after(other_palm: Vec3) -> Option<usize> {
    let mut sim = Simulation::new(SimulationConfig::needle_swarm().with_count(1).with_seed(1));
    let p = &mut sim.particles_mut()[0];
    p.position = Vec3::ZERO;
    p.velocity = Vec3::ZERO;
    p.assigned_center = Some(0);

    sim.set_hand_controls(hands(&[Vec3::new(-10.0, 0.0, 0.0), other_palm]));
    sim.update(DT);
    sim.particles()[0].assigned_center
}

#[test]
fn swarm_assignment_has_hysteresis() {
    // 5% closer: stay
    assert_eq!(single_swarm_particle_after(Vec3::new(9.5, 0.0, 0.0)), Some(0));
    // 25% closer: switch
    assert_eq!(single_swarm_particle_after(Vec3::new(7.5, 0.0, 0.0)), Some(1));
}

#[test]
fn swarm_rigs_track_each_palm() {
    let mut sim = Simulation::new(SimulationConfig::needle_swarm().with_count(10).with_seed(2));
    let palms = [Vec3::new(-6.0, 1.0, 0.0), Vec3::new(6.0, -1.0, 0.0)];
    sim.set_hand_controls(hands(&palms));
    sim.update(DT);

    let rigs = sim.skeletons();
    assert_eq!(rigs.len(), 2);
    for (rig, palm) in rigs.iter().zip(palms) {
        assert!(rig.root.x == palm.x && rig.root.y < palm.y);
    }

    sim.set_hand_controls(HandSnapshot::empty());
    sim.update(DT);
    assert!(sim.skeletons().is_empty());
}

#[test]
fn swarm_converges_onto_each_palm_shell() {
    let one = [Vec3::new(2.0, -3.0, 1.0)];
    // Far enough apart that the outer shells do not overlap
    let two = [Vec3::new(-40.0, 0.0, 0.0), Vec3::new(40.0, 4.0, -2.0)];

    for palms in [&one[..], &two[..]] {
        let mut sim =
            Simulation::new(SimulationConfig::needle_swarm().with_count(300).with_seed(29));
        sim.set_hand_controls(hands(palms));
        run(&mut sim, 200);

        for p in sim.particles() {
            let center = palms[p.assigned_center.expect("bound to a palm")];
            let radius = match p.group() {
                ShellGroup::Inner => SWARM_SHELL_RADIUS,
                ShellGroup::Outer => SWARM_SHELL_RADIUS * SWARM_OUTER_MULTIPLIER,
            };
            let offset = p.position - center;
            assert!((offset.length() - radius).abs() < 1e-3);
            assert!(p.velocity.dot(offset.normalize()).abs() < 1e-4);
        }
    }
}

#[test]
fn non_finite_radius_leaves_positions_finite() {
    let config = SimulationConfig::responsive()
        .with_count(50)
        .with_seed(31)
        .with_tunables(Tunables {
            interaction_radius: Some(f32::NAN),
            ..Default::default()
        });
    let mut sim = Simulation::new(config);
    sim.set_hand_controls(hands(&[Vec3::ZERO]));
    run(&mut sim, 10);

    assert!(sim.particles().iter().all(|p| p.position.is_finite()));
}

#[test]
fn negative_outer_multiplier_keeps_groups_on_their_own_shells() {
    let config = SimulationConfig::needle_sphere()
        .with_count(40)
        .with_seed(37)
        .with_tunables(Tunables {
            outer_radius_multiplier: Some(-1.0),
            ..Default::default()
        });
    let mut sim = Simulation::new(config);
    run(&mut sim, 3);

    let inner = sphere(&sim).inner_radius();
    assert!(inner > 0.0);
    for p in sim.particles() {
        let d = p.position.length();
        match p.group() {
            ShellGroup::Inner => assert!((d - inner).abs() < 1e-3),
            ShellGroup::Outer => assert!(d < 1e-3),
        }
    }
}
