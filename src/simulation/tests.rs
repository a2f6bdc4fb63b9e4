use rapier3d::prelude::*;

use crate::config::{VehicleConfig, RACECAR};
use crate::drift_model::steering::YAW_DAMPING;
use crate::drift_model::YawCommand;
use crate::input::{InputScript, InputState, Key};
use crate::simulation::Simulation;
use crate::spawn::{SpawnManager, SpawnPose, SpawnSettings};
use crate::vehicle::VehicleId;

fn racecar_sim() -> (Simulation, VehicleId) {
    let mut sim = Simulation::for_vehicle(&RACECAR);
    let id = sim.spawn_vehicle(RACECAR, SpawnPose::default()).unwrap();
    (sim, id)
}

fn set_motion(sim: &mut Simulation, id: VehicleId, vx: f32, vy: f32, w: f32) {
    let handle = sim.body(id).unwrap();
    let body = sim.world.bodies.get_mut(handle).unwrap();
    body.set_linvel(vector![vx, vy, 0.0], true);
    body.set_angvel(vector![0.0, 0.0, w], true);
}

#[test]
fn test_full_throttle_right_turn_one_tick() {
    let (mut sim, id) = racecar_sim();
    set_motion(&mut sim, id, 500.0, 0.0, 0.0);

    let input = InputState::from_keys([Key::Up, Key::Right]);
    let pose = sim.drive(id, 1.0 / 60.0, input).unwrap();

    // forces queued before the step
    let plan = sim.last_plan(id).unwrap();
    assert_eq!(plan.drive.unwrap(), crate::drift_model::Vec2::new(900.0, 0.0));
    assert_eq!(plan.diagnostics.fwd_speed, 500.0);
    assert!(plan.lateral.norm() < 1e-3);
    let w = match plan.yaw {
        YawCommand::Set(w) => w,
        other => panic!("expected Set, got {other:?}"),
    };
    assert!((w - 2.1388).abs() < 1e-3, "yaw {w}");

    // the frame delta is clamped to 0.016 before integration
    let h = (1.0_f32 / 60.0).min(RACECAR.max_frame_delta);
    let kin = sim.kinematics(id).unwrap();

    // - velocity grows by F/m * h along +x, nothing sideways
    assert!((kin.velocity.x - (500.0 + 300.0 * h)).abs() < 1e-2, "vx {}", kin.velocity.x);
    assert!(kin.velocity.y.abs() < 1e-3);
    // - yaw rate is kept through the step, heading advances by w * h
    assert!((kin.angular_velocity - w).abs() < 1e-3);
    assert!((pose.angle - w * h).abs() < 1e-4, "angle {}", pose.angle);
    // - 10 substeps: x0 + v0*h + a*h^2 * (n + 1) / (2n)
    let n = RACECAR.integrator_substeps as f32;
    let expected_x = 100.0 + 500.0 * h + 300.0 * h * h * (n + 1.0) / (2.0 * n);
    assert!((pose.x - expected_x).abs() < 1e-3, "x {} vs {}", pose.x, expected_x);
    assert!((pose.y - 100.0).abs() < 1e-3);

    // the published snapshot carries the same pose
    let snapshot = sim.snapshot();
    let published = snapshot.vehicle(id).unwrap();
    assert_eq!(published.pose(), pose);
    assert!((published.rotation - pose.display_rotation()).abs() < 1e-6);
}

#[test]
fn test_same_script_same_trajectory() {
    let script = InputScript::drift_demo();

    let run = || {
        let (mut sim, id) = racecar_sim();
        let mut out = Vec::new();
        for t in 0..script.total_ticks() {
            sim.set_input(id, script.input_at(t));
            // wall-clock jitter above the clamp must not matter
            let jitter = if t % 3 == 0 { 0.05 } else { 0.02 };
            out.push(sim.tick(jitter));
        }
        out
    };

    let a = run();
    let b = run();
    assert_eq!(a.len(), b.len());
    for (sa, sb) in a.iter().zip(&b) {
        let (va, vb) = (&sa.vehicles[0], &sb.vehicles[0]);
        assert_eq!(va.x.to_bits(), vb.x.to_bits());
        assert_eq!(va.y.to_bits(), vb.y.to_bits());
        assert_eq!(va.angle.to_bits(), vb.angle.to_bits());
    }
}

#[test]
fn test_coasting_decays_yaw_geometrically() {
    let (mut sim, id) = racecar_sim();
    set_motion(&mut sim, id, 0.0, 0.0, 3.0);

    let mut expected = 3.0_f32;
    for _ in 0..40 {
        sim.tick_fixed();
        expected *= YAW_DAMPING;
        let w = sim.kinematics(id).unwrap().angular_velocity;
        assert!((w - expected).abs() <= 1e-4 * 3.0, "w {w} expected {expected}");
    }
    assert!(sim.kinematics(id).unwrap().angular_velocity.abs() < 0.05);
}

#[test]
fn test_coasting_drag_slows_the_car() {
    let (mut sim, id) = racecar_sim();
    set_motion(&mut sim, id, 200.0, 0.0, 0.0);

    sim.tick_fixed();
    let plan = sim.last_plan(id).unwrap();
    assert!(plan.drag.is_some());

    // dv = -(v * k / m) * h = -(200 * 0.3 / 3) * 0.016
    let vx = sim.kinematics(id).unwrap().velocity.x;
    assert!((vx - (200.0 - 20.0 * 0.016)).abs() < 1e-3, "vx {vx}");
}

#[test]
fn test_steering_in_place_does_not_spin() {
    let (mut sim, id) = racecar_sim();
    for _ in 0..30 {
        sim.drive(id, 1.0 / 60.0, InputState::from_keys([Key::Right]));
    }
    let kin = sim.kinematics(id).unwrap();
    assert_eq!(kin.angular_velocity, 0.0);
    assert_eq!(kin.angle, 0.0);
}

#[test]
fn test_throttle_then_drift() {
    let (mut sim, id) = racecar_sim();

    // 90 ticks at 300 px/s² * 0.016 s => ~432 px/s, past both drift gates
    for _ in 0..90 {
        sim.drive(id, 1.0 / 60.0, InputState::from_keys([Key::Up]));
    }
    let speed = sim.kinematics(id).unwrap().speed();
    assert!(speed > 400.0, "speed {speed}");
    assert!(!sim.snapshot().vehicle(id).unwrap().drifting);

    sim.drive(id, 1.0 / 60.0, InputState::from_keys([Key::Up, Key::Right]));
    let snapshot = sim.snapshot();
    assert!(snapshot.vehicle(id).unwrap().drifting);
    assert!(sim.kinematics(id).unwrap().angular_velocity > 0.0);

    for _ in 0..60 {
        sim.drive(id, 1.0 / 60.0, InputState::from_keys([Key::Up, Key::Right]));
    }
    let kin = sim.kinematics(id).unwrap();
    assert!(kin.angle.abs() > 0.5, "car should have turned, angle {}", kin.angle);
    assert!(kin.position.x.is_finite() && kin.position.y.is_finite());
}

#[test]
fn test_reverse_steering_yaws_the_other_way() {
    let (mut sim, id) = racecar_sim();
    set_motion(&mut sim, id, -200.0, 0.0, 0.0);

    sim.drive(id, 1.0 / 60.0, InputState::from_keys([Key::Down, Key::Right]));
    assert!(sim.kinematics(id).unwrap().angular_velocity < 0.0);
}

#[test]
fn test_despawn_removes_car_from_world() {
    let (mut sim, id) = racecar_sim();
    let handle = sim.body(id).unwrap();

    assert!(sim.despawn_vehicle(id));
    assert!(!sim.despawn_vehicle(id));
    assert!(!sim.world.contains(handle));
    assert!(sim.is_empty());
    assert!(sim.drive(id, 1.0 / 60.0, InputState::IDLE).is_none());
    assert!(sim.tick_fixed().vehicles.is_empty());
}

#[test]
fn test_missing_body_is_skipped_not_fatal() {
    let mut sim = Simulation::for_vehicle(&RACECAR);
    let mut grid = SpawnManager::new(SpawnSettings::default());
    let a = sim.spawn_vehicle(RACECAR, grid.allocate().1).unwrap();
    let b = sim.spawn_vehicle(RACECAR, grid.allocate().1).unwrap();

    // body torn down behind the simulation's back
    let handle = sim.body(a).unwrap();
    assert!(sim.world.remove_body(handle));

    sim.set_input_all(InputState::from_keys([Key::Up]));
    let snapshot = sim.tick_fixed();

    assert!(snapshot.vehicle(a).is_none());
    assert!(sim.last_plan(a).is_none());
    assert!(snapshot.vehicle(b).unwrap().speed > 0.0);

    // the orphan is forgotten, not revisited every tick
    assert_eq!(sim.vehicle_ids().collect::<Vec<_>>(), vec![b]);
    assert!(!sim.set_input(a, InputState::IDLE));
    assert!(!sim.despawn_vehicle(a));
}

#[test]
fn test_cars_share_one_world_independently() {
    let mut sim = Simulation::for_vehicle(&RACECAR);
    let fast = sim.spawn_vehicle(RACECAR, SpawnPose { x: 0.0, y: 0.0, angle: 0.0 }).unwrap();
    let parked = sim.spawn_vehicle(RACECAR, SpawnPose { x: 0.0, y: 500.0, angle: 0.0 }).unwrap();

    for _ in 0..30 {
        sim.set_input(fast, InputState::from_keys([Key::Up]));
        sim.tick_fixed();
    }

    assert!(sim.kinematics(fast).unwrap().velocity.x > 100.0);
    let parked = sim.pose(parked).unwrap();
    assert_eq!((parked.x, parked.y, parked.angle), (0.0, 500.0, 0.0));
    assert_eq!(sim.tick_count(), 30);
}

#[test]
fn test_invalid_constants_are_refused_at_spawn() {
    let mut sim = Simulation::for_vehicle(&RACECAR);
    let broken = VehicleConfig { wheel_base: 0.0, ..RACECAR };
    assert!(sim.spawn_vehicle(broken, SpawnPose::default()).is_err());
    assert!(sim.is_empty());
}
