use std::cell::RefCell;
use std::rc::Rc;

use arena_core::asteroid::{AsteroidField, AsteroidTier};
use arena_core::geometry::{point_in_polygon, smoothstep, wrap, Vec2};
use arena_core::player::Lifecycle;
use arena_core::rng::SeededRng;
use arena_core::{
    AudioError, AudioSink, Command, Cue, FrameInput, GameMode, SimConfig, Simulation,
};

#[derive(Clone, Default)]
struct SharedLog(Rc<RefCell<Vec<Cue>>>);

impl AudioSink for SharedLog {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        self.0.borrow_mut().push(cue);
        Ok(())
    }
}

#[test]
fn unit_square_boundary_cases() {
    let square = [
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(10.0, 10.0),
        Vec2::new(0.0, 10.0),
    ];
    assert!(point_in_polygon(&square, 0.0, 0.0), "vertex");
    assert!(point_in_polygon(&square, 5.0, 0.0), "horizontal edge");
    assert!(point_in_polygon(&square, 5.0, 5.0), "interior");
    assert!(!point_in_polygon(&square, 15.0, 5.0), "exterior");
    assert!(!point_in_polygon(&square[..2], 5.0, 0.0), "degenerate polygon");
}

#[test]
fn wrap_and_smoothstep_edges() {
    assert_eq!(wrap(-1.0, 0.0, 800.0), 799.0);
    assert_eq!(wrap(5.0, 3.0, 3.0), 3.0);
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
}

#[test]
fn fragmentation_conserves_counts() {
    let mut rng = SeededRng::new(31);
    let mut field = AsteroidField::new();
    field.spawn_wave(&mut rng, 3, Vec2::new(400.0, 300.0), 800.0, 600.0);
    assert_eq!(field.len(), 3);

    let before = field.len();
    assert_eq!(field.break_at(&mut rng, 1, 800.0, 600.0), Some(20));
    assert_eq!(field.len(), before - 1 + 2);
    let mediums = field
        .iter()
        .filter(|a| a.tier == AsteroidTier::Medium)
        .count();
    assert_eq!(mediums, 2);

    let mut field = AsteroidField::new();
    field.push(arena_core::asteroid::Asteroid::random(
        &mut rng,
        AsteroidTier::Small,
        Vec2::new(100.0, 100.0),
    ));
    assert_eq!(field.break_at(&mut rng, 0, 800.0, 600.0), Some(100));
    assert!(field.is_empty());
    assert_eq!(field.break_at(&mut rng, 0, 800.0, 600.0), None);
}

#[test]
fn host_driven_session() {
    let log = SharedLog::default();
    let mut sim = Simulation::new(SimConfig::with_seed(2024))
        .expect("valid")
        .with_audio(log.clone());
    assert_eq!(sim.mode(), GameMode::Title);
    assert!(sim.handle_command(Command::StartGame));

    let fire = FrameInput {
        fire: true,
        thrust: true,
        ..FrameInput::default()
    };
    for _ in 0..120 {
        sim.step(fire, 1.0 / 60.0);
    }
    assert!(log.0.borrow().contains(&Cue::Fire));
    assert!(log.0.borrow().contains(&Cue::ThrustStart));

    let json = serde_json::to_value(sim.snapshot()).expect("snapshot serializes");
    assert_eq!(json["mode"], "playing");
    assert!(json["asteroids"].as_array().is_some_and(|a| !a.is_empty()));
    assert!(json["player"]["polygon"].is_array());

    assert!(sim.handle_command(Command::ReturnToTitle));
    assert_eq!(sim.mode(), GameMode::Title);
    assert_eq!(sim.player().lifecycle(), Lifecycle::Active);
    assert!(sim.asteroids().is_empty());
}

#[test]
fn invalid_config_is_reported() {
    let err = Simulation::new(SimConfig {
        width: 0.0,
        height: 600.0,
        seed: 1,
    })
    .err()
    .expect("zero width is rejected");
    assert_eq!(
        err.to_string(),
        "arena dimensions must be finite and positive: got 0x600"
    );
}
