use std::collections::HashMap;

use stellar_core::canvas::DrawCommand;
use stellar_core::components::{Position, Rect, Velocity};
use stellar_core::prelude::*;
use stellar_core::stages::nebula::WRAP_PADDING;

fn engine(seed: u64) -> SimulationEngine {
    SimulationEngine::with_language(EngineConfig::seeded(seed).with_size(1024.0, 768.0), Language::English)
        .unwrap()
}

#[test]
fn fresh_engine_starts_at_nebula() {
    let engine = engine(1);
    assert_eq!(engine.current_id(), StageId::Nebula);
    assert_eq!(engine.stage_count(), 7);
    assert!(engine.is_first());
    assert!(!engine.is_last());
}

#[test]
fn advancing_walks_the_whole_life_cycle() {
    let mut engine = engine(2);
    let mut canvas = RecordingCanvas::new();

    for expected in &StageId::ALL[1..] {
        assert!(engine.advance());
        assert_eq!(engine.current_id(), *expected);
        assert_eq!(engine.particle_count(), expected.pool_size());
        engine.tick(&mut canvas);
    }

    assert_eq!(engine.current_id(), StageId::WhiteDwarf);
    assert!(engine.is_last());
    assert!(!engine.advance());
    assert_eq!(engine.current_id(), StageId::WhiteDwarf);
}

#[test]
fn nebula_clouds_drift_by_velocity() {
    let mut engine = engine(3);
    let surface = engine.surface();
    let bounds: Rect = surface.bounds().padded(WRAP_PADDING);

    let before: HashMap<_, _> = engine
        .context()
        .world
        .query::<(&Position, &Velocity)>()
        .iter()
        .map(|(e, (p, v))| (e, (p.0, v.0)))
        .collect();
    assert_eq!(before.len(), 300);

    engine.tick(&mut RecordingCanvas::new());

    for (entity, pos) in engine.context().world.query::<&Position>().iter() {
        let (start, vel) = before[&entity];
        let mut expected = start + vel;
        if expected.x < bounds.min.x {
            expected.x = bounds.max.x;
        }
        if expected.x > bounds.max.x {
            expected.x = bounds.min.x;
        }
        if expected.y < bounds.min.y {
            expected.y = bounds.max.y;
        }
        if expected.y > bounds.max.y {
            expected.y = bounds.min.y;
        }
        assert_eq!(pos.0, expected);
    }
}

#[test]
fn same_seed_draws_same_frames() {
    let record = |seed| {
        let mut engine = engine(seed);
        let mut canvas = RecordingCanvas::new();
        let mut driver = AnimationDriver::new();
        driver.request(Transition::JumpTo(5));
        driver.run(&mut engine, &mut canvas, &mut FixedTicks::new(30));
        canvas.commands().to_vec()
    };

    let a = record(99);
    let b = record(99);
    assert_eq!(a.len(), b.len());
    assert_eq!(a, b);
    assert!(a.iter().any(|c| matches!(c, DrawCommand::FillCircle { .. })));
}

#[test]
fn driver_queues_navigation_between_frames() {
    let mut engine = engine(4);
    let mut canvas = RecordingCanvas::new();
    let mut driver = AnimationDriver::new();

    driver.run(&mut engine, &mut canvas, &mut FixedTicks::new(5));
    driver.request(Transition::JumpTo(6));
    driver.request(Transition::Advance);
    driver.request(Transition::Retreat);
    driver.run(&mut engine, &mut canvas, &mut FixedTicks::new(5));

    assert_eq!(driver.frames(), 10);
    assert_eq!(engine.current_id(), StageId::PlanetaryNebula);
    assert_eq!(canvas.save_depth(), 0);
}

#[test]
fn pixel_canvas_renders_every_stage() {
    let mut engine = SimulationEngine::with_language(EngineConfig::seeded(5).with_size(160.0, 120.0), Language::English)
        .unwrap();
    let mut canvas = PixelCanvas::new(160, 120);

    for index in 0..engine.stage_count() {
        engine.jump_to(index);
        canvas.begin_frame();
        engine.tick(&mut canvas);
        // The backdrop covers every pixel, so nothing is left transparent
        let pixels = canvas.to_rgba8();
        assert_eq!(pixels.len(), 160 * 120 * 4);
        assert!(pixels.chunks(4).all(|px| px[3] == 255));
    }
}

#[test]
fn korean_catalog_drives_the_same_stages() {
    let engine = SimulationEngine::with_language(EngineConfig::seeded(6), Language::Korean).unwrap();
    assert_eq!(engine.stage_count(), 7);
    assert!(engine.current_info().title.contains("성운"));
    assert_eq!(engine.current_id(), StageId::Nebula);
}
