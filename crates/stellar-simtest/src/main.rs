//! Stellar Headless Simulation Harness
//!
//! Drives every life-cycle stage through synchronous ticks against a
//! recording canvas and validates pools, recycling, phase, canvas state
//! hygiene and navigation. No window, no GPU.
//!
//! Usage:
//!   cargo run -p stellar-simtest
//!   cargo run -p stellar-simtest -- --verbose --ticks 2000 --seed 7
//!   cargo run -p stellar-simtest -- --json report.json

use serde::Serialize;
use stellar_core::canvas::{BlendMode, DrawState};
use stellar_core::components::{Orbit, Position, Vec2};
use stellar_core::generation::{ACCRETION_MIN_DISTANCE, ACCRETION_RESPAWN_DISTANCE, EJECTA_MAX_DISTANCE};
use stellar_core::prelude::*;
use stellar_core::stages::main_sequence;
use stellar_core::systems::INFALL_STEP;

// ── Command line ────────────────────────────────────────────────────────

struct Options {
    verbose: bool,
    ticks: u64,
    seed: u64,
    json: Option<String>,
}

impl Options {
    fn parse() -> Result<Self, String> {
        let mut options = Options {
            verbose: false,
            ticks: 600,
            seed: 42,
            json: None,
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--verbose" => options.verbose = true,
                "--ticks" => options.ticks = parse_value(&arg, args.next())?,
                "--seed" => options.seed = parse_value(&arg, args.next())?,
                "--json" => options.json = Some(args.next().ok_or("--json needs a path")?),
                other => return Err(format!("unknown argument: {}", other)),
            }
        }
        Ok(options)
    }
}

fn parse_value(flag: &str, value: Option<String>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse::<u64>()
        .map_err(|e| format!("bad value for {}: {} ({})", flag, value, e))
}

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    ticks: u64,
    passed: usize,
    failed: usize,
    results: &'a [TestResult],
}

fn main() {
    let options = match Options::parse() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    println!("=== Stellar Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Stage catalogs
    results.extend(validate_catalogs(options.verbose));

    // 2. Particle pools hold their size
    results.extend(validate_pools(&options));

    // 3. Protostar infall band
    results.extend(validate_accretion(&options));

    // 4. Planetary nebula shell
    results.extend(validate_ejecta(&options));

    // 5. Main-sequence phase
    results.extend(validate_phase(&options));

    // 6. Navigation boundaries
    results.extend(validate_navigation(&options));

    // 7. Canvas state hygiene
    results.extend(validate_canvas_state(&options));

    // 8. Degenerate surfaces and reproducibility
    results.extend(validate_surfaces(&options));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if let Some(path) = &options.json {
        let report = Report {
            seed: options.seed,
            ticks: options.ticks,
            passed,
            failed,
            results: &results,
        };
        let written = serde_json::to_string_pretty(&report)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("Report written to {}", path),
            Err(e) => {
                eprintln!("Failed to write report to {}: {}", path, e);
                std::process::exit(1);
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn seeded_engine(seed: u64) -> Option<SimulationEngine> {
    SimulationEngine::with_language(EngineConfig::seeded(seed), Language::English).ok()
}

fn missing_engine(name: &str) -> Vec<TestResult> {
    vec![TestResult {
        name: name.into(),
        passed: false,
        detail: "bundled English catalog failed to load".into(),
    }]
}

// ── 1. Catalogs ─────────────────────────────────────────────────────────

fn validate_catalogs(verbose: bool) -> Vec<TestResult> {
    println!("--- Stage Catalogs ---");
    let mut results = Vec::new();

    for language in [Language::English, Language::Korean] {
        let name = format!("catalog_{}", language.code());
        match StageCatalog::bundled(language) {
            Ok(catalog) => {
                let ordered = catalog
                    .entries()
                    .iter()
                    .zip(StageId::ALL)
                    .all(|(info, id)| info.id == id);
                let blank = catalog
                    .entries()
                    .iter()
                    .filter(|i| i.title.trim().is_empty() || i.description.trim().is_empty())
                    .count();
                if verbose {
                    for info in catalog.entries() {
                        println!("  [{}] {}", info.id, info.title);
                    }
                }
                results.push(TestResult {
                    name,
                    passed: catalog.entries().len() == 7 && ordered && blank == 0,
                    detail: format!(
                        "{} entries, ordered={}, {} blank texts",
                        catalog.entries().len(),
                        ordered,
                        blank
                    ),
                });
            }
            Err(e) => results.push(TestResult {
                name,
                passed: false,
                detail: format!("failed to load: {}", e),
            }),
        }
    }

    results
}

// ── 2. Pools ────────────────────────────────────────────────────────────

fn validate_pools(options: &Options) -> Vec<TestResult> {
    println!("--- Particle Pools ---");
    let Some(mut engine) = seeded_engine(options.seed) else {
        return missing_engine("pools");
    };
    let mut results = Vec::new();
    let mut canvas = RecordingCanvas::new();

    for id in StageId::ALL {
        engine.jump_to(id.ordinal());
        let initial = engine.particle_count();
        let mut min = initial;
        let mut max = initial;
        for _ in 0..options.ticks {
            canvas.clear();
            engine.tick(&mut canvas);
            min = min.min(engine.particle_count());
            max = max.max(engine.particle_count());
        }
        results.push(TestResult {
            name: format!("pool_{}", id),
            passed: initial == id.pool_size() && min == initial && max == initial,
            detail: format!(
                "expected {}, initial {}, range [{}, {}] over {} ticks",
                id.pool_size(),
                initial,
                min,
                max,
                options.ticks
            ),
        });
    }

    results
}

// ── 3. Protostar ────────────────────────────────────────────────────────

fn validate_accretion(options: &Options) -> Vec<TestResult> {
    println!("--- Accretion Disk ---");
    let Some(mut engine) = seeded_engine(options.seed) else {
        return missing_engine("accretion");
    };
    let mut canvas = RecordingCanvas::new();
    engine.jump_to(StageId::Protostar.ordinal());

    let mut out_of_band = 0usize;
    let mut detached = 0usize;
    let mut closest = f32::MAX;
    let mut farthest = 0.0f32;

    // Seeds start up to 450 out, so the band only holds once they have
    // fallen 50 units
    let settle = (50.0 / INFALL_STEP).ceil() as u64;
    for _ in 0..settle {
        engine.tick(&mut canvas);
    }

    for _ in 0..options.ticks {
        canvas.clear();
        engine.tick(&mut canvas);
        let center = engine.surface().center();
        for (_, (orbit, pos)) in engine.context().world.query::<(&Orbit, &Position)>().iter() {
            closest = closest.min(orbit.distance);
            farthest = farthest.max(orbit.distance);
            if orbit.distance < ACCRETION_MIN_DISTANCE || orbit.distance > ACCRETION_RESPAWN_DISTANCE {
                out_of_band += 1;
            }
            if pos.0.distance(&orbit.position(center)) > 1e-3 {
                detached += 1;
            }
        }
    }

    vec![
        TestResult {
            name: "accretion_band".into(),
            passed: out_of_band == 0,
            detail: format!(
                "distances in [{:.2}, {:.2}], {} samples outside [{}, {}]",
                closest, farthest, out_of_band, ACCRETION_MIN_DISTANCE, ACCRETION_RESPAWN_DISTANCE
            ),
        },
        TestResult {
            name: "accretion_positions_follow_orbit".into(),
            passed: detached == 0,
            detail: format!("{} particles drawn off their orbit", detached),
        },
    ]
}

// ── 4. Planetary nebula ─────────────────────────────────────────────────

fn validate_ejecta(options: &Options) -> Vec<TestResult> {
    println!("--- Planetary Nebula ---");
    let Some(mut engine) = seeded_engine(options.seed) else {
        return missing_engine("ejecta");
    };
    let mut canvas = RecordingCanvas::new();
    engine.jump_to(StageId::PlanetaryNebula.ordinal());

    let mut escaped = 0usize;
    let mut farthest = 0.0f32;
    for _ in 0..options.ticks {
        canvas.clear();
        engine.tick(&mut canvas);
        let center = engine.surface().center();
        for (_, pos) in engine.context().world.query::<&Position>().iter() {
            let d = pos.0.distance(&center);
            farthest = farthest.max(d);
            if d > EJECTA_MAX_DISTANCE {
                escaped += 1;
            }
        }
    }

    vec![TestResult {
        name: "ejecta_within_shell".into(),
        passed: escaped == 0,
        detail: format!(
            "max distance {:.2}, {} samples beyond {}",
            farthest, escaped, EJECTA_MAX_DISTANCE
        ),
    }]
}

// ── 5. Phase ────────────────────────────────────────────────────────────

fn validate_phase(options: &Options) -> Vec<TestResult> {
    println!("--- Phase Accumulator ---");
    let Some(mut engine) = seeded_engine(options.seed) else {
        return missing_engine("phase");
    };
    let mut canvas = RecordingCanvas::new();
    engine.jump_to(StageId::MainSequence.ordinal());

    // Stay below the wrap point so the expected value is a plain product
    let steps = options.ticks.min(1000);
    let mut worst = 0.0f64;
    for k in 1..=steps {
        canvas.clear();
        engine.tick(&mut canvas);
        let expected = main_sequence::PHASE_STEP * k as f64;
        worst = worst.max((engine.phase().value() - expected).abs());
    }

    let mut results = vec![TestResult {
        name: "main_sequence_phase_linear".into(),
        passed: worst < 1e-9,
        detail: format!("max deviation {:e} over {} ticks", worst, steps),
    }];

    engine.advance();
    results.push(TestResult {
        name: "phase_reset_on_transition".into(),
        passed: engine.phase().value() == 0.0,
        detail: format!("phase after advance: {}", engine.phase().value()),
    });

    results
}

// ── 6. Navigation ───────────────────────────────────────────────────────

fn validate_navigation(options: &Options) -> Vec<TestResult> {
    println!("--- Navigation ---");
    let Some(mut engine) = seeded_engine(options.seed) else {
        return missing_engine("navigation");
    };
    let mut results = Vec::new();

    let retreated = engine.retreat();
    results.push(TestResult {
        name: "retreat_at_first".into(),
        passed: !retreated && engine.current_index() == 0,
        detail: format!("changed={}, index={}", retreated, engine.current_index()),
    });

    let mut bad_jumps = 0;
    for start in 0..engine.stage_count() {
        engine.jump_to(start);
        for target in [engine.stage_count(), usize::MAX] {
            if engine.jump_to(target) || engine.current_index() != start {
                bad_jumps += 1;
            }
        }
    }
    results.push(TestResult {
        name: "out_of_range_jumps_ignored".into(),
        passed: bad_jumps == 0,
        detail: format!("{} jumps changed the stage", bad_jumps),
    });

    engine.jump_to(0);
    let mut advances = 0;
    while engine.advance() {
        advances += 1;
    }
    results.push(TestResult {
        name: "advance_stops_at_last".into(),
        passed: advances == 6 && engine.is_last() && engine.current_id() == StageId::WhiteDwarf,
        detail: format!("{} advances, ended on {}", advances, engine.current_id()),
    });

    let mut driver = AnimationDriver::new();
    let mut canvas = RecordingCanvas::new();
    driver.request(Transition::JumpTo(1));
    driver.request(Transition::Advance);
    let frames = driver.run(&mut engine, &mut canvas, &mut FixedTicks::new(3));
    results.push(TestResult {
        name: "driver_applies_requests".into(),
        passed: frames == 3 && engine.current_id() == StageId::PreMainSequence,
        detail: format!("{} frames, now on {}", frames, engine.current_id()),
    });

    results
}

// ── 7. Canvas state ─────────────────────────────────────────────────────

fn validate_canvas_state(options: &Options) -> Vec<TestResult> {
    println!("--- Canvas State ---");
    let Some(mut engine) = seeded_engine(options.seed) else {
        return missing_engine("canvas_state");
    };
    let mut results = Vec::new();

    for id in StageId::ALL {
        engine.jump_to(id.ordinal());
        let mut canvas = RecordingCanvas::new();
        for _ in 0..options.ticks.min(60) {
            engine.tick(&mut canvas);
        }
        let state = *canvas.state();
        let clean = state == DrawState::default() && canvas.save_depth() == 0;
        results.push(TestResult {
            name: format!("canvas_clean_after_{}", id),
            passed: clean,
            detail: format!(
                "alpha={}, blend={:?}, shadow={}, depth={}",
                state.alpha,
                state.blend,
                state.shadow.is_some(),
                canvas.save_depth()
            ),
        });
    }

    // Stars draw with their own alpha under normal blending
    let mut canvas = RecordingCanvas::new();
    engine.jump_to(0);
    engine.tick(&mut canvas);
    let star_states: Vec<_> = canvas
        .commands()
        .iter()
        .skip(1)
        .take(engine.starfield().len())
        .map(|c| *c.state())
        .collect();
    let matched = star_states
        .iter()
        .zip(engine.starfield().stars())
        .all(|(s, star)| (s.alpha - star.opacity.clamp(0.0, 1.0)).abs() < 1e-6 && s.blend == BlendMode::Normal);
    results.push(TestResult {
        name: "starfield_alpha_per_star".into(),
        passed: matched,
        detail: format!("{} stars checked", star_states.len()),
    });

    results
}

// ── 8. Surfaces ─────────────────────────────────────────────────────────

fn validate_surfaces(options: &Options) -> Vec<TestResult> {
    println!("--- Surfaces ---");
    let Some(mut engine) = seeded_engine(options.seed) else {
        return missing_engine("surfaces");
    };
    let mut results = Vec::new();

    let mut drawn = 0;
    for (w, h) in [(0.0, 0.0), (0.0, 480.0), (640.0, 0.0)] {
        engine.resize(w, h);
        for id in StageId::ALL {
            engine.jump_to(id.ordinal());
            let mut canvas = RecordingCanvas::new();
            engine.tick(&mut canvas);
            drawn += canvas.len();
        }
    }
    results.push(TestResult {
        name: "zero_area_draws_nothing".into(),
        passed: drawn == 0,
        detail: format!("{} commands emitted on degenerate surfaces", drawn),
    });

    engine.resize(640.0, 480.0);
    let center = engine.surface().center();
    results.push(TestResult {
        name: "resize_recenters".into(),
        passed: center == Vec2::new(320.0, 240.0) && engine.starfield().len() == engine.config().star_count,
        detail: format!("center ({}, {}), {} stars", center.x, center.y, engine.starfield().len()),
    });

    let frames = |seed| {
        let mut engine = seeded_engine(seed)?;
        let mut canvas = RecordingCanvas::new();
        for id in StageId::ALL {
            engine.jump_to(id.ordinal());
            for _ in 0..10 {
                engine.tick(&mut canvas);
            }
        }
        Some(canvas.commands().to_vec())
    };
    let a = frames(options.seed);
    let b = frames(options.seed);
    results.push(TestResult {
        name: "seeded_runs_reproducible".into(),
        passed: a.is_some() && a == b,
        detail: format!(
            "{} commands compared",
            a.as_ref().map(|c| c.len()).unwrap_or_default()
        ),
    });

    results
}
