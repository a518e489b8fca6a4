//! Roomgen Headless Generation Harness
//!
//! Builds every preset in `data/room_presets.json` across a sweep of seeds
//! and checks the layout and decoration invariants on each result.
//! Runs entirely in-process against a plain `hecs::World`; no rendering.
//!
//! Usage:
//!   cargo run -p roomgen-simtest
//!   cargo run -p roomgen-simtest -- --verbose
//!   RUST_LOG=debug cargo run -p roomgen-simtest

use roomgen_core::catalog::RoomCatalog;
use roomgen_core::components::{BoundingBox, Role, Vec3};
use roomgen_core::config::{
    presets_from_json, validate_decoration_config, validate_room_config, DecorationConfig,
    DoorRule, RoomConfig, RoomPreset,
};
use roomgen_core::engine::RoomGenerator;
use roomgen_core::generation::{DecorationSet, GenerationError, RoomLayout};
use roomgen_core::grid::{GridCell, GridCoord, SpatialGrid};

// ── Room presets (same JSON a host would ship) ──────────────────────────
const PRESETS_JSON: &str = include_str!("../../../data/room_presets.json");

/// Seeds swept per preset.
const SEED_SWEEP: u64 = 64;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Roomgen Generation Harness ===\n");

    let mut results = Vec::new();

    // 1. Preset data validation
    let presets = match presets_from_json(PRESETS_JSON) {
        Ok(p) => p,
        Err(e) => {
            println!("  ✗ presets_parse: JSON parse error: {}", e);
            std::process::exit(1);
        }
    };
    results.extend(validate_presets(&presets, verbose));

    // 2. Spatial grid conversions
    results.extend(validate_grid(verbose));

    // 3. Fixed scenarios
    results.extend(validate_scenarios(verbose));

    // 4. Layout sweep over every preset
    results.extend(validate_layout_sweep(&presets, verbose));

    // 5. Decoration sweep over every preset
    results.extend(validate_decoration_sweep(&presets, verbose));

    // 6. Determinism and lifecycle
    results.extend(validate_lifecycle(&presets, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn check(name: impl Into<String>, failures: &[String], ok_detail: &str) -> TestResult {
    TestResult {
        name: name.into(),
        passed: failures.is_empty(),
        detail: if failures.is_empty() {
            ok_detail.into()
        } else {
            format!("{} failures, first: {}", failures.len(), failures[0])
        },
    }
}

fn with_seeds(preset: &RoomPreset, seed: u64) -> RoomPreset {
    let mut preset = preset.clone();
    preset.room.seed = preset.room.seed.wrapping_add(seed);
    preset.decorations.seed = preset.decorations.seed.wrapping_add(seed * 31);
    preset
}

// ── 1. Presets ──────────────────────────────────────────────────────────

fn validate_presets(presets: &[RoomPreset], verbose: bool) -> Vec<TestResult> {
    println!("--- Room Presets ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "presets_not_empty".into(),
        passed: !presets.is_empty(),
        detail: format!("{} presets loaded", presets.len()),
    });

    let mut names: Vec<_> = presets.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    results.push(TestResult {
        name: "presets_unique_names".into(),
        passed: names.len() == presets.len(),
        detail: format!("{} distinct names", names.len()),
    });

    let mut invalid = Vec::new();
    for preset in presets {
        let mut errors = validate_room_config(&preset.room);
        errors.extend(validate_decoration_config(
            &preset.decorations,
            &preset.room,
            &preset.catalog,
        ));
        for e in errors {
            invalid.push(format!("{}: {}", preset.name, e));
        }
    }
    results.push(check("presets_valid", &invalid, "every preset validates"));

    let empty_tiles: Vec<String> = presets
        .iter()
        .filter(|p| p.catalog.floors.is_empty() || p.catalog.walls.is_empty())
        .map(|p| p.name.clone())
        .collect();
    results.push(check(
        "presets_have_floors_and_walls",
        &empty_tiles,
        "every preset has floor and wall kinds",
    ));

    if verbose {
        for p in presets {
            println!(
                "  {:12} {}x{}x{} cell {} doors {} windows {} ({:?})",
                p.name,
                p.room.width,
                p.room.height,
                p.room.depth,
                p.room.cell_size,
                p.room.door_count,
                p.room.window_count,
                p.room.door_rule
            );
        }
    }

    results
}

// ── 2. Spatial Grid ─────────────────────────────────────────────────────

fn validate_grid(_verbose: bool) -> Vec<TestResult> {
    println!("--- Spatial Grid ---");
    let mut results = Vec::new();

    let shapes = [
        (5, 1, 5, 1.0, Vec3::ZERO),
        (7, 1, 3, 0.5, Vec3::new(-2.5, 0.0, 4.0)),
        (4, 3, 6, 1.5, Vec3::new(10.0, -3.0, 0.25)),
        (16, 2, 16, 2.0, Vec3::new(-16.0, 1.0, -16.0)),
    ];

    let mut round_trip = Vec::new();
    for &(w, h, d, cs, origin) in &shapes {
        let grid = match SpatialGrid::<GridCell>::from_fn(w, h, d, cs, origin, GridCell::new) {
            Ok(g) => g,
            Err(e) => {
                round_trip.push(format!("{}x{}x{}: {}", w, h, d, e));
                continue;
            }
        };
        for coord in grid.coords() {
            let back = grid.grid_coordinate(grid.world_position(coord));
            if back != coord {
                round_trip.push(format!("{:?} came back as {:?}", coord, back));
            }
            if grid.get(coord).coord != coord {
                round_trip.push(format!("{:?} stores wrong coordinate", coord));
            }
        }
    }
    results.push(check(
        "grid_round_trip",
        &round_trip,
        "world_position/grid_coordinate round-trip on every cell",
    ));

    let flat = SpatialGrid::<GridCell>::from_fn(5, 1, 5, 1.0, Vec3::ZERO, GridCell::new);
    let layered = SpatialGrid::<GridCell>::from_fn(5, 3, 5, 1.0, Vec3::ZERO, GridCell::new);
    match (flat, layered) {
        (Ok(flat), Ok(layered)) => {
            let flat_corners = flat
                .coords()
                .filter(|&c| flat.is_corner_cell(flat.world_position(c)))
                .count();
            let layered_corners = layered
                .coords()
                .filter(|&c| layered.is_corner_cell(layered.world_position(c)))
                .count();
            results.push(TestResult {
                name: "grid_corner_count".into(),
                passed: flat_corners == 4 && layered_corners == 8,
                detail: format!("5x5: {} corners, 5x3x5: {} corners", flat_corners, layered_corners),
            });

            let outside = [
                GridCoord::flat(-1, 0),
                GridCoord::flat(5, 2),
                GridCoord::flat(2, 5),
                GridCoord::new(0, 1, 0),
                GridCoord::flat(i32::MIN, i32::MAX),
            ];
            let sentinel = outside
                .iter()
                .all(|&c| !flat.in_bounds(c) && flat.get(c) == GridCell::default());
            results.push(TestResult {
                name: "grid_out_of_range_sentinel".into(),
                passed: sentinel,
                detail: "out-of-range reads return the default cell".into(),
            });
        }
        _ => results.push(TestResult {
            name: "grid_corner_count".into(),
            passed: false,
            detail: "could not build 5x5 grids".into(),
        }),
    }

    let degenerate = [
        SpatialGrid::<GridCell>::new(0, 1, 4, 1.0, Vec3::ZERO).is_err(),
        SpatialGrid::<GridCell>::new(4, 1, 4, 0.0, Vec3::ZERO).is_err(),
        SpatialGrid::<GridCell>::new(4, 1, 4, -1.0, Vec3::ZERO).is_err(),
        SpatialGrid::<GridCell>::new(4, 1, 4, 1.0, Vec3::new(f32::NAN, 0.0, 0.0)).is_err(),
    ];
    results.push(TestResult {
        name: "grid_rejects_degenerate".into(),
        passed: degenerate.iter().all(|&rejected| rejected),
        detail: "zero extent, non-positive cell size and NaN origin rejected".into(),
    });

    results
}

// ── 3. Scenarios ────────────────────────────────────────────────────────

fn validate_scenarios(_verbose: bool) -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();

    let base = RoomConfig {
        width: 4,
        depth: 4,
        cell_size: 1.0,
        door_count: 1,
        window_count: 0,
        seed: 42,
        ..RoomConfig::default()
    };

    let mut generator = RoomGenerator::new(RoomCatalog::basic());
    match generator.generate_room(base.clone()) {
        Ok(layout) => {
            let corner_door = layout.doors.iter().any(|d| layout.is_corner_wall(d));
            let (doors, walls) = (layout.doors.len(), layout.walls.len());
            results.push(TestResult {
                name: "scenario_4x4_one_door".into(),
                passed: doors == 1 && walls == 15 && !corner_door,
                detail: format!("{} door, {} walls, corner door: {}", doors, walls, corner_door),
            });
        }
        Err(e) => results.push(TestResult {
            name: "scenario_4x4_one_door".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    let mut generator = RoomGenerator::new(RoomCatalog::basic());
    let exhausted = RoomConfig {
        door_count: 12,
        ..base
    };
    match generator.generate_room(exhausted) {
        Ok(layout) => {
            let doors = layout.doors.len();
            let walls = layout.walls.len();
            results.push(TestResult {
                name: "scenario_door_exhaustion".into(),
                passed: doors <= 8 && doors + walls == 16,
                detail: format!("12 requested, {} placed, {} walls left", doors, walls),
            });
        }
        Err(e) => results.push(TestResult {
            name: "scenario_door_exhaustion".into(),
            passed: false,
            detail: format!("exhaustion surfaced as error: {}", e),
        }),
    }

    // 2x2: every wall borders a corner, so the door stage must give up
    let mut generator = RoomGenerator::new(RoomCatalog::basic());
    let all_corners = RoomConfig {
        width: 2,
        depth: 2,
        door_count: 3,
        ..base
    };
    match generator.generate_room(all_corners) {
        Ok(layout) => {
            let (doors, walls) = (layout.doors.len(), layout.walls.len());
            results.push(TestResult {
                name: "scenario_all_corner_walls".into(),
                passed: doors == 0 && walls == 8,
                detail: format!("{} doors, {} walls", doors, walls),
            });
        }
        Err(e) => results.push(TestResult {
            name: "scenario_all_corner_walls".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 4. Layout Sweep ─────────────────────────────────────────────────────

fn layout_failures(layout: &RoomLayout, generator: &RoomGenerator) -> Vec<String> {
    let config = &generator.room_config;
    let mut failures = Vec::new();

    let expected_floors = (config.width * config.height * config.depth) as usize;
    if layout.floors.len() != expected_floors {
        failures.push(format!(
            "{} floors, expected {}",
            layout.floors.len(),
            expected_floors
        ));
    }

    let segments = layout.walls.len() + layout.doors.len() + layout.windows.len();
    if segments != config.perimeter_walls() {
        failures.push(format!(
            "{} perimeter segments, expected {}",
            segments,
            config.perimeter_walls()
        ));
    }

    if layout.doors.len() > config.door_count as usize {
        failures.push(format!("{} doors, only {} requested", layout.doors.len(), config.door_count));
    }
    if layout.windows.len() > config.window_count as usize {
        failures.push(format!(
            "{} windows, only {} requested",
            layout.windows.len(),
            config.window_count
        ));
    }

    match config.door_rule {
        DoorRule::AvoidCorners => {
            if layout.doors.iter().any(|d| layout.is_corner_wall(d)) {
                failures.push("door on a corner wall".into());
            }
        }
        DoorRule::AvoidAdjacentDoors => {
            for (i, door) in layout.doors.iter().enumerate() {
                if layout.doors[..i]
                    .iter()
                    .any(|earlier| layout.grid.are_neighbors(door.cell, earlier.cell))
                {
                    failures.push(format!("door at {:?} next to an earlier door", door.cell));
                }
            }
        }
    }

    // Scene matches the lists: replaced walls are gone, nothing is doubled
    let scene = [
        (Role::Floor, layout.floors.len(), generator.floor_count()),
        (Role::Wall, layout.walls.len(), generator.wall_count()),
        (Role::Door, layout.doors.len(), generator.door_count()),
        (Role::Window, layout.windows.len(), generator.window_count()),
    ];
    for (role, listed, live) in scene {
        if listed != live {
            failures.push(format!("{} {} listed, {} in scene", listed, role.label(), live));
        }
    }

    failures
}

fn validate_layout_sweep(presets: &[RoomPreset], verbose: bool) -> Vec<TestResult> {
    println!("--- Layout Sweep ---");
    let mut results = Vec::new();

    for preset in presets {
        let mut failures = Vec::new();
        let mut placed_doors = 0usize;
        let mut placed_windows = 0usize;

        for seed in 0..SEED_SWEEP {
            let preset = with_seeds(preset, seed);
            let mut generator = RoomGenerator::new(preset.catalog.clone());
            let layout = match generator.generate_room(preset.room.clone()) {
                Ok(layout) => layout.clone(),
                Err(e) => {
                    failures.push(format!("seed {}: {}", seed, e));
                    continue;
                }
            };
            placed_doors += layout.doors.len();
            placed_windows += layout.windows.len();
            for f in layout_failures(&layout, &generator) {
                failures.push(format!("seed {}: {}", seed, f));
            }
        }

        results.push(check(
            format!("layout_{}", preset.name),
            &failures,
            &format!("{} seeds clean", SEED_SWEEP),
        ));
        if verbose {
            println!(
                "  {:12} avg doors {:.2}/{}, avg windows {:.2}/{}",
                preset.name,
                placed_doors as f64 / SEED_SWEEP as f64,
                preset.room.door_count,
                placed_windows as f64 / SEED_SWEEP as f64,
                preset.room.window_count
            );
        }
    }

    results
}

// ── 5. Decoration Sweep ─────────────────────────────────────────────────

fn decoration_failures(
    set: &DecorationSet,
    layout: &RoomLayout,
    config: &DecorationConfig,
    origin_y: f32,
) -> Vec<String> {
    let mut failures = Vec::new();

    let all: Vec<_> = set.iter().collect();
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            let gap = a.position().distance(&b.position());
            if gap < a.exclusion_size.max(b.exclusion_size) {
                failures.push(format!("{} and {} only {:.3} apart", a.kind, b.kind, gap));
            }
        }
    }

    if !config.allow_wall_overflow && set.wall.len() > config.wall_quota as usize {
        failures.push(format!("{} wall decorations over quota {}", set.wall.len(), config.wall_quota));
    }
    if !config.allow_prop_overflow && set.prop.len() > config.prop_quota as usize {
        failures.push(format!("{} props over quota {}", set.prop.len(), config.prop_quota));
    }

    for deco in &set.wall {
        let on_active_wall = deco
            .wall
            .map_or(false, |w| layout.walls.iter().any(|wall| wall.entity == w));
        if !on_active_wall {
            failures.push(format!("{} not hung on a standing wall", deco.kind));
        }
    }

    let grid = &layout.grid;
    let safe = config.safe_area as i32;
    let area = BoundingBox::new(
        grid.world_position(GridCoord::flat(safe, safe)),
        grid.world_position(GridCoord::flat(
            grid.width() as i32 - 1 - safe,
            grid.depth() as i32 - 1 - safe,
        )),
    );
    for prop in &set.prop {
        let p = prop.position();
        if !area.contains(&Vec3::new(p.x, area.min.y, p.z)) {
            failures.push(format!("{} outside safe area at ({:.2}, {:.2})", prop.kind, p.x, p.z));
        }
        if (p.y - (origin_y + config.prop_offset)).abs() > 1e-4 {
            failures.push(format!("{} at height {:.3}", prop.kind, p.y));
        }
    }

    failures
}

fn validate_decoration_sweep(presets: &[RoomPreset], verbose: bool) -> Vec<TestResult> {
    println!("--- Decoration Sweep ---");
    let mut results = Vec::new();

    for preset in presets {
        let mut failures = Vec::new();
        let mut total = 0usize;

        for seed in 0..SEED_SWEEP {
            let preset = with_seeds(preset, seed);
            let mut generator = RoomGenerator::from_preset(preset.clone());
            if let Err(e) = generator.regenerate() {
                failures.push(format!("seed {}: {}", seed, e));
                continue;
            }
            let (Some(layout), Some(set)) = (generator.layout(), generator.decorations()) else {
                failures.push(format!("seed {}: nothing generated", seed));
                continue;
            };
            total += set.len();
            if generator.decoration_count() != set.len() {
                failures.push(format!(
                    "seed {}: {} decorations listed, {} in scene",
                    seed,
                    set.len(),
                    generator.decoration_count()
                ));
            }
            for f in decoration_failures(set, layout, &preset.decorations, preset.room.origin.y) {
                failures.push(format!("seed {}: {}", seed, f));
            }
        }

        results.push(check(
            format!("decorations_{}", preset.name),
            &failures,
            &format!("{} seeds clean", SEED_SWEEP),
        ));
        if verbose {
            println!(
                "  {:12} avg decorations {:.2}",
                preset.name,
                total as f64 / SEED_SWEEP as f64
            );
        }
    }

    results
}

// ── 6. Determinism & Lifecycle ──────────────────────────────────────────

fn snapshot(generator: &RoomGenerator) -> String {
    let mut out = String::new();
    if let Some(layout) = generator.layout() {
        for tile in layout
            .floors
            .iter()
            .chain(&layout.walls)
            .chain(&layout.doors)
            .chain(&layout.windows)
        {
            out.push_str(&format!("{}@{:?};", tile.kind, tile.transform));
        }
    }
    if let Some(set) = generator.decorations() {
        for deco in set.iter() {
            out.push_str(&format!("{}@{:?};", deco.kind, deco.transform));
        }
    }
    out
}

fn validate_lifecycle(presets: &[RoomPreset], _verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism & Lifecycle ---");
    let mut results = Vec::new();

    let mut mismatched = Vec::new();
    for preset in presets {
        let mut a = RoomGenerator::from_preset(preset.clone());
        let mut b = RoomGenerator::from_preset(preset.clone());
        match (a.regenerate(), b.regenerate()) {
            (Ok(()), Ok(())) => {
                if snapshot(&a) != snapshot(&b) {
                    mismatched.push(format!("{}: two generators differ", preset.name));
                }
                let first = snapshot(&a);
                if let Err(e) = a.regenerate() {
                    mismatched.push(format!("{}: regenerate failed: {}", preset.name, e));
                } else if snapshot(&a) != first {
                    mismatched.push(format!("{}: regenerate differs", preset.name));
                }
            }
            (Err(e), _) | (_, Err(e)) => mismatched.push(format!("{}: {}", preset.name, e)),
        }
    }
    results.push(check(
        "deterministic_per_seed",
        &mismatched,
        "same seeds produce identical rooms and decorations",
    ));

    let mut lifecycle = Vec::new();
    if let Some(preset) = presets.first() {
        let mut generator = RoomGenerator::from_preset(preset.clone());
        if !matches!(
            generator.generate_decorations(preset.decorations.clone()),
            Err(GenerationError::NoRoom)
        ) {
            lifecycle.push("decorating without a room was not refused".to_string());
        }
        if let Err(e) = generator.regenerate() {
            lifecycle.push(format!("regenerate failed: {}", e));
        }
        if !matches!(
            generator.generate_room(preset.room.clone()),
            Err(GenerationError::RoomNotCleared)
        ) {
            lifecycle.push("second room was not refused".to_string());
        }
        if !matches!(
            generator.generate_decorations(preset.decorations.clone()),
            Err(GenerationError::DecorationsNotCleared)
        ) {
            lifecycle.push("second decoration pass was not refused".to_string());
        }
        generator.clear_room();
        generator.clear_room();
        generator.clear_decorations();
        if generator.world.len() != 0 {
            lifecycle.push(format!("{} entities left after clear", generator.world.len()));
        }
    }
    results.push(check(
        "lifecycle_requires_clear",
        &lifecycle,
        "regeneration refused until cleared, clears idempotent",
    ));

    results
}
