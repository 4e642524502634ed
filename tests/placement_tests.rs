// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use asic_floorplan::design::{Design, Die, Module, Pin};
use asic_floorplan::geom::Side;
use asic_floorplan::place::packer::{autoscale_modules, SizingRule};
use asic_floorplan::place::projector::place_pins_initial;
use asic_floorplan::place::{move_module, occupied, propose_module_position, MoveOutcome, HALO_PX};

fn module(inst: &str, x: i64, y: i64, w: i64, h: i64) -> Module {
    Module {
        inst: inst.to_string(),
        kind: "block".to_string(),
        area: 0.0,
        w,
        h,
        x,
        y,
        orient: "N".to_string(),
    }
}

fn port(name: &str, dir: &str) -> Pin {
    Pin {
        name: name.to_string(),
        dir: dir.to_string(),
        width: 1,
        side: None,
        x: None,
        y: None,
    }
}

fn design_with(grid: i64, modules: Vec<Module>) -> Design {
    Design {
        die: Die {
            width: 400,
            height: 400,
            grid,
            core_margin: 40,
        },
        top: "top".to_string(),
        modules,
        ports: Vec::new(),
        nets: Vec::new(),
    }
}

#[test]
fn test_accepted_move_is_snapped() {
    let mut design = design_with(20, vec![module("u1", 40, 40, 40, 40)]);
    match move_module(&mut design, "u1", 163.0, 177.0) {
        MoveOutcome::Accepted { x, y } => {
            assert_eq!((x, y), (160, 180));
        }
        MoveOutcome::Rejected => panic!("free move should be accepted"),
    }
    let m = design.module("u1").unwrap();
    assert_eq!((m.x, m.y), (160, 180));
}

#[test]
fn test_move_is_clamped_into_core() {
    let mut design = design_with(20, vec![module("u1", 40, 40, 40, 40)]);
    let core = design.die.core();
    match move_module(&mut design, "u1", 9999.0, -50.0) {
        MoveOutcome::Accepted { x, y } => {
            assert_eq!(x, core.right() - 40);
            assert_eq!(y, core.top());
        }
        MoveOutcome::Rejected => panic!("clamped move should be accepted"),
    }
}

#[test]
fn test_colliding_move_is_rejected_and_state_kept() {
    let mut design = design_with(
        1,
        vec![
            module("u1", 40, 40, 40, 40),
            module("u2", 120, 40, 40, 40),
        ],
    );
    assert_eq!(
        move_module(&mut design, "u2", 81.0, 40.0),
        MoveOutcome::Rejected
    );
    // No partial move: u2 keeps its last known-good position.
    let u2 = design.module("u2").unwrap();
    assert_eq!((u2.x, u2.y), (120, 40));
}

#[test]
fn test_minimum_gap_is_twice_the_halo() {
    let design = design_with(
        1,
        vec![
            module("u1", 40, 40, 40, 40),
            module("u2", 200, 40, 40, 40),
        ],
    );
    // u1's right edge is at 80; with halo 4 on both rectangles the
    // closest legal left edge for u2 is 80 + 2*4 = 88.
    assert_eq!(
        propose_module_position(&design, "u2", 88.0, 40.0),
        MoveOutcome::Accepted { x: 88, y: 40 }
    );
    assert_eq!(
        propose_module_position(&design, "u2", 87.0, 40.0),
        MoveOutcome::Rejected
    );
}

#[test]
fn test_unknown_instance_is_rejected() {
    let mut design = design_with(20, vec![module("u1", 40, 40, 40, 40)]);
    assert_eq!(
        move_module(&mut design, "ghost", 100.0, 100.0),
        MoveOutcome::Rejected
    );
}

#[test]
fn test_autoscale_resolves_collision_by_sliding_right() {
    let mut design = design_with(
        20,
        vec![
            module("u1", 40, 40, 40, 40),
            module("u2", 40, 40, 40, 40),
        ],
    );
    // bases are sqrt(1600) = 40; die_min = 320 so the target side is
    // round(320 * 0.35) = 112 and k = 2.8.
    autoscale_modules(
        &mut design,
        SizingRule {
            max_side_frac: 0.35,
            min_side_px: 32,
        },
    );
    let u1 = design.module("u1").unwrap();
    let u2 = design.module("u2").unwrap();
    assert_eq!((u1.w, u1.h), (112, 112));
    assert_eq!((u2.w, u2.h), (112, 112));
    // u1 is rescaled first and slides clear of the still-small u2, then
    // u2 slides until its halo clears u1's halo (gap of exactly 8).
    assert_eq!((u1.x, u1.y), (100, 40));
    assert_eq!((u2.x, u2.y), (220, 40));
    assert!(!occupied(
        &design.modules,
        Some("u2"),
        &u2.rect(),
        HALO_PX
    ));
}

#[test]
fn test_autoscale_repair_is_best_effort() {
    // An 80x80 core cannot separate two 40-unit modules: the slide runs
    // out of room and the residual overlap is accepted.
    let mut design = Design {
        die: Die {
            width: 200,
            height: 200,
            grid: 20,
            core_margin: 60,
        },
        top: "top".to_string(),
        modules: vec![
            module("u1", 60, 60, 40, 40),
            module("u2", 60, 60, 40, 40),
        ],
        ports: Vec::new(),
        nets: Vec::new(),
    };
    autoscale_modules(
        &mut design,
        SizingRule {
            max_side_frac: 0.35,
            min_side_px: 32,
        },
    );
    let u1 = design.module("u1").unwrap();
    let u2 = design.module("u2").unwrap();
    assert_eq!((u1.x, u1.y), (100, 60));
    assert_eq!((u2.x, u2.y), (100, 60));
    assert!(occupied(&design.modules, Some("u2"), &u2.rect(), HALO_PX));
}

#[test]
fn test_initial_pin_distribution_by_role() {
    let mut design = design_with(20, Vec::new());
    design.ports = vec![
        port("clk", "input"),
        port("a", "input"),
        port("b", "input"),
        port("y", "output"),
    ];
    place_pins_initial(&mut design);

    // clk goes north, inputs west, outputs east; pin squares sit flush
    // outside the core edge.
    let clk = design.port("clk").unwrap();
    assert_eq!(clk.side, Some(Side::N));
    assert_eq!((clk.x, clk.y), (Some(192), Some(24)));

    let a = design.port("a").unwrap();
    let b = design.port("b").unwrap();
    assert_eq!(a.side, Some(Side::W));
    assert_eq!((a.x, a.y), (Some(24), Some(148)));
    assert_eq!((b.x, b.y), (Some(24), Some(236)));

    let y = design.port("y").unwrap();
    assert_eq!(y.side, Some(Side::E));
    assert_eq!((y.x, y.y), (Some(360), Some(192)));
}

#[test]
fn test_saved_positions_suppress_distribution() {
    let mut design = design_with(20, Vec::new());
    let mut placed = port("clk", "input");
    placed.x = Some(100);
    placed.y = Some(24);
    placed.side = Some(Side::N);
    design.ports = vec![placed, port("a", "input")];

    place_pins_initial(&mut design);

    let clk = design.port("clk").unwrap();
    assert_eq!((clk.x, clk.y), (Some(100), Some(24)));
    // Unsaved ports fall back to the stored-value defaults, not the
    // automatic spread.
    let a = design.port("a").unwrap();
    assert_eq!((a.x, a.y), (Some(0), Some(0)));
    assert_eq!(a.side, Some(Side::N));
}
