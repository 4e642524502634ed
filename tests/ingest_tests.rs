// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use asic_floorplan::netlist::ingest::{build_design, IngestOptions};
use asic_floorplan::netlist::Netlist;
use asic_floorplan::FloorplanError;

fn sample_netlist() -> Netlist {
    let text = r#"{
        "modules": {
            "simple_top": {
                "ports": {
                    "clk":      {"direction": "input",  "bits": [2]},
                    "data_in":  {"direction": "input",  "bits": [3, 4, 5, 6]},
                    "data_out": {"direction": "output", "bits": [7, 8, 9, 10]},
                    "enable":   {"direction": "input",  "bits": []}
                },
                "cells": {
                    "u1": {
                        "type": "alu",
                        "connections": {"clk": [2], "a": [3, 4, 5, 6], "q": [11]}
                    },
                    "u2": {
                        "type": "regfile",
                        "connections": {"clk": [2], "d": [11], "q": [7, 8, 9, 10]}
                    }
                },
                "netnames": {
                    "clk":      {"bits": [2]},
                    "data_in":  {"bits": [3, 4, 5, 6]},
                    "mid":      {"bits": [11]},
                    "data_out": {"bits": [7, 8, 9, 10]},
                    "floating": {"bits": [99]}
                }
            },
            "alu":     {"attributes": {"area_hint": 400}},
            "regfile": {"attributes": {"area_hint": "100"}}
        }
    }"#;
    serde_json::from_str(text).unwrap()
}

fn scenario_options() -> IngestOptions {
    // 220x220 die with a 10 margin leaves a 200x200 core.
    IngestOptions {
        die_width: 220,
        die_height: 220,
        grid: 5,
        core_margin: 10,
        max_side_frac: 0.5,
        min_side_px: 10,
    }
}

#[test]
fn test_unknown_top_is_fatal() {
    let netlist = sample_netlist();
    let err = build_design(&netlist, "nonexistent", &scenario_options()).unwrap_err();
    match err {
        FloorplanError::TopNotFound { top, available } => {
            assert_eq!(top, "nonexistent");
            assert!(available.contains(&"simple_top".to_string()));
            assert!(available.contains(&"alu".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_ports_carry_direction_and_bus_width() {
    let netlist = sample_netlist();
    let design = build_design(&netlist, "simple_top", &scenario_options()).unwrap();

    assert_eq!(design.ports.len(), 4);
    let clk = design.port("clk").unwrap();
    assert_eq!(clk.dir, "input");
    assert_eq!(clk.width, 1);
    assert!(!clk.is_placed());

    let data_in = design.port("data_in").unwrap();
    assert_eq!(data_in.width, 4);

    // A port with an empty bit list is a scalar.
    assert_eq!(design.port("enable").unwrap().width, 1);
}

#[test]
fn test_sizing_follows_the_scale_formula() {
    // max_base = sqrt(400) = 20, target = max(10, round(200 * 0.5)) = 100,
    // k = 5, min_side = max(2*5, 10) = 10. Sides: u1 = 100, u2 = 50.
    let netlist = sample_netlist();
    let design = build_design(&netlist, "simple_top", &scenario_options()).unwrap();

    let u1 = design.module("u1").unwrap();
    let u2 = design.module("u2").unwrap();
    assert_eq!((u1.w, u1.h), (100, 100));
    assert_eq!((u2.w, u2.h), (50, 50));
    assert_eq!(u1.area, 400.0);
    assert_eq!(u2.area, 100.0);
}

#[test]
fn test_row_packing_is_overlap_free() {
    let netlist = sample_netlist();
    let design = build_design(&netlist, "simple_top", &scenario_options()).unwrap();

    // Rows start one grid unit inside the core.
    let u1 = design.module("u1").unwrap();
    let u2 = design.module("u2").unwrap();
    assert_eq!((u1.x, u1.y), (15, 15));
    assert_eq!((u2.x, u2.y), (120, 15));
    assert!(!u1.rect().intersects(&u2.rect()));

    let core = design.die.core();
    for m in &design.modules {
        assert!(m.x >= core.left() && m.x + m.w <= core.right());
    }
}

#[test]
fn test_bit_level_net_reconstruction() {
    let netlist = sample_netlist();
    let design = build_design(&netlist, "simple_top", &scenario_options()).unwrap();

    // The floating net has no endpoints and is dropped.
    assert_eq!(design.nets.len(), 4);
    assert!(design.nets.iter().all(|n| n.name != "floating"));

    // clk touches both cells and the top port; endpoints deduplicated
    // and sorted.
    let clk = design.nets.iter().find(|n| n.name == "clk").unwrap();
    assert_eq!(clk.endpoints, vec!["top.clk", "u1.clk", "u2.clk"]);
    assert_eq!(clk.bw, 1);
    assert_eq!(clk.weight, 2);

    // data_in spans four bits between the top port and u1.
    let data_in = design.nets.iter().find(|n| n.name == "data_in").unwrap();
    assert_eq!(data_in.endpoints, vec!["top.data_in", "u1.a"]);
    assert_eq!(data_in.bw, 4);

    let mid = design.nets.iter().find(|n| n.name == "mid").unwrap();
    assert_eq!(mid.endpoints, vec!["u1.q", "u2.d"]);
    assert_eq!(mid.bw, 1);
}

#[test]
fn test_area_hint_string_coercion_and_default() {
    let text = r#"{
        "modules": {
            "top": {
                "cells": {
                    "a": {"type": "known"},
                    "b": {"type": "$unknown_internal"}
                }
            },
            "known": {"attributes": {"area_hint": " \"625\" "}}
        }
    }"#;
    let netlist: Netlist = serde_json::from_str(text).unwrap();
    let design = build_design(&netlist, "top", &IngestOptions::default()).unwrap();

    assert_eq!(design.module("a").unwrap().area, 625.0);
    // No definition for the cell type: the default hint applies.
    assert_eq!(design.module("b").unwrap().area, 300.0);
}
