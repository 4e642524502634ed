// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! OpenLane artifact export.
//!
//! The engine works in a top-left, y-down coordinate system; OpenLane
//! expects lower-left with y growing upward, scaled by `px_to_unit`. This
//! module performs that translation and emits the macro placement file, the
//! per-bit pin placement file, the backend config, and a CSV module summary.
//! Pin sides are re-derived geometrically from the current positions, never
//! trusted from stored state.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::design::Design;
use crate::error::Result;
use crate::geom::Side;
use crate::place::projector::nearest_side;

pub mod parser;
pub mod summary;

/// Cursor start low enough that the first pin bit on a side is never
/// forced forward by the monotonicity rule.
const CURSOR_FLOOR: i64 = -1_000_000_000;

/// What an export run produced, for caller-side reporting.
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// File names written into the output directory, in emission order.
    pub produced: Vec<String>,
    /// Sum of declared port bus widths.
    pub pin_bits_expected: usize,
    /// Pin bit lines actually emitted.
    pub pin_bits_written: usize,
}

impl ExportReport {
    pub fn pin_bits_consistent(&self) -> bool {
        self.pin_bits_expected == 0 || self.pin_bits_written == self.pin_bits_expected
    }
}

/// Translate a top-left position to lower-left backend coordinates.
///
/// `box_h` is the rectangle height for placed boxes, or 0 for point-like
/// objects such as pins. Both coordinates are scaled by `px_to_unit` and
/// rounded to the nearest integer.
pub fn to_lower_left(die_height: i64, x: i64, y: i64, box_h: i64, px_to_unit: f64) -> (i64, i64) {
    let y_ll = die_height - (y + box_h);
    (
        (x as f64 * px_to_unit).round() as i64,
        (y_ll as f64 * px_to_unit).round() as i64,
    )
}

/// Expand a bus port into per-bit names, index 0 least significant.
pub fn expand_bus(name: &str, width: u32) -> Vec<String> {
    if width <= 1 {
        vec![name.to_string()]
    } else {
        (0..width).map(|i| format!("{name}[{i}]")).collect()
    }
}

/// Group placed pins by re-derived side; within a side, sort by the
/// backend-space coordinate running along that side, relative to the
/// core's near edge.
fn pins_grouped_sorted(design: &Design, px_to_unit: f64) -> BTreeMap<Side, Vec<(String, i64)>> {
    let core = design.die.core();
    let size = design.pin_square();
    let mut groups: BTreeMap<Side, Vec<(String, i64)>> = BTreeMap::new();

    for pin in &design.ports {
        let (Some(x), Some(y)) = (pin.x, pin.y) else {
            continue;
        };
        let side = nearest_side(&core, size, x as f64, y as f64);
        let (x_ll, y_ll) = to_lower_left(design.die.height, x, y, 0, px_to_unit);
        let key = if side.is_horizontal() {
            x_ll - (core.left() as f64 * px_to_unit).round() as i64
        } else {
            y_ll - ((design.die.height - core.bottom()) as f64 * px_to_unit).round() as i64
        };
        groups.entry(side).or_default().push((pin.name.clone(), key));
    }
    for pins in groups.values_mut() {
        pins.sort_by_key(|&(_, key)| key);
    }
    groups
}

/// Lines of the pin placement artifact, one per expanded bus bit.
///
/// Sides are emitted in N, S, E, W order. Each bus gets an ideal start
/// centering its bit run on the pin's nominal coordinate, clamped between
/// the previous cursor plus one step and the side end; a bit that would
/// still not advance the cursor is forced to `cursor + step`, so offsets
/// on a side are strictly increasing in emission order.
pub fn pin_placement_lines(design: &Design, px_to_unit: f64) -> Vec<String> {
    let core = design.die.core();
    let die_h = design.die.height;
    let core_left_u = (core.left() as f64 * px_to_unit).round() as i64;
    let core_right_u = (core.right() as f64 * px_to_unit).round() as i64;
    let core_top_u = ((die_h - core.top()) as f64 * px_to_unit).round() as i64;
    let core_bot_u = ((die_h - core.bottom()) as f64 * px_to_unit).round() as i64;
    let step = ((design.die.grid as f64 * px_to_unit).round() as i64).max(1);

    let grouped = pins_grouped_sorted(design, px_to_unit);
    let mut lines = Vec::new();
    for side in Side::EMIT_ORDER {
        let Some(pins) = grouped.get(&side) else {
            continue;
        };
        let min_off = 0i64;
        let max_off = if side.is_horizontal() {
            core_right_u - core_left_u
        } else {
            core_top_u - core_bot_u
        };

        let mut cursor = CURSOR_FLOOR;
        for (name, base) in pins {
            let width = design.port(name).map_or(1, |p| p.width);
            let total_span = step * (i64::from(width) - 1);
            let ideal_start = (*base as f64 - total_span as f64 / 2.0).round() as i64;
            let lo = min_off.max(cursor + step);
            let hi = min_off.max(max_off - total_span);
            let start = lo.max(ideal_start.min(hi));

            for (i, bit_name) in expand_bus(name, width).iter().enumerate() {
                let mut off = (start + i as i64 * step).clamp(min_off, max_off.max(min_off));
                if off <= cursor {
                    off = cursor + step;
                }
                lines.push(format!("{bit_name} {side} {off}"));
                cursor = off;
            }
        }
    }
    lines
}

/// Lines of the macro placement artifact: instance, lower-left position,
/// orientation.
pub fn macro_placement_lines(design: &Design, px_to_unit: f64) -> Vec<String> {
    design
        .modules
        .iter()
        .map(|m| {
            let (x, y) = to_lower_left(design.die.height, m.x, m.y, m.h, px_to_unit);
            format!("{} {} {} {}", m.inst, x, y, m.orient)
        })
        .collect()
}

/// Lines of the backend config file.
///
/// The fixed-I/O block is emitted only when pin bits were exported, and the
/// macro placement reference only when modules exist. Clock port and period
/// default to `clk` / `20.0` behind existence guards.
pub fn config_lines(design: &Design, px_to_unit: f64, pin_bits: usize, has_macros: bool) -> Vec<String> {
    let die_x1 = (design.die.width as f64 * px_to_unit).round() as i64;
    let die_y1 = (design.die.height as f64 * px_to_unit).round() as i64;
    let margin = design.die.core_margin;
    let core_x0 = (margin as f64 * px_to_unit).round() as i64;
    let core_y0 = core_x0;
    let core_x1 = ((design.die.width - margin) as f64 * px_to_unit).round() as i64;
    let core_y1 = ((design.die.height - margin) as f64 * px_to_unit).round() as i64;
    let top = &design.top;

    let mut cfg: Vec<String> = Vec::new();
    cfg.push("# ===== OpenLane config (auto-generated from the floorplan) =====".to_string());
    cfg.push(format!("set ::env(DESIGN_NAME) \"{top}\""));
    cfg.push(format!("set ::env(SYNTH_TOP)   \"{top}\""));
    cfg.push(format!("set ::env(VERILATOR_TOP) \"{top}\""));
    cfg.push(format!("set ::env(LINTER_TOP)    \"{top}\""));
    cfg.push(String::new());
    cfg.push("# RTL".to_string());
    cfg.push("set ::env(VERILOG_FILES) [glob -nocomplain $::env(DESIGN_DIR)/src/*.v]".to_string());
    cfg.push(String::new());
    cfg.push("# Geometry".to_string());
    cfg.push("set ::env(FP_SIZING) \"absolute\"".to_string());
    cfg.push(format!("set ::env(DIE_AREA)  \"0 0 {die_x1} {die_y1}\""));
    cfg.push(format!(
        "set ::env(CORE_AREA) \"{core_x0} {core_y0} {core_x1} {core_y1}\""
    ));
    cfg.push(String::new());
    cfg.push("# I/O pins: use only the explicit placement exported here".to_string());
    if pin_bits > 0 {
        cfg.push("set ::env(PL_FIXED_IO) 1".to_string());
        cfg.push("set ::env(FP_IO_PLACEMENT)      1".to_string());
        cfg.push(
            "set ::env(FP_PIN_PLACEMENT_CFG) \"$::env(DESIGN_DIR)/pin_placement.cfg\"".to_string(),
        );
    } else {
        cfg.push("# (no pins exported: ioPlacer will place I/O automatically)".to_string());
    }
    cfg.push(String::new());
    cfg.push("# I/O layers (avoids warnings about deprecated variables)".to_string());
    cfg.push("set ::env(FP_IO_HLAYER) {met1}".to_string());
    cfg.push("set ::env(FP_IO_VLAYER) {met2}".to_string());
    cfg.push(String::new());
    if has_macros {
        cfg.push("# Hard macros".to_string());
        cfg.push(
            "set ::env(MACRO_PLACEMENT_CFG) \"$::env(DESIGN_DIR)/macro.cfg\"".to_string(),
        );
    } else {
        cfg.push("# No hard macros".to_string());
        cfg.push(
            "# set ::env(MACRO_PLACEMENT_CFG) \"$::env(DESIGN_DIR)/macro.cfg\"".to_string(),
        );
    }
    cfg.push(String::new());
    cfg.push("# Default clock".to_string());
    cfg.push(
        "if {![info exists ::env(CLOCK_PORT)]}   { set ::env(CLOCK_PORT)   \"clk\" }".to_string(),
    );
    cfg.push(
        "if {![info exists ::env(CLOCK_PERIOD)]} { set ::env(CLOCK_PERIOD) \"20.0\" }".to_string(),
    );
    cfg.push(String::new());
    cfg
}

/// Write all OpenLane artifacts for the current placement state.
///
/// Files are written fully before returning; atomic replacement, if needed,
/// is the caller's concern. A pin-bit count mismatch is reported as a
/// warning and does not stop the export.
pub fn export_openlane(design: &Design, outdir: &Path, px_to_unit: f64) -> Result<ExportReport> {
    fs::create_dir_all(outdir)?;

    let has_macros = !design.modules.is_empty();
    if has_macros {
        let lines = macro_placement_lines(design, px_to_unit);
        fs::write(outdir.join("macro.cfg"), lines.join("\n") + "\n")?;
    }

    let pin_bits_expected = design.total_pin_bits();
    let mut pin_bits_written = 0;
    if pin_bits_expected > 0 {
        let lines = pin_placement_lines(design, px_to_unit);
        pin_bits_written = lines.len();
        fs::write(outdir.join("pin_placement.cfg"), lines.join("\n") + "\n")?;
        if pin_bits_written != pin_bits_expected {
            log::warn!(
                "exported pin bits ({pin_bits_written}) != sum of port widths \
                 ({pin_bits_expected}); check port names and widths"
            );
        }
    }

    let cfg = config_lines(design, px_to_unit, pin_bits_expected, has_macros);
    fs::write(outdir.join("config.tcl"), cfg.join("\n"))?;

    if has_macros {
        summary::export_modules_csv(design, &outdir.join("modules.csv"))?;
    }

    let mut produced = vec!["config.tcl".to_string()];
    if has_macros {
        produced.push("macro.cfg".to_string());
    }
    if pin_bits_expected > 0 {
        produced.push("pin_placement.cfg".to_string());
    }
    if has_macros {
        produced.push("modules.csv".to_string());
    }

    Ok(ExportReport {
        produced,
        pin_bits_expected,
        pin_bits_written,
    })
}
