// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Module sizing and packing.
//!
//! Two entry points share one sizing rule: [`pack_rows`] lays out freshly
//! ingested modules in overlap-free rows, and [`autoscale_modules`] rescales
//! an existing floorplan in place, keeping each module as close as possible
//! to where the user left it.

use crate::design::{Design, Die, Module};
use crate::geom::Rect;
use crate::place::{occupied, HALO_PX};

/// Sizing knobs shared by ingestion packing and interactive autoscale.
#[derive(Debug, Clone, Copy)]
pub struct SizingRule {
    /// Fraction of the core's short side granted to the largest module.
    pub max_side_frac: f64,
    /// Minimum module side in design units.
    pub min_side_px: i64,
}

impl SizingRule {
    /// Global scale factor and effective minimum side for the given core.
    ///
    /// The largest module (by `base = sqrt(area)`) is scaled to
    /// `max(min_side_px, round(die_min * max_side_frac))`; every other
    /// module follows with the same factor.
    fn scaling(&self, core: &Rect, grid: i64, max_base: f64) -> (f64, i64) {
        let die_min = core.w.max(1).min(core.h.max(1));
        let target_max = self
            .min_side_px
            .max((die_min as f64 * self.max_side_frac).round() as i64);
        let k = target_max as f64 / max_base;
        let min_side = (2 * grid).max(self.min_side_px);
        (k, min_side)
    }
}

/// A module to be sized and packed: instance, type and nominal area.
#[derive(Debug, Clone)]
pub struct ModuleSeed {
    pub inst: String,
    pub kind: String,
    pub area: f64,
    pub base: f64,
}

impl ModuleSeed {
    pub fn new(inst: String, kind: String, area: f64) -> Self {
        let base = area.sqrt().max(1.0);
        Self {
            inst,
            kind,
            area,
            base,
        }
    }
}

/// Pack sized modules left-to-right in rows inside the core.
///
/// Rows start one grid unit inside the core; when a module would cross the
/// core's right bound the cursor wraps below the tallest module of the
/// current row. Monotonic placement keeps this overlap-free without any
/// collision checking.
pub fn pack_rows(seeds: &[ModuleSeed], die: &Die, rule: SizingRule) -> Vec<Module> {
    let core = die.core();
    let max_base = seeds.iter().map(|s| s.base).fold(f64::MIN, f64::max);
    let max_base = if seeds.is_empty() { 1.0 } else { max_base };
    let (k, min_side) = rule.scaling(&core, die.grid, max_base);

    let mut out = Vec::with_capacity(seeds.len());
    let mut x = die.core_margin + die.grid;
    let mut y = die.core_margin + die.grid;
    let mut row_h = 0;
    for seed in seeds {
        let side = min_side.max((seed.base * k).round() as i64);
        if x + side > die.width - die.core_margin {
            x = die.core_margin + die.grid;
            y += row_h + die.grid;
            row_h = 0;
        }
        out.push(Module {
            inst: seed.inst.clone(),
            kind: seed.kind.clone(),
            area: seed.area,
            w: side,
            h: side,
            x,
            y,
            orient: "N".to_string(),
        });
        x += side + die.grid;
        row_h = row_h.max(side);
    }
    out
}

/// Rescale existing modules to the current core, preserving positions.
///
/// Each module is resized around the shared scale factor, its old top-left
/// is clamped back into the valid range, and if the rescaled rectangle now
/// collides it slides rightward one grid unit at a time until free or out
/// of room. Running out of room leaves the module at its last position,
/// possibly still overlapping; callers must recompute connectivity and
/// metrics afterwards.
pub fn autoscale_modules(design: &mut Design, rule: SizingRule) {
    if design.modules.is_empty() {
        return;
    }
    let core = design.die.core();
    let grid = design.die.grid;

    let bases: Vec<f64> = design
        .modules
        .iter()
        .map(|m| m.nominal_area().sqrt().max(1.0))
        .collect();
    let max_base = bases.iter().copied().fold(f64::MIN, f64::max);
    let (k, min_side) = rule.scaling(&core, grid, max_base);

    for i in 0..design.modules.len() {
        let side = min_side.max((bases[i] * k).round() as i64);
        {
            let m = &mut design.modules[i];
            m.w = side;
            m.h = side;
        }
        let inst = design.modules[i].inst.clone();
        let x = design.modules[i]
            .x
            .min(core.right() - side)
            .max(core.left());
        let y = design.modules[i]
            .y
            .min(core.bottom() - side)
            .max(core.top());

        let mut test = Rect::new(x, y, side, side);
        while occupied(&design.modules, Some(&inst), &test, HALO_PX)
            && test.x + side + grid <= core.right()
        {
            test.x += grid;
        }
        let m = &mut design.modules[i];
        m.x = test.x;
        m.y = test.y;
    }

    log::info!(
        "autoscale: {} modules rescaled, utilization ~{:.1}%",
        design.modules.len(),
        crate::metrics::core_utilization(design)
    );
}
