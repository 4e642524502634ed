// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Placement validation for module moves.
//!
//! The validator is a pure state-transition check: it never mutates state
//! by itself and never notifies anyone. Callers apply an accepted position
//! and then rebuild connectivity and metrics themselves.

use crate::design::{Design, Module};
use crate::geom::{snap, Rect};

pub mod packer;
pub mod projector;

/// Clearance enforced around every module during overlap tests. The halo
/// is applied to both rectangles, so the minimum legal gap between two
/// module edges is twice this value.
pub const HALO_PX: i64 = 4;

/// True if `rect`, halo-expanded, intersects any module other than `ignore`.
pub fn occupied(modules: &[Module], ignore: Option<&str>, rect: &Rect, halo: i64) -> bool {
    let probe = rect.expanded(halo);
    modules
        .iter()
        .filter(|m| Some(m.inst.as_str()) != ignore)
        .any(|m| probe.intersects(&m.rect().expanded(halo)))
}

/// Outcome of a proposed module move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Move is legal at the snapped and clamped position.
    Accepted { x: i64, y: i64 },
    /// Move would collide; the caller must keep the last known-good position.
    Rejected,
}

/// Validate a proposed top-left position for module `inst`.
///
/// The position is snapped to the grid, clamped so the module stays inside
/// the core, and then collision-checked against every other module with
/// [`HALO_PX`] clearance. No partial move is ever produced.
pub fn propose_module_position(design: &Design, inst: &str, x: f64, y: f64) -> MoveOutcome {
    let Some(m) = design.module(inst) else {
        return MoveOutcome::Rejected;
    };
    let core = design.die.core();
    let grid = design.die.grid;

    let sx = snap(x, grid).min(core.right() - m.w).max(core.left());
    let sy = snap(y, grid).min(core.bottom() - m.h).max(core.top());

    let candidate = Rect::new(sx, sy, m.w, m.h);
    if occupied(&design.modules, Some(inst), &candidate, HALO_PX) {
        MoveOutcome::Rejected
    } else {
        MoveOutcome::Accepted { x: sx, y: sy }
    }
}

/// Validate and, on acceptance, persist a module move.
pub fn move_module(design: &mut Design, inst: &str, x: f64, y: f64) -> MoveOutcome {
    let outcome = propose_module_position(design, inst, x, y);
    if let MoveOutcome::Accepted { x, y } = outcome {
        if let Some(m) = design.module_mut(inst) {
            m.x = x;
            m.y = y;
        }
    }
    outcome
}
