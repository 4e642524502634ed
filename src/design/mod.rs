// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Persisted design state: die, modules, top-level pins and nets.
//!
//! These records are created once, at netlist ingestion or when a saved
//! design is loaded, and are mutated only through the placement operations
//! in [`crate::place`]. The serialized form is the single source of truth
//! across sessions.

use serde::{Deserialize, Serialize};

use crate::geom::{Rect, Side};

fn default_die_width() -> i64 {
    1000
}

fn default_die_height() -> i64 {
    1000
}

fn default_grid() -> i64 {
    20
}

fn default_core_margin() -> i64 {
    40
}

fn default_orient() -> String {
    "N".to_string()
}

fn default_dir() -> String {
    "in".to_string()
}

fn default_width() -> u32 {
    1
}

fn default_bw() -> u32 {
    1
}

fn default_top() -> String {
    "top".to_string()
}

/// Die outline, snap grid and core margin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Die {
    #[serde(default = "default_die_width")]
    pub width: i64,
    #[serde(default = "default_die_height")]
    pub height: i64,
    #[serde(default = "default_grid")]
    pub grid: i64,
    #[serde(default = "default_core_margin")]
    pub core_margin: i64,
}

impl Die {
    /// Usable placement rectangle: the die inset by the core margin.
    pub fn core(&self) -> Rect {
        Rect::new(
            self.core_margin,
            self.core_margin,
            self.width - 2 * self.core_margin,
            self.height - 2 * self.core_margin,
        )
    }
}

/// A placed block instance (hard or soft macro).
///
/// `(x, y)` is the top-left corner in die coordinates. `area` is the nominal
/// area hint driving autoscale and is independent of `w * h`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub inst: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub area: f64,
    pub w: i64,
    pub h: i64,
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default = "default_orient")]
    pub orient: String,
}

impl Module {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn center(&self) -> (f64, f64) {
        self.rect().center()
    }

    /// Area used for autoscale: the stored hint, or the drawn footprint
    /// when no hint was recorded.
    pub fn nominal_area(&self) -> f64 {
        if self.area > 0.0 {
            self.area
        } else {
            (self.w * self.h).max(1) as f64
        }
    }
}

/// A top-level I/O terminal constrained to the core perimeter.
///
/// Position and side are absent until the pin has been placed, either from
/// saved state or by the initial distribution pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    pub name: String,
    #[serde(default = "default_dir")]
    pub dir: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i64>,
}

impl Pin {
    pub fn is_placed(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.side.is_some()
    }

    /// Center of the pin square, if the pin has been placed.
    pub fn center(&self, size: i64) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Rect::new(x, y, size, size).center()),
            _ => None,
        }
    }
}

/// A logical connection between module ports and/or top-level pins.
///
/// Endpoints are `"inst.port"` strings, or `"top.<pin>"` for top-level pins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    pub name: String,
    #[serde(default)]
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub weight: u32,
    #[serde(default = "default_bw")]
    pub bw: u32,
}

/// A complete floorplan design: the persisted document the engine operates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    pub die: Die,
    #[serde(default = "default_top")]
    pub top: String,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub ports: Vec<Pin>,
    #[serde(default)]
    pub nets: Vec<Net>,
}

impl Design {
    pub fn module(&self, inst: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.inst == inst)
    }

    pub fn module_mut(&mut self, inst: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.inst == inst)
    }

    pub fn port(&self, name: &str) -> Option<&Pin> {
        self.ports.iter().find(|p| p.name == name)
    }

    pub fn port_mut(&mut self, name: &str) -> Option<&mut Pin> {
        self.ports.iter_mut().find(|p| p.name == name)
    }

    /// Side length of the square a pin occupies on the perimeter.
    pub fn pin_square(&self) -> i64 {
        pin_square_size(self.die.grid)
    }

    pub fn module_center(&self, inst: &str) -> Option<(f64, f64)> {
        self.module(inst).map(Module::center)
    }

    pub fn pin_center(&self, name: &str) -> Option<(f64, f64)> {
        self.port(name).and_then(|p| p.center(self.pin_square()))
    }

    /// Sum of declared port bus widths: the number of pin bits an export
    /// is expected to emit.
    pub fn total_pin_bits(&self) -> usize {
        self.ports.iter().map(|p| p.width.max(1) as usize).sum()
    }
}

/// Pin square side for a given grid, floored at 10 units.
pub fn pin_square_size(grid: i64) -> i64 {
    ((0.8 * grid as f64) as i64).max(10)
}

pub mod reader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_is_die_inset_by_margin() {
        let die = Die {
            width: 1000,
            height: 800,
            grid: 20,
            core_margin: 40,
        };
        let core = die.core();
        assert_eq!(core, Rect::new(40, 40, 920, 720));
    }

    #[test]
    fn test_pin_square_size() {
        assert_eq!(pin_square_size(20), 16);
        assert_eq!(pin_square_size(10), 10);
        assert_eq!(pin_square_size(5), 10);
    }

    #[test]
    fn test_nominal_area_falls_back_to_footprint() {
        let mut m = Module {
            inst: "u1".to_string(),
            kind: "alu".to_string(),
            area: 0.0,
            w: 30,
            h: 40,
            x: 0,
            y: 0,
            orient: "N".to_string(),
        };
        assert_eq!(m.nominal_area(), 1200.0);
        m.area = 500.0;
        assert_eq!(m.nominal_area(), 500.0);
    }
}
