// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Geometry primitives shared by the placement, packing and export stages.
//!
//! The die coordinate system has its origin at the top-left corner with y
//! growing downward; the export stage flips it to the lower-left system the
//! backend expects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axis-aligned rectangle in die coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> i64 {
        self.x
    }

    pub fn right(&self) -> i64 {
        self.x + self.w
    }

    pub fn top(&self) -> i64 {
        self.y
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.w as f64 / 2.0,
            self.y as f64 + self.h as f64 / 2.0,
        )
    }

    /// Rectangle grown by `margin` on all four sides.
    pub fn expanded(&self, margin: i64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            w: self.w + 2 * margin,
            h: self.h + 2 * margin,
        }
    }

    /// Strict interior overlap: rectangles that only share an edge do not
    /// intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Core edge a pin is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    N,
    S,
    W,
    E,
}

impl Side {
    /// Tie-break priority used when a pin center is equidistant from
    /// several edges: first side in this order wins.
    pub const PRIORITY: [Side; 4] = [Side::N, Side::S, Side::W, Side::E];

    /// Side-major order of the pin placement artifact.
    pub const EMIT_ORDER: [Side; 4] = [Side::N, Side::S, Side::E, Side::W];

    /// North and south run along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::N | Side::S)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Side::N => "N",
            Side::S => "S",
            Side::W => "W",
            Side::E => "E",
        };
        write!(f, "{c}")
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Side::N),
            "S" => Ok(Side::S),
            "W" => Ok(Side::W),
            "E" => Ok(Side::E),
            other => Err(format!("unknown side '{other}'")),
        }
    }
}

/// Align `v` to the nearest multiple of `grid`.
///
/// The ratio rounds half away from zero, so `snap(30.0, 20)` is 40 and
/// `snap(-30.0, 20)` is -40.
pub fn snap(v: f64, grid: i64) -> i64 {
    ((v / grid as f64).round() as i64) * grid
}

/// Orientation-independent key for unordered relations.
pub fn ordered_pair<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_to_grid() {
        assert_eq!(snap(0.0, 20), 0);
        assert_eq!(snap(9.0, 20), 0);
        assert_eq!(snap(10.0, 20), 20);
        assert_eq!(snap(163.0, 20), 160);
        assert_eq!(snap(177.0, 20), 180);
        assert_eq!(snap(-30.0, 20), -40);
    }

    #[test]
    fn test_snap_is_idempotent() {
        for g in [1i64, 5, 7, 20] {
            for v in [-123.0, -7.5, 0.0, 3.0, 42.0, 999.0] {
                let once = snap(v, g);
                assert_eq!(snap(once as f64, g), once, "v={v} g={g}");
            }
        }
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        let c = Rect::new(9, 0, 10, 10);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_expanded_intersection_models_halo_gap() {
        // With a halo of 4 on both rectangles the minimum legal edge gap is 8.
        let a = Rect::new(0, 0, 10, 10).expanded(4);
        let ok = Rect::new(18, 0, 10, 10).expanded(4);
        let too_close = Rect::new(17, 0, 10, 10).expanded(4);
        assert!(!a.intersects(&ok));
        assert!(a.intersects(&too_close));
    }

    #[test]
    fn test_ordered_pair_is_symmetric() {
        assert_eq!(ordered_pair("u2", "u1"), ordered_pair("u1", "u2"));
        assert_eq!(ordered_pair(3, 7), (3, 7));
        assert_eq!(ordered_pair(7, 3), (3, 7));
    }

    #[test]
    fn test_side_round_trip() {
        for side in Side::PRIORITY {
            assert_eq!(side.to_string().parse::<Side>().unwrap(), side);
        }
    }
}
