// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Placement quality metrics.
//!
//! HPWL is the half-perimeter of the bounding box of a net's resolved
//! endpoint centers. It is the standard placement estimate: cheap to
//! compute and well correlated with routed length, but a bound, not a
//! guarantee of routability.

use crate::design::Design;

/// Nets beyond this prefix (in declaration order) are left out of the
/// total. A deliberate cost cap for very large designs, not a semantic
/// truncation.
pub const NET_HPWL_CAP: usize = 500;

/// Half-perimeter wirelength of one net.
///
/// Endpoints that do not resolve to a placed module or pin are skipped;
/// a net with fewer than two resolved points has zero length.
pub fn net_hpwl(design: &Design, endpoints: &[String]) -> f64 {
    let mut pts: Vec<(f64, f64)> = Vec::new();
    for ep in endpoints {
        let center = if let Some(pin) = ep.strip_prefix("top.") {
            design.pin_center(pin)
        } else {
            design.module_center(ep.split_once('.').map_or(ep.as_str(), |(inst, _)| inst))
        };
        if let Some(c) = center {
            pts.push(c);
        }
    }
    if pts.len() < 2 {
        return 0.0;
    }
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (x, y) in pts {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    (max_x - min_x) + (max_y - min_y)
}

/// Total HPWL over the first [`NET_HPWL_CAP`] nets.
pub fn total_hpwl(design: &Design) -> f64 {
    design
        .nets
        .iter()
        .take(NET_HPWL_CAP)
        .map(|net| net_hpwl(design, &net.endpoints))
        .sum()
}

/// Percentage of the core area covered by module rectangles.
pub fn core_utilization(design: &Design) -> f64 {
    let core = design.die.core();
    let core_area = core.w * core.h;
    if core_area <= 0 {
        return 0.0;
    }
    let module_area: i64 = design.modules.iter().map(|m| m.w * m.h).sum();
    100.0 * module_area as f64 / core_area as f64
}
