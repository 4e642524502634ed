// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Connectivity aggregation from the persisted net list.
//!
//! Every net contributes its bus width once to each unordered pair of
//! distinct module instances it touches, and once to each (module, pin)
//! combination. Edge keys use the orientation-independent pair ordering,
//! so the aggregation is symmetric by construction.

use std::collections::{BTreeMap, BTreeSet};

use crate::design::Net;
use crate::geom::ordered_pair;

/// Weighted edges between placed objects, plus the largest weight seen.
///
/// `max_weight` exists for display scaling by callers; it is 1.0 when the
/// graph has no edges so ratios stay well-defined.
#[derive(Debug, Clone, Default)]
pub struct NetGraph {
    /// Module-to-module edges `(a, b, weight)` with `a <= b`.
    pub mm_edges: Vec<(String, String, f64)>,
    /// Module-to-pin edges `(module, pin, weight)`.
    pub mp_edges: Vec<(String, String, f64)>,
    pub max_weight: f64,
}

impl NetGraph {
    /// Aggregate edge weights over all nets.
    pub fn build(nets: &[Net]) -> Self {
        let mut mm: BTreeMap<(String, String), f64> = BTreeMap::new();
        let mut mp: BTreeMap<(String, String), f64> = BTreeMap::new();
        let mut maxw = 0.0_f64;

        for net in nets {
            let w = f64::from(net.bw);
            let mut mods: BTreeSet<&str> = BTreeSet::new();
            let mut pins: BTreeSet<&str> = BTreeSet::new();
            for ep in &net.endpoints {
                if let Some(pin) = ep.strip_prefix("top.") {
                    pins.insert(pin);
                } else {
                    mods.insert(ep.split_once('.').map_or(ep.as_str(), |(inst, _)| inst));
                }
            }

            let mods: Vec<&str> = mods.into_iter().collect();
            for i in 0..mods.len() {
                for j in i + 1..mods.len() {
                    let key = ordered_pair(mods[i].to_string(), mods[j].to_string());
                    let entry = mm.entry(key).or_insert(0.0);
                    *entry += w;
                    maxw = maxw.max(*entry);
                }
            }
            for m in &mods {
                for p in &pins {
                    let entry = mp
                        .entry((m.to_string(), p.to_string()))
                        .or_insert(0.0);
                    *entry += w;
                    maxw = maxw.max(*entry);
                }
            }
        }

        NetGraph {
            mm_edges: mm.into_iter().map(|((a, b), w)| (a, b, w)).collect(),
            mp_edges: mp.into_iter().map(|((m, p), w)| (m, p, w)).collect(),
            max_weight: if maxw > 0.0 { maxw } else { 1.0 },
        }
    }
}
