// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Netlist ingestion: build a placeable design from a gate-level netlist.
//!
//! Ports become perimeter pins (unplaced at this point), cells become
//! square modules sized from their area hints and row-packed into the core,
//! and nets are reconstructed bit by bit from the cell connection lists.

use std::collections::HashMap;

use serde_json::Value;

use super::{BitRef, Netlist};
use crate::design::{Design, Die, Net, Pin};
use crate::error::{FloorplanError, Result};
use crate::place::packer::{pack_rows, ModuleSeed, SizingRule};

/// Area assumed for a cell whose definition carries no usable `area_hint`.
pub const DEFAULT_AREA_HINT: f64 = 300.0;

/// Knobs for the ingestion pass.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub die_width: i64,
    pub die_height: i64,
    pub grid: i64,
    pub core_margin: i64,
    /// Fraction of the core's short side granted to the largest module.
    pub max_side_frac: f64,
    /// Minimum module side in design units.
    pub min_side_px: i64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            die_width: 1000,
            die_height: 1000,
            grid: 20,
            core_margin: 40,
            max_side_frac: 0.10,
            min_side_px: 24,
        }
    }
}

/// Tolerant float coercion: accepts numbers, numeric strings (possibly
/// quoted or padded), and falls back to `default` for anything else.
fn to_float(v: Option<&Value>, default: f64) -> f64 {
    match v {
        None => default,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s
            .trim()
            .trim_matches('"')
            .parse::<f64>()
            .unwrap_or(default),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(_) => default,
    }
}

/// Build a design document from the netlist's `top` module.
///
/// The only fatal condition is a `top` that is not among the netlist's
/// modules; the error message lists what is available.
pub fn build_design(netlist: &Netlist, top: &str, opts: &IngestOptions) -> Result<Design> {
    let Some(topm) = netlist.modules.get(top) else {
        return Err(FloorplanError::TopNotFound {
            top: top.to_string(),
            available: netlist.modules.keys().cloned().collect(),
        });
    };

    // Top-level ports: bus width from the bit list, empty lists are scalars.
    let mut ports = Vec::new();
    for (pname, pobj) in &topm.ports {
        let width = if pobj.bits.is_empty() {
            1
        } else {
            pobj.bits.len() as u32
        };
        ports.push(Pin {
            name: pname.clone(),
            dir: pobj.direction.clone(),
            width,
            side: None,
            x: None,
            y: None,
        });
    }

    // Nominal block sizes from the area hint of each cell's definition.
    let mut seeds = Vec::new();
    for (inst, cell) in &topm.cells {
        let attrs = netlist.modules.get(&cell.kind).map(|m| &m.attributes);
        let area = to_float(
            attrs.and_then(|a| a.get("area_hint")),
            DEFAULT_AREA_HINT,
        );
        seeds.push(ModuleSeed::new(inst.clone(), cell.kind.clone(), area));
    }

    let die = Die {
        width: opts.die_width,
        height: opts.die_height,
        grid: opts.grid,
        core_margin: opts.core_margin,
    };
    let rule = SizingRule {
        max_side_frac: opts.max_side_frac,
        min_side_px: opts.min_side_px,
    };
    let modules = pack_rows(&seeds, &die, rule);

    // Bit-level connectivity: which endpoints touch each bit.
    let mut bit_eps: HashMap<&BitRef, Vec<String>> = HashMap::new();
    for (inst, cell) in &topm.cells {
        for (port_name, bits) in &cell.connections {
            for bit in bits {
                bit_eps
                    .entry(bit)
                    .or_default()
                    .push(format!("{inst}.{port_name}"));
            }
        }
    }
    for (pname, pobj) in &topm.ports {
        for bit in &pobj.bits {
            bit_eps.entry(bit).or_default().push(format!("top.{pname}"));
        }
    }

    // A net is kept only when it still connects two distinct endpoints
    // after deduplication; endpoints are sorted for determinism.
    let mut nets = Vec::new();
    for (nname, nobj) in &topm.netnames {
        let mut eps: Vec<String> = nobj
            .bits
            .iter()
            .filter_map(|bit| bit_eps.get(bit))
            .flat_map(|v| v.iter().cloned())
            .collect();
        eps.sort();
        eps.dedup();
        if eps.len() >= 2 {
            let bw = nobj.bits.len().max(1) as u32;
            nets.push(Net {
                name: nname.clone(),
                weight: (eps.len() - 1) as u32,
                endpoints: eps,
                bw,
            });
        }
    }

    Ok(Design {
        die,
        top: top.to_string(),
        modules,
        ports,
        nets,
    })
}
