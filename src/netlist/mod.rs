// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Gate-level netlist schema, as emitted by `yosys -o netlist.json`.
//!
//! Maps are [`IndexMap`]s because the JSON object order is semantic here:
//! cell order drives the initial packing order, `netnames` order drives the
//! HPWL net cap, and port order drives the initial pin distribution.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

fn default_direction() -> String {
    "in".to_string()
}

/// One entry of a connection bit list: a net id, or a constant driver
/// (`"0"`, `"1"`, `"x"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum BitRef {
    Net(u64),
    Const(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetlistPort {
    #[serde(default = "default_direction")]
    pub direction: String,
    #[serde(default)]
    pub bits: Vec<BitRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetlistCell {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub connections: IndexMap<String, Vec<BitRef>>,
}

/// A named net: the list of bits it spans.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetlistNet {
    #[serde(default)]
    pub bits: Vec<BitRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetlistModule {
    #[serde(default)]
    pub ports: IndexMap<String, NetlistPort>,
    #[serde(default)]
    pub cells: IndexMap<String, NetlistCell>,
    #[serde(default)]
    pub netnames: IndexMap<String, NetlistNet>,
    #[serde(default)]
    pub attributes: IndexMap<String, Value>,
}

/// A parsed netlist document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Netlist {
    #[serde(default)]
    pub modules: IndexMap<String, NetlistModule>,
}

pub mod ingest;
pub mod reader;
