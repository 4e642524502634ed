// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::Path;

use super::Netlist;
use crate::error::Result;

pub struct NetlistReader;

impl NetlistReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Netlist> {
        let path_str = path.as_ref().display().to_string();
        println!("[LOAD] Loading netlist file: {path_str}");

        let content = fs::read_to_string(path)?;
        println!("[FILE] Netlist file size: {} bytes", content.len());

        let netlist: Netlist = serde_json::from_str(&content)?;
        println!("[INFO] Modules: {}", netlist.modules.len());
        Ok(netlist)
    }
}

impl Default for NetlistReader {
    fn default() -> Self {
        Self::new()
    }
}
