// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::Path;

use serde_json::Value;

use super::Design;
use crate::error::Result;

pub struct DesignReader;

impl DesignReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Design> {
        let path_str = path.as_ref().display().to_string();
        println!("[LOAD] Loading design file: {path_str}");

        let content = fs::read_to_string(path)?;
        let design: Design = serde_json::from_str(&content)?;

        println!("[INFO] Modules: {}", design.modules.len());
        println!("[INFO] Ports: {}", design.ports.len());
        println!("[INFO] Nets: {}", design.nets.len());
        Ok(design)
    }

    /// Write a full design document, as done once at ingestion.
    pub fn write<P: AsRef<Path>>(&self, path: P, design: &Design) -> Result<()> {
        let text = serde_json::to_string_pretty(design)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Update an existing design file with the current placement state.
    ///
    /// Only the mutable placement fields of matching records are rewritten
    /// (module `x y w h orient`, port `x y side`); everything else in the
    /// file, including fields this engine does not know about, is preserved.
    pub fn save_positions<P: AsRef<Path>>(&self, path: P, design: &Design) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut doc: Value = serde_json::from_str(&content)?;

        if let Some(entries) = doc.get_mut("modules").and_then(Value::as_array_mut) {
            for entry in entries {
                let Some(inst) = entry.get("inst").and_then(Value::as_str) else {
                    continue;
                };
                let Some(current) = design.module(inst) else {
                    continue;
                };
                entry["x"] = current.x.into();
                entry["y"] = current.y.into();
                entry["w"] = current.w.into();
                entry["h"] = current.h.into();
                entry["orient"] = current.orient.clone().into();
            }
        }

        if let Some(entries) = doc.get_mut("ports").and_then(Value::as_array_mut) {
            for entry in entries {
                let Some(name) = entry.get("name").and_then(Value::as_str) else {
                    continue;
                };
                let Some(current) = design.port(name) else {
                    continue;
                };
                if let (Some(x), Some(y), Some(side)) = (current.x, current.y, current.side) {
                    entry["x"] = x.into();
                    entry["y"] = y.into();
                    entry["side"] = side.to_string().into();
                }
            }
        }

        fs::write(path, serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }
}

impl Default for DesignReader {
    fn default() -> Self {
        Self::new()
    }
}
