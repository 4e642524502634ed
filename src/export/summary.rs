// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::design::{Design, Module};
use crate::error::Result;

#[derive(Debug, Serialize)]
pub struct ModuleCsvRecord {
    #[serde(rename = "Instance")]
    pub inst: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Size")]
    pub size: String,
    #[serde(rename = "Area")]
    pub area: f64,
    #[serde(rename = "X")]
    pub x: i64,
    #[serde(rename = "Y")]
    pub y: i64,
    #[serde(rename = "Orient")]
    pub orient: String,
}

/// Convert a placed module to a summary record
fn module_to_csv_record(module: &Module) -> ModuleCsvRecord {
    ModuleCsvRecord {
        inst: module.inst.clone(),
        kind: module.kind.clone(),
        size: format!("{} x {}", module.w, module.h),
        area: module.area,
        x: module.x,
        y: module.y,
        orient: module.orient.clone(),
    }
}

/// Export the module placement summary to a CSV file
pub fn export_modules_csv<P: AsRef<Path>>(design: &Design, file_path: P) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    for module in &design.modules {
        let record = module_to_csv_record(module);
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}
