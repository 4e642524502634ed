// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Error types for the floorplan engine

use thiserror::Error;

/// Errors that can occur while ingesting, transforming or exporting a design.
///
/// Recoverable per-operation conditions (a rejected module move, an endpoint
/// that does not resolve to a placed object) are not errors; they are modeled
/// as outcomes on the operations themselves.
#[derive(Debug, Error)]
pub enum FloorplanError {
    /// Requested top module is absent from the ingested netlist
    #[error("top module '{top}' is not in the netlist; available: {}", .available.join(", "))]
    TopNotFound { top: String, available: Vec<String> },

    /// A die size argument that is not of the form WxH
    #[error("invalid die size '{0}' (expected WxH, e.g. 1000x1000)")]
    InvalidDieSize(String),

    /// A placement artifact line that does not match the emitted format
    #[error("artifact parse error: {0}")]
    ArtifactParse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for floorplan operations
pub type Result<T> = std::result::Result<T, FloorplanError>;
