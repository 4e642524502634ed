//! ASIC Floorplan Engine Library
//!
//! This library provides the layout, connectivity and export core of an
//! ASIC floorplanning tool: geometric placement validation for macro
//! blocks, perimeter projection for I/O pins, netlist ingestion with
//! row packing and autoscale, HPWL estimation, and OpenLane artifact
//! export.

pub mod connectivity;
pub mod design;
pub mod error;
pub mod export;
pub mod geom;
pub mod metrics;
pub mod netlist;
pub mod place;

// Re-export commonly used types
pub use connectivity::NetGraph;
pub use design::{Design, Die, Module, Net, Pin};
pub use error::{FloorplanError, Result};
pub use geom::{Rect, Side};
