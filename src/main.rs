// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use asic_floorplan::connectivity::NetGraph;
use asic_floorplan::design::reader::DesignReader;
use asic_floorplan::error::{FloorplanError, Result};
use asic_floorplan::export;
use asic_floorplan::metrics;
use asic_floorplan::netlist::ingest::{build_design, IngestOptions};
use asic_floorplan::netlist::reader::NetlistReader;
use asic_floorplan::place::packer::{autoscale_modules, SizingRule};
use asic_floorplan::place::projector::{move_pin, place_pins_initial};
use asic_floorplan::place::{move_module, MoveOutcome};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ASIC floorplan layout engine with OpenLane export",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a design file from a Yosys gate-level netlist
    Ingest {
        #[arg(long, default_value = "artifacts/netlist.json")]
        netlist: PathBuf,
        #[arg(long, help = "Top module name, must exist in the netlist")]
        top: String,
        #[arg(long, default_value = "artifacts/design.json")]
        out: PathBuf,
        #[arg(long, default_value = "1000x1000", help = "Die size WxH in design units")]
        die: String,
        #[arg(long, default_value_t = 20)]
        grid: i64,
        #[arg(long, default_value_t = 40)]
        core_margin: i64,
        #[arg(
            long,
            default_value_t = 0.10,
            help = "Fraction of the core short side granted to the largest module"
        )]
        max_side_frac: f64,
        #[arg(long, default_value_t = 24, help = "Minimum module side (2x grid also applies)")]
        min_side: i64,
    },
    /// Rescale all modules to the core, preserving positions where possible
    Autoscale {
        #[arg(long, default_value = "artifacts/design.json")]
        design: PathBuf,
        #[arg(long, default_value_t = 0.35)]
        max_side_frac: f64,
        #[arg(long, default_value_t = 32)]
        min_side: i64,
    },
    /// Move a module through the placement validator (snap, clamp, no overlap)
    Move {
        #[arg(long, default_value = "artifacts/design.json")]
        design: PathBuf,
        #[arg(long)]
        inst: String,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    /// Move a pin; it is projected onto the nearest core edge
    MovePin {
        #[arg(long, default_value = "artifacts/design.json")]
        design: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    /// Print placement metrics for a design
    Stats {
        #[arg(long, default_value = "artifacts/design.json")]
        design: PathBuf,
    },
    /// Write the OpenLane artifacts for the current placement
    Export {
        #[arg(long, default_value = "artifacts/design.json")]
        design: PathBuf,
        #[arg(long, default_value = "artifacts/openlane_export")]
        outdir: PathBuf,
        #[arg(long, default_value_t = 1.0, help = "Design units to backend units scale")]
        px_to_unit: f64,
    },
}

fn parse_die_size(s: &str) -> Result<(i64, i64)> {
    let norm = s.to_lowercase().replace('×', "x");
    let Some((w, h)) = norm.split_once('x') else {
        return Err(FloorplanError::InvalidDieSize(s.to_string()));
    };
    let w = w
        .trim()
        .parse::<i64>()
        .map_err(|_| FloorplanError::InvalidDieSize(s.to_string()))?;
    let h = h
        .trim()
        .parse::<i64>()
        .map_err(|_| FloorplanError::InvalidDieSize(s.to_string()))?;
    Ok((w, h))
}

fn print_metrics(design: &asic_floorplan::Design) {
    let graph = NetGraph::build(&design.nets);
    println!(
        "[INFO] HPWL ~ {:.1} | Mods={} Pins={}",
        metrics::total_hpwl(design),
        design.modules.len(),
        design.ports.len()
    );
    println!(
        "[INFO] Edges: {} module-module, {} module-pin (max weight {:.1})",
        graph.mm_edges.len(),
        graph.mp_edges.len(),
        graph.max_weight
    );
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Ingest {
            netlist,
            top,
            out,
            die,
            grid,
            core_margin,
            max_side_frac,
            min_side,
        } => {
            let (die_width, die_height) = parse_die_size(&die)?;
            let parsed = NetlistReader::new().read(&netlist)?;
            let opts = IngestOptions {
                die_width,
                die_height,
                grid,
                core_margin,
                max_side_frac,
                min_side_px: min_side,
            };
            let design = build_design(&parsed, &top, &opts)?;
            if let Some(dir) = out.parent() {
                if !dir.as_os_str().is_empty() {
                    std::fs::create_dir_all(dir)?;
                }
            }
            DesignReader::new().write(&out, &design)?;
            println!("[PASS] Design written to {}", out.display());
        }
        Command::Autoscale {
            design: path,
            max_side_frac,
            min_side,
        } => {
            let mut design = DesignReader::new().read(&path)?;
            place_pins_initial(&mut design);
            autoscale_modules(
                &mut design,
                SizingRule {
                    max_side_frac,
                    min_side_px: min_side,
                },
            );
            println!(
                "[PASS] Autoscale done | utilization ~{:.1}%",
                metrics::core_utilization(&design)
            );
            print_metrics(&design);
            DesignReader::new().save_positions(&path, &design)?;
        }
        Command::Move {
            design: path,
            inst,
            x,
            y,
        } => {
            let mut design = DesignReader::new().read(&path)?;
            place_pins_initial(&mut design);
            match move_module(&mut design, &inst, x, y) {
                MoveOutcome::Accepted { x, y } => {
                    println!("[PASS] {inst} placed at ({x}, {y})");
                    print_metrics(&design);
                    DesignReader::new().save_positions(&path, &design)?;
                }
                MoveOutcome::Rejected => {
                    println!("[WARN] Move rejected; keeping last known-good position");
                }
            }
        }
        Command::MovePin {
            design: path,
            name,
            x,
            y,
        } => {
            let mut design = DesignReader::new().read(&path)?;
            place_pins_initial(&mut design);
            match move_pin(&mut design, &name, x, y) {
                Some((px, py, side)) => {
                    println!("[PASS] {name} projected to ({px}, {py}) on side {side}");
                    print_metrics(&design);
                    DesignReader::new().save_positions(&path, &design)?;
                }
                None => {
                    println!("[WARN] No pin named '{name}' in the design");
                }
            }
        }
        Command::Stats { design: path } => {
            let mut design = DesignReader::new().read(&path)?;
            place_pins_initial(&mut design);
            print_metrics(&design);
            println!(
                "[INFO] Utilization ~{:.1}%",
                metrics::core_utilization(&design)
            );
        }
        Command::Export {
            design: path,
            outdir,
            px_to_unit,
        } => {
            let mut design = DesignReader::new().read(&path)?;
            place_pins_initial(&mut design);
            let report = export::export_openlane(&design, &outdir, px_to_unit)?;
            println!(
                "[PASS] Exported to {} | files: {}",
                outdir.display(),
                report.produced.join(", ")
            );
            if !report.pin_bits_consistent() {
                println!(
                    "[WARN] Pin bits exported ({}) != sum of port widths ({})",
                    report.pin_bits_written, report.pin_bits_expected
                );
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[FAIL] {e}");
            ExitCode::FAILURE
        }
    }
}
