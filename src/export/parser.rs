// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Parsers for the emitted placement artifacts.
//!
//! Reading the macro and pin placement files back allows a placement to be
//! restored from a previous export. The lower-left flip applied on export
//! inverts losslessly given the same scale factor and die height.

use nom::{
    bytes::complete::take_while1,
    character::complete::{i64 as int64, one_of, space1},
    IResult, Parser,
};

use crate::design::Design;
use crate::error::{FloorplanError, Result};
use crate::geom::Side;

/// One expanded bus bit as written to the pin placement file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinBitPlacement {
    pub bit: String,
    pub side: Side,
    pub offset: i64,
}

/// One line of the macro placement file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroPlacement {
    pub inst: String,
    pub x: i64,
    pub y: i64,
    pub orient: String,
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| {
        c.is_alphanumeric() || "_[]$.:/\\-".contains(c)
    })(input)
}

fn side_letter(input: &str) -> IResult<&str, Side> {
    let (input, c) = one_of("NSWE")(input)?;
    let side = match c {
        'N' => Side::N,
        'S' => Side::S,
        'W' => Side::W,
        _ => Side::E,
    };
    Ok((input, side))
}

fn pin_line(input: &str) -> IResult<&str, PinBitPlacement> {
    let (input, (bit, _, side, _, offset)) =
        (identifier, space1, side_letter, space1, int64).parse(input)?;
    Ok((
        input,
        PinBitPlacement {
            bit: bit.to_string(),
            side,
            offset,
        },
    ))
}

fn macro_line(input: &str) -> IResult<&str, MacroPlacement> {
    let (input, (inst, _, x, _, y, _, orient)) =
        (identifier, space1, int64, space1, int64, space1, identifier).parse(input)?;
    Ok((
        input,
        MacroPlacement {
            inst: inst.to_string(),
            x,
            y,
            orient: orient.to_string(),
        },
    ))
}

/// Parse the whole pin placement file.
pub fn parse_pin_placement(text: &str) -> Result<Vec<PinBitPlacement>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            pin_line(line)
                .map(|(_, p)| p)
                .map_err(|e| FloorplanError::ArtifactParse(format!("pin line '{line}': {e}")))
        })
        .collect()
}

/// Parse the whole macro placement file.
pub fn parse_macro_placement(text: &str) -> Result<Vec<MacroPlacement>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            macro_line(line)
                .map(|(_, m)| m)
                .map_err(|e| FloorplanError::ArtifactParse(format!("macro line '{line}': {e}")))
        })
        .collect()
}

/// Apply parsed macro placements onto a design, inverting the export flip.
///
/// Placements naming unknown instances are skipped.
pub fn apply_macro_placement(design: &mut Design, placements: &[MacroPlacement], px_to_unit: f64) {
    let die_h = design.die.height;
    for pl in placements {
        if let Some(m) = design.module_mut(&pl.inst) {
            m.x = (pl.x as f64 / px_to_unit).round() as i64;
            m.y = die_h - (pl.y as f64 / px_to_unit).round() as i64 - m.h;
            m.orient = pl.orient.clone();
        }
    }
}

/// Base port name of an expanded bit name (`"data[3]"` -> `"data"`).
fn base_name(bit: &str) -> &str {
    match bit.rfind('[') {
        Some(idx) if bit.ends_with(']') => &bit[..idx],
        _ => bit,
    }
}

/// Reconstruct pin positions from their bit-0 offsets.
///
/// The along-side coordinate comes back from the offset relative to the
/// core's near edge, undoing the bus-centering shift; the cross coordinate
/// is the flush-edge line for the recorded side. Bits referencing unknown
/// ports are skipped.
pub fn apply_pin_placement(design: &mut Design, bits: &[PinBitPlacement], px_to_unit: f64) {
    let core = design.die.core();
    let size = design.pin_square();
    let step = ((design.die.grid as f64 * px_to_unit).round() as i64).max(1);

    for b in bits {
        let base = base_name(&b.bit);
        let is_bit0 = b.bit == base || b.bit.ends_with("[0]");
        if !is_bit0 {
            continue;
        }
        let Some(width) = design.port(base).map(|p| p.width) else {
            continue;
        };
        // Undo the centering applied when the bus run was laid out.
        let centering = step * (i64::from(width) - 1) / 2;
        let along = (b.offset as f64 / px_to_unit).round() as i64 + centering;

        let Some(pin) = design.port_mut(base) else {
            continue;
        };
        match b.side {
            Side::N => {
                pin.x = Some(core.left() + along);
                pin.y = Some(core.top() - size);
            }
            Side::S => {
                pin.x = Some(core.left() + along);
                pin.y = Some(core.bottom());
            }
            Side::W => {
                pin.x = Some(core.left() - size);
                pin.y = Some(core.bottom() - along);
            }
            Side::E => {
                pin.x = Some(core.right());
                pin.y = Some(core.bottom() - along);
            }
        }
        pin.side = Some(b.side);
    }
}
