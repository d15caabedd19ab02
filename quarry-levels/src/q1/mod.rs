/*
 * Copyright (C) Oscar Shrimpton 2020
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Parsing data from Q1-Style BSPs

pub mod entities;
pub mod faces;
mod file;
pub mod header;
pub mod models;
pub mod planes;
pub mod texinfo;
pub mod textures;
pub mod vertices;

pub use self::entities::{format_entities, parse_entities};
pub use self::file::Q1BspFile;
pub use self::header::{Header, LumpKind, BSP_VERSION};

use crate::types::{ParseError, Result};

/// Number of `record`-byte records in a lump, erroring if there's anything left over.
pub(crate) fn record_count(data: &[u8], record: usize, lump: LumpKind) -> Result<usize> {
    if data.len() % record != 0 {
        return Err(ParseError::BadLumpSize {
            lump: lump.name(),
            length: data.len(),
            record,
        });
    }

    Ok(data.len() / record)
}

/// Check `index` is less than `count`.
pub(crate) fn check_index(what: &'static str, index: i64, count: usize) -> Result<()> {
    if index < 0 || index >= count as i64 {
        return Err(ParseError::IndexOutOfBounds { what, index, count });
    }

    Ok(())
}
