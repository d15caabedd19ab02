// Copyright (C) 2019 Oscar Shrimpton
//
// This file is part of quarry.
//
// quarry is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// quarry is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with quarry.  If not, see <http://www.gnu.org/licenses/>.

//! Various types used in parsed BSP files.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGB Colour (0-255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Interpret the given bytes as an RGB colour.
    pub fn from_bytes(bytes: [u8; 3]) -> Rgb {
        Rgb {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
        }
    }
}

/// An error that stops a file from being parsed at all.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unsupported BSP version {0}, expected 29")]
    BadVersion(i32),

    #[error("Read of {len} bytes at offset {offset} overruns buffer of {size} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("{what} index {index} out of range (have {count})")]
    IndexOutOfBounds {
        what: &'static str,
        index: i64,
        count: usize,
    },

    #[error("{lump} lump is {length} bytes, not a multiple of the {record} byte record size")]
    BadLumpSize {
        lump: &'static str,
        length: usize,
        record: usize,
    },

    #[error("Palette must be exactly 768 bytes, got {0}")]
    BadPalette(usize),
}

/// Standard result type.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Something wrong with the file that we can work around.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum Warning {
    #[error("Malformed entity at byte {offset}: {reason}")]
    MalformedEntity { offset: usize, reason: String },

    #[error("Texture {miptex} ({}) has no embedded image", .name.as_deref().unwrap_or("unnamed"))]
    UnknownTexture { miptex: i32, name: Option<String> },

    #[error("Face {face} of model {model} has only {vertices} distinct vertices")]
    DegenerateFace {
        model: u32,
        face: u32,
        vertices: usize,
    },
}

/// A value, along with any problems that were worked around to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Warned<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Warned<T> {
    pub fn new(value: T) -> Warned<T> {
        Warned {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Vec<Warning>) -> Warned<T> {
        Warned { value, warnings }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Warned<U> {
        Warned {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Move this value's warnings onto the end of `into`, returning the value.
    pub fn collect_into(self, into: &mut Vec<Warning>) -> T {
        into.extend(self.warnings);
        self.value
    }
}
