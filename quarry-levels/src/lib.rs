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

//! Parses Quake 1 (version 29) BSP files into geometry, textures and entities.
//!
//! The parsed file implements the traits in [`traits`], and the builders in
//! [`geometry`] and [`texture`] only rely on those traits.

extern crate nalgebra as na;

#[macro_use]
extern crate bitflags;

pub mod coords;
pub mod cursor;
pub mod geometry;
pub mod palette;
pub mod q1;
pub mod texture;
pub mod traits;
pub mod types;

pub mod prelude {
    pub use crate::coords::{CoordSystem, Q1System, YUpSystem};
    pub use crate::geometry::{build_meshes, HiddenSurfaces, Mesh, MeshFace};
    pub use crate::palette::Palette;
    pub use crate::q1::Q1BspFile;
    pub use crate::texture::{decode_textures, decode_textures_with, DecodedTexture};
    pub use crate::traits::*;
    pub use crate::types::{ParseError, Result, Rgb, Warned, Warning};
}
