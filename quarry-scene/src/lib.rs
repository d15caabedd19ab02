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

//! Common types for importing quake levels into other programs.

extern crate nalgebra as na;

#[macro_use]
extern crate derive_builder;

pub mod assemble;
pub mod classify;
pub mod components;
pub mod config;
pub mod scene;

pub use assemble::{assemble, decode_level, import_bsp, DecodedLevel};
pub use classify::classify;
pub use config::{EntityRules, ImportConfig, ImportConfigBuilder, TargetAxes};
pub use scene::{collection_names, ClassifiedEntity, EntityKind, ImportedScene, Material};

/// Alias for convenience
pub type Vector2 = na::base::Vector2<f32>;
/// Alias for convenience
pub type Vector3 = na::base::Vector3<f32>;
