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

use serde::{Deserialize, Serialize};

use crate::Vector3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position of the object, already scaled and in the target axes
    pub position: Vector3,

    /// Rotation of the object (pitch, yaw, roll in radians).
    /// Positive pitch looks down, and yaw 0 faces along +X.
    pub rotation: Vector3,
}

impl Default for Transform {
    fn default() -> Transform {
        Transform {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// FOV (radians)
    pub fov: f32,

    /// The view the player starts with
    pub is_primary: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightSettings {
    /// Brightness, in the level's own units (300 is a typical light)
    pub intensity: f32,

    /// Normalised RGB
    pub color: [f32; 3],

    /// Light style, for flickering and switchable lights. 0 is steady.
    pub style: u8,
}
