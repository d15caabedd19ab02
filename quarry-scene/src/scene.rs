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

//! The result of an import

use quarry_levels::geometry::Mesh;
use quarry_levels::texture::DecodedTexture;
use quarry_levels::traits::entities::Entity;
use quarry_levels::types::Warning;
use serde::Serialize;

use crate::components::{CameraSettings, LightSettings, Transform};

/// What an entity was turned into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum EntityKind {
    Light(LightSettings),
    Camera(CameraSettings),
    /// An empty object marking where something is
    Marker,
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassifiedEntity {
    pub classname: String,
    pub kind: EntityKind,
    pub transform: Transform,

    /// Every key/value pair the entity had
    pub attributes: Entity,
}

/// One material per miptex slot, plus one for faces whose texture couldn't be found.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Material {
    pub name: String,

    /// Index into [`ImportedScene::textures`], if there's an image.
    pub texture: Option<usize>,

    /// Stand-in colour for when there's no image. Normalised RGB.
    pub fallback_color: [f32; 3],

    pub is_emissive: bool,
    pub uses_alpha: bool,
}

/// A decoded level, ready to be turned into objects in another program.
#[derive(Clone, Debug, Serialize)]
pub struct ImportedScene {
    pub meshes: Vec<Mesh>,

    /// Face materials index into this
    pub materials: Vec<Material>,

    #[serde(skip)]
    pub textures: Vec<DecodedTexture>,

    pub entities: Vec<ClassifiedEntity>,

    /// Everything that went wrong but didn't stop the import
    pub warnings: Vec<Warning>,
}

impl ImportedScene {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn lights(&self) -> impl Iterator<Item = (&ClassifiedEntity, &LightSettings)> {
        self.entities.iter().filter_map(|x| match &x.kind {
            EntityKind::Light(light) => Some((x, light)),
            _ => None,
        })
    }

    pub fn cameras(&self) -> impl Iterator<Item = (&ClassifiedEntity, &CameraSettings)> {
        self.entities.iter().filter_map(|x| match &x.kind {
            EntityKind::Camera(camera) => Some((x, camera)),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = &ClassifiedEntity> {
        self.entities
            .iter()
            .filter(|x| x.kind == EntityKind::Marker)
    }
}

/// Names for the level, its entities and its lights, when they're put into separate groups.
pub fn collection_names(file_stem: &str) -> (String, String, String) {
    (
        file_stem.to_string(),
        format!("{}_entities", file_stem),
        format!("{}_lights", file_stem),
    )
}

#[test]
fn collection_names_from_stem() {
    assert_eq!(
        collection_names("e1m1"),
        (
            "e1m1".to_string(),
            "e1m1_entities".to_string(),
            "e1m1_lights".to_string()
        )
    );
}
