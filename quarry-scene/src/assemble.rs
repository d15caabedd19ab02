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

//! Puts geometry, textures and entities together into a scene

use log::{debug, info};
use quarry_levels::prelude::*;

use crate::classify::classify;
use crate::config::{ImportConfig, TargetAxes};
use crate::scene::{ClassifiedEntity, EntityKind, ImportedScene, Material};

/// Name of the material used by faces whose texture couldn't be found
pub const MISSING_MATERIAL: &str = "missing";

/// Everything decoded from a level, before any filtering.
#[derive(Debug, Clone)]
pub struct DecodedLevel {
    /// One per model, already in the target axes but not scaled
    pub meshes: Vec<Mesh>,

    /// Name of the texture in each miptex slot, if the slot has a record
    pub slots: Vec<Option<String>>,

    /// Empty unless materials are being created
    pub textures: Vec<DecodedTexture>,

    pub entities: Vec<ClassifiedEntity>,
    pub warnings: Vec<Warning>,
}

/// Parse and decode `data`. Only fails if the file is corrupt or not a version 29 BSP.
pub fn decode_level(data: &[u8], palette: &Palette, config: &ImportConfig) -> Result<DecodedLevel> {
    let mut warnings = Vec::new();
    let file = Q1BspFile::parse_file(data)?.collect_into(&mut warnings);

    match config.target_axes {
        TargetAxes::ZUp => decode_file(&file, palette, config, warnings),
        TargetAxes::YUp => decode_file(
            &file.swizzle_to::<YUpSystem>(),
            palette,
            config,
            warnings,
        ),
    }
}

fn decode_file<S: CoordSystem>(
    file: &Q1BspFile<S>,
    palette: &Palette,
    config: &ImportConfig,
    mut warnings: Vec<Warning>,
) -> Result<DecodedLevel> {
    let meshes = build_meshes::<S, _>(file, &config.hidden_surfaces)?
        .collect_into(&mut warnings)
        .into_vec();

    let textures = if config.create_materials {
        decode_textures_with(
            file,
            palette,
            config.brightness_adjust,
            &config.hidden_surfaces,
        )
        .collect_into(&mut warnings)
    } else {
        Vec::new()
    };

    let slots = file
        .textures_iter()
        .map(|x| x.as_ref().map(|x| x.name.clone()))
        .collect();

    let entities = classify(file.entities_iter(), config);

    Ok(DecodedLevel {
        meshes,
        slots,
        textures,
        entities,
        warnings,
    })
}

/// Stable colour for a material with no image, from a hash of its name.
/// Each channel is between 0.1 and 1.
fn fallback_color(name: &str) -> [f32; 3] {
    // FNV-1a
    let hash = name.bytes().fold(0x811c_9dc5u32, |hash, x| {
        (hash ^ x as u32).wrapping_mul(0x0100_0193)
    });

    let channel = |shift: u32| 0.1 + 0.9 * ((hash >> shift) & 0xff) as f32 / 255.0;
    [channel(0), channel(8), channel(16)]
}

fn build_materials(
    slots: &[Option<String>],
    textures: &[DecodedTexture],
    meshes: &[Mesh],
) -> Vec<Material> {
    let mut materials: Vec<Material> = slots
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = name.clone().unwrap_or_else(|| format!("miptex_{}", idx));
            let texture = textures.iter().position(|x| x.miptex_idx == idx as u32);
            let (is_emissive, uses_alpha) = match texture {
                Some(tex) => (textures[tex].is_emissive, textures[tex].uses_alpha),
                None => (false, name.starts_with('{')),
            };

            Material {
                fallback_color: fallback_color(&name),
                name,
                texture,
                is_emissive,
                uses_alpha,
            }
        })
        .collect();

    let missing = slots.len() as u32;
    if meshes
        .iter()
        .flat_map(|x| x.faces.iter())
        .any(|x| x.material == missing)
    {
        materials.push(Material {
            name: MISSING_MATERIAL.to_string(),
            texture: None,
            fallback_color: fallback_color(MISSING_MATERIAL),
            is_emissive: false,
            uses_alpha: false,
        });
    }

    materials
}

/// Apply `config` to a decoded level.
///
/// In order: keep only model 0 if `worldspawn_only`, drop hidden faces if `remove_hidden`,
/// scale and optionally reverse what's left, then drop meshes without any faces.
pub fn assemble(level: DecodedLevel, config: &ImportConfig) -> ImportedScene {
    let DecodedLevel {
        mut meshes,
        slots,
        textures,
        entities,
        warnings,
    } = level;

    if config.worldspawn_only {
        meshes.retain(|x| x.model_idx == 0);
    }

    for mesh in meshes.iter_mut() {
        if config.remove_hidden {
            mesh.retain_faces(|x| !x.hidden);
        }

        let scale = config.scale;
        mesh.map_positions(|x| *x *= scale);

        if config.reverse_winding {
            mesh.reverse_winding();
        }
    }

    meshes.retain(|x| {
        if x.is_empty() {
            debug!("Dropping {}, it has no faces left", x.name);
        }
        !x.is_empty()
    });

    let materials = build_materials(&slots, &textures, &meshes);

    let entities: Vec<_> = entities
        .into_iter()
        .filter(|x| x.kind != EntityKind::Ignored)
        .collect();

    let scene = ImportedScene {
        meshes,
        materials,
        textures,
        entities,
        warnings,
    };

    info!(
        "Imported {} meshes, {} materials, {} textures, {} lights, {} cameras, {} markers ({} warnings)",
        scene.meshes.len(),
        scene.materials.len(),
        scene.textures.len(),
        scene.lights().count(),
        scene.cameras().count(),
        scene.markers().count(),
        scene.warnings.len()
    );

    scene
}

/// Import a level in one go.
pub fn import_bsp(data: &[u8], palette: &Palette, config: &ImportConfig) -> Result<ImportedScene> {
    Ok(assemble(decode_level(data, palette, config)?, config))
}

#[test]
fn fallback_colors_stable() {
    let a = fallback_color("wizmet1_2");

    assert_eq!(a, fallback_color("wizmet1_2"));
    assert_ne!(a, fallback_color("wizmet1_3"));
    assert!(a.iter().all(|x| *x >= 0.1 && *x <= 1.0));
}
