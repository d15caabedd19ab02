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

//! Options for importing a level

use quarry_levels::coords::{Q1System, SwizzleFromTo, Swizzler, YUpSystem};
use quarry_levels::geometry::HiddenSurfaces;
use serde::{Deserialize, Serialize};

use crate::Vector3;

/// Which way is up in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetAxes {
    /// Keep quake's axes: X east, Y north, Z up
    ZUp,

    /// X east, Y up, Z south. Still right-handed.
    YUp,
}

impl Default for TargetAxes {
    fn default() -> TargetAxes {
        TargetAxes::ZUp
    }
}

impl TargetAxes {
    /// Move a point from quake's axes to these ones.
    pub fn convert(self, mut point: Vector3) -> Vector3 {
        if self == TargetAxes::YUp {
            <Swizzler as SwizzleFromTo<Q1System, YUpSystem>>::swizzle(&mut point);
        }

        point
    }
}

/// Which classnames become which kind of object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityRules {
    /// Classnames that are lights, as well as any starting with one of `light_prefixes`
    pub light_classes: Vec<String>,
    pub light_prefixes: Vec<String>,

    pub camera_classes: Vec<String>,

    /// The camera the level starts from
    pub primary_camera: String,

    /// Classnames imported as markers when `create_entities` is set
    pub marker_prefixes: Vec<String>,
}

fn strings(x: &[&str]) -> Vec<String> {
    x.iter().map(|x| x.to_string()).collect()
}

impl Default for EntityRules {
    fn default() -> EntityRules {
        EntityRules {
            light_classes: strings(&["light"]),
            light_prefixes: strings(&["light_"]),
            camera_classes: strings(&["info_intermission", "info_player_start"]),
            primary_camera: "info_player_start".to_string(),
            marker_prefixes: strings(&["monster_", "weapon_", "item_", "ammo_"]),
        }
    }
}

impl EntityRules {
    pub fn is_light(&self, classname: &str) -> bool {
        self.light_classes.iter().any(|x| x == classname)
            || self
                .light_prefixes
                .iter()
                .any(|x| classname.starts_with(x.as_str()))
    }

    pub fn is_camera(&self, classname: &str) -> bool {
        self.camera_classes.iter().any(|x| x == classname)
    }

    pub fn is_primary_camera(&self, classname: &str) -> bool {
        self.primary_camera == classname
    }

    pub fn is_marker(&self, classname: &str) -> bool {
        self.marker_prefixes
            .iter()
            .any(|x| classname.starts_with(x.as_str()))
    }
}

/// Everything that changes how a level is imported.
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(public, default)]
#[serde(default)]
pub struct ImportConfig {
    /// Uniform scale applied to every position
    pub scale: f32,

    /// Attach decoded images to materials
    pub create_materials: bool,

    /// Drop faces with hidden textures, like triggers and clip brushes
    pub remove_hidden: bool,

    /// Added to every colour channel of decoded textures, in [0, 1] units
    pub brightness_adjust: f32,

    /// Only import model 0
    pub worldspawn_only: bool,

    pub create_lights: bool,
    pub create_cameras: bool,

    /// Import entities matching `entity_rules.marker_prefixes` as markers
    pub create_entities: bool,

    /// Import every entity with an origin as a marker
    pub import_all: bool,

    /// Used for lights without a `light` key
    pub default_light_intensity: f32,

    pub target_axes: TargetAxes,

    /// Reverse every face, for programs that treat counter-clockwise as the front
    pub reverse_winding: bool,

    pub hidden_surfaces: HiddenSurfaces,
    pub entity_rules: EntityRules,
}

impl Default for ImportConfig {
    fn default() -> ImportConfig {
        ImportConfig {
            scale: 0.05,
            create_materials: true,
            remove_hidden: true,
            brightness_adjust: 0.0,
            worldspawn_only: false,
            create_lights: false,
            create_cameras: false,
            create_entities: false,
            import_all: false,
            default_light_intensity: 300.0,
            target_axes: TargetAxes::ZUp,
            reverse_winding: false,
            hidden_surfaces: HiddenSurfaces::default(),
            entity_rules: EntityRules::default(),
        }
    }
}

#[test]
fn builder_defaults() {
    let config = ImportConfigBuilder::default()
        .scale(1.0)
        .create_lights(true)
        .build()
        .unwrap();

    assert_eq!(config.scale, 1.0);
    assert!(config.create_lights);
    assert!(config.remove_hidden);
    assert_eq!(config.default_light_intensity, 300.0);
    assert_eq!(config.hidden_surfaces, HiddenSurfaces::default());
}

#[test]
fn config_from_json() {
    let config: ImportConfig = serde_json::from_str(
        r#"{ "scale": 1.0, "hidden_surfaces": { "prefixes": ["BLACK", "Clip"] } }"#,
    )
    .unwrap();

    assert_eq!(config.scale, 1.0);
    assert!(config.remove_hidden);
    assert!(config.hidden_surfaces.is_hidden("black"));
    assert!(config.hidden_surfaces.is_hidden("CLIP_wall"));
    assert!(!config.hidden_surfaces.is_hidden("trigger"));
    assert_eq!(config.entity_rules, EntityRules::default());
}

#[test]
fn entity_rules() {
    let rules = EntityRules::default();

    assert!(rules.is_light("light"));
    assert!(rules.is_light("light_torch_small_walltorch"));
    assert!(!rules.is_light("lightning"));
    assert!(rules.is_camera("info_intermission"));
    assert!(rules.is_primary_camera("info_player_start"));
    assert!(!rules.is_primary_camera("info_intermission"));
    assert!(rules.is_marker("monster_ogre"));
    assert!(!rules.is_marker("func_door"));
}

#[test]
fn y_up_conversion() {
    let point = Vector3::new(1.0, 2.0, 3.0);

    assert_eq!(TargetAxes::ZUp.convert(point), point);
    assert_eq!(TargetAxes::YUp.convert(point), Vector3::new(1.0, 3.0, -2.0));
}
