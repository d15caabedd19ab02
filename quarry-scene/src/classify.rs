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

//! Works out what each entity should become

use log::debug;
use quarry_levels::traits::entities::Entity;

use crate::components::{CameraSettings, LightSettings, Transform};
use crate::config::ImportConfig;
use crate::scene::{ClassifiedEntity, EntityKind};
use crate::Vector3;

/// Quake's field of view
const DEFAULT_FOV: f32 = 90.0;

/// `angle` values meaning straight up and straight down
const ANGLE_UP: f32 = -1.0;
const ANGLE_DOWN: f32 = -2.0;

/// Parse three space separated numbers
fn parse_vec3(value: &str) -> Option<Vector3> {
    let mut parts = value.split_whitespace().map(|x| x.parse::<f32>());
    let vec = Vector3::new(
        parts.next()?.ok()?,
        parts.next()?.ok()?,
        parts.next()?.ok()?,
    );

    if parts.next().is_some() {
        return None;
    }

    Some(vec)
}

/// Pitch, yaw and roll in radians, from `mangle`, `angles` or `angle`.
fn parse_rotation(entity: &Entity) -> Vector3 {
    let angles = entity
        .get("mangle")
        .or_else(|| entity.get("angles"))
        .and_then(parse_vec3);
    if let Some(angles) = angles {
        return angles.map(f32::to_radians);
    }

    let angle = entity
        .get("angle")
        .and_then(|x| x.trim().parse::<f32>().ok())
        .unwrap_or(0.0);

    // Positive pitch looks down
    let rotation = if angle == ANGLE_UP {
        Vector3::new(-90.0, 0.0, 0.0)
    } else if angle == ANGLE_DOWN {
        Vector3::new(90.0, 0.0, 0.0)
    } else {
        Vector3::new(0.0, angle, 0.0)
    };

    rotation.map(f32::to_radians)
}

fn parse_light(entity: &Entity, config: &ImportConfig) -> LightSettings {
    let intensity = entity
        .get("light")
        .and_then(|x| x.trim().parse::<f32>().ok())
        .unwrap_or(config.default_light_intensity);

    let mut color = entity
        .get("_color")
        .or_else(|| entity.get("color"))
        .and_then(parse_vec3)
        .unwrap_or_else(|| Vector3::new(1.0, 1.0, 1.0));
    if color.iter().any(|x| *x > 1.0) {
        color /= 255.0;
    }

    let style = entity
        .get("style")
        .and_then(|x| x.trim().parse::<u8>().ok())
        .unwrap_or(0);

    LightSettings {
        intensity,
        color: [color.x, color.y, color.z],
        style,
    }
}

/// Decide what each entity becomes. The first rule that matches wins:
///
///   1. Lights, if `create_lights` is set. Otherwise they're ignored.
///   2. Cameras, if `create_cameras` is set.
///   3. Markers, for anything with an origin if `import_all` is set, or anything
///      matching the marker prefixes if `create_entities` is set.
///   4. Everything else is ignored.
///
/// Positions are moved into the configured axes and scaled.
pub fn classify<'a, I: IntoIterator<Item = &'a Entity>>(
    entities: I,
    config: &ImportConfig,
) -> Vec<ClassifiedEntity> {
    let rules = &config.entity_rules;

    entities
        .into_iter()
        .map(|entity| {
            let classname = entity.classname().unwrap_or("").to_string();
            let origin = entity.get("origin").and_then(parse_vec3);

            let kind = if rules.is_light(&classname) {
                if config.create_lights {
                    EntityKind::Light(parse_light(entity, config))
                } else {
                    EntityKind::Ignored
                }
            } else if config.create_cameras && rules.is_camera(&classname) {
                EntityKind::Camera(CameraSettings {
                    fov: DEFAULT_FOV.to_radians(),
                    is_primary: rules.is_primary_camera(&classname),
                })
            } else if (config.import_all && origin.is_some())
                || (config.create_entities && rules.is_marker(&classname))
            {
                EntityKind::Marker
            } else {
                EntityKind::Ignored
            };

            let position = config.target_axes.convert(origin.unwrap_or_else(Vector3::zeros));
            let transform = Transform {
                position: position * config.scale,
                rotation: parse_rotation(entity),
            };

            debug!("Entity {} is {:?}", classname, kind);

            ClassifiedEntity {
                classname,
                kind,
                transform,
                attributes: entity.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
use crate::config::{ImportConfigBuilder, TargetAxes};

#[cfg(test)]
fn entity(attrs: &[(&str, &str)]) -> Entity {
    attrs.iter().copied().collect()
}

#[test]
fn classify_lights() {
    let config = ImportConfigBuilder::default()
        .create_lights(true)
        .scale(0.5)
        .build()
        .unwrap();
    let entities = [
        entity(&[("classname", "light"), ("origin", "10 20 30")]),
        entity(&[
            ("classname", "light_flame_large_yellow"),
            ("light", "150"),
            ("_color", "255 128 0"),
            ("style", "2"),
        ]),
        entity(&[("classname", "light"), ("color", "0.5 0.5 1")]),
    ];
    let classified = classify(entities.iter(), &config);

    match classified[0].kind {
        EntityKind::Light(light) => {
            assert_eq!(light.intensity, 300.0);
            assert_eq!(light.color, [1.0, 1.0, 1.0]);
            assert_eq!(light.style, 0);
        }
        _ => panic!("not a light"),
    }
    assert_eq!(classified[0].transform.position, Vector3::new(5.0, 10.0, 15.0));

    match classified[1].kind {
        EntityKind::Light(light) => {
            assert_eq!(light.intensity, 150.0);
            assert_eq!(light.color, [1.0, 128.0 / 255.0, 0.0]);
            assert_eq!(light.style, 2);
        }
        _ => panic!("not a light"),
    }
    assert_eq!(classified[1].transform.position, Vector3::zeros());

    match classified[2].kind {
        EntityKind::Light(light) => assert_eq!(light.color, [0.5, 0.5, 1.0]),
        _ => panic!("not a light"),
    }
}

#[test]
fn lights_never_markers() {
    let config = ImportConfigBuilder::default()
        .import_all(true)
        .create_entities(true)
        .build()
        .unwrap();
    let entities = [entity(&[("classname", "light"), ("origin", "0 0 0")])];

    assert_eq!(classify(entities.iter(), &config)[0].kind, EntityKind::Ignored);
}

#[test]
fn classify_cameras() {
    let config = ImportConfigBuilder::default()
        .create_cameras(true)
        .build()
        .unwrap();
    let entities = [
        entity(&[("classname", "info_player_start"), ("angle", "90")]),
        entity(&[("classname", "info_intermission"), ("mangle", "10 180 0")]),
        entity(&[("classname", "info_intermission"), ("angle", "-1")]),
        entity(&[("classname", "info_intermission"), ("angle", "-2")]),
    ];
    let classified = classify(entities.iter(), &config);

    assert_eq!(
        classified[0].kind,
        EntityKind::Camera(CameraSettings {
            fov: 90.0f32.to_radians(),
            is_primary: true
        })
    );
    assert_eq!(
        classified[0].transform.rotation,
        Vector3::new(0.0, 90.0f32.to_radians(), 0.0)
    );
    assert_eq!(
        classified[1].transform.rotation,
        Vector3::new(10.0f32.to_radians(), 180.0f32.to_radians(), 0.0)
    );
    assert!(matches!(
        classified[1].kind,
        EntityKind::Camera(CameraSettings {
            is_primary: false,
            ..
        })
    ));
    assert_eq!(
        classified[2].transform.rotation,
        Vector3::new(-90.0f32.to_radians(), 0.0, 0.0)
    );
    assert_eq!(
        classified[3].transform.rotation,
        Vector3::new(90.0f32.to_radians(), 0.0, 0.0)
    );
}

#[test]
fn classify_markers() {
    let entities = [
        entity(&[("classname", "monster_ogre"), ("origin", "0 0 0")]),
        entity(&[("classname", "func_door")]),
        entity(&[("classname", "info_null"), ("origin", "8 8 8")]),
        entity(&[("classname", "info_player_start"), ("origin", "bad")]),
    ];

    let curated = ImportConfigBuilder::default()
        .create_entities(true)
        .build()
        .unwrap();
    let kinds: Vec<_> = classify(entities.iter(), &curated)
        .into_iter()
        .map(|x| x.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            EntityKind::Marker,
            EntityKind::Ignored,
            EntityKind::Ignored,
            EntityKind::Ignored
        ]
    );

    let all = ImportConfigBuilder::default()
        .import_all(true)
        .build()
        .unwrap();
    let kinds: Vec<_> = classify(entities.iter(), &all)
        .into_iter()
        .map(|x| x.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            EntityKind::Marker,
            EntityKind::Ignored,
            EntityKind::Marker,
            EntityKind::Ignored
        ]
    );
}

#[test]
fn classify_y_up() {
    let config = ImportConfigBuilder::default()
        .import_all(true)
        .scale(2.0)
        .target_axes(TargetAxes::YUp)
        .build()
        .unwrap();
    let entities = [entity(&[("classname", "info_null"), ("origin", "1 2 3")])];

    assert_eq!(
        classify(entities.iter(), &config)[0].transform.position,
        Vector3::new(2.0, 6.0, -4.0)
    );
}

#[test]
fn parse_vec3_strict() {
    assert_eq!(parse_vec3(" 1 -2.5  3 "), Some(Vector3::new(1.0, -2.5, 3.0)));
    assert_eq!(parse_vec3("1 2"), None);
    assert_eq!(parse_vec3("1 2 3 4"), None);
    assert_eq!(parse_vec3("a b c"), None);
}
