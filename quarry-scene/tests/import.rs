// Copyright (C) Oscar Shrimpton 2019

// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
// more details.

// You should have received a copy of the GNU General Public License along
// with this program.  If not, see <http://www.gnu.org/licenses/>.

extern crate nalgebra as na;
extern crate quarry_levels;
extern crate quarry_scene;

#[macro_use]
#[path = "../../quarry-levels/tests/helpers.rs"]
mod helpers;

use helpers::*;
use quarry_levels::prelude::*;
use quarry_scene::*;

fn import(bsp: &BspWriter, config: &ImportConfig) -> ImportedScene {
    import_bsp(&bsp.build(), &Palette::grayscale(), config).unwrap()
}

#[test]
fn end_to_end() {
    let config = ImportConfigBuilder::default()
        .create_lights(true)
        .build()
        .unwrap();
    let scene = import(&two_model_bsp(), &config);

    assert_eq!(scene.meshes.len(), 2);
    assert_eq!(scene.textures.len(), 1);
    assert_eq!(scene.textures[0].name, "wall");

    let lights: Vec<_> = scene.lights().collect();
    assert_eq!(lights.len(), 1);
    assert_eq!(lights[0].1.intensity, 300.0);
    assert_eq!(
        lights[0].0.transform.position,
        na::Vector3::new(32.0, 32.0, 96.0) * 0.05
    );

    // Cameras and markers are off by default
    assert_eq!(scene.cameras().count(), 0);
    assert_eq!(scene.markers().count(), 0);

    // *lava1 isn't embedded
    assert!(scene.has_warnings());
    assert_eq!(
        scene.warnings,
        vec![Warning::UnknownTexture {
            miptex: 1,
            name: Some("*lava1".to_string())
        }]
    );
}

#[test]
fn positions_scaled() {
    let scene = import(&two_model_bsp(), &ImportConfig::default());

    assert_eq!(scene.meshes[1].positions[2], na::Vector3::new(0.8, 0.8, 6.4));
}

#[test]
fn worldspawn_only() {
    let config = ImportConfigBuilder::default()
        .worldspawn_only(true)
        .remove_hidden(false)
        .build()
        .unwrap();
    let scene = import(&two_model_bsp(), &config);

    assert_eq!(scene.meshes.len(), 1);
    assert_eq!(scene.meshes[0].model_idx, 0);
    let faces: Vec<u32> = scene.meshes[0].faces.iter().map(|x| x.source_face).collect();
    assert_eq!(faces, vec![0, 1]);
}

#[test]
fn remove_hidden() {
    let keep = ImportConfigBuilder::default()
        .remove_hidden(false)
        .build()
        .unwrap();
    let scene = import(&two_model_bsp(), &keep);
    let lava: Vec<_> = scene.meshes[0]
        .faces
        .iter()
        .filter(|x| x.material == 1)
        .collect();
    assert_eq!(lava.len(), 1);
    assert!(lava[0].hidden);
    assert_eq!(scene.meshes[0].positions.len(), 8);

    let scene = import(&two_model_bsp(), &ImportConfig::default());
    assert!(scene.meshes[0].faces.iter().all(|x| x.material != 1));
    assert_eq!(scene.meshes[0].faces.len(), 1);
    assert_eq!(scene.meshes[0].positions.len(), 4);
}

#[test]
fn hidden_only_mesh_dropped() {
    let mut bsp = BspWriter::new();
    let sky = bsp.add_texture("sky4", 2, 2, vec![1, 2, 3, 4]);
    let info = bsp.add_texinfo(sky);
    add_square(&mut bsp, 32.0, 0.0, info);
    bsp.add_model(0..1);

    let scene = import(&bsp, &ImportConfig::default());
    assert!(scene.meshes.is_empty());
    assert_eq!(scene.materials.len(), 1);
}

#[test]
fn no_materials() {
    let config = ImportConfigBuilder::default()
        .create_materials(false)
        .build()
        .unwrap();
    let scene = import(&two_model_bsp(), &config);

    assert!(scene.textures.is_empty());
    assert_eq!(scene.materials.len(), 2);
    assert!(scene.materials.iter().all(|x| x.texture.is_none()));
    assert_eq!(scene.materials[0].name, "wall");
}

#[test]
fn materials_per_slot() {
    let mut bsp = two_model_bsp();
    let info = bsp.add_texinfo(7);
    let first = bsp.faces_len();
    add_square(&mut bsp, 8.0, 256.0, info);
    bsp.add_model(first..bsp.faces_len());

    let scene = import(&bsp, &ImportConfig::default());

    assert_eq!(scene.materials.len(), 3);
    assert_eq!(scene.materials[0].texture, Some(0));
    assert_eq!(scene.materials[1].name, "*lava1");
    assert_eq!(scene.materials[1].texture, None);
    assert_eq!(scene.materials[2].name, "missing");
    assert_eq!(scene.meshes[2].faces[0].material, 2);
}

#[test]
fn brightness_applied() {
    let config = ImportConfigBuilder::default()
        .brightness_adjust(1.0)
        .build()
        .unwrap();
    let scene = import(&two_model_bsp(), &config);

    assert!(scene.textures[0]
        .image
        .pixels()
        .all(|x| x.0 == [255, 255, 255, 255]));
}

#[test]
fn y_up() {
    let config = ImportConfigBuilder::default()
        .target_axes(TargetAxes::YUp)
        .scale(1.0)
        .create_cameras(true)
        .build()
        .unwrap();
    let scene = import(&two_model_bsp(), &config);

    assert_eq!(
        scene.meshes[1].positions[2],
        na::Vector3::new(16.0, 128.0, -16.0)
    );

    let cameras: Vec<_> = scene.cameras().collect();
    assert_eq!(cameras.len(), 1);
    assert!(cameras[0].1.is_primary);
    assert_eq!(
        cameras[0].0.transform.position,
        na::Vector3::new(16.0, 24.0, -16.0)
    );
}

#[test]
fn reverse_winding() {
    let forwards = import(&two_model_bsp(), &ImportConfig::default());
    let config = ImportConfigBuilder::default()
        .reverse_winding(true)
        .build()
        .unwrap();
    let backwards = import(&two_model_bsp(), &config);

    let mut expected = forwards.meshes[0].faces[0].vertices.clone();
    expected.reverse();
    assert_eq!(backwards.meshes[0].faces[0].vertices, expected);
}

#[test]
fn markers() {
    let config = ImportConfigBuilder::default()
        .create_entities(true)
        .build()
        .unwrap();
    let scene = import(&two_model_bsp(), &config);

    let markers: Vec<_> = scene.markers().map(|x| x.classname.as_str()).collect();
    assert_eq!(markers, vec!["monster_army"]);

    let config = ImportConfigBuilder::default()
        .import_all(true)
        .build()
        .unwrap();
    let scene = import(&two_model_bsp(), &config);

    // The light is ignored as lights are off, func_door has no origin
    let markers: Vec<_> = scene.markers().map(|x| x.classname.as_str()).collect();
    assert_eq!(markers, vec!["info_player_start", "monster_army"]);
}

#[test]
fn bad_version_no_scene() {
    let data = two_model_bsp().build_version(30);

    assert_eq!(
        import_bsp(&data, &Palette::grayscale(), &ImportConfig::default()).unwrap_err(),
        ParseError::BadVersion(30)
    );
}

#[test]
fn classify_entities_directly() {
    let entities = vec![
        entity! { "classname" => "light", "light" => "200" },
        entity! { "classname" => "info_intermission", "origin" => "0 0 64" },
    ];
    let config = ImportConfigBuilder::default()
        .create_lights(true)
        .create_cameras(true)
        .build()
        .unwrap();
    let classified = classify(entities.iter(), &config);

    assert!(matches!(classified[0].kind, EntityKind::Light(x) if x.intensity == 200.0));
    assert!(matches!(
        classified[1].kind,
        EntityKind::Camera(x) if !x.is_primary
    ));
}
