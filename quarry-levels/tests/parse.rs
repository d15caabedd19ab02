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

#[macro_use]
mod helpers;

use helpers::*;
use quarry_levels::prelude::*;

fn parse(bsp: &BspWriter) -> Q1BspFile<Q1System> {
    let parsed = Q1BspFile::parse_file(&bsp.build()).unwrap();
    assert!(parsed.is_clean(), "{:?}", parsed.warnings);
    parsed.value
}

/// Rotate `cycle` so it starts at its smallest element.
fn canonical(cycle: &[u32]) -> Vec<u32> {
    let start = (0..cycle.len()).min_by_key(|x| cycle[*x]).unwrap_or(0);
    cycle[start..].iter().chain(cycle[..start].iter()).copied().collect()
}

#[test]
fn version_checked() {
    let bsp = two_model_bsp();
    assert!(Q1BspFile::parse_file(&bsp.build()).is_ok());

    for version in [28, 30, 0x5053_4249].iter() {
        let err = Q1BspFile::parse_file(&bsp.build_version(*version)).unwrap_err();
        assert_eq!(err, ParseError::BadVersion(*version));
    }
}

#[test]
fn truncated_file() {
    let data = two_model_bsp().build();

    assert!(matches!(
        Q1BspFile::parse_file(&data[..100]),
        Err(ParseError::OutOfBounds { .. })
    ));
    assert!(matches!(
        Q1BspFile::parse_file(&data[..data.len() - 8]),
        Err(ParseError::OutOfBounds { .. })
    ));
}

#[test]
fn bad_references_are_fatal() {
    // Surfedge past the end of the edges
    let mut bsp = BspWriter::new();
    let info = bsp.add_texinfo(0);
    let first = bsp.add_surfedges(&[1, 2, 99]);
    bsp.add_raw_face(first, 3, info);
    assert!(matches!(
        Q1BspFile::parse_file(&bsp.build()),
        Err(ParseError::IndexOutOfBounds { what: "edge", .. })
    ));

    // Face range past the end of the surfedges
    let mut bsp = BspWriter::new();
    let info = bsp.add_texinfo(0);
    bsp.add_raw_face(0, 3, info);
    assert!(matches!(
        Q1BspFile::parse_file(&bsp.build()),
        Err(ParseError::IndexOutOfBounds { what: "surfedge", .. })
    ));

    // Texinfo that doesn't exist
    let mut bsp = BspWriter::new();
    add_square(&mut bsp, 8.0, 0.0, 3);
    assert!(matches!(
        Q1BspFile::parse_file(&bsp.build()),
        Err(ParseError::IndexOutOfBounds { what: "texinfo", .. })
    ));

    // Model with more faces than there are
    let mut bsp = two_model_bsp();
    bsp.add_model(0..10);
    assert!(matches!(
        Q1BspFile::parse_file(&bsp.build()),
        Err(ParseError::IndexOutOfBounds { what: "face", .. })
    ));
}

#[test]
fn face_loops() {
    let file = parse(&two_model_bsp());
    let meshes = build_meshes(&file, &HiddenSurfaces::default()).unwrap();
    assert!(meshes.is_clean());

    let meshes = meshes.value;
    assert_eq!(meshes.len(), 2);
    assert_eq!(meshes[0].name, "bsp_model_0");
    assert_eq!(meshes[0].faces.len(), 2);
    assert_eq!(meshes[1].faces.len(), 1);

    for mesh in meshes.iter() {
        for face in mesh.faces.iter() {
            assert_eq!(face.vertices.len(), 4);
            assert_eq!(face.uvs.len(), 4);
            assert!(face.vertices.iter().all(|x| (*x as usize) < mesh.positions.len()));
        }
    }

    // Positions are compacted to what each model uses, in first-use order
    assert_eq!(meshes[0].positions.len(), 8);
    assert_eq!(meshes[0].faces[0].vertices, vec![0, 1, 2, 3]);
    assert_eq!(meshes[1].positions.len(), 4);
    assert_eq!(meshes[1].positions[2], na::Vector3::new(16.0, 16.0, 128.0));
}

#[test]
fn backwards_surfedges_give_same_loop() {
    let mut bsp = BspWriter::new();
    let info = bsp.add_texinfo(-1);
    let a = bsp.add_vertex(0.0, 0.0, 0.0);
    let b = bsp.add_vertex(8.0, 0.0, 0.0);
    let c = bsp.add_vertex(8.0, 8.0, 0.0);
    bsp.add_polygon_with(&[a, b, c], info, false);
    bsp.add_polygon_with(&[a, b, c], info, true);
    bsp.add_model(0..2);

    let file = Q1BspFile::parse_file(&bsp.build()).unwrap().value;
    let meshes = build_meshes(&file, &HiddenSurfaces::default()).unwrap().value;

    assert_eq!(meshes[0].faces[0].vertices, meshes[0].faces[1].vertices);
}

#[test]
fn winding_preserved() {
    let mut bsp = BspWriter::new();
    let info = bsp.add_texinfo(-1);
    let verts: Vec<u16> = (0..5)
        .map(|x| bsp.add_vertex(x as f32, (x * x) as f32, 0.0))
        .collect();
    bsp.add_polygon(&verts, info);

    // The same face, with the surfedge list reversed and every sign flipped
    let data = bsp.build();
    let file = Q1BspFile::parse_file(&data).unwrap().value;
    let surfedges: Vec<i32> = (0..5).map(|x| file.get_surfedge(x).unwrap()).collect();
    let reversed: Vec<i32> = surfedges.iter().rev().map(|x| -x).collect();
    let first = bsp.add_surfedges(&reversed);
    bsp.add_raw_face(first, 5, info);
    bsp.add_model(0..2);

    let file = Q1BspFile::parse_file(&bsp.build()).unwrap().value;
    let meshes = build_meshes(&file, &HiddenSurfaces::default()).unwrap().value;
    let forwards = &meshes[0].faces[0].vertices;
    let backwards = &meshes[0].faces[1].vertices;

    let mut expected = forwards.clone();
    expected.reverse();
    assert_eq!(canonical(backwards), canonical(&expected));
    assert_ne!(canonical(backwards), canonical(forwards));
}

#[test]
fn degenerate_faces_dropped() {
    let mut bsp = BspWriter::new();
    let info = bsp.add_texinfo(-1);
    let a = bsp.add_vertex(0.0, 0.0, 0.0);
    let b = bsp.add_vertex(8.0, 0.0, 0.0);
    let c = bsp.add_vertex(8.0, 8.0, 0.0);
    bsp.add_polygon(&[a, b, c], info);
    // Repeated vertices collapse to two
    bsp.add_polygon(&[a, a, b, b], info);
    bsp.add_model(0..2);

    let file = parse(&bsp);
    let meshes = build_meshes(&file, &HiddenSurfaces::default()).unwrap();

    assert_eq!(meshes.value[0].faces.len(), 1);
    assert!(meshes.warnings.contains(&Warning::DegenerateFace {
        model: 0,
        face: 1,
        vertices: 2
    }));
    // The missing texture is reported once
    assert_eq!(
        meshes
            .warnings
            .iter()
            .filter(|x| matches!(x, Warning::UnknownTexture { .. }))
            .count(),
        1
    );
}

#[test]
fn uvs_in_texture_space() {
    let file = parse(&two_model_bsp());
    let meshes = build_meshes(&file, &HiddenSurfaces::default()).unwrap().value;

    // wall is 4x4, the floor is 64 units across
    let floor = &meshes[0].faces[0];
    assert_eq!(floor.uvs[0], na::Vector2::new(0.0, 0.0));
    assert_eq!(floor.uvs[2], na::Vector2::new(16.0, 16.0));

    // *lava1 is external but still has a size
    let lava = &meshes[0].faces[1];
    assert_eq!(lava.uvs[1], na::Vector2::new(4.0, 0.0));
}

#[test]
fn hidden_flag() {
    let file = parse(&two_model_bsp());
    let meshes = build_meshes(&file, &HiddenSurfaces::default()).unwrap().value;

    assert!(!meshes[0].faces[0].hidden);
    assert!(meshes[0].faces[1].hidden);
    assert!(meshes[0].faces[1].special);

    let meshes = build_meshes(&file, &HiddenSurfaces::none()).unwrap().value;
    assert!(!meshes[0].faces[1].hidden);
}

#[test]
fn unknown_texture_not_hidden() {
    let mut bsp = BspWriter::new();
    bsp.add_texture("wall", 4, 4, vec![0; 16]);
    let empty = bsp.add_empty_texture_slot();
    let info = bsp.add_texinfo(empty);
    add_square(&mut bsp, 128.0, 0.0, info);
    bsp.add_model(0..1);

    let file = parse(&bsp);
    let meshes = build_meshes(&file, &HiddenSurfaces::default()).unwrap();
    let face = &meshes.value[0].faces[0];

    assert!(!face.hidden);
    assert_eq!(face.material, 2);
    // 64x64 fallback size
    assert_eq!(face.uvs[2], na::Vector2::new(2.0, 2.0));
    assert_eq!(
        meshes.warnings,
        vec![Warning::UnknownTexture {
            miptex: 1,
            name: None
        }]
    );
}

#[test]
fn entities_lump() {
    let file = parse(&two_model_bsp());
    let entities: Vec<_> = file.entities_iter().collect();

    assert_eq!(entities.len(), 5);
    assert_eq!(entities[0].classname(), Some("worldspawn"));
    assert_eq!(
        *entities[1],
        entity! { "classname" => "light", "origin" => "32 32 96" }
    );
}

#[test]
fn malformed_entities_warn() {
    let mut bsp = two_model_bsp();
    bsp.raw_entities(b"{ \"classname\" \"light\" \"origin\" }\n");
    bsp.add_entity(&[("classname", "info_null")]);

    let parsed = Q1BspFile::parse_file(&bsp.build()).unwrap();
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(parsed.value.entities_iter().count(), 6);
}

#[test]
fn textures_decoded() {
    let file = parse(&two_model_bsp());
    let textures = decode_textures(&file, &Palette::grayscale(), 0.0);

    assert_eq!(textures.value.len(), 1);
    assert_eq!(textures.value[0].name, "wall");
    assert_eq!(textures.value[0].image.dimensions(), (4, 4));
    assert_eq!(textures.value[0].image.get_pixel(1, 2).0, [9, 9, 9, 255]);
    assert_eq!(
        textures.warnings,
        vec![Warning::UnknownTexture {
            miptex: 1,
            name: Some("*lava1".to_string())
        }]
    );
}

#[test]
fn swizzle_to_y_up() {
    let file = parse(&two_model_bsp()).swizzle_to::<YUpSystem>();
    let meshes = build_meshes(&file, &HiddenSurfaces::default()).unwrap().value;

    assert_eq!(meshes[1].positions[2], na::Vector3::new(16.0, 128.0, -16.0));
    // Texture coordinates don't change
    assert_eq!(meshes[0].faces[0].uvs[2], na::Vector2::new(16.0, 16.0));

    let model = file.get_model(0).unwrap();
    assert!(model.mins.iter().zip(model.maxs.iter()).all(|(a, b)| a <= b));
}
