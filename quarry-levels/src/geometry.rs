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

//! Rebuilds polygon meshes from a level's faces

use log::{debug, warn};
use na::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::coords::CoordSystem;
use crate::traits::faces::Face;
use crate::traits::*;
use crate::types::{ParseError, Result, Warned, Warning};

/// Size used for texture coordinates when a face's texture can't be found.
pub const FALLBACK_TEXTURE_SIZE: u32 = 64;

const DEFAULT_HIDDEN: [&str; 13] = [
    "trigger",
    "clip",
    "hint",
    "skip",
    "sky",
    "*lava",
    "*slime",
    "*water",
    "*teleport",
    "origin",
    "waterskip",
    "lavaskip",
    "slimeskip",
];

/// Texture name prefixes of surfaces that aren't meant to be seen.
/// Matching ignores case, and `*` is just another character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenSurfaces {
    pub prefixes: Vec<String>,
}

impl HiddenSurfaces {
    /// No surfaces are hidden.
    pub fn none() -> HiddenSurfaces {
        HiddenSurfaces {
            prefixes: Vec::new(),
        }
    }

    pub fn with_prefix<P: Into<String>>(mut self, prefix: P) -> HiddenSurfaces {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn is_hidden(&self, texture_name: &str) -> bool {
        let name = texture_name.as_bytes();
        self.prefixes.iter().any(|x| {
            name.len() >= x.len() && name[..x.len()].eq_ignore_ascii_case(x.as_bytes())
        })
    }
}

impl Default for HiddenSurfaces {
    fn default() -> HiddenSurfaces {
        DEFAULT_HIDDEN
            .iter()
            .fold(HiddenSurfaces::none(), |acc, x| acc.with_prefix(*x))
    }
}

/// One polygon of a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshFace {
    /// Indices into the mesh's positions, in the winding stored in the file.
    pub vertices: Vec<u32>,

    /// Texture coordinates for each vertex, in units of the texture's size.
    pub uvs: Vec<Vector2<f32>>,

    /// Miptex slot. Equal to the number of slots if the texture couldn't be found.
    pub material: u32,

    pub hidden: bool,

    /// From a texinfo flagged as sky, liquid or animated.
    pub special: bool,

    /// Index of the face in the file this came from.
    pub source_face: u32,
}

/// All the faces of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub model_idx: u32,
    pub name: String,
    pub positions: Vec<Vector3<f32>>,
    pub faces: Vec<MeshFace>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Face indices grouped by material, lowest material first.
    pub fn material_groups(&self) -> BTreeMap<u32, Vec<usize>> {
        let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (idx, face) in self.faces.iter().enumerate() {
            groups.entry(face.material).or_default().push(idx);
        }

        groups
    }

    /// Keep only the faces matching `keep`, dropping any positions no longer used.
    pub fn retain_faces<F: FnMut(&MeshFace) -> bool>(&mut self, keep: F) {
        self.faces.retain(keep);
        self.compact();
    }

    /// Renumber positions in the order faces first use them, dropping unused ones.
    pub fn compact(&mut self) {
        let mut remap = HashMap::new();
        let mut positions = Vec::new();
        let old_positions = &self.positions;

        for face in self.faces.iter_mut() {
            for vertex in face.vertices.iter_mut() {
                let old = *vertex;
                *vertex = *remap.entry(old).or_insert_with(|| {
                    positions.push(old_positions[old as usize]);
                    positions.len() as u32 - 1
                });
            }
        }

        self.positions = positions;
    }

    pub fn map_positions<F: FnMut(&mut Vector3<f32>)>(&mut self, f: F) {
        self.positions.iter_mut().for_each(f);
    }

    /// Flip the winding of every face, keeping each vertex paired with its UV.
    pub fn reverse_winding(&mut self) {
        for face in self.faces.iter_mut() {
            face.vertices.reverse();
            face.uvs.reverse();
        }
    }

    /// Split every face into a fan of triangles, keeping the winding.
    pub fn triangulate(&self) -> Vec<[u32; 3]> {
        let mut triangles = Vec::new();
        for face in self.faces.iter().filter(|x| x.vertices.len() >= 3) {
            for pair in face.vertices[1..].windows(2) {
                triangles.push([face.vertices[0], pair[0], pair[1]]);
            }
        }

        triangles
    }
}

fn missing(what: &'static str, index: u32, count: u32) -> ParseError {
    ParseError::IndexOutOfBounds {
        what,
        index: index as i64,
        count: count as usize,
    }
}

/// Walk a face's surfedges, collecting the vertex loop.
/// Consecutive repeats are dropped, including a last vertex equal to the first.
fn face_loop<S: CoordSystem, L: HasSurfEdges<S>>(level: &L, face: &Face) -> Result<Vec<u32>> {
    let mut vertices: Vec<u32> = Vec::with_capacity(face.surfedges_idx.len());

    for surfedge in face.surfedges_idx.clone() {
        let vertex = level
            .resolve_surfedge(surfedge)
            .ok_or_else(|| missing("surfedge", surfedge, level.surfedges_len()))?;
        if vertex >= level.vertices_len() {
            return Err(missing("vertex", vertex, level.vertices_len()));
        }

        if vertices.last() != Some(&vertex) {
            vertices.push(vertex);
        }
    }

    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    Ok(vertices)
}

/// Build one mesh per model, in model order.
///
/// Every face is included, with [`MeshFace::hidden`] set if its texture is in `hidden`.
/// Faces with fewer than 3 distinct vertices are dropped with a warning.
pub fn build_meshes<S: CoordSystem, L: HasModels<S>>(
    level: &L,
    hidden: &HiddenSurfaces,
) -> Result<Warned<Box<[Mesh]>>> {
    let mut meshes = Vec::with_capacity(level.models_len() as usize);
    let mut warnings = Vec::new();
    let mut unknown_textures = HashSet::new();

    for (model_idx, model) in level.models_iter().enumerate() {
        let mut remap = HashMap::new();
        let mut mesh = Mesh {
            model_idx: model_idx as u32,
            name: format!("bsp_model_{}", model_idx),
            positions: Vec::new(),
            faces: Vec::with_capacity(model.faces_idx.len()),
        };

        for face_idx in model.faces_idx.clone() {
            let face = level
                .get_face(face_idx)
                .ok_or_else(|| missing("face", face_idx, level.faces_len()))?;
            let texinfo = level
                .get_texinfo(face.texinfo_idx)
                .ok_or_else(|| missing("texinfo", face.texinfo_idx, level.texinfo_len()))?;

            let texture = if texinfo.miptex_idx >= 0 {
                level.get_texture(texinfo.miptex_idx as u32)
            } else {
                None
            };
            let (material, width, height, is_hidden) = match texture {
                Some(tex) => (
                    texinfo.miptex_idx as u32,
                    tex.width,
                    tex.height,
                    hidden.is_hidden(&tex.name),
                ),
                None => {
                    if unknown_textures.insert(texinfo.miptex_idx) {
                        let warning = Warning::UnknownTexture {
                            miptex: texinfo.miptex_idx,
                            name: None,
                        };
                        warn!("{}", warning);
                        warnings.push(warning);
                    }

                    (
                        level.textures_len(),
                        FALLBACK_TEXTURE_SIZE,
                        FALLBACK_TEXTURE_SIZE,
                        false,
                    )
                }
            };

            let vertices = face_loop::<S, L>(level, face)?;
            if vertices.len() < 3 {
                let warning = Warning::DegenerateFace {
                    model: model_idx as u32,
                    face: face_idx,
                    vertices: vertices.len(),
                };
                warn!("{}", warning);
                warnings.push(warning);
                continue;
            }

            let mut uvs = Vec::with_capacity(vertices.len());
            let mut local = Vec::with_capacity(vertices.len());
            for vertex in vertices {
                let position = *level
                    .get_vertex(vertex)
                    .ok_or_else(|| missing("vertex", vertex, level.vertices_len()))?;

                uvs.push(texinfo.uv(&position, width, height));
                local.push(*remap.entry(vertex).or_insert_with(|| {
                    mesh.positions.push(position);
                    mesh.positions.len() as u32 - 1
                }));
            }

            mesh.faces.push(MeshFace {
                vertices: local,
                uvs,
                material,
                hidden: is_hidden,
                special: texinfo.is_special(),
                source_face: face_idx,
            });
        }

        debug!(
            "Built {} with {} faces and {} vertices",
            mesh.name,
            mesh.faces.len(),
            mesh.positions.len()
        );
        meshes.push(mesh);
    }

    Ok(Warned::with_warnings(meshes.into_boxed_slice(), warnings))
}

#[cfg(test)]
fn test_mesh() -> Mesh {
    let face = |vertices: Vec<u32>, material| MeshFace {
        uvs: vertices
            .iter()
            .map(|x| Vector2::new(*x as f32, 0.0))
            .collect(),
        vertices,
        material,
        hidden: material == 1,
        special: false,
        source_face: 0,
    };

    Mesh {
        model_idx: 0,
        name: "bsp_model_0".to_string(),
        positions: (0..6).map(|x| Vector3::new(x as f32, 0.0, 0.0)).collect(),
        faces: vec![
            face(vec![0, 1, 2, 3], 2),
            face(vec![4, 5, 1], 1),
            face(vec![3, 2, 5], 2),
        ],
    }
}

#[test]
fn hidden_prefixes() {
    let hidden = HiddenSurfaces::default();

    assert!(hidden.is_hidden("*lava1"));
    assert!(hidden.is_hidden("SKY4"));
    assert!(hidden.is_hidden("trigger"));
    assert!(hidden.is_hidden("clip_wall"));
    assert!(!hidden.is_hidden("lava1"));
    assert!(!hidden.is_hidden("wizmet1_2"));
    assert!(!hidden.is_hidden("+0slipbot"));

    let custom = HiddenSurfaces::none().with_prefix("BLACK");
    assert!(custom.is_hidden("black"));
    assert!(!custom.is_hidden("sky1"));

    // Lists filled in directly, or loaded from a config file, aren't normalised
    let loaded = HiddenSurfaces {
        prefixes: vec!["Black".to_string(), "*LAVA".to_string()],
    };
    assert!(loaded.is_hidden("black_wall"));
    assert!(loaded.is_hidden("*lava1"));
    assert!(!loaded.is_hidden("blac"));
}

#[test]
fn mesh_material_groups() {
    let groups = test_mesh().material_groups();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[&1], vec![1]);
    assert_eq!(groups[&2], vec![0, 2]);
}

#[test]
fn mesh_retain_compacts() {
    let mut mesh = test_mesh();
    mesh.retain_faces(|x| !x.hidden);

    assert_eq!(mesh.faces.len(), 2);
    assert_eq!(mesh.positions.len(), 5);
    assert_eq!(mesh.faces[1].vertices, vec![3, 2, 4]);
    assert_eq!(mesh.positions[4], Vector3::new(5.0, 0.0, 0.0));
    // UVs stay with their vertex
    assert_eq!(mesh.faces[1].uvs[2], Vector2::new(5.0, 0.0));
}

#[test]
fn mesh_reverse_and_triangulate() {
    let mut mesh = test_mesh();

    assert_eq!(
        mesh.triangulate(),
        vec![[0, 1, 2], [0, 2, 3], [4, 5, 1], [3, 2, 5]]
    );

    mesh.reverse_winding();
    assert_eq!(mesh.faces[0].vertices, vec![3, 2, 1, 0]);
    assert_eq!(mesh.faces[0].uvs[0], Vector2::new(3.0, 0.0));
}
