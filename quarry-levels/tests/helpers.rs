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
#![allow(dead_code, unused_macros)]

use std::ops::Range;

macro_rules! entity(
    { $($key:expr => $value:expr),* } => {
        {
            let mut e = ::quarry_levels::traits::entities::Entity::new();
            $(
                e.insert($key, $value);
            )*
            e
        }
    };
);

const N_LUMPS: usize = 15;
const HEADER_LEN: usize = 4 + N_LUMPS * 8;
const MIP_LEVELS: u32 = 4;

struct TexInfoDef {
    s: [f32; 4],
    t: [f32; 4],
    miptex: i32,
    flags: u32,
}

struct FaceDef {
    first_surfedge: i32,
    n_surfedges: u16,
    texinfo: u16,
}

enum TextureDef {
    Embedded {
        name: String,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    External {
        name: String,
        width: u32,
        height: u32,
    },
    Empty,
}

/// Builds BSP files in memory for tests.
///
/// Vertex 0 and edge 0 are placeholders, like real compilers emit, so surfedge
/// signs are never ambiguous.
pub struct BspWriter {
    entities: Vec<u8>,
    vertices: Vec<[f32; 3]>,
    edges: Vec<[u16; 2]>,
    surfedges: Vec<i32>,
    texinfo: Vec<TexInfoDef>,
    faces: Vec<FaceDef>,
    models: Vec<Range<u32>>,
    textures: Vec<TextureDef>,
}

impl BspWriter {
    pub fn new() -> BspWriter {
        BspWriter {
            entities: Vec::new(),
            vertices: vec![[0.0; 3]],
            edges: vec![[0, 0]],
            surfedges: Vec::new(),
            texinfo: Vec::new(),
            faces: Vec::new(),
            models: Vec::new(),
            textures: Vec::new(),
        }
    }

    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) -> u16 {
        self.vertices.push([x, y, z]);
        self.vertices.len() as u16 - 1
    }

    /// Add a texture with its pixels. Smaller mip levels are filled with index 0.
    pub fn add_texture(&mut self, name: &str, width: u32, height: u32, pixels: Vec<u8>) -> i32 {
        assert_eq!(pixels.len(), (width * height) as usize);
        self.textures.push(TextureDef::Embedded {
            name: name.to_string(),
            width,
            height,
            pixels,
        });
        self.textures.len() as i32 - 1
    }

    /// Add a texture whose pixels live in a WAD.
    pub fn add_external_texture(&mut self, name: &str, width: u32, height: u32) -> i32 {
        self.textures.push(TextureDef::External {
            name: name.to_string(),
            width,
            height,
        });
        self.textures.len() as i32 - 1
    }

    /// Add a directory slot with no record.
    pub fn add_empty_texture_slot(&mut self) -> i32 {
        self.textures.push(TextureDef::Empty);
        self.textures.len() as i32 - 1
    }

    /// Texinfo projecting X onto s and Y onto t.
    pub fn add_texinfo(&mut self, miptex: i32) -> u16 {
        self.add_texinfo_axes([1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], miptex, 0)
    }

    pub fn add_texinfo_axes(&mut self, s: [f32; 4], t: [f32; 4], miptex: i32, flags: u32) -> u16 {
        self.texinfo.push(TexInfoDef {
            s,
            t,
            miptex,
            flags,
        });
        self.texinfo.len() as u16 - 1
    }

    /// Add a face visiting `vertices` in order. Returns the face index.
    pub fn add_polygon(&mut self, vertices: &[u16], texinfo: u16) -> u32 {
        self.add_polygon_with(vertices, texinfo, false)
    }

    /// Add a face visiting `vertices` in order.
    /// If `backwards`, every edge is stored the other way round and referenced with a negative surfedge.
    pub fn add_polygon_with(&mut self, vertices: &[u16], texinfo: u16, backwards: bool) -> u32 {
        let first_surfedge = self.surfedges.len() as i32;
        for (i, a) in vertices.iter().enumerate() {
            let b = vertices[(i + 1) % vertices.len()];
            let edge = self.edges.len() as i32;
            if backwards {
                self.edges.push([b, *a]);
                self.surfedges.push(-edge);
            } else {
                self.edges.push([*a, b]);
                self.surfedges.push(edge);
            }
        }

        self.add_raw_face(first_surfedge, vertices.len() as u16, texinfo)
    }

    /// Add a face with the given surfedge range, without adding any edges.
    pub fn add_raw_face(&mut self, first_surfedge: i32, n_surfedges: u16, texinfo: u16) -> u32 {
        self.faces.push(FaceDef {
            first_surfedge,
            n_surfedges,
            texinfo,
        });
        self.faces.len() as u32 - 1
    }

    pub fn add_surfedges(&mut self, surfedges: &[i32]) -> i32 {
        let first = self.surfedges.len() as i32;
        self.surfedges.extend_from_slice(surfedges);
        first
    }

    pub fn faces_len(&self) -> u32 {
        self.faces.len() as u32
    }

    pub fn add_model(&mut self, faces: Range<u32>) -> u32 {
        self.models.push(faces);
        self.models.len() as u32 - 1
    }

    pub fn add_entity(&mut self, attributes: &[(&str, &str)]) {
        self.entities.extend_from_slice(b"{\n");
        for (key, value) in attributes {
            self.entities
                .extend_from_slice(format!("\"{}\" \"{}\"\n", key, value).as_bytes());
        }
        self.entities.extend_from_slice(b"}\n");
    }

    pub fn raw_entities(&mut self, data: &[u8]) {
        self.entities.extend_from_slice(data);
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_version(29)
    }

    pub fn build_version(&self, version: i32) -> Vec<u8> {
        let lumps: [Vec<u8>; N_LUMPS] = [
            self.entities_lump(),
            plane_lump(),
            self.miptex_lump(),
            self.vertices.iter().flatten().flat_map(|x| x.to_le_bytes()).collect(),
            Vec::new(),
            Vec::new(),
            self.texinfo_lump(),
            self.faces_lump(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            self.edges.iter().flatten().flat_map(|x| x.to_le_bytes()).collect(),
            self.surfedges.iter().flat_map(|x| x.to_le_bytes()).collect(),
            self.models_lump(),
        ];

        let mut header = version.to_le_bytes().to_vec();
        let mut body = Vec::new();
        for lump in lumps.iter() {
            header.extend_from_slice(&((HEADER_LEN + body.len()) as i32).to_le_bytes());
            header.extend_from_slice(&(lump.len() as i32).to_le_bytes());
            body.extend_from_slice(lump);
            while body.len() % 4 != 0 {
                body.push(0);
            }
        }

        header.extend(body);
        header
    }

    fn entities_lump(&self) -> Vec<u8> {
        let mut lump = self.entities.clone();
        lump.push(0);
        lump
    }

    fn miptex_lump(&self) -> Vec<u8> {
        if self.textures.is_empty() {
            return Vec::new();
        }

        let dir_len = 4 + self.textures.len() * 4;
        let mut dir = (self.textures.len() as i32).to_le_bytes().to_vec();
        let mut records = Vec::new();

        for texture in self.textures.iter() {
            let (name, width, height, pixels) = match texture {
                TextureDef::Embedded {
                    name,
                    width,
                    height,
                    pixels,
                } => (name, *width, *height, Some(pixels)),
                TextureDef::External {
                    name,
                    width,
                    height,
                } => (name, *width, *height, None),
                TextureDef::Empty => {
                    dir.extend_from_slice(&(-1i32).to_le_bytes());
                    continue;
                }
            };
            dir.extend_from_slice(&((dir_len + records.len()) as i32).to_le_bytes());

            let mut name_buf = [0u8; 16];
            name_buf[..name.len()].copy_from_slice(name.as_bytes());
            records.extend_from_slice(&name_buf);
            records.extend_from_slice(&width.to_le_bytes());
            records.extend_from_slice(&height.to_le_bytes());

            let mut offset = 16 + 4 * 2 + 4 * MIP_LEVELS;
            let mut data = Vec::new();
            for level in 0..MIP_LEVELS {
                let len = (width >> level).max(1) * (height >> level).max(1);
                match pixels {
                    Some(pixels) => {
                        records.extend_from_slice(&offset.to_le_bytes());
                        if level == 0 {
                            data.extend_from_slice(pixels);
                        } else {
                            data.extend(std::iter::repeat(0).take(len as usize));
                        }
                    }
                    None => records.extend_from_slice(&0u32.to_le_bytes()),
                }
                offset += len;
            }
            records.extend(data);
        }

        dir.extend(records);
        dir
    }

    fn texinfo_lump(&self) -> Vec<u8> {
        let mut lump = Vec::new();
        for info in self.texinfo.iter() {
            for x in info.s.iter().chain(info.t.iter()) {
                lump.extend_from_slice(&x.to_le_bytes());
            }
            lump.extend_from_slice(&info.miptex.to_le_bytes());
            lump.extend_from_slice(&info.flags.to_le_bytes());
        }
        lump
    }

    fn faces_lump(&self) -> Vec<u8> {
        let mut lump = Vec::new();
        for face in self.faces.iter() {
            lump.extend_from_slice(&0u16.to_le_bytes());
            lump.extend_from_slice(&0u16.to_le_bytes());
            lump.extend_from_slice(&face.first_surfedge.to_le_bytes());
            lump.extend_from_slice(&face.n_surfedges.to_le_bytes());
            lump.extend_from_slice(&face.texinfo.to_le_bytes());
            lump.extend_from_slice(&[0, 255, 255, 255]);
            lump.extend_from_slice(&(-1i32).to_le_bytes());
        }
        lump
    }

    fn models_lump(&self) -> Vec<u8> {
        let mut lump = Vec::new();
        for faces in self.models.iter() {
            for x in [-64.0f32, -64.0, -64.0, 64.0, 64.0, 64.0, 0.0, 0.0, 0.0].iter() {
                lump.extend_from_slice(&x.to_le_bytes());
            }
            for x in [0i32, -1, -1, -1, 1].iter() {
                lump.extend_from_slice(&x.to_le_bytes());
            }
            lump.extend_from_slice(&(faces.start as i32).to_le_bytes());
            lump.extend_from_slice(&((faces.end - faces.start) as i32).to_le_bytes());
        }
        lump
    }
}

/// A single plane facing up the Z axis
fn plane_lump() -> Vec<u8> {
    let mut lump = Vec::new();
    for x in [0.0f32, 0.0, 1.0, 0.0].iter() {
        lump.extend_from_slice(&x.to_le_bytes());
    }
    lump.extend_from_slice(&2i32.to_le_bytes());
    lump
}

/// A square floor at height `z`, `size` units across, with corner at the origin.
pub fn add_square(bsp: &mut BspWriter, size: f32, z: f32, texinfo: u16) -> u32 {
    let a = bsp.add_vertex(0.0, 0.0, z);
    let b = bsp.add_vertex(size, 0.0, z);
    let c = bsp.add_vertex(size, size, z);
    let d = bsp.add_vertex(0.0, size, z);

    bsp.add_polygon(&[a, b, c, d], texinfo)
}

/// Two models: the world (a 64 unit floor textured with `wall`, and a `*lava1` floor below it)
/// and a brush model with one face. The world has a light, a player start and a monster.
pub fn two_model_bsp() -> BspWriter {
    let mut bsp = BspWriter::new();

    let wall = bsp.add_texture("wall", 4, 4, (0..16).collect());
    let lava = bsp.add_external_texture("*lava1", 16, 16);
    let wall_info = bsp.add_texinfo(wall);
    let lava_info = bsp.add_texinfo_axes([1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], lava, 1);

    let first = bsp.faces_len();
    add_square(&mut bsp, 64.0, 0.0, wall_info);
    add_square(&mut bsp, 64.0, -32.0, lava_info);
    bsp.add_model(first..bsp.faces_len());

    let first = bsp.faces_len();
    add_square(&mut bsp, 16.0, 128.0, wall_info);
    bsp.add_model(first..bsp.faces_len());

    bsp.add_entity(&[("classname", "worldspawn"), ("wad", "gfx/base.wad")]);
    bsp.add_entity(&[("classname", "light"), ("origin", "32 32 96")]);
    bsp.add_entity(&[
        ("classname", "info_player_start"),
        ("origin", "16 16 24"),
        ("angle", "90"),
    ]);
    bsp.add_entity(&[("classname", "monster_army"), ("origin", "48 48 24")]);
    bsp.add_entity(&[("classname", "func_door"), ("model", "*1")]);

    bsp
}
