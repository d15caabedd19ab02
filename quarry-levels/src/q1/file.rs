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

//! A complete BSP file

// Trait implementations are stored in their own files.

use log::debug;
use std::marker::PhantomData;

use super::header::{Header, LumpKind};
use super::*;
use crate::coords::*;
use crate::types::{Result, Warned};

use crate::traits::entities::Entity;
use crate::traits::faces::Face;
use crate::traits::models::Model;
use crate::traits::planes::Plane;
use crate::traits::texinfo::TexInfo;
use crate::traits::textures::MipTex;
use crate::traits::vertices::{Edge, SurfEdge, Vertex};

/// A parsed Quake 1 BSP File.
#[derive(Debug, Clone)]
pub struct Q1BspFile<T: CoordSystem> {
    pub(crate) entities: Box<[Entity]>,
    pub(crate) planes: Box<[Plane]>,
    pub(crate) textures: Box<[Option<MipTex>]>,
    pub(crate) vertices: Box<[Vertex]>,
    pub(crate) edges: Box<[Edge]>,
    pub(crate) surfedges: Box<[SurfEdge]>,
    pub(crate) texinfo: Box<[TexInfo]>,
    pub(crate) faces: Box<[Face]>,
    pub(crate) models: Box<[Model]>,
    _phantom: PhantomData<T>,
}

impl Q1BspFile<Q1System> {
    /// Parse `data` as a quake 1 bsp file.
    /// Only problems in the entities lump are recoverable, everything else is an error.
    pub fn parse_file(data: &[u8]) -> Result<Warned<Q1BspFile<Q1System>>> {
        let header = Header::parse(data)?;
        for kind in LumpKind::ALL.iter() {
            let entry = header.entry(*kind);
            debug!(
                "Lump {}: {} bytes at {}",
                kind.name(),
                entry.length,
                entry.offset
            );
        }

        let entities = entities::parse_entities(header.lump(data, LumpKind::Entities)?);
        let planes = planes::from_data(header.lump(data, LumpKind::Planes)?)?;
        let textures = textures::from_data(header.lump(data, LumpKind::MipTex)?)?;
        let vertices = vertices::verts_from_data(header.lump(data, LumpKind::Vertices)?)?;
        let edges =
            vertices::edges_from_data(header.lump(data, LumpKind::Edges)?, vertices.len() as u32)?;
        let surfedges = vertices::surfedges_from_data(
            header.lump(data, LumpKind::SurfEdges)?,
            edges.len() as u32,
        )?;
        let texinfo = texinfo::from_data(header.lump(data, LumpKind::TexInfo)?)?;
        let faces = faces::from_data(
            header.lump(data, LumpKind::Faces)?,
            planes.len() as u32,
            texinfo.len() as u32,
            surfedges.len() as u32,
        )?;
        let models = models::from_data(header.lump(data, LumpKind::Models)?, faces.len() as u32)?;

        debug!(
            "Parsed {} entities, {} textures, {} vertices, {} faces, {} models",
            entities.value.len(),
            textures.len(),
            vertices.len(),
            faces.len(),
            models.len()
        );

        Ok(entities.map(|entities| Q1BspFile {
            entities,
            planes,
            textures,
            vertices,
            edges,
            surfedges,
            texinfo,
            faces,
            models,
            _phantom: PhantomData,
        }))
    }
}

impl<T: CoordSystem> Q1BspFile<T> {
    pub fn swizzle_to<D: CoordSystem>(mut self) -> Q1BspFile<D>
    where
        Swizzler: SwizzleFromTo<T, D>,
    {
        let swizzle = <Swizzler as SwizzleFromTo<T, D>>::swizzle::<f32>;

        for vertex in self.vertices.iter_mut() {
            swizzle(vertex);
        }

        for plane in self.planes.iter_mut() {
            swizzle(&mut plane.normal);
        }

        // Texture coords are dot products, so swizzling both sides leaves them unchanged
        for info in self.texinfo.iter_mut() {
            swizzle(&mut info.s_axis);
            swizzle(&mut info.t_axis);
        }

        for model in self.models.iter_mut() {
            swizzle(&mut model.mins);
            swizzle(&mut model.maxs);
            swizzle(&mut model.origin);

            // A negated axis swaps which corner is the minimum
            let mins = model.mins.zip_map(&model.maxs, f32::min);
            let maxs = model.mins.zip_map(&model.maxs, f32::max);
            model.mins = mins;
            model.maxs = maxs;
        }

        Q1BspFile {
            entities: self.entities,
            planes: self.planes,
            textures: self.textures,
            vertices: self.vertices,
            edges: self.edges,
            surfedges: self.surfedges,
            texinfo: self.texinfo,
            faces: self.faces,
            models: self.models,
            _phantom: PhantomData,
        }
    }
}
