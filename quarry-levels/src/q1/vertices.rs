// Copyright (C) 2019 Oscar Shrimpton
//
// This file is part of quarry.
//
// quarry is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// quarry is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with quarry.  If not, see <http://www.gnu.org/licenses/>.

//! Parses the vertices, edges and surfedges lumps

use super::{check_index, record_count, LumpKind, Q1BspFile};
use crate::coords::CoordSystem;
use crate::cursor::ByteCursor;
use crate::traits::vertices::*;
use crate::types::Result;

const VERTEX_SIZE: usize = 4 * 3;
const EDGE_SIZE: usize = 2 * 2;
const SURFEDGE_SIZE: usize = 4;

/// Parse a Vertex list from a lump.
pub fn verts_from_data(data: &[u8]) -> Result<Box<[Vertex]>> {
    let length = record_count(data, VERTEX_SIZE, LumpKind::Vertices)?;

    let mut cursor = ByteCursor::new(data);
    let mut vertices = Vec::with_capacity(length);
    for _ in 0..length {
        vertices.push(cursor.read_vec3()?);
    }

    Ok(vertices.into_boxed_slice())
}

/// Parse the edges lump. Every edge must point at existing vertices.
pub fn edges_from_data(data: &[u8], n_vertices: u32) -> Result<Box<[Edge]>> {
    let length = record_count(data, EDGE_SIZE, LumpKind::Edges)?;

    let mut cursor = ByteCursor::new(data);
    let mut edges = Vec::with_capacity(length);
    for _ in 0..length {
        let vertices = [cursor.read_u16()?, cursor.read_u16()?];
        for vertex in vertices.iter() {
            check_index("vertex", *vertex as i64, n_vertices as usize)?;
        }

        edges.push(Edge { vertices });
    }

    Ok(edges.into_boxed_slice())
}

/// Parse the surfedges lump. The absolute value of each must be a valid edge index.
pub fn surfedges_from_data(data: &[u8], n_edges: u32) -> Result<Box<[SurfEdge]>> {
    let length = record_count(data, SURFEDGE_SIZE, LumpKind::SurfEdges)?;

    let mut cursor = ByteCursor::new(data);
    let mut surfedges = Vec::with_capacity(length);
    for _ in 0..length {
        let surfedge = cursor.read_i32()?;
        let (edge, _) = split_surfedge(surfedge);
        check_index("edge", edge as i64, n_edges as usize)?;

        surfedges.push(surfedge);
    }

    Ok(surfedges.into_boxed_slice())
}

impl<T: CoordSystem> HasVertices<T> for Q1BspFile<T> {
    type VerticesIter<'a> = std::slice::Iter<'a, Vertex>
    where
        T: 'a;

    fn vertices_iter(&self) -> Self::VerticesIter<'_> {
        self.vertices.iter()
    }

    fn vertices_len(&self) -> u32 {
        self.vertices.len() as u32
    }

    fn get_vertex(&self, index: u32) -> Option<&Vertex> {
        self.vertices.get(index as usize)
    }
}

impl<T: CoordSystem> HasEdges<T> for Q1BspFile<T> {
    fn edges_len(&self) -> u32 {
        self.edges.len() as u32
    }

    fn get_edge(&self, index: u32) -> Option<Edge> {
        self.edges.get(index as usize).copied()
    }
}

impl<T: CoordSystem> HasSurfEdges<T> for Q1BspFile<T> {
    fn surfedges_len(&self) -> u32 {
        self.surfedges.len() as u32
    }

    fn get_surfedge(&self, index: u32) -> Option<SurfEdge> {
        self.surfedges.get(index as usize).copied()
    }
}

#[cfg(test)]
use crate::types::ParseError;

#[test]
fn edges_check_vertices() {
    let data: Vec<u8> = [0u16, 1, 1, 2].iter().flat_map(|x| x.to_le_bytes()).collect();

    assert_eq!(edges_from_data(&data, 3).unwrap().len(), 2);
    assert_eq!(
        edges_from_data(&data, 2).unwrap_err(),
        ParseError::IndexOutOfBounds {
            what: "vertex",
            index: 2,
            count: 2
        }
    );
}

#[test]
fn surfedges_check_edges() {
    let data: Vec<u8> = [1i32, -2, 0].iter().flat_map(|x| x.to_le_bytes()).collect();

    assert_eq!(&*surfedges_from_data(&data, 3).unwrap(), &[1, -2, 0]);
    assert!(matches!(
        surfedges_from_data(&data, 2),
        Err(ParseError::IndexOutOfBounds { what: "edge", .. })
    ));
    assert!(matches!(
        surfedges_from_data(&data[..5], 3),
        Err(ParseError::BadLumpSize { .. })
    ));
}
