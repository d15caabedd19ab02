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

use crate::coords::CoordSystem;
use na::Vector3;

/// A vertex position. Faces don't reference these directly, only through edges.
pub type Vertex = Vector3<f32>;

/// An undirected edge between two vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub vertices: [u16; 2],
}

/// A signed reference to an edge.
/// The absolute value is the edge index, and a negative sign means the edge is walked from
/// `vertices[1]` to `vertices[0]`.
pub type SurfEdge = i32;

/// Which way an edge is walked around a face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Forwards,
    Backwards,
}

/// Split a surfedge into the edge it points at and the direction it's walked in.
pub fn split_surfedge(surfedge: SurfEdge) -> (u32, EdgeDirection) {
    let direction = if surfedge < 0 {
        EdgeDirection::Backwards
    } else {
        EdgeDirection::Forwards
    };

    (surfedge.unsigned_abs(), direction)
}

impl Edge {
    /// The vertex a face's loop starts this edge at.
    pub fn start(&self, direction: EdgeDirection) -> u16 {
        match direction {
            EdgeDirection::Forwards => self.vertices[0],
            EdgeDirection::Backwards => self.vertices[1],
        }
    }
}

pub trait HasVertices<S: CoordSystem> {
    type VerticesIter<'a>: Iterator<Item = &'a Vertex>
    where
        Self: 'a;

    fn vertices_iter(&self) -> Self::VerticesIter<'_>;
    fn vertices_len(&self) -> u32;
    fn get_vertex(&self, index: u32) -> Option<&Vertex>;
}

pub trait HasEdges<S: CoordSystem>: HasVertices<S> {
    fn edges_len(&self) -> u32;
    fn get_edge(&self, index: u32) -> Option<Edge>;
}

pub trait HasSurfEdges<S: CoordSystem>: HasEdges<S> {
    fn surfedges_len(&self) -> u32;
    fn get_surfedge(&self, index: u32) -> Option<SurfEdge>;

    /// Follow a surfedge to the vertex index a face loop visits.
    fn resolve_surfedge(&self, index: u32) -> Option<u32> {
        let (edge_idx, direction) = split_surfedge(self.get_surfedge(index)?);

        Some(self.get_edge(edge_idx)?.start(direction) as u32)
    }
}

#[test]
fn surfedge_sign_picks_direction() {
    let edge = Edge { vertices: [4, 9] };

    let (idx, dir) = split_surfedge(3);
    assert_eq!(idx, 3);
    assert_eq!(edge.start(dir), 4);

    let (idx, dir) = split_surfedge(-3);
    assert_eq!(idx, 3);
    assert_eq!(edge.start(dir), 9);

    let (idx, _) = split_surfedge(i32::MIN);
    assert_eq!(idx, 1 << 31);
}
