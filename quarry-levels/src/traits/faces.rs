use std::ops::Range;

use super::{HasPlanes, HasSurfEdges, HasTexInfo};
use crate::coords::CoordSystem;

/// A convex polygon, described by a run of surfedges.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub plane_idx: u32,

    /// True if the face points the opposite way to its plane
    pub is_back: bool,

    pub surfedges_idx: Range<u32>,
    pub texinfo_idx: u32,

    /// Light styles, 255 meaning unused.
    pub styles: [u8; 4],

    /// Offset into the lighting lump, if this face is lightmapped.
    pub lightmap_offset: Option<u32>,
}

pub trait HasFaces<S: CoordSystem>: HasTexInfo<S> + HasSurfEdges<S> + HasPlanes<S> {
    type FacesIter<'a>: Iterator<Item = &'a Face>
    where
        Self: 'a;

    fn faces_iter(&self) -> Self::FacesIter<'_>;
    fn faces_len(&self) -> u32;
    fn get_face(&self, index: u32) -> Option<&Face>;
}
