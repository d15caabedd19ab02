use crate::coords::CoordSystem;
use na::Vector3;
use std::iter::Iterator;

/// Generic plane, referenced by faces, nodes & clipnodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Plane normal
    pub normal: Vector3<f32>,

    /// Distance from origin to plane along normal
    pub dist: f32,

    /// 0-2 for planes facing down the X, Y or Z axis, 3-5 for ones closest to them.
    pub plane_type: i32,
}

pub trait HasPlanes<S: CoordSystem> {
    type PlanesIter<'a>: Iterator<Item = &'a Plane>
    where
        Self: 'a;

    fn planes_iter(&self) -> Self::PlanesIter<'_>;
    fn planes_len(&self) -> u32;
    fn get_plane(&self, idx: u32) -> Option<&Plane>;
}
