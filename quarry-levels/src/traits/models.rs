use na::Vector3;
use std::ops::Range;

use super::HasFaces;
use crate::coords::CoordSystem;

/// A separately movable piece of geometry. Model 0 is the static world ("worldspawn").
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub mins: Vector3<f32>,
    pub maxs: Vector3<f32>,
    pub origin: Vector3<f32>,

    /// Root nodes of the render tree and the three collision hulls
    pub head_nodes: [i32; 4],
    pub num_leafs: i32,

    pub faces_idx: Range<u32>,
}

pub trait HasModels<S: CoordSystem>: HasFaces<S> {
    type ModelsIter<'a>: Iterator<Item = &'a Model>
    where
        Self: 'a;

    fn models_iter(&self) -> Self::ModelsIter<'_>;
    fn models_len(&self) -> u32;
    fn get_model(&self, index: u32) -> Option<&Model>;
}
