const PLANE_SIZE: usize = (4 * 3) + 4 + 4;

use super::{record_count, LumpKind, Q1BspFile};
use crate::coords::CoordSystem;
use crate::cursor::ByteCursor;
use crate::traits::planes::*;
use crate::types::Result;

/// Parse a lump of planes.
/// A lump is (data length / plane size) planes long
pub fn from_data(data: &[u8]) -> Result<Box<[Plane]>> {
    let length = record_count(data, PLANE_SIZE, LumpKind::Planes)?;

    let mut cursor = ByteCursor::new(data);
    let mut planes = Vec::with_capacity(length);
    for _ in 0..length {
        planes.push(Plane {
            normal: cursor.read_vec3()?,
            dist: cursor.read_f32()?,
            plane_type: cursor.read_i32()?,
        });
    }

    Ok(planes.into_boxed_slice())
}

impl<T: CoordSystem> HasPlanes<T> for Q1BspFile<T> {
    type PlanesIter<'a> = std::slice::Iter<'a, Plane>
    where
        T: 'a;

    fn planes_iter(&self) -> Self::PlanesIter<'_> {
        self.planes.iter()
    }

    fn planes_len(&self) -> u32 {
        self.planes.len() as u32
    }

    fn get_plane(&self, idx: u32) -> Option<&Plane> {
        self.planes.get(idx as usize)
    }
}

#[test]
fn planes_from_data() {
    let mut data = Vec::new();
    for f in &[0.0f32, 0.0, 1.0, 64.0] {
        data.extend_from_slice(&f.to_le_bytes());
    }
    data.extend_from_slice(&2i32.to_le_bytes());

    let planes = from_data(&data).unwrap();
    assert_eq!(planes.len(), 1);
    assert_eq!(planes[0].normal, na::Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(planes[0].dist, 64.0);
    assert_eq!(planes[0].plane_type, 2);

    assert!(from_data(&data[..19]).is_err());
}
