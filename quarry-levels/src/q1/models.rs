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

use super::{record_count, LumpKind, Q1BspFile};
use crate::coords::CoordSystem;
use crate::cursor::ByteCursor;
use crate::traits::models::*;
use crate::types::{ParseError, Result};

const MODEL_SIZE: usize = (4 * 3 * 3) + (4 * 4) + (4 * 3);

/// Parse the models lump. Each model's faces must be in range.
pub fn from_data(data: &[u8], n_faces: u32) -> Result<Box<[Model]>> {
    let length = record_count(data, MODEL_SIZE, LumpKind::Models)?;

    let mut cursor = ByteCursor::new(data);
    let mut models = Vec::with_capacity(length);
    for _ in 0..length {
        let mins = cursor.read_vec3()?;
        let maxs = cursor.read_vec3()?;
        let origin = cursor.read_vec3()?;

        let mut head_nodes = [0; 4];
        for node in head_nodes.iter_mut() {
            *node = cursor.read_i32()?;
        }
        let num_leafs = cursor.read_i32()?;

        let faces_offset = cursor.read_i32()? as i64;
        let faces_n = cursor.read_i32()? as i64;
        if faces_offset < 0 || faces_n < 0 || faces_offset + faces_n > n_faces as i64 {
            return Err(ParseError::IndexOutOfBounds {
                what: "face",
                index: faces_offset + faces_n - 1,
                count: n_faces as usize,
            });
        }

        models.push(Model {
            mins,
            maxs,
            origin,
            head_nodes,
            num_leafs,
            faces_idx: faces_offset as u32..(faces_offset + faces_n) as u32,
        });
    }

    Ok(models.into_boxed_slice())
}

impl<T: CoordSystem> HasModels<T> for Q1BspFile<T> {
    type ModelsIter<'a> = std::slice::Iter<'a, Model>
    where
        T: 'a;

    fn models_iter(&self) -> Self::ModelsIter<'_> {
        self.models.iter()
    }

    fn models_len(&self) -> u32 {
        self.models.len() as u32
    }

    fn get_model(&self, index: u32) -> Option<&Model> {
        self.models.get(index as usize)
    }
}

#[cfg(test)]
fn test_model(first_face: i32, n_faces: i32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MODEL_SIZE);
    for f in &[-16.0f32, -16.0, -16.0, 16.0, 16.0, 16.0, 0.0, 0.0, 0.0] {
        buf.extend_from_slice(&f.to_le_bytes());
    }
    for i in &[0i32, -1, -1, -1, 1, first_face, n_faces] {
        buf.extend_from_slice(&i.to_le_bytes());
    }
    buf
}

#[test]
fn model_face_range() {
    let mut data = test_model(0, 4);
    data.extend(test_model(4, 2));

    let models = from_data(&data, 6).unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].faces_idx, 0..4);
    assert_eq!(models[1].faces_idx, 4..6);
    assert_eq!(models[1].maxs, na::Vector3::new(16.0, 16.0, 16.0));

    assert!(from_data(&data, 5).is_err());
    assert!(from_data(&test_model(0, -1), 5).is_err());
}
