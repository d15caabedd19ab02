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

use super::{check_index, record_count, LumpKind, Q1BspFile};
use crate::coords::CoordSystem;
use crate::cursor::ByteCursor;
use crate::traits::faces::*;
use crate::types::{ParseError, Result};

const FACE_SIZE: usize = 2 + 2 + 4 + 2 + 2 + 4 + 4;

pub fn from_data(
    data: &[u8],
    n_planes: u32,
    n_texinfo: u32,
    n_surfedges: u32,
) -> Result<Box<[Face]>> {
    let length = record_count(data, FACE_SIZE, LumpKind::Faces)?;

    let mut cursor = ByteCursor::new(data);
    let mut faces = Vec::with_capacity(length);
    for _ in 0..length {
        faces.push(face_from_cursor(
            &mut cursor,
            n_planes,
            n_texinfo,
            n_surfedges,
        )?);
    }

    Ok(faces.into_boxed_slice())
}

fn face_from_cursor(
    cursor: &mut ByteCursor,
    n_planes: u32,
    n_texinfo: u32,
    n_surfedges: u32,
) -> Result<Face> {
    // plane
    let plane_idx = cursor.read_u16()? as u32;
    check_index("plane", plane_idx as i64, n_planes as usize)?;
    let is_back = cursor.read_u16()? != 0;

    // surfedges
    let surfedges_offset = cursor.read_i32()?;
    let surfedges_n = cursor.read_u16()? as i64;
    if surfedges_offset < 0 || surfedges_offset as i64 + surfedges_n > n_surfedges as i64 {
        return Err(ParseError::IndexOutOfBounds {
            what: "surfedge",
            index: surfedges_offset as i64 + surfedges_n - 1,
            count: n_surfedges as usize,
        });
    }
    let surfedges_idx = surfedges_offset as u32..(surfedges_offset as i64 + surfedges_n) as u32;

    // texinfo
    let texinfo_idx = cursor.read_u16()? as u32;
    check_index("texinfo", texinfo_idx as i64, n_texinfo as usize)?;

    // lighting
    let mut styles = [0; 4];
    for style in styles.iter_mut() {
        *style = cursor.read_u8()?;
    }
    let lightmap_offset = cursor.read_i32()?;
    let lightmap_offset = if lightmap_offset >= 0 {
        Some(lightmap_offset as u32)
    } else {
        None
    };

    Ok(Face {
        plane_idx,
        is_back,
        surfedges_idx,
        texinfo_idx,
        styles,
        lightmap_offset,
    })
}

impl<T: CoordSystem> HasFaces<T> for Q1BspFile<T> {
    type FacesIter<'a> = std::slice::Iter<'a, Face>
    where
        T: 'a;

    fn faces_iter(&self) -> Self::FacesIter<'_> {
        self.faces.iter()
    }

    fn faces_len(&self) -> u32 {
        self.faces.len() as u32
    }

    fn get_face(&self, index: u32) -> Option<&Face> {
        self.faces.get(index as usize)
    }
}

#[cfg(test)]
fn test_face(plane: u16, first_surfedge: i32, n_surfedges: u16, texinfo: u16) -> Vec<u8> {
    let mut buf = Vec::with_capacity(FACE_SIZE);
    buf.extend_from_slice(&plane.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes());
    buf.extend_from_slice(&first_surfedge.to_le_bytes());
    buf.extend_from_slice(&n_surfedges.to_le_bytes());
    buf.extend_from_slice(&texinfo.to_le_bytes());
    buf.extend_from_slice(&[0, 255, 255, 255]);
    buf.extend_from_slice(&(-1i32).to_le_bytes());
    buf
}

#[test]
fn face_from_data() {
    let faces = from_data(&test_face(0, 2, 4, 1), 1, 2, 6).unwrap();

    assert_eq!(faces.len(), 1);
    assert!(faces[0].is_back);
    assert_eq!(faces[0].surfedges_idx, 2..6);
    assert_eq!(faces[0].texinfo_idx, 1);
    assert_eq!(faces[0].styles, [0, 255, 255, 255]);
    assert_eq!(faces[0].lightmap_offset, None);
}

#[test]
fn face_references_checked() {
    // plane
    assert!(from_data(&test_face(1, 0, 3, 0), 1, 1, 3).is_err());
    // surfedge range
    assert!(from_data(&test_face(0, 1, 3, 0), 1, 1, 3).is_err());
    assert!(from_data(&test_face(0, -1, 3, 0), 1, 1, 3).is_err());
    // texinfo
    assert!(from_data(&test_face(0, 0, 3, 1), 1, 1, 3).is_err());
}
