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

//! Parses the miptex lump

use super::Q1BspFile;
use crate::coords::CoordSystem;
use crate::cursor::ByteCursor;
use crate::traits::textures::*;
use crate::types::{ParseError, Result};

const NAME_LEN: usize = 16;

/// Parse the miptex lump.
///
/// Slots with an offset of 0 or less have no record, and are kept as `None` so that
/// texinfo indices still line up.
pub fn from_data(lump: &[u8]) -> Result<Box<[Option<MipTex>]>> {
    if lump.is_empty() {
        return Ok(Box::new([]));
    }

    let mut cursor = ByteCursor::new(lump);
    let count = cursor.read_i32()?;
    if count < 0 || count as usize > cursor.remaining() / 4 {
        return Err(ParseError::OutOfBounds {
            offset: 4,
            len: (count as i64 * 4).max(0) as usize,
            size: lump.len(),
        });
    }

    let mut textures = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let offset = cursor.read_i32()?;
        if offset <= 0 {
            textures.push(None);
            continue;
        }

        textures.push(Some(miptex_from_data(lump, offset as usize)?));
    }

    Ok(textures.into_boxed_slice())
}

fn miptex_from_data(lump: &[u8], offset: usize) -> Result<MipTex> {
    let mut cursor = ByteCursor::at(lump, offset)?;

    let name = cursor.read_bytes(NAME_LEN)?;
    let name_len = name.iter().position(|x| *x == 0).unwrap_or(NAME_LEN);
    let name = name[..name_len].iter().map(|x| *x as char).collect();

    let width = cursor.read_u32()?;
    let height = cursor.read_u32()?;

    let mut mip_offsets = [0; MIP_LEVELS];
    for mip_offset in mip_offsets.iter_mut() {
        *mip_offset = cursor.read_u32()?;
    }

    let mut tex = MipTex {
        name,
        width,
        height,
        mip_offsets,
        mips: Box::new([]),
    };

    // Level 0 at offset 0 means the pixels are in a WAD somewhere else
    let mut mips = Vec::with_capacity(MIP_LEVELS);
    for (level, mip_offset) in mip_offsets.iter().enumerate() {
        if *mip_offset == 0 {
            break;
        }

        let start = offset
            .checked_add(*mip_offset as usize)
            .ok_or(ParseError::OutOfBounds {
                offset,
                len: *mip_offset as usize,
                size: lump.len(),
            })?;
        let pixels = ByteCursor::new(lump).slice(start, tex.level_len(level))?;
        mips.push(pixels.to_vec().into_boxed_slice());
    }
    tex.mips = mips.into_boxed_slice();

    Ok(tex)
}

impl<T: CoordSystem> HasTextures for Q1BspFile<T> {
    type TexturesIter<'a> = std::slice::Iter<'a, Option<MipTex>>
    where
        T: 'a;

    fn textures_iter(&self) -> Self::TexturesIter<'_> {
        self.textures.iter()
    }

    fn textures_len(&self) -> u32 {
        self.textures.len() as u32
    }

    fn get_texture(&self, idx: u32) -> Option<&MipTex> {
        self.textures.get(idx as usize)?.as_ref()
    }
}

#[cfg(test)]
pub(crate) fn test_lump(records: &[Option<(&str, u32, u32, bool)>]) -> Vec<u8> {
    let header_len = 4 + records.len() * 4;
    let mut offsets = Vec::new();
    let mut body = Vec::new();

    for record in records {
        let (name, w, h, embedded) = match record {
            Some(x) => *x,
            None => {
                offsets.push(0i32);
                continue;
            }
        };
        offsets.push((header_len + body.len()) as i32);

        let mut name_buf = [0u8; NAME_LEN];
        name_buf[..name.len()].copy_from_slice(name.as_bytes());
        body.extend_from_slice(&name_buf);
        body.extend_from_slice(&w.to_le_bytes());
        body.extend_from_slice(&h.to_le_bytes());

        let mut mip_offset = (NAME_LEN + 4 * 2 + 4 * MIP_LEVELS) as u32;
        let mut pixels = Vec::new();
        for level in 0..MIP_LEVELS as u32 {
            let len = (w >> level).max(1) * (h >> level).max(1);
            body.extend_from_slice(&(if embedded { mip_offset } else { 0 }).to_le_bytes());
            pixels.extend((0..len).map(|x| x as u8));
            mip_offset += len;
        }
        if embedded {
            body.extend(pixels);
        }
    }

    let mut lump = (records.len() as i32).to_le_bytes().to_vec();
    for offset in offsets {
        lump.extend_from_slice(&offset.to_le_bytes());
    }
    lump.extend(body);
    lump
}

#[test]
fn miptex_directory() {
    let lump = test_lump(&[
        Some(("*lava1", 16, 8, true)),
        None,
        Some(("wizmet1_2", 32, 32, false)),
    ]);
    let textures = from_data(&lump).unwrap();

    assert_eq!(textures.len(), 3);

    let lava = textures[0].as_ref().unwrap();
    assert_eq!(lava.name, "*lava1");
    assert_eq!((lava.width, lava.height), (16, 8));
    assert_eq!(lava.mips.len(), MIP_LEVELS);
    assert_eq!(lava.pixels(0).unwrap().len(), 16 * 8);
    assert_eq!(lava.pixels(3).unwrap().len(), 2);
    assert_eq!(lava.pixels(0).unwrap()[5], 5);

    assert!(textures[1].is_none());

    let external = textures[2].as_ref().unwrap();
    assert_eq!(external.name, "wizmet1_2");
    assert!(external.is_external());
}

#[test]
fn miptex_out_of_lump() {
    let mut lump = test_lump(&[Some(("brick", 16, 16, true))]);
    lump.truncate(lump.len() - 1);

    assert!(matches!(
        from_data(&lump),
        Err(ParseError::OutOfBounds { .. })
    ));
}

#[test]
fn miptex_bad_directory() {
    assert_eq!(from_data(&[]).unwrap().len(), 0);

    let mut lump = 2i32.to_le_bytes().to_vec();
    lump.extend_from_slice(&0i32.to_le_bytes());
    assert!(from_data(&lump).is_err());

    let mut lump = 1i32.to_le_bytes().to_vec();
    lump.extend_from_slice(&500i32.to_le_bytes());
    assert!(from_data(&lump).is_err());
}
