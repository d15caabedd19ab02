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

use std::iter::Iterator;

/// Number of mip levels stored for each texture
pub const MIP_LEVELS: usize = 4;

/// A palettised texture from a BSP file.
#[derive(Debug, Clone, PartialEq)]
pub struct MipTex {
    pub name: String,
    pub width: u32,
    pub height: u32,

    /// Offset of each mip level from the start of the record. 0 means not stored.
    pub mip_offsets: [u32; MIP_LEVELS],

    /// Palette indices for each stored level, largest first.
    /// Empty if the texture lives in an external WAD.
    pub mips: Box<[Box<[u8]>]>,
}

impl MipTex {
    /// Dimensions of the given mip level. Each level halves the last, down to 1.
    pub fn level_size(&self, level: usize) -> (u32, u32) {
        (
            (self.width >> level).max(1),
            (self.height >> level).max(1),
        )
    }

    /// Number of palette indices in the given mip level.
    pub fn level_len(&self, level: usize) -> usize {
        let (w, h) = self.level_size(level);
        w as usize * h as usize
    }

    /// Palette indices for the given level, if they're in the file.
    pub fn pixels(&self, level: usize) -> Option<&[u8]> {
        self.mips.get(level).map(|x| &x[..])
    }

    /// True if the image data isn't stored in the BSP.
    pub fn is_external(&self) -> bool {
        self.mips.is_empty()
    }
}

pub trait HasTextures {
    type TexturesIter<'a>: Iterator<Item = &'a Option<MipTex>>
    where
        Self: 'a;

    /// Every slot in the miptex directory, including ones with no record.
    fn textures_iter(&self) -> Self::TexturesIter<'_>;
    fn textures_len(&self) -> u32;
    fn get_texture(&self, idx: u32) -> Option<&MipTex>;
}

#[test]
fn miptex_level_sizes() {
    let tex = MipTex {
        name: "wall".to_string(),
        width: 64,
        height: 8,
        mip_offsets: [0; MIP_LEVELS],
        mips: Box::new([]),
    };

    assert_eq!(tex.level_size(0), (64, 8));
    assert_eq!(tex.level_size(3), (8, 1));
    assert_eq!(tex.level_len(2), 16 * 2);
    assert!(tex.is_external());
    assert!(tex.pixels(0).is_none());
}
