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

//! The 256 colour palette textures are indexed into

use crate::types::{ParseError, Result, Rgb};

pub const PALETTE_LEN: usize = 256 * 3;

/// Texels with this index are see-through.
pub const TRANSPARENT_INDEX: u8 = 255;

/// Indices from here up are drawn without lighting.
pub const FULLBRIGHT_START: u8 = 224;

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Box<[Rgb]>,
}

impl Palette {
    /// Parse a palette.lmp. Must be exactly 256 RGB triples.
    pub fn from_bytes(data: &[u8]) -> Result<Palette> {
        if data.len() != PALETTE_LEN {
            return Err(ParseError::BadPalette(data.len()));
        }

        Ok(Palette {
            colors: data
                .chunks_exact(3)
                .map(|x| Rgb::from_bytes([x[0], x[1], x[2]]))
                .collect(),
        })
    }

    /// Index `n` is the gray `n, n, n`.
    pub fn grayscale() -> Palette {
        Palette {
            colors: (0..=255u8).map(|x| Rgb::from_bytes([x, x, x])).collect(),
        }
    }

    pub fn color(&self, index: u8) -> Rgb {
        self.colors[index as usize]
    }

    /// Every colour with `adjust` added to each channel. See [`adjust_channel`].
    pub fn adjusted(&self, adjust: f32) -> Palette {
        Palette {
            colors: self
                .colors
                .iter()
                .map(|c| Rgb {
                    r: adjust_channel(c.r, adjust),
                    g: adjust_channel(c.g, adjust),
                    b: adjust_channel(c.b, adjust),
                })
                .collect(),
        }
    }
}

/// Add `adjust` to a channel in normalised [0, 1] units, clamping the result.
pub fn adjust_channel(channel: u8, adjust: f32) -> u8 {
    if adjust == 0.0 {
        return channel;
    }

    let adjusted = (f32::from(channel) / 255.0 + adjust).max(0.0).min(1.0);
    (adjusted * 255.0).round() as u8
}

#[test]
fn palette_size_checked() {
    assert_eq!(
        Palette::from_bytes(&[0; 767]).unwrap_err(),
        ParseError::BadPalette(767)
    );
    assert!(Palette::from_bytes(&[0; 769]).is_err());

    let mut data = vec![0; PALETTE_LEN];
    data[3..6].copy_from_slice(&[1, 2, 3]);
    let palette = Palette::from_bytes(&data).unwrap();
    assert_eq!(palette.color(1), Rgb { r: 1, g: 2, b: 3 });
}

#[test]
fn adjust_channel_clamps() {
    assert_eq!(adjust_channel(100, 0.0), 100);
    assert_eq!(adjust_channel(0, 1.0), 255);
    assert_eq!(adjust_channel(255, 0.5), 255);
    assert_eq!(adjust_channel(200, -10.0), 0);
    assert_eq!(adjust_channel(0, 0.2), 51);
    assert_eq!(adjust_channel(255, f32::INFINITY), 255);
}

#[test]
fn adjust_channel_monotonic() {
    let adjustments = [-2.0, -0.5, -0.1, 0.0, 0.05, 0.3, 1.0, 4.0];
    for channel in 0..=255u8 {
        for pair in adjustments.windows(2) {
            assert!(adjust_channel(channel, pair[0]) <= adjust_channel(channel, pair[1]));
        }
    }
    for adjust in adjustments.iter() {
        for channel in 0..255u8 {
            assert!(adjust_channel(channel, *adjust) <= adjust_channel(channel + 1, *adjust));
        }
    }
}
