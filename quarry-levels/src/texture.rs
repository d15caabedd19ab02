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

//! Turns palettised mip textures into RGBA images

use image::{GrayImage, Luma, Rgba, RgbaImage};
use log::{debug, warn};

use crate::geometry::HiddenSurfaces;
use crate::palette::{Palette, FULLBRIGHT_START, TRANSPARENT_INDEX};
use crate::traits::textures::{HasTextures, MipTex};
use crate::types::{Warned, Warning};

/// A texture from the level, ready to use.
#[derive(Debug, Clone)]
pub struct DecodedTexture {
    /// Slot in the miptex directory this came from
    pub miptex_idx: u32,
    pub name: String,

    /// Level 0, first row at the top.
    pub image: RgbaImage,

    /// White where texels are fullbright, black elsewhere.
    /// Only present if some but not all of the texels are.
    pub emission_mask: Option<GrayImage>,

    /// Liquids, skies, and anything with fullbright texels
    pub is_emissive: bool,

    /// Texture uses index 255 for holes
    pub uses_alpha: bool,
}

fn is_liquid_or_sky(name: &str) -> bool {
    name.starts_with('*') || name.to_ascii_lowercase().starts_with("sky")
}

fn is_fullbright(index: u8) -> bool {
    index >= FULLBRIGHT_START && index != TRANSPARENT_INDEX
}

/// Decode one mip level through `palette`, with `brightness` added to every colour channel.
/// Returns `None` if the level isn't stored in the file.
pub fn decode_level(
    tex: &MipTex,
    level: usize,
    palette: &Palette,
    brightness: f32,
) -> Option<RgbaImage> {
    let palette = palette.adjusted(brightness);
    decode_with(tex, level, &palette)
}

fn decode_with(tex: &MipTex, level: usize, palette: &Palette) -> Option<RgbaImage> {
    let pixels = tex.pixels(level)?;
    let (width, height) = tex.level_size(level);
    if pixels.len() < tex.level_len(level) {
        return None;
    }

    Some(RgbaImage::from_fn(width, height, |x, y| {
        let index = pixels[(y * width + x) as usize];
        let color = palette.color(index);
        let alpha = if index == TRANSPARENT_INDEX { 0 } else { 255 };

        Rgba([color.r, color.g, color.b, alpha])
    }))
}

/// Decode a single texture's largest level.
/// `palette` should already have any brightness adjustment applied.
pub fn decode_texture(
    miptex_idx: u32,
    tex: &MipTex,
    palette: &Palette,
    hidden: &HiddenSurfaces,
) -> Option<DecodedTexture> {
    let image = decode_with(tex, 0, palette)?;
    let pixels = tex.pixels(0)?;

    let liquid_or_sky = is_liquid_or_sky(&tex.name);
    let wants_mask = !liquid_or_sky && !hidden.is_hidden(&tex.name);

    let n_fullbright = if wants_mask {
        pixels.iter().filter(|x| is_fullbright(**x)).count()
    } else {
        0
    };

    let emission_mask = if n_fullbright > 0 && n_fullbright < pixels.len() {
        Some(GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let index = pixels[(y * image.width() + x) as usize];
            Luma([if is_fullbright(index) { 255 } else { 0 }])
        }))
    } else {
        None
    };

    Some(DecodedTexture {
        miptex_idx,
        name: tex.name.clone(),
        image,
        emission_mask,
        is_emissive: liquid_or_sky || n_fullbright > 0,
        uses_alpha: tex.name.starts_with('{'),
    })
}

/// Decode every embedded texture in `level`, using the default list of hidden surfaces.
pub fn decode_textures<L: HasTextures>(
    level: &L,
    palette: &Palette,
    brightness: f32,
) -> Warned<Vec<DecodedTexture>> {
    decode_textures_with(level, palette, brightness, &HiddenSurfaces::default())
}

/// Decode every embedded texture in `level`.
/// Textures stored outside the file produce a warning and are skipped.
/// Hidden surfaces don't get an emission mask.
pub fn decode_textures_with<L: HasTextures>(
    level: &L,
    palette: &Palette,
    brightness: f32,
    hidden: &HiddenSurfaces,
) -> Warned<Vec<DecodedTexture>> {
    let palette = palette.adjusted(brightness);
    let mut textures = Vec::new();
    let mut warnings = Vec::new();

    for (idx, tex) in level.textures_iter().enumerate() {
        let tex = match tex {
            Some(x) => x,
            None => continue,
        };

        match decode_texture(idx as u32, tex, &palette, hidden) {
            Some(decoded) => {
                debug!(
                    "Decoded texture {} ({}x{})",
                    decoded.name, tex.width, tex.height
                );
                textures.push(decoded)
            }
            None => {
                let warning = Warning::UnknownTexture {
                    miptex: idx as i32,
                    name: Some(tex.name.clone()),
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    Warned::with_warnings(textures, warnings)
}

#[cfg(test)]
use crate::traits::textures::MIP_LEVELS;

#[cfg(test)]
fn test_tex(name: &str, pixels: Vec<u8>, width: u32) -> MipTex {
    let height = pixels.len() as u32 / width;
    MipTex {
        name: name.to_string(),
        width,
        height,
        mip_offsets: [1; MIP_LEVELS],
        mips: vec![pixels.into_boxed_slice()].into_boxed_slice(),
    }
}

#[cfg(test)]
fn test_palette() -> Palette {
    let data: Vec<u8> = (0..=255u8).flat_map(|x| vec![x, x / 2, 255 - x]).collect();
    Palette::from_bytes(&data).unwrap()
}

#[test]
fn decode_maps_through_palette() {
    let tex = test_tex("wall", vec![0, 1, 2, 3, 4, 5], 3);
    let image = decode_level(&tex, 0, &test_palette(), 0.0).unwrap();

    assert_eq!(image.dimensions(), (3, 2));
    assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
    assert_eq!(image.get_pixel(1, 1), &Rgba([4, 2, 251, 255]));
    assert!(decode_level(&tex, 1, &test_palette(), 0.0).is_none());
}

#[test]
fn decode_is_deterministic() {
    let tex = test_tex("wall", (0..=255u8).collect(), 16);
    let a = decode_level(&tex, 0, &test_palette(), 0.3).unwrap();
    let b = decode_level(&tex, 0, &test_palette(), 0.3).unwrap();

    assert_eq!(a.into_raw(), b.into_raw());
}

#[test]
fn decode_alpha_only_from_index() {
    let tex = test_tex("{grate", vec![0, 255, 254, 255], 2);

    for brightness in [-1.0, 0.0, 0.5, 3.0].iter() {
        let image = decode_level(&tex, 0, &test_palette(), *brightness).unwrap();
        let alphas: Vec<u8> = image.pixels().map(|p| p.0[3]).collect();
        assert_eq!(alphas, vec![255, 0, 255, 0]);
    }
}

#[test]
fn decode_brightness_clamped() {
    let tex = test_tex("wall", (0..=255u8).collect(), 16);

    let white = decode_level(&tex, 0, &test_palette(), 5.0).unwrap();
    assert!(white.pixels().all(|p| p.0[..3] == [255, 255, 255]));

    let black = decode_level(&tex, 0, &test_palette(), -5.0).unwrap();
    assert!(black.pixels().all(|p| p.0[..3] == [0, 0, 0]));
}

#[test]
fn decode_emission_mask() {
    let palette = test_palette();
    let hidden = HiddenSurfaces::default();

    let tex = test_tex("light1", vec![0, 230, 10, 255], 2);
    let decoded = decode_texture(3, &tex, &palette, &hidden).unwrap();
    assert!(decoded.is_emissive);
    assert!(!decoded.uses_alpha);
    let mask = decoded.emission_mask.unwrap();
    assert_eq!(mask.get_pixel(1, 0), &Luma([255]));
    assert_eq!(mask.get_pixel(1, 1), &Luma([0]));

    // All fullbright: emissive, no mask
    let tex = test_tex("light2", vec![230, 240], 2);
    let decoded = decode_texture(0, &tex, &palette, &hidden).unwrap();
    assert!(decoded.is_emissive);
    assert!(decoded.emission_mask.is_none());

    // Liquids glow without a mask
    let tex = test_tex("*lava1", vec![0, 230], 2);
    let decoded = decode_texture(0, &tex, &palette, &hidden).unwrap();
    assert!(decoded.is_emissive);
    assert!(decoded.emission_mask.is_none());

    let tex = test_tex("wall", vec![0, 1], 2);
    assert!(!decode_texture(0, &tex, &palette, &hidden).unwrap().is_emissive);
}

#[test]
fn decode_smaller_levels() {
    let lump = crate::q1::textures::test_lump(&[Some(("wall", 16, 8, true))]);
    let textures = crate::q1::textures::from_data(&lump).unwrap();
    let tex = textures[0].as_ref().unwrap();
    let palette = Palette::grayscale();

    let level1 = decode_level(tex, 1, &palette, 0.0).unwrap();
    assert_eq!(level1.dimensions(), (8, 4));

    let level2 = decode_level(tex, 2, &palette, 0.0).unwrap();
    assert_eq!(level2.dimensions(), (4, 2));
    assert_eq!(level2.get_pixel(1, 1), &Rgba([5, 5, 5, 255]));

    let level3 = decode_level(tex, 3, &palette, 0.0).unwrap();
    assert_eq!(level3.dimensions(), (2, 1));
    assert_eq!(level3.get_pixel(1, 0), &Rgba([1, 1, 1, 255]));

    assert!(decode_level(tex, 4, &palette, 0.0).is_none());
}
