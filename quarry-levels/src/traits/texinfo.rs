use crate::coords::CoordSystem;
use na::{Vector2, Vector3};

use super::HasTextures;

bitflags!(
    /// Flags stored alongside each texinfo.
    pub struct TexInfoFlags: u32 {
        /// Animated, liquid or sky surface. Not lightmapped.
        const SPECIAL = 0x1;
    }
);

/// Planar projection of a texture onto faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexInfo {
    pub s_axis: Vector3<f32>,
    pub s_offset: f32,
    pub t_axis: Vector3<f32>,
    pub t_offset: f32,

    /// Index into the miptex directory. May not point to an actual texture.
    pub miptex_idx: i32,
    pub flags: TexInfoFlags,
}

impl TexInfo {
    /// Texture coordinates of `point`, in texels.
    pub fn texel_coords(&self, point: &Vector3<f32>) -> Vector2<f32> {
        Vector2::new(
            point.dot(&self.s_axis) + self.s_offset,
            point.dot(&self.t_axis) + self.t_offset,
        )
    }

    /// Texture coordinates of `point`, where 1.0 is the width/height of the texture.
    pub fn uv(&self, point: &Vector3<f32>, width: u32, height: u32) -> Vector2<f32> {
        let texels = self.texel_coords(point);
        Vector2::new(
            texels.x / width.max(1) as f32,
            texels.y / height.max(1) as f32,
        )
    }

    pub fn is_special(&self) -> bool {
        self.flags.contains(TexInfoFlags::SPECIAL)
    }
}

pub trait HasTexInfo<S: CoordSystem>: HasTextures {
    fn texinfo_len(&self) -> u32;
    fn get_texinfo(&self, index: u32) -> Option<&TexInfo>;
}

#[test]
fn texinfo_uv_projection() {
    let info = TexInfo {
        s_axis: Vector3::new(1.0, 0.0, 0.0),
        s_offset: 8.0,
        t_axis: Vector3::new(0.0, -1.0, 0.0),
        t_offset: 0.0,
        miptex_idx: 0,
        flags: TexInfoFlags::empty(),
    };

    let point = Vector3::new(24.0, 16.0, 100.0);
    assert_eq!(info.texel_coords(&point), Vector2::new(32.0, -16.0));
    assert_eq!(info.uv(&point, 64, 32), Vector2::new(0.5, -0.5));
    assert!(!info.is_special());
}
