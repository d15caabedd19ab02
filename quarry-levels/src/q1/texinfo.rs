use super::{record_count, LumpKind, Q1BspFile};
use crate::coords::CoordSystem;
use crate::cursor::ByteCursor;
use crate::traits::texinfo::*;
use crate::types::Result;

const TEXINFO_SIZE: usize = (4 * 8) + 4 + 4;

/// Parse the texinfo lump.
/// The miptex index isn't checked here, faces with a bad one still get geometry.
pub fn from_data(data: &[u8]) -> Result<Box<[TexInfo]>> {
    let length = record_count(data, TEXINFO_SIZE, LumpKind::TexInfo)?;

    let mut cursor = ByteCursor::new(data);
    let mut texinfo = Vec::with_capacity(length);
    for _ in 0..length {
        let s_axis = cursor.read_vec3()?;
        let s_offset = cursor.read_f32()?;
        let t_axis = cursor.read_vec3()?;
        let t_offset = cursor.read_f32()?;
        let miptex_idx = cursor.read_i32()?;
        let flags = TexInfoFlags::from_bits_truncate(cursor.read_u32()?);

        texinfo.push(TexInfo {
            s_axis,
            s_offset,
            t_axis,
            t_offset,
            miptex_idx,
            flags,
        });
    }

    Ok(texinfo.into_boxed_slice())
}

impl<T: CoordSystem> HasTexInfo<T> for Q1BspFile<T> {
    fn texinfo_len(&self) -> u32 {
        self.texinfo.len() as u32
    }

    fn get_texinfo(&self, index: u32) -> Option<&TexInfo> {
        self.texinfo.get(index as usize)
    }
}
