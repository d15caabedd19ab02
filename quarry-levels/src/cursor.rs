//! Bounds-checked little-endian reads over a byte buffer

use na::Vector3;

use crate::types::{ParseError, Result};

/// Reads values out of a borrowed buffer, tracking its own position.
///
/// Any number of cursors can share the same buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor { data, pos: 0 }
    }

    /// Start reading `data` at `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> Result<ByteCursor<'a>> {
        let mut cursor = ByteCursor::new(data);
        cursor.seek(offset)?;
        Ok(cursor)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Move to an absolute offset. Seeking to the very end is allowed.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(ParseError::OutOfBounds {
                offset,
                len: 0,
                size: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Borrow `length` bytes at `offset` without moving the cursor.
    pub fn slice(&self, offset: usize, length: usize) -> Result<&'a [u8]> {
        let oob = ParseError::OutOfBounds {
            offset,
            len: length,
            size: self.data.len(),
        };
        let end = offset.checked_add(length).ok_or_else(|| oob.clone())?;
        self.data.get(offset..end).ok_or(oob)
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let bytes = self.slice(self.pos, length)?;
        self.pos += length;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Three consecutive floats
    pub fn read_vec3(&mut self) -> Result<Vector3<f32>> {
        Ok(Vector3::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }
}

#[test]
fn cursor_reads_little_endian() {
    let buf: &[u8] = &[
        0x01, // u8
        0x34, 0x12, // u16
        0xfe, 0xff, 0xff, 0xff, // i32 -2
        0x00, 0x00, 0x80, 0x3f, // f32 1.0
    ];
    let mut cursor = ByteCursor::new(buf);

    assert_eq!(cursor.read_u8().unwrap(), 1);
    assert_eq!(cursor.read_u16().unwrap(), 0x1234);
    assert_eq!(cursor.read_i32().unwrap(), -2);
    assert_eq!(cursor.read_f32().unwrap(), 1.0);
    assert_eq!(cursor.remaining(), 0);
}

#[test]
fn cursor_out_of_bounds() {
    let buf: &[u8] = &[0x00, 0x01, 0x02];
    let mut cursor = ByteCursor::new(buf);

    assert_eq!(
        cursor.read_u32(),
        Err(ParseError::OutOfBounds {
            offset: 0,
            len: 4,
            size: 3
        })
    );
    // A failed read doesn't move the cursor
    assert_eq!(cursor.position(), 0);
    assert_eq!(cursor.read_u16().unwrap(), 0x0100);

    assert!(cursor.slice(2, 2).is_err());
    assert!(cursor.slice(usize::MAX, 2).is_err());
    assert!(cursor.seek(4).is_err());
}

#[test]
fn cursor_seek_and_slice() {
    let buf: &[u8] = &[0xaa, 0xbb, 0xcc, 0xdd];
    let mut cursor = ByteCursor::at(buf, 2).unwrap();

    assert_eq!(cursor.read_u8().unwrap(), 0xcc);
    assert_eq!(cursor.slice(0, 2).unwrap(), &[0xaa, 0xbb]);
    assert_eq!(cursor.position(), 3);

    cursor.seek(4).unwrap();
    assert_eq!(cursor.remaining(), 0);
    assert!(cursor.read_u8().is_err());
}
