use crate::cursor::ByteCursor;
use crate::types::{ParseError, Result};

/// The only version we can read. Quake's own maps use this.
pub const BSP_VERSION: i32 = 29;

const N_LUMPS: usize = 15;
pub const HEADER_LEN: usize = 4 + (N_LUMPS * 4 * 2);

/// Every lump in a version 29 file, in directory order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LumpKind {
    Entities = 0,
    Planes = 1,
    MipTex = 2,
    Vertices = 3,
    Visibility = 4,
    Nodes = 5,
    TexInfo = 6,
    Faces = 7,
    Lighting = 8,
    ClipNodes = 9,
    Leaves = 10,
    MarkSurfaces = 11,
    Edges = 12,
    SurfEdges = 13,
    Models = 14,
}

impl LumpKind {
    pub const ALL: [LumpKind; N_LUMPS] = [
        LumpKind::Entities,
        LumpKind::Planes,
        LumpKind::MipTex,
        LumpKind::Vertices,
        LumpKind::Visibility,
        LumpKind::Nodes,
        LumpKind::TexInfo,
        LumpKind::Faces,
        LumpKind::Lighting,
        LumpKind::ClipNodes,
        LumpKind::Leaves,
        LumpKind::MarkSurfaces,
        LumpKind::Edges,
        LumpKind::SurfEdges,
        LumpKind::Models,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LumpKind::Entities => "entities",
            LumpKind::Planes => "planes",
            LumpKind::MipTex => "miptex",
            LumpKind::Vertices => "vertices",
            LumpKind::Visibility => "visibility",
            LumpKind::Nodes => "nodes",
            LumpKind::TexInfo => "texinfo",
            LumpKind::Faces => "faces",
            LumpKind::Lighting => "lighting",
            LumpKind::ClipNodes => "clipnodes",
            LumpKind::Leaves => "leaves",
            LumpKind::MarkSurfaces => "marksurfaces",
            LumpKind::Edges => "edges",
            LumpKind::SurfEdges => "surfedges",
            LumpKind::Models => "models",
        }
    }
}

/// The header found at the start of a (Q1) bsp file
#[derive(Clone, Copy, Debug)]
pub struct Header {
    pub version: i32,
    pub dir_entries: [DirEntry; N_LUMPS],
}

/// A directory entry, pointing to a lump in the file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirEntry {
    /// Offset from beginning of file to start of lump
    pub offset: u32,

    /// Length of lump in bytes
    pub length: u32,
}

impl Header {
    /// Deserialise from buffer.
    /// # Format
    /// int version                 Version number. Always 29.
    /// direntry[15] direntries     Lump directory, fifteen entries.
    pub fn parse(v: &[u8]) -> Result<Header> {
        let mut cursor = ByteCursor::new(v);
        if v.len() < HEADER_LEN {
            return Err(ParseError::OutOfBounds {
                offset: 0,
                len: HEADER_LEN,
                size: v.len(),
            });
        }

        let version = cursor.read_i32()?;
        if version != BSP_VERSION {
            return Err(ParseError::BadVersion(version));
        }

        let mut dir_entries = [DirEntry {
            offset: 0,
            length: 0,
        }; N_LUMPS];
        for entry in dir_entries.iter_mut() {
            // Stored as signed ints, but a negative offset or length is no use to anyone
            *entry = DirEntry {
                offset: cursor.read_u32()?,
                length: cursor.read_u32()?,
            };
        }

        Ok(Header {
            version,
            dir_entries,
        })
    }

    pub fn entry(&self, kind: LumpKind) -> DirEntry {
        self.dir_entries[kind as usize]
    }

    /// Get the given lump from the buffer, with offset & length based on this directory.
    pub fn lump<'l>(&self, buf: &'l [u8], kind: LumpKind) -> Result<&'l [u8]> {
        let entry = self.entry(kind);

        ByteCursor::new(buf).slice(entry.offset as usize, entry.length as usize)
    }
}

#[cfg(test)]
fn test_header(version: i32, lumps: &[(u32, u32)]) -> Vec<u8> {
    let mut buf = version.to_le_bytes().to_vec();
    for n in 0..N_LUMPS {
        let (offset, length) = lumps.get(n).copied().unwrap_or((HEADER_LEN as u32, 0));
        buf.extend_from_slice(&offset.to_le_bytes());
        buf.extend_from_slice(&length.to_le_bytes());
    }
    buf
}

#[test]
fn header_rejects_other_versions() {
    assert_eq!(
        Header::parse(&test_header(30, &[])).unwrap_err(),
        ParseError::BadVersion(30)
    );
    assert_eq!(
        Header::parse(&test_header(0x3250_5342, &[])).unwrap_err(),
        ParseError::BadVersion(0x3250_5342)
    );
}

#[test]
fn header_too_short() {
    let buf = test_header(29, &[]);
    assert!(matches!(
        Header::parse(&buf[..HEADER_LEN - 1]),
        Err(ParseError::OutOfBounds { .. })
    ));
}

#[test]
fn header_lump_lookup() {
    let mut buf = test_header(29, &[(HEADER_LEN as u32, 3), (HEADER_LEN as u32 + 3, 2)]);
    buf.extend_from_slice(b"abcde");

    let header = Header::parse(&buf).unwrap();
    assert_eq!(header.version, 29);
    assert_eq!(header.lump(&buf, LumpKind::Entities).unwrap(), b"abc");
    assert_eq!(header.lump(&buf, LumpKind::Planes).unwrap(), b"de");
    assert_eq!(header.lump(&buf, LumpKind::Models).unwrap(), b"");
}

#[test]
fn header_lump_out_of_bounds() {
    let mut buf = test_header(29, &[(HEADER_LEN as u32, 10)]);
    buf.extend_from_slice(b"short");

    let header = Header::parse(&buf).unwrap();
    assert!(matches!(
        header.lump(&buf, LumpKind::Entities),
        Err(ParseError::OutOfBounds { .. })
    ));
}
