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

use log::warn;

use super::Q1BspFile;
use crate::coords::CoordSystem;
use crate::traits::entities::*;
use crate::types::{Warned, Warning};

const QUOTE: u8 = b'"';
const END_BRACKET: u8 = b'}';
const START_BRACKET: u8 = b'{';

/// Internal enum to parse through the entities string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    InKey,
    InValue,
    AfterKey,
    InsideEntity,
    OutsideEntity,

    /// Recovering from a malformed block, waiting for the next `{`
    Skipping,
}

/// Bytes are Latin-1, so every byte is exactly one char.
/// Quake's own font is code page 437, so characters above 0x7f won't look the same as
/// they do in game, but they are written back out unchanged.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|x| *x as char).collect()
}

fn is_space(chr: u8) -> bool {
    chr == 0 || chr.is_ascii_whitespace()
}

/// Parse the given data as an Entities lump.
///
/// Malformed blocks are dropped with a warning, and parsing picks up again at the next `{`.
pub fn parse_entities(data: &[u8]) -> Warned<Box<[Entity]>> {
    use self::ParseState::*;

    let mut entities = Vec::new();
    let mut warnings = Vec::new();
    let mut attrs = Entity::new();

    let mut state = OutsideEntity;

    let mut entity_start = 0;
    let mut key_start = 0;
    let mut key_end = 0;
    let mut val_start = 0;

    let mut malformed = |offset: usize, reason: &str| {
        let warning = Warning::MalformedEntity {
            offset,
            reason: reason.to_string(),
        };
        warn!("{}", warning);
        warnings.push(warning);
    };

    for (i, chr) in data.iter().copied().enumerate() {
        state = match (state, chr) {
            (Skipping, START_BRACKET) | (OutsideEntity, START_BRACKET) => {
                entity_start = i;
                attrs = Entity::new();
                InsideEntity
            }
            (Skipping, _) => Skipping,
            (OutsideEntity, c) if is_space(c) => OutsideEntity,
            (OutsideEntity, _) => {
                malformed(i, "unexpected text outside of an entity");
                Skipping
            }

            (InsideEntity, c) if is_space(c) => InsideEntity,
            (InsideEntity, QUOTE) => {
                key_start = i + 1;
                InKey
            }
            (InsideEntity, END_BRACKET) => {
                entities.push(std::mem::take(&mut attrs));
                OutsideEntity
            }

            (InKey, QUOTE) => {
                key_end = i;
                AfterKey
            }
            (InValue, QUOTE) => {
                attrs.insert(latin1(&data[key_start..key_end]), latin1(&data[val_start..i]));
                InsideEntity
            }
            (InKey, _) | (InValue, _) => state,

            (AfterKey, c) if is_space(c) => AfterKey,
            (AfterKey, QUOTE) => {
                val_start = i + 1;
                InValue
            }
            (AfterKey, END_BRACKET) => {
                malformed(key_start, "key without a value");
                OutsideEntity
            }

            (InsideEntity, START_BRACKET) | (AfterKey, START_BRACKET) => {
                malformed(entity_start, "entity not closed before the next one");
                entity_start = i;
                attrs = Entity::new();
                InsideEntity
            }
            (InsideEntity, _) | (AfterKey, _) => {
                malformed(i, "unexpected text inside an entity");
                Skipping
            }
        };
    }

    match state {
        OutsideEntity | Skipping => {}
        InKey | InValue => malformed(entity_start, "unterminated string"),
        _ => malformed(entity_start, "end of data inside an entity"),
    }

    Warned::with_warnings(entities.into_boxed_slice(), warnings)
}

/// Write entities back out in the same format they're parsed from.
///
/// Output is Latin-1, with any character outside of it replaced by `?`.
pub fn format_entities(entities: &[Entity]) -> Vec<u8> {
    let mut out = String::new();
    for entity in entities {
        out.push_str("{\n");
        for (key, value) in entity.iter() {
            out.push('"');
            out.push_str(key);
            out.push_str("\" \"");
            out.push_str(value);
            out.push_str("\"\n");
        }
        out.push_str("}\n");
    }

    out.chars()
        .map(|x| if (x as u32) < 256 { x as u8 } else { b'?' })
        .collect()
}

impl<T: CoordSystem> HasEntities for Q1BspFile<T> {
    type EntitiesIter<'a> = std::slice::Iter<'a, Entity>
    where
        T: 'a;

    fn entities_iter(&self) -> Self::EntitiesIter<'_> {
        self.entities.iter()
    }
}

#[test]
fn entities_basic() {
    let parsed = parse_entities(
        b"{\n\"classname\" \"worldspawn\"\n\"wad\" \"gfx/base.wad\"\n}\n\
          {\n\"classname\" \"light\"\n\"origin\" \"0 0 64\"\n}\n\0",
    );

    assert!(parsed.is_clean());
    assert_eq!(parsed.value.len(), 2);
    assert_eq!(parsed.value[0].classname(), Some("worldspawn"));
    assert_eq!(parsed.value[0].get("wad"), Some("gfx/base.wad"));
    assert_eq!(parsed.value[1].get("origin"), Some("0 0 64"));
}

#[test]
fn entities_braces_in_values() {
    let parsed = parse_entities(b"{ \"message\" \"{hello}\" }");

    assert!(parsed.is_clean());
    assert_eq!(parsed.value[0].get("message"), Some("{hello}"));
}

#[test]
fn entities_latin1() {
    let parsed = parse_entities(b"{ \"message\" \"\x80\xff\" }");

    assert_eq!(parsed.value[0].get("message"), Some("\u{80}\u{ff}"));
    assert_eq!(format_entities(&parsed.value), b"{\n\"message\" \"\x80\xff\"\n}\n");
}

#[test]
fn entities_recover() {
    let parsed = parse_entities(
        b"{ \"classname\" \"light\" \"origin\" }\n\
          junk { \"classname\" \"info_null\" }\n\
          { \"classname\" \"info_player_start\" }\n\
          { \"classname\"",
    );

    assert_eq!(parsed.value.len(), 2);
    assert_eq!(parsed.value[0].classname(), Some("info_null"));
    assert_eq!(parsed.value[1].classname(), Some("info_player_start"));

    // key without value, junk, end of data
    assert_eq!(parsed.warnings.len(), 3);
    assert!(matches!(
        parsed.warnings[0],
        Warning::MalformedEntity { offset: 23, .. }
    ));
}

#[test]
fn entities_multiline_values() {
    let entities: Vec<Entity> = vec![vec![
        ("classname", "trigger_once"),
        ("message", "line one\nline two"),
    ]
    .into_iter()
    .collect()];

    let parsed = parse_entities(&format_entities(&entities));
    assert!(parsed.is_clean());
    assert_eq!(&*parsed.value, &entities[..]);
}

#[test]
fn entities_unterminated_string() {
    let parsed = parse_entities(b"{ \"classname\" \"light\" }\n{ \"message\" \"never closed\n");

    assert_eq!(parsed.value.len(), 1);
    assert!(matches!(
        parsed.warnings[..],
        [Warning::MalformedEntity { offset: 24, ref reason }] if reason == "unterminated string"
    ));
}

#[test]
fn entities_nested_block() {
    let parsed = parse_entities(b"{ \"a\" \"b\" { \"classname\" \"light\" }");

    assert_eq!(parsed.value.len(), 1);
    assert_eq!(parsed.value[0].get("a"), None);
    assert_eq!(parsed.value[0].classname(), Some("light"));
    assert!(matches!(
        parsed.warnings[..],
        [Warning::MalformedEntity { offset: 0, .. }]
    ));
}

#[test]
fn entities_round_trip() {
    let entities: Vec<Entity> = vec![
        vec![("classname", "worldspawn"), ("message", "The Slipgate Complex")]
            .into_iter()
            .collect(),
        vec![("classname", "light"), ("light", "200"), ("_color", "1 0.5 0")]
            .into_iter()
            .collect(),
        Entity::new(),
    ];

    let parsed = parse_entities(&format_entities(&entities));
    assert!(parsed.is_clean());
    assert_eq!(&*parsed.value, &entities[..]);
}
