use serde::{Deserialize, Serialize};
use std::iter::{FromIterator, Iterator};

/// A game entity: an ordered set of key/value pairs from the entities lump.
///
/// Inserting a key that already exists replaces its value but keeps its position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    attributes: Vec<(String, String)>,
}

impl Entity {
    pub fn new() -> Entity {
        Entity::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();

        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn classname(&self) -> Option<&str> {
        self.get("classname")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Entity {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Entity {
        let mut entity = Entity::new();
        for (k, v) in iter {
            entity.insert(k, v);
        }
        entity
    }
}

pub trait HasEntities {
    type EntitiesIter<'a>: Iterator<Item = &'a Entity>
    where
        Self: 'a;

    fn entities_iter(&self) -> Self::EntitiesIter<'_>;
}

#[test]
fn entity_last_write_wins() {
    let ent: Entity = vec![
        ("classname", "light"),
        ("origin", "0 0 0"),
        ("classname", "light_torch_small_walltorch"),
    ]
    .into_iter()
    .collect();

    assert_eq!(ent.len(), 2);
    assert_eq!(ent.classname(), Some("light_torch_small_walltorch"));
    assert_eq!(
        ent.iter().map(|(k, _)| k).collect::<Vec<_>>(),
        vec!["classname", "origin"]
    );
    assert_eq!(ent.get("light"), None);
}
