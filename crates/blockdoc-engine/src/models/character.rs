use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::EntityKey;

/// Inline style and entity reference attached to a single character
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterMetadata {
    #[serde(default)]
    style: BTreeSet<String>,
    #[serde(default)]
    entity: Option<EntityKey>,
}

impl CharacterMetadata {
    /// No inline style, no entity
    pub const EMPTY: CharacterMetadata = CharacterMetadata {
        style: BTreeSet::new(),
        entity: None,
    };

    pub fn new(style: BTreeSet<String>, entity: Option<EntityKey>) -> Self {
        Self { style, entity }
    }

    pub fn style(&self) -> &BTreeSet<String> {
        &self.style
    }

    pub fn has_style(&self, style: &str) -> bool {
        self.style.contains(style)
    }

    pub fn entity(&self) -> Option<&EntityKey> {
        self.entity.as_ref()
    }

    pub fn with_style(&self, style: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.style.insert(style.into());
        next
    }

    pub fn with_entity(&self, entity: Option<EntityKey>) -> Self {
        Self {
            style: self.style.clone(),
            entity,
        }
    }
}

/// Ordered per-character metadata of one block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterList(Vec<CharacterMetadata>);

impl CharacterList {
    pub fn repeat(metadata: CharacterMetadata, count: usize) -> Self {
        Self(vec![metadata; count])
    }

    pub fn get(&self, offset: usize) -> Option<&CharacterMetadata> {
        self.0.get(offset)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterMetadata> {
        self.0.iter()
    }
}

impl FromIterator<CharacterMetadata> for CharacterList {
    fn from_iter<I: IntoIterator<Item = CharacterMetadata>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
