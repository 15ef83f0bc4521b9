use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{CharacterList, CharacterMetadata, EntityKey};

/// Opaque identifier of a block within a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for BlockKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for BlockKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Block type tag
///
/// The well-known rich-text kinds get their own variant; anything else is
/// carried verbatim in `Custom` so unknown tags survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    #[default]
    Unstyled,
    Paragraph,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    UnorderedListItem,
    OrderedListItem,
    Blockquote,
    CodeBlock,
    Atomic,
    Custom(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::Paragraph => "paragraph",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::HeaderFour => "header-four",
            BlockType::HeaderFive => "header-five",
            BlockType::HeaderSix => "header-six",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
            BlockType::Atomic => "atomic",
            BlockType::Custom(tag) => tag,
        }
    }
}

impl From<&str> for BlockType {
    fn from(tag: &str) -> Self {
        match tag {
            "unstyled" => BlockType::Unstyled,
            "paragraph" => BlockType::Paragraph,
            "header-one" => BlockType::HeaderOne,
            "header-two" => BlockType::HeaderTwo,
            "header-three" => BlockType::HeaderThree,
            "header-four" => BlockType::HeaderFour,
            "header-five" => BlockType::HeaderFive,
            "header-six" => BlockType::HeaderSix,
            "unordered-list-item" => BlockType::UnorderedListItem,
            "ordered-list-item" => BlockType::OrderedListItem,
            "blockquote" => BlockType::Blockquote,
            "code-block" => BlockType::CodeBlock,
            "atomic" => BlockType::Atomic,
            other => BlockType::Custom(other.to_string()),
        }
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        BlockType::from(tag.as_str())
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.as_str().to_string()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical block of text with per-character metadata
///
/// Blocks are immutable values. The `with_*` methods return a modified copy and
/// leave the original untouched, so a block held by an older document snapshot
/// never changes underneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    key: BlockKey,
    #[serde(rename = "type")]
    block_type: BlockType,
    text: String,
    character_list: CharacterList,
    #[serde(default)]
    depth: usize,
}

impl ContentBlock {
    pub fn new(
        key: impl Into<BlockKey>,
        block_type: BlockType,
        text: impl Into<String>,
        character_list: CharacterList,
    ) -> Self {
        Self {
            key: key.into(),
            block_type,
            text: text.into(),
            character_list,
            depth: 0,
        }
    }

    /// Block whose every character carries [`CharacterMetadata::EMPTY`]
    pub fn unstyled(key: impl Into<BlockKey>, text: impl Into<String>) -> Self {
        let text = text.into();
        let character_list = CharacterList::repeat(CharacterMetadata::EMPTY, text.chars().count());
        Self::new(key, BlockType::Unstyled, text, character_list)
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn block_type(&self) -> &BlockType {
        &self.block_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn character_list(&self) -> &CharacterList {
        &self.character_list
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Length in characters, the unit every block offset is measured in
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn inline_style_at(&self, offset: usize) -> BTreeSet<String> {
        self.character_list
            .get(offset)
            .map(|c| c.style().clone())
            .unwrap_or_default()
    }

    pub fn entity_at(&self, offset: usize) -> Option<&EntityKey> {
        self.character_list.get(offset).and_then(|c| c.entity())
    }

    pub fn with_text(&self, text: impl Into<String>, character_list: CharacterList) -> Self {
        Self {
            text: text.into(),
            character_list,
            ..self.clone()
        }
    }

    pub fn with_type(&self, block_type: BlockType) -> Self {
        Self {
            block_type,
            ..self.clone()
        }
    }

    pub fn with_depth(&self, depth: usize) -> Self {
        Self {
            depth,
            ..self.clone()
        }
    }
}
