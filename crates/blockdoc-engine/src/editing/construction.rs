use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::editing::{ContentState, generate_random_key};
use crate::models::{BlockMap, ContentBlock, EntityMap, EntityStoreRef, SelectionState};

/// Default block delimiter: any of `\r\n`, `\r`, `\n`
fn default_delimiter() -> &'static Regex {
    static DELIMITER: OnceLock<Regex> = OnceLock::new();
    DELIMITER.get_or_init(|| Regex::new(r"\r\n?|\n").expect("Invalid delimiter regex"))
}

/// Blocks handed to [`ContentState::from_block_array`]
///
/// Either a plain list, or the output of a converter that wraps the list
/// under `contentBlocks`.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockArray {
    Blocks(Vec<ContentBlock>),
    Converted(ConvertedBlocks),
}

/// Converter output carrying its blocks under the conventional field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedBlocks {
    pub content_blocks: Vec<ContentBlock>,
}

impl BlockArray {
    pub fn into_blocks(self) -> Vec<ContentBlock> {
        match self {
            BlockArray::Blocks(blocks) => blocks,
            BlockArray::Converted(converted) => converted.content_blocks,
        }
    }
}

impl From<Vec<ContentBlock>> for BlockArray {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        BlockArray::Blocks(blocks)
    }
}

impl From<ConvertedBlocks> for BlockArray {
    fn from(converted: ConvertedBlocks) -> Self {
        BlockArray::Converted(converted)
    }
}

/// Strip characters the model never stores inside a block
pub fn sanitize_text(input: &str) -> String {
    input.replace('\r', "")
}

impl ContentState {
    /// Build a document from blocks in document order
    ///
    /// Both selections start collapsed at the beginning of the first block, or
    /// are the empty marker when there are no blocks. Without an explicit
    /// `entity_map` the document uses [`EntityMap::global`].
    pub fn from_block_array(
        blocks: impl Into<BlockArray>,
        entity_map: Option<EntityStoreRef>,
    ) -> Self {
        let block_map = BlockMap::from_blocks(blocks.into().into_blocks());
        let selection = match block_map.first() {
            Some(first) => SelectionState::create_empty(first.key().clone()),
            None => SelectionState::default(),
        };
        log::debug!("built content state with {} blocks", block_map.len());

        Self {
            block_map,
            entity_map: entity_map.unwrap_or_else(EntityMap::global),
            selection_before: selection.clone(),
            selection_after: selection,
        }
    }

    /// Build a document with one unstyled block per piece of `text`
    ///
    /// `text` is split on `delimiter`, or on any line break when `None`. Every
    /// piece is sanitised and gets a freshly generated key. `entity_map` is
    /// handled as in [`ContentState::from_block_array`].
    pub fn from_text(
        text: &str,
        delimiter: Option<&Regex>,
        entity_map: Option<EntityStoreRef>,
    ) -> Self {
        let delimiter = delimiter.unwrap_or_else(|| default_delimiter());
        let blocks = delimiter
            .split(text)
            .map(|piece| ContentBlock::unstyled(generate_random_key(), sanitize_text(piece)))
            .collect::<Vec<_>>();
        Self::from_block_array(blocks, entity_map)
    }
}
