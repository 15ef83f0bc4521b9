//! Fixtures shared by the unit tests.

use std::sync::Arc;

use crate::editing::ContentState;
use crate::models::{ContentBlock, EntityMap};

/// Unstyled blocks from `(key, text)` pairs, in order
pub fn unstyled_blocks(blocks: &[(&str, &str)]) -> Vec<ContentBlock> {
    blocks
        .iter()
        .map(|&(key, text)| ContentBlock::unstyled(key, text))
        .collect()
}

/// Document over `unstyled_blocks(blocks)` with its own entity store, so tests
/// never see entities created elsewhere
pub fn content_of(blocks: &[(&str, &str)]) -> ContentState {
    ContentState::from_block_array(unstyled_blocks(blocks), Some(Arc::new(EntityMap::new())))
}
