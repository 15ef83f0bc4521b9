use std::sync::Arc;

use indexmap::IndexMap;

use crate::models::{BlockKey, ContentBlock};

/// Insertion-ordered, persistent map from block key to block
///
/// Order is document order, top to bottom. The table itself sits behind an
/// `Arc` and every block behind its own `Arc`, so cloning a map is cheap and an
/// update copies only the index while every untouched block stays shared with
/// the map it was derived from.
#[derive(Debug, Clone, Default)]
pub struct BlockMap {
    blocks: Arc<IndexMap<BlockKey, Arc<ContentBlock>>>,
}

impl BlockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from blocks in document order
    ///
    /// A repeated key replaces the earlier block in place; its position is the
    /// one where the key was first seen.
    pub fn from_blocks(blocks: impl IntoIterator<Item = ContentBlock>) -> Self {
        let blocks = blocks
            .into_iter()
            .map(|block| (block.key().clone(), Arc::new(block)))
            .collect::<IndexMap<_, _>>();
        Self {
            blocks: Arc::new(blocks),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Arc<ContentBlock>> {
        self.blocks.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.blocks.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn first(&self) -> Option<&Arc<ContentBlock>> {
        self.blocks.first().map(|(_, block)| block)
    }

    pub fn last(&self) -> Option<&Arc<ContentBlock>> {
        self.blocks.last().map(|(_, block)| block)
    }

    /// Position of `key` in document order
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.blocks.get_index_of(key)
    }

    /// The key directly above `key`, or `None` when `key` is first or unknown
    pub fn key_before(&self, key: &str) -> Option<&BlockKey> {
        let index = self.index_of(key)?.checked_sub(1)?;
        self.blocks.get_index(index).map(|(k, _)| k)
    }

    /// The key directly below `key`, or `None` when `key` is last or unknown
    pub fn key_after(&self, key: &str) -> Option<&BlockKey> {
        let index = self.index_of(key)? + 1;
        self.blocks.get_index(index).map(|(k, _)| k)
    }

    pub fn block_before(&self, key: &str) -> Option<&Arc<ContentBlock>> {
        let index = self.index_of(key)?.checked_sub(1)?;
        self.blocks.get_index(index).map(|(_, block)| block)
    }

    pub fn block_after(&self, key: &str) -> Option<&Arc<ContentBlock>> {
        let index = self.index_of(key)? + 1;
        self.blocks.get_index(index).map(|(_, block)| block)
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &BlockKey> {
        self.blocks.keys()
    }

    pub fn blocks(&self) -> impl DoubleEndedIterator<Item = &Arc<ContentBlock>> {
        self.blocks.values()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&BlockKey, &Arc<ContentBlock>)> {
        self.blocks.iter()
    }

    /// New map with `block` stored under its key
    ///
    /// An existing key keeps its position; a new key is appended at the end.
    pub fn with_block(&self, block: ContentBlock) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.blocks).insert(block.key().clone(), Arc::new(block));
        next
    }

    /// New map without `key`; the remaining blocks keep their order
    pub fn without_block(&self, key: &str) -> Self {
        let mut next = self.clone();
        if next.blocks.contains_key(key) {
            Arc::make_mut(&mut next.blocks).shift_remove(key);
        }
        next
    }

    /// True when both maps share the same underlying table
    pub fn ptr_eq(&self, other: &BlockMap) -> bool {
        Arc::ptr_eq(&self.blocks, &other.blocks)
    }
}

impl PartialEq for BlockMap {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.blocks == other.blocks
    }
}

impl FromIterator<ContentBlock> for BlockMap {
    fn from_iter<I: IntoIterator<Item = ContentBlock>>(iter: I) -> Self {
        Self::from_blocks(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn abc() -> BlockMap {
        BlockMap::from_blocks([
            ContentBlock::unstyled("a", "alpha"),
            ContentBlock::unstyled("b", "beta"),
            ContentBlock::unstyled("c", "gamma"),
        ])
    }

    fn keys(map: &BlockMap) -> Vec<&str> {
        map.keys().map(BlockKey::as_str).collect()
    }

    #[test]
    fn test_preserves_insertion_order() {
        let map = abc();
        assert_eq!(keys(&map), vec!["a", "b", "c"]);
        assert_eq!(map.first().unwrap().text(), "alpha");
        assert_eq!(map.last().unwrap().text(), "gamma");
        assert_eq!(
            map.keys().rev().map(BlockKey::as_str).collect::<Vec<_>>(),
            vec!["c", "b", "a"]
        );
    }

    #[test]
    fn test_neighbour_lookups() {
        let map = abc();
        assert_eq!(map.key_before("b").map(BlockKey::as_str), Some("a"));
        assert_eq!(map.key_after("b").map(BlockKey::as_str), Some("c"));
        assert_eq!(map.key_before("a"), None);
        assert_eq!(map.key_after("c"), None);
        assert_eq!(map.block_before("c").unwrap().text(), "beta");
        assert_eq!(map.block_after("a").unwrap().text(), "beta");
    }

    #[test]
    fn test_neighbour_lookups_tolerate_unknown_keys() {
        let map = abc();
        assert_eq!(map.key_before("zzz"), None);
        assert_eq!(map.key_after("zzz"), None);
        assert!(map.block_before("zzz").is_none());
        assert!(map.block_after("zzz").is_none());
    }

    #[test]
    fn test_duplicate_key_keeps_first_position() {
        let map = BlockMap::from_blocks([
            ContentBlock::unstyled("a", "first"),
            ContentBlock::unstyled("b", "middle"),
            ContentBlock::unstyled("a", "replacement"),
        ]);
        assert_eq!(keys(&map), vec!["a", "b"]);
        assert_eq!(map.get("a").unwrap().text(), "replacement");
    }

    #[test]
    fn test_with_block_shares_untouched_blocks() {
        let map = abc();
        let updated = map.with_block(ContentBlock::unstyled("b", "BETA"));

        assert_eq!(keys(&updated), vec!["a", "b", "c"]);
        assert_eq!(map.get("b").unwrap().text(), "beta");
        assert_eq!(updated.get("b").unwrap().text(), "BETA");
        assert!(Arc::ptr_eq(map.get("a").unwrap(), updated.get("a").unwrap()));
        assert!(Arc::ptr_eq(map.get("c").unwrap(), updated.get("c").unwrap()));
        assert!(!map.ptr_eq(&updated));
    }

    #[test]
    fn test_with_block_appends_new_key() {
        let map = abc().with_block(ContentBlock::unstyled("d", "delta"));
        assert_eq!(keys(&map), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_without_block() {
        let map = abc();
        let removed = map.without_block("b");
        assert_eq!(keys(&removed), vec!["a", "c"]);
        assert_eq!(map.len(), 3);
        assert!(removed.without_block("missing").ptr_eq(&removed));
    }

    #[test]
    fn test_empty_map() {
        let map = BlockMap::new();
        assert!(map.is_empty());
        assert!(map.first().is_none());
        assert!(map.last().is_none());
    }
}
