use std::sync::Arc;

use crate::error::{ModelError, Result};
use crate::models::{
    BlockKey, BlockMap, ContentBlock, EntityData, EntityInstance, EntityKey, EntityMutability,
    EntityStoreRef, SelectionState,
};

/// Immutable document snapshot
///
/// A `ContentState` holds the ordered blocks of a document, a handle to the
/// entity store its characters refer to, and the selections bracketing the
/// change that produced it:
///
/// - **`selection_before`**: selection at the moment the change was applied
/// - **`selection_after`**: selection once the change was applied
///
/// Every `with_*` method returns a new snapshot. Blocks that were not replaced
/// are shared by reference with the snapshot they came from, so holders of an
/// older snapshot never observe a later edit.
///
/// ```rust
/// # use blockdoc_engine::ContentState;
/// let content = ContentState::from_text("Hello\nWorld", None, None);
/// assert_eq!(content.blocks_as_array().len(), 2);
/// assert_eq!(content.plain_text(Some(" / ")), "Hello / World");
/// ```
#[derive(Debug, Clone)]
pub struct ContentState {
    pub(crate) block_map: BlockMap,
    pub(crate) entity_map: EntityStoreRef,
    pub(crate) selection_before: SelectionState,
    pub(crate) selection_after: SelectionState,
}

impl ContentState {
    pub fn new(
        block_map: BlockMap,
        entity_map: EntityStoreRef,
        selection_before: SelectionState,
        selection_after: SelectionState,
    ) -> Self {
        Self {
            block_map,
            entity_map,
            selection_before,
            selection_after,
        }
    }

    pub fn block_map(&self) -> &BlockMap {
        &self.block_map
    }

    pub fn selection_before(&self) -> &SelectionState {
        &self.selection_before
    }

    pub fn selection_after(&self) -> &SelectionState {
        &self.selection_after
    }

    pub fn block_for_key(&self, key: &str) -> Option<&Arc<ContentBlock>> {
        self.block_map.get(key)
    }

    pub fn key_before(&self, key: &str) -> Option<&BlockKey> {
        self.block_map.key_before(key)
    }

    pub fn key_after(&self, key: &str) -> Option<&BlockKey> {
        self.block_map.key_after(key)
    }

    pub fn block_before(&self, key: &str) -> Option<&Arc<ContentBlock>> {
        self.block_map.block_before(key)
    }

    pub fn block_after(&self, key: &str) -> Option<&Arc<ContentBlock>> {
        self.block_map.block_after(key)
    }

    /// All blocks in document order, detached from the map
    pub fn blocks_as_array(&self) -> Vec<Arc<ContentBlock>> {
        self.block_map.blocks().cloned().collect()
    }

    pub fn first_block(&self) -> Result<&Arc<ContentBlock>> {
        self.block_map.first().ok_or(ModelError::EmptyBlockMap)
    }

    pub fn last_block(&self) -> Result<&Arc<ContentBlock>> {
        self.block_map.last().ok_or(ModelError::EmptyBlockMap)
    }

    /// Text of every block joined by `delimiter` (`"\n"` when `None`)
    pub fn plain_text(&self, delimiter: Option<&str>) -> String {
        let delimiter = delimiter.unwrap_or("\n");
        self.block_map
            .blocks()
            .map(|block| block.text())
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    /// False only for a document made of a single empty block
    pub fn has_text(&self) -> Result<bool> {
        Ok(self.block_map.len() > 1 || !self.first_block()?.is_empty())
    }

    // Structural-sharing updates

    pub fn with_block_map(&self, block_map: BlockMap) -> Self {
        Self {
            block_map,
            ..self.clone()
        }
    }

    pub fn with_selection_before(&self, selection: SelectionState) -> Self {
        Self {
            selection_before: selection,
            ..self.clone()
        }
    }

    pub fn with_selection_after(&self, selection: SelectionState) -> Self {
        Self {
            selection_after: selection,
            ..self.clone()
        }
    }

    /// Snapshot with `block` stored under its key, every other block shared
    pub fn with_block(&self, block: ContentBlock) -> Self {
        self.with_block_map(self.block_map.with_block(block))
    }

    // Entity facade. The store is shared, so these never produce a new
    // snapshot; mutators hand back `self` for chaining.

    pub fn entity_map(&self) -> &EntityStoreRef {
        &self.entity_map
    }

    pub fn create_entity(
        &self,
        entity_type: &str,
        mutability: EntityMutability,
        data: EntityData,
    ) -> &Self {
        let key = self.entity_map.create(entity_type, mutability, data);
        log::trace!("created entity {key} of type {entity_type}");
        self
    }

    pub fn add_entity(&self, instance: EntityInstance) -> &Self {
        self.entity_map.add(instance);
        self
    }

    pub fn merge_entity_data(&self, key: &EntityKey, to_merge: EntityData) -> Result<&Self> {
        self.entity_map.merge_data(key, to_merge)?;
        Ok(self)
    }

    pub fn replace_entity_data(&self, key: &EntityKey, data: EntityData) -> Result<&Self> {
        self.entity_map.replace_data(key, data)?;
        Ok(self)
    }

    pub fn entity(&self, key: &EntityKey) -> Result<EntityInstance> {
        self.entity_map.get(key)
    }

    pub fn last_created_entity_key(&self) -> Option<EntityKey> {
        self.entity_map.last_created_key()
    }
}

impl PartialEq for ContentState {
    /// Snapshots are equal when their blocks and selections are; the entity
    /// store is compared by identity
    fn eq(&self, other: &Self) -> bool {
        self.block_map == other.block_map
            && Arc::ptr_eq(&self.entity_map, &other.entity_map)
            && self.selection_before == other.selection_before
            && self.selection_after == other.selection_after
    }
}
