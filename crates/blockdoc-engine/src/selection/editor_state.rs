use std::collections::HashMap;
use std::sync::Arc;

use crate::editing::ContentState;
use crate::models::{BlockKey, SelectionState};
use crate::selection::BlockTree;

/// What the selection resolver needs to see of an editor
pub trait SelectionContext {
    /// The selection currently in force
    fn selection(&self) -> &Arc<SelectionState>;

    fn current_content(&self) -> &ContentState;

    /// Rendering tree of block `key`, if the block has been rendered
    fn block_tree(&self, key: &str) -> Option<&BlockTree>;
}

/// Top-level editor snapshot: document, selection and rendering trees
///
/// Like the document it holds, an `EditorState` is never changed in place;
/// the `with_*` methods return a new snapshot.
#[derive(Debug, Clone)]
pub struct EditorState {
    content: ContentState,
    selection: Arc<SelectionState>,
    tree_map: HashMap<BlockKey, BlockTree>,
}

impl EditorState {
    /// Editor over `content`, selecting its `selection_after`, with an
    /// undecorated tree for every block
    pub fn new(content: ContentState) -> Self {
        let tree_map = content
            .block_map()
            .iter()
            .map(|(key, block)| (key.clone(), BlockTree::for_block(block)))
            .collect();
        let selection = Arc::new(content.selection_after().clone());
        Self {
            content,
            selection,
            tree_map,
        }
    }

    pub fn with_selection(&self, selection: SelectionState) -> Self {
        Self {
            selection: Arc::new(selection),
            ..self.clone()
        }
    }

    /// Replace the rendering tree of one block, e.g. after decorating it
    pub fn with_block_tree(&self, key: impl Into<BlockKey>, tree: BlockTree) -> Self {
        let mut tree_map = self.tree_map.clone();
        tree_map.insert(key.into(), tree);
        Self {
            tree_map,
            ..self.clone()
        }
    }

    /// Swap in a new document, keeping trees of blocks that are still shared
    /// with the previous one
    pub fn with_content(&self, content: ContentState) -> Self {
        let tree_map = content
            .block_map()
            .iter()
            .map(|(key, block)| {
                let unchanged = self
                    .content
                    .block_for_key(key.as_str())
                    .is_some_and(|old| Arc::ptr_eq(old, block));
                let tree = match self.tree_map.get(key) {
                    Some(tree) if unchanged => tree.clone(),
                    _ => BlockTree::for_block(block),
                };
                (key.clone(), tree)
            })
            .collect();
        Self {
            content,
            selection: Arc::clone(&self.selection),
            tree_map,
        }
    }

    /// Install a selection produced by the resolver
    ///
    /// Handing back the current selection returns a snapshot sharing it, so
    /// callers can detect no-op updates with [`Arc::ptr_eq`].
    pub fn accept_selection(&self, selection: Arc<SelectionState>) -> Self {
        if Arc::ptr_eq(&selection, &self.selection) {
            return self.clone();
        }
        log::trace!(
            "selection moved to {:?}:{} .. {:?}:{}",
            selection.anchor_key(),
            selection.anchor_offset(),
            selection.focus_key(),
            selection.focus_offset()
        );
        Self {
            selection,
            ..self.clone()
        }
    }
}

impl SelectionContext for EditorState {
    fn selection(&self) -> &Arc<SelectionState> {
        &self.selection
    }

    fn current_content(&self) -> &ContentState {
        &self.content
    }

    fn block_tree(&self, key: &str) -> Option<&BlockTree> {
        self.tree_map.get(key)
    }
}
