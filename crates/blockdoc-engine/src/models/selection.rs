use serde::{Deserialize, Serialize};

use crate::models::BlockKey;

/// A logical selection: anchor and focus positions in block-offset space
///
/// `is_backward` records whether the focus precedes the anchor in document
/// order. It is derived by whoever produces the selection, never toggled on its
/// own.
///
/// The default value is the "empty" marker used by documents without blocks:
/// neither end refers to a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    anchor_key: Option<BlockKey>,
    anchor_offset: usize,
    focus_key: Option<BlockKey>,
    focus_offset: usize,
    is_backward: bool,
    has_focus: bool,
}

/// Partial update applied by [`SelectionState::merge`]
///
/// Fields left as `None` keep the value of the selection being merged into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionUpdate {
    pub anchor_key: Option<BlockKey>,
    pub anchor_offset: Option<usize>,
    pub focus_key: Option<BlockKey>,
    pub focus_offset: Option<usize>,
    pub is_backward: Option<bool>,
    pub has_focus: Option<bool>,
}

impl SelectionState {
    /// Collapsed, unfocused selection at the start of block `key`
    pub fn create_empty(key: impl Into<BlockKey>) -> Self {
        let key = key.into();
        Self {
            anchor_key: Some(key.clone()),
            anchor_offset: 0,
            focus_key: Some(key),
            focus_offset: 0,
            is_backward: false,
            has_focus: false,
        }
    }

    pub fn anchor_key(&self) -> Option<&BlockKey> {
        self.anchor_key.as_ref()
    }

    pub fn anchor_offset(&self) -> usize {
        self.anchor_offset
    }

    pub fn focus_key(&self) -> Option<&BlockKey> {
        self.focus_key.as_ref()
    }

    pub fn focus_offset(&self) -> usize {
        self.focus_offset
    }

    pub fn is_backward(&self) -> bool {
        self.is_backward
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    pub fn start_key(&self) -> Option<&BlockKey> {
        if self.is_backward {
            self.focus_key()
        } else {
            self.anchor_key()
        }
    }

    pub fn start_offset(&self) -> usize {
        if self.is_backward {
            self.focus_offset
        } else {
            self.anchor_offset
        }
    }

    pub fn end_key(&self) -> Option<&BlockKey> {
        if self.is_backward {
            self.anchor_key()
        } else {
            self.focus_key()
        }
    }

    pub fn end_offset(&self) -> usize {
        if self.is_backward {
            self.anchor_offset
        } else {
            self.focus_offset
        }
    }

    /// Whether either end of the selection lies in `key` within `start..=end`
    pub fn has_edge_within(&self, key: &str, start: usize, end: usize) -> bool {
        let within = |edge_key: Option<&BlockKey>, offset: usize| {
            edge_key.is_some_and(|k| k.as_str() == key) && (start..=end).contains(&offset)
        };
        within(self.anchor_key(), self.anchor_offset) || within(self.focus_key(), self.focus_offset)
    }

    /// New selection with every `Some` field of `update` applied
    pub fn merge(&self, update: SelectionUpdate) -> Self {
        Self {
            anchor_key: update.anchor_key.or_else(|| self.anchor_key.clone()),
            anchor_offset: update.anchor_offset.unwrap_or(self.anchor_offset),
            focus_key: update.focus_key.or_else(|| self.focus_key.clone()),
            focus_offset: update.focus_offset.unwrap_or(self.focus_offset),
            is_backward: update.is_backward.unwrap_or(self.is_backward),
            has_focus: update.has_focus.unwrap_or(self.has_focus),
        }
    }
}
