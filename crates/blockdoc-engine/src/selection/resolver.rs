use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::models::{SelectionState, SelectionUpdate};
use crate::selection::{LeafRange, OffsetKey, SelectionContext};

/// How the resolver reacts to offset keys it cannot place
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    /// Unplaceable offset keys are errors
    #[default]
    Strict,
    /// Unplaceable offset keys are logged and the current selection is kept
    Diagnostic,
}

/// One resolved end of a selection
struct Edge<'a> {
    key: OffsetKey,
    leaf: &'a LeafRange,
    local_offset: usize,
}

impl Edge<'_> {
    /// Offset in block character space, `None` on overflow
    fn block_offset(&self) -> Option<usize> {
        self.leaf.start.checked_add(self.local_offset)
    }
}

/// Turns rendering-layer positions into a [`SelectionState`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionResolver {
    mode: ResolveMode,
}

impl SelectionResolver {
    pub fn new(mode: ResolveMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    /// Selection spanning the two leaf positions
    ///
    /// Each end is given as the offset key stamped on a rendered leaf plus an
    /// offset local to that leaf. When the result addresses exactly what the
    /// current selection already does, the current `Arc` is returned as is.
    /// Fields other than keys, offsets and direction are carried over.
    pub fn resolve<C: SelectionContext + ?Sized>(
        &self,
        state: &C,
        anchor_offset_key: Option<&str>,
        anchor_offset: usize,
        focus_offset_key: Option<&str>,
        focus_offset: usize,
    ) -> Result<Arc<SelectionState>> {
        let edges = locate(state, anchor_offset_key, anchor_offset)
            .and_then(|anchor| Ok((anchor, locate(state, focus_offset_key, focus_offset)?)));
        let (anchor, focus) = match (edges, self.mode) {
            (Ok(edges), _) => edges,
            (Err(err), ResolveMode::Strict) => return Err(err),
            (Err(err), ResolveMode::Diagnostic) => {
                log::warn!("keeping current selection: {err}");
                return Ok(Arc::clone(state.selection()));
            }
        };

        let current = state.selection();
        let anchor_block_offset = anchor.block_offset();
        let focus_block_offset = focus.block_offset();

        if current.anchor_key() == Some(&anchor.key.block_key)
            && anchor_block_offset == Some(current.anchor_offset())
            && current.focus_key() == Some(&focus.key.block_key)
            && focus_block_offset == Some(current.focus_offset())
        {
            return Ok(Arc::clone(current));
        }

        let backward = is_backward(state, &anchor, &focus);
        log::debug!(
            "resolved selection {}+{} -> {}+{} (backward: {backward})",
            anchor.key,
            anchor.local_offset,
            focus.key,
            focus.local_offset
        );

        Ok(Arc::new(current.merge(SelectionUpdate {
            anchor_key: Some(anchor.key.block_key),
            anchor_offset: anchor_block_offset,
            focus_key: Some(focus.key.block_key),
            focus_offset: focus_block_offset,
            is_backward: Some(backward),
            has_focus: None,
        })))
    }
}

/// Resolve a selection with a one-off [`SelectionResolver`]
pub fn get_updated_selection_state<C: SelectionContext + ?Sized>(
    state: &C,
    anchor_offset_key: Option<&str>,
    anchor_offset: usize,
    focus_offset_key: Option<&str>,
    focus_offset: usize,
    mode: ResolveMode,
) -> Result<Arc<SelectionState>> {
    SelectionResolver::new(mode).resolve(
        state,
        anchor_offset_key,
        anchor_offset,
        focus_offset_key,
        focus_offset,
    )
}

fn locate<'a, C: SelectionContext + ?Sized>(
    state: &'a C,
    offset_key: Option<&str>,
    local_offset: usize,
) -> Result<Edge<'a>> {
    let raw = offset_key.ok_or_else(|| ModelError::InvalidOffsetKey(String::new()))?;
    let key = OffsetKey::decode(raw)?;
    let leaf = state
        .block_tree(key.block_key.as_str())
        .and_then(|tree| tree.leaf(key.decorator_key, key.leaf_key))
        .ok_or_else(|| ModelError::MissingLeaf {
            offset_key: raw.to_string(),
        })?;
    Ok(Edge {
        key,
        leaf,
        local_offset,
    })
}

fn is_backward<C: SelectionContext + ?Sized>(
    state: &C,
    anchor: &Edge<'_>,
    focus: &Edge<'_>,
) -> bool {
    let anchor_block = &anchor.key.block_key;
    let focus_block = &focus.key.block_key;

    if anchor_block == focus_block {
        if anchor.leaf == focus.leaf {
            focus.local_offset < anchor.local_offset
        } else {
            focus.leaf.start < anchor.leaf.start
        }
    } else {
        state
            .current_content()
            .block_map()
            .keys()
            .find(|key| *key == anchor_block || *key == focus_block)
            .is_some_and(|key| key == focus_block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockKey, ContentBlock};
    use crate::selection::{BlockTree, DecoratorRange, EditorState};
    use crate::tests::content_of;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn tree(leaves: &[(usize, usize)]) -> BlockTree {
        BlockTree::new(vec![DecoratorRange {
            start: leaves.first().map_or(0, |l| l.0),
            end: leaves.last().map_or(0, |l| l.1),
            decorator_key: None,
            leaves: leaves.iter().map(|&(s, e)| LeafRange::new(s, e)).collect(),
        }])
    }

    fn three_blocks() -> EditorState {
        EditorState::new(content_of(&[
            ("B1", "first block"),
            ("B2", "second block"),
            ("B3", "third block"),
        ]))
    }

    fn strict(
        state: &EditorState,
        anchor: &str,
        anchor_offset: usize,
        focus: &str,
        focus_offset: usize,
    ) -> Result<Arc<SelectionState>> {
        SelectionResolver::default().resolve(
            state,
            Some(anchor),
            anchor_offset,
            Some(focus),
            focus_offset,
        )
    }

    // ============ direction ============

    #[rstest]
    #[case::same_leaf_focus_before_anchor("B1-0-1", 3, "B1-0-1", 1, true)]
    #[case::same_leaf_focus_after_anchor("B1-0-1", 1, "B1-0-1", 3, false)]
    #[case::same_leaf_collapsed("B1-0-1", 2, "B1-0-1", 2, false)]
    #[case::focus_leaf_earlier("B1-0-2", 0, "B1-0-0", 4, true)]
    #[case::focus_leaf_later("B1-0-0", 4, "B1-0-2", 0, false)]
    #[case::focus_block_earlier("B3-0-0", 0, "B1-0-0", 0, true)]
    #[case::focus_block_later("B1-0-0", 5, "B3-0-0", 0, false)]
    fn test_direction(
        #[case] anchor: &str,
        #[case] anchor_offset: usize,
        #[case] focus: &str,
        #[case] focus_offset: usize,
        #[case] backward: bool,
    ) {
        let state = three_blocks().with_block_tree("B1", tree(&[(0, 5), (5, 10), (10, 15)]));
        let selection = strict(&state, anchor, anchor_offset, focus, focus_offset).unwrap();
        assert_eq!(selection.is_backward(), backward);
    }

    #[test]
    fn test_same_leaf_uses_local_offsets() {
        let state = three_blocks().with_block_tree("B2", tree(&[(0, 5), (5, 10)]));

        let selection = strict(&state, "B2-0-1", 3, "B2-0-1", 1).unwrap();

        assert!(selection.is_backward());
        assert_eq!(selection.anchor_offset(), 8);
        assert_eq!(selection.focus_offset(), 6);
    }

    #[test]
    fn test_different_leaves_use_leaf_start_not_offsets() {
        let state = three_blocks().with_block_tree("B2", tree(&[(0, 5), (10, 15)]));

        // Focus lands further right in block space but its leaf starts first
        let selection = strict(&state, "B2-0-1", 0, "B2-0-0", 12).unwrap();

        assert!(selection.is_backward());
        assert_eq!(selection.anchor_offset(), 10);
        assert_eq!(selection.focus_offset(), 12);
    }

    #[test]
    fn test_cross_block_ignores_offsets() {
        let state = three_blocks();
        let selection = strict(&state, "B3-0-0", 0, "B1-0-0", 11).unwrap();

        assert!(selection.is_backward());
        assert_eq!(selection.anchor_key().map(BlockKey::as_str), Some("B3"));
        assert_eq!(selection.focus_key().map(BlockKey::as_str), Some("B1"));
    }

    // ============ identity and merge ============

    #[test]
    fn test_unchanged_selection_is_returned_by_identity() {
        let state = three_blocks();
        let selection = strict(&state, "B1-0-0", 0, "B1-0-0", 0).unwrap();
        assert!(Arc::ptr_eq(&selection, state.selection()));
    }

    #[test]
    fn test_direction_alone_does_not_defeat_short_circuit() {
        let current = SelectionState::create_empty("B1").merge(SelectionUpdate {
            anchor_offset: Some(4),
            focus_offset: Some(2),
            ..Default::default()
        });
        let state = three_blocks().with_selection(current);

        let selection = strict(&state, "B1-0-0", 4, "B1-0-0", 2).unwrap();

        assert!(Arc::ptr_eq(&selection, state.selection()));
        assert!(!selection.is_backward());
    }

    #[test]
    fn test_has_focus_is_preserved() {
        let focused = SelectionState::create_empty("B1").merge(SelectionUpdate {
            has_focus: Some(true),
            ..Default::default()
        });
        let state = three_blocks().with_selection(focused);

        let selection = strict(&state, "B1-0-0", 0, "B2-0-0", 3).unwrap();

        assert!(selection.has_focus());
        assert_eq!(selection.focus_key().map(BlockKey::as_str), Some("B2"));
        assert_eq!(selection.focus_offset(), 3);
        assert!(!selection.is_backward());
    }

    #[test]
    fn test_overflowing_offset_is_left_unchanged() {
        let state = three_blocks().with_block_tree("B2", tree(&[(0, 5), (5, 10)]));

        let selection = strict(&state, "B2-0-1", usize::MAX, "B2-0-0", 2).unwrap();

        assert_eq!(selection.anchor_key().map(BlockKey::as_str), Some("B2"));
        assert_eq!(selection.anchor_offset(), 0);
        assert_eq!(selection.focus_offset(), 2);
    }

    #[test]
    fn test_decorated_leaf_offsets_are_block_absolute() {
        let editor = three_blocks();
        let block = ContentBlock::unstyled("B2", "see @alice now");
        let mut decorations = vec![None; block.len()];
        for decoration in &mut decorations[4..10] {
            *decoration = Some("mention".to_string());
        }
        let state = editor.with_block_tree("B2", BlockTree::generate(&block, &decorations));

        let selection = strict(&state, "B2-1-0", 2, "B2-2-0", 3).unwrap();

        assert_eq!(selection.anchor_offset(), 6);
        assert_eq!(selection.focus_offset(), 13);
        assert!(!selection.is_backward());
    }

    // ============ modes ============

    #[test]
    fn test_strict_mode_reports_missing_leaf() {
        let state = three_blocks();
        assert_eq!(
            strict(&state, "B1-0-7", 0, "B1-0-0", 0),
            Err(ModelError::MissingLeaf {
                offset_key: "B1-0-7".to_string()
            })
        );
        assert_eq!(
            strict(&state, "B1-0-0", 0, "nope-0-0", 0),
            Err(ModelError::MissingLeaf {
                offset_key: "nope-0-0".to_string()
            })
        );
    }

    #[test]
    fn test_strict_mode_reports_bad_offset_keys() {
        let state = three_blocks();
        assert_eq!(
            strict(&state, "garbage", 0, "B1-0-0", 0),
            Err(ModelError::InvalidOffsetKey("garbage".to_string()))
        );
        assert_eq!(
            SelectionResolver::new(ResolveMode::Strict).resolve(&state, None, 0, Some("B1-0-0"), 0),
            Err(ModelError::InvalidOffsetKey(String::new()))
        );
    }

    #[rstest]
    #[case::absent_anchor(None, Some("B1-0-0"))]
    #[case::absent_focus(Some("B1-0-0"), None)]
    #[case::malformed(Some("B1"), Some("B1-0-0"))]
    #[case::missing_leaf(Some("B1-3-0"), Some("B1-0-0"))]
    #[case::missing_block(Some("B1-0-0"), Some("B9-0-0"))]
    fn test_diagnostic_mode_keeps_current_selection(
        #[case] anchor: Option<&str>,
        #[case] focus: Option<&str>,
    ) {
        init_logger();
        let state = three_blocks();

        let selection = get_updated_selection_state(&state, anchor, 4, focus, 2, ResolveMode::Diagnostic)
            .unwrap();

        assert!(Arc::ptr_eq(&selection, state.selection()));
    }

    #[test]
    fn test_diagnostic_mode_resolves_valid_keys() {
        init_logger();
        let state = three_blocks();

        let selection = get_updated_selection_state(
            &state,
            Some("B2-0-0"),
            1,
            Some("B1-0-0"),
            1,
            ResolveMode::Diagnostic,
        )
        .unwrap();

        assert!(selection.is_backward());
        assert_eq!(selection.anchor_offset(), 1);
    }

    #[test]
    fn test_mode_wire_names() {
        assert_eq!(serde_json::to_string(&ResolveMode::Strict).unwrap(), r#""strict""#);
        assert_eq!(
            serde_json::from_str::<ResolveMode>(r#""diagnostic""#).unwrap(),
            ResolveMode::Diagnostic
        );
        assert_eq!(ResolveMode::default(), ResolveMode::Strict);
    }
}
