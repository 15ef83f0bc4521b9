//! Selection resolution: from rendered leaf positions to a [`SelectionState`]
//!
//! The rendering layer stamps every text node with an [`OffsetKey`]. When the
//! native selection changes it reports the offset key and local offset of both
//! ends; [`SelectionResolver`] maps them through the editor's [`BlockTree`]s
//! into block character space and works out the direction.
//!
//! [`SelectionState`]: crate::models::SelectionState

pub mod block_tree;
pub mod editor_state;
pub mod offset_key;
pub mod resolver;

pub use block_tree::{BlockTree, DecoratorRange, LeafRange};
pub use editor_state::{EditorState, SelectionContext};
pub use offset_key::OffsetKey;
pub use resolver::{ResolveMode, SelectionResolver, get_updated_selection_state};
