pub mod editing;
pub mod error;
pub mod models;
pub mod selection;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{BlockArray, ContentState, generate_random_key};
pub use error::{ModelError, Result};
pub use models::{BlockKey, BlockMap, ContentBlock, EntityMap, EntityStoreRef, SelectionState};
pub use selection::{
    EditorState, OffsetKey, ResolveMode, SelectionContext, SelectionResolver,
    get_updated_selection_state,
};
