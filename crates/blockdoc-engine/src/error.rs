use crate::models::EntityKey;

/// Errors raised when a collaborator contract is broken.
///
/// Lookups that simply find nothing (a key that is not in the block map, a
/// block with no neighbour) are reported as `None`, never as one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("ContentState blockMap is empty")]
    EmptyBlockMap,
    #[error("missing anchorLeaf or focusLeaf for offset key {offset_key:?}")]
    MissingLeaf { offset_key: String },
    #[error("invalid offset key: {0:?}")]
    InvalidOffsetKey(String),
    #[error("unknown entity key: {0}")]
    UnknownEntity(EntityKey),
}

pub type Result<T, E = ModelError> = std::result::Result<T, E>;
