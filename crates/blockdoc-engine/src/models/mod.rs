pub mod block;
pub mod block_map;
pub mod character;
pub mod entity;
pub mod selection;

pub use block::{BlockKey, BlockType, ContentBlock};
pub use block_map::BlockMap;
pub use character::{CharacterList, CharacterMetadata};
pub use entity::{
    EntityData, EntityInstance, EntityKey, EntityMap, EntityMutability, EntityStore,
    EntityStoreRef,
};
pub use selection::{SelectionState, SelectionUpdate};
