use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, Result};

/// Arbitrary attribute mapping carried by an entity
pub type EntityData = Map<String, Value>;

/// Key under which an entity is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityMutability {
    /// Text can be edited freely and the entity stays attached
    Mutable,
    /// Text is removed as a whole with the entity
    Immutable,
    /// Text is removed word by word
    Segmented,
}

/// An entity record: `{type, mutability, data}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityInstance {
    #[serde(rename = "type")]
    entity_type: String,
    mutability: EntityMutability,
    #[serde(default)]
    data: EntityData,
}

impl EntityInstance {
    pub fn new(
        entity_type: impl Into<String>,
        mutability: EntityMutability,
        data: EntityData,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            mutability,
            data,
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn mutability(&self) -> EntityMutability {
        self.mutability
    }

    pub fn data(&self) -> &EntityData {
        &self.data
    }

    /// Copy with `to_merge`'s top-level keys written over the current data
    pub fn merge_data(&self, to_merge: EntityData) -> Self {
        let mut data = self.data.clone();
        data.extend(to_merge);
        Self {
            data,
            ..self.clone()
        }
    }

    pub fn replace_data(&self, data: EntityData) -> Self {
        Self {
            data,
            ..self.clone()
        }
    }
}

/// Storage behind the document's entity facade
///
/// Implementations are shared mutable state. Documents forward to them without
/// any locking discipline of their own; callers mutating one store from several
/// threads must coordinate among themselves.
pub trait EntityStore: fmt::Debug {
    fn create(
        &self,
        entity_type: &str,
        mutability: EntityMutability,
        data: EntityData,
    ) -> EntityKey;

    fn add(&self, instance: EntityInstance) -> EntityKey;

    fn get(&self, key: &EntityKey) -> Result<EntityInstance>;

    fn merge_data(&self, key: &EntityKey, to_merge: EntityData) -> Result<EntityInstance>;

    fn replace_data(&self, key: &EntityKey, data: EntityData) -> Result<EntityInstance>;

    fn last_created_key(&self) -> Option<EntityKey>;
}

/// Shared handle to an entity store
pub type EntityStoreRef = Arc<dyn EntityStore + Send + Sync>;

static GLOBAL_ENTITY_MAP: LazyLock<EntityStoreRef> =
    LazyLock::new(|| Arc::new(EntityMap::new()) as EntityStoreRef);

#[derive(Debug, Default)]
struct EntityTable {
    instances: HashMap<EntityKey, EntityInstance>,
    counter: u64,
}

/// In-memory entity store with monotonically increasing keys
///
/// Keys are the decimal rendering of a counter that starts at 1.
#[derive(Debug, Default)]
pub struct EntityMap {
    table: Mutex<EntityTable>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide store used when no explicit store is supplied
    pub fn global() -> EntityStoreRef {
        Arc::clone(&GLOBAL_ENTITY_MAP)
    }

    fn table(&self) -> MutexGuard<'_, EntityTable> {
        // A panic while holding the lock cannot leave the table half-written,
        // every mutation is a single insert.
        self.table
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn update(
        &self,
        key: &EntityKey,
        f: impl FnOnce(&EntityInstance) -> EntityInstance,
    ) -> Result<EntityInstance> {
        let mut table = self.table();
        let current = table
            .instances
            .get(key)
            .ok_or_else(|| ModelError::UnknownEntity(key.clone()))?;
        let next = f(current);
        table.instances.insert(key.clone(), next.clone());
        Ok(next)
    }
}

impl EntityStore for EntityMap {
    fn create(
        &self,
        entity_type: &str,
        mutability: EntityMutability,
        data: EntityData,
    ) -> EntityKey {
        self.add(EntityInstance::new(entity_type, mutability, data))
    }

    fn add(&self, instance: EntityInstance) -> EntityKey {
        let mut table = self.table();
        table.counter += 1;
        let key = EntityKey(table.counter.to_string());
        table.instances.insert(key.clone(), instance);
        key
    }

    fn get(&self, key: &EntityKey) -> Result<EntityInstance> {
        self.table()
            .instances
            .get(key)
            .cloned()
            .ok_or_else(|| ModelError::UnknownEntity(key.clone()))
    }

    fn merge_data(&self, key: &EntityKey, to_merge: EntityData) -> Result<EntityInstance> {
        self.update(key, |instance| instance.merge_data(to_merge))
    }

    fn replace_data(&self, key: &EntityKey, data: EntityData) -> Result<EntityInstance> {
        self.update(key, |instance| instance.replace_data(data))
    }

    fn last_created_key(&self) -> Option<EntityKey> {
        let counter = self.table().counter;
        (counter > 0).then(|| EntityKey(counter.to_string()))
    }
}
