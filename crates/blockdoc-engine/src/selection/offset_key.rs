use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::models::BlockKey;

const KEY_DELIMITER: char = '-';

/// Address of one rendered leaf: block, decorator segment, leaf
///
/// The rendering layer stamps its text nodes with the textual form
/// `"{block}-{decorator}-{leaf}"`. Decoding splits from the right, so block
/// keys that themselves contain `-` still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OffsetKey {
    pub block_key: BlockKey,
    pub decorator_key: usize,
    pub leaf_key: usize,
}

impl OffsetKey {
    pub fn new(block_key: impl Into<BlockKey>, decorator_key: usize, leaf_key: usize) -> Self {
        Self {
            block_key: block_key.into(),
            decorator_key,
            leaf_key,
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(offset_key: &str) -> Result<Self, ModelError> {
        offset_key.parse()
    }
}

impl fmt::Display for OffsetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{KEY_DELIMITER}{}{KEY_DELIMITER}{}",
            self.block_key, self.decorator_key, self.leaf_key
        )
    }
}

impl FromStr for OffsetKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidOffsetKey(s.to_string());

        let mut parts = s.rsplitn(3, KEY_DELIMITER);
        let leaf_key = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let decorator_key = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let block_key = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;

        Ok(Self {
            block_key: BlockKey::from(block_key),
            decorator_key,
            leaf_key,
        })
    }
}
