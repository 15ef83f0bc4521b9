/*!
 * # Document Model
 *
 * The persistent document representation edited by the surface.
 *
 * ## Architecture Overview
 *
 * ### 1. Immutable Snapshots
 * - A document is a **`ContentState`**: ordered blocks, an entity store handle,
 *   and the selections before and after the change that produced it
 * - Nothing is mutated in place; every update returns a new `ContentState`
 * - Untouched blocks are shared by `Arc` between consecutive snapshots
 *
 * ### 2. Ordered Blocks
 * - Blocks live in a **`BlockMap`**, keyed by `BlockKey`, in document order
 * - Neighbour queries (`key_before`, `key_after`) resolve through the map's
 *   index positions instead of scanning
 *
 * ### 3. Entities Through an Explicit Handle
 * - Each document carries an `EntityStoreRef`
 * - The entity methods on `ContentState` are thin forwards to that store
 * - Construction falls back to the process-wide store when none is given
 *
 * ## Module Structure
 *
 * - **`content_state`**: `ContentState` queries and structural-sharing updates
 * - **`construction`**: `from_text` / `from_block_array`
 * - **`keys`**: block key generation
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockdoc_engine::editing::*;
 * use blockdoc_engine::models::ContentBlock;
 *
 * // 1. Build from raw text, one block per line
 * let content = ContentState::from_text("# Title\nBody", None, None);
 * assert!(content.has_text().unwrap());
 *
 * // 2. Replace a block; the original snapshot is untouched
 * let first = content.first_block().unwrap().clone();
 * let edited = content.with_block(ContentBlock::unstyled(first.key().clone(), "Heading"));
 *
 * assert_eq!(content.plain_text(None), "# Title\nBody");
 * assert_eq!(edited.plain_text(None), "Heading\nBody");
 * ```
 */

pub mod construction;
pub mod content_state;
pub mod keys;

pub use construction::{BlockArray, ConvertedBlocks, sanitize_text};
pub use content_state::ContentState;
pub use keys::generate_random_key;
