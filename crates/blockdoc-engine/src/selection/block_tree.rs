use std::ops::Range;

use crate::models::ContentBlock;

/// A run of characters rendered as one text node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafRange {
    pub start: usize,
    pub end: usize,
}

impl LeafRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A run of characters sharing one decorator, split into leaves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratorRange {
    pub start: usize,
    pub end: usize,
    pub decorator_key: Option<String>,
    pub leaves: Vec<LeafRange>,
}

/// Rendering tree of a single block
///
/// Segments are indexed by decorator key (their position in the block) and
/// leaves by leaf key (their position in the segment). Leaf offsets are in the
/// block's character space, not relative to the segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockTree {
    segments: Vec<DecoratorRange>,
}

impl BlockTree {
    pub fn new(segments: Vec<DecoratorRange>) -> Self {
        Self { segments }
    }

    /// Tree for `block` with no decorations
    pub fn for_block(block: &ContentBlock) -> Self {
        Self::generate(block, &[])
    }

    /// Split `block` into decorator segments, then into leaves of uniform
    /// inline style
    ///
    /// `decorations` holds the decorator key of every character; consecutive
    /// characters with equal keys form one segment. An empty block yields a
    /// single empty segment holding a single empty leaf.
    pub fn generate(block: &ContentBlock, decorations: &[Option<String>]) -> Self {
        if block.is_empty() {
            return Self::new(vec![DecoratorRange {
                start: 0,
                end: 0,
                decorator_key: None,
                leaves: vec![LeafRange::new(0, 0)],
            }]);
        }

        // Characters past the end of either list count as undecorated and
        // unstyled.
        let len = block.len();
        let decorations = (0..len)
            .map(|i| decorations.get(i).cloned().flatten())
            .collect::<Vec<_>>();
        let styles = (0..len)
            .map(|i| block.character_list().get(i).map(|c| c.style()))
            .collect::<Vec<_>>();

        let segments = find_ranges(&decorations)
            .into_iter()
            .map(|range| DecoratorRange {
                start: range.start,
                end: range.end,
                decorator_key: decorations[range.start].clone(),
                leaves: find_ranges(&styles[range.clone()])
                    .into_iter()
                    .map(|leaf| LeafRange::new(leaf.start + range.start, leaf.end + range.start))
                    .collect(),
            })
            .collect();
        Self::new(segments)
    }

    pub fn segments(&self) -> &[DecoratorRange] {
        &self.segments
    }

    pub fn segment(&self, decorator_key: usize) -> Option<&DecoratorRange> {
        self.segments.get(decorator_key)
    }

    /// The leaf addressed by `(decorator_key, leaf_key)`
    pub fn leaf(&self, decorator_key: usize, leaf_key: usize) -> Option<&LeafRange> {
        self.segment(decorator_key)?.leaves.get(leaf_key)
    }
}

/// Maximal runs of equal consecutive items
fn find_ranges<T: PartialEq>(items: &[T]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for end in 1..=items.len() {
        if end == items.len() || items[end] != items[start] {
            ranges.push(start..end);
            start = end;
        }
    }
    ranges
}
