//! Materialization of prefix complements.

use crate::entry::Entry;
use crate::trie::Trie;

/// Fracture the range between a wider prefix and `boundary`, a node sitting
/// on a narrower prefix inside it.
///
/// Walks from `boundary` towards the root and attaches, at every step above
/// `limit_depth` (the depth of the wider prefix), a sibling carrying a clone
/// of `outer` into each empty slot. The attached nodes cover exactly the
/// wider prefix minus the narrower one, one complement per depth step; slots
/// already occupied by other content are left alone. Returns the attached
/// nodes.
///
/// Each sibling gets its own deep copy of `outer`, so the fragments keep the
/// wider CIDR's origin and attributes.
pub(crate) fn split_around(
    trie: &mut Trie,
    boundary: usize,
    outer: &Entry,
    limit_depth: u8,
) -> Vec<usize> {
    let mut added = Vec::new();
    let mut current = boundary;
    while trie.depth(current) > limit_depth {
        let parent = trie
            .parent(current)
            .expect("split walked past the root");
        if let Some(idx) = trie.try_attach_sibling(current, outer.clone()) {
            added.push(idx);
        }
        current = parent;
    }
    added
}
