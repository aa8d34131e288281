//! Conflict detection along the insertion path.

use std::fmt;

use crate::trie::Trie;

/// How a prefix being inserted relates to the content the walk ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConflictKind {
    /// The path is free; the prefix inserts without displacing anything.
    None,
    /// An entry already sits at exactly the target depth.
    Equal,
    /// An entry node on the path covers the new prefix: the newcomer is a
    /// strict subnet of a stored supernet.
    Sub,
    /// The node at the target depth spans existing narrower entries: the
    /// newcomer is a supernet of one or more stored prefixes.
    Super,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictKind::None => "No Conflict",
            ConflictKind::Equal => "Equal CIDR",
            ConflictKind::Sub => "Sub CIDR",
            ConflictKind::Super => "Super CIDR",
        })
    }
}

/// Where a classification walk stopped.
pub(crate) struct Classified {
    /// The last node the walk touched: the conflict point, or the node at
    /// the target depth when no conflict was found.
    pub(crate) last: usize,
    pub(crate) kind: ConflictKind,
    /// How many of the walked bits were consumed. The suffix past this
    /// index still has to be laid down by the resolution.
    pub(crate) consumed: usize,
}

/// Walk `bits` downward from `from`, attaching path nodes into empty slots,
/// until the first conflict. `target_depth` is the absolute depth the new
/// prefix is headed for (its prefix length).
pub(crate) fn classify(
    trie: &mut Trie,
    from: usize,
    bits: &[bool],
    target_depth: u8,
) -> Classified {
    let mut current = from;
    for (i, bit) in bits.iter().enumerate() {
        current = trie.attach_child(current, *bit);
        let kind = conflict_at(trie, current, target_depth);
        if kind != ConflictKind::None {
            return Classified {
                last: current,
                kind,
                consumed: i + 1,
            };
        }
    }
    Classified {
        last: current,
        kind: ConflictKind::None,
        consumed: bits.len(),
    }
}

/// Classify the relation between the node just stepped onto and the prefix
/// headed for `target_depth`.
fn conflict_at(trie: &Trie, idx: usize, target_depth: u8) -> ConflictKind {
    match trie.entry(idx) {
        None => {
            // A path node at the target depth with descendants spans the
            // area of the new prefix. An entry-less leaf at the target depth
            // cannot exist on a settled trie, so this is the only super
            // case.
            if trie.depth(idx) == target_depth && !trie.is_leaf(idx) {
                ConflictKind::Super
            } else {
                ConflictKind::None
            }
        }
        Some(_) => {
            if trie.depth(idx) == target_depth {
                ConflictKind::Equal
            } else if trie.depth(idx) < target_depth {
                ConflictKind::Sub
            } else {
                unreachable!("classification walked past its target depth")
            }
        }
    }
}
