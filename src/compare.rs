//! Priority comparison between a candidate entry and an incumbent.

use crate::entry::Entry;

/// Total order used to settle conflicts. Returns `true` iff the first
/// argument (the entry being inserted) should displace the second (the entry
/// already stored). Replaceable per store via
/// [`CidrStore::with_comparator`](crate::CidrStore::with_comparator).
pub type Comparator = Box<dyn Fn(&Entry, &Entry) -> bool>;

/// The default comparator.
///
/// Walks the two priority vectors over their common prefix; the first
/// differing position decides. On fully equal vectors the newcomer wins,
/// which makes repeated insertion of the same prefix idempotent.
///
/// The store appends the prefix length to every priority vector before the
/// comparator ever runs, so with equal user-supplied priorities a
/// more-specific prefix displaces a less-specific one.
pub fn prefer_new(new: &Entry, old: &Entry) -> bool {
    for (a, b) in new.priority.iter().zip(old.priority.iter()) {
        if a > b {
            return true;
        }
        if a < b {
            return false;
        }
    }
    true
}
