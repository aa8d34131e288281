//! Turning a classified conflict into an ordered resolution plan.

use crate::action::ActionKind;
use crate::conflict::{Classified, ConflictKind};
use crate::entry::Entry;
use crate::trie::Trie;

pub(crate) struct PlanStep {
    pub(crate) action: ActionKind,
    /// The node the action operates on. `Insert` and `Ignore` work from the
    /// conflict point instead and carry it here only for uniformity.
    pub(crate) target: usize,
}

/// An ordered list of primitive actions, plus the entries the new prefix
/// conflicted with (for reporting).
#[derive(Default)]
pub(crate) struct ResolutionPlan {
    pub(crate) conflicts: Vec<usize>,
    pub(crate) steps: Vec<PlanStep>,
}

impl ResolutionPlan {
    fn add(&mut self, action: ActionKind, target: usize) {
        self.steps.push(PlanStep { action, target });
    }
}

/// Decide how the conflict at `classified` gets resolved.
///
/// The plan only reads the trie; execution happens afterwards, step by step,
/// in the order planned here.
pub(crate) fn plan(
    trie: &Trie,
    classified: &Classified,
    new_entry: &Entry,
    prefer: &dyn Fn(&Entry, &Entry) -> bool,
) -> ResolutionPlan {
    let mut plan = ResolutionPlan::default();
    let at = classified.last;

    match classified.kind {
        ConflictKind::None => {
            plan.add(ActionKind::Insert, at);
        }

        ConflictKind::Equal => {
            plan.conflicts.push(at);
            let incumbent = trie.entry(at).expect("equal conflict without an entry");
            if prefer(new_entry, incumbent) {
                plan.add(ActionKind::RemoveExisting, at);
                plan.add(ActionKind::Insert, at);
            } else {
                plan.add(ActionKind::Ignore, at);
            }
        }

        ConflictKind::Sub => {
            // the node at `at` holds a supernet of the new prefix: either
            // the newcomer is swallowed, or it carves itself out of it
            plan.conflicts.push(at);
            let supernet = trie.entry(at).expect("sub conflict without an entry");
            if prefer(new_entry, supernet) {
                plan.add(ActionKind::Insert, at);
                plan.add(ActionKind::SplitExisting, at);
                plan.add(ActionKind::RemoveExisting, at);
            } else {
                plan.add(ActionKind::Ignore, at);
            }
        }

        ConflictKind::Super => {
            // every entry below the conflict point is contested; partition
            // them into losers (removed) and winners (the new prefix must
            // fracture around them)
            let mut winners = Vec::new();
            for leaf in trie.leaves(at) {
                plan.conflicts.push(leaf);
                let narrower = trie.entry(leaf).expect("path leaf below a super conflict");
                if prefer(new_entry, narrower) {
                    plan.add(ActionKind::RemoveExisting, leaf);
                } else {
                    winners.push(leaf);
                }
            }
            for leaf in &winners {
                plan.add(ActionKind::SplitInserted, *leaf);
            }
            // with no surviving narrower entry the subtree clears out and
            // the new prefix inserts whole
            if winners.is_empty() {
                plan.add(ActionKind::Insert, at);
            }
        }
    }
    plan
}
