//! Primitive actions and their execution against the trie.
//!
//! The planner reduces every conflict to an ordered list of these actions;
//! executing them in order is what actually mutates the trie. The `Insert`
//! action re-runs classification on the residual bit suffix, because earlier
//! actions of the same plan may have moved the conflict frontier; any
//! conflict it finds is resolved recursively as a fresh insert from that
//! point. Each recursion consumes a strictly shorter suffix, so the process
//! terminates.

use std::fmt;

use log::trace;

use crate::bits::bits_to_cidr;
use crate::conflict::{classify, Classified, ConflictKind};
use crate::entry::Entry;
use crate::plan;
use crate::report::{ActionOutcome, InsertReport};
use crate::split::split_around;
use crate::trie::Trie;

/// The closed set of primitive resolution actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// The inserting CIDR loses outright; nothing changes.
    Ignore,
    /// Place the new entry at the end of its bit path.
    Insert,
    /// Remove a displaced entry, trimming its path spine if it sits deeper
    /// than the new prefix.
    RemoveExisting,
    /// The new CIDR is a supernet of a surviving narrower entry; fracture it
    /// around that entry.
    SplitInserted,
    /// The new CIDR displaces part of an existing supernet; fracture the
    /// supernet around it.
    SplitExisting,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::Ignore => "Ignore Insertion",
            ActionKind::Insert => "Insert New CIDR",
            ActionKind::RemoveExisting => "Remove Existing CIDR",
            ActionKind::SplitInserted => "Split Inserted CIDR",
            ActionKind::SplitExisting => "Split Existing CIDR",
        })
    }
}

/// Classify the path of `bits` below `from`, resolve the conflict it runs
/// into, and record everything into `report`. Returns the kind the walk
/// classified.
pub(crate) fn resolve(
    trie: &mut Trie,
    from: usize,
    bits: &[bool],
    target_depth: u8,
    entry: &Entry,
    prefer: &dyn Fn(&Entry, &Entry) -> bool,
    report: &mut InsertReport,
) -> ConflictKind {
    let classified = classify(trie, from, bits, target_depth);
    let kind = classified.kind;
    if kind != ConflictKind::None {
        trace!("detected {kind} conflict inserting {}", entry.origin());
    }
    let rest = &bits[classified.consumed..];
    execute_plan(trie, classified, rest, target_depth, entry, prefer, report);
    kind
}

/// Plan the resolution for a classified conflict and run the steps in
/// order. `rest` is the bit suffix past the conflict point.
fn execute_plan(
    trie: &mut Trie,
    classified: Classified,
    rest: &[bool],
    target_depth: u8,
    entry: &Entry,
    prefer: &dyn Fn(&Entry, &Entry) -> bool,
    report: &mut InsertReport,
) {
    let plan = plan::plan(trie, &classified, entry, prefer);

    // snapshot the conflicted entries before any step mutates the trie
    for &idx in &plan.conflicts {
        report.conflicted_with.push(trie.snapshot(idx));
    }

    let mut inserted = None;
    for step in plan.steps {
        match step.action {
            ActionKind::Ignore => report.outcomes.push(ActionOutcome::new(ActionKind::Ignore)),
            ActionKind::Insert => exec_insert(
                trie,
                classified.last,
                rest,
                target_depth,
                entry,
                prefer,
                report,
                &mut inserted,
            ),
            ActionKind::RemoveExisting => {
                report
                    .outcomes
                    .push(exec_remove(trie, step.target, target_depth))
            }
            ActionKind::SplitInserted => report.outcomes.push(exec_split_inserted(
                trie,
                step.target,
                classified.last,
                entry,
            )),
            ActionKind::SplitExisting => report.outcomes.push(exec_split_existing(
                trie,
                step.target,
                classified.last,
                inserted,
            )),
        }
    }
}

/// Lay down the residual bit path from the conflict point and promote its
/// final node to carry the new entry.
#[allow(clippy::too_many_arguments)]
fn exec_insert(
    trie: &mut Trie,
    conflict_point: usize,
    rest: &[bool],
    target_depth: u8,
    entry: &Entry,
    prefer: &dyn Fn(&Entry, &Entry) -> bool,
    report: &mut InsertReport,
    inserted: &mut Option<usize>,
) {
    debug_assert!(
        trie.is_leaf(conflict_point),
        "insertion must start from a leaf"
    );
    let classified = classify(trie, conflict_point, rest, target_depth);
    match classified.kind {
        ConflictKind::None => {
            debug_assert!(
                trie.entry(classified.last).is_none(),
                "insertion must end on a path node"
            );
            let parent = trie
                .parent(classified.last)
                .expect("cannot insert an entry at the root");
            let bit = trie.bit(classified.last);
            let idx = trie.replace_child(parent, bit, entry.clone());
            *inserted = Some(idx);
            let mut outcome = ActionOutcome::new(ActionKind::Insert);
            outcome.added.push(bits_to_cidr(&trie.path(idx), entry.is_v6()));
            report.outcomes.push(outcome);
        }
        kind => {
            // earlier steps of this plan moved the conflict frontier;
            // resolve the residue as a fresh insert from where it stopped
            trace!("resolving nested {kind} conflict for {}", entry.origin());
            let rest = &rest[classified.consumed..];
            execute_plan(trie, classified, rest, target_depth, entry, prefer, report);
        }
    }
}

/// Remove a displaced entry. Entries at or above the depth of the new
/// prefix are cleared in place (their node keeps structuring the trie);
/// deeper entries take their private path spine with them, trimmed no
/// higher than one level below the new prefix.
fn exec_remove(trie: &mut Trie, target: usize, inserted_depth: u8) -> ActionOutcome {
    let mut outcome = ActionOutcome::new(ActionKind::RemoveExisting);
    let is_v6 = trie
        .entry(target)
        .expect("removal target must be an entry node")
        .is_v6();
    outcome
        .removed
        .push(bits_to_cidr(&trie.path(target), is_v6));

    if inserted_depth >= trie.depth(target) {
        trie.take_entry(target);
    } else {
        trie.detach_branch(target, inserted_depth + 1);
    }
    outcome
}

/// The new CIDR spans a surviving narrower entry at `target`: materialize
/// the complements of the new CIDR around it.
fn exec_split_inserted(
    trie: &mut Trie,
    target: usize,
    conflict_point: usize,
    entry: &Entry,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::new(ActionKind::SplitInserted);
    let limit = trie.depth(conflict_point);
    for idx in split_around(trie, target, entry, limit) {
        outcome.added.push(bits_to_cidr(&trie.path(idx), entry.is_v6()));
    }
    outcome
}

/// An existing supernet at `target` lost ground to the just-inserted entry:
/// materialize the supernet's complements around the inserted node.
fn exec_split_existing(
    trie: &mut Trie,
    target: usize,
    conflict_point: usize,
    inserted: Option<usize>,
) -> ActionOutcome {
    let boundary = inserted.expect("splitting an existing prefix requires the inserted node");
    let outer = trie
        .entry(target)
        .cloned()
        .expect("split target must be an entry node");
    let mut outcome = ActionOutcome::new(ActionKind::SplitExisting);
    let limit = trie.depth(conflict_point);
    for idx in split_around(trie, boundary, &outer, limit) {
        outcome.added.push(bits_to_cidr(&trie.path(idx), outer.is_v6()));
    }
    outcome
}
