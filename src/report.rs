//! Value reports describing what one insertion did.

use std::fmt;

use ipnet::IpNet;
use itertools::Itertools;

use crate::action::ActionKind;
use crate::conflict::ConflictKind;
use crate::entry::EntrySnapshot;

/// What a single executed action added to and removed from the resolved
/// set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    /// The action that ran.
    pub action: ActionKind,
    /// CIDRs the action materialized.
    pub added: Vec<IpNet>,
    /// CIDRs the action removed.
    pub removed: Vec<IpNet>,
}

impl ActionOutcome {
    pub(crate) fn new(action: ActionKind) -> Self {
        Self {
            action,
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Action Taken: {}, Added CIDRs: [{}], Removed CIDRs: [{}]",
            self.action,
            self.added.iter().join(" "),
            self.removed.iter().join(" "),
        )
    }
}

/// The report assembled for every insertion: the conflict the new CIDR ran
/// into, the entries it was contested by, and the outcome of each resolution
/// action, in execution order.
///
/// All content is captured by value; the report stays valid however the
/// store is mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertReport {
    /// The CIDR whose insertion was attempted (host bits masked).
    pub cidr: IpNet,
    /// How the new CIDR related to existing content.
    pub kind: ConflictKind,
    /// Snapshots of the entries the insertion conflicted with.
    pub conflicted_with: Vec<EntrySnapshot>,
    /// One outcome per executed action.
    pub outcomes: Vec<ActionOutcome>,
}

impl InsertReport {
    pub(crate) fn new(cidr: IpNet) -> Self {
        Self {
            cidr,
            kind: ConflictKind::None,
            conflicted_with: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    /// All CIDRs added by the resolution, in execution order.
    pub fn added(&self) -> impl Iterator<Item = &IpNet> {
        self.outcomes.iter().flat_map(|o| o.added.iter())
    }

    /// All CIDRs removed by the resolution, in execution order.
    pub fn removed(&self) -> impl Iterator<Item = &IpNet> {
        self.outcomes.iter().flat_map(|o| o.removed.iter())
    }
}

impl fmt::Display for InsertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind != ConflictKind::None {
            write!(f, "Detect {} conflict |", self.kind)?;
            write!(f, "New CIDR {} conflicted with [", self.cidr)?;
            for snapshot in &self.conflicted_with {
                write!(f, "{} ", snapshot.cidr())?;
            }
            write!(f, "] | ")?;
        }
        for outcome in &self.outcomes {
            write!(f, "{outcome}")?;
        }
        Ok(())
    }
}

/// Receiver invoked with the report of every insertion.
pub type ReportSink = Box<dyn FnMut(&InsertReport)>;
