//! This crate provides a conflict-free store for IPv4 and IPv6 CIDRs. The
//! store ingests an arbitrary stream of prefixes, each carrying a priority
//! vector and opaque attributes, and maintains at all times a set of pairwise
//! disjoint prefixes covering exactly the union of the accepted ranges.
//! Lookups perform longest-prefix match against the resolved set.
//!
//! # Description of the store
//!
//! Prefixes are keyed by their bit path in a binary trie, one trie per
//! address family. A node without an entry only gives structure to the trie;
//! a node with an entry represents a resolved CIDR and is always a leaf.
//! When an insertion meets existing content, the conflict is classified by
//! where the walk stopped:
//!
//! - *Equal*: an entry already sits at the same depth. The higher-priority
//!   entry keeps the slot.
//! - *Sub*: the new prefix is strictly narrower than a stored supernet. If
//!   the newcomer wins, the supernet is fractured into the minimal set of
//!   complements around it and its entry is dropped.
//! - *Super*: the new prefix spans one or more stored narrower entries.
//!   Losing entries are removed; for each surviving entry the new prefix is
//!   fractured around it, so the newcomer may end up existing only as its
//!   fragments.
//!
//! Priorities are vectors of `u8` compared lexicographically; ties favor the
//! newcomer, and the store appends the prefix length as a final component,
//! so with equal priorities a more-specific prefix wins. Every insertion
//! returns an [`InsertReport`] describing the conflict and each resolution
//! action taken.
//!
//! ```
//! use disjoint_cidr::{CidrStore, Entry};
//!
//! let mut store = CidrStore::new();
//! let wide: ipnet::IpNet = "192.168.0.0/16".parse()?;
//! let narrow: ipnet::IpNet = "192.168.1.0/24".parse()?;
//!
//! store.insert(wide, Entry::new(wide).with_priority([0]))?;
//! store.insert(narrow, Entry::new(narrow).with_priority([1]))?;
//!
//! // the /16 lost ground to the /24 and got fractured around it
//! assert_eq!(store.entries(false).len(), 9);
//! let hit = store.lookup("192.168.25.154")?.unwrap();
//! assert_eq!(hit.cidr().to_string(), "192.168.16.0/20");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The store is single-writer and never blocks: every operation is bounded
//! by the prefix width. Snapshots returned by lookups, enumeration, and
//! reports are value copies and stay valid across later mutations.

mod action;
mod bits;
mod compare;
mod conflict;
mod entry;
mod error;
mod plan;
mod report;
mod split;
mod trie;

#[cfg(test)]
mod fuzzing;

use std::net::IpAddr;

use ipnet::IpNet;
use log::debug;

pub use action::ActionKind;
pub use compare::{prefer_new, Comparator};
pub use conflict::ConflictKind;
pub use entry::{Entry, EntrySnapshot};
pub use error::Error;
pub use report::{ActionOutcome, InsertReport, ReportSink};

use bits::{bits_to_cidr, cidr_to_bits, ip_to_bits};
use trie::{Trie, ROOT};

/// A conflict-free CIDR store: one binary trie per address family, a
/// comparator deciding conflicts, and an optional report sink.
pub struct CidrStore {
    v4: Trie,
    v6: Trie,
    comparator: Comparator,
    sink: Option<ReportSink>,
}

impl Default for CidrStore {
    fn default() -> Self {
        Self {
            v4: Trie::new(),
            v6: Trie::new(),
            comparator: Box::new(prefer_new),
            sink: None,
        }
    }
}

impl CidrStore {
    /// Create an empty store with the default comparator and no sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the conflict comparator. The callable receives the entry
    /// being inserted first and the stored entry second, and returns `true`
    /// iff the newcomer should win. See [`prefer_new`] for the default.
    pub fn with_comparator(mut self, comparator: impl Fn(&Entry, &Entry) -> bool + 'static) -> Self {
        self.comparator = Box::new(comparator);
        self
    }

    /// Install a receiver invoked with the [`InsertReport`] of every
    /// insertion, after the trie has settled.
    pub fn with_report_sink(mut self, sink: impl FnMut(&InsertReport) + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Install a report sink that prints every report through
    /// [`log::info!`].
    pub fn with_logged_reports(self) -> Self {
        self.with_report_sink(|report| log::info!("{report}"))
    }

    /// Insert `cidr` with its metadata, resolving any conflict with already
    /// stored prefixes in place.
    ///
    /// Host bits of `cidr` are masked away. The prefix length is appended to
    /// the entry's priority vector as the final tie-break before any
    /// comparison runs. Fails with [`Error::InvalidPrefix`] for `/0` and
    /// with [`Error::MismatchedVersion`] when the entry's version flag
    /// disagrees with the cidr's family; a failed insertion leaves the store
    /// unmodified.
    pub fn insert(&mut self, cidr: IpNet, mut entry: Entry) -> Result<InsertReport, Error> {
        let cidr = cidr.trunc();
        let is_v6 = matches!(cidr, IpNet::V6(_));
        if entry.is_v6 != is_v6 {
            return Err(Error::MismatchedVersion {
                cidr,
                entry_is_v6: entry.is_v6,
            });
        }
        let path = cidr_to_bits(&cidr)?;
        let depth = path.len() as u8;

        entry.origin = cidr;
        // size of the subnet as the trailing tie-break priority
        entry.priority.push(cidr.prefix_len());

        let trie = if is_v6 { &mut self.v6 } else { &mut self.v4 };
        let mut report = InsertReport::new(cidr);
        let kind = action::resolve(
            trie,
            ROOT,
            &path,
            depth,
            &entry,
            &*self.comparator,
            &mut report,
        );
        report.kind = kind;

        debug!("{report}");
        if let Some(sink) = &mut self.sink {
            sink(&report);
        }
        Ok(report)
    }

    /// Find the most specific stored CIDR containing the given IP address.
    ///
    /// The address is textual, IPv4 dotted or IPv6 colonned; fails with
    /// [`Error::ParseError`] otherwise. Returns `None` when no stored prefix
    /// covers the address.
    pub fn lookup(&self, ip: &str) -> Result<Option<EntrySnapshot>, Error> {
        let addr: IpAddr = ip.parse()?;
        let is_v6 = addr.is_ipv6();
        let trie = if is_v6 { &self.v6 } else { &self.v4 };
        let path = ip_to_bits(addr);

        let mut current = ROOT;
        for (i, bit) in path.iter().enumerate() {
            if trie.is_leaf(current) {
                return Ok(match trie.entry(current) {
                    Some(entry) => Some(EntrySnapshot {
                        cidr: bits_to_cidr(&path[..i], is_v6),
                        entry: entry.clone(),
                    }),
                    // the entry-less root of an empty trie
                    None if current == ROOT => None,
                    None => unreachable!("leaf without an entry"),
                });
            }
            current = match trie.child(current, *bit) {
                Some(next) => next,
                None => return Ok(None),
            };
        }

        // the walk consumed the full address width: a stored /32 or /128
        match trie.entry(current) {
            Some(entry) => Ok(Some(EntrySnapshot {
                cidr: bits_to_cidr(&path, is_v6),
                entry: entry.clone(),
            })),
            None => unreachable!("exhausted a lookup walk without reaching a leaf"),
        }
    }

    /// Enumerate the resolved set of one address family, in preorder with
    /// bit 0 before bit 1. That is ascending base-address order, with ties
    /// broken by longer prefix first.
    pub fn entries(&self, v6: bool) -> Vec<EntrySnapshot> {
        let trie = if v6 { &self.v6 } else { &self.v4 };
        trie.leaves(ROOT)
            .into_iter()
            .map(|idx| trie.snapshot(idx))
            .collect()
    }

    /// Enumerate just the resolved CIDRs of one address family.
    pub fn cidrs(&self, v6: bool) -> Vec<IpNet> {
        self.entries(v6).into_iter().map(|s| s.cidr()).collect()
    }

    /// The number of resolved prefixes across both families. Walks the
    /// tries.
    pub fn len(&self) -> usize {
        self.v4.leaves(ROOT).len() + self.v6.leaves(ROOT).len()
    }

    /// Whether the store holds no prefixes at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
