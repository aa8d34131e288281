//! The metadata record attached to every stored prefix.

use std::collections::BTreeMap;

use ipnet::IpNet;

/// Metadata carried by a stored CIDR.
///
/// The priority vector drives conflict resolution (see
/// [`prefer_new`](crate::prefer_new)); the attribute map is opaque to the
/// store and only copied around for reporting. The origin CIDR identifies the
/// logical prefix a node belongs to even after conflict resolution has split
/// it into fragments.
///
/// ```
/// # use disjoint_cidr::Entry;
/// let entry = Entry::new("10.0.0.0/8".parse().unwrap())
///     .with_priority([2, 1])
///     .with_attribute("source", "ripe");
/// assert_eq!(entry.attribute("source"), Some("ripe"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    pub(crate) origin: IpNet,
    pub(crate) is_v6: bool,
    pub(crate) priority: Vec<u8>,
    pub(crate) attributes: BTreeMap<String, String>,
}

impl Entry {
    /// Create an entry for `cidr` with an empty priority vector and no
    /// attributes. Host bits of `cidr` are masked away.
    pub fn new(cidr: IpNet) -> Self {
        Self {
            origin: cidr.trunc(),
            is_v6: matches!(cidr, IpNet::V6(_)),
            priority: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set the priority vector. Priorities are compared lexicographically,
    /// element by element; higher values win.
    pub fn with_priority(mut self, priority: impl Into<Vec<u8>>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Attach a single attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Replace the whole attribute map.
    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// The CIDR this entry was originally inserted with. Split fragments
    /// keep the origin of the prefix they were carved out of.
    pub fn origin(&self) -> IpNet {
        self.origin
    }

    /// Whether the entry lives in the IPv6 trie.
    pub fn is_v6(&self) -> bool {
        self.is_v6
    }

    /// The priority vector, including the prefix-length component the store
    /// appends on insertion as a tie-break.
    pub fn priority(&self) -> &[u8] {
        &self.priority
    }

    /// The opaque attribute map.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Look up a single attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// A value snapshot of one resolved prefix: the CIDR reconstructed from the
/// node's position in the trie, plus a copy of the entry stored there.
///
/// Snapshots never borrow into the live trie, so they stay valid across
/// later mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntrySnapshot {
    pub(crate) cidr: IpNet,
    pub(crate) entry: Entry,
}

impl EntrySnapshot {
    /// The resolved CIDR. For split fragments this differs from
    /// [`Entry::origin`].
    pub fn cidr(&self) -> IpNet {
        self.cidr
    }

    /// The entry stored at the node.
    pub fn entry(&self) -> &Entry {
        &self.entry
    }
}
