//! Mapping declarations: ordered (source, destination) path pairs.
//!
//! A mapping's source specification is relative to the module source root
//! and its destination specification is relative to the deployment root.
//! Either side may be a literal path, a directory path, or carry a
//! single-level `*` wildcard in its final segment; a trailing path
//! separator on the destination is semantically meaningful (it forces
//! directory interpretation).  None of that is validated here — any two
//! strings are accepted, and semantic validity is only checked at
//! deployment time.

use serde::{Deserialize, Serialize};

/// A declared (source, destination) path pair to be deployed.
///
/// Deserializes from both the bare-pair form `["src", "dst"]` and the
/// structured form `{ "source": "src", "dest": "dst" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MappingRepr")]
pub struct Mapping {
    /// Source specification, relative to the module source root.
    pub source: String,
    /// Destination specification, relative to the deployment root.
    pub dest: String,
}

impl Mapping {
    /// Create a new mapping pair.
    #[must_use]
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
}

/// Accepted wire shapes for a [`Mapping`].
#[derive(Deserialize)]
#[serde(untagged)]
enum MappingRepr {
    /// Bare pair: `["app/etc/module.xml", "app/etc/module.xml"]`.
    Pair(String, String),
    /// Structured: `{ "source": "...", "dest": "..." }`.
    Entry { source: String, dest: String },
}

impl From<MappingRepr> for Mapping {
    fn from(repr: MappingRepr) -> Self {
        match repr {
            MappingRepr::Pair(source, dest) | MappingRepr::Entry { source, dest } => {
                Self { source, dest }
            }
        }
    }
}

/// Ordered store of mapping declarations.
///
/// Insertion order is preserved and is the order of application during a
/// deployment run.  Snapshots obtained through [`MappingSet::entries`] (or
/// by cloning) do not alias the store: mutating a clone never changes the
/// original.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSet {
    entries: Vec<Mapping>,
}

impl MappingSet {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire stored sequence.
    pub fn set(&mut self, mappings: Vec<Mapping>) {
        self.entries = mappings;
    }

    /// The current sequence, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Mapping] {
        &self.entries
    }

    /// Append a single pair to the end of the sequence.
    pub fn add(&mut self, source: impl Into<String>, dest: impl Into<String>) {
        self.entries.push(Mapping::new(source, dest));
    }

    /// Append an already-constructed mapping.
    pub fn push(&mut self, mapping: Mapping) {
        self.entries.push(mapping);
    }

    /// Number of stored mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no mappings are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the stored mappings in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Mapping> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a MappingSet {
    type Item = &'a Mapping;
    type IntoIter = std::slice::Iter<'a, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Mapping> for MappingSet {
    fn from_iter<I: IntoIterator<Item = Mapping>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
