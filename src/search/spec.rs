use super::clause::{Clause, MustList, RangeBounds, Unescaped};
use crate::types::TargetKind;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Filters scoped under one container key. Field names are stored escaped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub(super) matches: BTreeMap<String, Value>,
    pub(super) must: Vec<Clause>,
    pub(super) ranges: BTreeMap<String, RangeBounds>,
}

impl Filter {
    /// Exact-match filters, keyed by escaped field name.
    pub fn matches(&self) -> &BTreeMap<String, Value> {
        &self.matches
    }

    /// Clauses of the `bool.must` list, in the order they were added.
    pub fn must(&self) -> &[Clause] {
        &self.must
    }

    /// Range filters, keyed by escaped field name.
    pub fn ranges(&self) -> &BTreeMap<String, RangeBounds> {
        &self.ranges
    }

    fn operator_count(&self) -> usize {
        [
            !self.matches.is_empty(),
            !self.must.is_empty(),
            !self.ranges.is_empty(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.operator_count()))?;
        if !self.matches.is_empty() {
            map.serialize_entry("match", &Unescaped(self.matches.iter()))?;
        }
        if !self.must.is_empty() {
            map.serialize_entry("bool", &MustList(&self.must))?;
        }
        if !self.ranges.is_empty() {
            map.serialize_entry("range", &Unescaped(self.ranges.iter()))?;
        }
        map.end()
    }
}

/// A complete, immutable search query, created by [super::SearchBuilder].
///
/// Serializes to the JSON body expected by the search endpoint, e.g.
///
/// ```json
/// {"path": "sessions", "projects": {"match": {"label": "vwfa"}}}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpecification {
    pub(super) target: TargetKind,
    pub(super) filters: BTreeMap<TargetKind, Filter>,
}

impl SearchSpecification {
    /// The kind of object this search produces.
    pub fn target(&self) -> TargetKind {
        self.target
    }

    /// Filters scoped under the given container key.
    pub fn filter(&self, container: TargetKind) -> Option<&Filter> {
        self.filters.get(&container)
    }

    /// Container keys which have filters.
    pub fn containers(&self) -> impl Iterator<Item = TargetKind> + '_ {
        self.filters.keys().copied()
    }
}

impl Serialize for SearchSpecification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.filters.len()))?;
        map.serialize_entry("path", &self.target)?;
        for (container, filter) in &self.filters {
            map.serialize_entry(container, filter)?;
        }
        map.end()
    }
}
