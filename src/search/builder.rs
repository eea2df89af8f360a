use super::clause::{Clause, Lower, RangeBounds, Upper};
use super::escape::escape;
use super::spec::{Filter, SearchSpecification};
use crate::errors::SpecError;
use crate::types::TargetKind;
use serde_json::Value;
use std::collections::BTreeMap;

/// A `SearchBuilder` assembles a [SearchSpecification] one filter at a time.
///
/// ```
/// use scitran::search::{Lower, SearchBuilder, Upper};
/// use scitran::types::TargetKind;
///
/// let spec = SearchBuilder::new()
///     .target("sessions")?
///     .matching(TargetKind::Project, "label", "vwfa")
///     .range(TargetKind::Session, "subject.age", Some(Lower::gte(20)), Some(Upper::lt(30)))?
///     .build()?;
/// assert_eq!(spec.target(), TargetKind::Session);
/// # Ok::<(), scitran::errors::SpecError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchBuilder {
    target: Option<TargetKind>,
    filters: BTreeMap<TargetKind, Filter>,
}

impl SearchBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the kind of object to search for, by name, e.g. `"projects"` or `"project"`.
    pub fn target(self, kind: &str) -> Result<Self, SpecError> {
        Ok(self.target_kind(kind.parse()?))
    }

    /// Set the kind of object to search for.
    pub fn target_kind(mut self, kind: TargetKind) -> Self {
        self.target = Some(kind);
        self
    }

    /// Add an exact-match filter on `field` of `container`. Matching the same
    /// field of the same container again replaces the previous value.
    pub fn matching(
        mut self,
        container: TargetKind,
        field: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.filter(container)
            .matches
            .insert(escape(field), value.into());
        self
    }

    /// Append clauses which must all hold to the `bool.must` list of `container`.
    pub fn must(mut self, container: TargetKind, clauses: impl IntoIterator<Item = Clause>) -> Self {
        self.filter(container).must.extend(clauses);
        self
    }

    /// Add a range filter on `field` of `container`. At least one bound must be given.
    ///
    /// On error the builder is dropped along with the filters added so far.
    /// To keep it, validate the bounds first with [RangeBounds::new] and pass
    /// them to [SearchBuilder::range_bounds].
    pub fn range(
        self,
        container: TargetKind,
        field: &str,
        lower: Option<Lower>,
        upper: Option<Upper>,
    ) -> Result<Self, SpecError> {
        let bounds = RangeBounds::new(field, lower, upper)?;
        Ok(self.range_bounds(container, field, bounds))
    }

    /// Add a range filter with already validated bounds.
    pub fn range_bounds(
        mut self,
        container: TargetKind,
        field: &str,
        bounds: RangeBounds,
    ) -> Self {
        self.filter(container).ranges.insert(escape(field), bounds);
        self
    }

    /// Produce the search query. Fails if no target was set.
    pub fn build(self) -> Result<SearchSpecification, SpecError> {
        let target = self.target.ok_or(SpecError::IncompleteSpecification)?;
        Ok(SearchSpecification {
            target,
            filters: self.filters,
        })
    }

    fn filter(&mut self, container: TargetKind) -> &mut Filter {
        self.filters.entry(container).or_default()
    }
}
