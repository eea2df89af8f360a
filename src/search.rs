//! Building search queries for the scitran search API.

mod builder;
mod clause;
mod escape;
mod spec;

pub use builder::SearchBuilder;
pub use clause::{Clause, Lower, RangeBounds, RangeValue, Upper};
pub use escape::{escape, unescape};
pub use spec::{Filter, SearchSpecification};
