//! Client library for the _scitran_ scientific data management service.
//!
//! ## How It Works
//!
//! [search::SearchBuilder] assembles a [search::SearchSpecification], which is
//! handed to [SciTranClient::search]. A [SciTranClient] needs a token, which is
//! obtained (and later refreshed or revoked) using an [auth::AuthClient].
//!
//! Datasets from the NIMH Data Archive are read with [ndar::Dataset] and
//! created in scitran with [SciTranClient::import].
//!
//! ```no_run
//! use scitran::auth::AuthClient;
//! use scitran::search::{Clause, SearchBuilder};
//! use scitran::types::{ApiUrl, TargetKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let url = ApiUrl::try_from("https://scitran.example.org/api/")?;
//! let mut auth = AuthClient::new(url)?;
//! auth.create("scitran")?;
//! let client = auth.client()?;
//!
//! let spec = SearchBuilder::new()
//!     .target("projects")?
//!     .must(
//!         TargetKind::Project,
//!         [Clause::matching("group", "wandell"), Clause::matching("label", "vwfa")],
//!     )
//!     .build()?;
//! for project in client.search(&spec)? {
//!     println!("{} {}", project.id, project.label().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod ndar;
pub mod search;
pub mod types;

pub use client::{ClientBuilder, ImportReport, SciTranClient};
pub use models::ResultObject;
