use aliri_braid::braid;

/// Identifier of the application requesting a token, e.g. `scitran`.
#[braid(serde)]
pub struct ClientId;

/// Opaque credential granted by the auth endpoint.
#[braid(serde)]
pub struct Token;

/// The `_id` of a search result or of a container.
#[braid(serde)]
pub struct ResultId;

/// Download or browse reference for a search result.
///
/// # Examples
///
/// - `https://scitran.example.org/api/projects/57a1e8d4a3ab5e0021e2f7d1`
#[braid(serde)]
pub struct Permalink;

/// Name of a group, which owns projects, e.g. `wandell`.
#[braid(serde)]
pub struct GroupId;
