use crate::errors::SpecError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// The kind of object being searched for, also used as the key under which
/// filters on a related object are scoped.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum TargetKind {
    #[serde(rename = "projects")]
    Project,
    #[serde(rename = "sessions")]
    Session,
    #[serde(rename = "acquisitions")]
    Acquisition,
    #[serde(rename = "files")]
    File,
    #[serde(rename = "analyses", alias = "analysis")]
    Analysis,
    #[serde(rename = "collections")]
    Collection,
}

impl TargetKind {
    pub const ALL: [TargetKind; 6] = [
        TargetKind::Project,
        TargetKind::Session,
        TargetKind::Acquisition,
        TargetKind::File,
        TargetKind::Analysis,
        TargetKind::Collection,
    ];

    /// Name used by the service, which is always plural.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Project => "projects",
            TargetKind::Session => "sessions",
            TargetKind::Acquisition => "acquisitions",
            TargetKind::File => "files",
            TargetKind::Analysis => "analyses",
            TargetKind::Collection => "collections",
        }
    }

    fn singular(&self) -> &'static str {
        match self {
            TargetKind::Project => "project",
            TargetKind::Session => "session",
            TargetKind::Acquisition => "acquisition",
            TargetKind::File => "file",
            TargetKind::Analysis => "analysis",
            TargetKind::Collection => "collection",
        }
    }
}

impl FromStr for TargetKind {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.singular() == s)
            .ok_or_else(|| SpecError::InvalidTarget(s.to_string()))
    }
}

impl TryFrom<&str> for TargetKind {
    type Error = SpecError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("projects", TargetKind::Project)]
    #[case("project", TargetKind::Project)]
    #[case("sessions", TargetKind::Session)]
    #[case("acquisition", TargetKind::Acquisition)]
    #[case("files", TargetKind::File)]
    #[case("analyses", TargetKind::Analysis)]
    #[case("analysis", TargetKind::Analysis)]
    #[case("collections", TargetKind::Collection)]
    fn test_parse(#[case] given: &str, #[case] expected: TargetKind) {
        assert_eq!(given.parse::<TargetKind>().unwrap(), expected)
    }

    #[rstest]
    #[case("")]
    #[case("subjects")]
    #[case("Projects")]
    #[case("sessions//files")]
    fn test_reject(#[case] given: &str) {
        assert!(matches!(
            TargetKind::try_from(given).unwrap_err(),
            SpecError::InvalidTarget(s) if s == given
        ))
    }

    #[test]
    fn test_serialize_plural() {
        let actual = serde_json::to_string(&TargetKind::Analysis).unwrap();
        assert_eq!(actual, "\"analyses\"");
        for kind in TargetKind::ALL {
            assert_eq!(kind.to_string().parse::<TargetKind>().unwrap(), kind);
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
            assert_eq!(serde_json::from_value::<TargetKind>(json).unwrap(), kind);
        }
    }
}
