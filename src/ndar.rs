//! Reading datasets from the NIMH Data Archive (NDAR) into scitran containers.
//!
//! An NDAR dataset is a folder containing two tab-separated tables:
//!
//! - `ndar_aggregate.txt`: one row per subject, which becomes a session
//! - `image03.txt`: one row per image, which becomes an acquisition
//!
//! Both tables have a header line followed by a line of column descriptions,
//! which is skipped. The project is named after the folder.
//!
//! A [Dataset] is imported using [crate::SciTranClient::import].

use crate::errors::ImportError;
use crate::types::GroupId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

pub const SUBJECTS_FILE: &str = "ndar_aggregate.txt";
pub const IMAGES_FILE: &str = "image03.txt";

/// Group which NDAR projects are imported into.
pub const NDAR_GROUP: &str = "ndar";

/// 24 * 3600 * 365.25 / 12
const SECONDS_PER_MONTH: u64 = 2_629_800;

/// A row of an NDAR table, keyed by column name.
pub type Row = BTreeMap<String, String>;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub label: String,
    pub group: GroupId,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub sex: String,
    /// Age in seconds.
    pub age: u64,
    pub code: String,
    pub metadata: Row,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub label: String,
    pub subject: Subject,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Acquisition {
    pub label: String,
    pub metadata: Row,
}

/// Containers of an NDAR dataset, before they are created in scitran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub project: Project,
    /// Sessions keyed by NDAR `subjectkey`.
    pub sessions: BTreeMap<String, Session>,
    /// Acquisitions of each subject, keyed by NDAR `subjectkey`.
    pub acquisitions: BTreeMap<String, Vec<Acquisition>>,
}

impl Dataset {
    /// Read the dataset in `folder` into a project of `group`.
    pub fn from_folder(folder: impl AsRef<Path>, group: GroupId) -> Result<Self, ImportError> {
        let folder = folder.as_ref();
        let label = folder
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ImportError::InvalidFolder(folder.to_path_buf()))?;
        let subjects = fs_err::File::open(folder.join(SUBJECTS_FILE))?;
        let images = fs_err::File::open(folder.join(IMAGES_FILE))?;
        Self::from_readers(label, group, subjects, images)
    }

    /// Read a dataset from the contents of its subjects and images tables.
    pub fn from_readers(
        label: &str,
        group: GroupId,
        subjects: impl Read,
        images: impl Read,
    ) -> Result<Self, ImportError> {
        let mut sessions = BTreeMap::new();
        for row in read_rows(subjects)? {
            let session = session_from_subject(row)?;
            sessions.insert(session.label.clone(), session);
        }
        let mut acquisitions: BTreeMap<String, Vec<Acquisition>> = BTreeMap::new();
        for row in read_rows(images)? {
            let subject_key = column(&row, "subjectkey")?.to_string();
            acquisitions
                .entry(subject_key)
                .or_default()
                .push(acquisition_from_image(row)?);
        }
        log::debug!(
            "read {} subjects and {} images",
            sessions.len(),
            acquisitions.values().map(Vec::len).sum::<usize>()
        );
        Ok(Self {
            project: Project {
                label: label.to_string(),
                group,
            },
            sessions,
            acquisitions,
        })
    }

    /// Acquisitions of a subject, empty if it has none.
    pub fn acquisitions_of(&self, subject_key: &str) -> &[Acquisition] {
        self.acquisitions
            .get(subject_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Rows of a tab-separated NDAR table, without the description line.
fn read_rows(reader: impl Read) -> Result<Vec<Row>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(reader);
    let rows = reader
        .deserialize()
        .skip(1)
        .collect::<Result<Vec<Row>, csv::Error>>()?;
    Ok(rows)
}

fn column<'a>(row: &'a Row, name: &'static str) -> Result<&'a str, ImportError> {
    row.get(name)
        .map(String::as_str)
        .ok_or(ImportError::MissingColumn(name))
}

pub fn session_from_subject(row: Row) -> Result<Session, ImportError> {
    let code = column(&row, "subjectkey")?.to_string();
    let sex = column(&row, "gender")?.to_lowercase();
    let age = age_in_seconds(column(&row, "interview_age")?)?;
    Ok(Session {
        label: code.clone(),
        subject: Subject {
            sex,
            age,
            code,
            metadata: row,
        },
    })
}

pub fn acquisition_from_image(row: Row) -> Result<Acquisition, ImportError> {
    let label = image_label(column(&row, "image_file")?).to_string();
    Ok(Acquisition {
        label,
        metadata: row,
    })
}

/// File name of an image up to its first `.`, e.g. `t1` for `s3://bucket/NDARAB123/t1.nii.gz`.
pub fn image_label(image_file: &str) -> &str {
    let name = image_file.rsplit('/').next().unwrap_or(image_file);
    name.split('.').next().unwrap_or(name)
}

/// Convert an NDAR `interview_age`, given in months, to seconds. Blank means zero.
pub fn age_in_seconds(age_in_months: &str) -> Result<u64, ImportError> {
    let months = age_in_months.trim();
    if months.is_empty() {
        return Ok(0);
    }
    months
        .parse::<u64>()
        .map(|m| m * SECONDS_PER_MONTH)
        .map_err(|_| ImportError::InvalidAge(age_in_months.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use tempfile::TempDir;

    const SUBJECTS: &str = "\
subjectkey\tgender\tinterview_age\tsrc_subject_id
The NDAR Global Unique Identifier\tSex of the subject\tAge in months\tLab subject id
NDARAB123XYZ\tF\t120\tsub-01
NDARCD456UVW\tM\t\tsub-02
";

    const IMAGES: &str = "\
subjectkey\timage_file\tscan_type
The NDAR Global Unique Identifier\tLocation of the image\tType of scan
NDARAB123XYZ\ts3://ndar/NDARAB123XYZ/t1w.nii.gz\tMR structural (T1)
NDARAB123XYZ\ts3://ndar/NDARAB123XYZ/dwi.nii.gz\tMR diffusion
";

    fn dataset() -> Dataset {
        Dataset::from_readers(
            "study_01",
            GroupId::from_static(NDAR_GROUP),
            SUBJECTS.as_bytes(),
            IMAGES.as_bytes(),
        )
        .unwrap()
    }

    #[rstest]
    #[case("", 0)]
    #[case(" ", 0)]
    #[case("1", 2_629_800)]
    #[case("120", 315_576_000)]
    fn test_age_in_seconds(#[case] months: &str, #[case] expected: u64) {
        assert_eq!(age_in_seconds(months).unwrap(), expected);
    }

    #[rstest]
    #[case("ten")]
    #[case("-3")]
    #[case("12.5")]
    fn test_invalid_age(#[case] months: &str) {
        assert!(matches!(age_in_seconds(months), Err(ImportError::InvalidAge(_))));
    }

    #[rstest]
    #[case("s3://ndar/NDARAB123XYZ/t1w.nii.gz", "t1w")]
    #[case("dwi.nii", "dwi")]
    #[case("/data/scans/rest", "rest")]
    fn test_image_label(#[case] image_file: &str, #[case] expected: &str) {
        assert_eq!(image_label(image_file), expected);
    }

    #[test]
    fn test_read_dataset() {
        let dataset = dataset();
        assert_eq!(dataset.project.label, "study_01");
        assert_eq!(dataset.project.group.as_str(), "ndar");
        assert_eq!(dataset.sessions.len(), 2);

        let session = &dataset.sessions["NDARAB123XYZ"];
        assert_eq!(session.label, "NDARAB123XYZ");
        assert_eq!(session.subject.sex, "f");
        assert_eq!(session.subject.age, 315_576_000);
        assert_eq!(session.subject.metadata["src_subject_id"], "sub-01");
        assert_eq!(dataset.sessions["NDARCD456UVW"].subject.age, 0);

        let labels: Vec<&str> = dataset
            .acquisitions_of("NDARAB123XYZ")
            .iter()
            .map(|a| a.label.as_str())
            .collect();
        assert_eq!(labels, ["t1w", "dwi"]);
        assert!(dataset.acquisitions_of("NDARCD456UVW").is_empty());
    }

    #[test]
    fn test_missing_column() {
        let subjects = "subjectkey\tinterview_age\ndescription\tdescription\nNDARAB123XYZ\t12\n";
        let actual = Dataset::from_readers(
            "study_01",
            GroupId::from_static(NDAR_GROUP),
            subjects.as_bytes(),
            IMAGES.as_bytes(),
        );
        assert!(matches!(actual, Err(ImportError::MissingColumn("gender"))));
    }

    #[test]
    fn test_from_folder() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("study_01");
        fs_err::create_dir(&folder).unwrap();
        fs_err::write(folder.join(SUBJECTS_FILE), SUBJECTS).unwrap();
        fs_err::write(folder.join(IMAGES_FILE), IMAGES).unwrap();

        let actual = Dataset::from_folder(&folder, GroupId::from_static(NDAR_GROUP)).unwrap();
        assert_eq!(actual, dataset());
    }

    #[test]
    fn test_from_folder_missing_table() {
        let dir = TempDir::new().unwrap();
        let actual = Dataset::from_folder(dir.path(), GroupId::from_static(NDAR_GROUP));
        assert!(matches!(actual, Err(ImportError::Io(_))));
    }

    #[test]
    fn test_session_payload() {
        let session = &dataset().sessions["NDARAB123XYZ"];
        let actual = serde_json::to_value(session).unwrap();
        assert_eq!(actual["label"], "NDARAB123XYZ");
        assert_eq!(actual["subject"]["code"], "NDARAB123XYZ");
        assert_eq!(actual["subject"]["metadata"]["gender"], "F");
    }
}
