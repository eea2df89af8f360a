//! Creating containers, for importing datasets.

use super::SciTranClient;
use crate::errors::{check, json, ImportError, ServiceError};
use crate::models::CreatedResponse;
use crate::ndar::{Acquisition, Dataset, Session};
use crate::types::{GroupId, ResultId, TargetKind};
use reqwest::StatusCode;
use serde::Serialize;

#[derive(Serialize)]
struct NewGroup<'a> {
    #[serde(rename = "_id")]
    id: &'a GroupId,
}

#[derive(Serialize)]
struct InProject<'a> {
    #[serde(flatten)]
    session: &'a Session,
    project: &'a ResultId,
}

#[derive(Serialize)]
struct InSession<'a> {
    #[serde(flatten)]
    acquisition: &'a Acquisition,
    session: &'a ResultId,
}

/// Containers created by [SciTranClient::import].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub project: ResultId,
    pub sessions: Vec<ResultId>,
    pub acquisitions: Vec<ResultId>,
}

impl SciTranClient {
    /// Create a container of the given kind, e.g. a session with
    /// `{"label": ..., "project": <project _id>}`. Returns its `_id`.
    pub fn create_container<T: Serialize + ?Sized>(
        &self,
        kind: TargetKind,
        payload: &T,
    ) -> Result<ResultId, ServiceError> {
        self.require_token()?;
        let url = self.url.endpoint_url(&[kind.as_str()])?;
        log::debug!("POST {}", url);
        let res = self.client.post(url).query(&self.query).json(payload).send()?;
        let created: CreatedResponse = json(res)?;
        log::info!("created {} {}", kind, created.id);
        Ok(created.id)
    }

    /// Create a group unless it already exists. Returns `true` if the group was created.
    pub fn ensure_group(&self, group: &GroupId) -> Result<bool, ServiceError> {
        self.require_token()?;
        let url = self.url.endpoint_url(&["groups", group.as_str()])?;
        log::debug!("GET {}", url);
        let res = self.client.get(url).query(&self.query).send()?;
        if res.status() != StatusCode::NOT_FOUND {
            check(res)?;
            log::debug!("group {} already exists", group);
            return Ok(false);
        }
        let url = self.url.endpoint_url(&["groups"])?;
        log::debug!("POST {}", url);
        let res = self
            .client
            .post(url)
            .query(&self.query)
            .json(&NewGroup { id: group })
            .send()?;
        check(res)?;
        log::info!("created group {}", group);
        Ok(true)
    }

    /// Create the containers of an NDAR dataset: its group if needed, then the
    /// project, then each session which has acquisitions, followed by its
    /// acquisitions. Subjects without images are skipped.
    ///
    /// Stops at the first failure. Containers created before it are kept.
    pub fn import(&self, dataset: &Dataset) -> Result<ImportReport, ImportError> {
        self.ensure_group(&dataset.project.group)?;
        let project = self.create_container(TargetKind::Project, &dataset.project)?;
        let mut report = ImportReport {
            project,
            sessions: Vec::new(),
            acquisitions: Vec::new(),
        };
        for (subject_key, session) in &dataset.sessions {
            let acquisitions = dataset.acquisitions_of(subject_key);
            if acquisitions.is_empty() {
                log::debug!("subject {} has no images, skipping", subject_key);
                continue;
            }
            let payload = InProject {
                session,
                project: &report.project,
            };
            let session_id = self.create_container(TargetKind::Session, &payload)?;
            for acquisition in acquisitions {
                let payload = InSession {
                    acquisition,
                    session: &session_id,
                };
                let acquisition_id = self.create_container(TargetKind::Acquisition, &payload)?;
                report.acquisitions.push(acquisition_id);
            }
            report.sessions.push(session_id);
        }
        log::info!(
            "imported project {} with {} sessions and {} acquisitions",
            report.project,
            report.sessions.len(),
            report.acquisitions.len()
        );
        Ok(report)
    }
}
