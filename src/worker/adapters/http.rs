//! REST adapter for the worker repository port.
//!
//! Talks to `GET/POST /workers` and `GET/PATCH /workers/{id}`. Deactivation
//! is a `PATCH` with `is_active: false`; the backend keeps the row so task
//! history stays attached.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError};
use crate::worker::{
    domain::{PersistedWorkerData, Worker, WorkerId, WorkerName, WorkerProfile},
    ports::{WorkerRepository, WorkerRepositoryError, WorkerRepositoryResult},
};

/// Wire shape of a worker record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerDto {
    /// Worker identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-text role.
    #[serde(default)]
    pub role: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Contact email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp; older rows omit it.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Worker> for WorkerDto {
    fn from(worker: &Worker) -> Self {
        let profile = worker.profile();
        Self {
            id: worker.id().into_inner(),
            name: worker.name().as_str().to_owned(),
            role: profile.role.clone(),
            phone: profile.phone.clone(),
            email: profile.email.clone(),
            notes: profile.notes.clone(),
            is_active: worker.is_active(),
            created_at: worker.created_at(),
            updated_at: Some(worker.updated_at()),
        }
    }
}

impl TryFrom<WorkerDto> for Worker {
    type Error = WorkerRepositoryError;

    fn try_from(dto: WorkerDto) -> Result<Self, Self::Error> {
        let name = WorkerName::new(dto.name).map_err(WorkerRepositoryError::unavailable)?;
        Ok(Self::from_persisted(PersistedWorkerData {
            id: WorkerId::from_uuid(dto.id),
            name,
            profile: WorkerProfile {
                role: dto.role,
                phone: dto.phone,
                email: dto.email,
                notes: dto.notes,
            },
            active: dto.is_active,
            created_at: dto.created_at,
            updated_at: dto.updated_at.unwrap_or(dto.created_at),
        }))
    }
}

/// Worker repository backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpWorkerRepository {
    client: BackendClient,
}

impl HttpWorkerRepository {
    /// Creates a repository using `client`.
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

fn map_backend_error(err: BackendError, id: WorkerId) -> WorkerRepositoryError {
    match err {
        BackendError::NotFound(_) => WorkerRepositoryError::NotFound(id),
        BackendError::Conflict(message) => WorkerRepositoryError::Conflict(message),
        BackendError::Validation(message) => WorkerRepositoryError::Rejected(message),
        other => WorkerRepositoryError::unavailable(other),
    }
}

#[async_trait]
impl WorkerRepository for HttpWorkerRepository {
    async fn store(&self, worker: &Worker) -> WorkerRepositoryResult<Worker> {
        let dto: WorkerDto = self
            .client
            .send_json(Method::POST, "/workers", &WorkerDto::from(worker))
            .await
            .map_err(|err| match err {
                BackendError::Conflict(_) => WorkerRepositoryError::DuplicateWorker(worker.id()),
                other => map_backend_error(other, worker.id()),
            })?;
        dto.try_into()
    }

    async fn update(&self, worker: &Worker) -> WorkerRepositoryResult<Worker> {
        let path = format!("/workers/{}", worker.id());
        let dto: WorkerDto = self
            .client
            .send_json(Method::PATCH, &path, &WorkerDto::from(worker))
            .await
            .map_err(|err| map_backend_error(err, worker.id()))?;
        dto.try_into()
    }

    async fn find_by_id(&self, id: WorkerId) -> WorkerRepositoryResult<Option<Worker>> {
        let path = format!("/workers/{id}");
        match self.client.get_json::<WorkerDto>(&path, &[]).await {
            Ok(dto) => Ok(Some(dto.try_into()?)),
            Err(BackendError::NotFound(_)) => Ok(None),
            Err(err) => Err(map_backend_error(err, id)),
        }
    }

    async fn list(&self, include_inactive: bool) -> WorkerRepositoryResult<Vec<Worker>> {
        let query = [("include_inactive", include_inactive.to_string())];
        let dtos: Vec<WorkerDto> = self
            .client
            .get_json("/workers", &query)
            .await
            .map_err(WorkerRepositoryError::unavailable)?;
        dtos.into_iter().map(Worker::try_from).collect()
    }
}
