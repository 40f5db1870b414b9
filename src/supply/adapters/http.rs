//! REST adapter for the supply repository port.
//!
//! Talks to `GET/POST /supply-requests` and `PATCH/DELETE
//! /supply-requests/{id}`. Status changes are plain `PATCH`es carrying the
//! new status; the backend is trusted to have the same transition table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError};
use crate::supply::{
    domain::{
        ItemName, PersistedSupplyRequestData, Quantity, SupplyRequest, SupplyRequestFilter,
        SupplyRequestId, SupplyStatus,
    },
    ports::{SupplyRepository, SupplyRepositoryError, SupplyRepositoryResult},
};
use crate::worker::domain::WorkerId;

/// Wire shape of a supply request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyRequestDto {
    /// Request identifier.
    pub id: Uuid,
    /// Requesting worker.
    pub worker_id: Uuid,
    /// Requested item.
    pub item_name: String,
    /// Requested quantity; non-positive values coerce to one.
    #[serde(default)]
    pub quantity: Quantity,
    /// Worker notes.
    #[serde(default)]
    pub notes: String,
    /// Admin notes.
    #[serde(default)]
    pub admin_notes: Option<String>,
    /// Current status.
    pub status: SupplyStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp; older rows omit it.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&SupplyRequest> for SupplyRequestDto {
    fn from(request: &SupplyRequest) -> Self {
        Self {
            id: request.id().into_inner(),
            worker_id: request.worker_id().into_inner(),
            item_name: request.item_name().as_str().to_owned(),
            quantity: request.quantity(),
            notes: request.notes().to_owned(),
            admin_notes: request.admin_notes().map(str::to_owned),
            status: request.status(),
            created_at: request.created_at(),
            updated_at: Some(request.updated_at()),
        }
    }
}

impl TryFrom<SupplyRequestDto> for SupplyRequest {
    type Error = SupplyRepositoryError;

    fn try_from(dto: SupplyRequestDto) -> Result<Self, Self::Error> {
        let item_name =
            ItemName::new(dto.item_name).map_err(SupplyRepositoryError::unavailable)?;
        Ok(Self::from_persisted(PersistedSupplyRequestData {
            id: SupplyRequestId::from_uuid(dto.id),
            worker_id: WorkerId::from_uuid(dto.worker_id),
            item_name,
            quantity: dto.quantity,
            notes: dto.notes,
            admin_notes: dto.admin_notes,
            status: dto.status,
            created_at: dto.created_at,
            updated_at: dto.updated_at.unwrap_or(dto.created_at),
        }))
    }
}

/// Builds the query string for a list call.
#[must_use]
pub fn list_query(filter: SupplyRequestFilter) -> Vec<(&'static str, String)> {
    let mut query = vec![("include_completed", filter.include_completed.to_string())];
    if let Some(worker_id) = filter.worker_id {
        query.push(("worker_id", worker_id.to_string()));
    }
    query
}

/// Supply repository backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpSupplyRepository {
    client: BackendClient,
}

impl HttpSupplyRepository {
    /// Creates a repository using `client`.
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

fn map_backend_error(err: BackendError, id: SupplyRequestId) -> SupplyRepositoryError {
    match err {
        BackendError::NotFound(_) => SupplyRepositoryError::NotFound(id),
        BackendError::Conflict(message) => SupplyRepositoryError::Conflict(message),
        BackendError::Validation(message) => SupplyRepositoryError::Rejected(message),
        other => SupplyRepositoryError::unavailable(other),
    }
}

#[async_trait]
impl SupplyRepository for HttpSupplyRepository {
    async fn store(&self, request: &SupplyRequest) -> SupplyRepositoryResult<SupplyRequest> {
        let dto: SupplyRequestDto = self
            .client
            .send_json(
                Method::POST,
                "/supply-requests",
                &SupplyRequestDto::from(request),
            )
            .await
            .map_err(|err| map_backend_error(err, request.id()))?;
        dto.try_into()
    }

    async fn update(&self, request: &SupplyRequest) -> SupplyRepositoryResult<SupplyRequest> {
        let path = format!("/supply-requests/{}", request.id());
        let dto: SupplyRequestDto = self
            .client
            .send_json(Method::PATCH, &path, &SupplyRequestDto::from(request))
            .await
            .map_err(|err| map_backend_error(err, request.id()))?;
        dto.try_into()
    }

    async fn find_by_id(
        &self,
        id: SupplyRequestId,
    ) -> SupplyRepositoryResult<Option<SupplyRequest>> {
        let filter = SupplyRequestFilter::new().with_completed();
        let requests = self.list(filter).await?;
        Ok(requests.into_iter().find(|request| request.id() == id))
    }

    async fn list(&self, filter: SupplyRequestFilter) -> SupplyRepositoryResult<Vec<SupplyRequest>> {
        let dtos: Vec<SupplyRequestDto> = self
            .client
            .get_json("/supply-requests", &list_query(filter))
            .await
            .map_err(SupplyRepositoryError::unavailable)?;
        dtos.into_iter().map(SupplyRequest::try_from).collect()
    }

    async fn delete(&self, id: SupplyRequestId) -> SupplyRepositoryResult<()> {
        self.client
            .send(Method::DELETE, &format!("/supply-requests/{id}"), None)
            .await
            .map_err(|err| map_backend_error(err, id))
    }
}
