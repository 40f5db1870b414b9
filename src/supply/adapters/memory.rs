//! In-memory supply request repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::supply::{
    domain::{SupplyRequest, SupplyRequestFilter, SupplyRequestId},
    ports::{SupplyRepository, SupplyRepositoryError, SupplyRepositoryResult},
};

/// Thread-safe in-memory supply request repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySupplyRepository {
    state: Arc<RwLock<InMemorySupplyState>>,
}

#[derive(Debug, Default)]
struct InMemorySupplyState {
    requests: HashMap<SupplyRequestId, SupplyRequest>,
    order: Vec<SupplyRequestId>,
}

impl InMemorySupplyRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> SupplyRepositoryError {
    SupplyRepositoryError::unavailable(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SupplyRepository for InMemorySupplyRepository {
    async fn store(&self, request: &SupplyRequest) -> SupplyRepositoryResult<SupplyRequest> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.requests.contains_key(&request.id()) {
            return Err(SupplyRepositoryError::DuplicateRequest(request.id()));
        }
        state.order.push(request.id());
        state.requests.insert(request.id(), request.clone());
        Ok(request.clone())
    }

    async fn update(&self, request: &SupplyRequest) -> SupplyRepositoryResult<SupplyRequest> {
        let mut state = self.state.write().map_err(lock_error)?;
        let slot = state
            .requests
            .get_mut(&request.id())
            .ok_or(SupplyRepositoryError::NotFound(request.id()))?;
        *slot = request.clone();
        Ok(request.clone())
    }

    async fn find_by_id(
        &self,
        id: SupplyRequestId,
    ) -> SupplyRepositoryResult<Option<SupplyRequest>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.requests.get(&id).cloned())
    }

    async fn list(&self, filter: SupplyRequestFilter) -> SupplyRepositoryResult<Vec<SupplyRequest>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.requests.get(id))
            .filter(|request| filter.matches(request))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: SupplyRequestId) -> SupplyRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .requests
            .remove(&id)
            .ok_or(SupplyRepositoryError::NotFound(id))?;
        state.order.retain(|existing| *existing != id);
        Ok(())
    }
}
