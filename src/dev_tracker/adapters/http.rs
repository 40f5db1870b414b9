//! REST adapter for the dev tracker ports.
//!
//! Items live under `/dev-items`, attachments under
//! `/dev-items/{id}/images` and production feedback under `/feedback`.
//! Failure history is always written as a list of records. Older rows stored
//! it as a JSON-encoded string, which is still accepted on read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{
    Method,
    multipart::{Form, Part},
};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError};
use crate::dev_tracker::{
    domain::{
        DevImage, DevItem, DevItemId, DevItemTitle, DevMetrics, DevPriority, DevStatus, FailRecord,
        FeedbackId, FeedbackIntakeStatus, FeedbackReview, ImageId, PersistedDevItemData,
        ProdFeedback,
    },
    ports::{
        DevItemRepository, DevStoreError, DevStoreResult, FeedbackGateway, ImageStore,
        ImageUpload,
    },
};

/// Wire shape of a dev item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevItemDto {
    /// Item identifier.
    pub id: Uuid,
    /// Item title.
    pub title: String,
    /// Kind label.
    #[serde(default)]
    pub item_type: String,
    /// Urgency.
    #[serde(default)]
    pub priority: DevPriority,
    /// Status; `done` is read as verified.
    #[serde(default)]
    pub status: DevStatus,
    /// Collaboration flag.
    #[serde(default)]
    pub requires_collab: bool,
    /// Latest failure note.
    #[serde(default)]
    pub fail_note: Option<String>,
    /// Failure history, oldest first.
    #[serde(default, deserialize_with = "deserialize_history")]
    pub fail_note_history: Vec<FailRecord>,
    /// Testing instructions.
    #[serde(default)]
    pub test_notes: Option<String>,
    /// Attached images.
    #[serde(default)]
    pub images: Vec<DevImage>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Verification timestamp.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Latest modification timestamp; older rows omit it.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryField {
    Records(Vec<FailRecord>),
    Encoded(String),
}

fn deserialize_history<'de, D>(deserializer: D) -> Result<Vec<FailRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<HistoryField>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(HistoryField::Records(records)) => Ok(records),
        Some(HistoryField::Encoded(raw)) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(HistoryField::Encoded(raw)) => serde_json::from_str(&raw).map_err(D::Error::custom),
    }
}

impl From<&DevItem> for DevItemDto {
    fn from(item: &DevItem) -> Self {
        Self {
            id: item.id().into_inner(),
            title: item.title().as_str().to_owned(),
            item_type: item.item_type().to_owned(),
            priority: item.priority(),
            status: item.status(),
            requires_collab: item.requires_collab(),
            fail_note: item.fail_note().map(str::to_owned),
            fail_note_history: item.fail_note_history().to_vec(),
            test_notes: Some(item.test_notes().to_owned()),
            images: item.images().to_vec(),
            created_at: item.created_at(),
            completed_at: item.completed_at(),
            updated_at: Some(item.updated_at()),
        }
    }
}

impl TryFrom<DevItemDto> for DevItem {
    type Error = DevStoreError;

    fn try_from(dto: DevItemDto) -> Result<Self, Self::Error> {
        let title = DevItemTitle::new(dto.title).map_err(DevStoreError::unavailable)?;
        Ok(Self::from_persisted(PersistedDevItemData {
            id: DevItemId::from_uuid(dto.id),
            title,
            item_type: dto.item_type,
            priority: dto.priority,
            status: dto.status,
            requires_collab: dto.requires_collab,
            fail_note: dto.fail_note,
            fail_note_history: dto.fail_note_history,
            test_notes: dto.test_notes.unwrap_or_default(),
            images: dto.images,
            created_at: dto.created_at,
            completed_at: dto.completed_at,
            updated_at: dto.updated_at.unwrap_or(dto.created_at),
        }))
    }
}

#[derive(Debug, Deserialize)]
struct ReviewResponse {
    #[serde(default)]
    dev_item: Option<DevItemDto>,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    imported: usize,
}

/// Builds the multipart form for an image upload.
///
/// # Errors
///
/// Returns [`DevStoreError::Rejected`] for an unusable content type.
pub fn upload_form(upload: &ImageUpload) -> DevStoreResult<Form> {
    let part = Part::bytes(upload.bytes.clone())
        .file_name(upload.filename.clone())
        .mime_str(&upload.content_type)
        .map_err(|err| DevStoreError::Rejected(err.to_string()))?;
    Ok(Form::new().part("file", part))
}

/// Dev tracker store backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpDevTracker {
    client: BackendClient,
}

impl HttpDevTracker {
    /// Creates a store using `client`.
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

fn map_backend_error(err: BackendError, missing: DevStoreError) -> DevStoreError {
    match err {
        BackendError::NotFound(_) => missing,
        BackendError::Conflict(message) => DevStoreError::Conflict(message),
        BackendError::Validation(message) => DevStoreError::Rejected(message),
        other => DevStoreError::unavailable(other),
    }
}

#[async_trait]
impl DevItemRepository for HttpDevTracker {
    async fn store(&self, item: &DevItem) -> DevStoreResult<DevItem> {
        let dto: DevItemDto = self
            .client
            .send_json(Method::POST, "/dev-items", &DevItemDto::from(item))
            .await
            .map_err(|err| map_backend_error(err, DevStoreError::ItemNotFound(item.id())))?;
        dto.try_into()
    }

    async fn update(&self, item: &DevItem) -> DevStoreResult<DevItem> {
        let path = format!("/dev-items/{}", item.id());
        let dto: DevItemDto = self
            .client
            .send_json(Method::PATCH, &path, &DevItemDto::from(item))
            .await
            .map_err(|err| map_backend_error(err, DevStoreError::ItemNotFound(item.id())))?;
        dto.try_into()
    }

    async fn find_by_id(&self, id: DevItemId) -> DevStoreResult<Option<DevItem>> {
        let items = self.list_all().await?;
        Ok(items.into_iter().find(|item| item.id() == id))
    }

    async fn list_all(&self) -> DevStoreResult<Vec<DevItem>> {
        let dtos: Vec<DevItemDto> = self
            .client
            .get_json("/dev-items", &[])
            .await
            .map_err(DevStoreError::unavailable)?;
        dtos.into_iter().map(DevItem::try_from).collect()
    }

    async fn delete(&self, id: DevItemId) -> DevStoreResult<()> {
        self.client
            .send(Method::DELETE, &format!("/dev-items/{id}"), None)
            .await
            .map_err(|err| map_backend_error(err, DevStoreError::ItemNotFound(id)))
    }

    async fn metrics(&self, _now: DateTime<Utc>) -> DevStoreResult<DevMetrics> {
        self.client
            .get_json("/dev-items/metrics", &[])
            .await
            .map_err(DevStoreError::unavailable)
    }
}

#[async_trait]
impl ImageStore for HttpDevTracker {
    async fn upload(&self, item_id: DevItemId, upload: &ImageUpload) -> DevStoreResult<DevImage> {
        let form = upload_form(upload)?;
        self.client
            .send_multipart(&format!("/dev-items/{item_id}/images"), form)
            .await
            .map_err(|err| map_backend_error(err, DevStoreError::ItemNotFound(item_id)))
    }

    async fn remove(&self, item_id: DevItemId, image_id: ImageId) -> DevStoreResult<()> {
        let path = format!("/dev-items/{item_id}/images/{image_id}");
        self.client
            .send(Method::DELETE, &path, None)
            .await
            .map_err(|err| {
                map_backend_error(err, DevStoreError::ImageNotFound { item_id, image_id })
            })
    }
}

#[async_trait]
impl FeedbackGateway for HttpDevTracker {
    async fn intake_status(&self) -> DevStoreResult<FeedbackIntakeStatus> {
        self.client
            .get_json("/feedback/status", &[])
            .await
            .map_err(DevStoreError::unavailable)
    }

    async fn toggle_intake(&self) -> DevStoreResult<FeedbackIntakeStatus> {
        self.client
            .send_json(Method::POST, "/feedback/toggle", &serde_json::json!({}))
            .await
            .map_err(DevStoreError::unavailable)
    }

    async fn list_pending(&self) -> DevStoreResult<Vec<ProdFeedback>> {
        let feedback: Vec<ProdFeedback> = self
            .client
            .get_json("/feedback", &[])
            .await
            .map_err(DevStoreError::unavailable)?;
        Ok(feedback
            .into_iter()
            .filter(ProdFeedback::is_pending)
            .collect())
    }

    async fn review(
        &self,
        feedback_id: FeedbackId,
        review: &FeedbackReview,
    ) -> DevStoreResult<Option<DevItem>> {
        let path = format!("/feedback/{feedback_id}/review");
        let response: ReviewResponse = self
            .client
            .send_json(Method::POST, &path, review)
            .await
            .map_err(|err| map_backend_error(err, DevStoreError::FeedbackNotFound(feedback_id)))?;
        response.dev_item.map(DevItem::try_from).transpose()
    }

    async fn pull(&self) -> DevStoreResult<usize> {
        let response: PullResponse = self
            .client
            .send_json(Method::POST, "/feedback/pull", &serde_json::json!({}))
            .await
            .map_err(DevStoreError::unavailable)?;
        Ok(response.imported)
    }

    async fn delete(&self, feedback_id: FeedbackId) -> DevStoreResult<()> {
        self.client
            .send(Method::DELETE, &format!("/feedback/{feedback_id}"), None)
            .await
            .map_err(|err| map_backend_error(err, DevStoreError::FeedbackNotFound(feedback_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::{DevItemDto, upload_form};
    use crate::dev_tracker::domain::{DevItem, DevStatus};
    use crate::dev_tracker::ports::ImageUpload;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn payload(status: &str, history: Value) -> Value {
        json!({
            "id": "4f0c2a1e-9b7d-4c3e-8a2f-6d5e4c3b2a10",
            "title": "Fix login",
            "priority": "high",
            "status": status,
            "fail_note_history": history,
            "created_at": "2026-03-02T09:30:00Z"
        })
    }

    #[rstest]
    fn done_is_read_as_verified() {
        let dto: DevItemDto =
            serde_json::from_value(payload("done", json!([]))).expect("valid payload");
        assert_eq!(dto.status, DevStatus::Verified);
    }

    #[rstest]
    #[case(json!(null), 0)]
    #[case(json!(""), 0)]
    #[case(json!([{"attempt": 1, "note": "500 error", "date": "2026-03-02T10:00:00Z"}]), 1)]
    #[case(
        json!(r#"[{"attempt": 1, "note": "a", "date": "2026-03-02T10:00:00Z"},
                  {"attempt": 2, "note": "b", "date": "2026-03-03T10:00:00Z"}]"#),
        2
    )]
    fn history_accepts_lists_and_encoded_strings(#[case] history: Value, #[case] expected: usize) {
        let dto: DevItemDto =
            serde_json::from_value(payload("testing", history)).expect("valid payload");
        let item = DevItem::try_from(dto).expect("decodable");

        assert_eq!(item.fail_count(), expected);
    }

    #[rstest]
    fn history_is_written_as_a_list() {
        let dto: DevItemDto = serde_json::from_value(payload(
            "pending",
            json!("[{\"attempt\": 1, \"note\": \"x\", \"date\": \"2026-03-02T10:00:00Z\"}]"),
        ))
        .expect("valid payload");
        let item = DevItem::try_from(dto).expect("decodable");

        let written = serde_json::to_value(DevItemDto::from(&item)).expect("serialises");

        assert!(written.get("fail_note_history").is_some_and(Value::is_array));
        assert_eq!(
            written.pointer("/fail_note_history/0/note"),
            Some(&json!("x"))
        );
    }

    #[rstest]
    fn malformed_encoded_history_is_an_error() {
        let result = serde_json::from_value::<DevItemDto>(payload("pending", json!("[{oops")));
        assert!(result.is_err());
    }

    #[rstest]
    fn upload_form_rejects_bad_content_type() {
        let bad = ImageUpload::new("shot.png", "not a mime", vec![1_u8, 2, 3]);
        let good = ImageUpload::new("shot.png", "image/png", vec![1_u8, 2, 3]);

        assert!(upload_form(&bad).is_err());
        assert!(upload_form(&good).is_ok());
    }
}
