//! Workflow persistence service and the editor's submitter.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use hospnet_model::{EXPORT_FORMAT_VERSION, SubmissionId, WorkflowExport, WorkflowId, WorkflowRecord};
use hospnet_wizard::{SubmissionError, Submitter};
use tokio::sync::RwLock;

use crate::error::ServiceError;

/// Stores custom workflows and moves them in and out as export documents.
#[async_trait]
pub trait WorkflowService: Send + Sync {
    async fn create_custom_workflow(&self, record: &WorkflowRecord) -> Result<WorkflowRecord, ServiceError>;

    async fn update_custom_workflow(&self, record: &WorkflowRecord) -> Result<WorkflowRecord, ServiceError>;

    async fn get_workflow(&self, id: &WorkflowId) -> Result<WorkflowRecord, ServiceError>;

    /// Serialize a stored workflow as an export document.
    async fn export_workflow(&self, id: &WorkflowId) -> Result<String, ServiceError>;

    /// Store the workflow of an export document under a new id.
    ///
    /// Documents whose collections do not hold together (unknown
    /// departments, zero times, blank conditions, repeated keys) are refused.
    async fn import_workflow(&self, document: &str) -> Result<WorkflowRecord, ServiceError>;
}

/// Process-local [`WorkflowService`].
#[derive(Debug, Default)]
pub struct InMemoryWorkflowService {
    records: RwLock<BTreeMap<WorkflowId, WorkflowRecord>>,
}

impl InMemoryWorkflowService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Parse an export document, checking its format version.
pub(crate) fn parse_export(document: &str) -> Result<WorkflowExport, ServiceError> {
    let export: WorkflowExport =
        serde_json::from_str(document).map_err(|e| ServiceError::InvalidDocument(e.to_string()))?;
    if export.format_version != EXPORT_FORMAT_VERSION {
        return Err(ServiceError::UnsupportedVersion {
            found: export.format_version,
            expected: EXPORT_FORMAT_VERSION,
        });
    }
    Ok(export)
}

#[async_trait]
impl WorkflowService for InMemoryWorkflowService {
    async fn create_custom_workflow(&self, record: &WorkflowRecord) -> Result<WorkflowRecord, ServiceError> {
        record.check_integrity().map_err(ServiceError::InvalidRecord)?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(ServiceError::Status {
                status: 409,
                body: format!("workflow {} already exists", record.id),
            });
        }
        let now = Utc::now();
        let stored = WorkflowRecord {
            created_at: now,
            updated_at: now,
            ..record.clone()
        };
        records.insert(stored.id, stored.clone());
        tracing::info!(id = %stored.id, name = %stored.name, "workflow created");
        Ok(stored)
    }

    async fn update_custom_workflow(&self, record: &WorkflowRecord) -> Result<WorkflowRecord, ServiceError> {
        record.check_integrity().map_err(ServiceError::InvalidRecord)?;
        let mut records = self.records.write().await;
        let Some(existing) = records.get_mut(&record.id) else {
            return Err(ServiceError::NotFound(record.id.to_string()));
        };
        *existing = WorkflowRecord {
            created_at: existing.created_at,
            updated_at: Utc::now(),
            ..record.clone()
        };
        tracing::info!(id = %record.id, "workflow updated");
        Ok(existing.clone())
    }

    async fn get_workflow(&self, id: &WorkflowId) -> Result<WorkflowRecord, ServiceError> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    async fn export_workflow(&self, id: &WorkflowId) -> Result<String, ServiceError> {
        let record = self.get_workflow(id).await?;
        Ok(serde_json::to_string_pretty(&WorkflowExport::new(record))?)
    }

    async fn import_workflow(&self, document: &str) -> Result<WorkflowRecord, ServiceError> {
        let export = parse_export(document)?;
        let record = WorkflowRecord {
            id: WorkflowId::new(),
            ..export.workflow
        };
        tracing::debug!(source_exported_at = %export.exported_at, "importing workflow");
        self.create_custom_workflow(&record).await
    }
}

/// Adapts a [`WorkflowService`] to the wizard's [`Submitter`] seam: known
/// records are updated, new ones created.
#[derive(Clone)]
pub struct WorkflowSubmitter {
    service: Arc<dyn WorkflowService>,
}

impl WorkflowSubmitter {
    pub fn new(service: Arc<dyn WorkflowService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Submitter<WorkflowRecord> for WorkflowSubmitter {
    async fn submit(&self, payload: &WorkflowRecord) -> Result<SubmissionId, SubmissionError> {
        let stored = match self.service.get_workflow(&payload.id).await {
            Ok(_) => self.service.update_custom_workflow(payload).await,
            Err(ServiceError::NotFound(_)) => self.service.create_custom_workflow(payload).await,
            Err(error) => Err(error),
        }
        .map_err(|e| SubmissionError::Rejected(e.to_string()))?;
        Ok(stored.id.into())
    }
}
