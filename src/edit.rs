use crate::api::RecordApi;
use crate::draft::{RecordDraft, RecordPayload};
use crate::errors::{ApiError, FlowError};
use crate::form::{Navigation, Status};
use crate::models::{Record, RecordId};
use std::time::Duration;
use tracing::{info, warn};

pub const SUBMIT_LABEL: &str = "Update";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Loading,
    /// Load failed; the form is never shown.
    Failed,
    Ready,
    Submitting,
    Succeeded,
    Cancelled,
}

/// State of the edit view for one record.
#[derive(Debug, Clone)]
pub struct EditRecord {
    pub id: RecordId,
    pub draft: RecordDraft,
    pub status: Status,
    phase: EditPhase,
    navigate_delay: Duration,
}

impl EditRecord {
    pub fn new(id: RecordId, navigate_delay: Duration) -> Self {
        Self {
            id,
            draft: RecordDraft::default(),
            status: Status::default(),
            phase: EditPhase::Loading,
            navigate_delay,
        }
    }

    /// Resumes a view whose draft came back from the browser.
    pub fn hydrated(id: RecordId, draft: RecordDraft, navigate_delay: Duration) -> Self {
        Self {
            phase: EditPhase::Ready,
            draft,
            ..Self::new(id, navigate_delay)
        }
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    pub fn apply_loaded(&mut self, result: Result<Record, ApiError>) {
        match result {
            Ok(record) => {
                self.draft = RecordDraft::from_record(&record);
                self.phase = EditPhase::Ready;
            }
            Err(err) => {
                warn!(id = %self.id, "failed to load record: {err}");
                self.phase = EditPhase::Failed;
                self.status = Status::error(match err {
                    ApiError::NotFound | ApiError::InvalidId(_) => "Record not found",
                    _ => "Failed to load record",
                });
            }
        }
    }

    pub async fn load<A: RecordApi>(&mut self, api: &A) {
        let result = api.get_record(&self.id).await;
        self.apply_loaded(result);
    }

    pub fn begin_submit(&mut self) -> Result<RecordPayload, FlowError> {
        match self.phase {
            EditPhase::Ready => {}
            EditPhase::Submitting => return Err(FlowError::Busy),
            _ => return Err(FlowError::NotReady),
        }
        if let Err(reason) = self.draft.validate() {
            self.status = Status::error(reason.clone());
            return Err(FlowError::Invalid(reason));
        }

        self.phase = EditPhase::Submitting;
        self.status = Status::info("Updating...");
        Ok(self.draft.to_payload())
    }

    pub fn finish_submit(&mut self, result: Result<Record, FlowError>) -> Result<Navigation, FlowError> {
        match result {
            Ok(record) => {
                info!(id = %record.id, "record updated");
                self.phase = EditPhase::Succeeded;
                self.status = Status::info("Record updated successfully!");
                Ok(Navigation::to_list(self.navigate_delay))
            }
            Err(err) => {
                warn!(id = %self.id, "failed to update record: {err}");
                self.phase = EditPhase::Ready;
                self.status = Status::error(match &err {
                    FlowError::Api(api) => api.user_message("Error updating record"),
                    other => other.to_string(),
                });
                Err(err)
            }
        }
    }

    pub async fn submit<A: RecordApi>(&mut self, api: &A) -> Result<Navigation, FlowError> {
        let payload = self.begin_submit()?;
        let result = api
            .update_record(&self.id, payload)
            .await
            .map_err(FlowError::from);
        self.finish_submit(result)
    }

    /// Leaves for the list without saving.
    pub fn cancel(&mut self) -> Navigation {
        self.draft = RecordDraft::default();
        self.phase = EditPhase::Cancelled;
        Navigation::to_list(Duration::ZERO)
    }
}
