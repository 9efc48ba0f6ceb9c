use crate::api::RecordApi;
use crate::draft::{RecordDraft, RecordPayload};
use crate::errors::FlowError;
use crate::form::{Navigation, Status};
use crate::models::Record;
use std::time::Duration;
use tracing::{info, warn};

pub const SUBMIT_LABEL: &str = "Add Record";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddPhase {
    Idle,
    Submitting,
    Succeeded,
}

/// State of the add view: an empty draft that becomes one creation request.
#[derive(Debug, Clone)]
pub struct AddRecord {
    pub draft: RecordDraft,
    pub status: Status,
    phase: AddPhase,
    navigate_delay: Duration,
}

impl AddRecord {
    pub fn new(navigate_delay: Duration) -> Self {
        Self::with_draft(RecordDraft::empty(), navigate_delay)
    }

    pub fn with_draft(draft: RecordDraft, navigate_delay: Duration) -> Self {
        Self {
            draft,
            status: Status::default(),
            phase: AddPhase::Idle,
            navigate_delay,
        }
    }

    pub fn phase(&self) -> AddPhase {
        self.phase
    }

    /// Moves to `Submitting` and returns the payload to send. Fails without
    /// side effects while another submission is in flight.
    pub fn begin_submit(&mut self) -> Result<RecordPayload, FlowError> {
        if self.phase != AddPhase::Idle {
            return Err(FlowError::Busy);
        }
        if let Err(reason) = self.draft.validate() {
            self.status = Status::error(reason.clone());
            return Err(FlowError::Invalid(reason));
        }

        self.phase = AddPhase::Submitting;
        self.status = Status::info("Submitting...");
        Ok(self.draft.to_payload())
    }

    pub fn finish_submit(&mut self, result: Result<Record, FlowError>) -> Result<Navigation, FlowError> {
        match result {
            Ok(record) => {
                info!(id = %record.id, "record added");
                self.phase = AddPhase::Succeeded;
                self.status = Status::info("Record added successfully!");
                self.draft = RecordDraft::default();
                Ok(Navigation::to_list(self.navigate_delay))
            }
            Err(err) => {
                warn!("failed to add record: {err}");
                self.phase = AddPhase::Idle;
                self.status = Status::error(match &err {
                    FlowError::Api(api) => api.user_message("Error adding record"),
                    other => other.to_string(),
                });
                Err(err)
            }
        }
    }

    pub async fn submit<A: RecordApi>(&mut self, api: &A) -> Result<Navigation, FlowError> {
        let payload = self.begin_submit()?;
        let result = api.create_record(payload).await.map_err(FlowError::from);
        self.finish_submit(result)
    }
}
