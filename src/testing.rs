//! In-memory `RecordApi` for unit tests.

use crate::api::RecordApi;
use crate::draft::RecordPayload;
use crate::errors::ApiError;
use crate::models::{Contributor, Record, RecordId};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum Failure {
    Server(u16, String),
    NotFound,
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self {
            Failure::Server(status, message) => ApiError::Server {
                status: *status,
                message: message.clone(),
            },
            Failure::NotFound => ApiError::NotFound,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub contributor_fetches: usize,
    pub list_fetches: usize,
    pub gets: Vec<RecordId>,
    pub creates: Vec<RecordPayload>,
    pub updates: Vec<(RecordId, RecordPayload)>,
    pub deletes: Vec<RecordId>,
}

#[derive(Debug, Default)]
struct Inner {
    contributors: Vec<Contributor>,
    records: Vec<Record>,
    contributors_fail: bool,
    list_fail: Option<Failure>,
    get_fail: Option<Failure>,
    write_fail: Option<Failure>,
    delete_fail: Option<Failure>,
    next_id: u64,
    calls: Calls,
}

#[derive(Debug, Default)]
pub struct FakeApi {
    inner: Mutex<Inner>,
}

pub fn record(id: &str, contributor: &str, points: i64, note: &str) -> Record {
    Record {
        id: RecordId::new(id),
        record_time: Some("2024-01-01T10:00:00Z".to_string()),
        contributor: Some(Contributor {
            id: None,
            name: contributor.to_string(),
        }),
        contributor_name: None,
        points,
        note: Some(note.to_string()),
        image: None,
    }
}

impl FakeApi {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn with_contributors(self, names: &[&str]) -> Self {
        self.lock().contributors = names
            .iter()
            .enumerate()
            .map(|(index, name)| Contributor {
                id: Some(RecordId::new((index + 1).to_string())),
                name: name.to_string(),
            })
            .collect();
        self
    }

    pub fn with_records(self, records: Vec<Record>) -> Self {
        {
            let mut inner = self.lock();
            inner.next_id = records.len() as u64 + 100;
            inner.records = records;
        }
        self
    }

    pub fn failing_contributors(self) -> Self {
        self.lock().contributors_fail = true;
        self
    }

    pub fn failing_list(self, failure: Failure) -> Self {
        self.lock().list_fail = Some(failure);
        self
    }

    pub fn failing_get(self, failure: Failure) -> Self {
        self.lock().get_fail = Some(failure);
        self
    }

    pub fn failing_writes(self, failure: Failure) -> Self {
        self.lock().write_fail = Some(failure);
        self
    }

    pub fn failing_deletes(self, failure: Failure) -> Self {
        self.lock().delete_fail = Some(failure);
        self
    }

    pub fn heal(&self) {
        let mut inner = self.lock();
        inner.write_fail = None;
        inner.delete_fail = None;
    }

    pub fn calls(&self) -> Calls {
        self.lock().calls.clone()
    }
}

fn apply(record: &mut Record, payload: &RecordPayload) {
    if let Some(time) = payload.field("record_time") {
        record.record_time = Some(time.to_string());
    }
    if let Some(name) = payload.field("contributor_name") {
        record.contributor = Some(Contributor {
            id: None,
            name: name.to_string(),
        });
    }
    if let Some(points) = payload.field("points").and_then(|value| value.parse().ok()) {
        record.points = points;
    }
    if let Some(note) = payload.field("note") {
        record.note = Some(note.to_string());
    }
    if let Some(file) = &payload.file {
        record.image = Some(format!("minio://housework/{}", file.file_name));
    }
}

impl RecordApi for FakeApi {
    async fn list_contributors(&self) -> Result<Vec<Contributor>, ApiError> {
        let mut inner = self.lock();
        inner.calls.contributor_fetches += 1;
        if inner.contributors_fail {
            return Err(Failure::Server(500, "boom".to_string()).to_error());
        }
        Ok(inner.contributors.clone())
    }

    async fn list_records(&self) -> Result<Vec<Record>, ApiError> {
        let mut inner = self.lock();
        inner.calls.list_fetches += 1;
        if let Some(failure) = &inner.list_fail {
            return Err(failure.to_error());
        }
        Ok(inner.records.clone())
    }

    async fn get_record(&self, id: &RecordId) -> Result<Record, ApiError> {
        let mut inner = self.lock();
        inner.calls.gets.push(id.clone());
        if let Some(failure) = &inner.get_fail {
            return Err(failure.to_error());
        }
        inner
            .records
            .iter()
            .find(|record| &record.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create_record(&self, payload: RecordPayload) -> Result<Record, ApiError> {
        let mut inner = self.lock();
        inner.calls.creates.push(payload.clone());
        if let Some(failure) = &inner.write_fail {
            return Err(failure.to_error());
        }
        inner.next_id += 1;
        let mut created = record(&inner.next_id.to_string(), "", 3, "");
        apply(&mut created, &payload);
        inner.records.push(created.clone());
        Ok(created)
    }

    async fn update_record(&self, id: &RecordId, payload: RecordPayload) -> Result<Record, ApiError> {
        let mut inner = self.lock();
        inner.calls.updates.push((id.clone(), payload.clone()));
        if let Some(failure) = &inner.write_fail {
            return Err(failure.to_error());
        }
        let record = inner
            .records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or(ApiError::NotFound)?;
        apply(record, &payload);
        Ok(record.clone())
    }

    async fn delete_record(&self, id: &RecordId) -> Result<(), ApiError> {
        let mut inner = self.lock();
        inner.calls.deletes.push(id.clone());
        if let Some(failure) = &inner.delete_fail {
            return Err(failure.to_error());
        }
        inner.records.retain(|record| &record.id != id);
        Ok(())
    }
}
