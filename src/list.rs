use crate::api::RecordApi;
use crate::errors::FlowError;
use crate::form::Status;
use crate::models::{Record, RecordId};
use tracing::{info, warn};

/// Outcome of a delete, carried across the redirect back to the list as
/// `?notice=<code>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListNotice {
    Deleted,
    DeleteFailed,
}

impl ListNotice {
    pub fn code(self) -> &'static str {
        match self {
            ListNotice::Deleted => "deleted",
            ListNotice::DeleteFailed => "delete-failed",
        }
    }

    /// Unknown codes are ignored rather than echoed.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "deleted" => Some(ListNotice::Deleted),
            "delete-failed" => Some(ListNotice::DeleteFailed),
            _ => None,
        }
    }

    pub fn status(self) -> Status {
        match self {
            ListNotice::Deleted => Status::info("Record deleted"),
            ListNotice::DeleteFailed => Status::error("Failed to delete record"),
        }
    }
}

/// State of the records list view.
#[derive(Debug, Clone, Default)]
pub struct RecordList {
    pub records: Vec<Record>,
    pub status: Status,
    deleting: Option<RecordId>,
}

impl RecordList {
    pub async fn load<A: RecordApi>(api: &A) -> Self {
        let mut list = Self::default();
        match api.list_records().await {
            Ok(records) => list.records = records,
            Err(err) => {
                warn!("failed to fetch records: {err}");
                list.status = Status::error("Failed to load records");
            }
        }
        list
    }

    /// Shows the outcome of an earlier delete, unless loading just failed.
    pub fn show(&mut self, notice: ListNotice) {
        if !self.status.error {
            self.status = notice.status();
        }
    }

    pub fn begin_delete(&mut self, id: &RecordId) -> Result<(), FlowError> {
        if self.deleting.is_some() {
            return Err(FlowError::Busy);
        }
        self.deleting = Some(id.clone());
        Ok(())
    }

    /// Drops the record locally once the server confirms; leaves the list
    /// alone otherwise.
    pub fn finish_delete(&mut self, result: Result<(), FlowError>) -> Result<(), FlowError> {
        let Some(id) = self.deleting.take() else {
            return Err(FlowError::NotReady);
        };
        match result {
            Ok(()) => {
                info!(%id, "record deleted");
                self.records.retain(|record| record.id != id);
                self.status = ListNotice::Deleted.status();
                Ok(())
            }
            Err(err) => {
                warn!(%id, "failed to delete record: {err}");
                self.status = ListNotice::DeleteFailed.status();
                Err(err)
            }
        }
    }

    pub async fn delete<A: RecordApi>(&mut self, api: &A, id: &RecordId) -> Result<(), FlowError> {
        self.begin_delete(id)?;
        let result = api.delete_record(id).await.map_err(FlowError::from);
        self.finish_delete(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record, FakeApi, Failure};

    fn api() -> FakeApi {
        FakeApi::default().with_records(vec![
            record("1", "Alex", 4, "swept"),
            record("2", "Sam", 2, "dishes"),
            record("3", "Alex", 5, "laundry"),
        ])
    }

    fn ids(list: &RecordList) -> Vec<&str> {
        list.records.iter().map(|record| record.id.as_str()).collect()
    }

    #[tokio::test]
    async fn load_fetches_collection_once() {
        let api = api();
        let list = RecordList::load(&api).await;

        assert_eq!(ids(&list), ["1", "2", "3"]);
        assert!(list.status.is_empty());
        assert_eq!(api.calls().list_fetches, 1);
    }

    #[tokio::test]
    async fn load_failure_sets_error() {
        let api = FakeApi::default().failing_list(Failure::Server(500, String::new()));
        let list = RecordList::load(&api).await;

        assert!(list.records.is_empty());
        assert_eq!(list.status, Status::error("Failed to load records"));
    }

    #[tokio::test]
    async fn delete_removes_exactly_that_record() {
        let api = api();
        let mut list = RecordList::load(&api).await;

        list.delete(&api, &RecordId::new("2")).await.unwrap();

        assert_eq!(ids(&list), ["1", "3"]);
        assert_eq!(api.calls().deletes, vec![RecordId::new("2")]);
        assert_eq!(list.status, ListNotice::Deleted.status());
        assert!(list.begin_delete(&RecordId::new("1")).is_ok());
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_unchanged() {
        let api = api().failing_deletes(Failure::NotFound);
        let mut list = RecordList::load(&api).await;

        assert!(list.delete(&api, &RecordId::new("2")).await.is_err());

        assert_eq!(ids(&list), ["1", "2", "3"]);
        assert_eq!(list.status, Status::error("Failed to delete record"));
        assert!(list.begin_delete(&RecordId::new("1")).is_ok());
    }

    #[tokio::test]
    async fn delete_in_flight_blocks_another() {
        let api = api();
        let mut list = RecordList::load(&api).await;

        list.begin_delete(&RecordId::new("1")).unwrap();
        assert!(matches!(
            list.delete(&api, &RecordId::new("3")).await,
            Err(FlowError::Busy)
        ));
        assert!(api.calls().deletes.is_empty());
    }

    #[test]
    fn notice_codes_survive_the_query_string() {
        for notice in [ListNotice::Deleted, ListNotice::DeleteFailed] {
            assert_eq!(ListNotice::from_code(notice.code()), Some(notice));
        }
        assert_eq!(ListNotice::from_code("<script>"), None);
    }

    #[tokio::test]
    async fn notice_does_not_hide_load_failure() {
        let api = FakeApi::default().failing_list(Failure::Server(500, String::new()));
        let mut list = RecordList::load(&api).await;

        list.show(ListNotice::Deleted);
        assert_eq!(list.status, Status::error("Failed to load records"));

        let mut list = RecordList::load(&FakeApi::default()).await;
        list.show(ListNotice::DeleteFailed);
        assert_eq!(list.status, Status::error("Failed to delete record"));
    }
}
