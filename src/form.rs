use crate::api::RecordApi;
use crate::draft::RecordDraft;
use crate::models::{Contributor, RecordId};
use std::fmt::Write;
use std::time::Duration;
use tracing::warn;

pub const LIST_PATH: &str = "/";

/// Local route for one record, e.g. `/edit/7`, with the id percent-encoded
/// so it stays a single path segment.
pub fn record_path(action: &str, id: &RecordId) -> String {
    let mut path = format!("/{action}/");
    for byte in id.as_str().bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                path.push(char::from(byte))
            }
            _ => {
                let _ = write!(path, "%{byte:02X}");
            }
        }
    }
    path
}

/// Message banner shown above a view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub message: String,
    pub error: bool,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }
}

/// Where a view should go next once it is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub to: &'static str,
    pub after: Duration,
}

impl Navigation {
    pub fn to_list(after: Duration) -> Self {
        Self {
            to: LIST_PATH,
            after,
        }
    }
}

/// Form state shared by the add and edit views.
#[derive(Debug, Clone, Default)]
pub struct RecordForm {
    pub contributors: Vec<Contributor>,
    pub submit_label: &'static str,
    /// Displayable URL of the image the record already has.
    pub current_image: Option<String>,
}

impl RecordForm {
    /// Loads the contributor list for the select. A failed fetch leaves the
    /// list empty; the form stays usable with a typed-in name.
    pub async fn mount<A: RecordApi>(api: &A, submit_label: &'static str) -> Self {
        let contributors = match api.list_contributors().await {
            Ok(contributors) => contributors,
            Err(err) => {
                warn!("failed to fetch contributors: {err}");
                Vec::new()
            }
        };

        Self {
            contributors,
            submit_label,
            current_image: None,
        }
    }

    /// Whether the draft's contributor is one the select can show.
    pub fn knows(&self, draft: &RecordDraft) -> bool {
        let name = draft.contributor.name();
        self.contributors.iter().any(|contributor| contributor.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    #[tokio::test]
    async fn mount_loads_contributors_once() {
        let api = FakeApi::default().with_contributors(&["Alex", "Sam"]);
        let form = RecordForm::mount(&api, "Add Record").await;

        assert_eq!(form.contributors.len(), 2);
        assert_eq!(api.calls().contributor_fetches, 1);
    }

    #[tokio::test]
    async fn mount_swallows_contributor_failure() {
        let api = FakeApi::default().failing_contributors();
        let form = RecordForm::mount(&api, "Update").await;

        assert!(form.contributors.is_empty());
        assert_eq!(form.submit_label, "Update");
    }

    #[test]
    fn record_path_escapes_the_id() {
        assert_eq!(record_path("edit", &RecordId::new("7")), "/edit/7");
        assert_eq!(
            record_path("delete", &RecordId::new("7?points=1#x")),
            "/delete/7%3Fpoints%3D1%23x"
        );
        assert_eq!(record_path("edit", &RecordId::new("a/b c")), "/edit/a%2Fb%20c");
    }

    #[tokio::test]
    async fn knows_matches_by_name() {
        let api = FakeApi::default().with_contributors(&["Alex"]);
        let form = RecordForm::mount(&api, "Add Record").await;
        let mut draft = RecordDraft::default();

        draft.select_contributor("Alex");
        assert!(form.knows(&draft));
        draft.enter_new_contributor("Robin");
        assert!(!form.knows(&draft));
    }
}
