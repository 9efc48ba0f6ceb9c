use crate::add::{self, AddRecord};
use crate::api::image_url;
use crate::draft::{LocalFile, RecordDraft};
use crate::edit::{self, EditPhase, EditRecord};
use crate::errors::AppError;
use crate::form::{record_path, RecordForm, LIST_PATH};
use crate::list::{ListNotice, RecordList};
use crate::models::RecordId;
use crate::state::AppState;
use crate::ui::{render_done, render_failed, render_form_page, render_list};
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    notice: Option<String>,
}

pub async fn index(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Html<String> {
    let mut list = RecordList::load(state.api.as_ref()).await;
    if let Some(notice) = query.notice.as_deref().and_then(ListNotice::from_code) {
        list.show(notice);
    }
    Html(render_list(&list, &state.config.minio_endpoint))
}

pub async fn records_redirect() -> Redirect {
    Redirect::to("/")
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn add_page(State(state): State<AppState>) -> Html<String> {
    let flow = AddRecord::new(state.config.navigate_delay);
    let form = RecordForm::mount(state.api.as_ref(), add::SUBMIT_LABEL).await;
    Html(render_form_page(
        "Add New Record",
        "/add",
        &form,
        &flow.draft,
        &flow.status,
        None,
    ))
}

pub async fn add_submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let submitted = read_form(multipart, state.config.max_upload_bytes).await?;
    let mut flow = AddRecord::with_draft(submitted.into_draft(), state.config.navigate_delay);

    match flow.submit(state.api.as_ref()).await {
        Ok(navigation) => Ok(Html(render_done("Add New Record", &flow.status, navigation))),
        Err(_) => {
            let form = RecordForm::mount(state.api.as_ref(), add::SUBMIT_LABEL).await;
            Ok(Html(render_form_page(
                "Add New Record",
                "/add",
                &form,
                &flow.draft,
                &flow.status,
                None,
            )))
        }
    }
}

pub async fn edit_page(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let mut flow = EditRecord::new(RecordId::new(id), state.config.navigate_delay);
    flow.load(state.api.as_ref()).await;
    if flow.phase() == EditPhase::Failed {
        return Html(render_failed("Edit Record", &flow.status));
    }
    Html(render_edit_form(&state, &flow).await)
}

pub async fn edit_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let submitted = read_form(multipart, state.config.max_upload_bytes).await?;
    let mut flow = EditRecord::hydrated(
        RecordId::new(id),
        submitted.into_draft(),
        state.config.navigate_delay,
    );

    match flow.submit(state.api.as_ref()).await {
        Ok(navigation) => Ok(Html(render_done("Edit Record", &flow.status, navigation))),
        Err(_) => Ok(Html(render_edit_form(&state, &flow).await)),
    }
}

pub async fn edit_cancel(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let mut flow = EditRecord::new(RecordId::new(id), state.config.navigate_delay);
    let navigation = flow.cancel();
    debug!(id = %flow.id, "edit cancelled");
    Redirect::to(navigation.to)
}

/// Deletes, then redirects back to the list so a reload never repeats the
/// POST. The outcome travels in the `notice` query parameter.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let id = RecordId::new(id);
    let mut list = RecordList::load(state.api.as_ref()).await;
    if list.status.error {
        return Redirect::to(LIST_PATH);
    }
    let notice = match list.delete(state.api.as_ref(), &id).await {
        Ok(()) => ListNotice::Deleted,
        Err(_) => ListNotice::DeleteFailed,
    };
    Redirect::to(&format!("{LIST_PATH}?notice={}", notice.code()))
}

async fn render_edit_form(state: &AppState, flow: &EditRecord) -> String {
    let mut form = RecordForm::mount(state.api.as_ref(), edit::SUBMIT_LABEL).await;
    form.current_image = flow
        .draft
        .image
        .stored_path()
        .map(|path| image_url(&state.config.minio_endpoint, path));
    let action = record_path("edit", &flow.id);
    let cancel = format!("{action}/cancel");
    render_form_page(
        "Edit Record",
        &action,
        &form,
        &flow.draft,
        &flow.status,
        Some(&cancel),
    )
}

/// Text fields and the optional image of a submitted record form.
struct SubmittedForm {
    fields: Vec<(String, String)>,
    file: Option<LocalFile>,
}

impl SubmittedForm {
    fn into_draft(self) -> RecordDraft {
        let mut draft = RecordDraft::default();
        draft.apply_fields(
            self.fields
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        if let Some(file) = self.file {
            draft.attach_file(file);
        }
        draft
    }
}

async fn read_form(mut multipart: Multipart, limit: usize) -> Result<SubmittedForm, AppError> {
    let mut fields = Vec::new();
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name != "image" {
            fields.push((name, field.text().await?));
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await?;
        if bytes.len() > limit {
            return Err(AppError::payload_too_large(limit));
        }
        // Browsers send an empty part when no file was picked.
        if file_name.is_empty() || bytes.is_empty() {
            continue;
        }

        info!(%file_name, %content_type, len = bytes.len(), "received image upload");
        file = Some(LocalFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Ok(SubmittedForm { fields, file })
}
