use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

/// Room for the text fields and multipart framing around the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;
    Router::new()
        .route("/", get(handlers::index))
        .route("/records", get(handlers::records_redirect))
        .route("/add", get(handlers::add_page).post(handlers::add_submit))
        .route("/edit/:id", get(handlers::edit_page).post(handlers::edit_submit))
        .route("/edit/:id/cancel", get(handlers::edit_cancel))
        .route("/delete/:id", post(handlers::delete))
        .route("/healthz", get(handlers::healthz))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
