pub mod add;
pub mod api;
pub mod app;
pub mod config;
pub mod draft;
pub mod edit;
pub mod errors;
pub mod form;
pub mod handlers;
pub mod list;
pub mod models;
pub mod state;
pub mod ui;

#[cfg(test)]
mod testing;

pub use api::{HttpApi, RecordApi};
pub use app::router;
pub use config::Config;
pub use state::AppState;
