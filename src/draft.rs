//! Unsaved record state held by the add and edit views.

use crate::models::Record;
use chrono::{DateTime, Local, NaiveDateTime};
use std::fmt;

/// `datetime-local` input format.
pub const FORM_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Point value of a record, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Points(u8);

impl Points {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Points {
    fn default() -> Self {
        Self(3)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContributorChoice {
    /// Picked from the contributor list.
    Existing(String),
    /// Typed in; the server creates it on first use.
    New(String),
}

impl ContributorChoice {
    pub fn name(&self) -> &str {
        match self {
            ContributorChoice::Existing(name) | ContributorChoice::New(name) => name,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, ContributorChoice::New(_))
    }
}

impl Default for ContributorChoice {
    fn default() -> Self {
        ContributorChoice::Existing(String::new())
    }
}

/// A file picked in the browser that has not been uploaded yet.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DraftImage {
    #[default]
    None,
    /// Path of an image already held by object storage.
    Stored(String),
    Pending(LocalFile),
}

impl DraftImage {
    pub fn stored_path(&self) -> Option<&str> {
        match self {
            DraftImage::Stored(path) => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordDraft {
    pub time: String,
    pub contributor: ContributorChoice,
    pub points: Points,
    pub note: String,
    pub image: DraftImage,
}

impl RecordDraft {
    /// Empty draft for the add view, stamped with the current local time.
    pub fn empty() -> Self {
        Self::empty_at(Local::now().naive_local())
    }

    pub fn empty_at(now: NaiveDateTime) -> Self {
        Self {
            time: now.format(FORM_TIME_FORMAT).to_string(),
            ..Self::default()
        }
    }

    /// Maps server field names onto form fields.
    pub fn from_record(record: &Record) -> Self {
        Self {
            time: record
                .record_time
                .as_deref()
                .map(to_form_time)
                .unwrap_or_default(),
            contributor: ContributorChoice::Existing(record.contributor_display().to_string()),
            points: Points::clamped(record.points),
            note: record.note.clone().unwrap_or_default(),
            image: record
                .stored_image()
                .map(|path| DraftImage::Stored(path.to_string()))
                .unwrap_or_default(),
        }
    }

    pub fn set_time(&mut self, value: &str) {
        self.time = value.trim().to_string();
    }

    pub fn select_contributor(&mut self, name: &str) {
        self.contributor = ContributorChoice::Existing(name.trim().to_string());
    }

    pub fn enter_new_contributor(&mut self, name: &str) {
        self.contributor = ContributorChoice::New(name.trim().to_string());
    }

    /// Switches between the select and the free-text input, keeping the name.
    pub fn toggle_new_contributor(&mut self, new: bool) {
        let name = self.contributor.name().to_string();
        self.contributor = if new {
            ContributorChoice::New(name)
        } else {
            ContributorChoice::Existing(name)
        };
    }

    pub fn set_points(&mut self, value: i64) {
        self.points = Points::clamped(value);
    }

    /// Text input handler. Non-numeric input leaves the previous value.
    pub fn set_points_input(&mut self, raw: &str) {
        if let Ok(value) = raw.trim().parse::<i64>() {
            self.set_points(value);
        }
    }

    pub fn set_note(&mut self, value: &str) {
        self.note = value.to_string();
    }

    /// Replaces any stored image with a local file.
    pub fn attach_file(&mut self, file: LocalFile) {
        self.image = DraftImage::Pending(file);
    }

    pub fn keep_stored_image(&mut self, path: &str) {
        let path = path.trim();
        if path.is_empty() || matches!(self.image, DraftImage::Pending(_)) {
            return;
        }
        self.image = DraftImage::Stored(path.to_string());
    }

    /// Dispatches a text form field by name. Unknown fields are ignored.
    pub fn apply_field(&mut self, name: &str, value: &str) {
        match name {
            "time" => self.set_time(value),
            "contributor_mode" => self.toggle_new_contributor(value == "new"),
            "contributor_name" if !self.contributor.is_new() => self.select_contributor(value),
            "new_contributor_name" if self.contributor.is_new() => self.enter_new_contributor(value),
            "points" => self.set_points_input(value),
            "note" => self.set_note(value),
            "current_image" => self.keep_stored_image(value),
            _ => {}
        }
    }

    /// Applies a whole submitted form. The contributor mode goes first so the
    /// matching name input wins regardless of field order.
    pub fn apply_fields<'a>(&mut self, fields: impl IntoIterator<Item = (&'a str, &'a str)>) {
        let (mode, rest): (Vec<_>, Vec<_>) = fields
            .into_iter()
            .partition(|(name, _)| *name == "contributor_mode");
        for (name, value) in mode.into_iter().chain(rest) {
            self.apply_field(name, value);
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.contributor.name().is_empty() {
            return Err("Contributor is required".to_string());
        }
        Ok(())
    }

    /// Multipart fields for a create or update request. Only a pending
    /// local file is sent; a stored image is left for the server to keep.
    pub fn to_payload(&self) -> RecordPayload {
        let mut fields = Vec::with_capacity(4);
        if !self.time.is_empty() {
            fields.push(("record_time", self.time.clone()));
        }
        if !self.contributor.name().is_empty() {
            fields.push(("contributor_name", self.contributor.name().to_string()));
        }
        fields.push(("points", self.points.to_string()));
        fields.push(("note", self.note.clone()));

        let file = match &self.image {
            DraftImage::Pending(file) => Some(file.clone()),
            _ => None,
        };

        RecordPayload { fields, file }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPayload {
    pub fields: Vec<(&'static str, String)>,
    pub file: Option<LocalFile>,
}

impl RecordPayload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Converts a server timestamp to the `datetime-local` form, keeping the
/// wall-clock time it was written in. Unrecognised input is passed through.
pub fn to_form_time(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.naive_local().format(FORM_TIME_FORMAT).to_string();
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return parsed.format(FORM_TIME_FORMAT).to_string();
        }
    }
    raw.to_string()
}
