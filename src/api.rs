//! Client for the remote records API.

use crate::config::{Config, EndpointStyle};
use crate::draft::RecordPayload;
use crate::errors::{server_message, ApiError};
use crate::models::{Contributor, Listing, Record, RecordId};
use reqwest::{multipart, Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::debug;

/// Operations the views need from the records API.
pub trait RecordApi: Send + Sync {
    fn list_contributors(&self) -> impl Future<Output = Result<Vec<Contributor>, ApiError>> + Send;

    fn list_records(&self) -> impl Future<Output = Result<Vec<Record>, ApiError>> + Send;

    fn get_record(&self, id: &RecordId) -> impl Future<Output = Result<Record, ApiError>> + Send;

    fn create_record(
        &self,
        payload: RecordPayload,
    ) -> impl Future<Output = Result<Record, ApiError>> + Send;

    fn update_record(
        &self,
        id: &RecordId,
        payload: RecordPayload,
    ) -> impl Future<Output = Result<Record, ApiError>> + Send;

    fn delete_record(&self, id: &RecordId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// URL layout of the remote API, relative to its base URL. Record ids are
/// pushed as single percent-encoded path segments, never spliced as text.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    style: EndpointStyle,
}

impl Endpoints {
    pub fn new(base: &str, style: EndpointStyle) -> Result<Self, ApiError> {
        let base = Url::parse(base).map_err(|err| ApiError::InvalidBaseUrl(format!("{base}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base.to_string()));
        }
        Ok(Self { base, style })
    }

    fn collection(&self) -> &'static str {
        match self.style {
            EndpointStyle::Records => "records",
            EndpointStyle::Housework => "housework",
        }
    }

    /// `base` plus `segments`, with a trailing slash.
    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }
        url
    }

    fn segment(id: &RecordId) -> Result<&str, ApiError> {
        id.as_segment()
            .ok_or_else(|| ApiError::InvalidId(id.to_string()))
    }

    pub fn contributors(&self) -> Url {
        self.join(&["contributors"])
    }

    pub fn records(&self) -> Url {
        self.join(&[self.collection()])
    }

    pub fn create(&self) -> Url {
        match self.style {
            EndpointStyle::Records => self.join(&["records", "add"]),
            EndpointStyle::Housework => self.records(),
        }
    }

    pub fn record(&self, id: &RecordId) -> Result<Url, ApiError> {
        Ok(self.join(&[self.collection(), Self::segment(id)?]))
    }

    pub fn delete(&self, id: &RecordId) -> Result<Url, ApiError> {
        match self.style {
            EndpointStyle::Records => Ok(self.join(&["records", Self::segment(id)?, "delete"])),
            EndpointStyle::Housework => self.record(id),
        }
    }
}

/// Resolves a stored image path against the object-storage endpoint.
pub fn image_url(storage_endpoint: &str, path: &str) -> String {
    let path = path.trim();
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let path = path.strip_prefix("minio://").unwrap_or(path);
    format!(
        "{}/{}",
        storage_endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    endpoints: Endpoints,
}

impl HttpApi {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: Client::new(),
            endpoints,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::new(Endpoints::new(
            &config.backend_url,
            config.endpoint_style,
        )?))
    }

    async fn send_form(
        &self,
        request: reqwest::RequestBuilder,
        payload: RecordPayload,
    ) -> Result<Record, ApiError> {
        let form = to_multipart(payload)?;
        let response = check(request.multipart(form).send().await?).await?;
        decode(response).await
    }
}

impl RecordApi for HttpApi {
    async fn list_contributors(&self) -> Result<Vec<Contributor>, ApiError> {
        let url = self.endpoints.contributors();
        debug!(%url, "listing contributors");
        let response = check(self.client.get(url).send().await?).await?;
        Ok(decode::<Listing<Contributor>>(response).await?.into_items())
    }

    async fn list_records(&self) -> Result<Vec<Record>, ApiError> {
        let url = self.endpoints.records();
        debug!(%url, "listing records");
        let response = check(self.client.get(url).send().await?).await?;
        Ok(decode::<Listing<Record>>(response).await?.into_items())
    }

    async fn get_record(&self, id: &RecordId) -> Result<Record, ApiError> {
        let url = self.endpoints.record(id)?;
        debug!(%url, "fetching record");
        let response = check(self.client.get(url).send().await?).await?;
        decode(response).await
    }

    async fn create_record(&self, payload: RecordPayload) -> Result<Record, ApiError> {
        let url = self.endpoints.create();
        debug!(%url, has_file = payload.file.is_some(), "creating record");
        self.send_form(self.client.post(url), payload).await
    }

    async fn update_record(&self, id: &RecordId, payload: RecordPayload) -> Result<Record, ApiError> {
        let url = self.endpoints.record(id)?;
        debug!(%url, has_file = payload.file.is_some(), "updating record");
        self.send_form(self.client.put(url), payload).await
    }

    async fn delete_record(&self, id: &RecordId) -> Result<(), ApiError> {
        let url = self.endpoints.delete(id)?;
        debug!(%url, "deleting record");
        check(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}

fn to_multipart(payload: RecordPayload) -> Result<multipart::Form, ApiError> {
    let mut form = multipart::Form::new();
    for (name, value) in payload.fields {
        form = form.text(name, value);
    }
    if let Some(file) = payload.file {
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        form = form.part("image", part);
    }
    Ok(form)
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Server {
        status: status.as_u16(),
        message: server_message(&body),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
