//! Async client for the capture processing backend.
//!
//! Works natively (CLI) and on `wasm32` (browser `fetch`) through reqwest.
//! Every reply body may carry an `error` field; those are surfaced as
//! [`ApiError::Backend`] so callers only see successful payloads.

mod error;

pub use error::{ApiError, Result};

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;

use sigscope_core::annotation::Annotation;
use sigscope_core::api::{
    BackendReply, FileDataResponse, FilesResponse, GenerateResponse, MessageResponse,
    PlotResponse, RenameRequest, SaveFileRequest, UploadOptions, UploadResponse,
};
use sigscope_core::generate::GenerateParams;
use sigscope_core::library::SavedFile;
use sigscope_core::metadata::SigmfMetadata;
use sigscope_core::session::PlotKind;

/// A file picked for upload, already read into memory.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    fn into_part(self) -> Part {
        Part::bytes(self.bytes).file_name(self.name)
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned + BackendReply>(&self, path: &str) -> Result<T> {
        log::debug!("GET {path}");
        let resp = self.http.get(self.url(path)).send().await?;
        read_reply(resp).await
    }

    async fn send_json<B, T>(&self, method: reqwest::Method, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned + BackendReply,
    {
        log::debug!("{method} {path}");
        let resp = self.http.request(method, self.url(path)).json(body).send().await?;
        read_reply(resp).await
    }

    /// `POST /upload` with the capture as `cfile` and its metadata as
    /// `metaFile`, plus the analysis option fields.
    pub async fn upload(
        &self,
        capture: UploadFile,
        metadata: UploadFile,
        options: &UploadOptions,
    ) -> Result<UploadResponse> {
        log::info!("uploading {} ({} bytes)", capture.name, capture.bytes.len());
        let mut form = Form::new()
            .part("cfile", capture.into_part())
            .part("metaFile", metadata.into_part());
        for (name, value) in options.form_fields() {
            form = form.text(name, value);
        }
        let resp = self.http.post(self.url("upload")).multipart(form).send().await?;
        read_reply(resp).await
    }

    /// Base64 PNG for one plot kind.
    pub async fn plot(&self, file_id: &str, kind: PlotKind) -> Result<String> {
        let reply: PlotResponse = self.get(&format!("file/{file_id}/{}", kind.as_str())).await?;
        reply
            .image
            .ok_or_else(|| ApiError::Backend(format!("No {} image returned.", kind.as_str())))
    }

    pub async fn file_data(&self, file_id: &str) -> Result<FileDataResponse> {
        self.get(&format!("file/{file_id}/data")).await
    }

    pub async fn annotations(&self, file_id: &str) -> Result<Vec<Annotation>> {
        let reply: sigscope_core::api::AnnotationsResponse =
            self.get(&format!("file/{file_id}/annotations")).await?;
        Ok(reply.annotations.unwrap_or_default())
    }

    pub async fn airview(&self, file_id: &str) -> Result<Value> {
        self.get(&format!("file/{file_id}/airview")).await
    }

    pub async fn calculated_statistics(&self, file_id: &str) -> Result<Value> {
        self.get(&format!("file/{file_id}/calculated_statistics")).await
    }

    pub async fn metadata(&self, file_id: &str) -> Result<SigmfMetadata> {
        self.get(&format!("metadata/{file_id}")).await
    }

    /// Replaces the stored annotation list of a file.
    pub async fn save_annotations(&self, request: &SaveFileRequest) -> Result<MessageResponse> {
        self.send_json(reqwest::Method::POST, "save-file", request).await
    }

    pub async fn files(&self) -> Result<Vec<SavedFile>> {
        let reply: FilesResponse = self.get("files").await?;
        Ok(reply.files.unwrap_or_default())
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<MessageResponse> {
        log::debug!("DELETE file/{file_id}");
        let resp = self.http.delete(self.url(&format!("file/{file_id}"))).send().await?;
        read_reply(resp).await
    }

    pub async fn rename_file(&self, file_id: &str, filename: &str) -> Result<MessageResponse> {
        let body = RenameRequest { filename: filename.to_string() };
        self.send_json(reqwest::Method::PUT, &format!("{file_id}/rename_file"), &body).await
    }

    /// Drops every stored file on the backend.
    pub async fn refresh(&self) -> Result<MessageResponse> {
        log::debug!("POST refresh");
        let resp = self.http.post(self.url("refresh")).send().await?;
        read_reply(resp).await
    }

    pub async fn generate(&self, params: &GenerateParams) -> Result<GenerateResponse> {
        self.send_json(reqwest::Method::POST, "generate", params).await
    }
}

async fn read_reply<T: DeserializeOwned + BackendReply>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(status_error(status.as_u16(), status.canonical_reason(), &body));
    }
    parse_reply(&body)
}

/// Decode a 2xx body. An empty body counts as `{}`.
pub fn parse_reply<T: DeserializeOwned + BackendReply>(body: &str) -> Result<T> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    let reply: T = serde_json::from_str(body)?;
    if let Some(err) = reply.backend_error() {
        log::warn!("backend reported: {err}");
        return Err(ApiError::Backend(err.to_string()));
    }
    Ok(reply)
}

fn status_error(status: u16, reason: Option<&str>, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.backend_error().map(str::to_string))
        .or_else(|| reason.map(str::to_string))
        .unwrap_or_else(|| "request failed".to_string());
    log::warn!("HTTP {status}: {message}");
    ApiError::Status { status, message }
}
