// API client module: a small blocking HTTP client that talks to the story
// service. The `StoryService` trait is the seam the upload client depends
// on, so tests can swap the network for a mock.

use reqwest::blocking::{multipart, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::RequestError;
use crate::image::SelectedImage;

/// Path of the upload endpoint, relative to the service origin.
pub const UPLOAD_PATH: &str = "/upload-photo";
/// Name of the multipart part that carries the image.
pub const FILE_FIELD: &str = "file";

/// Success body of `POST /upload-photo`. Extra fields are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoryResponse {
    pub story: String,
    /// Path of the narration, relative to the service origin.
    pub audio_url: String,
}

/// Operations the upload client needs from the story service.
pub trait StoryService {
    /// Send the image as multipart form data and return the parsed reply.
    fn upload_photo(&self, image: &SelectedImage) -> Result<StoryResponse, RequestError>;

    /// Absolute URL of a narration given the path returned by the service.
    fn narration_url(&self, audio_path: &str) -> String;

    /// Fetch the narration audio behind an absolute URL.
    fn fetch_narration(&self, url: &str) -> Result<Vec<u8>, RequestError>;
}

/// Blocking client for the story service. Holds the reqwest client and the
/// service origin.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url`. The transport keeps its default
    /// timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RequestError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Use a preconfigured reqwest client, e.g. one with custom proxy or
    /// TLS settings.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        ApiClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, RequestError> {
        Self::new(settings.service_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl StoryService for ApiClient {
    fn upload_photo(&self, image: &SelectedImage) -> Result<StoryResponse, RequestError> {
        let url = format!("{}{}", self.base_url, UPLOAD_PATH);
        debug!(
            %url,
            file_name = image.file_name(),
            media_type = image.media_type(),
            bytes = image.len(),
            "Uploading photo"
        );

        let part = multipart::Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.media_type())?;
        let form = multipart::Form::new().part(FILE_FIELD, part);

        let res = self.client.post(&url).multipart(form).send()?;
        let status = res.status();
        let body = res.text()?;
        if !status.is_success() {
            warn!(status = status.as_u16(), %body, "Upload rejected by service");
            return Err(RequestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let story: StoryResponse = serde_json::from_str(&body)?;
        debug!(audio_url = %story.audio_url, story_len = story.story.len(), "Story received");
        Ok(story)
    }

    fn narration_url(&self, audio_path: &str) -> String {
        join_url(&self.base_url, audio_path)
    }

    fn fetch_narration(&self, url: &str) -> Result<Vec<u8>, RequestError> {
        debug!(%url, "Fetching narration");
        let res = self.client.get(url).send()?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            warn!(status = status.as_u16(), %body, "Narration fetch failed");
            return Err(RequestError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(res.bytes()?.to_vec())
    }
}

/// Prefix `path` with `origin`. The service returns paths starting with a
/// slash; a missing one is added.
pub fn join_url(origin: &str, path: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{origin}{path}")
    } else {
        format!("{origin}/{path}")
    }
}
