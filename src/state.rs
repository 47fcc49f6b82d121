// Upload/result state machine.
//
// `UploadClient` owns every piece of UI state: the selected image, the story
// and narration of the last successful request, the error message and the
// request phase. The UI layer only reads it and calls the three user
// operations (`select_image`, `submit`, `reset`).

use tracing::{debug, info, warn};

use crate::api::{StoryResponse, StoryService};
use crate::error::{RequestError, ValidationError};
use crate::image::{RawFile, SelectedImage};

/// Whether a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    #[default]
    Idle,
    Uploading,
}

/// The state the UI renders, derived from the fields of `UploadClient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// No file selected.
    Idle,
    /// File selected, no result yet.
    Ready,
    Uploading,
    /// Story and narration present.
    Result,
    /// An error message is shown.
    Error,
}

/// Handle for one upload started with `begin_submit`.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    generation: u64,
    image: SelectedImage,
}

impl UploadTicket {
    pub fn image(&self) -> &SelectedImage {
        &self.image
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct UploadClient<S> {
    service: S,
    selected: Option<SelectedImage>,
    story: Option<String>,
    narration_url: Option<String>,
    error: Option<String>,
    // Bumped by every user action; results from an older generation are stale.
    generation: u64,
    // Generation of the request that put us in `Uploading`.
    in_flight: Option<u64>,
}

impl<S: StoryService> UploadClient<S> {
    pub fn new(service: S) -> Self {
        UploadClient {
            service,
            selected: None,
            story: None,
            narration_url: None,
            error: None,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn selected_image(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn story(&self) -> Option<&str> {
        self.story.as_deref()
    }

    pub fn narration_url(&self) -> Option<&str> {
        self.narration_url.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> RequestPhase {
        if self.in_flight.is_some() {
            RequestPhase::Uploading
        } else {
            RequestPhase::Idle
        }
    }

    pub fn state(&self) -> ClientState {
        if self.phase() == RequestPhase::Uploading {
            ClientState::Uploading
        } else if self.error.is_some() {
            ClientState::Error
        } else if self.story.is_some() && self.narration_url.is_some() {
            ClientState::Result
        } else if self.selected.is_some() {
            ClientState::Ready
        } else {
            ClientState::Idle
        }
    }

    /// Generate is offered only with an image and no request running.
    pub fn can_submit(&self) -> bool {
        self.phase() == RequestPhase::Idle && self.selected.is_some()
    }

    /// Reset is offered when there is something to clear and no request
    /// running.
    pub fn can_reset(&self) -> bool {
        self.phase() == RequestPhase::Idle
            && (self.selected.is_some() || self.story.is_some() || self.narration_url.is_some())
    }

    /// Take the file chosen by the user. `None` means the picker returned
    /// nothing usable.
    pub fn select_image(&mut self, raw: Option<RawFile>) {
        self.generation += 1;
        self.story = None;
        self.narration_url = None;

        let result = raw
            .ok_or(ValidationError::MissingFile)
            .and_then(SelectedImage::try_from);
        match result {
            Ok(image) => {
                info!(
                    file_name = image.file_name(),
                    media_type = image.media_type(),
                    bytes = image.len(),
                    "Image selected"
                );
                self.selected = Some(image);
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, "Image rejected");
                self.selected = None;
                self.error = Some(err.user_message().to_string());
            }
        }
    }

    /// Upload the selected image and store the result. Blocks until the
    /// service answers.
    pub fn submit(&mut self) {
        let Some(ticket) = self.begin_submit() else {
            return;
        };
        let outcome = self.service.upload_photo(&ticket.image);
        self.finish_submit(ticket, outcome);
    }

    /// First half of `submit`: check the precondition and enter `Uploading`.
    /// Returns `None` when no image is selected.
    pub fn begin_submit(&mut self) -> Option<UploadTicket> {
        let Some(image) = self.selected.clone() else {
            let err = ValidationError::NoImageSelected;
            warn!(error = %err, "Submit ignored");
            self.error = Some(err.user_message().to_string());
            return None;
        };

        self.generation += 1;
        self.error = None;
        self.in_flight = Some(self.generation);
        debug!(generation = self.generation, "Upload started");
        Some(UploadTicket {
            generation: self.generation,
            image,
        })
    }

    /// Second half of `submit`: apply the service outcome unless a newer
    /// user action made the ticket stale.
    pub fn finish_submit(
        &mut self,
        ticket: UploadTicket,
        outcome: Result<StoryResponse, RequestError>,
    ) {
        if self.in_flight == Some(ticket.generation) {
            self.in_flight = None;
        }

        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping stale upload result"
            );
            return;
        }

        match outcome {
            Ok(reply) => {
                let url = self.service.narration_url(&reply.audio_url);
                info!(narration_url = %url, "Story ready");
                self.story = Some(reply.story);
                self.narration_url = Some(url);
            }
            Err(err) => {
                warn!(error = %err, "Upload failed");
                self.error = Some(err.user_message().to_string());
            }
        }
    }

    /// Clear everything the user sees. A request already in flight keeps
    /// running but its result will be dropped.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.story = None;
        self.narration_url = None;
        self.error = None;
        debug!("Client reset");
    }
}
