// Library root
// ------------
// StoryLens sends one image to the story service and shows the story and
// narration it returns. The binary (`main.rs`) wires these modules into an
// interactive terminal front end.
//
// Module responsibilities:
// - `state`: the upload/result state machine (`UploadClient`).
// - `api`: the `StoryService` seam and its HTTP implementation.
// - `image`: picked files, validation and media types.
// - `narration`: saving the narration audio to disk.
// - `config`: settings from the environment.
// - `error`: error types and the fixed user messages.
// - `ui`: menus, rendering and the upload spinner.
pub mod api;
pub mod config;
pub mod error;
pub mod image;
pub mod narration;
pub mod state;
pub mod ui;

pub use api::{ApiClient, StoryResponse, StoryService};
pub use config::Settings;
pub use error::{RequestError, ValidationError};
pub use image::{RawFile, SelectedImage};
pub use state::{ClientState, RequestPhase, UploadClient, UploadTicket};
