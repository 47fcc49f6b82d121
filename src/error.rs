// Error taxonomy for the upload client.
//
// Two categories exist: validation errors, raised before any network call,
// and request errors, raised by the story service. Each category shows the
// user one fixed message; the variants carry the detail for the logs.

use thiserror::Error;

/// Shown when the picked file is missing or is not an image.
pub const INVALID_IMAGE_MESSAGE: &str = "Please upload a valid image file.";
/// Shown when `submit` is called before an image was selected.
pub const NO_IMAGE_MESSAGE: &str = "Please select an image first.";
/// Shown for every failure of the upload request.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Please try again.";

/// Client-side validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no file was provided")]
    MissingFile,
    #[error("declared media type `{media_type}` is not an image")]
    NotAnImage { media_type: String },
    #[error("submit requested without a selected image")]
    NoImageSelected,
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingFile | ValidationError::NotAnImage { .. } => {
                INVALID_IMAGE_MESSAGE
            }
            ValidationError::NoImageSelected => NO_IMAGE_MESSAGE,
        }
    }
}

/// Failures talking to the story service.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode service response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    /// All request failures collapse to the same message for the user.
    pub fn user_message(&self) -> &'static str {
        UPLOAD_FAILED_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picker_failures_share_one_message() {
        assert_eq!(ValidationError::MissingFile.user_message(), INVALID_IMAGE_MESSAGE);
        let not_image = ValidationError::NotAnImage {
            media_type: "text/plain".into(),
        };
        assert_eq!(not_image.user_message(), INVALID_IMAGE_MESSAGE);
        assert_eq!(ValidationError::NoImageSelected.user_message(), NO_IMAGE_MESSAGE);
    }

    #[test]
    fn status_error_hides_details_from_user() {
        let err = RequestError::Status {
            status: 500,
            body: "Internal Server Error".into(),
        };
        assert_eq!(err.user_message(), UPLOAD_FAILED_MESSAGE);
        assert!(err.to_string().contains("500"));
    }
}
