//! Session client errors

use thiserror::Error;

/// Failures seen by a chat session
#[derive(Error, Debug)]
pub enum UiError {
    /// The relay could not be reached or its reply could not be read
    #[error("Could not reach the chat relay: {0}")]
    Transport(#[from] reqwest::Error),

    /// The relay answered with a non-success status
    #[error("Relay error ({status}): {message}")]
    Relay { status: u16, message: String },

    /// The reply could not be decoded or had no usable first choice
    #[error("The reply did not contain a message")]
    MalformedReply,

    /// A turn is already in flight
    #[error("A message is still being sent")]
    Busy,
}
