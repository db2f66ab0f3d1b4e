//! Failures of requests to the analysis service.

use thiserror::Error;

/// Everything that can end a request to the analysis service.
///
/// The `Display` output is what the user sees as the operation's error.
#[derive(Error, Debug)]
pub enum RequestError {
	/// The request never produced a response.
	#[error("{0}")]
	Transport(String),

	/// The service answered with a non-success status.
	#[error("{status} {status_text} - {body}")]
	Service {
		status: u16,
		status_text: String,
		body: String,
	},

	/// A success response whose body could not be decoded.
	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),

	/// The service base address could not be turned into an endpoint URL.
	#[error("invalid service address: {0}")]
	InvalidAddress(#[from] url::ParseError),

	/// Blank input; no request is issued for it.
	#[error("{0} is empty")]
	EmptyInput(&'static str),

	/// A newer invocation of the same operation began before this one
	/// settled, so its result was discarded.
	#[error("superseded by a newer request")]
	Superseded,
}

/// Result of a request to the analysis service.
pub type Result<T> = std::result::Result<T, RequestError>;
