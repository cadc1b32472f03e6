//! Errors raised by map commands and persistence.

use thiserror::Error;

/// How an error is surfaced to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
	/// Bad user input; the operation is aborted before touching any state.
	Validation,
	/// A stored or imported payload could not be decoded.
	Parse,
	/// The storage collaborator failed or had nothing to offer.
	Persistence,
}

/// Everything a map command can fail with.
#[derive(Debug, Error)]
pub enum MindMapError {
	/// Seed text was blank after trimming.
	#[error("Type a seed word and try again.")]
	EmptySeed,
	/// Replacement node text was blank after trimming.
	#[error("node text cannot be empty")]
	EmptyText,
	/// A snapshot lacked a required top-level array.
	#[error("invalid file: missing `{0}`")]
	MissingField(&'static str),
	/// The command named a node that is not on the map.
	#[error("no node with id `{0}`")]
	UnknownNode(String),
	/// The payload was not valid JSON for a snapshot.
	#[error("could not parse file: {0}")]
	Parse(#[from] serde_json::Error),
	/// Nothing stored under the snapshot key.
	#[error("no saved map found")]
	NotFound,
	/// The storage or file collaborator reported a failure.
	#[error("storage failed: {0}")]
	Storage(String),
}

impl MindMapError {
	/// How this error should be surfaced.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::EmptySeed | Self::EmptyText | Self::MissingField(_) | Self::UnknownNode(_) => {
				ErrorKind::Validation
			}
			Self::Parse(_) => ErrorKind::Parse,
			Self::NotFound | Self::Storage(_) => ErrorKind::Persistence,
		}
	}
}
