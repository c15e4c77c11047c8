//! Error types for this crate.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// The kind of an error.
///
/// A failed signature check is not an error: verifiers report it as `Ok(false)`.
/// Errors are reserved for situations where signing or verification could not be attempted at all.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
	/// The caller supplied a structurally invalid argument.
	InvalidArgument,

	/// The algorithm is unknown or not compiled into this build.
	AlgorithmNotSupported,

	/// The header names a different algorithm than the signer implements.
	AlgorithmMismatch,

	/// The key does not have the shape the algorithm expects.
	KeyTypeMismatch,

	/// Encoded key material could not be decoded.
	InvalidKey,

	/// The signing primitive reported a failure.
	SigningFailed,

	/// The entropy source reported a failure.
	RandomGenerationFailed,

	/// A compact serialized message is malformed.
	InvalidSerialization,

	/// The message has no signature yet.
	NotYetSigned,

	/// A required header parameter is missing.
	MissingHeaderParam,

	/// A header parameter has the wrong type.
	InvalidHeaderParam,

	/// JSON could not be encoded or decoded.
	InvalidJson,
}

/// An error that occurred while signing, verifying, encoding or decoding a message.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
	kind    : ErrorKind,
	message : String,
	status  : Option<u32>,
}

impl ErrorKind {
	/// Get a short description of the error kind.
	pub fn description(self) -> &'static str {
		match self {
			ErrorKind::InvalidArgument        => "invalid argument",
			ErrorKind::AlgorithmNotSupported  => "unsupported algorithm",
			ErrorKind::AlgorithmMismatch      => "algorithm mismatch",
			ErrorKind::KeyTypeMismatch        => "key type mismatch",
			ErrorKind::InvalidKey             => "invalid key",
			ErrorKind::SigningFailed          => "signing failed",
			ErrorKind::RandomGenerationFailed => "random generation failed",
			ErrorKind::InvalidSerialization   => "invalid compact serialization",
			ErrorKind::NotYetSigned           => "message is not signed",
			ErrorKind::MissingHeaderParam     => "missing required header parameter",
			ErrorKind::InvalidHeaderParam     => "invalid type for header parameter",
			ErrorKind::InvalidJson            => "invalid JSON",
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.description())
	}
}

impl Error {
	/// Create a new error with a kind and message.
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self { kind, message: message.into(), status: None }
	}

	/// Attach a platform or primitive status code to the error.
	pub fn with_status(mut self, status: u32) -> Self {
		self.status = Some(status);
		self
	}

	/// Get the kind of the error.
	pub fn kind(&self) -> ErrorKind {
		self.kind
	}

	/// Get the error message.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Get the status code reported by the underlying platform, if any.
	pub fn status(&self) -> Option<u32> {
		self.status
	}

	pub fn invalid_argument(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::InvalidArgument, message)
	}

	pub fn algorithm_not_supported(algorithm: impl AsRef<str>) -> Self {
		Self::new(ErrorKind::AlgorithmNotSupported, algorithm.as_ref())
	}

	pub fn algorithm_mismatch(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::AlgorithmMismatch, message)
	}

	pub fn key_type_mismatch(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::KeyTypeMismatch, message)
	}

	pub fn invalid_key(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::InvalidKey, message)
	}

	pub fn signing_failed(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::SigningFailed, message)
	}

	pub fn random_generation_failed(status: u32) -> Self {
		Self::new(ErrorKind::RandomGenerationFailed, format!("entropy source returned status {}", status)).with_status(status)
	}

	pub fn invalid_serialization(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::InvalidSerialization, message)
	}

	pub fn not_yet_signed() -> Self {
		Self::new(ErrorKind::NotYetSigned, "sign the message before serializing or verifying it")
	}

	pub fn missing_header_param(name: impl AsRef<str>) -> Self {
		Self::new(ErrorKind::MissingHeaderParam, name.as_ref())
	}

	pub fn invalid_header_param(name: impl AsRef<str>) -> Self {
		Self::new(ErrorKind::InvalidHeaderParam, name.as_ref())
	}

	pub fn invalid_json(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::InvalidJson, message)
	}
}

impl From<serde_json::Error> for Error {
	fn from(other: serde_json::Error) -> Self {
		Self::invalid_json(other.to_string())
	}
}

impl From<base64::DecodeError> for Error {
	fn from(other: base64::DecodeError) -> Self {
		Self::invalid_serialization(other.to_string())
	}
}
