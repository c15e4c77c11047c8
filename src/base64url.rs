//! The unpadded, URL-safe base64 alphabet used throughout JOSE.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::Result;

/// Encode bytes as unpadded base64url.
pub fn encode(data: impl AsRef<[u8]>) -> String {
	URL_SAFE_NO_PAD.encode(data)
}

/// Decode unpadded base64url.
///
/// Padding, whitespace, characters from the standard alphabet and non-canonical trailing bits are all rejected
/// with an [`ErrorKind::InvalidSerialization`](crate::ErrorKind::InvalidSerialization) error.
pub fn decode(data: impl AsRef<[u8]>) -> Result<Vec<u8>> {
	Ok(URL_SAFE_NO_PAD.decode(data)?)
}
