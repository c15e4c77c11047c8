//! Digest calculation for key thumbprints.
//!
//! Thumbprints are stable key identifiers, suitable as a `kid` header value.
//! They are never used as signing material.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::{base64url, Error, JsonObject, JsonValue, Result};

/// Hash algorithms available for digests and thumbprints.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DigestAlgorithm {
	Sha256,
	Sha384,
	Sha512,
}

impl DigestAlgorithm {
	/// The size of the digest in bytes.
	pub fn output_len(self) -> usize {
		match self {
			DigestAlgorithm::Sha256 => 32,
			DigestAlgorithm::Sha384 => 48,
			DigestAlgorithm::Sha512 => 64,
		}
	}

	/// Compute the raw digest of the input.
	pub(crate) fn hash(self, input: &[u8]) -> Vec<u8> {
		match self {
			DigestAlgorithm::Sha256 => Sha256::digest(input).to_vec(),
			DigestAlgorithm::Sha384 => Sha384::digest(input).to_vec(),
			DigestAlgorithm::Sha512 => Sha512::digest(input).to_vec(),
		}
	}
}

/// Compute the base64url encoded digest of a non-empty input.
pub fn digest(input: &[u8], algorithm: DigestAlgorithm) -> Result<String> {
	if input.is_empty() {
		return Err(Error::invalid_argument("digest input must not be empty"));
	}
	Ok(base64url::encode(algorithm.hash(input)))
}

/// Compute a key thumbprint as defined in [RFC 7638](https://tools.ietf.org/html/rfc7638).
///
/// The members must be exactly the required public members of the key (for example `e`, `kty` and `n` for an RSA key).
/// They are serialized with lexicographically sorted names and without whitespace before hashing.
pub fn thumbprint(members: &JsonObject, algorithm: DigestAlgorithm) -> Result<String> {
	if members.is_empty() {
		return Err(Error::invalid_argument("thumbprint requires at least one key member"));
	}

	// serde_json::Map may preserve insertion order depending on enabled features, so sort explicitly.
	let canonical: BTreeMap<&str, &JsonValue> = members.iter().map(|(name, value)| (name.as_str(), value)).collect();
	let canonical = serde_json::to_vec(&canonical)?;
	digest(&canonical, algorithm)
}
