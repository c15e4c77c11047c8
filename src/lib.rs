//! This library provides JSON Web Signature signing and verification.
//!
//! Messages are built from a [`Header`] and a [`Payload`] and signed into a [`Jws`],
//! which can be serialized to and parsed from the JWS Compact Serialization (see the [`compact`] module).
//!
//! Signing and verifying is done through the [`Signer`] and [`Verifier`] traits.
//! Implementations are available for the HMAC family in the [`hmac`] module,
//! for the RSA family in the `rsa` module (feature `rsa`) and for the ECDSA family in the `ecdsa` module (feature `ecdsa`).
//! The [`algorithm`] registry builds the right implementation for an algorithm and a [`Key`].
//!
//! A verifier is always chosen by the caller.
//! The `alg` parameter of a received message is never used to pick a verifier:
//! a message that names a different algorithm than the verifier simply fails verification.
//!
//! ```
//! use compact_jws::{Header, Jws, Key, Payload, SignatureAlgorithm};
//!
//! let key = compact_jws::random::generate_secret(SignatureAlgorithm::HS256)?;
//! let signer = compact_jws::signer(SignatureAlgorithm::HS256, Key::Secret(&key))?;
//!
//! let jws = Jws::new(Header::new(SignatureAlgorithm::HS256), Payload::new(&b"{\"bing\":\"bong\"}"[..]));
//! let token = jws.sign(&signer)?.serialize()?;
//!
//! let verifier = compact_jws::verifier(SignatureAlgorithm::HS256, Key::Secret(&key))?;
//! assert!(Jws::parse(&token)?.verify(&verifier)?);
//! # Ok::<(), compact_jws::Error>(())
//! ```

pub mod algorithm;
pub mod base64url;
pub mod compact;
pub mod compare;
pub mod digest;
#[cfg(feature = "ecdsa")]
pub mod ecdsa;
pub mod error;
pub mod header;
pub mod hmac;
pub mod jws;
pub mod key;
pub mod payload;
pub mod random;
#[cfg(feature = "rsa")]
pub mod rsa;

pub use serde_json::Value as JsonValue;
pub type JsonObject = serde_json::Map<String, JsonValue>;

pub use crate::algorithm::{AlgorithmDescriptor, AlgorithmFamily, SignatureAlgorithm};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::header::Header;
pub use crate::jws::{Jws, JwsState};
pub use crate::key::Key;
pub use crate::payload::{Claims, Payload};

#[doc(hidden)]
pub use serde_json;

/// Create a [`JsonObject`] from a JSON object literal.
#[macro_export]
macro_rules! json_object {
	{ $($tt:tt)* } => {
		match $crate::serde_json::json!({ $($tt)* }) {
			$crate::JsonValue::Object(object) => object,
			_ => unreachable!(),
		}
	};
}

/// A signer for JWS messages.
///
/// A signer is bound to exactly one algorithm and one key.
pub trait Signer: Send + Sync {
	/// The algorithm this signer implements.
	///
	/// The `alg` header parameter of a message must name this algorithm for the message to be signed.
	fn algorithm(&self) -> SignatureAlgorithm;

	/// Compute the signature over the signing input.
	///
	/// The signing input is the encoded header and the encoded payload separated by a period.
	/// The returned signature must be plain bytes, not hex or base64 encoded.
	fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>>;
}

/// A verifier for JWS messages.
///
/// A verifier is bound to exactly one algorithm and one key.
pub trait Verifier: Send + Sync {
	/// The algorithm this verifier implements.
	fn algorithm(&self) -> SignatureAlgorithm;

	/// Check a candidate signature against the signing input.
	///
	/// Returns `Ok(false)` if the signature does not match, including when it is malformed.
	/// An error means verification could not be attempted at all.
	fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<bool>;
}

impl<S: Signer + ?Sized> Signer for &S {
	fn algorithm(&self) -> SignatureAlgorithm {
		(**self).algorithm()
	}

	fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>> {
		(**self).sign(signing_input)
	}
}

impl<S: Signer + ?Sized> Signer for Box<S> {
	fn algorithm(&self) -> SignatureAlgorithm {
		(**self).algorithm()
	}

	fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>> {
		(**self).sign(signing_input)
	}
}

impl<V: Verifier + ?Sized> Verifier for &V {
	fn algorithm(&self) -> SignatureAlgorithm {
		(**self).algorithm()
	}

	fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<bool> {
		(**self).verify(signing_input, signature)
	}
}

impl<V: Verifier + ?Sized> Verifier for Box<V> {
	fn algorithm(&self) -> SignatureAlgorithm {
		(**self).algorithm()
	}

	fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<bool> {
		(**self).verify(signing_input, signature)
	}
}

/// Create a signer for an explicitly chosen algorithm.
///
/// Fails with [`ErrorKind::AlgorithmNotSupported`] if the algorithm is not compiled into this build,
/// or with [`ErrorKind::KeyTypeMismatch`] if the key does not belong to the algorithm's family.
pub fn signer<'a>(algorithm: SignatureAlgorithm, key: Key<'a>) -> Result<Box<dyn Signer + 'a>> {
	algorithm.descriptor()?.signer(key)
}

/// Create a verifier for an explicitly chosen algorithm.
///
/// Fails with [`ErrorKind::AlgorithmNotSupported`] if the algorithm is not compiled into this build,
/// or with [`ErrorKind::KeyTypeMismatch`] if the key does not belong to the algorithm's family.
pub fn verifier<'a>(algorithm: SignatureAlgorithm, key: Key<'a>) -> Result<Box<dyn Verifier + 'a>> {
	algorithm.descriptor()?.verifier(key)
}
