//! The registry of supported signature algorithms.
//!
//! Every algorithm is described by a static [`AlgorithmDescriptor`].
//! The descriptor is the only place where an algorithm is tied to its family, digest and implementation,
//! so adding an algorithm means adding one entry to the table.

use std::fmt;
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use crate::digest::DigestAlgorithm;
use crate::{Error, Key, Result, Signer, Verifier};

/// Signature algorithms from [RFC 7518 section 3](https://tools.ietf.org/html/rfc7518#section-3).
///
/// There is no `none` algorithm: unsigned messages can not be named, parsed or pinned.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
	/// HMAC using SHA-256.
	HS256,
	/// HMAC using SHA-384.
	HS384,
	/// HMAC using SHA-512.
	HS512,
	/// RSASSA-PKCS1-v1_5 using SHA-256.
	RS256,
	/// RSASSA-PKCS1-v1_5 using SHA-384.
	RS384,
	/// RSASSA-PKCS1-v1_5 using SHA-512.
	RS512,
	/// RSASSA-PSS using SHA-256 and MGF1 with SHA-256.
	PS256,
	/// RSASSA-PSS using SHA-384 and MGF1 with SHA-384.
	PS384,
	/// RSASSA-PSS using SHA-512 and MGF1 with SHA-512.
	PS512,
	/// ECDSA using P-256 and SHA-256.
	ES256,
	/// ECDSA using P-384 and SHA-384.
	ES384,
	/// ECDSA using P-521 and SHA-512.
	ES512,
}

/// The family of primitives an algorithm belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AlgorithmFamily {
	Hmac,
	Rsa,
	Ecdsa,
}

/// Build a signer for an algorithm from a borrowed key.
pub type SignerFactory = for<'a> fn(SignatureAlgorithm, Key<'a>) -> Result<Box<dyn Signer + 'a>>;

/// Build a verifier for an algorithm from a borrowed key.
pub type VerifierFactory = for<'a> fn(SignatureAlgorithm, Key<'a>) -> Result<Box<dyn Verifier + 'a>>;

/// Static description of a signature algorithm.
pub struct AlgorithmDescriptor {
	pub algorithm: SignatureAlgorithm,
	pub family: AlgorithmFamily,

	/// The minimum key size in bits.
	///
	/// For HMAC this is advisory: shorter keys are accepted but logged.
	pub min_key_bits: usize,

	/// The digest applied to the signing input.
	pub digest: DigestAlgorithm,

	/// The signature length in bytes, if it does not depend on the key.
	pub signature_len: Option<usize>,

	signer: SignerFactory,
	verifier: VerifierFactory,
}

impl SignatureAlgorithm {
	/// All algorithms known by name, including those not compiled into this build.
	pub const ALL: [SignatureAlgorithm; 12] = [
		SignatureAlgorithm::HS256,
		SignatureAlgorithm::HS384,
		SignatureAlgorithm::HS512,
		SignatureAlgorithm::RS256,
		SignatureAlgorithm::RS384,
		SignatureAlgorithm::RS512,
		SignatureAlgorithm::PS256,
		SignatureAlgorithm::PS384,
		SignatureAlgorithm::PS512,
		SignatureAlgorithm::ES256,
		SignatureAlgorithm::ES384,
		SignatureAlgorithm::ES512,
	];

	/// The JOSE name of the algorithm, as used in the `alg` header parameter.
	pub fn name(self) -> &'static str {
		match self {
			SignatureAlgorithm::HS256 => "HS256",
			SignatureAlgorithm::HS384 => "HS384",
			SignatureAlgorithm::HS512 => "HS512",
			SignatureAlgorithm::RS256 => "RS256",
			SignatureAlgorithm::RS384 => "RS384",
			SignatureAlgorithm::RS512 => "RS512",
			SignatureAlgorithm::PS256 => "PS256",
			SignatureAlgorithm::PS384 => "PS384",
			SignatureAlgorithm::PS512 => "PS512",
			SignatureAlgorithm::ES256 => "ES256",
			SignatureAlgorithm::ES384 => "ES384",
			SignatureAlgorithm::ES512 => "ES512",
		}
	}

	/// Look up the descriptor of the algorithm.
	///
	/// Fails with [`ErrorKind::AlgorithmNotSupported`](crate::ErrorKind::AlgorithmNotSupported)
	/// if the algorithm family is not compiled into this build.
	pub fn descriptor(self) -> Result<&'static AlgorithmDescriptor> {
		REGISTRY.iter()
			.find(|descriptor| descriptor.algorithm == self)
			.ok_or_else(|| Error::algorithm_not_supported(self.name()))
	}
}

impl AlgorithmDescriptor {
	/// Create a signer for this algorithm.
	///
	/// Fails with [`ErrorKind::KeyTypeMismatch`](crate::ErrorKind::KeyTypeMismatch) if the key belongs to another family.
	pub fn signer<'a>(&self, key: Key<'a>) -> Result<Box<dyn Signer + 'a>> {
		(self.signer)(self.algorithm, key)
	}

	/// Create a verifier for this algorithm.
	///
	/// Fails with [`ErrorKind::KeyTypeMismatch`](crate::ErrorKind::KeyTypeMismatch) if the key belongs to another family.
	pub fn verifier<'a>(&self, key: Key<'a>) -> Result<Box<dyn Verifier + 'a>> {
		(self.verifier)(self.algorithm, key)
	}
}

impl fmt::Debug for AlgorithmDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("AlgorithmDescriptor")
			.field("algorithm", &self.algorithm)
			.field("family", &self.family)
			.field("min_key_bits", &self.min_key_bits)
			.field("digest", &self.digest)
			.field("signature_len", &self.signature_len)
			.finish()
	}
}

impl fmt::Display for SignatureAlgorithm {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for SignatureAlgorithm {
	type Err = Error;

	fn from_str(name: &str) -> Result<Self> {
		SignatureAlgorithm::ALL.iter()
			.copied()
			.find(|algorithm| algorithm.name() == name)
			.ok_or_else(|| Error::algorithm_not_supported(name))
	}
}

/// Look up an algorithm descriptor by JOSE name.
pub fn lookup(name: &str) -> Result<&'static AlgorithmDescriptor> {
	name.parse::<SignatureAlgorithm>()?.descriptor()
}

static REGISTRY: &[AlgorithmDescriptor] = &[
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::HS256,
		family: AlgorithmFamily::Hmac,
		min_key_bits: 256,
		digest: DigestAlgorithm::Sha256,
		signature_len: Some(32),
		signer: crate::hmac::boxed_signer,
		verifier: crate::hmac::boxed_verifier,
	},
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::HS384,
		family: AlgorithmFamily::Hmac,
		min_key_bits: 384,
		digest: DigestAlgorithm::Sha384,
		signature_len: Some(48),
		signer: crate::hmac::boxed_signer,
		verifier: crate::hmac::boxed_verifier,
	},
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::HS512,
		family: AlgorithmFamily::Hmac,
		min_key_bits: 512,
		digest: DigestAlgorithm::Sha512,
		signature_len: Some(64),
		signer: crate::hmac::boxed_signer,
		verifier: crate::hmac::boxed_verifier,
	},
	#[cfg(feature = "rsa")]
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::RS256,
		family: AlgorithmFamily::Rsa,
		min_key_bits: 2048,
		digest: DigestAlgorithm::Sha256,
		signature_len: None,
		signer: crate::rsa::boxed_signer,
		verifier: crate::rsa::boxed_verifier,
	},
	#[cfg(feature = "rsa")]
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::RS384,
		family: AlgorithmFamily::Rsa,
		min_key_bits: 2048,
		digest: DigestAlgorithm::Sha384,
		signature_len: None,
		signer: crate::rsa::boxed_signer,
		verifier: crate::rsa::boxed_verifier,
	},
	#[cfg(feature = "rsa")]
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::RS512,
		family: AlgorithmFamily::Rsa,
		min_key_bits: 2048,
		digest: DigestAlgorithm::Sha512,
		signature_len: None,
		signer: crate::rsa::boxed_signer,
		verifier: crate::rsa::boxed_verifier,
	},
	#[cfg(feature = "rsa")]
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::PS256,
		family: AlgorithmFamily::Rsa,
		min_key_bits: 2048,
		digest: DigestAlgorithm::Sha256,
		signature_len: None,
		signer: crate::rsa::boxed_signer,
		verifier: crate::rsa::boxed_verifier,
	},
	#[cfg(feature = "rsa")]
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::PS384,
		family: AlgorithmFamily::Rsa,
		min_key_bits: 2048,
		digest: DigestAlgorithm::Sha384,
		signature_len: None,
		signer: crate::rsa::boxed_signer,
		verifier: crate::rsa::boxed_verifier,
	},
	#[cfg(feature = "rsa")]
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::PS512,
		family: AlgorithmFamily::Rsa,
		min_key_bits: 2048,
		digest: DigestAlgorithm::Sha512,
		signature_len: None,
		signer: crate::rsa::boxed_signer,
		verifier: crate::rsa::boxed_verifier,
	},
	#[cfg(feature = "ecdsa")]
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::ES256,
		family: AlgorithmFamily::Ecdsa,
		min_key_bits: 256,
		digest: DigestAlgorithm::Sha256,
		signature_len: Some(64),
		signer: crate::ecdsa::boxed_signer,
		verifier: crate::ecdsa::boxed_verifier,
	},
	#[cfg(feature = "ecdsa")]
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::ES384,
		family: AlgorithmFamily::Ecdsa,
		min_key_bits: 384,
		digest: DigestAlgorithm::Sha384,
		signature_len: Some(96),
		signer: crate::ecdsa::boxed_signer,
		verifier: crate::ecdsa::boxed_verifier,
	},
	#[cfg(feature = "ecdsa")]
	AlgorithmDescriptor {
		algorithm: SignatureAlgorithm::ES512,
		family: AlgorithmFamily::Ecdsa,
		min_key_bits: 521,
		digest: DigestAlgorithm::Sha512,
		signature_len: Some(132),
		signer: crate::ecdsa::boxed_signer,
		verifier: crate::ecdsa::boxed_verifier,
	},
];

#[cfg(test)]
mod test {
	use super::*;
	use crate::ErrorKind;
	use assert2::assert;

	#[test]
	fn test_names_round_trip() {
		for &algorithm in SignatureAlgorithm::ALL.iter() {
			assert!(algorithm.name().parse::<SignatureAlgorithm>().unwrap() == algorithm);
			assert!(algorithm.to_string() == algorithm.name());
		}
	}

	#[test]
	fn test_unknown_names() {
		for name in ["none", "None", "hs256", "HS1", "", "RS256 "].iter() {
			assert!(lookup(name).unwrap_err().kind() == ErrorKind::AlgorithmNotSupported);
		}
	}

	#[test]
	fn test_registry_is_consistent() {
		for descriptor in REGISTRY {
			assert!(lookup(descriptor.algorithm.name()).unwrap().algorithm == descriptor.algorithm);
			if let Some(len) = descriptor.signature_len {
				if descriptor.family == AlgorithmFamily::Hmac {
					assert!(len == descriptor.digest.output_len());
				}
			}
		}
	}

	#[test]
	fn test_hmac_descriptors() {
		let descriptor = lookup("HS384").unwrap();
		assert!(descriptor.family == AlgorithmFamily::Hmac);
		assert!(descriptor.digest == DigestAlgorithm::Sha384);
		assert!(descriptor.min_key_bits == 384);
	}

	#[test]
	#[cfg(feature = "rsa")]
	fn test_rsa_descriptors() {
		for name in ["RS256", "RS384", "RS512", "PS256", "PS384", "PS512"].iter() {
			let descriptor = lookup(name).unwrap();
			assert!(descriptor.family == AlgorithmFamily::Rsa);
			assert!(descriptor.min_key_bits == 2048);
		}
	}

	#[test]
	#[cfg(feature = "ecdsa")]
	fn test_ecdsa_descriptors() {
		assert!(lookup("ES256").unwrap().signature_len == Some(64));
		assert!(lookup("ES384").unwrap().signature_len == Some(96));
		assert!(lookup("ES512").unwrap().signature_len == Some(132));
	}

	#[test]
	#[cfg(not(feature = "rsa"))]
	fn test_rsa_not_compiled_in() {
		assert!(lookup("RS256").unwrap_err().kind() == ErrorKind::AlgorithmNotSupported);
	}

	#[test]
	fn test_serde_uses_jose_names() {
		assert!(serde_json::to_string(&SignatureAlgorithm::ES384).unwrap() == "\"ES384\"");
		assert!(serde_json::from_str::<SignatureAlgorithm>("\"PS512\"").unwrap() == SignatureAlgorithm::PS512);
		assert!(let Err(_) = serde_json::from_str::<SignatureAlgorithm>("\"none\""));
	}
}
