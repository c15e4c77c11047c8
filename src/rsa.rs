//! RSA [`Verifier`] and [`Signer`] implementations using [RustCrypto](https://github.com/RustCrypto).
//!
//! The `RS*` algorithms use RSASSA-PKCS1-v1_5, the `PS*` algorithms use RSASSA-PSS
//! with MGF1 over the same digest and a salt as long as the digest output.

use std::borrow::Cow;

use rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::{AlgorithmFamily, Error, Key, Result, SignatureAlgorithm, Signer, Verifier};

/// Message signer for the RS* and PS* algorithms.
pub struct RsaSigner<'a> {
	algorithm : SignatureAlgorithm,
	key       : &'a RsaPrivateKey,
}

/// Message verifier for the RS* and PS* algorithms.
///
/// The verifier can be created from a public key, or from a private key of which only the public part is used.
pub struct RsaVerifier<'a> {
	algorithm : SignatureAlgorithm,
	key       : Cow<'a, RsaPublicKey>,
}

impl<'a> RsaSigner<'a> {
	/// Create a new RSA signer.
	///
	/// The size of the modulus is only checked when signing,
	/// so an undersized key fails with [`ErrorKind::SigningFailed`](crate::ErrorKind::SigningFailed).
	pub fn new(algorithm: SignatureAlgorithm, key: &'a RsaPrivateKey) -> Result<Self> {
		check_family(algorithm)?;
		Ok(Self { algorithm, key })
	}
}

impl<'a> RsaVerifier<'a> {
	/// Create a new RSA verifier from a public key.
	///
	/// Fails with [`ErrorKind::KeyTypeMismatch`](crate::ErrorKind::KeyTypeMismatch)
	/// if the algorithm is not an RSA algorithm or the modulus is smaller than the algorithm allows.
	pub fn new(algorithm: SignatureAlgorithm, key: &'a RsaPublicKey) -> Result<Self> {
		Self::with_key(algorithm, Cow::Borrowed(key))
	}

	/// Create a new RSA verifier from the public part of a private key.
	pub fn from_private_key(algorithm: SignatureAlgorithm, key: &RsaPrivateKey) -> Result<Self> {
		Self::with_key(algorithm, Cow::Owned(key.to_public_key()))
	}

	fn with_key(algorithm: SignatureAlgorithm, key: Cow<'a, RsaPublicKey>) -> Result<Self> {
		let min_key_bits = check_family(algorithm)?;
		let bits = modulus_bits(&*key);
		if bits < min_key_bits {
			return Err(Error::key_type_mismatch(format!("{} requires a modulus of at least {} bits, got {}", algorithm, min_key_bits, bits)));
		}
		Ok(Self { algorithm, key })
	}
}

impl Signer for RsaSigner<'_> {
	fn algorithm(&self) -> SignatureAlgorithm {
		self.algorithm
	}

	fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>> {
		let min_key_bits = check_family(self.algorithm)?;
		let bits = modulus_bits(self.key);
		if bits < min_key_bits {
			return Err(Error::signing_failed(format!("{} requires a modulus of at least {} bits, got {}", self.algorithm, min_key_bits, bits)));
		}

		// The RNG blinds the private key operation. PKCS#1 v1.5 signatures stay deterministic.
		let key = self.key;
		let signature = match self.algorithm {
			SignatureAlgorithm::RS256 => key.sign_with_rng(&mut OsRng, Pkcs1v15Sign::new::<Sha256>(), &Sha256::digest(signing_input)),
			SignatureAlgorithm::RS384 => key.sign_with_rng(&mut OsRng, Pkcs1v15Sign::new::<Sha384>(), &Sha384::digest(signing_input)),
			SignatureAlgorithm::RS512 => key.sign_with_rng(&mut OsRng, Pkcs1v15Sign::new::<Sha512>(), &Sha512::digest(signing_input)),
			SignatureAlgorithm::PS256 => key.sign_with_rng(&mut OsRng, Pss::new::<Sha256>(), &Sha256::digest(signing_input)),
			SignatureAlgorithm::PS384 => key.sign_with_rng(&mut OsRng, Pss::new::<Sha384>(), &Sha384::digest(signing_input)),
			SignatureAlgorithm::PS512 => key.sign_with_rng(&mut OsRng, Pss::new::<Sha512>(), &Sha512::digest(signing_input)),
			other => return Err(Error::key_type_mismatch(format!("{} is not an RSA algorithm", other))),
		};

		signature.map_err(|e| Error::signing_failed(format!("{} signing failed: {}", self.algorithm, e)))
	}
}

impl Verifier for RsaVerifier<'_> {
	fn algorithm(&self) -> SignatureAlgorithm {
		self.algorithm
	}

	fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<bool> {
		let key: &RsaPublicKey = &self.key;
		let result = match self.algorithm {
			SignatureAlgorithm::RS256 => key.verify(Pkcs1v15Sign::new::<Sha256>(), &Sha256::digest(signing_input), signature),
			SignatureAlgorithm::RS384 => key.verify(Pkcs1v15Sign::new::<Sha384>(), &Sha384::digest(signing_input), signature),
			SignatureAlgorithm::RS512 => key.verify(Pkcs1v15Sign::new::<Sha512>(), &Sha512::digest(signing_input), signature),
			SignatureAlgorithm::PS256 => key.verify(Pss::new::<Sha256>(), &Sha256::digest(signing_input), signature),
			SignatureAlgorithm::PS384 => key.verify(Pss::new::<Sha384>(), &Sha384::digest(signing_input), signature),
			SignatureAlgorithm::PS512 => key.verify(Pss::new::<Sha512>(), &Sha512::digest(signing_input), signature),
			other => return Err(Error::key_type_mismatch(format!("{} is not an RSA algorithm", other))),
		};

		// Any failure, including a signature of the wrong length, is a mismatch.
		Ok(result.is_ok())
	}
}

impl std::fmt::Debug for RsaSigner<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("RsaSigner").field("algorithm", &self.algorithm).field("bits", &modulus_bits(self.key)).finish()
	}
}

impl std::fmt::Debug for RsaVerifier<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("RsaVerifier").field("algorithm", &self.algorithm).field("bits", &modulus_bits(&*self.key)).finish()
	}
}

/// Check that the algorithm is an RSA algorithm and return its minimum key size.
fn check_family(algorithm: SignatureAlgorithm) -> Result<usize> {
	let descriptor = algorithm.descriptor()?;
	if descriptor.family != AlgorithmFamily::Rsa {
		return Err(Error::key_type_mismatch(format!("{} is not an RSA algorithm", algorithm)));
	}
	Ok(descriptor.min_key_bits)
}

/// The exact bit length of the modulus, not rounded up to whole bytes.
fn modulus_bits(key: &impl PublicKeyParts) -> usize {
	key.n().bits()
}

pub(crate) fn boxed_signer<'a>(algorithm: SignatureAlgorithm, key: Key<'a>) -> Result<Box<dyn Signer + 'a>> {
	match key {
		Key::RsaPrivate(private) => Ok(Box::new(RsaSigner::new(algorithm, private)?)),
		other => Err(Error::key_type_mismatch(format!("{} requires an RSA private key, got {}", algorithm, other.describe()))),
	}
}

pub(crate) fn boxed_verifier<'a>(algorithm: SignatureAlgorithm, key: Key<'a>) -> Result<Box<dyn Verifier + 'a>> {
	match key {
		Key::RsaPublic(public) => Ok(Box::new(RsaVerifier::new(algorithm, public)?)),
		Key::RsaPrivate(private) => Ok(Box::new(RsaVerifier::from_private_key(algorithm, private)?)),
		other => Err(Error::key_type_mismatch(format!("{} requires an RSA key, got {}", algorithm, other.describe()))),
	}
}
