//! HMAC [`Verifier`] and [`Signer`] implementations using [RustCrypto](https://github.com/RustCrypto).

use hmac::{Hmac, Mac};

use crate::compare::constant_time_eq;
use crate::{AlgorithmFamily, Error, Key, Result, SignatureAlgorithm, Signer, Verifier};

type HmacSha256 = Hmac<sha2::Sha256>;
type HmacSha384 = Hmac<sha2::Sha384>;
type HmacSha512 = Hmac<sha2::Sha512>;

/// Message signer for the HS256, HS384 and HS512 algorithms.
///
/// The wrapped key type may be anything that implements `AsRef<[u8]>`.
/// You can use a `Vec<u8>` to have the signer own the key,
/// or a `&[u8]` to prevent copying the key more than necessary.
#[derive(Clone)]
pub struct HmacSigner<K: AsRef<[u8]>> {
	algorithm : SignatureAlgorithm,
	key       : K,
}

/// Message verifier for the HS256, HS384 and HS512 algorithms.
///
/// The computed MAC is compared with the candidate signature in constant time.
#[derive(Clone)]
pub struct HmacVerifier<K: AsRef<[u8]>> {
	algorithm : SignatureAlgorithm,
	key       : K,
}

impl<K: AsRef<[u8]>> HmacSigner<K> {
	/// Create a new HMAC signer for an algorithm using a specified key.
	///
	/// Fails with [`ErrorKind::KeyTypeMismatch`](crate::ErrorKind::KeyTypeMismatch) if the algorithm is not an HMAC algorithm.
	pub fn new(algorithm: SignatureAlgorithm, key: K) -> Result<Self> {
		check_key(algorithm, key.as_ref())?;
		Ok(Self { algorithm, key })
	}
}

impl<K: AsRef<[u8]>> HmacVerifier<K> {
	/// Create a new HMAC verifier for an algorithm using a specified key.
	///
	/// Fails with [`ErrorKind::KeyTypeMismatch`](crate::ErrorKind::KeyTypeMismatch) if the algorithm is not an HMAC algorithm.
	pub fn new(algorithm: SignatureAlgorithm, key: K) -> Result<Self> {
		check_key(algorithm, key.as_ref())?;
		Ok(Self { algorithm, key })
	}
}

impl<K: AsRef<[u8]> + Send + Sync> Signer for HmacSigner<K> {
	fn algorithm(&self) -> SignatureAlgorithm {
		self.algorithm
	}

	fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>> {
		compute_mac(self.algorithm, self.key.as_ref(), signing_input)
	}
}

impl<K: AsRef<[u8]> + Send + Sync> Verifier for HmacVerifier<K> {
	fn algorithm(&self) -> SignatureAlgorithm {
		self.algorithm
	}

	fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<bool> {
		let expected = compute_mac(self.algorithm, self.key.as_ref(), signing_input)?;
		Ok(constant_time_eq(&expected, signature))
	}
}

impl<K: AsRef<[u8]>> std::fmt::Debug for HmacSigner<K> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("HmacSigner").field("algorithm", &self.algorithm).finish()
	}
}

impl<K: AsRef<[u8]>> std::fmt::Debug for HmacVerifier<K> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("HmacVerifier").field("algorithm", &self.algorithm).finish()
	}
}

/// Make sure the algorithm is an HMAC algorithm and warn about short keys.
fn check_key(algorithm: SignatureAlgorithm, key: &[u8]) -> Result<()> {
	let descriptor = algorithm.descriptor()?;
	if descriptor.family != AlgorithmFamily::Hmac {
		return Err(Error::key_type_mismatch(format!("{} is not an HMAC algorithm", algorithm)));
	}
	if key.len() * 8 < descriptor.min_key_bits {
		log::warn!("{} key is {} bits, shorter than the recommended {} bits", algorithm, key.len() * 8, descriptor.min_key_bits);
	}
	Ok(())
}

/// Compute the Message Authentication Code over the signing input.
fn compute_mac(algorithm: SignatureAlgorithm, key: &[u8], signing_input: &[u8]) -> Result<Vec<u8>> {
	match algorithm {
		SignatureAlgorithm::HS256 => feed_mac::<HmacSha256>(key, signing_input),
		SignatureAlgorithm::HS384 => feed_mac::<HmacSha384>(key, signing_input),
		SignatureAlgorithm::HS512 => feed_mac::<HmacSha512>(key, signing_input),
		other => Err(Error::key_type_mismatch(format!("{} is not an HMAC algorithm", other))),
	}
}

fn feed_mac<M: Mac + hmac::digest::KeyInit>(key: &[u8], signing_input: &[u8]) -> Result<Vec<u8>> {
	let mut mac = <M as Mac>::new_from_slice(key)
		.map_err(|e| Error::signing_failed(format!("failed to initialize HMAC: {}", e)))?;
	mac.update(signing_input);
	Ok(mac.finalize().into_bytes().to_vec())
}

pub(crate) fn boxed_signer<'a>(algorithm: SignatureAlgorithm, key: Key<'a>) -> Result<Box<dyn Signer + 'a>> {
	match key {
		Key::Secret(secret) => Ok(Box::new(HmacSigner::new(algorithm, secret)?)),
		#[allow(unreachable_patterns)]
		other => Err(Error::key_type_mismatch(format!("{} requires a shared secret, got {}", algorithm, other.describe()))),
	}
}

pub(crate) fn boxed_verifier<'a>(algorithm: SignatureAlgorithm, key: Key<'a>) -> Result<Box<dyn Verifier + 'a>> {
	match key {
		Key::Secret(secret) => Ok(Box::new(HmacVerifier::new(algorithm, secret)?)),
		#[allow(unreachable_patterns)]
		other => Err(Error::key_type_mismatch(format!("{} requires a shared secret, got {}", algorithm, other.describe()))),
	}
}
