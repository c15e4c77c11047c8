//! Cryptographically secure random bytes for key and nonce material.
//!
//! The entropy source is injectable through the [`EntropySource`] trait.
//! Production code uses [`OsEntropy`], which reads from the operating system through `getrandom`.

use crate::{AlgorithmFamily, Error, Result, SignatureAlgorithm};

/// A source of cryptographically secure random bytes.
pub trait EntropySource: Send + Sync {
	/// Fill the whole buffer with random bytes.
	///
	/// On failure, the platform status code is returned and the contents of the buffer are unspecified.
	fn fill(&self, dest: &mut [u8]) -> std::result::Result<(), u32>;
}

/// The operating system entropy source.
#[derive(Copy, Clone, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
	fn fill(&self, dest: &mut [u8]) -> std::result::Result<(), u32> {
		getrandom::getrandom(dest).map_err(|e| e.code().get())
	}
}

/// Generator for secure random byte sequences.
#[derive(Clone, Debug, Default)]
pub struct SecureRandom<E = OsEntropy> {
	source: E,
}

impl SecureRandom<OsEntropy> {
	/// Create a generator backed by the operating system.
	pub fn new() -> Self {
		Self { source: OsEntropy }
	}
}

impl<E: EntropySource> SecureRandom<E> {
	/// Create a generator backed by a custom entropy source.
	pub fn with_source(source: E) -> Self {
		Self { source }
	}

	/// Generate exactly `count` random bytes.
	///
	/// A `count` of zero is rejected before the entropy source is consulted.
	/// If the entropy source fails, no bytes are returned at all.
	pub fn generate(&self, count: usize) -> Result<Vec<u8>> {
		if count == 0 {
			return Err(Error::invalid_argument("random byte count must be greater than zero"));
		}

		let mut buffer = vec![0u8; count];
		match self.source.fill(&mut buffer) {
			Ok(()) => Ok(buffer),
			Err(status) => {
				log::warn!("entropy source failed with status {}", status);
				Err(Error::random_generation_failed(status))
			},
		}
	}

	/// Generate a secret key for an HMAC algorithm.
	///
	/// The key length equals the output size of the algorithm's digest, the minimum recommended by RFC 7518.
	pub fn generate_secret(&self, algorithm: SignatureAlgorithm) -> Result<Vec<u8>> {
		let descriptor = algorithm.descriptor()?;
		if descriptor.family != AlgorithmFamily::Hmac {
			return Err(Error::key_type_mismatch(format!("{} does not use a shared secret", algorithm)));
		}
		self.generate(descriptor.min_key_bits / 8)
	}
}

/// Generate `count` random bytes from the operating system.
pub fn generate(count: usize) -> Result<Vec<u8>> {
	SecureRandom::new().generate(count)
}

/// Generate a secret key for an HMAC algorithm using the operating system entropy source.
pub fn generate_secret(algorithm: SignatureAlgorithm) -> Result<Vec<u8>> {
	SecureRandom::new().generate_secret(algorithm)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::ErrorKind;
	use assert2::assert;
	use std::sync::atomic::{AtomicUsize, Ordering};

	/// Entropy source that counts calls and always fails.
	#[derive(Default)]
	struct FailingSource {
		calls: AtomicUsize,
	}

	impl EntropySource for FailingSource {
		fn fill(&self, dest: &mut [u8]) -> std::result::Result<(), u32> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			dest[0] = 0xAA;
			Err(-25300i32 as u32)
		}
	}

	/// Entropy source that produces a fixed byte.
	struct FixedSource(u8);

	impl EntropySource for FixedSource {
		fn fill(&self, dest: &mut [u8]) -> std::result::Result<(), u32> {
			dest.iter_mut().for_each(|x| *x = self.0);
			Ok(())
		}
	}

	#[test]
	fn test_generate_exact_length() {
		for &count in &[1, 16, 32, 33, 1024] {
			assert!(generate(count).unwrap().len() == count);
		}
	}

	#[test]
	fn test_generate_differs() {
		let a = generate(32).unwrap();
		let b = generate(32).unwrap();
		assert!(a != b);
	}

	#[test]
	fn test_generate_zero_is_rejected_before_entropy_call() {
		let random = SecureRandom::with_source(FailingSource::default());
		let error = random.generate(0).unwrap_err();
		assert!(error.kind() == ErrorKind::InvalidArgument);
		assert!(random.source.calls.load(Ordering::SeqCst) == 0);
	}

	#[test]
	fn test_generate_failure_carries_status() {
		let random = SecureRandom::with_source(FailingSource::default());
		let error = random.generate(16).unwrap_err();
		assert!(error.kind() == ErrorKind::RandomGenerationFailed);
		assert!(error.status() == Some(-25300i32 as u32));
		assert!(random.source.calls.load(Ordering::SeqCst) == 1);
	}

	#[test]
	fn test_injected_source() {
		let random = SecureRandom::with_source(FixedSource(7));
		assert!(random.generate(4).unwrap() == [7, 7, 7, 7]);
	}

	#[test]
	fn test_generate_secret() {
		assert!(generate_secret(SignatureAlgorithm::HS256).unwrap().len() == 32);
		assert!(generate_secret(SignatureAlgorithm::HS384).unwrap().len() == 48);
		assert!(generate_secret(SignatureAlgorithm::HS512).unwrap().len() == 64);
		assert!(let Err(_) = generate_secret(SignatureAlgorithm::ES256));
	}
}
