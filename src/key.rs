//! Key handles for signers and verifiers.
//!
//! Signers and verifiers only ever borrow key material through a [`Key`].
//! Ownership, storage and zeroing of the key remain the responsibility of the caller.
//!
//! When the `rsa` or `ecdsa` feature is enabled, [`PrivateKey`] and [`PublicKey`] can be loaded from PEM or DER.

use std::fmt;

use crate::AlgorithmFamily;

#[cfg(any(feature = "rsa", feature = "ecdsa"))]
use crate::{Error, Result};

#[cfg(feature = "rsa")]
use rsa::{RsaPrivateKey, RsaPublicKey};

/// A borrowed key, tagged with the family of algorithms it can be used with.
#[derive(Copy, Clone)]
pub enum Key<'a> {
	/// A shared secret for the HMAC algorithms.
	Secret(&'a [u8]),

	/// An RSA private key for the `RS*` and `PS*` algorithms.
	#[cfg(feature = "rsa")]
	RsaPrivate(&'a RsaPrivateKey),

	/// An RSA public key for the `RS*` and `PS*` algorithms.
	#[cfg(feature = "rsa")]
	RsaPublic(&'a RsaPublicKey),

	/// An elliptic curve private key for the `ES*` algorithms.
	#[cfg(feature = "ecdsa")]
	EcPrivate(&'a EcPrivateKey),

	/// An elliptic curve public key for the `ES*` algorithms.
	#[cfg(feature = "ecdsa")]
	EcPublic(&'a EcPublicKey),
}

impl<'a> Key<'a> {
	/// The algorithm family this key belongs to.
	pub fn family(&self) -> AlgorithmFamily {
		match self {
			Key::Secret(_) => AlgorithmFamily::Hmac,
			#[cfg(feature = "rsa")]
			Key::RsaPrivate(_) | Key::RsaPublic(_) => AlgorithmFamily::Rsa,
			#[cfg(feature = "ecdsa")]
			Key::EcPrivate(_) | Key::EcPublic(_) => AlgorithmFamily::Ecdsa,
		}
	}

	/// A short description of the key shape, for error messages.
	pub(crate) fn describe(&self) -> &'static str {
		match self {
			Key::Secret(_) => "shared secret",
			#[cfg(feature = "rsa")]
			Key::RsaPrivate(_) => "RSA private key",
			#[cfg(feature = "rsa")]
			Key::RsaPublic(_) => "RSA public key",
			#[cfg(feature = "ecdsa")]
			Key::EcPrivate(_) => "EC private key",
			#[cfg(feature = "ecdsa")]
			Key::EcPublic(_) => "EC public key",
		}
	}
}

impl<'a> From<&'a [u8]> for Key<'a> {
	fn from(secret: &'a [u8]) -> Self {
		Key::Secret(secret)
	}
}

impl<'a> fmt::Debug for Key<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		// Never print key material.
		write!(f, "Key({})", self.describe())
	}
}

/// Named elliptic curves.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EcCurve {
	P256,
	P384,
	P521,
}

impl EcCurve {
	/// The JOSE name of the curve.
	pub fn name(self) -> &'static str {
		match self {
			EcCurve::P256 => "P-256",
			EcCurve::P384 => "P-384",
			EcCurve::P521 => "P-521",
		}
	}
}

impl fmt::Display for EcCurve {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// An elliptic curve private key.
#[cfg(feature = "ecdsa")]
pub enum EcPrivateKey {
	P256(p256::ecdsa::SigningKey),
	P384(p384::ecdsa::SigningKey),
	P521(p521::ecdsa::SigningKey),
}

/// An elliptic curve public key.
#[cfg(feature = "ecdsa")]
#[derive(Clone)]
pub enum EcPublicKey {
	P256(p256::ecdsa::VerifyingKey),
	P384(p384::ecdsa::VerifyingKey),
	P521(p521::ecdsa::VerifyingKey),
}

#[cfg(feature = "ecdsa")]
impl EcPrivateKey {
	/// The curve of the key.
	pub fn curve(&self) -> EcCurve {
		match self {
			EcPrivateKey::P256(_) => EcCurve::P256,
			EcPrivateKey::P384(_) => EcCurve::P384,
			EcPrivateKey::P521(_) => EcCurve::P521,
		}
	}

	/// Decode a PKCS#8 DER encoded private key on any supported curve.
	pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
		use pkcs8::DecodePrivateKey;

		if let Ok(secret) = p256::SecretKey::from_pkcs8_der(der) {
			let key = p256::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
				.map_err(|e| Error::invalid_key(format!("p256 signing key error: {}", e)))?;
			return Ok(EcPrivateKey::P256(key));
		}
		if let Ok(secret) = p384::SecretKey::from_pkcs8_der(der) {
			let key = p384::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
				.map_err(|e| Error::invalid_key(format!("p384 signing key error: {}", e)))?;
			return Ok(EcPrivateKey::P384(key));
		}
		if let Ok(secret) = p521::SecretKey::from_pkcs8_der(der) {
			let key = p521::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
				.map_err(|e| Error::invalid_key(format!("p521 signing key error: {}", e)))?;
			return Ok(EcPrivateKey::P521(key));
		}
		Err(Error::invalid_key("unsupported EC PKCS#8 private key"))
	}

	/// Get the public key that belongs to this private key.
	pub fn public_key(&self) -> EcPublicKey {
		match self {
			EcPrivateKey::P256(key) => EcPublicKey::P256(p256::ecdsa::VerifyingKey::from(key)),
			EcPrivateKey::P384(key) => EcPublicKey::P384(p384::ecdsa::VerifyingKey::from(key)),
			EcPrivateKey::P521(key) => EcPublicKey::P521(p521::ecdsa::VerifyingKey::from(key)),
		}
	}

	/// Borrow the key as a [`Key`].
	pub fn as_key(&self) -> Key<'_> {
		Key::EcPrivate(self)
	}
}

#[cfg(feature = "ecdsa")]
impl EcPublicKey {
	/// The curve of the key.
	pub fn curve(&self) -> EcCurve {
		match self {
			EcPublicKey::P256(_) => EcCurve::P256,
			EcPublicKey::P384(_) => EcCurve::P384,
			EcPublicKey::P521(_) => EcCurve::P521,
		}
	}

	/// Decode a DER encoded SubjectPublicKeyInfo on any supported curve.
	pub fn from_public_key_der(der: &[u8]) -> Result<Self> {
		use p256::elliptic_curve::sec1::ToEncodedPoint;
		use pkcs8::DecodePublicKey;

		if let Ok(public_key) = p256::PublicKey::from_public_key_der(der) {
			let encoded = public_key.to_encoded_point(false);
			let key = p256::ecdsa::VerifyingKey::from_encoded_point(&encoded)
				.map_err(|e| Error::invalid_key(format!("p256 public key error: {}", e)))?;
			return Ok(EcPublicKey::P256(key));
		}
		if let Ok(public_key) = p384::PublicKey::from_public_key_der(der) {
			let encoded = public_key.to_encoded_point(false);
			let key = p384::ecdsa::VerifyingKey::from_encoded_point(&encoded)
				.map_err(|e| Error::invalid_key(format!("p384 public key error: {}", e)))?;
			return Ok(EcPublicKey::P384(key));
		}
		if let Ok(public_key) = p521::PublicKey::from_public_key_der(der) {
			let encoded = public_key.to_encoded_point(false);
			let key = p521::ecdsa::VerifyingKey::from_encoded_point(&encoded)
				.map_err(|e| Error::invalid_key(format!("p521 public key error: {}", e)))?;
			return Ok(EcPublicKey::P521(key));
		}
		Err(Error::invalid_key("unsupported EC public key"))
	}

	/// Decode a SEC1 encoded point on a known curve.
	///
	/// An uncompressed point is `0x04 || x || y`, which is how the `x` and `y` members of a JWK can be combined.
	pub fn from_sec1_bytes(curve: EcCurve, bytes: &[u8]) -> Result<Self> {
		let key = match curve {
			EcCurve::P256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(bytes).map(EcPublicKey::P256),
			EcCurve::P384 => p384::ecdsa::VerifyingKey::from_sec1_bytes(bytes).map(EcPublicKey::P384),
			EcCurve::P521 => p521::ecdsa::VerifyingKey::from_sec1_bytes(bytes).map(EcPublicKey::P521),
		};
		key.map_err(|_| Error::invalid_key(format!("invalid {} point", curve)))
	}

	/// Borrow the key as a [`Key`].
	pub fn as_key(&self) -> Key<'_> {
		Key::EcPublic(self)
	}
}

#[cfg(feature = "ecdsa")]
impl fmt::Debug for EcPrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "EcPrivateKey({})", self.curve())
	}
}

#[cfg(feature = "ecdsa")]
impl fmt::Debug for EcPublicKey {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "EcPublicKey({})", self.curve())
	}
}

/// An owned asymmetric private key.
#[cfg(any(feature = "rsa", feature = "ecdsa"))]
pub enum PrivateKey {
	#[cfg(feature = "rsa")]
	Rsa(RsaPrivateKey),
	#[cfg(feature = "ecdsa")]
	Ec(EcPrivateKey),
}

/// An owned asymmetric public key.
#[cfg(any(feature = "rsa", feature = "ecdsa"))]
pub enum PublicKey {
	#[cfg(feature = "rsa")]
	Rsa(RsaPublicKey),
	#[cfg(feature = "ecdsa")]
	Ec(EcPublicKey),
}

#[cfg(any(feature = "rsa", feature = "ecdsa"))]
impl PrivateKey {
	/// Load the first supported private key from PEM data.
	///
	/// Recognized blocks are `RSA PRIVATE KEY` (PKCS#1) and `PRIVATE KEY` (PKCS#8, RSA or EC).
	pub fn from_pem(pem_bytes: &[u8]) -> Result<Self> {
		let blocks = pem::parse_many(pem_bytes).map_err(|e| Error::invalid_key(format!("pem parse error: {}", e)))?;
		for block in blocks {
			let key = match block.tag() {
				#[cfg(feature = "rsa")]
				"RSA PRIVATE KEY" => rsa_private_pkcs1(block.contents()),
				"PRIVATE KEY"     => Self::from_der(block.contents()),
				_                 => continue,
			};
			if let Ok(key) = key {
				return Ok(key);
			}
		}
		Err(Error::invalid_key("unsupported private key format"))
	}

	/// Load a DER encoded private key.
	///
	/// PKCS#8 is tried first for all families, then PKCS#1 for RSA.
	pub fn from_der(der: &[u8]) -> Result<Self> {
		#[cfg(feature = "rsa")]
		{
			use pkcs8::DecodePrivateKey;
			if let Ok(key) = RsaPrivateKey::from_pkcs8_der(der) {
				return Ok(PrivateKey::Rsa(key));
			}
		}
		#[cfg(feature = "ecdsa")]
		{
			if let Ok(key) = EcPrivateKey::from_pkcs8_der(der) {
				return Ok(PrivateKey::Ec(key));
			}
		}
		#[cfg(feature = "rsa")]
		{
			if let Ok(key) = rsa_private_pkcs1(der) {
				return Ok(key);
			}
		}
		Err(Error::invalid_key("unsupported private key format"))
	}

	/// Borrow the key as a [`Key`].
	pub fn as_key(&self) -> Key<'_> {
		match self {
			#[cfg(feature = "rsa")]
			PrivateKey::Rsa(key) => Key::RsaPrivate(key),
			#[cfg(feature = "ecdsa")]
			PrivateKey::Ec(key) => Key::EcPrivate(key),
		}
	}
}

#[cfg(any(feature = "rsa", feature = "ecdsa"))]
impl PublicKey {
	/// Load the first supported public key from PEM data.
	///
	/// Recognized blocks are `RSA PUBLIC KEY` (PKCS#1) and `PUBLIC KEY` (SubjectPublicKeyInfo, RSA or EC).
	pub fn from_pem(pem_bytes: &[u8]) -> Result<Self> {
		let blocks = pem::parse_many(pem_bytes).map_err(|e| Error::invalid_key(format!("pem parse error: {}", e)))?;
		for block in blocks {
			let key = match block.tag() {
				#[cfg(feature = "rsa")]
				"RSA PUBLIC KEY" => rsa_public_pkcs1(block.contents()),
				"PUBLIC KEY"     => Self::from_der(block.contents()),
				_                => continue,
			};
			if let Ok(key) = key {
				return Ok(key);
			}
		}
		Err(Error::invalid_key("unsupported public key format"))
	}

	/// Load a DER encoded public key.
	///
	/// SubjectPublicKeyInfo is tried first for all families, then PKCS#1 for RSA.
	pub fn from_der(der: &[u8]) -> Result<Self> {
		#[cfg(feature = "rsa")]
		{
			use pkcs8::DecodePublicKey;
			if let Ok(key) = RsaPublicKey::from_public_key_der(der) {
				return Ok(PublicKey::Rsa(key));
			}
		}
		#[cfg(feature = "ecdsa")]
		{
			if let Ok(key) = EcPublicKey::from_public_key_der(der) {
				return Ok(PublicKey::Ec(key));
			}
		}
		#[cfg(feature = "rsa")]
		{
			if let Ok(key) = rsa_public_pkcs1(der) {
				return Ok(key);
			}
		}
		Err(Error::invalid_key("unsupported public key format"))
	}

	/// Borrow the key as a [`Key`].
	pub fn as_key(&self) -> Key<'_> {
		match self {
			#[cfg(feature = "rsa")]
			PublicKey::Rsa(key) => Key::RsaPublic(key),
			#[cfg(feature = "ecdsa")]
			PublicKey::Ec(key) => Key::EcPublic(key),
		}
	}
}

#[cfg(any(feature = "rsa", feature = "ecdsa"))]
impl fmt::Debug for PrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "PrivateKey({})", self.as_key().describe())
	}
}

#[cfg(any(feature = "rsa", feature = "ecdsa"))]
impl fmt::Debug for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "PublicKey({})", self.as_key().describe())
	}
}

#[cfg(feature = "rsa")]
fn rsa_private_pkcs1(der: &[u8]) -> Result<PrivateKey> {
	use rsa::pkcs1::DecodeRsaPrivateKey;
	let key = RsaPrivateKey::from_pkcs1_der(der)
		.map_err(|e| Error::invalid_key(format!("rsa pkcs1 private key error: {}", e)))?;
	Ok(PrivateKey::Rsa(key))
}

#[cfg(feature = "rsa")]
fn rsa_public_pkcs1(der: &[u8]) -> Result<PublicKey> {
	use rsa::pkcs1::DecodeRsaPublicKey;
	let key = RsaPublicKey::from_pkcs1_der(der)
		.map_err(|e| Error::invalid_key(format!("rsa pkcs1 public key error: {}", e)))?;
	Ok(PublicKey::Rsa(key))
}

#[cfg(test)]
mod test {
	use super::*;
	use assert2::assert;

	#[test]
	fn test_secret_family() {
		let key = Key::from(&b"secret"[..]);
		assert!(key.family() == AlgorithmFamily::Hmac);
		assert!(format!("{:?}", key) == "Key(shared secret)");
	}

	#[test]
	#[cfg(feature = "rsa")]
	fn test_load_rsa() {
		let pkcs8 = PrivateKey::from_pem(include_bytes!("../tests/keys/rsa2048.pem")).unwrap();
		let pkcs1 = PrivateKey::from_pem(include_bytes!("../tests/keys/rsa2048.pkcs1.pem")).unwrap();
		let public = PublicKey::from_pem(include_bytes!("../tests/keys/rsa2048.pub.pem")).unwrap();

		assert!(pkcs8.as_key().family() == AlgorithmFamily::Rsa);
		assert!(pkcs1.as_key().family() == AlgorithmFamily::Rsa);
		assert!(public.as_key().family() == AlgorithmFamily::Rsa);
		match (&pkcs8, &pkcs1, &public) {
			(PrivateKey::Rsa(a), PrivateKey::Rsa(b), PublicKey::Rsa(c)) => {
				assert!(a.to_public_key() == b.to_public_key());
				assert!(&a.to_public_key() == c);
			},
			_ => panic!("expected RSA keys"),
		}
	}

	#[test]
	#[cfg(feature = "ecdsa")]
	fn test_load_ec_curves() {
		let cases: [(&[u8], &[u8], EcCurve); 3] = [
			(include_bytes!("../tests/keys/ec_p256.pem"), include_bytes!("../tests/keys/ec_p256.pub.pem"), EcCurve::P256),
			(include_bytes!("../tests/keys/ec_p384.pem"), include_bytes!("../tests/keys/ec_p384.pub.pem"), EcCurve::P384),
			(include_bytes!("../tests/keys/ec_p521.pem"), include_bytes!("../tests/keys/ec_p521.pub.pem"), EcCurve::P521),
		];

		for (private, public, curve) in cases.iter() {
			let private = PrivateKey::from_pem(private).unwrap();
			let public = PublicKey::from_pem(public).unwrap();
			match (&private, &public) {
				(PrivateKey::Ec(private), PublicKey::Ec(public)) => {
					assert!(private.curve() == *curve);
					assert!(public.curve() == *curve);
				},
				_ => panic!("expected EC keys for {}", curve),
			}
		}
	}

	#[test]
	fn test_load_garbage() {
		#[cfg(any(feature = "rsa", feature = "ecdsa"))]
		{
			use crate::ErrorKind;
			assert!(PrivateKey::from_pem(b"not a key").unwrap_err().kind() == ErrorKind::InvalidKey);
			assert!(PublicKey::from_der(b"\x30\x03\x02\x01\x01").unwrap_err().kind() == ErrorKind::InvalidKey);
			let wrong_tag = "-----BEGIN CERTIFICATE-----\nMAA=\n-----END CERTIFICATE-----\n";
			assert!(PublicKey::from_pem(wrong_tag.as_bytes()).unwrap_err().kind() == ErrorKind::InvalidKey);
		}
	}
}
