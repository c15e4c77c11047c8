//! The JWS message container.

use std::str::FromStr;

use crate::compact;
use crate::{base64url, Error, Header, Payload, Result, Signer, Verifier};

/// The lifecycle state of a [`Jws`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum JwsState {
	/// Created locally and not signed yet.
	Unsigned,

	/// Signed locally.
	Signed,

	/// Parsed from a compact serialization. The signature has not necessarily been verified.
	Parsed,
}

/// A JWS message: a header, a payload and (once signed or parsed) a signature.
///
/// A `Jws` is immutable. Signing returns a new message and leaves the original untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Jws {
	header    : Header,
	payload   : Payload,
	signature : Option<Vec<u8>>,
	state     : JwsState,
}

impl Jws {
	/// Create a new unsigned message.
	pub fn new(header: Header, payload: Payload) -> Self {
		Self { header, payload, signature: None, state: JwsState::Unsigned }
	}

	/// Sign the message.
	///
	/// The `alg` parameter of the header must name the algorithm of the signer,
	/// otherwise this fails with [`ErrorKind::AlgorithmMismatch`](crate::ErrorKind::AlgorithmMismatch).
	/// Signing a message that is already signed or parsed replaces the signature.
	pub fn sign<S: Signer + ?Sized>(&self, signer: &S) -> Result<Self> {
		let algorithm = signer.algorithm();
		if self.header.algorithm_name() != algorithm.name() {
			log::debug!("refusing to sign: header names {:?}, signer implements {}", self.header.algorithm_name(), algorithm);
			return Err(Error::algorithm_mismatch(format!("header names {:?}, signer implements {}", self.header.algorithm_name(), algorithm)));
		}
		if self.payload.is_empty() {
			return Err(Error::invalid_argument("payload must not be empty"));
		}

		let signing_input = compact::signing_input(&self.header, &self.payload)?;
		let signature = signer.sign(&signing_input)?;
		log::debug!("signed message with {}", algorithm);

		Ok(Self {
			header    : self.header.clone(),
			payload   : self.payload.clone(),
			signature : Some(signature),
			state     : JwsState::Signed,
		})
	}

	/// Serialize the message in compact form.
	///
	/// An unencoded payload (`b64: false`) is always detached: the payload part is left empty,
	/// even if the message was parsed from a form with an attached payload.
	/// Such a message must be read back with [`parse_detached`](#method.parse_detached), not [`parse`](#method.parse).
	///
	/// Fails with [`ErrorKind::NotYetSigned`](crate::ErrorKind::NotYetSigned) if the message has no signature.
	pub fn serialize(&self) -> Result<String> {
		let signature = self.signature.as_deref().ok_or_else(Error::not_yet_signed)?;
		compact::serialize(&self.header, &self.payload, signature)
	}

	/// Parse a message in compact form.
	///
	/// The signature is not verified: use [`verify`](#method.verify) with a verifier of your choosing.
	pub fn parse(data: &str) -> Result<Self> {
		Self::parse_bytes(data.as_bytes())
	}

	/// Parse a message in compact form from raw bytes.
	pub fn parse_bytes(data: &[u8]) -> Result<Self> {
		let parts = compact::split_encoded_parts(data)?;
		Self::from_parts(&parts, None)
	}

	/// Parse a message in compact form with a detached payload.
	///
	/// The payload part of the message is expected to be empty, and the detached payload is used instead.
	/// If the message does carry a payload, that payload is used and the detached payload is ignored.
	pub fn parse_detached(data: &str, payload: impl Into<Payload>) -> Result<Self> {
		let parts = compact::split_detached_parts(data.as_bytes())?;
		Self::from_parts(&parts, Some(payload.into()))
	}

	fn from_parts(parts: &compact::CompactSerializedParts, detached: Option<Payload>) -> Result<Self> {
		let (header, signature) = parts.decode_header()?;
		let payload = match detached {
			Some(payload) if parts.payload.is_empty() => payload,
			_ if header.base64_encoded_payload()? => Payload::new(base64url::decode(parts.payload)?),
			_ => Payload::new(parts.payload),
		};

		Ok(Self { header, payload, signature: Some(signature), state: JwsState::Parsed })
	}

	/// Verify the signature of the message.
	///
	/// The verifier is chosen by the caller and is never derived from the message itself.
	/// If the `alg` parameter of the header names another algorithm than the verifier implements,
	/// the message is rejected with `Ok(false)`.
	///
	/// Fails with [`ErrorKind::NotYetSigned`](crate::ErrorKind::NotYetSigned) if the message has no signature.
	pub fn verify<V: Verifier + ?Sized>(&self, verifier: &V) -> Result<bool> {
		let signature = self.signature.as_deref().ok_or_else(Error::not_yet_signed)?;

		let algorithm = verifier.algorithm();
		if self.header.algorithm_name() != algorithm.name() {
			log::debug!("rejecting message: header names {:?}, verifier implements {}", self.header.algorithm_name(), algorithm);
			return Ok(false);
		}

		let signing_input = compact::signing_input(&self.header, &self.payload)?;
		let valid = verifier.verify(&signing_input, signature)?;
		log::debug!("{} signature verification {}", algorithm, if valid { "succeeded" } else { "failed" });
		Ok(valid)
	}

	pub fn header(&self) -> &Header {
		&self.header
	}

	pub fn payload(&self) -> &Payload {
		&self.payload
	}

	/// The raw signature bytes, if the message is signed or parsed.
	pub fn signature(&self) -> Option<&[u8]> {
		self.signature.as_deref()
	}

	pub fn state(&self) -> JwsState {
		self.state
	}

	/// Split the message into its header, payload and signature.
	pub fn into_parts(self) -> (Header, Payload, Option<Vec<u8>>) {
		(self.header, self.payload, self.signature)
	}
}

impl FromStr for Jws {
	type Err = Error;

	fn from_str(data: &str) -> Result<Self> {
		Self::parse(data)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::hmac::{HmacSigner, HmacVerifier};
	use crate::{json_object, ErrorKind, SignatureAlgorithm};
	use assert2::assert;

	fn hs256_signer() -> HmacSigner<&'static [u8]> {
		HmacSigner::new(SignatureAlgorithm::HS256, &b"0123456789abcdef0123456789abcdef"[..]).unwrap()
	}

	fn hs256_verifier() -> HmacVerifier<&'static [u8]> {
		HmacVerifier::new(SignatureAlgorithm::HS256, &b"0123456789abcdef0123456789abcdef"[..]).unwrap()
	}

	#[test]
	fn test_states() {
		let unsigned = Jws::new(Header::new(SignatureAlgorithm::HS256), Payload::from("foo"));
		assert!(unsigned.state() == JwsState::Unsigned);
		assert!(unsigned.signature() == None);

		let signed = unsigned.sign(&hs256_signer()).unwrap();
		assert!(signed.state() == JwsState::Signed);
		assert!(unsigned.state() == JwsState::Unsigned);
		assert!(signed.signature().map(|x| x.len()) == Some(32));

		let parsed = Jws::parse(&signed.serialize().unwrap()).unwrap();
		assert!(parsed.state() == JwsState::Parsed);
		assert!(parsed.header() == signed.header());
		assert!(parsed.payload() == signed.payload());
		assert!(parsed.signature() == signed.signature());
	}

	#[test]
	fn test_unsigned() {
		let unsigned = Jws::new(Header::new(SignatureAlgorithm::HS256), Payload::from("foo"));
		assert!(unsigned.serialize().unwrap_err().kind() == ErrorKind::NotYetSigned);
		assert!(unsigned.verify(&hs256_verifier()).unwrap_err().kind() == ErrorKind::NotYetSigned);
	}

	#[test]
	fn test_sign_algorithm_mismatch() {
		let jws = Jws::new(Header::new(SignatureAlgorithm::HS384), Payload::from("foo"));
		assert!(jws.sign(&hs256_signer()).unwrap_err().kind() == ErrorKind::AlgorithmMismatch);

		let jws = Jws::new(Header::from_params(json_object!{"alg": "none"}).unwrap(), Payload::from("foo"));
		assert!(jws.sign(&hs256_signer()).unwrap_err().kind() == ErrorKind::AlgorithmMismatch);
	}

	#[test]
	fn test_sign_empty_payload() {
		let jws = Jws::new(Header::new(SignatureAlgorithm::HS256), Payload::new(Vec::new()));
		assert!(jws.sign(&hs256_signer()).unwrap_err().kind() == ErrorKind::InvalidArgument);
	}

	#[test]
	fn test_verify_pins_algorithm() {
		let hs512 = HmacSigner::new(SignatureAlgorithm::HS512, &b"0123456789abcdef0123456789abcdef"[..]).unwrap();
		let signed = Jws::new(Header::new(SignatureAlgorithm::HS512), Payload::from("foo")).sign(&hs512).unwrap();

		// Same key, but the verifier implements another algorithm.
		assert!(signed.verify(&hs256_verifier()).unwrap() == false);
	}

	#[test]
	fn test_verify_unknown_algorithm() {
		let token = format!("{}.Zm9v.c2ln", base64url::encode(br#"{"alg":"none"}"#));
		let parsed = Jws::parse(&token).unwrap();
		assert!(parsed.header().algorithm_name() == "none");
		assert!(parsed.verify(&hs256_verifier()).unwrap() == false);
	}

	#[test]
	fn test_parse_invalid() {
		assert!(Jws::parse("abc.def").unwrap_err().kind() == ErrorKind::InvalidSerialization);
		assert!(Jws::parse("").unwrap_err().kind() == ErrorKind::InvalidSerialization);
		assert!("a.b.c.d".parse::<Jws>().unwrap_err().kind() == ErrorKind::InvalidSerialization);
		assert!(Jws::parse("eyJhbGciOiJIUzI1NiJ9.Zm9v.c2l=").unwrap_err().kind() == ErrorKind::InvalidSerialization);
		assert!(Jws::parse("bm90IGpzb24.Zm9v.c2ln").unwrap_err().kind() == ErrorKind::InvalidJson);
		assert!(Jws::parse("eyJ0eXAiOiJKV1QifQ.Zm9v.c2ln").unwrap_err().kind() == ErrorKind::MissingHeaderParam);
	}

	#[test]
	fn test_unknown_header_members_survive() {
		let header = Header::from_params(json_object!{"alg": "HS256", "x-custom": {"a": [1, 2, 3]}}).unwrap();
		let signed = Jws::new(header.clone(), Payload::from("foo")).sign(&hs256_signer()).unwrap();
		let parsed: Jws = signed.serialize().unwrap().parse().unwrap();
		assert!(parsed.header() == &header);
		assert!(parsed.verify(&hs256_verifier()).unwrap() == true);
	}

	#[test]
	fn test_unencoded_detached_payload() {
		let header = Header::new(SignatureAlgorithm::HS256).with_unencoded_payload().unwrap();
		let signed = Jws::new(header, Payload::from("$.02")).sign(&hs256_signer()).unwrap();

		let token = signed.serialize().unwrap();
		let parts: Vec<&str> = token.split('.').collect();
		assert!(parts.len() == 3);
		assert!(parts[1] == "");

		// The payload is not part of the message, so it can not be parsed without it.
		assert!(Jws::parse(&token).unwrap_err().kind() == ErrorKind::InvalidSerialization);

		let parsed = Jws::parse_detached(&token, "$.02").unwrap();
		assert!(parsed.payload().as_bytes() == b"$.02");
		assert!(parsed.verify(&hs256_verifier()).unwrap() == true);

		let parsed = Jws::parse_detached(&token, "$.03").unwrap();
		assert!(parsed.verify(&hs256_verifier()).unwrap() == false);
	}

	#[test]
	fn test_attached_unencoded_payload_is_serialized_detached() {
		let header = Header::new(SignatureAlgorithm::HS256).with_unencoded_payload().unwrap();
		let signed = Jws::new(header.clone(), Payload::from("raw")).sign(&hs256_signer()).unwrap();
		let signature = base64url::encode(signed.signature().unwrap());

		// An unencoded payload without periods can be attached.
		let attached = format!("{}.raw.{}", header.encoded(), signature);
		let parsed = Jws::parse(&attached).unwrap();
		assert!(parsed.payload().as_bytes() == b"raw");
		assert!(parsed.verify(&hs256_verifier()).unwrap() == true);

		let token = parsed.serialize().unwrap();
		assert!(token == format!("{}..{}", header.encoded(), signature));
		assert!(Jws::parse(&token).unwrap_err().kind() == ErrorKind::InvalidSerialization);

		let reparsed = Jws::parse_detached(&token, parsed.payload().clone()).unwrap();
		assert!(reparsed.payload() == parsed.payload());
		assert!(reparsed.verify(&hs256_verifier()).unwrap() == true);
	}

	#[test]
	fn test_encoded_detached_payload() {
		let signed = Jws::new(Header::new(SignatureAlgorithm::HS256), Payload::from("foo")).sign(&hs256_signer()).unwrap();
		let token = signed.serialize().unwrap();
		let parts: Vec<&str> = token.split('.').collect();
		let detached = format!("{}..{}", parts[0], parts[2]);

		let parsed = Jws::parse_detached(&detached, "foo").unwrap();
		assert!(parsed.verify(&hs256_verifier()).unwrap() == true);

		// An embedded payload wins over the detached payload.
		let parsed = Jws::parse_detached(&token, "bar").unwrap();
		assert!(parsed.payload().as_bytes() == b"foo");
	}

	#[test]
	fn test_into_parts() {
		let signed = Jws::new(Header::new(SignatureAlgorithm::HS256), Payload::from("foo")).sign(&hs256_signer()).unwrap();
		let (header, payload, signature) = signed.clone().into_parts();
		assert!(&header == signed.header());
		assert!(payload.as_bytes() == b"foo");
		assert!(signature.as_deref() == signed.signature());
	}
}
