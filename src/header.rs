//! Types for working with message headers.

use serde::de::DeserializeOwned;

use crate::{base64url, Error, JsonObject, JsonValue, Result, SignatureAlgorithm};

/// The protected header of a JWS message.
///
/// A header is a JSON object with at least a string `alg` parameter.
/// The serialized form is computed once when the header is created, or kept verbatim when it is parsed,
/// so the signing input is always computed from exactly the same bytes.
///
/// Headers are immutable: the `with*` functions return a new header.
#[derive(Clone, Debug)]
pub struct Header {
	params : JsonObject,
	raw    : Vec<u8>,
}

impl Header {
	/// Create a header with only the `alg` parameter.
	pub fn new(algorithm: SignatureAlgorithm) -> Self {
		let mut params = JsonObject::new();
		params.insert("alg".to_string(), JsonValue::from(algorithm.name()));
		Self::from_valid_params(params)
	}

	/// Create a header from a JSON object.
	///
	/// Fails if the `alg` parameter is missing or not a string.
	pub fn from_params(params: JsonObject) -> Result<Self> {
		check_alg(&params)?;
		Ok(Self::from_valid_params(params))
	}

	/// Parse a header from its JSON serialization.
	///
	/// The bytes are kept as they are, including whitespace and member order.
	pub fn from_json(data: impl Into<Vec<u8>>) -> Result<Self> {
		let raw = data.into();
		let params: JsonObject = serde_json::from_slice(&raw)?;
		check_alg(&params)?;
		Ok(Self { params, raw })
	}

	fn from_valid_params(params: JsonObject) -> Self {
		// A map with string keys always serializes.
		let raw = JsonValue::Object(params.clone()).to_string().into_bytes();
		Self { params, raw }
	}

	/// The JSON serialization of the header.
	pub fn as_bytes(&self) -> &[u8] {
		&self.raw
	}

	/// The base64url encoded JSON serialization of the header.
	pub fn encoded(&self) -> String {
		base64url::encode(&self.raw)
	}

	/// All header parameters.
	pub fn params(&self) -> &JsonObject {
		&self.params
	}

	/// The signature algorithm named by the `alg` parameter.
	///
	/// Fails with [`ErrorKind::AlgorithmNotSupported`](crate::ErrorKind::AlgorithmNotSupported) if the name is not a known algorithm.
	pub fn algorithm(&self) -> Result<SignatureAlgorithm> {
		self.algorithm_name().parse()
	}

	/// The raw value of the `alg` parameter.
	pub fn algorithm_name(&self) -> &str {
		self.params.get("alg").and_then(JsonValue::as_str).unwrap_or_default()
	}

	/// The `kid` (key ID) parameter.
	pub fn key_id(&self) -> Result<Option<&str>> {
		self.get_str("kid")
	}

	/// The `typ` (media type) parameter.
	pub fn media_type(&self) -> Result<Option<&str>> {
		self.get_str("typ")
	}

	/// The `cty` (content type) parameter.
	pub fn content_type(&self) -> Result<Option<&str>> {
		self.get_str("cty")
	}

	/// The `jku` (JWK set URL) parameter.
	pub fn jwk_set_url(&self) -> Result<Option<&str>> {
		self.get_str("jku")
	}

	/// The `jwk` parameter, as raw JSON.
	pub fn jwk(&self) -> Option<&JsonValue> {
		self.get("jwk")
	}

	/// The `x5u` (X.509 URL) parameter.
	pub fn x509_url(&self) -> Result<Option<&str>> {
		self.get_str("x5u")
	}

	/// The `x5c` (X.509 certificate chain) parameter.
	pub fn x509_chain(&self) -> Result<Option<Vec<String>>> {
		self.parse("x5c")
	}

	/// The `x5t` (X.509 SHA-1 thumbprint) parameter.
	pub fn x509_sha1_thumbprint(&self) -> Result<Option<&str>> {
		self.get_str("x5t")
	}

	/// The `x5t#S256` (X.509 SHA-256 thumbprint) parameter.
	pub fn x509_sha256_thumbprint(&self) -> Result<Option<&str>> {
		self.get_str("x5t#S256")
	}

	/// The `crit` (critical) parameter.
	pub fn critical(&self) -> Result<Option<Vec<String>>> {
		self.parse("crit")
	}

	/// Check if the payload is base64url encoded, as defined in [RFC 7797](https://tools.ietf.org/html/rfc7797).
	///
	/// The `b64` parameter is only honoured if it is listed in the `crit` parameter.
	pub fn base64_encoded_payload(&self) -> Result<bool> {
		let critical = self.critical()?.unwrap_or_default();
		if !critical.iter().any(|name| name == "b64") {
			return Ok(true);
		}
		Ok(self.parse("b64")?.unwrap_or(true))
	}

	/// Get a parameter.
	pub fn get(&self, name: &str) -> Option<&JsonValue> {
		self.params.get(name)
	}

	/// Get a required parameter.
	///
	/// This is almost identical to [`get`](#method.get), except that this function returns a properly formatted error instead of an empty optional.
	pub fn get_required(&self, name: &str) -> Result<&JsonValue> {
		self.get(name).ok_or_else(|| Error::missing_header_param(name))
	}

	/// Get and deserialize a parameter.
	///
	/// Deserialization errors are reported as [`ErrorKind::InvalidHeaderParam`](crate::ErrorKind::InvalidHeaderParam).
	pub fn parse<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
		match self.get(name) {
			None => Ok(None),
			Some(value) => Ok(Some(deserialize_param(name, value)?)),
		}
	}

	/// Get and deserialize a required parameter.
	pub fn parse_required<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
		deserialize_param(name, self.get_required(name)?)
	}

	fn get_str(&self, name: &str) -> Result<Option<&str>> {
		match self.get(name) {
			None => Ok(None),
			Some(value) => value.as_str().map(Some).ok_or_else(|| Error::invalid_header_param(name)),
		}
	}

	/// Create a new header with a parameter added or replaced.
	///
	/// Fails if the result would not have a string `alg` parameter.
	pub fn with(&self, name: impl Into<String>, value: impl Into<JsonValue>) -> Result<Self> {
		let mut params = self.params.clone();
		params.insert(name.into(), value.into());
		Self::from_params(params)
	}

	/// Create a new header with the `kid` parameter set.
	pub fn with_key_id(&self, key_id: impl Into<String>) -> Self {
		self.with_string("kid", key_id.into())
	}

	/// Create a new header with the `typ` parameter set.
	pub fn with_media_type(&self, media_type: impl Into<String>) -> Self {
		self.with_string("typ", media_type.into())
	}

	/// Create a new header with the `cty` parameter set.
	pub fn with_content_type(&self, content_type: impl Into<String>) -> Self {
		self.with_string("cty", content_type.into())
	}

	/// Create a new header with the `crit` parameter set.
	pub fn with_critical<I, S>(&self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let names: Vec<JsonValue> = names.into_iter().map(|name| JsonValue::String(name.into())).collect();
		let mut params = self.params.clone();
		params.insert("crit".to_string(), JsonValue::Array(names));
		Self::from_valid_params(params)
	}

	/// Create a new header for an unencoded, detached payload.
	///
	/// This sets `b64` to false and adds it to the `crit` parameter.
	pub fn with_unencoded_payload(&self) -> Result<Self> {
		let mut critical = self.critical()?.unwrap_or_default();
		if !critical.iter().any(|name| name == "b64") {
			critical.push("b64".to_string());
		}
		let mut params = self.with_critical(critical).params;
		params.insert("b64".to_string(), JsonValue::Bool(false));
		Ok(Self::from_valid_params(params))
	}

	fn with_string(&self, name: &str, value: String) -> Self {
		let mut params = self.params.clone();
		params.insert(name.to_string(), JsonValue::String(value));
		Self::from_valid_params(params)
	}
}

impl PartialEq for Header {
	fn eq(&self, other: &Self) -> bool {
		self.params == other.params
	}
}

impl Eq for Header {}

fn check_alg(params: &JsonObject) -> Result<()> {
	match params.get("alg") {
		None => Err(Error::missing_header_param("alg")),
		Some(JsonValue::String(_)) => Ok(()),
		Some(_) => Err(Error::invalid_header_param("alg")),
	}
}

fn deserialize_param<T: DeserializeOwned>(name: &str, value: &JsonValue) -> Result<T> {
	T::deserialize(value).map_err(|_| Error::invalid_header_param(name))
}
