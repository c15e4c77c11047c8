//! Message payloads and JWT claims.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{Error, JsonObject, JsonValue, Result};

/// The payload of a JWS message.
///
/// The payload is an opaque byte sequence.
/// It is never reinterpreted or normalized: a signature covers exactly these bytes.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Payload(Vec<u8>);

impl Payload {
	/// Create a payload from raw bytes.
	pub fn new(data: impl Into<Vec<u8>>) -> Self {
		Self(data.into())
	}

	/// Create a payload by serializing a value as JSON.
	pub fn from_json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
		Ok(Self(serde_json::to_vec(value)?))
	}

	/// Create a payload from a set of claims.
	pub fn from_claims(claims: &Claims) -> Result<Self> {
		Self::from_json(&claims.members)
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Parse the payload as JSON.
	pub fn parse_json<T: DeserializeOwned>(&self) -> Result<T> {
		Ok(serde_json::from_slice(&self.0)?)
	}

	/// Parse the payload as a JSON object of claims.
	pub fn claims(&self) -> Result<Claims> {
		Ok(Claims { members: self.parse_json()? })
	}
}

impl AsRef<[u8]> for Payload {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl From<Vec<u8>> for Payload {
	fn from(data: Vec<u8>) -> Self {
		Self(data)
	}
}

impl From<&[u8]> for Payload {
	fn from(data: &[u8]) -> Self {
		Self(data.to_vec())
	}
}

impl From<&str> for Payload {
	fn from(data: &str) -> Self {
		Self(data.as_bytes().to_vec())
	}
}

impl From<String> for Payload {
	fn from(data: String) -> Self {
		Self(data.into_bytes())
	}
}

/// A set of claims, as carried in the payload of a JSON Web Token.
///
/// The registered claims from [RFC 7519 section 4.1](https://tools.ietf.org/html/rfc7519#section-4.1)
/// have typed accessors. All other members are passed through untouched.
/// Claims are only inspected, never validated: checking expiration or audience is up to the caller.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Claims {
	members: JsonObject,
}

impl Claims {
	/// Create an empty set of claims.
	pub fn new() -> Self {
		Self::default()
	}

	/// Wrap a JSON object as claims.
	pub fn from_object(members: JsonObject) -> Self {
		Self { members }
	}

	/// All claims.
	pub fn members(&self) -> &JsonObject {
		&self.members
	}

	pub fn into_object(self) -> JsonObject {
		self.members
	}

	/// The `iss` (issuer) claim.
	pub fn issuer(&self) -> Result<Option<&str>> {
		self.get_str("iss")
	}

	/// The `sub` (subject) claim.
	pub fn subject(&self) -> Result<Option<&str>> {
		self.get_str("sub")
	}

	/// The `aud` (audience) claim.
	///
	/// The audience may be a single string or an array of strings.
	/// Either way, it is returned as a list.
	pub fn audience(&self) -> Result<Option<Vec<String>>> {
		match self.members.get("aud") {
			None => Ok(None),
			Some(JsonValue::String(audience)) => Ok(Some(vec![audience.clone()])),
			Some(value) => Vec::<String>::deserialize(value)
				.map(Some)
				.map_err(|_| invalid_claim("aud")),
		}
	}

	/// The `exp` (expiration time) claim, in seconds since the Unix epoch.
	pub fn expiration(&self) -> Result<Option<i64>> {
		self.get_numeric_date("exp")
	}

	/// The `nbf` (not before) claim, in seconds since the Unix epoch.
	pub fn not_before(&self) -> Result<Option<i64>> {
		self.get_numeric_date("nbf")
	}

	/// The `iat` (issued at) claim, in seconds since the Unix epoch.
	pub fn issued_at(&self) -> Result<Option<i64>> {
		self.get_numeric_date("iat")
	}

	/// The `jti` (JWT ID) claim.
	pub fn jwt_id(&self) -> Result<Option<&str>> {
		self.get_str("jti")
	}

	/// Get a claim.
	pub fn get(&self, name: &str) -> Option<&JsonValue> {
		self.members.get(name)
	}

	/// Add or replace a claim.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.members.insert(name.into(), value.into());
		self
	}

	/// Serialize the claims as JSON.
	pub fn to_json(&self) -> Result<Vec<u8>> {
		Ok(serde_json::to_vec(&self.members)?)
	}

	/// Parse claims from a JSON object.
	pub fn from_json(data: &[u8]) -> Result<Self> {
		Ok(Self { members: serde_json::from_slice(data)? })
	}

	fn get_str(&self, name: &str) -> Result<Option<&str>> {
		match self.members.get(name) {
			None => Ok(None),
			Some(value) => value.as_str().map(Some).ok_or_else(|| invalid_claim(name)),
		}
	}

	fn get_numeric_date(&self, name: &str) -> Result<Option<i64>> {
		match self.members.get(name) {
			None => Ok(None),
			Some(value) => value.as_i64()
				.or_else(|| value.as_f64().filter(|x| x.is_finite()).map(|x| x.trunc() as i64))
				.map(Some)
				.ok_or_else(|| invalid_claim(name)),
		}
	}
}

fn invalid_claim(name: &str) -> Error {
	Error::invalid_json(format!("invalid type for claim: {}", name))
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{json_object, ErrorKind};
	use assert2::assert;

	#[test]
	fn test_payload_is_opaque() {
		let payload = Payload::new(&b" {\"b\": 1,\n\"a\": 2} "[..]);
		assert!(payload.as_bytes() == b" {\"b\": 1,\n\"a\": 2} ");
		assert!(payload.len() == 18);
		assert!(payload.parse_json::<JsonValue>().unwrap() == serde_json::json!({"a": 2, "b": 1}));
		assert!(Payload::from("text").parse_json::<JsonValue>().unwrap_err().kind() == ErrorKind::InvalidJson);
	}

	#[test]
	fn test_registered_claims() {
		let claims = Claims::new()
			.with("iss", "joe")
			.with("sub", "alice")
			.with("aud", "service")
			.with("exp", 1300819380)
			.with("nbf", 1300819000.5)
			.with("iat", 1300818000)
			.with("jti", "id-1")
			.with("http://example.com/is_root", true);

		assert!(claims.issuer().unwrap() == Some("joe"));
		assert!(claims.subject().unwrap() == Some("alice"));
		assert!(claims.audience().unwrap() == Some(vec!["service".to_string()]));
		assert!(claims.expiration().unwrap() == Some(1300819380));
		assert!(claims.not_before().unwrap() == Some(1300819000));
		assert!(claims.issued_at().unwrap() == Some(1300818000));
		assert!(claims.jwt_id().unwrap() == Some("id-1"));
		assert!(claims.get("http://example.com/is_root") == Some(&JsonValue::Bool(true)));
	}

	#[test]
	fn test_audience_array() {
		let claims = Claims::from_object(json_object!{"aud": ["a", "b"]});
		assert!(claims.audience().unwrap() == Some(vec!["a".to_string(), "b".to_string()]));

		let claims = Claims::from_object(json_object!{"aud": ["a", 1]});
		assert!(claims.audience().unwrap_err().kind() == ErrorKind::InvalidJson);
	}

	#[test]
	fn test_wrong_claim_types() {
		let claims = Claims::from_object(json_object!{"iss": 1, "exp": "tomorrow"});
		assert!(claims.issuer().unwrap_err().kind() == ErrorKind::InvalidJson);
		assert!(claims.expiration().unwrap_err().kind() == ErrorKind::InvalidJson);
		assert!(claims.subject().unwrap() == None);
	}

	#[test]
	fn test_claims_payload() {
		let claims  = Claims::new().with("iss", "joe").with("custom", json_object!{"nested": [1, 2]});
		let payload = Payload::from_claims(&claims).unwrap();
		assert!(payload.as_bytes() == br#"{"custom":{"nested":[1,2]},"iss":"joe"}"#);
		assert!(payload.claims().unwrap() == claims);
		assert!(Claims::from_json(&claims.to_json().unwrap()).unwrap() == claims);

		assert!(Payload::from("[1]").claims().unwrap_err().kind() == ErrorKind::InvalidJson);
	}
}
