//! JWS Compact Serialization implementation.
//!
//! A JWS Compact Serialization message contains three base64url encoded parts separated by period '.' characters:
//!   - header
//!   - payload
//!   - signature
//!
//! The signature is computed over the signing input, which is the encoded header and the encoded payload separated by a period.
//! With an unencoded payload ([RFC 7797](https://tools.ietf.org/html/rfc7797)) the raw payload bytes take the place of the encoded payload
//! in the signing input, and the payload part of the message is left empty (a detached payload).

use crate::{base64url, Error, Header, Payload, Result};

/// The individual (still encoded) parts of a JWS Compact Serialized message.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CompactSerializedParts<'a> {
	pub header    : &'a [u8],
	pub payload   : &'a [u8],
	pub signature : &'a [u8],
}

/// Split the parts of a JWS Compact Serialization message.
///
/// The message must consist of exactly three non-empty parts.
pub fn split_encoded_parts(data: &[u8]) -> Result<CompactSerializedParts> {
	let parts = split_parts(data)?;
	if parts.payload.is_empty() {
		return Err(Error::invalid_serialization("encoded message contains an empty payload"));
	}
	Ok(parts)
}

/// Split the parts of a JWS Compact Serialization message that may have a detached payload.
///
/// This is identical to [`split_encoded_parts`], except that the payload part may be empty.
pub fn split_detached_parts(data: &[u8]) -> Result<CompactSerializedParts> {
	split_parts(data)
}

fn split_parts(data: &[u8]) -> Result<CompactSerializedParts> {
	// Split data into parts.
	let mut parts = data.splitn(4, |&c| c == b'.');

	let header    = parts.next().filter(|x| !x.is_empty()).ok_or_else(|| Error::invalid_serialization("encoded message does not contain a header"))?;
	let payload   = parts.next().ok_or_else(|| Error::invalid_serialization("encoded message does not contain a payload"))?;
	let signature = parts.next().filter(|x| !x.is_empty()).ok_or_else(|| Error::invalid_serialization("encoded message does not contain a signature"))?;

	// Make sure there are no additional message parts in the input.
	if parts.next().is_some() {
		return Err(Error::invalid_serialization("encoded message contains an additional field after the signature"));
	}

	Ok(CompactSerializedParts { header, payload, signature })
}

/// Encode a payload for use in the signing input, as indicated by the header.
///
/// A base64url encoded payload is returned encoded, an unencoded payload is returned as is.
pub fn encode_payload(header: &Header, payload: &Payload) -> Result<Vec<u8>> {
	if header.base64_encoded_payload()? {
		Ok(base64url::encode(payload.as_bytes()).into_bytes())
	} else {
		Ok(payload.as_bytes().to_vec())
	}
}

/// Compute the signing input for a header and payload.
pub fn signing_input(header: &Header, payload: &Payload) -> Result<Vec<u8>> {
	let encoded_header  = header.encoded();
	let encoded_payload = encode_payload(header, payload)?;

	let mut buffer = Vec::with_capacity(encoded_header.len() + 1 + encoded_payload.len());
	buffer.extend_from_slice(encoded_header.as_bytes());
	buffer.push(b'.');
	buffer.extend_from_slice(&encoded_payload);
	Ok(buffer)
}

/// Serialize a header, payload and signature in compact form.
pub fn serialize(header: &Header, payload: &Payload, signature: &[u8]) -> Result<String> {
	let header_part = header.encoded();
	let payload_part = if header.base64_encoded_payload()? {
		base64url::encode(payload.as_bytes())
	} else {
		String::new()
	};
	let signature_part = base64url::encode(signature);

	let mut output = String::with_capacity(header_part.len() + payload_part.len() + signature_part.len() + 2);
	output.push_str(&header_part);
	output.push('.');
	output.push_str(&payload_part);
	output.push('.');
	output.push_str(&signature_part);
	Ok(output)
}

impl<'a> CompactSerializedParts<'a> {
	/// Decode the header and signature.
	///
	/// The payload is left alone, since only the header knows how to decode it.
	pub fn decode_header(&self) -> Result<(Header, Vec<u8>)> {
		let header    = Header::from_json(base64url::decode(self.header)?)?;
		let signature = base64url::decode(self.signature)?;
		Ok((header, signature))
	}
}
