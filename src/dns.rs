use anyhow::{anyhow, Result};
use hickory_proto::op::{Message, MessageType, Query, ResponseCode};
use hickory_proto::rr::{Name, RecordType};

/// DNS response information extracted from a parsed message
#[derive(Debug)]
#[allow(dead_code)]
pub struct DnsResponse {
	pub rcode: ResponseCode,
	pub answer_count: usize,
	/// TTL of the first answer record, if any
	pub ttl: Option<u32>,
}

/// Build a DNS query message for the given host and record type.
///
/// Returns the serialized query bytes ready to send over UDP.
pub fn build_query(host: &str, record_type: RecordType, txid: u16) -> Result<Vec<u8>> {
	let name = Name::from_ascii(host)
		.map_err(|e| anyhow!("invalid host name '{}': {}", host, e))?;

	let mut message = Message::new();
	message.set_id(txid);
	message.set_recursion_desired(true);
	message.add_query(Query::query(name, record_type));

	let bytes = message.to_vec()
		.map_err(|e| anyhow!("failed to serialize DNS query: {}", e))?;
	Ok(bytes)
}

/// Parse a DNS response, validating the transaction ID and extracting
/// the rcode and answer TTL.
///
/// Returns an error if the response cannot be parsed or the txid does not match.
pub fn parse_response(bytes: &[u8], expected_txid: u16) -> Result<DnsResponse> {
	let message = Message::from_vec(bytes)
		.map_err(|e| anyhow!("failed to parse DNS response: {}", e))?;

	// Validate transaction ID
	if message.id() != expected_txid {
		return Err(anyhow!(
			"txid mismatch: expected {}, got {}",
			expected_txid, message.id()
		));
	}

	// Verify this is a response, not a query
	if message.message_type() != MessageType::Response {
		return Err(anyhow!("received a query instead of a response"));
	}

	let rcode = message.response_code();
	let answer_count = message.answer_count() as usize;
	let ttl = message.answers().first().map(|r| r.ttl());

	Ok(DnsResponse {
		rcode,
		answer_count,
		ttl,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use hickory_proto::rr::rdata;
	use hickory_proto::rr::{RData, Record};

	#[test]
	fn test_build_a_query() {
		let result = build_query("example.com", RecordType::A, 1234);
		assert!(result.is_ok());
		let bytes = result.unwrap();
		// DNS header is 12 bytes minimum
		assert!(bytes.len() >= 12);
		// Verify txid in first two bytes (big-endian)
		assert_eq!(bytes[0], (1234 >> 8) as u8);
		assert_eq!(bytes[1], (1234 & 0xff) as u8);
	}

	#[test]
	fn test_build_aaaa_query() {
		let result = build_query("example.com", RecordType::AAAA, 5678);
		assert!(result.is_ok());
		let bytes = result.unwrap();
		assert!(bytes.len() >= 12);
		// Verify txid
		assert_eq!(bytes[0], (5678 >> 8) as u8);
		assert_eq!(bytes[1], (5678 & 0xff) as u8);
	}

	#[test]
	fn test_build_query_rejects_bad_name() {
		// Labels are limited to 63 octets
		let long_label = format!("{}.com", "a".repeat(64));
		let result = build_query(&long_label, RecordType::A, 1);
		assert!(result.is_err());
	}

	#[test]
	fn test_parse_valid_response() {
		// Build a query, then turn it into a response
		let query_bytes = build_query("example.com", RecordType::A, 9999).unwrap();
		let mut response = Message::from_vec(&query_bytes).unwrap();
		response.set_message_type(MessageType::Response);
		let response_bytes = response.to_vec().unwrap();

		let result = parse_response(&response_bytes, 9999);
		assert!(result.is_ok());
		let dns_resp = result.unwrap();
		assert_eq!(dns_resp.rcode, ResponseCode::NoError);
		assert_eq!(dns_resp.answer_count, 0);
		assert_eq!(dns_resp.ttl, None);
	}

	#[test]
	fn test_parse_response_extracts_ttl() {
		let query_bytes = build_query("example.com", RecordType::A, 7777).unwrap();
		let mut response = Message::from_vec(&query_bytes).unwrap();
		response.set_message_type(MessageType::Response);
		let name = Name::from_ascii("example.com.").unwrap();
		let record = Record::from_rdata(
			name, 300, RData::A(rdata::A::new(93, 184, 216, 34)),
		);
		response.add_answer(record);
		let response_bytes = response.to_vec().unwrap();

		let dns_resp = parse_response(&response_bytes, 7777).unwrap();
		assert_eq!(dns_resp.answer_count, 1);
		assert_eq!(dns_resp.ttl, Some(300));
	}

	#[test]
	fn test_txid_mismatch() {
		let query_bytes = build_query("example.com", RecordType::A, 1111).unwrap();
		let mut response = Message::from_vec(&query_bytes).unwrap();
		response.set_message_type(MessageType::Response);
		let response_bytes = response.to_vec().unwrap();

		// Parse with wrong expected txid
		let result = parse_response(&response_bytes, 2222);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("txid mismatch"));
	}

	#[test]
	fn test_truncated_buffer() {
		// Only 5 bytes -- too short for a valid DNS message
		let bytes = vec![0u8; 5];
		let result = parse_response(&bytes, 0);
		assert!(result.is_err());
	}
}
