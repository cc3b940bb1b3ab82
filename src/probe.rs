use std::net::SocketAddr;
use std::time::{Duration, Instant};

use hickory_proto::op::ResponseCode;
use hickory_proto::rr::RecordType;
use tokio::net::UdpSocket;

use crate::dns::{build_query, parse_response};
use crate::resolver::ServerSpec;
use crate::stats::{reduce_samples, CellStat, Sample};

/// Send a single DNS query over UDP and measure latency.
///
/// Creates a dedicated socket per query to avoid response stealing between
/// concurrent tasks sharing the same resolver socket. Anything short of a
/// parsed NoError response within the timeout counts as a lost sample.
async fn send_udp_query(
	server: SocketAddr,
	query_bytes: &[u8],
	timeout: Duration,
	txid: u16,
) -> Sample {
	// Bind a dedicated socket for this query
	let bind_addr = if server.is_ipv4() {
		"0.0.0.0:0"
	} else {
		"[::]:0"
	};
	let socket = match UdpSocket::bind(bind_addr).await {
		Ok(s) => s,
		Err(_) => return Sample::lost(),
	};

	// Send the query and start timing immediately around send+recv
	let start = Instant::now();
	if socket.send_to(query_bytes, server).await.is_err() {
		return Sample::lost();
	}

	// Receive with timeout, retry recv on txid mismatch
	// Use 4096-byte buffer to handle EDNS-extended responses
	let mut buf = vec![0u8; 4096];
	let max_retries = 3;
	for _ in 0..max_retries {
		let elapsed = start.elapsed();
		if elapsed >= timeout {
			break;
		}
		let remaining = timeout - elapsed;

		match tokio::time::timeout(remaining, socket.recv_from(&mut buf)).await {
			Ok(Ok((len, _src))) => {
				let rtt = start.elapsed();
				match parse_response(&buf[..len], txid) {
					Ok(response) => {
						if response.rcode == ResponseCode::NoError {
							return Sample {
								rtt: Some(rtt),
								ttl: response.ttl,
							};
						}
						// Refusal, SERVFAIL, NXDOMAIN: counted as loss
						return Sample::lost();
					}
					Err(_) => {
						// txid mismatch or parse error, retry recv
						continue;
					}
				}
			}
			_ => {
				// Timeout or recv error
				break;
			}
		}
	}

	Sample::lost()
}

/// Probe one (host, server) cell: issue `count` queries and reduce the
/// samples into a CellStat.
///
/// Queries run one after another so "TTL of the last successful sample"
/// keeps a defined meaning. Loss is data, not failure: total loss yields
/// a zeroed CellStat with 100% loss rather than an error.
pub async fn run_probe(
	host: &str,
	server: &ServerSpec,
	record_type: RecordType,
	timeout: Duration,
	count: u32,
) -> CellStat {
	let mut samples = Vec::with_capacity(count as usize);
	for _ in 0..count {
		let txid: u16 = rand::random();
		match build_query(host, record_type, txid) {
			Ok(query_bytes) => {
				samples.push(send_udp_query(server.addr, &query_bytes, timeout, txid).await);
			}
			Err(_) => samples.push(Sample::lost()),
		}
	}
	reduce_samples(&samples)
}
