use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use hickory_proto::rr::RecordType;
use tokio::sync::Semaphore;

use crate::probe::run_probe;
use crate::resolver::ServerSpec;
use crate::stats::CellStat;
use crate::table::ResultTable;

/// Batch run configuration.
///
/// Verbosity lives here, not in a global: 0 prints the final result
/// only, 1 adds the exclusion list, 2 adds per-cell progress.
#[derive(Debug, Clone)]
pub struct BatchConfig {
	pub record_type: RecordType,
	pub timeout: Duration,
	pub count: u32,
	/// Loss-percent limit in [0, 100]; a cell at or above it excludes
	/// its server.
	pub loss_limit: f64,
	/// Standard-deviation limit in seconds; same boundary rule.
	pub stddev_limit: f64,
	/// Maximum server rows probed concurrently.
	pub max_inflight: usize,
	pub verbose: u8,
}

/// Why a server was dropped from the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
	LossTooHigh,
	StddevTooHigh,
	ConnectionFailure,
}

impl fmt::Display for ExclusionReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = match self {
			ExclusionReason::LossTooHigh => "loss is too high",
			ExclusionReason::StddevTooHigh => "stddev is too high",
			ExclusionReason::ConnectionFailure => "connection failure",
		};
		write!(f, "{}", text)
	}
}

/// Insertion-ordered record of excluded servers.
///
/// A server enters at most once, on its first violating cell, and is
/// never removed within a run.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRecord {
	entries: Vec<(String, ExclusionReason)>,
}

impl ExclusionRecord {
	pub fn record(&mut self, server: &str, reason: ExclusionReason) {
		if !self.contains(server) {
			self.entries.push((server.to_string(), reason));
		}
	}

	pub fn contains(&self, server: &str) -> bool {
		self.entries.iter().any(|(name, _)| name == server)
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, ExclusionReason)> {
		self.entries.iter().map(|(name, reason)| (name.as_str(), *reason))
	}
}

/// Decide whether a freshly probed cell excludes its server.
///
/// The boundary is inclusive: a value exactly at a limit triggers.
/// Reason precedence when several conditions hold at once: loss, then
/// stddev, then connection failure (the exact-zero average catch-all).
pub fn classify(stat: &CellStat, loss_limit: f64, stddev_limit: f64) -> Option<ExclusionReason> {
	if stat.loss_percent >= loss_limit {
		Some(ExclusionReason::LossTooHigh)
	} else if stat.stddev.as_secs_f64() >= stddev_limit {
		Some(ExclusionReason::StddevTooHigh)
	} else if stat.avg.is_zero() {
		Some(ExclusionReason::ConnectionFailure)
	} else {
		None
	}
}

/// Outcome of walking one server's row of hosts.
#[derive(Debug, Clone)]
pub struct RowOutcome {
	/// Per-host cell average; hosts after a violation keep Duration::ZERO.
	pub cells: Vec<Duration>,
	/// Index of the violating host and the recorded reason, if any.
	pub exclusion: Option<(usize, ExclusionReason)>,
}

/// Probe one server's hosts in order, stopping at the first violating
/// cell.
///
/// The violating cell's average is not written, matching the exclusion
/// semantics: exclusion skips the rest of the row and leaves those
/// cells zero-filled. The probe closure is generic so row-walk logic
/// can be exercised with synthetic stats.
pub async fn walk_row<F, Fut>(
	hosts: &[String],
	loss_limit: f64,
	stddev_limit: f64,
	mut probe: F,
) -> RowOutcome
where
	F: FnMut(String) -> Fut,
	Fut: Future<Output = CellStat>,
{
	let mut cells = vec![Duration::ZERO; hosts.len()];
	for (j, host) in hosts.iter().enumerate() {
		let stat = probe(host.clone()).await;
		if let Some(reason) = classify(&stat, loss_limit, stddev_limit) {
			return RowOutcome {
				cells,
				exclusion: Some((j, reason)),
			};
		}
		cells[j] = stat.avg;
	}
	RowOutcome { cells, exclusion: None }
}

/// Run the full server × host batch and build the finalized table.
///
/// Rows for distinct servers run as independent tasks under a
/// concurrency cap; hosts within a row stay strictly sequential so the
/// first-violation reason and skip count match a sequential run. Rows
/// are joined and reported in server input order, which keeps console
/// output deterministic regardless of task scheduling.
pub async fn run_batch(
	servers: &[ServerSpec],
	hosts: &[String],
	config: &BatchConfig,
) -> Result<(ResultTable, ExclusionRecord)> {
	let semaphore = Arc::new(Semaphore::new(config.max_inflight.max(1)));
	let mut handles = Vec::with_capacity(servers.len());

	for server in servers {
		let sem = semaphore.clone();
		let server = server.clone();
		let hosts = hosts.to_vec();
		let record_type = config.record_type;
		let timeout = config.timeout;
		let count = config.count;
		let loss_limit = config.loss_limit;
		let stddev_limit = config.stddev_limit;

		handles.push(tokio::spawn(async move {
			let _permit = sem.acquire().await.unwrap();
			let server = &server;
			walk_row(&hosts, loss_limit, stddev_limit, move |host| async move {
				run_probe(&host, server, record_type, timeout, count).await
			}).await
		}));
	}

	let total_cells = servers.len() * hosts.len();
	let mut exclusions = ExclusionRecord::default();
	let mut table = ResultTable::new(hosts);

	for (i, handle) in handles.into_iter().enumerate() {
		let outcome = handle.await
			.map_err(|e| anyhow!("probe task for server '{}' failed: {}", servers[i].name, e))?;

		let probed = outcome.exclusion
			.map(|(j, _)| j)
			.unwrap_or(hosts.len());
		if config.verbose >= 2 {
			for j in 0..probed {
				println!(
					"{}/{} Average speed by DNS server {} to host {}: {:.2}s",
					i * hosts.len() + j + 1,
					total_cells,
					servers[i].name,
					hosts[j],
					outcome.cells[j].as_secs_f64(),
				);
			}
		}

		if let Some((j, reason)) = outcome.exclusion {
			// One skip line per excluded server, for the first of the
			// hosts that were never probed
			if config.verbose >= 2 && j + 1 < hosts.len() {
				println!(
					"{}/{} Skip DNS server {} due to {}.",
					i * hosts.len() + j + 2,
					total_cells,
					servers[i].name,
					reason,
				);
			}
			exclusions.record(&servers[i].name, reason);
		}

		let cells: Vec<f64> = outcome.cells.iter()
			.map(|d| d.as_secs_f64())
			.collect();
		table.push_row(&servers[i].name, cells);
	}

	let table = table.finalize(&exclusions);

	if config.verbose >= 1 && !exclusions.is_empty() {
		println!("Because some of the hosts are unreachable from the servers below, they are not listed in the final result.");
		for (server, reason) in exclusions.iter() {
			println!("  {}: {}", server, reason);
		}
	}

	Ok((table, exclusions))
}
