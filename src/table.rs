use crate::batch::ExclusionRecord;
use crate::stats::mean;

/// One server row: per-host average latencies in seconds, plus the
/// derived row average once finalized.
#[derive(Debug, Clone)]
pub struct TableRow {
	pub server: String,
	/// Mean of `cells`, filled in by finalize().
	pub average: f64,
	/// Average latency per host column, 0.0 for cells never probed.
	pub cells: Vec<f64>,
}

/// Server × host latency table.
///
/// Built incrementally in server input order, then finalized exactly
/// once: row averages computed, excluded rows dropped, remaining rows
/// stably sorted ascending by average.
#[derive(Debug, Clone)]
pub struct ResultTable {
	pub hosts: Vec<String>,
	pub rows: Vec<TableRow>,
}

impl ResultTable {
	pub fn new(hosts: &[String]) -> Self {
		ResultTable {
			hosts: hosts.to_vec(),
			rows: Vec::new(),
		}
	}

	/// Append one server row. `cells` must hold one value per host
	/// column, zero-filled for hosts that were never probed.
	pub fn push_row(&mut self, server: &str, cells: Vec<f64>) {
		debug_assert_eq!(cells.len(), self.hosts.len());
		self.rows.push(TableRow {
			server: server.to_string(),
			average: 0.0,
			cells,
		});
	}

	/// Finalize the table: compute each row's average over all host
	/// columns (zero-filled cells included), drop rows for excluded
	/// servers, and sort the rest ascending by average. The stable sort
	/// keeps input order for ties.
	pub fn finalize(mut self, exclusions: &ExclusionRecord) -> ResultTable {
		for row in &mut self.rows {
			row.average = mean(&row.cells).unwrap_or(0.0);
		}
		self.rows.retain(|row| !exclusions.contains(&row.server));
		self.rows.sort_by(|a, b| {
			a.average.partial_cmp(&b.average)
				.unwrap_or(std::cmp::Ordering::Equal)
		});
		self
	}
}
