use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use anyhow::{Context, Result};

use crate::table::ResultTable;

/// Print the finalized table as a formatted matrix: one row per
/// surviving server, Average first, then each host column.
pub fn print_result_table(table: &ResultTable) {
	let mut out = Table::new();
	out.load_preset(UTF8_FULL);
	out.set_content_arrangement(ContentArrangement::Dynamic);

	let mut header = vec!["Server".to_string(), "Average".to_string()];
	header.extend(table.hosts.iter().cloned());
	out.set_header(header);

	for row in &table.rows {
		let mut cells = vec![row.server.clone(), format!("{:.6}", row.average)];
		cells.extend(row.cells.iter().map(|v| format!("{:.6}", v)));
		out.add_row(cells);
	}

	println!("\nBatch Test Results (seconds)");
	println!("============================\n");
	println!("{out}");
}

/// Print the ranked Average column, the run's headline result.
pub fn print_ranked_averages(table: &ResultTable) {
	println!("Based on the test results, the average speed of the DNS servers are:");
	for row in &table.rows {
		println!("  {:<24} {:.6}", row.server, row.average);
	}
}

/// Write the finalized table to a CSV file.
///
/// Columns: server, average, then each host in input order. Values are
/// seconds; skipped cells keep the 0.0 sentinel.
pub fn write_csv(path: &str, table: &ResultTable) -> Result<()> {
	let mut writer = csv::Writer::from_path(path)
		.with_context(|| format!("failed to open output file '{}'", path))?;

	let mut header = vec!["server".to_string(), "average".to_string()];
	header.extend(table.hosts.iter().cloned());
	writer.write_record(&header)?;

	for row in &table.rows {
		let mut record = vec![row.server.clone(), format!("{:.6}", row.average)];
		record.extend(row.cells.iter().map(|v| format!("{:.6}", v)));
		writer.write_record(&record)?;
	}

	writer.flush()
		.with_context(|| format!("failed to write output file '{}'", path))?;
	println!("\nResults written to: {}", path);
	Ok(())
}
