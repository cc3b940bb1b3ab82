mod batch;
mod cli;
mod dns;
mod lists;
mod output;
mod probe;
mod resolver;
mod stats;
mod table;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use hickory_proto::rr::RecordType;

use crate::batch::BatchConfig;
use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	// Load both lists up front: missing or empty files abort before
	// any probing
	let server_names = lists::read_list_file(&cli.servers)
		.context("loading server list")?;
	let hosts = lists::read_list_file(&cli.hosts)
		.context("loading host list")?;

	let mut servers = Vec::with_capacity(server_names.len());
	for name in &server_names {
		servers.push(resolver::parse_server(name)?);
	}

	let record_type = RecordType::from_str(&cli.record_type)
		.map_err(|e| anyhow!("invalid DNS record type '{}': {}", cli.record_type, e))?;

	let config = BatchConfig {
		record_type,
		timeout: Duration::from_secs(cli.timeout),
		count: cli.count,
		loss_limit: cli.loss,
		stddev_limit: cli.stddev,
		max_inflight: cli.concurrency,
		verbose: cli.verbose,
	};

	let (table, _exclusions) = batch::run_batch(&servers, &hosts, &config).await?;

	output::print_result_table(&table);
	output::write_csv(&cli.output, &table)?;
	output::print_ranked_averages(&table);

	Ok(())
}
