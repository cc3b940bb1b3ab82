use clap::{ArgAction, Parser};

/// DNS server batch test tool
#[derive(Parser, Debug)]
#[command(name = "dnsbatchtest", version)]
#[command(about = "Run a DNS server batch test using a host list")]
pub struct Cli {
	/// File to read the server list from, one address per line
	#[arg(short = 's', long = "servers", default_value = "dns.txt")]
	pub servers: String,

	/// File to read the host list from, one hostname per line
	#[arg(short = 'H', long = "hosts", default_value = "hosts.txt")]
	pub hosts: String,

	/// DNS record type to query (A, AAAA, MX, ...)
	#[arg(short = 'r', long = "record-type", default_value = "A")]
	pub record_type: String,

	/// Per-query timeout in seconds
	#[arg(short = 't', long = "timeout", default_value = "2",
		value_parser = clap::value_parser!(u64).range(1..))]
	pub timeout: u64,

	/// Number of queries per (server, host) cell
	#[arg(short = 'c', long = "count", default_value = "5",
		value_parser = clap::value_parser!(u32).range(1..))]
	pub count: u32,

	/// Loss-percent limit; a server at or above it is excluded
	#[arg(short = 'L', long = "loss", default_value = "40")]
	pub loss: f64,

	/// Standard-deviation limit in seconds; same exclusion rule
	#[arg(short = 'd', long = "stddev", default_value = "10")]
	pub stddev: f64,

	/// Output CSV file path
	#[arg(short = 'o', long = "output", default_value = "result.csv")]
	pub output: String,

	/// Maximum server rows probed concurrently
	#[arg(long = "concurrency", default_value = "8",
		value_parser = clap::value_parser!(usize))]
	pub concurrency: usize,

	/// Verbosity: -v adds the exclusion list, -vv adds per-cell progress
	#[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
	pub verbose: u8,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let cli = Cli::parse_from(["dnsbatchtest"]);
		assert_eq!(cli.servers, "dns.txt");
		assert_eq!(cli.hosts, "hosts.txt");
		assert_eq!(cli.record_type, "A");
		assert_eq!(cli.timeout, 2);
		assert_eq!(cli.count, 5);
		assert_eq!(cli.loss, 40.0);
		assert_eq!(cli.stddev, 10.0);
		assert_eq!(cli.output, "result.csv");
		assert_eq!(cli.verbose, 0);
	}

	#[test]
	fn test_verbose_counts() {
		let cli = Cli::parse_from(["dnsbatchtest", "-vv"]);
		assert_eq!(cli.verbose, 2);
	}

	#[test]
	fn test_zero_count_rejected() {
		let result = Cli::try_parse_from(["dnsbatchtest", "-c", "0"]);
		assert!(result.is_err());
	}

	#[test]
	fn test_zero_timeout_rejected() {
		let result = Cli::try_parse_from(["dnsbatchtest", "-t", "0"]);
		assert!(result.is_err());
	}
}
