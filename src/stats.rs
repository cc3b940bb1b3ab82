use std::time::Duration;

/// Outcome of a single DNS query attempt.
///
/// A lost sample (timeout, refusal, network error, malformed response)
/// carries no round-trip time. TTL is present only when the response
/// contained at least one answer record.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
	pub rtt: Option<Duration>,
	pub ttl: Option<u32>,
}

impl Sample {
	pub fn lost() -> Self {
		Sample { rtt: None, ttl: None }
	}

	pub fn is_lost(&self) -> bool {
		self.rtt.is_none()
	}
}

/// Aggregated statistics for one (server, host) cell.
///
/// Durations are computed over the successful samples only. When every
/// sample in the round was lost, all durations are zero and
/// `loss_percent` is 100.
#[derive(Debug, Clone, Copy, Default)]
#[allow(dead_code)]
pub struct CellStat {
	pub avg: Duration,
	pub min: Duration,
	pub max: Duration,
	pub stddev: Duration,
	/// Lost queries as a fraction of the whole round, in [0, 100].
	pub loss_percent: f64,
	/// TTL of the last successful sample, if it carried one.
	pub ttl: Option<u32>,
}

/// Calculate the arithmetic mean of a slice of values.
pub fn mean(values: &[f64]) -> Option<f64> {
	if values.is_empty() {
		return None;
	}
	let sum: f64 = values.iter().sum();
	Some(sum / values.len() as f64)
}

/// Calculate the population standard deviation of a slice of values.
pub fn stddev(values: &[f64]) -> Option<f64> {
	let avg = mean(values)?;
	let variance = values.iter()
		.map(|v| (v - avg).powi(2))
		.sum::<f64>() / values.len() as f64;
	Some(variance.sqrt())
}

/// Reduce one probe round's samples into a CellStat.
///
/// The slice holds one Sample per query issued, lost or not, so the
/// loss percentage is lost / samples.len() * 100.
pub fn reduce_samples(samples: &[Sample]) -> CellStat {
	let rtts: Vec<f64> = samples.iter()
		.filter_map(|s| s.rtt)
		.map(|d| d.as_secs_f64())
		.collect();

	if rtts.is_empty() {
		return CellStat {
			loss_percent: 100.0,
			..CellStat::default()
		};
	}

	let lost = samples.len() - rtts.len();
	let loss_percent = lost as f64 / samples.len() as f64 * 100.0;

	let avg = mean(&rtts).unwrap_or(0.0);
	let sd = stddev(&rtts).unwrap_or(0.0);
	let min = rtts.iter().copied().fold(f64::INFINITY, f64::min);
	let max = rtts.iter().copied().fold(0.0f64, f64::max);

	// TTL comes from the last successful sample in arrival order
	let ttl = samples.iter()
		.rev()
		.find(|s| !s.is_lost())
		.and_then(|s| s.ttl);

	CellStat {
		avg: Duration::from_secs_f64(avg),
		min: Duration::from_secs_f64(min),
		max: Duration::from_secs_f64(max),
		stddev: Duration::from_secs_f64(sd),
		loss_percent,
		ttl,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ok(ms: u64, ttl: Option<u32>) -> Sample {
		Sample { rtt: Some(Duration::from_millis(ms)), ttl }
	}

	#[test]
	fn test_mean() {
		let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
		assert_eq!(mean(&values), Some(3.0));
	}

	#[test]
	fn test_mean_empty() {
		let values: Vec<f64> = vec![];
		assert_eq!(mean(&values), None);
	}

	#[test]
	fn test_stddev() {
		let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
		let sd = stddev(&values).unwrap();
		// Population stddev should be 2.0
		assert!((sd - 2.0).abs() < 0.01);
	}

	#[test]
	fn test_reduce_all_success() {
		// 5 queries with RTTs 10, 12, 11, 10, 9 ms
		let samples = vec![
			ok(10, Some(300)),
			ok(12, Some(300)),
			ok(11, Some(299)),
			ok(10, Some(298)),
			ok(9, Some(297)),
		];
		let stat = reduce_samples(&samples);
		assert!((stat.avg.as_secs_f64() - 0.0104).abs() < 1e-9);
		assert_eq!(stat.min, Duration::from_millis(9));
		assert_eq!(stat.max, Duration::from_millis(12));
		// Population stddev of [10,12,11,10,9] ms is sqrt(1.04) ms
		assert!((stat.stddev.as_secs_f64() - 0.00101980).abs() < 1e-7);
		assert_eq!(stat.loss_percent, 0.0);
		assert_eq!(stat.ttl, Some(297));
	}

	#[test]
	fn test_reduce_bounds_hold() {
		let samples = vec![ok(5, None), ok(50, None), ok(20, None)];
		let stat = reduce_samples(&samples);
		assert!(stat.min <= stat.avg);
		assert!(stat.avg <= stat.max);
		assert!(stat.loss_percent >= 0.0 && stat.loss_percent <= 100.0);
	}

	#[test]
	fn test_reduce_all_lost() {
		let samples = vec![Sample::lost(); 5];
		let stat = reduce_samples(&samples);
		assert_eq!(stat.avg, Duration::ZERO);
		assert_eq!(stat.min, Duration::ZERO);
		assert_eq!(stat.max, Duration::ZERO);
		assert_eq!(stat.stddev, Duration::ZERO);
		assert_eq!(stat.loss_percent, 100.0);
		assert_eq!(stat.ttl, None);
	}

	#[test]
	fn test_reduce_partial_loss() {
		// 3 of 5 lost
		let samples = vec![
			ok(10, Some(60)),
			Sample::lost(),
			ok(14, Some(55)),
			Sample::lost(),
			Sample::lost(),
		];
		let stat = reduce_samples(&samples);
		assert_eq!(stat.loss_percent, 60.0);
		// Stats over the successful subset only
		assert_eq!(stat.min, Duration::from_millis(10));
		assert_eq!(stat.max, Duration::from_millis(14));
		assert!((stat.avg.as_secs_f64() - 0.012).abs() < 1e-9);
	}

	#[test]
	fn test_reduce_ttl_is_last_successful() {
		let samples = vec![
			ok(10, Some(100)),
			ok(11, Some(42)),
			Sample::lost(),
		];
		let stat = reduce_samples(&samples);
		assert_eq!(stat.ttl, Some(42));
	}

	#[test]
	fn test_reduce_last_success_without_ttl() {
		// Last successful sample had no answer records
		let samples = vec![ok(10, Some(100)), ok(11, None)];
		let stat = reduce_samples(&samples);
		assert_eq!(stat.ttl, None);
	}
}
