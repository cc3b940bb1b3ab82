use thiserror::Error;

/// Errors raised while loading a server or host list.
#[derive(Debug, Error)]
pub enum ListError {
	#[error("failed to read list file '{path}': {source}")]
	Read {
		path: String,
		#[source]
		source: std::io::Error,
	},
	#[error("list file '{0}' contains no entries")]
	Empty(String),
}

/// Read entries from a list file, one per line.
///
/// Lines are trimmed of surrounding whitespace. Blank lines and lines
/// starting with '#' are skipped, never merged into neighbouring
/// entries. An empty resulting list is an error: probing an empty
/// matrix would silently produce a useless report.
pub fn read_list_file(path: &str) -> Result<Vec<String>, ListError> {
	let content = std::fs::read_to_string(path)
		.map_err(|source| ListError::Read { path: path.to_string(), source })?;

	let entries: Vec<String> = content.lines()
		.map(|line| line.trim().to_string())
		.filter(|line| !line.is_empty() && !line.starts_with('#'))
		.collect();

	if entries.is_empty() {
		return Err(ListError::Empty(path.to_string()));
	}
	Ok(entries)
}
