use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Reads a corpus file and returns its words as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`, one word per line
/// - Blank lines are dropped
pub(crate) fn read_corpus<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(path)?.read_to_string(&mut contents)?;
	Ok(contents
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(str::to_owned)
		.collect())
}

/// Builds the cache path of one order's model, next to its corpus file.
///
/// Example:
/// `data/animals.txt` + order 3 → `data/animals.3.bin`
pub(crate) fn model_path<P: AsRef<Path>>(corpus_path: P, order: usize) -> io::Result<PathBuf> {
	let corpus_path = corpus_path.as_ref();

	let parent = corpus_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = corpus_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Corpus path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(format!("{order}.bin"));

	Ok(output)
}

/// Reads a cached model file.
///
/// A missing or empty file is not an error, just "no cached model";
/// the caller retrains in that case.
pub(crate) fn load_model_bytes(path: &Path) -> io::Result<Option<Vec<u8>>> {
	match fs::read(path) {
		Ok(bytes) if bytes.is_empty() => Ok(None),
		Ok(bytes) => Ok(Some(bytes)),
		Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
		Err(err) => Err(err),
	}
}

/// Writes a model file, truncating any previous content.
pub(crate) fn save_model_bytes(path: &Path, bytes: &[u8]) -> io::Result<()> {
	fs::write(path, bytes)
}

#[cfg(test)]
mod tests {
	use std::io::Write as _;

	use super::*;

	#[test]
	fn read_corpus_drops_blank_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("words.txt");
		let mut file = File::create(&path).unwrap();
		writeln!(file, "alpha\n\n  \nbeta").unwrap();

		assert_eq!(read_corpus(&path).unwrap(), vec!["alpha", "beta"]);
	}

	#[test]
	fn model_path_sits_next_to_the_corpus() {
		let path = model_path("data/animals.txt", 3).unwrap();
		assert_eq!(path, PathBuf::from("data/animals.3.bin"));
	}

	#[test]
	fn missing_and_empty_caches_read_as_none() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("none.bin");
		assert_eq!(load_model_bytes(&missing).unwrap(), None);

		let empty = dir.path().join("empty.bin");
		File::create(&empty).unwrap();
		assert_eq!(load_model_bytes(&empty).unwrap(), None);
	}

	#[test]
	fn save_truncates_previous_content() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("model.bin");
		save_model_bytes(&path, &[1, 2, 3, 4]).unwrap();
		save_model_bytes(&path, &[9]).unwrap();
		assert_eq!(load_model_bytes(&path).unwrap(), Some(vec![9]));
	}

	#[test]
	fn save_into_a_missing_directory_fails() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("no_such_dir").join("model.bin");
		assert!(save_model_bytes(&path, &[1]).is_err());
	}
}
