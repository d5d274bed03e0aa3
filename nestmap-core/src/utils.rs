use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Get a reader for a file path, or stdin when the path is `-`.
///
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> Result<BufReader<Box<dyn Read>>> {
    if file_path_str == "-" {
        Ok(BufReader::new(Box::new(std::io::stdin()) as Box<dyn Read>))
    } else {
        get_dynamic_reader(Path::new(file_path_str))
    }
}

///
/// Read a two column `id<whitespace>length` file into a map of sequence lengths.
///
pub fn get_sequence_lengths<T: AsRef<Path>>(path: T) -> Result<HashMap<String, u64>> {
    let reader = get_dynamic_reader(path.as_ref())?;
    let mut lengths = HashMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(id), Some(len)) = (parts.next(), parts.next()) else {
            anyhow::bail!("Line {}: expected `id length`, got {:?}", idx + 1, line);
        };
        let len = len
            .parse::<u64>()
            .with_context(|| format!("Line {}: invalid length {:?}", idx + 1, len))?;
        lengths.insert(id.to_string(), len);
    }

    Ok(lengths)
}

#[cfg(test)]
mod tests {
    use super::*;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_gzipped_lengths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lengths.txt.gz");
        let mut writer = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        writeln!(writer, "chr1\t1000").unwrap();
        writeln!(writer, "# comment").unwrap();
        writeln!(writer, "chr2 250").unwrap();
        writer.finish().unwrap();

        let lengths = get_sequence_lengths(&path).unwrap();
        assert_eq!(lengths.len(), 2);
        assert_eq!(lengths["chr1"], 1000);
        assert_eq!(lengths["chr2"], 250);
    }

    #[rstest]
    fn test_reader_for_a_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edges.tsv");
        std::fs::write(&path, "a\nb\n").unwrap();
        let reader = get_dynamic_reader_w_stdin(path.to_str().unwrap()).unwrap();
        assert_eq!(reader.lines().count(), 2);
    }

    #[rstest]
    fn test_bad_length_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lengths.txt");
        std::fs::write(&path, "chr1\tlots\n").unwrap();
        assert!(get_sequence_lengths(&path).is_err());
    }
}
