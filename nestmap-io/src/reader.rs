use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use nestmap_core::models::{Interval, Orientation};

use crate::consts::{COMMENT_PREFIX, EDGE_FIELD_COUNT, LENGTH_DIRECTIVE};
use crate::error::{EdgeDumpError, Result};

/// One meaningful line of an edge dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpRecord {
    /// `#length` directive
    Length { seq_id: String, length: u64 },
    /// A source interval and the destination interval it aligns to
    Edge { src: Interval, dst: Interval },
}

///
/// Streams [`DumpRecord`]s out of a text edge dump.
///
/// A malformed line yields an [`EdgeDumpError::Parse`] carrying its 1-based line number; the
/// reader keeps going afterwards, so callers can choose to skip bad lines.
///
pub struct EdgeDumpReader<R: BufRead> {
    inner: R,
    line: usize,
    buf: String,
}

impl EdgeDumpReader<BufReader<Box<dyn Read>>> {
    ///
    /// Open a dump on disk. Files ending in `.gz` are decompressed on the fly.
    ///
    /// # Arguments
    /// - path: the path to the dump
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file: Box<dyn Read> = match path.extension() == Some(OsStr::new("gz")) {
            true => Box::new(MultiGzDecoder::new(file)),
            false => Box::new(file),
        };
        Ok(EdgeDumpReader::new(BufReader::new(file)))
    }
}

impl<R: BufRead> EdgeDumpReader<R> {
    pub fn new(inner: R) -> Self {
        EdgeDumpReader {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for EdgeDumpReader<R> {
    type Item = Result<DumpRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line += 1;

            let line = self.buf.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with(COMMENT_PREFIX) {
                if line.starts_with(LENGTH_DIRECTIVE) {
                    return Some(parse_length(line, self.line));
                }
                continue;
            }
            return Some(parse_edge(line, self.line));
        }
    }
}

fn parse_error(line: usize, message: String) -> EdgeDumpError {
    EdgeDumpError::Parse { line, message }
}

fn parse_coord(field: &str, name: &str, line: usize) -> Result<u64> {
    field
        .parse::<u64>()
        .map_err(|_| parse_error(line, format!("invalid {}: {:?}", name, field)))
}

fn parse_orientation(field: &str, line: usize) -> Result<Orientation> {
    field
        .parse::<Orientation>()
        .map_err(|e| parse_error(line, e.to_string()))
}

fn parse_length(line: &str, line_no: usize) -> Result<DumpRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 3 || fields[0] != LENGTH_DIRECTIVE {
        return Err(parse_error(
            line_no,
            format!("expected `{}<TAB>seq_id<TAB>length`", LENGTH_DIRECTIVE),
        ));
    }
    Ok(DumpRecord::Length {
        seq_id: fields[1].to_string(),
        length: parse_coord(fields[2], "length", line_no)?,
    })
}

fn parse_interval(fields: &[&str], line_no: usize) -> Result<Interval> {
    let start = parse_coord(fields[1], "start", line_no)?;
    let end = parse_coord(fields[2], "end", line_no)?;
    let orientation = parse_orientation(fields[3], line_no)?;
    Interval::new(fields[0], start, end, orientation).map_err(|e| parse_error(line_no, e.to_string()))
}

/// Parse a single edge line.
pub fn parse_edge(line: &str, line_no: usize) -> Result<DumpRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != EDGE_FIELD_COUNT {
        return Err(parse_error(
            line_no,
            format!(
                "expected {} tab separated fields, found {}",
                EDGE_FIELD_COUNT,
                fields.len()
            ),
        ));
    }
    let src = parse_interval(&fields[0..4], line_no)?;
    let dst = parse_interval(&fields[4..8], line_no)?;
    Ok(DumpRecord::Edge { src, dst })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    fn read_all(text: &str) -> Vec<Result<DumpRecord>> {
        EdgeDumpReader::new(Cursor::new(text.as_bytes().to_vec())).collect()
    }

    #[rstest]
    fn test_read_records() {
        let text = "# a comment\n\
                    #length\tchr1\t1000\n\
                    \n\
                    chr1\t10\t20\t+\tchrX\t110\t120\t-\n\
                    chr1\t30\t60\t-\tprot\t0\t10\t+\r\n";
        let records: Vec<DumpRecord> = read_all(text).into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            DumpRecord::Length {
                seq_id: "chr1".to_string(),
                length: 1000
            }
        );
        assert_eq!(
            records[1],
            DumpRecord::Edge {
                src: Interval::new("chr1", 10, 20, Orientation::Forward).unwrap(),
                dst: Interval::new("chrX", 110, 120, Orientation::Reverse).unwrap(),
            }
        );
        match &records[2] {
            DumpRecord::Edge { src, dst } => {
                assert_eq!(src.orientation, Orientation::Reverse);
                assert_eq!(dst.seq_id, "prot");
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[rstest]
    #[case("chr1\t10\t20\t+\tchrX\t110\t120", 2)]
    #[case("chr1\tten\t20\t+\tchrX\t110\t120\t+", 2)]
    #[case("chr1\t10\t20\t*\tchrX\t110\t120\t+", 2)]
    #[case("chr1\t20\t10\t+\tchrX\t110\t120\t+", 2)]
    #[case("#length\tchr1", 2)]
    fn test_parse_errors_carry_line_numbers(#[case] bad: &str, #[case] expected_line: usize) {
        let text = format!("# header\n{}\nchr1\t0\t5\t+\tchr2\t0\t5\t+\n", bad);
        let records = read_all(&text);
        assert_eq!(records.len(), 2);
        match &records[0] {
            Err(EdgeDumpError::Parse { line, .. }) => assert_eq!(*line, expected_line),
            other => panic!("expected a parse error, got {:?}", other),
        }
        // the reader recovers after a bad line
        assert!(records[1].is_ok());
    }

    #[rstest]
    fn test_line_number_follows_the_reader() {
        let text = "# header\n\nchr1\t0\t5\t+\tchr2\t0\t5\t+\n# trailing\n";
        let mut reader = EdgeDumpReader::new(Cursor::new(text.as_bytes().to_vec()));
        assert_eq!(reader.line_number(), 0);
        assert!(reader.next().unwrap().is_ok());
        assert_eq!(reader.line_number(), 3);
        assert!(reader.next().is_none());
        assert_eq!(reader.line_number(), 4);
    }

    #[rstest]
    fn test_empty_input() {
        assert!(read_all("").is_empty());
        assert!(read_all("# only comments\n\n").is_empty());
    }
}
