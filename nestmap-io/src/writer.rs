use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use nestmap_core::models::Interval;

use crate::consts::{EDGE_DUMP_HEADER, LENGTH_DIRECTIVE};
use crate::error::Result;

/// Format one edge as a dump line, without the trailing newline.
pub fn format_edge(src: &Interval, dst: &Interval) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        src.seq_id, src.start, src.end, src.orientation, dst.seq_id, dst.start, dst.end, dst.orientation
    )
}

/// A dump file on disk, gzip'd or plain.
pub enum DumpFile {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Write for DumpFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DumpFile::Plain(w) => w.write(buf),
            DumpFile::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DumpFile::Plain(w) => w.flush(),
            DumpFile::Gzip(w) => w.flush(),
        }
    }
}

impl DumpFile {
    /// Flush everything, writing the gzip trailer for compressed files.
    pub fn close(self) -> io::Result<()> {
        match self {
            DumpFile::Plain(mut w) => w.flush(),
            DumpFile::Gzip(w) => w.finish()?.flush(),
        }
    }
}

///
/// Writes the text edge dump.
///
/// The header comment goes out on construction; length directives and edges may then be
/// interleaved freely. Call [`EdgeDumpWriter::finish`] to flush, or
/// [`EdgeDumpWriter::close`] for a dump created on disk, which also completes the gzip stream.
///
pub struct EdgeDumpWriter<W: Write> {
    inner: W,
    edges: usize,
}

impl EdgeDumpWriter<DumpFile> {
    ///
    /// Create a dump on disk, gzip'd when the path ends in `.gz`.
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = BufWriter::new(File::create(path)?);
        let inner = match path.extension() == Some(OsStr::new("gz")) {
            true => DumpFile::Gzip(GzEncoder::new(file, Compression::best())),
            false => DumpFile::Plain(file),
        };
        EdgeDumpWriter::new(inner)
    }

    /// Finish the dump and close the file, returning the number of edges written.
    pub fn close(self) -> Result<usize> {
        let edges = self.edges;
        self.finish()?.close()?;
        Ok(edges)
    }
}

impl<W: Write> EdgeDumpWriter<W> {
    pub fn new(mut inner: W) -> Result<Self> {
        writeln!(inner, "{}", EDGE_DUMP_HEADER)?;
        Ok(EdgeDumpWriter { inner, edges: 0 })
    }

    pub fn write_length(&mut self, seq_id: &str, length: u64) -> Result<()> {
        writeln!(self.inner, "{}\t{}\t{}", LENGTH_DIRECTIVE, seq_id, length)?;
        Ok(())
    }

    pub fn write_edge(&mut self, src: &Interval, dst: &Interval) -> Result<()> {
        writeln!(self.inner, "{}", format_edge(src, dst))?;
        self.edges += 1;
        Ok(())
    }

    /// Number of edges written so far.
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Flush everything and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{DumpRecord, EdgeDumpReader};

    use nestmap_core::models::Orientation;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn edge() -> (Interval, Interval) {
        (
            Interval::new("chr1", 10, 40, Orientation::Forward).unwrap(),
            Interval::new("prot", 2, 12, Orientation::Reverse).unwrap(),
        )
    }

    #[rstest]
    fn test_format_edge() {
        let (src, dst) = edge();
        assert_eq!(format_edge(&src, &dst), "chr1\t10\t40\t+\tprot\t2\t12\t-");
    }

    #[rstest]
    fn test_write_to_memory() {
        let (src, dst) = edge();
        let mut writer = EdgeDumpWriter::new(Vec::new()).unwrap();
        writer.write_length("chr1", 500).unwrap();
        writer.write_edge(&src, &dst).unwrap();
        assert_eq!(writer.edge_count(), 1);
        let text = String::from_utf8(writer.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], EDGE_DUMP_HEADER);
        assert_eq!(lines[1], "#length\tchr1\t500");
        assert_eq!(lines[2], "chr1\t10\t40\t+\tprot\t2\t12\t-");
    }

    #[rstest]
    #[case("edges.tsv")]
    #[case("nested/dir/edges.tsv.gz")]
    fn test_write_then_read_from_disk(#[case] name: &str) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join(name);
        let (src, dst) = edge();

        let mut writer = EdgeDumpWriter::create(&path).unwrap();
        writer.write_length("prot", 100).unwrap();
        writer.write_edge(&src, &dst).unwrap();
        assert_eq!(writer.close().unwrap(), 1);

        let records: Vec<DumpRecord> = EdgeDumpReader::from_path(&path)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(
            records,
            vec![
                DumpRecord::Length {
                    seq_id: "prot".to_string(),
                    length: 100
                },
                DumpRecord::Edge { src, dst },
            ]
        );
    }
}
