//! # On-disk nested containment interval stores
//!
//! An interval store holds every interval of one sequence in a single binary file, laid out as
//! a flattened nested containment list so it can be queried straight off a memory map. Stores
//! are written once by an [`IntervalStoreBuilder`] and are read-only afterwards.
//!
//! ```rust
//! use nestmap_core::models::{Interval, Orientation};
//! use nestmap_store::{IntervalStore, IntervalStoreBuilder};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("chr1.nms");
//!
//! let mut builder: IntervalStoreBuilder<String> =
//!     IntervalStoreBuilder::new("chr1").with_sequence_length(1000);
//! builder.push(Interval::forward("chr1", 100, 500).unwrap(), Some("gene".to_string()));
//! builder.push(Interval::new("chr1", 100, 200, Orientation::Reverse).unwrap(), None);
//! builder.build(&path).unwrap();
//!
//! let store = IntervalStore::open(&path).unwrap();
//! assert_eq!(store.overlap(450, 460).len(), 1);
//! assert_eq!(store.overlap(800, 850).len(), 1);
//! ```
pub mod builder;
pub mod config;
pub mod error;
pub mod format;
pub mod reader;

pub use builder::{BuildReport, IntervalStoreBuilder};
pub use config::BuildOptions;
pub use error::{Result, StoreError};
pub use reader::{IntervalStore, StoreHit, StoreIter};

pub mod consts {
    /// File extension of an interval store
    pub const STORE_EXT: &str = "nms";
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::Path;

    use nestmap_core::models::{Interval, Orientation};
    use nestmap_nclist::{Entry, NCList, Overlapper};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn tempdir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn fwd(start: u64, end: u64) -> Interval {
        Interval::forward("chr1", start, end).unwrap()
    }

    fn rev(start: u64, end: u64) -> Interval {
        Interval::new("chr1", start, end, Orientation::Reverse).unwrap()
    }

    fn forward_bounds(hits: &[StoreHit], len: u64) -> Vec<(u64, u64)> {
        hits.iter()
            .map(|h| {
                let f = h.interval.to_forward(len).unwrap();
                (f.start, f.end)
            })
            .collect()
    }

    fn simple_store(dir: &Path) -> IntervalStore {
        let mut builder: IntervalStoreBuilder<Interval> =
            IntervalStoreBuilder::new("chr1").with_sequence_length(1000);
        builder.push(fwd(100, 500), Some(Interval::forward("chrX", 0, 400).unwrap()));
        builder.push(fwd(150, 200), None);
        builder.push(rev(100, 200), Some(Interval::forward("chrY", 5, 105).unwrap()));
        let (store, _) = builder.build_and_open(dir.join("chr1.nms")).unwrap();
        store
    }

    #[rstest]
    fn test_round_trip_metadata(tempdir: TempDir) {
        let store = simple_store(tempdir.path());
        assert_eq!(store.seq_id(), "chr1");
        assert_eq!(store.len(), 3);
        assert_eq!(store.root_len(), 2);
        assert_eq!(store.sequence_length(), Some(1000));
        assert!(!store.is_empty());
        assert_eq!(store.iter().count(), 3);
    }

    #[rstest]
    fn test_reverse_intervals_come_back_reversed(tempdir: TempDir) {
        let store = simple_store(tempdir.path());
        // rev(100, 200) covers forward 800..900
        let hits = store.overlap(850, 860);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].interval, rev(100, 200));
    }

    #[rstest]
    fn test_overlap_interval_reorients_hits(tempdir: TempDir) {
        let store = simple_store(tempdir.path());
        // forward 150..160 seen from the reverse strand
        let hits = store.overlap_interval(&rev(840, 850)).unwrap();
        let mut found: Vec<Interval> = hits.into_iter().map(|h| h.interval).collect();
        found.sort();
        assert_eq!(found, vec![rev(500, 900), rev(800, 850)]);

        // the reverse record seen from the forward strand
        let hits = store.overlap_interval(&fwd(820, 830)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].interval, fwd(800, 900));

        let other = Interval::forward("chr2", 0, 10).unwrap();
        assert!(store.overlap_interval(&other).is_err());
    }

    #[rstest]
    fn test_payloads(tempdir: TempDir) {
        let store = simple_store(tempdir.path());
        let hits: Vec<(StoreHit, Option<Interval>)> = store.overlap_with_payload(160, 170).unwrap();
        assert_eq!(hits.len(), 2);
        let (outer, payload) = &hits[0];
        assert_eq!(outer.interval, fwd(100, 500));
        assert_eq!(payload, &Some(Interval::forward("chrX", 0, 400).unwrap()));
        let (inner, payload) = &hits[1];
        assert_eq!(inner.interval, fwd(150, 200));
        assert!(!inner.has_payload());
        assert_eq!(payload, &None);
    }

    #[rstest]
    fn test_empty_store(tempdir: TempDir) {
        let path = tempdir.path().join("empty.nms");
        let builder: IntervalStoreBuilder<u32> = IntervalStoreBuilder::new("chrM");
        let report = builder.build(&path).unwrap();
        assert_eq!(report.intervals, 0);
        assert_eq!(report.sequence_length, None);

        let store = IntervalStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert!(store.overlap(0, u64::MAX).is_empty());
    }

    #[rstest]
    fn test_randomized_against_in_memory_list(tempdir: TempDir) {
        let len = 5000;
        let mut rng = StdRng::seed_from_u64(2024);
        let mut builder: IntervalStoreBuilder<u32> =
            IntervalStoreBuilder::new("chr1").with_sequence_length(len);
        let mut entries = Vec::new();
        for i in 0..1000u32 {
            let start = rng.random_range(0..len - 300);
            let end = start + rng.random_range(0..300);
            // store half of them from the reverse strand
            if i % 2 == 0 {
                builder.push(fwd(start, end), Some(i));
            } else {
                builder.push(rev(len - end, len - start), Some(i));
            }
            entries.push(Entry { start, end, val: i });
        }
        let (store, report) = builder.build_and_open(tempdir.path().join("chr1.nms")).unwrap();
        let list = NCList::build(entries);
        assert_eq!(report.intervals, 1000);
        assert_eq!(report.roots, list.root_len());

        for _ in 0..200 {
            let start = rng.random_range(0..len);
            let end = start + rng.random_range(0..200);
            // same hits in the same pre-order
            let expected: Vec<(u64, u64)> =
                list.find_iter(start, end).map(|e| (e.start, e.end)).collect();
            assert_eq!(forward_bounds(&store.overlap(start, end), len), expected);

            let vals: Vec<u32> = store
                .overlap_with_payload::<u32>(start, end)
                .unwrap()
                .into_iter()
                .filter_map(|(_, p)| p)
                .collect();
            let expected_vals: Vec<u32> = list.find_iter(start, end).map(|e| e.val).collect();
            assert_eq!(vals, expected_vals);
        }
    }

    #[rstest]
    fn test_inferred_end(tempdir: TempDir) {
        let mut builder: IntervalStoreBuilder<u32> = IntervalStoreBuilder::new("chr1");
        builder.push(fwd(0, 10), None);
        builder.push(fwd(50, 700), None);
        let (store, report) = builder.build_and_open(tempdir.path().join("a.nms")).unwrap();
        assert_eq!(report.sequence_length, None);
        assert_eq!(report.inferred_end, Some(700));
        assert_eq!(store.sequence_length(), None);
        assert_eq!(store.inferred_end(), Some(700));

        // the inferred end is only a bound, so reverse queries still need a length
        assert!(matches!(
            store.overlap_interval(&rev(0, 10)),
            Err(StoreError::UnknownLength(_))
        ));
    }

    #[rstest]
    fn test_inferred_end_does_not_place_reverse_intervals(tempdir: TempDir) {
        let mut builder: IntervalStoreBuilder<u32> = IntervalStoreBuilder::new("chr1");
        builder.push(fwd(100, 200), None);
        builder.push(rev(0, 10), None);
        let path = tempdir.path().join("a.nms");
        assert!(matches!(builder.build(&path), Err(StoreError::BuildError(_))));
    }

    #[rstest]
    fn test_open_reverse_record_without_length(tempdir: TempDir) {
        let path = simple_store(tempdir.path()).path().to_path_buf();
        let mut bytes = fs::read(&path).unwrap();
        // flags live right after the magic and the version
        let flags = u32::from_le_bytes(bytes[12..16].try_into().unwrap());
        bytes[12..16].copy_from_slice(&(flags & !format::FLAG_LENGTH_KNOWN).to_le_bytes());
        fs::write(&path, bytes).unwrap();
        assert!(matches!(
            IntervalStore::open(&path),
            Err(StoreError::CorruptFormat { .. })
        ));
    }

    #[rstest]
    fn test_reverse_without_length_is_malformed(tempdir: TempDir) {
        let options = BuildOptions {
            lenient: false,
            infer_lengths: false,
        };
        let mut builder: IntervalStoreBuilder<u32> =
            IntervalStoreBuilder::new("chr1").with_options(options);
        builder.push(fwd(0, 10), None);
        builder.push(rev(0, 10), None);
        let path = tempdir.path().join("a.nms");
        assert!(matches!(builder.build(&path), Err(StoreError::BuildError(_))));
    }

    #[rstest]
    fn test_failed_build_leaves_nothing_behind(tempdir: TempDir) {
        let path = tempdir.path().join("chr1.nms");
        let mut builder: IntervalStoreBuilder<u32> =
            IntervalStoreBuilder::new("chr1").with_sequence_length(100);
        builder.push(fwd(0, 10), None);
        builder.push(fwd(50, 200), None);
        assert!(matches!(builder.build(&path), Err(StoreError::BuildError(_))));
        assert!(!path.exists());
        assert_eq!(fs::read_dir(tempdir.path()).unwrap().count(), 0);
    }

    #[rstest]
    fn test_failed_rebuild_keeps_old_store(tempdir: TempDir) {
        let store = simple_store(tempdir.path());
        let path = store.path().to_path_buf();
        drop(store);

        let mut builder: IntervalStoreBuilder<u32> = IntervalStoreBuilder::new("chr1");
        builder.push(Interval::forward("chr2", 0, 10).unwrap(), None);
        assert!(builder.build(&path).is_err());
        assert_eq!(IntervalStore::open(&path).unwrap().len(), 3);
    }

    #[rstest]
    fn test_lenient_skips_and_counts(tempdir: TempDir) {
        let mut builder: IntervalStoreBuilder<u32> = IntervalStoreBuilder::new("chr1")
            .with_sequence_length(100)
            .with_options(BuildOptions::lenient());
        builder.push(fwd(0, 10), None);
        builder.push(fwd(50, 200), None);
        builder.push(Interval::forward("chr2", 0, 10).unwrap(), None);
        builder.push(
            Interval {
                seq_id: "chr1".to_string(),
                start: 30,
                end: 20,
                orientation: Orientation::Forward,
            },
            None,
        );
        builder.push(rev(10, 20), None);
        let report = builder.build(tempdir.path().join("chr1.nms")).unwrap();
        assert_eq!(report.intervals, 2);
        assert_eq!(report.skipped, 3);
    }

    #[rstest]
    fn test_open_missing_is_not_found(tempdir: TempDir) {
        let result = IntervalStore::open(tempdir.path().join("nope.nms"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[rstest]
    #[case::bad_magic(0, b'X')]
    #[case::bad_version(8, 2)]
    fn test_open_corrupt_header(tempdir: TempDir, #[case] offset: usize, #[case] byte: u8) {
        let path = simple_store(tempdir.path()).path().to_path_buf();
        let mut bytes = fs::read(&path).unwrap();
        bytes[offset] = byte;
        fs::write(&path, bytes).unwrap();
        assert!(matches!(
            IntervalStore::open(&path),
            Err(StoreError::CorruptFormat { .. })
        ));
    }

    #[rstest]
    #[case(10)]
    #[case(80)]
    #[case(1)]
    fn test_open_truncated(tempdir: TempDir, #[case] keep: usize) {
        let path = simple_store(tempdir.path()).path().to_path_buf();
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len().min(keep)]).unwrap();
        assert!(matches!(
            IntervalStore::open(&path),
            Err(StoreError::CorruptFormat { .. })
        ));
    }

    #[rstest]
    fn test_open_bad_child_pointer(tempdir: TempDir) {
        let store = simple_store(tempdir.path());
        let path = store.path().to_path_buf();
        let records_offset = store.header().records_offset as usize;
        drop(store);

        let mut bytes = fs::read(&path).unwrap();
        // child_start of the first record
        let field = records_offset + 21;
        bytes[field..field + 8].copy_from_slice(&0u64.to_le_bytes());
        bytes[records_offset + 17..records_offset + 21].copy_from_slice(&5u32.to_le_bytes());
        fs::write(&path, bytes).unwrap();
        assert!(matches!(
            IntervalStore::open(&path),
            Err(StoreError::CorruptFormat { .. })
        ));
    }
}
