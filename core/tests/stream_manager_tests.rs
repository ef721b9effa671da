/// Behavioural tests for the stream operations, run against the in-memory volume
/// These cover list/add/copy-out/remove semantics without needing NTFS

#[cfg(test)]
mod stream_manager_tests {
    use adstream_core::test_utils::MockStreamManager;
    use adstream_core::{CopyOptions, StreamDescriptor, StreamError, StreamManager};
    use std::path::Path;

    const REPORT: &str = "C:\\work\\report.txt";
    const NOTE: &str = "C:\\work\\note.txt";
    const OUT: &str = "C:\\work\\out.bin";

    fn volume() -> MockStreamManager {
        let manager = MockStreamManager::new();
        manager.insert_file(REPORT, b"0123456789");
        manager.insert_file(NOTE, b"hello");
        manager
    }

    fn names(manager: &MockStreamManager, file: &str) -> Vec<String> {
        manager
            .list_streams(Path::new(file))
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect()
    }

    #[test]
    fn test_plain_file_lists_only_default_stream() {
        let manager = volume();
        let streams = manager.list_streams(Path::new(REPORT)).unwrap();
        assert_eq!(streams, vec![StreamDescriptor::new("::$DATA", 10)]);
    }

    #[test]
    fn test_report_scenario() {
        let manager = volume();
        let report = Path::new(REPORT);

        manager.add_stream(report, Path::new(NOTE), "meta").unwrap();
        let streams = manager.list_streams(report).unwrap();
        assert_eq!(streams.len(), 2);
        assert!(streams.contains(&StreamDescriptor::new(":meta:$DATA", 5)));
        assert!(
            streams.contains(&StreamDescriptor::new("::$DATA", 10)),
            "Adding a stream must not change the primary content size"
        );

        manager.delete_stream(report, ":meta:$DATA").unwrap();
        assert_eq!(names(&manager, REPORT), vec!["::$DATA"]);
    }

    #[test]
    fn test_add_then_copy_out_round_trips_content() {
        let manager = volume();
        manager.add_stream(Path::new(REPORT), Path::new(NOTE), "meta").unwrap();

        let copied = manager
            .copy_stream(Path::new(REPORT), ":meta:$DATA", Path::new(OUT))
            .unwrap();

        assert_eq!(copied, 5);
        assert_eq!(manager.read_file(Path::new(OUT)).unwrap(), b"hello");
    }

    #[test]
    fn test_add_twice_overwrites() {
        let manager = volume();
        manager.insert_file("C:\\work\\longer.txt", b"a longer note");
        let report = Path::new(REPORT);

        manager.add_stream(report, Path::new(NOTE), "meta").unwrap();
        manager
            .add_stream(report, Path::new("C:\\work\\longer.txt"), "meta")
            .unwrap();

        let streams = manager.list_streams(report).unwrap();
        let meta: Vec<_> = streams.iter().filter(|s| s.name == ":meta:$DATA").collect();
        assert_eq!(meta.len(), 1, "Second add must replace, not duplicate");
        assert_eq!(meta[0].size, 13);
        assert_eq!(manager.read_stream(report, "meta").unwrap(), b"a longer note");
    }

    #[test]
    fn test_copy_out_after_remove_is_not_found() {
        let manager = volume();
        let report = Path::new(REPORT);
        manager.add_stream(report, Path::new(NOTE), "meta").unwrap();
        manager.delete_stream(report, ":meta:$DATA").unwrap();

        let result = manager.copy_stream(report, ":meta:$DATA", Path::new(OUT));
        assert!(
            matches!(result, Err(StreamError::StreamNotFound { .. })),
            "Expected StreamNotFound, got {:?}",
            result
        );
    }

    #[test]
    fn test_copy_out_of_missing_stream_leaves_destination_alone() {
        let manager = volume();
        manager.insert_file(OUT, b"keep me");

        let result = manager.copy_stream(Path::new(REPORT), ":ghost:$DATA", Path::new(OUT));
        assert!(result.is_err());
        assert_eq!(manager.read_file(Path::new(OUT)).unwrap(), b"keep me");

        let fresh = Path::new("C:\\work\\never.bin");
        let _ = manager.copy_stream(Path::new(REPORT), ":ghost:$DATA", fresh);
        assert!(!manager.contains_file(fresh), "Destination must not be created");
    }

    #[test]
    fn test_copy_out_truncates_existing_destination() {
        let manager = volume();
        manager.insert_file(OUT, b"this is much longer than the stream");
        manager.add_stream(Path::new(REPORT), Path::new(NOTE), "meta").unwrap();

        manager
            .copy_stream(Path::new(REPORT), ":meta:$DATA", Path::new(OUT))
            .unwrap();
        assert_eq!(manager.read_file(Path::new(OUT)).unwrap(), b"hello");
    }

    #[test]
    fn test_copy_out_of_default_stream() {
        let manager = volume();
        manager
            .copy_stream(Path::new(REPORT), "::$DATA", Path::new(OUT))
            .unwrap();
        assert_eq!(manager.read_file(Path::new(OUT)).unwrap(), b"0123456789");
    }

    #[test]
    fn test_copy_out_with_small_chunks() {
        let manager = MockStreamManager::with_options(CopyOptions { chunk_size: 3 });
        manager.insert_file(REPORT, b"");
        let payload: Vec<u8> = (0..=255u8).cycle().take(4096 + 7).collect();
        manager.insert_file(NOTE, &payload);
        manager.add_stream(Path::new(REPORT), Path::new(NOTE), "blob").unwrap();

        let copied = manager
            .copy_stream(Path::new(REPORT), ":blob:$DATA", Path::new(OUT))
            .unwrap();
        assert_eq!(copied, payload.len() as u64);
        assert_eq!(manager.read_file(Path::new(OUT)).unwrap(), payload);
    }

    #[test]
    fn test_stream_removed_between_locate_and_open() {
        let manager = volume();
        manager.add_stream(Path::new(REPORT), Path::new(NOTE), "meta").unwrap();
        manager.vanish_before_open(REPORT, ":meta:$DATA");

        let result = manager.copy_stream(Path::new(REPORT), ":meta:$DATA", Path::new(OUT));
        assert!(
            matches!(result, Err(StreamError::Open { .. })),
            "Expected Open error, got {:?}",
            result
        );
        assert!(!manager.contains_file(Path::new(OUT)));
    }

    #[test]
    fn test_copy_out_requires_listed_name_verbatim() {
        let manager = volume();
        manager.add_stream(Path::new(REPORT), Path::new(NOTE), "meta").unwrap();

        for shorthand in [":meta", ":"] {
            let result = manager.copy_stream(Path::new(REPORT), shorthand, Path::new(OUT));
            assert!(
                matches!(result, Err(StreamError::StreamNotFound { .. })),
                "{:?} must not resolve to a listed stream, got {:?}",
                shorthand,
                result
            );
        }
        assert!(!manager.contains_file(Path::new(OUT)));
    }

    #[test]
    fn test_copy_out_onto_its_own_stream_is_refused() {
        let manager = volume();
        let report = Path::new(REPORT);
        manager.add_stream(report, Path::new(NOTE), "meta").unwrap();

        let onto_self = Path::new("C:\\work\\report.txt:meta:$DATA");
        let result = manager.copy_stream(report, ":meta:$DATA", onto_self);
        assert!(
            matches!(result, Err(StreamError::Open { .. })),
            "Expected Open error, got {:?}",
            result
        );
        assert_eq!(manager.read_stream(report, "meta").unwrap(), b"hello");

        let result = manager.copy_stream(report, "::$DATA", report);
        assert!(matches!(result, Err(StreamError::Open { .. })));
        assert_eq!(manager.read_file(report).unwrap(), b"0123456789");
    }

    #[test]
    fn test_list_missing_file_is_enumeration_error() {
        let manager = volume();
        let result = manager.list_streams(Path::new("C:\\work\\missing.txt"));
        assert!(matches!(result, Err(StreamError::Enumeration { .. })));
    }

    #[test]
    fn test_copy_out_of_missing_file_is_enumeration_error() {
        let manager = volume();
        let result = manager.copy_stream(
            Path::new("C:\\work\\missing.txt"),
            ":meta:$DATA",
            Path::new(OUT),
        );
        assert!(matches!(result, Err(StreamError::Enumeration { .. })));
    }

    #[test]
    fn test_add_from_missing_source_is_write_error() {
        let manager = volume();
        let result = manager.add_stream(Path::new(REPORT), Path::new("C:\\work\\nope"), "meta");
        assert!(matches!(result, Err(StreamError::Write { .. })));
        assert_eq!(names(&manager, REPORT), vec!["::$DATA"]);
    }

    #[test]
    fn test_add_rejects_full_form_label() {
        let manager = volume();
        let result = manager.add_stream(Path::new(REPORT), Path::new(NOTE), ":meta:$DATA");
        assert!(matches!(result, Err(StreamError::InvalidStreamName(_))));
    }

    #[test]
    fn test_remove_missing_stream_is_delete_error() {
        let manager = volume();
        let result = manager.delete_stream(Path::new(REPORT), ":ghost:$DATA");
        assert!(matches!(result, Err(StreamError::Delete { .. })));
    }

    #[test]
    fn test_remove_refuses_default_stream_and_bare_labels() {
        let manager = volume();
        assert!(matches!(
            manager.delete_stream(Path::new(REPORT), "::$DATA"),
            Err(StreamError::InvalidStreamName(_))
        ));
        assert!(matches!(
            manager.delete_stream(Path::new(REPORT), "meta"),
            Err(StreamError::InvalidStreamName(_))
        ));
        assert_eq!(manager.read_file(Path::new(REPORT)).unwrap(), b"0123456789");
    }

    #[test]
    fn test_descriptors_serialize_as_name_and_size() {
        let manager = volume();
        let streams = manager.list_streams(Path::new(REPORT)).unwrap();
        let json = serde_json::to_string(&streams).unwrap();
        assert_eq!(json, r#"[{"name":"::$DATA","size":10}]"#);
    }
}
