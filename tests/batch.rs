//! Integration tests for single-file and batch runs over real files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chatfilter::batch::BatchRunner;
use chatfilter::config::FilterConfig;
use chatfilter::core::{FilterResult, filter_text};
use chatfilter::{ChatfilterError, Result};
use tempfile::{TempDir, tempdir};
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;

// ============================================================================
// Fixtures
// ============================================================================

const CHAT1: &str = "\
[2024-05-01 20:00:00] 시청자1: 안녕하세요
[2024-05-01 20:00:01] [SYSTEM] 방송이 시작되었습니다
[2024-05-01 20:00:02] ***님이 입장했습니다.
[2024-05-01 20:00:03] 시청자2: {\"emoji\": \"heart\"}
[2024-05-01 20:00:04] 시청자3: 오늘 방송 몇 시까지 해요?
";

const CHAT2: &str = "\
[2024-05-02 21:00:00] viewer_a: first message of day two
[2024-05-02 21:00:01] viewer_b:\x20\x20
[2024-05-02 21:00:02] connection reset
[2024-05-02 21:00:03] viewer_c: ratio: 2:1
";

const CHAT3: &str = "\
[2024-05-03 22:00:00] 시청자9: 마지막 날
[2024-05-03 22:00:01] 시청자8: ㄷㄷ 대박
[2024-05-03 22:00:02] 시청자7: 다음에 또 봐요";

const INVALID_UTF8: &[u8] = b"\xff\xfe not utf-8: at all\n";

/// Shared in-memory log sink.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (Dispatch, LogBuffer) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (Dispatch::new(subscriber), buffer)
}

/// Writes files in the given order and returns the directory.
fn setup_dir(files: &[(&str, &[u8])]) -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn batch_runner() -> BatchRunner {
    BatchRunner::new(FilterConfig::batch_defaults())
}

fn run_dir(runner: &BatchRunner, dir: &Path, output: &Path) -> Result<chatfilter::core::BatchSummary> {
    runner.run_directory(dir, "chat*.log", output)
}

// ============================================================================
// Single-file mode
// ============================================================================

mod single_file {
    use super::*;

    #[test]
    fn test_extracts_messages() {
        let dir = setup_dir(&[("chat1.log", CHAT1.as_bytes())]);
        let output = dir.path().join("out.log");

        let result = BatchRunner::new(FilterConfig::default())
            .run_single(&dir.path().join("chat1.log"), &output)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "안녕하세요\n오늘 방송 몇 시까지 해요?\n"
        );
        assert_eq!(
            result,
            FilterResult {
                lines_read: 5,
                lines_ignored: 3,
                lines_dropped: 0,
                messages_written: 2,
            }
        );
    }

    #[test]
    fn test_output_is_overwritten() {
        let dir = setup_dir(&[("chat2.log", CHAT2.as_bytes())]);
        let output = dir.path().join("out.log");
        fs::write(&output, "stale content from a previous run\n").unwrap();
        let runner = BatchRunner::new(FilterConfig::default());

        runner.run_single(&dir.path().join("chat2.log"), &output).unwrap();
        runner.run_single(&dir.path().join("chat2.log"), &output).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "first message of day two\nratio: 2:1\n"
        );
    }

    #[test]
    fn test_missing_input_leaves_output_untouched() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.log");
        fs::write(&output, "keep me\n").unwrap();

        let err = BatchRunner::new(FilterConfig::default())
            .run_single(&dir.path().join("missing.log"), &output)
            .unwrap_err();

        assert!(matches!(err, ChatfilterError::MissingInput { kind: "file", .. }));
        assert_eq!(fs::read_to_string(&output).unwrap(), "keep me\n");
    }

    #[test]
    fn test_output_cannot_be_created() {
        let dir = setup_dir(&[("chat1.log", CHAT1.as_bytes())]);
        let output = dir.path().join("no_such_dir").join("out.log");

        let err = BatchRunner::new(FilterConfig::default())
            .run_single(&dir.path().join("chat1.log"), &output)
            .unwrap_err();
        assert!(err.is_output_open());
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let dir = setup_dir(&[("bad.log", INVALID_UTF8)]);

        let err = BatchRunner::new(FilterConfig::default())
            .run_single(&dir.path().join("bad.log"), &dir.path().join("out.log"))
            .unwrap_err();
        assert!(matches!(err, ChatfilterError::FileRead { .. }));
    }

    #[test]
    fn test_output_same_as_input_is_rejected() {
        let dir = setup_dir(&[("chat.log", "a: hello\nb: world\n".as_bytes())]);
        let input = dir.path().join("chat.log");
        let same = dir.path().join(".").join("chat.log");

        let err = BatchRunner::new(FilterConfig::default())
            .run_single(&input, &same)
            .unwrap_err();

        assert!(matches!(err, ChatfilterError::InvalidConfig { .. }));
        assert_eq!(fs::read_to_string(&input).unwrap(), "a: hello\nb: world\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_is_fatal() {
        let dir = setup_dir(&[("chat2.log", CHAT2.as_bytes())]);

        let err = BatchRunner::new(FilterConfig::default())
            .run_single(&dir.path().join("chat2.log"), Path::new("/dev/full"))
            .unwrap_err();

        assert!(matches!(err, ChatfilterError::Unexpected { .. }));
        assert!(err.is_per_file());
    }

    #[test]
    fn test_logs_counters() {
        let dir = setup_dir(&[("chat1.log", CHAT1.as_bytes())]);
        let (dispatch, logs) = capture_logs();

        BatchRunner::new(FilterConfig::default())
            .with_dispatch(dispatch)
            .run_single(&dir.path().join("chat1.log"), &dir.path().join("out.log"))
            .unwrap();

        let logs = logs.contents();
        assert!(logs.contains("Lines read: 5"));
        assert!(logs.contains("Lines ignored (matched a pattern): 3"));
        assert!(logs.contains("Messages extracted: 2"));
    }
}

// ============================================================================
// Batch mode
// ============================================================================

mod batch_mode {
    use super::*;

    #[test]
    fn test_processing_order_is_sorted() {
        // Created out of order on purpose
        let dir = setup_dir(&[
            ("chat3.log", CHAT3.as_bytes()),
            ("chat1.log", CHAT1.as_bytes()),
            ("chat2.log", CHAT2.as_bytes()),
        ]);
        let output = dir.path().join("combined.log");

        let summary = run_dir(&batch_runner(), dir.path(), &output).unwrap();

        let config = FilterConfig::batch_defaults();
        let expected: String = [CHAT1, CHAT2, CHAT3]
            .iter()
            .map(|log| filter_text(log, &config).0)
            .collect();
        assert_eq!(fs::read_to_string(&output).unwrap(), expected);
        assert_eq!(summary.files_found, 3);
        assert_eq!(summary.files_processed, 3);
    }

    #[test]
    fn test_explicit_inputs_are_sorted() {
        let dir = setup_dir(&[
            ("chat1.log", CHAT1.as_bytes()),
            ("chat2.log", CHAT2.as_bytes()),
            ("chat3.log", CHAT3.as_bytes()),
        ]);
        let sorted_out = dir.path().join("sorted.log");
        let shuffled_out = dir.path().join("shuffled.log");
        let path = |name: &str| dir.path().join(name);
        let runner = batch_runner();

        runner
            .run_batch(&[path("chat1.log"), path("chat2.log"), path("chat3.log")], &sorted_out)
            .unwrap();
        runner
            .run_batch(&[path("chat3.log"), path("chat1.log"), path("chat2.log")], &shuffled_out)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&sorted_out).unwrap(),
            fs::read_to_string(&shuffled_out).unwrap()
        );
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = setup_dir(&[
            ("chat1.log", CHAT1.as_bytes()),
            ("chat2.log", INVALID_UTF8),
            ("chat3.log", CHAT3.as_bytes()),
        ]);
        let output = dir.path().join("combined.log");
        let (dispatch, logs) = capture_logs();

        let summary = run_dir(&batch_runner().with_dispatch(dispatch), dir.path(), &output).unwrap();

        assert_eq!(summary.files_found, 3);
        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.files_failed(), 1);
        assert_eq!(summary.failures[0].path, dir.path().join("chat2.log"));

        let combined = fs::read_to_string(&output).unwrap();
        assert!(combined.starts_with("안녕하세요\n"));
        assert!(combined.ends_with("다음에 또 봐요"));
        assert!(!combined.contains("not utf-8"));

        let logs = logs.contents();
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("Skipping chat2.log"));
    }

    #[test]
    fn test_missing_explicit_input_is_skipped() {
        let dir = setup_dir(&[("chat1.log", CHAT1.as_bytes())]);
        let output = dir.path().join("combined.log");

        let summary = batch_runner()
            .run_batch(
                &[dir.path().join("chat1.log"), dir.path().join("chat9.log")],
                &output,
            )
            .unwrap();

        assert_eq!(summary.files_processed, 1);
        assert_eq!(summary.files_failed(), 1);
        assert!(summary.failures[0].reason.contains("chat9.log"));
    }

    #[test]
    fn test_empty_batch_is_not_an_error() {
        let dir = setup_dir(&[("notes.txt", "user: not a chat log\n".as_bytes())]);
        let output = dir.path().join("combined.log");
        let (dispatch, logs) = capture_logs();

        let summary = run_dir(&batch_runner().with_dispatch(dispatch), dir.path(), &output).unwrap();

        assert!(summary.is_empty());
        assert_eq!(summary.totals, FilterResult::default());
        assert!(!output.exists());
        assert!(logs.contents().contains("WARN"));
    }

    #[test]
    fn test_empty_batch_leaves_existing_output_unchanged() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("combined.log");
        fs::write(&output, "earlier\n").unwrap();

        run_dir(&batch_runner().with_truncate(true), dir.path(), &output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "earlier\n");
    }

    #[test]
    fn test_appends_to_existing_output() {
        let dir = setup_dir(&[("chat2.log", CHAT2.as_bytes())]);
        let output = dir.path().join("combined.log");
        fs::write(&output, "earlier\n").unwrap();
        let runner = batch_runner();

        run_dir(&runner, dir.path(), &output).unwrap();
        run_dir(&runner, dir.path(), &output).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "earlier\nfirst message of day two\nratio: 2:1\n\
             first message of day two\nratio: 2:1\n"
        );
    }

    #[test]
    fn test_truncate_replaces_existing_output() {
        let dir = setup_dir(&[("chat2.log", CHAT2.as_bytes())]);
        let output = dir.path().join("combined.log");
        fs::write(&output, "earlier\n").unwrap();
        let runner = batch_runner().with_truncate(true);

        run_dir(&runner, dir.path(), &output).unwrap();
        run_dir(&runner, dir.path(), &output).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "first message of day two\nratio: 2:1\n"
        );
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempdir().unwrap();
        let err = run_dir(
            &batch_runner(),
            &dir.path().join("chat_samples"),
            &dir.path().join("out.log"),
        )
        .unwrap_err();

        assert!(matches!(err, ChatfilterError::MissingInput { kind: "directory", .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_combined_output_open_failure_is_fatal() {
        let dir = setup_dir(&[("chat1.log", CHAT1.as_bytes())]);
        let output: PathBuf = dir.path().join("missing").join("combined.log");

        let err = run_dir(&batch_runner(), dir.path(), &output).unwrap_err();
        assert!(err.is_output_open());
    }

    #[test]
    fn test_counter_conservation() {
        let dir = setup_dir(&[
            ("chat1.log", CHAT1.as_bytes()),
            ("chat2.log", CHAT2.as_bytes()),
            ("chat3.log", CHAT3.as_bytes()),
        ]);
        let summary = run_dir(&batch_runner(), dir.path(), &dir.path().join("out.log")).unwrap();

        assert!(summary.totals.is_balanced());
        assert_eq!(summary.totals.lines_read, 12);
        // chat1: [SYSTEM], join notice, JSON; chat3: ㄷㄷ
        assert_eq!(summary.totals.lines_ignored, 4);
        // chat2: blank message, no separator
        assert_eq!(summary.totals.lines_dropped, 2);
        assert_eq!(summary.totals.messages_written, 6);
    }

    #[test]
    fn test_summary_is_logged() {
        let dir = setup_dir(&[("chat1.log", CHAT1.as_bytes()), ("chat2.log", CHAT2.as_bytes())]);
        let (dispatch, logs) = capture_logs();

        run_dir(&batch_runner().with_dispatch(dispatch), dir.path(), &dir.path().join("out.log"))
            .unwrap();

        let logs = logs.contents();
        assert!(logs.contains("--- Done: chat1.log (read: 5, ignored: 3, written: 2) ---"));
        assert!(logs.contains("--- Done: chat2.log (read: 4, ignored: 0, written: 2) ---"));
        assert!(logs.contains("Files processed: 2 / 2"));
        assert!(logs.contains("Total lines read: 9"));
        assert!(logs.contains("Total messages written: 4"));
    }

    #[test]
    fn test_custom_pattern_and_separator() {
        let dir = setup_dir(&[
            ("stream-a.txt", "alice > hi > all\nbot > [AD] buy now\n".as_bytes()),
            ("stream-b.txt", "carol > bye\n".as_bytes()),
            ("chat1.log", CHAT1.as_bytes()),
        ]);
        let output = dir.path().join("out.txt");
        let config = FilterConfig::without_ignores()
            .with_ignore_pattern("[AD]")
            .with_separator(" > ");

        let summary = BatchRunner::new(config)
            .run_directory(dir.path(), "stream-*.txt", &output)
            .unwrap();

        assert_eq!(summary.files_processed, 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "hi > all\nbye\n");
    }

    #[test]
    fn test_combined_output_inside_input_dir_is_not_an_input() {
        let dir = setup_dir(&[("chat1.log", "u: ratio: 2:1\n".as_bytes())]);
        let output = dir.path().join("out.log");
        let (dispatch, logs) = capture_logs();
        let runner = batch_runner().with_dispatch(dispatch);

        runner.run_directory(dir.path(), "*.log", &output).unwrap();
        let summary = runner.run_directory(dir.path(), "*.log", &output).unwrap();

        assert_eq!(summary.files_found, 1);
        assert_eq!(summary.files_processed, 1);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "ratio: 2:1\nratio: 2:1\n"
        );
        assert!(logs.contents().contains("Not reading combined output"));
    }

    #[test]
    fn test_only_output_matching_is_empty_batch() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("chat_all.log");
        fs::write(&output, "earlier: run\n").unwrap();

        let summary = batch_runner()
            .with_truncate(true)
            .run_directory(dir.path(), "chat*.log", &output)
            .unwrap();

        assert!(summary.is_empty());
        assert_eq!(fs::read_to_string(&output).unwrap(), "earlier: run\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_skips_each_file() {
        let dir = setup_dir(&[("chat1.log", CHAT1.as_bytes()), ("chat2.log", CHAT2.as_bytes())]);
        let inputs = [dir.path().join("chat1.log"), dir.path().join("chat2.log")];

        let summary = batch_runner()
            .run_batch(&inputs, Path::new("/dev/full"))
            .unwrap();

        assert_eq!(summary.files_found, 2);
        assert_eq!(summary.files_processed, 0);
        assert_eq!(summary.files_failed(), 2);
        for (failure, input) in summary.failures.iter().zip(&inputs) {
            assert_eq!(&failure.path, input);
            assert!(failure.reason.starts_with("Unexpected error while processing"));
        }
    }
}
