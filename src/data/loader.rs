//! Loader for the line-oriented dataset format:
//!
//! ```text
//! <label>:<f1>,<f2>,...,<fN>
//! ```
//!
//! - one record per line, no header, no escaping
//! - surrounding whitespace is ignored
//! - blank lines and lines starting with `#` are skipped
//! - every record must have the same number of features as the first one

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::data::dataset::{Dataset, Record};
use crate::error::{Error, ParseError, ParseErrorKind, Result};

/// What to do with a line that fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Fail the whole load on the first bad line.
    #[default]
    Abort,
    /// Log a warning naming the line and continue with the next one.
    SkipAndLog,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads and parses the dataset file at `path`.
///
/// A missing or unreadable file is `Error::NotFound`. An empty file yields an
/// empty dataset. A line that is not valid UTF-8 is a parse error like any
/// other and goes through `policy`.
pub fn load_file(path: impl AsRef<Path>, policy: ErrorPolicy) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::NotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let lines = BufReader::new(file).split(b'\n').map(|line| {
        line.map_err(|source| Error::Io { path: path.to_path_buf(), source })
    });
    let dataset = parse_lines(lines, policy)?;

    log::info!(
        "loaded {} records with {} features from {}",
        dataset.len(),
        dataset.feature_count().unwrap_or(0),
        path.display()
    );
    Ok(dataset)
}

/// Parses dataset text already held in memory.
pub fn parse_str(text: &str, policy: ErrorPolicy) -> Result<Dataset> {
    parse_lines(text.lines().map(|l| Ok(l.as_bytes().to_vec())), policy)
}

/// Parses one line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> std::result::Result<Option<Record>, ParseErrorKind> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (label_part, features_part) = line
        .split_once(':')
        .ok_or(ParseErrorKind::MissingColon)?;

    let label_part = label_part.trim();
    let label = label_part
        .parse::<i64>()
        .map_err(|_| ParseErrorKind::InvalidLabel(label_part.to_string()))?;

    let features = features_part
        .split(',')
        .enumerate()
        .map(|(index, token)| {
            let token = token.trim();
            token.parse::<f64>().map_err(|_| ParseErrorKind::InvalidFeature {
                index,
                token: token.to_string(),
            })
        })
        .collect::<std::result::Result<Vec<f64>, _>>()?;

    Ok(Some(Record::new(label, features)))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn parse_lines<I>(lines: I, policy: ErrorPolicy) -> Result<Dataset>
where
    I: Iterator<Item = Result<Vec<u8>>>,
{
    let mut records: Vec<Record> = Vec::new();
    let mut width: Option<usize> = None;
    let mut skipped = 0usize;

    for (idx, bytes) in lines.enumerate() {
        let line_no = idx + 1;
        let (line, parsed) = match String::from_utf8(bytes?) {
            Ok(line) => {
                let parsed = parse_line(&line).and_then(|record| match (record, width) {
                    (Some(r), Some(expected)) if r.features.len() != expected => {
                        Err(ParseErrorKind::ShapeMismatch { expected, found: r.features.len() })
                    }
                    (record, _) => Ok(record),
                });
                (line, parsed)
            }
            Err(err) => {
                let line = String::from_utf8_lossy(err.as_bytes()).into_owned();
                (line, Err(ParseErrorKind::InvalidEncoding))
            }
        };

        match parsed {
            Ok(Some(record)) => {
                if width.is_none() {
                    width = Some(record.features.len());
                }
                records.push(record);
            }
            Ok(None) => {}
            Err(kind) => {
                let err = ParseError { line: line_no, content: line.trim().to_string(), kind };
                match policy {
                    ErrorPolicy::Abort => return Err(err.into()),
                    ErrorPolicy::SkipAndLog => {
                        log::warn!("skipping {err}");
                        skipped += 1;
                    }
                }
            }
        }
    }

    if skipped > 0 {
        log::warn!("skipped {skipped} malformed lines");
    }
    Dataset::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(text: &str) -> Result<Dataset> {
        parse_str(text, ErrorPolicy::Abort)
    }

    fn parse_err(text: &str) -> ParseError {
        match parse(text) {
            Err(Error::Parse(err)) => err,
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_two_records() {
        let ds = parse("0:5.1,3.5,1.4,0.2\n1:6.4,3.2,4.5,1.5\n").unwrap();
        assert_eq!(ds.records(), &[
            Record::new(0, vec![5.1, 3.5, 1.4, 0.2]),
            Record::new(1, vec![6.4, 3.2, 4.5, 1.5]),
        ]);
    }

    #[test]
    fn test_whitespace_blank_lines_and_comments() {
        let ds = parse("# converted iris\n  2:1.0, 2.0 \r\n\n\t0 :3.0,4.0\n").unwrap();
        assert_eq!(ds.labels(), vec![2, 0]);
        assert_eq!(ds.features(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_order_is_preserved() {
        let text: String = (0..50).map(|i| format!("{}:{}.5,1\n", 49 - i, i)).collect();
        let ds = parse(&text).unwrap();
        assert_eq!(ds.len(), 50);
        assert_eq!(ds.labels(), (0..50).rev().collect::<Vec<i64>>());
        assert!(ds.records().iter().all(|r| r.features.len() == 2));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n   \n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_colon() {
        let err = parse_err("0:1.0,2.0\n1;1.0,2.0\n");
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ParseErrorKind::MissingColon);
        assert_eq!(err.content, "1;1.0,2.0");
    }

    #[test]
    fn test_invalid_label() {
        let err = parse_err("setosa:1.0,2.0\n");
        assert_eq!(err.line, 1);
        assert_eq!(err.kind, ParseErrorKind::InvalidLabel("setosa".into()));
        assert_eq!(parse_err("1.5:1.0\n").kind, ParseErrorKind::InvalidLabel("1.5".into()));
    }

    #[test]
    fn test_invalid_feature() {
        let err = parse_err("0:1.0,abc,3.0\n");
        assert_eq!(err.kind, ParseErrorKind::InvalidFeature { index: 1, token: "abc".into() });
        let err = parse_err("0:\n");
        assert_eq!(err.kind, ParseErrorKind::InvalidFeature { index: 0, token: String::new() });
    }

    #[test]
    fn test_inconsistent_feature_counts() {
        let err = parse_err("0:1.0,2.0\n0:1.0,2.0,3.0\n");
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ParseErrorKind::ShapeMismatch { expected: 2, found: 3 });
    }

    #[test]
    fn test_skip_and_log() {
        let text = "0:1.0,2.0\nbroken\n1:x,2.0\n0:1.0\n2:3.0,4.0\n";
        let ds = parse_str(text, ErrorPolicy::SkipAndLog).unwrap();
        assert_eq!(ds.labels(), vec![0, 2]);
    }

    #[test]
    fn test_round_trip() {
        let ds = parse("0:5.1,3.5,1.4,0.2\n2:6.333333,-3.2,4.5e-3,1.5\n1:0,0,0,0\n").unwrap();
        let back = parse(&ds.to_lines(6)).unwrap();
        assert_eq!(back.labels(), ds.labels());
        for (a, b) in ds.records().iter().zip(back.records()) {
            for (x, y) in a.features.iter().zip(&b.features) {
                assert!((x - y).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("iris-bench-loader-{}.txt", std::process::id()));
        {
            let mut f = File::create(&path).unwrap();
            write!(f, "0:5.1,3.5,1.4,0.2\n1:6.4,3.2,4.5,1.5\n2:6.3,3.3,6.0,2.5\n").unwrap();
        }
        let ds = load_file(&path, ErrorPolicy::Abort).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(ds.labels(), vec![0, 1, 2]);
        assert_eq!(ds.feature_count(), Some(4));
    }

    #[test]
    fn test_missing_file() {
        let err = load_file("/definitely/not/here/iris.txt", ErrorPolicy::Abort).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    fn load_bytes(name: &str, bytes: &[u8], policy: ErrorPolicy) -> Result<Dataset> {
        let path = std::env::temp_dir().join(format!("iris-bench-{}-{name}", std::process::id()));
        std::fs::write(&path, bytes).unwrap();
        let result = load_file(&path, policy);
        std::fs::remove_file(&path).unwrap();
        result
    }

    #[test]
    fn test_invalid_utf8_line_aborts_with_line_number() {
        let bytes = b"0:1.0,2.0\n1:\xff\xfe,2.0\n2:3.0,4.0\n";
        match load_bytes("utf8-abort.txt", bytes, ErrorPolicy::Abort) {
            Err(Error::Parse(err)) => {
                assert_eq!(err.line, 2);
                assert_eq!(err.kind, ParseErrorKind::InvalidEncoding);
                assert!(err.content.starts_with("1:"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let bytes = b"0:1.0,2.0\n1:\xff\xfe,2.0\n2:3.0,4.0\n";
        let ds = load_bytes("utf8-skip.txt", bytes, ErrorPolicy::SkipAndLog).unwrap();
        assert_eq!(ds.labels(), vec![0, 2]);
    }

    #[test]
    fn test_load_file_handles_crlf_and_missing_final_newline() {
        let ds = load_bytes("crlf.txt", b"0:1.0,2.0\r\n1:3.0,4.0", ErrorPolicy::Abort).unwrap();
        assert_eq!(ds.labels(), vec![0, 1]);
        assert_eq!(ds.features(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }
}
