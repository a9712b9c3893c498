//! Line classification and parsing for session logs.
//!
//! Each line is either a user declaration
//! (`user,<id>,<first_name>,<last_name>,<age>`) or a session
//! (`session,<user_id>,<session_id>,<browser>,<time>,<date>`). Fields are
//! positional and comma separated with no quoting.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use stats_core::error::{Result, StatsError};
use stats_core::models::{ClassificationMode, Session, UserAttributes};
use tracing::debug;

/// Field delimiter used by every line.
pub const SEPARATOR: char = ',';

/// Discriminator value of a user line.
pub const USER_MARKER: &str = "user";

const USER_FIELDS: usize = 5;
const SESSION_FIELDS: usize = 6;

// ── Records ───────────────────────────────────────────────────────────────────

/// What a single input line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    User(UserAttributes),
    Session(Session),
    /// Empty or whitespace-only line.
    Blank,
}

/// A classified line together with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// 1-based line number.
    pub line_number: usize,
    pub record: LogRecord,
    /// Number of positional fields the line was short of. Missing fields
    /// are filled with empty strings.
    pub missing_fields: usize,
}

impl ParsedLine {
    pub fn is_malformed(&self) -> bool {
        self.missing_fields > 0
    }
}

// ── Classification & parsing ──────────────────────────────────────────────────

/// Returns `true` when `line` declares a new user under `mode`.
pub fn is_user_line(line: &str, mode: ClassificationMode) -> bool {
    match mode {
        ClassificationMode::Strict => line
            .split(SEPARATOR)
            .next()
            .is_some_and(|first| first.trim() == USER_MARKER),
        ClassificationMode::Substring => line.contains(USER_MARKER),
    }
}

/// Parse a user line. The discriminator in position 0 is discarded.
///
/// Returns the attributes and the number of missing fields.
pub fn parse_user(line: &str) -> (UserAttributes, usize) {
    let fields: Vec<&str> = line.split(SEPARATOR).collect();
    let attributes = UserAttributes {
        id: field(&fields, 1),
        first_name: field(&fields, 2),
        last_name: field(&fields, 3),
        age: field(&fields, 4),
    };
    (attributes, USER_FIELDS.saturating_sub(fields.len()))
}

/// Parse a session line. The discriminator in position 0 is discarded.
///
/// Returns the session and the number of missing fields.
pub fn parse_session(line: &str) -> (Session, usize) {
    let fields: Vec<&str> = line.split(SEPARATOR).collect();
    let session = Session {
        user_id: field(&fields, 1),
        session_id: field(&fields, 2),
        browser: field(&fields, 3),
        time: field(&fields, 4),
        date: field(&fields, 5),
    };
    (session, SESSION_FIELDS.saturating_sub(fields.len()))
}

/// Classify and parse one raw line.
pub fn parse_line(line_number: usize, line: &str, mode: ClassificationMode) -> ParsedLine {
    if line.trim().is_empty() {
        return ParsedLine {
            line_number,
            record: LogRecord::Blank,
            missing_fields: 0,
        };
    }

    let (record, missing_fields) = if is_user_line(line, mode) {
        let (user, missing) = parse_user(line);
        (LogRecord::User(user), missing)
    } else {
        let (session, missing) = parse_session(line);
        (LogRecord::Session(session), missing)
    };

    if missing_fields > 0 {
        debug!(
            "Line {} is missing {} field(s); treating them as empty",
            line_number, missing_fields
        );
    }

    ParsedLine {
        line_number,
        record,
        missing_fields,
    }
}

fn field(fields: &[&str], index: usize) -> String {
    fields
        .get(index)
        .map(|value| value.to_string())
        .unwrap_or_default()
}

// ── Line reader ───────────────────────────────────────────────────────────────

/// Iterator over the classified lines of a log, in input order.
pub struct LogReader<R> {
    lines: Lines<R>,
    line_number: usize,
    mode: ClassificationMode,
}

impl<R: BufRead> LogReader<R> {
    pub fn new(reader: R, mode: ClassificationMode) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            mode,
        }
    }
}

impl<R: BufRead> Iterator for LogReader<R> {
    type Item = std::io::Result<ParsedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e)),
        };
        self.line_number += 1;
        Some(Ok(parse_line(self.line_number, &line, self.mode)))
    }
}

/// Open `path` for buffered line reading.
pub fn open_log(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| StatsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;

    // ── is_user_line ──────────────────────────────────────────────────────────

    #[test]
    fn test_is_user_line_strict() {
        let mode = ClassificationMode::Strict;
        assert!(is_user_line("user,0,Leida,Cira,0", mode));
        assert!(!is_user_line("session,0,0,Safari 29,87,2016-10-23", mode));
        assert!(!is_user_line("username,0,Leida,Cira,0", mode));
    }

    #[test]
    fn test_is_user_line_strict_ignores_user_in_other_fields() {
        let line = "session,0,0,superuser browser,87,2016-10-23";
        assert!(!is_user_line(line, ClassificationMode::Strict));
    }

    #[test]
    fn test_is_user_line_substring_matches_anywhere() {
        let line = "session,0,0,superuser browser,87,2016-10-23";
        assert!(is_user_line(line, ClassificationMode::Substring));
        assert!(is_user_line("user,1,Palmer,Katrina,65", ClassificationMode::Substring));
    }

    // ── parse_user ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_user_fields() {
        let (user, missing) = parse_user("user,1,Palmer,Katrina,65");
        assert_eq!(user.id, "1");
        assert_eq!(user.first_name, "Palmer");
        assert_eq!(user.last_name, "Katrina");
        assert_eq!(user.age, "65");
        assert_eq!(missing, 0);
    }

    #[test]
    fn test_parse_user_short_line() {
        let (user, missing) = parse_user("user,7,Solo");
        assert_eq!(user.first_name, "Solo");
        assert_eq!(user.last_name, "");
        assert_eq!(user.age, "");
        assert_eq!(missing, 2);
    }

    // ── parse_session ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_session_fields() {
        let (session, missing) = parse_session("session,2,3,Chrome 20,84,2016-11-25");
        assert_eq!(session.user_id, "2");
        assert_eq!(session.session_id, "3");
        assert_eq!(session.browser, "Chrome 20");
        assert_eq!(session.time, "84");
        assert_eq!(session.date, "2016-11-25");
        assert_eq!(missing, 0);
    }

    #[test]
    fn test_parse_session_short_line() {
        let (session, missing) = parse_session("session,2,3,Chrome 20");
        assert_eq!(session.browser, "Chrome 20");
        assert_eq!(session.time, "");
        assert_eq!(session.date, "");
        assert_eq!(missing, 2);
    }

    // ── parse_line ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_line_blank() {
        let parsed = parse_line(4, "   ", ClassificationMode::Strict);
        assert_eq!(parsed.record, LogRecord::Blank);
        assert_eq!(parsed.line_number, 4);
        assert!(!parsed.is_malformed());
    }

    #[test]
    fn test_parse_line_marks_malformed() {
        let parsed = parse_line(2, "session,0", ClassificationMode::Strict);
        assert!(matches!(parsed.record, LogRecord::Session(_)));
        assert!(parsed.is_malformed());
        assert_eq!(parsed.missing_fields, 4);
    }

    #[test]
    fn test_parse_line_unknown_discriminator_is_session() {
        let parsed = parse_line(1, "visit,0,0,Safari 29,87,2016-10-23", ClassificationMode::Strict);
        match parsed.record {
            LogRecord::Session(s) => assert_eq!(s.browser, "Safari 29"),
            other => panic!("expected session, got {:?}", other),
        }
    }

    // ── LogReader ─────────────────────────────────────────────────────────────

    #[test]
    fn test_log_reader_numbers_lines() {
        let input = "user,0,Leida,Cira,0\n\nsession,0,0,Safari 29,87,2016-10-23\r\n";
        let parsed: Vec<ParsedLine> = LogReader::new(Cursor::new(input), ClassificationMode::Strict)
            .collect::<std::io::Result<_>>()
            .unwrap();

        assert_eq!(parsed.len(), 3);
        assert!(matches!(parsed[0].record, LogRecord::User(_)));
        assert_eq!(parsed[1].record, LogRecord::Blank);
        assert_eq!(parsed[2].line_number, 3);
        match &parsed[2].record {
            // CRLF endings must not leak into the date.
            LogRecord::Session(s) => assert_eq!(s.date, "2016-10-23"),
            other => panic!("expected session, got {:?}", other),
        }
    }

    // ── open_log ──────────────────────────────────────────────────────────────

    #[test]
    fn test_open_log_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "user,0,Leida,Cira,0").unwrap();

        let reader = open_log(&path).unwrap();
        let lines: Vec<ParsedLine> = LogReader::new(reader, ClassificationMode::Strict)
            .collect::<std::io::Result<_>>()
            .unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_open_log_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.txt");
        match open_log(&path) {
            Err(StatsError::FileRead { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected FileRead error, got {:?}", other.map(|_| ())),
        }
    }
}
