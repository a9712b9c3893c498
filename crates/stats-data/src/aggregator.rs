//! Per-user accumulation of session records.
//!
//! Users are kept in input order. Every session is attached to the user
//! declared most recently before it; a session with no preceding user is an
//! error.

use stats_core::error::{Result, StatsError};
use stats_core::models::{Session, User, UserAttributes};
use tracing::debug;

use crate::reader::{LogRecord, ParsedLine};

// ── IngestStats ───────────────────────────────────────────────────────────────

/// Line counters collected while feeding the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct IngestStats {
    pub lines_read: usize,
    pub users_parsed: usize,
    pub sessions_parsed: usize,
    pub blank_lines: usize,
    pub malformed_lines: usize,
}

// ── SessionAggregator ─────────────────────────────────────────────────────────

/// Position of one session inside the user collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SessionRef {
    user: usize,
    session: usize,
}

/// Ordered user collection plus the run-wide session and browser lists.
#[derive(Debug, Default)]
pub struct SessionAggregator {
    users: Vec<User>,
    /// Index of the user that new sessions attach to.
    current: Option<usize>,
    /// Every session in input order.
    sessions: Vec<SessionRef>,
    /// Every uppercased browser label in input order, duplicates included.
    browsers: Vec<String>,
    stats: IngestStats,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new user and make it the attachment target.
    pub fn add_user(&mut self, attributes: UserAttributes) {
        self.users.push(User::new(attributes));
        self.current = Some(self.users.len() - 1);
        self.stats.users_parsed += 1;
    }

    /// Attach `session` to the current user.
    ///
    /// `line_number` is only used to report an orphan session.
    pub fn add_session(&mut self, session: Session, line_number: usize) -> Result<()> {
        let index = self
            .current
            .ok_or(StatsError::OrphanSession { line_number })?;
        let user = &mut self.users[index];

        self.browsers.push(session.browser_label());
        user.record_session(session);
        self.sessions.push(SessionRef {
            user: index,
            session: user.sessions.len() - 1,
        });
        self.stats.sessions_parsed += 1;
        Ok(())
    }

    /// Feed one classified line.
    pub fn ingest(&mut self, line: ParsedLine) -> Result<()> {
        self.stats.lines_read += 1;
        if line.is_malformed() {
            self.stats.malformed_lines += 1;
        }

        match line.record {
            LogRecord::User(attributes) => self.add_user(attributes),
            LogRecord::Session(session) => self.add_session(session, line.line_number)?,
            LogRecord::Blank => {
                debug!("Skipping blank line {}", line.line_number);
                self.stats.blank_lines += 1;
            }
        }
        Ok(())
    }

    /// Users in input order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// All sessions in input order, across every user.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> + '_ {
        self.sessions
            .iter()
            .map(|r| &self.users[r.user].sessions[r.session])
    }

    pub fn total_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Every uppercased browser label seen, duplicates included.
    pub fn browsers(&self) -> &[String] {
        &self.browsers
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
