//! Per-user and global statistics, shaped for the JSON report.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use stats_core::formatting::{format_minutes, join_sorted, sort_descending};
use stats_core::models::User;
use tracing::warn;

use crate::aggregator::SessionAggregator;

/// Separator between browsers inside one user's `browsers` string.
pub const USER_BROWSER_SEPARATOR: &str = ", ";

/// Separator between browsers in the global `allBrowsers` string.
pub const ALL_BROWSERS_SEPARATOR: &str = ",";

// ── UserStats ─────────────────────────────────────────────────────────────────

/// Statistics reported for one user. Field order is the output key order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub sessions_count: usize,
    pub total_time: String,
    /// Zero sessions render as `"0 min."`.
    pub longest_session: String,
    pub browsers: String,
    #[serde(rename = "usedIE")]
    pub used_ie: bool,
    pub always_used_chrome: bool,
    pub dates: Vec<String>,
}

// ── UsersStats ────────────────────────────────────────────────────────────────

/// Display name to [`UserStats`], serialised in first-seen order.
///
/// Inserting an existing name replaces its statistics in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersStats {
    entries: Vec<(String, UserStats)>,
    index: HashMap<String, usize>,
}

impl UsersStats {
    /// Insert or replace; returns the replaced statistics, if any.
    pub fn insert(&mut self, name: String, stats: UserStats) -> Option<UserStats> {
        match self.index.get(&name) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, stats)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, stats));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&UserStats> {
        self.index.get(name).map(|&position| &self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in output order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for UsersStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, stats) in &self.entries {
            map.serialize_entry(name, stats)?;
        }
        map.end()
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// The complete report document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub users_stats: UsersStats,
    pub total_users: usize,
    pub unique_browsers_count: usize,
    pub total_sessions: usize,
    pub all_browsers: String,
}

// ── ReportBuilder ─────────────────────────────────────────────────────────────

/// Turns aggregated users into a [`Report`].
pub struct ReportBuilder {
    internet_explorer: Regex,
    chrome: Regex,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            internet_explorer: Regex::new(r"(?i)internet explorer").expect("regex is valid"),
            chrome: Regex::new(r"(?i)chrome").expect("regex is valid"),
        }
    }

    /// Compute the statistics for a single user.
    pub fn user_stats(&self, user: &User) -> UserStats {
        let total = user
            .session_times
            .iter()
            .fold(0i64, |acc, &minutes| acc.saturating_add(minutes));
        let longest = user.session_times.iter().copied().max().unwrap_or(0);

        UserStats {
            sessions_count: user.sessions.len(),
            total_time: format_minutes(total),
            longest_session: format_minutes(longest),
            browsers: join_sorted(&user.browsers, USER_BROWSER_SEPARATOR),
            used_ie: user
                .sessions
                .iter()
                .any(|s| self.internet_explorer.is_match(&s.browser)),
            always_used_chrome: user.sessions.iter().all(|s| self.chrome.is_match(&s.browser)),
            dates: sort_descending(&user.dates),
        }
    }

    /// Build the full report from the aggregator state.
    pub fn build(&self, aggregator: &SessionAggregator) -> Report {
        let mut users_stats = UsersStats::default();
        for user in aggregator.users() {
            let name = user.full_name();
            if users_stats.insert(name.clone(), self.user_stats(user)).is_some() {
                warn!(
                    "Duplicate user name {:?} (id {}); keeping the later user's statistics",
                    name, user.attributes.id
                );
            }
        }

        let unique_browsers: BTreeSet<&str> =
            aggregator.browsers().iter().map(String::as_str).collect();
        let all_browsers = unique_browsers
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .join(ALL_BROWSERS_SEPARATOR);

        Report {
            users_stats,
            total_users: aggregator.users().len(),
            unique_browsers_count: unique_browsers.len(),
            total_sessions: aggregator.total_sessions(),
            all_browsers,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
