/// How the reader decides that a line declares a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassificationMode {
    /// The first field must equal `user`.
    #[default]
    Strict,
    /// The literal `user` may appear anywhere in the line.
    Substring,
}

/// Identity fields captured when a user line is parsed.
///
/// All values are kept as raw strings; nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAttributes {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub age: String,
}

/// A single browsing session read from a session line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Owner id as written in the log. Not used for attachment.
    pub user_id: String,
    pub session_id: String,
    /// Browser label exactly as it appears in the log.
    pub browser: String,
    /// Raw duration field; see [`Session::minutes`].
    pub time: String,
    /// ISO-8601 date string, never parsed.
    pub date: String,
}

impl Session {
    /// Uppercased browser label used for every browser statistic.
    pub fn browser_label(&self) -> String {
        self.browser.to_uppercase()
    }

    /// Session duration in whole minutes.
    ///
    /// Lenient integer conversion: leading whitespace is skipped, an optional
    /// sign is honoured and the leading run of digits is read. Anything that
    /// does not start with a number (including an empty field) yields `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stats_core::models::parse_minutes;
    ///
    /// assert_eq!(parse_minutes("87"), 87);
    /// assert_eq!(parse_minutes(" 12min"), 12);
    /// assert_eq!(parse_minutes("-5"), -5);
    /// assert_eq!(parse_minutes("n/a"), 0);
    /// assert_eq!(parse_minutes(""), 0);
    /// ```
    pub fn minutes(&self) -> i64 {
        parse_minutes(&self.time)
    }
}

/// See [`Session::minutes`].
pub fn parse_minutes(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    if negative {
        -value
    } else {
        value
    }
}

/// One person found in the log together with everything accumulated from
/// the session lines that follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub attributes: UserAttributes,
    /// Full session records, in input order.
    pub sessions: Vec<Session>,
    /// Uppercased browser labels, one per session.
    pub browsers: Vec<String>,
    /// Session dates, one per session.
    pub dates: Vec<String>,
    /// Session durations in minutes, one per session.
    pub session_times: Vec<i64>,
}

impl User {
    pub fn new(attributes: UserAttributes) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }

    /// Display key: first and last name joined by a single space.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.attributes.first_name, self.attributes.last_name
        )
    }

    /// Append `session` and its derived values to this user's sequences.
    pub fn record_session(&mut self, session: Session) {
        self.browsers.push(session.browser_label());
        self.dates.push(session.date.clone());
        self.session_times.push(session.minutes());
        self.sessions.push(session);
    }
}
