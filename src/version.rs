//! Lenient version ordering
//!
//! Versions are split into numeric and textual tokens and compared token by
//! token. Nothing is rejected: any string produces some ordering, which is
//! what a diagnostic report needs when metadata is hand-edited or a release
//! carries a suffix.

use crate::types::{Status, UNKNOWN};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(u64),
    Text(String),
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Token::Number(a), Token::Number(b)) => a.cmp(b),
            (Token::Text(a), Token::Text(b)) => a.cmp(b),
            // A qualifier sorts below a release component in the same slot
            (Token::Number(_), Token::Text(_)) => Ordering::Greater,
            (Token::Text(_), Token::Number(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Run {
    Digit,
    Lower,
    Other,
}

fn run_of(c: char) -> Run {
    if c.is_ascii_digit() {
        Run::Digit
    } else if c.is_ascii_lowercase() {
        Run::Lower
    } else {
        Run::Other
    }
}

fn flush(buf: &mut String, run: Run, tokens: &mut Vec<Token>) {
    if buf.is_empty() {
        return;
    }
    let token = match run {
        Run::Digit => buf
            .parse::<u64>()
            .map(Token::Number)
            .unwrap_or_else(|_| Token::Text(buf.clone())),
        _ => Token::Text(buf.clone()),
    };
    tokens.push(token);
    buf.clear();
}

/// A version string tokenized for lenient comparison
#[derive(Debug, Clone)]
pub struct LooseVersion {
    raw: String,
    tokens: Vec<Token>,
}

impl LooseVersion {
    pub fn parse(version: &str) -> Self {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut current_run = Run::Other;

        for c in version.trim().chars() {
            if c == '.' {
                flush(&mut current, current_run, &mut tokens);
                continue;
            }
            let run = run_of(c);
            if run != current_run {
                flush(&mut current, current_run, &mut tokens);
                current_run = run;
            }
            current.push(c);
        }
        flush(&mut current, current_run, &mut tokens);

        Self {
            raw: version.to_string(),
            tokens,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for LooseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for LooseVersion {}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Vec ordering is element-wise with the longer list winning a tie
        self.tokens.cmp(&other.tokens)
    }
}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LooseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compare two version strings leniently
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    LooseVersion::parse(a).cmp(&LooseVersion::parse(b))
}

impl Status {
    /// Decide whether `installed` is current with respect to `latest`
    pub fn classify(installed: &str, latest: &str) -> Status {
        if installed == UNKNOWN || latest == UNKNOWN {
            return Status::Unknown;
        }

        match compare_versions(installed, latest) {
            Ordering::Less => Status::Outdated,
            Ordering::Equal | Ordering::Greater => Status::UpToDate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_segments() {
        assert_eq!(compare_versions("1.2.0", "1.2.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.1.0", "1.2.0"), Ordering::Less);
        assert_eq!(compare_versions("1.10.0", "1.9.3"), Ordering::Greater);
        assert_eq!(compare_versions("0.4.3", "0.10"), Ordering::Less);
    }

    #[test]
    fn test_longer_version_wins_a_tie() {
        assert_eq!(compare_versions("1.2.0", "1.2"), Ordering::Greater);
        assert_eq!(compare_versions("1.2.0a", "1.2.0"), Ordering::Greater);
    }

    #[test]
    fn test_qualifier_sorts_below_release_component() {
        assert_eq!(compare_versions("1.2a", "1.2.1"), Ordering::Less);
        assert_eq!(compare_versions("0.5.0rc1", "0.5.0.1"), Ordering::Less);
    }

    #[test]
    fn test_textual_segments() {
        assert_eq!(compare_versions("1.0a1", "1.0b1"), Ordering::Less);
        assert_eq!(compare_versions("1.0b2", "1.0b10"), Ordering::Less);
        assert_eq!(compare_versions("2.0-rc1", "2.0-rc2"), Ordering::Less);
    }

    #[test]
    fn test_huge_numbers_do_not_panic() {
        let huge = "1.99999999999999999999999";
        assert_eq!(compare_versions(huge, huge), Ordering::Equal);
    }

    #[test]
    fn test_tokens() {
        let v = LooseVersion::parse("0.5.0rc1");
        assert_eq!(
            v.tokens,
            vec![
                Token::Number(0),
                Token::Number(5),
                Token::Number(0),
                Token::Text("rc".to_string()),
                Token::Number(1),
            ]
        );
        assert_eq!(v.to_string(), "0.5.0rc1");
    }

    #[test]
    fn test_classify() {
        assert_eq!(Status::classify("1.2.0", "1.2.0"), Status::UpToDate);
        assert_eq!(Status::classify("1.1.0", "1.2.0"), Status::Outdated);
        assert_eq!(Status::classify("1.3.0", "1.2.0"), Status::UpToDate);
        assert_eq!(Status::classify("unknown", "1.2.0"), Status::Unknown);
        assert_eq!(Status::classify("1.2.0", "unknown"), Status::Unknown);
        assert_eq!(Status::classify("unknown", "unknown"), Status::Unknown);
    }
}
