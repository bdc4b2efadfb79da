//! Version parsing and ordering
//!
//! Versions are tag names taken from Git hosts, so they are compared with a
//! relaxed, `version_compare`-style ordering rather than strict SemVer:
//! `v1.0 < 1.0.0 < 1.0.1`, and pre-release tags sort below their release.
//! None of these functions fail; malformed input yields `false` or a
//! well-defined position in the ordering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Floating version that always resolves to the latest commit
pub const DEVELOPMENT: &str = "development";

/// Rank of a numeric segment among the special forms
const NUMBER_RANK: i8 = 4;

/// Special pre/post-release words, checked in order by prefix
const SPECIAL_FORMS: &[(&str, i8)] = &[
    ("dev", 0),
    ("alpha", 1),
    ("a", 1),
    ("beta", 2),
    ("b", 2),
    ("RC", 3),
    ("rc", 3),
    ("#", NUMBER_RANK),
    ("pl", 5),
    ("p", 5),
];

/// Rank of words that are not a special form
const UNKNOWN_RANK: i8 = -6;

/// A parsed version identifier
///
/// Equality and ordering follow [`compare`], so `v1.2.0 == 1.2.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Version {
    value: String,
    major: String,
    stable: bool,
    semantic: bool,
}

impl Version {
    pub fn parse(version: &str) -> Self {
        let value = version.trim().to_string();
        Self {
            major: major(&value).to_string(),
            stable: is_stable(&value),
            semantic: is_valid_semantic(&value),
            value,
        }
    }

    /// The floating development version
    pub fn development() -> Self {
        Self::parse(DEVELOPMENT)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn major(&self) -> &str {
        &self.major
    }

    pub fn is_stable(&self) -> bool {
        self.stable
    }

    pub fn is_valid_semantic(&self) -> bool {
        self.semantic
    }

    pub fn is_development(&self) -> bool {
        self.value == DEVELOPMENT
    }

    pub fn has_major_change(&self, other: &Version) -> bool {
        self.major != other.major
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(&self.value, &other.value)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Version {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Version {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.value
    }
}

/// Trim whitespace and a leading `v`/`V`
fn strip_prefix(version: &str) -> &str {
    let version = version.trim();
    version.strip_prefix(['v', 'V']).unwrap_or(version)
}

/// Compare two version strings
///
/// Build metadata (`+...`) is ignored. Segments are runs of ASCII digits or
/// ASCII letters; everything else separates them.
pub fn compare(a: &str, b: &str) -> Ordering {
    let left = segments(strip_build(strip_prefix(a)));
    let right = segments(strip_build(strip_prefix(b)));

    let mut index = 0;
    loop {
        let ordering = match (left.get(index), right.get(index)) {
            (None, None) => return Ordering::Equal,
            (Some(l), Some(r)) => compare_segments(l, r),
            // A numeric tail makes the longer version greater, a word tail is
            // ranked against a release number (so `1.0-alpha < 1.0 < 1.0-pl`).
            (Some(l), None) => tail_rank(l).cmp(&NUMBER_RANK),
            (None, Some(r)) => NUMBER_RANK.cmp(&tail_rank(r)),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
        index += 1;
    }
}

fn strip_build(version: &str) -> &str {
    version.split('+').next().unwrap_or(version)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Number(&'a str),
    Word(&'a str),
}

fn segments(version: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut start: Option<usize> = None;
    let mut numeric = false;

    for (index, c) in version.char_indices() {
        let class = if c.is_ascii_digit() {
            Some(true)
        } else if c.is_ascii_alphabetic() {
            Some(false)
        } else {
            None
        };

        match (start, class) {
            (Some(s), Some(is_digit)) if is_digit != numeric => {
                result.push(segment(&version[s..index], numeric));
                start = Some(index);
                numeric = is_digit;
            }
            (Some(s), None) => {
                result.push(segment(&version[s..index], numeric));
                start = None;
            }
            (None, Some(is_digit)) => {
                start = Some(index);
                numeric = is_digit;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        result.push(segment(&version[s..], numeric));
    }

    result
}

fn segment(text: &str, numeric: bool) -> Segment<'_> {
    if numeric {
        Segment::Number(text)
    } else {
        Segment::Word(text)
    }
}

fn compare_segments(left: &Segment<'_>, right: &Segment<'_>) -> Ordering {
    match (left, right) {
        (Segment::Number(l), Segment::Number(r)) => compare_numeric(l, r),
        (Segment::Word(l), Segment::Word(r)) => word_rank(l).cmp(&word_rank(r)),
        (Segment::Number(_), Segment::Word(r)) => NUMBER_RANK.cmp(&word_rank(r)),
        (Segment::Word(l), Segment::Number(_)) => word_rank(l).cmp(&NUMBER_RANK),
    }
}

/// Compare digit strings of any length without overflowing
fn compare_numeric(left: &str, right: &str) -> Ordering {
    let left = left.trim_start_matches('0');
    let right = right.trim_start_matches('0');
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

fn word_rank(word: &str) -> i8 {
    SPECIAL_FORMS
        .iter()
        .find(|(form, _)| word.starts_with(form))
        .map(|(_, rank)| *rank)
        .unwrap_or(UNKNOWN_RANK)
}

fn tail_rank(segment: &Segment<'_>) -> i8 {
    match segment {
        // Any number beats "nothing"
        Segment::Number(_) => NUMBER_RANK + 1,
        Segment::Word(word) => word_rank(word),
    }
}

/// Leading part of a version before the first `+`, `-`, `_` or `.`
pub fn major(version: &str) -> &str {
    let version = strip_prefix(version);
    version
        .find(['+', '-', '_', '.'])
        .map(|end| &version[..end])
        .unwrap_or(version)
}

/// Whether two versions differ in their major part (string comparison)
pub fn has_major_change(a: &str, b: &str) -> bool {
    major(a) != major(b)
}

/// Exactly three dot-separated numeric segments, no pre-release or build suffix
pub fn is_stable(version: &str) -> bool {
    let parts: Vec<&str> = strip_prefix(version).split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

/// Loosened SemVer 2.0 validity, accepting an optional `v`/`V` prefix
///
/// The core is exactly three numeric parts (leading zeros allowed). An
/// optional `-prerelease` and `+build` follow; neither may be empty or end in
/// a separator, and build metadata may not start with `.`.
pub fn is_valid_semantic(version: &str) -> bool {
    let version = strip_prefix(version);
    let (rest, build) = match version.split_once('+') {
        Some((rest, build)) => (rest, Some(build)),
        None => (version, None),
    };
    let (core, prerelease) = match rest.split_once('-') {
        Some((core, prerelease)) => (core, Some(prerelease)),
        None => (rest, None),
    };

    let numeric = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    let suffix = |part: &str| {
        !part.is_empty()
            && part
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
            && !part.ends_with(['.', '-', '_'])
    };

    let parts: Vec<&str> = core.split('.').collect();
    parts.len() == 3
        && parts.iter().all(|&part| numeric(part))
        && prerelease.map_or(true, suffix)
        && build.map_or(true, |build| suffix(build) && !build.starts_with('.'))
}
