//! Structured waypoint names.
//!
//! A path waypoint's name starts with a segment stamp `Pnn[x].hh.mm.ss`,
//! optionally followed by `-Pnn[x].hh.mm.ss` when the point closes one
//! segment and opens the next. Anything after the stamps (directive
//! characters, free text) is ignored here.

use std::time::Duration;

/// A segment identifier and the time offset into that segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentStamp {
    /// Segment identifier, e.g. `P01` or `P12b`.
    pub segment: String,
    /// Offset from the segment start.
    pub offset: Duration,
}

impl SegmentStamp {
    /// Whole minutes past the hour of the offset.
    #[must_use]
    pub fn minute_of_hour(&self) -> u64 {
        (self.offset.as_secs() / 60) % 60
    }

    /// Index of the ten-minute bucket the offset falls in.
    #[must_use]
    pub fn ten_minute_bucket(&self) -> u64 {
        self.offset.as_secs() / 600
    }
}

/// The parsed stamp prefix of a path waypoint name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SegmentName {
    /// Segment this point belongs to.
    pub start: SegmentStamp,
    /// Segment this point also opens, for junction points.
    pub end: Option<SegmentStamp>,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Two ASCII digits as a number.
fn two_digits(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(u64::from(bytes[0] - b'0') * 10 + u64::from(bytes[1] - b'0'))
}

/// Parse one stamp at the start of `s`, returning it and the unparsed rest.
fn parse_stamp(s: &str) -> Option<(SegmentStamp, &str)> {
    let rest = s.strip_prefix('P')?;
    two_digits(rest.get(..2)?)?;
    let mut chars = rest[2..].chars();
    let segment_len = match chars.next()? {
        '.' => 3,
        c if is_word_char(c) && chars.next() == Some('.') => 3 + c.len_utf8(),
        _ => return None,
    };
    let segment = &s[..segment_len];
    let clock = s.get(segment_len..segment_len + 9)?;
    let mut fields = clock.split('.');
    let mut secs = 0;
    // `clock` is `.hh.mm.ss`; the leading split yields an empty field.
    if !fields.next()?.is_empty() {
        return None;
    }
    for unit in [3600, 60, 1] {
        secs += two_digits(fields.next()?)? * unit;
    }
    let stamp = SegmentStamp {
        segment: segment.to_string(),
        offset: Duration::from_secs(secs),
    };
    Some((stamp, &s[segment_len + 9..]))
}

/// Parse the segment stamps at the start of a waypoint name.
///
/// Returns `None` for names that are not path waypoints.
#[must_use]
pub fn parse_segment_name(name: &str) -> Option<SegmentName> {
    let (start, rest) = parse_stamp(name)?;
    let end = rest
        .strip_prefix('-')
        .and_then(parse_stamp)
        .map(|(stamp, _)| stamp);
    Some(SegmentName { start, end })
}
