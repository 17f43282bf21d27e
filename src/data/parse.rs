use std::collections::BTreeSet;

use anyhow::{bail, Result};
use chrono::NaiveTime;

use super::model::Weekday;

// ---------------------------------------------------------------------------
// Meeting days
// ---------------------------------------------------------------------------

/// Parse a catalog `Days` cell.
///
/// Two encodings are accepted:
/// * compact tokens – `"MWF"`, `"TTh"`: `M`, `T`, `W`, `Th`, `F`
/// * a bracketed list of day names – `"['Monday', 'Wednesday']"`, which is
///   how spreadsheet exports store the parsed form.
///
/// An empty cell means the section has no fixed meeting days.
pub fn parse_days(cell: &str) -> Result<BTreeSet<Weekday>> {
    let cell = cell.trim();
    if cell.starts_with('[') {
        parse_day_list(cell)
    } else {
        parse_day_tokens(cell)
    }
}

/// Character scan with one lookahead so that `T` followed by `h` reads as
/// Thursday rather than Tuesday.
fn parse_day_tokens(cell: &str) -> Result<BTreeSet<Weekday>> {
    let mut days = BTreeSet::new();
    let mut chars = cell.chars().peekable();

    while let Some(c) = chars.next() {
        let day = match c {
            'M' => Weekday::Monday,
            'T' => {
                if chars.peek() == Some(&'h') {
                    chars.next();
                    Weekday::Thursday
                } else {
                    Weekday::Tuesday
                }
            }
            'W' => Weekday::Wednesday,
            'F' => Weekday::Friday,
            c if c.is_whitespace() || c == ',' => continue,
            other => bail!("unrecognised day token '{other}' in '{cell}'"),
        };
        days.insert(day);
    }

    Ok(days)
}

fn parse_day_list(cell: &str) -> Result<BTreeSet<Weekday>> {
    let Some(inner) = cell.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        bail!("unterminated day list '{cell}'");
    };

    let mut days = BTreeSet::new();
    for item in inner.split(',') {
        let name = item.trim().trim_matches(|c| c == '\'' || c == '"');
        if name.is_empty() {
            continue;
        }
        match Weekday::from_name(name) {
            Some(day) => {
                days.insert(day);
            }
            None => bail!("unrecognised day name '{name}' in '{cell}'"),
        }
    }
    Ok(days)
}

// ---------------------------------------------------------------------------
// Time of day
// ---------------------------------------------------------------------------

const TIME_FORMATS: [&str; 4] = ["%H:%M:%S", "%H:%M", "%I:%M %p", "%I:%M%p"];

/// Parse `HH:MM`, `HH:MM:SS` or a 12-hour `HH:MM AM` time of day.
pub fn parse_time(text: &str) -> Result<NaiveTime> {
    let text = text.trim();
    for format in TIME_FORMATS {
        if let Ok(t) = NaiveTime::parse_from_str(text, format) {
            return Ok(t);
        }
    }
    bail!("'{text}' is not a time of day (expected HH:MM, HH:MM:SS or HH:MM AM)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Weekday::*;

    fn set(days: &[Weekday]) -> BTreeSet<Weekday> {
        days.iter().copied().collect()
    }

    #[test]
    fn compact_tokens() {
        assert_eq!(parse_days("MWF").unwrap(), set(&[Monday, Wednesday, Friday]));
        assert_eq!(parse_days("TTh").unwrap(), set(&[Tuesday, Thursday]));
        assert_eq!(parse_days("Th").unwrap(), set(&[Thursday]));
        assert_eq!(parse_days("T").unwrap(), set(&[Tuesday]));
        assert_eq!(
            parse_days("MTWThF").unwrap(),
            set(&[Monday, Tuesday, Wednesday, Thursday, Friday])
        );
    }

    #[test]
    fn empty_cell_has_no_days() {
        assert!(parse_days("").unwrap().is_empty());
        assert!(parse_days("[]").unwrap().is_empty());
    }

    #[test]
    fn list_form() {
        assert_eq!(
            parse_days("['Monday', 'Wednesday']").unwrap(),
            set(&[Monday, Wednesday])
        );
        assert_eq!(parse_days("[\"Thursday\"]").unwrap(), set(&[Thursday]));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert!(parse_days("MXF").is_err());
        assert!(parse_days("Sa").is_err());
        assert!(parse_days("['Monday', 'Sunday']").is_err());
        assert!(parse_days("['Monday'").is_err());
    }

    #[test]
    fn time_formats() {
        let nine_thirty = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse_time("09:30").unwrap(), nine_thirty);
        assert_eq!(parse_time("09:30:00").unwrap(), nine_thirty);
        assert_eq!(parse_time("09:30 AM").unwrap(), nine_thirty);
        assert_eq!(
            parse_time("01:20 PM").unwrap(),
            NaiveTime::from_hms_opt(13, 20, 0).unwrap()
        );
        assert!(parse_time("half past nine").is_err());
    }
}
