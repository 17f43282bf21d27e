use crate::data::model::Section;
use crate::rules::TimeWindow;

/// Two sections conflict when they share a day and their spans touch or
/// intersect. Back-to-back sections (one ends at 10:00, the next starts at
/// 10:00) count as a conflict.
pub fn overlaps(a: &Section, b: &Section) -> bool {
    let shares_day = a.days.iter().any(|d| b.days.contains(d));
    shares_day && a.end >= b.start && a.start <= b.end
}

/// Whether `candidate` can join `accumulated`: it must stay clear of every
/// blackout window and every already placed section.
pub fn is_placeable<'a>(
    accumulated: impl IntoIterator<Item = &'a Section>,
    candidate: &Section,
    blackout_windows: &[TimeWindow],
) -> bool {
    if blackout_windows
        .iter()
        .any(|w| w.intersects(candidate.start, candidate.end))
    {
        return false;
    }
    !accumulated.into_iter().any(|placed| overlaps(placed, candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::section;
    use crate::data::model::Weekday::*;
    use chrono::NaiveTime;

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(
            NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
        )
    }

    #[test]
    fn intersecting_spans_on_a_shared_day_overlap() {
        let a = section(("AAA", 100), "L01", &[Monday], "09:00", "10:00");
        let b = section(("BBB", 200), "L01", &[Monday, Wednesday], "09:30", "10:30");
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn touching_endpoints_overlap() {
        let a = section(("AAA", 100), "L01", &[Monday], "09:00", "10:00");
        let b = section(("BBB", 200), "L01", &[Monday], "10:00", "11:00");
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn containment_overlaps() {
        let outer = section(("AAA", 100), "L01", &[Tuesday], "09:00", "12:00");
        let inner = section(("BBB", 200), "L01", &[Tuesday], "10:00", "11:00");
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn no_shared_day_never_overlaps() {
        let a = section(("AAA", 100), "L01", &[Monday, Wednesday], "09:00", "10:00");
        let b = section(("BBB", 200), "L01", &[Tuesday, Thursday], "09:00", "10:00");
        assert!(!overlaps(&a, &b));

        let tba = section(("CCC", 300), "L01", &[], "09:00", "10:00");
        assert!(!overlaps(&a, &tba));
    }

    #[test]
    fn separated_spans_do_not_overlap() {
        let a = section(("AAA", 100), "L01", &[Friday], "09:00", "09:50");
        let b = section(("BBB", 200), "L01", &[Friday], "10:00", "10:50");
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn placeable_checks_every_placed_section() {
        let placed = vec![
            section(("AAA", 100), "L01", &[Monday], "09:00", "10:00"),
            section(("BBB", 200), "L01", &[Tuesday], "13:00", "14:00"),
        ];
        let clash = section(("CCC", 300), "L01", &[Tuesday], "13:30", "14:30");
        let free = section(("CCC", 300), "L02", &[Wednesday], "13:30", "14:30");
        assert!(!is_placeable(&placed, &clash, &[]));
        assert!(is_placeable(&placed, &free, &[]));
        assert!(is_placeable(&[], &clash, &[]));
    }

    #[test]
    fn blackout_windows_use_open_intervals() {
        let lunch = [window("12:00", "13:00")];
        let during = section(("AAA", 100), "L01", &[Monday], "12:30", "13:30");
        let before = section(("AAA", 100), "L02", &[Monday], "11:00", "12:00");
        let after = section(("AAA", 100), "L03", &[Monday], "13:00", "14:00");
        assert!(!is_placeable(&[], &during, &lunch));
        assert!(is_placeable(&[], &before, &lunch));
        assert!(is_placeable(&[], &after, &lunch));
    }

    #[test]
    fn blackout_applies_even_without_meeting_days() {
        let tba = section(("AAA", 100), "L01", &[], "12:15", "12:45");
        assert!(!is_placeable(&[], &tba, &[window("12:00", "13:00")]));
    }
}
