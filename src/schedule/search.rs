use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::overlap::is_placeable;
use super::{day_counts, Schedule};
use crate::data::filter::{generate_combinations, CourseCombination};
use crate::data::model::{Catalog, Section};
use crate::error::ConfigError;
use crate::rules::{DayLimits, RuleSet, TimeWindow};

/// Candidate sections per search key, each list in catalog order.
pub type SectionsByKey<'a> = BTreeMap<String, Vec<&'a Section>>;

// ---------------------------------------------------------------------------
// Search universe for one combination
// ---------------------------------------------------------------------------

/// Group the sections of a combination's courses by search key: the course
/// key, or the course key plus component letter when `per_component` is set.
pub fn group_sections<'a>(
    catalog: &'a Catalog,
    combo: &CourseCombination,
    per_component: bool,
) -> SectionsByKey<'a> {
    let by_course = catalog.sections_by_course(combo.courses());
    if !per_component {
        return by_course;
    }

    let mut by_component: SectionsByKey<'a> = BTreeMap::new();
    for section in by_course.into_values().flatten() {
        by_component
            .entry(section.component_key())
            .or_default()
            .push(section);
    }
    by_component
}

/// Search keys ordered by ascending number of candidate sections, so the most
/// constrained key is resolved first. Ties keep key order.
pub fn search_keys(sections_by_key: &SectionsByKey<'_>) -> Vec<String> {
    let mut keys: Vec<(&String, usize)> = sections_by_key
        .iter()
        .map(|(key, sections)| (key, sections.len()))
        .collect();
    keys.sort_by_key(|(_, count)| *count);
    keys.into_iter().map(|(key, _)| key.clone()).collect()
}

// ---------------------------------------------------------------------------
// Backtracking search
// ---------------------------------------------------------------------------

/// True when some day carries more meetings than its configured maximum.
pub fn exceeds_day_limits<'a>(
    sections: impl IntoIterator<Item = &'a Section>,
    day_limits: &DayLimits,
) -> bool {
    let counts = day_counts(sections);
    day_limits
        .iter()
        .any(|(day, max)| counts.get(day).is_some_and(|n| n > max))
}

/// Depth-first search for one section per key, in the given key order.
///
/// Candidates are tried in catalog order. Day limits are checked once the
/// last key is placed; a violation there is a dead end like any other and the
/// search keeps going. Returns the first complete schedule found.
pub fn find_schedule(
    course_keys: &[String],
    sections_by_key: &SectionsByKey<'_>,
    day_limits: &DayLimits,
    blackout_windows: &[TimeWindow],
) -> Option<Schedule> {
    if course_keys.is_empty() {
        return None;
    }

    let mut placed: Vec<&Section> = Vec::with_capacity(course_keys.len());
    if place_next(course_keys, sections_by_key, day_limits, blackout_windows, &mut placed) {
        Some(Schedule::new(placed.into_iter().cloned().collect()))
    } else {
        None
    }
}

fn place_next<'a>(
    keys: &[String],
    sections_by_key: &SectionsByKey<'a>,
    day_limits: &DayLimits,
    blackout_windows: &[TimeWindow],
    placed: &mut Vec<&'a Section>,
) -> bool {
    let Some((key, rest)) = keys.split_first() else {
        return false;
    };
    let Some(candidates) = sections_by_key.get(key) else {
        return false;
    };

    for &candidate in candidates {
        if !is_placeable(placed.iter().copied(), candidate, blackout_windows) {
            continue;
        }

        placed.push(candidate);
        let complete = if rest.is_empty() {
            !exceeds_day_limits(placed.iter().copied(), day_limits)
        } else {
            place_next(rest, sections_by_key, day_limits, blackout_windows, placed)
        };
        if complete {
            return true;
        }
        placed.pop();
    }

    false
}

// ---------------------------------------------------------------------------
// Driving loop
// ---------------------------------------------------------------------------

/// Search one combination: build its section universe, order the keys and
/// look for the first feasible schedule.
pub fn search_combination(
    catalog: &Catalog,
    combo: &CourseCombination,
    rules: &RuleSet,
) -> Option<Schedule> {
    let distinct: BTreeSet<String> = combo.keys().into_iter().collect();
    if distinct.len() != rules.target_count {
        log::debug!("Skipping combination {:?}: duplicate courses", combo.keys());
        return None;
    }

    let sections_by_key = group_sections(catalog, combo, rules.per_component);
    let covered: BTreeSet<String> = sections_by_key
        .values()
        .flatten()
        .map(|s| s.course_key())
        .collect();
    if covered != distinct {
        log::debug!("Skipping combination {:?}: course without sections", combo.keys());
        return None;
    }

    let keys = search_keys(&sections_by_key);
    find_schedule(
        &keys,
        &sections_by_key,
        &rules.per_day_max_sections,
        &rules.blackout_windows,
    )
}

/// Filter the catalog into combinations and return one schedule for every
/// combination that has a feasible section assignment.
///
/// The rule set is validated before any work starts. An empty result is not
/// an error. Output order follows combination order in both the parallel and
/// the sequential path.
pub fn generate_schedules(
    catalog: &Catalog,
    rules: &RuleSet,
) -> Result<Vec<Schedule>, ConfigError> {
    rules.validate()?;

    let mut combos = generate_combinations(&catalog.courses, rules);
    if let Some(max) = rules.max_combinations {
        if combos.len() > max {
            log::info!("Searching the first {max} of {} combinations", combos.len());
            combos.truncate(max);
        }
    }

    log::info!("Filtering time and day restrictions...");
    let remaining = AtomicUsize::new(combos.len());
    let search = |combo: &CourseCombination| {
        let found = search_combination(catalog, combo, rules);
        if found.is_none() {
            let left = remaining.fetch_sub(1, Ordering::Relaxed) - 1;
            if left % 100 == 0 {
                log::debug!("{left} combinations remaining");
            }
        }
        found
    };

    let schedules: Vec<Schedule> = if rules.parallel {
        combos.par_iter().filter_map(|c| search(c)).collect()
    } else {
        combos.iter().filter_map(|c| search(c)).collect()
    };

    if schedules.is_empty() {
        log::info!("No schedules satisfy the constraints");
    } else {
        log::info!(
            "Found {} schedules from {} combinations",
            schedules.len(),
            combos.len()
        );
    }
    Ok(schedules)
}
