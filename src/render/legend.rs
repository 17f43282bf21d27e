use crate::schedule::Schedule;

/// Break `text` at the first space found at or after each multiple of
/// `budget` characters, counted from the start of the whole text.
pub fn wrap(text: &str, budget: usize) -> Vec<String> {
    let mut chars: Vec<char> = text.chars().collect();
    if budget > 0 {
        for line in 0..chars.len() / budget {
            let from = budget * (line + 1);
            if let Some(i) = (from..chars.len()).find(|&i| chars[i] == ' ') {
                chars[i] = '\n';
            }
        }
    }
    let wrapped: String = chars.into_iter().collect();
    wrapped
        .trim()
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

/// `course key - display name`, one entry per course in placement order,
/// each wrapped into lines.
pub fn legend_entries(schedule: &Schedule, budget: usize) -> Vec<Vec<String>> {
    let mut seen: Vec<String> = Vec::new();
    let mut entries = Vec::new();
    for section in schedule.sections() {
        let key = section.course_key();
        if seen.contains(&key) {
            continue;
        }
        entries.push(wrap(&format!("{key} - {}", section.name), budget));
        seen.push(key);
    }
    entries
}
