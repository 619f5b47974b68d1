//! Seed labels: "Team A", "Team B", …, "Team Z", "Team AA", "Team AB", …

const SEED_PREFIX: &str = "Team ";

/// Label for the zero-based seed `index`. Letters follow bijective base-26, so the
/// mapping is injective and labels of the same length sort in index order.
pub fn slot_label(index: usize) -> String {
    format!("{SEED_PREFIX}{}", letters(index))
}

/// Inverse of [`slot_label`]; None for anything that is not a seed label.
pub fn slot_index(label: &str) -> Option<usize> {
    let letters = label.strip_prefix(SEED_PREFIX)?;
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let mut n: usize = 0;
    for b in letters.bytes() {
        n = n.checked_mul(26)?.checked_add(usize::from(b - b'A') + 1)?;
    }
    Some(n - 1)
}

/// Group name for the zero-based group `index`: "Group A", "Group B", …
pub fn group_name(index: usize) -> String {
    format!("Group {}", letters(index))
}

/// Knockout label for the team finishing `rank` (1-based) in `group`: "Group A #1".
pub fn group_seed_label(group: &str, rank: usize) -> String {
    format!("{group} #{rank}")
}

fn letters(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        // n % 26 < 26, so the cast cannot truncate
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
