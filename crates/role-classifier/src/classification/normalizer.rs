/// Canonical matching form: lower-case, only `[a-z0-9+ ]` survive, single
/// spaces, trimmed. Absent text normalizes to an empty string.
pub fn normalize_text(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };

    let replaced: String = value
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '+' || ch == ' ' {
                ch
            } else {
                ' '
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
