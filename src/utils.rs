pub const TRUNCATION_MARKER: &str = "… [truncated]";

/// Keeps the first `max` characters of `s`, marking the cut.
pub fn clip(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => {
            let mut out = s[..cut].to_string();
            out.push_str(TRUNCATION_MARKER);
            out
        }
    }
}
