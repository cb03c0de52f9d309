// Text normalization — the first stage of the prediction pipeline.
//
// Mirrors the cleaning the model saw during training: lowercase, strip
// everything that isn't an ASCII letter, digit, or whitespace, then collapse
// whitespace runs. The vocabulary was built from text cleaned exactly this
// way, so encoding skips this step at your peril.

/// Normalize a comment before tokenization.
///
/// `None` normalizes to the empty string. The function is total and
/// idempotent: `normalize(Some(&normalize(s)))` returns `normalize(s)`.
pub fn normalize(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    // Collapse whitespace runs to single spaces and trim the ends.
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
