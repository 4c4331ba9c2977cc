// Output file naming for group keys

/// Strip every character outside `[0-9A-Za-z_.-]` from a group key.
///
/// There is no length limit, and a key made only of removed characters maps to
/// an empty string, so distinct keys can collide on the same output name.
///
/// # Example
/// ```
/// use colsplit::sanitize::sanitize;
/// assert_eq!(sanitize("5o8w/A01:test"), "5o8wA01test");
/// ```
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect()
}

/// Build the output filename `stub + sanitize(key) + suffix`
pub fn output_filename(stub: &str, key: &str, suffix: &str) -> String {
    format!("{stub}{}{suffix}", sanitize(key))
}
