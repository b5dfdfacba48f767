const MAX_FILENAME_CHARS: usize = 100;

/// Make `name` safe as a download file name: reserved characters become `_`,
/// surrounding whitespace goes, and the result is capped at 100 characters.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        return "export".to_string();
    }
    trimmed.chars().take(MAX_FILENAME_CHARS).collect()
}

/// Integer with `,` thousands separators, e.g. `160,000,000`.
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
