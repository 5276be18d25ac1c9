use std::env;

/// Language code of the user's locale, e.g. `fr` for `fr_FR.UTF-8`.
/// Checks the variables in the order POSIX gives them precedence.
pub fn system_language() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| language_from_locale(&value))
}

/// Strip region, encoding and modifier from a locale name
pub fn language_from_locale(locale: &str) -> Option<String> {
    let language = locale
        .split(['_', '-', '.', '@'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    match language.as_str() {
        "" | "c" | "posix" => None,
        code if code.chars().all(|c| c.is_ascii_alphabetic()) => Some(code.to_string()),
        _ => None,
    }
}
