use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default query cleanup
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Unicode normalization (NFKC)
        let text: String = text.nfkc().collect();

        // Line breaks and whitespace runs collapse to single spaces
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Canonical lookup key: cleaned query, upper-cased
pub fn lookup_key(word: &str) -> String {
    DefaultPreprocessor.process(word).to_uppercase()
}

/// Display form of a word: first character upper-cased, the rest lower-cased
pub fn capitalize(word: &str) -> String {
    let cleaned = DefaultPreprocessor.process(word);
    let mut chars = cleaned.chars();

    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
