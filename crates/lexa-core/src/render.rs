use std::borrow::Cow;
use std::str::FromStr;

use crate::lexicon::{LexiconEntry, Meaning};
use crate::preprocess::capitalize;

pub const NO_MEANINGS: &str = "No meanings found";
pub const NO_ANTONYMS: &str = "No antonyms found";
pub const NO_SYNONYMS: &str = "No synonyms found";

const LIST_SEPARATOR: &str = ", ";

/// Output flavour of rendered text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Markup {
    /// Terminal output
    #[default]
    Plain,
    /// Rich-text labels
    Html,
}

impl Markup {
    pub fn line_break(self) -> &'static str {
        match self {
            Markup::Plain => "\n",
            Markup::Html => "<br>",
        }
    }

    /// Separator placed between two meaning blocks
    pub fn rule(self) -> &'static str {
        match self {
            Markup::Plain => "\n---\n",
            Markup::Html => "<br><hr>",
        }
    }

    fn escape(self, text: &str) -> Cow<'_, str> {
        match self {
            Markup::Html if text.contains(['&', '<', '>']) => Cow::Owned(
                text.replace('&', "&amp;")
                    .replace('<', "&lt;")
                    .replace('>', "&gt;"),
            ),
            _ => Cow::Borrowed(text),
        }
    }

    fn heading(self, text: &str) -> String {
        match self {
            Markup::Plain => text.to_string(),
            Markup::Html => format!("<b>{text}</b>"),
        }
    }

    fn title(self, text: &str) -> String {
        match self {
            Markup::Plain => format!("{text}\n{}", "=".repeat(text.chars().count())),
            Markup::Html => format!("<h1>{}</h1>", self.escape(text)),
        }
    }
}

impl FromStr for Markup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(Markup::Plain),
            "html" => Ok(Markup::Html),
            other => Err(format!("unknown markup: {other}")),
        }
    }
}

/// Turns lexicon entries into display text
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryRenderer {
    markup: Markup,
}

impl EntryRenderer {
    pub fn new(markup: Markup) -> Self {
        Self { markup }
    }

    pub fn markup(&self) -> Markup {
        self.markup
    }

    /// Meaning blocks separated by a rule, closed by a single line break
    pub fn render_meanings(&self, entry: &LexiconEntry) -> String {
        let meanings = match entry.meanings() {
            Ok(meanings) => meanings,
            Err(e) => {
                tracing::warn!("{e}");
                return NO_MEANINGS.to_string();
            }
        };

        if meanings.is_empty() {
            return NO_MEANINGS.to_string();
        }

        let blocks: Vec<String> = meanings.iter().map(|m| self.meaning_block(m)).collect();

        let mut output = blocks.join(self.markup.rule());
        output.push_str(self.markup.line_break());
        output
    }

    pub fn render_antonyms(&self, entry: &LexiconEntry) -> String {
        self.render_list(&entry.antonyms, NO_ANTONYMS)
    }

    pub fn render_synonyms(&self, entry: &LexiconEntry) -> String {
        self.render_list(&entry.synonyms, NO_SYNONYMS)
    }

    /// Every section of an entry, titled with the queried word
    pub fn render_entry(&self, word: &str, entry: &LexiconEntry) -> RenderedEntry {
        RenderedEntry {
            title: capitalize(word),
            meanings: self.render_meanings(entry),
            antonyms: self.render_antonyms(entry),
            synonyms: self.render_synonyms(entry),
            markup: self.markup,
        }
    }

    fn meaning_block(&self, meaning: &Meaning) -> String {
        let mut lines = Vec::with_capacity(4);

        if let Some(pos) = non_empty(&meaning.part_of_speech) {
            lines.push(self.markup.escape(pos).into_owned());
        }
        if let Some(definition) = non_empty(&meaning.definition) {
            lines.push(self.markup.escape(definition).into_owned());
        }
        // An empty list gets neither label nor break
        if !meaning.related_words.is_empty() {
            lines.push(format!(
                "Related words: {}",
                self.join(&meaning.related_words)
            ));
        }
        if !meaning.examples.is_empty() {
            lines.push(format!("Examples: {}", self.join(&meaning.examples)));
        }

        lines.join(self.markup.line_break())
    }

    fn render_list(&self, items: &[String], sentinel: &str) -> String {
        if items.is_empty() {
            sentinel.to_string()
        } else {
            self.join(items)
        }
    }

    fn join(&self, items: &[String]) -> String {
        items
            .iter()
            .map(|item| self.markup.escape(item))
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|text| !text.trim().is_empty())
}

/// Rendered sections of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    pub title: String,
    pub meanings: String,
    pub antonyms: String,
    pub synonyms: String,
    markup: Markup,
}

impl RenderedEntry {
    /// Full card: title followed by the labelled sections
    pub fn compose(&self) -> String {
        let br = self.markup.line_break();
        let sections = [
            self.markup.title(&self.title),
            format!("{}{br}{}", self.markup.heading("Meanings:"), self.meanings),
            format!("{}{br}{}", self.markup.heading("Antonyms:"), self.antonyms),
            format!("{}{br}{}", self.markup.heading("Synonyms:"), self.synonyms),
        ];

        sections.join(br)
    }
}
