use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lexa_config::Config;

#[derive(Parser, Debug)]
#[command(name = "lexa")]
#[command(about = "Personal dictionary with bookmarks and translation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Word dataset (JSON)
    #[arg(long, global = true)]
    pub words: Option<String>,

    /// Bookmark database
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Render cards as plain text
    #[arg(long, global = true, conflicts_with = "html")]
    pub plain: bool,

    /// Render cards as HTML
    #[arg(long, global = true)]
    pub html: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show meanings, antonyms and synonyms of a word
    #[command(alias = "l")]
    Lookup {
        #[arg(required = true, num_args = 1..)]
        word: Vec<String>,
    },

    /// Bookmark a word, or remove the bookmark if it exists
    #[command(alias = "b")]
    Bookmark {
        #[arg(required = true, num_args = 1..)]
        word: Vec<String>,
    },

    /// List bookmarked words
    #[command(alias = "ls")]
    Bookmarks,

    /// Delete a bookmark after confirmation
    #[command(alias = "rm")]
    Unbookmark {
        #[arg(required = true, num_args = 1..)]
        word: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Translate a word
    #[command(alias = "t")]
    Translate {
        #[arg(required = true, num_args = 1..)]
        word: Vec<String>,

        /// Target language code (e.g. fr)
        #[arg(long)]
        to: Option<String>,
    },

    /// Interactive session
    #[command(alias = "i")]
    Interactive,
}

impl Cli {
    /// Flags win over the config file and environment
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(words) = &self.words {
            config.lexicon.path = words.clone();
        }
        if let Some(db) = &self.db {
            config.bookmarks.db_path = db.clone();
        }
        if self.plain {
            config.render.markup = "plain".to_string();
        }
        if self.html {
            config.render.markup = "html".to_string();
        }
    }
}

/// Multi-token words arrive split by the shell
pub fn join_word(parts: &[String]) -> String {
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::parse_from(["lexa"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_flags_override_config() {
        let cli = Cli::parse_from(["lexa", "lookup", "ice", "cream", "--html", "--db", "x.db"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.render.markup, "html");
        assert_eq!(config.bookmarks.db_path, "x.db");
        match cli.command {
            Some(Commands::Lookup { word }) => assert_eq!(join_word(&word), "ice cream"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn plain_and_html_conflict() {
        assert!(Cli::try_parse_from(["lexa", "--plain", "--html"]).is_err());
    }

    #[test]
    fn translate_takes_target_language() {
        let cli = Cli::parse_from(["lexa", "t", "cat", "--to", "fr"]);
        match cli.command {
            Some(Commands::Translate { word, to }) => {
                assert_eq!(join_word(&word), "cat");
                assert_eq!(to.as_deref(), Some("fr"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
