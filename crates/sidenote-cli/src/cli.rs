use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One item per line
    #[default]
    Plain,
    /// Pretty-printed JSON
    Json,
}

#[derive(Parser)]
#[command(name = "sn")]
#[command(about = "sn - plain-text notes with filename categories and bidirectional links")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses config file value or defaults to 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/sidenote/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Note directory (overrides config file and SIDENOTE_DIR)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Scan subdirectories of the note directory too
    #[arg(long, global = true)]
    pub recursive: bool,

    /// Output format
    #[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note and print its path
    New {
        /// Free-text title; also used to derive the filename slug
        title: String,

        /// Category for the note (repeatable, order is kept)
        #[arg(short = 'c', long = "category", value_name = "CATEGORY")]
        categories: Vec<String>,

        /// Text to quote at the top of the body
        #[arg(long, conflicts_with = "seed_stdin")]
        seed: Option<String>,

        /// Read the text to quote from stdin
        #[arg(long)]
        seed_stdin: bool,
    },

    /// Link a note to another note by id, updating both files
    Link {
        /// Path of the note being edited
        note: PathBuf,

        /// Id of the note to link to (e.g. 20201008_093000)
        target: String,

        /// Byte offset in the note at which to place the inline marker
        #[arg(long, value_name = "OFFSET")]
        at: Option<usize>,
    },

    /// Show the notes linking to a note, or audit every link
    Links {
        /// Path of the note to inspect
        #[arg(required_unless_present = "check")]
        note: Option<PathBuf>,

        /// Show the notes this one links to instead
        #[arg(long, conflicts_with = "check")]
        outgoing: bool,

        /// Report one-sided and dangling links across the store
        #[arg(long, conflicts_with = "note")]
        check: bool,

        /// With --check, add the missing half of one-sided links
        #[arg(long, requires = "check")]
        repair: bool,
    },

    /// List note filenames, oldest first
    List {
        /// Only notes in this category
        #[arg(short = 'c', long)]
        category: Option<String>,
    },

    /// List categories in use, then configured ones
    Categories,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Write an example config file
    Init {
        /// Where to write it (defaults to the standard location)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Print the default config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn new_collects_repeated_categories() {
        let cli = Cli::parse_from(["sn", "new", "A title", "-c", "economics", "-c", "politics"]);
        match cli.command {
            Commands::New { title, categories, .. } => {
                assert_eq!(title, "A title");
                assert_eq!(categories, vec!["economics", "politics"]);
            }
            _ => panic!("expected new"),
        }
    }

    #[test]
    fn links_needs_a_note_or_check() {
        assert!(Cli::try_parse_from(["sn", "links"]).is_err());
        assert!(Cli::try_parse_from(["sn", "links", "--check"]).is_ok());
        assert!(Cli::try_parse_from(["sn", "links", "--repair"]).is_err());
        assert!(Cli::try_parse_from(["sn", "links", "--check", "--outgoing"]).is_err());
        assert!(Cli::try_parse_from(["sn", "links", "note.txt", "--outgoing"]).is_ok());
    }

    #[test]
    fn log_level_maps_to_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::DEBUG);
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::OFF);
    }
}
