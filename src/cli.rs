//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`InputKind`] - How the input text is turned into records
//! - [`OutputFormat`] - Output format options
//!
//! # Using OutputFormat in Libraries
//!
//! ```rust
//! use chatdoc::cli::OutputFormat;
//! use chatdoc::format::DocumentFormat;
//!
//! let format: DocumentFormat = OutputFormat::Word.into();
//! assert_eq!(format.extension(), "docx");
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::Record;
use crate::config::{RenderConfig, TextStyle};
use crate::core::table::TableSyntax;
use crate::error::{ChatdocError, Result};
use crate::format::DocumentFormat;
use crate::ingest;

/// Render chat messages or tabular rows as Markdown, PDF, Word or Excel
/// documents.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatdoc")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatdoc notes.txt
    chatdoc roster.csv -f excel -o exports
    chatdoc answer.txt --input text -f word
    chatdoc notes.txt -f pdf --styled
    cat rows.json | chatdoc - --input json -f pdf")]
pub struct Args {
    /// Path to input file, or `-` for stdin
    pub input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: OutputFormat,

    /// Directory the generated document is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// How to read the input
    #[arg(long = "input", value_enum, default_value = "auto")]
    pub input_kind: InputKind,

    /// Classify lines as headings, bold lead-ins and links (PDF and Word)
    #[arg(long)]
    pub styled: bool,

    /// Only treat lines that start and end with `|` as table lines
    #[arg(long)]
    pub strict_tables: bool,

    /// JSON file with rendering options
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Returns `true` when input comes from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.input == "-"
    }

    /// Builds the render configuration: the `--config` file (if any), then
    /// `--styled` and `--strict-tables` on top.
    pub fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RenderConfig::new(),
        };
        if self.styled {
            config = config.with_text_style(TextStyle::Styled);
        }
        if self.strict_tables {
            config = config.with_table_syntax(TableSyntax::Strict);
        }
        Ok(config)
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

#[cfg(feature = "json-input")]
fn load_config(path: &Path) -> Result<RenderConfig> {
    RenderConfig::from_json_file(path)
}

#[cfg(not(feature = "json-input"))]
fn load_config(path: &Path) -> Result<RenderConfig> {
    Err(ChatdocError::invalid_input(
        "config",
        format!(
            "reading {} requires the 'json-input' feature",
            path.display()
        ),
    ))
}

/// How input text becomes records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// `.csv` as CSV, `.json` as JSON, everything else line by line
    #[default]
    Auto,

    /// Header row plus data rows
    Csv,

    /// One message per non-blank line
    Lines,

    /// The whole text as one message (keeps pasted tables together)
    Text,

    /// Array of JSON objects
    Json,
}

impl InputKind {
    /// Resolves [`Auto`](InputKind::Auto) from the input path.
    pub fn resolve(self, input: &str) -> InputKind {
        if self != InputKind::Auto {
            return self;
        }
        let ext = Path::new(input)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "csv" => InputKind::Csv,
            "json" => InputKind::Json,
            _ => InputKind::Lines,
        }
    }

    /// Parses `text` into records.
    pub fn read(self, text: &str) -> Result<Vec<Record>> {
        match self {
            InputKind::Auto | InputKind::Lines => ingest::records_from_lines(text),
            InputKind::Text => ingest::records_from_text_block(text),
            #[cfg(feature = "csv-input")]
            InputKind::Csv => ingest::records_from_csv(text),
            #[cfg(feature = "json-input")]
            InputKind::Json => ingest::records_from_json(text),
            #[allow(unreachable_patterns)]
            other => Err(ChatdocError::invalid_input(
                "input",
                format!("{other} input requires the '{}-input' feature", other.name()),
            )),
        }
    }

    fn name(self) -> &'static str {
        match self {
            InputKind::Auto => "auto",
            InputKind::Csv => "csv",
            InputKind::Lines => "lines",
            InputKind::Text => "text",
            InputKind::Json => "json",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Auto => write!(f, "Auto"),
            InputKind::Csv => write!(f, "CSV"),
            InputKind::Lines => write!(f, "Lines"),
            InputKind::Text => write!(f, "Text"),
            InputKind::Json => write!(f, "JSON"),
        }
    }
}

/// Output format options.
///
/// # Example
///
/// ```rust
/// use chatdoc::cli::OutputFormat;
///
/// let format: OutputFormat = "xlsx".parse().unwrap();
/// assert_eq!(format, OutputFormat::Excel);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown paragraphs or pipe table (default)
    #[default]
    #[value(alias = "md")]
    Markdown,

    /// Paginated PDF
    Pdf,

    /// Word document
    #[value(alias = "docx")]
    Word,

    /// Excel workbook
    #[value(alias = "xlsx")]
    Excel,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&DocumentFormat::from(*self), f)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<DocumentFormat>().map(Into::into)
    }
}

// Conversion to and from the library format type
impl From<OutputFormat> for DocumentFormat {
    fn from(format: OutputFormat) -> DocumentFormat {
        match format {
            OutputFormat::Markdown => DocumentFormat::Markdown,
            OutputFormat::Pdf => DocumentFormat::Pdf,
            OutputFormat::Word => DocumentFormat::Word,
            OutputFormat::Excel => DocumentFormat::Excel,
        }
    }
}

impl From<DocumentFormat> for OutputFormat {
    fn from(format: DocumentFormat) -> OutputFormat {
        match format {
            DocumentFormat::Markdown => OutputFormat::Markdown,
            DocumentFormat::Pdf => OutputFormat::Pdf,
            DocumentFormat::Word => OutputFormat::Word,
            DocumentFormat::Excel => OutputFormat::Excel,
        }
    }
}
