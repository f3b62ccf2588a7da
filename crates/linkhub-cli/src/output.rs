//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use linkhub_core::{Document, SearchEngine};
use serde_json::Value;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single link with its position
    pub fn print_link(&self, index: usize, link: &Document) {
        match self.format {
            OutputFormat::Human => {
                println!("Index:  {}", index);
                println!("Title:  {}", field(link, "title").unwrap_or("(untitled)"));
                if let Some(url) = field(link, "url") {
                    println!("URL:    {}", url);
                }
                if let Some(image) = field(link, "image") {
                    println!("Image:  {}", image);
                }
                if let Value::Object(map) = link {
                    for (key, value) in map {
                        if !matches!(key.as_str(), "title" | "url" | "image") {
                            println!("{:<7} {}", format!("{}:", key), value);
                        }
                    }
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"index": index, "link": link})
                );
            }
            OutputFormat::Quiet => {
                println!("{}", index);
            }
        }
    }

    /// Print the link list
    pub fn print_links(&self, links: &[Document]) {
        match self.format {
            OutputFormat::Human => {
                if links.is_empty() {
                    println!("No links found.");
                    return;
                }
                for (index, link) in links.iter().enumerate() {
                    println!(
                        "{:>3} | {} | {}",
                        index,
                        truncate(field(link, "title").unwrap_or("(untitled)"), 35),
                        truncate(field(link, "url").unwrap_or(""), 45)
                    );
                }
                println!("\n{} link(s)", links.len());
            }
            OutputFormat::Json => {
                println!("{}", pretty(&links));
            }
            OutputFormat::Quiet => {
                for index in 0..links.len() {
                    println!("{}", index);
                }
            }
        }
    }

    /// Print the registered engines, marking the active one
    ///
    /// `selection` is the stored engine name; `active` is the engine it
    /// resolves to, if any.
    pub fn print_engines(
        &self,
        engines: &[SearchEngine],
        selection: &str,
        active: Option<&SearchEngine>,
    ) {
        match self.format {
            OutputFormat::Human => {
                if engines.is_empty() {
                    println!("No search engines registered.");
                } else {
                    for engine in engines {
                        let marker = if active.is_some_and(|a| a.name == engine.name) {
                            "*"
                        } else {
                            " "
                        };
                        println!(
                            "{} {} | {} | {}",
                            marker,
                            truncate(&engine.name, 20),
                            truncate(&engine.url, 45),
                            engine.logo
                        );
                    }
                    println!("\n{} engine(s)", engines.len());
                }
                if selection.is_empty() {
                    println!("No active engine.");
                } else if active.is_none() {
                    println!("Active engine '{}' is not registered.", selection);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    pretty(&serde_json::json!({"engine": selection, "engines": engines}))
                );
            }
            OutputFormat::Quiet => {
                for engine in engines {
                    println!("{}", engine.name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn field<'a>(link: &'a Document, key: &str) -> Option<&'a str> {
    link.get(key).and_then(Value::as_str)
}

fn pretty<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
