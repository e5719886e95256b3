//! Output formatting for the CLI.

use console::{style, StyledObject};
use telly_commerce::cart::LineItem;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Neutral status line on stdout.
    pub fn info(&self, msg: &str) {
        self.marked(style("ℹ").blue(), msg, false);
    }

    /// Completed action on stdout; also how cart notifications are shown.
    pub fn success(&self, msg: &str) {
        self.marked(style("✓").green(), msg, false);
    }

    /// Something was skipped or cancelled; goes to stderr.
    pub fn warn(&self, msg: &str) {
        self.marked(style("⚠").yellow(), msg, true);
    }

    /// Failure on stderr, as `{"error": msg}` in JSON mode.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.marked(style("→").dim(), &style(msg).dim().to_string(), true);
        }
    }

    fn marked(&self, mark: StyledObject<&str>, msg: &str, stderr: bool) {
        if self.json {
            return;
        }
        if stderr {
            eprintln!("{} {}", mark, msg);
        } else {
            println!("{} {}", mark, msg);
        }
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Column widths for [`line_row`].
pub const LINE_WIDTHS: [usize; 6] = [10, 24, 8, 4, 10, 10];

pub const LINE_HEADERS: [&str; 6] = ["ID", "NAME", "SIZE", "QTY", "PRICE", "TOTAL"];

/// One cart line as table columns.
pub fn line_row(item: &LineItem) -> [String; 6] {
    [
        item.product_id.to_string(),
        truncate(&item.name, LINE_WIDTHS[1]),
        item.size.clone(),
        item.quantity.to_string(),
        item.price.display(),
        item.line_total().display(),
    ]
}

/// Shorten to `width` characters, ending in `…` when cut.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Ocean Bikini", 24), "Ocean Bikini");
        assert_eq!(truncate("Ocean Bikini", 6), "Ocean…");
    }
}
