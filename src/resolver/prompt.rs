//! Operator prompt seam for interactive resolution.
//!
//! The resolver talks to the operator through the [`Prompt`] trait so tests
//! can script the exchange. The production implementation reads stdin.

use std::io::{self, BufRead, Write};

use crate::model::LocalRecord;

/// One operator interaction: ask for a canonical id, confirm a candidate.
pub trait Prompt {
    /// Ask the operator to type a canonical id. `suggestion` is display text
    /// including a pre-built search URL.
    fn ask_for_id(&self, suggestion: &str) -> io::Result<String>;

    /// Ask the operator a yes/no question. Empty input means yes.
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Stdin/stderr prompt for terminal use.
///
/// Assumes exclusive access to the terminal; concurrent interactive
/// resolution is out of scope.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl StdinPrompt {
    fn read_line(&self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

impl Prompt for StdinPrompt {
    fn ask_for_id(&self, suggestion: &str) -> io::Result<String> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{suggestion}: ")?;
        stderr.flush()?;
        drop(stderr);
        self.read_line()
    }

    fn confirm(&self, question: &str) -> io::Result<bool> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{question} [Y/n]: ")?;
        stderr.flush()?;
        drop(stderr);
        let answer = self.read_line()?;
        Ok(answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

/// Pre-built search-engine query for a local record, pointing the operator at
/// the canonical catalog's site.
#[must_use]
pub fn search_url(local: &LocalRecord) -> String {
    let query = format!("{} {} site:www.imdb.com", local.title, local.start_year);
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(&query)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_is_encoded() {
        let local = LocalRecord::new("Blade Runner", 1982, "/movies/br");
        let url = search_url(&local);
        assert!(url.starts_with("https://www.google.com/search?q="));
        assert!(url.contains("Blade%20Runner%201982"));
        assert!(!url.contains(' '));
    }
}
