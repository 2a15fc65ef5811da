//! Terminal output for the domainr CLI.
//!
//! On a terminal the found-list is redrawn in place every time it grows, so
//! the user always sees the complete sorted list. When stdout is piped only
//! newly found domains are printed, one per line.

use console::{style, Term};
use domainr_lib::{DomainrError, SearchSummary};
use std::collections::HashSet;
use std::io;

/// Live view of the available domains found so far.
pub struct FoundList {
    term: Term,
    interactive: bool,
    drawn: usize,
    printed: HashSet<String>,
}

impl FoundList {
    pub fn new() -> Self {
        let term = Term::stdout();
        Self {
            interactive: term.is_term(),
            term,
            drawn: 0,
            printed: HashSet::new(),
        }
    }

    /// Show the latest sorted found-list.
    pub fn update(&mut self, list: &[String]) -> io::Result<()> {
        if self.interactive {
            self.term.clear_last_lines(self.drawn)?;
            for domain in list {
                self.term.write_line(&style(domain).blue().to_string())?;
            }
            self.drawn = list.len();
            return Ok(());
        }

        for domain in new_entries(&self.printed, list) {
            self.term.write_line(domain)?;
        }
        self.printed.extend(list.iter().cloned());
        Ok(())
    }
}

impl Default for FoundList {
    fn default() -> Self {
        Self::new()
    }
}

/// Entries of `list` not printed yet, in list order.
fn new_entries<'a>(printed: &HashSet<String>, list: &'a [String]) -> Vec<&'a str> {
    list.iter()
        .filter(|domain| !printed.contains(*domain))
        .map(String::as_str)
        .collect()
}

/// Print a dim header at the start of a search.
pub fn print_header(candidates: usize, workers: usize, source: &str) {
    eprintln!(
        "{} {} {}",
        style("domainr").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "- Checking {} domain{} via {} with {} worker{}",
            candidates,
            plural(candidates),
            source,
            workers,
            plural(workers)
        ))
        .dim(),
    );
}

pub fn print_summary(summary: &SearchSummary) {
    println!();
    println!("{}", style(summary).green());
}

pub fn print_api_error(error: &DomainrError) {
    eprintln!("{}", style(format!("API error: {}", error)).red());
}

pub fn print_error(message: impl std::fmt::Display) {
    eprintln!("{}", style(format!("Error: {}", message)).red());
}

pub fn print_notice(message: impl std::fmt::Display) {
    eprintln!("{}", style(message).yellow());
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
