//! Source list parsing.

use std::path::PathBuf;

const QUOTES: &[char] = &['"', '\''];

/// One path per line. Surrounding quotes and whitespace are stripped (paths
/// copied from a file manager often arrive quoted); blank lines are ignored.
pub fn parse_source_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(|line| line.trim_matches(|c: char| c.is_whitespace() || QUOTES.contains(&c)))
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
