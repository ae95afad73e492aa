//! Scene heading detection and heading field parsing.

use regex::{Regex, RegexBuilder};

use crate::error::{Result, ScreenplayError};

/// One located heading line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMatch {
    /// Byte offset of the line start in the document
    pub start_offset: usize,
    /// The whole heading line, without its line terminator
    pub matched_text: String,
}

impl HeadingMatch {
    /// Byte offset just past the heading line.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.matched_text.len()
    }
}

/// Location and time of day pulled out of a heading line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHeading {
    pub location: Option<String>,
    pub time_of_day: Option<String>,
}

/// Alternation of the escaped keywords, in configured order.
fn keyword_alternation(keywords: &[String]) -> Result<String> {
    let escaped: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(regex::escape)
        .collect();

    if escaped.is_empty() {
        return Err(ScreenplayError::EmptyKeywordList);
    }

    Ok(format!("(?:{})", escaped.join("|")))
}

/// Finds heading lines: any line whose start matches a configured keyword.
#[derive(Debug, Clone)]
pub struct HeadingMatcher {
    pattern: Regex,
}

impl HeadingMatcher {
    pub fn new(keywords: &[String]) -> Result<Self> {
        let alternation = keyword_alternation(keywords)?;
        // `.` stops at '\n', so each match is exactly one line
        let pattern = RegexBuilder::new(&format!(r"^{}[^\n]*", alternation))
            .multi_line(true)
            .case_insensitive(true)
            .build()?;

        Ok(Self { pattern })
    }

    /// All heading lines in ascending offset order. Never overlapping: one match per line.
    pub fn find_all(&self, text: &str) -> Vec<HeadingMatch> {
        self.pattern
            .find_iter(text)
            .map(|m| HeadingMatch {
                start_offset: m.start(),
                matched_text: m.as_str().trim_end_matches('\r').to_string(),
            })
            .collect()
    }
}

/// Splits a heading line into location and time of day.
#[derive(Debug, Clone)]
pub struct HeadingParser {
    prefix: Regex,
}

impl HeadingParser {
    pub fn new(keywords: &[String]) -> Result<Self> {
        let alternation = keyword_alternation(keywords)?;
        // Only an optional dot and whitespace go with the keyword
        let prefix = RegexBuilder::new(&format!(r"^{}\.?\s*", alternation))
            .case_insensitive(true)
            .build()?;

        Ok(Self { prefix })
    }

    /// Strip one leading keyword, then split on `-`.
    ///
    /// The first non-empty part is the location and the next one the time of
    /// day. Anything after that is dropped, so `"INT/EXT. HOUSE - KITCHEN - DAY"`
    /// yields `HOUSE` / `KITCHEN`.
    pub fn parse(&self, heading: &str) -> ParsedHeading {
        let heading = heading.trim();
        let rest = self.prefix.replace(heading, "");

        let mut parts = rest
            .trim()
            .split('-')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        ParsedHeading {
            location: parts.next(),
            time_of_day: parts.next(),
        }
    }
}
