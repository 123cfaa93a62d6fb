//! Block parser for the plaintext input format
//!
//! Input is UTF-8 plaintext. A line starting with `*` opens a new section
//! (the name is the line with asterisks and surrounding whitespace
//! stripped). Blank lines separate citation blocks of up to three lines:
//! line 1 is the citation text, lines 2-3 are classified as URL
//! (`http://`/`https://` prefix) or comment, at most one of each.

use crate::domain::{CitationBlock, Section};
use crate::error::ParseError;

fn is_url_line(line: &str) -> bool {
    line.starts_with("http://") || line.starts_with("https://")
}

/// Build a citation block from buffered lines, or reject a malformed one.
/// `start_line` is the 1-based input line the buffer began on.
fn build_block(lines: &[String], start_line: usize) -> Result<CitationBlock, ParseError> {
    match lines {
        [text] => Ok(CitationBlock::new(text.clone())),
        [text, extra] => {
            let block = CitationBlock::new(text.clone());
            if is_url_line(extra) {
                Ok(block.with_url(extra.clone()))
            } else {
                Ok(block.with_comment(extra.clone()))
            }
        }
        [text, second, third] => match (is_url_line(second), is_url_line(third)) {
            (true, false) => Ok(CitationBlock::new(text.clone())
                .with_url(second.clone())
                .with_comment(third.clone())),
            (false, true) => Ok(CitationBlock::new(text.clone())
                .with_url(third.clone())
                .with_comment(second.clone())),
            (true, true) => Err(ParseError::DuplicateUrl { line: start_line }),
            (false, false) => Err(ParseError::DuplicateComment { line: start_line }),
        },
        _ => Err(ParseError::TooManyLines { line: start_line }),
    }
}

/// Parse raw input text into ordered sections of citation blocks.
///
/// Structural violations are fatal and reported with the line number the
/// offending block started on. No network activity has happened by the
/// time this returns.
pub fn parse_input(text: &str) -> Result<Vec<Section>, ParseError> {
    let mut sections: Vec<Section> = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    let mut buffer_start = 0usize;

    let flush =
        |sections: &mut Vec<Section>, buffer: &mut Vec<String>, start: usize| -> Result<(), ParseError> {
            if buffer.is_empty() {
                return Ok(());
            }
            let block = build_block(buffer, start)?;
            match sections.last_mut() {
                Some(section) => section.blocks.push(block),
                None => return Err(ParseError::BlockOutsideSection { line: start }),
            }
            buffer.clear();
            Ok(())
        };

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.starts_with('*') {
            flush(&mut sections, &mut buffer, buffer_start)?;
            let name = line.replace('*', "").trim().to_string();
            sections.push(Section::new(name));
        } else if line.is_empty() {
            flush(&mut sections, &mut buffer, buffer_start)?;
        } else {
            if buffer.is_empty() {
                buffer_start = line_no;
            }
            buffer.push(line.to_string());
        }
    }
    flush(&mut sections, &mut buffer, buffer_start)?;

    Ok(sections)
}
