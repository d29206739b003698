//! Light structure checks on the model's reply. The reply itself is returned
//! verbatim; these only surface the score and flag replies that skipped a
//! section.

use crate::analysis::prompt::SECTION_HEADINGS;

/// Reads the match score (0–100) from a reply.
///
/// The first `NN%` in the reply wins since the score section comes first.
/// Without a percent sign, the first number after the word "match" is used.
pub fn parse_match_score(text: &str) -> Option<u8> {
    first_percentage(text).or_else(|| {
        let lower = text.to_lowercase();
        let start = lower.find("match")? + "match".len();
        first_number(&lower[start..]).filter(|n| *n <= 100)
    })
}

/// True when every heading the prompt asks for appears, in order. Case is
/// ignored so markdown or upper-case headings still count.
pub fn has_required_sections(text: &str) -> bool {
    let lower = text.to_lowercase();
    let mut from = 0;
    for heading in SECTION_HEADINGS {
        let heading = heading.to_lowercase();
        match lower[from..].find(&heading) {
            Some(pos) => from += pos + heading.len(),
            None => return false,
        }
    }
    true
}

fn first_percentage(text: &str) -> Option<u8> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let digits = &text[start..i];
        let mut j = i;
        while j < bytes.len() && bytes[j] == b' ' {
            j += 1;
        }
        if j < bytes.len() && bytes[j] == b'%' {
            if let Ok(value) = digits.parse::<u8>() {
                if value <= 100 {
                    return Some(value);
                }
            }
        }
    }
    None
}

fn first_number(text: &str) -> Option<u8> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
