// ATS analysis prompt and the length guard applied to user input before it
// is interpolated. Budgets count chars, never bytes.

use std::borrow::Cow;

use serde::Serialize;

/// Bumped whenever the instruction wording or section layout changes.
pub const PROMPT_VERSION: &str = "ats-v2";

/// Appended to any field cut down to its budget.
pub const TRUNCATION_MARKER: &str = "\n[...truncated]";

pub const DEFAULT_JOB_DESCRIPTION_BUDGET: usize = 8_000;
pub const DEFAULT_RESUME_BUDGET: usize = 16_000;

/// Section headings the model is asked to produce, in order. The score comes
/// first so it can be read without parsing the rest.
pub const SECTION_HEADINGS: [&str; 4] = [
    "Match Percentage",
    "Missing Keywords",
    "Profile Summary",
    "Suggestions",
];

pub const ATS_INSTRUCTIONS: &str = "\
You are an experienced ATS (Applicant Tracking System) expert with deep knowledge of \
software engineering, data, and technology hiring. Compare the job description and the \
resume below and evaluate how well the resume matches the role.

Respond with exactly these four sections, in this order:
1. Match Percentage: a single whole number from 0 to 100 followed by %, on its own line.
2. Missing Keywords: a bulleted list of important keywords or skills from the job \
description that are missing or weak in the resume.
3. Profile Summary: a short summary, tailored to this role, that the candidate could use.
4. Suggestions: a bulleted list of concrete improvements to the resume for this role.";

/// Per-field character budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptBudgets {
    pub job_description: usize,
    pub resume: usize,
}

impl Default for PromptBudgets {
    fn default() -> Self {
        Self {
            job_description: DEFAULT_JOB_DESCRIPTION_BUDGET,
            resume: DEFAULT_RESUME_BUDGET,
        }
    }
}

/// Output of the length guard.
#[derive(Debug, Clone, PartialEq)]
pub struct Truncated<'a> {
    pub text: Cow<'a, str>,
    pub truncated: bool,
}

/// Keeps the first `budget` chars of `text` and appends `TRUNCATION_MARKER`
/// when `text` is longer than `budget`; otherwise returns it untouched.
pub fn truncate_to_budget(text: &str, budget: usize) -> Truncated<'_> {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => {
            let mut kept = String::with_capacity(cut + TRUNCATION_MARKER.len());
            kept.push_str(&text[..cut]);
            kept.push_str(TRUNCATION_MARKER);
            Truncated {
                text: Cow::Owned(kept),
                truncated: true,
            }
        }
        None => Truncated {
            text: Cow::Borrowed(text),
            truncated: false,
        },
    }
}

/// A prompt ready to send, plus which inputs had to be cut.
#[derive(Debug, Clone)]
pub struct ComposedPrompt {
    pub text: String,
    pub job_description_truncated: bool,
    pub resume_truncated: bool,
}

/// Truncates each input to its own budget and places both under the fixed
/// instructions. User text is inserted in a single pass, so braces or
/// anything placeholder-like inside it are left alone.
pub fn compose_prompt(job_description: &str, resume: &str, budgets: &PromptBudgets) -> ComposedPrompt {
    let jd = truncate_to_budget(job_description, budgets.job_description);
    let resume = truncate_to_budget(resume, budgets.resume);

    let text = format!(
        "{ATS_INSTRUCTIONS}\n\n**Job Description:**\n{}\n\n**Resume:**\n{}",
        jd.text, resume.text
    );

    ComposedPrompt {
        text,
        job_description_truncated: jd.truncated,
        resume_truncated: resume.truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_identity() {
        let result = truncate_to_budget("short", 10);
        assert!(!result.truncated);
        assert_eq!(result.text, "short");
        assert!(matches!(result.text, Cow::Borrowed(_)));
    }

    #[test]
    fn test_exact_budget_is_identity() {
        let result = truncate_to_budget("abcde", 5);
        assert!(!result.truncated);
        assert_eq!(result.text, "abcde");
    }

    #[test]
    fn test_long_text_keeps_prefix_and_marker() {
        let input = "abcdefghij";
        let result = truncate_to_budget(input, 4);
        assert!(result.truncated);
        assert_eq!(result.text, format!("abcd{TRUNCATION_MARKER}"));
        assert_eq!(
            result.text.chars().count(),
            4 + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn test_budget_counts_chars_not_bytes() {
        let input = "résumé ünïcödé";
        let result = truncate_to_budget(input, 6);
        assert!(result.truncated);
        assert_eq!(result.text, format!("résumé{TRUNCATION_MARKER}"));

        // 14 chars but far more bytes: still within a 14-char budget.
        let untouched = truncate_to_budget(input, 14);
        assert!(!untouched.truncated);
    }

    #[test]
    fn test_zero_budget() {
        let result = truncate_to_budget("x", 0);
        assert!(result.truncated);
        assert_eq!(result.text, TRUNCATION_MARKER);
        assert!(!truncate_to_budget("", 0).truncated);
    }

    #[test]
    fn test_compose_passes_short_inputs_through() {
        let jd = "Seeking a Python backend engineer with SQL experience";
        let resume = "Experienced Python developer.";
        let prompt = compose_prompt(jd, resume, &PromptBudgets::default());

        assert!(!prompt.job_description_truncated);
        assert!(!prompt.resume_truncated);
        assert_eq!(
            prompt.text,
            format!("{ATS_INSTRUCTIONS}\n\n**Job Description:**\n{jd}\n\n**Resume:**\n{resume}")
        );
    }

    #[test]
    fn test_compose_truncates_each_field_independently() {
        let budgets = PromptBudgets {
            job_description: 5,
            resume: 100,
        };
        let prompt = compose_prompt("0123456789", "short resume", &budgets);
        assert!(prompt.job_description_truncated);
        assert!(!prompt.resume_truncated);
        assert!(prompt.text.contains(&format!("01234{TRUNCATION_MARKER}")));
        assert!(!prompt.text.contains("56789"));
        assert!(prompt.text.contains("short resume"));
    }

    #[test]
    fn test_template_lists_sections_score_first() {
        let positions: Vec<usize> = SECTION_HEADINGS
            .iter()
            .map(|h| ATS_INSTRUCTIONS.find(h).expect("heading in template"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(ATS_INSTRUCTIONS.contains("0 to 100"));
    }

    #[test]
    fn test_placeholder_like_input_is_not_expanded() {
        let prompt = compose_prompt("{resume}", "actual resume", &PromptBudgets::default());
        assert!(prompt.text.contains("**Job Description:**\n{resume}"));
    }
}
