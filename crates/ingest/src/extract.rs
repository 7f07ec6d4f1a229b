//! Exam-text extraction
//!
//! Turns recognized document text into question candidates. The expected
//! shape is the usual printed-exam layout: a numbered stem, lettered
//! options, an `Answer:` line, optionally an `Explanation:` line:
//!
//! ```text
//! 1. What is the capital of France?
//! A) London
//! B) Paris
//! C) Rome
//! D) Madrid
//! Answer: B
//! Explanation: Paris has been the capital since 508.
//! ```

use regex::Regex;

/// Minimum option count for a candidate to qualify as multiple-choice.
/// Candidates with fewer (but at least one) lettered options are treated
/// as mis-recognized and skipped; zero options means free-form.
pub const MIN_OPTIONS: usize = 4;

/// One question candidate recognized in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuestion {
    pub content: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
}

/// Extraction outcome: the candidates that qualified, and how many were
/// dropped as malformed
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub questions: Vec<ExtractedQuestion>,
    pub skipped: usize,
}

#[derive(Default)]
struct Candidate {
    content: String,
    options: Vec<String>,
    answer: Option<String>,
    explanation: Option<String>,
}

impl Candidate {
    fn qualify(self) -> Option<ExtractedQuestion> {
        let answer = self.answer?;
        if self.content.is_empty() || answer.is_empty() {
            return None;
        }
        // Free-form (no options) or proper multiple-choice; 1..MIN_OPTIONS
        // lettered lines means recognition mangled the option block.
        if !self.options.is_empty() && self.options.len() < MIN_OPTIONS {
            return None;
        }
        Some(ExtractedQuestion {
            content: self.content,
            options: self.options,
            answer,
            explanation: self.explanation.unwrap_or_default(),
        })
    }
}

/// Parse recognized text into question candidates. Pure: no I/O, no
/// ordering decisions — the worker assigns order indexes.
pub fn extract_questions(text: &str) -> Extraction {
    let stem_re = Regex::new(r"^\s*\d+[.)]\s+(.+)$").expect("static pattern");
    let option_re = Regex::new(r"^\s*([A-Ha-h])[.)]\s+(.+)$").expect("static pattern");
    let answer_re = Regex::new(r"(?i)^\s*answer\s*:\s*(.+)$").expect("static pattern");
    let explanation_re = Regex::new(r"(?i)^\s*explanation\s*:\s*(.+)$").expect("static pattern");

    let mut out = Extraction::default();
    let mut current: Option<Candidate> = None;

    let finish = |candidate: Option<Candidate>, out: &mut Extraction| {
        if let Some(c) = candidate {
            match c.qualify() {
                Some(q) => out.questions.push(q),
                None => out.skipped += 1,
            }
        }
    };

    for line in text.lines() {
        if let Some(caps) = stem_re.captures(line) {
            finish(current.take(), &mut out);
            current = Some(Candidate {
                content: caps[1].trim().to_string(),
                ..Candidate::default()
            });
            continue;
        }

        let Some(candidate) = current.as_mut() else {
            // Preamble before the first numbered stem (titles, headers).
            continue;
        };

        if let Some(caps) = option_re.captures(line) {
            candidate.options.push(caps[2].trim().to_string());
        } else if let Some(caps) = answer_re.captures(line) {
            candidate.answer = Some(caps[1].trim().to_string());
        } else if let Some(caps) = explanation_re.captures(line) {
            candidate.explanation = Some(caps[1].trim().to_string());
        } else if !line.trim().is_empty()
            && candidate.options.is_empty()
            && candidate.answer.is_none()
        {
            // Wrapped stem line.
            candidate.content.push(' ');
            candidate.content.push_str(line.trim());
        }
    }
    finish(current.take(), &mut out);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Geography Exam, Spring Edition

1. What is the capital of France?
A) London
B) Paris
C) Rome
D) Madrid
Answer: B
Explanation: Paris has been the capital since 508.

2. Which river flows through Cairo?
A) Tigris
B) Euphrates
C) Nile
D) Danube
Answer: C
";

    #[test]
    fn parses_multiple_choice_questions() {
        let extraction = extract_questions(SAMPLE);
        assert_eq!(extraction.questions.len(), 2);
        assert_eq!(extraction.skipped, 0);

        let first = &extraction.questions[0];
        assert_eq!(first.content, "What is the capital of France?");
        assert_eq!(first.options, vec!["London", "Paris", "Rome", "Madrid"]);
        assert_eq!(first.answer, "B");
        assert_eq!(first.explanation, "Paris has been the capital since 508.");

        let second = &extraction.questions[1];
        assert_eq!(second.answer, "C");
        assert_eq!(second.explanation, "");
    }

    #[test]
    fn skips_candidates_with_too_few_options() {
        let text = "\
1. Mangled by recognition?
A) Only
B) Two
Answer: A

2. Intact question?
A) One
B) Two
C) Three
D) Four
Answer: D
";
        let extraction = extract_questions(text);
        assert_eq!(extraction.questions.len(), 1);
        assert_eq!(extraction.skipped, 1);
        assert_eq!(extraction.questions[0].answer, "D");
    }

    #[test]
    fn skips_candidates_without_answer_key() {
        let text = "\
1. No key here?
A) One
B) Two
C) Three
D) Four
";
        let extraction = extract_questions(text);
        assert!(extraction.questions.is_empty());
        assert_eq!(extraction.skipped, 1);
    }

    #[test]
    fn accepts_free_form_questions() {
        let text = "\
1. Name the largest planet in the solar system.
Answer: Jupiter
Explanation: By both mass and volume.
";
        let extraction = extract_questions(text);
        assert_eq!(extraction.questions.len(), 1);
        let q = &extraction.questions[0];
        assert!(q.options.is_empty());
        assert_eq!(q.answer, "Jupiter");
    }

    #[test]
    fn joins_wrapped_stem_lines() {
        let text = "\
1. Which treaty, signed in 1648, ended
the Thirty Years' War?
Answer: The Peace of Westphalia
";
        let extraction = extract_questions(text);
        assert_eq!(extraction.questions.len(), 1);
        assert_eq!(
            extraction.questions[0].content,
            "Which treaty, signed in 1648, ended the Thirty Years' War?"
        );
    }

    #[test]
    fn empty_document_yields_nothing() {
        let extraction = extract_questions("");
        assert!(extraction.questions.is_empty());
        assert_eq!(extraction.skipped, 0);
    }

    #[test]
    fn answer_label_is_case_insensitive() {
        let text = "\
1. Case test?
ANSWER: yes
";
        let extraction = extract_questions(text);
        assert_eq!(extraction.questions.len(), 1);
        assert_eq!(extraction.questions[0].answer, "yes");
    }
}
