//! Splits raw drafted email text into a subject and a body.
//!
//! Precedence: an explicit `Subject:` line wins. Only when there is none, or it is blank,
//! does the first meaningful line of the text stand in as the subject.

use serde::Serialize;

/// Subject used when the text has no usable lines at all.
pub const PLACEHOLDER_SUBJECT: &str = "Application Email Draft";
const SUBJECT_PREFIX: &str = "subject:";
const MAX_FALLBACK_SUBJECT_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

fn subject_marker(line: &str) -> Option<&str> {
    let line = line.trim_start();
    let head = line.get(..SUBJECT_PREFIX.len())?;
    head.eq_ignore_ascii_case(SUBJECT_PREFIX)
        .then(|| line[SUBJECT_PREFIX.len()..].trim())
}

fn join_trimmed(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

fn truncate_subject(line: &str) -> String {
    if line.chars().count() > MAX_FALLBACK_SUBJECT_CHARS {
        let head: String = line.chars().take(MAX_FALLBACK_SUBJECT_CHARS).collect();
        format!("{head}...")
    } else {
        line.to_string()
    }
}

/// Best-effort split. Never fails.
pub fn split_subject_body(raw_email: &str) -> EmailDraft {
    let lines: Vec<&str> = raw_email.lines().collect();

    let explicit = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| subject_marker(line).map(|subject| (i, subject)));

    if let Some((i, subject)) = explicit {
        if !subject.is_empty() {
            return EmailDraft {
                subject: subject.to_string(),
                body: join_trimmed(&lines[i + 1..]),
            };
        }
    }

    // A bare "Subject:" marker is not a subject line of its own.
    let fallback = lines.iter().enumerate().find_map(|(i, line)| {
        let line = line.trim();
        let usable = !line.is_empty() && subject_marker(line) != Some("");
        usable.then_some((i, line))
    });

    match fallback {
        Some((i, line)) => EmailDraft {
            subject: truncate_subject(line),
            body: join_trimmed(&lines[i + 1..]),
        },
        None => EmailDraft {
            subject: PLACEHOLDER_SUBJECT.to_string(),
            body: String::new(),
        },
    }
}
