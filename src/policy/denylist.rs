//! Denylist pattern bank.
//!
//! Ordered regular expressions matching known dangerous constructs in raw
//! SVG text. The bank runs before structural parsing so that raw-text
//! attacks a parser might normalize away are caught first (see
//! [`crate::sanitize`] for the full pass ordering).

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{GuardError, GuardResult};

/// What to do when a rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyAction {
    /// Replace every match with the empty string.
    Strip,
    /// Fail sanitization outright; the candidate is refused.
    Reject,
}

/// A single denylist rule.
#[derive(Debug, Clone, Copy)]
pub struct DenyRule {
    /// Rule name for logging and error messages.
    pub name: &'static str,
    /// Pattern source.
    pub pattern: &'static str,
    pub action: DenyAction,
}

/// The rule bank, in application order. Script blocks are removed before the
/// orphan-tag rule so their text content goes with them.
pub const RULES: &[DenyRule] = &[
    DenyRule {
        name: "entity-declaration",
        pattern: r"(?i)<!ENTITY",
        action: DenyAction::Reject,
    },
    DenyRule {
        name: "script-block",
        pattern: r"(?is)<script\b[^>]*>.*?</script\s*>",
        action: DenyAction::Strip,
    },
    DenyRule {
        name: "script-tag",
        pattern: r"(?i)</?script\b[^>]*>",
        action: DenyAction::Strip,
    },
    DenyRule {
        name: "event-handler",
        pattern: r#"(?i)\bon[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#,
        action: DenyAction::Strip,
    },
    DenyRule {
        name: "javascript-uri",
        pattern: r"(?i)javascript\s*:",
        action: DenyAction::Strip,
    },
    DenyRule {
        name: "vbscript-uri",
        pattern: r"(?i)vbscript\s*:",
        action: DenyAction::Strip,
    },
    DenyRule {
        name: "data-html-uri",
        pattern: r"(?i)data\s*:\s*text/html",
        action: DenyAction::Strip,
    },
    DenyRule {
        name: "data-application-uri",
        pattern: r"(?i)data\s*:\s*application",
        action: DenyAction::Strip,
    },
];

struct CompiledRule {
    regex: Regex,
    rule: &'static DenyRule,
}

static COMPILED: LazyLock<Result<Vec<CompiledRule>, regex::Error>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|rule| {
            Regex::new(rule.pattern).map(|regex| CompiledRule { regex, rule })
        })
        .collect()
});

fn compiled() -> GuardResult<&'static [CompiledRule]> {
    match &*COMPILED {
        Ok(rules) => Ok(rules.as_slice()),
        Err(e) => Err(GuardError::Unsanitizable(format!(
            "denylist pattern failed to compile: {e}"
        ))),
    }
}

/// Apply the bank to raw text.
///
/// Strip rules replace matches with the empty string; a Reject rule match
/// fails the whole candidate. Pattern-engine failure is an error, never a
/// silent pass-through.
pub fn apply(text: &str) -> GuardResult<String> {
    let mut result = text.to_string();

    for entry in compiled()? {
        match entry.rule.action {
            DenyAction::Reject => {
                if entry.regex.is_match(&result) {
                    return Err(GuardError::Unsanitizable(format!(
                        "forbidden construct: {}",
                        entry.rule.name
                    )));
                }
            }
            DenyAction::Strip => {
                if entry.regex.is_match(&result) {
                    tracing::debug!(rule = entry.rule.name, "denylist rule stripped content");
                    result = entry.regex.replace_all(&result, "").into_owned();
                }
            }
        }
    }

    Ok(result)
}

/// Scan text for any residual rule match.
///
/// Used as a post-serialization check: conforming output must not match any
/// rule. Returns the name of the first matching rule.
pub fn residual_match(text: &str) -> GuardResult<Option<&'static str>> {
    for entry in compiled()? {
        if entry.regex.is_match(text) {
            return Ok(Some(entry.rule.name));
        }
    }
    Ok(None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_blocks() {
        let out = apply(r#"<svg><script>alert(1)</script><rect/></svg>"#).unwrap();
        assert!(!out.contains("script"));
        assert!(!out.contains("alert"));
        assert!(out.contains("<rect/>"));
    }

    #[test]
    fn strips_event_handlers() {
        let out = apply(r#"<svg onload="alert(1)" onclick='x()'><g/></svg>"#).unwrap();
        assert!(!out.contains("onload"));
        assert!(!out.contains("onclick"));
        assert!(out.contains("<g/>"));
    }

    #[test]
    fn strips_unquoted_event_handler() {
        let out = apply(r#"<svg onload=alert(1)><g/></svg>"#).unwrap();
        assert!(!out.contains("onload"));
    }

    #[test]
    fn strips_script_uris() {
        let out = apply(r#"<a href="javascript:alert(1)"/><a href="VBScript:x"/>"#).unwrap();
        assert!(!out.to_lowercase().contains("javascript:"));
        assert!(!out.to_lowercase().contains("vbscript:"));
    }

    #[test]
    fn strips_data_html_uris() {
        let out = apply(r#"<a href="data:text/html,<script>x</script>"/>"#).unwrap();
        assert!(!out.contains("data:text/html"));
    }

    #[test]
    fn rejects_entity_declarations() {
        let input = r#"<!DOCTYPE svg [<!ENTITY xxe SYSTEM "file:///etc/passwd">]><svg>&xxe;</svg>"#;
        let err = apply(input).unwrap_err();
        assert!(err.to_string().contains("entity-declaration"));
    }

    #[test]
    fn clean_text_untouched() {
        let input = r#"<svg viewBox="0 0 10 10"><rect width="10" height="10"/></svg>"#;
        assert_eq!(apply(input).unwrap(), input);
    }

    #[test]
    fn residual_reports_first_match() {
        assert_eq!(residual_match("<g fill=\"red\"/>").unwrap(), None);
        assert_eq!(
            residual_match("x javascript: y").unwrap(),
            Some("javascript-uri")
        );
    }
}
