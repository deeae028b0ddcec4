//! Removal of dangerous elements together with their content.

use regex::Regex;

use super::policy::DANGEROUS_TAGS;
use super::{Pass, Removals, compile};

struct TagRule {
    name: &'static str,
    self_closing: Regex,
    paired: Regex,
    /// Opening or closing tags left unbalanced by malformed input.
    stray: Regex,
}

impl TagRule {
    fn new(name: &'static str) -> Self {
        let tag = regex::escape(name);
        Self {
            name,
            self_closing: compile(&format!(r"(?is)<{tag}(?:\s[^>]*)?/>")),
            paired: compile(&format!(r"(?is)<{tag}(?:\s[^>]*)?>.*?</{tag}\s*>")),
            stray: compile(&format!(r"(?i)</?{tag}\b[^>]*>?")),
        }
    }

    /// Strip every occurrence, returning `None` if nothing matched.
    fn strip(&self, svg: &str) -> Option<String> {
        let mut out = svg.to_string();
        let mut matched = false;

        // Removing a pair can splice its neighbours into a new pair.
        loop {
            let mut changed = false;
            for re in [&self.self_closing, &self.paired] {
                if re.is_match(&out) {
                    out = re.replace_all(&out, "").into_owned();
                    changed = true;
                }
            }
            if !changed {
                break;
            }
            matched = true;
        }

        if self.stray.is_match(&out) {
            out = self.stray.replace_all(&out, "").into_owned();
            matched = true;
        }

        matched.then_some(out)
    }
}

/// Removes every element named in [`DANGEROUS_TAGS`], paired or self-closing.
pub(crate) struct DangerousTags {
    rules: Vec<TagRule>,
}

impl DangerousTags {
    pub(crate) fn new() -> Self {
        Self {
            rules: DANGEROUS_TAGS.iter().map(|&name| TagRule::new(name)).collect(),
        }
    }
}

impl Pass for DangerousTags {
    fn name(&self) -> &'static str {
        "dangerous-tags"
    }

    fn apply(&self, svg: &str, removals: &mut Removals) -> String {
        self.rules.iter().fold(svg.to_string(), |acc, rule| {
            match rule.strip(&acc) {
                Some(out) => {
                    tracing::debug!("Removed <{}> elements", rule.name);
                    removals.element(rule.name);
                    out
                }
                None => acc,
            }
        })
    }
}
