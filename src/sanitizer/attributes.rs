//! Removal of event handlers, resource references and script URLs.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::policy::{DANGEROUS_ATTRIBUTES, contains_dangerous_url, is_event_handler};
use super::{Pass, Removals, attribute_boundary, compile};

/// Value forms accepted after the name: a quoted value (`="..."`, `='...'`,
/// whitespace allowed around `=`) or an unquoted token written directly after
/// `=`. Unquoted tokens never cross `<`, `>` or `=`, so text such as
/// `action = go` or `src=<tspan>` is left alone.
const VALUE: &str =
    r#"(?:\s*=\s*(?P<quoted>"[^"]*"|'[^']*')|=(?P<bare>[^\s"'<>=`/]+))"#;

/// Pattern for a `name=value` attribute.
///
/// `pre` is the delimiter preceding the attribute. It excludes word
/// characters, `.` and `-`, so `onload` never matches inside `xonload` and
/// `background` never matches inside `enable-background`.
pub(crate) fn attribute_pattern(name: &str) -> Regex {
    compile(&format!(
        r"(?i)(?P<pre>^|[^\w.-])(?P<ws>\s*)(?P<name>{name}){VALUE}"
    ))
}

/// The attribute value without its quotes.
fn attribute_value<'h>(caps: &Captures<'h>) -> &'h str {
    match (caps.name("quoted"), caps.name("bare")) {
        (Some(quoted), _) => {
            let value = quoted.as_str();
            &value[1..value.len() - 1]
        }
        (_, Some(bare)) => bare.as_str(),
        _ => "",
    }
}

/// Any attribute, used to catch unlisted handlers and script URLs.
static ANY_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| attribute_pattern(r"[\w:.-]+"));

/// Strips every attribute in [`DANGEROUS_ATTRIBUTES`] regardless of its value,
/// then any other `on*` handler and any attribute whose value carries a
/// script URL.
///
/// `href` and `xlink:href` fall in the first group, so no hyperlink survives,
/// not even a relative one.
pub(crate) struct DangerousAttributes {
    rules: Vec<(&'static str, Regex)>,
}

impl DangerousAttributes {
    pub(crate) fn new() -> Self {
        let rules = DANGEROUS_ATTRIBUTES
            .iter()
            .map(|&name| (name, attribute_pattern(&regex::escape(name))))
            .collect();
        Self { rules }
    }

    fn strip_named(&self, svg: &str, removals: &mut Removals) -> String {
        self.rules.iter().fold(svg.to_string(), |acc, (name, re)| {
            if !re.is_match(&acc) {
                return acc;
            }
            tracing::debug!("Removed {name} attributes");
            removals.attribute(*name);
            re.replace_all(&acc, |caps: &Captures| attribute_boundary(caps))
                .into_owned()
        })
    }
}

/// Strips unlisted `on*` handlers and attributes whose value is a dangerous
/// URL. `style` is left to the CSS filter.
fn strip_unlisted(svg: &str, removals: &mut Removals) -> String {
    ANY_ATTRIBUTE
        .replace_all(svg, |caps: &Captures| {
            let name = caps["name"].to_lowercase();
            let handler = is_event_handler(&name);
            if name == "style" || !(handler || contains_dangerous_url(attribute_value(caps))) {
                return caps[0].to_string();
            }
            if handler {
                tracing::debug!("Removed {name} event handler");
            } else {
                tracing::debug!("Removed {name} attribute carrying a script URL");
            }
            if !removals.attributes.contains(&name) {
                removals.attribute(name);
            } else {
                removals.flag();
            }
            attribute_boundary(caps)
        })
        .into_owned()
}

impl Pass for DangerousAttributes {
    fn name(&self) -> &'static str {
        "dangerous-attributes"
    }

    fn apply(&self, svg: &str, removals: &mut Removals) -> String {
        let out = self.strip_named(svg, removals);
        strip_unlisted(&out, removals)
    }
}
