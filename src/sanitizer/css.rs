//! CSS filtering for `<style>` blocks and `style` attributes.
//!
//! Both use the same two checks: any match of a dangerous pattern drops the
//! whole block or attribute, otherwise only allow-listed properties survive.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::policy::is_safe_css_property;
use super::{Pass, Removals, STYLE_REMOVED, attribute_boundary, compile};

static DANGEROUS_CSS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)javascript\s*:",
        r"(?i)vbscript\s*:",
        r"(?i)data\s*:",
        r"(?i)expression\s*\(",
        r"(?i)behavior\s*:",
        r"(?i)@import",
        r"(?i)binding",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

static CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)url\s*\(\s*['"]?\s*(?P<target>[^)'"\s]*)"#));

static CSS_COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)/\*.*?\*/"));

/// `\75 ` (hex, with one optional trailing space) or `\u` (literal).
static CSS_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\\(?:(?P<hex>[0-9a-f]{1,6})\s?|(?P<literal>[^\n0-9a-f]))"));

static CDATA_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"<!\[CDATA\[|\]\]>"));

static CSS_RULE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?P<selector>[^{}]+)\{(?P<body>[^{}]*)\}"));

static STYLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?is)(?P<open><style(?:\s[^>]*)?>)(?P<css>.*?)</style(?:\s[^>]*)?>")
});

static STYLE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r#"(?i)(?P<pre>^|[^\w.-])(?P<ws>\s*)style(?:\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')|=(?P<bare>[^\s"'<>=`/]+))"#,
    )
});

fn unescape(css: &str) -> Cow<'_, str> {
    CSS_ESCAPE.replace_all(css, |caps: &Captures| match caps.name("hex") {
        Some(hex) => u32::from_str_radix(hex.as_str(), 16)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
            .to_string(),
        None => caps["literal"].to_string(),
    })
}

/// Returns `true` if `css` contains script URLs, IE expressions or behaviors,
/// `@import`, bindings, `data:` payloads, or a `url(...)` that does not point
/// at a fragment in the same document. Comments and escapes are resolved
/// first, so `java/**/script:` and `\75 rl(` are caught.
///
/// ```
/// use svg_sanitizer::is_dangerous_css;
///
/// assert!(is_dangerous_css(".a{fill:red;behavior:url(#x);}"));
/// assert!(is_dangerous_css("fill: url(https://tracker.example/p.png)"));
/// assert!(!is_dangerous_css("fill: url(#gradient)"));
/// ```
pub fn is_dangerous_css(css: &str) -> bool {
    let stripped = CSS_COMMENT.replace_all(css, "");
    let unescaped = unescape(&stripped);
    [css, &*stripped, &*unescaped].into_iter().any(|text| {
        DANGEROUS_CSS.iter().any(|re| re.is_match(text))
            || CSS_URL
                .captures_iter(text)
                .any(|caps| !caps["target"].starts_with('#'))
    })
}

/// Allow-listed declarations of a block, and whether any were dropped.
struct Declarations {
    kept: Vec<(String, String)>,
    dropped: bool,
}

fn filter_declarations(block: &str) -> Declarations {
    let mut kept = Vec::new();
    let mut dropped = false;

    for declaration in block.split(';').map(str::trim).filter(|d| !d.is_empty()) {
        match declaration.split_once(':') {
            Some((property, value))
                if is_safe_css_property(property) && !value.trim().is_empty() =>
            {
                kept.push((property.trim().to_string(), value.trim().to_string()));
            }
            _ => dropped = true,
        }
    }

    Declarations { kept, dropped }
}

/// Rebuild a stylesheet from the rules whose declarations are all safe.
///
/// Returns the new stylesheet (empty if nothing survived) and whether any
/// rule was dropped.
fn filter_stylesheet(css: &str) -> (String, bool) {
    let css = CDATA_MARKER.replace_all(css, "");
    let css = CSS_COMMENT.replace_all(&css, "");

    let mut rules = Vec::new();
    let mut dropped = false;

    for caps in CSS_RULE.captures_iter(&css) {
        let selector = caps["selector"].trim();
        let declarations = filter_declarations(&caps["body"]);

        if selector.starts_with('@') || selector.contains('<') || declarations.dropped {
            dropped = true;
            continue;
        }
        if selector.is_empty() || declarations.kept.is_empty() {
            continue;
        }

        let body = declarations
            .kept
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");
        rules.push(format!("{selector} {{ {body} }}"));
    }

    (rules.join(" "), dropped)
}

/// Filters the contents of `<style>` blocks rule by rule.
pub(crate) struct StyleTags;

impl Pass for StyleTags {
    fn name(&self) -> &'static str {
        "style-tags"
    }

    fn apply(&self, svg: &str, removals: &mut Removals) -> String {
        STYLE_TAG
            .replace_all(svg, |caps: &Captures| {
                let raw = &caps["css"];
                let (css, dropped) = if is_dangerous_css(raw) {
                    (String::new(), true)
                } else {
                    filter_stylesheet(raw)
                };

                if css.is_empty() {
                    tracing::debug!("Removed <style> block with no safe rules");
                    removals.element(STYLE_REMOVED);
                    return String::new();
                }
                if dropped {
                    tracing::debug!("Dropped unsafe rules from <style> block");
                    removals.flag();
                }
                format!("{}{css}</style>", &caps["open"])
            })
            .into_owned()
    }
}

/// Filters `style="..."` attributes declaration by declaration.
pub(crate) struct StyleAttributes;

impl Pass for StyleAttributes {
    fn name(&self) -> &'static str {
        "style-attributes"
    }

    fn apply(&self, svg: &str, removals: &mut Removals) -> String {
        STYLE_ATTRIBUTE
            .replace_all(svg, |caps: &Captures| {
                let (value, quote) = match (caps.name("dq"), caps.name("sq"), caps.name("bare")) {
                    (Some(m), _, _) => (m.as_str(), '"'),
                    (_, Some(m), _) => (m.as_str(), '\''),
                    (_, _, Some(m)) => (m.as_str(), '"'),
                    _ => ("", '"'),
                };

                let declarations = if is_dangerous_css(value) {
                    Declarations { kept: Vec::new(), dropped: true }
                } else {
                    filter_declarations(value)
                };

                if declarations.kept.is_empty() {
                    tracing::debug!("Removed style attribute with no safe declarations");
                    removals.attribute(STYLE_REMOVED);
                    return attribute_boundary(caps);
                }
                if declarations.dropped {
                    tracing::debug!("Dropped unsafe declarations from style attribute");
                    removals.flag();
                }

                let css = declarations
                    .kept
                    .iter()
                    .map(|(property, value)| format!("{property}: {value}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("{}{}style={quote}{css}{quote}", &caps["pre"], &caps["ws"])
            })
            .into_owned()
    }
}
