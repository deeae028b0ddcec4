//! SVG sanitization engine.
//!
//! Untrusted SVG markup is rewritten by a fixed sequence of regex-based
//! passes. Each pass operates on the output of the previous one:
//!
//! 1. Dangerous elements (`script`, `iframe`, `object`, ...) with their content.
//! 2. Dangerous attributes (`on*` handlers, `href`, `src`, ...) and attributes
//!    carrying script URLs.
//! 3. `<style>` blocks, reduced to rules whose properties are all allow-listed.
//! 4. `style="..."` attributes, reduced to allow-listed declarations.
//! 5. `<!DOCTYPE ...>` and `<?xml ... ?>` preambles.
//! 6. `<![CDATA[ ... ]]>` sections.
//! 7. Comments mentioning `script`.
//!
//! The sequence is repeated until a round leaves the markup unchanged, then
//! the result must still contain an `<svg ...>` / `</svg>` envelope.
//!
//! Matching is textual rather than a DOM parse so that malformed input is
//! tolerated. Attributes split across malformed or nested tags are not
//! guaranteed to be caught.

mod attributes;
mod css;
mod markup;
pub mod policy;
mod tags;

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SvgError};

pub use css::is_dangerous_css;
pub use policy::is_dangerous_url;

/// Marker recorded when a `<style>` block or `style` attribute is dropped.
pub const STYLE_REMOVED: &str = "style (dangerous content)";

/// Outcome of a successful sanitization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SanitizeResult {
    /// The cleaned markup.
    pub sanitized_svg: String,
    /// `true` if any dangerous content was removed.
    pub has_removed_dangerous_content: bool,
    /// Names of removed elements or constructs, in removal order.
    pub removed_elements: Vec<String>,
    /// Names of removed attributes, in removal order.
    pub removed_attributes: Vec<String>,
}

/// Removal log shared by the passes of a single sanitization.
#[derive(Debug, Default)]
pub(crate) struct Removals {
    dangerous: bool,
    elements: Vec<String>,
    attributes: Vec<String>,
}

impl Removals {
    pub(crate) fn element(&mut self, name: impl Into<String>) {
        self.dangerous = true;
        self.elements.push(name.into());
    }

    pub(crate) fn attribute(&mut self, name: impl Into<String>) {
        self.dangerous = true;
        self.attributes.push(name.into());
    }

    /// Flag a removal that has no name of its own (a dropped CSS rule, a comment).
    pub(crate) fn flag(&mut self) {
        self.dangerous = true;
    }
}

/// A single rewrite over the whole document.
pub(crate) trait Pass: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, svg: &str, removals: &mut Removals) -> String;
}

/// The ordered pass pipeline.
///
/// Use [`sanitize_svg`] for the shared process-wide instance.
pub struct SvgSanitizer {
    passes: Vec<Box<dyn Pass>>,
}

impl SvgSanitizer {
    /// Build the pipeline, compiling every pattern from the [`policy`] tables.
    pub fn new() -> Self {
        let passes: Vec<Box<dyn Pass>> = vec![
            Box::new(tags::DangerousTags::new()),
            Box::new(attributes::DangerousAttributes::new()),
            Box::new(css::StyleTags),
            Box::new(css::StyleAttributes),
            Box::new(markup::Doctype),
            Box::new(markup::XmlDeclaration),
            Box::new(markup::Cdata),
            Box::new(markup::ScriptComments),
        ];
        Self { passes }
    }

    /// Sanitize `svg`, returning the cleaned markup and a removal report.
    ///
    /// Fails with [`SvgError::Sanitize`] if the result has no `<svg` opening
    /// or `</svg>` closing tag.
    pub fn sanitize(&self, svg: &str) -> Result<SanitizeResult> {
        let mut removals = Removals::default();
        let mut current = svg.to_string();

        // Every round that changes the markup either removes bytes or puts CSS
        // into its normalized form, so this terminates.
        for round in 0usize.. {
            let next = self
                .passes
                .iter()
                .fold(current.clone(), |acc, pass| {
                    let out = pass.apply(&acc, &mut removals);
                    if out != acc {
                        tracing::debug!("Pass {} rewrote markup in round {round}", pass.name());
                    }
                    out
                });
            let settled = next == current;
            current = next;
            if settled {
                break;
            }
        }

        let sanitized = current.trim();
        if !has_svg_envelope(sanitized) {
            tracing::warn!("Rejected SVG without <svg>...</svg> envelope after sanitization");
            return Err(SvgError::Sanitize(
                "invalid SVG structure: missing <svg> or </svg> tag".to_string(),
            ));
        }

        Ok(SanitizeResult {
            sanitized_svg: sanitized.to_string(),
            has_removed_dangerous_content: removals.dangerous,
            removed_elements: removals.elements,
            removed_attributes: removals.attributes,
        })
    }
}

impl Default for SvgSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

static SANITIZER: LazyLock<SvgSanitizer> = LazyLock::new(SvgSanitizer::new);

/// Sanitize untrusted SVG markup with the shared [`SvgSanitizer`].
///
/// ```
/// use svg_sanitizer::sanitize_svg;
///
/// let result = sanitize_svg(r#"<svg><script>alert(1)</script><circle fill="red"/></svg>"#).unwrap();
/// assert_eq!(result.sanitized_svg, r#"<svg><circle fill="red"/></svg>"#);
/// assert!(result.has_removed_dangerous_content);
/// assert_eq!(result.removed_elements, vec!["script"]);
/// ```
pub fn sanitize_svg(svg: &str) -> Result<SanitizeResult> {
    SANITIZER.sanitize(svg)
}

fn has_svg_envelope(svg: &str) -> bool {
    let lower = svg.to_lowercase();
    lower.contains("<svg") && lower.contains("</svg>")
}

/// Compile a pattern derived from the static policy tables.
///
/// # Panics
///
/// Panics if the pattern is invalid, which indicates a bug in the tables.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid sanitizer pattern {pattern:?}: {e}"))
}

/// Replacement for a removed attribute match: keep the delimiter that
/// preceded it unless it was whitespace.
pub(crate) fn attribute_boundary(caps: &regex::Captures) -> String {
    caps.name("pre")
        .map(|m| m.as_str())
        .filter(|pre| !pre.trim().is_empty())
        .unwrap_or_default()
        .to_string()
}
