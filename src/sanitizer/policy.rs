//! Immutable policy tables consulted by the sanitizer passes.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::compile;

/// Elements removed together with their content.
///
/// `style` is absent: `<style>` blocks are filtered rule by rule instead.
pub const DANGEROUS_TAGS: &[&str] = &[
    "script", "object", "embed", "applet", "iframe", "frame", "frameset", "audio", "video",
    "source", "track", "base", "link", "meta",
];

/// Attributes stripped from every element, whatever their value.
///
/// Namespaced names precede their bare counterparts so that `xlink:href` is
/// reported as such rather than as `href`.
pub const DANGEROUS_ATTRIBUTES: &[&str] = &[
    // Window and document
    "onabort", "onafterprint", "onbeforeprint", "onbeforeunload", "onerror", "onhashchange",
    "onload", "onmessage", "onoffline", "ononline", "onpagehide", "onpageshow", "onpopstate",
    "onresize", "onstorage", "onunload", "onscroll",
    // Forms
    "onblur", "onchange", "onfocus", "onfocusin", "onfocusout", "oninput", "oninvalid",
    "onreset", "onsearch", "onselect", "onsubmit",
    // Keyboard
    "onkeydown", "onkeypress", "onkeyup",
    // Mouse and pointer
    "onclick", "ondblclick", "onmousedown", "onmousemove", "onmouseout", "onmouseover",
    "onmouseup", "onmouseenter", "onmouseleave", "onmousewheel", "onwheel", "oncontextmenu",
    "onpointerdown", "onpointerup", "onpointermove", "onpointerover", "onpointerout",
    "onpointerenter", "onpointerleave", "onpointercancel",
    // Touch
    "ontouchstart", "ontouchmove", "ontouchend", "ontouchcancel",
    // Drag and drop
    "ondrag", "ondragend", "ondragenter", "ondragleave", "ondragover", "ondragstart", "ondrop",
    // Clipboard
    "oncopy", "oncut", "onpaste",
    // Media
    "oncanplay", "oncanplaythrough", "oncuechange", "ondurationchange", "onemptied", "onended",
    "onloadeddata", "onloadedmetadata", "onloadstart", "onpause", "onplay", "onplaying",
    "onprogress", "onratechange", "onseeked", "onseeking", "onstalled", "onsuspend",
    "ontimeupdate", "onvolumechange", "onwaiting",
    // Animation and transitions
    "onanimationstart", "onanimationend", "onanimationiteration", "ontransitionend",
    // SVG specific
    "onbegin", "onend", "onrepeat", "onactivate", "onzoom", "onshow", "ontoggle",
    // Resource references
    "xlink:href", "href", "data", "formaction", "action", "src", "background", "poster",
];

/// Attributes considered safe for SVG content.
///
/// Advisory only: filtering is driven by [`DANGEROUS_ATTRIBUTES`] and the
/// `style` handling, this list is not enforced.
pub const SAFE_ATTRIBUTES: &[&str] = &[
    // Core and geometry
    "id", "class", "x", "y", "x1", "y1", "x2", "y2", "cx", "cy", "r", "rx", "ry", "width",
    "height", "d", "points", "viewbox", "preserveaspectratio", "transform", "version",
    "xmlns", "xmlns:xlink", "xml:space", "fx", "fy", "offset", "pathlength",
    // Presentation
    "fill", "fill-opacity", "fill-rule", "stroke", "stroke-width", "stroke-opacity",
    "stroke-linecap", "stroke-linejoin", "stroke-dasharray", "stroke-dashoffset",
    "stroke-miterlimit", "opacity", "color", "stop-color", "stop-opacity", "clip-path",
    "clip-rule", "mask", "filter", "visibility", "display",
    // Text
    "font-family", "font-size", "font-weight", "font-style", "text-anchor",
    "dominant-baseline", "letter-spacing", "word-spacing", "dx", "dy", "rotate",
    // Gradients, patterns, filters
    "gradientunits", "gradienttransform", "spreadmethod", "patternunits",
    "patterntransform", "patterncontentunits", "clippathunits", "maskunits",
    "maskcontentunits", "filterunits", "primitiveunits", "stddeviation", "in", "in2",
    "result", "mode", "operator", "values", "type",
    // Animation
    "attributename", "begin", "dur", "end", "from", "to", "by", "repeatcount", "keytimes",
    "keysplines", "calcmode",
    // Accessibility
    "role", "aria-label", "aria-labelledby", "aria-describedby", "aria-hidden", "lang",
    "style",
];

/// CSS properties allowed in `<style>` rules and `style=""` attributes.
pub const SAFE_CSS_PROPERTIES: &[&str] = &[
    "fill", "fill-opacity", "fill-rule", "stroke", "stroke-width", "stroke-opacity",
    "stroke-linecap", "stroke-linejoin", "stroke-dasharray", "stroke-dashoffset",
    "stroke-miterlimit", "opacity", "color", "stop-color", "stop-opacity", "font-family",
    "font-size", "font-weight", "font-style", "font-variant", "font-stretch", "text-anchor",
    "text-decoration", "dominant-baseline", "alignment-baseline", "baseline-shift",
    "letter-spacing", "word-spacing", "filter", "flood-color", "flood-opacity",
    "lighting-color", "clip-path", "clip-rule", "mask", "marker", "marker-start",
    "marker-mid", "marker-end", "paint-order", "vector-effect", "shape-rendering",
    "text-rendering", "color-interpolation", "color-interpolation-filters", "visibility",
];

/// URL schemes that can execute script or reach outside the document.
pub const DANGEROUS_URL_SCHEMES: &[&str] =
    &["javascript:", "data:", "vbscript:", "file:", "ftp:", "jar:"];

static CHAR_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)&#(?:x([0-9a-f]+)|([0-9]+));?"));

/// Returns `true` if `url` uses one of the [`DANGEROUS_URL_SCHEMES`].
///
/// Whitespace and control characters are ignored and numeric character
/// references are decoded first, mirroring how browsers read the scheme.
///
/// ```
/// use svg_sanitizer::is_dangerous_url;
///
/// assert!(is_dangerous_url("JavaScript:alert(1)"));
/// assert!(is_dangerous_url(" data:image/svg+xml;base64,AAAA"));
/// assert!(!is_dangerous_url("#gradient"));
/// assert!(!is_dangerous_url("https://example.com/logo.svg"));
/// ```
pub fn is_dangerous_url(url: &str) -> bool {
    let normalized = normalize_url(url);
    DANGEROUS_URL_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

/// Like [`is_dangerous_url`], but also matches script schemes that appear
/// anywhere in the value, as in animation value lists (`values="0;javascript:..."`).
pub(crate) fn contains_dangerous_url(value: &str) -> bool {
    let normalized = normalize_url(value);
    is_dangerous_url(&normalized)
        || normalized.contains("javascript:")
        || normalized.contains("vbscript:")
}

/// Any `on<letters>` attribute, listed in [`DANGEROUS_ATTRIBUTES`] or not.
pub(crate) fn is_event_handler(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.strip_prefix("on")
        .is_some_and(|event| !event.is_empty() && event.bytes().all(|b| b.is_ascii_alphabetic()))
}

pub(crate) fn is_safe_css_property(property: &str) -> bool {
    let property = property.trim().to_ascii_lowercase();
    SAFE_CSS_PROPERTIES.contains(&property.as_str())
}

fn normalize_url(url: &str) -> String {
    let decoded = CHAR_REFERENCE.replace_all(url, |caps: &Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    decoded
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase()
}
