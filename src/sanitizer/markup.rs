//! Removal of XML constructs around and between elements: DOCTYPE
//! declarations, XML declarations, CDATA sections and script comments.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{Pass, Removals, compile};

/// DOCTYPE including an internal subset, which may itself contain `>`.
static DOCTYPE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)<!DOCTYPE(?:[^>\[]|\[.*?\])*>"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<!ENTITY[^>]*>"));

static XML_DECLARATION: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<\?xml.*?\?>"));

static CDATA: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<!\[CDATA\[.*?\]\]>"));

static COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<!--(?P<text>.*?)-->"));

/// Strips `<!DOCTYPE ...>` and stray `<!ENTITY ...>` declarations so no
/// external or recursive entity can be resolved. Not reported as a removal.
pub(crate) struct Doctype;

impl Pass for Doctype {
    fn name(&self) -> &'static str {
        "doctype"
    }

    fn apply(&self, svg: &str, _removals: &mut Removals) -> String {
        let out = DOCTYPE.replace_all(svg, "");
        ENTITY.replace_all(&out, "").into_owned()
    }
}

/// Strips `<?xml ... ?>` declarations and `<?xml-stylesheet ... ?>`
/// instructions. Not reported as a removal.
pub(crate) struct XmlDeclaration;

impl Pass for XmlDeclaration {
    fn name(&self) -> &'static str {
        "xml-declaration"
    }

    fn apply(&self, svg: &str, _removals: &mut Removals) -> String {
        XML_DECLARATION.replace_all(svg, "").into_owned()
    }
}

/// Strips CDATA sections.
pub(crate) struct Cdata;

impl Pass for Cdata {
    fn name(&self) -> &'static str {
        "cdata"
    }

    fn apply(&self, svg: &str, removals: &mut Removals) -> String {
        if !CDATA.is_match(svg) {
            return svg.to_string();
        }
        tracing::debug!("Removed CDATA sections");
        removals.element("CDATA");
        CDATA.replace_all(svg, "").into_owned()
    }
}

/// Drops comments mentioning `script` (which covers `javascript`), keeping
/// all others verbatim.
pub(crate) struct ScriptComments;

impl Pass for ScriptComments {
    fn name(&self) -> &'static str {
        "script-comments"
    }

    fn apply(&self, svg: &str, removals: &mut Removals) -> String {
        COMMENT
            .replace_all(svg, |caps: &Captures| {
                if caps["text"].to_lowercase().contains("script") {
                    tracing::debug!("Removed comment mentioning script");
                    removals.flag();
                    String::new()
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    }
}
