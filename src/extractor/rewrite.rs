use crate::config::LayoutConfig;
use crate::extractor::fragment::{self, FragmentKind};

pub const HEAD_CLOSE: &str = "</head>";
pub const BODY_CLOSE: &str = "</body>";

/// In-memory result of separating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub original: String,
    pub rewritten: String,
    pub stylesheet: Option<String>,
    pub script: Option<String>,
    /// The document already linked the stylesheet outside any extracted block.
    pub stylesheet_linked: bool,
    /// The document already loaded the script outside any extracted block.
    pub script_linked: bool,
}

/// Closing marker that a rewrite needed but could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingMarker(pub &'static str);

pub fn stylesheet_reference(href: &str) -> String {
    format!("    <link rel=\"stylesheet\" href=\"{}\">\n", href)
}

pub fn script_reference(src: &str) -> String {
    format!("    <script src=\"{}\"></script>\n", src)
}

pub fn references_stylesheet(html: &str, href: &str) -> bool {
    html.contains(&format!("href=\"{}\"", href))
}

pub fn references_script(html: &str, src: &str) -> bool {
    html.contains(&format!("src=\"{}\"", src))
}

/// Separate the inline style and script blocks of `html`.
///
/// Returns `Ok(None)` when there is nothing to extract. The rewritten text has
/// the extracted blocks removed and one reference per extracted kind inserted.
pub fn plan(html: &str, layout: &LayoutConfig) -> Result<Option<Rewrite>, MissingMarker> {
    let stylesheet = fragment::extract(html, FragmentKind::Style);
    let script = fragment::extract(html, FragmentKind::Script);

    if stylesheet.is_none() && script.is_none() {
        return Ok(None);
    }

    let mut rewritten = html.to_string();

    if stylesheet.is_some() {
        rewritten = fragment::strip(&rewritten, FragmentKind::Style);
    }
    if script.is_some() {
        rewritten = fragment::strip(&rewritten, FragmentKind::Script);
    }

    // A reference text inside a stripped block does not count.
    let stylesheet_linked = references_stylesheet(&rewritten, &layout.stylesheet);
    let script_linked = references_script(&rewritten, &layout.script);

    if stylesheet.is_some() && !stylesheet_linked {
        let at = find_ignore_case(&rewritten, HEAD_CLOSE, false)
            .ok_or(MissingMarker(HEAD_CLOSE))?;
        rewritten.insert_str(at, &stylesheet_reference(&layout.stylesheet));
    }
    if script.is_some() && !script_linked {
        let at = find_ignore_case(&rewritten, BODY_CLOSE, true)
            .ok_or(MissingMarker(BODY_CLOSE))?;
        rewritten.insert_str(at, &script_reference(&layout.script));
    }

    Ok(Some(Rewrite {
        original: html.to_string(),
        rewritten,
        stylesheet,
        script,
        stylesheet_linked,
        script_linked,
    }))
}

// Markers are ASCII, so byte offsets found in the lowercased copy are valid in
// the original.
fn find_ignore_case(haystack: &str, needle: &str, last: bool) -> Option<usize> {
    let lowered = haystack.to_ascii_lowercase();
    if last {
        lowered.rfind(needle)
    } else {
        lowered.find(needle)
    }
}
