use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static STYLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>(.*?)</style\s*>").unwrap());
static SCRIPT_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").unwrap());
static SRC_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s)src\s*=").unwrap());

/// Separator placed between fragments of the same kind in an asset file.
pub const FRAGMENT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    Style,
    Script,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Style => write!(f, "style"),
            FragmentKind::Script => write!(f, "script"),
        }
    }
}

/// A style or script block found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub body: String,
    /// The opening tag carries a `src` attribute.
    pub external: bool,
}

impl Fragment {
    /// Whether this block holds code that belongs in an asset file.
    pub fn is_extractable(&self) -> bool {
        match self.kind {
            FragmentKind::Style => true,
            FragmentKind::Script => !self.external && !self.body.trim().is_empty(),
        }
    }
}

/// All blocks of `kind` in document order.
pub fn scan(html: &str, kind: FragmentKind) -> Vec<Fragment> {
    match kind {
        FragmentKind::Style => STYLE_BLOCK_RE
            .captures_iter(html)
            .map(|caps| Fragment {
                kind,
                body: caps[1].to_string(),
                external: false,
            })
            .collect(),
        FragmentKind::Script => SCRIPT_BLOCK_RE
            .captures_iter(html)
            .map(|caps| Fragment {
                kind,
                body: caps[2].to_string(),
                external: has_src_attribute(&caps[1]),
            })
            .collect(),
    }
}

/// Joined body of every extractable block of `kind`, trimmed.
///
/// Returns `None` when nothing but whitespace would be extracted.
pub fn extract(html: &str, kind: FragmentKind) -> Option<String> {
    let bodies: Vec<String> = scan(html, kind)
        .into_iter()
        .filter(Fragment::is_extractable)
        .map(|fragment| fragment.body)
        .collect();

    let joined = bodies.join(FRAGMENT_SEPARATOR);
    let trimmed = joined.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Remove every block of `kind` that extraction covers.
///
/// Style blocks are removed wholesale. Script blocks are removed unless the
/// opening tag carries a `src` attribute.
pub fn strip(html: &str, kind: FragmentKind) -> String {
    match kind {
        FragmentKind::Style => STYLE_BLOCK_RE.replace_all(html, "").into_owned(),
        FragmentKind::Script => SCRIPT_BLOCK_RE
            .replace_all(html, |caps: &Captures| {
                if has_src_attribute(&caps[1]) {
                    caps[0].to_string()
                } else {
                    String::new()
                }
            })
            .into_owned(),
    }
}

/// Whether any block of `kind` with inline code is still present.
pub fn has_inline(html: &str, kind: FragmentKind) -> bool {
    scan(html, kind).iter().any(|fragment| match kind {
        FragmentKind::Style => true,
        FragmentKind::Script => fragment.is_extractable(),
    })
}

fn has_src_attribute(attributes: &str) -> bool {
    SRC_ATTR_RE.is_match(attributes)
}
