//! Minimal HTML text helpers.
//!
//! The indexer only needs two things from page HTML: the plain text (for
//! snippets) and the heading texts (as extra searchable fields). Both are
//! regex-level operations on tag boundaries; full HTML parsing is
//! deliberately avoided.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// One pattern per heading level the indexer extracts (h1-h3).
static HEADING_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [1u8, 2, 3].map(|level| {
        Regex::new(&format!("(?s)<h{level}[^>]*>(.*?)</h{level}>")).unwrap()
    })
});

/// Strip tags, leaving the text content.
pub(crate) fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Plain text of every `<hN>` element at the given level (1-3), with the
/// trailing pilcrow ("¶") permalink decoration removed.
pub(crate) fn heading_texts(html: &str, level: u8) -> Vec<String> {
    let re = &HEADING_RES[usize::from(level) - 1];
    re.captures_iter(html)
        .map(|captures| {
            strip_tags(captures.get(1).map_or("", |m| m.as_str()))
                .replace('¶', "")
                .trim()
                .to_owned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_tags_removes_markup() {
        assert_eq!(
            strip_tags("<p>Use <b>--build missing</b> to rebuild</p>"),
            "Use --build missing to rebuild"
        );
    }

    #[test]
    fn strip_tags_keeps_plain_text_untouched() {
        assert_eq!(strip_tags("no markup here"), "no markup here");
    }

    #[test]
    fn heading_texts_extracts_level_and_strips_pilcrow() {
        let html = "<h1>Install<a class=\"headerlink\">¶</a></h1>\
                    <h2 id=\"a\">From source¶</h2><h2>Binaries</h2>";
        assert_eq!(heading_texts(html, 1), vec!["Install"]);
        assert_eq!(heading_texts(html, 2), vec!["From source", "Binaries"]);
        assert!(heading_texts(html, 3).is_empty());
    }
}
