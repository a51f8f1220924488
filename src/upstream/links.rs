//! `Link` response header parsing (RFC 8288)

use regex::Regex;
use std::sync::OnceLock;

static LINK_RE: OnceLock<Regex> = OnceLock::new();

fn link_re() -> &'static Regex {
    LINK_RE.get_or_init(|| {
        Regex::new(r#"<([^>]*)>\s*((?:;\s*[^;,]+)*)"#).expect("static link pattern")
    })
}

/// Pagination relations advertised by the search API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub last: Option<String>,
}

/// Extract `next` and `last` from a `Link` header value.
///
/// Relations other than those two are ignored, as is anything malformed.
pub fn parse_link_header(value: &str) -> PageLinks {
    let mut links = PageLinks::default();

    for caps in link_re().captures_iter(value) {
        let target = caps[1].trim().to_string();
        let rels = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        for param in rels.split(';') {
            let Some((key, val)) = param.split_once('=') else {
                continue;
            };
            if !key.trim().eq_ignore_ascii_case("rel") {
                continue;
            }
            // rel may hold several space-separated relation types
            for rel in val.trim().trim_matches('"').split_whitespace() {
                match rel.to_ascii_lowercase().as_str() {
                    "next" => links.next = Some(target.clone()),
                    "last" => links.last = Some(target.clone()),
                    _ => {}
                }
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_style_header() {
        let header = r#"<https://api.github.com/search/repositories?q=x&page=2>; rel="next", <https://api.github.com/search/repositories?q=x&page=10>; rel="last""#;
        let links = parse_link_header(header);
        assert_eq!(
            links.next.as_deref(),
            Some("https://api.github.com/search/repositories?q=x&page=2")
        );
        assert_eq!(
            links.last.as_deref(),
            Some("https://api.github.com/search/repositories?q=x&page=10")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let header = r#"<https://h/s?page=1>; rel="prev", <https://h/s?page=1>; rel="first""#;
        assert_eq!(parse_link_header(header), PageLinks::default());
    }

    #[test]
    fn test_unquoted_and_multi_rel() {
        let links = parse_link_header("<https://h/s?page=3>; rel=next, <https://h/s?page=3>; title=\"x\"; rel=\"last next\"");
        assert_eq!(links.next.as_deref(), Some("https://h/s?page=3"));
        assert_eq!(links.last.as_deref(), Some("https://h/s?page=3"));
    }

    #[test]
    fn test_garbage_is_empty() {
        assert_eq!(parse_link_header(""), PageLinks::default());
        assert_eq!(parse_link_header("not a link header"), PageLinks::default());
    }
}
