//! Search URL construction

use std::collections::BTreeMap;
use url::form_urlencoded::byte_serialize;
use url::Url;

use crate::config::ParamValue;
use crate::{Error, Result};

fn encode(component: &str) -> String {
    byte_serialize(component.as_bytes()).collect()
}

/// Build the first-page search URL from a base URL and query parameters.
///
/// Scalars become `key=value`. Lists become `key=v1+v2+...`, each element
/// form-encoded on its own so the joining `+` survives as a separator.
pub fn build_search_url(base: &str, params: &BTreeMap<String, ParamValue>) -> Result<String> {
    let parsed = Url::parse(base)
        .map_err(|e| Error::InvalidConfig(format!("search_url {base:?}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidConfig(format!(
            "search_url must be http or https, got {}",
            parsed.scheme()
        )));
    }
    if parsed.fragment().is_some() {
        return Err(Error::InvalidConfig(format!(
            "search_url {base:?} has a fragment; query parameters would end up inside it"
        )));
    }

    let pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                ParamValue::Integer(n) => n.to_string(),
                ParamValue::Boolean(b) => b.to_string(),
                ParamValue::Text(s) => encode(s),
                ParamValue::List(items) => items.iter().map(|s| encode(s)).collect::<Vec<_>>().join("+"),
            };
            format!("{}={}", encode(key), rendered)
        })
        .collect();

    if pairs.is_empty() {
        return Ok(base.to_string());
    }

    let separator = match parsed.query() {
        Some(q) if !q.is_empty() => "&",
        Some(_) => "",
        None => "?",
    };
    Ok(format!("{base}{separator}{}", pairs.join("&")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_default_parameters() {
        let config = AppConfig::default();
        let url = build_search_url(&config.search_url, &config.search_parameters).unwrap();
        assert_eq!(
            url,
            "https://api.github.com/search/repositories?order=desc&per_page=100&q=is%3Apublic+language%3Apython&sort=stars"
        );
    }

    #[test]
    fn test_list_elements_encoded_separately() {
        let mut params = BTreeMap::new();
        params.insert(
            "q".to_string(),
            ParamValue::List(vec!["topic:web dev".to_string(), "a+b".to_string()]),
        );
        let url = build_search_url("http://localhost/search", &params).unwrap();
        assert_eq!(url, "http://localhost/search?q=topic%3Aweb+dev+a%2Bb");
    }

    #[test]
    fn test_base_with_existing_query() {
        let mut params = BTreeMap::new();
        params.insert("page".to_string(), ParamValue::Integer(2));
        let url = build_search_url("http://localhost/search?x=1", &params).unwrap();
        assert_eq!(url, "http://localhost/search?x=1&page=2");
    }

    #[test]
    fn test_no_params() {
        let url = build_search_url("http://localhost/search", &BTreeMap::new()).unwrap();
        assert_eq!(url, "http://localhost/search");
    }

    #[test]
    fn test_invalid_base() {
        let err = build_search_url("not a url", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = build_search_url("ftp://example.com/x", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_fragment_in_base_rejected() {
        let config = AppConfig::default();
        let err = build_search_url(
            "https://api.github.com/search/repositories#top",
            &config.search_parameters,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("fragment")));

        let err = build_search_url("http://localhost/search?x=1#", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
