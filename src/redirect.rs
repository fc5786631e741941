use percent_encoding::{percent_decode, percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Escape set matching encodeURIComponent: alphanumerics and - _ . ! ~ * ' ( )
// pass through untouched.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(value: &str) -> String {
    percent_encode(value.as_bytes(), COMPONENT).to_string()
}

pub fn decode_component(value: &str) -> String {
    percent_decode(value.as_bytes()).decode_utf8_lossy().into_owned()
}

pub fn serialize_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<String>>()
        .join("&")
}

// Upstream `Location` passes through verbatim unless the caller asked for the
// loop-back form, which re-enters the relay at `proxy_path` carrying the
// upstream target plus every original query pair.
pub fn resolve_location(
    upstream_location: &str,
    redirect_with_proxy: bool,
    proxy_path: &str,
    original_query: &[(String, String)],
) -> String {
    if !redirect_with_proxy {
        return upstream_location.to_string();
    }

    let mut target = format!("{}?url={}", proxy_path, encode_component(upstream_location));
    let serialized = serialize_query(original_query);

    if !serialized.is_empty() {
        target.push('&');
        target.push_str(&serialized);
    }

    target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn component_encoding_matches_encode_uri_component() {
        assert_eq!(encode_component("https://foo"), "https%3A%2F%2Ffoo");
        assert_eq!(encode_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_component("keep-_.!~*'()"), "keep-_.!~*'()");
    }

    #[test]
    fn decode_reverses_encode() {
        assert_eq!(decode_component("https%3A%2F%2Ffoo"), "https://foo");
        assert_eq!(decode_component("plain"), "plain");
    }

    #[test]
    fn serialize_query_encodes_both_sides() {
        let query = pairs(&[("url", "https://a/b"), ("followRedirect", "true")]);

        assert_eq!(
            serialize_query(&query),
            "url=https%3A%2F%2Fa%2Fb&followRedirect=true"
        );
    }

    #[test]
    fn location_passes_through_by_default() {
        let resolved = resolve_location("https://foo", false, "/", &[]);

        assert_eq!(resolved, "https://foo");
    }

    #[test]
    fn location_rewrites_through_the_relay() {
        let query = pairs(&[("url", "https://bar"), ("redirectWithProxy", "true")]);

        let resolved = resolve_location("https://foo", true, "/", &query);

        assert_eq!(
            resolved,
            "/?url=https%3A%2F%2Ffoo&url=https%3A%2F%2Fbar&redirectWithProxy=true"
        );
    }

    #[test]
    fn rewrite_honors_the_configured_path() {
        let resolved = resolve_location("https://foo", true, "/proxy", &[]);

        assert_eq!(resolved, "/proxy?url=https%3A%2F%2Ffoo");
    }
}
