use std::collections::HashSet;

#[derive(Debug, Default, PartialEq)]
pub struct ProxyDirectives {
    pub target_url: Option<String>,
    pub ignore_req_headers: bool,
    pub follow_redirect: bool,
    pub redirect_with_proxy: bool,
    pub append_req_headers: Vec<(String, String)>,
    pub append_res_headers: Vec<(String, String)>,
    pub delete_req_headers: HashSet<String>,
    pub delete_res_headers: HashSet<String>,
}

impl ProxyDirectives {
    // Unknown keys are ignored; duplicate keys resolve last-wins. Malformed
    // header payloads degrade to empty here, not inside the parsers.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> ProxyDirectives {
        let mut directives = ProxyDirectives::default();

        for (key, value) in pairs {
            match key.as_str() {
                "url" => directives.target_url = Some(value.clone()),
                "ignoreReqHeaders" => directives.ignore_req_headers = parse_flag(value),
                "followRedirect" => directives.follow_redirect = parse_flag(value),
                "redirectWithProxy" => directives.redirect_with_proxy = parse_flag(value),
                "appendReqHeaders" => {
                    directives.append_req_headers = parse_header_pairs(value).unwrap_or_default()
                }
                "appendResHeaders" => {
                    directives.append_res_headers = parse_header_pairs(value).unwrap_or_default()
                }
                "deleteReqHeaders" => {
                    directives.delete_req_headers = parse_name_list(value).unwrap_or_default()
                }
                "deleteResHeaders" => {
                    directives.delete_res_headers = parse_name_list(value).unwrap_or_default()
                }
                _ => {}
            }
        }

        directives
    }
}

pub fn parse_flag(value: &str) -> bool {
    value == "true"
}

// `[['cookie', 'abc']]` is accepted as a fallback for clients sending
// single-quoted JSON.
pub fn parse_header_pairs(raw: &str) -> Option<Vec<(String, String)>> {
    serde_json::from_str(raw)
        .ok()
        .or_else(|| serde_json::from_str(&raw.replace('\'', "\"")).ok())
}

pub fn parse_name_list(raw: &str) -> Option<HashSet<String>> {
    let names: Vec<String> = serde_json::from_str(raw)
        .ok()
        .or_else(|| serde_json::from_str(&raw.replace('\'', "\"")).ok())?;

    Some(names.into_iter().map(|name| name.to_lowercase()).collect())
}
