pub struct AccessGate {
    allowed_domains: Vec<String>,
}

impl AccessGate {
    // An unset or empty list disables the gate entirely.
    pub fn from_domain_list(list: Option<&str>) -> AccessGate {
        let allowed_domains = list
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|domain| !domain.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        AccessGate { allowed_domains }
    }

    pub fn is_open(&self) -> bool {
        self.allowed_domains.is_empty()
    }

    pub fn allows(&self, referer: Option<&str>) -> bool {
        if self.allowed_domains.is_empty() {
            return true;
        }

        match referer {
            Some(referer) => self
                .allowed_domains
                .iter()
                .any(|domain| referer.contains(domain.as_str())),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_gate_allows_everything() {
        let gate = AccessGate::from_domain_list(None);

        assert!(gate.is_open());
        assert!(gate.allows(None));
        assert!(gate.allows(Some("http://evil.com")));
    }

    #[test]
    fn empty_list_counts_as_unconfigured() {
        let gate = AccessGate::from_domain_list(Some(" , ,"));

        assert!(gate.is_open());
        assert!(gate.allows(None));
    }

    #[test]
    fn matching_referer_is_allowed() {
        let gate = AccessGate::from_domain_list(Some("example.com,other.org"));

        assert!(gate.allows(Some("https://example.com/page")));
        assert!(gate.allows(Some("https://sub.other.org/")));
    }

    #[test]
    fn missing_or_foreign_referer_is_rejected() {
        let gate = AccessGate::from_domain_list(Some("example.com"));

        assert!(!gate.is_open());
        assert!(!gate.allows(None));
        assert!(!gate.allows(Some("http://evil.com")));
    }
}
