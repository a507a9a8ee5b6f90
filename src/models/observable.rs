// file: src/models/observable.rs
// description: parsed structured threat-intel document and its observable variants
// reference: cybox object types (URI, EmailMessage, Address, File, DomainName)

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriSubtype {
    Url,
    Domain,
    Other(String),
}

impl UriSubtype {
    pub fn from_label(label: &str) -> Self {
        match label {
            "URL" => UriSubtype::Url,
            "Domain Name" => UriSubtype::Domain,
            other => UriSubtype::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
    Other(String),
}

impl AddressFamily {
    pub fn from_category(category: &str) -> Self {
        match category {
            "ipv4-addr" => AddressFamily::V4,
            "ipv6-addr" => AddressFamily::V6,
            other => AddressFamily::Other(other.to_string()),
        }
    }
}

/// One typed observable. `None` fields contribute nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredObservable {
    Uri {
        subtype: UriSubtype,
        value: Option<String>,
    },
    Email {
        from: Option<String>,
        sender: Option<String>,
    },
    Address {
        family: AddressFamily,
        value: Option<String>,
    },
    File {
        md5: Option<String>,
        sha1: Option<String>,
        sha256: Option<String>,
    },
    Domain {
        value: Option<String>,
    },
    Unsupported {
        kind: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorRecord {
    pub observables: Vec<StructuredObservable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredDocument {
    /// Source name used in log lines and error messages.
    pub source: String,
    pub title: Option<String>,
    pub indicators: Vec<IndicatorRecord>,
}

impl StructuredDocument {
    pub fn observable_count(&self) -> usize {
        self.indicators.iter().map(|i| i.observables.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_subtype_labels() {
        assert_eq!(UriSubtype::from_label("URL"), UriSubtype::Url);
        assert_eq!(UriSubtype::from_label("Domain Name"), UriSubtype::Domain);
        assert_eq!(
            UriSubtype::from_label("General URN"),
            UriSubtype::Other("General URN".to_string())
        );
    }

    #[test]
    fn test_address_family_categories() {
        assert_eq!(AddressFamily::from_category("ipv4-addr"), AddressFamily::V4);
        assert_eq!(AddressFamily::from_category("ipv6-addr"), AddressFamily::V6);
        assert!(matches!(
            AddressFamily::from_category("mac"),
            AddressFamily::Other(_)
        ));
    }
}
