// file: src/models/indicator.rs
// description: canonical indicator taxonomy and classified entries
// reference: stix/cybox observable types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical indicator categories. Declaration order is the classification
/// priority order used for freeform lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorType {
    Md5,
    Sha1,
    Sha256,
    Ipv4,
    Ipv6,
    Email,
    Url,
    Domain,
}

impl IndicatorType {
    /// First full match in this order wins.
    pub const PRIORITY: [IndicatorType; 8] = [
        IndicatorType::Md5,
        IndicatorType::Sha1,
        IndicatorType::Sha256,
        IndicatorType::Ipv4,
        IndicatorType::Ipv6,
        IndicatorType::Email,
        IndicatorType::Url,
        IndicatorType::Domain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorType::Md5 => "md5",
            IndicatorType::Sha1 => "sha1",
            IndicatorType::Sha256 => "sha256",
            IndicatorType::Ipv4 => "ipv4",
            IndicatorType::Ipv6 => "ipv6",
            IndicatorType::Email => "email",
            IndicatorType::Url => "url",
            IndicatorType::Domain => "domain",
        }
    }

    /// Name under which the sorted values are exposed to report templates.
    pub fn template_key(&self) -> &'static str {
        match self {
            IndicatorType::Md5 => "hash_md5",
            IndicatorType::Sha1 => "hash_sha1",
            IndicatorType::Sha256 => "hash_sha256",
            IndicatorType::Ipv4 => "ipv4",
            IndicatorType::Ipv6 => "ipv6",
            IndicatorType::Email => "email_senders",
            IndicatorType::Url => "urls",
            IndicatorType::Domain => "fqdns",
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IndicatorType::Md5 => "MD5",
            IndicatorType::Sha1 => "SHA1",
            IndicatorType::Sha256 => "SHA256",
            IndicatorType::Ipv4 => "IPv4",
            IndicatorType::Ipv6 => "IPv6",
            IndicatorType::Email => "Email",
            IndicatorType::Url => "URL",
            IndicatorType::Domain => "Domain",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorEntry {
    pub indicator_type: IndicatorType,
    pub value: String,
}

impl IndicatorEntry {
    pub fn new(indicator_type: IndicatorType, value: impl Into<String>) -> Self {
        Self {
            indicator_type,
            value: value.into(),
        }
    }
}
