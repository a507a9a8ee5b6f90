// file: src/extractor/observable.rs
// description: maps structured document observables onto canonical indicator entries
// reference: cybox object property semantics

use crate::error::{PipelineError, Result};
use crate::models::{
    AddressFamily, IndicatorEntry, IndicatorType, StructuredDocument, StructuredObservable,
    UriSubtype,
};
use tracing::debug;

/// Output of mapping one structured document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentExtraction {
    pub title_token: String,
    pub entries: Vec<IndicatorEntry>,
}

pub struct ObservableMapper;

impl ObservableMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map_document(&self, document: &StructuredDocument) -> Result<DocumentExtraction> {
        let title_token = document
            .title
            .as_deref()
            .and_then(|title| title.split_whitespace().next())
            .ok_or_else(|| PipelineError::MalformedDocument {
                file: document.source.clone(),
                reason: "document has no title".to_string(),
            })?
            .to_string();

        let entries: Vec<IndicatorEntry> = document
            .indicators
            .iter()
            .flat_map(|indicator| indicator.observables.iter())
            .flat_map(|observable| self.map_observable(observable))
            .collect();

        debug!(
            "Mapped {} observables to {} entries from {}",
            document.observable_count(),
            entries.len(),
            document.source
        );

        Ok(DocumentExtraction {
            title_token,
            entries,
        })
    }

    pub fn map_observable(&self, observable: &StructuredObservable) -> Vec<IndicatorEntry> {
        match observable {
            StructuredObservable::Uri { subtype, value } => match subtype {
                UriSubtype::Url => entry(IndicatorType::Url, value),
                UriSubtype::Domain => entry(IndicatorType::Domain, value),
                UriSubtype::Other(_) => Vec::new(),
            },
            StructuredObservable::Email { from, sender } => entry(IndicatorType::Email, from)
                .into_iter()
                .chain(entry(IndicatorType::Email, sender))
                .collect(),
            StructuredObservable::Address { family, value } => match family {
                AddressFamily::V4 => entry(IndicatorType::Ipv4, value),
                AddressFamily::V6 => entry(IndicatorType::Ipv6, value),
                AddressFamily::Other(_) => Vec::new(),
            },
            StructuredObservable::File { md5, sha1, sha256 } => [
                (IndicatorType::Md5, md5),
                (IndicatorType::Sha1, sha1),
                (IndicatorType::Sha256, sha256),
            ]
            .into_iter()
            .flat_map(|(indicator_type, value)| entry(indicator_type, value))
            .collect(),
            StructuredObservable::Domain { value } => entry(IndicatorType::Domain, value),
            StructuredObservable::Unsupported { kind } => {
                debug!("Skipping unsupported observable type {}", kind);
                Vec::new()
            }
        }
    }
}

impl Default for ObservableMapper {
    fn default() -> Self {
        Self::new()
    }
}

fn entry(indicator_type: IndicatorType, value: &Option<String>) -> Vec<IndicatorEntry> {
    value
        .iter()
        .map(|v| IndicatorEntry::new(indicator_type, v.clone()))
        .collect()
}
