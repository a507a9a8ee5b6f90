// file: src/parser/stix.rs
// description: STIX 1.x package parsing from XML or its JSON dictionary form
// reference: python-stix / cybox layout, https://docs.rs/roxmltree, https://docs.rs/serde_json

use crate::error::{PipelineError, Result};
use crate::models::{
    AddressFamily, IndicatorRecord, StructuredDocument, StructuredObservable, UriSubtype,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PackageWire {
    #[serde(default)]
    stix_header: Option<HeaderWire>,
    #[serde(default)]
    indicators: Vec<IndicatorWire>,
}

#[derive(Debug, Deserialize)]
struct HeaderWire {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndicatorWire {
    #[serde(default)]
    observable: Option<ObservableWire>,
    #[serde(default)]
    observables: Vec<ObservableWire>,
}

#[derive(Debug, Deserialize)]
struct ObservableWire {
    #[serde(default)]
    object: Option<ObjectWire>,
    #[serde(default)]
    observable_composition: Option<CompositionWire>,
}

#[derive(Debug, Deserialize)]
struct CompositionWire {
    #[serde(default)]
    observables: Vec<ObservableWire>,
}

#[derive(Debug, Deserialize)]
struct ObjectWire {
    #[serde(default)]
    properties: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "xsi:type")]
enum PropertiesWire {
    #[serde(rename = "URIObjectType", alias = "URIObj:URIObjectType")]
    Uri {
        #[serde(rename = "type", default)]
        uri_type: Option<String>,
        #[serde(default)]
        value: Option<FieldValue>,
    },
    #[serde(
        rename = "EmailMessageObjectType",
        alias = "EmailMessageObj:EmailMessageObjectType"
    )]
    Email {
        #[serde(default)]
        header: Option<EmailHeaderWire>,
    },
    #[serde(rename = "AddressObjectType", alias = "AddressObj:AddressObjectType")]
    Address {
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        address_value: Option<FieldValue>,
    },
    #[serde(rename = "FileObjectType", alias = "FileObj:FileObjectType")]
    File {
        #[serde(default)]
        hashes: Vec<HashWire>,
    },
    #[serde(
        rename = "DomainNameObjectType",
        alias = "DomainNameObj:DomainNameObjectType"
    )]
    DomainName {
        #[serde(default)]
        value: Option<FieldValue>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct EmailHeaderWire {
    #[serde(default)]
    from: Option<EmailAddressWire>,
    #[serde(default)]
    sender: Option<EmailAddressWire>,
}

#[derive(Debug, Deserialize)]
struct EmailAddressWire {
    #[serde(default)]
    address_value: Option<FieldValue>,
}

#[derive(Debug, Deserialize)]
struct HashWire {
    #[serde(rename = "type", default)]
    hash_type: Option<FieldValue>,
    #[serde(default)]
    simple_hash_value: Option<FieldValue>,
}

/// Cybox string fields serialize either bare or as `{"value": ..., "condition": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Plain(String),
    Detailed { value: String },
}

impl FieldValue {
    fn as_str(&self) -> &str {
        match self {
            FieldValue::Plain(value) => value,
            FieldValue::Detailed { value, .. } => value,
        }
    }
}

fn text(field: &Option<FieldValue>) -> Option<String> {
    field
        .as_ref()
        .map(|f| f.as_str().trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Serialization of a STIX 1.x package, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Xml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("xml") {
            Some(DocumentFormat::Xml)
        } else if extension.eq_ignore_ascii_case("json") {
            Some(DocumentFormat::Json)
        } else {
            None
        }
    }
}

pub struct StixParser;

impl StixParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, path: &Path) -> Result<StructuredDocument> {
        let source = path.display().to_string();
        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            PipelineError::DocumentParse {
                file: source.clone(),
                message: "unsupported document extension".to_string(),
            }
        })?;

        let content = fs::read_to_string(path).map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

        match format {
            DocumentFormat::Xml => self.parse_xml(&content, &source),
            DocumentFormat::Json => self.parse_json(&content, &source),
        }
    }

    pub fn parse_json(&self, content: &str, source: &str) -> Result<StructuredDocument> {
        let package: PackageWire =
            serde_json::from_str(content).map_err(|e| parse_error(source, e))?;
        build_document(package, source)
    }

    /// Reads `stix:STIX_Package` XML through the same wire types as the JSON form.
    pub fn parse_xml(&self, content: &str, source: &str) -> Result<StructuredDocument> {
        let tree = roxmltree::Document::parse(content).map_err(|e| parse_error(source, e))?;
        let root = tree.root_element();
        if root.tag_name().name() != "STIX_Package" {
            return Err(PipelineError::DocumentParse {
                file: source.to_string(),
                message: format!(
                    "expected a STIX_Package root element, found {}",
                    root.tag_name().name()
                ),
            });
        }

        let package: PackageWire =
            serde_json::from_value(xml::package(root)).map_err(|e| parse_error(source, e))?;
        build_document(package, source)
    }
}

impl Default for StixParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_error(source: &str, error: impl std::fmt::Display) -> PipelineError {
    PipelineError::DocumentParse {
        file: source.to_string(),
        message: error.to_string(),
    }
}

fn build_document(package: PackageWire, source: &str) -> Result<StructuredDocument> {
    let mut indicators = Vec::with_capacity(package.indicators.len());
    for indicator in &package.indicators {
        let mut observables = Vec::new();
        for observable in indicator.observable.iter().chain(&indicator.observables) {
            flatten_observable(observable, source, &mut observables)?;
        }
        indicators.push(IndicatorRecord { observables });
    }

    Ok(StructuredDocument {
        source: source.to_string(),
        title: package.stix_header.and_then(|h| h.title),
        indicators,
    })
}

/// Maps the XML element tree onto the dictionary layout the wire types expect.
mod xml {
    use roxmltree::{Attribute, Node};
    use serde_json::{Map, Value};

    const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

    /// Elements whose children form a sequence rather than named fields.
    const SEQUENCE_ELEMENTS: &[&str] = &["hashes"];

    pub(super) fn package(root: Node) -> Value {
        let mut package = Map::new();

        if let Some(header) = child(root, "STIX_Header") {
            let mut fields = Map::new();
            if let Some(title) = child(header, "Title") {
                fields.insert(
                    "title".to_string(),
                    Value::String(title.text().unwrap_or_default().to_string()),
                );
            }
            package.insert("stix_header".to_string(), Value::Object(fields));
        }

        let indicators: Vec<Value> = child(root, "Indicators")
            .map(|list| children(list, "Indicator").map(indicator).collect())
            .unwrap_or_default();
        package.insert("indicators".to_string(), Value::Array(indicators));

        Value::Object(package)
    }

    fn indicator(node: Node) -> Value {
        let observables: Vec<Value> = children(node, "Observable").map(observable).collect();
        let mut fields = Map::new();
        fields.insert("observables".to_string(), Value::Array(observables));
        Value::Object(fields)
    }

    fn observable(node: Node) -> Value {
        let mut fields = Map::new();

        if let Some(properties) = child(node, "Object").and_then(|o| child(o, "Properties")) {
            let mut object = Map::new();
            object.insert("properties".to_string(), element(properties));
            fields.insert("object".to_string(), Value::Object(object));
        }

        if let Some(composition) = child(node, "Observable_Composition") {
            let nested: Vec<Value> = children(composition, "Observable").map(observable).collect();
            let mut group = Map::new();
            group.insert("observables".to_string(), Value::Array(nested));
            fields.insert("observable_composition".to_string(), Value::Object(group));
        }

        Value::Object(fields)
    }

    /// Leaf elements become strings, or `{"value": ..}` objects when they carry attributes.
    fn element(node: Node) -> Value {
        let elements: Vec<Node> = node.children().filter(Node::is_element).collect();
        let name = node.tag_name().name().to_ascii_lowercase();

        if SEQUENCE_ELEMENTS.contains(&name.as_str()) {
            return Value::Array(elements.into_iter().map(element).collect());
        }

        let mut fields = Map::new();
        for attribute in node.attributes() {
            fields.insert(
                attribute_key(&attribute),
                Value::String(attribute.value().to_string()),
            );
        }

        if elements.is_empty() {
            let text = node.text().unwrap_or_default().to_string();
            if fields.is_empty() {
                return Value::String(text);
            }
            fields.insert("value".to_string(), Value::String(text));
            return Value::Object(fields);
        }

        for nested in elements {
            fields
                .entry(nested.tag_name().name().to_ascii_lowercase())
                .or_insert_with(|| element(nested));
        }
        Value::Object(fields)
    }

    fn attribute_key(attribute: &Attribute) -> String {
        if attribute.namespace() == Some(XSI_NAMESPACE) {
            format!("xsi:{}", attribute.name())
        } else {
            attribute.name().to_ascii_lowercase()
        }
    }

    fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
        node.children()
            .find(|c| c.is_element() && c.tag_name().name() == name)
    }

    fn children<'a, 'input: 'a>(
        node: Node<'a, 'input>,
        name: &'static str,
    ) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
        node.children()
            .filter(move |c| c.is_element() && c.tag_name().name() == name)
    }
}

fn flatten_observable(
    observable: &ObservableWire,
    source: &str,
    out: &mut Vec<StructuredObservable>,
) -> Result<()> {
    if let Some(properties) = observable.object.as_ref().and_then(|o| o.properties.as_ref()) {
        out.push(decode_properties(properties, source)?);
    }

    if let Some(composition) = &observable.observable_composition {
        for nested in &composition.observables {
            flatten_observable(nested, source, out)?;
        }
    }

    Ok(())
}

fn decode_properties(value: &serde_json::Value, source: &str) -> Result<StructuredObservable> {
    let Some(kind) = value.get("xsi:type").and_then(|k| k.as_str()) else {
        return Ok(StructuredObservable::Unsupported {
            kind: "untyped".to_string(),
        });
    };

    let properties = PropertiesWire::deserialize(value).map_err(|e| {
        PipelineError::DocumentParse {
            file: source.to_string(),
            message: format!("{}: {}", kind, e),
        }
    })?;

    Ok(convert_properties(properties, kind))
}

fn convert_properties(properties: PropertiesWire, kind: &str) -> StructuredObservable {
    match properties {
        PropertiesWire::Uri { uri_type, value } => StructuredObservable::Uri {
            subtype: UriSubtype::from_label(uri_type.as_deref().unwrap_or("")),
            value: text(&value),
        },
        PropertiesWire::Email { header } => {
            let address = |addr: &Option<EmailAddressWire>| {
                addr.as_ref().and_then(|a| text(&a.address_value))
            };
            StructuredObservable::Email {
                from: header.as_ref().and_then(|h| address(&h.from)),
                sender: header.as_ref().and_then(|h| address(&h.sender)),
            }
        }
        PropertiesWire::Address {
            category,
            address_value,
        } => StructuredObservable::Address {
            family: AddressFamily::from_category(category.as_deref().unwrap_or("")),
            value: text(&address_value),
        },
        PropertiesWire::File { hashes } => StructuredObservable::File {
            md5: first_hash(&hashes, "MD5"),
            sha1: first_hash(&hashes, "SHA1"),
            sha256: first_hash(&hashes, "SHA256"),
        },
        PropertiesWire::DomainName { value } => StructuredObservable::Domain {
            value: text(&value),
        },
        PropertiesWire::Unsupported => StructuredObservable::Unsupported {
            kind: kind.to_string(),
        },
    }
}

fn first_hash(hashes: &[HashWire], name: &str) -> Option<String> {
    hashes
        .iter()
        .filter(|h| {
            h.hash_type
                .as_ref()
                .is_some_and(|t| t.as_str().trim().eq_ignore_ascii_case(name))
        })
        .find_map(|h| text(&h.simple_hash_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PACKAGE: &str = r#"{
        "id": "example:Package-1",
        "stix_header": {"title": "IB-24-001 Credential phishing wave"},
        "indicators": [
            {
                "observable": {
                    "object": {"properties": {
                        "xsi:type": "URIObjectType", "type": "URL",
                        "value": {"value": "http://evil.example/login", "condition": "Equals"}
                    }}
                }
            },
            {
                "observables": [
                    {"object": {"properties": {
                        "xsi:type": "EmailMessageObjectType",
                        "header": {
                            "from": {"address_value": "a@evil.example", "category": "e-mail"},
                            "sender": {"address_value": "b@evil.example"}
                        }
                    }}},
                    {"object": {"properties": {
                        "xsi:type": "AddressObj:AddressObjectType",
                        "category": "ipv4-addr", "address_value": " 203.0.113.5 "
                    }}},
                    {"object": {"properties": {
                        "xsi:type": "FileObjectType",
                        "hashes": [
                            {"type": {"value": "MD5", "xsi:type": "cyboxVocabs:HashNameVocab-1.0"},
                             "simple_hash_value": "d41d8cd98f00b204e9800998ecf8427e"},
                            {"type": "SHA256", "simple_hash_value": ""}
                        ]
                    }}},
                    {"object": {"properties": {"xsi:type": "MutexObjectType", "name": "x"}}},
                    {"observable_composition": {"operator": "OR", "observables": [
                        {"object": {"properties": {
                            "xsi:type": "DomainNameObjectType", "value": "evil.example"
                        }}}
                    ]}}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_package() {
        let doc = StixParser::new().parse_json(PACKAGE, "pkg.json").unwrap();

        assert_eq!(doc.source, "pkg.json");
        assert_eq!(doc.title.as_deref(), Some("IB-24-001 Credential phishing wave"));
        assert_eq!(doc.indicators.len(), 2);
        assert_eq!(
            doc.indicators[0].observables,
            vec![StructuredObservable::Uri {
                subtype: UriSubtype::Url,
                value: Some("http://evil.example/login".to_string()),
            }]
        );

        let second = &doc.indicators[1].observables;
        assert_eq!(second.len(), 5);
        assert_eq!(
            second[0],
            StructuredObservable::Email {
                from: Some("a@evil.example".to_string()),
                sender: Some("b@evil.example".to_string()),
            }
        );
        assert_eq!(
            second[1],
            StructuredObservable::Address {
                family: AddressFamily::V4,
                value: Some("203.0.113.5".to_string()),
            }
        );
        assert_eq!(
            second[2],
            StructuredObservable::File {
                md5: Some("d41d8cd98f00b204e9800998ecf8427e".to_string()),
                sha1: None,
                sha256: None,
            }
        );
        assert_eq!(
            second[3],
            StructuredObservable::Unsupported {
                kind: "MutexObjectType".to_string()
            }
        );
        assert_eq!(
            second[4],
            StructuredObservable::Domain {
                value: Some("evil.example".to_string())
            }
        );
    }

    #[test]
    fn test_missing_header_parses_without_title() {
        let doc = StixParser::new()
            .parse_json(r#"{"indicators": []}"#, "empty.json")
            .unwrap();

        assert!(doc.title.is_none());
        assert!(doc.indicators.is_empty());
    }

    #[test]
    fn test_invalid_json_is_document_error() {
        let err = StixParser::new()
            .parse_json("{not json", "broken.json")
            .unwrap_err();

        assert!(matches!(err, PipelineError::DocumentParse { .. }));
        assert!(err.is_document_scoped());
    }

    #[test]
    fn test_wrong_field_type_is_document_error() {
        let content = r#"{"stix_header": {"title": "T"}, "indicators": [
            {"observable": {"object": {"properties": {
                "xsi:type": "AddressObjectType", "category": "ipv4-addr", "address_value": 42
            }}}}
        ]}"#;

        assert!(StixParser::new().parse_json(content, "bad.json").is_err());
    }

    #[test]
    fn test_untyped_properties_are_unsupported() {
        let content = r#"{"stix_header": {"title": "T"}, "indicators": [
            {"observable": {"object": {"properties": {"value": "evil.example"}}}}
        ]}"#;

        let doc = StixParser::new().parse_json(content, "untyped.json").unwrap();
        assert!(matches!(
            doc.indicators[0].observables[0],
            StructuredObservable::Unsupported { .. }
        ));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = StixParser::new()
            .parse_file(Path::new("/nonexistent/package.json"))
            .unwrap_err();

        assert!(matches!(err, PipelineError::FileOperation { .. }));
    }

    const XML_PACKAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<stix:STIX_Package
    xmlns:stix="http://stix.mitre.org/stix-1"
    xmlns:indicator="http://stix.mitre.org/Indicator-2"
    xmlns:cybox="http://cybox.mitre.org/cybox-2"
    xmlns:cyboxCommon="http://cybox.mitre.org/common-2"
    xmlns:URIObj="http://cybox.mitre.org/objects#URIObject-2"
    xmlns:EmailMessageObj="http://cybox.mitre.org/objects#EmailMessageObject-2"
    xmlns:AddressObj="http://cybox.mitre.org/objects#AddressObject-2"
    xmlns:FileObj="http://cybox.mitre.org/objects#FileObject-2"
    xmlns:DomainNameObj="http://cybox.mitre.org/objects#DomainNameObject-1"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    id="example:Package-1" version="1.2">
  <stix:STIX_Header>
    <stix:Title>IB-24-003 Malware staging hosts</stix:Title>
  </stix:STIX_Header>
  <stix:Indicators>
    <stix:Indicator xsi:type="indicator:IndicatorType" id="example:Indicator-1">
      <indicator:Observable id="example:Observable-1">
        <cybox:Object>
          <cybox:Properties xsi:type="URIObj:URIObjectType" type="URL">
            <URIObj:Value condition="Equals">http://stage.example/payload</URIObj:Value>
          </cybox:Properties>
        </cybox:Object>
      </indicator:Observable>
    </stix:Indicator>
    <stix:Indicator xsi:type="indicator:IndicatorType" id="example:Indicator-2">
      <indicator:Observable id="example:Observable-2">
        <cybox:Observable_Composition operator="OR">
          <cybox:Observable>
            <cybox:Object>
              <cybox:Properties xsi:type="EmailMessageObj:EmailMessageObjectType">
                <EmailMessageObj:Header>
                  <EmailMessageObj:From category="e-mail">
                    <AddressObj:Address_Value>drop@stage.example</AddressObj:Address_Value>
                  </EmailMessageObj:From>
                </EmailMessageObj:Header>
              </cybox:Properties>
            </cybox:Object>
          </cybox:Observable>
          <cybox:Observable>
            <cybox:Object>
              <cybox:Properties xsi:type="AddressObj:AddressObjectType" category="ipv6-addr">
                <AddressObj:Address_Value>2001:db8::7</AddressObj:Address_Value>
              </cybox:Properties>
            </cybox:Object>
          </cybox:Observable>
          <cybox:Observable>
            <cybox:Object>
              <cybox:Properties xsi:type="FileObj:FileObjectType">
                <FileObj:Hashes>
                  <cyboxCommon:Hash>
                    <cyboxCommon:Type xsi:type="cyboxVocabs:HashNameVocab-1.0">SHA1</cyboxCommon:Type>
                    <cyboxCommon:Simple_Hash_Value condition="Equals">da39a3ee5e6b4b0d3255bfef95601890afd80709</cyboxCommon:Simple_Hash_Value>
                  </cyboxCommon:Hash>
                </FileObj:Hashes>
              </cybox:Properties>
            </cybox:Object>
          </cybox:Observable>
          <cybox:Observable>
            <cybox:Object>
              <cybox:Properties xsi:type="DomainNameObj:DomainNameObjectType" type="FQDN">
                <DomainNameObj:Value>stage.example</DomainNameObj:Value>
              </cybox:Properties>
            </cybox:Object>
          </cybox:Observable>
        </cybox:Observable_Composition>
      </indicator:Observable>
    </stix:Indicator>
  </stix:Indicators>
</stix:STIX_Package>
"#;

    #[test]
    fn test_parse_xml_package() {
        let doc = StixParser::new().parse_xml(XML_PACKAGE, "pkg.xml").unwrap();

        assert_eq!(doc.title.as_deref(), Some("IB-24-003 Malware staging hosts"));
        assert_eq!(doc.indicators.len(), 2);
        assert_eq!(
            doc.indicators[0].observables,
            vec![StructuredObservable::Uri {
                subtype: UriSubtype::Url,
                value: Some("http://stage.example/payload".to_string()),
            }]
        );
        assert_eq!(
            doc.indicators[1].observables,
            vec![
                StructuredObservable::Email {
                    from: Some("drop@stage.example".to_string()),
                    sender: None,
                },
                StructuredObservable::Address {
                    family: AddressFamily::V6,
                    value: Some("2001:db8::7".to_string()),
                },
                StructuredObservable::File {
                    md5: None,
                    sha1: Some("da39a3ee5e6b4b0d3255bfef95601890afd80709".to_string()),
                    sha256: None,
                },
                StructuredObservable::Domain {
                    value: Some("stage.example".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_xml_without_header_has_no_title() {
        let content = r#"<stix:STIX_Package xmlns:stix="http://stix.mitre.org/stix-1"/>"#;

        let doc = StixParser::new().parse_xml(content, "bare.xml").unwrap();

        assert!(doc.title.is_none());
        assert!(doc.indicators.is_empty());
    }

    #[test]
    fn test_xml_errors_are_document_scoped() {
        let parser = StixParser::new();

        let truncated = parser.parse_xml("<stix:STIX_Package", "cut.xml").unwrap_err();
        assert!(matches!(truncated, PipelineError::DocumentParse { .. }));

        let wrong_root = parser.parse_xml("<feed/>", "feed.xml").unwrap_err();
        assert!(wrong_root.to_string().contains("STIX_Package"));
        assert!(wrong_root.is_document_scoped());
    }

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a/PKG.XML")),
            Some(DocumentFormat::Xml)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("pkg.json")),
            Some(DocumentFormat::Json)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("ioc.txt")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_parse_file_dispatches_on_extension() {
        let temp = tempfile::TempDir::new().unwrap();
        let xml_path = temp.path().join("pkg.xml");
        let json_path = temp.path().join("pkg.json");
        fs::write(&xml_path, XML_PACKAGE).unwrap();
        fs::write(&json_path, PACKAGE).unwrap();

        let parser = StixParser::new();
        let from_xml = parser.parse_file(&xml_path).unwrap();
        let from_json = parser.parse_file(&json_path).unwrap();

        assert_eq!(from_xml.title.as_deref(), Some("IB-24-003 Malware staging hosts"));
        assert_eq!(from_json.title.as_deref(), Some("IB-24-001 Credential phishing wave"));
    }
}
