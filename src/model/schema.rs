//! Schema documents attached to a service.
//!
//! A [`SchemaInfo`] records one schema document's target namespace and
//! qualification flags, and bridges between an opaque [`CompiledSchema`]
//! and its materialized root element ([`SchemaElement`]).
//!
//! The element is produced lazily: the compiled schema is serialized to XML
//! text and the root start tag is parsed with `quick-xml`. Serializers that
//! drop the default namespace (or bind it to something other than XSD) leave
//! an unprefixed root element in the wrong namespace, so after parsing an
//! unprefixed root always gets `xmlns` set to the XSD namespace.

use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use smol_str::SmolStr;
use tracing::debug;

use super::error::{ModelError, Result};
use super::properties::{Extensions, PropertiesHolder};
use crate::base::constants::{
    ATTRIBUTE_FORM_DEFAULT, ELEMENT_FORM_DEFAULT, QUALIFIED, UNQUALIFIED, XMLNS_ATTRIBUTE,
    XSD_NAMESPACE,
};

// ============================================================================
// FORM DEFAULTS
// ============================================================================

/// Value of a schema's `elementFormDefault` / `attributeFormDefault`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormDefault {
    Qualified,
    #[default]
    Unqualified,
}

impl FormDefault {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            QUALIFIED => Some(Self::Qualified),
            UNQUALIFIED => Some(Self::Unqualified),
            _ => None,
        }
    }

    pub fn is_qualified(self) -> bool {
        matches!(self, Self::Qualified)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qualified => QUALIFIED,
            Self::Unqualified => UNQUALIFIED,
        }
    }
}

impl fmt::Display for FormDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// COMPILED SCHEMA
// ============================================================================

/// A schema compiled by an external schema processor.
pub trait CompiledSchema: Send + Sync + fmt::Debug {
    fn target_namespace(&self) -> Option<&str>;

    fn element_form_default(&self) -> FormDefault;

    fn attribute_form_default(&self) -> FormDefault;

    /// Render the schema as an XML document.
    fn serialize(&self) -> Result<String>;
}

// ============================================================================
// SCHEMA ELEMENT
// ============================================================================

/// The root element of a schema document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaElement {
    prefix: Option<SmolStr>,
    local_name: SmolStr,
    attributes: IndexMap<SmolStr, String>,
    empty: bool,
    /// Document text before the root start tag.
    prolog: String,
    /// Document text after the root start tag.
    body: String,
}

impl SchemaElement {
    /// Parse the root element of `xml`.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        loop {
            let start = position(reader.buffer_position());
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let end = position(reader.buffer_position());
                    return Self::from_start(e, false, xml, start, end);
                }
                Ok(Event::Empty(ref e)) => {
                    let end = position(reader.buffer_position());
                    return Self::from_start(e, true, xml, start, end);
                }
                Ok(Event::Eof) => return Err(ModelError::schema("document has no root element")),
                Err(e) => {
                    return Err(ModelError::schema(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
        }
    }

    fn from_start(e: &BytesStart<'_>, empty: bool, xml: &str, start: usize, end: usize) -> Result<Self> {
        let name_bytes = e.name();
        let tag_name = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| ModelError::schema(format!("Invalid tag name: {e}")))?;
        let (prefix, local_name) = match tag_name.split_once(':') {
            Some((prefix, local)) => (Some(SmolStr::new(prefix)), SmolStr::new(local)),
            None => (None, SmolStr::new(tag_name)),
        };

        let mut attributes = IndexMap::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| ModelError::schema(format!("Attribute error: {e}")))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| ModelError::schema(format!("Attribute key error: {e}")))?;
            let value = attr
                .unescape_value()
                .map_err(|e| ModelError::schema(format!("Attribute value error: {e}")))?;
            attributes.insert(SmolStr::new(key), value.into_owned());
        }

        // Leading whitespace is trimmed by the reader, so the recorded start
        // may precede the '<' of the root tag.
        let tag_start = xml[start..end].find('<').map_or(start, |offset| start + offset);

        Ok(Self {
            prefix,
            local_name,
            attributes,
            empty,
            prolog: xml[..tag_start].to_string(),
            body: xml[end..].to_string(),
        })
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The element name as written, `prefix:local` or `local`.
    pub fn tag_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local_name),
            None => self.local_name.to_string(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(SmolStr::new(name), value.into());
    }

    /// Root attributes in document order, namespace declarations included.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The default namespace declared on the root, if any.
    pub fn default_namespace(&self) -> Option<&str> {
        self.attribute(XMLNS_ATTRIBUTE)
    }

    /// The namespace the root element's name resolves to, from declarations
    /// on the root itself.
    pub fn namespace_uri(&self) -> Option<&str> {
        match &self.prefix {
            Some(prefix) => self.attribute(&format!("{XMLNS_ATTRIBUTE}:{prefix}")),
            None => self.default_namespace(),
        }
    }

    pub fn target_namespace(&self) -> Option<&str> {
        self.attribute("targetNamespace")
    }

    pub fn element_form_default(&self) -> Option<FormDefault> {
        self.attribute(ELEMENT_FORM_DEFAULT).and_then(FormDefault::parse)
    }

    pub fn attribute_form_default(&self) -> Option<FormDefault> {
        self.attribute(ATTRIBUTE_FORM_DEFAULT).and_then(FormDefault::parse)
    }

    /// Bind an unprefixed root to the XSD namespace when it is declared as
    /// anything else. Returns true if the element changed.
    fn fix_default_namespace(&mut self) -> bool {
        if self.prefix.is_some() || self.default_namespace() == Some(XSD_NAMESPACE) {
            return false;
        }
        self.set_attribute(XMLNS_ATTRIBUTE, XSD_NAMESPACE);
        true
    }

    /// Render the document with the current root attributes.
    pub fn to_xml(&self) -> Result<String> {
        let tag_name = self.tag_name();
        let mut start = BytesStart::new(tag_name.as_str());
        for (key, value) in self.attributes() {
            start.push_attribute((key, value));
        }

        let mut writer = Writer::new(Cursor::new(Vec::new()));
        let event = if self.empty {
            Event::Empty(start)
        } else {
            Event::Start(start)
        };
        writer
            .write_event(event)
            .map_err(|e| ModelError::schema(format!("Write error: {e}")))?;
        let tag = String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| ModelError::schema(format!("Invalid UTF-8: {e}")))?;

        Ok(format!("{}{tag}{}", self.prolog, self.body))
    }
}

fn position(offset: impl TryInto<usize>) -> usize {
    offset.try_into().unwrap_or(usize::MAX)
}

// ============================================================================
// SCHEMA INFO
// ============================================================================

#[derive(Debug, Default)]
struct SchemaState {
    system_id: Option<String>,
    schema: Option<Arc<dyn CompiledSchema>>,
    element: Option<Arc<SchemaElement>>,
    element_qualified: bool,
    attribute_qualified: bool,
}

/// Metadata for one schema document of a service.
#[derive(Debug)]
pub struct SchemaInfo {
    namespace_uri: SmolStr,
    state: RwLock<SchemaState>,
    extensions: Extensions,
}

impl SchemaInfo {
    pub fn new(namespace_uri: impl Into<SmolStr>) -> Self {
        Self::with_forms(namespace_uri, false, false)
    }

    /// Create a schema record with explicit qualification flags.
    pub fn with_forms(
        namespace_uri: impl Into<SmolStr>,
        element_qualified: bool,
        attribute_qualified: bool,
    ) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            state: RwLock::new(SchemaState {
                element_qualified,
                attribute_qualified,
                ..SchemaState::default()
            }),
            extensions: Extensions::new(),
        }
    }

    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    /// Location the schema document was loaded from.
    pub fn system_id(&self) -> Option<String> {
        self.state.read().system_id.clone()
    }

    pub fn set_system_id(&self, system_id: Option<String>) {
        self.state.write().system_id = system_id;
    }

    pub fn is_element_form_qualified(&self) -> bool {
        self.state.read().element_qualified
    }

    pub fn is_attribute_form_qualified(&self) -> bool {
        self.state.read().attribute_qualified
    }

    pub fn schema(&self) -> Option<Arc<dyn CompiledSchema>> {
        self.state.read().schema.clone()
    }

    /// Attach the compiled schema.
    ///
    /// Takes the qualification flags from the schema and drops any element
    /// materialized from a previous schema.
    pub fn set_schema(&self, schema: Arc<dyn CompiledSchema>) {
        let mut state = self.state.write();
        state.element_qualified = schema.element_form_default().is_qualified();
        state.attribute_qualified = schema.attribute_form_default().is_qualified();
        state.element = None;
        state.schema = Some(schema);
    }

    /// Attach an already materialized element.
    ///
    /// Takes the qualification flags from the element's form-default
    /// attributes; a missing attribute means unqualified.
    pub fn set_element(&self, element: SchemaElement) {
        let mut state = self.state.write();
        state.element_qualified = element
            .element_form_default()
            .is_some_and(FormDefault::is_qualified);
        state.attribute_qualified = element
            .attribute_form_default()
            .is_some_and(FormDefault::is_qualified);
        state.element = Some(Arc::new(element));
    }

    /// The root schema element, materializing it from the compiled schema on
    /// first use.
    ///
    /// Returns `None` when neither an element nor a compiled schema is set.
    pub fn element(&self) -> Result<Option<Arc<SchemaElement>>> {
        let schema = {
            let state = self.state.read();
            if let Some(element) = &state.element {
                return Ok(Some(Arc::clone(element)));
            }
            match &state.schema {
                Some(schema) => Arc::clone(schema),
                None => return Ok(None),
            }
        };

        let mut element = SchemaElement::parse(&schema.serialize()?)?;
        if element.fix_default_namespace() {
            debug!(namespace = %self.namespace_uri, "bound schema root to the XSD namespace");
        }

        let mut state = self.state.write();
        if let Some(existing) = &state.element {
            return Ok(Some(Arc::clone(existing)));
        }
        let element = Arc::new(element);
        let current = state.schema.as_ref().is_some_and(|s| Arc::ptr_eq(s, &schema));
        if current {
            state.element = Some(Arc::clone(&element));
        }
        Ok(Some(element))
    }
}

impl PropertiesHolder for SchemaInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}
