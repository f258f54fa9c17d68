//! Naming conventions and well-known namespaces.

/// Suffix appended to an operation's local name when its input message
/// name is omitted from the contract.
pub const DEFAULT_INPUT_SUFFIX: &str = "Request";

/// Suffix appended to an operation's local name when its output message
/// name is omitted from the contract.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "Response";

/// The XML Schema namespace.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Attribute carrying the default namespace declaration.
pub const XMLNS_ATTRIBUTE: &str = "xmlns";

/// Root attribute holding the element form default of a schema.
pub const ELEMENT_FORM_DEFAULT: &str = "elementFormDefault";

/// Root attribute holding the attribute form default of a schema.
pub const ATTRIBUTE_FORM_DEFAULT: &str = "attributeFormDefault";

/// Literal value of a qualified form default.
pub const QUALIFIED: &str = "qualified";

/// Literal value of an unqualified form default.
pub const UNQUALIFIED: &str = "unqualified";
