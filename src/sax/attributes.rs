//! Attribute View
//!
//! The ordered attribute list delivered with every start-element event,
//! with lookup by qualified name or by (namespace URI, local name).

/// Attribute type reported for every attribute; there is no DTD typing
pub const CDATA: &str = "CDATA";

/// A namespace-resolved attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    local_name: String,
    /// None for namespace declarations reported as attributes
    uri: Option<String>,
    qname: String,
    value: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(
        local_name: impl Into<String>,
        uri: Option<&str>,
        qname: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Attribute {
            local_name: local_name.into(),
            uri: uri.map(str::to_string),
            qname: qname.into(),
            value: value.into(),
        }
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn qname(&self) -> &str {
        &self.qname
    }

    /// Unescaped value
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Ordered, indexable attribute list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    attributes: Vec<Attribute>,
}

impl Attributes {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Attributes { attributes }
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }

    /// Index of the attribute with the given qualified name
    pub fn index_of(&self, qname: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.qname == qname)
    }

    /// Index of the attribute with the given namespace URI and local name
    pub fn index_of_ns(&self, uri: &str, local_name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.uri.as_deref() == Some(uri) && a.local_name == local_name)
    }

    pub fn local_name(&self, index: usize) -> Option<&str> {
        self.get(index).map(Attribute::local_name)
    }

    pub fn qname(&self, index: usize) -> Option<&str> {
        self.get(index).map(Attribute::qname)
    }

    pub fn uri(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Attribute::uri)
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.get(index).map(Attribute::value)
    }

    /// Value of the attribute with the given qualified name
    pub fn value_of(&self, qname: &str) -> Option<&str> {
        self.index_of(qname).and_then(|i| self.value(i))
    }

    /// Value of the attribute with the given namespace URI and local name
    pub fn value_of_ns(&self, uri: &str, local_name: &str) -> Option<&str> {
        self.index_of_ns(uri, local_name).and_then(|i| self.value(i))
    }

    /// Attribute type at `index`, always [`CDATA`] when present
    pub fn attribute_type(&self, index: usize) -> Option<&'static str> {
        self.get(index).map(|_| CDATA)
    }

    pub fn type_of(&self, qname: &str) -> Option<&'static str> {
        self.index_of(qname).and_then(|i| self.attribute_type(i))
    }

    pub fn type_of_ns(&self, uri: &str, local_name: &str) -> Option<&'static str> {
        self.index_of_ns(uri, local_name)
            .and_then(|i| self.attribute_type(i))
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Attributes::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Attributes {
        vec![
            Attribute::new("att", Some(""), "att", "foo"),
            Attribute::new("lang", Some("urn:test"), "p:lang", "en"),
            Attribute::new("xmlns:p", None, "xmlns:p", "urn:test"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lookup_by_qname() {
        let attrs = sample();
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.index_of("p:lang"), Some(1));
        assert_eq!(attrs.value_of("att"), Some("foo"));
        assert_eq!(attrs.value_of("missing"), None);
    }

    #[test]
    fn test_lookup_by_namespace() {
        let attrs = sample();
        assert_eq!(attrs.value_of_ns("urn:test", "lang"), Some("en"));
        assert_eq!(attrs.value_of_ns("", "att"), Some("foo"));
        assert_eq!(attrs.value_of_ns("", "lang"), None);
    }

    #[test]
    fn test_namespace_declaration_has_no_uri() {
        let attrs = sample();
        assert_eq!(attrs.uri(2), None);
        assert_eq!(attrs.index_of_ns("", "xmlns:p"), None);
    }

    #[test]
    fn test_type_is_cdata() {
        let attrs = sample();
        assert_eq!(attrs.attribute_type(0), Some(CDATA));
        assert_eq!(attrs.type_of("p:lang"), Some("CDATA"));
        assert_eq!(attrs.type_of_ns("urn:test", "lang"), Some("CDATA"));
        assert_eq!(attrs.attribute_type(3), None);
    }

    #[test]
    fn test_out_of_range() {
        let attrs = Attributes::default();
        assert!(attrs.is_empty());
        assert_eq!(attrs.local_name(0), None);
        assert_eq!(attrs.qname(0), None);
        assert_eq!(attrs.value(0), None);
    }
}
