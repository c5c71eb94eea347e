//! XML 1.0 Name Validation
//!
//! Character classes of the `Name` production (XML 1.0, fifth edition) and
//! the helpers used to split qualified names.

/// Check if a character is a valid XML NameStartChar
#[inline]
pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' |
        '\u{D8}'..='\u{F6}' |
        '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' |
        '\u{37F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' |
        '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' |
        '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' |
        '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// Check if a character is a valid XML NameChar
#[inline]
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' |
            '\u{B7}' |
            '\u{300}'..='\u{36F}' |
            '\u{203F}'..='\u{2040}'
        )
}

/// Check a string against the `Name` production
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Names beginning with `xml` in any casing are reserved
#[inline]
pub fn has_reserved_prefix(name: &str) -> bool {
    name.len() >= 3 && name.as_bytes()[..3].eq_ignore_ascii_case(b"xml")
}

/// Element names must match `Name` and must not use the reserved prefix
pub fn is_valid_element_name(name: &str) -> bool {
    is_valid_name(name) && !has_reserved_prefix(name)
}

/// The `S` production: space, tab, carriage return, line feed
#[inline]
pub fn is_xml_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Split a qualified name into (prefix, local name) at the first colon.
///
/// An unprefixed name yields an empty prefix.
pub fn split_qname(qname: &str) -> (&str, &str) {
    match qname.find(':') {
        Some(index) => (&qname[..index], &qname[index + 1..]),
        None => ("", qname),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_whitespace() {
        assert!(b" \t\r\n".iter().all(|&b| is_xml_whitespace(b)));
        assert!(!is_xml_whitespace(0x0C));
        assert!(!is_xml_whitespace(0x0B));
    }

    #[test]
    fn test_simple_names() {
        assert!(is_valid_name("root"));
        assert!(is_valid_name("r1oot"));
        assert!(is_valid_name("ro-ot"));
        assert!(is_valid_name("p:root"));
        assert!(is_valid_name("_x.y"));
    }

    #[test]
    fn test_invalid_start() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1root"));
        assert!(!is_valid_name("-root"));
        assert!(!is_valid_name(".root"));
    }

    #[test]
    fn test_unicode_names() {
        assert!(is_valid_name("r\u{218F}oot"));
        assert!(!is_valid_name("r\u{2190}oot"));
        assert!(is_valid_name("\u{00E9}l\u{00E8}ve"));
    }

    #[test]
    fn test_reserved_prefix() {
        assert!(!is_valid_element_name("xmlroot"));
        assert!(!is_valid_element_name("XmLroot"));
        assert!(is_valid_element_name("roxmlot"));
        assert!(is_valid_element_name("xm"));
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("p:root"), ("p", "root"));
        assert_eq!(split_qname("root"), ("", "root"));
        assert_eq!(split_qname("a:b:c"), ("a", "b:c"));
    }
}
