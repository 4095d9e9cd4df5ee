//! XML character classes used by the escaper and the checker.

pub trait XmlChar {
    /// https://www.w3.org/TR/REC-xml/#NT-S
    fn is_xml_whitespace(&self) -> bool;

    /// https://www.w3.org/TR/REC-xml/#NT-NameStartChar
    fn is_xml_name_start_char(&self) -> bool;

    /// `NameStartChar`, digits, `-`, `.` and combining marks.
    fn is_xml_name_char(&self) -> bool;

    /// https://www.w3.org/TR/REC-xml/#NT-Char
    fn is_xml_char(&self) -> bool;
}

impl XmlChar for char {
    #[inline]
    fn is_xml_whitespace(&self) -> bool {
        matches!(*self, ' ' | '\t' | '\r' | '\n')
    }

    #[inline]
    fn is_xml_name_start_char(&self) -> bool {
        matches!(
            *self,
            ':' | '_'
                | 'A'..='Z'
                | 'a'..='z'
                | '\u{C0}'..='\u{D6}'
                | '\u{D8}'..='\u{F6}'
                | '\u{F8}'..='\u{2FF}'
                | '\u{370}'..='\u{37D}'
                | '\u{37F}'..='\u{1FFF}'
                | '\u{200C}'..='\u{200D}'
                | '\u{2070}'..='\u{218F}'
                | '\u{2C00}'..='\u{2FEF}'
                | '\u{3001}'..='\u{D7FF}'
                | '\u{F900}'..='\u{FDCF}'
                | '\u{FDF0}'..='\u{FFFD}'
                | '\u{10000}'..='\u{EFFFF}'
        )
    }

    #[inline]
    fn is_xml_name_char(&self) -> bool {
        self.is_xml_name_start_char()
            || matches!(
                *self,
                '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
            )
    }

    #[inline]
    fn is_xml_char(&self) -> bool {
        matches!(
            *self,
            '\x09' | '\x0A' | '\x0D' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
        )
    }
}

pub trait XmlStrExt {
    /// https://www.w3.org/TR/REC-xml/#NT-Name
    fn is_xml_name(&self) -> bool;

    /// Name without colons, as used for namespace prefixes and local parts.
    fn is_xml_ncname(&self) -> bool;

    /// Byte index and value of the first character outside of `Char`.
    fn find_invalid_xml_char(&self) -> Option<(usize, char)>;
}

impl XmlStrExt for str {
    fn is_xml_name(&self) -> bool {
        let mut chars = self.chars();
        match chars.next() {
            Some(c) if c.is_xml_name_start_char() => chars.all(|c| c.is_xml_name_char()),
            _ => false,
        }
    }

    fn is_xml_ncname(&self) -> bool {
        !self.contains(':') && self.is_xml_name()
    }

    fn find_invalid_xml_char(&self) -> Option<(usize, char)> {
        self.char_indices().find(|(_, c)| !c.is_xml_char())
    }
}
