use kunai_rfc::rfc::vcard::core::types;

/// ## Summary
/// Directory attribute for a telephone number by vCard group and TYPE.
///
/// | group | TYPE  | attribute                  |
/// |-------|-------|----------------------------|
/// | WORK  | voice | `telephoneNumber`          |
/// | WORK  | fax   | `facsimileTelephoneNumber` |
/// | HOME  | voice | `homePhone`                |
/// | HOME  | cell  | `mobile`                   |
///
/// A missing group means WORK and a missing TYPE means voice. Other
/// combinations have no attribute.
#[must_use]
pub fn telephone_attribute(group: Option<&str>, tel_type: Option<&str>) -> Option<&'static str> {
    let group = group.unwrap_or(types::WORK);
    let tel_type = tel_type.unwrap_or(types::VOICE);

    if group.eq_ignore_ascii_case(types::WORK) {
        if tel_type.eq_ignore_ascii_case(types::VOICE) {
            Some("telephoneNumber")
        } else if tel_type.eq_ignore_ascii_case(types::FAX) {
            Some("facsimileTelephoneNumber")
        } else {
            None
        }
    } else if group.eq_ignore_ascii_case(types::HOME) {
        if tel_type.eq_ignore_ascii_case(types::VOICE) {
            Some("homePhone")
        } else if tel_type.eq_ignore_ascii_case(types::CELL) {
            Some("mobile")
        } else {
            None
        }
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_table() {
        assert_eq!(telephone_attribute(None, None), Some("telephoneNumber"));
        assert_eq!(telephone_attribute(Some("WORK"), Some("fax")), Some("facsimileTelephoneNumber"));
        assert_eq!(telephone_attribute(Some("home"), None), Some("homePhone"));
        assert_eq!(telephone_attribute(Some("HOME"), Some("CELL")), Some("mobile"));
        assert_eq!(telephone_attribute(Some("HOME"), Some("fax")), None);
        assert_eq!(telephone_attribute(Some("WORK"), Some("pager")), None);
        assert_eq!(telephone_attribute(Some("item1"), None), None);
    }
}
