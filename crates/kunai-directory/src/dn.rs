//! Distinguished name helpers (RFC 4514).

/// ## Summary
/// Escapes an attribute value for use inside an RDN.
///
/// Escapes `, + " \ < > ;`, a leading `#` or space, a trailing space and NUL.
#[must_use]
pub fn escape_rdn_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 4);
    let last = value.chars().count().saturating_sub(1);

    for (i, c) in value.chars().enumerate() {
        match c {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '#' if i == 0 => escaped.push_str("\\#"),
            ' ' if i == 0 || i == last => escaped.push_str("\\ "),
            '\0' => escaped.push_str("\\00"),
            _ => escaped.push(c),
        }
    }

    escaped
}

/// Builds `<attr>=<escaped value>,<parent>`.
#[must_use]
pub fn child_dn(attribute: &str, value: &str, parent: &str) -> String {
    let rdn = format!("{attribute}={}", escape_rdn_value(value));
    if parent.is_empty() {
        rdn
    } else {
        format!("{rdn},{parent}")
    }
}

/// LDAP URL naming an entry on the default server.
#[must_use]
pub fn ldap_url(dn: &str) -> String {
    format!("ldap:///{dn}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_rdn_value("Doe, John"), "Doe\\, John");
        assert_eq!(escape_rdn_value("a+b=c"), "a\\+b=c");
        assert_eq!(escape_rdn_value("#hash"), "\\#hash");
        assert_eq!(escape_rdn_value(" padded "), "\\ padded\\ ");
        assert_eq!(escape_rdn_value("plain"), "plain");
    }

    #[test]
    fn builds_child_dn() {
        assert_eq!(
            child_dn("cn", "Jane Doe", "ou=people,dc=example,dc=org"),
            "cn=Jane Doe,ou=people,dc=example,dc=org"
        );
        assert_eq!(child_dn("cn", "x", ""), "cn=x");
        assert_eq!(ldap_url("cn=x,dc=org"), "ldap:///cn=x,dc=org");
    }
}
