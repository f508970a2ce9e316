//! Unit tests for LDAP filter compilation.

#[cfg(test)]
mod tests {
    use kunai_core::types::FilterMode;
    use kunai_rfc::rfc::dav::core::{
        AddressbookFilter, FilterTest, ParamFilter, PropFilter, TextMatch,
    };
    use kunai_rfc::rfc::query::{CompileError, UnsupportedReason};

    use crate::query::{LdapFilterCompiler, escape_filter_value};
    use crate::registry::{PropertyAttributeRegistry, PropertyMapping, RegistryBuilder};

    fn registry() -> PropertyAttributeRegistry {
        PropertyAttributeRegistry::standard().unwrap()
    }

    fn compile(filter: &AddressbookFilter) -> String {
        let registry = registry();
        LdapFilterCompiler::new(&registry, FilterMode::Lenient)
            .compile_to_string(filter)
            .unwrap()
    }

    fn single(prop: PropFilter) -> String {
        compile(&AddressbookFilter::anyof(vec![prop]))
    }

    #[test_log::test]
    fn equals_on_simple_property() {
        let filter = single(PropFilter::new("EMAIL").with_text_match(TextMatch::equals("a@b.com")));
        assert_eq!(filter, "(mail=a@b.com)");
    }

    #[test]
    fn wildcards_follow_match_type() {
        assert_eq!(
            single(PropFilter::new("EMAIL").with_text_match(TextMatch::contains("example"))),
            "(mail=*example*)"
        );
        assert_eq!(
            single(PropFilter::new("FN").with_text_match(TextMatch::starts_with("Jo"))),
            "(cn=Jo*)"
        );
        assert_eq!(
            single(PropFilter::new("fn").with_text_match(TextMatch::ends_with("son"))),
            "(cn=*son)"
        );
    }

    #[test]
    fn allof_left_folds_terms() {
        let two = compile(&AddressbookFilter::allof(vec![
            PropFilter::new("FN").with_text_match(TextMatch::equals("A")),
            PropFilter::new("EMAIL").with_text_match(TextMatch::equals("B")),
        ]));
        assert_eq!(two, "(&(cn=A)(mail=B))");

        let three = compile(&AddressbookFilter::allof(vec![
            PropFilter::new("FN").with_text_match(TextMatch::equals("A")),
            PropFilter::new("EMAIL").with_text_match(TextMatch::equals("B")),
            PropFilter::new("TITLE").with_text_match(TextMatch::equals("C")),
        ]));
        assert_eq!(three, "(&(&(cn=A)(mail=B))(title=C))");
        assert_eq!(
            three.matches('(').count(),
            three.matches(')').count()
        );
    }

    #[test]
    fn anyof_uses_or() {
        let filter = compile(&AddressbookFilter::anyof(vec![
            PropFilter::new("FN").with_text_match(TextMatch::contains("x")),
            PropFilter::new("NOTE").with_text_match(TextMatch::contains("y")),
        ]));
        assert_eq!(filter, "(|(cn=*x*)(description=*y*))");
    }

    #[test]
    fn grouped_name_expands_to_candidates() {
        let filter = single(
            PropFilter::new("HOME,TEL")
                .with_test(FilterTest::AnyOf)
                .with_text_match(TextMatch::starts_with("555")),
        );
        assert_eq!(
            filter,
            "(|(|(|(|(homePhone=555*)(mobile=555*))(telephoneNumber=555*))(facsimileTelephoneNumber=555*))(pager=555*))"
        );
    }

    #[test]
    fn ungrouped_name_without_simple_mapping_uses_candidates() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_property(PropertyMapping::new("homePhone", "TEL").with_group("HOME"))
            .unwrap()
            .register_property(PropertyMapping::new("mobile", "TEL").with_group("CELL"))
            .unwrap();
        let registry = builder.build();

        let filter = LdapFilterCompiler::new(&registry, FilterMode::Strict)
            .compile_to_string(&AddressbookFilter::anyof(vec![
                PropFilter::new("TEL")
                    .with_test(FilterTest::AllOf)
                    .with_text_match(TextMatch::equals("1")),
            ]))
            .unwrap();
        assert_eq!(filter, "(&(homePhone=1)(mobile=1))");
    }

    #[test]
    fn dangling_group_is_dropped() {
        let filter = compile(&AddressbookFilter::allof(vec![
            PropFilter::new("WORK,"),
            PropFilter::new("FN").with_text_match(TextMatch::equals("A")),
        ]));
        assert_eq!(filter, "(cn=A)");
    }

    #[test_log::test]
    fn unknown_property_is_dropped_in_lenient_mode() {
        let registry = registry();
        let compilation = LdapFilterCompiler::new(&registry, FilterMode::Lenient)
            .compile(&AddressbookFilter::anyof(vec![
                PropFilter::new("X-SHOE-SIZE").with_text_match(TextMatch::equals("42")),
            ]))
            .unwrap();

        assert_eq!(compilation.predicate, None);
        assert_eq!(compilation.dropped.len(), 1);
        assert_eq!(compilation.dropped[0].reason, UnsupportedReason::UnknownProperty);
    }

    #[test]
    fn unknown_property_fails_in_strict_mode() {
        let registry = registry();
        let err = LdapFilterCompiler::new(&registry, FilterMode::Strict)
            .compile(&AddressbookFilter::anyof(vec![PropFilter::new("X-SHOE-SIZE")]))
            .unwrap_err();

        assert!(matches!(err, CompileError::UnsupportedFilterShape(u) if u.property == "X-SHOE-SIZE"));
    }

    #[test]
    fn param_filter_is_ignored_in_lenient_mode() {
        let registry = registry();
        let compilation = LdapFilterCompiler::new(&registry, FilterMode::Lenient)
            .compile(&AddressbookFilter::anyof(vec![
                PropFilter::new("EMAIL")
                    .with_param_filter(ParamFilter::new("TYPE"))
                    .with_text_match(TextMatch::equals("a@b.com")),
            ]))
            .unwrap();

        assert_eq!(compilation.predicate.as_deref(), Some("(mail=a@b.com)"));
        assert_eq!(compilation.dropped[0].reason, UnsupportedReason::ParamFilter);
    }

    #[test]
    fn param_filter_fails_in_strict_mode() {
        let registry = registry();
        let result = LdapFilterCompiler::new(&registry, FilterMode::Strict).compile(
            &AddressbookFilter::anyof(vec![
                PropFilter::new("EMAIL").with_param_filter(ParamFilter::new("TYPE")),
            ]),
        );

        assert!(matches!(
            result,
            Err(CompileError::UnsupportedFilterShape(u)) if u.reason == UnsupportedReason::ParamFilter
        ));
    }

    #[test]
    fn presence_and_absence() {
        assert_eq!(single(PropFilter::new("TITLE")), "(title=*)");
        assert_eq!(single(PropFilter::new("TITLE").not_defined()), "(!(title=*))");
        assert_eq!(
            single(PropFilter::new("WORK,TEL").not_defined()),
            "(&(&(&(&(!(homePhone=*))(!(mobile=*)))(!(telephoneNumber=*)))(!(facsimileTelephoneNumber=*)))(!(pager=*)))"
        );
    }

    #[test]
    fn negated_match_wraps_term() {
        assert_eq!(
            single(PropFilter::new("EMAIL").with_text_match(TextMatch::contains("spam").negate())),
            "(!(mail=*spam*))"
        );
    }

    #[test]
    fn conflicting_node_is_invalid() {
        let registry = registry();
        let mut prop = PropFilter::new("FN").with_text_match(TextMatch::equals("x"));
        prop.is_not_defined = true;

        let err = LdapFilterCompiler::new(&registry, FilterMode::Lenient)
            .compile(&AddressbookFilter::anyof(vec![prop]))
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilter { property, .. } if property == "FN"));
    }

    #[test]
    fn values_cannot_alter_filter_structure() {
        assert_eq!(
            single(PropFilter::new("FN").with_text_match(TextMatch::equals("*)(uid=*"))),
            "(cn=\\2a\\29\\28uid=\\2a)"
        );
        assert_eq!(escape_filter_value("a\\b\0"), "a\\5cb\\00");
    }

    #[test]
    fn empty_filter_places_no_restriction() {
        assert_eq!(compile(&AddressbookFilter::default()), "");
    }
}
