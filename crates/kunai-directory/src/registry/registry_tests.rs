//! Unit tests for the attribute registry.

#[cfg(test)]
mod tests {
    use kunai_rfc::rfc::vcard::VCardKind;

    use crate::error::RegistryError;
    use crate::registry::{PropertyAttributeRegistry, PropertyMapping, RegistryBuilder};

    fn telephone_registry() -> PropertyAttributeRegistry {
        let mut builder = RegistryBuilder::new();
        builder
            .register_property(PropertyMapping::new("homePhone", "TEL").with_group("HOME"))
            .unwrap()
            .register_property(
                PropertyMapping::new("mobile", "TEL")
                    .with_group("HOME")
                    .with_param("TYPE", "cell"),
            )
            .unwrap()
            .register_property(PropertyMapping::new("telephoneNumber", "TEL"))
            .unwrap()
            .register_property(PropertyMapping::new("otherPhone", "tel"))
            .unwrap();
        builder.build()
    }

    #[test_log::test]
    fn simple_lookup_prefers_first_ungrouped_mapping() {
        let registry = telephone_registry();

        assert_eq!(
            registry.lookup_attribute_for_simple_property("tel"),
            Some("telephoneNumber")
        );
        assert_eq!(registry.lookup_attribute_for_simple_property("EMAIL"), None);
    }

    #[test]
    fn candidate_lookup_is_ordered_and_deduplicated() {
        let registry = telephone_registry();

        assert_eq!(
            registry.lookup_attributes_for_property("TEL"),
            vec!["homePhone", "mobile", "telephoneNumber", "otherPhone"]
        );
        assert!(registry.lookup_attributes_for_property("X-NOPE").is_empty());
    }

    #[test]
    fn literal_mappings_are_normalized_on_registration() {
        let literal = |attribute: &str, property: &str, group: Option<&str>| PropertyMapping {
            attribute_id: attribute.to_owned(),
            group: group.map(str::to_owned),
            property_name: property.to_owned(),
            param_name: None,
            param_value: None,
            required: false,
            kinds: Vec::new(),
        };

        let mut builder = RegistryBuilder::new();
        builder
            .register_property(literal("CalResourceKind", "kind", None))
            .unwrap()
            .register_property(literal("mail", "email", None))
            .unwrap()
            .register_property(literal("homePhone", "tel", Some("home")))
            .unwrap();
        let registry = builder.build();

        assert_eq!(
            registry.kind_mapping().map(|m| m.attribute_id.as_str()),
            Some("CalResourceKind")
        );
        assert_eq!(
            registry.lookup_attribute_for_simple_property("EMAIL"),
            Some("mail")
        );
        assert_eq!(
            registry.lookup_attributes_for_property("TEL"),
            vec!["homePhone"]
        );
        let phone = registry
            .property_mappings()
            .find(|m| m.attribute_id == "homePhone")
            .unwrap();
        assert_eq!(phone.group.as_deref(), Some("HOME"));
        assert_eq!(phone.property_name, "TEL");
    }

    #[test]
    fn same_attribute_may_serve_distinct_variants() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_property(PropertyMapping::new("phone", "TEL").with_param("TYPE", "voice"))
            .unwrap()
            .register_property(PropertyMapping::new("phone", "TEL").with_param("TYPE", "fax"))
            .unwrap();
        let registry = builder.build();

        assert_eq!(registry.lookup_attributes_for_property("TEL"), vec!["phone"]);
        assert_eq!(registry.default_attributes(), ["phone"]);
    }

    #[test]
    fn duplicate_variant_is_rejected() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_property(PropertyMapping::new("mail", "EMAIL"))
            .unwrap();

        let err = builder
            .register_property(PropertyMapping::new("MAIL", "X-MAIL"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateMapping {
                attribute: "MAIL".to_owned(),
                property: "EMAIL".to_owned(),
            }
        );
    }

    #[test]
    fn second_kind_mapping_is_rejected() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_property(PropertyMapping::new("CalResourceKind", "KIND"))
            .unwrap();

        let err = builder
            .register_property(PropertyMapping::new("entryKind", "kind"))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateKindMapping { existing, .. } if existing == "CalResourceKind"
        ));

        let registry = builder.build();
        assert_eq!(
            registry.kind_mapping().map(|m| m.attribute_id.as_str()),
            Some("CalResourceKind")
        );
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        let mut builder = RegistryBuilder::new();
        assert_eq!(
            builder
                .register_property(PropertyMapping::new(" ", "FN"))
                .unwrap_err(),
            RegistryError::EmptyAttributeId
        );
        assert!(matches!(
            builder
                .register_property(PropertyMapping::new("cn", ""))
                .unwrap_err(),
            RegistryError::EmptyPropertyName { .. }
        ));
        assert!(builder.add_default_attribute("").is_err());
        assert!(builder.register_value("", "top").is_err());
    }

    #[test]
    fn duplicate_value_stamp_is_rejected() {
        let mut builder = RegistryBuilder::new();
        builder.register_value("objectClass", "top").unwrap();
        builder.register_value("objectClass", "person").unwrap();

        assert!(matches!(
            builder.register_value("objectclass", "TOP").unwrap_err(),
            RegistryError::DuplicateValue { .. }
        ));
        assert_eq!(builder.build().value_mappings().count(), 2);
    }

    #[test]
    fn fetch_attributes_append_unseen_extras() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_property(PropertyMapping::new("cn", "FN"))
            .unwrap()
            .add_default_attribute("sn")
            .unwrap()
            .add_default_attribute("CN")
            .unwrap();
        let registry = builder.build();

        assert_eq!(registry.default_attributes(), ["cn", "sn"]);
        assert_eq!(
            registry.fetch_attributes(&["jpegPhoto".to_owned(), "SN".to_owned()]),
            vec!["cn", "sn", "jpegPhoto"]
        );
    }

    #[test]
    fn schema_classes_map_to_kinds() {
        let registry = RegistryBuilder::new().build();

        assert_eq!(
            registry.kind_for_schema_class("INETORGPERSON"),
            Some(VCardKind::Individual)
        );
        assert_eq!(
            registry.kind_for_schema_class("groupOfUniqueNames"),
            Some(VCardKind::Group)
        );
        assert_eq!(registry.kind_for_schema_class("device"), None);
    }

    #[test_log::test]
    fn standard_table_builds() {
        let registry = PropertyAttributeRegistry::standard().unwrap();

        assert_eq!(registry.lookup_attribute_for_simple_property("FN"), Some("cn"));
        assert_eq!(registry.lookup_attribute_for_simple_property("EMAIL"), Some("mail"));
        assert_eq!(registry.lookup_attribute_for_simple_property("TEL"), None);
        assert_eq!(
            registry.lookup_attributes_for_property("TEL"),
            vec![
                "homePhone",
                "mobile",
                "telephoneNumber",
                "facsimileTelephoneNumber",
                "pager"
            ]
        );
        assert_eq!(
            registry.kind_mapping().map(|m| m.attribute_id.as_str()),
            Some("CalResourceKind")
        );
        assert_eq!(registry.value_mappings().count(), 4);

        let required: Vec<_> = registry
            .property_mappings()
            .filter(|m| m.required)
            .map(|m| m.attribute_id.as_str())
            .collect();
        assert_eq!(required, vec!["cn", "source"]);

        let defaults = registry.default_attributes();
        assert_eq!(defaults[0], "cn");
        assert!(defaults.iter().any(|a| a == "createTimestamp"));
        assert_eq!(
            defaults.iter().filter(|a| a.as_str() == "displayName").count(),
            1
        );
    }

    #[test]
    fn resource_mappings_apply_only_to_resources() {
        let registry = PropertyAttributeRegistry::standard().unwrap();
        let capacity = registry
            .property_mappings()
            .find(|m| m.property_name == "CAPACITY")
            .unwrap();

        assert!(capacity.applies_to(&VCardKind::Location));
        assert!(capacity.applies_to(&VCardKind::Thing));
        assert!(!capacity.applies_to(&VCardKind::Individual));

        let individual = VCardKind::Individual;
        assert!(
            registry
                .property_mappings_for_kind(&individual)
                .all(|m| m.property_name != "MEMBER")
        );
    }
}
