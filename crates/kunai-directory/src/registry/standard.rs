//! Stock table for `inetOrgPerson` directories with calendar resource
//! extensions.

use kunai_rfc::rfc::vcard::VCardKind;
use kunai_rfc::rfc::vcard::core::types;
use kunai_rfc::rfc::vcard::names;

use super::mapping::PropertyMapping;
use super::{PropertyAttributeRegistry, RegistryBuilder};
use crate::error::RegistryResult;

const OBJECT_CLASSES: &[&str] = &["top", "person", "organizationalPerson", "inetOrgPerson"];

const SIMPLE: &[(&str, &str)] = &[
    ("displayName", names::NICKNAME),
    ("mail", names::EMAIL),
    ("description", names::NOTE),
];

const TELEPHONES: &[(&str, &str, &str)] = &[
    ("homePhone", types::HOME, types::VOICE),
    ("mobile", types::HOME, types::CELL),
    ("telephoneNumber", types::WORK, types::VOICE),
    ("facsimileTelephoneNumber", types::WORK, types::FAX),
    ("pager", types::WORK, types::PAGER),
];

const CALENDAR: &[(&str, &str)] = &[
    ("IM", names::IMPP),
    ("title", names::TITLE),
    ("calCAPURI", names::CAPURI),
    ("calCalAdrURI", names::CALADRURI),
];

/// Resource scheduling properties (RFC 6715).
const RESOURCE: &[(&str, &str)] = &[
    ("AccessabilityURL", "ACCESSABILITYINFO"),
    ("AdmittanceURL", "ADMISSIONINFO"),
    ("ApprovalInfoURL", "APPROVALINFO"),
    ("Autoaccept", "AUTOACCEPT"),
    ("BookingWindowEnd", "BOOKINGEND"),
    ("BookingWindowStart", "BOOKINGSTART"),
    ("Capacity", "CAPACITY"),
    ("CostURL", "COSTINFO"),
    ("Free", "FREE"),
    ("InventoryList", "INVENTORYLIST"),
    ("InventoryURL", "INVENTORYURL"),
    ("MaxInstances", "MAXINSTANCES"),
    ("Multiplebookings", "MULTIBOOK"),
    ("ResourceManager", "RESOURCEMANAGERINFO"),
    ("owner", "RESOURCEOWNERINFO"),
    ("Restricted", "RESTRICTEDACCESS"),
    ("SchedAdmin", "SCHEDADMININFO"),
];

const EXTRA_ATTRIBUTES: &[&str] = &[
    "sn",
    "givenName",
    "displayName",
    "createTimestamp",
    "modifyTimestamp",
    "o",
    "objectClass",
    "org",
    "ou",
    "uid",
    "employeeNumber",
    "uniqueMember",
    "entryUUID",
];

impl PropertyAttributeRegistry {
    /// ## Summary
    /// Builds the stock directory table.
    ///
    /// ## Errors
    /// Never fails for the shipped table; errors are propagated from the
    /// builder so extensions of this function keep the same contract.
    pub fn standard() -> RegistryResult<Self> {
        let mut builder = RegistryBuilder::new();
        populate_standard(&mut builder)?;
        Ok(builder.build())
    }
}

/// Adds the stock mappings to `builder`.
///
/// ## Errors
/// Fails when `builder` already holds a conflicting mapping.
pub fn populate_standard(builder: &mut RegistryBuilder) -> RegistryResult<()> {
    for class in OBJECT_CLASSES {
        builder.register_value("objectClass", *class)?;
    }

    builder
        .register_property(PropertyMapping::new("cn", names::FN).required())?
        .register_property(PropertyMapping::new("source", names::UID).required())?
        .register_property(PropertyMapping::new("CalResourceKind", names::KIND))?;

    for (attr, prop) in SIMPLE {
        builder.register_property(PropertyMapping::new(*attr, *prop))?;
    }

    for (attr, group, kind) in TELEPHONES {
        builder.register_property(
            PropertyMapping::new(*attr, names::TEL)
                .with_group(group.to_ascii_uppercase())
                .with_param("TYPE", *kind),
        )?;
    }

    for (attr, prop) in CALENDAR {
        builder.register_property(PropertyMapping::new(*attr, *prop))?;
    }

    for (attr, prop) in RESOURCE {
        builder.register_property(
            PropertyMapping::new(*attr, *prop).for_kinds([VCardKind::Location, VCardKind::Thing]),
        )?;
    }

    builder.register_property(
        PropertyMapping::new("member", names::MEMBER).for_kinds([VCardKind::Group]),
    )?;

    for attr in EXTRA_ATTRIBUTES {
        builder.add_default_attribute(*attr)?;
    }

    Ok(())
}
