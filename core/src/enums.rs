//! Enum registry for the customer domain.
//!
//! # Design
//! Every enum family has an internal key (`YI`) that travels over the wire
//! and a display label (`依`) shown to users. Keys are what the server
//! understands, so serde always uses the key form and no translation happens
//! on write.
//!
//! Converting a key to its label is fail-open: an unrecognized family or key
//! comes back unchanged so rendering never breaks on a value the client does
//! not know about yet. See [`convert_to_frontend_enum`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when parsing a key that is not part of its family.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {family} key: {key:?}")]
pub struct UnknownEnumKey {
    pub family: &'static str,
    pub key: String,
}

macro_rules! registry_enum {
    (
        $(#[$meta:meta])*
        $name:ident, family = $family:literal {
            $( $variant:ident => ($key:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        ///
        /// A key the registry does not know is kept as `Unknown` and written
        /// back unchanged.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $variant, )+
            Unknown(String),
        }

        impl $name {
            pub const FAMILY: &'static str = $family;
            pub const KEYS: &'static [&'static str] = &[$($key),+];

            pub fn key(&self) -> &str {
                match self {
                    $( $name::$variant => $key, )+
                    $name::Unknown(key) => key.as_str(),
                }
            }

            /// Display label, or the raw key when it is not registered.
            pub fn label(&self) -> &str {
                match self {
                    $( $name::$variant => $label, )+
                    $name::Unknown(key) => key.as_str(),
                }
            }

            pub fn known_label(key: &str) -> Option<&'static str> {
                match key {
                    $( $key => Some($label), )+
                    _ => None,
                }
            }

            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $( $key => Some($name::$variant), )+
                    _ => None,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self::from_key(&key).unwrap_or($name::Unknown(key))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unknown(key) => key,
                    known => known.key().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }

        impl FromStr for $name {
            type Err = UnknownEnumKey;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_key(s).ok_or_else(|| UnknownEnumKey {
                    family: $family,
                    key: s.to_string(),
                })
            }
        }
    };
}

registry_enum! {
    /// Shop brand the customer belongs to.
    ShopBrand, family = "shop" {
        Yi => ("YI", "依"),
        Li => ("LI", "丽"),
        Mo => ("MO", "末"),
    }
}

registry_enum! {
    /// How the customer found the shop.
    CustomerSource, family = "source" {
        NaturalFlow => ("NATURAL_FLOW", "自然流量"),
        Recommended => ("RECOMMENDED", "推荐"),
    }
}

registry_enum! {
    CustomerType, family = "customer_type" {
        New => ("NEW", "新客户"),
        Old => ("OLD", "老客户"),
        OldChangedId => ("OLD_CHANGED_ID", "换号"),
    }
}

registry_enum! {
    /// Sales pipeline stage.
    CustomerStatus, family = "customer_status" {
        Consulting => ("CONSULTING", "咨询中"),
        Sample => ("SAMPLE", "样品"),
        PreparingOrder => ("PREPARING_ORDER", "准备下单"),
        Dead => ("DEAD", "死了"),
    }
}

/// The four enum families known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumFamily {
    Shop,
    Source,
    CustomerType,
    CustomerStatus,
}

impl EnumFamily {
    pub const ALL: [EnumFamily; 4] = [
        EnumFamily::Shop,
        EnumFamily::Source,
        EnumFamily::CustomerType,
        EnumFamily::CustomerStatus,
    ];

    /// Accepts the snake_case field name as well as the camelCase form
    /// used by display code.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "shop" => Some(EnumFamily::Shop),
            "source" => Some(EnumFamily::Source),
            "customer_type" | "customerType" => Some(EnumFamily::CustomerType),
            "customer_status" | "customerStatus" => Some(EnumFamily::CustomerStatus),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            EnumFamily::Shop => ShopBrand::FAMILY,
            EnumFamily::Source => CustomerSource::FAMILY,
            EnumFamily::CustomerType => CustomerType::FAMILY,
            EnumFamily::CustomerStatus => CustomerStatus::FAMILY,
        }
    }

    /// Valid internal keys, in declaration order.
    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            EnumFamily::Shop => ShopBrand::KEYS,
            EnumFamily::Source => CustomerSource::KEYS,
            EnumFamily::CustomerType => CustomerType::KEYS,
            EnumFamily::CustomerStatus => CustomerStatus::KEYS,
        }
    }

    pub fn label_for(self, key: &str) -> Option<&'static str> {
        match self {
            EnumFamily::Shop => ShopBrand::known_label(key),
            EnumFamily::Source => CustomerSource::known_label(key),
            EnumFamily::CustomerType => CustomerType::known_label(key),
            EnumFamily::CustomerStatus => CustomerStatus::known_label(key),
        }
    }
}

impl fmt::Display for EnumFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map an internal key to its display label.
///
/// Fail-open: when either `family` or `key` is not recognized the key is
/// returned unchanged, so callers can render whatever the server sent.
pub fn convert_to_frontend_enum<'a>(family: &str, key: &'a str) -> &'a str {
    EnumFamily::from_name(family)
        .and_then(|family| family.label_for(key))
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_key_converts_to_label() {
        assert_eq!(convert_to_frontend_enum("shop", "YI"), "依");
        assert_eq!(convert_to_frontend_enum("source", "RECOMMENDED"), "推荐");
        assert_eq!(convert_to_frontend_enum("customerType", "OLD_CHANGED_ID"), "换号");
        assert_eq!(convert_to_frontend_enum("customer_status", "DEAD"), "死了");
    }

    #[test]
    fn unknown_key_passes_through() {
        assert_eq!(convert_to_frontend_enum("shop", "UNKNOWN"), "UNKNOWN");
        assert_eq!(convert_to_frontend_enum("shop", ""), "");
    }

    #[test]
    fn unknown_family_passes_through() {
        assert_eq!(convert_to_frontend_enum("colour", "YI"), "YI");
    }

    #[test]
    fn key_lookup_is_case_sensitive() {
        assert_eq!(convert_to_frontend_enum("shop", "yi"), "yi");
    }

    #[test]
    fn keys_and_labels_are_one_to_one() {
        for family in EnumFamily::ALL {
            let labels: Vec<_> = family
                .keys()
                .iter()
                .map(|key| family.label_for(key).unwrap())
                .collect();
            let mut unique = labels.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), labels.len(), "{family}: duplicate label");
        }
    }

    #[test]
    fn family_sizes() {
        assert_eq!(EnumFamily::Shop.keys().len(), 3);
        assert_eq!(EnumFamily::Source.keys().len(), 2);
        assert_eq!(EnumFamily::CustomerType.keys().len(), 3);
        assert_eq!(EnumFamily::CustomerStatus.keys().len(), 4);
    }

    #[test]
    fn serde_uses_key_form() {
        let json = serde_json::to_string(&CustomerStatus::PreparingOrder).unwrap();
        assert_eq!(json, r#""PREPARING_ORDER""#);
        let back: ShopBrand = serde_json::from_str(r#""MO""#).unwrap();
        assert_eq!(back, ShopBrand::Mo);
    }

    #[test]
    fn serde_keeps_unknown_keys() {
        let changed: CustomerType = serde_json::from_str(r#""CHANGED_NUMBER""#).unwrap();
        assert_eq!(changed, CustomerType::Unknown("CHANGED_NUMBER".to_string()));
        assert!(!changed.is_known());
        assert_eq!(changed.label(), "CHANGED_NUMBER");
        assert_eq!(serde_json::to_string(&changed).unwrap(), r#""CHANGED_NUMBER""#);

        // A label is not a key.
        let label: ShopBrand = serde_json::from_str(r#""依""#).unwrap();
        assert_eq!(label, ShopBrand::Unknown("依".to_string()));
    }

    #[test]
    fn from_str_reports_family() {
        let err = "LATER".parse::<CustomerStatus>().unwrap_err();
        assert_eq!(err.family, "customer_status");
        assert_eq!(err.key, "LATER");
        assert_eq!("NEW".parse::<CustomerType>().unwrap(), CustomerType::New);
    }

    #[test]
    fn display_prints_key() {
        assert_eq!(CustomerSource::NaturalFlow.to_string(), "NATURAL_FLOW");
        assert_eq!(EnumFamily::CustomerType.to_string(), "customer_type");
    }
}
