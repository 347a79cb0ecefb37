//! Type-safe identifier wrappers around [`String`].
//!
//! Pillar and satellite identifiers arrive from the data layer as opaque
//! strings. Wrapping them prevents a pillar id from being looked up in a
//! satellite map (and vice versa) at compile time.
//!
//! Satellite ids double as the seed of the deterministic orbital jitter,
//! see [`SatelliteId::char_code_sum`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::NodeKind;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Sum of the UTF-16 code units of the identifier.
            ///
            /// This is the hash that seeds the orbital jitter. UTF-16 units
            /// are summed (not bytes or scalar values) so that ids produce
            /// the same hash the web client computes with `charCodeAt`.
            pub fn char_code_sum(&self) -> u64 {
                self.0
                    .encode_utf16()
                    .fold(0_u64, |acc, unit| acc.wrapping_add(u64::from(unit)))
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

define_id! {
    /// Unique identifier for a skill pillar.
    PillarId
}

define_id! {
    /// Unique identifier for a quest/achievement satellite.
    SatelliteId
}

/// Identifier of any node the user can hover, focus, or select.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NodeId {
    /// A pillar node.
    Pillar(PillarId),
    /// A satellite node.
    Satellite(SatelliteId),
}

impl NodeId {
    /// Which kind of node this id names.
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Pillar(_) => NodeKind::Pillar,
            Self::Satellite(_) => NodeKind::Satellite,
        }
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pillar(id) => write!(f, "pillar:{id}"),
            Self::Satellite(id) => write!(f, "satellite:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_code_sum_matches_ascii_codes() {
        // 'a' = 97, 'b' = 98, 'c' = 99
        assert_eq!(SatelliteId::new("abc").char_code_sum(), 294);
    }

    #[test]
    fn char_code_sum_of_empty_id_is_zero() {
        assert_eq!(SatelliteId::new("").char_code_sum(), 0);
    }

    #[test]
    fn char_code_sum_uses_utf16_units() {
        // U+1F680 is a surrogate pair: 0xD83D + 0xDE80.
        let id = SatelliteId::new("\u{1F680}");
        assert_eq!(id.char_code_sum(), 0xD83D + 0xDE80);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = PillarId::new("pillar_2");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"pillar_2\"");
    }

    #[test]
    fn node_id_serializes_with_kind_tag() {
        let node = NodeId::Satellite(SatelliteId::new("q1"));
        let json = serde_json::to_value(&node).unwrap_or_default();
        assert_eq!(json["kind"], "satellite");
        assert_eq!(json["id"], "q1");
    }

    #[test]
    fn display_is_the_raw_id() {
        assert_eq!(PillarId::new("mind").to_string(), "mind");
        assert_eq!(NodeId::Pillar(PillarId::new("mind")).to_string(), "pillar:mind");
    }
}
