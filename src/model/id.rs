//! Typed identifiers
//!
//! Paper ids are random. Every derived artifact id is a name-based UUID
//! computed from its parent id, so re-running extraction for the same paper
//! and text reproduces identical ids.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create an id from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// The low 16 bits of the id, used for seeding
            pub fn low16(&self) -> u64 {
                (self.0.as_u128() & 0xFFFF) as u64
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a paper
    PaperId
);
uuid_id!(
    /// Identifier of a sentence within a paper
    SentenceId
);
uuid_id!(
    /// Identifier of an extracted entity node
    NodeId
);
uuid_id!(
    /// Identifier of an extracted relation edge
    EdgeId
);

impl PaperId {
    /// Create a new random PaperId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The 32-bit seed for this paper's feature generator
    pub fn seed(&self) -> u64 {
        (self.0.as_u128() % (1u128 << 32)) as u64
    }
}

impl Default for PaperId {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceId {
    /// Id of the `index`-th sentence of a paper
    pub fn derive(paper: &PaperId, index: usize) -> Self {
        Self(Uuid::new_v5(paper.as_uuid(), format!("sentence:{}", index).as_bytes()))
    }
}

impl NodeId {
    /// Id of the node extracted from a sentence
    pub fn derive(sentence: &SentenceId) -> Self {
        Self(Uuid::new_v5(sentence.as_uuid(), b"node"))
    }
}

impl EdgeId {
    /// Id of the edge whose source is `source`
    pub fn derive(source: &NodeId) -> Self {
        Self(Uuid::new_v5(source.as_uuid(), b"edge"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_ids_are_unique() {
        assert_ne!(PaperId::new(), PaperId::new());
    }

    #[test]
    fn seed_is_low_32_bits() {
        let id = PaperId::from_uuid(Uuid::from_u128(0xABCD_0000_0000_0000_0000_0001_2345_6789));
        assert_eq!(id.seed(), 0x2345_6789);
    }

    #[test]
    fn low16_masks_uuid() {
        let id = SentenceId::from_uuid(Uuid::from_u128(0x1_0000_BEEF));
        assert_eq!(id.low16(), 0xBEEF);
    }

    #[test]
    fn derived_ids_are_stable() {
        let paper = PaperId::new();
        assert_eq!(SentenceId::derive(&paper, 3), SentenceId::derive(&paper, 3));
        assert_ne!(SentenceId::derive(&paper, 3), SentenceId::derive(&paper, 4));

        let sentence = SentenceId::derive(&paper, 0);
        let node = NodeId::derive(&sentence);
        assert_eq!(node, NodeId::derive(&sentence));
        assert_eq!(EdgeId::derive(&node), EdgeId::derive(&node));
    }

    #[test]
    fn parses_from_string() {
        let id = PaperId::new();
        let parsed: PaperId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<PaperId>().is_err());
    }
}
