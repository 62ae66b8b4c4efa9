//! Canonical serialization for the four persisted record shapes.
//!
//! `postcard` encodes struct fields positionally with no padding, map
//! reordering, or self-description, so two values with identical field
//! contents always produce byte-identical output, the property
//! MAC-then-encrypt and sign-then-chunk both depend on.

use crate::error::CoreError;
use serde::{de::DeserializeOwned, Serialize};

pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CoreError> {
    Ok(postcard::to_allocvec(value)?)
}

pub fn from_canonical_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CoreError> {
    Ok(postcard::from_bytes(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
    struct Sample {
        a: String,
        b: Vec<u8>,
        c: u32,
    }

    #[test]
    fn identical_values_serialize_identically() {
        let s1 = Sample { a: "hello".into(), b: vec![1, 2, 3], c: 42 };
        let s2 = s1.clone();
        assert_eq!(to_canonical_bytes(&s1).unwrap(), to_canonical_bytes(&s2).unwrap());
    }

    #[test]
    fn round_trips() {
        let s = Sample { a: "hello".into(), b: vec![1, 2, 3], c: 42 };
        let bytes = to_canonical_bytes(&s).unwrap();
        let back: Sample = from_canonical_bytes(&bytes).unwrap();
        assert_eq!(s, back);
    }
}
