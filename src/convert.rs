//! A serde converter that works for any [`Represent`] type.
//!
//! The converter serializes a container's representation in place of the
//! container, and rebuilds the container from a deserialized representation.
//! Every container in this crate implements `Serialize` and `Deserialize`
//! through it. Other `Represent` types can opt in field by field:
//!
//! ```
//! use bucket_multimap::{convert, HashMultiset, ListMultimap};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Inventory {
//!     #[serde(with = "convert")]
//!     items: HashMultiset<String>,
//!     #[serde(with = "convert::option", default)]
//!     history: Option<ListMultimap<String, u32>>,
//! }
//!
//! let inventory: Inventory =
//!     serde_json::from_str(r#"{"items": [["apple", 2]], "history": null}"#).unwrap();
//! assert_eq!(inventory.items.count("apple"), 2);
//! assert!(inventory.history.is_none());
//! ```

use crate::repr::Represent;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any;

/// Serializes `value` as a snapshot of its representation.
pub fn serialize<C, S>(value: &C, serializer: S) -> Result<S::Ok, S::Error>
where
    C: Represent,
    C::Rep: Serialize,
    S: Serializer,
{
    value.to_rep().serialize(serializer)
}

/// Deserializes a representation and restores it into a new, empty
/// container.
pub fn deserialize<'de, C, D>(deserializer: D) -> Result<C, D::Error>
where
    C: Represent + Default,
    C::Rep: Deserialize<'de>,
    D: Deserializer<'de>,
{
    let mut value = C::default();
    deserialize_into(deserializer, &mut value)?;
    Ok(value)
}

/// Deserializes a representation and adds it to an existing container.
///
/// If the engine cannot materialize the representation, the error is returned
/// and `target` is left untouched.
pub fn deserialize_into<'de, C, D>(deserializer: D, target: &mut C) -> Result<(), D::Error>
where
    C: Represent,
    C::Rep: Deserialize<'de>,
    D: Deserializer<'de>,
{
    let rep = <C::Rep as Deserialize<'de>>::deserialize(deserializer)?;
    debug!("restoring from {}", any::type_name::<C::Rep>());
    target.read_rep(rep);
    Ok(())
}

/// The converter for optional containers.
///
/// `None` is written as the format's absence token (`null` in JSON), and
/// reading that token yields `None`, never an empty container.
pub mod option {
    use crate::repr::Represent;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serializes `Some` as the container's representation and `None` as
    /// absence.
    pub fn serialize<C, S>(value: &Option<C>, serializer: S) -> Result<S::Ok, S::Error>
    where
        C: Represent,
        C::Rep: Serialize,
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_some(&value.to_rep()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes absence as `None`, and anything else as a restored
    /// container.
    pub fn deserialize<'de, C, D>(deserializer: D) -> Result<Option<C>, D::Error>
    where
        C: Represent + Default,
        C::Rep: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let rep = Option::<C::Rep>::deserialize(deserializer)?;
        Ok(rep.map(|rep| {
            let mut value = C::default();
            value.read_rep(rep);
            value
        }))
    }
}
