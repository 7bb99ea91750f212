//! Converting containers to and from a plain external representation.
//!
//! Every container in this crate declares a representation type: a plain
//! value (a map, or a list of pairs) that a serialization engine already knows
//! how to walk. The contract has two tiers:
//!
//! * [`Represent`] is the typed tier. Each container implements it against
//!   its own representation type.
//! * [`DynRepresent`] is the untyped tier. It is implemented for every
//!   `Represent` type and is object safe, so a single piece of code can
//!   convert any container without knowing its concrete type.
//!
//! With the `serde` feature, [`convert`](crate::convert) builds a generic
//! serde converter on top of the typed tier. With the `json` feature,
//! [`JsonRepresent`] bridges the untyped tier to [`serde_json::Value`]
//! documents.

use crate::errors::RepMismatch;
use log::debug;
use std::any::{self, Any, TypeId};
use std::fmt;

/// The representation type a container declares.
#[derive(Clone, Copy, Debug)]
pub struct RepType {
    id: TypeId,
    name: &'static str,
}

impl RepType {
    /// Returns the descriptor of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        RepType {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the representation type.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the name of the representation type, for diagnostics.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if `value` is of this representation type.
    pub fn matches(&self, value: &dyn Any) -> bool {
        value.type_id() == self.id
    }
}

impl PartialEq for RepType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RepType {}

impl fmt::Display for RepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The typed tier: a container that converts itself to and from a value of a
/// fixed representation type.
///
/// # Examples
///
/// ```
/// use bucket_multimap::{HashMultiset, Represent};
///
/// let mut set: HashMultiset<&str> = ["x", "x", "y"].into_iter().collect();
///
/// let mut rep = set.to_rep();
/// rep.sort();
/// assert_eq!(rep, vec![("x", 2), ("y", 1)]);
///
/// let mut restored = HashMultiset::new();
/// restored.read_rep(rep);
/// assert_eq!(restored, set);
/// ```
pub trait Represent {
    /// The plain type this container converts to. Fixed per container type.
    type Rep: 'static;

    /// Returns a snapshot of the current contents. Changing the snapshot
    /// afterwards does not affect `self`.
    fn to_rep(&self) -> Self::Rep;

    /// Adds the contents of `rep` to `self`, going through the same insertion
    /// paths as direct mutation. Empty buckets and zero counts in `rep` are
    /// dropped.
    fn read_rep(&mut self, rep: Self::Rep);

    /// Returns the descriptor of [`Self::Rep`].
    fn rep_type() -> RepType
    where
        Self: Sized,
    {
        RepType::of::<Self::Rep>()
    }
}

/// The untyped tier of [`Represent`], usable through a trait object.
///
/// This is implemented for every `Represent` type. It is the entry point for
/// code that holds containers of different types side by side, such as
/// [`JsonRepresent`], which restores documents through
/// [`read_rep_any`](Self::read_rep_any). The serde converter in
/// [`convert`](crate::convert) is generic and uses the typed tier directly.
///
/// # Examples
///
/// ```
/// use bucket_multimap::{DynRepresent, HashMultimap, ListMultimap};
///
/// let mut words = HashMultimap::new();
/// words.insert("fruit", "apple");
/// let mut log = ListMultimap::new();
/// log.insert("day", 1);
///
/// let containers: Vec<&dyn DynRepresent> = vec![&words, &log];
/// for container in containers {
///     let rep = container.to_rep_any();
///     assert!(container.rep_type().matches(&*rep));
/// }
///
/// // Handing a value of the wrong type is an error, and changes nothing.
/// let error = log.read_rep_any(Box::new("not a map")).unwrap_err();
/// assert!(error.expected().contains("Vec"));
/// assert_eq!(log.get("day"), &[1]);
/// ```
pub trait DynRepresent {
    /// Returns the representation type of this container.
    fn rep_type(&self) -> RepType;

    /// Returns a snapshot of the current contents, as a boxed value of the
    /// type named by [`rep_type`](Self::rep_type).
    fn to_rep_any(&self) -> Box<dyn Any>;

    /// Restores contents from a boxed value of the representation type.
    ///
    /// Fails without touching `self` if `rep` is of any other type.
    fn read_rep_any(&mut self, rep: Box<dyn Any>) -> Result<(), RepMismatch>;
}

impl<C: Represent> DynRepresent for C {
    fn rep_type(&self) -> RepType {
        <C as Represent>::rep_type()
    }

    fn to_rep_any(&self) -> Box<dyn Any> {
        Box::new(self.to_rep())
    }

    fn read_rep_any(&mut self, rep: Box<dyn Any>) -> Result<(), RepMismatch> {
        match rep.downcast::<C::Rep>() {
            Ok(rep) => {
                debug!("restoring from {}", any::type_name::<C::Rep>());
                self.read_rep(*rep);
                Ok(())
            }
            Err(_) => {
                debug!(
                    "rejected representation: expected {}",
                    any::type_name::<C::Rep>()
                );
                Err(RepMismatch::new(any::type_name::<C::Rep>()))
            }
        }
    }
}

#[cfg(feature = "json")]
pub use self::json::JsonRepresent;

#[cfg(feature = "json")]
mod json {
    use super::{DynRepresent, Represent};
    use crate::errors::{ConvertError, RepMismatch};
    use log::debug;
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use serde_json::Value;
    use std::any;

    /// The untyped tier bridged to [`serde_json::Value`] documents.
    ///
    /// This is implemented for every [`Represent`] type whose representation
    /// can be serialized. A `null` document is absence, which only the owner
    /// of an `Option` can express; reading it into an instance is a
    /// [`RepMismatch`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_multimap::{HashMultiset, JsonRepresent, ListMultimap};
    /// use serde_json::json;
    ///
    /// let mut set: HashMultiset<String> = HashMultiset::new();
    /// let mut lists: ListMultimap<String, u32> = ListMultimap::new();
    ///
    /// let targets: [&mut dyn JsonRepresent; 2] = [&mut set, &mut lists];
    /// let documents = [json!([["x", 3]]), json!({"k": [1, 2, 2]})];
    /// for (target, document) in targets.into_iter().zip(documents) {
    ///     target.read_json(document).unwrap();
    /// }
    ///
    /// assert_eq!(set.count("x"), 3);
    /// assert_eq!(lists.get("k"), &[1, 2, 2]);
    /// ```
    pub trait JsonRepresent: DynRepresent {
        /// Encodes a snapshot of the current contents as a document.
        fn to_json(&self) -> Result<Value, ConvertError>;

        /// Materializes the representation from `document` and restores it.
        fn read_json(&mut self, document: Value) -> Result<(), ConvertError>;
    }

    impl<C> JsonRepresent for C
    where
        C: Represent,
        C::Rep: Serialize + DeserializeOwned,
    {
        fn to_json(&self) -> Result<Value, ConvertError> {
            Ok(serde_json::to_value(self.to_rep())?)
        }

        fn read_json(&mut self, document: Value) -> Result<(), ConvertError> {
            if document.is_null() {
                debug!("null document for {}", any::type_name::<C::Rep>());
                return Err(RepMismatch::new(any::type_name::<C::Rep>())
                    .with_found("null")
                    .into());
            }

            let rep = serde_json::from_value::<C::Rep>(document)?;
            self.read_rep_any(Box::new(rep))?;
            Ok(())
        }
    }
}
