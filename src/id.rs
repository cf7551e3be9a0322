//! Code for handling IDs
use anyhow::{Context, Result};
use indexmap::IndexSet;
use std::borrow::Borrow;
use std::fmt::Display;
use std::hash::Hash;

/// A trait alias for ID types
pub trait IDLike:
    Eq + Hash + Borrow<str> + Clone + Display + From<String> + for<'a> From<&'a str>
{
}
impl<T> IDLike for T where
    T: Eq + Hash + Borrow<str> + Clone + Display + From<String> + for<'a> From<&'a str>
{
}

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(Clone, std::hash::Hash, PartialEq, Eq, PartialOrd, Ord, Debug, serde::Serialize)]
        /// An ID type (e.g. `AeoRegionID`, `FuelID`, etc.)
        pub struct $name(pub std::rc::Rc<str>);

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let id: String = serde::Deserialize::deserialize(deserializer)?;
                let id = id.trim();
                if id.is_empty() {
                    return Err(serde::de::Error::custom("IDs cannot be empty"));
                }

                Ok(id.into())
            }
        }

        impl $name {
            /// Create a new ID from a string slice
            pub fn new(id: &str) -> Self {
                $name(std::rc::Rc::from(id))
            }

            /// Get the ID as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}
pub(crate) use define_id_type;

/// A data structure containing a set of IDs
pub trait IDCollection<ID: IDLike> {
    /// Get the ID from the collection by its string representation.
    ///
    /// # Arguments
    ///
    /// * `id` - The string representation of the ID
    ///
    /// # Returns
    ///
    /// A copy of the ID in `self`, or an error if not found.
    fn get_id(&self, id: &str) -> Result<&ID>;
}

impl<ID: IDLike> IDCollection<ID> for IndexSet<ID> {
    fn get_id(&self, id: &str) -> Result<&ID> {
        self.get(id).with_context(|| format!("Unknown ID {id} found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;

    define_id_type! {TestID}

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        id: TestID,
    }

    #[rstest]
    #[case("pacific")]
    #[case(" pacific ")]
    fn deserialise_id_valid(#[case] id: &str) {
        let toml = format!("id = \"{id}\"");
        let record: Record = toml::from_str(&toml).unwrap();
        assert_eq!(record.id, "pacific".into());
    }

    #[test]
    fn deserialise_id_empty() {
        assert!(toml::from_str::<Record>("id = \"  \"").is_err());
    }

    #[test]
    fn get_id_works() {
        let ids: IndexSet<TestID> = ["a".into(), "b".into()].into_iter().collect();
        assert_eq!(ids.get_id("b").unwrap(), &TestID::new("b"));
        assert!(ids.get_id("c").is_err());
    }
}
