use crate::models::{Country, Person};

/// Every shape the cache is allowed to hold
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Text(String),
    Country(Country),
    Person(Person),
    Countries(Vec<Country>),
    Persons(Vec<Person>),
}

/// Conversion between a domain value and its cached representation.
///
/// `from_cached` returns `None` when the stored value has another shape, so a
/// key read back with the wrong type behaves like a miss.
pub trait Cacheable: Sized {
    fn into_cached(self) -> CachedValue;
    fn from_cached(value: &CachedValue) -> Option<Self>;
}

macro_rules! impl_cacheable {
    ($ty:ty, $variant:ident) => {
        impl Cacheable for $ty {
            fn into_cached(self) -> CachedValue {
                CachedValue::$variant(self)
            }

            fn from_cached(value: &CachedValue) -> Option<Self> {
                if let CachedValue::$variant(inner) = value {
                    Some(inner.clone())
                } else {
                    None
                }
            }
        }
    };
}

impl_cacheable!(String, Text);
impl_cacheable!(Country, Country);
impl_cacheable!(Person, Person);
impl_cacheable!(Vec<Country>, Countries);
impl_cacheable!(Vec<Person>, Persons);
