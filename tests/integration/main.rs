mod list_multimap;
mod multimap;
mod multiset;
mod multitable;
#[cfg(feature = "json")]
mod repr;
