//! Deterministic query-string encoding for list-endpoint filters.
//!
//! The FleetCloud list endpoints accept an equality filter expressed as two
//! reserved query parameters: `filter=<fieldName>&eq=<value>`. This module
//! encodes any key/value parameter set into a reproducible query string:
//! keys are traversed in sorted order (the map is a `BTreeMap`), so the
//! same parameters always produce byte-identical output.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// An unordered set of query parameters, encoded in sorted-key order.
///
/// Values are opaque strings: they are percent-escaped on output but never
/// otherwise reinterpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the equality-filter pair used by every list endpoint:
    /// `filter=<field>&eq=<value>`.
    pub fn eq_filter(field: &str, value: &str) -> Self {
        let mut params = Self::new();
        params.set("filter", field);
        params.set("eq", value);
        params
    }

    /// Sets a parameter, replacing any previous value for the same key.
    pub fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// Returns `true` if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the parameters as a query string without the leading `?`.
    ///
    /// Pairs are emitted in sorted key order and escaped per the
    /// `application/x-www-form-urlencoded` rules (space encodes as `+`).
    /// An empty parameter set encodes to the empty string; the caller is
    /// responsible for omitting the `?` separator in that case.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}
