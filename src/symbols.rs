//! Ticker alias lookup.
//!
//! Maps a local EGX alias (e.g. `CIB`) to the symbol the market-data provider
//! expects (`CIB.CA`). The table is built once from configuration and shared
//! read-only; it is never mutated after startup.

use std::collections::HashMap;

/// Read-only alias table. Keys are stored upper-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMap {
    entries: HashMap<String, String>,
}

impl SymbolMap {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.as_ref().trim().to_uppercase(), v.into()))
                .collect(),
        }
    }

    /// Provider symbol for `alias`, or the alias itself when unmapped.
    pub fn resolve(&self, alias: &str) -> String {
        self.entries
            .get(&alias.trim().to_uppercase())
            .cloned()
            .unwrap_or_else(|| alias.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Built-in aliases used when the configuration does not supply any.
pub fn default_egx_aliases() -> HashMap<String, String> {
    HashMap::from([
        ("CIB".to_string(), "CIB.CA".to_string()),
        ("EGX30".to_string(), "EGX30".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_alias_case_insensitively() {
        let map = SymbolMap::new(default_egx_aliases());
        assert_eq!(map.resolve("CIB"), "CIB.CA");
        assert_eq!(map.resolve("cib"), "CIB.CA");
        assert_eq!(map.resolve("EGX30"), "EGX30");
    }

    #[test]
    fn unknown_alias_passes_through() {
        let map = SymbolMap::new(default_egx_aliases());
        assert_eq!(map.resolve("comi"), "comi");
    }

    #[test]
    fn empty_map_is_identity() {
        let map = SymbolMap::default();
        assert!(map.is_empty());
        assert_eq!(map.resolve("ETEL"), "ETEL");
    }
}
