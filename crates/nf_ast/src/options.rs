use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Caller-supplied conversion options. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Identifier substitutions, flat or scoped by declaring module.
    pub map: Option<SubstitutionTable>,
    /// Identifier prefix to directory table.
    pub paths: Option<BTreeMap<String, String>>,
    /// Directory stripped from resolved bare identifiers. Defaults to the cwd.
    pub base_dir: Option<PathBuf>,
    /// Directory relative identifiers are re-derived against. Defaults to `base_dir`.
    pub rel_dir: Option<PathBuf>,
    /// Declaring module id used for scoped lookups when the call has no id literal.
    pub module_id: Option<String>,
}

/// One value of the `map` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapEntry {
    /// `"foo": "bar"`
    Id(String),
    /// `"app/main": { "foo": "bar" }`, or the wildcard scope `"*"`.
    Scope(BTreeMap<String, String>),
}

/// The `map` option as a single JSON object.
///
/// Scoped entries are consulted ahead of flat ones: the declaring module's
/// scope, then the `*` scope, then the flat entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstitutionTable(BTreeMap<String, MapEntry>);

impl SubstitutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.0.insert(from.into(), MapEntry::Id(to.into()));
    }

    pub fn insert_scoped(
        &mut self,
        scope: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) {
        let entry = self
            .0
            .entry(scope.into())
            .or_insert_with(|| MapEntry::Scope(BTreeMap::new()));
        if matches!(*entry, MapEntry::Id(_)) {
            *entry = MapEntry::Scope(BTreeMap::new());
        }
        if let MapEntry::Scope(table) = entry {
            table.insert(from.into(), to.into());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find the substitute for `id` as seen from `module_id`.
    pub fn lookup(&self, module_id: Option<&str>, id: &str) -> Option<&str> {
        let scopes = module_id.into_iter().chain(std::iter::once("*"));
        for scope in scopes {
            if let Some(MapEntry::Scope(table)) = self.0.get(scope) {
                if let Some(to) = table.get(id) {
                    return Some(to.as_str());
                }
            }
        }
        match self.0.get(id) {
            Some(MapEntry::Id(to)) => Some(to.as_str()),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubstitutionTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (from, to) in iter {
            table.insert(from, to);
        }
        table
    }
}
