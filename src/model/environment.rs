use std::collections::BTreeMap;

use serde::Deserialize;

use crate::merge::{merge_map, Mergeable};

/// User-declared properties.
///
/// `properties` come from configuration; `sourced_properties` are read from a
/// variables file by the loader and are never part of a fragment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvironmentSection {
    pub properties: BTreeMap<String, String>,
    #[serde(skip)]
    pub sourced_properties: BTreeMap<String, String>,
}

impl Mergeable for EnvironmentSection {
    fn merge(&mut self, source: &Self) {
        merge_map(&mut self.properties, &source.properties);
        merge_map(&mut self.sourced_properties, &source.sourced_properties);
    }
}
