//! Validated element configuration.
//!
//! Every key an element needs is read and checked here, once, before any
//! group reaches the host model. Sources are a flat [`ParameterMap`] built in
//! code or a TOML file flattened into one.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use rcbar_core::params::LIST_SEPARATOR;
use rcbar_core::{ParameterMap, RcbarError, Result};
use rcbar_profile::{ProfileBuilder, ProfileFamily, ProfileModel, ProfileParams};

use crate::kind::{GroupKind, WallGroup};
use crate::settings::GroupSettings;
use crate::synth::wing;

pub const DEFAULT_COVER: f64 = 50.0;

/// Key naming the profile family in a configuration file.
pub const FAMILY_KEY: &str = "Family";

/// Flatten a TOML table into string entries.
///
/// Nested tables join their keys with `_`, so `[OVR] Diameter = 16` becomes
/// `OVR_Diameter`. Arrays become `;`-separated lists, booleans `1`/`0`.
pub fn flatten(table: &toml::Table) -> ParameterMap {
    let mut map = ParameterMap::new();
    flatten_into(&mut map, "", table);
    map
}

fn flatten_into(map: &mut ParameterMap, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}_{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten_into(map, &name, inner),
            other => {
                map.insert(name, scalar(other));
            }
        }
    }
}

fn scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => if *b { "1" } else { "0" }.to_string(),
        toml::Value::Datetime(d) => d.to_string(),
        toml::Value::Array(items) => items
            .iter()
            .map(scalar)
            .collect::<Vec<_>>()
            .join(&LIST_SEPARATOR.to_string()),
        toml::Value::Table(t) => t.to_string(),
    }
}

pub fn parse_parameters(source: &str) -> Result<ParameterMap> {
    let table: toml::Table = toml::from_str(source).map_err(|e| RcbarError::Parse(e.to_string()))?;
    Ok(flatten(&table))
}

pub fn load_parameters(path: impl AsRef<Path>) -> Result<ParameterMap> {
    let source = std::fs::read_to_string(path)?;
    parse_parameters(&source)
}

/// Profile parameters, cover and per-group settings of one element.
#[derive(Debug, Clone)]
pub struct ElementConfig {
    params: ProfileParams,
    cover: f64,
    groups: BTreeMap<String, GroupSettings>,
}

impl ElementConfig {
    /// Validate `map` for `family`: profile dimensions, cover, the bar
    /// settings of every group prefix the family uses and the wing wall
    /// free-end override.
    pub fn load(family: ProfileFamily, map: &ParameterMap) -> Result<Self> {
        let params = ProfileParams::from_map(family, map)?;
        // Dimensions that parse but cannot form a profile fail here too.
        let profile = ProfileBuilder::from_params(&params)?;

        let cover = map.non_negative_or("Cover", DEFAULT_COVER)?;
        let groups = GroupKind::prefixes(family)
            .iter()
            .map(|&prefix| Ok((prefix.to_string(), GroupSettings::from_map(prefix, map, cover)?)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        if family == ProfileFamily::WingWall {
            let stem = GroupKind::Wall(WallGroup::StemFront).prefix();
            if let Some(settings) = groups.get(stem).filter(|s| s.enabled) {
                wing::free_end_override(settings, wing::stem_front_length(&profile))?;
            }
        }

        debug!("{family} configuration: cover {cover}, {} groups", groups.len());
        Ok(Self {
            params,
            cover,
            groups,
        })
    }

    /// Load from TOML text; the family comes from the `Family` key.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let map = parse_parameters(source)?;
        let family: ProfileFamily = map.require(FAMILY_KEY)?.parse()?;
        Self::load(family, &map)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn family(&self) -> ProfileFamily {
        self.params.family()
    }

    pub fn params(&self) -> &ProfileParams {
        &self.params
    }

    pub fn cover(&self) -> f64 {
        self.cover
    }

    pub fn settings(&self, prefix: &str) -> Result<&GroupSettings> {
        self.groups.get(prefix).ok_or_else(|| {
            RcbarError::InvalidState(format!("{} configuration has no {prefix} group", self.family()))
        })
    }

    pub fn build_profile(&self) -> Result<ProfileModel> {
        ProfileBuilder::from_params(&self.params)
    }
}
