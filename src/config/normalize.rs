use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{LayoutError, Result};
use crate::modes::{ModeField, ModeSet, ModeValue, RegionMode};
use crate::registry::{Region, SlotKey};

use super::core::{NormalizedConfig, PerRegion, SizeParam, SizeParams};
use super::partial::{PartialConfig, PartialModes, PartialSizes, SectionPolicy};

/// Turn a partial configuration into a fully defaulted one.
///
/// Absent values take their defaults. Unknown mode tokens and disagreeing
/// schema pairs (`sidebar: "base"` next to `sidebarCollapsed: "collapsed"`)
/// are rejected.
pub fn normalize(partial: &PartialConfig) -> Result<NormalizedConfig> {
    let modes = normalize_modes(&partial.modes)?;
    let sizes = normalize_sizes(&partial.sizes, &partial.params);

    let mut slots = PerRegion::<Option<String>>::default();
    let mut class_names = PerRegion::<String>::default();
    for region in Region::all().iter().copied() {
        *slots.get_mut(region) = partial
            .slots
            .get(region)
            .filter(|content| !content.is_empty())
            .map(str::to_string);
        *class_names.get_mut(region) = partial
            .class_names
            .get(region)
            .unwrap_or_default()
            .to_string();
    }

    Ok(NormalizedConfig {
        modes,
        sizes,
        slots,
        class_names,
    })
}

/// Read and normalize an untyped configuration value in one step.
pub fn normalize_value(value: &Value, policy: SectionPolicy) -> Result<NormalizedConfig> {
    normalize(&PartialConfig::from_value(value, policy)?)
}

fn normalize_modes(partial: &PartialModes) -> Result<ModeSet> {
    // field -> (source key and token, value)
    let mut assigned: BTreeMap<ModeField, (String, ModeValue)> = BTreeMap::new();

    for field in ModeField::ALL {
        if let Some(token) = partial.field(field) {
            let value = ModeValue::parse(field, token)?;
            assigned.insert(field, (format!("{}={token}", field.name()), value));
        }
    }

    for name in RegionMode::NAMES {
        let Some(token) = partial.region(name) else {
            continue;
        };
        let Some(region) = RegionMode::parse(name, token)? else {
            continue;
        };
        let source = format!("{name}={token}");
        for value in region.values() {
            match assigned.get(&value.field()) {
                Some((first, existing)) if *existing != value => {
                    return Err(LayoutError::ConflictingModes {
                        field: value.field().name().to_string(),
                        first: first.clone(),
                        second: source,
                    });
                }
                Some(_) => {}
                None => {
                    assigned.insert(value.field(), (source.clone(), value));
                }
            }
        }
    }

    let mut modes = ModeSet::default();
    for (_, value) in assigned.into_values() {
        modes.apply(value);
    }
    Ok(modes)
}

fn normalize_sizes(sizes: &PartialSizes, params: &PartialSizes) -> SizeParams {
    let mut normalized = SizeParams::default();
    for param in SizeParam::ALL {
        let supplied = [sizes.get(param), params.get(param)]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty());
        if let Some(value) = supplied {
            // non-empty, so `set` cannot fail
            let _ = normalized.set(param, value);
        }
    }
    normalized
}
