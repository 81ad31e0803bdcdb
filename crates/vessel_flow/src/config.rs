//! # Capacity Configuration
//!
//! Loads a [`CapacityTable`] from TOML keyed by resource name:
//!
//! ```toml
//! [capacities]
//! fuel = 120.0
//! oxygen = 40.0
//! ```
//!
//! Names match identifiers case-insensitively. Identifiers absent from the
//! file stay unmanaged. The loaded table is ordered by identifier ordinal.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{FlowError, FlowResult};
use crate::model::{ResourceId, ResourceModel};
use crate::store::CapacityTable;
use crate::units::Units;

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "U: Units"))]
struct CapacityFile<U> {
    #[serde(default)]
    capacities: BTreeMap<String, U>,
}

impl<M: ResourceModel> CapacityTable<M> {
    /// Parses a TOML capacity table.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, names an unknown
    /// resource or gives a negative capacity.
    pub fn from_toml_str(source: &str) -> FlowResult<Self> {
        let file: CapacityFile<M::Units> =
            toml::from_str(source).map_err(|e| FlowError::InvalidConfig(e.to_string()))?;

        let mut entries = Vec::with_capacity(file.capacities.len());
        for (name, capacity) in file.capacities {
            let id = M::Id::from_name(&name).ok_or_else(|| FlowError::UnknownResource(name.clone()))?;
            if capacity < M::Units::ZERO {
                return Err(FlowError::NegativeCapacity { resource: name });
            }
            entries.push((id, capacity));
        }
        entries.sort_by_key(|&(id, _)| id.ordinal());

        let table: Self = entries.into_iter().collect();
        tracing::debug!(resources = table.len(), "capacity table loaded");
        Ok(table)
    }

    /// Reads and parses a TOML capacity file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or see
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_toml_file(path: impl AsRef<Path>) -> FlowResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| FlowError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::resource_model! {
        /// Test model.
        pub struct Ship;
        units = f32;
        /// Ids.
        pub enum Supply { Water, Fuel, Oxygen }
    }

    #[test]
    fn test_load_orders_by_ordinal() {
        let table = CapacityTable::<Ship>::from_toml_str(
            r#"
            [capacities]
            oxygen = 40.0
            Fuel = 120.5
            "#,
        )
        .unwrap();

        let ids: Vec<_> = table.ids().collect();
        assert_eq!(ids, vec![Supply::Fuel, Supply::Oxygen]);
        assert_eq!(table.get(Supply::Fuel), Some(120.5));
        assert!(!table.contains(Supply::Water));
    }

    #[test]
    fn test_unknown_resource() {
        let err = CapacityTable::<Ship>::from_toml_str("[capacities]\nplasma = 1.0\n").unwrap_err();
        assert_eq!(err, FlowError::UnknownResource("plasma".to_string()));
    }

    #[test]
    fn test_negative_capacity() {
        let err = CapacityTable::<Ship>::from_toml_str("[capacities]\nwater = -1.0\n").unwrap_err();
        assert!(matches!(err, FlowError::NegativeCapacity { ref resource } if resource == "water"));
    }

    #[test]
    fn test_wrong_value_type() {
        let err = CapacityTable::<Ship>::from_toml_str("[capacities]\nwater = \"lots\"\n").unwrap_err();
        assert!(matches!(err, FlowError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = CapacityTable::<Ship>::from_toml_file("/nonexistent/vessel/capacities.toml").unwrap_err();
        assert!(matches!(err, FlowError::ConfigRead { .. }));
    }

    #[test]
    fn test_empty_document() {
        let table = CapacityTable::<Ship>::from_toml_str("").unwrap();
        assert!(table.is_empty());
    }
}
