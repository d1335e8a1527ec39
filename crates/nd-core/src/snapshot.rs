//! Read-only network snapshot handed to the evaluator and optimizer.

use std::collections::HashSet;

use crate::{Demand, Facility, FacilityId, ModelConfig, NdError, NdResult, TransportCostTable};

/// An immutable view of one network: facilities, demand, rates and model
/// parameters.
///
/// The evaluator and optimizer only ever borrow a snapshot, so the caller
/// can share one across concurrent runs.  Create via [`SnapshotBuilder`].
#[derive(Clone, Debug)]
pub struct NetworkSnapshot {
    facilities:      Vec<Facility>,
    demands:         Vec<Demand>,
    transport_costs: TransportCostTable,
    config:          ModelConfig,
}

impl NetworkSnapshot {
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    pub fn transport_costs(&self) -> &TransportCostTable {
        &self.transport_costs
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn facility(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    /// Sum of every demand's quantity, assigned or not.
    pub fn total_demand_units(&self) -> u64 {
        self.demands.iter().map(|d| d.quantity as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty() || self.demands.is_empty()
    }
}

/// Fluent builder for [`NetworkSnapshot`].
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                          |
/// |-------------------------|----------------------------------|
/// | `.facilities(v)`        | none                             |
/// | `.demands(v)`           | none                             |
/// | `.transport_costs(t)`   | `TransportCostTable::default()`  |
/// | `.config(c)`            | `ModelConfig::default()`         |
///
/// # Example
///
/// ```rust,ignore
/// let snapshot = SnapshotBuilder::new()
///     .facilities(facilities)
///     .demands(demands)
///     .build()?;
/// ```
#[derive(Default)]
pub struct SnapshotBuilder {
    facilities:      Vec<Facility>,
    demands:         Vec<Demand>,
    transport_costs: Option<TransportCostTable>,
    config:          Option<ModelConfig>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facilities(mut self, facilities: Vec<Facility>) -> Self {
        self.facilities = facilities;
        self
    }

    pub fn facility(mut self, facility: Facility) -> Self {
        self.facilities.push(facility);
        self
    }

    pub fn demands(mut self, demands: Vec<Demand>) -> Self {
        self.demands = demands;
        self
    }

    pub fn demand(mut self, demand: Demand) -> Self {
        self.demands.push(demand);
        self
    }

    pub fn transport_costs(mut self, table: TransportCostTable) -> Self {
        self.transport_costs = Some(table);
        self
    }

    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validate inputs and freeze them into a [`NetworkSnapshot`].
    ///
    /// Rejects duplicate facility ids, facilities without a tag, invalid
    /// rates and invalid model parameters.  Demand records are not checked
    /// against the facility list: a dangling assignment is legal and simply
    /// excluded from cost.
    pub fn build(self) -> NdResult<NetworkSnapshot> {
        let mut seen = HashSet::with_capacity(self.facilities.len());
        for facility in &self.facilities {
            if !seen.insert(facility.id) {
                return Err(NdError::DuplicateFacility(facility.id));
            }
            if facility.kinds.is_empty() {
                return Err(NdError::UntaggedFacility(facility.id));
            }
        }

        let transport_costs = self.transport_costs.unwrap_or_default();
        transport_costs.validate()?;

        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(NetworkSnapshot {
            facilities: self.facilities,
            demands: self.demands,
            transport_costs,
            config,
        })
    }
}
