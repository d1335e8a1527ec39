//! Demand records.

use crate::{DemandId, FacilityId, ProductId};

/// A quantity of product required at an origin zone, fulfilled by (at most)
/// one assigned facility.
///
/// The origin is a postal/zone code and is never geocoded: distances are
/// measured from the assigned facility, not from the demand.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Demand {
    pub id:                DemandId,
    pub zip_code:          String,
    pub quantity:          u32,
    /// `None` means unassigned: the demand contributes nothing to cost but
    /// its quantity still counts towards total demand.
    pub assigned_facility: Option<FacilityId>,
    pub product:           Option<ProductId>,
}

impl Demand {
    pub fn new(id: DemandId, zip_code: impl Into<String>, quantity: u32) -> Self {
        Self {
            id,
            zip_code: zip_code.into(),
            quantity,
            assigned_facility: None,
            product: None,
        }
    }

    pub fn assigned_to(mut self, facility: FacilityId) -> Self {
        self.assigned_facility = Some(facility);
        self
    }

    pub fn for_product(mut self, product: ProductId) -> Self {
        self.product = Some(product);
        self
    }
}
