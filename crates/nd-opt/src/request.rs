//! Optimization parameters.

use nd_core::FacilityKind;

use crate::{OptError, OptResult};

/// Which facilities are up for selection, and how many to keep.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OptimizeRequest {
    /// Facilities carrying this tag are candidates; all others are fixed.
    pub candidate_kind: FacilityKind,
    /// Number of candidates to keep.  Must be at least 1.
    pub select_count:   usize,
}

impl OptimizeRequest {
    pub fn new(candidate_kind: FacilityKind, select_count: usize) -> Self {
        Self { candidate_kind, select_count }
    }

    pub fn validate(&self) -> OptResult<()> {
        if self.select_count == 0 {
            return Err(OptError::InvalidRequest(
                "number of facilities to select must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for OptimizeRequest {
    /// Pick 5 distribution centers.
    fn default() -> Self {
        Self::new(FacilityKind::DistributionCenter, 5)
    }
}
