//! Cost-model configuration.
//!
//! The defaults reproduce the reference cost model exactly.  Every field can
//! be overridden by the application, typically from a JSON file (enable the
//! `serde` feature).

use crate::{GeoPoint, NdError, TransportMode};

/// Outbound-distance cut-offs for the service-level bands.
///
/// A demand lands in `<24h` when its outbound distance is `<= within_24h`,
/// in `<48h` when `<= within_48h`, and in `>=48h` otherwise.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceThresholds {
    pub within_24h_miles: f64,
    pub within_48h_miles: f64,
}

impl Default for ServiceThresholds {
    fn default() -> Self {
        Self { within_24h_miles: 500.0, within_48h_miles: 1000.0 }
    }
}

/// Parameters of the network cost model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelConfig {
    /// Single origin every inbound leg starts from.  Default: Port of Los
    /// Angeles (33.7292, -118.262).
    pub inbound_origin: GeoPoint,

    /// Distance charged for every outbound leg, in miles.
    ///
    /// Constant regardless of the demand's zone, so all demand falls in the
    /// same service band.  Downstream comparisons depend on these numbers;
    /// keep the default unless a zone-aware model replaces it.
    pub outbound_distance_miles: f64,

    pub service_thresholds: ServiceThresholds,

    /// Mode whose rate prices the inbound leg.  Default: TL.
    pub inbound_mode: TransportMode,

    /// Mode whose rate prices the outbound leg.  Default: Parcel.
    pub outbound_mode: TransportMode,

    /// Fallback inbound rate when the table has no entry for `inbound_mode`.
    pub default_inbound_rate: f64,

    /// Fallback outbound rate when the table has no entry for `outbound_mode`.
    pub default_outbound_rate: f64,
}

impl ModelConfig {
    pub const DEFAULT_INBOUND_ORIGIN: GeoPoint = GeoPoint { lat: 33.7292, lon: -118.262 };

    /// Check for values that would make every report meaningless.
    pub fn validate(&self) -> Result<(), NdError> {
        if !self.inbound_origin.is_valid() {
            return Err(NdError::Config(format!(
                "inbound origin {} is not a valid coordinate",
                self.inbound_origin
            )));
        }
        if !self.outbound_distance_miles.is_finite() || self.outbound_distance_miles < 0.0 {
            return Err(NdError::Config(format!(
                "outbound distance must be finite and non-negative, got {}",
                self.outbound_distance_miles
            )));
        }
        let t = self.service_thresholds;
        if !(t.within_24h_miles.is_finite() && t.within_48h_miles.is_finite())
            || t.within_24h_miles > t.within_48h_miles
        {
            return Err(NdError::Config(format!(
                "service thresholds must be finite and ordered, got {} / {}",
                t.within_24h_miles, t.within_48h_miles
            )));
        }
        for (mode, rate) in [
            (self.inbound_mode, self.default_inbound_rate),
            (self.outbound_mode, self.default_outbound_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(NdError::InvalidRate { mode, rate });
            }
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            inbound_origin:          Self::DEFAULT_INBOUND_ORIGIN,
            outbound_distance_miles: 50.0,
            service_thresholds:      ServiceThresholds::default(),
            inbound_mode:            TransportMode::Tl,
            outbound_mode:           TransportMode::Parcel,
            default_inbound_rate:    3.0,
            default_outbound_rate:   0.5,
        }
    }
}
