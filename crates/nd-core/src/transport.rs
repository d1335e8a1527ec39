//! Transport modes and the per-mode cost-per-mile table.

use std::fmt;
use std::str::FromStr;

use crate::NdError;

/// Freight mode a leg is priced at.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransportMode {
    /// Small-package carrier.  Prices the outbound leg.
    Parcel,
    /// Less-than-truckload.
    #[cfg_attr(feature = "serde", serde(rename = "LTL"))]
    Ltl,
    /// Full truckload.  Prices the inbound leg.
    #[cfg_attr(feature = "serde", serde(rename = "TL"))]
    Tl,
}

impl TransportMode {
    pub const ALL: [TransportMode; 3] = [TransportMode::Parcel, TransportMode::Ltl, TransportMode::Tl];

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Parcel => "Parcel",
            TransportMode::Ltl    => "LTL",
            TransportMode::Tl     => "TL",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = NdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TransportMode::ALL
            .into_iter()
            .find(|m| s.eq_ignore_ascii_case(m.as_str()))
            .ok_or_else(|| NdError::Parse(format!("unknown transport mode {s:?}")))
    }
}

// ── TransportCostTable ────────────────────────────────────────────────────────

/// One entry of a [`TransportCostTable`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportCost {
    pub mode:          TransportMode,
    pub cost_per_mile: f64,
}

/// Ordered list of per-mode rates.
///
/// Kept as a list rather than a map so imported tables round-trip unchanged;
/// lookups take the first entry for a mode.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TransportCostTable {
    entries: Vec<TransportCost>,
}

impl TransportCostTable {
    /// A table with no entries.  Every lookup falls back to the model
    /// defaults.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn from_entries(entries: Vec<TransportCost>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TransportCost] {
        &self.entries
    }

    /// Rate for `mode`, first match wins.
    pub fn rate(&self, mode: TransportMode) -> Option<f64> {
        self.entries
            .iter()
            .find(|c| c.mode == mode)
            .map(|c| c.cost_per_mile)
    }

    #[inline]
    pub fn rate_or(&self, mode: TransportMode, default: f64) -> f64 {
        self.rate(mode).unwrap_or(default)
    }

    /// Overwrite the first entry for `mode`, or append one.
    pub fn set_rate(&mut self, mode: TransportMode, cost_per_mile: f64) {
        match self.entries.iter_mut().find(|c| c.mode == mode) {
            Some(entry) => entry.cost_per_mile = cost_per_mile,
            None => self.entries.push(TransportCost { mode, cost_per_mile }),
        }
    }

    /// Builder-style [`set_rate`][Self::set_rate].
    pub fn with_rate(mut self, mode: TransportMode, cost_per_mile: f64) -> Self {
        self.set_rate(mode, cost_per_mile);
        self
    }

    /// Every rate must be finite and non-negative.
    pub fn validate(&self) -> Result<(), NdError> {
        match self
            .entries
            .iter()
            .find(|c| !c.cost_per_mile.is_finite() || c.cost_per_mile < 0.0)
        {
            Some(bad) => Err(NdError::InvalidRate { mode: bad.mode, rate: bad.cost_per_mile }),
            None => Ok(()),
        }
    }
}

impl Default for TransportCostTable {
    /// Parcel 0.5, LTL 2.0, TL 3.0 $/mi.
    fn default() -> Self {
        Self::empty()
            .with_rate(TransportMode::Parcel, 0.5)
            .with_rate(TransportMode::Ltl, 2.0)
            .with_rate(TransportMode::Tl, 3.0)
    }
}

impl FromIterator<TransportCost> for TransportCostTable {
    fn from_iter<I: IntoIterator<Item = TransportCost>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}
