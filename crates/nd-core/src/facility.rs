//! Facility records and the fixed enumeration of facility category tags.

use std::fmt;
use std::str::FromStr;

use crate::{FacilityId, GeoPoint, NdError};

// ── FacilityKind ──────────────────────────────────────────────────────────────

/// The role a facility plays in the network.  A facility carries one or more
/// of these as tags (see [`KindSet`]).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FacilityKind {
    #[cfg_attr(feature = "serde", serde(alias = "DC"))]
    DistributionCenter,
    #[cfg_attr(feature = "serde", serde(alias = "Cross-dock"))]
    CrossDock,
    #[cfg_attr(feature = "serde", serde(alias = "Last-mile"))]
    LastMile,
    #[cfg_attr(feature = "serde", serde(alias = "Retail"))]
    Retail,
    #[cfg_attr(feature = "serde", serde(alias = "Factory"))]
    Factory,
    #[cfg_attr(feature = "serde", serde(alias = "Source-warehouse"))]
    SourceWarehouse,
    #[cfg_attr(feature = "serde", serde(alias = "Port"))]
    Port,
}

impl FacilityKind {
    pub const ALL: [FacilityKind; 7] = [
        FacilityKind::DistributionCenter,
        FacilityKind::CrossDock,
        FacilityKind::LastMile,
        FacilityKind::Retail,
        FacilityKind::Factory,
        FacilityKind::SourceWarehouse,
        FacilityKind::Port,
    ];

    /// Canonical kebab-case name, used in CSV output and configs.
    pub fn as_str(self) -> &'static str {
        match self {
            FacilityKind::DistributionCenter => "distribution-center",
            FacilityKind::CrossDock          => "cross-dock",
            FacilityKind::LastMile           => "last-mile",
            FacilityKind::Retail             => "retail",
            FacilityKind::Factory            => "factory",
            FacilityKind::SourceWarehouse    => "source-warehouse",
            FacilityKind::Port               => "port",
        }
    }

    /// Short label shown on the map and accepted in imported files
    /// (`DC`, `Cross-dock`, …).
    pub fn label(self) -> &'static str {
        match self {
            FacilityKind::DistributionCenter => "DC",
            FacilityKind::CrossDock          => "Cross-dock",
            FacilityKind::LastMile           => "Last-mile",
            FacilityKind::Retail             => "Retail",
            FacilityKind::Factory            => "Factory",
            FacilityKind::SourceWarehouse    => "Source-warehouse",
            FacilityKind::Port               => "Port",
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityKind {
    type Err = NdError;

    /// Accepts the canonical name or the short label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FacilityKind::ALL
            .into_iter()
            .find(|k| s.eq_ignore_ascii_case(k.as_str()) || s.eq_ignore_ascii_case(k.label()))
            .ok_or_else(|| NdError::Parse(format!("unknown facility type {s:?}")))
    }
}

// ── KindSet ───────────────────────────────────────────────────────────────────

/// A set of [`FacilityKind`] tags packed into one byte.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "Vec<FacilityKind>", from = "Vec<FacilityKind>"))]
pub struct KindSet(u8);

impl KindSet {
    pub const EMPTY: KindSet = KindSet(0);

    pub fn single(kind: FacilityKind) -> Self {
        KindSet(kind.bit())
    }

    #[inline]
    pub fn insert(&mut self, kind: FacilityKind) {
        self.0 |= kind.bit();
    }

    #[inline]
    pub fn contains(self, kind: FacilityKind) -> bool {
        self.0 & kind.bit() != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Tags in declaration order.
    pub fn iter(self) -> impl Iterator<Item = FacilityKind> {
        FacilityKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }

    /// Parse a `;`-separated tag list such as `"DC;Cross-dock"`.
    pub fn parse_list(s: &str) -> Result<Self, NdError> {
        s.split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(FacilityKind::from_str)
            .collect()
    }
}

impl FromIterator<FacilityKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = FacilityKind>>(iter: I) -> Self {
        let mut set = KindSet::EMPTY;
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl From<Vec<FacilityKind>> for KindSet {
    fn from(kinds: Vec<FacilityKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<KindSet> for Vec<FacilityKind> {
    fn from(set: KindSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            f.write_str(kind.as_str())?;
        }
        Ok(())
    }
}

// ── Facility ──────────────────────────────────────────────────────────────────

/// A physical node in the logistics network.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facility {
    pub id:       FacilityId,
    /// Display name (`"DC A"`, `"Reno Cross-dock"`, …).
    pub name:     String,
    pub location: GeoPoint,
    /// Role tags.  Must be non-empty; [`SnapshotBuilder`][crate::SnapshotBuilder]
    /// rejects facilities without one.
    pub kinds:    KindSet,
    /// Carried for the caller's bookkeeping.  The cost model evaluates
    /// whatever facility list it is given regardless of this flag.
    pub active:   bool,
}

impl Facility {
    /// An active facility with a single tag.
    pub fn new(id: FacilityId, name: impl Into<String>, location: GeoPoint, kind: FacilityKind) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            kinds: KindSet::single(kind),
            active: true,
        }
    }

    /// Add another role tag.
    pub fn with_kind(mut self, kind: FacilityKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    /// Mark the facility inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    #[inline]
    pub fn has_kind(&self, kind: FacilityKind) -> bool {
        self.kinds.contains(kind)
    }
}
