//! Interning of source-file id strings into dense typed ids.
//!
//! Files exported by the planning UI key every record with a UUID string;
//! files written by this crate use plain integers.  A [`KeyInterner`] maps
//! either form to a typed id:
//!
//! - a key that parses as a `u32` keeps that value, unless another key
//!   already owns it;
//! - any other key is minted the lowest free value;
//! - the same key always maps to the same id within one interner.

use std::marker::PhantomData;

use rustc_hash::{FxHashMap, FxHashSet};

/// Cell values the UI writes for a missing id.
const MISSING_MARKERS: [&str; 4] = ["", "<NA>", "nan", "NaN"];

/// Returns the trimmed key, or `None` when the cell holds no id.
pub(crate) fn present_key(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|k| !MISSING_MARKERS.contains(k))
}

/// String key to typed id map for one id space.
pub struct KeyInterner<I> {
    ids:  FxHashMap<String, u32>,
    used: FxHashSet<u32>,
    next: u32,
    _id:  PhantomData<fn() -> I>,
}

impl<I> Default for KeyInterner<I> {
    fn default() -> Self {
        Self {
            ids:  FxHashMap::default(),
            used: FxHashSet::default(),
            next: 0,
            _id:  PhantomData,
        }
    }
}

impl<I: From<u32>> KeyInterner<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id already assigned to `key`, if any.
    pub fn get(&self, key: &str) -> Option<I> {
        self.ids.get(key.trim()).map(|&id| I::from(id))
    }

    /// Id for `key`, assigning one on first sight.
    pub fn intern(&mut self, key: &str) -> I {
        let key = key.trim();
        if let Some(&id) = self.ids.get(key) {
            return I::from(id);
        }
        let id = match key.parse::<u32>() {
            Ok(n) if n != u32::MAX && !self.used.contains(&n) => n,
            _ => self.next_free(),
        };
        self.used.insert(id);
        self.ids.insert(key.to_owned(), id);
        I::from(id)
    }

    /// A fresh id bound to no key.
    pub fn mint(&mut self) -> I {
        let id = self.next_free();
        self.used.insert(id);
        I::from(id)
    }

    /// Claim the numeric keys of a file before any key of it is minted, so
    /// a UUID earlier in the file cannot take the value of a later integer
    /// key.
    pub(crate) fn reserve<'k>(&mut self, keys: impl IntoIterator<Item = &'k str>) {
        for key in keys {
            if self.ids.contains_key(key) {
                continue;
            }
            if let Ok(n) = key.parse::<u32>() {
                if n != u32::MAX && self.used.insert(n) {
                    self.ids.insert(key.to_owned(), n);
                }
            }
        }
    }

    /// Number of keys seen.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn next_free(&mut self) -> u32 {
        while self.used.contains(&self.next) {
            self.next += 1;
        }
        self.next
    }
}
