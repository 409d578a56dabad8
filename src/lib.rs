//! # probe-table
//!
//! A fixed-capacity open-addressing table mapping region names to climate
//! records, with linear or quadratic probing chosen at construction.
//!
//! The table never grows. Removal only clears a slot's occupancy flag, and
//! lookups always walk the full probe sequence, so no tombstones are needed.
//!
//! ## Example
//!
//! ```rust
//! use probe_table::{ClimateRecord, ProbeStrategy, ProbingTable};
//!
//! let mut table = ProbingTable::new(11, ProbeStrategy::Quadratic).unwrap();
//! table.insert_with("Ohio", 50.7, 22.4, 84.2).unwrap();
//! table.insert(ClimateRecord::new("Utah", 48.6, 18.7, 88.9).unwrap()).unwrap();
//!
//! assert_eq!(table.find("Ohio").average_temp(), 50.7);
//! assert!(!table.find("Iowa").is_occupied());
//!
//! let removed = table.remove("Utah").unwrap();
//! assert_eq!(removed.name(), "Utah");
//! assert_eq!(table.len(), 1);
//! ```

#![forbid(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use log::{debug, info, trace, warn};

mod error;
pub mod logger;

pub use error::{Result, TableError};

// =============================================================================
// Configuration
// =============================================================================

/// Short keys are summed cyclically until this many bytes have been added.
pub const MIN_HASH_TERMS: usize = 7;
/// Longest region name (in bytes) a record may carry.
pub const MAX_NAME_LEN: usize = 79;
/// Name carried by the canonical empty record.
pub const UNUSED_NAME: &str = "Unused";
pub const DEFAULT_CAPACITY: usize = 11;

/// Construction parameters for a [`ProbingTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableConfig {
    pub capacity: usize,
    pub strategy: ProbeStrategy,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            strategy: ProbeStrategy::Linear,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_strategy(mut self, strategy: ProbeStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

// =============================================================================
// Primitive helpers
// =============================================================================

/// `base` raised to `exponent`; negative exponents yield 0.
#[inline]
fn int_pow(base: u128, exponent: i32) -> u128 {
    if exponent < 0 {
        return 0;
    }
    base.wrapping_pow(exponent as u32)
}

/// Byte-wise key ordering.
///
/// Returns the signed difference of the first differing bytes. When one key is
/// a prefix of the other, returns the difference of their lengths, so the
/// result is `0` only for identical keys.
pub fn compare_keys(a: &str, b: &str) -> i64 {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    for (&x, &y) in a.iter().zip(b) {
        if x != y {
            return i64::from(x) - i64::from(y);
        }
    }
    a.len() as i64 - b.len() as i64
}

/// Base slot index for `key` in a table of `capacity` slots.
///
/// Sums the key's bytes, revisiting them from the start until at least
/// [`MIN_HASH_TERMS`] terms were added. Empty keys and zero capacity map to 0.
pub fn hash_key(key: &str, capacity: usize) -> usize {
    let bytes = key.as_bytes();
    if bytes.is_empty() || capacity == 0 {
        return 0;
    }

    let terms = bytes.len().max(MIN_HASH_TERMS);
    let sum: u64 = bytes
        .iter()
        .cycle()
        .take(terms)
        .map(|&b| u64::from(b))
        .sum();
    (sum % capacity as u64) as usize
}

// =============================================================================
// Probing
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProbeStrategy {
    /// Insertion is disabled.
    None,
    #[default]
    Linear,
    Quadratic,
}

impl ProbeStrategy {
    /// Legacy numeric code for the strategy.
    pub fn code(self) -> u16 {
        match self {
            ProbeStrategy::None => 0,
            ProbeStrategy::Linear => 101,
            ProbeStrategy::Quadratic => 202,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(ProbeStrategy::None),
            101 => Some(ProbeStrategy::Linear),
            202 => Some(ProbeStrategy::Quadratic),
            _ => None,
        }
    }

    /// Candidate slot for probe `attempt` from base index `base`.
    ///
    /// Derived from `attempt` directly, never from the previous candidate.
    pub fn probe(self, base: usize, attempt: usize, capacity: usize) -> Option<usize> {
        if capacity == 0 {
            return None;
        }
        let c = capacity as u128;
        let i = attempt as u128 % c;
        let offset = match self {
            ProbeStrategy::None => return None,
            ProbeStrategy::Linear => i,
            ProbeStrategy::Quadratic => int_pow(i, 2) % c,
        };
        Some(((base as u128 % c + offset) % c) as usize)
    }
}

impl fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProbeStrategy::None => "none",
            ProbeStrategy::Linear => "linear",
            ProbeStrategy::Quadratic => "quadratic",
        };
        f.write_str(name)
    }
}

impl FromStr for ProbeStrategy {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(ProbeStrategy::None),
            "linear" => Ok(ProbeStrategy::Linear),
            "quadratic" => Ok(ProbeStrategy::Quadratic),
            _ => Err(TableError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Candidate slot indices for one key, in probe order.
///
/// Yields exactly `capacity` indices (none for [`ProbeStrategy::None`]).
/// Clone it to restart from the first attempt.
#[derive(Clone, Debug)]
pub struct ProbeSequence {
    base: usize,
    attempt: usize,
    capacity: usize,
    strategy: ProbeStrategy,
}

impl ProbeSequence {
    pub fn new(base: usize, strategy: ProbeStrategy, capacity: usize) -> Self {
        Self {
            base,
            attempt: 0,
            capacity,
            strategy,
        }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// Number of candidates already yielded.
    pub fn attempts(&self) -> usize {
        self.attempt
    }

    fn remaining(&self) -> usize {
        match self.strategy {
            ProbeStrategy::None => 0,
            _ => self.capacity - self.attempt,
        }
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining() == 0 {
            return None;
        }
        let index = self.strategy.probe(self.base, self.attempt, self.capacity)?;
        self.attempt += 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for ProbeSequence {}

impl FusedIterator for ProbeSequence {}

// =============================================================================
// Records
// =============================================================================

/// One region's climate data, as stored in a table slot.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimateRecord {
    name: String,
    average_temp: f64,
    lowest_temp: f64,
    highest_temp: f64,
    occupied: bool,
}

impl ClimateRecord {
    /// Builds a live record. The name must be non-empty and at most
    /// [`MAX_NAME_LEN`] bytes.
    pub fn new(
        name: impl Into<String>,
        average_temp: f64,
        lowest_temp: f64,
        highest_temp: f64,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(TableError::EmptyName);
        }
        if name.len() > MAX_NAME_LEN {
            return Err(TableError::NameTooLong {
                len: name.len(),
                max: MAX_NAME_LEN,
            });
        }
        Ok(Self {
            name,
            average_temp,
            lowest_temp,
            highest_temp,
            occupied: true,
        })
    }

    /// The record returned for failed lookups.
    pub fn empty() -> Self {
        Self {
            name: UNUSED_NAME.to_string(),
            average_temp: 0.0,
            lowest_temp: 0.0,
            highest_temp: 0.0,
            occupied: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn average_temp(&self) -> f64 {
        self.average_temp
    }

    pub fn lowest_temp(&self) -> f64 {
        self.lowest_temp
    }

    pub fn highest_temp(&self) -> f64 {
        self.highest_temp
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }
}

impl Default for ClimateRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for ClimateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Avg: {:5.2}, Low: {:5.2}, High: {:5.2}, ",
            self.name, self.average_temp, self.lowest_temp, self.highest_temp
        )
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Occupancy summary produced by [`ProbingTable::status_report`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusReport {
    /// One marker per slot: `D` occupied, `U` unoccupied.
    pub markers: String,
    pub occupied: usize,
    pub vacant: usize,
    /// Shortest run of adjacent occupied slots; 0 when nothing is occupied.
    pub min_run: usize,
    /// Longest run of adjacent occupied slots.
    pub max_run: usize,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hash Table Status: {}", self.markers)?;
        writeln!(f, "D => Data, U => Unused")?;
        writeln!(f, "         Items in Hash Table: {}", self.occupied)?;
        writeln!(f, "     Minimum contiguous bins: {}", self.min_run)?;
        writeln!(f, "     Maximum contiguous bins: {}", self.max_run)?;
        writeln!(f, "        Number of empty bins: {}", self.vacant)
    }
}

// =============================================================================
// ProbingTable
// =============================================================================

/// Fixed-capacity open-addressing table of [`ClimateRecord`]s keyed by name.
///
/// - Every slot is either unoccupied or holds one live record.
/// - Duplicate names are not detected on insert.
/// - [`ProbeStrategy::None`] disables insertion for the table's lifetime.
#[derive(Clone, Debug)]
pub struct ProbingTable {
    slots: Vec<ClimateRecord>,
    capacity: usize,
    strategy: ProbeStrategy,
    count: usize,
}

impl ProbingTable {
    /// Allocates `capacity` empty slots.
    pub fn new(capacity: usize, strategy: ProbeStrategy) -> Result<Self> {
        if capacity == 0 {
            return Err(TableError::InvalidCapacity);
        }
        info!("created {strategy} probing table with {capacity} slots");
        Ok(Self {
            slots: vec![ClimateRecord::empty(); capacity],
            capacity,
            strategy,
            count: 0,
        })
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::new(config.capacity, config.strategy)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn strategy(&self) -> ProbeStrategy {
        self.strategy
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn hash_index(&self, key: &str) -> usize {
        hash_key(key, self.capacity)
    }

    pub fn probe_sequence(&self, key: &str) -> ProbeSequence {
        ProbeSequence::new(self.hash_index(key), self.strategy, self.capacity)
    }

    /// Raw slot contents, including stale data left behind by [`remove`].
    ///
    /// [`remove`]: ProbingTable::remove
    pub fn slot(&self, index: usize) -> Option<&ClimateRecord> {
        self.slots.get(index)
    }

    /// Occupied slots as `(index, record)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ClimateRecord)> + '_ {
        self.slots.iter().enumerate().filter(|(_, r)| r.occupied)
    }

    /// Stores `record` in the first unoccupied slot of its probe sequence and
    /// returns that slot's index.
    pub fn insert(&mut self, mut record: ClimateRecord) -> Result<usize> {
        if self.strategy == ProbeStrategy::None {
            warn!("rejected insert of {:?}: probing disabled", record.name);
            return Err(TableError::ProbingDisabled);
        }

        let mut probes = self.probe_sequence(&record.name);
        let base = probes.base();
        let slots = &self.slots;
        let vacant = probes.find(|&index| {
            trace!("insert {:?}: probing slot {index}", record.name);
            !slots[index].occupied
        });

        let Some(index) = vacant else {
            warn!(
                "no vacant slot for {:?} after {} attempts",
                record.name,
                probes.attempts()
            );
            return Err(TableError::NoVacantSlot {
                key: record.name,
                attempts: probes.attempts(),
            });
        };

        debug!(
            "{record}{base} -> {index} ({} probe attempts)",
            probes.attempts()
        );
        record.occupied = true;
        self.slots[index] = record;
        self.count += 1;
        Ok(index)
    }

    pub fn insert_with(
        &mut self,
        name: &str,
        average_temp: f64,
        lowest_temp: f64,
        highest_temp: f64,
    ) -> Result<usize> {
        let record = ClimateRecord::new(name, average_temp, lowest_temp, highest_temp)?;
        self.insert(record)
    }

    /// Slot index of the first occupied slot along `key`'s probe sequence
    /// whose name compares equal to `key`.
    ///
    /// Unoccupied slots do not end the search; all `capacity` candidates are
    /// examined before giving up.
    pub fn find_index(&self, key: &str) -> Option<usize> {
        let found = self.probe_sequence(key).find(|&index| {
            trace!("find {key:?}: probing slot {index}");
            let slot = &self.slots[index];
            slot.occupied && compare_keys(&slot.name, key) == 0
        });
        debug!("find {key:?}: {found:?}");
        found
    }

    /// Copy of the record stored under `key`, or [`ClimateRecord::empty`].
    pub fn find(&self, key: &str) -> ClimateRecord {
        self.get(key).cloned().unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&ClimateRecord> {
        self.find_index(key).map(|index| &self.slots[index])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_index(key).is_some()
    }

    /// Marks the slot holding `key` unoccupied and returns a copy of its
    /// record. The slot keeps its name and temperatures.
    pub fn remove(&mut self, key: &str) -> Option<ClimateRecord> {
        let index = self.find_index(key)?;
        let removed = self.slots[index].clone();
        self.slots[index].occupied = false;
        self.count -= 1;
        debug!("removed {key:?} from slot {index}");
        Some(removed)
    }

    pub fn status_report(&self) -> StatusReport {
        let markers: String = self
            .slots
            .iter()
            .map(|slot| if slot.occupied { 'D' } else { 'U' })
            .collect();

        let mut runs = Vec::new();
        let mut run = 0usize;
        for slot in &self.slots {
            if slot.occupied {
                run += 1;
            } else if run > 0 {
                runs.push(run);
                run = 0;
            }
        }
        if run > 0 {
            runs.push(run);
        }

        let occupied: usize = runs.iter().sum();
        StatusReport {
            markers,
            occupied,
            vacant: self.capacity - occupied,
            min_run: runs.iter().copied().min().unwrap_or(0),
            max_run: runs.iter().copied().max().unwrap_or(0),
        }
    }

    /// Numbered listing of every slot.
    pub fn dump(&self) -> String {
        let mut out = String::from("HASH TABLE ARRAY DUMP:\n");
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.occupied {
                out.push_str(&format!(" {index:2}) {slot}\n"));
            } else {
                out.push_str(&format!(" {index:2}) {UNUSED_NAME}\n"));
            }
        }
        out
    }

    /// Releases all slots. Afterwards the table has capacity 0, probing is
    /// disabled and every lookup misses.
    pub fn destroy(&mut self) {
        info!("destroying probing table with {} slots", self.capacity);
        self.slots = Vec::new();
        self.capacity = 0;
        self.strategy = ProbeStrategy::None;
        self.count = 0;
    }
}


#[cfg(test)]
mod proptests;
