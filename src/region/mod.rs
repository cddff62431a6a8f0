//! Address-ordered region bookkeeping.
//!
//! An arena keeps two [`RegionTable`]s, one for used and one for free
//! regions. Both are keyed by start address so that first-fit scans run in
//! address order and coalescing only has to look at the immediate
//! predecessor and successor of a freed region.

use alloc::collections::BTreeMap;
use core::{
  fmt,
  ops::Bound,
};

use getset::CopyGetters;

/// An address inside an arena's buffer.
///
/// This is the integer value of the byte's address, not an offset, so
/// alignment checks on it agree with the alignment of the pointer it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(usize);

impl Address {
  pub const fn new(raw: usize) -> Self {
    Self(raw)
  }

  pub const fn get(self) -> usize {
    self.0
  }

  /// Number of bytes between `base` and `self`, or `None` when `base` lies
  /// above `self`.
  pub const fn checked_offset_from(self, base: Address) -> Option<usize> {
    self.0.checked_sub(base.0)
  }

  /// Callers guarantee `base <= self`.
  pub(crate) const fn offset_from(self, base: Address) -> usize {
    debug_assert!(base.0 <= self.0);
    self.0 - base.0
  }

  pub const fn checked_add(self, bytes: usize) -> Option<Address> {
    match self.0.checked_add(bytes) {
      Some(raw) => Some(Self(raw)),
      None => None,
    }
  }

  /// Round up to the next multiple of `align`, which must be a power of two.
  pub const fn align_up(self, align: usize) -> Option<Address> {
    debug_assert!(align.is_power_of_two());
    match self.0.checked_add(align - 1) {
      Some(raw) => Some(Self(raw & !(align - 1))),
      None => None,
    }
  }

  /// False for any `align` that is not a power of two.
  pub const fn is_aligned(self, align: usize) -> bool {
    align.is_power_of_two() && self.0 & (align - 1) == 0
  }
}

impl fmt::Display for Address {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:#x}", self.0)
  }
}

impl fmt::LowerHex for Address {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::LowerHex::fmt(&self.0, f)
  }
}

/// A contiguous run of bytes `[start, start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
pub struct Region {
  #[getset(get_copy = "pub")]
  start: Address,
  #[getset(get_copy = "pub")]
  len: usize,
}

impl Region {
  pub(crate) const fn new(start: Address, len: usize) -> Self {
    Self { start, len }
  }

  /// First address past the region.
  pub const fn end(&self) -> Address {
    Address(self.start.0 + self.len)
  }

  pub const fn contains(&self, address: Address) -> bool {
    address.0 >= self.start.0 && address.0 < self.start.0 + self.len
  }

  /// True when `next` begins exactly where `self` ends.
  pub const fn touches(&self, next: &Region) -> bool {
    self.start.0 + self.len == next.start.0
  }
}

impl fmt::Display for Region {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} - {} bytes", self.start, self.len)
  }
}

/// Ordered set of disjoint regions keyed by start address.
#[derive(Debug, Default, Clone)]
pub(crate) struct RegionTable {
  regions: BTreeMap<Address, usize>,
  bytes: usize,
}

impl RegionTable {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn len(&self) -> usize {
    self.regions.len()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.regions.is_empty()
  }

  /// Sum of the lengths of all regions in the table.
  pub(crate) fn bytes(&self) -> usize {
    self.bytes
  }

  pub(crate) fn largest(&self) -> usize {
    self.regions.values().copied().max().unwrap_or(0)
  }

  pub(crate) fn get(&self, start: Address) -> Option<Region> {
    self
      .regions
      .get(&start)
      .map(|&len| Region::new(start, len))
  }

  /// Region with the greatest start strictly below `address`.
  pub(crate) fn predecessor(&self, address: Address) -> Option<Region> {
    self
      .regions
      .range(..address)
      .next_back()
      .map(|(&start, &len)| Region::new(start, len))
  }

  /// Region with the smallest start strictly above `address`.
  pub(crate) fn successor(&self, address: Address) -> Option<Region> {
    self
      .regions
      .range((Bound::Excluded(address), Bound::Unbounded))
      .next()
      .map(|(&start, &len)| Region::new(start, len))
  }

  pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = Region> + '_ {
    self
      .regions
      .iter()
      .map(|(&start, &len)| Region::new(start, len))
  }

  pub(crate) fn insert(&mut self, region: Region) {
    debug_assert!(region.len > 0, "empty region at {}", region.start);
    debug_assert!(
      self.predecessor(region.start).is_none_or(|prev| prev.end() <= region.start),
      "{region} overlaps its predecessor"
    );
    debug_assert!(
      self.successor(region.start).is_none_or(|next| region.end() <= next.start),
      "{region} overlaps its successor"
    );

    let previous = self.regions.insert(region.start, region.len);
    debug_assert!(previous.is_none(), "duplicate region at {}", region.start);
    self.bytes += region.len;
  }

  pub(crate) fn remove(&mut self, start: Address) -> Option<Region> {
    let len = self.regions.remove(&start)?;
    self.bytes -= len;
    Some(Region::new(start, len))
  }

  /// Insert `region` and merge it with a predecessor that ends where it
  /// starts and a successor that starts where it ends. Returns the region
  /// that ends up in the table.
  pub(crate) fn insert_coalescing(&mut self, region: Region) -> Region {
    let mut merged = region;

    if let Some(prev) = self.predecessor(region.start).filter(|prev| prev.touches(&merged)) {
      self.remove(prev.start);
      merged = Region::new(prev.start, prev.len + merged.len);
    }

    if let Some(next) = self.successor(region.start).filter(|next| merged.touches(next)) {
      self.remove(next.start);
      merged = Region::new(merged.start, merged.len + next.len);
    }

    self.insert(merged);
    merged
  }
}

#[cfg(test)]
mod tests;
