use core::fmt;

use getset::CopyGetters;

use crate::region::{
  Address,
  Region,
};

/// One entry of [`Arena::diagnostics`](super::Arena::diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct RegionInfo {
  address: Address,
  len: usize,
  is_free: bool,
}

impl RegionInfo {
  pub(crate) fn used(region: Region) -> Self {
    Self {
      address: region.start(),
      len: region.len(),
      is_free: false,
    }
  }

  pub(crate) fn free(region: Region) -> Self {
    Self {
      address: region.start(),
      len: region.len(),
      is_free: true,
    }
  }

  pub const fn region(&self) -> Region {
    Region::new(self.address, self.len)
  }
}

impl fmt::Display for RegionInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = if self.is_free { "free" } else { "used" };
    write!(f, "{} - {} bytes ({state})", self.address, self.len)
  }
}

/// Used regions still outstanding on an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct LeakReport {
  blocks: usize,
  bytes: usize,
}

impl LeakReport {
  pub(crate) const fn new(blocks: usize, bytes: usize) -> Self {
    Self { blocks, bytes }
  }
}

impl fmt::Display for LeakReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} allocated blocks ({} bytes)", self.blocks, self.bytes)
  }
}
