use getset::CopyGetters;

use crate::error::{
  ArenaError,
  Result,
};

/// Alignment of the backing buffer when none is configured.
pub const DEFAULT_BASE_ALIGN: usize = 16;

/// Construction parameters for an [`Arena`](super::Arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct ArenaConfig {
  /// Size of the buffer in bytes.
  capacity: usize,
  /// Alignment of the first byte of the buffer.
  base_align: usize,
}

impl ArenaConfig {
  pub const fn new(capacity: usize) -> Self {
    Self {
      capacity,
      base_align: DEFAULT_BASE_ALIGN,
    }
  }

  /// Requests aligned to more than `align` still succeed but may leave
  /// padding regions behind.
  pub const fn with_base_align(mut self, align: usize) -> Self {
    self.base_align = align;
    self
  }

  pub fn validate(&self) -> Result<()> {
    if self.capacity == 0 {
      return Err(ArenaError::ZeroCapacity);
    }
    if !self.base_align.is_power_of_two() {
      return Err(ArenaError::InvalidBaseAlign {
        align: self.base_align,
      });
    }
    Ok(())
  }
}
