//! Errors reported by [`Arena`](crate::Arena).

use allocator_api2::alloc::AllocError;
use thiserror::Error;

use crate::region::Address;

/// Everything an arena can refuse to do.
///
/// Every variant leaves the arena exactly as it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
  /// Construction asked for an empty buffer.
  #[error("arena capacity must be greater than zero")]
  ZeroCapacity,

  /// Construction asked for a buffer alignment that is not a power of two.
  #[error("base alignment {align} is not a power of two")]
  InvalidBaseAlign {
    /// The rejected alignment.
    align: usize,
  },

  /// The backing allocator could not provide the buffer.
  #[error("backing allocator refused {capacity} bytes aligned to {align}")]
  BackingAlloc {
    /// Requested buffer size.
    capacity: usize,
    /// Requested buffer alignment.
    align: usize,
  },

  /// A request alignment that is zero or not a power of two.
  #[error("alignment {align} is not a power of two")]
  InvalidAlign {
    /// The rejected alignment.
    align: usize,
  },

  /// No free region can hold the request once alignment padding is applied.
  #[error("arena exhausted: no free region fits {size} bytes aligned to {align} (largest free region is {largest_free} bytes)")]
  Exhausted {
    /// Requested size after zero-size adjustment.
    size: usize,
    /// Requested alignment.
    align: usize,
    /// Length of the largest free region at the time of the request.
    largest_free: usize,
  },

  /// Deallocation of an address that does not start a used region.
  #[error("attempt to deallocate unknown block at {address}")]
  InvalidAddress {
    /// The address passed to deallocate.
    address: Address,
  },
}

impl ArenaError {
  /// True for the errors raised while building an arena.
  pub fn is_configuration(&self) -> bool {
    matches!(
      self,
      Self::ZeroCapacity | Self::InvalidBaseAlign { .. } | Self::BackingAlloc { .. }
    )
  }
}

impl From<ArenaError> for AllocError {
  fn from(_: ArenaError) -> Self {
    AllocError
  }
}

pub type Result<T, E = ArenaError> = core::result::Result<T, E>;
