//! A fixed-capacity region arena.
//!
//! [`Arena`] reserves one buffer up front and serves allocation requests
//! from it first-fit, keeping used and free regions in address-ordered
//! tables. Alignment padding is split off as its own free region and freed
//! regions are merged with their free neighbours, so at any point the
//! regions tile the buffer exactly.
//!
//! The arena implements [`allocator_api2::alloc::Allocator`], which lets
//! node-based containers such as [`List`] draw their storage from it.

#![allow(clippy::module_inception)]

extern crate alloc;

pub mod arena;
pub mod error;
pub mod list;
pub mod region;

pub use arena::{
  Arena,
  ArenaConfig,
  LeakReport,
  RegionInfo,
};
pub use error::{
  ArenaError,
  Result,
};
pub use list::List;
pub use region::{
  Address,
  Region,
};
