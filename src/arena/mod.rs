mod arena;
mod config;
mod diagnostics;


pub use arena::Arena;
pub use config::{
  ArenaConfig,
  DEFAULT_BASE_ALIGN,
};
pub use diagnostics::{
  LeakReport,
  RegionInfo,
};
