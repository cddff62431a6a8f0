//! First-fit arena over a single fixed buffer.

use alloc::{
  collections::BTreeSet,
  vec::Vec,
};
use core::{
  cell::RefCell,
  fmt,
  ptr::NonNull,
};

use allocator_api2::alloc::{
  AllocError,
  Allocator,
  Global,
  Layout,
};
use tracing::{
  debug,
  error,
  trace,
  warn,
};

use super::{
  config::ArenaConfig,
  diagnostics::{
    LeakReport,
    RegionInfo,
  },
};
use crate::{
  error::{
    ArenaError,
    Result,
  },
  region::{
    Address,
    Region,
    RegionTable,
  },
};

/// Which deallocation path a used region must come back through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
  /// Handed out by [`Arena::allocate`].
  Caller,
  /// Handed out through the [`Allocator`] trait.
  Container,
}

#[derive(Debug)]
struct ArenaInner {
  used: RegionTable,
  free: RegionTable,
  // starts of used regions owned by `Allocator` users
  lent: BTreeSet<Address>,
}

/// Where a request lands inside a free region.
#[derive(Debug, Clone, Copy)]
struct Placement {
  candidate: Region,
  address: Address,
  size: usize,
}

impl Placement {
  fn fit(candidate: Region, size: usize, align: usize) -> Option<Self> {
    let address = candidate.start().align_up(align)?;
    let needed = address
      .offset_from(candidate.start())
      .checked_add(size)?;

    (needed <= candidate.len()).then_some(Self {
      candidate,
      address,
      size,
    })
  }

  fn padding(&self) -> usize {
    self.address.offset_from(self.candidate.start())
  }

  fn tail(&self) -> usize {
    self.candidate.len() - self.padding() - self.size
  }
}

impl ArenaInner {
  fn new(whole: Region) -> Self {
    let mut free = RegionTable::new();
    free.insert(whole);
    Self {
      used: RegionTable::new(),
      free,
      lent: BTreeSet::new(),
    }
  }

  fn place(&self, size: usize, align: usize) -> Option<Placement> {
    self
      .free
      .iter()
      .find_map(|candidate| Placement::fit(candidate, size, align))
  }

  fn commit(&mut self, placement: Placement, owner: Owner) -> Region {
    let candidate = placement.candidate;
    self.free.remove(candidate.start());

    // padding stays allocatable on its own
    let padding = placement.padding();
    if padding > 0 {
      self.free.insert(Region::new(candidate.start(), padding));
    }

    let used = Region::new(placement.address, placement.size);
    self.used.insert(used);
    if owner == Owner::Container {
      self.lent.insert(used.start());
    }

    let tail = placement.tail();
    if tail > 0 {
      self.free.insert(Region::new(used.end(), tail));
    }

    used
  }
}

/// A fixed-capacity arena that hands out regions of one buffer.
///
/// The buffer is taken from the backing allocator `A` once, at construction,
/// and given back when the arena is dropped. Requests are served first-fit
/// from address-ordered free regions; freed regions are merged with their
/// free neighbours right away, so two free regions never touch.
///
/// The arena is single-threaded: it is neither `Send` nor `Sync`, and shared
/// handles (`&Arena`) mutate it through interior mutability.
pub struct Arena<A: Allocator = Global> {
  inner: RefCell<ArenaInner>,
  buffer: NonNull<u8>,
  layout: Layout,
  allocator: A,
}

impl Arena<Global> {
  /// Reserve `capacity` bytes from the global allocator.
  pub fn new(capacity: usize) -> Result<Self> {
    Self::new_in(Global, capacity)
  }

  pub fn with_config(config: ArenaConfig) -> Result<Self> {
    Self::with_config_in(Global, config)
  }
}

impl<A> Arena<A>
where
  A: Allocator,
{
  pub fn new_in(allocator: A, capacity: usize) -> Result<Self> {
    Self::with_config_in(allocator, ArenaConfig::new(capacity))
  }

  pub fn with_config_in(allocator: A, config: ArenaConfig) -> Result<Self> {
    config.validate()?;

    let refused = ArenaError::BackingAlloc {
      capacity: config.capacity(),
      align: config.base_align(),
    };
    let layout =
      Layout::from_size_align(config.capacity(), config.base_align()).map_err(|_| refused)?;
    let raw = allocator.allocate(layout).map_err(|_| refused)?;
    let buffer = raw.cast::<u8>();

    let whole = Region::new(Address::new(buffer.as_ptr() as usize), layout.size());
    debug!(base = %whole.start(), capacity = whole.len(), "arena created");

    Ok(Self {
      inner: RefCell::new(ArenaInner::new(whole)),
      buffer,
      layout,
      allocator,
    })
  }

  /// Reserve `size` bytes at an address that is a multiple of `align`.
  ///
  /// A `size` of zero is served as one byte so every returned address names
  /// a distinct region. On failure nothing is changed.
  pub fn allocate(&self, size: usize, align: usize) -> Result<Address> {
    self.alloc_impl(size, align, Owner::Caller)
  }

  /// Release the region starting at `address`.
  ///
  /// The length recorded at allocation time is what gets freed; `size` and
  /// `align` are only checked against it for diagnostics. Regions handed out
  /// through the [`Allocator`] trait belong to their container and are
  /// rejected here with [`ArenaError::InvalidAddress`].
  pub fn deallocate(&self, address: Address, size: usize, align: usize) -> Result<()> {
    self.dealloc_impl(address, size, align, Owner::Caller)
  }

  fn alloc_impl(&self, size: usize, align: usize, owner: Owner) -> Result<Address> {
    if !align.is_power_of_two() {
      return Err(ArenaError::InvalidAlign { align });
    }
    let size = size.max(1);

    let mut inner = self.inner.borrow_mut();
    let Some(placement) = inner.place(size, align) else {
      return Err(ArenaError::Exhausted {
        size,
        align,
        largest_free: inner.free.largest(),
      });
    };

    let used = inner.commit(placement, owner);
    trace!(
      address = %used.start(),
      size,
      align,
      padding = placement.padding(),
      ?owner,
      "allocated"
    );
    Ok(used.start())
  }

  fn dealloc_impl(
    &self,
    address: Address,
    size: usize,
    align: usize,
    owner: Owner,
  ) -> Result<()> {
    let mut inner = self.inner.borrow_mut();
    let lent = inner.lent.contains(&address);
    if lent != (owner == Owner::Container) {
      return Err(ArenaError::InvalidAddress { address });
    }
    let region = inner
      .used
      .remove(address)
      .ok_or(ArenaError::InvalidAddress { address })?;
    if lent {
      inner.lent.remove(&address);
    }

    if size.max(1) != region.len() {
      debug!(
        %address,
        size,
        align,
        tracked = region.len(),
        "deallocate size differs from tracked length"
      );
    }

    let merged = inner.free.insert_coalescing(region);
    if merged != region {
      debug!(%address, merged = %merged, "coalesced free regions");
    }
    trace!(%address, len = region.len(), "deallocated");
    Ok(())
  }

  /// True when both handles refer to the same buffer.
  pub fn is_same<B: Allocator>(&self, other: &Arena<B>) -> bool {
    self.buffer == other.buffer
  }

  /// First address of the buffer.
  pub fn base(&self) -> Address {
    Address::new(self.buffer.as_ptr() as usize)
  }

  pub fn capacity(&self) -> usize {
    self.layout.size()
  }

  pub fn base_align(&self) -> usize {
    self.layout.align()
  }

  pub fn used_bytes(&self) -> usize {
    self.inner.borrow().used.bytes()
  }

  pub fn free_bytes(&self) -> usize {
    self.inner.borrow().free.bytes()
  }

  /// Length of the largest free region, the upper bound for any request.
  pub fn largest_free(&self) -> usize {
    self.inner.borrow().free.largest()
  }

  pub fn used_count(&self) -> usize {
    self.inner.borrow().used.len()
  }

  pub fn free_count(&self) -> usize {
    self.inner.borrow().free.len()
  }

  pub fn contains(&self, address: Address) -> bool {
    Region::new(self.base(), self.capacity()).contains(address)
  }

  pub fn offset_of(&self, address: Address) -> Option<usize> {
    self
      .contains(address)
      .then(|| address.offset_from(self.base()))
  }

  /// Pointer to the byte at `address`, if it lies inside the buffer.
  pub fn as_ptr(&self, address: Address) -> Option<NonNull<u8>> {
    let offset = self.offset_of(address)?;
    // SAFETY: offset is within the buffer, which is a single allocation
    Some(unsafe { NonNull::new_unchecked(self.buffer.as_ptr().add(offset)) })
  }

  /// Used region that starts at `address`.
  pub fn used_region(&self, address: Address) -> Option<Region> {
    self.inner.borrow().used.get(address)
  }

  /// True when the used region at `address` belongs to an [`Allocator`] user.
  pub fn is_lent(&self, address: Address) -> bool {
    self.inner.borrow().lent.contains(&address)
  }

  pub fn used_regions(&self) -> Vec<Region> {
    self.inner.borrow().used.iter().collect()
  }

  pub fn free_regions(&self) -> Vec<Region> {
    self.inner.borrow().free.iter().collect()
  }

  /// Every region, used and free, ordered by address.
  pub fn diagnostics(&self) -> Vec<RegionInfo> {
    let inner = self.inner.borrow();
    let mut regions: Vec<RegionInfo> = inner
      .used
      .iter()
      .map(RegionInfo::used)
      .chain(inner.free.iter().map(RegionInfo::free))
      .collect();
    regions.sort_unstable_by_key(RegionInfo::address);
    regions
  }

  /// Outstanding used regions, if any.
  pub fn leak_report(&self) -> Option<LeakReport> {
    let inner = self.inner.borrow();
    (!inner.used.is_empty()).then(|| LeakReport::new(inner.used.len(), inner.used.bytes()))
  }

  pub fn allocator(&self) -> &A {
    &self.allocator
  }
}

impl<A, B> PartialEq<Arena<B>> for Arena<A>
where
  A: Allocator,
  B: Allocator,
{
  fn eq(&self, other: &Arena<B>) -> bool {
    self.is_same(other)
  }
}

impl<A: Allocator> Eq for Arena<A> {}

impl<A: Allocator> fmt::Debug for Arena<A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let inner = self.inner.borrow();
    f.debug_struct("Arena")
      .field("base", &self.base())
      .field("capacity", &self.capacity())
      .field("used", &inner.used.len())
      .field("free", &inner.free.len())
      .finish()
  }
}

impl<A: Allocator> fmt::Display for Arena<A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let inner = self.inner.borrow();
    writeln!(f, "=== Arena ===")?;
    writeln!(f, "capacity: {} bytes at {}", self.capacity(), self.base())?;
    writeln!(f, "used regions ({}):", inner.used.len())?;
    for region in inner.used.iter() {
      writeln!(f, "  {region}")?;
    }
    writeln!(f, "free regions ({}):", inner.free.len())?;
    for region in inner.free.iter() {
      writeln!(f, "  {region}")?;
    }
    write!(f, "=============")
  }
}

impl<A: Allocator> Drop for Arena<A> {
  fn drop(&mut self) {
    if let Some(report) = self.leak_report() {
      warn!(
        base = %self.base(),
        blocks = report.blocks(),
        bytes = report.bytes(),
        "arena dropped with {report} still in use"
      );
    }
    // SAFETY: buffer came from this allocator with this layout
    unsafe { self.allocator.deallocate(self.buffer, self.layout) };
  }
}

unsafe impl<A> Allocator for Arena<A>
where
  A: Allocator,
{
  fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
    let address = self.alloc_impl(layout.size(), layout.align(), Owner::Container)?;
    let ptr = self.as_ptr(address).ok_or(AllocError)?;
    Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
  }

  unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
    let address = Address::new(ptr.as_ptr() as usize);
    let released = self.dealloc_impl(address, layout.size(), layout.align(), Owner::Container);
    if let Err(err) = released {
      error!(%err, "deallocate through allocator interface");
      panic!("{err}");
    }
  }
}
