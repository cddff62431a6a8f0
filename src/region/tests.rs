use super::{
  Address,
  Region,
  RegionTable,
};

fn region(start: usize, len: usize) -> Region {
  Region::new(Address::new(start), len)
}

#[test]
fn address_alignment() {
  let addr = Address::new(0x1001);
  assert!(!addr.is_aligned(2));
  assert_eq!(addr.align_up(1), Some(addr));
  assert_eq!(addr.align_up(16), Some(Address::new(0x1010)));
  assert_eq!(Address::new(0x1000).align_up(4096), Some(Address::new(0x1000)));
  assert_eq!(Address::new(usize::MAX).align_up(8), None);
  assert_eq!(Address::new(0x1010).offset_from(Address::new(0x1000)), 16);
}

#[test]
fn address_checks_reject_bad_input() {
  let addr = Address::new(0x1000);
  assert!(!addr.is_aligned(0));
  assert!(!addr.is_aligned(3));
  assert!(addr.is_aligned(1));
  assert!(!Address::new(0).is_aligned(0));

  assert_eq!(addr.checked_offset_from(Address::new(0x0ff0)), Some(16));
  assert_eq!(addr.checked_offset_from(addr), Some(0));
  assert_eq!(Address::new(0x0ff0).checked_offset_from(addr), None);
}

#[test]
fn region_bounds() {
  let r = region(16, 8);
  assert_eq!(r.end(), Address::new(24));
  assert!(r.contains(Address::new(16)));
  assert!(r.contains(Address::new(23)));
  assert!(!r.contains(Address::new(24)));
  assert!(r.touches(&region(24, 1)));
  assert!(!r.touches(&region(25, 1)));
}

#[test]
fn neighbours_by_address() {
  let mut table = RegionTable::new();
  table.insert(region(0, 8));
  table.insert(region(32, 8));
  table.insert(region(64, 8));

  assert_eq!(table.predecessor(Address::new(32)), Some(region(0, 8)));
  assert_eq!(table.successor(Address::new(32)), Some(region(64, 8)));
  assert_eq!(table.predecessor(Address::new(0)), None);
  assert_eq!(table.successor(Address::new(64)), None);
  assert_eq!(table.predecessor(Address::new(50)), Some(region(32, 8)));
  assert_eq!(table.bytes(), 24);
  assert_eq!(table.len(), 3);
}

#[test]
fn remove_updates_bytes() {
  let mut table = RegionTable::new();
  table.insert(region(0, 8));
  table.insert(region(8, 24));
  assert_eq!(table.remove(Address::new(8)), Some(region(8, 24)));
  assert_eq!(table.remove(Address::new(8)), None);
  assert_eq!(table.bytes(), 8);
  assert_eq!(table.largest(), 8);
}

#[test]
fn coalesce_with_both_neighbours() {
  let mut table = RegionTable::new();
  table.insert(region(0, 16));
  table.insert(region(32, 16));

  let merged = table.insert_coalescing(region(16, 16));
  assert_eq!(merged, region(0, 48));
  assert_eq!(table.iter().collect::<Vec<_>>(), vec![region(0, 48)]);
  assert_eq!(table.bytes(), 48);
}

#[test]
fn coalesce_only_touching_neighbours() {
  let mut table = RegionTable::new();
  table.insert(region(0, 8));
  table.insert(region(40, 8));

  let merged = table.insert_coalescing(region(16, 24));
  assert_eq!(merged, region(16, 32));
  assert_eq!(
    table.iter().collect::<Vec<_>>(),
    vec![region(0, 8), region(16, 32)]
  );
}

#[test]
fn coalesce_without_neighbours() {
  let mut table = RegionTable::new();
  let merged = table.insert_coalescing(region(100, 4));
  assert_eq!(merged, region(100, 4));
  assert_eq!(table.len(), 1);
  assert!(!table.is_empty());
}
