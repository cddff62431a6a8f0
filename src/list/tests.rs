use super::List;
use crate::Arena;
use alloc::{
  string::{
    String,
    ToString,
  },
  vec::Vec,
};
use core::cell::Cell;

#[test]
fn empty_list() {
  let list = List::<i32>::new();
  assert!(list.is_empty());
  assert_eq!(list.len(), 0);
  assert_eq!(list.front(), None);
  assert_eq!(list.iter().next(), None);
}

#[test]
fn push_and_pop_both_ends() {
  let arena = Arena::new(1024).unwrap();
  let mut list = List::new_in(&arena);

  list.push_back(1);
  list.push_back(2);
  list.push_front(0);
  assert_eq!(list.len(), 3);
  assert_eq!(arena.used_count(), 3);

  assert_eq!(list.pop_front(), Some(0));
  assert_eq!(list.front(), Some(&1));
  assert_eq!(list.pop_back(), Some(2));
  assert_eq!(list.len(), 1);
  assert_eq!(list.back(), Some(&1));
  assert_eq!(arena.used_count(), 1);
}

#[test]
fn iteration_in_both_directions() {
  let arena = Arena::new(1024).unwrap();
  let mut list = List::new_in(&arena);
  list.extend([1, 2, 3]);

  assert_eq!(list.iter().sum::<i32>(), 6);
  assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);

  let mut iter = list.iter();
  assert_eq!(iter.len(), 3);
  assert_eq!(iter.next(), Some(&1));
  assert_eq!(iter.next_back(), Some(&3));
  assert_eq!(iter.next(), Some(&2));
  assert_eq!(iter.next_back(), None);

  for value in &mut list {
    *value *= 10;
  }
  assert_eq!(list.iter().copied().collect::<Vec<_>>(), [10, 20, 30]);
}

#[test]
fn insert_and_remove_by_position() {
  let arena = Arena::new(2048).unwrap();
  let mut list = List::new_in(&arena);
  list.extend(["first", "second", "third"].map(String::from));

  list.insert(1, "inserted".to_string());
  assert_eq!(list.get(1).map(String::as_str), Some("inserted"));
  assert_eq!(list.get(2).map(String::as_str), Some("second"));

  list.insert(4, "last".to_string());
  list.insert(0, "zero".to_string());
  assert_eq!(list.len(), 6);
  assert_eq!(list.back().map(String::as_str), Some("last"));

  assert_eq!(list.remove(1).as_deref(), Some("first"));
  assert_eq!(list.remove(4).as_deref(), Some("last"));
  assert_eq!(list.remove(10), None);
  assert_eq!(
    list.iter().map(String::as_str).collect::<Vec<_>>(),
    ["zero", "inserted", "second", "third"]
  );
}

#[test]
#[should_panic(expected = "insertion index")]
fn insert_past_end_panics() {
  let mut list = List::<u8>::new();
  list.insert(1, 0);
}

#[test]
fn move_keeps_nodes() {
  let arena = Arena::new(1024).unwrap();
  let mut first = List::new_in(&arena);
  first.push_back(1);
  first.push_back(2);

  let second = first;
  assert_eq!(second.len(), 2);
  assert_eq!(arena.used_count(), 2);
}

#[test]
fn clear_and_drop_return_nodes() {
  let arena = Arena::new(1024).unwrap();
  {
    let mut list = List::new_in(&arena);
    list.extend(0..8_u64);
    list.clear();
    assert!(list.is_empty());
    assert_eq!(arena.used_count(), 0);

    list.extend(0..4_u64);
    assert_eq!(arena.used_count(), 4);
  }
  assert_eq!(arena.used_count(), 0);
  assert_eq!(arena.free_count(), 1);
  assert_eq!(arena.leak_report(), None);
}

struct DropCounter<'a>(&'a Cell<usize>);

impl Drop for DropCounter<'_> {
  fn drop(&mut self) {
    self.0.set(self.0.get() + 1);
  }
}

#[test]
fn values_dropped_once() {
  let arena = Arena::new(512).unwrap();
  let counter = Cell::new(0);
  {
    let mut list = List::new_in(&arena);
    list.push_back(DropCounter(&counter));
    list.push_back(DropCounter(&counter));
    list.push_back(DropCounter(&counter));
    drop(list.pop_front());
    assert_eq!(counter.get(), 1);
  }
  assert_eq!(counter.get(), 3);
}

#[test]
fn exhaustion_surfaces_as_alloc_error() {
  let arena = Arena::new(64).unwrap();
  let mut list = List::new_in(&arena);
  let mut pushed = 0_usize;
  while list.try_push_back(pushed as i64).is_ok() {
    pushed += 1;
  }
  assert!(pushed > 0);
  assert_eq!(list.len(), pushed);
  assert_eq!(list.try_push_front(0), Err(allocator_api2::alloc::AllocError));

  list.pop_back();
  assert!(list.try_push_front(-1).is_ok());
  assert_eq!(list.front(), Some(&-1));
}

#[test]
fn lists_share_or_split_arenas() {
  let shared = Arena::new(2048).unwrap();
  let other = Arena::new(512).unwrap();

  let mut numbers = List::new_in(&shared);
  let mut words = List::new_in(&shared);
  let mut elsewhere = List::new_in(&other);
  numbers.push_back(42);
  words.push_back("Test".to_string());
  elsewhere.push_back(7);

  assert!(numbers.allocator().is_same(*words.allocator()));
  assert!(!numbers.allocator().is_same(*elsewhere.allocator()));
  assert_eq!(shared.used_count(), 2);
  assert_eq!(other.used_count(), 1);
}

#[test]
fn into_iter_drains_in_order() {
  let arena = Arena::new(512).unwrap();
  let mut list = List::new_in(&arena);
  list.extend([3, 1, 4, 1, 5]);

  let drained: Vec<i32> = list.into_iter().collect();
  assert_eq!(drained, [3, 1, 4, 1, 5]);
  assert_eq!(arena.used_count(), 0);
}

#[test]
fn front_and_back_mut() {
  let mut list = List::new();
  list.extend([1, 2]);
  *list.front_mut().unwrap() = 10;
  *list.back_mut().unwrap() = 20;
  assert_eq!(format!("{list:?}"), "[10, 20]");

  let mut same = List::new();
  same.extend([10, 20]);
  assert_eq!(list, same);
}
