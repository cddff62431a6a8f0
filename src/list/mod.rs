//! Doubly linked list whose nodes come from a pluggable allocator.
//!
//! The list is written against [`Allocator`] only, so it can draw nodes from
//! an [`Arena`](crate::Arena) through `&Arena`, from the global heap, or from
//! anything else implementing the trait.

use core::{
  fmt,
  marker::PhantomData,
  ptr::NonNull,
};

use allocator_api2::alloc::{
  AllocError,
  Allocator,
  Global,
  Layout,
};

struct Node<T> {
  value: T,
  prev: Option<NonNull<Node<T>>>,
  next: Option<NonNull<Node<T>>>,
}

pub struct List<T, A: Allocator = Global> {
  head: Option<NonNull<Node<T>>>,
  tail: Option<NonNull<Node<T>>>,
  len: usize,
  allocator: A,
  marker: PhantomData<Node<T>>,
}

impl<T> List<T, Global> {
  pub fn new() -> Self {
    Self::new_in(Global)
  }
}

impl<T> Default for List<T, Global> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T, A> List<T, A>
where
  A: Allocator,
{
  pub fn new_in(allocator: A) -> Self {
    Self {
      head: None,
      tail: None,
      len: 0,
      allocator,
      marker: PhantomData,
    }
  }

  pub fn allocator(&self) -> &A {
    &self.allocator
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  fn alloc_node(&self, value: T) -> Result<NonNull<Node<T>>, AllocError> {
    let raw = self.allocator.allocate(Layout::new::<Node<T>>())?;
    let node = raw.cast::<Node<T>>();
    // SAFETY: raw is valid for writes of one Node<T>
    unsafe {
      node.as_ptr().write(Node {
        value,
        prev: None,
        next: None,
      })
    };
    Ok(node)
  }

  /// Take the value out of an unlinked node and return its storage.
  ///
  /// # Safety
  /// `node` must come from `alloc_node` on this list and be unlinked.
  unsafe fn free_node(&self, node: NonNull<Node<T>>) -> T {
    // SAFETY: node is initialized and owned by this list
    unsafe {
      let Node { value, .. } = node.as_ptr().read();
      self
        .allocator
        .deallocate(node.cast(), Layout::new::<Node<T>>());
      value
    }
  }

  pub fn try_push_back(&mut self, value: T) -> Result<(), AllocError> {
    let node = self.alloc_node(value)?;
    // SAFETY: node is fresh, tail (if any) is a live node of this list
    unsafe {
      (*node.as_ptr()).prev = self.tail;
      match self.tail {
        Some(tail) => (*tail.as_ptr()).next = Some(node),
        None => self.head = Some(node),
      }
    }
    self.tail = Some(node);
    self.len += 1;
    Ok(())
  }

  pub fn push_back(&mut self, value: T) {
    self
      .try_push_back(value)
      .expect("Failed to allocate list node")
  }

  pub fn try_push_front(&mut self, value: T) -> Result<(), AllocError> {
    let node = self.alloc_node(value)?;
    // SAFETY: node is fresh, head (if any) is a live node of this list
    unsafe {
      (*node.as_ptr()).next = self.head;
      match self.head {
        Some(head) => (*head.as_ptr()).prev = Some(node),
        None => self.tail = Some(node),
      }
    }
    self.head = Some(node);
    self.len += 1;
    Ok(())
  }

  pub fn push_front(&mut self, value: T) {
    self
      .try_push_front(value)
      .expect("Failed to allocate list node")
  }

  pub fn pop_front(&mut self) -> Option<T> {
    self.head.map(|node| unsafe { self.unlink(node) })
  }

  pub fn pop_back(&mut self) -> Option<T> {
    self.tail.map(|node| unsafe { self.unlink(node) })
  }

  /// Insert `value` so that it ends up at position `index`.
  ///
  /// Panics if `index > len`.
  pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), AllocError> {
    assert!(
      index <= self.len,
      "insertion index (is {index}) should be <= len (is {})",
      self.len
    );

    let Some(at) = self.node_at(index) else {
      return self.try_push_back(value);
    };

    let node = self.alloc_node(value)?;
    // SAFETY: at is a live node of this list and node is fresh
    unsafe {
      let prev = (*at.as_ptr()).prev;
      (*node.as_ptr()).prev = prev;
      (*node.as_ptr()).next = Some(at);
      (*at.as_ptr()).prev = Some(node);
      match prev {
        Some(prev) => (*prev.as_ptr()).next = Some(node),
        None => self.head = Some(node),
      }
    }
    self.len += 1;
    Ok(())
  }

  pub fn insert(&mut self, index: usize, value: T) {
    self
      .try_insert(index, value)
      .expect("Failed to allocate list node")
  }

  pub fn remove(&mut self, index: usize) -> Option<T> {
    let node = self.node_at(index)?;
    // SAFETY: node_at only returns live nodes of this list
    Some(unsafe { self.unlink(node) })
  }

  pub fn clear(&mut self) {
    while self.pop_front().is_some() {}
  }

  pub fn front(&self) -> Option<&T> {
    // SAFETY: head is a live node borrowed for the lifetime of &self
    self.head.map(|node| unsafe { &(*node.as_ptr()).value })
  }

  pub fn back(&self) -> Option<&T> {
    self.tail.map(|node| unsafe { &(*node.as_ptr()).value })
  }

  pub fn front_mut(&mut self) -> Option<&mut T> {
    self.head.map(|node| unsafe { &mut (*node.as_ptr()).value })
  }

  pub fn back_mut(&mut self) -> Option<&mut T> {
    self.tail.map(|node| unsafe { &mut (*node.as_ptr()).value })
  }

  pub fn get(&self, index: usize) -> Option<&T> {
    self
      .node_at(index)
      .map(|node| unsafe { &(*node.as_ptr()).value })
  }

  pub fn iter(&self) -> Iter<'_, T> {
    Iter {
      head: self.head,
      tail: self.tail,
      len: self.len,
      marker: PhantomData,
    }
  }

  pub fn iter_mut(&mut self) -> IterMut<'_, T> {
    IterMut {
      head: self.head,
      tail: self.tail,
      len: self.len,
      marker: PhantomData,
    }
  }

  /// Walks from whichever end is closer.
  fn node_at(&self, index: usize) -> Option<NonNull<Node<T>>> {
    if index >= self.len {
      return None;
    }

    // SAFETY: every link followed belongs to this list
    unsafe {
      if index <= self.len / 2 {
        let mut current = self.head?;
        for _ in 0..index {
          current = (*current.as_ptr()).next?;
        }
        Some(current)
      } else {
        let mut current = self.tail?;
        for _ in index + 1..self.len {
          current = (*current.as_ptr()).prev?;
        }
        Some(current)
      }
    }
  }

  /// # Safety
  /// `node` must be a live node of this list.
  unsafe fn unlink(&mut self, node: NonNull<Node<T>>) -> T {
    unsafe {
      let prev = (*node.as_ptr()).prev;
      let next = (*node.as_ptr()).next;
      match prev {
        Some(prev) => (*prev.as_ptr()).next = next,
        None => self.head = next,
      }
      match next {
        Some(next) => (*next.as_ptr()).prev = prev,
        None => self.tail = prev,
      }
      self.len -= 1;
      self.free_node(node)
    }
  }
}

impl<T, A> Drop for List<T, A>
where
  A: Allocator,
{
  fn drop(&mut self) {
    self.clear();
  }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for List<T, A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

impl<T: PartialEq, A: Allocator, B: Allocator> PartialEq<List<T, B>> for List<T, A> {
  fn eq(&self, other: &List<T, B>) -> bool {
    self.len == other.len && self.iter().eq(other.iter())
  }
}

impl<T, A: Allocator> Extend<T> for List<T, A> {
  fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
    for value in iter {
      self.push_back(value);
    }
  }
}

pub struct Iter<'list, T> {
  head: Option<NonNull<Node<T>>>,
  tail: Option<NonNull<Node<T>>>,
  len: usize,
  marker: PhantomData<&'list Node<T>>,
}

impl<'list, T> Iterator for Iter<'list, T> {
  type Item = &'list T;

  fn next(&mut self) -> Option<Self::Item> {
    if self.len == 0 {
      return None;
    }
    self.head.map(|node| {
      self.len -= 1;
      // SAFETY: the list outlives 'list and is not mutated meanwhile
      unsafe {
        self.head = (*node.as_ptr()).next;
        &(*node.as_ptr()).value
      }
    })
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.len, Some(self.len))
  }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
  fn next_back(&mut self) -> Option<Self::Item> {
    if self.len == 0 {
      return None;
    }
    self.tail.map(|node| {
      self.len -= 1;
      unsafe {
        self.tail = (*node.as_ptr()).prev;
        &(*node.as_ptr()).value
      }
    })
  }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

pub struct IterMut<'list, T> {
  head: Option<NonNull<Node<T>>>,
  tail: Option<NonNull<Node<T>>>,
  len: usize,
  marker: PhantomData<&'list mut Node<T>>,
}

impl<'list, T> Iterator for IterMut<'list, T> {
  type Item = &'list mut T;

  fn next(&mut self) -> Option<Self::Item> {
    if self.len == 0 {
      return None;
    }
    self.head.map(|node| {
      self.len -= 1;
      // SAFETY: each node is yielded at most once while the list is borrowed
      unsafe {
        self.head = (*node.as_ptr()).next;
        &mut (*node.as_ptr()).value
      }
    })
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.len, Some(self.len))
  }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
  fn next_back(&mut self) -> Option<Self::Item> {
    if self.len == 0 {
      return None;
    }
    self.tail.map(|node| {
      self.len -= 1;
      unsafe {
        self.tail = (*node.as_ptr()).prev;
        &mut (*node.as_ptr()).value
      }
    })
  }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

pub struct IntoIter<T, A: Allocator = Global> {
  list: List<T, A>,
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
  type Item = T;

  fn next(&mut self) -> Option<T> {
    self.list.pop_front()
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.list.len, Some(self.list.len))
  }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
  fn next_back(&mut self) -> Option<T> {
    self.list.pop_back()
  }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> IntoIterator for List<T, A> {
  type Item = T;
  type IntoIter = IntoIter<T, A>;

  fn into_iter(self) -> Self::IntoIter {
    IntoIter { list: self }
  }
}

impl<'list, T, A: Allocator> IntoIterator for &'list List<T, A> {
  type Item = &'list T;
  type IntoIter = Iter<'list, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<'list, T, A: Allocator> IntoIterator for &'list mut List<T, A> {
  type Item = &'list mut T;
  type IntoIter = IterMut<'list, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter_mut()
  }
}

#[cfg(test)]
mod tests;
