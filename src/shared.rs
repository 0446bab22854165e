//! Reference-counted numeric handle.
//!
//! The original templated `Calculator<T>` over either a raw numeric type
//! or `ShrdNum<BigN>`, a `shared_ptr`-backed wrapper giving copy-by-share
//! semantics with an explicit `detach()` to break sharing before a
//! mutation. Rust has no single-threaded `shared_ptr` in std, so this is
//! built on `Rc<RefCell<T>>`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A sharable handle to a `T`. Cloning a `SharedNum` shares the
/// underlying value; mutating through one handle is visible through every
/// other clone until [`SharedNum::detach`] is called.
#[derive(Debug)]
pub struct SharedNum<T>(Rc<RefCell<T>>);

impl<T> SharedNum<T> {
    pub fn new(value: T) -> Self {
        SharedNum(Rc::new(RefCell::new(value)))
    }

    /// Number of handles currently sharing this value.
    pub fn use_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Reseats this handle to share `other`'s value instead of its own.
    pub fn assign(&mut self, other: &SharedNum<T>) {
        self.0 = Rc::clone(&other.0);
    }

    /// Breaks sharing: after this call, mutating through this handle no
    /// longer affects any other clone.
    pub fn detach(&mut self)
    where
        T: Clone,
    {
        if Rc::strong_count(&self.0) > 1 {
            let owned = self.0.borrow().clone();
            self.0 = Rc::new(RefCell::new(owned));
        }
    }

    pub fn get(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    pub fn get_mut(&mut self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    pub fn set(&mut self, value: T) {
        *self.0.borrow_mut() = value;
    }
}

impl<T: Clone> Clone for SharedNum<T> {
    fn clone(&self) -> Self {
        SharedNum(Rc::clone(&self.0))
    }
}

impl<T: PartialEq> PartialEq for SharedNum<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0.borrow() == *other.0.borrow()
    }
}

impl<T: fmt::Display> fmt::Display for SharedNum<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_state() {
        let a = SharedNum::new(5i32);
        let mut b = a.clone();
        assert_eq!(a.use_count(), 2);
        b.set(9);
        assert_eq!(*a.get(), 9);
    }

    #[test]
    fn detach_breaks_sharing() {
        let a = SharedNum::new(5i32);
        let mut b = a.clone();
        b.detach();
        assert_eq!(a.use_count(), 1);
        assert_eq!(b.use_count(), 1);
        b.set(9);
        assert_eq!(*a.get(), 5);
        assert_eq!(*b.get(), 9);
    }

    #[test]
    fn assign_reseats_to_share() {
        let a = SharedNum::new(1i32);
        let mut b = SharedNum::new(2i32);
        b.assign(&a);
        assert_eq!(*b.get(), 1);
        assert_eq!(a.use_count(), 2);
    }
}
