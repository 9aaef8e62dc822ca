//! Payload cells.
//!
//! A [`Slot`] is the only strong handle to a payload cell; a [`SlotRef`] is
//! the non-owning handle an alias value carries. Dropping the last `Slot`
//! frees the payload no matter how many `SlotRef`s remain, and those refs
//! then fail to upgrade.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use super::Payload;

/// Owning handle to a payload cell.
///
/// Deliberately not `Clone`: at most one owner exists per cell.
pub(crate) struct Slot(Rc<RefCell<Payload>>);

impl Slot {
    #[inline]
    pub(crate) fn new(payload: Payload) -> Self {
        Slot(Rc::new(RefCell::new(payload)))
    }

    #[inline]
    pub(crate) fn borrow(&self) -> Ref<'_, Payload> {
        self.0.borrow()
    }

    #[inline]
    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Payload> {
        self.0.borrow_mut()
    }

    #[inline]
    pub(crate) fn downgrade(&self) -> SlotRef {
        SlotRef(Rc::downgrade(&self.0))
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.borrow(), f)
    }
}

/// Non-owning handle to a payload cell.
#[derive(Clone)]
pub(crate) struct SlotRef(Weak<RefCell<Payload>>);

impl SlotRef {
    /// Temporarily access the target cell. `None` once the owner is gone.
    ///
    /// The returned handle is only held for the duration of one access; it
    /// must not be stored.
    #[inline]
    pub(crate) fn upgrade(&self) -> Option<Slot> {
        self.0.upgrade().map(Slot)
    }

    /// Returns `true` if both refs point at the same cell.
    #[inline]
    pub(crate) fn ptr_eq(&self, other: &SlotRef) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(slot) => write!(f, "&{slot:?}"),
            None => write!(f, "&<dangling>"),
        }
    }
}
