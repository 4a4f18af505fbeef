use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::chain::ScopeId;

/// Scopes whose holders went away and that may now be free
pub(super) type DropQueue = Rc<RefCell<Vec<ScopeId>>>;

/// A closure's hold on the scope it was declared in.
///
/// Every clone counts as one holder. A released scope stays alive while it
/// has holders; dropping the last one lets the arena free it.
#[derive(Debug, Clone)]
pub struct Capture {
    scope: ScopeId,
    anchor: Rc<()>,
    dropped: Weak<RefCell<Vec<ScopeId>>>,
}

impl Capture {
    pub(super) fn new(scope: ScopeId, anchor: &Rc<()>, dropped: &DropQueue) -> Self {
        Capture {
            scope,
            anchor: Rc::clone(anchor),
            dropped: Rc::downgrade(dropped),
        }
    }

    /// The captured scope
    pub fn scope(&self) -> ScopeId {
        self.scope
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        // the arena rechecks the scope the next time it is touched
        if let Some(queue) = self.dropped.upgrade() {
            if let Ok(mut queue) = queue.try_borrow_mut() {
                queue.push(self.scope);
            }
        }
    }
}

/// Values that can hold a [`Capture`].
///
/// [`Scopes::collect`](super::Scopes::collect) uses this to tell holders
/// stored inside the arena apart from holders the embedder keeps elsewhere.
pub trait Captures {
    /// The scope captured by this value, if any
    fn captured_scope(&self) -> Option<ScopeId>;
}
