//! Type aliases for commonly used shared-ownership types.
//!
//! The annotation layer is single-threaded: the registry and the tools
//! that drive it share state through `Shared<T>`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slidemark_core::types::*;
//!
//! let controller: Shared<AnnotationsController> = shared(AnnotationsController::new("canvas"));
//! controller.borrow_mut().refresh_view();
//! ```

use parking_lot::Mutex;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex`. Bus subscribers collect notifications into one.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Create a new `ThreadSafe<T>` from a value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}
