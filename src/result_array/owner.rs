//! opaque keep-alive handle on the computation that produced an array
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared reference to a native result handle.
/// The content is never inspected nor mutated, holding a clone only extends its lifetime.
#[derive(Clone)]
pub struct ResultHandle(Arc<dyn Any + Send + Sync>);

impl ResultHandle {
    /// wraps a value as owner, the value is dropped when the last holder goes away
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }
    /// wraps an already shared value without copying it
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self(value)
    }
    /// returns the wrapped value if it is of type T
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
    /// returns true if both handles refer to the same native result
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
    /// number of live references to the native result, this one included
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl PartialEq for ResultHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ResultHandle {}

impl fmt::Debug for ResultHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultHandle")
            .field("address", &Arc::as_ptr(&self.0).cast::<()>())
            .field("holders", &self.holders())
            .finish()
    }
}
