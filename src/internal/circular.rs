//! Circular dependency detection infrastructure.

use std::any::TypeId;
use std::cell::RefCell;

use crate::error::{DiError, DiResult};

// Thread-local resolution state for circular dependency detection
thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

/// One in-flight resolution: the resolving injector and the requested type.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Frame {
    owner: usize,
    type_id: TypeId,
    name: &'static str,
}

impl Frame {
    fn same_request(&self, other: &Frame) -> bool {
        self.owner == other.owner && self.type_id == other.type_id
    }
}

#[derive(Default)]
struct ResolutionTls {
    stack: Vec<Frame>,
}

/// Guard for managing the thread-local resolution stack.
///
/// Entering pushes a frame; dropping pops it, also while unwinding. Frames are
/// identified by the resolving injector and the requested `TypeId`, so nested
/// resolutions through another injector never look like a cycle.
pub(crate) struct StackGuard {
    frame: Frame,
}

impl StackGuard {
    /// Pushes a frame for `type_id` resolved by `owner`, failing if the same
    /// request is already in flight on this thread or the stack is `max_depth`
    /// deep.
    pub(crate) fn enter(owner: usize, type_id: TypeId, name: &'static str, max_depth: usize) -> DiResult<Self> {
        let frame = Frame { owner, type_id, name };
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();

            // Circular detection BEFORE pushing the new frame
            if let Some(start) = tls.stack.iter().position(|f| f.same_request(&frame)) {
                let mut path: Vec<_> = tls.stack[start..].iter().map(|f| f.name).collect();
                path.push(name);
                return Err(DiError::Circular(path));
            }

            if tls.stack.len() >= max_depth {
                return Err(DiError::DepthExceeded(max_depth));
            }

            tls.stack.push(frame);
            Ok(Self { frame })
        })
    }

    /// Current depth of the resolution stack on this thread.
    #[cfg(test)]
    pub(crate) fn depth() -> usize {
        RESOLUTION_TLS.with(|tls| tls.borrow().stack.len())
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if let Some(last) = tls.stack.pop() {
                debug_assert!(last == self.frame);
            }
        });
    }
}
