//! Animation-frame registrations as scoped resources.
//!
//! The host owns the real frame loop (`requestAnimationFrame`, a winit
//! redraw request, a test clock). The view asks it for frames through
//! [`FrameScheduler`] and holds every outstanding request in a
//! [`FrameHandle`]. Dropping the handle cancels the request, so tearing
//! the view down on any path leaves no redraw loop behind.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

/// Host-issued identifier of one pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// The host's frame loop.
///
/// Methods take `&self`: schedulers are shared by every handle the view
/// holds and use interior mutability if they keep state.
pub trait FrameScheduler {
    /// Request one callback on the next frame.
    fn request_frame(&self) -> FrameId;

    /// Cancel a pending request. Cancelling an id that already fired, or
    /// was already cancelled, must be a no-op.
    fn cancel_frame(&self, id: FrameId);
}

/// Which loop a handle drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLoop {
    /// Particle twinkle and satellite bob.
    Ambient,
    /// Time-cursor autoplay.
    Autoplay,
}

impl fmt::Display for FrameLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ambient => f.write_str("ambient"),
            Self::Autoplay => f.write_str("autoplay"),
        }
    }
}

/// A pending frame request, cancelled on drop.
pub struct FrameHandle {
    scheduler: Rc<dyn FrameScheduler>,
    pending: Option<FrameId>,
    purpose: FrameLoop,
}

impl FrameHandle {
    /// Request a first frame for `purpose`.
    pub fn acquire(scheduler: Rc<dyn FrameScheduler>, purpose: FrameLoop) -> Self {
        let id = scheduler.request_frame();
        trace!(%id, %purpose, "Frame loop acquired");
        Self {
            scheduler,
            pending: Some(id),
            purpose,
        }
    }

    /// Whether `id` is this handle's pending request.
    pub fn owns(&self, id: FrameId) -> bool {
        self.pending == Some(id)
    }

    /// The pending request, if any.
    pub const fn pending(&self) -> Option<FrameId> {
        self.pending
    }

    /// Which loop this handle drives.
    pub const fn purpose(&self) -> FrameLoop {
        self.purpose
    }

    /// The pending frame fired: request the next one.
    pub fn rearm(&mut self) {
        self.pending = Some(self.scheduler.request_frame());
    }

    /// Cancel the pending request now instead of at drop.
    pub fn release(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
            trace!(%id, purpose = %self.purpose, "Frame loop released");
        }
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameHandle")
            .field("pending", &self.pending)
            .field("purpose", &self.purpose)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeSet;

    use super::*;

    #[derive(Default)]
    struct Ledger {
        next: u64,
        live: BTreeSet<FrameId>,
    }

    #[derive(Default)]
    struct TestScheduler(RefCell<Ledger>);

    impl FrameScheduler for TestScheduler {
        fn request_frame(&self) -> FrameId {
            let mut ledger = self.0.borrow_mut();
            ledger.next += 1;
            let id = FrameId(ledger.next);
            ledger.live.insert(id);
            id
        }

        fn cancel_frame(&self, id: FrameId) {
            self.0.borrow_mut().live.remove(&id);
        }
    }

    #[test]
    fn drop_cancels_the_pending_frame() {
        let scheduler = Rc::new(TestScheduler::default());
        {
            let handle = FrameHandle::acquire(scheduler.clone(), FrameLoop::Ambient);
            assert!(handle.owns(FrameId(1)));
            assert_eq!(scheduler.0.borrow().live.len(), 1);
        }
        assert!(scheduler.0.borrow().live.is_empty());
    }

    #[test]
    fn rearm_moves_to_a_new_frame() {
        let scheduler = Rc::new(TestScheduler::default());
        let mut handle = FrameHandle::acquire(scheduler.clone(), FrameLoop::Autoplay);
        // The host fires frame 1 and forgets it.
        scheduler.0.borrow_mut().live.remove(&FrameId(1));
        handle.rearm();
        assert!(handle.owns(FrameId(2)));
        assert!(!handle.owns(FrameId(1)));
        handle.release();
        assert!(scheduler.0.borrow().live.is_empty());
    }

    #[test]
    fn debug_does_not_need_the_scheduler() {
        let scheduler = Rc::new(TestScheduler::default());
        let handle = FrameHandle::acquire(scheduler, FrameLoop::Ambient);
        let text = format!("{handle:?}");
        assert!(text.contains("Ambient"));
    }
}
