//! Frame loop
//!
//! The animator owns a field and at most one pending frame request. Each
//! frame clears the pending handle, paints, then asks the scheduler for the
//! next frame, so two frames are never in flight at once. `stop` cancels
//! whatever is pending.

use crate::field::ParticleField;
use crate::renderer::Surface;

/// Source of display-refresh callbacks (`requestAnimationFrame` on the web).
/// The scheduler is responsible for calling `Animator::on_frame` when a
/// requested frame fires.
pub trait FrameScheduler {
    type Handle;

    /// Request one callback at the next display refresh; `None` when the
    /// request could not be made
    fn schedule(&mut self) -> Option<Self::Handle>;

    /// Withdraw a request that has not fired yet
    fn cancel(&mut self, handle: Self::Handle);
}

pub struct Animator<S: Surface, F: FrameScheduler> {
    field: ParticleField<S>,
    scheduler: F,
    pending: Option<F::Handle>,
}

impl<S: Surface, F: FrameScheduler> Animator<S, F> {
    pub fn new(field: ParticleField<S>, scheduler: F) -> Self {
        Self {
            field,
            scheduler,
            pending: None,
        }
    }

    /// Build the grid, paint the first frame and keep going.
    /// Starting an already running animator only rebuilds the grid.
    pub fn start(&mut self) {
        self.field.init_grid();
        if self.pending.is_some() {
            log::debug!("Animator already running");
            return;
        }
        log::info!("Animation started");
        self.frame();
    }

    /// Cancel the pending frame; no-op when stopped
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
            log::info!("Animation stopped");
        }
    }

    /// Scheduler callback for a frame requested by this animator
    pub fn on_frame(&mut self) {
        if self.pending.take().is_none() {
            // Stopped after the browser already queued the callback
            return;
        }
        self.frame();
    }

    fn frame(&mut self) {
        self.field.render_frame();
        self.pending = self.scheduler.schedule();
        if self.pending.is_none() {
            log::warn!("No next frame scheduled, animation halted");
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn field(&self) -> &ParticleField<S> {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField<S> {
        &mut self.field
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use crate::settings::FieldOptions;
    use std::collections::BTreeSet;

    /// Scheduler that just remembers outstanding requests
    #[derive(Default)]
    struct ManualScheduler {
        next: u32,
        outstanding: BTreeSet<u32>,
        cancelled: u32,
        refuse: bool,
    }

    impl FrameScheduler for ManualScheduler {
        type Handle = u32;

        fn schedule(&mut self) -> Option<u32> {
            if self.refuse {
                return None;
            }
            self.next += 1;
            self.outstanding.insert(self.next);
            Some(self.next)
        }

        fn cancel(&mut self, handle: u32) {
            self.outstanding.remove(&handle);
            self.cancelled += 1;
        }
    }

    /// Fire the outstanding request the way a browser would
    fn fire(animator: &mut Animator<RecordingSurface, ManualScheduler>) {
        let handle = *animator.scheduler.outstanding.iter().next().expect("a frame is pending");
        animator.scheduler.outstanding.remove(&handle);
        animator.on_frame();
    }

    fn animator() -> Animator<RecordingSurface, ManualScheduler> {
        let field =
            ParticleField::new(RecordingSurface::new(800.0, 600.0), &FieldOptions::default(), 9);
        Animator::new(field, ManualScheduler::default())
    }

    #[test]
    fn test_start_renders_and_schedules() {
        let mut a = animator();
        assert!(!a.is_running());
        a.start();
        assert!(a.is_running());
        assert_eq!(a.field().particles().len(), 638);
        assert_eq!(a.scheduler().outstanding.len(), 1);
        assert!((a.field().time() - 0.015).abs() < 1e-12);

        for _ in 0..3 {
            fire(&mut a);
            assert_eq!(a.scheduler().outstanding.len(), 1);
        }
        assert!((a.field().time() - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_double_start_keeps_one_frame_in_flight() {
        let mut a = animator();
        a.start();
        a.start();
        assert_eq!(a.scheduler().outstanding.len(), 1);
        assert!((a.field().time() - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut a = animator();
        a.stop();
        assert_eq!(a.scheduler().cancelled, 0);

        a.start();
        a.stop();
        a.stop();
        assert!(!a.is_running());
        assert!(a.scheduler().outstanding.is_empty());
        assert_eq!(a.scheduler().cancelled, 1);
    }

    #[test]
    fn test_late_callback_after_stop_is_ignored() {
        let mut a = animator();
        a.start();
        a.stop();
        let time = a.field().time();
        a.on_frame();
        assert_eq!(a.field().time(), time);
        assert!(!a.is_running());
    }

    #[test]
    fn test_refused_schedule_is_not_running() {
        let mut a = animator();
        a.scheduler.refuse = true;
        a.start();
        assert!(!a.is_running());
        assert!((a.field().time() - 0.015).abs() < 1e-12);

        // A later start retries once the scheduler works again
        a.scheduler.refuse = false;
        a.start();
        assert!(a.is_running());
        assert_eq!(a.scheduler().outstanding.len(), 1);
    }

    #[test]
    fn test_restart_after_stop() {
        let mut a = animator();
        a.start();
        a.stop();
        a.start();
        assert!(a.is_running());
        assert_eq!(a.scheduler().outstanding.len(), 1);
    }
}
