use std::time::{Duration, Instant};

use pagecore::{compose_preview, SourceSet};

/// Coalesces bursts of edits into a single render pass.
///
/// The pending render is a single slot, not a queue: scheduling always
/// replaces whatever deadline was armed before, so at most one render is
/// ever outstanding and only the newest buffer state gets rendered.
/// Intermediate states typed through during the quiescence window are
/// dropped on purpose.
pub struct Compositor {
    window: Duration,
    deadline: Option<Instant>,
}

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

impl Compositor {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// (Re)arms the debounce deadline. Called after every buffer write.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Drops any pending render. A manual run calls this first so it is not
    /// followed by a redundant scheduled one.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the quiescence window has elapsed, clearing
    /// the slot. The event loop calls this every tick.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Builds the preview document from current buffer state.
    pub fn compose(&self, sources: &SourceSet) -> String {
        compose_preview(sources)
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecore::SourceKind;

    fn compositor() -> Compositor {
        Compositor::new(Duration::from_millis(500))
    }

    #[test]
    fn test_not_due_before_window() {
        let mut c = compositor();
        let t0 = Instant::now();
        c.schedule(t0);
        assert!(!c.take_due(t0));
        assert!(!c.take_due(t0 + Duration::from_millis(499)));
        assert!(c.is_armed());
    }

    #[test]
    fn test_due_at_and_after_window() {
        let mut c = compositor();
        let t0 = Instant::now();
        c.schedule(t0);
        assert!(c.take_due(t0 + Duration::from_millis(500)));
        // Slot is cleared; nothing fires twice.
        assert!(!c.take_due(t0 + Duration::from_secs(10)));
        assert!(!c.is_armed());
    }

    #[test]
    fn test_burst_of_edits_coalesces_to_one_render() {
        let mut c = compositor();
        let mut sources = SourceSet::empty();
        let t0 = Instant::now();

        let mut renders = 0;
        for (i, text) in ["a", "ab", "abc"].iter().enumerate() {
            let now = t0 + Duration::from_millis(100 * i as u64);
            sources.set(SourceKind::Js, text.to_string());
            c.schedule(now);
            if c.take_due(now) {
                renders += 1;
            }
        }
        assert_eq!(renders, 0);

        // Silence past the window from the last edit.
        assert!(c.take_due(t0 + Duration::from_millis(200 + 500)));
        renders += 1;
        assert_eq!(renders, 1);
        // And the document reflects only the final state.
        assert!(c.compose(&sources).contains("<script>abc</script>"));
    }

    #[test]
    fn test_reschedule_pushes_deadline_back() {
        let mut c = compositor();
        let t0 = Instant::now();
        c.schedule(t0);
        c.schedule(t0 + Duration::from_millis(400));
        // The first deadline no longer exists.
        assert!(!c.take_due(t0 + Duration::from_millis(500)));
        assert!(c.take_due(t0 + Duration::from_millis(900)));
    }

    #[test]
    fn test_manual_run_cancels_pending() {
        let mut c = compositor();
        let t0 = Instant::now();
        c.schedule(t0);

        // A manual render cancels the slot and composes right away.
        c.cancel();
        let doc = c.compose(&SourceSet::empty());
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(!c.take_due(t0 + Duration::from_secs(1)));
    }
}
