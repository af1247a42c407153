//! Single-deadline timer handle driven by the host loop's clock.

/// One cancellable deadline. Arming replaces any previous deadline, so at
/// most one fire is ever outstanding per slot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimerSlot {
    deadline_ms: Option<u64>,
}

impl TimerSlot {
    pub const fn new() -> Self {
        Self { deadline_ms: None }
    }

    pub fn arm(&mut self, now_ms: u64, delay_ms: u32) {
        self.deadline_ms = Some(now_ms.saturating_add(u64::from(delay_ms)));
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Disarms and reports `true` once the deadline has passed.
    pub fn take_due(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}
