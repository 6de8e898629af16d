/// The single deferred "end power mode" action. Arming always replaces
/// whatever was pending, so at most one expiry is ever outstanding.
#[derive(Clone, Debug, Default)]
pub struct PowerModeTimer {
    due_at_ms: Option<u64>,
}

impl PowerModeTimer {
    /// Returns true when a pending expiry was replaced.
    pub fn arm(&mut self, now_ms: u64, duration_ms: u64) -> bool {
        let replaced = self.cancel();
        self.due_at_ms = Some(now_ms.saturating_add(duration_ms));
        replaced
    }

    /// Returns true when something was pending.
    pub fn cancel(&mut self) -> bool {
        self.due_at_ms.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.due_at_ms.is_some()
    }

    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.due_at_ms.map(|due| due.saturating_sub(now_ms))
    }

    /// Consumes the pending expiry once `now_ms` reaches it.
    pub fn fire_if_due(&mut self, now_ms: u64) -> bool {
        match self.due_at_ms {
            Some(due) if now_ms >= due => {
                self.due_at_ms = None;
                true
            }
            _ => false,
        }
    }
}
