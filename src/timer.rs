/// Outcome of a single timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running(u32),
    Expired,
}

/// Inactivity countdown, measured in ticks on the application clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutTimer {
    remaining: u32,
    tick_ms: u64,
    next_tick_at: u64,
}

impl LogoutTimer {
    /// Starts a countdown of `duration` ticks at clock instant `now`.
    pub fn start(now: u64, duration: u32, tick_ms: u64) -> Self {
        LogoutTimer {
            remaining: duration,
            tick_ms,
            next_tick_at: now.saturating_add(tick_ms),
        }
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn next_tick_at(&self) -> u64 {
        self.next_tick_at
    }

    pub fn tick(&mut self) -> TimerState {
        self.remaining = self.remaining.saturating_sub(1);
        self.next_tick_at = self.next_tick_at.saturating_add(self.tick_ms);
        if self.remaining == 0 {
            TimerState::Expired
        } else {
            TimerState::Running(self.remaining)
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn label(&self) -> String {
        format_countdown(self.remaining)
    }
}

pub fn format_countdown(remaining: u32) -> String {
    format!("{:02}:{:02}", remaining / 60, remaining % 60)
}
