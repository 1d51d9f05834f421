use crate::foundation::error::StoryResult;

/// Result of one frame tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Schedule another tick.
    Continue,
    /// The frame loop is over.
    Done,
}

/// Work driven one frame at a time.
pub trait FrameTask {
    fn tick(&mut self) -> StoryResult<TickOutcome>;
}

/// Drives a [`FrameTask`] until it reports [`TickOutcome::Done`].
///
/// Implementations decide when each tick runs (display refresh, a fixed clock, back to back). A
/// tick always finishes before the next one starts.
pub trait FrameScheduler {
    fn run(&mut self, task: &mut dyn FrameTask) -> StoryResult<u64>;
}

/// Runs ticks back to back on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler {
    /// Stop with an error after this many ticks.
    pub max_ticks: Option<u64>,
}

impl ImmediateScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for ImmediateScheduler {
    /// Returns the number of ticks run.
    fn run(&mut self, task: &mut dyn FrameTask) -> StoryResult<u64> {
        let mut ticks = 0u64;
        loop {
            if self.max_ticks.is_some_and(|m| ticks >= m) {
                return Err(crate::foundation::error::StoryError::evaluation(format!(
                    "frame loop exceeded {ticks} ticks"
                )));
            }
            ticks += 1;
            if task.tick()? == TickOutcome::Done {
                return Ok(ticks);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scheduler.rs"]
mod tests;
