//! Cooperative task plumbing.
//!
//! The engine runs under strictly single-threaded cooperative
//! multitasking: a task's callback runs to completion, states what it
//! wants next, and control returns to the scheduler. There is no
//! preemption; long operations are explicit state machines resumed on
//! each entry.

/// What a task wants from its scheduler after a poll.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Poll {
    /// Run again at the next opportunity.
    Now,
    /// Run again after at least this many milliseconds.
    After(u32),
    /// Nothing to do until re-armed externally.
    Idle,
}

impl Poll {
    /// Combines two schedules, keeping whichever wants to run sooner.
    /// Used when one poll drives several state machines.
    pub fn sooner(self, other: Poll) -> Poll {
        match (self, other) {
            (Poll::Now, _) | (_, Poll::Now) => Poll::Now,
            (Poll::After(a), Poll::After(b)) => Poll::After(a.min(b)),
            (Poll::After(a), Poll::Idle) | (Poll::Idle, Poll::After(a)) => Poll::After(a),
            (Poll::Idle, Poll::Idle) => Poll::Idle,
        }
    }
}

/// A monotonic microsecond clock, normally supplied by the scheduler.
pub trait Clock {
    fn now_us(&self) -> u64;
}

impl<'a, C: Clock> Clock for &'a C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// A cooperatively scheduled task: poll it, then honor the returned
/// schedule.
pub trait Task {
    fn poll(&mut self) -> Poll;
}

cfg_if::cfg_if! {
    if #[cfg(any(test, feature = "std"))] {
        /// Monotonic clock backed by `std::time::Instant`, for running the
        /// engine on a host.
        pub struct StdClock {
            epoch: std::time::Instant,
        }

        impl StdClock {
            pub fn new() -> StdClock {
                StdClock {
                    epoch: std::time::Instant::now(),
                }
            }
        }

        impl Default for StdClock {
            fn default() -> StdClock {
                StdClock::new()
            }
        }

        impl Clock for StdClock {
            fn now_us(&self) -> u64 {
                self.epoch.elapsed().as_micros() as u64
            }
        }
    }
}
