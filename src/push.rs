//! The asynchronous buffer push protocol.
//!
//! Pushing a rendered buffer down an I2C/SPI link takes milliseconds. The
//! pusher splits the transfer into non-blocking steps so the scheduler —
//! and the next frame's rendering — keep running in between:
//!
//! ```text
//! Idle --start_push--> Start --driver ready--> Pushing --wire quiet--> End --> Idle
//! ```
//!
//! The driver is the sole authority on completion. A wedged driver stalls
//! the pusher forever, which its owner observes as a liveness failure,
//! not a crash: there is deliberately no internal timeout, because
//! abandoning a transfer mid-wire could corrupt driver state.

use core::ptr::NonNull;

use crate::driver::ScreenDriver;
use crate::task::Poll;

/// Externally visible protocol state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PushState {
    Idle,
    Start,
    Pushing,
    End,
}

#[derive(Copy, Clone)]
enum State {
    Idle,
    Start(NonNull<[u8]>),
    Pushing(NonNull<[u8]>),
    End,
}

/// Pushes one buffer to a [`ScreenDriver`] across multiple non-blocking
/// polls.
///
/// The buffer rides inside the state between polls as a raw pointer — see
/// [`start_push`](BufferPusher::start_push) for the contract. Holding the
/// pointer (and replaying it to the driver's `push_buffer` and
/// `pushing_buffer` calls) keeps the protocol honest: the driver sees the
/// same bytes from start to end even if the owner's bookkeeping changes
/// underneath.
pub struct BufferPusher {
    state: State,
    not_before: u64,
    started_at: u64,
    last_push_us: u32,
    failed: bool,
}

impl BufferPusher {
    pub const fn new() -> BufferPusher {
        BufferPusher {
            state: State::Idle,
            not_before: 0,
            started_at: 0,
            last_push_us: 0,
            failed: false,
        }
    }

    /// Reported protocol state.
    pub fn state(&self) -> PushState {
        match self.state {
            State::Idle => PushState::Idle,
            State::Start(_) => PushState::Start,
            State::Pushing(_) => PushState::Pushing,
            State::End => PushState::End,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// True after a driver refused a buffer. Sticky until
    /// [`reset`](BufferPusher::reset).
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Duration of the last completed push, in microseconds.
    pub fn last_push_us(&self) -> u32 {
        self.last_push_us
    }

    /// Returns the protocol to `Idle` and clears the failure flag. Any
    /// stored buffer pointer is dropped without touching the driver.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.not_before = 0;
        self.failed = false;
    }

    /// True when a new push could start right now: protocol idle and the
    /// driver reporting readiness.
    pub fn can_push<D: ScreenDriver>(&self, driver: &D) -> bool {
        self.is_idle() && driver.can_push_buffer()
    }

    /// Accepts a buffer and arms the protocol. Returns false — and does
    /// nothing — for a null pointer, or when a push is already in flight.
    ///
    /// # Safety
    ///
    /// `buffer` must point to initialized memory that stays valid, at a
    /// stable address, and unwritten from this call until the protocol
    /// next reports [`is_idle`](BufferPusher::is_idle). The engine
    /// upholds this through flip discipline: a band's pointer only comes
    /// here after `flip` retired it from rendering, and the band is not
    /// written again until the push completes.
    pub unsafe fn start_push(&mut self, buffer: *const [u8]) -> bool {
        let buffer = match NonNull::new(buffer as *mut [u8]) {
            Some(b) => b,
            None => return false,
        };
        if !self.is_idle() {
            return false;
        }
        self.state = State::Start(buffer);
        self.not_before = 0;
        true
    }

    /// Advances the protocol. `now` is the scheduler's microsecond clock.
    pub fn poll<D: ScreenDriver>(&mut self, now: u64, driver: &mut D) -> Poll {
        if now < self.not_before {
            // Polled ahead of the driver's delay hint; report the
            // remainder instead of hammering the bus.
            let ms = ((self.not_before - now) / 1000) as u32;
            return if ms == 0 { Poll::Now } else { Poll::After(ms) };
        }
        match self.state {
            State::Idle => Poll::Idle,
            State::Start(buffer) => {
                if !driver.can_push_buffer() {
                    return Poll::Now;
                }
                self.started_at = now;
                driver.start_buffer();
                // Safety: per the start_push contract the pointee is valid
                // and stable until the protocol goes idle.
                let bytes = unsafe { buffer.as_ref() };
                match driver.push_buffer(bytes) {
                    Some(hint_ms) => {
                        self.not_before = now + u64::from(hint_ms) * 1000;
                        self.state = State::Pushing(buffer);
                        if hint_ms == 0 {
                            Poll::Now
                        } else {
                            Poll::After(hint_ms)
                        }
                    }
                    None => {
                        log::error!("screen driver refused buffer");
                        driver.end_buffer();
                        self.state = State::Idle;
                        self.failed = true;
                        Poll::Idle
                    }
                }
            }
            State::Pushing(buffer) => {
                // Safety: same contract as above.
                let bytes = unsafe { buffer.as_ref() };
                if driver.pushing_buffer(bytes) {
                    Poll::Now
                } else {
                    self.state = State::End;
                    Poll::Now
                }
            }
            State::End => {
                driver.end_buffer();
                self.last_push_us = now.saturating_sub(self.started_at) as u32;
                self.state = State::Idle;
                Poll::Idle
            }
        }
    }
}
