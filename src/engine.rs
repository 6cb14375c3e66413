//! The per-frame engine state machine.
//!
//! One pass through the states produces exactly one frame:
//!
//! ```text
//! WaitForScreenStart -> Clear -> Render -> Sync -> PushBuffer
//!        ^                ^                            |  \
//!        |                |             (flip failed)  |   \ (flipped)
//!        |                |                            v    v
//!        |                +--------- FinalizeFrame <- WaitingForPush
//! ```
//!
//! The engine is itself a cooperative [`Task`]: each poll advances at
//! most a state or two and returns a schedule. It also steps the push
//! protocol at the top of every poll, so an in-flight transfer keeps
//! draining while the next frame clears and renders — that overlap is the
//! point of the design, not an accident, which is why nothing here ever
//! blocks on the wire.

use log::{debug, error, warn};
use smart_default::SmartDefault;

use crate::driver::ScreenDriver;
use crate::framebuffer::FrameBuffer;
use crate::push::BufferPusher;
use crate::task::{Clock, Poll, Task};
use crate::timing::{FrameTiming, SyncKind, SyncOutcome};

/// Lifecycle state; one full cycle per frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EngineState {
    /// Waiting for the driver to accept its first buffer.
    WaitForScreenStart,
    /// Clearing the write band, possibly over several polls.
    Clear,
    /// The drawer is producing the frame's content.
    Render,
    /// Waiting for the pacing policy to declare the frame due.
    Sync,
    /// Handing the finished band to the push protocol.
    PushBuffer,
    /// Single-buffered: waiting out the wire before the band can be
    /// reused.
    WaitingForPush,
    /// Publishing the timing snapshot and wrapping up.
    FinalizeFrame,
}

/// Produces frame content.
///
/// Returning false means the draw cycle is incomplete; the engine polls
/// again with the *same* frame timestamp and counter until the drawer
/// reports done, so a drawer may spread expensive frames over several
/// scheduler passes.
pub trait Drawer<FB> {
    fn draw(&mut self, fb: &mut FB, timestamp_us: u64, frame: u16) -> bool;
}

impl<FB, F> Drawer<FB> for F
where
    F: FnMut(&mut FB, u64, u16) -> bool,
{
    fn draw(&mut self, fb: &mut FB, timestamp_us: u64, frame: u16) -> bool {
        self(fb, timestamp_us, frame)
    }
}

/// Engine tunables.
#[derive(SmartDefault, Copy, Clone, Debug)]
pub struct EngineConfig {
    /// Target frame period in microseconds. The default paces 60 Hz.
    #[default = 16_666]
    pub target_period_us: u32,
    /// Pacing policy.
    #[default(SyncKind::VSync)]
    pub sync: SyncKind,
    /// A render or push phase longer than this logs one warning per
    /// frame. Stalls are never fatal: the state machine keeps polling,
    /// since abandoning the hardware mid-transfer is worse than waiting.
    #[default = 1_000_000]
    pub stall_warn_us: u32,
}

/// The display engine.
///
/// Borrows its framebuffer and driver (both are owned externally, as is
/// the drawer), owns the push protocol, and carries the working and
/// published timing records. Keeping the raw pushed-buffer pointer inside
/// makes the engine deliberately not `Send`: it lives on the cooperative
/// thread it was built on.
pub struct Engine<'a, FB, D, C> {
    fb: &'a mut FB,
    driver: &'a mut D,
    clock: C,
    drawer: Option<&'a mut dyn Drawer<FB>>,
    pusher: BufferPusher,
    config: EngineConfig,
    state: EngineState,
    running: bool,
    sync_ref: u64,
    frame: u16,
    frame_ts: u64,
    phase_entered: u64,
    push_phase_entered: u64,
    cur: FrameTiming,
    published: FrameTiming,
    stall_logged: bool,
}

impl<'a, FB, D, C> Engine<'a, FB, D, C>
where
    FB: FrameBuffer,
    D: ScreenDriver,
    C: Clock,
{
    pub fn new(fb: &'a mut FB, driver: &'a mut D, clock: C, config: EngineConfig) -> Self {
        Engine {
            fb,
            driver,
            clock,
            drawer: None,
            pusher: BufferPusher::new(),
            config,
            state: EngineState::WaitForScreenStart,
            running: false,
            sync_ref: 0,
            frame: 0,
            frame_ts: 0,
            phase_entered: 0,
            push_phase_entered: 0,
            cur: FrameTiming::default(),
            published: FrameTiming::default(),
            stall_logged: false,
        }
    }

    /// Starts the engine: validates the framebuffer against the driver's
    /// reported dimensions, starts the driver, and arms the state
    /// machine. On any failure the engine is stopped cleanly and false is
    /// returned — it never half-starts.
    pub fn start(&mut self) -> bool {
        let (dw, dh) = (self.driver.width(), self.driver.height());
        if dw == 0 || dh == 0 || dw != self.fb.phys_width() || dh != self.fb.phys_height() {
            warn!(
                "framebuffer {}x{} does not fit panel {}x{}",
                self.fb.phys_width(),
                self.fb.phys_height(),
                dw,
                dh
            );
            self.stop();
            return false;
        }
        if !self.driver.start() {
            self.stop();
            return false;
        }
        self.pusher.reset();
        self.state = EngineState::WaitForScreenStart;
        self.running = true;
        debug!("engine started, {}x{} panel", dw, dh);
        true
    }

    /// Stops the engine immediately: no further state transitions occur.
    /// An in-flight push is not forcibly aborted; tearing the wire down
    /// is the driver's job.
    pub fn stop(&mut self) {
        self.running = false;
        self.driver.stop();
    }

    /// Installs (or removes) the drawer. Takes effect at the next clear;
    /// a frame caught mid-render is abandoned by rewinding to
    /// `WaitForScreenStart`.
    pub fn set_drawer(&mut self, drawer: Option<&'a mut dyn Drawer<FB>>) {
        self.drawer = drawer;
        if self.state == EngineState::Render {
            self.state = EngineState::WaitForScreenStart;
        }
    }

    pub fn set_sync(&mut self, sync: SyncKind) {
        self.config.sync = sync;
    }

    pub fn set_target_period_us(&mut self, target_us: u32) {
        self.config.target_period_us = target_us;
    }

    /// The most recently published frame's timing snapshot.
    pub fn timing(&self) -> FrameTiming {
        self.published
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances the engine, and the push protocol riding along with it,
    /// by one cooperative step.
    pub fn poll(&mut self) -> Poll {
        if !self.running {
            return Poll::Idle;
        }
        let now = self.clock.now_us();
        let push_sched = self.step_pusher(now);
        if self.pusher.failed() {
            error!("transport failure; stopping engine");
            self.stop();
            return Poll::Idle;
        }
        self.step(now).sooner(push_sched)
    }

    fn step_pusher(&mut self, now: u64) -> Poll {
        if self.pusher.is_idle() {
            return Poll::Idle;
        }
        let sched = self.pusher.poll(now, &mut *self.driver);
        let took = self.clock.now_us().saturating_sub(now) as u32;
        if took > self.cur.longest_push_us {
            self.cur.longest_push_us = took;
        }
        sched
    }

    fn enter(&mut self, state: EngineState, at: u64) {
        self.state = state;
        self.phase_entered = at;
        self.stall_logged = false;
    }

    fn warn_stall(&mut self, now: u64, what: &str) {
        if !self.stall_logged
            && now.saturating_sub(self.phase_entered) > u64::from(self.config.stall_warn_us)
        {
            warn!("{} stalled past {} us", what, self.config.stall_warn_us);
            self.stall_logged = true;
        }
    }

    fn step(&mut self, now: u64) -> Poll {
        match self.state {
            EngineState::WaitForScreenStart => {
                if self.driver.can_push_buffer() {
                    // Seed so the counter wraps to zero on the first
                    // increment, and so the pacing policy does not hold
                    // the first frame back a full period.
                    self.frame = u16::MAX;
                    self.sync_ref =
                        now.saturating_sub(u64::from(self.config.target_period_us));
                    self.enter(EngineState::Clear, now);
                }
                Poll::Now
            }
            EngineState::Clear => {
                if self.fb.clear_step() {
                    self.frame = self.frame.wrapping_add(1);
                    self.frame_ts = now;
                    self.cur.frame = self.frame;
                    self.cur.timestamp_us = now;
                    self.cur.clear_us = now.saturating_sub(self.phase_entered) as u32;
                    // Longest-call figures describe exactly one frame.
                    self.cur.longest_render_us = 0;
                    self.cur.longest_push_us = 0;
                    self.cur.target_period_us = self.config.target_period_us;
                    self.cur.sync = self.config.sync;
                    self.enter(EngineState::Render, now);
                }
                Poll::Now
            }
            EngineState::Render => {
                let done = match self.drawer {
                    None => true,
                    Some(ref mut drawer) => {
                        let t0 = self.clock.now_us();
                        // A drawer that panics leaves a half-built frame;
                        // poison the engine rather than push it.
                        let running = &mut self.running;
                        let poisoner = scopeguard::guard((), |_| *running = false);
                        let done = drawer.draw(&mut *self.fb, self.frame_ts, self.frame);
                        scopeguard::ScopeGuard::into_inner(poisoner);
                        let took = self.clock.now_us().saturating_sub(t0) as u32;
                        if took > self.cur.longest_render_us {
                            self.cur.longest_render_us = took;
                        }
                        done
                    }
                };
                if done {
                    let t = self.clock.now_us();
                    self.cur.render_us = t.saturating_sub(self.phase_entered) as u32;
                    self.enter(EngineState::Sync, t);
                } else {
                    self.warn_stall(now, "render");
                }
                Poll::Now
            }
            EngineState::Sync => {
                let outcome =
                    self.config
                        .sync
                        .check(now, &mut self.sync_ref, self.config.target_period_us);
                match outcome {
                    SyncOutcome::Synced { frame_duration } => {
                        self.cur.frame_duration_us =
                            frame_duration.min(u64::from(u32::MAX)) as u32;
                        self.cur.sync_us = now.saturating_sub(self.phase_entered) as u32;
                        self.push_phase_entered = now;
                        self.enter(EngineState::PushBuffer, now);
                        Poll::Now
                    }
                    SyncOutcome::NotYet(sched) => sched,
                }
            }
            EngineState::PushBuffer => {
                if !self.pusher.can_push(&*self.driver) {
                    // Previous transfer still draining, or the driver is
                    // busy.
                    self.warn_stall(now, "push handoff");
                    return Poll::Now;
                }
                let flipped = self.fb.flip();
                let buffer = self.fb.transport() as *const [u8];
                // Safety: flip() has just retired this band from
                // rendering. If it returned true the renderer moves on to
                // the other band; if false the engine sits in
                // WaitingForPush and touches no pixels until the pusher
                // goes idle. The band's storage sits behind the
                // framebuffer borrow and does not move (FrameBuffer's
                // contract), so the pointer stays valid across polls.
                let accepted = unsafe { self.pusher.start_push(buffer) };
                debug_assert!(accepted);
                let next = if flipped {
                    EngineState::FinalizeFrame
                } else {
                    EngineState::WaitingForPush
                };
                self.enter(next, now);
                Poll::Now
            }
            EngineState::WaitingForPush => {
                if self.pusher.is_idle() {
                    self.enter(EngineState::FinalizeFrame, now);
                } else {
                    self.warn_stall(now, "push");
                }
                Poll::Now
            }
            EngineState::FinalizeFrame => {
                self.cur.push_us = now.saturating_sub(self.push_phase_entered) as u32;
                self.published = self.cur;
                self.enter(EngineState::Clear, now);
                Poll::Now
            }
        }
    }
}

impl<'a, FB, D, C> Task for Engine<'a, FB, D, C>
where
    FB: FrameBuffer,
    D: ScreenDriver,
    C: Clock,
{
    fn poll(&mut self) -> Poll {
        Engine::poll(self)
    }
}
