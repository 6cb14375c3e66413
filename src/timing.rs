//! Frame pacing policies and the published per-frame timing record.

use crate::task::Poll;

/// Frame pacing policy, evaluated in the engine's `Sync` state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SyncKind {
    /// Never throttles: every frame is due immediately, and the frame
    /// duration is simply the time since the previous sync.
    NoSync,
    /// Variable refresh: a frame is due once a full period has elapsed,
    /// and the reference moves to now. Slow frames shift the grid forward
    /// instead of being chased, so lag never accumulates.
    Vrr,
    /// Fixed grid: a frame is due once a full period has elapsed, and the
    /// reference advances by a whole number of periods. Frame boundaries
    /// stay on exact multiples of the target, and a slow frame is caught
    /// up afterwards.
    VSync,
}

impl Default for SyncKind {
    fn default() -> SyncKind {
        SyncKind::VSync
    }
}

pub(crate) enum SyncOutcome {
    /// The frame is due; `frame_duration` is the time since the previous
    /// sync point.
    Synced { frame_duration: u64 },
    /// Not yet; reschedule per the contained hint.
    NotYet(Poll),
}

impl SyncKind {
    /// Evaluates the policy at `now` against the rolling sync reference.
    ///
    /// While `VSync` waits, it asks to sleep `max(1, remaining_ms) − 1`
    /// milliseconds: a sleep quantized to milliseconds can overshoot by
    /// almost one, so the final millisecond is always busy-polled.
    pub(crate) fn check(self, now: u64, sync_ref: &mut u64, target_us: u32) -> SyncOutcome {
        let elapsed = now.saturating_sub(*sync_ref);
        let target = u64::from(target_us);
        match self {
            SyncKind::NoSync => {
                *sync_ref = now;
                SyncOutcome::Synced {
                    frame_duration: elapsed,
                }
            }
            SyncKind::Vrr => {
                if elapsed >= target {
                    *sync_ref = now;
                    SyncOutcome::Synced {
                        frame_duration: elapsed,
                    }
                } else {
                    SyncOutcome::NotYet(Poll::Now)
                }
            }
            SyncKind::VSync => {
                if elapsed >= target {
                    *sync_ref += target * (elapsed / target);
                    SyncOutcome::Synced {
                        frame_duration: elapsed,
                    }
                } else {
                    let remaining_ms = ((target - elapsed) / 1000) as u32;
                    let sleep = remaining_ms.max(1) - 1;
                    SyncOutcome::NotYet(if sleep == 0 {
                        Poll::Now
                    } else {
                        Poll::After(sleep)
                    })
                }
            }
        }
    }
}

/// One frame's timing record.
///
/// The engine mutates a working copy during the frame and publishes it
/// whole in `FinalizeFrame`, so readers never observe a partially updated
/// frame. The single-threaded cooperative model is what makes the plain
/// copy an atomic snapshot; under real parallelism this would need an
/// explicit handoff.
#[derive(Copy, Clone, Debug, Default)]
pub struct FrameTiming {
    /// Frame counter; wraps at 16 bits.
    pub frame: u16,
    /// Microsecond timestamp of the frame start (end of clear).
    pub timestamp_us: u64,
    /// Time spent clearing the write band.
    pub clear_us: u32,
    /// Time spent in the drawer, across all of its polls.
    pub render_us: u32,
    /// Time spent waiting on the pacing policy.
    pub sync_us: u32,
    /// Time spent handing off the buffer and, when single-buffered,
    /// waiting out the wire.
    pub push_us: u32,
    /// Time since the previous sync point, as seen by the policy.
    pub frame_duration_us: u32,
    /// Longest single drawer call this frame.
    pub longest_render_us: u32,
    /// Longest single push-protocol poll this frame.
    pub longest_push_us: u32,
    /// Target frame period in force when the frame was produced.
    pub target_period_us: u32,
    /// Pacing policy in force when the frame was produced.
    pub sync: SyncKind,
}
