//! A cooperative display engine for small panels.
//!
//! `framepump` turns drawing calls into pixel data, paces frames against a
//! target period, and hands finished buffers to a hardware transport
//! asynchronously so the next frame's rendering overlaps the previous
//! frame's transfer. It is written for memory-constrained targets driving
//! monochrome or color panels over I2C/SPI, under strictly single-threaded
//! cooperative multitasking: every long operation is an explicit state
//! machine resumed on each poll, and nothing blocks.
//!
//! The pieces, bottom up:
//!
//! - [`task`]: the cooperative `Task`/`Clock` plumbing and the `Poll`
//!   reschedule directive.
//! - [`driver`]: the `ScreenDriver` seam concrete panel drivers implement.
//! - [`framebuffer`]: pixel storage over caller-owned bands, single- or
//!   double-buffered, which also implement the `raster` crate's `Surface`
//!   so drawers can use the shader stages directly.
//! - [`push`]: the four-state asynchronous buffer push protocol.
//! - [`timing`]: frame pacing policies and the published per-frame timing
//!   record.
//! - [`engine`]: the per-frame lifecycle state machine tying it together.
//!
//! Rasterization itself lives in the `raster` member crate, which is
//! architecture-independent and tested on the host.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod driver;
pub mod engine;
pub mod framebuffer;
pub mod push;
pub mod task;
pub mod timing;

pub use driver::ScreenDriver;
pub use engine::{Drawer, Engine, EngineConfig, EngineState};
pub use framebuffer::{DoubleBuffer, FrameBuffer, Mono1Buffer, SingleBuffer};
pub use push::{BufferPusher, PushState};
pub use task::{Clock, Poll, Task};
pub use timing::{FrameTiming, SyncKind};

#[cfg(test)]
mod testutil;
