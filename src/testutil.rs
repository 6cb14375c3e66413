//! Shared mocks for engine-level tests.

use core::cell::Cell;

use crate::driver::ScreenDriver;
use crate::framebuffer::FrameBuffer;
use crate::task::Clock;

/// Manually advanced microsecond clock.
pub struct TestClock {
    now: Cell<u64>,
}

impl TestClock {
    pub fn new() -> TestClock {
        TestClock { now: Cell::new(0) }
    }

    pub fn advance(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }
}

impl Clock for TestClock {
    fn now_us(&self) -> u64 {
        self.now.get()
    }
}

/// Scripted screen driver that records the calls made against it.
pub struct TestDriver {
    pub width: u16,
    pub height: u16,
    /// Answer for `can_push_buffer`.
    pub ready: bool,
    /// `pushing_buffer` reports in-progress this many more times.
    pub busy_polls: u32,
    /// Makes `push_buffer` refuse.
    pub refuse: bool,
    pub delay_hint_ms: u32,
    pub started: bool,
    pub stopped: bool,
    pub start_buffer_calls: u32,
    pub push_buffer_calls: u32,
    pub pushing_calls: u32,
    pub end_buffer_calls: u32,
    pub last_pushed_len: usize,
}

impl TestDriver {
    pub fn new(width: u16, height: u16) -> TestDriver {
        TestDriver {
            width,
            height,
            ready: true,
            busy_polls: 0,
            refuse: false,
            delay_hint_ms: 0,
            started: false,
            stopped: false,
            start_buffer_calls: 0,
            push_buffer_calls: 0,
            pushing_calls: 0,
            end_buffer_calls: 0,
            last_pushed_len: 0,
        }
    }
}

impl ScreenDriver for TestDriver {
    fn start(&mut self) -> bool {
        self.started = true;
        true
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn can_push_buffer(&self) -> bool {
        self.ready
    }

    fn start_buffer(&mut self) {
        self.start_buffer_calls += 1;
    }

    fn push_buffer(&mut self, buffer: &[u8]) -> Option<u32> {
        self.push_buffer_calls += 1;
        self.last_pushed_len = buffer.len();
        if self.refuse {
            None
        } else {
            Some(self.delay_hint_ms)
        }
    }

    fn pushing_buffer(&mut self, _buffer: &[u8]) -> bool {
        self.pushing_calls += 1;
        if self.busy_polls > 0 {
            self.busy_polls -= 1;
            true
        } else {
            false
        }
    }

    fn end_buffer(&mut self) {
        self.end_buffer_calls += 1;
    }
}

/// Framebuffer with scripted flip behavior and multi-step clears. Pixel
/// storage is a `Vec`, whose heap block satisfies the stability contract
/// even as the struct itself moves.
pub struct TestFrameBuffer {
    pub width: u16,
    pub height: u16,
    pub bytes: Vec<u8>,
    pub flip_result: bool,
    pub clear_steps_needed: u32,
    clear_progress: u32,
    pub clears: u32,
    pub flips: u32,
}

impl TestFrameBuffer {
    pub fn new(width: u16, height: u16, flip_result: bool) -> TestFrameBuffer {
        TestFrameBuffer {
            width,
            height,
            bytes: vec![0; width as usize * height as usize],
            flip_result,
            clear_steps_needed: 1,
            clear_progress: 0,
            clears: 0,
            flips: 0,
        }
    }
}

unsafe impl FrameBuffer for TestFrameBuffer {
    fn phys_width(&self) -> u16 {
        self.width
    }

    fn phys_height(&self) -> u16 {
        self.height
    }

    fn clear_step(&mut self) -> bool {
        self.clear_progress += 1;
        if self.clear_progress >= self.clear_steps_needed {
            self.clear_progress = 0;
            self.clears += 1;
            true
        } else {
            false
        }
    }

    fn flip(&mut self) -> bool {
        self.flips += 1;
        self.flip_result
    }

    fn transport(&self) -> &[u8] {
        &self.bytes
    }
}
