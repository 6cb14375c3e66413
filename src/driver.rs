//! The screen driver seam.

/// Capability surface of a hardware panel driver (an SSD1306 on I2C, an
/// ST7789 behind SPI DMA, and so on). The engine borrows one of these; it
/// never owns the driver's lifetime.
///
/// The driver is the sole authority on transfer completion: the push
/// protocol polls [`pushing_buffer`](ScreenDriver::pushing_buffer) until
/// the driver says the wire is quiet, and never times a transfer out on
/// its own.
pub trait ScreenDriver {
    /// Brings the panel up. False if the hardware refused.
    fn start(&mut self) -> bool;

    /// Shuts the panel down. Running down or abandoning an in-flight
    /// transfer safely is the driver's job.
    fn stop(&mut self);

    /// Native panel width in pixels.
    fn width(&self) -> u16;

    /// Native panel height in pixels.
    fn height(&self) -> u16;

    /// True when the driver could accept a new buffer right now.
    fn can_push_buffer(&self) -> bool;

    /// Opens a transfer transaction.
    fn start_buffer(&mut self);

    /// Hands the driver a buffer to put on the wire. Returns a hint for
    /// how many milliseconds the transfer is expected to take, or `None`
    /// if the driver refuses the buffer — a transport failure, after which
    /// no further frames can be produced safely.
    fn push_buffer(&mut self, buffer: &[u8]) -> Option<u32>;

    /// True while the transfer of `buffer` is still in progress.
    fn pushing_buffer(&mut self, buffer: &[u8]) -> bool;

    /// Closes the transfer transaction.
    fn end_buffer(&mut self);
}
