//! Auto-growing binary buffer writer.

/// A binary writer backed by a growable buffer.
///
/// `x0` marks the start of the pending (not yet flushed) region and `x` is
/// the write cursor. All multi-byte integers are written big-endian.
///
/// # Example
///
/// ```
/// use msgpack_bind_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8u16(0xcd, 0x0100);
/// assert_eq!(writer.flush(), vec![0xcd, 0x01, 0x00]);
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    /// The underlying buffer; only `uint8[..x]` holds written data.
    pub uint8: Vec<u8>,
    /// Start of the region returned by the next [`Writer::flush`].
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default allocation size (64 KiB).
    pub fn new() -> Self {
        Self::with_alloc_size(64 * 1024)
    }

    /// Creates a new writer which grows in chunks of at least `alloc_size`.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        let alloc_size = alloc_size.max(16);
        Self {
            uint8: vec![0; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Makes sure at least `capacity` more bytes can be written at `x`.
    #[inline]
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let required = self.x + capacity;
        if required > self.uint8.len() {
            let grow = (required - self.uint8.len()).max(self.alloc_size);
            self.uint8.resize(self.uint8.len() + grow, 0);
        }
    }

    /// Discards anything pending since the last flush.
    pub fn reset(&mut self) {
        self.x0 = 0;
        self.x = 0;
    }

    /// Returns the bytes written since the last flush or reset.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = val;
        self.x += 1;
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.buf(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.buf(&val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.buf(&val.to_be_bytes());
    }

    /// Writes a header byte followed by a one byte payload.
    #[inline]
    pub fn u8u8(&mut self, head: u8, val: u8) {
        self.ensure_capacity(2);
        self.uint8[self.x] = head;
        self.uint8[self.x + 1] = val;
        self.x += 2;
    }

    #[inline]
    pub fn u8u16(&mut self, head: u8, val: u16) {
        self.u8(head);
        self.u16(val);
    }

    #[inline]
    pub fn u8u32(&mut self, head: u8, val: u32) {
        self.u8(head);
        self.u32(val);
    }

    #[inline]
    pub fn u8u64(&mut self, head: u8, val: u64) {
        self.u8(head);
        self.u64(val);
    }

    /// Copies raw bytes into the buffer.
    pub fn buf(&mut self, data: &[u8]) {
        let length = data.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(data);
        self.x += length;
    }
}
