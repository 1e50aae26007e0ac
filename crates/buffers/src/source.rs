//! Byte source and sink abstractions.
//!
//! The codec only needs "read one byte" and "write bytes". Bulk helpers have
//! default implementations in terms of those, and [`Reader`] / [`Writer`]
//! override them with slice copies.

use std::io;

use crate::{BufferError, Reader, Writer};

/// Upper bound on speculative preallocation when the source cannot say how
/// many bytes remain.
const MAX_PREALLOC: usize = 64 * 1024;

/// Something bytes can be pulled from, one at a time.
pub trait ByteSource {
    /// Reads a single byte.
    fn read_u8(&mut self) -> Result<u8, BufferError>;

    /// Number of bytes known to remain, if the source can tell.
    fn remaining_hint(&self) -> Option<usize> {
        None
    }

    /// Reads exactly `n` bytes.
    fn read_vec(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        let capacity = match self.remaining_hint() {
            Some(remaining) if remaining < n => return Err(BufferError::EndOfBuffer),
            Some(_) => n,
            None => n.min(MAX_PREALLOC),
        };
        let mut out = Vec::with_capacity(capacity);
        for _ in 0..n {
            out.push(self.read_u8()?);
        }
        Ok(out)
    }

    /// Reads exactly `N` bytes into an array.
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BufferError>
    where
        Self: Sized,
    {
        let mut out = [0u8; N];
        for byte in out.iter_mut() {
            *byte = self.read_u8()?;
        }
        Ok(out)
    }
}

/// Something bytes can be pushed into.
pub trait ByteSink {
    /// Writes all of `bytes`.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError>;

    /// Writes a single byte.
    fn write_u8(&mut self, byte: u8) -> Result<(), BufferError> {
        self.write_bytes(&[byte])
    }

    /// Writes a header byte and a one byte payload in one call.
    fn write_u8u8(&mut self, head: u8, val: u8) -> Result<(), BufferError> {
        self.write_bytes(&[head, val])
    }

    /// Writes a header byte and a big-endian `u16` in one call.
    fn write_u8u16(&mut self, head: u8, val: u16) -> Result<(), BufferError> {
        let [a, b] = val.to_be_bytes();
        self.write_bytes(&[head, a, b])
    }

    /// Writes a header byte and a big-endian `u32` in one call.
    fn write_u8u32(&mut self, head: u8, val: u32) -> Result<(), BufferError> {
        let mut buf = [head; 5];
        buf[1..].copy_from_slice(&val.to_be_bytes());
        self.write_bytes(&buf)
    }

    /// Writes a header byte and a big-endian `u64` in one call.
    fn write_u8u64(&mut self, head: u8, val: u64) -> Result<(), BufferError> {
        let mut buf = [head; 9];
        buf[1..].copy_from_slice(&val.to_be_bytes());
        self.write_bytes(&buf)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read_u8(&mut self) -> Result<u8, BufferError> {
        (**self).read_u8()
    }

    fn remaining_hint(&self) -> Option<usize> {
        (**self).remaining_hint()
    }

    fn read_vec(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        (**self).read_vec(n)
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        (**self).write_bytes(bytes)
    }

    fn write_u8(&mut self, byte: u8) -> Result<(), BufferError> {
        (**self).write_u8(byte)
    }

    fn write_u8u8(&mut self, head: u8, val: u8) -> Result<(), BufferError> {
        (**self).write_u8u8(head, val)
    }

    fn write_u8u16(&mut self, head: u8, val: u16) -> Result<(), BufferError> {
        (**self).write_u8u16(head, val)
    }

    fn write_u8u32(&mut self, head: u8, val: u32) -> Result<(), BufferError> {
        (**self).write_u8u32(head, val)
    }

    fn write_u8u64(&mut self, head: u8, val: u64) -> Result<(), BufferError> {
        (**self).write_u8u64(head, val)
    }
}

impl ByteSource for Reader<'_> {
    fn read_u8(&mut self) -> Result<u8, BufferError> {
        self.u8()
    }

    fn remaining_hint(&self) -> Option<usize> {
        Some(self.size())
    }

    fn read_vec(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        self.buf(n).map(<[u8]>::to_vec)
    }
}

impl ByteSink for Writer {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.buf(bytes);
        Ok(())
    }

    fn write_u8(&mut self, byte: u8) -> Result<(), BufferError> {
        self.u8(byte);
        Ok(())
    }

    fn write_u8u8(&mut self, head: u8, val: u8) -> Result<(), BufferError> {
        self.u8u8(head, val);
        Ok(())
    }

    fn write_u8u16(&mut self, head: u8, val: u16) -> Result<(), BufferError> {
        self.u8u16(head, val);
        Ok(())
    }

    fn write_u8u32(&mut self, head: u8, val: u32) -> Result<(), BufferError> {
        self.u8u32(head, val);
        Ok(())
    }

    fn write_u8u64(&mut self, head: u8, val: u64) -> Result<(), BufferError> {
        self.u8u64(head, val);
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// [`ByteSource`] over any [`io::Read`].
///
/// Reads one byte per call, so wrap unbuffered readers in
/// [`io::BufReader`] first.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: io::Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::Read> ByteSource for IoSource<R> {
    fn read_u8(&mut self) -> Result<u8, BufferError> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Err(BufferError::EndOfBuffer),
                Ok(_) => return Ok(byte[0]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// [`ByteSink`] over any [`io::Write`].
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W: io::Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> ByteSink for IoSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.inner.write_all(bytes).map_err(BufferError::from)
    }
}
