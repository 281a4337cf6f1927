//! Bounds-checked little-endian field primitives.
//!
//! Every read checks the remaining length first, so a truncated stream
//! surfaces as a `Decoding` error at the exact offset instead of a
//! panic or a silently partial state.

use granum_types::{GranumError, GranumResult};

/// Sequential reader over an in-memory byte stream.
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Wraps a byte slice, starting at offset 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read offset in bytes.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left in the stream.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// True when the stream is exhausted.
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails unless at least `count` bytes remain. Used to reject an
    /// implausible allocation before it happens.
    pub fn ensure(&self, count: usize) -> GranumResult<()> {
        if self.remaining() < count {
            return Err(GranumError::Decoding(format!(
                "unexpected end of stream at byte {}: need {count} more bytes, have {}",
                self.offset,
                self.remaining()
            )));
        }
        Ok(())
    }

    fn take(&mut self, count: usize) -> GranumResult<&'a [u8]> {
        self.ensure(count)?;
        let slice = &self.data[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    /// Reads a peeked prefix without consuming it.
    pub fn peek(&self, count: usize) -> Option<&'a [u8]> {
        self.data.get(self.offset..self.offset + count)
    }

    /// Consumes `count` raw bytes.
    pub fn bytes(&mut self, count: usize) -> GranumResult<&'a [u8]> {
        self.take(count)
    }

    /// Reads one byte.
    pub fn u8(&mut self) -> GranumResult<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a little-endian uint32.
    pub fn u32(&mut self) -> GranumResult<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a little-endian int32.
    pub fn i32(&mut self) -> GranumResult<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a little-endian IEEE-754 double.
    pub fn f64(&mut self) -> GranumResult<f64> {
        let b = self.take(8)?;
        Ok(f64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Reads three doubles.
    pub fn f64_3(&mut self) -> GranumResult<[f64; 3]> {
        Ok([self.f64()?, self.f64()?, self.f64()?])
    }

    /// Reads two doubles.
    pub fn f64_2(&mut self) -> GranumResult<[f64; 2]> {
        Ok([self.f64()?, self.f64()?])
    }

    /// Reads `count` doubles as a block.
    pub fn f64_block(&mut self, count: usize) -> GranumResult<Vec<f64>> {
        self.ensure(count.checked_mul(8).ok_or_else(|| {
            GranumError::Decoding(format!("implausible element count {count}"))
        })?)?;
        (0..count).map(|_| self.f64()).collect()
    }

    /// Reads `count` double triplets as a block.
    pub fn f64_3_block(&mut self, count: usize) -> GranumResult<Vec<[f64; 3]>> {
        self.ensure(count.checked_mul(24).ok_or_else(|| {
            GranumError::Decoding(format!("implausible element count {count}"))
        })?)?;
        (0..count).map(|_| self.f64_3()).collect()
    }
}

/// Append-only little-endian field writer.
#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// An empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer with a pre-sized buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer, returning the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Appends raw bytes.
    pub fn bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends one byte.
    pub fn u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Appends a little-endian uint32.
    pub fn u32(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Appends a little-endian int32.
    pub fn i32(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Appends a little-endian IEEE-754 double.
    pub fn f64(&mut self, val: f64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Appends three doubles.
    pub fn f64_3(&mut self, val: &[f64; 3]) {
        for v in val {
            self.f64(*v);
        }
    }

    /// Appends two doubles.
    pub fn f64_2(&mut self, val: &[f64; 2]) {
        for v in val {
            self.f64(*v);
        }
    }

    /// Appends a block of doubles.
    pub fn f64_block(&mut self, vals: &[f64]) {
        for v in vals {
            self.f64(*v);
        }
    }

    /// Appends a block of double triplets.
    pub fn f64_3_block(&mut self, vals: &[[f64; 3]]) {
        for v in vals {
            self.f64_3(v);
        }
    }
}
