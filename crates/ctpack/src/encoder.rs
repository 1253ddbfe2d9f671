use xxhash_rust::xxh32::xxh32;

use crate::types::EncodeError;

/// Seed for the call discriminator hash.
pub const DISCRIMINATOR_SEED: u32 = 0;

/// The 32-bit discriminator written ahead of every call: XXH32 of the function name.
pub fn discriminator(name: &str) -> u32 {
    xxh32(name.as_bytes(), DISCRIMINATOR_SEED)
}

/// A growable buffer that writes values in the flat big-endian wire format.
///
/// There is no envelope: each write appends its bytes directly after the previous one.
#[derive(Debug, Default, Clone)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    #[inline]
    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    #[inline]
    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    #[inline]
    pub fn i64(&mut self, v: i64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Writes a `u32` byte-length prefix followed by the raw UTF-8 bytes.
    pub fn str(&mut self, s: &str) -> Result<&mut Self, EncodeError> {
        let len = u32::try_from(s.len()).map_err(|_| EncodeError::BlobTooLarge(s.len()))?;
        self.u32(len);
        self.buf.extend_from_slice(s.as_bytes());
        Ok(self)
    }

    /// Writes the discriminator for `name`.
    pub fn discriminator(&mut self, name: &str) -> &mut Self {
        self.u32(discriminator(name))
    }
}
