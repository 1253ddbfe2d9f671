use crate::types::DecodeError;

type Result<T> = std::result::Result<T, DecodeError>;

/// Fixed-width integers that can be read from big-endian wire bytes.
pub trait FromBytes: Sized + Copy {
    const SIZE: usize;
    fn read_from(src: &[u8]) -> Self;
}

macro_rules! impl_from_bytes {
    ($ty:ty) => {
        impl FromBytes for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();
            #[inline(always)]
            fn read_from(src: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(&src[..Self::SIZE]);
                Self::from_be_bytes(raw)
            }
        }
    };
}

impl_from_bytes!(u32);
impl_from_bytes!(i32);
impl_from_bytes!(u64);
impl_from_bytes!(i64);

/// A cursor tracks position within a borrowed response buffer
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    slice: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        Self { slice, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.slice.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    fn need(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            Err(DecodeError::UnexpectedEnd {
                needed: n,
                remaining: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.need(len)?;
        let slice = &self.slice[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Reads one big-endian integer.
    pub fn read<T: FromBytes>(&mut self) -> Result<T> {
        let bytes = self.read_bytes(T::SIZE)?;
        Ok(T::read_from(bytes))
    }

    /// Reads a `u32` length prefix followed by that many UTF-8 bytes.
    pub fn read_str(&mut self) -> Result<&'a str> {
        let len = self.read::<u32>()? as usize;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
    }

    pub fn as_slice(&self) -> &'a [u8] {
        &self.slice[self.pos..]
    }
}
