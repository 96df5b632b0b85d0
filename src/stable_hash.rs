//! Deterministic string hashing used to derive per-decision seeds.
//!
//! The hash is MurmurHash3 (x86, 32-bit, seed 0) over the UTF-8 encoding of the text.
//! It is the anchor for reproducibility: the same application id and unique key must
//! produce the same seed in every process and every conforming implementation, so the
//! byte stream and the mixing steps here must never change.
//!
//! This module does **not** provide cryptographic guarantees.

use crate::error::{ExploreError, Result};

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Streaming MurmurHash3 x86_32 (seed 0).
///
/// Bytes are buffered four at a time; a trailing 1 to 3 byte tail is mixed at
/// [`Murmur3Stream::finish`]. Feeding the same bytes in any chunking gives the same hash.
#[derive(Debug, Clone, Default)]
pub struct Murmur3Stream {
    h1: u32,
    buf: [u8; 4],
    buf_len: usize,
    total_len: u64,
}

impl Murmur3Stream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes into the hash.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.buf[self.buf_len] = b;
            self.buf_len += 1;
            self.total_len += 1;
            if self.buf_len == 4 {
                let k1 = u32::from_le_bytes(self.buf);
                self.h1 ^= mix_k1(k1);
                self.h1 = self.h1.rotate_left(13);
                self.h1 = self.h1.wrapping_mul(5).wrapping_add(0xe654_6b64);
                self.buf_len = 0;
            }
        }
    }

    /// Number of bytes fed so far.
    pub fn len(&self) -> u64 {
        self.total_len
    }

    pub fn is_empty(&self) -> bool {
        self.total_len == 0
    }

    /// Finalize without consuming the stream.
    #[must_use]
    pub fn finish(&self) -> u32 {
        let mut h1 = self.h1;
        if self.buf_len > 0 {
            let mut k1 = 0u32;
            for (i, &b) in self.buf[..self.buf_len].iter().enumerate() {
                k1 |= u32::from(b) << (8 * i);
            }
            // Tail: mixed into the accumulator without the body rotate/multiply.
            h1 ^= mix_k1(k1);
        }
        // Reference implementations take the length as a 32-bit int.
        h1 ^= self.total_len as u32;
        fmix32(h1)
    }
}

#[inline]
fn mix_k1(k1: u32) -> u32 {
    k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

/// MurmurHash3 32-bit avalanche finalizer.
#[inline]
#[must_use]
pub fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}

/// Hash a string for seeding.
///
/// A `str` is already valid UTF-8, which is exactly the byte stream produced by decoding
/// UTF-16 and re-encoding each code point, so this cannot fail.
#[must_use]
pub fn seed_hash(text: &str) -> u32 {
    let mut s = Murmur3Stream::new();
    s.write(text.as_bytes());
    s.finish()
}

/// Hash a sequence of UTF-16 code units for seeding.
///
/// Surrogate pairs are decoded into code points and every code point is hashed as its
/// 1 to 4 byte UTF-8 encoding. An unpaired surrogate has no encoding and is rejected.
pub fn seed_hash_utf16(units: &[u16]) -> Result<u32> {
    let mut s = Murmur3Stream::new();
    let mut buf = [0u8; 4];
    for decoded in char::decode_utf16(units.iter().copied()) {
        let c = decoded.map_err(|e| ExploreError::UnpairedSurrogate(e.unpaired_surrogate()))?;
        s.write(c.encode_utf8(&mut buf).as_bytes());
    }
    Ok(s.finish())
}

/// Per-decision seed: `hash(unique_key) + hash(app_id)` widened to 64 bits.
#[must_use]
pub fn salted_seed(app_id: &str, unique_key: &str) -> u64 {
    salt(seed_hash(app_id), seed_hash(unique_key))
}

#[inline]
pub(crate) fn salt(app_hash: u32, key_hash: u32) -> u64 {
    u64::from(key_hash) + u64::from(app_hash)
}
