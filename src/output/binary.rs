//! Little-endian primitives shared by the asset encoders and decoders.

use anyhow::{Context, Result};

use crate::error::AtlasError;

/// Append-only little-endian writer
#[derive(Debug, Default)]
pub(crate) struct ByteWriter {
    out: Vec<u8>,
}

impl ByteWriter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    pub(crate) fn i32(&mut self, value: i32) {
        self.out.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn f32(&mut self, value: f32) {
        self.out.extend_from_slice(&value.to_le_bytes());
    }

    /// Write an unsigned quantity as int32, failing if it does not fit
    pub(crate) fn len_i32(&mut self, value: impl TryInto<i32>, what: &str) -> Result<()> {
        let value = value
            .try_into()
            .ok()
            .with_context(|| format!("{what} does not fit in int32"))?;
        self.i32(value);
        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.out
    }
}

/// Bounds-checked little-endian reader over a borrowed buffer
#[derive(Debug)]
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], AtlasError> {
        let end = self.cursor.checked_add(len).ok_or_else(|| bad("length overflow"))?;
        let out = self
            .bytes
            .get(self.cursor..end)
            .ok_or_else(|| bad("truncated asset"))?;
        self.cursor = end;
        Ok(out)
    }

    pub(crate) fn i32(&mut self) -> Result<i32, AtlasError> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        Ok(i32::from_le_bytes(raw))
    }

    pub(crate) fn f32(&mut self) -> Result<f32, AtlasError> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        Ok(f32::from_le_bytes(raw))
    }

    /// An int32 that must be a non-negative count or length
    pub(crate) fn count(&mut self, what: &str) -> Result<usize, AtlasError> {
        let value = self.i32()?;
        usize::try_from(value).map_err(|_e| bad(&format!("negative {what}: {value}")))
    }

    /// Everything not yet consumed
    pub(crate) fn rest(self) -> &'a [u8] {
        &self.bytes[self.cursor..]
    }
}

pub(crate) fn bad(reason: &str) -> AtlasError {
    AtlasError::BadAsset {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_layout() {
        let mut w = ByteWriter::default();
        w.bytes(b"NGAT");
        w.i32(1);
        w.i32(-2);
        w.f32(0.25);
        let bytes = w.finish();

        assert_eq!(&bytes[..4], b"NGAT");
        assert_eq!(&bytes[4..8], &[1, 0, 0, 0]);
        assert_eq!(&bytes[8..12], &[0xfe, 0xff, 0xff, 0xff]);
        assert_eq!(&bytes[12..16], &0.25f32.to_le_bytes());

        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.take(4).unwrap(), b"NGAT");
        assert_eq!(r.i32().unwrap(), 1);
        assert_eq!(r.i32().unwrap(), -2);
        assert_eq!(r.f32().unwrap(), 0.25);
        assert!(r.rest().is_empty());
    }

    #[test]
    fn test_truncated_read() {
        let mut r = ByteReader::new(&[1, 2, 3]);
        assert!(matches!(r.i32(), Err(AtlasError::BadAsset { .. })));
    }

    #[test]
    fn test_negative_count() {
        let bytes = (-1i32).to_le_bytes();
        let mut r = ByteReader::new(&bytes);
        assert!(matches!(r.count("entry count"), Err(AtlasError::BadAsset { .. })));
    }

    #[test]
    fn test_len_overflow() {
        let mut w = ByteWriter::default();
        assert!(w.len_i32(u32::MAX, "width").is_err());
        assert!(w.len_i32(7u32, "width").is_ok());
        assert_eq!(w.finish(), 7i32.to_le_bytes());
    }
}
