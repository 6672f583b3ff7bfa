//! Compression backends used for distance measurement.
//!
//! Only the *length* of compressed output feeds the distance math, never
//! the bytes themselves, so backends are interchangeable as long as they
//! are deterministic within one process run. Levels are pinned to each
//! backend's strongest setting: a better compressor approximates the
//! underlying information distance more tightly.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::NcnError;

/// Compression algorithm selection.
///
/// A closed set: parsing any other identifier fails up front with
/// [`NcnError::UnknownCompressor`] instead of at first use. LZMA is only
/// available with the `lzma` cargo feature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compressor {
    /// zlib/DEFLATE via `flate2`. Fast with a moderate ratio.
    Zlib,
    /// bzip2, the classic choice for compression-distance work.
    #[default]
    Bzip2,
    /// Snappy raw format. Fastest, weakest ratio.
    Snappy,
    /// LZMA/xz. Strongest ratio, slowest.
    #[cfg(feature = "lzma")]
    Lzma,
}

impl Compressor {
    /// Compress `data` and return the full compressed output.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>, NcnError> {
        match self {
            Compressor::Zlib => {
                let mut enc =
                    flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
                enc.write_all(data)?;
                Ok(enc.finish()?)
            }
            Compressor::Bzip2 => {
                let mut enc = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::best());
                enc.write_all(data)?;
                Ok(enc.finish()?)
            }
            Compressor::Snappy => snap::raw::Encoder::new()
                .compress_vec(data)
                .map_err(|e| NcnError::Compress(io::Error::new(io::ErrorKind::InvalidData, e))),
            #[cfg(feature = "lzma")]
            Compressor::Lzma => {
                let mut enc = liblzma::write::XzEncoder::new(Vec::new(), 6);
                enc.write_all(data)?;
                Ok(enc.finish()?)
            }
        }
    }

    /// Compressed size of `data` in bytes.
    pub fn compressed_len(&self, data: &[u8]) -> Result<usize, NcnError> {
        Ok(self.compress(data)?.len())
    }
}

impl FromStr for Compressor {
    type Err = NcnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zlib" | "deflate" => Ok(Compressor::Zlib),
            "bzip2" | "bzip" => Ok(Compressor::Bzip2),
            "snappy" => Ok(Compressor::Snappy),
            #[cfg(feature = "lzma")]
            "lzma" | "xz" => Ok(Compressor::Lzma),
            other => Err(NcnError::UnknownCompressor(other.to_string())),
        }
    }
}

impl fmt::Display for Compressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compressor::Zlib => "zlib",
            Compressor::Bzip2 => "bzip2",
            Compressor::Snappy => "snappy",
            #[cfg(feature = "lzma")]
            Compressor::Lzma => "lzma",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backends() -> Vec<Compressor> {
        vec![
            Compressor::Zlib,
            Compressor::Bzip2,
            Compressor::Snappy,
            #[cfg(feature = "lzma")]
            Compressor::Lzma,
        ]
    }

    #[test]
    fn test_compression_is_deterministic() {
        let data = b"the quick brown fox jumps over the lazy dog";
        for c in backends() {
            let a = c.compress(data).unwrap();
            let b = c.compress(data).unwrap();
            assert_eq!(a, b, "{c} must be deterministic within a run");
        }
    }

    #[test]
    fn test_repetitive_input_compresses() {
        let data = "abcdefgh".repeat(256);
        for c in backends() {
            let len = c.compressed_len(data.as_bytes()).unwrap();
            assert!(
                len < data.len(),
                "{c} should shrink repetitive input: {len} vs {}",
                data.len()
            );
        }
    }

    #[test]
    fn test_empty_input_has_nonzero_compressed_len() {
        for c in backends() {
            let len = c.compressed_len(b"").unwrap();
            assert!(len > 0, "{c} empty-input overhead should be nonzero");
        }
    }

    #[test]
    fn test_identifiers_round_trip() {
        for c in backends() {
            let parsed: Compressor = c.to_string().parse().unwrap();
            assert_eq!(parsed, c);
        }
    }

    #[test]
    fn test_identifier_aliases() {
        assert_eq!("deflate".parse::<Compressor>().unwrap(), Compressor::Zlib);
        assert_eq!("bzip".parse::<Compressor>().unwrap(), Compressor::Bzip2);
    }

    #[test]
    fn test_unknown_identifier_is_rejected() {
        let err = "gzip9".parse::<Compressor>().unwrap_err();
        assert!(matches!(err, NcnError::UnknownCompressor(s) if s == "gzip9"));
    }

    #[test]
    fn test_default_is_bzip2() {
        assert_eq!(Compressor::default(), Compressor::Bzip2);
    }
}
