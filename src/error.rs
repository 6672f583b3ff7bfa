//! Error type for anchor construction and vectorization.

use std::io;

/// Errors produced by configuration, fitting, and transformation.
#[derive(Debug, thiserror::Error)]
pub enum NcnError {
    /// `transform`/`transform_iter` called before a successful `fit`.
    #[error("not fitted: call fit() to build anchors before transforming")]
    NotFitted,

    /// Compressor identifier outside the supported set.
    #[error("unknown compressor {0:?} (expected zlib, bzip2, snappy, or lzma)")]
    UnknownCompressor(String),

    /// Configuration rejected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `fit_with_labels` given differing numbers of documents and labels.
    #[error("length mismatch: {docs} documents but {labels} labels")]
    LengthMismatch {
        /// Number of documents passed.
        docs: usize,
        /// Number of labels passed.
        labels: usize,
    },

    /// Both sides of a distance computation compressed to zero bytes,
    /// which would divide by zero.
    #[error("degenerate compression: both inputs compressed to zero bytes")]
    DegenerateCompression,

    /// Compression backend failure.
    #[error("compression failed: {0}")]
    Compress(#[from] io::Error),
}
