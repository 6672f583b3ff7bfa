//! Anchored normalized-compression-distance text vectorization.
//!
//! `ncn` (normalized compressed neighbours) turns text documents into
//! fixed-length numeric feature vectors without tokenization or learned
//! embeddings. A small set of reference corpora ("anchors") is built by
//! randomly assigning sampled training documents into buckets; any
//! document is then represented as its vector of normalized compression
//! distances (NCD) to each anchor. Distance comes from lossless
//! compression behavior: appending a document to a related corpus adds
//! little compressed size, appending it to an unrelated one adds a lot.
//!
//! Comparing against a fixed number of anchors instead of all pairs is
//! what makes the technique usable out of memory: `fit` reads the
//! training set once, and each later document costs a constant number of
//! compression calls regardless of corpus size.
//!
//! # Pipeline
//!
//! - **`fit`**: sample training documents into `nr_estimators` anchor
//!   corpora, then compress each corpus once and cache its length
//! - **`ncd`**: one document-to-anchor distance from three compressed
//!   lengths
//! - **`transform` / `transform_iter`**: eager or lazy vectorization, one
//!   `nr_estimators`-length vector per document
//!
//! The resulting vectors feed external consumers: a linear-kernel SVM in
//! the supervised case, clustering in the unsupervised case. No
//! classifier ships here.
//!
//! # Example
//!
//! ```rust
//! use ncn::{Compressor, Ncn, NcnConfig};
//!
//! let train = [
//!     "the match went to extra time before the home side won",
//!     "the court dismissed the appeal on procedural grounds",
//!     "a late goal sealed the championship for the visitors",
//!     "the defendant was granted bail pending a retrial",
//! ];
//!
//! let mut ncn = Ncn::new(NcnConfig {
//!     compressor: Compressor::Zlib,
//!     nr_estimators: 2,
//!     random_state: 42,
//!     ..NcnConfig::default()
//! })?;
//! ncn.fit(&train)?;
//!
//! // One distance per anchor, in stable anchor order.
//! let vectors = ncn.transform(&["the striker scored twice in the final"])?;
//! assert_eq!(vectors[0].len(), 2);
//! # Ok::<(), ncn::NcnError>(())
//! ```
//!
//! # Caveats
//!
//! NCD as computed here is an approximation, not a metric: it is not
//! guaranteed symmetric and does not satisfy the triangle inequality.
//! Values are empirically non-negative and near zero for a document that
//! already sits inside an anchor, but no formal `[0, 1]` bound holds.
//!
//! # References
//!
//! - Cilibrasi, R. and Vitányi, P. (2005). "Clustering by compression"
//! - Palatucci et al. (2009). "Zero-shot learning with semantic output codes"
//! - Singh, G. et al. (2007). "Topological methods for the analysis of
//!   high dimensional data sets" (Mapper)

#![warn(missing_docs)]
#![warn(clippy::all)]

mod anchor;
mod compress;
mod error;
mod extractor;

pub use anchor::Anchor;
pub use compress::Compressor;
pub use error::NcnError;
pub use extractor::{Ncn, NcnConfig, TransformIter};
