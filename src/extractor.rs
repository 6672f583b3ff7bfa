//! The anchored-NCD extractor: anchor construction and vectorization.
//!
//! `fit` assigns a random subsample of the training documents to a fixed
//! number of anchor corpora; `transform` then represents any document as
//! its vector of normalized compression distances to those anchors. This
//! replaces all-pairs NCD with a constant number of reference
//! comparisons, which is what makes the technique usable on streams.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use rand::prelude::*;
use tracing::info;

use crate::anchor::Anchor;
use crate::compress::Compressor;
use crate::error::NcnError;

/// Construction parameters for [`Ncn`]. Immutable after construction.
///
/// `Default` gives the stock setup: bzip2, 5 anchors, every document
/// eligible, no size cap, seed 0, silent.
#[derive(Debug, Clone)]
pub struct NcnConfig {
    /// Compression backend used for every length measurement.
    pub compressor: Compressor,
    /// Number of anchors, and therefore the output vector dimensionality.
    pub nr_estimators: usize,
    /// Probability in `[0, 1]` that a training document is assigned to an
    /// anchor at all.
    pub sub_sample: f64,
    /// Byte cap on anchor growth; `0` disables the cap. Once any single
    /// anchor outgrows the cap, the whole fitting pass halts and later
    /// documents stay unassigned.
    pub max_anchor_size: usize,
    /// Seed for the anchor-assignment generator. Identical seeds and
    /// inputs reproduce identical anchors.
    pub random_state: u64,
    /// `0` is silent; higher values emit progress events.
    pub verbose: u8,
}

impl Default for NcnConfig {
    fn default() -> Self {
        Self {
            compressor: Compressor::default(),
            nr_estimators: 5,
            sub_sample: 1.0,
            max_anchor_size: 0,
            random_state: 0,
            verbose: 0,
        }
    }
}

/// Compression-based text vectorizer (normalized compressed neighbours).
///
/// Holds the configuration and, once fitted, the anchor set. Fitting
/// replaces the anchor set wholesale; transformation is read-only, so a
/// fitted instance can be shared immutably across threads.
///
/// # Example
///
/// ```rust
/// use ncn::{Compressor, Ncn, NcnConfig};
///
/// let train = [
///     "the cat sat on the mat",
///     "stocks rallied after the announcement",
///     "the dog slept under the table",
///     "markets fell on weak earnings",
/// ];
/// let mut ncn = Ncn::new(NcnConfig {
///     compressor: Compressor::Zlib,
///     nr_estimators: 2,
///     ..NcnConfig::default()
/// })?;
/// ncn.fit(&train)?;
///
/// let vectors = ncn.transform(&["the cat slept on the table"])?;
/// assert_eq!(vectors.len(), 1);
/// assert_eq!(vectors[0].len(), 2);
/// # Ok::<(), ncn::NcnError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Ncn {
    config: NcnConfig,
    anchors: Option<Vec<Anchor>>,
}

impl Ncn {
    /// Build an unfitted extractor from `config`.
    ///
    /// Fails with [`NcnError::InvalidConfig`] when `nr_estimators` is zero
    /// or `sub_sample` lies outside `[0, 1]`.
    pub fn new(config: NcnConfig) -> Result<Self, NcnError> {
        if config.nr_estimators == 0 {
            return Err(NcnError::InvalidConfig(
                "nr_estimators must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&config.sub_sample) {
            return Err(NcnError::InvalidConfig(format!(
                "sub_sample must lie in [0, 1], got {}",
                config.sub_sample
            )));
        }
        Ok(Self {
            config,
            anchors: None,
        })
    }

    /// Extractor with default configuration and the given compressor.
    pub fn with_compressor(compressor: Compressor) -> Self {
        Self {
            config: NcnConfig {
                compressor,
                ..NcnConfig::default()
            },
            anchors: None,
        }
    }

    /// The configuration this extractor was built with.
    pub fn config(&self) -> &NcnConfig {
        &self.config
    }

    /// The fitted anchor set, or `None` before the first successful `fit`.
    pub fn anchors(&self) -> Option<&[Anchor]> {
        self.anchors.as_deref()
    }

    /// True once a `fit` call has installed an anchor set.
    pub fn is_fitted(&self) -> bool {
        self.anchors.is_some()
    }

    /// Build the anchor set from `docs` by random assignment.
    ///
    /// Every document draws once against `sub_sample`; included documents
    /// land in a uniformly chosen anchor, separated by a single space
    /// byte. With `max_anchor_size > 0` the pass halts entirely the first
    /// time any anchor outgrows the cap. A successful call replaces any
    /// previous anchor set; on error the previous set is kept.
    pub fn fit<D: AsRef<[u8]>>(&mut self, docs: &[D]) -> Result<(), NcnError> {
        let mut rng = StdRng::seed_from_u64(self.config.random_state);
        let mut anchors = self.empty_anchors();
        if self.config.verbose > 0 {
            info!(
                nr_estimators = self.config.nr_estimators,
                "creating anchors"
            );
        }
        for doc in docs {
            if rng.gen::<f64>() >= self.config.sub_sample {
                continue;
            }
            let id = rng.gen_range(0..self.config.nr_estimators);
            anchors[id].push_document(doc.as_ref());
            if self.exceeded_cap(&anchors[id]) {
                break;
            }
        }
        self.install(anchors)
    }

    /// Build the anchor set with label-directed assignment.
    ///
    /// Documents sharing a label accumulate into the same anchor. Labels
    /// claim anchor slots in order of first appearance and wrap around
    /// once all `nr_estimators` slots are taken. The `sub_sample` gate and
    /// the growth cap behave exactly as in [`Ncn::fit`].
    pub fn fit_with_labels<D, L>(&mut self, docs: &[D], labels: &[L]) -> Result<(), NcnError>
    where
        D: AsRef<[u8]>,
        L: Hash + Eq,
    {
        if docs.len() != labels.len() {
            return Err(NcnError::LengthMismatch {
                docs: docs.len(),
                labels: labels.len(),
            });
        }
        let mut rng = StdRng::seed_from_u64(self.config.random_state);
        let mut anchors = self.empty_anchors();
        let mut slots: HashMap<&L, usize> = HashMap::new();
        if self.config.verbose > 0 {
            info!(
                nr_estimators = self.config.nr_estimators,
                "creating labeled anchors"
            );
        }
        for (doc, label) in docs.iter().zip(labels) {
            if rng.gen::<f64>() >= self.config.sub_sample {
                continue;
            }
            let next = slots.len() % self.config.nr_estimators;
            let id = *slots.entry(label).or_insert(next);
            anchors[id].push_document(doc.as_ref());
            if self.exceeded_cap(&anchors[id]) {
                break;
            }
        }
        self.install(anchors)
    }

    /// Normalized compression distance between one anchor and `doc`.
    ///
    /// Computes `(C(doc ++ " " ++ anchor) - min(C(doc), C(anchor))) /
    /// max(C(doc), C(anchor))` over compressed byte lengths. Concatenation
    /// order is document-then-anchor; the backend gives no symmetry
    /// guarantee and none is implied here. Fails with
    /// [`NcnError::DegenerateCompression`] if both lengths are zero.
    pub fn ncd(&self, anchor: &Anchor, doc: &[u8]) -> Result<f64, NcnError> {
        let compressor = self.config.compressor;
        let c_x = compressor.compressed_len(doc)?;
        let c_y = anchor.compressed_len();

        let mut joined = Vec::with_capacity(doc.len() + 1 + anchor.len());
        joined.extend_from_slice(doc);
        joined.push(b' ');
        joined.extend_from_slice(anchor.bytes());
        let c_xy = compressor.compressed_len(&joined)?;

        let max = c_x.max(c_y);
        if max == 0 {
            return Err(NcnError::DegenerateCompression);
        }
        let min = c_x.min(c_y);
        Ok((c_xy as f64 - min as f64) / max as f64)
    }

    /// Distance vectors for every document, in input order.
    ///
    /// Eager counterpart of [`Ncn::transform_iter`]: the whole output is
    /// materialized before returning. Fails with [`NcnError::NotFitted`]
    /// before any fit, empty input included.
    pub fn transform<D: AsRef<[u8]>>(&self, docs: &[D]) -> Result<Vec<Vec<f64>>, NcnError> {
        self.transform_iter(docs)?.collect()
    }

    /// Lazily yield one distance vector per document.
    ///
    /// The fitted-state check happens here, before any input is consumed.
    /// The returned iterator holds one document's compression buffers at a
    /// time and is restartable only if the underlying input is.
    pub fn transform_iter<I>(&self, docs: I) -> Result<TransformIter<'_, I::IntoIter>, NcnError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let anchors = self.anchors.as_deref().ok_or(NcnError::NotFitted)?;
        if self.config.verbose > 0 {
            info!("transforming documents");
        }
        Ok(TransformIter {
            ncn: self,
            anchors,
            docs: docs.into_iter(),
        })
    }

    fn empty_anchors(&self) -> Vec<Anchor> {
        (0..self.config.nr_estimators)
            .map(|_| Anchor::empty())
            .collect()
    }

    fn exceeded_cap(&self, anchor: &Anchor) -> bool {
        self.config.max_anchor_size > 0 && anchor.len() > self.config.max_anchor_size
    }

    /// Compress every finished buffer, cache the lengths, and swap the new
    /// set in. Runs only after accumulation, so a backend failure leaves
    /// the previously fitted state intact.
    fn install(&mut self, mut anchors: Vec<Anchor>) -> Result<(), NcnError> {
        for anchor in &mut anchors {
            let len = self.config.compressor.compressed_len(anchor.bytes())?;
            anchor.seal(len);
        }
        if self.config.verbose > 0 {
            let mut sizes: Vec<(usize, usize)> = anchors
                .iter()
                .map(|a| (a.len(), a.compressed_len()))
                .collect();
            sizes.sort_unstable_by(|a, b| b.cmp(a));
            info!(?sizes, "anchors ready (raw len, compressed len)");
        }
        self.anchors = Some(anchors);
        Ok(())
    }
}

impl fmt::Display for Ncn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ncn(compressor={}, nr_estimators={}, random_state={})",
            self.config.compressor, self.config.nr_estimators, self.config.random_state
        )
    }
}

/// Lazy vectorizer returned by [`Ncn::transform_iter`].
///
/// Yields one `Result` per input document, in input order, computing each
/// vector only as it is requested.
#[derive(Debug)]
pub struct TransformIter<'a, I> {
    ncn: &'a Ncn,
    anchors: &'a [Anchor],
    docs: I,
}

impl<I> Iterator for TransformIter<'_, I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    type Item = Result<Vec<f64>, NcnError>;

    fn next(&mut self) -> Option<Self::Item> {
        let doc = self.docs.next()?;
        Some(
            self.anchors
                .iter()
                .map(|anchor| self.ncn.ncd(anchor, doc.as_ref()))
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.docs.size_hint()
    }
}
