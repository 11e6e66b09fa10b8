//! Access to the features being rendered.
//!
//! A [`FeatureSource`] hands out forward-only [`FeatureReader`]s. A reader usually holds an external resource
//! (a database cursor, an open file), so it must be released when the rendering is over, whether it succeeded or
//! not. Encoders wrap every reader into an [`OpenReader`] guard that does this on drop.

use crate::error::SourceError;
use crate::feature::Feature;

/// Provider of features.
pub trait FeatureSource {
    /// Reader type returned by [`FeatureSource::open`].
    type Reader: FeatureReader;

    /// Acquires a new reader positioned before the first feature.
    ///
    /// Readers cannot be rewound. To iterate over the features again, open a new reader.
    fn open(&self) -> Result<Self::Reader, SourceError>;
}

/// Forward-only cursor over features.
pub trait FeatureReader {
    /// Returns the next feature, or `None` when all features have been read.
    fn next_feature(&mut self) -> Option<Result<Feature, SourceError>>;

    /// Releases the resources held by the reader. Called exactly once by [`OpenReader`].
    fn close(&mut self) {}
}

/// Guard that releases the reader when dropped.
pub struct OpenReader<R: FeatureReader> {
    reader: R,
}

impl<R: FeatureReader> OpenReader<R> {
    /// Opens a reader of the source.
    pub fn open<S>(source: &S) -> Result<Self, SourceError>
    where
        S: FeatureSource<Reader = R> + ?Sized,
    {
        Ok(Self {
            reader: source.open()?,
        })
    }
}

impl<R: FeatureReader> Iterator for OpenReader<R> {
    type Item = Result<Feature, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_feature()
    }
}

impl<R: FeatureReader> Drop for OpenReader<R> {
    fn drop(&mut self) {
        self.reader.close();
    }
}

/// Source of features stored in memory.
#[derive(Debug, Clone, Default)]
pub struct VecFeatureSource {
    features: Vec<Feature>,
}

impl VecFeatureSource {
    /// Creates a new source.
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Stored features.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }
}

impl From<Vec<Feature>> for VecFeatureSource {
    fn from(features: Vec<Feature>) -> Self {
        Self::new(features)
    }
}

impl FeatureSource for VecFeatureSource {
    type Reader = std::vec::IntoIter<Feature>;

    fn open(&self) -> Result<Self::Reader, SourceError> {
        Ok(self.features.clone().into_iter())
    }
}

impl FeatureReader for std::vec::IntoIter<Feature> {
    fn next_feature(&mut self) -> Option<Result<Feature, SourceError>> {
        self.next().map(Ok)
    }
}
