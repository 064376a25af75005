use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::error::LoadError;
use super::loader::{load_upload, Upload};
use super::model::Dataset;

// ---------------------------------------------------------------------------
// ContentKey – identity of an upload
// ---------------------------------------------------------------------------

/// Hex SHA-256 of the upload bytes, prefixed with the parse format so the same
/// bytes uploaded as `.csv` and `.xlsx` are not confused.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(String);

impl ContentKey {
    pub fn of(upload: &Upload) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&upload.bytes);
        let digest = hex::encode(hasher.finalize());
        let format = upload.format().map(|f| f.as_str()).unwrap_or("unknown");
        ContentKey(format!("{format}:{digest}"))
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DatasetCache – memoized upload → Dataset
// ---------------------------------------------------------------------------

/// The dataset of the current upload, keyed by content. A new upload with
/// different content replaces it. Failed loads are never stored, so a broken
/// upload is re-parsed (and re-reported) every time.
#[derive(Debug, Default)]
pub struct DatasetCache {
    current: Option<(ContentKey, Arc<Dataset>)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset when the content matches the current upload,
    /// otherwise load it and make it the current one.
    pub fn get_or_load(&mut self, upload: &Upload) -> Result<Arc<Dataset>, LoadError> {
        let key = ContentKey::of(upload);
        if let Some((current, ds)) = &self.current {
            if *current == key {
                log::debug!("Dataset cache hit for {} ({key})", upload.name);
                return Ok(Arc::clone(ds));
            }
        }

        // The previous dataset goes away even when this load fails.
        self.current = None;
        let dataset = Arc::new(load_upload(upload)?);
        self.current = Some((key, Arc::clone(&dataset)));
        Ok(dataset)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        usize::from(self.current.is_some())
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "State,Number in Poverty,Number of Millionaires,State Population\n\
                       Alabama,100,10,1000\n";

    #[test]
    fn identical_uploads_share_one_dataset() {
        let mut cache = DatasetCache::new();
        let a = cache
            .get_or_load(&Upload::new("a.csv", CSV.as_bytes().to_vec()))
            .unwrap();
        let b = cache
            .get_or_load(&Upload::new("copy.csv", CSV.as_bytes().to_vec()))
            .unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn new_content_replaces_the_previous_dataset() {
        let mut cache = DatasetCache::new();
        let first = cache
            .get_or_load(&Upload::new("a.csv", CSV.as_bytes().to_vec()))
            .unwrap();
        let other = format!("{CSV}Alaska,50,5,500\n");
        let second = cache
            .get_or_load(&Upload::new("b.csv", other.clone().into_bytes()))
            .unwrap();

        assert_eq!(second.len(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(Arc::strong_count(&first), 1);

        let again = cache
            .get_or_load(&Upload::new("b.csv", other.into_bytes()))
            .unwrap();
        assert!(Arc::ptr_eq(&second, &again));
    }

    #[test]
    fn many_distinct_uploads_keep_one_entry() {
        let mut cache = DatasetCache::new();
        for i in 0..50 {
            let text = format!("{CSV}Alaska,{i},5,500\n");
            cache
                .get_or_load(&Upload::new("a.csv", text.into_bytes()))
                .unwrap();
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_upload_discards_the_previous_dataset() {
        let mut cache = DatasetCache::new();
        cache
            .get_or_load(&Upload::new("a.csv", CSV.as_bytes().to_vec()))
            .unwrap();
        let bad = Upload::new("bad.csv", b"State\nAlabama\n".to_vec());
        assert!(cache.get_or_load(&bad).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = DatasetCache::new();
        let bad = Upload::new("bad.csv", b"State\nAlabama\n".to_vec());
        assert!(cache.get_or_load(&bad).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn key_depends_on_format_and_content() {
        let csv = Upload::new("a.csv", b"x".to_vec());
        let xlsx = Upload::new("a.xlsx", b"x".to_vec());
        let renamed = Upload::new("b.csv", b"x".to_vec());

        assert_ne!(ContentKey::of(&csv), ContentKey::of(&xlsx));
        assert_eq!(ContentKey::of(&csv), ContentKey::of(&renamed));
        assert!(ContentKey::of(&csv).to_string().starts_with("csv:"));
    }

    #[test]
    fn clear_drops_entries() {
        let mut cache = DatasetCache::new();
        cache
            .get_or_load(&Upload::new("a.csv", CSV.as_bytes().to_vec()))
            .unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
