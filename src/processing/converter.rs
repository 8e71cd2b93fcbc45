//! Sequential multi-format batch conversion.
//!
//! Each encode runs inside `tokio::task::spawn_blocking` so the async runtime
//! is never blocked, but encodes are awaited one by one: one file, one format
//! at a time. This bounds peak decode memory to a single image.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::{BatchProgress, BlobRegistry, ConversionResult, FormatFailure, ProcessedFile, ProgressType, SourceFile};
use crate::processing::encoder::{EncodedImage, Encoder};
use crate::utils::{ConvertError, ConverterResult, FailureKind, TargetFormat, ValidationError};

/// Drives an [`Encoder`] over every format of every source in a batch.
pub struct BatchConverter<E> {
    encoder: Arc<E>,
    registry: BlobRegistry,
}

impl<E: Encoder + 'static> BatchConverter<E> {
    pub fn new(encoder: E, registry: BlobRegistry) -> Self {
        Self {
            encoder: Arc::new(encoder),
            registry,
        }
    }

    /// Converts all `sources` in order, reporting progress after each file.
    ///
    /// Returns exactly one [`ProcessedFile`] per source, in input order, even
    /// when every format of a source failed.
    pub async fn convert_batch<F>(
        &self,
        sources: Vec<SourceFile>,
        mut on_progress: F,
    ) -> ConverterResult<Vec<ProcessedFile>>
    where
        F: FnMut(BatchProgress),
    {
        if sources.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }

        let total = sources.len();
        info!("Converting {} files into {} formats", total, TargetFormat::all().len());
        on_progress(BatchProgress::new(ProgressType::Start, 0, total));

        let mut processed = Vec::with_capacity(total);
        for (idx, source) in sources.into_iter().enumerate() {
            let completed = idx + 1;
            let name = source.name().to_string();

            let file = self.convert_file(source).await;
            debug!(
                "'{}' done: {} formats produced, {} failed",
                name,
                file.results.len(),
                file.failures.len()
            );
            processed.push(file);

            let progress_type = if completed == total {
                ProgressType::Complete
            } else {
                ProgressType::Progress
            };
            on_progress(BatchProgress::new(progress_type, completed, total).with_file(name));
        }

        let failed = processed.iter().filter(|f| f.results.is_empty()).count();
        if failed > 0 {
            warn!("Batch completed: {} of {} files produced no output", failed, total);
        } else {
            info!("Batch completed: {} files converted", total);
        }

        Ok(processed)
    }

    /// Attempts every format for one source.
    ///
    /// Failed formats are recorded and skipped. A decode failure ends the
    /// attempt early since every remaining format would fail the same way.
    pub async fn convert_file(&self, source: SourceFile) -> ProcessedFile {
        let mut results = Vec::with_capacity(TargetFormat::all().len());
        let mut failures = Vec::new();

        for &format in TargetFormat::all() {
            match self.encode_one(&source, format).await {
                Ok(encoded) => results.push(self.register(encoded)),
                Err(e) => {
                    warn!("Skipping {} for '{}': {}", format, source.name(), e);
                    failures.push(FormatFailure::new(format, &e));
                    if e.kind() == FailureKind::DecodeFailure {
                        break;
                    }
                }
            }
        }

        ProcessedFile::new(source, results, failures)
    }

    async fn encode_one(&self, source: &SourceFile, format: TargetFormat) -> Result<EncodedImage, ConvertError> {
        let encoder = Arc::clone(&self.encoder);
        let source = source.clone();

        tokio::task::spawn_blocking(move || encoder.encode(&source, format))
            .await
            .map_err(|e| ConvertError::encode(format, format!("encoder task panicked: {e}")))?
    }

    fn register(&self, encoded: EncodedImage) -> ConversionResult {
        let size = encoded.bytes.len() as u64;
        ConversionResult {
            format: encoded.format,
            handle: self.registry.create(encoded.bytes),
            size,
            filename: encoded.filename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ConverterError;
    use std::sync::Mutex;

    /// Produces fake bytes; fails formats listed in `unsupported` and any
    /// source whose name starts with "corrupt".
    struct StubEncoder {
        unsupported: Vec<TargetFormat>,
        calls: Mutex<Vec<(String, TargetFormat)>>,
    }

    impl StubEncoder {
        fn new(unsupported: Vec<TargetFormat>) -> Self {
            Self {
                unsupported,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Encoder for StubEncoder {
        fn encode(&self, source: &SourceFile, format: TargetFormat) -> Result<EncodedImage, ConvertError> {
            self.calls.lock().unwrap().push((source.name().to_string(), format));
            if source.name().starts_with("corrupt") {
                return Err(ConvertError::decode(source.name(), "bad data"));
            }
            if self.unsupported.contains(&format) {
                return Err(ConvertError::unsupported(format));
            }
            Ok(EncodedImage {
                format,
                filename: crate::utils::output_filename(source.name(), format),
                bytes: format!("{}:{}", source.name(), format).into_bytes(),
            })
        }
    }

    fn sources(registry: &BlobRegistry, names: &[&str]) -> Vec<SourceFile> {
        names
            .iter()
            .map(|n| SourceFile::new(registry, *n, n.as_bytes().to_vec()))
            .collect()
    }

    #[tokio::test]
    async fn one_processed_file_per_input_in_order() {
        let registry = BlobRegistry::new();
        let converter = BatchConverter::new(StubEncoder::new(vec![]), registry.clone());

        let files = converter
            .convert_batch(sources(&registry, &["a.png", "b.png", "c.png"]), |_| {})
            .await
            .unwrap();

        let names: Vec<_> = files.iter().map(|f| f.source.name()).collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
        for file in &files {
            let formats: Vec<_> = file.results.iter().map(|r| r.format).collect();
            assert_eq!(formats, TargetFormat::all());
        }
        assert_eq!(files[1].results[0].bytes(), b"b.png:jpeg");
    }

    #[tokio::test]
    async fn formats_run_sequentially_in_fixed_order() {
        let registry = BlobRegistry::new();
        let converter = BatchConverter::new(StubEncoder::new(vec![]), registry.clone());
        converter
            .convert_batch(sources(&registry, &["a.png", "b.png"]), |_| {})
            .await
            .unwrap();

        let calls = converter.encoder.calls.lock().unwrap().clone();
        let expected: Vec<_> = ["a.png", "b.png"]
            .iter()
            .flat_map(|n| TargetFormat::all().iter().map(move |f| (n.to_string(), *f)))
            .collect();
        assert_eq!(calls, expected);
    }

    #[tokio::test]
    async fn unsupported_format_is_skipped_not_fatal() {
        let registry = BlobRegistry::new();
        let converter = BatchConverter::new(StubEncoder::new(vec![TargetFormat::Avif]), registry.clone());

        let files = converter
            .convert_batch(sources(&registry, &["a.png"]), |_| {})
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].results.len(), 4);
        assert!(files[0].result_for(TargetFormat::Avif).is_none());
        assert_eq!(files[0].failures.len(), 1);
        assert_eq!(files[0].failures[0].kind, FailureKind::EncodingUnsupported);
    }

    #[tokio::test]
    async fn decode_failure_keeps_the_file_and_stops_early() {
        let registry = BlobRegistry::new();
        let converter = BatchConverter::new(StubEncoder::new(vec![]), registry.clone());

        let files = converter
            .convert_batch(sources(&registry, &["corrupt.png", "ok.png"]), |_| {})
            .await
            .unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].results.is_empty());
        assert!(files[0].decode_failed());
        assert_eq!(files[0].failures.len(), 1);
        assert_eq!(files[1].results.len(), 5);

        let corrupt_calls = converter
            .encoder
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, _)| n == "corrupt.png")
            .count();
        assert_eq!(corrupt_calls, 1);
    }

    #[tokio::test]
    async fn progress_is_reported_per_file() {
        let registry = BlobRegistry::new();
        let converter = BatchConverter::new(StubEncoder::new(vec![]), registry.clone());
        let mut events = Vec::new();

        converter
            .convert_batch(sources(&registry, &["a.png", "b.png"]), |p| events.push(p))
            .await
            .unwrap();

        let summary: Vec<_> = events.iter().map(|p| (p.progress_type, p.completed, p.total)).collect();
        assert_eq!(
            summary,
            [
                (ProgressType::Start, 0, 2),
                (ProgressType::Progress, 1, 2),
                (ProgressType::Complete, 2, 2),
            ]
        );
        assert_eq!(events[2].current_file.as_deref(), Some("b.png"));
    }

    #[tokio::test]
    async fn results_are_registered_handles() {
        let registry = BlobRegistry::new();
        let converter = BatchConverter::new(StubEncoder::new(vec![]), registry.clone());
        let files = converter
            .convert_batch(sources(&registry, &["a.png"]), |_| {})
            .await
            .unwrap();

        // one preview + five results
        assert_eq!(registry.live_count(), 6);
        assert!(registry.is_live(files[0].results[0].id()));
        drop(files);
        assert_eq!(registry.live_count(), 0);
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let registry = BlobRegistry::new();
        let converter = BatchConverter::new(StubEncoder::new(vec![]), registry);
        let err = converter.convert_batch(Vec::new(), |_| {}).await.unwrap_err();
        assert!(matches!(err, ConverterError::Validation(ValidationError::EmptyBatch)));
    }
}
