//! CSV export pipeline
//!
//! Every export writes into its own uniquely named temporary file inside the
//! configured export directory. Once written, the name is removed and the
//! document is served from the still-open handle, so nothing is left behind
//! on any path, including a client that disconnects mid-download.

use std::fs::File;
use std::io::Seek;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tokio_util::io::ReaderStream;

use crate::core::constants::{EXPORT_CSV_HEADER, EXPORT_TEMP_PREFIX};
use crate::data::types::Resource;

#[derive(Error, Debug)]
pub enum ExportError {
    /// The per-export temporary file could not be created
    #[error("Failed to create export file: {0}")]
    Acquisition(#[source] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tag serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A finished CSV document held by an unlinked temp file, positioned at the start
#[derive(Debug)]
pub struct CsvExport {
    file: File,
    len: u64,
}

impl CsvExport {
    /// Document size in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the document in chunks; the handle is released when the stream drops
    pub fn into_stream(self) -> ReaderStream<tokio::fs::File> {
        ReaderStream::new(tokio::fs::File::from_std(self.file))
    }
}

/// Serialize resources to a CSV document on a blocking thread
pub async fn export_csv(resources: Vec<Resource>, dir: PathBuf) -> Result<CsvExport, ExportError> {
    tokio::task::spawn_blocking(move || write_csv(&resources, &dir)).await?
}

/// Serialize resources to a CSV document.
///
/// Columns: `id, provider, account, name, region, tags, cost`. The `id`
/// cell carries the provider-side `resource_id`, `tags` is a JSON array of
/// `{key, value}` objects and `cost` is rounded to two decimals.
pub fn write_csv(resources: &[Resource], dir: &Path) -> Result<CsvExport, ExportError> {
    let mut file =
        NamedTempFile::with_prefix_in(EXPORT_TEMP_PREFIX, dir).map_err(ExportError::Acquisition)?;
    tracing::debug!(
        path = %file.path().display(),
        rows = resources.len(),
        "Writing CSV export"
    );

    {
        let mut writer = csv::Writer::from_writer(file.as_file_mut());
        writer.write_record(EXPORT_CSV_HEADER)?;
        for resource in resources {
            let tags = serde_json::to_string(&resource.tags)?;
            let cost = format!("{:.2}", resource.cost);
            writer.write_record([
                resource.resource_id.as_str(),
                resource.provider.as_str(),
                resource.account.as_str(),
                resource.name.as_str(),
                resource.region.as_str(),
                tags.as_str(),
                cost.as_str(),
            ])?;
        }
        writer.flush()?;
    }

    let (mut file, path) = file.into_parts();
    if let Err(e) = path.close() {
        tracing::warn!(error = %e, "Failed to remove export temp file");
    }

    file.rewind()?;
    let len = file.metadata()?.len();

    Ok(CsvExport { file, len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::Tag;
    use axum::body::{Body, to_bytes};
    use chrono::Utc;
    use std::io::Read;

    fn resource(id: i64, name: &str, cost: f64, tags: &[(&str, &str)]) -> Resource {
        Resource {
            id,
            resource_id: format!("res-{}", id),
            provider: "AWS".to_string(),
            account: "123456".to_string(),
            service: "EC2".to_string(),
            region: "eu-west-1".to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
            fetched_at: Utc::now(),
            cost,
            metadata: serde_json::json!({}),
            tags: tags
                .iter()
                .map(|(k, v)| Tag {
                    key: k.to_string(),
                    value: v.to_string(),
                })
                .collect(),
            link: String::new(),
        }
    }

    fn read_rows(bytes: &[u8]) -> Vec<Vec<String>> {
        csv::Reader::from_reader(bytes)
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn read_all(mut export: CsvExport) -> Vec<u8> {
        let mut bytes = Vec::new();
        export.file.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes.len() as u64, export.len());
        bytes
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn test_write_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let resources = vec![
            resource(1, "web, \"primary\"", 12.346, &[("env", "prod"), ("team", "core")]),
            resource(2, "db", 0.0, &[]),
        ];

        let bytes = read_all(write_csv(&resources, dir.path()).unwrap());

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let header: Vec<&str> = reader.headers().unwrap().iter().collect();
        assert_eq!(header, EXPORT_CSV_HEADER);

        let rows = read_rows(&bytes);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0][..5],
            ["res-1", "AWS", "123456", "web, \"primary\"", "eu-west-1"]
        );
        assert_eq!(rows[0][6], "12.35");
        assert_eq!(rows[1][6], "0.00");

        let tags: Vec<Tag> = serde_json::from_str(&rows[0][5]).unwrap();
        assert_eq!(tags, resources[0].tags);
        assert_eq!(rows[1][5], "[]");
    }

    #[test]
    fn test_write_csv_empty_result_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = read_all(write_csv(&[], dir.path()).unwrap());
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "id,provider,account,name,region,tags,cost\n"
        );
    }

    #[test]
    fn test_write_csv_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let export = write_csv(&[resource(1, "a", 1.0, &[])], dir.path()).unwrap();
        assert!(dir_is_empty(dir.path()));
        assert!(!export.is_empty());

        let rows = read_rows(&read_all(export));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "res-1");
    }

    #[tokio::test]
    async fn test_export_streams_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let resources: Vec<Resource> = (1..=2000)
            .map(|i| resource(i, "streamed", 3.0, &[("env", "prod")]))
            .collect();

        let export = export_csv(resources, dir.path().to_path_buf())
            .await
            .unwrap();
        let len = export.len();
        assert!(len > 64 * 1024, "document should span several chunks");

        let bytes = to_bytes(Body::from_stream(export.into_stream()), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.len() as u64, len);
        assert_eq!(read_rows(&bytes).len(), 2000);
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_write_csv_missing_dir_is_acquisition_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = write_csv(&[], &missing).unwrap_err();
        assert!(matches!(err, ExportError::Acquisition(_)));
    }

    #[test]
    fn test_temp_files_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = NamedTempFile::with_prefix_in(EXPORT_TEMP_PREFIX, dir.path()).unwrap();
        let b = NamedTempFile::with_prefix_in(EXPORT_TEMP_PREFIX, dir.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_exports_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let first: Vec<Resource> = (1..=200)
            .map(|i| resource(i, "first", i as f64, &[("batch", "one")]))
            .collect();
        let second: Vec<Resource> = (1..=150)
            .map(|i| resource(i, "second", 1.5, &[]))
            .collect();

        let (a, b) = tokio::join!(
            export_csv(first, dir.path().to_path_buf()),
            export_csv(second, dir.path().to_path_buf())
        );
        let (a, b) = (
            read_rows(&read_all(a.unwrap())),
            read_rows(&read_all(b.unwrap())),
        );

        assert_eq!(a.len(), 200);
        assert!(a.iter().all(|row| row[3] == "first"));
        assert_eq!(b.len(), 150);
        assert!(b.iter().all(|row| row[3] == "second" && row[6] == "1.50"));
        assert!(dir_is_empty(dir.path()));
    }
}
