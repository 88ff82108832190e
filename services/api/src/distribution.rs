//! Publishing rendered reports to S3 behind a presigned download URL

use anyhow::{Context, Result};
use aws_sdk_s3::{Client, presigning::PresigningConfig, primitives::ByteStream};
use std::{future::Future, path::Path, time::Duration};
use tracing::{info, warn};
use uuid::Uuid;

use crate::report::DefaulterReport;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Destination for rendered report files
pub trait ReportPublisher {
    /// Upload `local_path` to `destination` and return a download URL
    fn publish(
        &self,
        local_path: &Path,
        content_type: &str,
        destination: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Clone)]
pub struct ReportDistributor {
    s3_client: Client,
    bucket: String,
    url_expiry: Duration,
}

impl ReportDistributor {
    pub fn new(s3_client: Client, bucket: String, url_expiry: Duration) -> Self {
        Self {
            s3_client,
            bucket,
            url_expiry,
        }
    }
}

impl ReportPublisher for ReportDistributor {
    /// Time-limited presigned GET URL
    async fn publish(
        &self,
        local_path: &Path,
        content_type: &str,
        destination: &str,
    ) -> Result<String> {
        info!("Uploading report to S3: {}", destination);

        let file_content = tokio::fs::read(local_path)
            .await
            .with_context(|| format!("Failed to read {}", local_path.display()))?;
        let byte_stream = ByteStream::from(file_content);

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(destination)
            .body(byte_stream)
            .content_type(content_type)
            .send()
            .await
            .context("Failed to upload report")?;

        let presigning = PresigningConfig::expires_in(self.url_expiry)?;
        let request = self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(destination)
            .presigned(presigning)
            .await
            .context("Failed to presign report URL")?;

        Ok(request.uri().to_string())
    }
}

/// Render `report` into `dir`, publish it and remove the local file
///
/// The file is removed whether or not publishing succeeded.
pub async fn publish_report<P: ReportPublisher>(
    publisher: &P,
    report: DefaulterReport,
    dir: &Path,
    destination: &str,
) -> Result<String> {
    let bytes = tokio::task::spawn_blocking(move || report.to_xlsx())
        .await
        .context("Report rendering task failed")??;

    let local_path = dir.join(format!("{}.xlsx", Uuid::new_v4()));
    tokio::fs::write(&local_path, bytes)
        .await
        .with_context(|| format!("Failed to write report to {}", local_path.display()))?;

    let published = publisher
        .publish(&local_path, XLSX_CONTENT_TYPE, destination)
        .await;

    if let Err(e) = tokio::fs::remove_file(&local_path).await {
        warn!("Failed to remove {}: {}", local_path.display(), e);
    }

    published
}

/// Object key for a cohort report, e.g. `attendanceReport/2026-CSE-2023-01-01-2023-01-31.xlsx`
pub fn report_destination(
    prefix: &str,
    dateofleaving: &str,
    department: &str,
    datefrom: &str,
    dateto: &str,
) -> String {
    format!(
        "{}/{}-{}-{}-{}.xlsx",
        prefix.trim_end_matches('/'),
        dateofleaving,
        department,
        datefrom,
        dateto
    )
}
