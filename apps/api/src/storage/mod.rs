//! Résumé storage adapter over S3/MinIO. Uploads are keyed by applicant and
//! upload time; re-uploading under the same name overwrites the object.

pub mod handlers;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// Object name for an applicant's résumé: unique enough per upload,
/// derivable again from the public URL's final path segment.
pub fn cv_object_name(applicant_id: Uuid, uploaded_at_millis: i64) -> String {
    format!("cv-{applicant_id}-{uploaded_at_millis}.pdf")
}

/// Publicly resolvable URL for an object in the cv bucket.
pub fn public_url(endpoint: &str, bucket: &str, object_name: &str) -> String {
    format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, object_name)
}

/// Derives the object name back out of a public URL. `None` when the URL
/// has no final path segment to use.
pub fn object_name_from_url(cv_url: &str) -> Option<&str> {
    cv_url.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Uploads a résumé and returns its public URL.
pub async fn upload_cv(
    s3: &S3Client,
    bucket: &str,
    endpoint: &str,
    applicant_id: Uuid,
    content: Bytes,
    content_type: &str,
) -> Result<String, AppError> {
    let name = cv_object_name(applicant_id, chrono::Utc::now().timestamp_millis());

    s3.put_object()
        .bucket(bucket)
        .key(&name)
        .body(ByteStream::from(content))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("Failed to upload file: {e}")))?;

    info!("Uploaded résumé {name} for applicant {applicant_id}");
    Ok(public_url(endpoint, bucket, &name))
}

/// Deletes the object a public URL points at.
pub async fn remove_cv(s3: &S3Client, bucket: &str, cv_url: &str) -> Result<(), AppError> {
    let name = object_name_from_url(cv_url)
        .ok_or_else(|| AppError::Storage("CV URL has no object name".to_string()))?;

    s3.delete_object()
        .bucket(bucket)
        .key(name)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("Failed to delete file: {e}")))?;

    info!("Removed résumé object {name}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_shape() {
        let id = Uuid::new_v4();
        let name = cv_object_name(id, 1_700_000_000_000);
        assert_eq!(name, format!("cv-{id}-1700000000000.pdf"));
    }

    #[test]
    fn test_object_name_round_trips_through_url() {
        let id = Uuid::new_v4();
        let name = cv_object_name(id, 1_700_000_000_000);
        let url = public_url("http://localhost:9000/", "cvs", &name);
        assert_eq!(object_name_from_url(&url), Some(name.as_str()));
    }

    #[test]
    fn test_url_without_object_name_is_rejected() {
        assert_eq!(object_name_from_url("http://localhost:9000/cvs/"), None);
        assert_eq!(object_name_from_url(""), None);
    }
}
