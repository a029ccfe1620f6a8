//! Upload service for avatars and admin assets.

use std::sync::Arc;

use folio_common::{AppError, AppResult, StorageBackend, generate_storage_key};
use folio_db::repositories::ProfileRepository;
use serde::Serialize;
use tracing::{info, warn};

/// Image types accepted everywhere.
pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Extra types accepted for admin uploads.
pub const PACKAGE_TYPES: &[&str] = &[
    "application/vnd.android.package-archive",
    "application/zip",
    "application/x-zip-compressed",
];

/// Largest avatar accepted.
pub const MAX_AVATAR_SIZE: usize = 2 * 1024 * 1024;

/// Largest admin upload accepted.
pub const MAX_ASSET_SIZE: usize = 50 * 1024 * 1024;

const DEFAULT_FOLDER: &str = "uploads";

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Where an upload was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub url: String,
    pub path: String,
}

fn check_avatar(file: &FileUpload) -> AppResult<()> {
    if !IMAGE_TYPES.contains(&file.content_type.as_str()) {
        return Err(AppError::BadRequest(
            "Invalid file type. Only JPEG, PNG, GIF and WebP images are allowed".to_string(),
        ));
    }
    if file.data.len() > MAX_AVATAR_SIZE {
        return Err(AppError::BadRequest(
            "File size must be less than 2MB".to_string(),
        ));
    }
    Ok(())
}

fn check_asset(file: &FileUpload) -> AppResult<()> {
    let ct = file.content_type.as_str();
    if !IMAGE_TYPES.contains(&ct) && !PACKAGE_TYPES.contains(&ct) {
        return Err(AppError::BadRequest(format!("Unsupported file type: {ct}")));
    }
    if file.data.len() > MAX_ASSET_SIZE {
        return Err(AppError::BadRequest(
            "File size must be less than 50MB".to_string(),
        ));
    }
    Ok(())
}

/// Reduce a client-supplied folder to safe path segments.
#[must_use]
pub fn sanitize_folder(folder: Option<&str>) -> String {
    let segments: Vec<String> = folder
        .unwrap_or_default()
        .split('/')
        .map(|segment| {
            segment
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        DEFAULT_FOLDER.to_string()
    } else {
        segments.join("/")
    }
}

/// Upload service for business logic.
#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn StorageBackend>,
    profile_repo: ProfileRepository,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>, profile_repo: ProfileRepository) -> Self {
        Self {
            storage,
            profile_repo,
        }
    }

    /// Replace a user's avatar.
    ///
    /// The previous object is removed first (best effort). If the profile
    /// cannot be updated the new object is removed again.
    pub async fn upload_avatar(&self, user_id: &str, file: FileUpload) -> AppResult<StoredFile> {
        check_avatar(&file)?;

        let profile = self.profile_repo.get_by_id(user_id).await?;
        if let Some(old_key) = profile
            .avatar_url
            .as_deref()
            .and_then(|url| self.storage.key_for_url(url))
        {
            if let Err(e) = self.storage.delete(&old_key).await {
                warn!(user_id = %user_id, key = %old_key, error = %e, "Failed to delete old avatar");
            }
        }

        let key = generate_storage_key(&format!("avatars/{user_id}"), &file.file_name);
        let uploaded = self
            .storage
            .upload(&key, &file.data, &file.content_type)
            .await?;

        let updated = match self.profile_repo.set_avatar_url(user_id, &uploaded.url).await {
            Ok(rows) if rows > 0 => Ok(()),
            Ok(_) => Err(AppError::Internal(format!("Profile {user_id} vanished"))),
            Err(e) => Err(e),
        };

        if let Err(e) = updated {
            if let Err(cleanup) = self.storage.delete(&uploaded.key).await {
                warn!(key = %uploaded.key, error = %cleanup, "Failed to remove orphaned avatar");
            }
            return Err(AppError::Internal(format!("Failed to update avatar: {e}")));
        }

        info!(user_id = %user_id, key = %uploaded.key, "Avatar updated");
        Ok(StoredFile {
            url: uploaded.url,
            path: uploaded.key,
        })
    }

    /// Store an admin asset under `folder`.
    pub async fn upload_asset(&self, folder: Option<&str>, file: FileUpload) -> AppResult<StoredFile> {
        check_asset(&file)?;

        let key = generate_storage_key(&sanitize_folder(folder), &file.file_name);
        let uploaded = self
            .storage
            .upload(&key, &file.data, &file.content_type)
            .await?;

        Ok(StoredFile {
            url: uploaded.url,
            path: uploaded.key,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use folio_common::{AppError, AppResult, StorageBackend, UploadedFile};

    /// In-memory storage that records what happened.
    #[derive(Default)]
    pub struct RecordingStorage {
        pub uploaded: Mutex<Vec<String>>,
        pub deleted: Mutex<Vec<String>>,
        pub fail_delete: bool,
    }

    #[async_trait::async_trait]
    impl StorageBackend for RecordingStorage {
        async fn upload(
            &self,
            key: &str,
            data: &[u8],
            content_type: &str,
        ) -> AppResult<UploadedFile> {
            self.uploaded.lock().unwrap().push(key.to_string());
            Ok(UploadedFile {
                key: key.to_string(),
                url: self.public_url(key),
                size: data.len() as u64,
                content_type: content_type.to_string(),
                md5: String::new(),
            })
        }

        async fn delete(&self, key: &str) -> AppResult<()> {
            if self.fail_delete {
                return Err(AppError::Storage("delete refused".to_string()));
            }
            self.deleted.lock().unwrap().push(key.to_string());
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("/files/{key}")
        }

        fn key_for_url(&self, url: &str) -> Option<String> {
            url.strip_prefix("/files/").map(str::to_string)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::test_support::RecordingStorage;
    use super::*;
    use crate::services::views::fixtures;
    use folio_db::entities::profile::ProfileRole;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

    fn png(size: usize) -> FileUpload {
        FileUpload {
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            data: vec![0; size],
        }
    }

    fn service(storage: Arc<RecordingStorage>, db: Arc<DatabaseConnection>) -> UploadService {
        UploadService::new(storage, ProfileRepository::new(db))
    }

    #[test]
    fn test_sanitize_folder() {
        assert_eq!(sanitize_folder(None), "uploads");
        assert_eq!(sanitize_folder(Some("  ")), "uploads");
        assert_eq!(sanitize_folder(Some("../../etc")), "etc");
        assert_eq!(sanitize_folder(Some("Projects/APK files")), "projects/apkfiles");
        assert_eq!(sanitize_folder(Some("/covers/")), "covers");
    }

    #[tokio::test]
    async fn test_avatar_rejects_type_and_size_before_upload() {
        let storage = Arc::new(RecordingStorage::default());
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service(storage.clone(), db);

        let mut pdf = png(10);
        pdf.content_type = "application/pdf".to_string();
        assert!(matches!(
            service.upload_avatar("u1", pdf).await,
            Err(AppError::BadRequest(_))
        ));

        assert!(matches!(
            service.upload_avatar("u1", png(MAX_AVATAR_SIZE + 1)).await,
            Err(AppError::BadRequest(_))
        ));

        assert!(storage.uploaded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_avatar_replaces_previous_object() {
        let storage = Arc::new(RecordingStorage::default());
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::profile("u1", "alice", ProfileRole::User)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let stored = service(storage.clone(), db)
            .upload_avatar("u1", png(1024))
            .await
            .unwrap();

        assert!(stored.path.starts_with("avatars/u1/"));
        assert!(stored.path.ends_with(".png"));
        assert_eq!(stored.url, format!("/files/{}", stored.path));
        assert_eq!(
            *storage.deleted.lock().unwrap(),
            vec!["avatars/u1/a.png".to_string()]
        );
    }

    #[tokio::test]
    async fn test_avatar_old_delete_failure_is_not_fatal() {
        let storage = Arc::new(RecordingStorage {
            fail_delete: true,
            ..RecordingStorage::default()
        });
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::profile("u1", "alice", ProfileRole::User)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        assert!(service(storage, db).upload_avatar("u1", png(10)).await.is_ok());
    }

    #[tokio::test]
    async fn test_avatar_profile_update_failure_removes_new_object() {
        let storage = Arc::new(RecordingStorage::default());
        // no exec result queued: the profile update fails
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::profile("u1", "alice", ProfileRole::User)]])
                .into_connection(),
        );

        let result = service(storage.clone(), db).upload_avatar("u1", png(10)).await;

        assert!(result.unwrap_err().is_server_error());

        let uploaded = storage.uploaded.lock().unwrap().clone();
        let deleted = storage.deleted.lock().unwrap().clone();
        assert_eq!(uploaded.len(), 1);
        assert_eq!(deleted, vec!["avatars/u1/a.png".to_string(), uploaded[0].clone()]);
    }

    #[tokio::test]
    async fn test_asset_accepts_apk_in_folder() {
        let storage = Arc::new(RecordingStorage::default());
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let apk = FileUpload {
            file_name: "app-release.apk".to_string(),
            content_type: "application/vnd.android.package-archive".to_string(),
            data: vec![1; 4096],
        };
        let stored = service(storage, db)
            .upload_asset(Some("projects"), apk)
            .await
            .unwrap();

        assert!(stored.path.starts_with("projects/"));
        assert!(stored.path.ends_with(".apk"));
    }

    #[tokio::test]
    async fn test_asset_rejects_unknown_type() {
        let storage = Arc::new(RecordingStorage::default());
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let exe = FileUpload {
            file_name: "setup.exe".to_string(),
            content_type: "application/x-msdownload".to_string(),
            data: vec![1; 10],
        };
        assert!(matches!(
            service(storage, db).upload_asset(None, exe).await,
            Err(AppError::BadRequest(_))
        ));
    }
}
