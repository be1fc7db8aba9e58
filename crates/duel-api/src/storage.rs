use std::path::PathBuf;

use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

/// On-disk image store. Each image is a flat file at `{dir}/{id}`, served
/// back through GET /images/{id} with its recorded content type — the local
/// stand-in for a hosted object store's public URLs.
pub struct Storage {
    dir: PathBuf,
    public_base: String,
}

/// Where an uploaded image ended up. The inline variant is the degraded
/// path: the bytes could not be written to disk, so the reference embeds
/// them as a data: URI instead of failing the upload.
#[derive(Debug, Clone)]
pub enum StoredImage {
    Hosted { id: Uuid, url: String },
    Inline { data: String },
}

impl StoredImage {
    pub fn reference(&self) -> &str {
        match self {
            Self::Hosted { url, .. } => url,
            Self::Inline { data } => data,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }
}

impl Storage {
    pub async fn new(dir: PathBuf, public_base: String) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Image storage directory: {}", dir.display());
        Ok(Self {
            dir,
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn file_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(id.to_string())
    }

    pub fn public_url(&self, id: Uuid) -> String {
        format!("{}/images/{}", self.public_base, id)
    }

    /// Write the image to disk and hand back its public URL; if the write
    /// fails, degrade to inlining the bytes as a data: URI.
    pub async fn store(&self, content_type: &str, bytes: &[u8]) -> StoredImage {
        let id = Uuid::new_v4();
        match fs::write(self.file_path(id), bytes).await {
            Ok(()) => StoredImage::Hosted {
                id,
                url: self.public_url(id),
            },
            Err(e) => {
                warn!("Image write failed ({}), falling back to inline data", e);
                StoredImage::Inline {
                    data: format!("data:{};base64,{}", content_type, B64.encode(bytes)),
                }
            }
        }
    }

    pub async fn read(&self, id: Uuid) -> std::io::Result<Vec<u8>> {
        fs::read(self.file_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_and_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("uploads"), "http://localhost:3000/".into())
            .await
            .unwrap();

        let stored = storage.store("image/png", b"fake-png-bytes").await;
        let StoredImage::Hosted { id, url } = stored else {
            panic!("disk write should succeed in tests");
        };
        assert_eq!(url, format!("http://localhost:3000/images/{}", id));

        let bytes = storage.read(id).await.unwrap();
        assert_eq!(bytes, b"fake-png-bytes");
    }

    #[tokio::test]
    async fn unwritable_dir_degrades_to_inline_data() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("uploads"), "http://localhost:3000".into())
            .await
            .unwrap();
        // Make the directory vanish out from under the store
        tokio::fs::remove_dir_all(dir.path().join("uploads"))
            .await
            .unwrap();

        let stored = storage.store("image/png", &[1, 2, 3]).await;
        assert!(stored.is_inline());
        assert!(stored.reference().starts_with("data:image/png;base64,"));
    }
}
