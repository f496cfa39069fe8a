use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// In-memory file handed to the upload helper
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    /// Declared MIME type, e.g. "image/jpeg"
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub last_modified: DateTime<Utc>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
            last_modified: Utc::now(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Backend `{code, data}` wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    pub data: T,
}

/// Stored object metadata returned by the storage endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub s3_key: String,
    #[serde(default)]
    pub original_file_name: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub file_size: u64,
    pub presigned_url: String,
}

pub type UploadEnvelope = Envelope<StoredObject>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub s3_key: String,
    pub presigned_url: String,
}

impl From<StoredObject> for UploadResult {
    fn from(obj: StoredObject) -> Self {
        Self {
            s3_key: obj.s3_key,
            presigned_url: obj.presigned_url,
        }
    }
}
