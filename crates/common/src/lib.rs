// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the `BatCloud` browser client and server.
//! This module defines the JSON request and response bodies of the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credentials submitted to the login endpoint
///
/// A missing field reads as empty and fails verification like a wrong value.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LoginRequest {
    /// Account name, compared case-sensitively
    pub username: String,
    /// Plaintext password, discarded after verification
    pub password: String,
}

/// Response of the login endpoint
///
/// `message` is only present on failure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl LoginResponse {
    pub fn ok() -> Self {
        Self { success: true, message: None }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()) }
    }
}

/// Bare success acknowledgement (`{"success": true}`)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl Default for SuccessResponse {
    fn default() -> Self {
        Self { success: true }
    }
}

/// Identity attached to a validated session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub authenticated: bool,
    pub username: String,
}

/// Kind of a stored entry
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// A file or folder as listed to the client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Opaque identifier used by delete and as a parent reference
    pub id: String,
    /// Display name
    pub name: String,
    /// `file` or `folder`
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes, 0 for folders
    pub size: u64,
    /// Last modification time
    pub modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thumbnail_url: Option<String>,
}

impl FileEntry {
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// Response of the list endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListFilesResponse {
    pub files: Vec<FileEntry>,
}

/// Response of the upload endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UploadResponse {
    pub success: bool,
    pub file: FileEntry,
}

/// Request body of the delete endpoint
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileRequest {
    #[serde(default)]
    pub file_id: Option<String>,
}

/// Request body of the create-folder endpoint
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    #[serde(default)]
    pub folder_name: Option<String>,
    /// Parent folder id; the storage root when absent
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Response of the create-folder endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateFolderResponse {
    pub success: bool,
    pub folder: FileEntry,
}
