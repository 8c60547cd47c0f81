// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const AUTH_LOGIN_SUCCESS: &str = "auth.login.success";
pub const AUTH_LOGIN_FAILURE: &str = "auth.login.failure";
pub const AUTH_GUARD_REJECTED: &str = "auth.guard.rejected";
pub const FILES_UPLOADED: &str = "files.uploaded";
pub const FILES_UPLOADED_BYTES: &str = "files.uploaded.bytes";
pub const FILES_DELETED: &str = "files.deleted";
pub const FOLDERS_CREATED: &str = "folders.created";
