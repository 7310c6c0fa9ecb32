use std::fs::Metadata;
use std::time::SystemTime;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Content checksum of the original input bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checksum {
    pub algorithm: String,
    pub value: String,
}

impl Checksum {
    pub fn sha256(bytes: &[u8]) -> Self {
        Self {
            algorithm: "SHA-256".to_string(),
            value: format!("{:x}", Sha256::digest(bytes)),
        }
    }
}

/// File-system attributes of the parsed file, passed through opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAttributes {
    pub creation_time: Option<SystemTime>,
    pub last_modified_time: Option<SystemTime>,
    pub last_access_time: Option<SystemTime>,
    pub is_readable: bool,
    pub is_writable: bool,
    pub is_executable: bool,
    pub size: u64,
}

impl FileAttributes {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            creation_time: metadata.created().ok(),
            last_modified_time: metadata.modified().ok(),
            last_access_time: metadata.accessed().ok(),
            is_readable: true,
            is_writable: !metadata.permissions().readonly(),
            is_executable: is_executable(metadata),
            size: metadata.len(),
        }
    }
}

#[cfg(unix)]
fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &Metadata) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_of_empty_input() {
        let checksum = Checksum::sha256(b"");
        assert_eq!(checksum.algorithm, "SHA-256");
        assert_eq!(
            checksum.value,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
