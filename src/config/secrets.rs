//! Right.codes token storage.
//!
//! The token goes to the OS credential store when it accepts the write and to a
//! local JSON file otherwise. The password never reaches this module, and the
//! token never appears in a log line or error string.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const KEYRING_SERVICE: &str = "tokbar";
const KEYRING_ACCOUNT: &str = "rightcodes";

/// Which tier received the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredIn {
    /// OS-managed credential store
    Keyring,
    /// Local fallback file
    File,
}

impl fmt::Display for StoredIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyring => write!(f, "keyring"),
            Self::File => write!(f, "file"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenFilePayload {
    token: String,
    /// Troubleshooting only.
    saved_at: String,
}

/// Tiered token store: keyring first, file fallback.
#[derive(Debug, Clone)]
pub struct TokenStore {
    file_path: PathBuf,
    use_keyring: bool,
}

impl TokenStore {
    pub fn new(file_path: PathBuf, use_keyring: bool) -> Self {
        Self {
            file_path,
            use_keyring,
        }
    }

    /// Store rooted in the tokbar data directory (`rightcodes-token.json`).
    pub fn in_dir(data_dir: &Path, use_keyring: bool) -> Self {
        Self::new(data_dir.join("rightcodes-token.json"), use_keyring)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Reads the token and reports where it came from.
    pub fn load_token(&self) -> Option<(String, StoredIn)> {
        if self.use_keyring {
            if let Some(token) = load_from_keyring() {
                return Some((token, StoredIn::Keyring));
            }
        }
        load_from_file(&self.file_path).map(|token| (token, StoredIn::File))
    }

    /// Persists the token, falling back to the file when the keyring refuses it.
    ///
    /// # Errors
    /// - If the keyring is unavailable and the file cannot be written
    pub fn save_token(&self, token: &str) -> anyhow::Result<StoredIn> {
        if self.use_keyring {
            match save_to_keyring(token) {
                Ok(()) => {
                    tracing::info!("Right.codes token stored in keyring");
                    self.discard_file_token();
                    return Ok(StoredIn::Keyring);
                }
                Err(e) => {
                    tracing::warn!("Keyring unavailable, using token file: {}", e);
                }
            }
        }
        save_to_file(&self.file_path, token)?;
        tracing::info!(
            "Right.codes token stored in {}",
            self.file_path.display()
        );
        Ok(StoredIn::File)
    }

    /// Removes a token left in the file tier by an earlier fallback.
    fn discard_file_token(&self) {
        match fs::remove_file(&self.file_path) {
            Ok(()) => tracing::info!("Removed stale token file {}", self.file_path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to remove stale token file {}: {}",
                self.file_path.display(),
                e
            ),
        }
    }
}

fn load_from_file(path: &Path) -> Option<String> {
    let body = fs::read_to_string(path).ok()?;
    let payload = serde_json::from_str::<TokenFilePayload>(&body).ok()?;
    let token = payload.token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn save_to_file(path: &Path, token: &str) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Invalid token path"))?;
    fs::create_dir_all(parent)
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", parent.display()))?;

    let payload = TokenFilePayload {
        token: token.to_string(),
        saved_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    let body = serde_json::to_string_pretty(&payload)?;
    write_private(path, body.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write token file: {e}"))
}

/// Writes `body` to a file only the owner can read.
///
/// The mode is set before any byte is written, including when the file already
/// exists with wider permissions.
#[cfg(unix)]
fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(body)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    fs::write(path, body)
}

fn load_from_keyring() -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT).ok()?;
    match entry.get_password() {
        Ok(token) => {
            let token = token.trim();
            if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            }
        }
        Err(keyring::Error::NoEntry) => None,
        Err(e) => {
            tracing::debug!("Keyring read failed: {}", e);
            None
        }
    }
}

fn save_to_keyring(token: &str) -> Result<(), keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)?.set_password(token)
}
