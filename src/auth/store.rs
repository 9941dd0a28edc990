use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::token::Credentials;

const TOKEN_FILE_VERSION: u32 = 1;

/// Storage abstraction for the persisted credential pair.
///
/// `save` must be atomic: a concurrent `load` sees either the previous pair
/// or the new one, never a mix of both.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<Credentials>, AuthError>;
    fn save(&self, credentials: &Credentials) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

/// Configuration for file-backed token storage.
#[derive(Debug, Clone)]
pub struct TokenStoreConfig {
    pub base_dir: PathBuf,
    pub profile: String,
}

impl TokenStoreConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            profile: "default".to_string(),
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn default_dir() -> PathBuf {
        default_stride_dir()
    }
}

/// File-backed token store using one TOML file per profile.
///
/// Writes go to a temporary sibling file that is renamed over the target,
/// so the pair on disk is replaced as a unit.
///
/// # Example
/// ```no_run
/// use stride::auth::{Credentials, FileTokenStore, TokenStore, TokenStoreConfig};
///
/// let store = FileTokenStore::new(TokenStoreConfig::new("/tmp/stride".into()));
/// store.save(&Credentials::new("access", "refresh"))?;
/// # Ok::<(), stride::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    profile: String,
}

impl FileTokenStore {
    pub fn new(config: TokenStoreConfig) -> Self {
        let profile = normalize_label(&config.profile);
        Self {
            path: config.base_dir.join(format!("{profile}.toml")),
            profile,
        }
    }

    pub fn new_default() -> Self {
        Self::new(TokenStoreConfig::new(default_stride_dir()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Credentials>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let file: TokenFile = toml::from_str(&raw)?;
        if file.version != TOKEN_FILE_VERSION {
            return Err(AuthError::Serialization(format!(
                "unsupported token file version {} at {}",
                file.version,
                self.path.display()
            )));
        }
        Ok(Some(file.credentials))
    }

    fn save(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let file = TokenFile {
            version: TOKEN_FILE_VERSION,
            profile: self.profile.clone(),
            saved_at: Utc::now(),
            credentials: credentials.clone(),
        };
        let serialized = toml::to_string(&file)?;
        atomic_write(&self.path, serialized.as_bytes())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

/// Process-scoped token store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    credentials: Mutex<Option<Credentials>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: Mutex::new(Some(credentials)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Credentials>, AuthError> {
        Ok(self
            .credentials
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, credentials: &Credentials) -> Result<(), AuthError> {
        *self
            .credentials
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self
            .credentials
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenFile {
    version: u32,
    profile: String,
    saved_at: DateTime<Utc>,
    credentials: Credentials,
}

fn default_stride_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".stride"))
        .unwrap_or_else(|| PathBuf::from(".stride"))
}

fn normalize_label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }
    let out: String = trimmed
        .chars()
        .map(|ch| {
            let lower = ch.to_ascii_lowercase();
            if lower.is_ascii_alphanumeric() || lower == '-' {
                lower
            } else {
                '-'
            }
        })
        .collect();
    if out.trim_matches('-').is_empty() {
        "default".to_string()
    } else {
        out
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path.file_name().ok_or_else(|| {
        AuthError::Io(format!("token path {} has no file name", path.display()))
    })?;

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_name = format!(
        ".{}.tmp-{}-{nonce}",
        file_name.to_string_lossy(),
        std::process::id()
    );
    let temp_path = path.with_file_name(temp_name);

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let write_result = (|| -> std::io::Result<()> {
        let mut temp_file = options.open(&temp_path)?;
        temp_file.write_all(data)?;
        temp_file.sync_all()?;
        Ok(())
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}
