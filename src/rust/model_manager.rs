use std::path::{Component, Path, PathBuf};
use std::fs;
use std::io;
use std::sync::Arc;
use std::env;
use tokio::sync::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Digest};

/// Environment variable overriding the model cache root.
pub const CACHE_ENV_VAR: &str = "CARDIOSCREEN_CACHE";

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model file not found: {0}")]
    NotFound(PathBuf),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid model name '{0}': expected a single path component")]
    InvalidName(String),
    #[error("Model verification failed")]
    VerificationFailed,
    #[error("Hash mismatch: expected {expected}, got {actual} for model '{name}'")]
    HashMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

/// Where a remotely hosted model lives and how to check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Cache subdirectory name
    pub name: String,
    pub url: String,
    /// Lowercase hex SHA-256 of the model file
    pub sha256: String,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, url: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            sha256: sha256.into().to_lowercase(),
        }
    }
}

/// A model file either already on disk or to be fetched into the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Local(PathBuf),
    Remote(ModelInfo),
}

#[derive(Clone)]
pub struct ModelManager {
    models_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    /// Creates a new ModelManager with the default models directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        if let Ok(path) = env::var(CACHE_ENV_VAR) {
            return PathBuf::from(path).join("models");
        }
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("cardioscreen").join("models");
        }
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("cardioscreen").join("models");
        }
        env::temp_dir().join("cardioscreen").join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self {
            models_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name).join("model.onnx")
    }

    pub fn is_model_downloaded(&self, name: &str) -> bool {
        if check_name(name).is_err() {
            return false;
        }
        let model_path = self.get_model_path(name);
        log::debug!("Model path: {:?} (exists: {})", model_path, model_path.exists());
        model_path.exists()
    }

    /// Returns a local path for `source`, downloading remote models as needed.
    pub async fn resolve(&self, source: &ModelSource) -> Result<PathBuf, ModelError> {
        match source {
            ModelSource::Local(path) => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    log::error!("Model file '{}' not found", path.display());
                    Err(ModelError::NotFound(path.clone()))
                }
            }
            ModelSource::Remote(info) => {
                self.ensure_model_downloaded(info).await?;
                Ok(self.get_model_path(&info.name))
            }
        }
    }

    /// Downloads `info` into the cache unless a verified copy is already there.
    pub async fn download_model(&self, info: &ModelInfo) -> Result<(), ModelError> {
        check_name(&info.name)?;
        let _lock = self.download_lock.lock().await;

        let model_path = self.get_model_path(&info.name);
        let result = if model_path.exists() {
            log::info!("Model file exists at {:?}, verifying...", model_path);
            match self.verify_file(&model_path, &info.sha256) {
                Ok(true) => {
                    log::info!("Existing model file verified successfully");
                    Ok(())
                }
                Ok(false) => {
                    log::warn!("Model file verification failed, redownloading");
                    self.download_and_verify_file(info, &model_path).await
                }
                Err(e) => Err(e),
            }
        } else {
            log::info!("Model file does not exist, downloading...");
            self.download_and_verify_file(info, &model_path).await
        };

        if let Err(e) = &result {
            log::error!("Failed to set up model '{}': {}", info.name, e);
            if let Err(cleanup) = self.remove_download(&info.name) {
                log::warn!("Failed to remove partial download of '{}': {}", info.name, cleanup);
            }
        }
        result
    }

    fn verify_file(&self, path: &Path, expected_hash: &str) -> Result<bool, ModelError> {
        let bytes = fs::read(path)?;
        let hash = sha256_hex(&bytes);
        log::debug!("Verifying {:?}: {} bytes, hash {} (expected {})", path, bytes.len(), hash, expected_hash);
        Ok(hash == expected_hash.to_lowercase())
    }

    /// Checks the cached copy of `info` against its hash. `false` if absent.
    pub fn verify_model(&self, info: &ModelInfo) -> Result<bool, ModelError> {
        check_name(&info.name)?;
        let model_path = self.get_model_path(&info.name);
        if !model_path.exists() {
            log::info!("Model file {:?} does not exist", model_path);
            return Ok(false);
        }
        self.verify_file(&model_path, &info.sha256)
    }

    async fn download_and_verify_file(&self, info: &ModelInfo, path: &Path) -> Result<(), ModelError> {
        log::info!("Downloading model '{}' from {} to {:?}", info.name, info.url, path);
        let response = reqwest::get(&info.url).await?.error_for_status()?;
        log::info!("Download response status: {}", response.status());
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        let hash = sha256_hex(&bytes);
        if hash != info.sha256.to_lowercase() {
            log::error!("Model hash mismatch: expected {}, got {}", info.sha256, hash);
            return Err(ModelError::HashMismatch {
                name: info.name.clone(),
                expected: info.sha256.clone(),
                actual: hash,
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &bytes)?;

        if !self.verify_file(path, &info.sha256)? {
            return Err(ModelError::VerificationFailed);
        }

        log::info!("Model '{}' downloaded and verified successfully", info.name);
        Ok(())
    }

    /// Deletes the cached file for `name`, if any.
    pub fn remove_download(&self, name: &str) -> Result<(), ModelError> {
        check_name(name)?;
        let model_path = self.get_model_path(name);
        if model_path.exists() {
            fs::remove_file(&model_path)?;
        }
        Ok(())
    }

    /// Ensures that a model is downloaded and verified.
    /// If the model doesn't exist, it will be downloaded.
    /// If verification fails, it will be re-downloaded.
    pub async fn ensure_model_downloaded(&self, info: &ModelInfo) -> Result<(), ModelError> {
        check_name(&info.name)?;
        if !self.is_model_downloaded(&info.name) {
            log::info!("Model '{}' not found, downloading...", info.name);
            self.download_model(info).await?;
        } else if !self.verify_model(info)? {
            log::info!("Model '{}' verification failed, re-downloading...", info.name);
            self.remove_download(&info.name)?;
            self.download_model(info).await?;
        } else {
            log::info!("Model '{}' verification successful", info.name);
        }
        Ok(())
    }
}

/// Cache names must stay inside the models directory.
fn check_name(name: &str) -> Result<(), ModelError> {
    let mut components = Path::new(name).components();
    let single = matches!((components.next(), components.next()), (Some(Component::Normal(_)), None));
    if single && !name.contains(['/', '\\']) {
        Ok(())
    } else {
        log::error!("Rejecting model name {:?}", name);
        Err(ModelError::InvalidName(name.to_string()))
    }
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
