use cardioscreen::{ModelError, ModelInfo, ModelManager, ModelSource};
use sha2::{Digest, Sha256};
use std::fs;

const MODEL_BYTES: &[u8] = b"not really an onnx graph, but hashable";

fn sha256_of(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn unreachable_info(name: &str) -> ModelInfo {
    // Port 9 (discard) is closed on test hosts, so any fetch fails fast.
    ModelInfo::new(name, "http://127.0.0.1:9/model.onnx", sha256_of(MODEL_BYTES))
}

#[tokio::test]
async fn test_model_paths() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let model_path = manager.get_model_path("heart-disease");
    assert!(model_path.ends_with("heart-disease/model.onnx"));
    assert!(!manager.is_model_downloaded("heart-disease"));
    Ok(())
}

#[tokio::test]
async fn test_resolve_local_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("heart_disease_model.onnx");
    fs::write(&path, MODEL_BYTES)?;

    let manager = ModelManager::new(dir.path().join("cache"))?;
    let resolved = manager.resolve(&ModelSource::Local(path.clone())).await?;
    assert_eq!(resolved, path);
    Ok(())
}

#[tokio::test]
async fn test_resolve_missing_local_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let missing = dir.path().join("absent.onnx");

    let err = manager.resolve(&ModelSource::Local(missing.clone())).await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound(p) if p == missing));
    Ok(())
}

#[tokio::test]
async fn test_verify_model() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let info = unreachable_info("heart-disease");

    assert!(!manager.verify_model(&info)?);

    let model_path = manager.get_model_path(&info.name);
    fs::create_dir_all(model_path.parent().unwrap())?;
    fs::write(&model_path, MODEL_BYTES)?;
    assert!(manager.verify_model(&info)?);

    fs::write(&model_path, "corrupted data")?;
    assert!(!manager.verify_model(&info)?);
    Ok(())
}

#[tokio::test]
async fn test_cached_verified_model_skips_download() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let info = unreachable_info("heart-disease");

    let model_path = manager.get_model_path(&info.name);
    fs::create_dir_all(model_path.parent().unwrap())?;
    fs::write(&model_path, MODEL_BYTES)?;

    let resolved = manager.resolve(&ModelSource::Remote(info)).await?;
    assert_eq!(resolved, model_path);
    assert_eq!(fs::read(&resolved)?, MODEL_BYTES);
    Ok(())
}

#[tokio::test]
async fn test_failed_download_cleans_up() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let info = unreachable_info("heart-disease");

    let model_path = manager.get_model_path(&info.name);
    fs::create_dir_all(model_path.parent().unwrap())?;
    fs::write(&model_path, "corrupted data")?;

    let err = manager.ensure_model_downloaded(&info).await.unwrap_err();
    assert!(matches!(err, ModelError::DownloadError(_)));
    assert!(!manager.is_model_downloaded(&info.name));
    Ok(())
}

#[tokio::test]
async fn test_remove_download() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;

    manager.remove_download("never-downloaded")?;

    let model_path = manager.get_model_path("heart-disease");
    fs::create_dir_all(model_path.parent().unwrap())?;
    fs::write(&model_path, MODEL_BYTES)?;
    manager.remove_download("heart-disease")?;
    assert!(!model_path.exists());
    Ok(())
}

#[tokio::test]
async fn test_escaping_model_name_leaves_outside_files_alone() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    let manager = ModelManager::new(root.path().join("cache").join("models"))?;

    // "<cache>/models/../../outside/model.onnx" resolves to "<root>/outside/model.onnx"
    let outside = root.path().join("outside").join("model.onnx");
    fs::create_dir_all(outside.parent().unwrap())?;
    fs::write(&outside, MODEL_BYTES)?;

    let err = manager.remove_download("../../outside").unwrap_err();
    assert!(matches!(err, ModelError::InvalidName(_)));
    assert!(outside.exists());

    let err = manager
        .resolve(&ModelSource::Remote(unreachable_info("../../outside")))
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::InvalidName(_)));
    assert!(!manager.is_model_downloaded("../../outside"));
    assert_eq!(fs::read(&outside)?, MODEL_BYTES);
    Ok(())
}

#[tokio::test]
async fn test_empty_and_dot_model_names_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    for name in ["", ".", ".."] {
        let err = manager.ensure_model_downloaded(&unreachable_info(name)).await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidName(ref n) if n == name));
        assert!(matches!(manager.verify_model(&unreachable_info(name)), Err(ModelError::InvalidName(_))));
    }
    Ok(())
}

#[tokio::test]
async fn test_setup_error_survives_failed_cleanup() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let info = unreachable_info("heart-disease");

    // A directory where the model file belongs can be neither read nor removed as a file.
    let model_path = manager.get_model_path(&info.name);
    fs::create_dir_all(&model_path)?;

    let err = manager.download_model(&info).await.unwrap_err();
    assert!(matches!(err, ModelError::IoError(_)));
    assert!(model_path.is_dir());
    Ok(())
}
