use crate::errors::AppError;
use crate::models::ProgressStore;
use crate::store::normalize;
use chrono::Local;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

/// Reads the whole store. A missing or blank file yields an empty store. A
/// file that is not valid JSON is renamed aside first, so the next write
/// cannot overwrite it. Any other read failure is returned.
pub async fn load_data(path: &Path) -> io::Result<ProgressStore> {
    let mut store = match fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => ProgressStore::default(),
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(store) => store,
            Err(err) => {
                error!("failed to parse data file: {err}");
                let backup = backup_path(path);
                fs::rename(path, &backup).await?;
                warn!("moved unreadable data file to {}", backup.display());
                ProgressStore::default()
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => ProgressStore::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            return Err(err);
        }
    };

    normalize(&mut store);
    info!(users = store.len(), "loaded store from {}", path.display());
    Ok(store)
}

pub async fn persist_data(path: &Path, store: &ProgressStore) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(store).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".corrupt-{}", Local::now().format("%Y%m%d%H%M%S%3f")));
    PathBuf::from(name)
}
