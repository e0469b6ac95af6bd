use crate::errors::AttendanceError;
use crate::models::AppData;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, error};

/// Versioned name the snapshot is stored under.
pub const STORAGE_KEY: &str = "jdvp_data_v1";

pub fn default_data_path() -> PathBuf {
    PathBuf::from("data").join(format!("{STORAGE_KEY}.json"))
}

/// Reads the stored snapshot. Anything unreadable falls back to an empty
/// roster; the failure is only logged.
pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!(path = %path.display(), "failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no data file yet, starting empty");
            AppData::default()
        }
        Err(err) => {
            error!(path = %path.display(), "failed to read data file: {err}");
            AppData::default()
        }
    }
}

/// Writes the full snapshot next to the target and renames it into place, so
/// a failed save never leaves a truncated data file behind.
pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AttendanceError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let tmp = temp_path(path);

    if let Err(err) = write_synced(&tmp, &payload).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(err.into());
    }
    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(STORAGE_KEY);
    path.with_file_name(format!(".{name}.tmp"))
}
