use crate::assistant::Assistant;
use crate::errors::AttendanceError;
use crate::models::AppData;
use crate::storage::persist_data;
use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::sync::Mutex;

/// Owner of the single `AppData` snapshot. Mutations go through `commit`,
/// which saves the new snapshot before it becomes visible.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub assistant: Arc<Assistant>,
    chat_busy: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, assistant: Assistant) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            assistant: Arc::new(assistant),
            chat_busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn snapshot(&self) -> AppData {
        self.data.lock().await.clone()
    }

    /// Runs `apply` against the current snapshot and, if it succeeds, persists
    /// and installs the result. On any error nothing changes, in memory or on
    /// disk.
    pub async fn commit<T>(
        &self,
        apply: impl FnOnce(&AppData) -> Result<(AppData, T), AttendanceError>,
    ) -> Result<T, AttendanceError> {
        let mut data = self.data.lock().await;
        let (next, output) = apply(&data)?;
        persist_data(&self.data_path, &next).await?;
        *data = next;
        Ok(output)
    }

    /// Claims the chat slot. `None` while another chat request is running.
    pub fn try_begin_chat(&self) -> Option<ChatGuard> {
        self.chat_busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ChatGuard {
                busy: Arc::clone(&self.chat_busy),
            })
    }
}

/// Releases the chat slot when dropped.
pub struct ChatGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for ChatGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
