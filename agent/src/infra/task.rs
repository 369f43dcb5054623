//! In-process task tracking on the tokio runtime.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use futures::FutureExt;

use crate::application::ports::{TaskFuture, TaskService};
use crate::domain::{TaskId, TaskInfo, TaskState};

type TaskTable = Arc<Mutex<HashMap<String, TaskInfo>>>;

/// Task service that runs work with `tokio::spawn` and keeps every task's
/// latest snapshot in memory for the lifetime of the agent process.
///
/// `start` must be called from within a tokio runtime.
#[derive(Default)]
pub struct InMemoryTaskService {
    tasks: TaskTable,
    next_id: AtomicU64,
}

impl InMemoryTaskService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(tasks: &TaskTable, info: TaskInfo) {
        tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(info.id.as_str().to_string(), info);
    }
}

impl TaskService for InMemoryTaskService {
    fn start(&self, method: &str, task: TaskFuture) -> TaskInfo {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let info = TaskInfo::running(TaskId::new(format!("task-{n}")), method, Utc::now());
        Self::record(&self.tasks, info.clone());

        let tasks = Arc::clone(&self.tasks);
        let mut finished = info.clone();
        tokio::spawn(async move {
            finished.state = match AssertUnwindSafe(task).catch_unwind().await {
                Ok(Ok(value)) => TaskState::Done { value },
                Ok(Err(e)) => {
                    tracing::warn!(
                        task_id = %finished.id,
                        method = %finished.method,
                        error = %e,
                        "task failed",
                    );
                    TaskState::Failed {
                        error: e.to_string(),
                    }
                }
                Err(payload) => {
                    let error = format!("panicked: {}", panic_message(payload.as_ref()));
                    tracing::error!(
                        task_id = %finished.id,
                        method = %finished.method,
                        %error,
                        "task panicked",
                    );
                    TaskState::Failed { error }
                }
            };
            Self::record(&tasks, finished);
        });

        info
    }

    fn find(&self, id: &str) -> Option<TaskInfo> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
