use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::string_arg;
use crate::application::action::Action;
use crate::application::ports::{Blobstore, Platform};
use crate::domain::{ActionError, LogType};

/// Collects logs into a tarball and ships it to the blobstore.
pub struct LogsAction {
    platform: Arc<dyn Platform>,
    blobstore: Arc<dyn Blobstore>,
}

impl LogsAction {
    #[must_use]
    pub fn new(platform: Arc<dyn Platform>, blobstore: Arc<dyn Blobstore>) -> Self {
        Self {
            platform,
            blobstore,
        }
    }
}

fn filters_arg(args: &[Value], log_type: LogType) -> Result<Vec<String>, ActionError> {
    let filters = match args.get(1) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(ToString::to_string).ok_or_else(|| {
                    ActionError::invalid("fetch_logs", "filters must be strings")
                })
            })
            .collect::<Result<_, _>>()?,
        Some(_) => {
            return Err(ActionError::invalid(
                "fetch_logs",
                "argument 1 must be a list of filters",
            ));
        }
    };
    if filters.is_empty() {
        return Ok(log_type.default_filters());
    }
    Ok(filters)
}

#[async_trait]
impl Action for LogsAction {
    async fn run(&self, args: &[Value]) -> Result<Value, ActionError> {
        let raw_type = string_arg("fetch_logs", args, 0)?;
        let log_type = LogType::parse(raw_type).ok_or_else(|| {
            ActionError::invalid("fetch_logs", format!("unknown log type '{raw_type}'"))
        })?;
        let filters = filters_arg(args, log_type)?;

        let dir = log_type.dir(self.platform.dirs());
        let tarball = self.platform.compress_files_in_dir(&dir, &filters).await?;

        let upload = self.blobstore.create(&tarball).await;
        if let Err(e) = self.platform.fs().remove_file(&tarball) {
            tracing::warn!(path = %tarball.display(), error = %e, "failed to remove log tarball");
        }
        let blob_id = upload?;

        tracing::info!(log_type = raw_type, blob_id = %blob_id, "logs uploaded");
        Ok(json!({ "blobstore_id": blob_id }))
    }

    fn is_asynchronous(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{StubBlobstore, StubPlatform};

    fn action(platform: &Arc<StubPlatform>, blobstore: &Arc<StubBlobstore>) -> LogsAction {
        LogsAction::new(
            Arc::clone(platform) as Arc<dyn Platform>,
            Arc::clone(blobstore) as Arc<dyn Blobstore>,
        )
    }

    #[tokio::test]
    async fn job_logs_use_default_filter_and_upload() {
        let platform = Arc::new(StubPlatform::new());
        let blobstore = Arc::new(StubBlobstore::default());

        let result = action(&platform, &blobstore)
            .run(&[json!("job")])
            .await
            .expect("fetch");

        assert_eq!(result, json!({"blobstore_id": "blob-1"}));
        assert_eq!(
            platform.calls(),
            vec!["compress_files_in_dir /var/fleet/sys/log **/*.log".to_string()]
        );
        assert_eq!(
            *blobstore.uploads.lock().expect("lock"),
            vec![platform.tarball_path()]
        );
        assert!(platform.fs.get(&platform.tarball_path()).is_none());
    }

    #[tokio::test]
    async fn explicit_filters_are_passed_through() {
        let platform = Arc::new(StubPlatform::new());
        let blobstore = Arc::new(StubBlobstore::default());

        action(&platform, &blobstore)
            .run(&[json!("agent"), json!(["current", "*.gz"])])
            .await
            .expect("fetch");

        assert_eq!(
            platform.calls(),
            vec!["compress_files_in_dir /var/fleet/agent/log current,*.gz".to_string()]
        );
    }

    #[tokio::test]
    async fn tarball_removed_even_when_upload_fails() {
        let platform = Arc::new(StubPlatform::new());
        let blobstore = Arc::new(StubBlobstore {
            fail: true,
            ..StubBlobstore::default()
        });

        let err = action(&platform, &blobstore)
            .run(&[json!("job")])
            .await
            .expect_err("upload fails");
        assert_eq!(err.to_string(), "blobstore unavailable");
        assert!(platform.fs.get(&platform.tarball_path()).is_none());
    }

    #[tokio::test]
    async fn compression_failure_skips_upload() {
        let mut stub = StubPlatform::new();
        stub.fail_compress = true;
        let platform = Arc::new(stub);
        let blobstore = Arc::new(StubBlobstore::default());

        let err = action(&platform, &blobstore)
            .run(&[json!("agent")])
            .await
            .expect_err("compress fails");

        assert_eq!(err.to_string(), "tar failed");
        assert!(matches!(err, ActionError::Execution(_)));
        assert!(blobstore.uploads.lock().expect("lock").is_empty());
        assert_eq!(
            platform.calls(),
            vec!["compress_files_in_dir /var/fleet/agent/log **/*".to_string()]
        );
    }

    #[tokio::test]
    async fn rejects_unknown_type_and_bad_filters() {
        let platform = Arc::new(StubPlatform::new());
        let blobstore = Arc::new(StubBlobstore::default());
        let logs = action(&platform, &blobstore);

        assert!(matches!(
            logs.run(&[json!("kernel")]).await,
            Err(ActionError::InvalidArguments { .. })
        ));
        assert!(matches!(
            logs.run(&[json!("job"), json!("*.log")]).await,
            Err(ActionError::InvalidArguments { .. })
        ));
        assert!(matches!(
            logs.run(&[json!("job"), json!([1])]).await,
            Err(ActionError::InvalidArguments { .. })
        ));
        assert!(platform.calls().is_empty());
    }
}
