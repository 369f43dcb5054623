use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::string_arg;
use crate::application::action::Action;
use crate::application::ports::Platform;
use crate::domain::ssh::{SSH_GROUPS, ephemeral_user_pattern};
use crate::domain::{ActionError, Settings, SshCommand, SshParams};

/// Creates and removes short-lived SSH logins for operators.
pub struct SshAction {
    settings: Arc<Settings>,
    platform: Arc<dyn Platform>,
}

impl SshAction {
    #[must_use]
    pub fn new(settings: Arc<Settings>, platform: Arc<dyn Platform>) -> Self {
        Self { settings, platform }
    }

    async fn setup(&self, args: &[Value]) -> Result<Value, ActionError> {
        let raw = args
            .get(1)
            .cloned()
            .ok_or_else(|| ActionError::invalid("ssh", "setup requires a params object"))?;
        let params: SshParams = serde_json::from_value(raw)
            .map_err(|e| ActionError::invalid("ssh", format!("invalid setup params: {e}")))?;
        params
            .validate()
            .map_err(|reason| ActionError::invalid("ssh", reason))?;

        let base_dir = self.platform.dirs().ssh_users_dir();
        self.platform
            .create_user(&params.user, params.password.as_deref(), &base_dir)
            .await?;
        self.platform
            .add_user_to_groups(&params.user, &SSH_GROUPS)
            .await?;
        self.platform
            .setup_ssh(&params.user, &params.public_key)
            .await?;

        tracing::info!(user = %params.user, "ssh user created");

        Ok(json!({
            "command": SshCommand::Setup.as_str(),
            "status": "success",
            "ip": self.settings.default_ip(),
        }))
    }

    async fn cleanup(&self) -> Result<Value, ActionError> {
        let deleted = self
            .platform
            .delete_ephemeral_users_matching(&ephemeral_user_pattern())
            .await?;
        tracing::info!(count = deleted.len(), "ephemeral ssh users removed");

        Ok(json!({
            "command": SshCommand::Cleanup.as_str(),
            "status": "success",
        }))
    }
}

#[async_trait]
impl Action for SshAction {
    async fn run(&self, args: &[Value]) -> Result<Value, ActionError> {
        let command = string_arg("ssh", args, 0)?;
        match SshCommand::parse(command) {
            Some(SshCommand::Setup) => self.setup(args).await,
            Some(SshCommand::Cleanup) => self.cleanup().await,
            None => Err(ActionError::invalid(
                "ssh",
                format!("unknown ssh command '{command}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{StubPlatform, settings};

    fn action(platform: &Arc<StubPlatform>) -> SshAction {
        SshAction::new(
            Arc::new(settings()),
            Arc::clone(platform) as Arc<dyn Platform>,
        )
    }

    #[tokio::test]
    async fn setup_creates_user_and_reports_ip() {
        let platform = Arc::new(StubPlatform::new());
        let result = action(&platform)
            .run(&[
                json!("setup"),
                json!({"user": "fleet_op1", "password": "crypted", "public_key": "ssh-rsa AAAA"}),
            ])
            .await
            .expect("setup");

        assert_eq!(
            result,
            json!({"command": "setup", "status": "success", "ip": "10.0.0.5"})
        );
        assert_eq!(
            platform.calls(),
            vec![
                "create_user fleet_op1 crypted /var/fleet/agent_ssh".to_string(),
                "add_user_to_groups fleet_op1 admin,fleet_sshers".to_string(),
                "setup_ssh fleet_op1 ssh-rsa AAAA".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn setup_rejects_non_ephemeral_user_before_touching_host() {
        let platform = Arc::new(StubPlatform::new());
        let err = action(&platform)
            .run(&[json!("setup"), json!({"user": "root", "public_key": "k"})])
            .await
            .expect_err("rejected");
        assert!(matches!(err, ActionError::InvalidArguments { action: "ssh", .. }));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn cleanup_deletes_prefixed_users() {
        let mut stub = StubPlatform::new();
        stub.deletable_users = vec!["fleet_a".to_string(), "fleet_b".to_string()];
        let platform = Arc::new(stub);
        let result = action(&platform).run(&[json!("cleanup")]).await.expect("cleanup");
        assert_eq!(result, json!({"command": "cleanup", "status": "success"}));
        assert_eq!(
            platform.calls(),
            vec!["delete_ephemeral_users_matching ^fleet_".to_string()]
        );
    }

    #[tokio::test]
    async fn unknown_command_is_invalid() {
        let platform = Arc::new(StubPlatform::new());
        assert!(matches!(
            action(&platform).run(&[json!("reboot")]).await,
            Err(ActionError::InvalidArguments { .. })
        ));
        assert!(matches!(
            action(&platform).run(&[]).await,
            Err(ActionError::InvalidArguments { .. })
        ));
    }
}
