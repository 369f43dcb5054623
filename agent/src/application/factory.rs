//! The dispatch registry: controller method name → ready-to-run action.
//!
//! Built once at startup from the agent's collaborators and immutable
//! afterwards, so lookups from concurrently handled requests need no locking.
//! Share it behind an `Arc<ActionFactory>`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::action::Action;
use super::actions::{
    ApplyAction, GetStateAction, GetTaskAction, LogsAction, PingAction, SshAction,
};
use super::ports::{Blobstore, FileSystem, Platform, TaskService};
use crate::domain::{ActionError, AgentDirs, Method, Settings};

/// Owns exactly one action per supported method, plus the task service
/// that `get_task` reads.
pub struct ActionFactory {
    actions: HashMap<&'static str, Arc<dyn Action>>,
    task_service: Arc<dyn TaskService>,
}

/// Collaborators handed to each action constructor.
struct Wiring {
    settings: Arc<Settings>,
    platform: Arc<dyn Platform>,
    fs: Arc<dyn FileSystem>,
    dirs: AgentDirs,
    blobstore: Arc<dyn Blobstore>,
    task_service: Arc<dyn TaskService>,
}

impl Wiring {
    fn build(&self, method: Method) -> Arc<dyn Action> {
        match method {
            Method::Apply => Arc::new(ApplyAction::new(
                Arc::clone(&self.fs),
                self.dirs.spec_json(),
            )),
            Method::Ping => Arc::new(PingAction),
            Method::GetTask => Arc::new(GetTaskAction::new(Arc::clone(&self.task_service))),
            Method::GetState => Arc::new(GetStateAction::new(
                Arc::clone(&self.settings),
                Arc::clone(&self.fs),
                self.dirs.spec_json(),
            )),
            Method::Ssh => Arc::new(SshAction::new(
                Arc::clone(&self.settings),
                Arc::clone(&self.platform),
            )),
            Method::FetchLogs => Arc::new(LogsAction::new(
                Arc::clone(&self.platform),
                Arc::clone(&self.blobstore),
            )),
        }
    }
}

impl ActionFactory {
    /// Bind every action to the collaborators it needs.
    ///
    /// Infallible: a broken collaborator only shows up when an action that
    /// uses it runs.
    #[must_use]
    pub fn new(
        settings: Settings,
        platform: Arc<dyn Platform>,
        blobstore: Arc<dyn Blobstore>,
        task_service: Arc<dyn TaskService>,
    ) -> Self {
        let wiring = Wiring {
            settings: Arc::new(settings),
            fs: platform.fs(),
            dirs: platform.dirs().clone(),
            platform,
            blobstore,
            task_service: Arc::clone(&task_service),
        };
        let actions = Method::ALL
            .into_iter()
            .map(|method| (method.as_str(), wiring.build(method)))
            .collect();
        Self {
            actions,
            task_service,
        }
    }

    /// Look up the action bound to `method`.
    ///
    /// `None` means the method is not supported; the caller decides how to
    /// reject the request.
    #[must_use]
    pub fn resolve(&self, method: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(method).cloned()
    }

    /// Like [`resolve`](Self::resolve), but an unsupported method is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownAction`] naming `method` when it is not
    /// one of the supported methods.
    pub fn require(&self, method: &str) -> Result<Arc<dyn Action>, ActionError> {
        self.resolve(method)
            .ok_or_else(|| ActionError::UnknownAction(method.to_string()))
    }

    /// The task service asynchronous actions are started on. It is the same
    /// instance `get_task` reads.
    #[must_use]
    pub fn tasks(&self) -> &dyn TaskService {
        self.task_service.as_ref()
    }

    #[must_use]
    pub fn contains(&self, method: &str) -> bool {
        self.actions.contains_key(method)
    }

    /// Registered method names, sorted.
    #[must_use]
    pub fn methods(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.actions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for ActionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionFactory")
            .field("methods", &self.methods())
            .finish()
    }
}
