//! Explorer session: the last displayed tree and its status line

use tracing::warn;

use crate::error::ExploreError;
use crate::object::{Key, Namespace};

use super::builder::TreeBuilder;
use super::config::ExploreConfig;
use super::node::Explored;
use super::resolve::resolve_root;

pub const INVALID_ROOT_MESSAGE: &str = "Invalid root object";

/// Resolve `root_path` and build its tree in one shot.
pub fn explore(
    namespace: &Namespace,
    root_path: &str,
    config: &ExploreConfig,
) -> Result<Explored, ExploreError> {
    let root = resolve_root(namespace, root_path)?;
    let builder = TreeBuilder::new(namespace.heap(), config);
    Ok(builder.build(Key::from(root_path), root, root_path))
}

/// Holds a namespace and the tree most recently built from it.
///
/// Trees are rebuilt from scratch on every [`Explorer::explore`]. When the
/// root path does not resolve, the previous tree is kept as it was and
/// only the status line changes.
#[derive(Debug)]
pub struct Explorer {
    namespace: Namespace,
    config: ExploreConfig,
    current: Option<Explored>,
    status: String,
}

impl Explorer {
    pub fn new(namespace: Namespace, config: ExploreConfig) -> Self {
        Self {
            namespace,
            config,
            current: None,
            status: String::new(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn config(&self) -> &ExploreConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ExploreConfig {
        &mut self.config
    }

    pub fn current(&self) -> Option<&Explored> {
        self.current.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn explore(&mut self, root_path: &str) -> Result<&Explored, ExploreError> {
        match explore(&self.namespace, root_path, &self.config) {
            Ok(explored) => {
                self.status = explored.status_message();
                Ok(&*self.current.insert(explored))
            }
            Err(err) => {
                warn!(root = root_path, error = %err, "root did not resolve");
                self.status = INVALID_ROOT_MESSAGE.to_string();
                Err(err)
            }
        }
    }
}
