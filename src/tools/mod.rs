//! External tool abstraction layer
//!
//! Every side effect outside the process (version control, the dependency
//! manager, build validation and the code-hosting client) goes through the
//! [ExternalTools] trait. The pipeline never spawns a process itself.
//!
//! - [system::SystemTools]: runs the real `git`, `go`, `make` and `gh` binaries
//! - [mock::RecordingTools]: records calls in memory for tests
//!
//! All operations are synchronous and fail fast: a non-zero exit becomes
//! [crate::error::ReleaseError::ExternalTool] and nothing is retried.

pub mod mock;
pub mod system;

pub use mock::{Invocation, RecordingTools};
pub use system::SystemTools;

use crate::error::Result;

/// Command-level contract for every tool the release pipeline drives.
///
/// Methods operate on the process working directory, which the pipeline
/// points at the component checkout before calling them.
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync` so a single instance can be shared
/// between the pipeline and precommit hooks.
pub trait ExternalTools: Send + Sync {
    /// Name of the currently checked-out branch.
    fn current_branch(&self) -> Result<String>;

    /// Create `branch` from the current HEAD and switch to it.
    fn create_branch(&self, branch: &str) -> Result<()>;

    /// Switch to an existing branch.
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Stage every working-tree change.
    fn stage_all(&self) -> Result<()>;

    fn commit(&self, message: &str) -> Result<()>;

    /// Force-push `branch` to `remote`.
    fn force_push(&self, remote: &str, branch: &str) -> Result<()>;

    /// Fast-forward the current branch from its upstream.
    fn pull(&self) -> Result<()>;

    fn create_tag(&self, tag: &str) -> Result<()>;

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()>;

    /// Force-delete a local branch.
    fn delete_branch(&self, branch: &str) -> Result<()>;

    /// Pin `module` to `tag` in the dependency manifest.
    fn pin_dependency(&self, module: &str, tag: &str) -> Result<()>;

    /// Reconcile the dependency manifest after pinning.
    fn tidy_dependencies(&self) -> Result<()>;

    /// Run the repository's validation target.
    fn build_validate(&self) -> Result<()>;

    /// Open a review request from `branch`.
    fn open_review_request(&self, branch: &str, title: &str, body: &str) -> Result<()>;

    /// Run an arbitrary command, used by precommit hooks.
    fn run_command(&self, program: &str, args: &[String]) -> Result<()>;
}
