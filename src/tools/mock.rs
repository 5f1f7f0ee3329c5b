use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{ReleaseError, Result};
use crate::tools::system::render;
use crate::tools::ExternalTools;

/// One recorded call against [RecordingTools].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Operation name, matching the trait method (e.g. `"commit"`)
    pub operation: &'static str,
    pub args: Vec<String>,
    /// Last path component of the working directory at call time
    pub dir: String,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Invocation>,
    branches: HashMap<String, String>,
    failing: HashSet<&'static str>,
}

/// In-memory tools for testing without git, go, make or gh.
///
/// Every call is recorded along with the directory it ran in. Branch queries
/// answer from a per-directory table, falling back to a default branch.
pub struct RecordingTools {
    default_branch: String,
    state: Mutex<State>,
}

impl RecordingTools {
    /// Tools that report every checkout as being on `main`.
    pub fn new() -> Self {
        Self::on_branch("main")
    }

    pub fn on_branch(branch: impl Into<String>) -> Self {
        RecordingTools {
            default_branch: branch.into(),
            state: Mutex::new(State::default()),
        }
    }

    /// Report `branch` for checkouts whose directory is named `dir`.
    pub fn set_branch(&self, dir: impl Into<String>, branch: impl Into<String>) {
        self.lock().branches.insert(dir.into(), branch.into());
    }

    /// Make every future call to `operation` fail.
    pub fn fail_on(&self, operation: &'static str) {
        self.lock().failing.insert(operation);
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.lock().calls.clone()
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.lock().calls.iter().map(|c| c.operation).collect()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<Invocation> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records `operation` with its `args`. A failure reports the command line
    /// `SystemTools` would have run for it.
    fn record(
        &self,
        operation: &'static str,
        args: &[&str],
        program: &str,
        argv: &[&str],
    ) -> Result<()> {
        let dir = current_dir_name();
        let mut state = self.lock();

        state.calls.push(Invocation {
            operation,
            args: args.iter().map(|a| a.to_string()).collect(),
            dir,
        });

        if state.failing.contains(operation) {
            return Err(ReleaseError::external_tool(
                render(program, argv),
                "exit status: 1",
            ));
        }

        Ok(())
    }
}

impl Default for RecordingTools {
    fn default() -> Self {
        Self::new()
    }
}

fn current_dir_name() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default()
}

impl ExternalTools for RecordingTools {
    fn current_branch(&self) -> Result<String> {
        self.record("current_branch", &[], "git", &["rev-parse", "--abbrev-ref", "HEAD"])?;
        let dir = current_dir_name();
        let state = self.lock();
        Ok(state
            .branches
            .get(&dir)
            .cloned()
            .unwrap_or_else(|| self.default_branch.clone()))
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.record("create_branch", &[branch], "git", &["checkout", "-b", branch])
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record("checkout", &[branch], "git", &["checkout", branch])
    }

    fn stage_all(&self) -> Result<()> {
        self.record("stage_all", &[], "git", &["add", "."])
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.record("commit", &[message], "git", &["commit", "-m", message])
    }

    fn force_push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record("force_push", &[remote, branch], "git", &["push", "-f", remote, branch])
    }

    fn pull(&self) -> Result<()> {
        self.record("pull", &[], "git", &["pull"])
    }

    fn create_tag(&self, tag: &str) -> Result<()> {
        self.record("create_tag", &[tag], "git", &["tag", tag])
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.record("push_tag", &[remote, tag], "git", &["push", remote, tag])
    }

    fn delete_branch(&self, branch: &str) -> Result<()> {
        self.record("delete_branch", &[branch], "git", &["branch", "-D", branch])
    }

    fn pin_dependency(&self, module: &str, tag: &str) -> Result<()> {
        let target = format!("{}@{}", module, tag);
        self.record("pin_dependency", &[module, tag], "go", &["get", target.as_str()])
    }

    fn tidy_dependencies(&self) -> Result<()> {
        self.record("tidy_dependencies", &[], "go", &["mod", "tidy"])
    }

    fn build_validate(&self) -> Result<()> {
        self.record("build_validate", &[], "make", &["validate"])
    }

    fn open_review_request(&self, branch: &str, title: &str, body: &str) -> Result<()> {
        self.record(
            "open_review_request",
            &[branch, title, body],
            "gh",
            &["pr", "create", "--head", branch, "--title", title, "--body", body],
        )
    }

    fn run_command(&self, program: &str, args: &[String]) -> Result<()> {
        let mut all = vec![program];
        all.extend(args.iter().map(String::as_str));
        self.record("run_command", &all, program, &all[1..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let tools = RecordingTools::new();
        tools.create_branch("bump").unwrap();
        tools.commit("Version v1.0.0").unwrap();

        assert_eq!(tools.operations(), vec!["create_branch", "commit"]);
        assert_eq!(tools.calls_to("commit")[0].args, vec!["Version v1.0.0"]);
    }

    #[test]
    fn test_default_branch() {
        let tools = RecordingTools::on_branch("feature/x");
        assert_eq!(tools.current_branch().unwrap(), "feature/x");
    }

    #[test]
    fn test_fail_on_still_records() {
        let tools = RecordingTools::new();
        tools.fail_on("pull");

        let err = tools.pull().unwrap_err();
        assert!(matches!(err, ReleaseError::ExternalTool { .. }));
        assert_eq!(err.to_string(), "External command `git pull` failed: exit status: 1");
        assert_eq!(tools.operations(), vec!["pull"]);
        assert!(tools.stage_all().is_ok());
    }

    #[test]
    fn test_run_command_records_program_and_args() {
        let tools = RecordingTools::new();
        tools
            .run_command("npm", &["run".to_string(), "openapi:region".to_string()])
            .unwrap();
        assert_eq!(
            tools.calls_to("run_command")[0].args,
            vec!["npm", "run", "openapi:region"]
        );
    }

    #[test]
    fn test_failure_reports_rendered_command() {
        let tools = RecordingTools::new();
        tools.fail_on("run_command");
        tools.fail_on("open_review_request");

        let err = tools
            .run_command("npm", &["run".to_string(), "openapi:region".to_string()])
            .unwrap_err();
        match err {
            ReleaseError::ExternalTool { command, .. } => {
                assert_eq!(command, "npm run openapi:region")
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = tools
            .open_review_request("bump", "Version v1.0.0", "")
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("gh pr create --head bump --title 'Version v1.0.0' --body ''"));
        assert_eq!(
            tools.calls_to("open_review_request")[0].args,
            vec!["bump", "Version v1.0.0", ""]
        );
    }
}
