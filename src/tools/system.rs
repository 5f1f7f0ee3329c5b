use std::process::Command;

use git2::Repository as Git2Repo;
use tracing::debug;

use crate::error::{ReleaseError, Result};
use crate::tools::ExternalTools;

/// Runs the real toolchain: `git` for version control, `go` for module
/// pins, `make validate` for build validation and `gh` for pull requests.
///
/// Child processes inherit stdio so the operator sees tool output live.
#[derive(Debug, Default, Clone)]
pub struct SystemTools;

impl SystemTools {
    pub fn new() -> Self {
        SystemTools
    }

    fn exec<S: AsRef<str>>(&self, program: &str, args: &[S]) -> Result<()> {
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
        let rendered = render(program, &args);
        debug!(command = %rendered, "running external command");

        let status = Command::new(program).args(&args).status().map_err(|e| {
            ReleaseError::external_tool(rendered.clone(), format!("failed to spawn: {}", e))
        })?;

        if !status.success() {
            return Err(ReleaseError::external_tool(rendered, status.to_string()));
        }

        Ok(())
    }
}

/// The command line as shown to the operator, quoting blank or spaced args.
pub(super) fn render(program: &str, args: &[&str]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            rendered.push_str(&format!("'{}'", arg));
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}

impl ExternalTools for SystemTools {
    fn current_branch(&self) -> Result<String> {
        let repo = Git2Repo::discover(".")?;
        let head = repo.head()?;

        if !head.is_branch() {
            return Err(ReleaseError::validation("HEAD is detached"));
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::validation("current branch name is not valid UTF-8"))
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.exec("git", &["checkout", "-b", branch])
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.exec("git", &["checkout", branch])
    }

    fn stage_all(&self) -> Result<()> {
        self.exec("git", &["add", "."])
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.exec("git", &["commit", "-m", message])
    }

    fn force_push(&self, remote: &str, branch: &str) -> Result<()> {
        self.exec("git", &["push", "-f", remote, branch])
    }

    fn pull(&self) -> Result<()> {
        self.exec("git", &["pull"])
    }

    fn create_tag(&self, tag: &str) -> Result<()> {
        self.exec("git", &["tag", tag])
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.exec("git", &["push", remote, tag])
    }

    fn delete_branch(&self, branch: &str) -> Result<()> {
        self.exec("git", &["branch", "-D", branch])
    }

    fn pin_dependency(&self, module: &str, tag: &str) -> Result<()> {
        let target = format!("{}@{}", module, tag);
        self.exec("go", &["get", target.as_str()])
    }

    fn tidy_dependencies(&self) -> Result<()> {
        self.exec("go", &["mod", "tidy"])
    }

    fn build_validate(&self) -> Result<()> {
        self.exec("make", &["validate"])
    }

    fn open_review_request(&self, branch: &str, title: &str, body: &str) -> Result<()> {
        self.exec(
            "gh",
            &[
                "pr", "create", "--head", branch, "--title", title, "--body", body,
            ],
        )
    }

    fn run_command(&self, program: &str, args: &[String]) -> Result<()> {
        self.exec(program, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_quotes_whitespace_and_empty_args() {
        assert_eq!(
            render("gh", &["pr", "create", "--title", "Version v1.0.0", "--body", ""]),
            "gh pr create --title 'Version v1.0.0' --body ''"
        );
    }

    #[test]
    fn test_missing_program_is_external_tool_error() {
        let tools = SystemTools::new();
        let err = tools
            .run_command("release-train-no-such-binary", &[])
            .unwrap_err();
        assert!(matches!(err, ReleaseError::ExternalTool { .. }));
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_external_tool_error() {
        let tools = SystemTools::new();
        let err = tools.run_command("false", &[]).unwrap_err();
        match err {
            ReleaseError::ExternalTool { command, .. } => assert_eq!(command, "false"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(tools.run_command("true", &[]).is_ok());
    }
}
