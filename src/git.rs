//! Revision inspection: commit message and changed-file lookup via git.

use std::future::Future;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, error};

use crate::error::{NotifyError, Result};

/// Maximum number of file paths reported for a two-revision diff.
/// The single-commit listing is not capped.
pub const MAX_DIFF_FILES: usize = 10;

/// Which revisions a changed-file listing is computed between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffBase {
    /// Only the files introduced by the current commit.
    CurrentCommit,
    /// Files changed between a prior revision and the current commit.
    Since(String),
}

/// A thing that can report the latest commit message and the set of
/// changed file paths. Implemented by [`GitCli`] in production and by
/// in-memory fakes in tests.
pub trait RevisionInspector {
    /// Latest commit's full message, trimmed of surrounding whitespace.
    fn commit_message(&self) -> impl Future<Output = Result<String>> + Send;

    /// Changed file paths for the given diff base, in tool-reported order.
    fn changed_files(&self, base: &DiffBase) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Revision inspector backed by the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Runs git with the given args, failing on spawn errors and non-zero exits.
    async fn run_git(&self, operation: &str, args: &[&str]) -> Result<std::process::Output> {
        debug!("Running (cwd = {:?}): git {}", self.repo_dir, args.join(" "));
        let output = Command::new("git")
            .current_dir(&self.repo_dir)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                error!("{} failed to start: {}", operation, e);
                NotifyError::GitOperationFailed {
                    operation: operation.to_string(),
                    message: format!("failed to start git: {}", e),
                }
            })?;

        if !output.status.success() {
            let message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("{} failed: {}", operation, message);
            return Err(NotifyError::GitOperationFailed {
                operation: operation.to_string(),
                message,
            });
        }

        Ok(output)
    }
}

impl RevisionInspector for GitCli {
    async fn commit_message(&self) -> Result<String> {
        let output = self.run_git("git log", &["log", "-1", "--pretty=%B"]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn changed_files(&self, base: &DiffBase) -> Result<Vec<String>> {
        match base {
            DiffBase::Since(sha) => {
                let output = self
                    .run_git("git diff", &["diff", "--name-only", sha, "HEAD"])
                    .await?;

                // A diff that exits zero but still writes diagnostics is not
                // trusted as a complete listing.
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.trim().is_empty() {
                    return Err(NotifyError::GitOperationFailed {
                        operation: "git diff".to_string(),
                        message: stderr.trim().to_string(),
                    });
                }

                let mut paths = parse_paths(&output.stdout);
                paths.truncate(MAX_DIFF_FILES);
                Ok(paths)
            }
            DiffBase::CurrentCommit => {
                let output = self
                    .run_git(
                        "git diff-tree",
                        &["diff-tree", "--no-commit-id", "--name-only", "-r", "HEAD"],
                    )
                    .await?;
                Ok(parse_paths(&output.stdout))
            }
        }
    }
}

fn parse_paths(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command as StdCommand;

    fn run_git(repo_dir: &Path, args: &[&str]) {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn head_sha(repo_dir: &Path) -> String {
        let output = StdCommand::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(repo_dir)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    fn make_git_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.name", "test-user"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        dir
    }

    fn commit_files(repo_dir: &Path, names: &[String], message: &str) {
        for name in names {
            std::fs::write(repo_dir.join(name), "contents").unwrap();
        }
        run_git(repo_dir, &["add", "."]);
        run_git(repo_dir, &["commit", "-m", message]);
    }

    #[tokio::test]
    async fn commit_message_is_trimmed() {
        let repo = make_git_repo();
        run_git(
            repo.path(),
            &["commit", "--allow-empty", "-m", "  Fix bug  "],
        );
        let message = GitCli::new(repo.path()).commit_message().await.unwrap();
        assert_eq!(message, "Fix bug");
    }

    #[tokio::test]
    async fn two_revision_diff_is_capped() {
        let repo = make_git_repo();
        let base = head_sha(repo.path());
        let names: Vec<String> = (0..12).map(|i| format!("f{:02}.txt", i)).collect();
        commit_files(repo.path(), &names, "add files");

        let files = GitCli::new(repo.path())
            .changed_files(&DiffBase::Since(base))
            .await
            .unwrap();
        assert_eq!(files.len(), MAX_DIFF_FILES);
        assert_eq!(files[0], "f00.txt");
        assert_eq!(files[9], "f09.txt");
    }

    #[tokio::test]
    async fn single_commit_diff_is_unbounded() {
        let repo = make_git_repo();
        let names: Vec<String> = (0..12).map(|i| format!("f{:02}.txt", i)).collect();
        commit_files(repo.path(), &names, "add files");

        let files = GitCli::new(repo.path())
            .changed_files(&DiffBase::CurrentCommit)
            .await
            .unwrap();
        assert_eq!(files.len(), 12);
    }

    #[tokio::test]
    async fn empty_commit_yields_empty_change_set() {
        let repo = make_git_repo();
        let files = GitCli::new(repo.path())
            .changed_files(&DiffBase::CurrentCommit)
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn fails_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let result = GitCli::new(dir.path()).commit_message().await;
        assert!(matches!(
            result,
            Err(NotifyError::GitOperationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_base_revision_fails_the_diff() {
        let repo = make_git_repo();
        let result = GitCli::new(repo.path())
            .changed_files(&DiffBase::Since("0000000000000000000000000000000000000000".into()))
            .await;
        assert!(matches!(
            result,
            Err(NotifyError::GitOperationFailed { .. })
        ));
    }
}
