//! Provides the core Repository implementation.

use crate::config::RepositoryConfig;
use crate::diff::parse_diff;
use crate::error::GitError;
use crate::logging::log_git_operation;
use crate::models::*;
use crate::status::parse_status;
use crate::types::{EntryState, Result};
use crate::untracked::UntrackedDiffSynthesizer;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Pretty format for `git log`; fields are split on `|`, commits end with `%x1e`.
const LOG_FORMAT: &str = "--pretty=format:%H|%an|%ad|%s|%b%x1e";

/// Represents a local Git working tree located at a specific path.
///
/// Every query re-runs git; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Repository {
    pub(crate) location: PathBuf,
    config: RepositoryConfig,
}

impl Repository {
    /// Creates a `Repository` instance pointing to an existing local Git repository.
    ///
    /// This does *not* check if the path is actually a valid Git repository.
    /// Operations will fail later if it's not.
    ///
    /// # Arguments
    /// * `p` - The path to the local repository's root directory.
    pub fn new<P: AsRef<Path>>(p: P) -> Repository {
        Repository::with_config(p, RepositoryConfig::default())
    }

    /// Like [`Repository::new`], with explicit settings.
    pub fn with_config<P: AsRef<Path>>(p: P, config: RepositoryConfig) -> Repository {
        Repository {
            location: PathBuf::from(p.as_ref()),
            config,
        }
    }

    /// Opens the working tree at `p`, checking that it is a git repository.
    ///
    /// An empty path means the current directory.
    ///
    /// # Errors
    /// Returns `GitError::WorkingDirectoryInaccessible` if the current directory cannot be read,
    /// or `GitError::NotARepository` if `p` has no `.git` entry.
    pub fn open<P: AsRef<Path>>(p: P, config: RepositoryConfig) -> Result<Repository> {
        let p_ref = p.as_ref();
        let location = if p_ref.as_os_str().is_empty() {
            env::current_dir().map_err(|_| GitError::WorkingDirectoryInaccessible)?
        } else {
            PathBuf::from(p_ref)
        };

        if !is_git_repository(&location) {
            return Err(GitError::NotARepository(location));
        }
        Ok(Repository::with_config(location, config))
    }

    /// Initializes a new Git repository in the specified directory.
    ///
    /// Equivalent to `git init`.
    ///
    /// # Errors
    /// Returns `GitError` if the `git init` command fails or `git` cannot be executed.
    pub fn init<P: AsRef<Path>>(p: P) -> Result<Repository> {
        let repo = Repository::new(p);
        repo.run(&["init"])?;
        Ok(repo)
    }

    /// The working-tree root this repository operates in.
    pub fn work_dir(&self) -> &Path {
        &self.location
    }

    // --- Queries ---

    /// Lists every changed, staged or untracked path.
    ///
    /// Equivalent to `git status --porcelain=v1`.
    ///
    /// # Errors
    /// Returns `GitError::CommandFailed` with git's output if the command fails.
    pub fn status(&self) -> Result<Vec<FileState>> {
        let output = self.run(&["status", "--porcelain=v1"])?;
        Ok(parse_status(&output))
    }

    /// Diffs the index against HEAD (`staged`) or the worktree against the index.
    ///
    /// Equivalent to `git diff --no-color [--cached] [-- <paths>...]`.
    /// Untracked files never appear here; see [`Repository::untracked_diff`].
    pub fn diff<S: AsRef<str>>(&self, staged: bool, paths: &[S]) -> Result<Vec<DiffRecord>> {
        let mut args = vec!["diff", "--no-color"];
        if staged {
            args.push("--cached");
        }
        if !paths.is_empty() {
            args.push("--");
            args.extend(paths.iter().map(|p| p.as_ref()));
        }

        let output = self.run(&args)?;
        Ok(parse_diff(&output))
    }

    /// Synthesizes new-file diffs for untracked paths.
    ///
    /// With no `paths`, every untracked file is included. Requested paths that
    /// are not untracked are dropped, and unreadable files are skipped.
    ///
    /// # Errors
    /// Only the status query can fail this call.
    pub fn untracked_diff<S: AsRef<str>>(&self, paths: &[S]) -> Result<Vec<DiffRecord>> {
        let status = self.status()?;
        let synthesizer = UntrackedDiffSynthesizer::new(&self.location)
            .with_max_size(self.config.max_untracked_size);
        Ok(synthesizer.synthesize(&status, paths))
    }

    /// Reads up to `limit` commits from the current branch, newest first. `0` means no limit.
    ///
    /// Equivalent to `git log --pretty=format:%H|%an|%ad|%s|%b%x1e --date=iso [-<limit>]`.
    /// A repository without commits has an empty history.
    pub fn history(&self, limit: usize) -> Result<Vec<CommitRecord>> {
        if !self.has_commits()? {
            return Ok(Vec::new());
        }

        let limit_arg = format!("-{}", limit);
        let mut args = vec!["log", LOG_FORMAT, "--date=iso"];
        if limit > 0 {
            args.push(&limit_arg);
        }

        let output = self.run(&args)?;
        Ok(CommitRecord::parse_log(&output))
    }

    /// Whether HEAD points at a commit.
    ///
    /// Equivalent to `git rev-parse --verify --quiet HEAD`, which exits with 1
    /// for an unborn HEAD.
    ///
    /// # Errors
    /// Any other failure, such as running outside a repository, is returned.
    pub fn has_commits(&self) -> Result<bool> {
        match self.run(&["rev-parse", "--verify", "--quiet", "HEAD"]) {
            Ok(_) => Ok(true),
            Err(GitError::CommandFailed { status: Some(1), .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// The full message of the last commit, without trailing newlines.
    ///
    /// # Errors
    /// Returns `GitError::NoCommits` if history is empty.
    pub fn last_commit_message(&self) -> Result<String> {
        if !self.has_commits()? {
            return Err(GitError::NoCommits);
        }
        let output = self.run(&["log", "-1", "--pretty=%B"])?;
        Ok(output.trim_end().to_owned())
    }

    /// Obtains the commit hash of the current `HEAD`.
    ///
    /// Equivalent to `git rev-parse HEAD`.
    pub fn last_commit_hash(&self) -> Result<String> {
        Ok(self.run(&["rev-parse", "HEAD"])?.trim().to_owned())
    }

    /// Equivalent to `git branch --show-current`. Empty on a detached HEAD.
    pub fn current_branch(&self) -> Result<String> {
        Ok(self.run(&["branch", "--show-current"])?.trim().to_owned())
    }

    /// Gets the URL configured for a remote, `origin` when `remote_name` is empty.
    ///
    /// Equivalent to `git remote get-url <remote_name>`.
    pub fn remote_url(&self, remote_name: &str) -> Result<String> {
        let remote_name = if remote_name.is_empty() { "origin" } else { remote_name };
        Ok(self.run(&["remote", "get-url", remote_name])?.trim().to_owned())
    }

    /// Whether anything is staged. Equivalent to `git diff --cached --name-only`.
    pub fn has_staged_changes(&self) -> Result<bool> {
        Ok(!self.run(&["diff", "--cached", "--name-only"])?.trim().is_empty())
    }

    /// Whether tracked files have unstaged edits. Equivalent to `git diff --name-only`.
    pub fn has_unstaged_changes(&self) -> Result<bool> {
        Ok(!self.run(&["diff", "--name-only"])?.trim().is_empty())
    }

    /// Whether status reports nothing, untracked files included.
    pub fn is_clean(&self) -> Result<bool> {
        Ok(self.run(&["status", "--porcelain"])?.trim().is_empty())
    }

    // --- Mutations ---

    /// Adds file contents to the index.
    ///
    /// Equivalent to `git add <paths>...`.
    ///
    /// # Errors
    /// Returns `GitError::NoPathsSpecified` without running git if `paths` is empty.
    pub fn stage<S: AsRef<str>>(&self, paths: &[S]) -> Result<()> {
        if paths.is_empty() {
            return Err(GitError::NoPathsSpecified { operation: "stage" });
        }
        let mut args = vec!["add"];
        args.extend(paths.iter().map(|p| p.as_ref()));
        self.run(&args).map(|_| ())
    }

    /// Removes paths from the index, keeping worktree content.
    ///
    /// Equivalent to `git reset HEAD <paths>...`.
    ///
    /// # Errors
    /// Returns `GitError::NoPathsSpecified` without running git if `paths` is empty.
    pub fn unstage<S: AsRef<str>>(&self, paths: &[S]) -> Result<()> {
        if paths.is_empty() {
            return Err(GitError::NoPathsSpecified { operation: "unstage" });
        }
        let mut args = vec!["reset", "HEAD"];
        args.extend(paths.iter().map(|p| p.as_ref()));
        self.run(&args).map(|_| ())
    }

    /// Stages every change in the working tree, untracked files included.
    ///
    /// Equivalent to `git add .`.
    pub fn stage_all(&self) -> Result<()> {
        self.run(&["add", "."]).map(|_| ())
    }

    /// Commits files currently in the staging area.
    ///
    /// Equivalent to `git commit -m <message>`.
    ///
    /// # Errors
    /// Returns `GitError::EmptyCommitMessage` without running git for a blank message.
    pub fn commit(&self, message: &str) -> Result<()> {
        if message.trim().is_empty() {
            return Err(GitError::EmptyCommitMessage);
        }
        self.run(&["commit", "-m", message]).map(|_| ())
    }

    /// Replaces the last commit with the staged content and a new message.
    ///
    /// Equivalent to `git commit --amend -m <message>`.
    ///
    /// # Errors
    /// Returns `GitError::EmptyCommitMessage` for a blank message and
    /// `GitError::NoCommits` when there is nothing to amend; git's amend is not
    /// invoked in either case.
    pub fn amend_commit(&self, message: &str) -> Result<()> {
        if message.trim().is_empty() {
            return Err(GitError::EmptyCommitMessage);
        }
        if !self.has_commits()? {
            return Err(GitError::NoCommits);
        }
        self.run(&["commit", "--amend", "-m", message]).map(|_| ())
    }

    /// Throws away every change to `path`.
    ///
    /// * Untracked files are deleted from disk. This cannot be undone.
    /// * Paths staged as new (never committed) are removed from the index and
    ///   left on disk as untracked.
    /// * Any other tracked path has index and worktree restored from HEAD
    ///   (`git checkout HEAD -- <path>`).
    ///
    /// The lookup is scoped to `path` and lists untracked files individually,
    /// so a file inside a new directory, or a directory itself, can be
    /// discarded. Every entry under a directory is discarded by the rules
    /// above. A path that status does not report has nothing to discard.
    ///
    /// # Errors
    /// Returns `GitError::NoPathsSpecified` for an empty path, `GitError::Io` if
    /// deletion fails, or `GitError::CommandFailed` if git fails.
    pub fn discard_changes(&self, path: &str) -> Result<()> {
        if path.is_empty() {
            return Err(GitError::NoPathsSpecified { operation: "discard" });
        }

        let output = self.run(&["status", "--porcelain=v1", "--untracked-files=all", "--", path])?;
        let entries = parse_status(&output);
        if entries.is_empty() {
            debug!(path, "Nothing to discard");
            return Ok(());
        }

        for entry in &entries {
            self.discard_entry(entry)?;
        }

        let full_path = self.location.join(path);
        if entries.iter().all(FileState::is_untracked) && full_path.is_dir() {
            fs::remove_dir_all(&full_path)?;
        }
        Ok(())
    }

    fn discard_entry(&self, entry: &FileState) -> Result<()> {
        let path = entry.path.as_str();
        if entry.is_untracked() {
            let full_path = self.location.join(path);
            if full_path.is_dir() {
                fs::remove_dir_all(&full_path)?;
            } else if full_path.exists() {
                fs::remove_file(&full_path)?;
            }
            debug!(path, "Deleted untracked path");
            return Ok(());
        }

        if entry.code.index() == EntryState::Added {
            return self.run(&["reset", "-q", "--", path]).map(|_| ());
        }

        self.run(&["checkout", "HEAD", "--", path]).map(|_| ())
    }

    // --- Raw access ---

    /// Executes an arbitrary Git command within the repository context and returns its output,
    /// with one trailing newline removed.
    ///
    /// # Errors
    /// Returns `GitError` if the command fails or `git` cannot be executed.
    pub fn run_git_command<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
        self.run(&args)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        execute_git_fn(&self.config.executable, &self.location, args, |output| {
            Ok(output.to_owned())
        })
    }
}

/// Checks for a `.git` directory, or a `.git` file as used by linked worktrees.
pub fn is_git_repository<P: AsRef<Path>>(dir: P) -> bool {
    dir.as_ref().join(".git").exists()
}

/// Removes exactly one trailing newline; leading whitespace is significant to porcelain output.
fn strip_trailing_newline(mut output: String) -> String {
    if output.ends_with('\n') {
        output.pop();
    }
    output
}

/// Executes a Git command and processes its stdout on success using a closure.
///
/// Every invocation is logged. On failure the error carries stdout and stderr
/// combined so it can be diagnosed without re-running the command.
fn execute_git_fn<F, R>(git: &str, p: &Path, args: &[&str], process: F) -> Result<R>
where
    F: FnOnce(&str) -> Result<R>,
{
    let operation = args.first().copied().unwrap_or("git");
    let logged_args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

    let process_output = Command::new(git).current_dir(p).args(args).output();

    let output = match process_output {
        Ok(output) => output,
        Err(e) => {
            // Failed to even execute the command (e.g., git not found, permissions)
            let err = if e.kind() == ErrorKind::NotFound && p.is_dir() {
                GitError::GitNotFound
            } else {
                GitError::Execution(e)
            };
            log_git_operation(operation, &logged_args, p, false, "", Some(&err));
            return Err(err);
        }
    };

    let stdout = strip_trailing_newline(String::from_utf8_lossy(&output.stdout).into_owned());

    if output.status.success() {
        log_git_operation(operation, &logged_args, p, true, &stdout, None);
        return process(stdout.as_str());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = strip_trailing_newline(format!("{}{}", String::from_utf8_lossy(&output.stdout), stderr));
    let err = GitError::CommandFailed {
        args: logged_args.join(" "),
        status: output.status.code(),
        output: combined.clone(),
    };
    log_git_operation(operation, &logged_args, p, false, &combined, Some(&err));
    Err(err)
}
