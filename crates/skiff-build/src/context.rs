use std::path::{Path, PathBuf};
use std::process::Command;

/// Files/directories that skiff always excludes from the staged context,
/// regardless of .gitignore content.
const SKIFF_EXCLUDES: &[&str] = &[".skiff-context", ".skiff", ".git"];

/// Stages the build context for the pipeline's build step.
///
/// Uses `git ls-files` to respect `.gitignore`, then copies all tracked
/// and untracked-but-not-ignored files into `.skiff-context/`.
/// The rendered Dockerfile is written into the context. The staged tree is
/// not touched again for the rest of the run.
pub fn stage_context(project_dir: &Path, dockerfile_content: &str) -> Result<PathBuf, ContextError> {
    let context_dir = project_dir.join(".skiff-context");

    // Clean previous context
    if context_dir.exists() {
        std::fs::remove_dir_all(&context_dir).map_err(|e| ContextError::Cleanup {
            path: context_dir.clone(),
            source: e,
        })?;
    }
    std::fs::create_dir_all(&context_dir).map_err(|e| ContextError::Create {
        path: context_dir.clone(),
        source: e,
    })?;

    let files = git_ls_files(project_dir)?;
    tracing::debug!(files = files.len(), "staging build context");

    for relative_path in &files {
        if SKIFF_EXCLUDES.iter().any(|ex| relative_path.starts_with(ex)) {
            continue;
        }

        let src = project_dir.join(relative_path);
        let dst = context_dir.join(relative_path);

        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ContextError::Create {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::copy(&src, &dst).map_err(|e| ContextError::CopyFile {
            path: src,
            source: e,
        })?;
    }

    std::fs::write(context_dir.join("Dockerfile"), dockerfile_content).map_err(|e| {
        ContextError::WriteDockerfile {
            path: context_dir.join("Dockerfile"),
            source: e,
        }
    })?;

    Ok(context_dir)
}

/// Returns the list of files git considers part of the project:
/// tracked files + untracked files that are not .gitignored.
fn git_ls_files(project_dir: &Path) -> Result<Vec<PathBuf>, ContextError> {
    let output = Command::new("git")
        .args(["ls-files", "--cached", "--others", "--exclude-standard"])
        .current_dir(project_dir)
        .output()
        .map_err(|e| ContextError::GitCommand {
            detail: "failed to execute git ls-files".to_owned(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ContextError::GitFailed {
            detail: format!(
                "git ls-files exited with {}: {}",
                output.status,
                stderr.trim()
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let files: Vec<PathBuf> = stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect();

    Ok(files)
}

/// Checks whether the git working tree has uncommitted changes.
pub fn is_dirty(project_dir: &Path) -> Result<bool, ContextError> {
    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(project_dir)
        .output()
        .map_err(|e| ContextError::GitCommand {
            detail: "failed to execute git status".to_owned(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ContextError::GitFailed {
            detail: format!(
                "git status exited with {}: {}",
                output.status,
                stderr.trim()
            ),
        });
    }

    Ok(!output.stdout.is_empty())
}

/// The commit id of HEAD, used as the run's version tag.
pub fn head_commit(project_dir: &Path) -> Result<String, ContextError> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(project_dir)
        .output()
        .map_err(|e| ContextError::GitCommand {
            detail: "failed to execute git rev-parse".to_owned(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ContextError::GitFailed {
            detail: format!(
                "git rev-parse exited with {}: {} (is this a git repository with at least one commit?)",
                output.status,
                stderr.trim()
            ),
        });
    }

    let commit = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if commit.is_empty() {
        return Err(ContextError::GitFailed {
            detail: "git rev-parse HEAD produced no output".to_owned(),
        });
    }

    Ok(commit)
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to clean up context directory {path}")]
    Cleanup {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create directory {path}")]
    Create {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy file {path}")]
    CopyFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write Dockerfile at {path}")]
    WriteDockerfile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("git command failed: {detail}")]
    GitCommand {
        detail: String,
        source: std::io::Error,
    },
    #[error("git failed: {detail}")]
    GitFailed { detail: String },
}
