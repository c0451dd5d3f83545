use crate::process::ProcessError;

/// Abstraction over external CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
/// The pipeline invokes `docker` and `gcloud` through this trait; nothing
/// else in skiff spawns processes directly (git helpers excepted).
#[allow(async_fn_in_trait)]
pub trait CommandExecutor: Send + Sync {
    /// Execute a command and capture stdout.
    async fn exec(&self, program: &str, args: &[String]) -> Result<String, ProcessError>;

    /// Execute a command, streaming output to the terminal. Blocks until
    /// the process exits; a non-zero exit status is an error.
    async fn exec_streaming(&self, program: &str, args: &[String]) -> Result<(), ProcessError>;
}

/// Real process executor backed by `tokio::process`.
pub struct RealExecutor;

impl CommandExecutor for RealExecutor {
    async fn exec(&self, program: &str, args: &[String]) -> Result<String, ProcessError> {
        use std::process::Stdio;

        let output = tokio::process::Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ProcessError::NotFound {
                program: program.to_owned(),
                source: e,
            })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| ProcessError::InvalidUtf8 {
                program: program.to_owned(),
                source: e,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(ProcessError::CommandFailed {
                program: program.to_owned(),
                args: args.to_vec(),
                stderr,
            })
        }
    }

    async fn exec_streaming(&self, program: &str, args: &[String]) -> Result<(), ProcessError> {
        use std::process::Stdio;

        let status = tokio::process::Command::new(program)
            .args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ProcessError::NotFound {
                program: program.to_owned(),
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::CommandFailed {
                program: program.to_owned(),
                args: args.to_vec(),
                stderr: format!("exit code: {status}"),
            })
        }
    }
}
