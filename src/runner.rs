use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn shell: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("command exited with {status}")]
    Exit {
        status: ExitStatus,
        output: Vec<u8>,
    },
}

/// Run a command string through the shell, inheriting the server's
/// environment and working directory, and wait for it to finish. Returns the
/// combined stdout and stderr bytes; a nonzero exit carries them in the
/// error instead. No timeout: a hanging command hangs its request.
pub async fn run(command: &str) -> Result<Vec<u8>, RunError> {
    let output = Command::new("sh").arg("-c").arg(command).output().await?;

    let mut combined = output.stdout;
    combined.extend_from_slice(&output.stderr);

    if output.status.success() {
        Ok(combined)
    } else {
        Err(RunError::Exit {
            status: output.status,
            output: combined,
        })
    }
}
