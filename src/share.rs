use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

use crate::view::SharePayload;

/// Something that can hand a page off to the user's sharing tool.
pub trait ShareTarget: Send + Sync {
    fn share(&self, payload: &SharePayload) -> Result<()>;
}

/// Runs a user-configured program as `<program> <title> <text> <url>`.
pub struct CommandShare {
    program: String,
}

impl CommandShare {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ShareTarget for CommandShare {
    fn share(&self, payload: &SharePayload) -> Result<()> {
        // The terminal is in raw mode; the child must not touch it.
        let output = Command::new(&self.program)
            .arg(&payload.title)
            .arg(&payload.text)
            .arg(&payload.url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to launch share command `{}`", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.is_empty() {
                bail!("share command `{}` exited with {}", self.program, output.status);
            }
            bail!(
                "share command `{}` exited with {}: {stderr}",
                self.program,
                output.status
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Unsupported,
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SharePayload {
        SharePayload {
            title: "Queen".into(),
            text: "Check out Queen on Groupie Tracker!".into(),
            url: "http://localhost:8080/artist/1".into(),
        }
    }

    #[cfg(unix)]
    #[test]
    fn command_share_reports_exit_status() {
        assert!(CommandShare::new("true").share(&payload()).is_ok());
        assert!(CommandShare::new("false").share(&payload()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn failure_message_carries_child_stderr() {
        // `sh Queen ...` fails trying to open a script named after the title.
        let err = CommandShare::new("sh").share(&payload()).unwrap_err();
        assert!(err.to_string().contains("Queen"));
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = CommandShare::new("definitely-not-a-share-tool-xyz")
            .share(&payload())
            .unwrap_err();
        assert!(err.to_string().contains("failed to launch"));
    }
}
