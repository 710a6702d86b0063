use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ClipboardError;

#[async_trait]
pub trait Clipboard: Send + Sync {
    fn name(&self) -> &str;

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Pipes text into an external clipboard utility.
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    pub fn platform_primary() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", &[])
        } else if cfg!(target_os = "windows") {
            Self::new("clip", &[])
        } else {
            Self::new("wl-copy", &[])
        }
    }

    pub fn platform_fallback() -> Self {
        if cfg!(target_os = "macos") || cfg!(target_os = "windows") {
            Self::platform_primary()
        } else {
            Self::new("xclip", &["-selection", "clipboard"])
        }
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    fn name(&self) -> &str {
        &self.program
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ClipboardError::Spawn {
                command: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|source| ClipboardError::Write {
                    command: self.program.clone(),
                    source,
                })?;
        }

        let status = child.wait().await.map_err(|source| ClipboardError::Write {
            command: self.program.clone(),
            source,
        })?;

        if !status.success() {
            return Err(ClipboardError::Exit {
                command: self.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Tries the primary mechanism, then the fallback.
pub struct ChainedClipboard {
    primary: Box<dyn Clipboard>,
    fallback: Box<dyn Clipboard>,
}

impl ChainedClipboard {
    pub fn new(primary: Box<dyn Clipboard>, fallback: Box<dyn Clipboard>) -> Self {
        Self { primary, fallback }
    }

    pub fn platform_default() -> Self {
        Self::new(
            Box::new(CommandClipboard::platform_primary()),
            Box::new(CommandClipboard::platform_fallback()),
        )
    }

    /// Returns the name of the mechanism that accepted the text.
    pub async fn copy(&self, text: &str) -> Result<String, ClipboardError> {
        let primary = match self.primary.write_text(text).await {
            Ok(()) => {
                debug!(method = self.primary.name(), "Copied to clipboard");
                return Ok(self.primary.name().to_string());
            }
            Err(err) => err,
        };

        warn!(method = self.primary.name(), error = %primary, "Primary clipboard failed, trying fallback");
        match self.fallback.write_text(text).await {
            Ok(()) => Ok(self.fallback.name().to_string()),
            Err(fallback) => Err(ClipboardError::Exhausted {
                primary: Box::new(primary),
                fallback: Box::new(fallback),
            }),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{BrokenClipboard, MemoryClipboard};
    use super::*;

    #[tokio::test]
    async fn uses_fallback_when_primary_fails() {
        let chain = ChainedClipboard::new(Box::new(BrokenClipboard), Box::new(MemoryClipboard::default()));
        assert_eq!(chain.copy("hello").await.unwrap(), "memory");
    }

    #[tokio::test]
    async fn reports_both_failures() {
        let chain = ChainedClipboard::new(Box::new(BrokenClipboard), Box::new(BrokenClipboard));
        let err = chain.copy("hello").await.unwrap_err();
        assert!(matches!(err, ClipboardError::Exhausted { .. }));
    }

    #[tokio::test]
    async fn missing_command_fails_to_spawn() {
        let clipboard = CommandClipboard::new("notes-studio-missing-clipboard-tool", &[]);
        let err = clipboard.write_text("hello").await.unwrap_err();
        assert!(matches!(err, ClipboardError::Spawn { .. }));
    }
}
