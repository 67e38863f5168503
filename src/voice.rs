//! Speech-to-text capture feeding the same entry point as typed input

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Locale every capture session is run with
pub const SPEECH_LOCALE: &str = "en-US";

/// Environment variable carrying the locale to the recognizer command
pub const SPEECH_LANG_ENV: &str = "MINDGUARD_SPEECH_LANG";

/// Something that can turn one spoken utterance into text
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Capture a single utterance and return its transcript
    async fn recognize(&self, locale: &str) -> Result<String>;
}

/// Runs an external program that records one utterance and prints its transcript
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// Parse a whitespace-separated command line. Returns None for a blank command.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn recognize(&self, locale: &str) -> Result<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .env(SPEECH_LANG_ENV, locale)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to run speech command {}", self.program))?;

        if !output.status.success() {
            return Err(anyhow!(
                "Speech command exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            return Err(anyhow!("No speech was recognized"));
        }
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_command_is_unavailable() {
        assert!(CommandRecognizer::from_command_line("   ").is_none());
    }

    #[test]
    fn test_command_line_split() {
        let recognizer = CommandRecognizer::from_command_line("whisper-once --model base").unwrap();
        assert_eq!(recognizer.program, "whisper-once");
        assert_eq!(recognizer.args, vec!["--model", "base"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_transcript_is_trimmed_stdout() {
        let recognizer = CommandRecognizer::from_command_line("echo  how to manage stress?  ").unwrap();
        let transcript = recognizer.recognize(SPEECH_LOCALE).await.unwrap();
        assert_eq!(transcript, "how to manage stress?");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_locale_passed_in_environment() {
        let recognizer = CommandRecognizer::from_command_line("printenv MINDGUARD_SPEECH_LANG").unwrap();
        assert_eq!(recognizer.recognize(SPEECH_LOCALE).await.unwrap(), "en-US");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_error() {
        let recognizer = CommandRecognizer::from_command_line("false").unwrap();
        assert!(recognizer.recognize(SPEECH_LOCALE).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_silent_command_is_error() {
        let recognizer = CommandRecognizer::from_command_line("true").unwrap();
        assert!(recognizer.recognize(SPEECH_LOCALE).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let recognizer = CommandRecognizer::from_command_line("mindguard-no-such-recognizer").unwrap();
        assert!(recognizer.recognize(SPEECH_LOCALE).await.is_err());
    }
}
