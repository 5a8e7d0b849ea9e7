//! Speech through an external program such as `espeak-ng` or `say`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use timestable_core::traits::{Narrator, Utterance};

use crate::error::SpeechError;

/// Runs `program args..` per utterance, substituting `{voice}`, `{text}` and
/// `{rate}` in the arguments.
///
/// Starting a new utterance kills the previous one if it is still running.
pub struct CommandNarrator {
    program: String,
    args: Vec<String>,
    current: Mutex<Option<Child>>,
}

impl CommandNarrator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            current: Mutex::new(None),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for `utterance` with placeholders filled in.
    pub fn render_args(&self, utterance: &Utterance) -> Vec<String> {
        // espeak-style words per minute; 175 is its default rate.
        let wpm = ((utterance.rate * 175.0).round() as u32).to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{voice}", &utterance.voice)
                    .replace("{rate}", &wpm)
                    .replace("{text}", &utterance.text)
            })
            .collect()
    }

    /// Locate the program on `PATH` (or as a literal path).
    fn resolve(&self) -> Option<PathBuf> {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.is_file().then(|| program.to_path_buf());
        }
        let path = std::env::var_os("PATH")?;
        std::env::split_paths(&path)
            .map(|dir| dir.join(program))
            .find(|candidate| candidate.is_file())
    }
}

#[async_trait]
impl Narrator for CommandNarrator {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_supported(&self) -> bool {
        self.resolve().is_some()
    }

    async fn speak(&self, utterance: &Utterance) -> anyhow::Result<()> {
        let program = self
            .resolve()
            .ok_or_else(|| SpeechError::ProgramNotFound(self.program.clone()))?;

        let mut current = self.current.lock().await;
        if let Some(mut previous) = current.take() {
            if let Ok(None) = previous.try_wait() {
                tracing::debug!(program = %self.program, "interrupting previous utterance");
                let _ = previous.kill().await;
            }
        }

        let child = Command::new(&program)
            .args(self.render_args(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        tracing::debug!(program = %self.program, voice = %utterance.voice, "speaking");
        *current = Some(child);
        Ok(())
    }

    async fn finish(&self) -> anyhow::Result<()> {
        if let Some(mut child) = self.current.lock().await.take() {
            child.wait().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_substituted() {
        let narrator = CommandNarrator::new(
            "espeak-ng",
            ["-v", "{voice}", "-s", "{rate}", "{text}"]
                .map(String::from)
                .to_vec(),
        );
        let utterance = Utterance::new("七八五十六", "zh-CN");
        assert_eq!(
            narrator.render_args(&utterance),
            vec!["-v", "zh-CN", "-s", "140", "七八五十六"]
        );
    }

    #[test]
    fn missing_program_is_unsupported() {
        let narrator = CommandNarrator::new("definitely-not-a-tts-program-xyz", vec![]);
        assert!(!narrator.is_supported());
        let narrator = CommandNarrator::new("/nonexistent/bin/espeak", vec![]);
        assert!(!narrator.is_supported());
    }

    #[tokio::test]
    async fn speaking_with_missing_program_fails() {
        let narrator = CommandNarrator::new("definitely-not-a-tts-program-xyz", vec![]);
        let err = narrator
            .speak(&Utterance::new("hi", "en-US"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn new_utterance_replaces_running_one() {
        let narrator = CommandNarrator::new("sh", ["-c", "sleep 5", "{text}"].map(String::from).to_vec());
        assert!(narrator.is_supported());
        narrator.speak(&Utterance::new("one", "en-US")).await.unwrap();
        narrator.speak(&Utterance::new("two", "en-US")).await.unwrap();
        let mut current = narrator.current.lock().await;
        let child = current.as_mut().unwrap();
        assert!(child.try_wait().unwrap().is_none());
        child.kill().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn finish_waits_for_the_utterance() {
        let narrator = CommandNarrator::new("sh", ["-c", "exit 0", "{text}"].map(String::from).to_vec());
        narrator.speak(&Utterance::new("done", "en-US")).await.unwrap();
        narrator.finish().await.unwrap();
        assert!(narrator.current.lock().await.is_none());
        narrator.finish().await.unwrap();
    }
}
