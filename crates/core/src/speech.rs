//! Read-Aloud Support
//!
//! Speech runs on a detached tokio task so the caller never waits on audio.
//! The voice backend is chosen once by [`probe`] and reused for every job.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Words per minute for the macOS `say` voice.
pub const NATIVE_RATE: u32 = 170;
/// Words per minute for the eSpeak engine.
pub const LIBRARY_RATE: u32 = 130;

/// A voice output capability.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Speaks `text`, resolving once playback has finished.
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Drives an external speech program with a fixed rate flag.
///
/// The child is killed if the speaking future is dropped, which is how a
/// cancelled job stops mid-sentence.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    name: &'static str,
    program: PathBuf,
    rate_flag: &'static str,
    rate: u32,
}

impl CommandBackend {
    /// The macOS `say` command.
    pub fn native() -> Self {
        Self {
            name: "say",
            program: PathBuf::from("say"),
            rate_flag: "-r",
            rate: NATIVE_RATE,
        }
    }

    /// An eSpeak engine found at `program`.
    pub fn espeak(program: PathBuf) -> Self {
        Self {
            name: "espeak",
            program,
            rate_flag: "-s",
            rate: LIBRARY_RATE,
        }
    }

    /// The argument list passed to the program.
    pub fn args(&self, text: &str) -> Vec<String> {
        vec![
            self.rate_flag.to_string(),
            self.rate.to_string(),
            text.to_string(),
        ]
    }
}

#[async_trait]
impl SpeechBackend for CommandBackend {
    fn name(&self) -> &str {
        self.name
    }

    async fn speak(&self, text: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .args(self.args(text))
            .kill_on_drop(true)
            .status()
            .await
            .with_context(|| format!("Failed to launch {}", self.program.display()))?;
        if !status.success() {
            bail!("{} exited with {}", self.program.display(), status);
        }
        Ok(())
    }
}

/// Used when no voice is available on the host.
#[derive(Debug, Clone, Default)]
pub struct NullBackend;

#[async_trait]
impl SpeechBackend for NullBackend {
    fn name(&self) -> &str {
        "none"
    }

    async fn speak(&self, _text: &str) -> Result<()> {
        warn!("Audio library not available.");
        Ok(())
    }
}

/// Looks for an executable named `name` in the directories of `path_var`.
fn find_in_path(name: &str, path_var: &std::ffi::OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .flat_map(|dir| {
            let exe = dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
            [exe, dir.join(name)]
        })
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Picks the best voice for this host.
///
/// macOS gets `say`; elsewhere an eSpeak engine on `PATH` is used if present;
/// otherwise speech is a logged no-op.
pub fn probe() -> Arc<dyn SpeechBackend> {
    let backend: Arc<dyn SpeechBackend> = if cfg!(target_os = "macos") {
        Arc::new(CommandBackend::native())
    } else {
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        match ["espeak-ng", "espeak"]
            .iter()
            .find_map(|name| find_in_path(name, &path_var))
        {
            Some(program) => Arc::new(CommandBackend::espeak(program)),
            None => Arc::new(NullBackend),
        }
    };
    info!(backend = backend.name(), "Speech backend selected");
    backend
}

/// Handle to a running speech task.
///
/// Dropping it leaves the task running.
pub struct SpeechJob {
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SpeechJob {
    /// Asks the task to stop. Has no effect if it already finished.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task to end, whether it finished speaking or was cancelled.
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            error!(error = %e, "Speech task panicked");
        }
    }
}

/// Spawns speech jobs on a shared backend.
#[derive(Clone)]
pub struct Speaker {
    backend: Arc<dyn SpeechBackend>,
}

impl Speaker {
    pub fn new(backend: Arc<dyn SpeechBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Starts reading `text` aloud and returns immediately.
    ///
    /// Must be called from within a tokio runtime. Errors are logged by the
    /// task and never reach the caller.
    pub fn speak(&self, text: impl Into<String>) -> SpeechJob {
        let text = text.into();
        let backend = Arc::clone(&self.backend);
        let (cancel_tx, mut cancel_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            // A dropped handle closes the channel; that must not count as a cancel.
            let cancelled = async move { cancel_rx.wait_for(|c| *c).await.is_ok() };
            tokio::select! {
                result = backend.speak(&text) => match result {
                    Ok(()) => info!(backend = backend.name(), "Finished speaking"),
                    Err(e) => error!(backend = backend.name(), error = ?e, "Speech failed"),
                },
                true = cancelled => {
                    info!(backend = backend.name(), "Speech cancelled");
                }
            }
        });

        SpeechJob { cancel_tx, handle }
    }
}
