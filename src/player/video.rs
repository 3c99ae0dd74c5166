use std::env;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::backend::{BackendError, MediaBackend};

/// Video playback handed off to an external engine (vlc/mpv family). The
/// engine is probed once at startup; when none is found the session
/// reports video tracks as unsupported instead of pretending to play.
pub struct VideoBackend {
    engine: PathBuf,
    pending: Option<PathBuf>,
    child: Option<Child>,
}

impl VideoBackend {
    /// Walk the candidate list and take the first engine present on PATH.
    pub fn probe(candidates: &[String]) -> Option<Self> {
        for name in candidates {
            if let Some(engine) = find_in_path(name) {
                info!(engine = %engine.display(), "video engine available");
                return Some(Self {
                    engine,
                    pending: None,
                    child: None,
                });
            }
        }
        warn!("no video engine found; video files will be reported as unsupported");
        None
    }

    pub fn engine_name(&self) -> String {
        self.engine
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("video engine")
            .to_string()
    }
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

impl MediaBackend for VideoBackend {
    fn load(&mut self, path: &Path) -> Result<(), BackendError> {
        self.stop();
        self.pending = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> Result<(), BackendError> {
        let Some(path) = self.pending.clone() else {
            return Ok(());
        };

        let child = Command::new(&self.engine)
            .arg(&path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| BackendError::EngineLaunch {
                engine: self.engine_name(),
                source,
            })?;

        info!(engine = %self.engine.display(), path = %path.display(), "video engine launched");
        self.child = Some(child);
        Ok(())
    }

    fn pause(&mut self) {
        // The engine runs in its own window with its own controls
        debug!("pause is not forwarded to the external video engine");
    }

    fn resume(&mut self) {
        debug!("resume is not forwarded to the external video engine");
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill() {
                warn!(error = %err, "could not kill video engine");
            }
            let _ = child.wait();
        }
        self.pending = None;
    }

    fn set_volume(&mut self, _volume: f32) {
        debug!("volume is not forwarded to the external video engine");
    }

    fn is_busy(&mut self) -> bool {
        match &mut self.child {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    fn position(&self) -> Duration {
        // The external engine does not report a position
        Duration::ZERO
    }
}

impl Drop for VideoBackend {
    fn drop(&mut self) {
        self.stop();
    }
}
