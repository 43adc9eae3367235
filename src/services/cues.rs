//! Audio cues played near the end and at completion of a countdown

use std::path::PathBuf;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// An opaque playable sound
pub trait SoundCue: Send {
    /// Play from the beginning, restarting if already playing
    fn play(&mut self);
    /// Halt playback and rewind; no-op when nothing is playing
    fn stop(&mut self);
}

/// Unset resource: both operations do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCue;

impl SoundCue for SilentCue {
    fn play(&mut self) {}
    fn stop(&mut self) {}
}

/// Plays a sound file through an external player process
#[derive(Debug)]
pub struct CommandCue {
    name: &'static str,
    player: String,
    path: PathBuf,
    child: Option<Child>,
}

impl CommandCue {
    pub fn new(name: &'static str, player: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name,
            player: player.into(),
            path: path.into(),
            child: None,
        }
    }

    /// Called with the engine lock held. Only a metadata lookup and a
    /// fork/exec happen here; the player is never waited on.
    fn spawn(&self) -> Result<Child, String> {
        if !self.path.is_file() {
            return Err(format!("sound file {} not found", self.path.display()));
        }

        Command::new(&self.player)
            .arg(&self.path)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to run {}: {}", self.player, e))
    }
}

impl SoundCue for CommandCue {
    fn play(&mut self) {
        self.stop();
        match self.spawn() {
            Ok(child) => {
                info!("Playing {} cue", self.name);
                self.child = Some(child);
            }
            Err(e) => warn!("Cannot play {} cue: {}", self.name, e),
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            // Already exited is fine
            if let Err(e) = child.start_kill() {
                debug!("Stopping {} cue: {}", self.name, e);
            }
        }
    }
}

impl Drop for CommandCue {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The two cue slots driven by the engine
pub struct SoundCues {
    pub warning: Box<dyn SoundCue>,
    pub completion: Box<dyn SoundCue>,
}

impl SoundCues {
    pub fn new(warning: Box<dyn SoundCue>, completion: Box<dyn SoundCue>) -> Self {
        Self { warning, completion }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(SilentCue), Box::new(SilentCue))
    }

    /// Cues backed by an external player
    pub fn command(
        player: &str,
        warning: impl Into<PathBuf>,
        completion: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            Box::new(CommandCue::new("warning", player, warning)),
            Box::new(CommandCue::new("completion", player, completion)),
        )
    }

    pub fn stop_all(&mut self) {
        self.warning.stop();
        self.completion.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_cue_is_safe() {
        let mut cues = SoundCues::silent();
        cues.warning.play();
        cues.stop_all();
        cues.completion.stop();
    }

    /// Whether a pid has exited (gone or left as a zombie)
    #[cfg(target_os = "linux")]
    fn exited(pid: u32) -> bool {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Ok(stat) => stat
                .rsplit(')')
                .next()
                .map(|rest| rest.trim_start().starts_with('Z'))
                .unwrap_or(false),
            Err(_) => true,
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn play_restarts_and_stop_kills_player() {
        // The "sound file" is a shell script that keeps the player busy
        let path = std::env::temp_dir().join(format!("sacred-timer-cue-{}.sh", std::process::id()));
        std::fs::write(&path, "exec sleep 30\n").unwrap();

        let mut cue = CommandCue::new("warning", "sh", &path);
        cue.play();
        let first = cue.child.as_ref().and_then(|c| c.id()).unwrap();

        cue.play();
        let second = cue.child.as_ref().and_then(|c| c.id()).unwrap();
        assert_ne!(first, second);
        assert!(cue.child.as_mut().unwrap().try_wait().unwrap().is_none());

        let mut first_gone = false;
        for _ in 0..50 {
            if exited(first) {
                first_gone = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(first_gone);

        cue.stop();
        assert!(cue.child.is_none());
        let mut second_gone = false;
        for _ in 0..50 {
            if exited(second) {
                second_gone = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(second_gone);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_degrades_silently() {
        let mut cue = CommandCue::new("warning", "mpg123", "does/not/exist.mp3");
        cue.play();
        assert!(cue.child.is_none());
        cue.stop();
    }
}
