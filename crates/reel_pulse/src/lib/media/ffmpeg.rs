use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use tokio::process::Command;

use crate::{media::VideoComposer, Error};

/// Composes reels by shelling out to `ffmpeg`
#[derive(Debug, Clone)]
pub struct FfmpegComposer {
    program: PathBuf,
}

impl Default for FfmpegComposer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegComposer {
    const DURATION_SECS: u32 = 10;
    const SCALE: &str = "scale=720:960";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Loops the still image under the audio for a fixed-length H.264 clip
    pub fn compose_args(image: &Path, audio: &Path, out: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-loop".into(), "1".into(), "-i".into()];
        args.push(image.into());
        args.push("-i".into());
        args.push(audio.into());
        args.extend(
            [
                "-c:v",
                "libx264",
                "-t",
                &Self::DURATION_SECS.to_string(),
                "-pix_fmt",
                "yuv420p",
                "-vf",
                Self::SCALE,
            ]
            .map(OsString::from),
        );
        args.push(out.into());
        args
    }
}

impl VideoComposer for FfmpegComposer {
    #[tracing::instrument(skip(self))]
    async fn compose(&self, image: &Path, audio: &Path, out: &Path) -> Result<(), Error> {
        let output = Command::new(&self.program)
            .args(Self::compose_args(image, audio, out))
            .output()
            .await
            .inspect_err(|e| tracing::error!(error = %e, program = ?self.program, "Failed to launch ffmpeg"))
            .map_err(|e| Error::Compose(format!("failed to launch {}: {e}", self.program.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(status = %output.status, "ffmpeg failed to compose video");

            // never leave a half-written reel behind
            if let Err(e) = tokio::fs::remove_file(out).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(error = ?e, path = ?out, "Failed to remove partial video");
                }
            }

            return Err(Error::Compose(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        tracing::info!(path = ?out, "Video composed");
        Ok(())
    }
}
