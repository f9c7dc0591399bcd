use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error};

use super::{AudioError, AudioResult, Waveform};

pub const WAV_CONTENT_TYPE: &str = "audio/wav";
pub const MP3_CONTENT_TYPE: &str = "audio/mpeg";

/// Encoding of generated artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Wav,
    #[default]
    Mp3,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Mp3 => "mp3",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Wav => WAV_CONTENT_TYPE,
            OutputFormat::Mp3 => MP3_CONTENT_TYPE,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wav" | "wave" => Ok(OutputFormat::Wav),
            "mp3" | "mpeg" => Ok(OutputFormat::Mp3),
            other => Err(AudioError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Content type for a stored artifact: `.mp3` files are MPEG audio,
/// everything else is served as WAV.
pub fn content_type_for_file(file_name: &str) -> &'static str {
    let is_mp3 = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));
    if is_mp3 {
        MP3_CONTENT_TYPE
    } else {
        WAV_CONTENT_TYPE
    }
}

/// Turns waveforms into file bytes.
///
/// WAV is produced in-process; MP3 is produced by piping a WAV through an
/// external `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct AudioEncoder {
    ffmpeg_path: String,
}

impl Default for AudioEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl AudioEncoder {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    pub async fn encode(&self, waveform: &Waveform, format: OutputFormat) -> AudioResult<Vec<u8>> {
        let wav = waveform.to_wav_bytes()?;
        match format {
            OutputFormat::Wav => Ok(wav),
            OutputFormat::Mp3 => self.wav_to_mp3(wav).await,
        }
    }

    async fn wav_to_mp3(&self, wav: Vec<u8>) -> AudioResult<Vec<u8>> {
        debug!("Encoding {} bytes of WAV to MP3 with {}", wav.len(), self.ffmpeg_path);

        let mut child = Command::new(&self.ffmpeg_path)
            .args([
                "-hide_banner",
                "-loglevel",
                "error",
                "-f",
                "wav",
                "-i",
                "pipe:0",
                "-f",
                "mp3",
                "pipe:1",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AudioError::Encode(format!("Failed to start {}: {}", self.ffmpeg_path, e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AudioError::Encode("ffmpeg stdin unavailable".to_string()))?;

        // Feed stdin concurrently so a full stdout pipe cannot deadlock the encoder.
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&wav).await;
            drop(stdin);
            result
        });

        let output = child.wait_with_output().await?;

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(AudioError::Encode(format!("Failed to feed ffmpeg: {e}"))),
            Err(e) => return Err(AudioError::Encode(format!("ffmpeg feeder task failed: {e}"))),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffmpeg exited with {}: {}", output.status, stderr.trim());
            return Err(AudioError::Encode(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}
