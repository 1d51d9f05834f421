use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{StoryError, StoryResult};
use crate::media::video::{PlaybackState, VideoInfo, VideoSource};
use crate::render::surface::Surface;

/// Returns true when an `ffmpeg` binary can be executed.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Parse an ffprobe rational such as `30000/1001`.
pub fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let (num, den) = s.split_once('/')?;
    let num = num.trim().parse::<u32>().ok()?;
    let den = den.trim().parse::<u32>().ok()?;
    if den == 0 {
        return None;
    }
    Some((num, den))
}

/// Query stream dimensions, rate, and duration with `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source_path: &Path) -> StoryResult<VideoInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| StoryError::media_load(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(StoryError::media_load(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| StoryError::media_load(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| StoryError::media_load("no video stream found"))?;
    let width = stream
        .width
        .filter(|w| *w > 0)
        .ok_or_else(|| StoryError::media_load("missing video width from ffprobe"))?;
    let height = stream
        .height
        .filter(|h| *h > 0)
        .ok_or_else(|| StoryError::media_load("missing video height from ffprobe"))?;
    let fps = parse_ff_ratio(stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .map(|(n, d)| f64::from(n) / f64::from(d))
        .unwrap_or(0.0);
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoInfo {
        width,
        height,
        fps,
        duration_sec,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source_path: &Path) -> StoryResult<VideoInfo> {
    Err(StoryError::media_load(
        "video decoding requires the 'media-ffmpeg' feature",
    ))
}

/// Temporary copy of in-memory video bytes, removed on drop.
#[derive(Debug)]
struct TempVideoFile {
    path: PathBuf,
}

impl TempVideoFile {
    fn write(bytes: &[u8]) -> StoryResult<Self> {
        use anyhow::Context as _;
        static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "storyframe-src-{}-{n}.bin",
            std::process::id()
        ));
        std::fs::write(&path, bytes)
            .with_context(|| format!("failed to write temp video '{}'", path.display()))?;
        Ok(Self { path })
    }
}

impl Drop for TempVideoFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Streams decoded frames from the system `ffmpeg` binary.
///
/// Frames arrive at the source's native size and rate as raw RGBA on ffmpeg's stdout.
#[derive(Debug)]
pub struct FfmpegVideoSource {
    path: PathBuf,
    info: VideoInfo,
    state: PlaybackState,
    child: Option<std::process::Child>,
    frame_len: usize,
    _temp: Option<TempVideoFile>,
}

impl FfmpegVideoSource {
    /// Open a video file on disk.
    pub fn open(path: impl Into<PathBuf>) -> StoryResult<Self> {
        let path = path.into();
        let info = probe_video(&path)?;
        Ok(Self::with_info(path, info, None))
    }

    /// Open a video held in memory by spilling it to a temporary file.
    pub fn from_bytes(bytes: &[u8]) -> StoryResult<Self> {
        let temp = TempVideoFile::write(bytes)?;
        let path = temp.path.clone();
        let info = probe_video(&path)?;
        Ok(Self::with_info(path, info, Some(temp)))
    }

    fn with_info(path: PathBuf, info: VideoInfo, temp: Option<TempVideoFile>) -> Self {
        Self {
            path,
            frame_len: info.width as usize * info.height as usize * 4,
            info,
            state: PlaybackState::Ready,
            child: None,
            _temp: temp,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(feature = "media-ffmpeg")]
    fn spawn_decoder(&self) -> StoryResult<std::process::Child> {
        use std::process::{Command, Stdio};
        Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&self.path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                StoryError::media_load(format!("failed to run ffmpeg for video decode: {e}"))
            })
    }

    #[cfg(not(feature = "media-ffmpeg"))]
    fn spawn_decoder(&self) -> StoryResult<std::process::Child> {
        Err(StoryError::media_load(
            "video decoding requires the 'media-ffmpeg' feature",
        ))
    }

    fn stop_decoder(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl VideoSource for FfmpegVideoSource {
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn wait_until_playable(&mut self) -> StoryResult<()> {
        if self.frame_len == 0 {
            return Err(StoryError::media_load(
                "decoded video frame size is zero (invalid source dimensions)",
            ));
        }
        Ok(())
    }

    fn play(&mut self) -> StoryResult<()> {
        if self.state == PlaybackState::Ready {
            self.child = Some(self.spawn_decoder()?);
            self.state = PlaybackState::Playing;
        }
        Ok(())
    }

    fn state(&self) -> PlaybackState {
        self.state
    }

    fn next_frame(&mut self) -> StoryResult<Option<Arc<Surface>>> {
        use std::io::Read as _;

        if self.state != PlaybackState::Playing {
            return Ok(None);
        }
        let Some(stdout) = self.child.as_mut().and_then(|c| c.stdout.as_mut()) else {
            self.state = PlaybackState::Ended;
            return Ok(None);
        };

        let mut buf = vec![0u8; self.frame_len];
        match stdout.read_exact(&mut buf) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.stop_decoder();
                self.state = PlaybackState::Ended;
                return Ok(None);
            }
            Err(e) => {
                self.stop_decoder();
                self.state = PlaybackState::Ended;
                return Err(StoryError::media_load(format!(
                    "failed to read decoded frame from ffmpeg: {e}"
                )));
            }
        }
        let frame = Surface::from_straight_rgba8(self.info.width, self.info.height, buf)?;
        Ok(Some(Arc::new(frame)))
    }
}

impl Drop for FfmpegVideoSource {
    fn drop(&mut self) {
        self.stop_decoder();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/ffmpeg.rs"]
mod tests;
