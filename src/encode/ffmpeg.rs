use std::io::{Read as _, Write as _};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::image::flatten_to_opaque_rgba8;
use crate::encode::sink::{RecorderConfig, RecordingSink, VideoCodec};
use crate::foundation::error::{StoryError, StoryResult};
use crate::media::ffmpeg::is_ffmpeg_on_path;
use crate::render::surface::Surface;

const STDOUT_CHUNK_BYTES: usize = 64 * 1024;

struct Running {
    cfg: RecorderConfig,
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<JoinHandle<std::io::Result<Vec<Vec<u8>>>>>,
    stderr: Option<JoinHandle<String>>,
}

/// Records frames by piping raw RGBA into the system `ffmpeg` binary.
///
/// The encoded container is read back from ffmpeg's stdout in fixed-size chunks.
#[derive(Default)]
pub struct FfmpegRecorder {
    running: Option<Running>,
    scratch: Vec<u8>,
}

impl std::fmt::Debug for FfmpegRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegRecorder")
            .field("recording", &self.running.is_some())
            .finish_non_exhaustive()
    }
}

impl FfmpegRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

/// ffmpeg arguments reading `cfg`-sized RGBA frames from stdin and writing the container to stdout.
pub fn ffmpeg_args(cfg: &RecorderConfig) -> Vec<String> {
    let mut args: Vec<String> = [
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        &format!("{}x{}", cfg.width, cfg.height),
        "-r",
        &cfg.fps.to_string(),
        "-i",
        "pipe:0",
        "-an",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let codec_args: &[&str] = match cfg.codec {
        VideoCodec::Vp9Webm => &[
            "-c:v",
            "libvpx-vp9",
            "-pix_fmt",
            "yuv420p",
            "-deadline",
            "realtime",
            "-f",
            "webm",
        ],
        VideoCodec::H264Mp4 => &[
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "frag_keyframe+empty_moov",
            "-f",
            "mp4",
        ],
    };
    args.extend(codec_args.iter().map(|s| s.to_string()));
    args.push("pipe:1".to_owned());
    args
}

impl RecordingSink for FfmpegRecorder {
    fn begin(&mut self, cfg: &RecorderConfig) -> StoryResult<()> {
        cfg.validate()?;
        if self.running.is_some() {
            return Err(StoryError::encoding("ffmpeg recorder is already recording"));
        }
        if !is_ffmpeg_on_path() {
            return Err(StoryError::encoding(
                "ffmpeg is required for video recording, but was not found on PATH",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(ffmpeg_args(cfg))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                StoryError::encoding(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| StoryError::encoding("failed to open ffmpeg stdin"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| StoryError::encoding("failed to open ffmpeg stdout"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| StoryError::encoding("failed to open ffmpeg stderr"))?;

        let stdout = std::thread::spawn(move || {
            let mut chunks = Vec::new();
            loop {
                let mut buf = vec![0u8; STDOUT_CHUNK_BYTES];
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                buf.truncate(n);
                chunks.push(buf);
            }
            Ok(chunks)
        });
        let stderr = std::thread::spawn(move || {
            let mut s = String::new();
            let _ = stderr.read_to_string(&mut s);
            s
        });

        self.scratch = vec![0u8; cfg.frame_len()];
        self.running = Some(Running {
            cfg: *cfg,
            child,
            stdin: Some(stdin),
            stdout: Some(stdout),
            stderr: Some(stderr),
        });
        tracing::debug!(codec = ?cfg.codec, width = cfg.width, height = cfg.height, "ffmpeg recorder started");
        Ok(())
    }

    fn push_frame(&mut self, _frame_index: u64, frame: &Surface) -> StoryResult<()> {
        let Some(running) = self.running.as_mut() else {
            return Err(StoryError::encoding("ffmpeg recorder is not recording"));
        };
        if frame.width() != running.cfg.width || frame.height() != running.cfg.height {
            return Err(StoryError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                running.cfg.width,
                running.cfg.height
            )));
        }
        flatten_to_opaque_rgba8(&mut self.scratch, frame.data(), [0, 0, 0])?;

        let Some(stdin) = running.stdin.as_mut() else {
            return Err(StoryError::encoding("ffmpeg recorder is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            StoryError::encoding(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn finish(&mut self) -> StoryResult<Vec<Vec<u8>>> {
        let Some(mut running) = self.running.take() else {
            return Err(StoryError::encoding("ffmpeg recorder is not recording"));
        };
        drop(running.stdin.take());

        let status = running
            .child
            .wait()
            .map_err(|e| StoryError::encoding(format!("failed to wait for ffmpeg: {e}")))?;
        let chunks = match running.stdout.take().map(JoinHandle::join) {
            Some(Ok(Ok(chunks))) => chunks,
            Some(Ok(Err(e))) => {
                return Err(StoryError::encoding(format!(
                    "failed to read ffmpeg output: {e}"
                )));
            }
            _ => return Err(StoryError::encoding("ffmpeg output reader panicked")),
        };
        let stderr = running
            .stderr
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        if !status.success() {
            return Err(StoryError::encoding(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }
        tracing::debug!(
            chunks = chunks.len(),
            bytes = chunks.iter().map(Vec::len).sum::<usize>(),
            "ffmpeg recorder flushed"
        );
        Ok(chunks)
    }

    fn abort(&mut self) {
        if let Some(mut running) = self.running.take() {
            drop(running.stdin.take());
            let _ = running.child.kill();
            let _ = running.child.wait();
            if let Some(h) = running.stdout.take() {
                let _ = h.join();
            }
            if let Some(h) = running.stderr.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for FfmpegRecorder {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
