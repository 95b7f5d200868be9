use std::{
    io::{Read as _, Write as _},
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
    thread::JoinHandle,
};

use anyhow::Context as _;

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    foundation::error::{ShredError, ShredResult},
    render::{composite::flatten_premul_over_bg_to_opaque_rgba8, surface::FrameRGBA},
};

#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Straight-alpha color transparent pixels are flattened onto (H.264 has no alpha).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// A running `ffmpeg` child reading raw RGBA from its stdin.
struct Encoder {
    cfg: SinkConfig,
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<String>>,
}

impl Encoder {
    fn spawn(cfg: SinkConfig, opts: &FfmpegSinkOpts) -> ShredResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(ffmpeg_args(&cfg, opts))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ShredError::encode(format!("could not start ffmpeg: {e}")))?;

        let (Some(stdin), Some(mut pipe)) = (child.stdin.take(), child.stderr.take()) else {
            return Err(ShredError::encode("ffmpeg started without stdio pipes"));
        };
        // A full stderr pipe stalls ffmpeg; drain it off-thread.
        let stderr = std::thread::spawn(move || -> std::io::Result<String> {
            let mut text = String::new();
            pipe.read_to_string(&mut text)?;
            Ok(text)
        });

        Ok(Self {
            cfg,
            child,
            stdin,
            stderr,
        })
    }

    fn finish(self) -> ShredResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
            ..
        } = self;
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| ShredError::encode(format!("waiting for ffmpeg: {e}")))?;
        let log = match stderr.join() {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => format!("<stderr unreadable: {e}>"),
            Err(_) => String::from("<stderr reader panicked>"),
        };
        if !status.success() {
            return Err(ShredError::encode(format!(
                "ffmpeg failed ({status}): {}",
                log.trim()
            )));
        }
        Ok(())
    }
}

/// Streams frames into an H.264 MP4 through the system `ffmpeg`.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    flattened: Vec<u8>,
    next_idx: u64,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            flattened: Vec::new(),
            next_idx: 0,
        }
    }

    pub fn opts(&self) -> &FfmpegSinkOpts {
        &self.opts
    }
}

/// `yuv420p` needs even dimensions; fps and size must be non-zero.
pub fn validate_sink_config(cfg: &SinkConfig) -> ShredResult<()> {
    if cfg.width == 0 || cfg.height == 0 || cfg.fps == 0 {
        return Err(ShredError::validation(format!(
            "mp4 output needs non-zero size and fps, got {}x{} @ {}",
            cfg.width, cfg.height, cfg.fps
        )));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(ShredError::validation(format!(
            "mp4 output needs even dimensions, got {}x{}",
            cfg.width, cfg.height
        )));
    }
    Ok(())
}

fn ffmpeg_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<String> {
    let mut args: Vec<String> = vec![
        if opts.overwrite { "-y" } else { "-n" }.into(),
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgba".into(),
        "-video_size".into(),
        format!("{}x{}", cfg.width, cfg.height),
        "-framerate".into(),
        cfg.fps.to_string(),
        "-i".into(),
        "-".into(),
        "-c:v".into(),
        "libx264".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-movflags".into(),
        "+faststart".into(),
    ];
    args.push(opts.out_path.to_string_lossy().into_owned());
    args
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ShredResult<()> {
        validate_sink_config(&cfg)?;
        ensure_parent_dir(&self.opts.out_path)?;
        if self.opts.out_path.exists() && !self.opts.overwrite {
            return Err(ShredError::validation(format!(
                "'{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(ShredError::encode("ffmpeg not found on PATH"));
        }

        tracing::debug!(?cfg, out = %self.opts.out_path.display(), "starting ffmpeg");
        self.encoder = Some(Encoder::spawn(cfg, &self.opts)?);
        self.flattened = vec![0; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.next_idx = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> ShredResult<()> {
        let enc = self
            .encoder
            .as_mut()
            .ok_or_else(|| ShredError::encode("push_frame before begin"))?;
        if idx < self.next_idx {
            return Err(ShredError::encode(format!(
                "frame {idx} arrived after frame {}",
                self.next_idx - 1
            )));
        }
        if (frame.width, frame.height) != (enc.cfg.width, enc.cfg.height) {
            return Err(ShredError::validation(format!(
                "frame is {}x{}, encoder expects {}x{}",
                frame.width, frame.height, enc.cfg.width, enc.cfg.height
            )));
        }

        flatten_premul_over_bg_to_opaque_rgba8(&mut self.flattened, &frame.data, self.opts.bg_rgba)?;
        enc.stdin
            .write_all(&self.flattened)
            .map_err(|e| ShredError::encode(format!("writing frame {idx} to ffmpeg: {e}")))?;
        self.next_idx = idx + 1;
        Ok(())
    }

    fn end(&mut self) -> ShredResult<()> {
        let enc = self
            .encoder
            .take()
            .ok_or_else(|| ShredError::encode("end before begin"))?;
        enc.finish()?;
        tracing::info!(frames = self.next_idx, out = %self.opts.out_path.display(), "wrote mp4");
        Ok(())
    }
}

/// Create the directory `path` will be written into.
pub fn ensure_parent_dir(path: &Path) -> ShredResult<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create directory '{}'", dir.display()))?;
    }
    Ok(())
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
