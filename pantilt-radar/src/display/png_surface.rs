use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::{debug, info};
use png::{BitDepth, ColorType, Encoder};

use crate::display::DisplaySurface;
use crate::errors::{DisplayError, Error};
use crate::radar::Canvas;

/// Dumps radar frames as numbered PNG files (`frame_000001.png`, ...) into a directory.
///
/// Writing every frame of a 100Hz loop is rarely wanted: [`PngSurface::set_every`] keeps one
/// frame out of N.
#[derive(Clone, Debug)]
pub struct PngSurface {
    directory: PathBuf,
    every: usize,
    received: usize,
    written: usize,
    last: Option<PathBuf>,
    closed: bool,
}

impl PngSurface {
    /// Creates the surface, and the output directory if needed.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self, Error> {
        let directory = directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory)?;
        info!("Writing radar frames to {}", directory.display());
        Ok(Self {
            directory,
            every: 1,
            received: 0,
            written: 0,
            last: None,
            closed: false,
        })
    }

    // ########################################
    // Setters and Getters.

    /// Keeps one frame out of `every` (0 is taken as 1).
    pub fn set_every(mut self, every: usize) -> Self {
        self.every = every.max(1);
        self
    }

    /// Returns the frame subsampling rate.
    pub fn get_every(&self) -> usize {
        self.every
    }

    /// Returns the output directory.
    pub fn get_directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the number of PNG files written.
    pub fn count_written(&self) -> usize {
        self.written
    }

    /// Returns the path of the last PNG file written.
    pub fn get_last_path(&self) -> Option<&Path> {
        self.last.as_deref()
    }
}

impl DisplaySurface for PngSurface {
    fn present(&mut self, frame: &Canvas) -> Result<(), Error> {
        if self.closed {
            return Err(DisplayError::Closed.into());
        }
        self.received += 1;
        if (self.received - 1) % self.every != 0 {
            return Ok(());
        }

        let path = self
            .directory
            .join(format!("frame_{:06}.png", self.received));
        write_png(&path, frame)?;
        debug!("Frame written to {}", path.display());
        self.written += 1;
        self.last = Some(path);
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        if !self.closed {
            info!("{} frames written to {}", self.written, self.directory.display());
        }
        self.closed = true;
        Ok(())
    }
}

impl Display for PngSurface {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PNG SURFACE ({}) [every={}, written={}]",
            self.directory.display(),
            self.every,
            self.written
        )
    }
}

/// Encodes the canvas as an 8-bit RGBA PNG file.
fn write_png(path: &Path, frame: &Canvas) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), frame.width(), frame.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&frame.to_rgba_bytes())?;
    writer.finish()?;
    Ok(())
}
