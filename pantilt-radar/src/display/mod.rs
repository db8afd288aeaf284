//! Defines where radar frames end up.
//!
//! Windowing is out of the crate reach: a [`DisplaySurface`] only receives finished frames. The
//! crate ships a [`PngSurface`] (frames dumped to a directory) and a [`NullSurface`].

use std::fmt::Debug;

use crate::errors::Error;
use crate::radar::Canvas;

pub use null::NullSurface;
pub use png_surface::PngSurface;

mod null;
mod png_surface;

/// Something a finished radar frame can be shown on.
pub trait DisplaySurface: Debug + Send {
    /// Shows the given frame. A failure is fatal to the radar loop.
    fn present(&mut self, frame: &Canvas) -> Result<(), Error>;

    /// Releases the surface. Presenting afterward fails.
    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl DisplaySurface for Box<dyn DisplaySurface> {
    fn present(&mut self, frame: &Canvas) -> Result<(), Error> {
        (**self).present(frame)
    }

    fn close(&mut self) -> Result<(), Error> {
        (**self).close()
    }
}
