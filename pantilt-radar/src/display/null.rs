use crate::display::DisplaySurface;
use crate::errors::{DisplayError, Error};
use crate::radar::Canvas;

/// A surface dropping every frame (headless runs).
#[derive(Clone, Debug, Default)]
pub struct NullSurface {
    presented: usize,
    closed: bool,
}

impl NullSurface {
    /// Returns the number of frames received.
    pub fn count_presented(&self) -> usize {
        self.presented
    }
}

impl DisplaySurface for NullSurface {
    fn present(&mut self, _: &Canvas) -> Result<(), Error> {
        if self.closed {
            return Err(DisplayError::Closed.into());
        }
        self.presented += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_surface() {
        let mut surface = NullSurface::default();
        let frame = Canvas::new(2, 2);
        surface.present(&frame).unwrap();
        surface.present(&frame).unwrap();
        assert_eq!(surface.count_presented(), 2);

        surface.close().unwrap();
        let error = surface.present(&frame).err().unwrap();
        assert_eq!(
            error.to_string(),
            "Display error: Display surface is already closed."
        );
        assert_eq!(surface.count_presented(), 2);
    }
}
