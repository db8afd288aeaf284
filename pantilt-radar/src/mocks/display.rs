use std::sync::Arc;

use parking_lot::RwLock;

use crate::display::DisplaySurface;
use crate::errors::{DisplayError, Error};
use crate::radar::Canvas;

#[derive(Debug, Default)]
struct MockDisplayState {
    presented: usize,
    last: Option<Canvas>,
    closed: bool,
}

/// Mock implementation of [`DisplaySurface`]: keeps the last frame presented.
#[derive(Clone, Debug, Default)]
pub struct MockDisplay {
    state: Arc<RwLock<MockDisplayState>>,
    /// Fails once this many frames have been presented.
    fail_after: Option<usize>,
}

impl MockDisplay {
    /// Makes the display fail after `frames` successful presentations.
    pub fn set_fail_after(mut self, frames: usize) -> Self {
        self.fail_after = Some(frames);
        self
    }

    /// Returns the number of frames presented.
    pub fn count_presented(&self) -> usize {
        self.state.read().presented
    }

    /// Returns a copy of the last frame presented.
    pub fn get_last_frame(&self) -> Option<Canvas> {
        self.state.read().last.clone()
    }

    /// Checks whether the display has been closed.
    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }
}

impl DisplaySurface for MockDisplay {
    fn present(&mut self, frame: &Canvas) -> Result<(), Error> {
        let mut state = self.state.write();
        if state.closed {
            return Err(DisplayError::Closed.into());
        }
        if let Some(limit) = self.fail_after {
            if state.presented >= limit {
                return Err(DisplayError::IoException {
                    info: String::from("display disconnected"),
                }
                .into());
            }
        }
        state.presented += 1;
        state.last = Some(frame.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.state.write().closed = true;
        Ok(())
    }
}
