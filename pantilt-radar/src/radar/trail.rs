use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};
use log::trace;

use crate::errors::Error;
use crate::radar::canvas::{Canvas, Rgba};

/// A persistent RGBA layer holding the fading marks of past detections.
///
/// Created once with the display canvas, it is only ever written by [`TrailBuffer::stamp`] and
/// faded by [`TrailBuffer::decay`]. It is never cleared during a run.
#[derive(Clone, Debug)]
pub struct TrailBuffer {
    layer: Canvas,
    color: Rgba,
    marker_radius: u32,
    decay: u8,
    stamps: usize,
}

impl TrailBuffer {
    /// Creates a transparent trail of the given canvas size.
    ///
    /// - `color`: the color (and alpha) of each stamp
    /// - `marker_radius`: stamp radius in pixels
    /// - `decay`: alpha multiplier applied by [`TrailBuffer::decay`], over 256
    pub fn new(width: u32, height: u32, color: Rgba, marker_radius: u32, decay: u8) -> Self {
        Self {
            layer: Canvas::new(width, height),
            color,
            marker_radius,
            decay,
            stamps: 0,
        }
    }

    /// Paints a low-alpha marker centered on `point` over the existing trail.
    pub fn stamp(&mut self, point: Point) -> Result<(), Error> {
        Circle::with_center(point, self.marker_radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_fill(self.color.rgb()))
            .draw(&mut self.layer.blended(self.color.a))?;
        self.stamps += 1;
        trace!("Trail stamp #{} at {:?}", self.stamps, point);
        Ok(())
    }

    /// Fades the whole trail by one step.
    pub fn decay(&mut self) {
        self.layer.multiply_alpha(self.decay);
    }

    /// Returns the trail alpha at `point` (0 outside the canvas).
    pub fn alpha_at(&self, point: Point) -> u8 {
        self.layer.get_pixel(point).map(|pixel| pixel.a).unwrap_or(0)
    }

    /// Returns the trail layer, ready to be composited over a frame.
    pub fn canvas(&self) -> &Canvas {
        &self.layer
    }

    /// Returns the number of stamps made since creation.
    pub fn count_stamps(&self) -> usize {
        self.stamps
    }

    /// Returns the decay multiplier (over 256).
    pub fn get_decay(&self) -> u8 {
        self.decay
    }

    /// Returns the color of the stamps.
    pub fn get_color(&self) -> Rgb888 {
        self.color.rgb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _setup_trail() -> TrailBuffer {
        TrailBuffer::new(100, 100, Rgba::new(255, 0, 0, 50), 5, 10)
    }

    #[test]
    fn test_trail_starts_empty() {
        let trail = _setup_trail();
        assert_eq!(trail.canvas().count_visible(), 0);
        assert_eq!(trail.count_stamps(), 0);
        assert_eq!(trail.get_decay(), 10);
        assert_eq!(trail.get_color(), Rgb888::RED);
        assert_eq!(trail.alpha_at(Point::new(-3, 0)), 0);
    }

    #[test]
    fn test_trail_stamp() {
        let mut trail = _setup_trail();
        trail.stamp(Point::new(50, 50)).unwrap();
        assert_eq!(trail.count_stamps(), 1);
        assert_eq!(trail.alpha_at(Point::new(50, 50)), 50);
        assert_eq!(trail.alpha_at(Point::new(55, 50)), 50);
        assert_eq!(trail.alpha_at(Point::new(57, 50)), 0);
        assert_eq!(trail.alpha_at(Point::new(10, 10)), 0);
        assert_eq!(trail.canvas().get_pixel(Point::new(50, 50)).unwrap().r, 255);
    }

    #[test]
    fn test_trail_stamp_strictly_increases_alpha() {
        let mut trail = _setup_trail();
        let point = Point::new(20, 20);
        trail.stamp(point).unwrap();
        trail.decay();
        for _ in 0..5 {
            let before = trail.alpha_at(point);
            trail.stamp(point).unwrap();
            assert!(trail.alpha_at(point) > before);
            trail.decay();
        }
    }

    #[test]
    fn test_trail_decay_is_non_increasing() {
        let mut trail = _setup_trail();
        trail.stamp(Point::new(50, 50)).unwrap();
        trail.stamp(Point::new(52, 50)).unwrap();
        let mut previous = trail.alpha_at(Point::new(51, 50));
        for _ in 0..20 {
            trail.decay();
            let current = trail.alpha_at(Point::new(51, 50));
            assert!(current <= previous);
            previous = current;
        }
        // Faded but never fully erased.
        assert_eq!(previous, 1);
        assert_eq!(trail.alpha_at(Point::new(10, 10)), 0);
    }

    #[test]
    fn test_trail_stamp_off_canvas() {
        let mut trail = _setup_trail();
        trail.stamp(Point::new(-50, -50)).unwrap();
        assert_eq!(trail.count_stamps(), 1);
        assert_eq!(trail.canvas().count_visible(), 0);
    }
}
