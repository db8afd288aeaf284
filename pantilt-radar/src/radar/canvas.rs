use std::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

/// A straight (non-premultiplied) RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color as `color`, fully opaque.
    pub fn opaque(color: Rgb888) -> Self {
        Self::with_alpha(color, u8::MAX)
    }

    /// Same color as `color`, with the given `alpha`.
    pub fn with_alpha(color: Rgb888, alpha: u8) -> Self {
        Self::new(color.r(), color.g(), color.b(), alpha)
    }

    /// Drops the alpha channel.
    pub const fn rgb(&self) -> Rgb888 {
        Rgb888::new(self.r, self.g, self.b)
    }

    /// Porter-Duff "source over": `self` painted over `destination`.
    pub fn over(self, destination: Rgba) -> Rgba {
        let source_alpha = self.a as u32;
        let rest = destination.a as u32 * (255 - source_alpha) / 255;
        let alpha = source_alpha + rest;
        if alpha == 0 {
            return Rgba::TRANSPARENT;
        }
        let channel = |source: u8, destination: u8| -> u8 {
            ((source as u32 * source_alpha + destination as u32 * rest + alpha / 2) / alpha) as u8
        };
        Rgba::new(
            channel(self.r, destination.r),
            channel(self.g, destination.g),
            channel(self.b, destination.b),
            alpha as u8,
        )
    }
}

/// An RGBA pixel buffer: the radar frames and the detection trail are drawn on it.
///
/// It is an `embedded-graphics` [`DrawTarget`]: drawing through it overwrites pixels with opaque
/// colors, drawing through [`Canvas::blended`] paints translucent colors over the content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Canvas {
    /// Creates a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// Creates a canvas filled with `color`.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Overwrites every pixel with `color`.
    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Returns the pixel at `point`, if inside the canvas.
    pub fn get_pixel(&self, point: Point) -> Option<Rgba> {
        self.index(point).map(|index| self.pixels[index])
    }

    /// Overwrites the pixel at `point`. Points outside the canvas are ignored.
    pub fn set_pixel(&mut self, point: Point, color: Rgba) {
        if let Some(index) = self.index(point) {
            self.pixels[index] = color;
        }
    }

    /// Paints `color` over the pixel at `point`. Points outside the canvas are ignored.
    pub fn blend_pixel(&mut self, point: Point, color: Rgba) {
        if let Some(index) = self.index(point) {
            self.pixels[index] = color.over(self.pixels[index]);
        }
    }

    /// Paints `layer` over this canvas. Both canvas must share the same size; the overlapping
    /// top-left area is used otherwise.
    pub fn composite(&mut self, layer: &Canvas) {
        let width = self.width.min(layer.width) as usize;
        let height = self.height.min(layer.height) as usize;
        for y in 0..height {
            let row = y * self.width as usize;
            let layer_row = y * layer.width as usize;
            for x in 0..width {
                let source = layer.pixels[layer_row + x];
                if source.a > 0 {
                    self.pixels[row + x] = source.over(self.pixels[row + x]);
                }
            }
        }
    }

    /// Multiplies the alpha channel of every pixel by `factor / 256`, rounding up.
    ///
    /// A non-transparent pixel never gets fully transparent, and no pixel alpha ever grows.
    pub fn multiply_alpha(&mut self, factor: u8) {
        for pixel in self.pixels.iter_mut() {
            pixel.a = ((pixel.a as u32 * factor as u32 + 255) >> 8) as u8;
        }
    }

    /// Returns a draw target painting translucent colors with the given `alpha` over this canvas.
    pub fn blended(&mut self, alpha: u8) -> Blended<'_> {
        Blended {
            canvas: self,
            alpha,
        }
    }

    /// Returns the canvas width (in pixels).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the canvas height (in pixels).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixels, row by row.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Returns the number of pixels that are not fully transparent.
    pub fn count_visible(&self) -> usize {
        self.pixels.iter().filter(|pixel| pixel.a > 0).count()
    }

    /// Returns the raw RGBA bytes, row by row (PNG layout).
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| [pixel.r, pixel.g, pixel.b, pixel.a])
            .collect()
    }

    fn index(&self, point: Point) -> Option<usize> {
        match point.x >= 0
            && point.y >= 0
            && (point.x as u32) < self.width
            && (point.y as u32) < self.height
        {
            true => Some(point.y as usize * self.width as usize + point.x as usize),
            false => None,
        }
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, Rgba::opaque(color));
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(Rgba::opaque(color));
        Ok(())
    }
}

/// A [`Canvas`] draw target painting with a fixed alpha (see [`Canvas::blended`]).
#[derive(Debug)]
pub struct Blended<'a> {
    canvas: &'a mut Canvas,
    alpha: u8,
}

impl OriginDimensions for Blended<'_> {
    fn size(&self) -> Size {
        self.canvas.size()
    }
}

impl DrawTarget for Blended<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.canvas
                .blend_pixel(point, Rgba::with_alpha(color, self.alpha));
        }
        Ok(())
    }
}
