use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_7X13};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::Error;
use crate::radar::canvas::{Canvas, Rgba};
use crate::radar::geometry::{distance_to_radius, in_disc, polar_to_pixel};
use crate::radar::profile::RadarProfile;
use crate::radar::sampler::{Measurement, Unit};
use crate::radar::trail::TrailBuffer;

// ########################################
// Palette.

pub const BACKGROUND: Rgb888 = Rgb888::BLACK;
pub const ALERT_BACKGROUND: Rgb888 = Rgb888::new(255, 22, 22);
pub const GRID: Rgb888 = Rgb888::new(0, 100, 0);
pub const SWEEP: Rgba = Rgba::new(0, 255, 0, 200);
pub const SWEEP_DETECTED: Rgba = Rgba::new(255, 0, 0, 200);
pub const MARKER: Rgb888 = Rgb888::RED;
pub const TRAIL: Rgba = Rgba::new(255, 0, 0, 50);
pub const GLOW: Rgba = Rgba::new(0, 255, 0, 30);
pub const TEXT: Rgb888 = Rgb888::WHITE;

const MARKER_RADIUS: u32 = 5;
const SPOKE_STEP: usize = 30;
const SWEEP_WIDTH: u32 = 2;

/// What was drawn on a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSummary {
    /// Scan angle of the sweep line (in degrees).
    pub angle: u16,
    /// Whether the measurement was a detection.
    pub detected: bool,
    /// Background color used.
    pub background: Rgb888,
    /// Where the detection marker was drawn (if any).
    pub marker: Option<Point>,
}

/// Draws the radar frames and owns the detection trail.
#[derive(Debug)]
pub struct RadarRenderer {
    frame: Canvas,
    trail: TrailBuffer,
    center: Point,
    radius: u32,
    max_range: f64,
    rings: u8,
    unit: Unit,
    glow_points: usize,
    alert_background: bool,
    rng: StdRng,
}

impl RadarRenderer {
    /// Creates a renderer for the given profile, with an empty trail.
    pub fn new(profile: &RadarProfile) -> Self {
        let (width, height) = profile.get_size();
        Self {
            frame: Canvas::filled(width, height, Rgba::opaque(BACKGROUND)),
            trail: TrailBuffer::new(width, height, TRAIL, MARKER_RADIUS, profile.get_trail_decay()),
            center: profile.get_center(),
            radius: profile.get_radius(),
            max_range: profile.get_max_range(),
            rings: profile.get_rings(),
            unit: profile.get_unit(),
            glow_points: match profile.has_glow() {
                true => profile.get_glow_points(),
                false => 0,
            },
            alert_background: profile.has_alert_background(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeds the ambient glow generator (reproducible frames).
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Draws the frame for the given scan `angle` and `measurement`.
    ///
    /// The frame is drawn from scratch every time; only the trail carries over between calls.
    pub fn render(
        &mut self,
        angle: u16,
        measurement: &Measurement,
        detected: bool,
    ) -> Result<FrameSummary, Error> {
        let background = match detected && self.alert_background {
            true => ALERT_BACKGROUND,
            false => BACKGROUND,
        };
        self.frame.clear(background)?;

        self.draw_glow();
        self.draw_grid()?;

        let sweep = match detected {
            true => SWEEP_DETECTED,
            false => SWEEP,
        };
        Line::new(self.center, polar_to_pixel(self.center, angle as f64, self.radius as f64))
            .into_styled(PrimitiveStyle::with_stroke(sweep.rgb(), SWEEP_WIDTH))
            .draw(&mut self.frame.blended(sweep.a))?;

        let marker = match detected {
            true => Some(self.draw_marker(angle, measurement)?),
            false => None,
        };

        self.trail.decay();
        self.frame.composite(self.trail.canvas());

        let status = format!("Angle: {}° Distance: {}", angle, measurement);
        Text::with_baseline(
            &status,
            Point::new(10, 10),
            MonoTextStyle::new(&FONT_10X20, TEXT),
            Baseline::Top,
        )
        .draw(&mut self.frame)?;

        trace!("Frame drawn: {}", status);
        Ok(FrameSummary {
            angle,
            detected,
            background,
            marker,
        })
    }

    /// Scatters low-alpha points over the sweep disc.
    fn draw_glow(&mut self) {
        let radius = i32::try_from(self.radius).unwrap_or(i32::MAX);
        let (x, y) = (self.center.x, self.center.y);
        for _ in 0..self.glow_points {
            let point = Point::new(
                self.rng.gen_range(x.saturating_sub(radius)..=x.saturating_add(radius)),
                self.rng.gen_range(y.saturating_sub(radius)..=y.saturating_add(radius)),
            );
            if in_disc(self.center, self.radius, point) {
                self.frame.blend_pixel(point, GLOW);
            }
        }
    }

    /// Range rings (labeled with their real distance) and spokes every 30°.
    fn draw_grid(&mut self) -> Result<(), Error> {
        let grid = PrimitiveStyle::with_stroke(GRID, 1);
        let label_style = MonoTextStyle::new(&FONT_7X13, TEXT);

        for ring in 1..=self.rings {
            let distance = self.max_range * ring as f64 / self.rings as f64;
            let radius = distance_to_radius(distance, self.max_range, self.radius) as u32;
            Circle::with_center(self.center, radius.saturating_mul(2).saturating_add(1))
                .into_styled(grid)
                .draw(&mut self.frame)?;

            let text = format!("{} {}", distance, self.unit.label());
            let label = Text::with_baseline(&text, Point::zero(), label_style, Baseline::Top);
            let width = label.bounding_box().size.width as i32;
            label
                .translate(Point::new(
                    self.center.x - width / 2,
                    self.center
                        .y
                        .saturating_sub(i32::try_from(radius).unwrap_or(i32::MAX))
                        .saturating_sub(10),
                ))
                .draw(&mut self.frame)?;
        }

        for angle in (0..360).step_by(SPOKE_STEP) {
            Line::new(self.center, polar_to_pixel(self.center, angle as f64, self.radius as f64))
                .into_styled(grid)
                .draw(&mut self.frame)?;
        }
        Ok(())
    }

    /// Solid marker at the measured position, plus its stamp on the trail.
    fn draw_marker(&mut self, angle: u16, measurement: &Measurement) -> Result<Point, Error> {
        let radius = distance_to_radius(measurement.value, self.max_range, self.radius);
        let position = polar_to_pixel(self.center, angle as f64, radius);
        Circle::with_center(position, MARKER_RADIUS * 2 + 1)
            .into_styled(PrimitiveStyle::with_fill(MARKER))
            .draw(&mut self.frame)?;
        self.trail.stamp(position)?;
        Ok(position)
    }

    // ########################################
    // Setters and Getters.

    /// Returns the last frame drawn.
    pub fn frame(&self) -> &Canvas {
        &self.frame
    }

    /// Returns the detection trail.
    pub fn get_trail(&self) -> &TrailBuffer {
        &self.trail
    }

    /// Returns the radar center (in pixels).
    pub fn get_center(&self) -> Point {
        self.center
    }

    /// Returns the radar radius (in pixels).
    pub fn get_radius(&self) -> u32 {
        self.radius
    }
}
