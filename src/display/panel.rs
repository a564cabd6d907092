use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::{Rgb565, RgbColor},
    prelude::{DrawTarget, Point},
    text::{Baseline, Text},
};
use log::warn;

use super::StatusDisplay;

/// Vertical distance between text rows, in pixels.
const LINE_HEIGHT: i32 = 12;

/// Renders status lines onto any `embedded-graphics` draw target.
///
/// Each call to [`show`](StatusDisplay::show) clears the target and draws
/// the lines top to bottom in a 6x10 monospace font.
pub struct TextPanel<T> {
    target:     T,
    origin:     Point,
    text_color: Rgb565,
    background: Rgb565,
    last:       Vec<String>,
}

impl<T> TextPanel<T>
where
    T: DrawTarget<Color = Rgb565>,
    T::Error: core::fmt::Debug,
{
    /// Creates a white-on-black panel drawing from the top left corner.
    pub fn new(target: T) -> Self {
        Self {
            target,
            origin: Point::new(4, 4),
            text_color: Rgb565::WHITE,
            background: Rgb565::BLACK,
            last: Vec::new(),
        }
    }

    /// Sets the text and background colors.
    pub fn with_colors(mut self, text: Rgb565, background: Rgb565) -> Self {
        self.text_color = text;
        self.background = background;
        self
    }

    /// Sets the top left corner of the first line.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// The lines most recently shown.
    pub fn lines(&self) -> &[String] { &self.last }

    /// The underlying draw target.
    pub fn target(&self) -> &T { &self.target }

    fn render(&mut self, lines: &[String]) -> Result<(), T::Error> {
        self.target.clear(self.background)?;
        let style = MonoTextStyle::new(&FONT_6X10, self.text_color);
        for (row, line) in lines.iter().enumerate() {
            let position = self.origin + Point::new(0, row as i32 * LINE_HEIGHT);
            Text::with_baseline(line, position, style, Baseline::Top).draw(&mut self.target)?;
        }
        Ok(())
    }
}

impl<T> StatusDisplay for TextPanel<T>
where
    T: DrawTarget<Color = Rgb565>,
    T::Error: core::fmt::Debug,
{
    fn show(&mut self, lines: &[String]) {
        if let Err(e) = self.render(lines) {
            warn!("Display Draw Error: {:?}", e);
        }
        self.last = lines.to_vec();
    }
}
