//! Text color parsing and tolerant comparison.

/// RGB triple as written in a Scapple `<TextColor>` element, e.g. `"0.0 0.5 1.0"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    /// Strict parse: exactly three space-separated finite floats.
    pub fn try_parse(text: &str) -> Option<Self> {
        let mut channels = text.split(' ');
        let red = parse_channel(channels.next()?)?;
        let green = parse_channel(channels.next()?)?;
        let blue = parse_channel(channels.next()?)?;
        if channels.next().is_some() {
            return None;
        }
        Some(Self { red, green, blue })
    }

    /// Lenient parse used for diagram text: anything malformed is black.
    pub fn parse(text: &str) -> Self {
        Self::try_parse(text).unwrap_or_default()
    }

    fn channels(&self) -> [f64; 3] {
        [self.red, self.green, self.blue]
    }

    /// Format the way Scapple writes colors.
    pub fn to_scapple(&self) -> String {
        format!("{:.6} {:.6} {:.6}", self.red, self.green, self.blue)
    }
}

fn parse_channel(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Compares colors channel by channel within a fixed tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatcher {
    pub tolerance: f64,
}

impl ColorMatcher {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// True when no channel differs by more than the tolerance. The boundary is inclusive.
    pub fn matches(&self, a: &Rgb, b: &Rgb) -> bool {
        a.channels()
            .iter()
            .zip(b.channels().iter())
            .all(|(x, y)| (x - y).abs() <= self.tolerance)
    }

    pub fn matches_str(&self, a: &str, b: &str) -> bool {
        self.matches(&Rgb::parse(a), &Rgb::parse(b))
    }
}
