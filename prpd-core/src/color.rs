use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Returned when there is nothing to scale against.
    pub const NEUTRAL: Rgba = Rgba {
        r: 0.5,
        g: 0.5,
        b: 0.5,
        a: 0.6,
    };

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Heat-map color for a cell hit `frequency` times when the hottest cell has `max_frequency`.
///
/// Hue runs from 240° (blue, rare) down to 0° (red, hottest) at full
/// saturation; value and alpha brighten with intensity.
pub fn color_for(frequency: u32, max_frequency: u32) -> Rgba {
    if max_frequency == 0 {
        return Rgba::NEUTRAL;
    }
    let intensity = (frequency as f32 / max_frequency as f32).clamp(0.0, 1.0);
    let hue = 240.0 * (1.0 - intensity);
    let value = 0.8 + 0.2 * intensity;
    let (r, g, b) = hsv_to_rgb(hue, 1.0, value);
    Rgba {
        r,
        g,
        b,
        a: 0.6 + 0.4 * intensity,
    }
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> (f32, f32, f32) {
    let hue = hue.rem_euclid(360.0);
    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = match (hue / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn zero_max_is_neutral() {
        assert_eq!(color_for(0, 0), Rgba::NEUTRAL);
        assert_eq!(color_for(5, 0), Rgba::NEUTRAL);
    }

    #[test]
    fn hottest_cell_is_opaque_red() {
        let c = color_for(40, 40);
        assert!(close(c.r, 1.0));
        assert!(close(c.g, 0.0));
        assert!(close(c.b, 0.0));
        assert!(close(c.a, 1.0));
    }

    #[test]
    fn coldest_end_is_blue() {
        let c = color_for(0, 100);
        assert!(close(c.r, 0.0));
        assert!(close(c.g, 0.0));
        assert!(close(c.b, 0.8));
        assert!(close(c.a, 0.6));
    }

    #[test]
    fn half_intensity_is_green() {
        // hue 120, value 0.9
        let c = color_for(50, 100);
        assert!(close(c.r, 0.0));
        assert!(close(c.g, 0.9));
        assert!(close(c.b, 0.0));
        assert!(close(c.a, 0.8));
    }

    #[test]
    fn stale_max_is_clamped() {
        assert_eq!(color_for(12, 10), color_for(10, 10));
    }

    #[test]
    fn rgba8_quantizes() {
        assert_eq!(color_for(1, 1).to_rgba8(), [255, 0, 0, 255]);
    }
}
