use flight_lens_common::{FlightLensError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colormap {
    RdBuR,
    Gray,
    Viridis,
    Cividis,
    Plasma,
    Inferno,
    Magma,
}

// five evenly spaced anchors per palette, sampled from the matplotlib originals
const RDBU_R: [u32; 5] = [0x053061, 0x4393c3, 0xf7f7f7, 0xd6604d, 0x67001f];
const GRAY: [u32; 5] = [0x000000, 0x404040, 0x808080, 0xbfbfbf, 0xffffff];
const VIRIDIS: [u32; 5] = [0x440154, 0x3b528b, 0x21918c, 0x5ec962, 0xfde725];
const CIVIDIS: [u32; 5] = [0x00204d, 0x414d6b, 0x7c7b78, 0xbcaf6f, 0xffea46];
const PLASMA: [u32; 5] = [0x0d0887, 0x7e03a8, 0xcc4778, 0xf89540, 0xf0f921];
const INFERNO: [u32; 5] = [0x000004, 0x56106e, 0xbb3754, 0xf98e09, 0xfcffa4];
const MAGMA: [u32; 5] = [0x000004, 0x51127c, 0xb73779, 0xfc8961, 0xfcfdbf];

impl Colormap {
    pub const ALL: [Colormap; 7] = [
        Colormap::RdBuR,
        Colormap::Gray,
        Colormap::Viridis,
        Colormap::Cividis,
        Colormap::Plasma,
        Colormap::Inferno,
        Colormap::Magma,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Colormap::RdBuR => "RdBu_r",
            Colormap::Gray => "gray",
            Colormap::Viridis => "Viridis",
            Colormap::Cividis => "Cividis",
            Colormap::Plasma => "Plasma",
            Colormap::Inferno => "Inferno",
            Colormap::Magma => "Magma",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FlightLensError::InvalidArgument(format!("unknown colormap '{s}'")))
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    fn stops(self) -> &'static [u32; 5] {
        match self {
            Colormap::RdBuR => &RDBU_R,
            Colormap::Gray => &GRAY,
            Colormap::Viridis => &VIRIDIS,
            Colormap::Cividis => &CIVIDIS,
            Colormap::Plasma => &PLASMA,
            Colormap::Inferno => &INFERNO,
            Colormap::Magma => &MAGMA,
        }
    }

    /// RGB at position `t` (clamped to [0, 1]).
    pub fn sample(self, t: f64) -> (u8, u8, u8) {
        let stops = self.stops();
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - i as f64;
        let (a, b) = (rgb(stops[i]), rgb(stops[i + 1]));
        let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    pub fn for_value(self, v: f64, zmin: f64, zmax: f64) -> (u8, u8, u8) {
        let span = zmax - zmin;
        let t = if span > 0.0 { (v - zmin) / span } else { 0.5 };
        self.sample(t)
    }
}

fn rgb(hex: u32) -> (u8, u8, u8) {
    ((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl std::fmt::Display for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_endpoints() {
        assert_eq!(Colormap::Gray.sample(0.0), (0, 0, 0));
        assert_eq!(Colormap::Gray.sample(1.0), (255, 255, 255));
    }

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(Colormap::Viridis.sample(-3.0), Colormap::Viridis.sample(0.0));
        assert_eq!(Colormap::Viridis.sample(7.0), (0xfd, 0xe7, 0x25));
    }

    #[test]
    fn rdbu_r_centre_is_white_ish() {
        assert_eq!(Colormap::RdBuR.for_value(0.0, -1.0, 1.0), (0xf7, 0xf7, 0xf7));
    }

    #[test]
    fn rdbu_r_low_is_blue() {
        let (r, _, b) = Colormap::RdBuR.for_value(-1.0, -1.0, 1.0);
        assert!(b > r);
    }

    #[test]
    fn interpolates_between_stops() {
        assert_eq!(Colormap::Gray.sample(0.125), (0x20, 0x20, 0x20));
    }

    #[test]
    fn parse_names() {
        assert_eq!(Colormap::parse("rdbu_r").unwrap(), Colormap::RdBuR);
        assert!(Colormap::parse("jet").is_err());
        assert_eq!(Colormap::Magma.next(), Colormap::RdBuR);
    }
}
