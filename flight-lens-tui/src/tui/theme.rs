use ratatui::style::Color;

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight: Color,
    pub axis: Color,
    pub series: [Color; 6], // one per line/box group, cycled
    pub bar: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            axis: Color::Gray,
            series: [Color::Cyan, Color::LightRed, Color::Green, Color::Magenta, Color::Yellow, Color::Blue],
            bar: Color::Cyan,
            error: Color::Red,
            warning: Color::LightYellow,
            success: Color::LightGreen,
        }
    }
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            highlight: Color::Blue,
            axis: Color::DarkGray,
            series: [Color::Blue, Color::Red, Color::Green, Color::Magenta, Color::DarkGray, Color::Cyan],
            bar: Color::Blue,
            error: Color::Red,
            warning: Color::LightYellow,
            success: Color::Green,
        }
    }
    pub fn nord() -> Self {
        Self {
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(216, 222, 233),
            highlight: Color::Rgb(136, 192, 208),
            axis: Color::Rgb(129, 161, 193),
            series: [
                Color::Rgb(136, 192, 208),
                Color::Rgb(191, 97, 106),
                Color::Rgb(163, 190, 140),
                Color::Rgb(180, 142, 173),
                Color::Rgb(235, 203, 139),
                Color::Rgb(208, 135, 112),
            ],
            bar: Color::Rgb(129, 161, 193),
            error: Color::Rgb(191, 97, 106),
            warning: Color::Rgb(235, 203, 139),
            success: Color::Rgb(163, 190, 140),
        }
    }
    pub fn catppuccin() -> Self {
        Self {
            bg: Color::Rgb(30, 30, 46),
            fg: Color::Rgb(205, 214, 244),
            highlight: Color::Rgb(137, 180, 250),
            axis: Color::Rgb(166, 173, 200),
            series: [
                Color::Rgb(137, 220, 235),
                Color::Rgb(243, 139, 168),
                Color::Rgb(166, 227, 161),
                Color::Rgb(203, 166, 247),
                Color::Rgb(249, 226, 175),
                Color::Rgb(250, 179, 135),
            ],
            bar: Color::Rgb(137, 180, 250),
            error: Color::Rgb(243, 139, 168),
            warning: Color::Rgb(250, 179, 135),
            success: Color::Rgb(166, 227, 161),
        }
    }
    pub fn colorblind() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            axis: Color::Gray,
            // Okabe-Ito
            series: [
                Color::Rgb(0x00, 0x72, 0xB2),
                Color::Rgb(0xE6, 0x9F, 0x00),
                Color::Rgb(0x56, 0xB4, 0xE9),
                Color::Rgb(0xCC, 0x79, 0xA7),
                Color::Rgb(0xF0, 0xE4, 0x42),
                Color::Rgb(0xD5, 0x5E, 0x00),
            ],
            bar: Color::Rgb(0x00, 0x80, 0xFF),
            error: Color::Rgb(0xFF, 0x8C, 0x00), // orange instead of red
            warning: Color::LightYellow,
            success: Color::Rgb(0x00, 0x80, 0xFF), // blue instead of green
        }
    }
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "nord" => Self::nord(),
            "catppuccin" => Self::catppuccin(),
            "colorblind" => Self::colorblind(),
            _ => Self::dark(),
        }
    }
    pub fn series_color(&self, i: usize) -> Color {
        self.series[i % self.series.len()]
    }
}
