use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// パネル（ヘッダ・サイドバー）の明度差（HSLの明度、百分率）
const PANEL_DARKEN_PERCENT: f32 = 5.0;

/// 色文字列の解析エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color: {0:?}")]
pub struct ColorError(pub String);

/// 8bit RGB色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);

    /// HSLの明度を `percent` ポイント下げる（0で止まる）
    pub fn darker(self, percent: f32) -> Rgb {
        let (h, s, l) = self.to_hsl();
        let l = (l - percent / 100.0).max(0.0);
        Rgb::from_hsl(h, s, l)
    }

    fn to_hsl(self) -> (f32, f32, f32) {
        let r = self.0 as f32 / 255.0;
        let g = self.1 as f32 / 255.0;
        let b = self.2 as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s, l)
    }

    fn from_hsl(h: f32, s: f32, l: f32) -> Rgb {
        let to_u8 = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        if s == 0.0 {
            let v = to_u8(l);
            return Rgb(v, v, v);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Rgb(
            to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            to_u8(hue_to_rgb(p, q, h)),
            to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }

    fn named(name: &str) -> Option<Rgb> {
        let rgb = match name {
            "black" => Rgb(0x00, 0x00, 0x00),
            "white" => Rgb(0xFF, 0xFF, 0xFF),
            "red" => Rgb(0xFF, 0x00, 0x00),
            "green" => Rgb(0x00, 0x80, 0x00),
            "lime" => Rgb(0x00, 0xFF, 0x00),
            "blue" => Rgb(0x00, 0x00, 0xFF),
            "yellow" => Rgb(0xFF, 0xFF, 0x00),
            "cyan" | "aqua" => Rgb(0x00, 0xFF, 0xFF),
            "magenta" | "fuchsia" => Rgb(0xFF, 0x00, 0xFF),
            "gray" | "grey" => Rgb(0x80, 0x80, 0x80),
            "silver" => Rgb(0xC0, 0xC0, 0xC0),
            "maroon" => Rgb(0x80, 0x00, 0x00),
            "olive" => Rgb(0x80, 0x80, 0x00),
            "navy" => Rgb(0x00, 0x00, 0x80),
            "purple" => Rgb(0x80, 0x00, 0x80),
            "teal" => Rgb(0x00, 0x80, 0x80),
            "orange" => Rgb(0xFF, 0xA5, 0x00),
            _ => return None,
        };
        Some(rgb)
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    /// `#rgb`、`#rrggbb`、またはCSSの基本色名
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let err = || ColorError(s.to_string());

        let Some(hex) = input.strip_prefix('#') else {
            return Rgb::named(&input).ok_or_else(err);
        };
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());

        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
                Ok(Rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(value: Rgb) -> Self {
        ratatui::style::Color::Rgb(value.0, value.1, value.2)
    }
}

/// 前景色・背景色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    foreground: Rgb,
    background: Rgb,
}

impl ThemeState {
    pub const DEFAULT_FOREGROUND: Rgb = Rgb::WHITE;
    pub const DEFAULT_BACKGROUND: Rgb = Rgb::BLACK;

    pub fn new(foreground: Rgb, background: Rgb) -> Self {
        Self {
            foreground,
            background,
        }
    }

    pub fn foreground(&self) -> Rgb {
        self.foreground
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn set_foreground(&mut self, color: Rgb) {
        self.foreground = color;
    }

    pub fn set_background(&mut self, color: Rgb) {
        self.background = color;
    }

    pub fn reset_foreground(&mut self) {
        self.foreground = Self::DEFAULT_FOREGROUND;
    }

    pub fn reset_background(&mut self) {
        self.background = Self::DEFAULT_BACKGROUND;
    }

    pub fn reset_both(&mut self) {
        self.reset_foreground();
        self.reset_background();
    }

    /// ヘッダ・サイドバーの塗り色（背景色を少し暗くしたもの）
    pub fn panel(&self) -> Rgb {
        self.background.darker(PANEL_DARKEN_PERCENT)
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FOREGROUND, Self::DEFAULT_BACKGROUND)
    }
}
