//! 国旗图案
//!
//! 按国家标识查找内置图案，用背景色逐格绘制。未知国家绘制为占位块，
//! 面板内从不输出国家名，避免泄露答案。

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::models::CountryId;

const WHITE: Color = Color::Rgb(255, 255, 255);
const BLACK: Color = Color::Rgb(0, 0, 0);

/// 国旗图案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagArt {
    /// 横条纹 (颜色, 权重)，自上而下
    Horizontal(&'static [(Color, u16)]),
    /// 竖条纹 (颜色, 权重)，自左而右
    Vertical(&'static [(Color, u16)]),
    StarsAndStripes,
    UnionJack,
}

/// 按国家标识查找图案（忽略大小写）
pub fn lookup(country: &CountryId) -> Option<FlagArt> {
    let art = match country.as_str().to_ascii_lowercase().as_str() {
        "estonia" => FlagArt::Horizontal(&[
            (Color::Rgb(0, 114, 206), 1),
            (BLACK, 1),
            (WHITE, 1),
        ]),
        "france" => FlagArt::Vertical(&[
            (Color::Rgb(0, 35, 149), 1),
            (WHITE, 1),
            (Color::Rgb(237, 41, 57), 1),
        ]),
        "germany" => FlagArt::Horizontal(&[
            (BLACK, 1),
            (Color::Rgb(221, 0, 0), 1),
            (Color::Rgb(255, 206, 0), 1),
        ]),
        "ireland" => FlagArt::Vertical(&[
            (Color::Rgb(22, 155, 98), 1),
            (WHITE, 1),
            (Color::Rgb(255, 136, 62), 1),
        ]),
        "italy" => FlagArt::Vertical(&[
            (Color::Rgb(0, 146, 70), 1),
            (WHITE, 1),
            (Color::Rgb(206, 43, 55), 1),
        ]),
        "nigeria" => FlagArt::Vertical(&[
            (Color::Rgb(0, 135, 81), 1),
            (WHITE, 1),
            (Color::Rgb(0, 135, 81), 1),
        ]),
        "poland" => FlagArt::Horizontal(&[(WHITE, 1), (Color::Rgb(220, 20, 60), 1)]),
        "russia" => FlagArt::Horizontal(&[
            (WHITE, 1),
            (Color::Rgb(0, 57, 166), 1),
            (Color::Rgb(213, 43, 30), 1),
        ]),
        "spain" => FlagArt::Horizontal(&[
            (Color::Rgb(170, 21, 27), 1),
            (Color::Rgb(241, 191, 0), 2),
            (Color::Rgb(170, 21, 27), 1),
        ]),
        "uk" | "united kingdom" => FlagArt::UnionJack,
        "us" | "usa" | "united states" => FlagArt::StarsAndStripes,
        _ => return None,
    };
    Some(art)
}

impl FlagArt {
    /// 取相对坐标 (fx, fy) 处的颜色，坐标范围 [0, 1)
    pub fn color_at(&self, fx: f64, fy: f64) -> Color {
        match self {
            FlagArt::Horizontal(bands) => band_at(bands, fy),
            FlagArt::Vertical(bands) => band_at(bands, fx),
            FlagArt::StarsAndStripes => {
                let stripe = (fy * 13.0) as u32;
                if fx < 0.4 && stripe < 7 {
                    Color::Rgb(10, 49, 97)
                } else if stripe % 2 == 0 {
                    Color::Rgb(178, 34, 52)
                } else {
                    WHITE
                }
            }
            FlagArt::UnionJack => {
                let red = Color::Rgb(200, 16, 46);
                let dx = (fx - 0.5).abs();
                let dy = (fy - 0.5).abs();
                let diagonal = (fx - fy).abs().min((fx + fy - 1.0).abs());
                if dx < 0.05 || dy < 0.09 {
                    red
                } else if dx < 0.1 || dy < 0.17 {
                    WHITE
                } else if diagonal < 0.04 {
                    red
                } else if diagonal < 0.1 {
                    WHITE
                } else {
                    Color::Rgb(1, 33, 105)
                }
            }
        }
    }
}

fn band_at(bands: &[(Color, u16)], fraction: f64) -> Color {
    let total: u16 = bands.iter().map(|(_, weight)| weight).sum();
    let position = fraction * f64::from(total);
    let mut edge = 0.0;
    for (color, weight) in bands {
        edge += f64::from(*weight);
        if position < edge {
            return *color;
        }
    }
    bands.last().map_or(Color::Reset, |(color, _)| *color)
}

/// 国旗组件
pub struct FlagWidget<'a> {
    country: &'a CountryId,
    dimmed: bool,
}

impl<'a> FlagWidget<'a> {
    pub fn new(country: &'a CountryId) -> Self {
        Self {
            country,
            dimmed: false,
        }
    }

    /// 淡化显示（结果展示阶段未涉及的选项）
    #[must_use]
    pub fn dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }
}

impl Widget for FlagWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let art = lookup(self.country);
        let width = f64::from(area.width);
        let height = f64::from(area.height);

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let fx = (f64::from(x - area.x) + 0.5) / width;
                let fy = (f64::from(y - area.y) + 0.5) / height;
                let color = art.map_or(Color::DarkGray, |art| art.color_at(fx, fy));

                if let Some(cell) = buf.cell_mut((x, y)) {
                    if self.dimmed {
                        cell.set_symbol("░").set_fg(color).set_bg(Color::Reset);
                    } else {
                        cell.set_symbol(" ").set_bg(color);
                    }
                }
            }
        }

        if art.is_none() && !self.dimmed {
            let center = (area.x + area.width / 2, area.y + area.height / 2);
            if let Some(cell) = buf.cell_mut(center) {
                cell.set_symbol("?").set_fg(Color::White);
            }
        }
    }
}
