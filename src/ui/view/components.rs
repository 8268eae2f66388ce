//! 通用 UI 组件
//!
//! 弹窗框架、国旗面板

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear},
};

use super::flags::FlagWidget;
use crate::models::CountryId;

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str, color: Color) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// 面板的强调方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEmphasis {
    Normal,
    Highlighted, // 当前高亮
    Correct,     // 正确答案
    Wrong,       // 玩家选错的那一项
    Dimmed,      // 结果阶段未涉及的选项
}

/// [组件] 带编号的国旗面板
pub fn render_flag_panel(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    country: &CountryId,
    emphasis: PanelEmphasis,
) {
    let border_style = match emphasis {
        PanelEmphasis::Normal => Style::default().fg(Color::Gray),
        PanelEmphasis::Highlighted => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        PanelEmphasis::Correct => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        PanelEmphasis::Wrong => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        PanelEmphasis::Dimmed => Style::default().fg(Color::DarkGray),
    };

    let block = Block::default()
        .title(label)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let flag = FlagWidget::new(country).dimmed(emphasis == PanelEmphasis::Dimmed);
    frame.render_widget(flag, inner);
}
