//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件。视图只读取会话快照，不修改状态。

pub mod components;
pub mod flags;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::state::App;
use crate::models::{GuessResult, Phase, Snapshot, Summary};
use components::{PanelEmphasis, render_dialog_framework, render_flag_panel};
use layouts::centered_rect;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &App) {
    let snapshot = app.session.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(3), // 题目
            Constraint::Min(8),    // 国旗
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_prompt(frame, &snapshot, chunks[1]);
    render_flags(frame, app, &snapshot, chunks[2]);
    render_help(frame, app, chunks[3]);

    // 渲染弹窗
    match snapshot.phase {
        Phase::AwaitingGuess => {}
        Phase::ShowingResult => render_result_dialog(frame, &snapshot),
        Phase::GameOver => {
            if let Some(summary) = app.session.summary() {
                render_summary_dialog(frame, &summary);
            }
        }
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("🏳 猜国旗")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_prompt(frame: &mut Frame, snapshot: &Snapshot<'_>, area: Rect) {
    let line = Line::from(vec![
        Span::raw("找出 "),
        Span::styled(
            snapshot.target.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" 的国旗"),
        Span::styled(
            format!(
                "    回合 {}/{}  得分 {}",
                snapshot.round, snapshot.total_rounds, snapshot.score
            ),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let prompt = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(prompt, area);
}

fn render_flags(frame: &mut Frame, app: &App, snapshot: &Snapshot<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, snapshot.options.len() as u32);
            snapshot.options.len()
        ])
        .split(area);

    let correct = snapshot
        .options
        .iter()
        .position(|country| country == snapshot.target);
    let wrong = match snapshot.last_result {
        Some(GuessResult::Incorrect(chosen)) => {
            snapshot.options.iter().position(|country| country == chosen)
        }
        _ => None,
    };

    for (i, country) in snapshot.options.iter().enumerate() {
        let emphasis = match snapshot.phase {
            Phase::AwaitingGuess if i == app.highlighted => PanelEmphasis::Highlighted,
            Phase::AwaitingGuess => PanelEmphasis::Normal,
            Phase::ShowingResult if Some(i) == correct => PanelEmphasis::Correct,
            Phase::ShowingResult if Some(i) == wrong => PanelEmphasis::Wrong,
            Phase::ShowingResult | Phase::GameOver => PanelEmphasis::Dimmed,
        };
        let label = format!(" [{}] ", i + 1);
        render_flag_panel(frame, columns[i], &label, country, emphasis);
    }
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.phase() {
        Phase::AwaitingGuess => "[1/2/3] 选择  [←/→] 移动  [Enter] 确认  [r] 重来  [q] 退出",
        Phase::ShowingResult => "[Enter] 继续  [r] 重来  [q] 退出",
        Phase::GameOver => "[r] 再来一局  [q] 退出",
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, message)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_result_dialog(frame: &mut Frame, snapshot: &Snapshot<'_>) {
    let (headline, color) = match snapshot.last_result {
        Some(GuessResult::Incorrect(chosen)) => {
            (format!("错误! 这是 {} 的国旗", chosen), Color::Red)
        }
        _ => ("正确!".to_string(), Color::Green),
    };

    let area = centered_rect(50, 30, frame.area());
    let inner = render_dialog_framework(frame, area, "结果", color);

    let text = format!(
        "{}\n\n得分: {}/{}\n\n[Enter] 继续",
        headline, snapshot.score, snapshot.total_rounds
    );
    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(dialog, inner);
}

fn render_summary_dialog(frame: &mut Frame, summary: &Summary) {
    let area = centered_rect(60, 60, frame.area());
    let inner = render_dialog_framework(frame, area, "游戏结束", Color::Cyan);

    let seconds = summary.elapsed.num_seconds().max(0);
    let mut lines = vec![
        Line::from(Span::styled(
            format!("最终得分: {}/{}", summary.score, summary.total_rounds),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("正确率: {}%", summary.accuracy)),
        Line::from(format!("用时: {:02}:{:02}", seconds / 60, seconds % 60)),
        Line::from(""),
    ];

    if summary.misses.is_empty() {
        lines.push(Line::from("全部答对!"));
    } else {
        lines.push(Line::from("答错的回合:"));
        for miss in &summary.misses {
            lines.push(Line::from(format!(
                "  #{} {} -> {}",
                miss.round, miss.target, miss.chosen
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from("[r] 再来一局  [q] 退出"));

    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(dialog, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionBuilder;
    use ratatui::{Terminal, backend::TestBackend};

    fn app(seed: u64, total_rounds: u32) -> App {
        App::new(
            SessionBuilder::default()
                .with_total_rounds(total_rounds)
                .with_seed(Some(seed))
                .build()
                .unwrap(),
        )
    }

    /// 渲染并把缓冲区拼成字符串
    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 36)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_prompt_shows_target_round_and_score() {
        let app = app(1, 8);
        let screen = draw(&app);

        assert!(screen.contains(app.session.target().as_str()));
        assert!(screen.contains("1/8"));
        assert!(screen.contains("[1]"));
        assert!(screen.contains("[3]"));
    }

    #[test]
    fn test_panels_do_not_reveal_other_countries() {
        let app = app(2, 8);
        let screen = draw(&app);
        let target = app.session.target().clone();

        for country in app.session.options().iter().filter(|c| **c != target) {
            // 目标名可能包含其他国家名 (US 是 Russia 的子串)，只检查完整单词
            let revealed = screen
                .split(|c: char| !c.is_ascii_alphanumeric())
                .any(|word| word == country.as_str());
            assert!(!revealed, "{country} leaked");
        }
    }

    #[test]
    fn test_incorrect_result_names_chosen_country() {
        let mut app = app(3, 8);
        let wrong = (app.session.correct_index() + 1) % 3;
        let chosen = app.session.options()[wrong].clone();
        app.guess(wrong);

        let screen = draw(&app);
        assert!(screen.contains(chosen.as_str()));
        assert!(screen.contains("0/8"));
    }

    #[test]
    fn test_summary_after_game_over() {
        let mut app = app(4, 2);
        app.guess(app.session.correct_index());
        app.continue_game();
        app.guess((app.session.correct_index() + 1) % 3);
        app.continue_game();
        assert_eq!(app.phase(), Phase::GameOver);

        let screen = draw(&app);
        assert!(screen.contains("1/2"));
        assert!(screen.contains("50%"));
        assert!(screen.contains("#2"));
    }
}
