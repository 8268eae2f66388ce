//! 键盘事件映射 (Input -> Action)
//!
//! 只在等待作答阶段才把按键映射为猜测，其余阶段的数字键直接忽略

use crossterm::event::KeyCode;

use super::actions::Action;
use super::state::App;
use crate::models::Phase;

/// 根据当前阶段和按键获取对应的 Action
pub fn get_action(phase: Phase, key: KeyCode) -> Option<Action> {
    match phase {
        Phase::AwaitingGuess => match key {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('1') => Some(Action::Guess(0)),
            KeyCode::Char('2') => Some(Action::Guess(1)),
            KeyCode::Char('3') => Some(Action::Guess(2)),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::HighlightPrev),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::HighlightNext),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::GuessHighlighted),
            KeyCode::Char('r') => Some(Action::Restart),
            _ => None,
        },
        Phase::ShowingResult => match key {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Continue),
            KeyCode::Char('r') => Some(Action::Restart),
            _ => None,
        },
        Phase::GameOver => match key {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('r') | KeyCode::Enter => Some(Action::Restart),
            _ => None,
        },
    }
}

/// 处理按键事件，返回 true 表示退出
pub fn handle_key_event(app: &mut App, key: KeyCode) -> bool {
    match get_action(app.phase(), key) {
        Some(action) => app.dispatch(action),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionBuilder;

    #[test]
    fn test_number_keys_guess_only_while_awaiting() {
        assert_eq!(
            get_action(Phase::AwaitingGuess, KeyCode::Char('2')),
            Some(Action::Guess(1))
        );
        assert_eq!(get_action(Phase::ShowingResult, KeyCode::Char('2')), None);
        assert_eq!(get_action(Phase::GameOver, KeyCode::Char('2')), None);
    }

    #[test]
    fn test_enter_depends_on_phase() {
        assert_eq!(
            get_action(Phase::AwaitingGuess, KeyCode::Enter),
            Some(Action::GuessHighlighted)
        );
        assert_eq!(
            get_action(Phase::ShowingResult, KeyCode::Enter),
            Some(Action::Continue)
        );
        assert_eq!(
            get_action(Phase::GameOver, KeyCode::Enter),
            Some(Action::Restart)
        );
    }

    #[test]
    fn test_quit_in_every_phase() {
        for phase in [Phase::AwaitingGuess, Phase::ShowingResult, Phase::GameOver] {
            assert_eq!(get_action(phase, KeyCode::Char('q')), Some(Action::Quit));
            assert_eq!(get_action(phase, KeyCode::Esc), Some(Action::Quit));
        }
    }

    #[test]
    fn test_handle_key_event_drives_session() {
        let session = SessionBuilder::default().with_seed(Some(1)).build().unwrap();
        let mut app = App::new(session);

        assert!(!handle_key_event(&mut app, KeyCode::Char('1')));
        assert_eq!(app.phase(), Phase::ShowingResult);

        // 结果展示阶段数字键无效
        assert!(!handle_key_event(&mut app, KeyCode::Char('2')));
        assert_eq!(app.session.history().len(), 1);

        assert!(!handle_key_event(&mut app, KeyCode::Enter));
        assert_eq!(app.phase(), Phase::AwaitingGuess);
        assert_eq!(app.session.round(), 2);

        assert!(!handle_key_event(&mut app, KeyCode::Char('x')));
        assert!(handle_key_event(&mut app, KeyCode::Char('q')));
    }
}
