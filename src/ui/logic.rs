//! 业务逻辑处理 (Update/Dispatch)
//!
//! dispatch 是唯一调用会话操作的地方

use super::actions::Action;
use super::state::App;
use crate::error::InvalidInput;
use crate::models::{OPTION_COUNT, Phase};

impl App {
    /// 核心逻辑分发，返回 true 表示退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::HighlightPrev => self.move_left(),
            Action::HighlightNext => self.move_right(),
            Action::Guess(index) => self.guess(index),
            Action::GuessHighlighted => self.guess(self.highlighted),
            Action::Continue => self.continue_game(),
            Action::Restart => self.restart(),
        }
        false
    }

    // ============ 导航相关 ============

    /// 向左移动高亮
    pub fn move_left(&mut self) {
        if self.highlighted > 0 {
            self.highlighted -= 1;
        }
    }

    /// 向右移动高亮
    pub fn move_right(&mut self) {
        if self.highlighted + 1 < OPTION_COUNT {
            self.highlighted += 1;
        }
    }

    // ============ 会话操作 ============

    /// 提交猜测
    pub fn guess(&mut self, index: usize) {
        match self.session.submit_guess(index) {
            Ok(_) => {
                self.highlighted = index;
                self.message = None;
            }
            Err(err) => self.reject(err),
        }
    }

    /// 确认结果，进入下一回合
    pub fn continue_game(&mut self) {
        match self.session.acknowledge_result() {
            Ok(()) => {
                self.highlighted = 0;
                if self.session.phase() == Phase::GameOver {
                    self.message = Some("游戏结束".to_string());
                }
            }
            Err(err) => self.reject(err),
        }
    }

    /// 重新开始
    pub fn restart(&mut self) {
        self.session.restart();
        self.highlighted = 0;
        self.message = Some("新的一局开始了".to_string());
    }

    fn reject(&mut self, err: InvalidInput) {
        tracing::warn!(session = %self.session.id(), error = %err, "intent rejected");
        self.message = Some(err.to_string());
    }
}
