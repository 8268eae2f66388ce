//! App 状态定义 (Model)

use crate::models::{Phase, QuizSession};

/// 应用状态
pub struct App {
    pub session: QuizSession,
    pub highlighted: usize, // 当前高亮的选项
    pub message: Option<String>,
}

impl App {
    /// 创建新的应用实例
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            highlighted: 0,
            message: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }
}
