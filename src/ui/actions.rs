//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

/// 用户操作枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    HighlightPrev,
    HighlightNext,

    // 会话操作
    Guess(usize),     // 直接选择第 n 个选项 (0 起)
    GuessHighlighted, // Enter / Space
    Continue,         // 关闭结果提示，进入下一回合
    Restart,
}
