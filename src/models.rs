use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Local, TimeDelta};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{InvalidInput, SetupError};

/// 每回合展示的选项数量
pub const OPTION_COUNT: usize = 3;

/// 默认总回合数
pub const DEFAULT_TOTAL_ROUNDS: u32 = 8;

/// 默认国家池
pub const DEFAULT_COUNTRIES: [&str; 11] = [
    "Estonia", "France", "Germany", "Ireland", "Italy", "Nigeria", "Poland", "Russia", "Spain",
    "UK", "US",
];

/// 国家标识（渲染层据此查找国旗图案）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryId(String);

impl CountryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CountryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CountryId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    AwaitingGuess, // 等待玩家选择
    ShowingResult, // 展示本回合结果
    GameOver,      // 游戏结束，只能重新开始
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::AwaitingGuess => "AwaitingGuess",
            Phase::ShowingResult => "ShowingResult",
            Phase::GameOver => "GameOver",
        };
        f.write_str(name)
    }
}

/// 最近一次猜测的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessResult {
    Correct,
    Incorrect(CountryId), // 玩家实际选中的国家
}

/// 每回合选项的抽取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// 每回合从国家池中重新随机抽取 3 个
    #[default]
    Resample,
    /// 开局洗牌一次，按顺序每回合发 3 张，不足时重新洗牌
    Deck,
}

/// 已作答回合的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    pub round: u32,
    pub options: Vec<CountryId>,
    pub correct_index: usize,
    pub chosen: usize,
}

impl RoundRecord {
    pub fn is_correct(&self) -> bool {
        self.chosen == self.correct_index
    }

    pub fn target(&self) -> &CountryId {
        &self.options[self.correct_index]
    }
}

/// 渲染层读取的只读快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<'a> {
    pub options: &'a [CountryId],
    pub target: &'a CountryId,
    pub score: u32,
    pub round: u32,
    pub total_rounds: u32,
    pub last_result: Option<&'a GuessResult>,
    pub phase: Phase,
}

/// 答错的回合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Miss {
    pub round: u32,
    pub target: CountryId,
    pub chosen: CountryId,
}

/// 游戏结束总结
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub score: u32,
    pub total_rounds: u32,
    pub accuracy: u32, // 百分比，向下取整
    pub elapsed: TimeDelta,
    pub misses: Vec<Miss>,
}

/// 会话构建器
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    pool: Vec<CountryId>,
    total_rounds: u32,
    selection: Selection,
    seed: Option<u64>,
}

impl SessionBuilder {
    pub fn new<I, C>(pool: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CountryId>,
    {
        Self {
            pool: pool.into_iter().map(Into::into).collect(),
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            selection: Selection::default(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_total_rounds(mut self, total_rounds: u32) -> Self {
        self.total_rounds = total_rounds;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// 固定随机种子，便于复现同一局
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// 校验参数并开始第一局
    pub fn build(self) -> Result<QuizSession, SetupError> {
        validate_pool(&self.pool)?;
        if self.total_rounds == 0 {
            return Err(SetupError::NoRounds);
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut session = QuizSession {
            id: Uuid::new_v4(),
            pool: self.pool,
            total_rounds: self.total_rounds,
            selection: self.selection,
            deck: Vec::new(),
            options: Vec::with_capacity(OPTION_COUNT),
            correct_index: 0,
            score: 0,
            round: 1,
            last_result: None,
            phase: Phase::AwaitingGuess,
            history: Vec::new(),
            started_at: Local::now(),
            finished_at: None,
            rng,
        };
        session.start_game();
        tracing::info!(
            session = %session.id,
            pool = session.pool.len(),
            total_rounds = session.total_rounds,
            selection = ?session.selection,
            "quiz session created"
        );
        Ok(session)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRIES)
    }
}

fn validate_pool(pool: &[CountryId]) -> Result<(), SetupError> {
    let mut seen = HashSet::new();
    for country in pool {
        if country.as_str().is_empty() {
            return Err(SetupError::EmptyCountry);
        }
        if !seen.insert(country.as_str().to_lowercase()) {
            return Err(SetupError::DuplicateCountry(country.to_string()));
        }
    }
    if pool.len() < OPTION_COUNT {
        return Err(SetupError::PoolTooSmall { len: pool.len() });
    }
    Ok(())
}

/// 猜国旗会话状态机
///
/// 阶段流转: AwaitingGuess -> ShowingResult -> (AwaitingGuess | GameOver)，
/// 任意阶段都可以 `restart()` 回到第一回合。
#[derive(Debug)]
pub struct QuizSession {
    id: Uuid,
    pool: Vec<CountryId>,
    total_rounds: u32,
    selection: Selection,
    deck: Vec<CountryId>, // 仅 Selection::Deck 使用
    options: Vec<CountryId>,
    correct_index: usize,
    score: u32,
    round: u32,
    last_result: Option<GuessResult>,
    phase: Phase,
    history: Vec<RoundRecord>,
    started_at: DateTime<Local>,
    finished_at: Option<DateTime<Local>>,
    rng: StdRng,
}

impl QuizSession {
    /// 使用默认回合数和抽取方式创建会话
    pub fn new<I, C>(pool: I) -> Result<Self, SetupError>
    where
        I: IntoIterator<Item = C>,
        C: Into<CountryId>,
    {
        SessionBuilder::new(pool).build()
    }

    // ============ 操作 ============

    /// 提交猜测
    pub fn submit_guess(&mut self, option_index: usize) -> Result<GuessResult, InvalidInput> {
        self.require_phase(Phase::AwaitingGuess, "submit_guess")?;
        let chosen = self
            .options
            .get(option_index)
            .cloned()
            .ok_or(InvalidInput::OptionOutOfRange {
                index: option_index,
            })?;

        let result = if option_index == self.correct_index {
            self.score += 1;
            GuessResult::Correct
        } else {
            GuessResult::Incorrect(chosen)
        };

        self.history.push(RoundRecord {
            round: self.round,
            options: self.options.clone(),
            correct_index: self.correct_index,
            chosen: option_index,
        });
        self.last_result = Some(result.clone());
        self.phase = Phase::ShowingResult;

        tracing::debug!(
            session = %self.id,
            round = self.round,
            target = %self.target(),
            chosen = option_index,
            correct = matches!(result, GuessResult::Correct),
            score = self.score,
            "guess submitted"
        );
        Ok(result)
    }

    /// 确认结果，进入下一回合或结束游戏
    pub fn acknowledge_result(&mut self) -> Result<(), InvalidInput> {
        self.require_phase(Phase::ShowingResult, "acknowledge_result")?;

        if self.round >= self.total_rounds {
            self.phase = Phase::GameOver;
            self.finished_at = Some(Local::now());
            tracing::info!(
                session = %self.id,
                score = self.score,
                total_rounds = self.total_rounds,
                "game over"
            );
            return Ok(());
        }

        self.round += 1;
        self.deal();
        self.phase = Phase::AwaitingGuess;
        tracing::debug!(session = %self.id, round = self.round, "next round");
        Ok(())
    }

    /// 重新开始（保留会话标识）
    pub fn restart(&mut self) {
        self.start_game();
        tracing::info!(session = %self.id, "game restarted");
    }

    // ============ 只读访问 ============

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn pool(&self) -> &[CountryId] {
        &self.pool
    }

    pub fn options(&self) -> &[CountryId] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// 本回合要找的国家
    pub fn target(&self) -> &CountryId {
        &self.options[self.correct_index]
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn last_result(&self) -> Option<&GuessResult> {
        self.last_result.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Local>> {
        self.finished_at
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            options: &self.options,
            target: self.target(),
            score: self.score,
            round: self.round,
            total_rounds: self.total_rounds,
            last_result: self.last_result.as_ref(),
            phase: self.phase,
        }
    }

    /// 游戏结束后的总结，其他阶段返回 None
    pub fn summary(&self) -> Option<Summary> {
        if self.phase != Phase::GameOver {
            return None;
        }
        let finished_at = self.finished_at?;

        let misses = self
            .history
            .iter()
            .filter(|record| !record.is_correct())
            .map(|record| Miss {
                round: record.round,
                target: record.target().clone(),
                chosen: record.options[record.chosen].clone(),
            })
            .collect();

        Some(Summary {
            score: self.score,
            total_rounds: self.total_rounds,
            accuracy: self.score * 100 / self.total_rounds,
            elapsed: finished_at - self.started_at,
            misses,
        })
    }

    // ============ 内部逻辑 ============

    fn require_phase(&self, expected: Phase, operation: &'static str) -> Result<(), InvalidInput> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(InvalidInput::WrongPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    fn start_game(&mut self) {
        self.score = 0;
        self.round = 1;
        self.last_result = None;
        self.phase = Phase::AwaitingGuess;
        self.history.clear();
        self.started_at = Local::now();
        self.finished_at = None;
        self.deck.clear();
        self.deal();
    }

    /// 抽取本回合的 3 个选项并随机指定正确答案
    fn deal(&mut self) {
        self.options = match self.selection {
            Selection::Resample => {
                let mut picked: Vec<CountryId> = self
                    .pool
                    .choose_multiple(&mut self.rng, OPTION_COUNT)
                    .cloned()
                    .collect();
                picked.shuffle(&mut self.rng);
                picked
            }
            Selection::Deck => {
                if self.deck.len() < OPTION_COUNT {
                    self.deck = self.pool.clone();
                    self.deck.shuffle(&mut self.rng);
                }
                let at = self.deck.len() - OPTION_COUNT;
                self.deck.split_off(at)
            }
        };
        self.correct_index = self.rng.random_range(0..OPTION_COUNT);
    }
}
