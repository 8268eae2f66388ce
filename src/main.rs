use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use flagquiz::config::{Config, load_config};
use flagquiz::error::AppError;
use flagquiz::models::{Phase, Selection};
use flagquiz::ui::{self, App, render};

/// 终端猜国旗小游戏
#[derive(Parser, Debug)]
#[command(name = "flagquiz")]
#[command(about = "Guess the flag in the terminal")]
#[command(version)]
struct Args {
    /// 配置文件路径（默认 ~/.config/flagquiz/config.toml）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 总回合数
    #[arg(short, long)]
    rounds: Option<u32>,

    /// 随机种子，相同种子得到相同的题目序列
    #[arg(long)]
    seed: Option<u64>,

    /// 选项抽取方式
    #[arg(long, value_enum)]
    selection: Option<Selection>,

    /// 日志文件路径（默认写入用户缓存目录）
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// 命令行参数覆盖配置文件
    fn apply(&self, mut config: Config) -> Config {
        config.total_rounds = self.rounds.or(config.total_rounds);
        config.seed = self.seed.or(config.seed);
        config.selection = self.selection.or(config.selection);
        config
    }
}

/// 获取日志文件路径 (~/.cache/flagquiz/flagquiz.log)
fn default_log_path() -> io::Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "无法获取用户缓存目录"))?;
    Ok(cache_dir.join("flagquiz").join("flagquiz.log"))
}

/// 日志写入文件，终端留给 TUI
fn init_logging(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(filter)
        .init();
    Ok(())
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let log_path = match &args.log_file {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };
    init_logging(&log_path)?;

    let config = args.apply(load_config(args.config.as_deref())?);
    let session = config.session_builder().build()?;

    // 创建应用状态
    let mut app = App::new(session);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if app.session.phase() == Phase::GameOver {
        println!(
            "最终得分 {}/{}",
            app.session.score(),
            app.session.total_rounds()
        );
    }
    tracing::info!(session = %app.session.id(), "exiting");

    Ok(result?)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
            if key.kind == crossterm::event::KeyEventKind::Press && ui::handle_key_event(app, key.code)
            {
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from(["flagquiz", "--rounds", "3", "--selection", "deck"]);
        let config = Config {
            total_rounds: Some(10),
            seed: Some(5),
            ..Config::default()
        };

        let merged = args.apply(config);
        assert_eq!(merged.total_rounds, Some(3));
        assert_eq!(merged.selection, Some(Selection::Deck));
        assert_eq!(merged.seed, Some(5));
    }

    #[test]
    fn test_cli_defaults_leave_config_untouched() {
        let args = Args::parse_from(["flagquiz"]);
        let config = Config {
            total_rounds: Some(4),
            ..Config::default()
        };
        assert_eq!(args.apply(config.clone()), config);
    }
}
