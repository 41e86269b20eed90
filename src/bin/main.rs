use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use strategy_lab::algorithm::{
    Algorithm, AlgorithmContext, MeanReversionAlgorithm, SectorUniverseAlgorithm, StepReport,
    StrategyRunner,
};
use strategy_lab::config::{self, ApplicationConfig, LogConfig};
use strategy_lab::data_provider::{
    load_bars, load_fundamentals, parse_time, HistoryProvider, InMemoryHistoryProvider,
};
use strategy_lab::domain_types::Symbol;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "strategy_lab", about = "股票策略單步執行工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 以流動性宇宙選股
    LiquidUniverse {
        /// 基本面 CSV
        #[arg(short, long)]
        fundamentals: PathBuf,
        /// 執行時間 (RFC 3339 或 YYYY-MM-DD)
        #[arg(short, long)]
        time: String,
    },

    /// 以板塊均衡宇宙選股
    SectorUniverse {
        /// 基本面 CSV
        #[arg(short, long)]
        fundamentals: PathBuf,
        /// 執行時間，預設為回測起始日
        #[arg(short, long)]
        time: Option<String>,
        /// 目前持有的代碼，以逗號分隔
        #[arg(long, value_delimiter = ',')]
        holdings: Vec<String>,
    },

    /// 選股並產生均值回歸洞見與目標持倉
    MeanReversion {
        /// 基本面 CSV
        #[arg(short, long)]
        fundamentals: PathBuf,
        /// 收盤價 CSV (time,symbol,close)
        #[arg(short, long)]
        bars: PathBuf,
        /// 執行時間 (RFC 3339 或 YYYY-MM-DD)
        #[arg(short, long)]
        time: String,
    },
}

fn main() -> Result<()> {
    // 配置載入失敗時使用預設值，命令列仍可執行
    let app_config = match config::init_config() {
        Ok(()) => config::get_config().clone(),
        Err(err) => {
            eprintln!("無法加載配置，改用預設值: {}", err);
            ApplicationConfig::default()
        }
    };

    init_logging(&app_config.log)?;

    let cli = Cli::parse();

    let report = match cli.command {
        Commands::LiquidUniverse { fundamentals, time } => {
            let algorithm = mean_reversion_algorithm(&app_config);
            let time = parse_time(&time).context("無法解析執行時間")?;
            run_step(algorithm, &fundamentals, &InMemoryHistoryProvider::new(), time, Vec::new())?
        }
        Commands::SectorUniverse {
            fundamentals,
            time,
            holdings,
        } => {
            let algorithm = SectorUniverseAlgorithm::new(
                app_config.algorithm.sector_universe.clone(),
                app_config.sector_universe.clone(),
            );
            let time = match time {
                Some(time) => parse_time(&time).context("無法解析執行時間")?,
                None => algorithm
                    .settings()
                    .start_date
                    .and_time(NaiveTime::MIN)
                    .and_utc(),
            };
            let holdings = holdings.into_iter().map(Symbol::from).collect();
            run_step(algorithm, &fundamentals, &InMemoryHistoryProvider::new(), time, holdings)?
        }
        Commands::MeanReversion {
            fundamentals,
            bars,
            time,
        } => {
            let algorithm = mean_reversion_algorithm(&app_config);
            let time = parse_time(&time).context("無法解析執行時間")?;
            let bars = load_bars(&bars)
                .with_context(|| format!("無法讀取K線檔案: {}", bars.display()))?;
            let provider = InMemoryHistoryProvider::from_bars(bars)
                .with_resolution(algorithm.settings().resolution);
            info!("已載入 {} 個代碼的K線", provider.symbol_count());
            run_step(algorithm, &fundamentals, &provider, time, Vec::new())?
        }
    };

    let output = serde_json::to_string_pretty(&report).context("無法序列化執行結果")?;
    println!("{}", output);
    Ok(())
}

fn mean_reversion_algorithm(app_config: &ApplicationConfig) -> MeanReversionAlgorithm {
    MeanReversionAlgorithm::new(
        app_config.algorithm.mean_reversion.clone(),
        app_config.liquid_universe.clone(),
        app_config.mean_reversion.clone(),
    )
}

// 執行單一時間步
fn run_step<A: Algorithm>(
    algorithm: A,
    fundamentals: &Path,
    history: &dyn HistoryProvider,
    time: DateTime<Utc>,
    holdings: Vec<Symbol>,
) -> Result<StepReport> {
    if !algorithm.settings().contains(time) {
        warn!(
            "執行時間 {} 不在回測區間 {} ~ {} 內",
            time,
            algorithm.settings().start_date,
            algorithm.settings().end_date
        );
    }

    let fundamentals = load_fundamentals(fundamentals)
        .with_context(|| format!("無法讀取基本面檔案: {}", fundamentals.display()))?;
    info!("已載入 {} 筆基本面記錄", fundamentals.len());

    let mut runner = StrategyRunner::new(algorithm).context("演算法初始化失敗")?;
    let ctx = AlgorithmContext::new(time).with_holdings(holdings);
    runner
        .step(&ctx, &fundamentals, history)
        .context("執行時間步失敗")
}

// 初始化日誌系統，輸出到 stderr 以保留 stdout 給執行結果
fn init_logging(log_config: &LogConfig) -> Result<()> {
    let level = match log_config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO, // 默認為INFO
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if log_config.format.eq_ignore_ascii_case("json") {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    info!("日誌系統初始化完成");
    Ok(())
}
