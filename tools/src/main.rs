//! match-sim：無介面的電腦對戰驅動程式
//!
//! 載入單位目錄與規則，洗牌後讓雙方 AI 對戰，輸出回合紀錄；`--json` 時最後輸出摘要。

mod report;
mod sim;

use anyhow::{Context, Result};
use clap::Parser;
use report::MatchReport;
use sim::{SimOptions, play_match};
use std::path::PathBuf;
use std::sync::Arc;
use tactics_lib::{Catalog, Rules, UnitId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "match-sim", version, about = "戰棋規則引擎的電腦對戰模擬")]
struct Cli {
    /// 單位目錄 TOML，省略時使用內建目錄
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// 規則 TOML，省略時使用標準 7×7 規則
    #[arg(long)]
    rules: Option<PathBuf>,

    /// 洗牌種子，第 n 場使用 seed + n
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// 對戰場數
    #[arg(long, default_value_t = 1)]
    matches: u64,

    /// 每場回合上限，超過視為和局
    #[arg(long, default_value_t = 200)]
    max_turns: u64,

    /// 雙方牌組（逗號分隔），省略時為目錄中每種單位各兩張
    #[arg(long, value_delimiter = ',')]
    deck: Vec<UnitId>,

    /// 以示範布陣直接開戰，略過抽牌與部署
    #[arg(long)]
    demo: bool,

    /// 輸出 JSON 摘要，不印回合紀錄
    #[arg(long)]
    json: bool,
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::builtin()?);
    };
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("無法讀取單位目錄 {}", path.display()))?;
    Catalog::from_toml_str(&src).with_context(|| format!("單位目錄 {} 不合法", path.display()))
}

fn load_rules(path: Option<&PathBuf>) -> Result<Rules> {
    let Some(path) = path else {
        return Ok(Rules::default());
    };
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("無法讀取規則 {}", path.display()))?;
    Rules::from_toml_str(&src).with_context(|| format!("規則 {} 不合法", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = Arc::new(load_catalog(cli.catalog.as_ref())?);
    let rules = load_rules(cli.rules.as_ref())?;
    let deck = if cli.deck.is_empty() {
        catalog
            .unit_ids()
            .flat_map(|id| [id.clone(), id.clone()])
            .collect()
    } else {
        cli.deck.clone()
    };

    let options = SimOptions {
        max_turns: cli.max_turns,
        demo: cli.demo,
        verbose: !cli.json,
    };
    let mut reports: Vec<MatchReport> = Vec::new();
    for n in 0..cli.matches {
        let seed = cli.seed + n;
        let report = play_match(Arc::clone(&catalog), &rules, &deck, n, seed, &options)
            .with_context(|| format!("第 {n} 場（seed {seed}）"))?;
        reports.push(report);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        report::print_summary(&reports);
    }
    Ok(())
}
