#![deny(warnings)]

//! Terminal front end: loads the trajectory documents, plays a scripted or
//! interactive session and prints the standings.

use anyhow::{bail, Context, Result};
use arena_core::{asset_groups, format_money, format_pct, CompetitorGroup, GameConfig};
use arena_runtime::{build_chart, render_svg, top_series, GameSession, Standings, StepOutcome};
use data_pipeline::synthetic::SyntheticMarket;
use data_pipeline::{
    load_benchmarks, load_game_data, BenchmarkCurves, DirSource, DocumentSource,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    name: Option<String>,
    weights: Vec<(String, f64)>,
    months: Option<usize>,
    interactive: bool,
    demo: bool,
    seed: Option<u64>,
    chart_out: Option<PathBuf>,
    json: bool,
    version: bool,
}

const USAGE: &str = "usage: arena [--config FILE] [--data-dir DIR | --demo [--seed N]] \
[--name NAME] [--weights T=W,...] [--months N] [--interactive] [--chart-out FILE.svg] [--json]";

fn parse_weights(list: &str) -> Result<Vec<(String, f64)>> {
    list.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            let (ticker, weight) = part
                .split_once('=')
                .with_context(|| format!("expected TICKER=WEIGHT, got {part:?}"))?;
            let weight: f64 = weight
                .trim()
                .parse()
                .with_context(|| format!("bad weight for {}", ticker.trim()))?;
            Ok((ticker.trim().to_string(), weight))
        })
        .collect()
}

fn parse_args<I: IntoIterator<Item = String>>(argv: I) -> Result<Args> {
    let mut args = Args::default();
    let mut it = argv.into_iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| it.next().with_context(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "--config" => args.config = Some(value("--config")?.into()),
            "--data-dir" => args.data_dir = Some(value("--data-dir")?.into()),
            "--name" => args.name = Some(value("--name")?),
            "--weights" => args.weights = parse_weights(&value("--weights")?)?,
            "--months" => args.months = Some(value("--months")?.parse().context("--months")?),
            "--seed" => args.seed = Some(value("--seed")?.parse().context("--seed")?),
            "--chart-out" => args.chart_out = Some(value("--chart-out")?.into()),
            "--interactive" | "-i" => args.interactive = true,
            "--demo" => args.demo = true,
            "--json" => args.json = true,
            "--version" | "-V" => args.version = true,
            "--help" | "-h" => bail!(USAGE),
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }
    Ok(args)
}

fn print_hud(session: &GameSession) {
    let hud = session.hud();
    println!("{hud}");
    let shadow = hud
        .shadow_single
        .map_or_else(|| "n/a".to_string(), format_money);
    println!(
        "  {}: {} ({}) | TRPO: {} | PPO: {} | {} B&H: {} | Equal-weight: {}",
        session.player_name(),
        format_money(hud.player_value),
        format_pct(hud.player_return),
        format_money(hud.trpo_value),
        format_money(hud.ppo_value),
        hud.shadow_ticker,
        shadow,
        format_money(hud.shadow_equal),
    );
}

fn print_allocation(session: &GameSession) {
    let alloc = session.allocation();
    for group in asset_groups(alloc.tickers()) {
        let cells: Vec<String> = group
            .tickers
            .iter()
            .filter_map(|t| alloc.get(t).map(|w| format!("{t} {w:.1}")))
            .collect();
        println!("  {:<12} {}", group.title, cells.join("  "));
    }
    println!(
        "  total {:.1} / {}",
        alloc.total(),
        arena_econ::FULL_ALLOCATION
    );
}

fn print_standings(standings: &Standings) {
    for (title, group) in [
        ("You", CompetitorGroup::You),
        ("Agents", CompetitorGroup::Agents),
        ("Benchmarks", CompetitorGroup::Benchmarks),
    ] {
        let rows = standings.group(group);
        if rows.is_empty() {
            continue;
        }
        println!("{title}");
        for row in rows {
            let medal = row.award.map_or("  ", |a| a.medal());
            let marker = if row.highlight { "*" } else { " " };
            println!(
                "  {medal}{marker} {:<22} {:>14} {:>8}",
                row.label,
                format_money(row.value),
                format_pct(row.return_since_start)
            );
        }
    }
}

/// Advance up to `months` times, stopping early on a refused step.
fn play_scripted(session: &mut GameSession, months: Option<usize>) {
    let months = months.unwrap_or(session.max_step());
    for _ in 0..months {
        match session.advance() {
            Ok(StepOutcome::Finished) => break,
            Ok(StepOutcome::Advanced { .. }) => {}
            Err(e) => {
                eprintln!("step refused: {e}");
                break;
            }
        }
    }
}

fn play_interactive(session: &mut GameSession) -> Result<()> {
    println!("commands: next [n], restart, set TICKER WEIGHT, weights, standings, quit");
    print_hud(session);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            return Ok(());
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["next" | "n", rest @ ..] => {
                let times = rest.first().and_then(|n| n.parse().ok()).unwrap_or(1);
                play_scripted(session, Some(times));
                print_hud(session);
            }
            ["restart" | "r"] => {
                session.restart()?;
                print_hud(session);
            }
            ["set", ticker, weight] => match weight.parse::<f64>() {
                Ok(w) => match session.set_allocation(ticker, w) {
                    Ok(()) => print_allocation(session),
                    Err(e) => eprintln!("{e}"),
                },
                Err(_) => eprintln!("weight must be a number"),
            },
            ["weights" | "w"] => print_allocation(session),
            ["standings" | "s"] => print_standings(&Standings::compute(session)),
            ["quit" | "q" | "exit"] => return Ok(()),
            _ => eprintln!("unknown command: {line}"),
        }
    }
}

/// Start a session as soon as the trajectories are in, then attach the
/// independently fetched benchmarks. A fatal trajectory failure returns
/// without waiting on the benchmark fetch.
async fn open_session<S: DocumentSource>(
    source: &S,
    config: GameConfig,
    name: Option<&str>,
) -> Result<GameSession> {
    let capital = config.starting_capital;
    let documents = config.documents.clone();
    let mut session = GameSession::new(config, name);

    let trajectories = load_game_data(source, &documents, capital);
    let benchmarks = load_benchmarks(source, &documents.benchmarks, capital);
    tokio::pin!(trajectories, benchmarks);
    let mut early: Option<Option<BenchmarkCurves>> = None;
    let data = loop {
        tokio::select! {
            data = &mut trajectories => break data,
            curves = &mut benchmarks, if early.is_none() => early = Some(curves),
        }
    };

    let data = match data {
        Ok(data) => data,
        Err(e) => {
            session.fail_load(&e);
            session.close();
            if let Some(curves) = early {
                session.attach_benchmarks(curves);
            }
            bail!("game could not start: {e}");
        }
    };
    session.load(data).context("assembled game data is invalid")?;
    let curves = match early {
        Some(curves) => curves,
        None => {
            info!("session ready, waiting for benchmarks");
            benchmarks.await
        }
    };
    session.attach_benchmarks(curves);
    Ok(session)
}

async fn run<S: DocumentSource>(source: &S, config: GameConfig, args: &Args) -> Result<()> {
    let mut session = open_session(source, config, args.name.as_deref()).await?;

    for (ticker, weight) in &args.weights {
        session
            .set_allocation(ticker, *weight)
            .with_context(|| format!("--weights {ticker}={weight}"))?;
    }

    if args.interactive {
        play_interactive(&mut session)?;
    } else {
        play_scripted(&mut session, args.months);
    }

    let standings = Standings::compute(&session);
    if args.json {
        let report = serde_json::json!({
            "hud": session.hud(),
            "standings": standings,
            "narrative": standings.narrative().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_hud(&session);
        print_standings(&standings);
        if session.hud().finished {
            println!("{}", standings.narrative());
        }
    }

    if let Some(path) = &args.chart_out {
        let series = top_series(&session, &standings, 3);
        let dates = session.data().map(|d| d.dates.as_slice()).unwrap_or(&[]);
        match build_chart(dates, &series) {
            Some(model) => {
                tokio::fs::write(path, render_svg(&model))
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "chart written");
            }
            None => warn!("nothing to chart yet"),
        }
    }
    session.close();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!("arena {} ({})", env!("CARGO_PKG_VERSION"), env!("ARENA_BUILD"));
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    // Logging setup
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    info!(config = ?args.config, demo = args.demo, "starting arena");

    if args.demo {
        let market = SyntheticMarket {
            seed: args.seed.unwrap_or(42),
            ..Default::default()
        };
        let source = market
            .generate()
            .into_source(&config.documents)
            .context("serialising demo market")?;
        run(&source, config, &args).await
    } else {
        let dir = args.data_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        run(&DirSource::new(dir), config, &args).await
    }
}
