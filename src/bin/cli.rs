//! Bankroll CLI - Command-line interface for the bankroll ledger and calculators

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bankroll::analytics::build_report;
use bankroll::core::compounding::{
    days_to_target, project_balance_over_time, DaysToTarget, MAX_PROJECTION_DAYS,
};
use bankroll::core::kelly::recommend_stake;
use bankroll::core::streak::{survival_table, StreakKind};
use bankroll::error::{validate_amount, validate_odds, validate_reinvestment};
use bankroll::models::{
    CreateStreamRequest, PlaceBetRequest, SelectionId, SelectionRequest, StreamDetail,
};
use bankroll::{Bet, BetStatus, LedgerStore, Outcome, Stream, StreamStatus};

const DEFAULT_LEDGER: &str = "ledger.json";
const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Parser)]
#[command(name = "bankroll")]
#[command(author, version, about = "Betting bankroll and compounding stream tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Path to the JSON ledger (created on first use)
    #[arg(long, default_value = DEFAULT_LEDGER)]
    ledger: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Kelly stake recommendation
    Kelly {
        #[arg(short, long)]
        bankroll: f64,

        /// Decimal odds
        #[arg(short, long)]
        odds: f64,

        /// Estimated win probability (0-1)
        #[arg(short, long)]
        probability: f64,
    },

    /// Best-case compounding projection
    Project {
        #[arg(short, long)]
        stake: f64,

        #[arg(short, long)]
        odds: f64,

        /// Fraction of each winning balance that is kept in play
        #[arg(short, long, default_value = "1.0")]
        reinvest: f64,

        #[arg(short, long, default_value = "30", value_parser = projection_days())]
        days: u32,
    },

    /// Winning days needed to reach a target balance
    DaysToTarget {
        #[arg(short, long)]
        current: f64,

        #[arg(short, long)]
        target: f64,

        #[arg(short, long)]
        odds: f64,

        #[arg(short, long, default_value = "1.0")]
        reinvest: f64,
    },

    /// Probability of surviving N consecutive days
    Survival {
        /// Per-day win rate (0-1)
        #[arg(short, long)]
        win_rate: f64,

        /// Horizons in days
        #[arg(short, long, value_delimiter = ',', default_values_t = [5, 10, 20, 30])]
        days: Vec<u32>,
    },

    /// Show the bankroll
    Bankroll,

    /// Add capital to the bankroll
    Deposit { amount: f64 },

    /// Take available capital out of the bankroll
    Withdraw { amount: f64 },

    /// Fund a new stream from available capital
    CreateStream {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        stake: f64,

        /// Target daily odds
        #[arg(short, long)]
        odds: f64,

        #[arg(short, long, default_value = "1.0")]
        reinvest: f64,

        /// Balance at which the stream counts as finished
        #[arg(long)]
        target_balance: Option<f64>,

        #[arg(long)]
        target_days: Option<u32>,
    },

    /// List streams
    Streams,

    /// Stream detail with bets and projection
    Stream {
        id: u64,

        /// Projection horizon
        #[arg(long, default_value = "10", value_parser = projection_days())]
        days: u32,
    },

    /// Place a bet on a stream
    PlaceBet {
        /// Stream id
        stream: u64,

        #[arg(short, long)]
        stake: f64,

        /// Selection as NAME@ODDS[,p=PROB][,league=ID][,market=ID]; repeat for accumulators
        #[arg(short = 'l', long = "selection", required = true)]
        selections: Vec<String>,
    },

    /// Settle a pending bet
    Settle {
        /// Bet id
        bet: u64,

        /// Outcomes as SELECTION_ID=won|lost|void; prompts when omitted
        outcomes: Vec<String>,
    },

    /// Cash part of a stream's balance back to the bankroll
    Cashout { stream: u64, amount: f64 },

    /// Close a stream and release its balance
    Complete { stream: u64 },

    /// Performance statistics
    Stats,

    /// Leagues and market types with hit rates
    Reference,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("{}", format!("Bankroll CLI v{}", env!("CARGO_PKG_VERSION")).cyan().bold());
    println!();

    if cli.interactive {
        run_interactive(&cli.ledger)?;
    } else if let Some(command) = cli.command {
        run_command(&cli.ledger, command)?;
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

/// Projection horizons are capped like the HTTP calculators
fn projection_days() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(..=i64::from(MAX_PROJECTION_DAYS))
}

fn open_store(path: &Path) -> Result<LedgerStore> {
    LedgerStore::open(path, DEFAULT_CURRENCY)
        .with_context(|| format!("Failed to open ledger at {:?}", path))
}

fn run_command(ledger_path: &Path, command: Commands) -> Result<()> {
    match command {
        Commands::Kelly {
            bankroll,
            odds,
            probability,
        } => show_kelly(bankroll, odds, probability),
        Commands::Project {
            stake,
            odds,
            reinvest,
            days,
        } => show_projection(stake, odds, reinvest, days),
        Commands::DaysToTarget {
            current,
            target,
            odds,
            reinvest,
        } => show_days_to_target(current, target, odds, reinvest),
        Commands::Survival { win_rate, days } => show_survival(win_rate, &days),
        Commands::Bankroll => {
            let store = open_store(ledger_path)?;
            show_bankroll(&store)
        }
        Commands::Deposit { amount } => {
            let store = open_store(ledger_path)?;
            store.transaction(|l| l.deposit(amount).map(|_| ()))?;
            println!("{} {:.2}", "Deposited".green(), amount);
            show_bankroll(&store)
        }
        Commands::Withdraw { amount } => {
            let store = open_store(ledger_path)?;
            store.transaction(|l| l.withdraw(amount).map(|_| ()))?;
            println!("{} {:.2}", "Withdrew".green(), amount);
            show_bankroll(&store)
        }
        Commands::CreateStream {
            name,
            stake,
            odds,
            reinvest,
            target_balance,
            target_days,
        } => {
            let store = open_store(ledger_path)?;
            let req = CreateStreamRequest {
                name,
                initial_stake: stake,
                target_daily_odds: odds,
                reinvestment_percentage: reinvest,
                target_balance,
                target_days,
            };
            let stream = store.transaction(|l| l.create_stream(&req).cloned())?;
            println!("{}: #{} {}", "Created stream".green(), stream.id, stream.name);
            Ok(())
        }
        Commands::Streams => {
            let store = open_store(ledger_path)?;
            let streams: Vec<Stream> = store.read(|l| l.streams.values().cloned().collect())?;
            print_streams(&streams);
            Ok(())
        }
        Commands::Stream { id, days } => {
            let store = open_store(ledger_path)?;
            let detail = store.read(|l| l.stream_detail(id, days))??;
            print_stream_detail(&detail);
            Ok(())
        }
        Commands::PlaceBet {
            stream,
            stake,
            selections,
        } => {
            let store = open_store(ledger_path)?;
            let req = PlaceBetRequest {
                stake,
                selections: selections
                    .iter()
                    .map(|s| parse_selection(s))
                    .collect::<Result<Vec<_>>>()?,
            };
            let bet = store.transaction(|l| l.place_bet(stream, &req).cloned())?;
            println!(
                "{}: #{} stake {:.2} @ {:.2}",
                "Placed bet".green(),
                bet.id,
                bet.stake,
                bet.total_odds
            );
            print_selections(&bet);
            Ok(())
        }
        Commands::Settle { bet, outcomes } => {
            let store = open_store(ledger_path)?;
            settle(&store, bet, &outcomes)
        }
        Commands::Cashout { stream, amount } => {
            let store = open_store(ledger_path)?;
            let stream = store.transaction(|l| l.cash_out(stream, amount).cloned())?;
            println!(
                "{} {:.2} from #{}, balance now {:.2}",
                "Cashed out".green(),
                amount,
                stream.id,
                stream.current_balance
            );
            Ok(())
        }
        Commands::Complete { stream } => {
            let store = open_store(ledger_path)?;
            let stream = store.transaction(|l| l.complete_stream(stream).cloned())?;
            println!("{}: #{} {}", "Completed".green(), stream.id, stream.name);
            Ok(())
        }
        Commands::Stats => {
            let store = open_store(ledger_path)?;
            show_stats(&store)
        }
        Commands::Reference => {
            let store = open_store(ledger_path)?;
            show_reference(&store)
        }
    }
}

fn show_kelly(bankroll: f64, odds: f64, probability: f64) -> Result<()> {
    let rec = recommend_stake(bankroll, odds, probability);

    println!("{}", "Kelly Recommendation:".yellow().bold());
    println!("  Implied probability: {:>8.2}%", rec.implied_probability * 100.0);
    println!("  Edge:                {:>8.2}%", rec.edge_percentage);
    println!("  Expected value:      {:>8.4}", rec.expected_value);
    println!("  Kelly fraction:      {:>8.4}", rec.kelly_fraction);
    println!();

    if !rec.is_value_bet {
        println!("{}", "Not a value bet, no stake recommended.".red());
        return Ok(());
    }

    println!("{:>10} {:>12}", "Sizing", "Stake");
    println!("{}", "-".repeat(24));
    println!("{:>10} {:>12.2}", "Full", rec.recommended_stake);
    println!("{:>10} {:>12.2}", "Half", rec.half_kelly_stake);
    println!("{:>10} {:>12.2}", "Quarter", rec.quarter_kelly_stake);
    Ok(())
}

fn show_projection(stake: f64, odds: f64, reinvest: f64, days: u32) -> Result<()> {
    validate_amount("Stake", stake)?;
    validate_odds(odds)?;
    validate_reinvestment(reinvest)?;

    println!(
        "{}: {:.2} @ {:.2}, reinvesting {:.0}%",
        "Projection".green(),
        stake,
        odds,
        reinvest * 100.0
    );
    println!();
    println!("{:>5} {:>14} {:>14} {:>14}", "Day", "Balance", "Cashed out", "Profit");
    println!("{}", "-".repeat(50));

    for point in project_balance_over_time(stake, odds, reinvest, days) {
        println!(
            "{:>5} {:>14.2} {:>14.2} {:>14.2}",
            point.day, point.balance, point.total_cashed_out, point.cumulative_profit
        );
    }
    Ok(())
}

fn show_days_to_target(current: f64, target: f64, odds: f64, reinvest: f64) -> Result<()> {
    validate_amount("Current balance", current)?;
    validate_amount("Target balance", target)?;
    validate_odds(odds)?;
    validate_reinvestment(reinvest)?;

    match days_to_target(current, target, odds, reinvest) {
        DaysToTarget::Days(days) => println!(
            "{} {:.2} -> {:.2} in {} winning day(s)",
            "Reachable:".green(),
            current,
            target,
            days
        ),
        DaysToTarget::Unreachable => println!(
            "{} the balance never grows at these odds and reinvestment",
            "Unreachable:".red()
        ),
    }
    Ok(())
}

fn show_survival(win_rate: f64, days: &[u32]) -> Result<()> {
    if !(0.0..=1.0).contains(&win_rate) {
        bail!("Win rate must be between 0 and 1, got {}", win_rate);
    }

    println!("{}", "Survival Probability:".yellow().bold());
    println!("{:>6} {:>12}", "Days", "Survival");
    println!("{}", "-".repeat(20));
    for row in survival_table(win_rate, days) {
        println!("{:>6} {:>11.2}%", row.days, row.probability * 100.0);
    }
    Ok(())
}

fn show_bankroll(store: &LedgerStore) -> Result<()> {
    let bankroll = store.read(|l| l.bankroll.clone())?;

    println!("{} ({})", "Bankroll:".yellow().bold(), bankroll.currency);
    println!("  Total capital:     {:>12.2}", bankroll.total_capital);
    println!("  Available:         {:>12.2}", bankroll.available_capital);
    println!("  Deployed:          {:>12.2}", bankroll.deployed_capital);
    println!(
        "  Lifetime P/L:      {}",
        signed(bankroll.lifetime_profit_loss, 12)
    );
    Ok(())
}

fn print_streams(streams: &[Stream]) {
    if streams.is_empty() {
        println!("{}", "No streams yet.".dimmed());
        return;
    }

    println!(
        "{:>4} {:<20} {:>10} {:>7} {:>8} {:>5} {:>10}",
        "ID", "Name", "Balance", "Odds", "Reinv", "Day", "Status"
    );
    println!("{}", "-".repeat(70));
    for s in streams {
        println!(
            "{:>4} {:<20} {:>10.2} {:>7.2} {:>7.0}% {:>5} {:>10}",
            s.id,
            truncate_name(&s.name, 20),
            s.current_balance,
            s.target_daily_odds,
            s.reinvestment_percentage * 100.0,
            s.current_day,
            stream_status_label(s.status)
        );
    }
}

fn print_stream_detail(detail: &StreamDetail) {
    let s = &detail.stream;
    println!("{} #{} {}", "Stream".yellow().bold(), s.id, s.name.bold());
    println!("  Status:        {}", stream_status_label(s.status));
    println!("  Balance:       {:.2} (started {:.2})", s.current_balance, s.initial_stake);
    println!("  Day:           {}", s.current_day);
    println!("  Cashed out:    {:.2}", s.total_cashed_out);
    println!("  Win rate:      {:.1}%", detail.win_rate * 100.0);

    let streak = match detail.streak.kind {
        StreakKind::Win => format!("{} won", detail.streak.count).green(),
        StreakKind::Lose => format!("{} lost", detail.streak.count).red(),
        StreakKind::None => "-".normal(),
    };
    println!("  Streak:        {}", streak);
    println!(
        "  Longest:       {} won / {} lost",
        detail.longest_streaks.longest_win, detail.longest_streaks.longest_lose
    );

    if let Some(target) = s.target_balance {
        let eta = match detail.days_to_target {
            Some(DaysToTarget::Days(d)) => format!("{} winning day(s) away", d),
            _ => "unreachable".to_string(),
        };
        let reached = if detail.target_reached {
            "reached".green()
        } else {
            eta.normal()
        };
        println!("  Target:        {:.2} ({})", target, reached);
    }
    println!();

    if !detail.bets.is_empty() {
        println!("{}", "Bets:".yellow().bold());
        println!(
            "{:>4} {:>4} {:>10} {:>7} {:>10} {:>10}",
            "ID", "Day", "Stake", "Odds", "P/L", "Status"
        );
        println!("{}", "-".repeat(50));
        for bet in &detail.bets {
            let pl = bet
                .profit_loss
                .map(|p| signed(p, 10))
                .unwrap_or_else(|| format!("{:>10}", "-").normal());
            println!(
                "{:>4} {:>4} {:>10.2} {:>7.2} {} {:>10}",
                bet.id,
                bet.day,
                bet.stake,
                bet.total_odds,
                pl,
                bet_status_label(bet.status)
            );
        }
        println!();
    }

    println!("{}", "Projection (all days won):".yellow().bold());
    println!("{:>5} {:>14} {:>14}", "Day", "Balance", "Cashed out");
    println!("{}", "-".repeat(35));
    for point in &detail.projection {
        println!(
            "{:>5} {:>14.2} {:>14.2}",
            point.day, point.balance, point.total_cashed_out
        );
    }
}

fn print_selections(bet: &Bet) {
    println!("{:>6} {:<30} {:>7} {:>8}", "Sel", "Market", "Odds", "Status");
    println!("{}", "-".repeat(54));
    for sel in &bet.selections {
        println!(
            "{:>6} {:<30} {:>7.2} {:>8}",
            sel.id,
            truncate_name(&sel.market, 30),
            sel.odds,
            bet_status_label(sel.status)
        );
    }
}

/// Settle from command-line outcomes, or prompt for each selection
fn settle(store: &LedgerStore, bet_id: u64, raw: &[String]) -> Result<()> {
    let outcomes = if raw.is_empty() {
        let bet = store.read(|l| l.bet(bet_id).cloned())??;
        prompt_outcomes(&bet)?
    } else {
        raw.iter()
            .map(|s| parse_outcome(s))
            .collect::<Result<BTreeMap<_, _>>>()?
    };

    let report = store.transaction(|l| l.settle_bet(bet_id, &outcomes))?;

    println!(
        "{}: bet #{} {}",
        "Settled".green(),
        report.bet.id,
        bet_status_label(report.bet.status)
    );
    if let Some(pl) = report.bet.profit_loss {
        println!("  Profit/loss:   {}", signed(pl, 0));
    }
    println!(
        "  Stream #{}:     balance {:.2}, day {}, {}",
        report.stream.id,
        report.stream.current_balance,
        report.stream.current_day,
        stream_status_label(report.stream.status)
    );
    println!(
        "  Bankroll:      total {:.2}, lifetime P/L {}",
        report.bankroll.total_capital,
        signed(report.bankroll.lifetime_profit_loss, 0)
    );
    Ok(())
}

fn prompt_outcomes(bet: &Bet) -> Result<BTreeMap<SelectionId, Outcome>> {
    if bet.status.is_settled() {
        bail!("Bet #{} is already settled", bet.id);
    }

    let theme = ColorfulTheme::default();
    let choices = ["Won", "Lost", "Void"];
    let mut outcomes = BTreeMap::new();

    for sel in &bet.selections {
        let pick = Select::with_theme(&theme)
            .with_prompt(format!("{} @ {:.2}", sel.market, sel.odds))
            .items(&choices)
            .default(0)
            .interact()?;
        let outcome = match pick {
            0 => Outcome::Won,
            1 => Outcome::Lost,
            _ => Outcome::Void,
        };
        outcomes.insert(sel.id, outcome);
    }
    Ok(outcomes)
}

fn show_stats(store: &LedgerStore) -> Result<()> {
    let report = store.read(build_report)?;
    let m = &report.metrics;

    println!("{}", "Performance:".yellow().bold());
    println!(
        "  Settled bets:  {} ({} won / {} lost / {} void), {} pending",
        m.settled_bets, m.winning_bets, m.losing_bets, m.void_bets, m.pending_bets
    );
    println!("  Hit rate:      {:.1}%", m.hit_rate * 100.0);
    println!("  Staked:        {:.2}", m.total_staked);
    println!("  Returns:       {:.2}", m.total_returns);
    println!("  Net profit:    {}", signed(m.net_profit, 0));
    println!("  ROI:           {:.1}%", m.roi * 100.0);
    println!("  Avg odds:      {:.2}", m.avg_odds);
    println!("  Profit factor: {:.2}", m.profit_factor);
    println!(
        "  Max drawdown:  {:.2} ({:.1}%)",
        m.max_drawdown,
        m.max_drawdown_pct * 100.0
    );
    if let Some(edge) = report.average_selection_edge {
        println!("  Avg edge:      {:.2}%", edge * 100.0);
    }

    for (title, rows) in [
        ("By Stream:", &report.by_stream),
        ("By Odds Range:", &report.by_odds_range),
    ] {
        if rows.is_empty() {
            continue;
        }
        println!("\n{}", title.yellow().bold());
        println!(
            "{:<20} {:>6} {:>6} {:>8} {:>10} {:>10} {:>8}",
            "Key", "Bets", "Wins", "Hit", "Stake", "Profit", "ROI"
        );
        println!("{}", "-".repeat(74));
        for row in rows {
            println!(
                "{:<20} {:>6} {:>6} {:>7.1}% {:>10.2} {} {:>7.1}%",
                truncate_name(&row.key, 20),
                row.bets,
                row.wins,
                row.hit_rate * 100.0,
                row.stake,
                signed(row.profit, 10),
                row.roi * 100.0
            );
        }
    }
    Ok(())
}

fn show_reference(store: &LedgerStore) -> Result<()> {
    let report = store.read(build_report)?;

    for (title, rows) in [
        ("Leagues:", &report.leagues),
        ("Market Types:", &report.market_types),
    ] {
        println!("{}", title.yellow().bold());
        println!(
            "{:>4} {:<22} {:>9} {:>9} {:>9} {:>8}",
            "ID", "Name", "Baseline", "Actual", "Picks", "Edge"
        );
        println!("{}", "-".repeat(66));
        for row in rows {
            println!(
                "{:>4} {:<22} {:>8.1}% {:>8.1}% {:>4}/{:<4} {:>+7.1}%",
                row.id,
                truncate_name(&row.name, 22),
                row.baseline_probability * 100.0,
                row.actual_hit_rate * 100.0,
                row.won_selections,
                row.total_selections,
                row.edge_vs_baseline * 100.0
            );
        }
        println!();
    }
    Ok(())
}

fn run_interactive(ledger_path: &Path) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!("Ledger: {:?}\n", ledger_path);

    let theme = ColorfulTheme::default();

    loop {
        let options = vec![
            "Show bankroll",
            "List streams",
            "Show stream",
            "Settle a bet",
            "Kelly calculator",
            "Stats",
            "Quit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        println!();
        let result = match selection {
            0 => run_command(ledger_path, Commands::Bankroll),
            1 => run_command(ledger_path, Commands::Streams),
            2 => {
                let id: u64 = Input::with_theme(&theme)
                    .with_prompt("Stream id")
                    .interact_text()?;
                run_command(ledger_path, Commands::Stream { id, days: 10 })
            }
            3 => {
                let bet: u64 = Input::with_theme(&theme)
                    .with_prompt("Bet id")
                    .interact_text()?;
                run_command(
                    ledger_path,
                    Commands::Settle {
                        bet,
                        outcomes: Vec::new(),
                    },
                )
            }
            4 => {
                let bankroll: f64 = Input::with_theme(&theme)
                    .with_prompt("Bankroll")
                    .default(1000.0)
                    .interact_text()?;
                let odds: f64 = Input::with_theme(&theme)
                    .with_prompt("Decimal odds")
                    .interact_text()?;
                let probability: f64 = Input::with_theme(&theme)
                    .with_prompt("Win probability (0-1)")
                    .interact_text()?;
                show_kelly(bankroll, odds, probability)
            }
            5 => run_command(ledger_path, Commands::Stats),
            _ => {
                println!("Goodbye!");
                break;
            }
        };

        // Keep the session alive on rejected commands
        if let Err(e) = result {
            println!("{} {:#}", "Error:".red().bold(), e);
        }
        println!();
    }

    Ok(())
}

/// Parse `NAME@ODDS[,p=PROB][,league=ID][,market=ID]`
fn parse_selection(raw: &str) -> Result<SelectionRequest> {
    let mut parts = raw.split(',');
    let head = parts.next().unwrap_or_default();
    let (market, odds) = head
        .rsplit_once('@')
        .ok_or_else(|| anyhow!("Selection '{}' must look like NAME@ODDS", raw))?;

    let mut selection = SelectionRequest {
        market: market.trim().to_string(),
        odds: odds
            .trim()
            .parse()
            .with_context(|| format!("Invalid odds in selection '{}'", raw))?,
        estimated_probability: None,
        league_id: None,
        market_type_id: None,
    };

    for part in parts {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected key=value, got '{}'", part))?;
        let value = value.trim();
        match key.trim() {
            "p" => {
                selection.estimated_probability = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid probability '{}'", value))?,
                )
            }
            "league" => {
                selection.league_id = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid league id '{}'", value))?,
                )
            }
            "market" => {
                selection.market_type_id = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid market type id '{}'", value))?,
                )
            }
            other => bail!("Unknown selection attribute '{}'", other),
        }
    }

    Ok(selection)
}

/// Parse `SELECTION_ID=OUTCOME`
fn parse_outcome(raw: &str) -> Result<(SelectionId, Outcome)> {
    let (id, outcome) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Outcome '{}' must look like SELECTION_ID=won|lost|void", raw))?;
    let id: SelectionId = id
        .trim()
        .parse()
        .with_context(|| format!("Invalid selection id in '{}'", raw))?;
    let outcome: Outcome = outcome.parse().map_err(|e: String| anyhow!(e))?;
    Ok((id, outcome))
}

fn stream_status_label(status: StreamStatus) -> ColoredString {
    match status {
        StreamStatus::Active => "active".cyan(),
        StreamStatus::Completed => "completed".green(),
        StreamStatus::Failed => "failed".red(),
    }
}

fn bet_status_label(status: BetStatus) -> ColoredString {
    match status {
        BetStatus::Pending => "pending".yellow(),
        BetStatus::Won => "won".green(),
        BetStatus::Lost => "lost".red(),
        BetStatus::Void => "void".dimmed(),
    }
}

/// Right-aligned signed amount, green when positive and red when negative
fn signed(amount: f64, width: usize) -> ColoredString {
    let text = format!("{:>+width$.2}", amount, width = width);
    if amount > 0.0 {
        text.green()
    } else if amount < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}

/// Truncate name to fit display width
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        let sel = parse_selection("Arsenal v Spurs - Over 1.5@1.25,p=0.82,league=1,market=8").unwrap();
        assert_eq!(sel.market, "Arsenal v Spurs - Over 1.5");
        assert_eq!(sel.odds, 1.25);
        assert_eq!(sel.estimated_probability, Some(0.82));
        assert_eq!(sel.league_id, Some(1));
        assert_eq!(sel.market_type_id, Some(8));

        let plain = parse_selection("Home@2.0").unwrap();
        assert!(plain.estimated_probability.is_none());

        assert!(parse_selection("no odds here").is_err());
        assert!(parse_selection("Home@abc").is_err());
        assert!(parse_selection("Home@2.0,colour=red").is_err());
    }

    #[test]
    fn test_parse_outcome() {
        assert_eq!(parse_outcome("14=won").unwrap(), (14, Outcome::Won));
        assert_eq!(parse_outcome("3=V").unwrap(), (3, Outcome::Void));
        assert!(parse_outcome("3").is_err());
        assert!(parse_outcome("x=won").is_err());
        assert!(parse_outcome("3=pending").is_err());
    }

    #[test]
    fn test_projection_days_capped() {
        let ok = Cli::try_parse_from(["bankroll", "project", "-s", "50", "-o", "1.1", "-d", "3650"]);
        assert!(ok.is_ok());

        for args in [
            vec!["bankroll", "project", "-s", "50", "-o", "1.1", "-d", "3651"],
            vec!["bankroll", "project", "-s", "50", "-o", "1.1", "-d", "4000000000"],
            vec!["bankroll", "stream", "1", "--days", "4000000000"],
        ] {
            assert!(Cli::try_parse_from(args).is_err());
        }
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 10), "short");
        assert_eq!(truncate_name("abcdefghij", 5), "abcd…");
    }
}
