//! Taka main entry point

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

use taka_config::{Config, ConfigError, SymbolPosition};
use taka_core::{RecordKind, RecordPatch};
use taka_source::{load_seed, MemorySource, SourceRef};
use taka_utils::format_with_symbol;
use taka_views::{
    ExpenseFeed, FeedSnapshot, MonthlySnapshot, MonthlyView, RecordTable, SummaryView,
    TableSnapshot,
};

#[derive(Parser, Debug)]
#[command(name = "taka")]
#[command(author = "Taka Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A personal expense and income tracker with cursor-paginated listings", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "taka.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    surface: Option<Surface>,
}

#[derive(Subcommand, Debug)]
enum Surface {
    /// Browse expenses as a phone-sized feed
    Feed,
    /// Browse a record table ("expense" or "income")
    Table { kind: Option<String> },
    /// Browse monthly totals ("expense" or "income")
    Monthly { kind: Option<String> },
    /// Print income, expense and net totals
    Summary,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let rt = Runtime::new()?;

    rt.block_on(run(args))
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match Config::load(args.config.clone()) {
        Ok(config) => {
            eprintln!("[INFO] Config loaded: {}", args.config.display());
            config
        }
        Err(ConfigError::FileNotFound { path }) => {
            eprintln!("[WARN] Config file not found: {}, using defaults", path);
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    let seed_path = config.seed_path();
    let (source, user) = match load_seed(seed_path.clone()).await {
        Ok(seed) => {
            let source = MemorySource::from_seed(&seed);
            eprintln!(
                "[INFO] Seed loaded: {} expenses, {} incomes",
                source.len(RecordKind::Expense),
                source.len(RecordKind::Income)
            );
            (source, seed.user_id)
        }
        Err(e) => {
            eprintln!(
                "[WARN] Seed file not usable ({}): {}, starting empty",
                seed_path.display(),
                e
            );
            (MemorySource::new(), uuid::Uuid::new_v4())
        }
    };
    let source: SourceRef = Arc::new(source);

    match args.surface.unwrap_or(Surface::Feed) {
        Surface::Feed => drive_feed(source, &config, user).await,
        Surface::Table { kind } => {
            let kind = parse_kind(kind)?;
            drive_table(kind, source, &config, user).await
        }
        Surface::Monthly { kind } => {
            let kind = parse_kind(kind)?;
            drive_monthly(kind, source, &config, user).await
        }
        Surface::Summary => {
            let mut view = SummaryView::new(source, &config);
            view.set_user(Some(user));
            let snap = view.load().await?;
            println!("Income:  {}", money(&snap.summary.total_income, &config));
            println!("Expense: {}", money(&snap.summary.total_expense, &config));
            println!("Net:     {}", money(&snap.summary.net, &config));
            Ok(())
        }
    }
}

fn parse_kind(kind: Option<String>) -> Result<RecordKind, Box<dyn std::error::Error>> {
    match kind {
        Some(kind) => Ok(kind.parse::<RecordKind>()?),
        None => Ok(RecordKind::Expense),
    }
}

fn money(amount: &rust_decimal::Decimal, config: &Config) -> String {
    let before = matches!(config.currency.position, SymbolPosition::Before);
    format_with_symbol(amount, &config.currency.symbol, before)
}

fn prompt(surface: &str) -> Option<String> {
    print!("{}> ", surface);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

// ==================== Feed ====================

async fn drive_feed(
    source: SourceRef,
    config: &Config,
    user: uuid::Uuid,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut feed = ExpenseFeed::new(source, config);
    feed.set_user(Some(user));

    match feed.load().await {
        Ok(snap) => print_feed(&snap, config),
        Err(e) => eprintln!("[ERROR] {}", e),
    }
    print_feed_help();

    while let Some(line) = prompt("feed") {
        let outcome = match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] => continue,
            ["q"] => break,
            ["n"] => feed.next_page().await,
            ["p"] => feed.prev_page().await,
            ["r"] => feed.refresh().await,
            ["c"] => feed.clear_date_filter().await,
            ["d", date] => match date.parse() {
                Ok(date) => feed.set_date_filter(date).await,
                Err(_) => {
                    eprintln!("[WARN] expected d YYYY-MM-DD");
                    continue;
                }
            },
            ["s", rest @ ..] => Ok(feed.set_search_text(rest.join(" "))),
            ["a", name, amount, date] => match parse_entry(amount, date) {
                Ok((amount, date)) => feed.add(name.to_string(), amount, date).await,
                Err(message) => {
                    eprintln!("[WARN] {}", message);
                    continue;
                }
            },
            ["x", id] => match id.parse() {
                Ok(id) => feed.remove(id).await,
                Err(_) => {
                    eprintln!("[WARN] expected x <record id>");
                    continue;
                }
            },
            _ => {
                print_feed_help();
                continue;
            }
        };
        match outcome {
            Ok(snap) => print_feed(&snap, config),
            Err(e) => eprintln!("[ERROR] {}", e),
        }
    }
    Ok(())
}

fn print_feed_help() {
    println!("commands: n p r d <date> c s <text> a <source> <amount> <date> x <id> q");
}

fn print_feed(snap: &FeedSnapshot, config: &Config) {
    if snap.pending_auth {
        println!("(signed out)");
        return;
    }
    for row in &snap.rows {
        println!(
            "  {}  {:10}  {}  [{}]",
            row.date.format("%Y-%m-%d %H:%M"),
            money(&row.amount, config),
            row.source,
            row.id.as_simple()
        );
    }
    println!(
        "page {} of expenses{}  visible total {}{}{}",
        snap.page_number,
        match snap.total_count {
            Some(total) => format!(" ({} matching)", total),
            None => String::new(),
        },
        money(&snap.page_total, config),
        match snap.date_filter {
            Some(date) => format!("  day={}", date),
            None => String::new(),
        },
        if snap.search_text.is_empty() {
            String::new()
        } else {
            format!("  search=\"{}\"", snap.search_text)
        }
    );
}

// ==================== Table ====================

async fn drive_table(
    kind: RecordKind,
    source: SourceRef,
    config: &Config,
    user: uuid::Uuid,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut table = match kind {
        RecordKind::Expense => RecordTable::expenses(source, config),
        RecordKind::Income => RecordTable::incomes(source, config),
    };
    table.set_user(Some(user));

    match table.load().await {
        Ok(snap) => print_table(&snap, config),
        Err(e) => eprintln!("[ERROR] {}", e),
    }
    println!(
        "commands: n p r d <date> c s <text> z <size> a <source> <amount> <date> e <id> <amount> x <id> q"
    );
    println!("page sizes: {:?}", table.page_size_options());

    while let Some(line) = prompt("table") {
        let outcome = match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] => continue,
            ["q"] => break,
            ["n"] => table.next_page().await,
            ["p"] => table.prev_page().await,
            ["r"] => table.refresh().await,
            ["c"] => table.clear_date_filter().await,
            ["d", date] => match date.parse() {
                Ok(date) => table.set_date_filter(date).await,
                Err(_) => {
                    eprintln!("[WARN] expected d YYYY-MM-DD");
                    continue;
                }
            },
            ["s", rest @ ..] => Ok(table.set_search_text(rest.join(" "))),
            ["z", size] => match size.parse() {
                Ok(size) => table.set_page_size(size).await,
                Err(_) => {
                    eprintln!("[WARN] expected z <page size>");
                    continue;
                }
            },
            ["a", name, amount, date] => match parse_entry(amount, date) {
                Ok((amount, date)) => table.add(name.to_string(), amount, date).await,
                Err(message) => {
                    eprintln!("[WARN] {}", message);
                    continue;
                }
            },
            ["e", id, amount] => match (id.parse(), amount.parse()) {
                (Ok(id), Ok(amount)) => {
                    let patch = RecordPatch {
                        amount: Some(amount),
                        ..Default::default()
                    };
                    table.edit(id, patch).await
                }
                _ => {
                    eprintln!("[WARN] expected e <record id> <amount>");
                    continue;
                }
            },
            ["x", id] => match id.parse() {
                Ok(id) => table.remove(id).await,
                Err(_) => {
                    eprintln!("[WARN] expected x <record id>");
                    continue;
                }
            },
            _ => continue,
        };
        match outcome {
            Ok(snap) => print_table(&snap, config),
            Err(e) => eprintln!("[ERROR] {}", e),
        }
    }
    Ok(())
}

fn print_table(snap: &TableSnapshot, config: &Config) {
    if snap.pending_auth {
        println!("(signed out)");
        return;
    }
    println!("{:<17}{:>14}  {:<24}{}", "date", "amount", "source", "id");
    for row in &snap.rows {
        println!(
            "{:<17}{:>14}  {:<24}{}",
            row.date.format("%Y-%m-%d %H:%M").to_string(),
            money(&row.amount, config),
            row.source,
            row.id.as_simple()
        );
    }
    println!(
        "{}s, page {} (size {}), prev: {}, next: {}{}",
        snap.kind,
        snap.page_number,
        snap.page_size,
        snap.has_prev_page,
        snap.has_next_page,
        match snap.total_count {
            Some(total) => format!(", {} matching", total),
            None => String::new(),
        }
    );
    println!("visible total: {}", money(&snap.page_total, config));
}

// ==================== Monthly ====================

async fn drive_monthly(
    kind: RecordKind,
    source: SourceRef,
    config: &Config,
    user: uuid::Uuid,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = match kind {
        RecordKind::Expense => MonthlyView::expenses(source, config),
        RecordKind::Income => MonthlyView::incomes(source, config),
    };
    view.set_user(Some(user));

    match view.load().await {
        Ok(snap) => print_monthly(&snap, config),
        Err(e) => eprintln!("[ERROR] {}", e),
    }
    println!("commands: n p r m <year> <month> c q");

    while let Some(line) = prompt("monthly") {
        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] => continue,
            ["q"] => break,
            ["n"] => print_monthly(&view.next_page(), config),
            ["p"] => print_monthly(&view.prev_page(), config),
            ["c"] => print_monthly(&view.clear_month_filter(), config),
            ["m", year, month] => match (year.parse(), month.parse()) {
                (Ok(year), Ok(month)) => print_monthly(&view.set_month_filter(year, month), config),
                _ => eprintln!("[WARN] expected m <year> <month>"),
            },
            ["r"] => match view.refresh().await {
                Ok(snap) => print_monthly(&snap, config),
                Err(e) => eprintln!("[ERROR] {}", e),
            },
            _ => println!("commands: n p r m <year> <month> c q"),
        }
    }
    Ok(())
}

fn print_monthly(snap: &MonthlySnapshot, config: &Config) {
    if snap.pending_auth {
        println!("(signed out)");
        return;
    }
    for month in &snap.months {
        println!(
            "  {:<10}{:>14}  ({} records)",
            month.label,
            money(&month.total, config),
            month.count
        );
    }
    println!(
        "{} months of {}s, page {} of {}{}",
        snap.month_count,
        snap.kind,
        snap.page,
        snap.page_count,
        match &snap.month_filter {
            Some(label) => format!(", month={}", label),
            None => String::new(),
        }
    );
    println!("grand total: {}", money(&snap.grand_total, config));
}

fn parse_entry(
    amount: &str,
    date: &str,
) -> Result<(rust_decimal::Decimal, chrono::NaiveDateTime), String> {
    let amount = amount
        .parse::<rust_decimal::Decimal>()
        .map_err(|_| "expected a decimal amount".to_string())?;
    let date = date
        .parse::<chrono::NaiveDate>()
        .map_err(|_| "expected a date as YYYY-MM-DD".to_string())?;
    Ok((amount, date.and_time(chrono::NaiveTime::MIN)))
}
