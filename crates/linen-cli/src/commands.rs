use std::io::{self, BufRead, Write};

use anyhow::bail;
use colored::Colorize;
use linen_sdk::{
    Amount, Confirm, DocumentStore, DocumentValidator, JsonFileStore, LoadSource, Movement,
    Mutation, Outcome, Tracker, TrackerConfig, TransactionId,
};
use serde_json::json;
use tracing::debug;

use crate::cli::*;
use crate::render::{history_line, linen_line, summary_table};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(path) = cli.data.clone() {
        config.data_path = path;
    }

    // These two must not seed or migrate the stored document.
    match cli.command {
        Command::Config => return cmd_config(&config),
        Command::Verify => return cmd_verify(&config, cli.format),
        _ => {}
    }

    debug!(path = %config.data_path.display(), "opening ledger");
    let mut tracker = Tracker::open_file(config);
    report_load(&tracker);

    let mut confirm = TerminalConfirm {
        assume_yes: cli.assume_yes,
    };
    let format = cli.format;
    match cli.command {
        Command::Summary => cmd_summary(&tracker, format),
        Command::Linens => cmd_linens(&tracker, format),
        Command::AddLinen(args) => cmd_add_linen(&mut tracker, args, format),
        Command::Deliver(args) => cmd_movement(&mut tracker, args, Movement::Delivery, format),
        Command::Collect(args) => cmd_movement(&mut tracker, args, Movement::Collection, format),
        Command::Edit(args) => cmd_edit(&mut tracker, args, format),
        Command::Delete(args) => cmd_delete(&mut tracker, args, &mut confirm, format),
        Command::RemoveLinen(args) => cmd_remove_linen(&mut tracker, args, &mut confirm, format),
        Command::ResetDay => cmd_reset_day(&mut tracker, &mut confirm, format),
        Command::Log(args) => cmd_log(&tracker, args, format),
        Command::Verify | Command::Config => Ok(()),
    }
}

type FileTracker = Tracker<JsonFileStore>;

/// Reads `[y/N]` answers from stdin unless `--yes` was given.
struct TerminalConfirm {
    assume_yes: bool,
}

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{message} [y/N] ");
        if io::stderr().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn report_load(tracker: &FileTracker) {
    let report = tracker.load_report();
    if report.source == LoadSource::Seeded {
        eprintln!(
            "{} Started a new ledger at {} with the default linen types.",
            "i".blue().bold(),
            tracker.config().data_path.display()
        );
    }
    if report.migrated > 0 {
        eprintln!(
            "{} Converted {} stored counts into ledger entries.",
            "i".blue().bold(),
            report.migrated
        );
    }
    if let Some(warning) = &report.warning {
        eprintln!("{} {}", "!".yellow().bold(), warning);
    }
}

fn report_outcome<T>(outcome: &Outcome<T>) {
    if let Some(warning) = &outcome.warning {
        eprintln!("{} {}", "!".yellow().bold(), warning);
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Index into the catalogue, or a case-insensitive name.
fn resolve_linen(tracker: &FileTracker, selector: &str) -> Option<usize> {
    match selector.trim().parse::<usize>() {
        Ok(index) => Some(index),
        Err(_) => tracker.linen_index(selector.trim()),
    }
}

/// Full id, or a prefix matching exactly one entry.
fn resolve_transaction(tracker: &FileTracker, text: &str) -> anyhow::Result<Option<TransactionId>> {
    let text = text.trim();
    let exact = TransactionId::from(text);
    if tracker.transaction(&exact).is_some() {
        return Ok(Some(exact));
    }
    if text.is_empty() {
        return Ok(None);
    }
    let mut matches = tracker
        .document()
        .transactions
        .iter()
        .filter(|t| t.id.as_str().starts_with(text));
    let Some(first) = matches.next() else {
        return Ok(None);
    };
    if matches.next().is_some() {
        bail!("entry id {text:?} is ambiguous, use more characters");
    }
    Ok(Some(first.id.clone()))
}

/// Integer-prefix parse, so `12 towels` reads as 12.
fn parse_amount(text: &str) -> anyhow::Result<i64> {
    Ok(Amount::parse(text)?)
}

fn nothing_changed(what: &str, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!({ "status": "not_found", "message": what })),
        OutputFormat::Text => {
            println!("{} {}; nothing changed.", "-".dimmed(), what);
            Ok(())
        }
    }
}

// ---- Read commands ----

fn cmd_summary(tracker: &FileTracker, format: OutputFormat) -> anyhow::Result<()> {
    let summary = tracker.summary();
    match format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Text => {
            print!("{}", summary_table(&summary));
            let balance = summary.grand.balance_label();
            let balance = match summary.grand.balance {
                b if b > 0 => balance.green(),
                b if b < 0 => balance.red(),
                _ => balance.normal(),
            };
            println!("\nOverall balance: {}", balance.bold());
            Ok(())
        }
    }
}

fn cmd_linens(tracker: &FileTracker, format: OutputFormat) -> anyhow::Result<()> {
    let summary = tracker.summary();
    match format {
        OutputFormat::Json => print_json(&summary.rows),
        OutputFormat::Text => {
            if summary.rows.is_empty() {
                println!("No linen types yet. Add one with `linen add-linen NAME`.");
            }
            for (index, row) in summary.rows.iter().enumerate() {
                println!("{}", linen_line(index, &row.name, &row.totals));
            }
            Ok(())
        }
    }
}

fn cmd_log(tracker: &FileTracker, args: LogArgs, format: OutputFormat) -> anyhow::Result<()> {
    let limit = args.limit.unwrap_or(tracker.config().history_limit);
    let history: Vec<_> = tracker.history().into_iter().take(limit).collect();
    match format {
        OutputFormat::Json => print_json(&history),
        OutputFormat::Text => {
            if history.is_empty() {
                println!("No entries yet today.");
            }
            for transaction in history {
                let line = history_line(transaction);
                match transaction.movement {
                    Movement::Delivery => println!("{}", line.green()),
                    Movement::Collection => println!("{}", line.yellow()),
                    Movement::Unrecognized => println!("{}", line.dimmed()),
                }
            }
            Ok(())
        }
    }
}

fn cmd_verify(config: &TrackerConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.data_path);
    let Some(document) = store.load()? else {
        bail!(
            "no usable ledger at {}; run any other command to start one",
            config.data_path.display()
        );
    };
    let report = DocumentValidator::validate(&document);
    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            if report.is_valid() {
                println!(
                    "{} {} linens, {} entries, no issues",
                    "\u{2713}".green().bold(),
                    report.linen_count,
                    report.transaction_count
                );
            }
            for violation in &report.violations {
                println!(
                    "{} {:?} {}: {}",
                    "\u{2717}".red(),
                    violation.kind,
                    violation.subject.bold(),
                    violation.description
                );
            }
        }
    }
    if !report.is_consistent() {
        bail!("stored balances disagree with the ledger; any change will rebuild them");
    }
    Ok(())
}

fn cmd_config(config: &TrackerConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

// ---- Mutations ----

fn cmd_add_linen(tracker: &mut FileTracker, args: AddLinenArgs, format: OutputFormat) -> anyhow::Result<()> {
    let outcome = tracker.add_linen_type(&args.name)?;
    report_outcome(&outcome);
    let name = tracker.document().linens[outcome.value].name.clone();
    match format {
        OutputFormat::Json => print_json(&json!({ "status": "applied", "index": outcome.value, "name": name })),
        OutputFormat::Text => {
            println!("{} Linen added: {} is now ready to track.", "\u{2713}".green().bold(), name.bold());
            Ok(())
        }
    }
}

fn cmd_movement(
    tracker: &mut FileTracker,
    args: MovementArgs,
    movement: Movement,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let amount = parse_amount(&args.amount)?;
    let Some(index) = resolve_linen(tracker, &args.linen) else {
        return nothing_changed(&format!("no linen matches {:?}", args.linen), format);
    };
    let outcome = tracker.add_transaction(index, amount, movement)?;
    report_outcome(&outcome);
    let Mutation::Applied(id) = outcome.value else {
        return nothing_changed(&format!("no linen at index {index}"), format);
    };

    let name = &tracker.document().linens[index].name;
    match format {
        OutputFormat::Json => print_json(&json!({ "status": "applied", "id": id, "linen": name })),
        OutputFormat::Text => {
            let title = match movement {
                Movement::Delivery => "Delivery saved".green().bold(),
                _ => "Collection saved".yellow().bold(),
            };
            println!("{title}: {}{amount} for {name} ({})", movement.sign(), id.short_id().dimmed());
            Ok(())
        }
    }
}

fn cmd_edit(tracker: &mut FileTracker, args: EditArgs, format: OutputFormat) -> anyhow::Result<()> {
    let Some(id) = resolve_transaction(tracker, &args.id)? else {
        return nothing_changed(&format!("no entry matches {:?}", args.id), format);
    };
    let Some(current) = tracker.transaction(&id) else {
        return nothing_changed(&format!("no entry matches {:?}", args.id), format);
    };

    let amount = match &args.amount {
        Some(text) => parse_amount(text)?,
        None => current.amount.value().unwrap_or(0),
    };
    let movement = match &args.movement {
        Some(text) => text.parse::<Movement>()?,
        None => current.movement,
    };

    let outcome = tracker.edit_transaction(&id, amount, movement)?;
    report_outcome(&outcome);
    if let Mutation::NotFound = outcome.value {
        return nothing_changed(&format!("no entry matches {:?}", args.id), format);
    }
    match format {
        OutputFormat::Json => print_json(&json!({ "status": "applied", "id": id })),
        OutputFormat::Text => {
            println!("{} Transaction updated: the entry was updated successfully.", "\u{2713}".green().bold());
            Ok(())
        }
    }
}

fn cmd_delete(
    tracker: &mut FileTracker,
    args: DeleteArgs,
    confirm: &mut TerminalConfirm,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let Some(id) = resolve_transaction(tracker, &args.id)? else {
        return nothing_changed(&format!("no entry matches {:?}", args.id), format);
    };
    let Some(outcome) = tracker.delete_transaction_confirmed(&id, confirm) else {
        println!("Cancelled.");
        return Ok(());
    };
    report_outcome(&outcome);
    match outcome.value {
        Mutation::NotFound => nothing_changed(&format!("no entry matches {:?}", args.id), format),
        Mutation::Applied(removed) => match format {
            OutputFormat::Json => print_json(&json!({ "status": "applied", "removed": removed })),
            OutputFormat::Text => {
                println!(
                    "{} Transaction removed: the entry was deleted from today's history.",
                    "\u{2713}".yellow().bold()
                );
                Ok(())
            }
        },
    }
}

fn cmd_remove_linen(
    tracker: &mut FileTracker,
    args: RemoveLinenArgs,
    confirm: &mut TerminalConfirm,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let Some(index) = resolve_linen(tracker, &args.linen) else {
        return nothing_changed(&format!("no linen matches {:?}", args.linen), format);
    };
    let Some(outcome) = tracker.delete_linen_type_confirmed(index, confirm) else {
        println!("Cancelled.");
        return Ok(());
    };
    report_outcome(&outcome);
    match outcome.value {
        Mutation::NotFound => nothing_changed(&format!("no linen at index {index}"), format),
        Mutation::Applied(removal) => match format {
            OutputFormat::Json => print_json(&json!({
                "status": "applied",
                "name": removal.linen.name,
                "removedTransactions": removal.removed_transactions,
            })),
            OutputFormat::Text => {
                println!(
                    "{} Linen removed: {} and its history were deleted ({} entries).",
                    "\u{2713}".yellow().bold(),
                    removal.linen.name.bold(),
                    removal.removed_transactions
                );
                Ok(())
            }
        },
    }
}

fn cmd_reset_day(
    tracker: &mut FileTracker,
    confirm: &mut TerminalConfirm,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let Some(outcome) = tracker.reset_day_confirmed(confirm) else {
        println!("Cancelled.");
        return Ok(());
    };
    report_outcome(&outcome);
    match format {
        OutputFormat::Json => print_json(&json!({ "status": "applied", "cleared": outcome.value })),
        OutputFormat::Text => {
            println!(
                "{} Day reset: all delivery and collection entries were cleared ({}).",
                "\u{2713}".blue().bold(),
                outcome.value
            );
            Ok(())
        }
    }
}
