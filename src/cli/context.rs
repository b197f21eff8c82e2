use chrono::Local;
use dialoguer::Confirm;
use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::cli::output;
use crate::cli::table::{Alignment, Table, TableColumn};
use crate::config::ConfigManager;
use crate::core::session::{LedgerSession, ViewChange, ViewChangeReason};
use crate::errors::LedgerError;
use crate::ledger::{Category, TransactionId, DATE_FORMAT};
use crate::query::Column;
use crate::storage::JsonStorage;
use crate::utils::format::format_amount;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Input error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

struct CommandSpec {
    name: &'static str,
    usage: &'static str,
    summary: &'static str,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "add",
        usage: "add <date> <Income|Expense> <amount> <category> [description...]",
        summary: "Record a transaction",
    },
    CommandSpec {
        name: "delete",
        usage: "delete <row|id>",
        summary: "Remove a transaction shown in the table",
    },
    CommandSpec {
        name: "list",
        usage: "list",
        summary: "Show the active view",
    },
    CommandSpec {
        name: "filter",
        usage: "filter <start> <end> [category...]",
        summary: "Limit the view to a date range and categories",
    },
    CommandSpec {
        name: "reset",
        usage: "reset",
        summary: "Show every transaction again",
    },
    CommandSpec {
        name: "sort",
        usage: "sort <date|type|amount|category|description|balance>",
        summary: "Sort the view by a column, toggling direction",
    },
    CommandSpec {
        name: "balance",
        usage: "balance",
        summary: "Show the current total balance",
    },
    CommandSpec {
        name: "report",
        usage: "report <categories|trend|monthly>",
        summary: "Show an analysis of the active view",
    },
    CommandSpec {
        name: "categories",
        usage: "categories",
        summary: "List the available categories",
    },
    CommandSpec {
        name: "help",
        usage: "help",
        summary: "Show this help",
    },
    CommandSpec {
        name: "exit",
        usage: "exit",
        summary: "Leave the shell",
    },
];

/// Shell state: the ledger session plus presentation settings.
pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    session: LedgerSession,
    currency_symbol: String,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::new()?;
        let config = manager.load()?;
        let storage = JsonStorage::new(manager.transactions_path(&config));
        let (mut session, outcome) = LedgerSession::open(Box::new(storage))?;
        session = session.with_label_options(config.label_options());

        if let Some(reason) = &outcome.recovered_from {
            output::warning(format!(
                "Could not read saved transactions ({reason}); starting with an empty ledger."
            ));
        }
        for warning in &outcome.warnings {
            output::warning(warning);
        }
        if let Some(copy) = &outcome.preserved_copy {
            output::warning(format!(
                "Skipped records are kept in the original file at {}.",
                copy.display()
            ));
        }
        session.subscribe(|change: &ViewChange| {
            if change.reason == ViewChangeReason::Filtered {
                output::info(format!("{} record(s) match the filter.", change.visible));
            }
        });

        Ok(Self {
            mode,
            running: true,
            session,
            currency_symbol: config.currency_symbol,
        })
    }

    pub fn prompt(&self) -> String {
        if self.session.active_filter().is_unfiltered() {
            "ledger> ".to_string()
        } else {
            "ledger (filtered)> ".to_string()
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = COMMANDS.iter().map(|entry| entry.name).collect();
        names.push("quit");
        names
    }

    pub fn report_error(&self, err: CliError) -> Result<(), CliError> {
        match err {
            CliError::Readline(inner) => Err(CliError::Readline(inner)),
            CliError::Io(io) => Err(CliError::Io(io)),
            CliError::Ledger(inner) if !inner.is_user_error() => {
                output::error(&inner);
                output::warning("Unsaved changes are kept in memory for this session.");
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CliError> {
        match command {
            "add" => self.cmd_add(args),
            "delete" | "rm" => self.cmd_delete(args),
            "list" | "ls" => {
                self.render_view();
                Ok(LoopControl::Continue)
            }
            "filter" => self.cmd_filter(args),
            "reset" => {
                self.session.reset_filter();
                self.render_view();
                Ok(LoopControl::Continue)
            }
            "sort" => self.cmd_sort(args),
            "balance" => {
                self.print_balance();
                Ok(LoopControl::Continue)
            }
            "report" => self.cmd_report(args),
            "categories" => {
                let names: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
                output::info(names.join(", "));
                Ok(LoopControl::Continue)
            }
            "help" => {
                self.print_help();
                Ok(LoopControl::Continue)
            }
            "exit" | "quit" => Ok(LoopControl::Exit),
            other => Err(CliError::Usage(unknown_command_message(other))),
        }
    }

    fn cmd_add(&mut self, args: &[&str]) -> Result<LoopControl, CliError> {
        let [date, kind, amount, category, rest @ ..] = args else {
            return Err(usage("add"));
        };
        let description = rest.join(" ");
        let date = if date.eq_ignore_ascii_case("today") {
            Local::now().date_naive().format(DATE_FORMAT).to_string()
        } else {
            date.to_string()
        };
        self.session
            .add_transaction_from_input(&date, kind, amount, category, &description)?;
        self.session.save()?;
        output::success(format!(
            "Recorded. Balance is now {}.",
            self.money(self.session.current_balance())
        ));
        self.render_view();
        Ok(LoopControl::Continue)
    }

    fn cmd_delete(&mut self, args: &[&str]) -> Result<LoopControl, CliError> {
        let [target] = args else {
            return Err(usage("delete"));
        };
        let id = self.resolve_row(target)?;
        if self.mode == CliMode::Interactive {
            let confirmed = Confirm::new()
                .with_prompt("Delete this transaction?")
                .default(false)
                .interact()
                .map_err(|err| CliError::Usage(err.to_string()))?;
            if !confirmed {
                output::info("Nothing deleted.");
                return Ok(LoopControl::Continue);
            }
        }
        let removed = self.session.delete_transaction(id)?;
        self.session.save()?;
        output::success(format!(
            "Deleted {} {} on {}.",
            removed.kind(),
            format_amount(removed.amount()),
            removed.date().format(DATE_FORMAT)
        ));
        self.render_view();
        Ok(LoopControl::Continue)
    }

    fn cmd_filter(&mut self, args: &[&str]) -> Result<LoopControl, CliError> {
        let [start, end, categories @ ..] = args else {
            return Err(usage("filter"));
        };
        self.session.apply_filter_input(start, end, categories)?;
        self.render_view();
        Ok(LoopControl::Continue)
    }

    fn cmd_sort(&mut self, args: &[&str]) -> Result<LoopControl, CliError> {
        let [column] = args else {
            return Err(usage("sort"));
        };
        let column: Column = column.parse()?;
        self.session.sort_by(column);
        self.render_view();
        Ok(LoopControl::Continue)
    }

    fn cmd_report(&mut self, args: &[&str]) -> Result<LoopControl, CliError> {
        match args {
            ["categories"] | ["pie"] => self.report_categories(),
            ["trend"] | ["line"] => self.report_trend(),
            ["monthly"] | ["bar"] => self.report_monthly(),
            _ => return Err(usage("report")),
        }
        Ok(LoopControl::Continue)
    }

    /// Rows are numbered in display order; ids are accepted as well.
    fn resolve_row(&self, target: &str) -> Result<TransactionId, CliError> {
        if let Ok(row) = target.parse::<usize>() {
            return row
                .checked_sub(1)
                .and_then(|idx| self.session.active_ids().get(idx).copied())
                .ok_or_else(|| CliError::Usage(format!("no row {row} in the current view")));
        }
        Ok(target.parse::<TransactionId>()?)
    }

    fn render_view(&self) {
        let rows = self.session.get_active_view();
        if rows.is_empty() {
            output::info("No records to display.");
            return;
        }
        let sort = self.session.sort_state();
        let mut columns = vec![TableColumn::new("#", Alignment::Right)];
        columns.extend(Column::ALL.iter().map(|&column| {
            let alignment = if column.is_numeric() {
                Alignment::Right
            } else {
                Alignment::Left
            };
            TableColumn::new(
                format!("{}{}", column.header(), sort.indicator(column)),
                alignment,
            )
        }));
        let mut table = Table::new(columns);
        for (idx, record) in rows.iter().enumerate() {
            table.push(vec![
                (idx + 1).to_string(),
                record.date().format(DATE_FORMAT).to_string(),
                record.kind().to_string(),
                format_amount(record.amount()),
                record.category().to_string(),
                record.description().to_string(),
                format_amount(record.running_balance()),
            ]);
        }
        println!("{}", table.render());

        let summary = self.session.view_summary();
        output::info(format!(
            "{} record(s): income {}, expense {}, net {}",
            summary.count,
            self.money(summary.income),
            self.money(summary.expense),
            self.money(summary.net())
        ));
    }

    fn print_balance(&self) {
        let balance = self.session.current_balance();
        println!(
            "Current balance: {}",
            output::signed_amount(self.money(balance), balance)
        );
    }

    fn report_categories(&self) {
        output::section("Expenses by category");
        let totals = self.session.get_category_totals();
        if totals.is_empty() {
            output::info("No expense records to analyse.");
            return;
        }
        let mut table = Table::new(vec![
            TableColumn::new("Category", Alignment::Left),
            TableColumn::new("Total", Alignment::Right),
            TableColumn::new("Share", Alignment::Right),
            TableColumn::new("Label", Alignment::Left),
        ]);
        for slice in &totals.slices {
            table.push(vec![
                slice.category.to_string(),
                format_amount(slice.total),
                format!("{:.1}%", slice.percent),
                slice.detail.clone().unwrap_or_default(),
            ]);
        }
        println!("{}", table.render());
        output::info(format!("Total expenses: {}", self.money(totals.total)));
    }

    fn report_trend(&self) {
        output::section("Balance trend");
        let points = self.session.get_daily_trend();
        if points.is_empty() {
            output::info("No records to analyse.");
            return;
        }
        let mut table = Table::new(vec![
            TableColumn::new("Date", Alignment::Left),
            TableColumn::new("Balance", Alignment::Right),
        ]);
        for point in points {
            table.push(vec![
                point.date.format(DATE_FORMAT).to_string(),
                format_amount(point.balance),
            ]);
        }
        println!("{}", table.render());
    }

    fn report_monthly(&self) {
        output::section("Monthly income and expense");
        let months = self.session.get_monthly_totals();
        if months.is_empty() {
            output::info("No records to analyse.");
            return;
        }
        let mut table = Table::new(vec![
            TableColumn::new("Month", Alignment::Left),
            TableColumn::new("Income", Alignment::Right),
            TableColumn::new("Expense", Alignment::Right),
            TableColumn::new("Net", Alignment::Right),
        ]);
        for month in months {
            table.push(vec![
                month.label(),
                format_amount(month.income),
                format_amount(month.expense),
                format_amount(month.net()),
            ]);
        }
        println!("{}", table.render());
    }

    fn print_help(&self) {
        output::section("Commands");
        let mut table = Table::new(vec![
            TableColumn::new("Usage", Alignment::Left),
            TableColumn::new("Description", Alignment::Left),
        ]);
        for entry in COMMANDS {
            table.push(vec![entry.usage.to_string(), entry.summary.to_string()]);
        }
        println!("{}", table.render());
    }

    fn money(&self, value: f64) -> String {
        format!("{}{}", self.currency_symbol, format_amount(value))
    }
}

fn usage(command: &str) -> CliError {
    let text = COMMANDS
        .iter()
        .find(|entry| entry.name == command)
        .map(|entry| entry.usage)
        .unwrap_or(command);
    CliError::Usage(format!("usage: {text}"))
}

fn unknown_command_message(input: &str) -> String {
    let suggestion = COMMANDS
        .iter()
        .map(|entry| (entry.name, strsim::levenshtein(input, entry.name)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(name, _)| format!(" Did you mean `{name}`?"))
        .unwrap_or_default();
    format!("Unknown command `{input}`. Type `help` for a list of commands.{suggestion}")
}
