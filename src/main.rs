use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::{non_blocking::WorkerGuard, rolling};

use hrms_lite::{
    Config, FetchController, Freshness, HrmsClient,
    error::ApiError,
    model::{
        Attendance, AttendanceCreate, AttendanceFilter, AttendanceStatus, DashboardStats, Employee,
        EmployeeCreate, PageRequest, StatusCounts,
    },
    view::{ListView, StatsView},
};

#[derive(Parser)]
#[command(name = "hrms", version, about = "Manage employees and daily attendance from the terminal")]
struct Cli {
    /// Base URL of the HRMS API (overrides HRMS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show today's headcount and attendance totals
    Dashboard {
        /// Ignore the cached snapshot
        #[arg(long)]
        refresh: bool,
        /// Keep showing the dashboard, checking every SECS seconds
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },
    /// Employee records
    #[command(subcommand)]
    Employees(EmployeeCommand),
    /// Attendance marks
    #[command(subcommand)]
    Attendance(AttendanceCommand),
}

#[derive(Subcommand)]
enum EmployeeCommand {
    List(Paging),
    /// Look up one or more employees by ID
    Show {
        #[arg(required = true)]
        employee_ids: Vec<String>,
    },
    Add {
        #[arg(long = "id")]
        employee_id: String,
        #[arg(long = "name")]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        department: String,
    },
    Delete {
        employee_id: String,
    },
}

#[derive(Subcommand)]
enum AttendanceCommand {
    List {
        #[arg(long = "employee")]
        employee_id: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        paging: Paging,
    },
    /// Every mark for one employee
    History {
        employee_id: String,
        #[command(flatten)]
        paging: Paging,
    },
    Mark {
        employee_id: String,
        /// Present or Absent
        status: AttendanceStatus,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a mark, then show the list again
    Delete {
        attendance_id: String,
        /// Restrict the list shown afterwards to this employee
        #[arg(long = "employee")]
        employee_id: Option<String>,
        /// Restrict the list shown afterwards to this date
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Args, Clone, Copy)]
struct Paging {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl From<Paging> for PageRequest {
    fn from(paging: Paging) -> Self {
        PageRequest {
            page: paging.page,
            limit: paging.limit,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let _guard = init_tracing(&config, cli.verbose);
    info!(api_url = %config.api_url, "hrms starting");

    let client = HrmsClient::new(&config).context("failed to set up the API client")?;

    // Ctrl-C settles every outstanding request as cancelled.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, cancelling outstanding requests");
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Command::Dashboard { refresh, watch } => dashboard(&client, &config, &cancel, refresh, watch).await,
        Command::Employees(command) => employees(&client, &cancel, command).await,
        Command::Attendance(command) => attendance(&client, &cancel, command).await,
    }
}

fn init_tracing(config: &Config, verbose: bool) -> WorkerGuard {
    // Rolling daily log; stdout is left to command output.
    let file_appender = rolling::daily(&config.log_dir, "hrms.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    guard
}

async fn dashboard(
    client: &HrmsClient,
    config: &Config,
    cancel: &CancellationToken,
    refresh: bool,
    watch: Option<u64>,
) -> Result<()> {
    let controller = FetchController::with_parent(client.attendance.clone(), config.freshness_window, cancel);
    let mut view = StatsView::default();

    let first = if refresh {
        controller.refresh().await
    } else {
        controller.ensure_fresh().await
    };
    let cached = matches!(first, Ok(Freshness::Cached(_)));
    view.apply(first);
    print_dashboard(&view, cached, controller.age(), controller.window());

    let Some(secs) = watch else {
        return match view.notice() {
            Some(notice) => bail!("{}", notice.message),
            None => Ok(()),
        };
    };

    let interval = Duration::from_secs(secs.max(1));
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
        view.dismiss();
        let result = controller.ensure_fresh().await;
        let cached = matches!(result, Ok(Freshness::Cached(_)));
        view.apply(result);
        print_dashboard(&view, cached, controller.age(), controller.window());
    }

    controller.teardown();
    Ok(())
}

async fn employees(client: &HrmsClient, cancel: &CancellationToken, command: EmployeeCommand) -> Result<()> {
    let mut view: ListView<Employee> = ListView::default();

    match command {
        EmployeeCommand::List(paging) => {
            view.apply(
                client.employees.list_page(paging.into(), cancel).await,
                "Failed to fetch employees",
            );
        }
        EmployeeCommand::Show { employee_ids } => {
            let lookups = employee_ids
                .iter()
                .map(|employee_id| client.employees.get_one(employee_id, cancel));
            let mut found = Vec::with_capacity(employee_ids.len());
            for result in join_all(lookups).await {
                match result {
                    Ok(employee) => found.push(employee),
                    Err(e) => view.report(&e, "Failed to fetch employee"),
                }
            }
            print_employees(&found);
            return notice_result(&view);
        }
        EmployeeCommand::Add {
            employee_id,
            full_name,
            email,
            department,
        } => {
            let payload = EmployeeCreate {
                employee_id,
                full_name,
                email,
                department,
            };
            match client.employees.create(&payload, cancel).await {
                Ok(employee) => println!("Employee {} added successfully!", employee.employee_id),
                Err(e) => return fail(&e, "Failed to add employee"),
            }
            view.apply(client.employees.list_all(cancel).await, "Failed to fetch employees");
        }
        EmployeeCommand::Delete { employee_id } => {
            if let Err(e) = client.employees.delete(&employee_id, cancel).await {
                return fail(&e, "Failed to delete employee");
            }
            println!("Employee {employee_id} deleted successfully!");
            view.apply(client.employees.list_all(cancel).await, "Failed to fetch employees");
        }
    }

    print_employees(view.items());
    print_page(&view);
    notice_result(&view)
}

async fn attendance(client: &HrmsClient, cancel: &CancellationToken, command: AttendanceCommand) -> Result<()> {
    let mut view = ListView::default();

    match command {
        AttendanceCommand::List {
            employee_id,
            date,
            paging,
        } => {
            let filter = AttendanceFilter {
                employee_id,
                date,
                paging: paging.into(),
            };
            view.apply(client.attendance.list_all(&filter, cancel).await, "Failed to fetch attendance");
        }
        AttendanceCommand::History { employee_id, paging } => {
            view.apply(
                client
                    .attendance
                    .list_by_employee(&employee_id, paging.into(), cancel)
                    .await,
                "Failed to fetch attendance",
            );
        }
        AttendanceCommand::Mark {
            employee_id,
            status,
            date,
        } => {
            let payload = AttendanceCreate {
                employee_id,
                date: date.unwrap_or_else(|| Local::now().date_naive()),
                status,
            };
            let record = match client.attendance.create(&payload, cancel).await {
                Ok(record) => record,
                Err(e) => return fail(&e, "Failed to mark attendance"),
            };
            println!(
                "Marked {} as {} on {}",
                record.employee_id, record.status, record.date
            );
            let filter = AttendanceFilter::default().on(record.date);
            view.apply(client.attendance.list_all(&filter, cancel).await, "Failed to fetch attendance");
        }
        AttendanceCommand::Delete {
            attendance_id,
            employee_id,
            date,
        } => {
            if let Err(e) = client.attendance.delete(&attendance_id, cancel).await {
                return fail(&e, "Failed to delete attendance");
            }
            println!("Attendance record deleted successfully!");
            let filter = AttendanceFilter {
                employee_id,
                date,
                ..AttendanceFilter::default()
            };
            view.apply(client.attendance.list_all(&filter, cancel).await, "Failed to fetch attendance");
        }
    }

    print_attendance(view.items());
    print_page(&view);
    notice_result(&view)
}

/// Cancelled actions end quietly; anything else is reported.
fn fail(err: &ApiError, fallback: &str) -> Result<()> {
    if err.is_cancelled() {
        return Ok(());
    }
    bail!("{}", err.user_message(fallback))
}

fn notice_result<T>(view: &ListView<T>) -> Result<()> {
    match view.notice() {
        Some(notice) => bail!("{}", notice.message),
        None => Ok(()),
    }
}

fn print_dashboard(view: &StatsView, cached: bool, age: Option<Duration>, window: Duration) {
    let Some(stats) = view.stats() else {
        return;
    };
    let DashboardStats {
        total_employees,
        total_attendance_records,
        present_today,
        absent_today,
    } = *stats;

    println!("Total Employees   {total_employees:>8}");
    println!("Total Records     {total_attendance_records:>8}");
    println!("Present Today     {present_today:>8}");
    println!("Absent Today      {absent_today:>8}");
    println!("Not Marked Today  {:>8}", stats.unmarked_today());
    if let Some(age) = age.filter(|_| cached) {
        println!(
            "(cached, fetched {}s ago, refetched after {}s)",
            age.as_secs(),
            window.as_secs()
        );
    }
    if let Some(notice) = view.notice() {
        eprintln!("warning: {}", notice.message);
    }
}

fn print_employees(employees: &[Employee]) {
    if employees.is_empty() {
        println!("No employees yet.");
        return;
    }
    println!("{:<12} {:<24} {:<28} {:<16}", "ID", "NAME", "EMAIL", "DEPARTMENT");
    for e in employees {
        println!(
            "{:<12} {:<24} {:<28} {:<16}",
            e.employee_id, e.full_name, e.email, e.department
        );
    }
}

fn print_attendance(records: &[Attendance]) {
    if records.is_empty() {
        println!("No attendance records.");
        return;
    }
    let StatusCounts { present, absent } = StatusCounts::of(records);
    println!("{:<26} {:<12} {:<24} {:<12} {:<8}", "RECORD", "EMPLOYEE", "NAME", "DATE", "STATUS");
    for r in records {
        println!(
            "{:<26} {:<12} {:<24} {:<12} {:<8}",
            r.id,
            r.employee_id,
            r.employee_name.as_deref().unwrap_or("-"),
            r.date.to_string(),
            r.status.to_string()
        );
    }
    println!("Present: {present}  Absent: {absent}");
}

fn print_page<T>(view: &ListView<T>) {
    if let Some(meta) = view.meta() {
        println!(
            "page {}/{} ({} total)",
            meta.page, meta.total_pages, meta.total
        );
    }
}
