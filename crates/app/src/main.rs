use std::collections::HashSet;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_app::screens::crud::{
    BranchesScreen, ClassesScreen, CrudScreen, EnrollmentsScreen, Record, ScreenPolicy,
    SchoolsScreen, StudentsScreen, TeachersScreen,
};
use campus_app::screens::dashboard::load_dashboard;
use campus_app::screens::lesson_plans::LessonPlansScreen;
use campus_app::screens::messages::MessagesScreen;
use campus_app::screens::reports::{load_report, BarSeries};
use campus_app::screens::users::UsersScreen;
use campus_app::screens::View;
use campus_app::{AppError, AppState, ClientConfig};
use campus_client::NavigationFilter;
use campus_core::types::Id;

#[derive(Parser)]
#[command(name = "campus", version, about = "Campus management client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the persisted session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// List the navigation entries available to the signed-in user.
    Nav,
    /// Print the rows of a collection as JSON.
    List { resource: ResourceArg },
    /// Follow a conversation until Ctrl-C.
    Chat { contact: Id },
    /// Send one message.
    Send { contact: Id, text: String },
    /// Print the analytics report.
    Report,
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceArg {
    Schools,
    Branches,
    Students,
    Teachers,
    Classes,
    Enrollments,
    LessonPlans,
    Users,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_app=info,campus_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // --- Configuration ---
    let config = ClientConfig::from_env().context("invalid configuration")?;
    tracing::debug!(api_url = %config.api_url, data_dir = %config.data_dir.display(), "Loaded client configuration");

    // --- Session ---
    let state = AppState::new(config);
    state.start().await;

    match cli.command {
        Command::Login { email, password } => {
            let user = state.login(&email, &password).await.map_err(report)?;
            println!("Signed in as {} ({})", user.name, user.role);
        }
        Command::Logout => {
            state.logout();
            println!("Signed out");
        }
        Command::Whoami => match state.session.user() {
            Some(user) => println!("{} <{}> - {}", user.name, user.email, user.role),
            None => println!("Not signed in"),
        },
        Command::Nav => {
            let filter = NavigationFilter::new(state.session.subscribe());
            for entry in filter.entries() {
                println!("{:<18} {}", entry.label, entry.route.path());
            }
        }
        Command::List { resource } => list(&state, resource).await?,
        Command::Chat { contact } => chat(&state, contact).await?,
        Command::Send { contact, text } => {
            let screen = ready(MessagesScreen::open(&state).await.map_err(report)?)?;
            screen.select(Some(contact)).map_err(report)?;
            let message = screen.send(&text).await.map_err(report)?;
            println!("Sent message #{}", message.id);
            screen.close().await;
        }
        Command::Report => print_report(&state).await?,
    }

    Ok(())
}

async fn list(state: &AppState, resource: ResourceArg) -> anyhow::Result<()> {
    match resource {
        ResourceArg::Schools => print_rows(SchoolsScreen::new(state.clone())).await,
        ResourceArg::Branches => print_rows(BranchesScreen::new(state.clone())).await,
        ResourceArg::Students => print_rows(StudentsScreen::new(state.clone())).await,
        ResourceArg::Teachers => print_rows(TeachersScreen::new(state.clone())).await,
        ResourceArg::Classes => print_rows(ClassesScreen::new(state.clone())).await,
        ResourceArg::Enrollments => print_rows(EnrollmentsScreen::new(state.clone())).await,
        ResourceArg::LessonPlans => print_rows(LessonPlansScreen::new(state.clone())).await,
        ResourceArg::Users => print_rows(UsersScreen::new(state.clone())).await,
    }
}

async fn print_rows<P>(mut screen: CrudScreen<P>) -> anyhow::Result<()>
where
    P: ScreenPolicy,
    Record<P>: Serialize,
{
    let rows = ready(screen.open().await.map_err(report)?)?;
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

async fn chat(state: &AppState, contact: Id) -> anyhow::Result<()> {
    let screen = ready(MessagesScreen::open(state).await.map_err(report)?)?;
    screen.select(Some(contact)).map_err(report)?;

    let mut seen = HashSet::new();
    let mut ticker = tokio::time::interval(state.config.poll_interval);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {}
        }
        let snapshot = screen.snapshot();
        for message in snapshot.conversation.iter().filter(|m| seen.insert(m.id)) {
            let who = if message.sender_id == screen.poller().me() {
                "you"
            } else {
                "them"
            };
            println!(
                "[{}] {who}: {}",
                message.created_at.format("%H:%M"),
                message.content
            );
        }
        if let Some(error) = snapshot.last_error {
            eprintln!("! {error}");
        }
    }

    screen.close().await;
    Ok(())
}

async fn print_report(state: &AppState) -> anyhow::Result<()> {
    if let View::Ready(dashboard) = load_dashboard(state).await.map_err(report)? {
        println!("{} ({} unread messages)", dashboard.greeting, dashboard.unread_messages);
    }
    let report = ready(load_report(state).await.map_err(report)?)?;

    println!(
        "Students {}  Teachers {}  Classes {}  Enrollments {}",
        report.stats.total_students,
        report.stats.total_teachers,
        report.stats.total_classes,
        report.stats.total_enrollments
    );
    print_series("Enrollments by class", &report.enrollments_by_class);
    print_series("Students by grade", &report.students_by_grade);
    print_series("Activity", &report.activity);

    println!("\nClass capacity");
    for row in &report.class_capacity {
        println!(
            "  {:<20} {:>4}/{:<4} {:>5.1}%{}",
            row.class_name,
            row.enrolled,
            row.capacity,
            row.utilization * 100.0,
            if row.is_full { "  FULL" } else { "" }
        );
    }

    println!("\nRecent enrollments");
    for row in &report.recent_enrollments {
        println!("  {} -> {}", row.student_name, row.class_name);
    }
    Ok(())
}

fn print_series(title: &str, series: &BarSeries) {
    println!("\n{title}");
    for bar in &series.bars {
        let width = (bar.ratio * 30.0).round() as usize;
        println!("  {:<20} {:<30} {}", bar.label, "#".repeat(width), bar.value);
    }
}

fn ready<T>(view: View<T>) -> anyhow::Result<T> {
    match view {
        View::Ready(value) => Ok(value),
        View::Loading => bail!("Session is still loading"),
        View::RedirectToLogin => bail!("Not signed in; run `campus login` first"),
        View::AccessDenied { required, actual } => {
            let required: Vec<String> = required.iter().map(ToString::to_string).collect();
            bail!(
                "Access denied: requires one of [{}], you are {actual}",
                required.join(", ")
            )
        }
    }
}

fn report(err: AppError) -> anyhow::Error {
    tracing::debug!(kind = ?err.kind(), error = %err, "Command failed");
    anyhow::anyhow!(err.user_message())
}
