//! `evmod`: moderate and submit events from a terminal.
//!
//! Drives the same controllers as the browser client against the live
//! backend. Sign in once with `evmod login`, export the printed token as
//! `EVENTBOARD_TOKEN`, then run the other commands.


use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand};
use eventboard::backend::rest::RestBackend;
use eventboard::config::ClientConfig;
use eventboard::header::{self, HeaderState};
use eventboard::listing::{ListController, ListFilter, fetch_events, submitter_embed, university_embed};
use eventboard::models::{EventId, EventStatus};
use eventboard::moderation::{Action, AdminController, Outcome, Prompt, fetch_counts, fetch_event};
use eventboard::owner::{self, Dashboard};
use eventboard::session::{Requirement, Session, guard};
use eventboard::submission::{self, EventForm, ImageFile, Mode};
use eventboard::view::{AdminCard, DashboardItem, EventCard, EventDetailView};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    App(#[from] eventboard::Error),
    #[error("{0}")]
    Denied(String),
    #[error("invalid --status value `{0}`; use all, pending, approved or rejected")]
    InvalidStatus(String),
    #[error("could not read {}: {source}", path.display())]
    ReadFile { path: PathBuf, source: io::Error },
}

#[derive(Parser, Debug)]
#[command(name = "evmod", about = "Event submission and moderation CLI")]
struct Cli {
    /// Overrides EVENTBOARD_URL from the environment or `.env`.
    #[arg(long)]
    url: Option<String>,

    /// Overrides EVENTBOARD_ANON_KEY from the environment or `.env`.
    #[arg(long)]
    anon_key: Option<String>,

    #[arg(long, env = "EVENTBOARD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Answer yes to every confirmation.
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print an access token.
    Login {
        #[arg(long, env = "EVENTBOARD_EMAIL")]
        email: String,
        #[arg(long, env = "EVENTBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show who the token belongs to.
    Whoami,
    /// Public listing of approved events.
    Browse(BrowseArgs),
    /// Moderation commands (admin only).
    Events(EventsCommand),
    /// Per-status event totals (admin only).
    Counts,
    /// Your own events and statistics.
    Dashboard,
    /// Delete one of your own events.
    DeleteOwn { id: EventId },
    /// Submit a new event, or edit one of yours with `--edit`.
    Submit(SubmitArgs),
}

#[derive(Args, Debug)]
struct BrowseArgs {
    #[arg(long, default_value = "all")]
    category: String,
    #[arg(long, default_value = "")]
    search: String,
    /// Number of pages to show.
    #[arg(long, default_value_t = 1)]
    pages: usize,
}

#[derive(Args, Debug)]
struct EventsCommand {
    #[command(subcommand)]
    command: EventsSubcommand,
}

#[derive(Subcommand, Debug)]
enum EventsSubcommand {
    List {
        #[arg(long, default_value = "all")]
        status: String,
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long, default_value = "")]
        search: String,
    },
    Show {
        id: EventId,
    },
    Approve {
        id: EventId,
    },
    Reject {
        id: EventId,
    },
    Delete {
        id: EventId,
    },
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// Edit this owned event instead of creating one.
    #[arg(long)]
    edit: Option<EventId>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// `YYYY-MM-DDTHH:MM` or RFC 3339.
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    venue: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    organizer: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    /// Poster image to upload.
    #[arg(long)]
    image: Option<PathBuf>,
}

/// Confirmations on stdin, notices on stderr.
struct TerminalPrompt {
    assume_yes: bool,
}

/// `y` or `yes` in any case; everything else declines.
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
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

    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// `all` means no status filter.
fn parse_status(raw: &str) -> Result<Option<EventStatus>, CliError> {
    if raw.trim().eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| CliError::InvalidStatus(raw.to_owned()))
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // A missing .env is fine; the variables may come from the shell.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let backend = RestBackend::new(&config).map_err(eventboard::Error::from)?.with_access_token(cli.token.clone());
    let prompt = TerminalPrompt { assume_yes: cli.yes };

    match cli.command {
        Command::Login { email, password } => run_login(&backend, &email, &password).await,
        Command::Whoami => run_whoami(&backend).await,
        Command::Browse(args) => run_browse(&backend, &config, args).await,
        Command::Events(events) => run_events(&backend, &prompt, events).await,
        Command::Counts => run_counts(&backend).await,
        Command::Dashboard => run_dashboard(&backend).await,
        Command::DeleteOwn { id } => run_delete_own(&backend, &prompt, id).await,
        Command::Submit(args) => run_submit(&backend, &config, args).await,
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = match (ClientConfig::from_env(), &cli.url, &cli.anon_key) {
        (Ok(config), _, _) => config,
        (Err(_), Some(url), Some(key)) => ClientConfig::new(url, key),
        (Err(e), _, _) => return Err(e.into()),
    };
    if let Some(url) = &cli.url {
        config.backend_url = url.trim_end_matches('/').to_owned();
    }
    if let Some(key) = &cli.anon_key {
        config.anon_key.clone_from(key);
    }
    tracing::debug!(url = %config.backend_url, bucket = %config.bucket, "config loaded");
    Ok(config)
}

async fn require(backend: &RestBackend, requirement: Requirement) -> Result<Session, CliError> {
    guard(backend, requirement).await.map_err(|denied| {
        CliError::Denied(denied.message.map_or_else(|| denied.reason.to_string(), str::to_owned))
    })
}

// =============================================================================
// ACCOUNT
// =============================================================================

async fn run_login(backend: &RestBackend, email: &str, password: &str) -> Result<(), CliError> {
    let (session, page) = eventboard::account::sign_in(backend, email, password).await?;
    eprintln!("signed in as {}; next page: {}", session.user.email.as_deref().unwrap_or("?"), page.href());
    println!("{}", session.access_token);
    Ok(())
}

async fn run_whoami(backend: &RestBackend) -> Result<(), CliError> {
    match header::resolve(backend).await {
        HeaderState::LoggedOut => println!("not signed in"),
        HeaderState::IncompleteProfile => println!("signed in; profile incomplete"),
        HeaderState::Complete { display_name, initials, is_admin } => {
            let role = if is_admin { "admin" } else { "user" };
            println!("{display_name} ({initials}) [{role}]");
        }
    }
    Ok(())
}

// =============================================================================
// LISTINGS
// =============================================================================

async fn run_browse(backend: &RestBackend, config: &ClientConfig, args: BrowseArgs) -> Result<(), CliError> {
    require(backend, Requirement::Public).await?;
    let filter = ListFilter::approved().with_category(&args.category).with_search(&args.search);
    let mut list = ListController::new(ListFilter::approved(), config.page_size);
    list.load(backend, filter, Some(university_embed())).await?;
    for _ in 1..args.pages {
        if !list.load_more() {
            break;
        }
    }

    if let Some(message) = list.message() {
        println!("{message}");
        return Ok(());
    }
    for event in list.featured() {
        println!("* {}", EventCard::from(event).title);
    }
    for event in list.visible() {
        let card = EventCard::from(event);
        println!("#{} {} | {} | {} | {}", card.id, card.title, card.category, card.date, card.university);
    }
    let (shown, total) = list.counts();
    eprintln!("showing {shown} of {total}");
    Ok(())
}

async fn run_events(backend: &RestBackend, prompt: &TerminalPrompt, events: EventsCommand) -> Result<(), CliError> {
    require(backend, Requirement::Admin).await?;
    match events.command {
        EventsSubcommand::List { status, category, search } => {
            let filter = ListFilter::default()
                .with_status(parse_status(&status)?)
                .with_category(&category)
                .with_search(&search);
            let rows = fetch_events(backend, &filter, Some(submitter_embed())).await?;
            if rows.is_empty() {
                println!("{}", filter.empty_message());
            }
            for event in &rows {
                print_admin_card(&AdminCard::from(event));
            }
            Ok(())
        }
        EventsSubcommand::Show { id } => {
            let event = fetch_event(backend, id).await?;
            let detail = EventDetailView::from(&event);
            print_admin_card(&AdminCard::from(&event));
            println!("  organizer: {} ({})", detail.organizer_name, detail.organizer_contact);
            println!("  {}", detail.description);
            Ok(())
        }
        EventsSubcommand::Approve { id } => moderate(backend, prompt, id, Action::Approve).await,
        EventsSubcommand::Reject { id } => moderate(backend, prompt, id, Action::Reject).await,
        EventsSubcommand::Delete { id } => moderate(backend, prompt, id, Action::Delete).await,
    }
}

async fn moderate(backend: &RestBackend, prompt: &TerminalPrompt, id: EventId, action: Action) -> Result<(), CliError> {
    let mut admin = AdminController::new();
    admin.refresh(backend).await?;
    match admin.apply(backend, prompt, id, action).await? {
        Outcome::Cancelled => eprintln!("cancelled"),
        Outcome::Applied => {
            if let Some(counts) = admin.counts() {
                eprintln!("pending {} / approved {} / rejected {}", counts.pending, counts.approved, counts.rejected);
            }
        }
        Outcome::Open(page) => println!("{}", page.href()),
    }
    Ok(())
}

async fn run_counts(backend: &RestBackend) -> Result<(), CliError> {
    require(backend, Requirement::Admin).await?;
    let counts = fetch_counts(backend).await?;
    println!("all       {}", counts.total());
    for status in EventStatus::ALL {
        println!("{:<9} {}", status.as_str(), counts.for_tab(Some(status)));
    }
    Ok(())
}

fn print_admin_card(card: &AdminCard) {
    let actions: Vec<&str> = card.actions.iter().map(|a| a.label()).collect();
    println!("#{} [{}] {} | {} | {}", card.id, card.badge.label, card.title, card.when, card.location);
    println!("  {} | {} | {} | actions: {}", card.submitter, card.category, card.submitted, actions.join(", "));
}

// =============================================================================
// OWNER
// =============================================================================

async fn run_dashboard(backend: &RestBackend) -> Result<(), CliError> {
    let session = require(backend, Requirement::Authenticated).await?;
    let user = session.require_user()?.id;
    let dashboard = Dashboard::load(backend, user, session.profile.as_ref()).await?;

    println!("{} ({})", dashboard.header.welcome, dashboard.header.university);
    let stats = dashboard.stats;
    println!(
        "total {} / pending {} / published {} / rejected {}",
        stats.total(),
        stats.pending,
        stats.approved,
        stats.rejected
    );
    if let Some(message) = dashboard.empty_message() {
        println!("{message}");
    }
    for event in &dashboard.events {
        let item = DashboardItem::from(event);
        println!("#{} [{}] {} | {}", item.id, item.badge.label, item.title, item.submitted);
    }
    Ok(())
}

async fn run_delete_own(backend: &RestBackend, prompt: &TerminalPrompt, id: EventId) -> Result<(), CliError> {
    let session = require(backend, Requirement::Authenticated).await?;
    let user = session.require_user()?.id;
    if owner::delete_own(backend, prompt, user, id).await? == Outcome::Cancelled {
        eprintln!("cancelled");
    }
    Ok(())
}

async fn run_submit(backend: &RestBackend, config: &ClientConfig, args: SubmitArgs) -> Result<(), CliError> {
    let session = require(backend, Requirement::Authenticated).await?;
    let user: Uuid = session.require_user()?.id;

    let (mut form, mode) = match args.edit {
        Some(id) => submission::load_for_edit(backend, id, user).await?,
        None => (EventForm::default(), Mode::Create),
    };
    overlay(&mut form, &args)?;

    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX));
    submission::submit(backend, &config.bucket, user, &form, &mode, timestamp_ms).await?;
    match mode {
        Mode::Create => println!("submitted; waiting for approval"),
        Mode::Edit { id, .. } => println!("event #{id} updated; back in review"),
    }
    Ok(())
}

/// Apply the flags that were given on top of the loaded or blank form.
fn overlay(form: &mut EventForm, args: &SubmitArgs) -> Result<(), CliError> {
    let fields = [
        (&mut form.title, &args.title),
        (&mut form.description, &args.description),
        (&mut form.event_date, &args.date),
        (&mut form.category, &args.category),
        (&mut form.venue, &args.venue),
        (&mut form.address, &args.address),
        (&mut form.organizer_name, &args.organizer),
        (&mut form.organizer_contact, &args.contact),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            field.clone_from(value);
        }
    }
    if let Some(path) = &args.image {
        form.image = Some(read_image(path)?);
    }
    Ok(())
}

fn read_image(path: &Path) -> Result<ImageFile, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile { path: path.to_owned(), source })?;
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    Ok(ImageFile { content_type: content_type_for(&name).to_owned(), name, bytes })
}

fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()).unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
