//! Browse and curate the mission catalog from the command line.
//!
//! Mission edits live only for a session, so the CLI covers the read side
//! (listing, filter options, favorites) plus favorite toggling, which is
//! persisted in the local store, and the contact form.
//!
//! # Examples
//!
//! ```sh
//! # All NASA missions launched in 2020
//! missiondeck list --agency NASA --year 2020
//!
//! # Free-text search, JSON output
//! missiondeck --data https://example.org/missions.json list --search apollo --json
//!
//! # Toggle a favorite, then show the favorites panel
//! missiondeck favorite 3
//! missiondeck favorites
//!
//! # Validate and send the contact form
//! missiondeck contact --first-name Ada --last-name Byron \
//!   --email ada@example.org --message "Bonjour, une question sur Rosetta."
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use missiondeck::contact::{self, SubmissionStatus};
use missiondeck::loader::document_schema;
use missiondeck::logging::init_stderr_logging;
use missiondeck::prelude::*;

/// Browse and curate the space mission catalog.
#[derive(Parser)]
#[command(name = "missiondeck")]
struct Cli {
    /// Catalog document: a file path or an http(s) URL.
    #[arg(long, default_value = "missions.json")]
    data: DataSource,

    /// What to show when the catalog cannot be loaded.
    #[arg(long, value_enum, default_value_t = FallbackPolicy::Empty)]
    fallback: FallbackPolicy,

    /// Local key-value store holding favorites.
    #[arg(long, default_value = "missiondeck-storage.json")]
    storage: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List missions matching the filters.
    List {
        /// Case-insensitive text matched against name, objective, agency and type.
        #[arg(long, default_value = "")]
        search: String,
        /// Exact agency.
        #[arg(long, default_value = "")]
        agency: String,
        /// Exact launch year.
        #[arg(long, default_value = "")]
        year: String,
        /// Exact mission type.
        #[arg(long = "type", default_value = "")]
        kind: String,
        /// Print the rendered view as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the agency, year and type dropdown choices.
    Options {
        #[arg(long)]
        json: bool,
    },
    /// Show the favorites panel.
    Favorites {
        #[arg(long)]
        json: bool,
    },
    /// Toggle a mission in the favorites set.
    Favorite { id: MissionId },
    /// Print the JSON Schema of the catalog document.
    Schema,
    /// Validate the contact form and simulate sending it.
    Contact {
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        message: String,
        /// Simulated network delay in milliseconds.
        #[arg(long, default_value_t = 2000)]
        delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    init_stderr_logging("info");

    let config = CatalogConfig::new(cli.data)
        .with_fallback(cli.fallback)
        .with_storage_path(cli.storage);

    match cli.command {
        Command::Schema => print_json(&document_schema()),
        Command::Contact {
            first_name,
            last_name,
            email,
            phone,
            message,
            delay_ms,
        } => {
            let form = ContactForm {
                first_name,
                last_name,
                email,
                phone,
                message,
            };
            run_contact(&form, Duration::from_millis(delay_ms)).await
        }
        Command::List {
            search,
            agency,
            year,
            kind,
            json,
        } => {
            let mut state = config.open().await;
            state.set_filter(MissionFilter {
                search,
                agency,
                year,
                kind,
            });
            let view = render(&state);
            if json {
                print_json(&view)
            } else {
                print_view(&view);
                Ok(())
            }
        }
        Command::Options { json } => {
            let state = config.open().await;
            if json {
                print_json(state.options())
            } else {
                let opts = state.options();
                println!("Agences : {}", opts.agencies.join(", "));
                let years: Vec<String> = opts.years.iter().map(i32::to_string).collect();
                println!("Années  : {}", years.join(", "));
                println!("Types   : {}", opts.kinds.join(", "));
                Ok(())
            }
        }
        Command::Favorites { json } => {
            let state = config.open().await;
            let panel = render_favorites(&state);
            if json {
                return print_json(&panel);
            }
            println!("Favoris ({})", panel.count);
            if let Some(msg) = &panel.empty_message {
                println!("  {msg}");
            }
            for item in &panel.items {
                let year = item.year.map(|y| y.to_string()).unwrap_or_default();
                println!(
                    "  ★ #{} {} [{}] {} · {}",
                    item.id, item.name, item.agency, year, item.kind
                );
                println!("      {}", item.objective);
            }
            Ok(())
        }
        Command::Favorite { id } => {
            let mut state = config.open().await;
            let now_favorite = state.toggle_favorite(id)?;
            let name = state
                .catalog()
                .get(id)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| format!("#{id}"));
            if now_favorite {
                println!("★ {name} ajouté aux favoris");
            } else {
                println!("☆ {name} retiré des favoris");
            }
            println!("Favoris : {}", state.favorites().len());
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize: {e}"))?;
    println!("{json}");
    Ok(())
}

fn print_view(view: &CatalogView) {
    if let Some(notice) = &view.notice {
        eprintln!("{}: {}", notice.title, notice.message);
    }
    match &view.empty {
        Some(EmptyState::LoadError { title, message, .. })
        | Some(EmptyState::NoResults { title, message }) => {
            println!("{title}");
            println!("{message}");
        }
        None => {
            for card in &view.cards {
                let star = if card.is_favorite { "★" } else { " " };
                println!(
                    "{star} #{:<3} {} [{}] {} · {}",
                    card.id, card.name, card.agency, card.launch_label, card.kind
                );
                println!("        {}", card.objective);
            }
        }
    }
    println!(
        "\n{} / {} missions · {} favoris",
        view.cards.len(),
        view.total,
        view.favorite_count
    );
}

async fn run_contact(form: &ContactForm, delay: Duration) -> Result<(), String> {
    let status = contact::submit(form, delay, |s| {
        if let SubmissionStatus::Sending { label } = s {
            println!("{label}");
        }
    })
    .await;

    match status {
        SubmissionStatus::Redirect { location } => {
            println!("Message envoyé → {location}");
            Ok(())
        }
        SubmissionStatus::Rejected { validation } => {
            for err in &validation.errors {
                eprintln!("{:?}: {}", err.field, err.message);
            }
            Err(format!("{} invalid field(s)", validation.errors.len()))
        }
        SubmissionStatus::Idle | SubmissionStatus::Sending { .. } => Ok(()),
    }
}
