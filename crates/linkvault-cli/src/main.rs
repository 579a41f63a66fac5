mod render;

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use linkvault_api::BookmarksClient;
use linkvault_core::{
    store::{DELETE_FAILED, LOAD_FAILED},
    BookmarkDraft, BookmarkId, BookmarkStore, Config, Error, LocalState, Theme, ThemePreference,
};
use render::Renderer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "linkvault")]
#[command(version, about = "Manage bookmarks kept by a remote bookmarks API", long_about = None)]
struct Cli {
    /// Base URL of the bookmarks API (overrides the config file)
    #[arg(long, env = "LINKVAULT_API_URL", global = true)]
    api_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List bookmarks
    List {
        /// Only bookmarks with this tag (filtered by the server)
        #[arg(long)]
        tag: Option<String>,
        /// Search titles and URLs
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Add a bookmark
    Add {
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated, e.g. "react, docs"
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Edit a bookmark; fields left out keep their current value
    Edit {
        id: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a bookmark
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(clap::Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so listings can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkvault=info,linkvault_core=info,linkvault_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let state = LocalState::open_default().context("Failed to open local state")?;
    let mut theme = ThemePreference::load(state);
    let renderer = renderer_for(theme.current());

    let Some(command) = cli.command else {
        println!("No command specified. Try --help");
        return Ok(());
    };

    tracing::debug!("Using bookmarks API at {}", config.api.base_url);
    let client = BookmarksClient::with_timeout(&config.api.base_url, config.api.timeout())?;
    let mut store = BookmarkStore::new(client);

    match command {
        Commands::Theme { action } => {
            run_theme(&mut theme, action.unwrap_or(ThemeAction::Show))?;
        }
        Commands::List { tag, search } => {
            if store.load(tag.as_deref()).await.is_err() {
                return Err(failure(&renderer, store.error(), LOAD_FAILED));
            }
            let query = search.unwrap_or_default();
            let shown = store.filter(&query);
            print!(
                "{}",
                renderer.listing(&shown, &store.results_label(&query), store.active_tag())
            );
        }
        Commands::Add {
            url,
            title,
            description,
            tags,
        } => {
            let draft = BookmarkDraft {
                url,
                title,
                description,
                tags,
            };
            match store.create_from_draft(&draft).await {
                Ok(created) => print!("Added\n{}", renderer.bookmark(&created)),
                Err(err) => return Err(form_failure(&renderer, &store, err)),
            }
        }
        Commands::Edit {
            id,
            url,
            title,
            description,
            tags,
        } => {
            let id = BookmarkId::new(id);
            if store.load(None).await.is_err() {
                return Err(failure(&renderer, store.error(), LOAD_FAILED));
            }
            let current = store
                .get(&id)
                .ok_or_else(|| anyhow::anyhow!(renderer.error(&format!("No bookmark with id {}", id))))?;

            let mut draft = BookmarkDraft::from(current);
            if let Some(url) = url {
                draft.url = url;
            }
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(tags) = tags {
                draft.tags = tags;
            }

            match store.update_from_draft(&id, &draft).await {
                Ok(updated) => print!("Saved changes\n{}", renderer.bookmark(&updated)),
                Err(err) => return Err(form_failure(&renderer, &store, err)),
            }
        }
        Commands::Delete { id, yes } => {
            let id = BookmarkId::new(id);
            if !yes && !confirm("Delete this bookmark?")? {
                println!("Cancelled");
                return Ok(());
            }
            if store.load(None).await.is_err() {
                return Err(failure(&renderer, store.error(), LOAD_FAILED));
            }
            if store.delete(&id).await.is_err() {
                return Err(failure(&renderer, store.error(), DELETE_FAILED));
            }
            println!("Deleted {} ({} left)", id, store.bookmarks().len());
        }
    }

    Ok(())
}

fn run_theme(theme: &mut ThemePreference, action: ThemeAction) -> anyhow::Result<()> {
    match action {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            theme.toggle()?;
        }
        ThemeAction::Set { theme: choice } => {
            theme.set(choice.into())?;
        }
    }

    let current = theme.current();
    println!("Theme: {} (switch with: {})", current, current.toggle_label());
    Ok(())
}

/// Colors a stream only when it is a terminal and NO_COLOR is unset
fn renderer_for(theme: Theme) -> Renderer {
    if std::env::var_os("NO_COLOR").is_some() {
        return Renderer::plain();
    }
    Renderer::for_streams(
        theme.palette(),
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
    )
}

fn failure(renderer: &Renderer, message: Option<&str>, fallback: &str) -> anyhow::Error {
    anyhow::anyhow!(renderer.error(message.unwrap_or(fallback)))
}

/// Validation errors are reported as-is; request errors via the store's message
fn form_failure<A>(renderer: &Renderer, store: &BookmarkStore<A>, err: Error) -> anyhow::Error
where
    A: linkvault_core::BookmarkApi,
{
    match err {
        Error::Validation(v) => anyhow::anyhow!(renderer.error(&v.to_string())),
        other => failure(renderer, store.error(), &other.to_string()),
    }
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
