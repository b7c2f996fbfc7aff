use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use customer_matrix_lib::commands::ai::{self as ai_cmd, Delivery, StyleRequest};
use customer_matrix_lib::commands::settings::{self, Theme};
use customer_matrix_lib::commands::{links as links_cmd, tasks as task_cmd};
use customer_matrix_lib::links::{PortalInput, SearchMode};
use customer_matrix_lib::tasks::{CommunicationKind, Priority, TaskDraft, TaskFilter};
use customer_matrix_lib::workflow::panels::{AssistAction, DocumentOutput};
use customer_matrix_lib::{AppConfig, DashboardState, Notice, NoticeLevel};

#[derive(Debug, Parser)]
#[command(
    name = "customer-matrix",
    version,
    about = "Insurance agency command center: searches, portals, tasks and AI documents"
)]
pub struct Cli {
    /// Override the directory holding saved state
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Directory where downloads and exports are written
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with a generated document. Without a flag the HTML is printed.
#[derive(Debug, Args, Clone, Default)]
pub struct DeliveryArgs {
    /// Save as `<subject>.html` in the output directory
    #[arg(long)]
    pub save: bool,
    /// Open a preview in the browser
    #[arg(long)]
    pub preview: bool,
    /// Open the print view
    #[arg(long)]
    pub print: bool,
    /// Copy the styled body and open a Gmail compose window
    #[arg(long)]
    pub email: bool,
}

impl DeliveryArgs {
    fn selected(&self) -> Vec<Delivery> {
        [
            (self.save, Delivery::Download),
            (self.preview, Delivery::Preview),
            (self.print, Delivery::Print),
            (self.email, Delivery::Email),
        ]
        .into_iter()
        .filter_map(|(on, delivery)| on.then_some(delivery))
        .collect()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Turn free text (and an optional PDF) into a styled document
    Style {
        /// Text to style
        text: Option<String>,
        /// Read the text from a file instead
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Template key (see `templates`)
        #[arg(long)]
        template: Option<String>,
        /// Context snippet id to include, repeatable
        #[arg(long = "context")]
        contexts: Vec<String>,
        #[arg(long)]
        pdf: Option<PathBuf>,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },
    /// Summarize one PDF or compare two
    Pdf {
        #[arg(long)]
        primary: Option<PathBuf>,
        #[arg(long)]
        secondary: Option<PathBuf>,
        #[arg(long, default_value = "")]
        instructions: String,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },
    /// Quote proposal from agent notes
    Quote {
        notes: String,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },
    /// Needs analysis for one or more lines of insurance
    Needs {
        /// auto, home, life or commercial; repeatable
        #[arg(long = "type", required = true)]
        types: Vec<String>,
        #[arg(long, default_value = "")]
        notes: String,
        /// Stream a plain-text questionnaire instead of a document
        #[arg(long)]
        stream: bool,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },
    /// Web-grounded property report for an address
    Report {
        address: String,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },
    /// Task matrix
    #[command(subcommand)]
    Task(TaskCommand),
    /// Open a search in the browser
    Search {
        /// agency, web, realestate, people or drive
        mode: SearchMode,
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Searches made today
    Searches,
    /// County tax/GIS page for an address
    Gis {
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
        /// Open the page as well
        #[arg(long)]
        open: bool,
    },
    /// Open a fixed agency page
    Open {
        #[arg(value_enum)]
        page: Page,
    },
    /// Carrier portals
    #[command(subcommand)]
    Portals(PortalCommand),
    /// Quick-access favorites
    #[command(subcommand)]
    Favorites(FavoriteCommand),
    /// Quick-action links
    Actions {
        /// Title of the action to open; lists all when omitted
        title: Option<String>,
    },
    /// Context snippets for the document styler
    #[command(subcommand)]
    Contexts(ContextCommand),
    /// List the styler templates
    Templates,
    /// Show or change the theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCommand>,
    },
    /// Manage the Gemini API key
    #[command(subcommand)]
    Key(KeyCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Page {
    Home,
    NewCustomer,
    Clients,
}

/// Task form fields. Unset fields keep their current value.
#[derive(Debug, Args, Clone, Default)]
pub struct TaskFields {
    #[arg(long)]
    pub text: Option<String>,
    /// Due date, YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub customer: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub value: Option<f64>,
    #[arg(long = "type")]
    pub task_type: Option<String>,
    #[arg(long)]
    pub follow_up: Option<String>,
    #[arg(long)]
    pub carrier: Option<String>,
    #[arg(long)]
    pub policy: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub recurring: Option<bool>,
}

impl TaskFields {
    fn apply(self, draft: &mut TaskDraft) {
        fn set(slot: &mut String, value: Option<String>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        fn set_date(slot: &mut Option<String>, value: Option<String>) {
            if let Some(v) = value {
                *slot = Some(v).filter(|d| !d.trim().is_empty());
            }
        }

        set(&mut draft.text, self.text);
        set_date(&mut draft.due_date, self.due);
        set(&mut draft.customer_name, self.customer);
        set(&mut draft.phone, self.phone);
        set(&mut draft.email, self.email);
        set(&mut draft.task_type, self.task_type);
        set_date(&mut draft.follow_up_date, self.follow_up);
        set(&mut draft.carrier, self.carrier);
        set(&mut draft.policy_number, self.policy);
        set(&mut draft.description, self.description);
        set(&mut draft.internal_notes, self.notes);
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        if self.value.is_some() {
            draft.customer_value = self.value;
        }
        if let Some(recurring) = self.recurring {
            draft.is_recurring = recurring;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// List tasks in display order
    List {
        #[arg(long, default_value_t = TaskFilter::All)]
        filter: TaskFilter,
    },
    Add {
        #[command(flatten)]
        fields: TaskFields,
    },
    Edit {
        id: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Toggle completion
    Done { id: String },
    Delete { id: String },
    /// Log a call, email or note
    Log {
        id: String,
        kind: CommunicationKind,
        text: String,
    },
    /// Create a task from free text and/or a PDF
    Extract {
        #[arg(default_value = "")]
        text: String,
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
    /// Draft an email, a summary, or answer a custom prompt for a task
    Assist {
        id: String,
        /// email, summary or custom
        #[arg(long, default_value = "summary")]
        action: String,
        /// Prompt for the custom action
        #[arg(long)]
        prompt: Option<String>,
        /// Append the result to the task's internal notes
        #[arg(long)]
        add_to_notes: bool,
        /// Copy the result to the clipboard
        #[arg(long)]
        copy: bool,
    },
    Export,
    Import { path: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum PortalCommand {
    List,
    Add {
        name: String,
        url: String,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Remove { id: String },
    /// Remove every custom portal
    Reset,
    Open { id: String },
    Export,
    Import { path: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum FavoriteCommand {
    List,
    Add { name: String, url: String },
    Remove { id: String },
    Open { id: String },
    Export,
    Import { path: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum ContextCommand {
    List,
    Add { name: String, text: String },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    Toggle,
    Set { theme: Theme },
}

#[derive(Debug, Subcommand)]
pub enum KeyCommand {
    Set { key: String },
    Delete,
    Status,
}

pub async fn run(args: Cli) -> Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(dir) = args.state_dir.clone() {
        config.state_dir = dir;
    }
    if let Some(dir) = args.output_dir.clone() {
        config.output_dir = dir;
    }
    let state = DashboardState::open(config).context("Failed to open dashboard state")?;
    let json = args.json;

    match args.command {
        Command::Style {
            text,
            file,
            template,
            contexts,
            pdf,
            delivery,
        } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => text.unwrap_or_default(),
            };
            let request = StyleRequest {
                text,
                template,
                contexts,
                pdf,
            };
            let output = ai_cmd::style_document(&state, request)
                .await
                .map_err(anyhow::Error::msg)?;
            finish_document(&state, &output, &delivery, json)
        }
        Command::Pdf {
            primary,
            secondary,
            instructions,
            delivery,
        } => {
            let output = ai_cmd::parse_pdfs(
                &state,
                primary.as_deref(),
                secondary.as_deref(),
                &instructions,
            )
            .await
            .map_err(anyhow::Error::msg)?;
            finish_document(&state, &output, &delivery, json)
        }
        Command::Quote { notes, delivery } => {
            let output = ai_cmd::generate_quote_proposal(&state, &notes)
                .await
                .map_err(anyhow::Error::msg)?;
            finish_document(&state, &output, &delivery, json)
        }
        Command::Needs {
            types,
            notes,
            stream,
            delivery,
        } => {
            if stream {
                let mut on_chunk = |chunk: &str| {
                    let mut out = std::io::stdout();
                    let _ = out.write_all(chunk.as_bytes());
                    let _ = out.flush();
                };
                ai_cmd::stream_questionnaire(&state, &types, &notes, &mut on_chunk)
                    .await
                    .map_err(anyhow::Error::msg)?;
                println!();
                return Ok(());
            }
            let output = ai_cmd::generate_needs_analysis(&state, &types, &notes)
                .await
                .map_err(anyhow::Error::msg)?;
            finish_document(&state, &output, &delivery, json)
        }
        Command::Report { address, delivery } => {
            let output = ai_cmd::generate_property_report(&state, &address)
                .await
                .map_err(anyhow::Error::msg)?;
            finish_document(&state, &output, &delivery, json)
        }
        Command::Task(command) => run_task(&state, command, json).await,
        Command::Search { mode, query } => report(links_cmd::search(&state, mode, &query.join(" "))),
        Command::Searches => {
            let counter = links_cmd::searches_today(&state);
            if json {
                return print_json(&counter);
            }
            println!("{} searches today ({})", counter.count, counter.date);
            Ok(())
        }
        Command::Gis { address, open } => {
            let target = links_cmd::lookup_gis(&address.join(" ")).map_err(anyhow::Error::msg)?;
            if json {
                print_json(&target)?;
            } else {
                println!("{}: {}", target.county, target.url);
                if let Some(note) = &target.note {
                    eprintln!("{}", note);
                }
            }
            if open {
                report(links_cmd::open_url(&state, &target.url))?;
            }
            Ok(())
        }
        Command::Open { page } => report(match page {
            Page::Home => links_cmd::open_agency_home(&state),
            Page::NewCustomer => links_cmd::open_new_customer(&state),
            Page::Clients => links_cmd::open_clients_folder(&state),
        }),
        Command::Portals(command) => run_portals(&state, command, json),
        Command::Favorites(command) => run_favorites(&state, command, json),
        Command::Actions { title } => match title {
            Some(title) => report(links_cmd::open_quick_action(&state, &title)),
            None => {
                let actions = links_cmd::list_quick_actions();
                if json {
                    return print_json(&actions);
                }
                for action in actions {
                    println!("{:<24} {}", action.title, action.description);
                }
                Ok(())
            }
        },
        Command::Contexts(command) => match command {
            ContextCommand::List => {
                let contexts = ai_cmd::list_contexts(&state);
                if json {
                    return print_json(&contexts);
                }
                for context in contexts {
                    let origin = if context.builtin { "built-in" } else { "custom" };
                    println!("{:<28} {:<28} {}", context.id, context.name, origin);
                }
                Ok(())
            }
            ContextCommand::Add { name, text } => report(ai_cmd::add_context(&state, &name, &text)),
            ContextCommand::Delete { id } => report(ai_cmd::delete_context(&state, &id)),
        },
        Command::Templates => {
            let templates = ai_cmd::list_templates();
            if json {
                return print_json(&templates);
            }
            for template in templates {
                println!("{:<14} {}", template.key, template.title);
            }
            Ok(())
        }
        Command::Theme { action } => {
            let theme = match action {
                None => settings::get_theme(&state),
                Some(ThemeCommand::Toggle) => {
                    settings::toggle_theme(&state).map_err(anyhow::Error::msg)?
                }
                Some(ThemeCommand::Set { theme }) => {
                    settings::set_theme(&state, theme).map_err(anyhow::Error::msg)?
                }
            };
            println!("{}", theme);
            Ok(())
        }
        Command::Key(command) => match command {
            KeyCommand::Set { key } => report(settings::set_api_key(&key)),
            KeyCommand::Delete => report(settings::delete_api_key()),
            KeyCommand::Status => {
                let providers = settings::get_configured_providers();
                if json {
                    return print_json(&providers);
                }
                for status in providers {
                    let label = if status.configured { "configured" } else { "not set" };
                    println!("{}: {}", status.provider, label);
                }
                Ok(())
            }
        },
    }
}

async fn run_task(state: &DashboardState, command: TaskCommand, json: bool) -> Result<()> {
    match command {
        TaskCommand::List { filter } => {
            let rows = task_cmd::list_tasks(state, filter);
            if json {
                return print_json(&rows);
            }
            for row in rows {
                let mark = if row.task.completed { "x" } else { " " };
                let overdue = if row.overdue { " !" } else { "" };
                println!(
                    "[{}] {}  {:<6} {}  ({}{})",
                    mark, row.task.id, row.task.priority, row.task.text, row.due_label, overdue
                );
            }
            Ok(())
        }
        TaskCommand::Add { fields } => {
            let mut draft = TaskDraft::default();
            fields.apply(&mut draft);
            report(task_cmd::add_task(state, draft))
        }
        TaskCommand::Edit { id, fields } => {
            let mut draft = task_cmd::edit_form(state, &id).map_err(anyhow::Error::msg)?;
            fields.apply(&mut draft);
            report(task_cmd::update_task(state, &id, draft))
        }
        TaskCommand::Done { id } => report(task_cmd::toggle_task(state, &id)),
        TaskCommand::Delete { id } => report(task_cmd::delete_task(state, &id)),
        TaskCommand::Log { id, kind, text } => {
            report(task_cmd::log_communication(state, &id, kind, &text))
        }
        TaskCommand::Extract { text, pdf } => {
            let task = ai_cmd::extract_task(state, &text, pdf.as_deref())
                .await
                .map_err(anyhow::Error::msg)?;
            if json {
                return print_json(&task);
            }
            eprintln!("Task created from AI extraction.");
            println!("{}  {}", task.id, task.text);
            Ok(())
        }
        TaskCommand::Assist {
            id,
            action,
            prompt,
            add_to_notes,
            copy,
        } => {
            let action =
                AssistAction::parse(&action, prompt.as_deref()).map_err(anyhow::Error::new)?;
            let content = ai_cmd::run_task_assistant(state, &id, &action)
                .await
                .map_err(anyhow::Error::msg)?;
            println!("{}", content);
            if copy {
                report(tokio::task::block_in_place(|| ai_cmd::copy_text(state, &content)))?;
            }
            if add_to_notes {
                report(ai_cmd::add_assistant_notes(state, &id, &action, &content))?;
            }
            Ok(())
        }
        TaskCommand::Export => {
            let path = task_cmd::export_tasks(state).map_err(anyhow::Error::msg)?;
            println!("{}", path.display());
            Ok(())
        }
        TaskCommand::Import { path } => report(task_cmd::import_tasks(state, &path)),
    }
}

fn run_portals(state: &DashboardState, command: PortalCommand, json: bool) -> Result<()> {
    match command {
        PortalCommand::List => {
            let portals = links_cmd::list_portals(state);
            if json {
                return print_json(&portals);
            }
            for portal in portals {
                let origin = if portal.custom { "*" } else { " " };
                println!("{} {:<38} {:<20} {}", origin, portal.id, portal.name, portal.url);
            }
            Ok(())
        }
        PortalCommand::Add {
            name,
            url,
            icon,
            description,
        } => report(links_cmd::add_portal(
            state,
            PortalInput {
                name,
                url,
                icon,
                description,
            },
        )),
        PortalCommand::Remove { id } => report(links_cmd::remove_portal(state, &id)),
        PortalCommand::Reset => report(links_cmd::reset_portals(state)),
        PortalCommand::Open { id } => report(links_cmd::open_portal(state, &id)),
        PortalCommand::Export => {
            let path = links_cmd::export_portals(state).map_err(anyhow::Error::msg)?;
            println!("{}", path.display());
            Ok(())
        }
        PortalCommand::Import { path } => report(links_cmd::import_portals(state, &path)),
    }
}

fn run_favorites(state: &DashboardState, command: FavoriteCommand, json: bool) -> Result<()> {
    match command {
        FavoriteCommand::List => {
            let favorites = links_cmd::list_favorites(state);
            if json {
                return print_json(&favorites);
            }
            for fav in favorites {
                println!("{:<38} {:<20} {}", fav.id, fav.name, fav.url);
            }
            Ok(())
        }
        FavoriteCommand::Add { name, url } => report(links_cmd::add_favorite(state, &name, &url)),
        FavoriteCommand::Remove { id } => report(links_cmd::remove_favorite(state, &id)),
        FavoriteCommand::Open { id } => report(links_cmd::open_favorite(state, &id)),
        FavoriteCommand::Export => {
            let path = links_cmd::export_favorites(state).map_err(anyhow::Error::msg)?;
            println!("{}", path.display());
            Ok(())
        }
        FavoriteCommand::Import { path } => report(links_cmd::import_favorites(state, &path)),
    }
}

/// Print or deliver a finished document
fn finish_document(
    state: &DashboardState,
    output: &DocumentOutput,
    delivery: &DeliveryArgs,
    json: bool,
) -> Result<()> {
    report(ai_cmd::generated_notice(output))?;

    let selected = delivery.selected();
    if selected.is_empty() {
        if json {
            return print_json(output);
        }
        println!("{}", output.document.body);
        return Ok(());
    }
    for delivery in selected {
        // Clipboard and browser handoffs block while the OS takes ownership
        report(tokio::task::block_in_place(|| ai_cmd::deliver(state, output, delivery)))?;
    }
    Ok(())
}

/// Notices go to stderr; warnings and failures end the command with an error
fn report(notice: Notice) -> Result<()> {
    match notice.level {
        NoticeLevel::Success | NoticeLevel::Info => {
            eprintln!("{}", notice.message);
            Ok(())
        }
        NoticeLevel::Warning | NoticeLevel::Danger => Err(anyhow::anyhow!(notice.message)),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
