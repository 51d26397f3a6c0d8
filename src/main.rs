use clap::{Args, Parser, Subcommand};
use intelplat::assistant::{Conversation, Persona};
use intelplat::config::DEFAULT_CONFIG_PATH;
use intelplat::prelude::*;
use serde::Serialize;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "intelplat", version)]
#[command(about = "Cyber incident, IT ticket and dataset tracker")]
struct Cli {
    /// Configuration file; a missing default file falls back to built-in defaults.
    #[arg(long, env = "INTELPLAT_CONFIG")]
    config: Option<String>,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Credentials {
    #[arg(long, env = "INTELPLAT_USER")]
    user: String,
    #[arg(long, env = "INTELPLAT_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or migrate the databases.
    Init,
    /// Create an account.
    Register {
        username: String,
        #[arg(long, env = "INTELPLAT_PASSWORD", hide_env_values = true)]
        password: String,
        /// Repeat the password; defaults to `--password`.
        #[arg(long)]
        confirm: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Check a username and password.
    Login {
        username: String,
        #[arg(long, env = "INTELPLAT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Incident {
        #[command(flatten)]
        auth: Credentials,
        #[command(subcommand)]
        command: IncidentCommand,
    },
    Ticket {
        #[command(flatten)]
        auth: Credentials,
        #[command(subcommand)]
        command: TicketCommand,
    },
    Dataset {
        #[command(flatten)]
        auth: Credentials,
        #[command(subcommand)]
        command: DatasetCommand,
    },
    /// Ask the assistant for a structured analysis.
    Analyze {
        #[command(flatten)]
        auth: Credentials,
        #[command(subcommand)]
        target: AnalyzeTarget,
    },
    /// Chat with an assistant persona, one message per line on stdin.
    ///
    /// `clear` starts a fresh conversation; `exit` or `quit` ends it.
    Chat {
        #[command(flatten)]
        auth: Credentials,
        /// cybersecurity, it-operations or data-science
        persona: Persona,
    },
}

#[derive(Debug, Subcommand)]
enum IncidentCommand {
    List,
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        severity: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "Open")]
        status: String,
        #[arg(long, default_value = "")]
        description: String,
        /// `YYYY-MM-DD HH:MM:SS`; defaults to now.
        #[arg(long)]
        timestamp: Option<String>,
    },
    Update {
        id: String,
        status: String,
    },
    Delete {
        id: String,
    },
    Summary,
}

#[derive(Debug, Subcommand)]
enum TicketCommand {
    List,
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        priority: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "Open")]
        status: String,
        #[arg(long, default_value = "IT_Support_A")]
        assigned_to: String,
        #[arg(long)]
        created_at: Option<String>,
        #[arg(long, default_value = "")]
        hours: String,
    },
    Update {
        id: String,
        status: String,
        hours: String,
    },
    Delete {
        id: String,
    },
    Summary,
}

#[derive(Debug, Subcommand)]
enum DatasetCommand {
    List,
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        rows: String,
        #[arg(long)]
        columns: String,
        #[arg(long)]
        uploaded_by: Option<String>,
        #[arg(long)]
        upload_date: Option<String>,
    },
    Rename {
        id: String,
        name: String,
    },
    Delete {
        id: String,
    },
    Summary,
}

#[derive(Debug, Subcommand)]
enum AnalyzeTarget {
    Incident { id: String },
    Tickets,
    Datasets,
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::from_file(path)?),
        None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Ok(Config::from_file(DEFAULT_CONFIG_PATH)?)
        }
        None => {
            tracing::debug!("No {DEFAULT_CONFIG_PATH}; using defaults");
            Ok(Config::default())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn login(dashboard: &Dashboard, auth: &Credentials) -> Result<Session> {
    let mut session = Session::new();
    dashboard
        .login(&mut session, &auth.user, &auth.password)
        .await?;
    Ok(session)
}

async fn run_incident(dashboard: &Dashboard, session: &Session, cmd: IncidentCommand) -> Result<()> {
    match cmd {
        IncidentCommand::List => print_json(&dashboard.incidents(session).await?)?,
        IncidentCommand::Add {
            id,
            severity,
            category,
            status,
            description,
            timestamp,
        } => {
            let form = IncidentForm {
                incident_id: id,
                timestamp,
                severity,
                category,
                status,
                description,
            };
            let incident = dashboard.add_incident(session, &form).await?;
            println!("Incident {} added.", incident.incident_id);
        }
        IncidentCommand::Update { id, status } => {
            dashboard.update_incident_status(session, &id, &status).await?;
            println!("Incident {id} updated.");
        }
        IncidentCommand::Delete { id } => {
            dashboard.delete_incident(session, &id).await?;
            println!("Incident {id} deleted.");
        }
        IncidentCommand::Summary => print_json(&dashboard.incident_summary(session).await?)?,
    }
    Ok(())
}

async fn run_ticket(dashboard: &Dashboard, session: &Session, cmd: TicketCommand) -> Result<()> {
    match cmd {
        TicketCommand::List => print_json(&dashboard.tickets(session).await?)?,
        TicketCommand::Add {
            id,
            priority,
            description,
            status,
            assigned_to,
            created_at,
            hours,
        } => {
            let form = TicketForm {
                ticket_id: id,
                priority,
                description,
                status,
                assigned_to,
                created_at,
                resolution_time_hours: hours,
            };
            let ticket = dashboard.add_ticket(session, &form).await?;
            println!("Ticket {} added.", ticket.ticket_id);
        }
        TicketCommand::Update { id, status, hours } => {
            dashboard.update_ticket(session, &id, &status, &hours).await?;
            println!("Ticket {id} updated.");
        }
        TicketCommand::Delete { id } => {
            dashboard.delete_ticket(session, &id).await?;
            println!("Ticket {id} deleted.");
        }
        TicketCommand::Summary => print_json(&dashboard.ticket_summary(session).await?)?,
    }
    Ok(())
}

async fn run_dataset(dashboard: &Dashboard, session: &Session, cmd: DatasetCommand) -> Result<()> {
    match cmd {
        DatasetCommand::List => print_json(&dashboard.datasets(session).await?)?,
        DatasetCommand::Add {
            id,
            name,
            rows,
            columns,
            uploaded_by,
            upload_date,
        } => {
            let form = DatasetForm {
                dataset_id: id,
                name,
                rows,
                columns,
                uploaded_by,
                upload_date,
            };
            let dataset = dashboard.add_dataset(session, &form).await?;
            println!("Dataset {} added.", dataset.dataset_id);
        }
        DatasetCommand::Rename { id, name } => {
            dashboard.rename_dataset(session, &id, &name).await?;
            println!("Dataset {id} renamed.");
        }
        DatasetCommand::Delete { id } => {
            dashboard.delete_dataset(session, &id).await?;
            println!("Dataset {id} deleted.");
        }
        DatasetCommand::Summary => print_json(&dashboard.dataset_summary(session).await?)?,
    }
    Ok(())
}

async fn run_chat(dashboard: &Dashboard, session: &Session, persona: Persona) -> Result<()> {
    let mut conversation = Conversation::new(persona);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.eq_ignore_ascii_case("clear") {
            conversation.clear();
            eprintln!("Conversation cleared.");
            continue;
        }
        match dashboard.chat(session, &mut conversation, line).await {
            Ok(reply) => {
                stdout.write_all(reply.as_bytes()).await?;
                stdout.write_all(b"\n\n").await?;
                stdout.flush().await?;
            }
            // The conversation survives a failed turn.
            Err(e) => {
                tracing::warn!(error = %e, "Chat turn failed");
                eprintln!("{}", e.client_message());
            }
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    let dashboard = intelplat::open_dashboard(&cfg).await?;

    match cli.command {
        Command::Init => println!("Databases ready."),
        Command::Register {
            username,
            password,
            confirm,
            role,
        } => {
            let form = RegistrationForm {
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                username,
                password,
                role,
            };
            let account = dashboard.register(&form).await?;
            println!(
                "Registration successful: {} ({})",
                account.username, account.role
            );
        }
        Command::Login { username, password } => {
            let mut session = Session::new();
            dashboard.login(&mut session, &username, &password).await?;
            println!("Welcome back, {username}!");
            dashboard.logout(&mut session);
        }
        Command::Incident { auth, command } => {
            let session = login(&dashboard, &auth).await?;
            run_incident(&dashboard, &session, command).await?;
        }
        Command::Ticket { auth, command } => {
            let session = login(&dashboard, &auth).await?;
            run_ticket(&dashboard, &session, command).await?;
        }
        Command::Dataset { auth, command } => {
            let session = login(&dashboard, &auth).await?;
            run_dataset(&dashboard, &session, command).await?;
        }
        Command::Analyze { auth, target } => {
            let session = login(&dashboard, &auth).await?;
            let text = match target {
                AnalyzeTarget::Incident { id } => dashboard.analyze_incident(&session, &id).await?,
                AnalyzeTarget::Tickets => dashboard.analyze_tickets(&session).await?,
                AnalyzeTarget::Datasets => dashboard.analyze_datasets(&session).await?,
            };
            println!("{text}");
        }
        Command::Chat { auth, persona } => {
            let session = login(&dashboard, &auth).await?;
            run_chat(&dashboard, &session, persona).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<PlatformError>() {
                Some(err) => {
                    tracing::debug!(error = %err, "Command failed");
                    eprintln!("{}", err.client_message());
                }
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
