//! csmctl - Operator CLI for the CSM fiber provisioning backend
//!
//! Logs in against the backend, keeps the bearer token between runs, and
//! drives the ONT configuration workflow plus the customer / ONU / ticket
//! endpoints around it.

mod api;
mod config;
mod http;
mod models;
mod session;
mod utils;
mod workflow;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use api::ProvisioningApi;
use http::ApiClient;
use models::{
    ForwardTicketPayload, OpenTicketRequest, ProcessTicketRequest, SelectedCustomer,
    TicketActionResponse, TicketClosePayload,
};
use session::{FileSessionStore, UnauthorizedHook};
use workflow::ConfigSession;

#[derive(Parser, Debug)]
#[command(name = "csmctl")]
#[command(about = "Operator CLI for the CSM provisioning backend", long_about = None)]
struct Args {
    /// Config file path (default: csmctl.toml)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and store the session token
    Login {
        #[arg(short, long)]
        username: String,

        /// Password (falls back to CSMCTL_PASSWORD, then a prompt)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Drop the stored session token
    Logout,

    /// Show the OLT / modem / package option lists
    Options,

    /// Detect unconfigured ONTs on an OLT
    Detect { olt: String },

    /// Run the full ONT configuration workflow
    Configure(ConfigureOpts),

    /// Search the fiber customer database
    Customers { query: Option<String> },

    /// ONU actions for a provisioned customer
    Onu {
        #[command(subcommand)]
        action: OnuAction,
    },

    /// List a customer's invoices
    Invoices { user_pppoe: String },

    /// Trouble-ticket actions
    Ticket {
        #[command(subcommand)]
        action: TicketAction,
    },
}

#[derive(clap::Args, Debug)]
struct ConfigureOpts {
    /// OLT to scan and configure against
    #[arg(long)]
    olt: String,

    /// Serial number of the ONT to configure
    #[arg(long)]
    sn: String,

    /// Pick the customer from the PSB list by PPPoE username
    #[arg(long)]
    psb_user: Option<String>,

    /// Free-text search against the customer database
    #[arg(long)]
    query: Option<String>,

    /// PPPoE username to pick when the search matches several records
    #[arg(long)]
    customer: Option<String>,

    /// Modem type, one of the server's modem options
    #[arg(long)]
    modem: String,

    /// Ethernet ports to lock, e.g. "1,3"
    #[arg(long, default_value = "")]
    lock_eth: String,
}

#[derive(Subcommand, Debug)]
enum OnuAction {
    /// Device readout (state, distance, attenuation, ports, logs)
    Detail { user_pppoe: String },

    /// Raw port-state dump
    State { user_pppoe: String },

    /// Reboot the customer's ONU
    Reboot { user_pppoe: i64 },
}

#[derive(Subcommand, Debug)]
enum TicketAction {
    Open {
        #[arg(long)]
        user: String,

        #[arg(long)]
        issue: String,

        #[arg(long)]
        description: Option<String>,

        /// Process the ticket immediately after opening it
        #[arg(long)]
        process: bool,
    },
    Process {
        ticket_id: String,

        #[arg(long)]
        note: Option<String>,
    },
    Forward {
        ticket_id: String,

        #[arg(long)]
        destination: String,
    },
    Close {
        ticket_id: String,

        #[arg(long)]
        resolution: Option<String>,
    },
}

/// CLI stand-in for the login redirect: the pipeline has already cleared
/// the token by the time this fires.
struct CliLogoutNotice;

impl UnauthorizedHook for CliLogoutNotice {
    fn on_unauthorized(&self) {
        eprintln!("Session expired. Run `csmctl login` to authenticate again.");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = config::Config::load(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level)),
        )
        .init();

    let store = Arc::new(FileSessionStore::default_location());
    let client = ApiClient::new(&cfg.api.base_url, store, &cfg.http)?
        .with_unauthorized_hook(Box::new(CliLogoutNotice));

    match args.command {
        Command::Login { username, password } => {
            let password = read_password(password)?;
            api::auth::login(&client, &username, &password).await?;
            println!("Login successful.");
        }
        Command::Logout => {
            api::auth::logout(&client);
            println!("Logged out.");
        }
        Command::Options => {
            let options = client.get_options().await?;
            println!("OLTs:");
            for olt in &options.olt_options {
                println!("  {}", olt);
            }
            println!("Modems:");
            for modem in &options.modem_options {
                println!("  {}", modem);
            }
            println!("Packages:");
            for package in &options.package_options {
                println!("  {}", package);
            }
        }
        Command::Detect { olt } => {
            let onts = client.detect_unconfigured_onts(&olt).await?;
            if onts.is_empty() {
                println!("No unconfigured ONTs found");
            } else {
                for ont in &onts {
                    println!("{}  slot {} port {}", ont.sn, ont.pon_slot, ont.pon_port);
                }
            }
        }
        Command::Configure(opts) => run_configure(&client, opts).await?,
        Command::Customers { query } => {
            let records = api::customer::search_customers(&client, query.as_deref()).await?;
            if records.is_empty() {
                println!("No customers found");
            }
            for record in &records {
                println!(
                    "{}  {}  {}  {}  {}  {}  (updated {})",
                    record.user_pppoe,
                    record.name,
                    record.olt_name,
                    record.onu_sn,
                    record.paket,
                    record.alamat,
                    record.updated_at
                );
            }
        }
        Command::Onu { action } => match action {
            OnuAction::Detail { user_pppoe } => {
                let detail = api::customer::get_onu_detail(&client, &user_pppoe).await?;
                println!("{}", utils::format_onu_detail(&detail));
            }
            OnuAction::State { user_pppoe } => {
                let state = api::customer::get_onu_state(&client, &user_pppoe).await?;
                println!("{}", state.onu_state_data);
            }
            OnuAction::Reboot { user_pppoe } => {
                let response = api::customer::reboot_onu(&client, user_pppoe).await?;
                println!("{}", response.status);
            }
        },
        Command::Invoices { user_pppoe } => {
            let invoices = api::customer::get_invoices(&client, &user_pppoe).await?;
            if invoices.is_empty() {
                println!("No invoices found");
            }
            for invoice in &invoices {
                println!(
                    "{}  {:>12}  {}  {}",
                    invoice.period,
                    invoice.amount,
                    invoice.status,
                    invoice.paid_at.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Ticket { action } => {
            let response = run_ticket_action(&client, action).await?;
            print_ticket_response(&response);
        }
    }

    Ok(())
}

/// Drive one configuration attempt through the workflow state machine:
/// select OLT, detect, pick the ONT by serial, resolve the customer from
/// either lookup path, then submit.
async fn run_configure(client: &ApiClient, opts: ConfigureOpts) -> Result<()> {
    let mut session = ConfigSession::new();
    session.select_olt(&opts.olt);

    tracing::info!("Detecting unconfigured ONTs on {}", opts.olt);
    session.detect_onts(client).await;
    if let Some(err) = session.error() {
        bail!("{}", err);
    }

    let Some(ont) = session
        .unconfigured_onts()
        .iter()
        .find(|o| o.sn == opts.sn)
        .cloned()
    else {
        let detected: Vec<&str> = session
            .unconfigured_onts()
            .iter()
            .map(|o| o.sn.as_str())
            .collect();
        bail!(
            "ONT {} not found on {}. Detected: {}",
            opts.sn,
            opts.olt,
            if detected.is_empty() {
                "none".to_string()
            } else {
                detected.join(", ")
            }
        );
    };
    tracing::info!("Selected ONT {} (slot {}, port {})", ont.sn, ont.pon_slot, ont.pon_port);
    session.select_ont(ont);

    let customer = resolve_customer(client, &opts).await?;
    tracing::info!("Selected customer {}", customer.info.pppoe_user);
    session.select_customer(customer);
    session.set_modem_type(&opts.modem);
    session.set_eth_locks(utils::parse_eth_locks(&opts.lock_eth)?);

    session.configure(client).await;

    for line in session.logs() {
        println!("{}", line);
    }
    if let Some(err) = session.error() {
        bail!("{}", err);
    }
    if let Some(message) = session.success() {
        println!("{}", message);
    }
    if let Some(summary) = session.summary() {
        println!(
            "{}  slot {} port {} onu {} vlan {}  {}  {} / {}  [{}]",
            summary.sn,
            summary.pon_slot,
            summary.pon_port,
            summary.onu_id,
            summary.vlan,
            summary.customer_name,
            summary.modem_type,
            summary.package,
            summary.status
        );
    }

    Ok(())
}

/// Resolve the customer selection from either entry point: the PSB
/// pre-registration list, or a free-text search against the database.
/// Both paths produce the same canonical shape.
async fn resolve_customer(client: &ApiClient, opts: &ConfigureOpts) -> Result<SelectedCustomer> {
    if let Some(username) = &opts.psb_user {
        let records = client.get_psb_data().await?;
        let record = records
            .iter()
            .find(|r| &r.username == username)
            .with_context(|| format!("No PSB record for username {}", username))?;
        return Ok(SelectedCustomer::from(record));
    }

    if let Some(query) = &opts.query {
        let records = api::customer::search_customers(client, Some(query)).await?;
        let record = match &opts.customer {
            Some(user) => records.iter().find(|r| r.user_pppoe == *user),
            None if records.len() == 1 => records.first(),
            None => bail!(
                "Search matched {} customers; pass --customer <PPPOE_USER> to pick one",
                records.len()
            ),
        };
        let record = record.context("No matching customer record")?;
        return Ok(SelectedCustomer::from(record));
    }

    bail!("Provide --psb-user or --query to choose a customer")
}

async fn run_ticket_action(
    client: &ApiClient,
    action: TicketAction,
) -> Result<TicketActionResponse> {
    let response = match action {
        TicketAction::Open {
            user,
            issue,
            description,
            process,
        } => {
            api::ticket::open_ticket(
                client,
                &OpenTicketRequest {
                    user_pppoe: user,
                    issue,
                    description,
                    process_immediately: process,
                },
            )
            .await?
        }
        TicketAction::Process { ticket_id, note } => {
            api::ticket::process_ticket(client, &ProcessTicketRequest { ticket_id, note }).await?
        }
        TicketAction::Forward {
            ticket_id,
            destination,
        } => {
            api::ticket::forward_ticket(
                client,
                &ForwardTicketPayload {
                    ticket_id,
                    destination,
                },
            )
            .await?
        }
        TicketAction::Close {
            ticket_id,
            resolution,
        } => {
            api::ticket::close_ticket(
                client,
                &TicketClosePayload {
                    ticket_id,
                    resolution,
                },
            )
            .await?
        }
    };

    Ok(response)
}

fn print_ticket_response(response: &TicketActionResponse) {
    match (&response.ticket_id, &response.message) {
        (Some(id), Some(message)) => println!("{} ({}): {}", response.status, id, message),
        (Some(id), None) => println!("{} ({})", response.status, id),
        (None, Some(message)) => println!("{}: {}", response.status, message),
        (None, None) => println!("{}", response.status),
    }
}

fn read_password(flag: Option<String>) -> Result<String> {
    if let Some(password) = flag {
        return Ok(password);
    }

    if let Ok(password) = std::env::var("CSMCTL_PASSWORD") {
        if !password.is_empty() {
            return Ok(password);
        }
    }

    eprint!("Password: ");
    std::io::stderr().flush().context("Failed to flush prompt")?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read password")?;

    Ok(line.trim_end().to_string())
}
