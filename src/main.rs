//! CLI entry point for fleetcloud — a FleetCloud device-management client.
//!
//! Logs in with username/password, then dispatches to the selected API
//! action based on CLI flags (`-a` to list applications, etc.).
//!
//! Exit codes:
//! - 0: success
//! - 1: runtime error (auth failure, API error)
//! - 2: argument validation error (clap handles this automatically)

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fleetcloud::applications;
use fleetcloud::auth::{login, Credentials};
use fleetcloud::client::Session;
use fleetcloud::devices;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// API base URL. Override for on-premise or staging deployments.
    #[arg(long, default_value = "https://api.fleetcloud.io")]
    endpoint: String,

    /// FleetCloud account username.
    #[arg(long)]
    username: String,

    /// Account email address (informational; login is by username).
    #[arg(long, default_value = "")]
    email: String,

    /// Account password. Prefer setting via the FLEETCLOUD_PASSWORD
    /// environment variable to avoid exposing it in process listings and
    /// shell history.
    #[arg(long, env = "FLEETCLOUD_PASSWORD")]
    password: String,

    /// Application name (required for -c, -r, and -k).
    #[arg(long)]
    app: Option<String>,

    /// Device type for application creation (required for -c).
    #[arg(long)]
    device_type: Option<String>,

    /// Device UUID for registration. Generated locally when omitted.
    #[arg(long)]
    uuid: Option<String>,

    #[command(flatten)]
    actions: ActionFlags,
}

/// Action flags — exactly one must be set per invocation.
///
/// Clap enforces this at parse time via the `group` attribute:
/// - If none are set, clap prints an error and exits with code 2.
/// - If more than one is set, clap prints an error and exits with code 2.
#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct ActionFlags {
    /// List all applications owned by the account.
    #[arg(short)]
    apps: bool,

    /// List all devices visible to the account.
    #[arg(short)]
    devices: bool,

    /// Create an application. Requires --app and --device-type.
    #[arg(short)]
    create: bool,

    /// Register a device under an application. Requires --app; --uuid is
    /// generated locally when omitted.
    #[arg(short)]
    register: bool,

    /// Generate an API key for an application. Requires --app.
    #[arg(short)]
    key: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Cli::parse();

    let mut session = Session::with_base_url(&args.endpoint);
    let credentials = Credentials {
        username: args.username.clone(),
        email: args.email.clone(),
        password: args.password.clone(),
    };
    if let Err(e) = login(&mut session, &credentials).await {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    // Dispatch on the selected action flag. The per-action required flags
    // (--app, --device-type) are semantic requirements that clap can't
    // enforce via groups because the flags are shared across action types,
    // so they are validated here at runtime.
    let outcome = if args.actions.apps {
        list_apps(&session).await
    } else if args.actions.devices {
        list_devices(&session).await
    } else if args.actions.create {
        let Some(app) = args.app.as_deref() else {
            eprintln!("Error: --app is required when using -c (create application)");
            return ExitCode::FAILURE;
        };
        let Some(device_type) = args.device_type.as_deref() else {
            eprintln!("Error: --device-type is required when using -c (create application)");
            return ExitCode::FAILURE;
        };
        create_app(&session, app, device_type).await
    } else if args.actions.register {
        let Some(app) = args.app.as_deref() else {
            eprintln!("Error: --app is required when using -r (register device)");
            return ExitCode::FAILURE;
        };
        let uuid = args.uuid.clone().unwrap_or_else(devices::generate_uuid);
        register_device(&session, app, &uuid).await
    } else if args.actions.key {
        let Some(app) = args.app.as_deref() else {
            eprintln!("Error: --app is required when using -k (generate API key)");
            return ExitCode::FAILURE;
        };
        generate_key(&session, app).await
    } else {
        // Unreachable because clap enforces exactly one action flag via
        // the group constraint, but handled explicitly so the CLI never
        // silently succeeds with no action.
        eprintln!("Error: no action flag provided");
        return ExitCode::FAILURE;
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn list_apps(session: &Session) -> fleetcloud::error::Result<()> {
    let apps = applications::list_applications(session).await?;
    println!("{} application(s)", apps.len());
    for app in apps {
        println!(
            "{}  {}  {}",
            app.id,
            app.name,
            app.device_type.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn list_devices(session: &Session) -> fleetcloud::error::Result<()> {
    let devs = devices::list_devices(session).await?;
    println!("{} device(s)", devs.len());
    for dev in devs {
        println!(
            "{}  {}  {}  {}",
            dev.id,
            dev.uuid,
            dev.name,
            if dev.is_online { "online" } else { "offline" }
        );
    }
    Ok(())
}

async fn create_app(
    session: &Session,
    name: &str,
    device_type: &str,
) -> fleetcloud::error::Result<()> {
    let app = applications::create_application(session, name, device_type).await?;
    println!("created application {} (id {})", app.name, app.id);
    Ok(())
}

async fn register_device(
    session: &Session,
    app: &str,
    uuid: &str,
) -> fleetcloud::error::Result<()> {
    let dev = devices::register_device(session, app, uuid).await?;
    println!("registered device {} (id {}) under {}", dev.uuid, dev.id, app);
    Ok(())
}

async fn generate_key(session: &Session, app: &str) -> fleetcloud::error::Result<()> {
    let key = applications::generate_api_key(session, app).await?;
    println!("{key}");
    Ok(())
}
