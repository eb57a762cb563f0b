//! Portal RBAC CLI - run the portal's role checks from a terminal.
//!
//! ```bash
//! portal-rbac --directory roles.toml whoami ana@corp.com
//! portal-rbac --directory roles.toml can ana@corp.com Payments approve
//! portal-rbac --directory roles.toml check ana@corp.com /approvals \
//!     --allowed "Finance Manager" --permission Payments:approve
//! ```
//!
//! Exit status: 0 when access is granted, 2 when it is refused, 1 on error.

mod commands;

use clap::{Parser, Subcommand};
use commands::Context;
use portal_rbac::rbac::PermissionRequirement;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "portal-rbac",
    about = "Evaluate portal roles, permissions and route guards",
    version
)]
struct Cli {
    /// Config file (default: ./portal.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Role directory file (TOML or JSON), overrides the configured lookup
    #[arg(long, global = true)]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the role record of a principal
    Whoami {
        email: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a single permission
    Can {
        email: String,
        resource: String,

        #[arg(default_value = "read")]
        action: String,
    },

    /// Run the route guard for a location
    Check {
        email: String,

        #[arg(default_value = "/")]
        location: String,

        /// Exact role required
        #[arg(long)]
        role: Option<String>,

        /// Accepted role (repeatable)
        #[arg(long = "allowed")]
        allowed_roles: Vec<String>,

        /// Required `resource:action` (repeatable)
        #[arg(long = "permission")]
        permissions: Vec<PermissionRequirement>,

        /// Route table file with `[[routes]]` entries, used instead of the flags
        #[arg(long)]
        routes: Option<PathBuf>,
    },
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let ctx = Context::open(cli.config.as_deref(), cli.directory.as_deref())?;
    ctx.init_logging();

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Whoami { email, json } => {
            commands::whoami::run(&ctx, &email, json, &mut out).await
        }
        Commands::Can { email, resource, action } => {
            commands::can::run(&ctx, &email, &resource, &action, &mut out).await
        }
        Commands::Check { email, location, role, allowed_roles, permissions, routes } => {
            let target = match routes {
                Some(path) => commands::check::Target::Table(path),
                None => commands::check::Target::Requirement(
                    portal_rbac::AccessRequirement {
                        required_role: role,
                        allowed_roles,
                        required_permissions: permissions,
                    },
                ),
            };
            commands::check::run(&ctx, &email, &location, target, &mut out).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
