use clap::{Parser, Subcommand};
use fightline_cli::CliContext;
use fightline_cli::autoload;
use fightline_cli::commands;
use fightline_cli::logging;
use fightline_cli::readline;
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), String> {
    let ctx = CliContext::new();
    let debug_logging = ctx.config.read().await.debug_logging;
    let _log_guard = logging::init(debug_logging);

    autoload::load_default_dump(&ctx).await;

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "Phase and aura queries over combat report dumps")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a report dump (defaults to the configured one)
    Load {
        #[arg(short, long)]
        path: Option<String>,
        /// Encounter key or id, e.g. `dsu` or `1065`
        #[arg(short, long)]
        encounter: Option<String>,
    },
    Fights,
    Timeline {
        #[arg(short, long)]
        fight: i64,
    },
    /// Phase at a moment of a fight
    Phase {
        #[arg(short, long)]
        fight: i64,
        /// Milliseconds since the pull
        #[arg(short, long)]
        time: i64,
    },
    /// Auras active at a moment of a fight
    Auras {
        #[arg(short, long)]
        fight: i64,
        /// Milliseconds since the pull
        #[arg(short, long)]
        time: i64,
        #[arg(short, long)]
        named: bool,
    },
    /// Everyone who received an aura during a fight
    AuraOn {
        #[arg(short, long)]
        fight: i64,
        #[arg(long)]
        name: String,
    },
    PhaseStarts {
        #[arg(required = true)]
        phases: Vec<String>,
    },
    Events {
        #[arg(short, long)]
        fight: i64,
        #[arg(short, long)]
        kind: Option<String>,
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
        /// Only events from secondary actor instances
        #[arg(long)]
        instanced: bool,
    },
    SetDump {
        #[arg(short, long)]
        path: String,
    },
    Config,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "fightline".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Load { path, encounter }) => {
            commands::load(path.as_deref(), encounter.as_deref(), ctx).await?
        }
        Some(Commands::Fights) => commands::list_fights(ctx).await?,
        Some(Commands::Timeline { fight }) => commands::show_timeline(*fight, ctx).await?,
        Some(Commands::Phase { fight, time }) => commands::show_phase(*fight, *time, ctx).await?,
        Some(Commands::Auras { fight, time, named }) => {
            commands::show_auras(*fight, *time, *named, ctx).await?
        }
        Some(Commands::AuraOn { fight, name }) => {
            commands::show_aura_targets(*fight, name, ctx).await?
        }
        Some(Commands::PhaseStarts { phases }) => commands::show_phase_starts(phases, ctx).await?,
        Some(Commands::Events {
            fight,
            kind,
            limit,
            instanced,
        }) => {
            commands::show_events(*fight, kind.as_deref(), *limit, *instanced, ctx).await?
        }
        Some(Commands::SetDump { path }) => commands::set_dump(path, ctx).await?,
        Some(Commands::Config) => commands::show_settings(ctx).await?,
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
