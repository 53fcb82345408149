use anyhow::Result;
use clap::{Parser, Subcommand};
use converter_app::shell::{resolve_unit, ShellCommand};
use converter_app::{ui, ConverterSession, Outcome};
use converter_config::ConverterConfig;
use converter_core::Category;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "unit-converter")]
#[command(about = "Convert length, weight, temperature and currency values", long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE", default_value = "converter.yaml")]
    config: PathBuf,

    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single value
    Convert {
        /// Length, Weight, Temperature or Currency
        #[arg(long)]
        category: Category,

        /// Source unit name or symbol
        #[arg(long)]
        from: String,

        /// Target unit name or symbol
        #[arg(long)]
        to: String,

        /// Amount to convert
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Interactive converter
    Shell,

    /// List units per category
    Units {
        #[arg(long)]
        category: Option<Category>,
    },

    /// Print every stored conversion
    Records,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let user_config = ConverterConfig::default_config_path();
    let config = if cli.config.exists() {
        info!("Loading configuration from: {:?}", cli.config);
        ConverterConfig::from_yaml(&cli.config)?
    } else if user_config.exists() {
        info!("Loading configuration from: {:?}", user_config);
        ConverterConfig::from_yaml(&user_config)?
    } else {
        info!("Using default configuration");
        ConverterConfig::default()
    };

    match cli.command {
        Commands::Convert {
            category,
            from,
            to,
            value,
        } => convert_once(&config, category, &from, &to, value).await,
        Commands::Shell => {
            interactive_shell(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Units { category } => {
            list_units(category);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Records => {
            let session = ConverterSession::new(&config)?;
            println!("{}", ui::format_history_table(&session.stored_records()?));
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn convert_once(
    config: &ConverterConfig,
    category: Category,
    from: &str,
    to: &str,
    value: f64,
) -> Result<ExitCode> {
    let mut session = ConverterSession::new(config)?;
    session.select_category(category);
    session.select_from(resolve_unit(category, from)?)?;
    session.select_to(resolve_unit(category, to)?)?;

    let outcome = session.convert(value).await;
    ui::display_outcome(&outcome);

    Ok(match outcome {
        Outcome::Converted { .. } => ExitCode::SUCCESS,
        Outcome::Warning(_) | Outcome::Failed(_) => ExitCode::FAILURE,
    })
}

async fn interactive_shell(config: &ConverterConfig) -> Result<()> {
    let mut session = ConverterSession::new(config)?;
    info!("Shell session {} started at {}", session.id(), session.started_at());

    println!("🔁 Unit Converter");
    println!("ℹ️  {}", ui::BANNER);
    println!("Type 'help' for commands, 'exit' or 'quit' to leave");
    println!("═══════════════════════════════════════\n");

    loop {
        print!("{}> ", ui::format_selection(&session.selection()));
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let command = match ShellCommand::parse(&input) {
            Ok(command) => command,
            Err(e) => {
                println!("❌ {e}");
                continue;
            }
        };

        let category = session.selection().category;
        match command {
            ShellCommand::Empty => {}
            ShellCommand::Exit => {
                println!("Goodbye!");
                break;
            }
            ShellCommand::Help => println!("{}", ui::HELP_TEXT),
            ShellCommand::Units => println!("{}", ui::format_unit_list(category)),
            ShellCommand::Category(category) => {
                session.select_category(category);
                println!("{}", ui::format_unit_list(category));
            }
            ShellCommand::From(name) => {
                if let Err(e) = resolve_unit(category, &name).and_then(|u| session.select_from(u)) {
                    println!("❌ {e}");
                }
            }
            ShellCommand::To(name) => {
                if let Err(e) = resolve_unit(category, &name).and_then(|u| session.select_to(u)) {
                    println!("❌ {e}");
                }
            }
            ShellCommand::Convert(value) => {
                let outcome = session.convert(value).await;
                ui::display_outcome(&outcome);
            }
            ShellCommand::History => {
                println!("{}", ui::format_history_table(session.history().all()));
            }
            ShellCommand::Records => match session.stored_records() {
                Ok(records) => println!("{}", ui::format_history_table(&records)),
                Err(e) => println!("❌ {e}"),
            },
            ShellCommand::Export(format) => {
                match session.export_to(&config.export.output_dir, format) {
                    Ok(path) => println!("📄 Saved {} ({})", path.display(), format.mime_type()),
                    Err(e) => println!("❌ {e}"),
                }
            }
        }
    }

    let summary = ui::format_session_end(session.id(), session.history().len(), session.elapsed());
    info!("{}", summary);
    println!("{summary}");
    Ok(())
}

fn list_units(category: Option<Category>) {
    match category {
        Some(category) => println!("{}", ui::format_unit_list(category)),
        None => {
            for category in Category::ALL {
                println!("{}", ui::format_unit_list(category));
            }
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    Ok(())
}
