use clap::Parser;
use example_gallery::LogLevel;
use example_gallery::core::config::{self, CliOverrides};
use example_gallery::core::dispatcher::Dispatcher;
use example_gallery::core::highlight::render_code;
use example_gallery::core::registry::Registry;
use example_gallery::core::state::App;
use example_gallery::{gallery, tui};
use simplelog::{ConfigBuilder, WriteLogger};
use std::error::Error;
use std::fs::File;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gallery", about = "Browse interactive examples in the terminal")]
struct Args {
    /// Path to open on start, e.g. /examples/poisson-distribution
    #[arg(short, long)]
    path: Option<String>,

    /// Syntax highlighting theme for the code view
    #[arg(short, long)]
    theme: Option<String>,

    /// Log verbosity written to gallery.log
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Print every example identifier and title, then exit
    #[arg(long)]
    list: bool,

    /// Print the highlighted source of one example, then exit
    #[arg(long, value_name = "ID")]
    code: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config()?;
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            path: args.path.clone(),
            theme: args.theme.clone(),
            log_level: args.log_level.map(Into::into),
        },
    );

    // Initialize file logger - writes to gallery.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("gallery.log") {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    let registry = Registry::build(gallery::units());
    let dispatcher = match Dispatcher::from_registry(&registry) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            log::error!("Example composition failed: {}", e);
            return Err(e.into());
        }
    };
    log::info!(
        "Gallery starting with {} examples and {} callbacks",
        registry.len(),
        dispatcher.len()
    );

    if args.list {
        for entry in registry.iter() {
            println!("{:<28} {}", entry.id, entry.title);
        }
        return Ok(());
    }

    if let Some(id) = args.code {
        let Some(source) = registry.source(&id) else {
            return Err(format!("no example named '{id}'").into());
        };
        print!("{}", render_code(source, &id, &resolved.code_theme).to_ansi());
        return Ok(());
    }

    let start_path = resolved.start_path.clone();
    let app = App::new(Arc::new(registry), Arc::new(dispatcher), &resolved);
    tui::run(app, start_path)?;
    Ok(())
}
