use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use internbot::WebScraper;
use internbot::console::{Console, ConsoleError, TerminalConsole};
use internbot::navigator::resolve_selection;
use internbot::presenter::{BrowserLauncher, Launcher, PrintLauncher, render_table};
use internbot::session::run_session;
use internbot::utils::SEPARATOR;
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "internbot")]
#[command(about = "Browse internships.com postings by field and location", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "warn",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        long,
        default_value = internbot::BASE_URL,
        global = true,
        help = "Site to scrape"
    )]
    base_url: String,

    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 30,
        global = true,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "HTTP request timeout in seconds"
    )]
    timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a field and location from menus and browse matching postings (default)
    Browse {
        #[arg(long, help = "Print posting links instead of opening a browser")]
        no_browser: bool,

        #[arg(long, help = "Skip the welcome pause")]
        skip_intro: bool,
    },
    /// Print every field, state and city the site lists
    Catalog {
        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Run a single search without menus
    Search {
        #[arg(long, help = "Field of study, e.g. \"Computer Science\"")]
        field: Option<String>,

        #[arg(long, help = "State, e.g. \"Texas\"")]
        state: Option<String>,

        #[arg(long, requires = "state", help = "City within the state")]
        city: Option<String>,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn print_banner(console: &mut dyn Console) {
    console.say(SEPARATOR);
    console.say("Welcome to Internship Bot!");
    console.say(
        "This tool helps students find internships in fields and geographical locations of their choice.",
    );
    console.say(SEPARATOR);
}

fn browse(scraper: &WebScraper, no_browser: bool, skip_intro: bool) {
    let mut console = TerminalConsole::new().unwrap_or_else(|e| {
        log::error!("Error opening terminal: {}", e);
        process::exit(1);
    });

    print_banner(&mut console);
    if !skip_intro {
        match console.ask(
            "Set this window to full screen and then press ENTER to continue.",
            &[],
        ) {
            Ok(_) => {}
            Err(ConsoleError::Closed) => return,
            Err(e) => {
                log::error!("{}", e);
                process::exit(1);
            }
        }
    }

    let catalog = scraper.fetch_catalog().unwrap_or_else(|e| {
        log::error!("Error building catalog: {}", e);
        process::exit(1);
    });

    let launcher: Box<dyn Launcher> = if no_browser {
        Box::new(PrintLauncher)
    } else {
        Box::new(BrowserLauncher)
    };

    match run_session(scraper, &catalog, &mut console, launcher.as_ref()) {
        Ok(()) | Err(ConsoleError::Closed) => {}
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let scraper = WebScraper::with_options(&cli.base_url, Duration::from_secs(cli.timeout))
        .unwrap_or_else(|e| {
            log::error!("Error creating scraper: {}", e);
            process::exit(1);
        });

    let command = cli.command.unwrap_or(Commands::Browse {
        no_browser: false,
        skip_intro: false,
    });

    match command {
        Commands::Browse {
            no_browser,
            skip_intro,
        } => browse(&scraper, no_browser, skip_intro),

        Commands::Catalog { format } => {
            let catalog = scraper.fetch_catalog().unwrap_or_else(|e| {
                log::error!("Error building catalog: {}", e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&catalog),
                OutputFormat::Text => print!("{}", catalog),
            }
        }

        Commands::Search {
            field,
            state,
            city,
            format,
        } => {
            let catalog = scraper.fetch_catalog().unwrap_or_else(|e| {
                log::error!("Error building catalog: {}", e);
                process::exit(1);
            });

            let selection = resolve_selection(
                &catalog,
                field.as_deref(),
                state.as_deref(),
                city.as_deref(),
            )
            .unwrap_or_else(|e| {
                log::error!("Invalid args: {e}");
                process::exit(1);
            });

            let url = selection.search_url(scraper.base_url()).unwrap_or_else(|e| {
                log::error!("Invalid args: {e}");
                process::exit(1);
            });

            let page = scraper.fetch_results(&url).unwrap_or_else(|e| {
                log::error!("Error fetching results: {}", e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&page),
                OutputFormat::Text => {
                    println!("{}", page.title);
                    if page.postings.is_empty() {
                        println!("There are no available internships which match your criteria.");
                    } else {
                        println!(
                            "Average Hourly Pay: {}",
                            page.average_pay.as_deref().unwrap_or("N/A")
                        );
                        println!();
                        let rows = render_table(&page.postings);
                        for (row, posting) in rows.iter().zip(&page.postings) {
                            println!("{}  {}", row, posting.link);
                        }
                    }
                }
            }
        }
    }
}
