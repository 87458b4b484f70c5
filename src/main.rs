use clap::Parser;
use fmsh::{Config, Dispatcher, Outcome, ResultSink, SessionHandle};
use rustyline::error::ReadlineError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// fmsh - Interactive file manager shell
#[derive(Parser, Debug)]
#[command(name = "fmsh", version, about)]
struct Args {
    /// Display name used in the welcome and farewell lines
    #[arg(long, env = "FMSH_USERNAME")]
    username: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = fmsh::config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {e}, using defaults");
        Config::default()
    });
    init_logging(&config);

    let username = args.username.unwrap_or_else(whoami::username);

    let (sink, writer) = ResultSink::stdout();
    let session = SessionHandle::new(fmsh::osinfo::home_dir());
    let dispatcher = Dispatcher::new(session.clone(), sink.clone());

    // An interrupt delivered as a signal (non-tty input) ends the session
    // immediately with the farewell; on a tty rustyline reports it as
    // ReadlineError::Interrupted instead and the loop below handles it.
    spawn_interrupt_handler(username.clone());

    sink.line(&format!("Welcome to the File Manager, {username}!"));
    sink.prompt(&session.cwd());

    run_repl(&dispatcher, &config).await?;

    sink.line(&format!(
        "Thank you for using File Manager, {username}, goodbye!"
    ));
    sink.shutdown().await;
    let _ = writer.await;
    Ok(())
}

fn init_logging(config: &Config) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.filter.clone());
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}

fn spawn_interrupt_handler(username: String) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("Thank you for using File Manager, {username}, goodbye!");
            std::process::exit(0);
        }
    });
}

async fn run_repl(
    dispatcher: &Dispatcher,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let rl_config = rustyline::Config::builder()
        .max_history_size(config.history.max_entries)?
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .build();
    let mut rl = rustyline::DefaultEditor::with_config(rl_config)?;

    let history_path = config.history.path();
    let _ = rl.load_history(&history_path);

    loop {
        match rl.readline("") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match dispatcher.dispatch(line) {
                    Outcome::Handled => {}
                    Outcome::Exit => break,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                tracing::error!(error = %err, "input stream failed");
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
    Ok(())
}
