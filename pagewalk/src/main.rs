use pagewalk::commands::command_argument_builder;
use pagewalk::handle_crawl;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays clean for the summary
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command_argument_builder().get_matches();
    let exit_code = handle_crawl(&matches).await;

    std::process::exit(exit_code);
}
