use anyhow::Result;
use clap::Parser;
use cinemeta::config::Configuration;
use cinemeta::movie::Movie;
use cinemeta::{HttpAdapter, MovieRepository};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Search TV shows instead of movies
    #[arg(long)]
    shows: bool,

    /// Use fuzzy title matching instead of exact
    #[arg(long)]
    fuzzy: bool,

    /// Pick the release from this year (implies a single result)
    #[arg(short, long)]
    year: Option<i32>,

    /// Look up one record by catalog id instead of searching
    #[arg(long)]
    id: Option<String>,

    /// Title to search for
    title: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .init();

    let config = Configuration::from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    let mut repository = MovieRepository::new(HttpAdapter::new(config.catalog));
    if cli.shows {
        repository.search_for_shows();
    }

    if let Some(id) = cli.id {
        let movie = repository.one_of_id(&id).await?;
        println!("{}", serde_json::to_string_pretty(&movie.interest())?);
        return Ok(());
    }

    let Some(title) = cli.title else {
        anyhow::bail!("a title or --id is required");
    };

    if let Some(year) = cli.year {
        let movie = repository.one_of_title(&title, Some(year)).await?;
        println!("{}", serde_json::to_string_pretty(&movie.interest())?);
        return Ok(());
    }

    let movies = if cli.fuzzy {
        repository.many_with_title_like(&title).await?
    } else {
        repository.many_with_title(&title).await?
    };
    info!("Found {} matching titles", movies.len());

    let interests: Vec<_> = movies.iter().map(Movie::interest).collect();
    println!("{}", serde_json::to_string_pretty(&interests)?);

    Ok(())
}
