use clap::{Parser, Subcommand};
use rasp_scrape::{Scraper, Settings};
use std::error::Error;

#[derive(Debug, Parser)]
#[command(version, about = "Scrape the SSUWT timetable and print it as JSON")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Faculties and their groups
    Groups,
    /// All teachers
    Teachers,
    /// Current academic week number
    Week,
    /// Week links of a group or teacher timetable
    Weeks {
        url: String,
        /// Fetch every week's timetable instead of listing links
        #[arg(long)]
        eager: bool,
    },
    /// One week of a timetable
    Schedule {
        url: String,
        /// Parse the page as a teacher's timetable
        #[arg(long)]
        teacher: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let scraper = Scraper::new(Settings::from_env()?)?;

    let json = match args.command {
        Command::Groups => serde_json::to_string(&scraper.fetch_groups().await)?,
        Command::Teachers => serde_json::to_string(&scraper.fetch_teachers().await)?,
        Command::Week => serde_json::to_string(&scraper.current_week().await)?,
        Command::Weeks { url, eager: false } => serde_json::to_string(&scraper.fetch_weeks(&url).await)?,
        Command::Weeks { url, eager: true } => {
            serde_json::to_string(&scraper.fetch_all_weeks(&url).await)?
        }
        Command::Schedule { url, teacher: false } => {
            serde_json::to_string(&scraper.fetch_schedule(&url).await)?
        }
        Command::Schedule { url, teacher: true } => {
            serde_json::to_string(&scraper.fetch_teacher_schedule(&url).await)?
        }
    };
    println!("{json}");
    Ok(())
}
