use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use site_scrapers::sites::hotels::SortOrder;
use site_scrapers::BrowserProfile;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-scrapers")]
#[command(about = "Scrapers for a real-estate forum, a hotel search and a car-rental search")]
#[command(version)]
pub struct Args {
    /// JSON config file; missing fields keep their defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Browser whose headers the HTTP client sends
    #[arg(long, value_enum, global = true)]
    pub profile: Option<BrowserProfile>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Forum posts of a location, with their replies, as JSON
    Forum(ForumArgs),
    /// Hotel search; prompts for whatever dates are not given
    Hotels(HotelsArgs),
    /// Record the car search a browser makes, then replay it
    Cars(CarsArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ForumArgs {
    /// Location slug, e.g. houston-texas
    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub max_posts: Option<usize>,

    #[arg(long)]
    pub min_replies: Option<u64>,
}

#[derive(ClapArgs, Debug)]
pub struct HotelsArgs {
    /// Check-in date (MM/DD/YYYY)
    #[arg(long, value_parser = parse_date)]
    pub checkin: Option<NaiveDate>,

    /// Check-out date (MM/DD/YYYY)
    #[arg(long, value_parser = parse_date)]
    pub checkout: Option<NaiveDate>,

    /// Maximum price per night in USD
    #[arg(long)]
    pub max_price: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub min_stars: Option<u8>,

    #[arg(long)]
    pub min_reviews: Option<u32>,

    #[arg(long)]
    pub min_guest_score: Option<f64>,

    /// Keep only hotels in these cities (repeatable)
    #[arg(long = "city")]
    pub cities: Vec<String>,

    /// Substring that must appear in the name or address
    #[arg(long)]
    pub query: Option<String>,

    #[arg(long, value_enum, default_value_t = SortOrder::Relevance)]
    pub sort: SortOrder,

    /// Print a JSON report instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct CarsArgs {
    /// Text typed into the location search box
    #[arg(long)]
    pub search_text: Option<String>,

    #[arg(long)]
    pub headless: bool,

    /// Only capture; skip repeating the request
    #[arg(long)]
    pub no_replay: bool,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%m/%d/%Y")
        .map_err(|_| format!("invalid date {value:?}, expected MM/DD/YYYY"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hotel_flags() {
        let args = Args::parse_from([
            "site-scrapers",
            "-vv",
            "hotels",
            "--checkin",
            "11/01/2026",
            "--checkout",
            "11/04/2026",
            "--city",
            "Seattle",
            "--city",
            "Bellevue",
            "--sort",
            "price-asc",
        ]);
        assert_eq!(args.verbose, 2);
        let Command::Hotels(hotels) = args.command else {
            panic!("expected hotels command");
        };
        assert_eq!(hotels.checkin, NaiveDate::from_ymd_opt(2026, 11, 1));
        assert_eq!(hotels.cities, vec!["Seattle", "Bellevue"]);
        assert_eq!(hotels.sort, SortOrder::PriceAsc);
    }

    #[test]
    fn rejects_bad_dates_and_stars() {
        assert!(Args::try_parse_from(["site-scrapers", "hotels", "--checkin", "2026-11-01"]).is_err());
        assert!(Args::try_parse_from(["site-scrapers", "hotels", "--min-stars", "6"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::parse_from(["site-scrapers", "cars", "--headless", "--profile", "bare"]);
        assert_eq!(args.profile, Some(BrowserProfile::Bare));
        assert!(matches!(args.command, Command::Cars(CarsArgs { headless: true, .. })));
    }
}
