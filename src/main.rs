mod cli;

use anyhow::{anyhow, Context};
use chrono::Local;
use clap::Parser;
use cli::{Args, CarsArgs, Command, ForumArgs, HotelsArgs};
use log::{info, LevelFilter};
use site_scrapers::sites::cars::{report as car_report, CarSearch};
use site_scrapers::sites::forum::ForumScraper;
use site_scrapers::sites::hotels::prompt::Prompter;
use site_scrapers::sites::hotels::report::{criteria_summary, format_listing, SearchReport};
use site_scrapers::sites::hotels::{validate_stay, HotelFilter, HotelSearch};
use site_scrapers::{AppConfig, HttpScraper, Scraper};
use std::io;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .filter_module("site_scrapers", level)
        .filter_module("selectors", LevelFilter::Warn)
        .filter_module("html5ever", LevelFilter::Error)
        .filter_module("chromiumoxide", LevelFilter::Error)
        .parse_default_env()
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(profile) = args.profile {
        config = config.with_profile(profile);
    }
    if let Some(timeout) = args.timeout {
        config = config.with_timeout(timeout);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let scraper = HttpScraper::from_config(&config.http)?;
    let stats = scraper.stats().clone();

    let result = match args.command {
        Command::Forum(forum) => run_forum(scraper, config, forum).await,
        Command::Hotels(hotels) => run_hotels(scraper, config, hotels).await,
        Command::Cars(cars) => run_cars(scraper, config, cars).await,
    };

    stats.finish();
    stats.log_summary();
    result
}

async fn run_forum(scraper: HttpScraper, config: AppConfig, args: ForumArgs) -> anyhow::Result<()> {
    let mut forum = config.forum;
    if let Some(location) = args.location {
        forum.location = location;
    }
    forum.max_posts = args.max_posts.or(forum.max_posts);
    forum.min_replies = args.min_replies.or(forum.min_replies);

    let posts = ForumScraper::new(Box::new(scraper), forum).run().await?;
    println!("{}", serde_json::to_string_pretty(&posts)?);
    Ok(())
}

async fn run_hotels(scraper: HttpScraper, config: AppConfig, args: HotelsArgs) -> anyhow::Result<()> {
    let today = Local::now().date_naive();

    let mut filter = HotelFilter {
        max_price: args.max_price,
        min_stars: args.min_stars,
        min_reviews: args.min_reviews,
        min_guest_score: args.min_guest_score,
        cities: args.cities,
        query: args.query,
    };

    let (checkin, checkout) = match (args.checkin, args.checkout) {
        (Some(checkin), Some(checkout)) => {
            validate_stay(checkin, checkout, today).map_err(|message| anyhow!(message))?;
            (checkin, checkout)
        }
        _ => {
            let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
            let dates = prompter.read_dates(today)?;
            if filter.max_price.is_none() {
                filter.max_price = prompter.read_max_price()?;
            }
            if filter.min_stars.is_none() {
                filter.min_stars = prompter.read_min_stars()?;
            }
            if filter.min_reviews.is_none() {
                filter.min_reviews = prompter.read_min_reviews()?;
            }
            dates
        }
    };

    let search = HotelSearch::new(Box::new(scraper), config.hotels);
    let criteria = search
        .criteria(checkin, checkout)
        .with_filter(filter)
        .with_sort(args.sort);

    if !args.json {
        println!("\n{}", criteria_summary(&criteria));
    }
    let outcome = search.run(&criteria).await?;

    if args.json {
        let report = SearchReport::new(&criteria, &outcome.hotels);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_listing(outcome.found, &outcome.hotels));
    }
    Ok(())
}

async fn run_cars(scraper: HttpScraper, config: AppConfig, args: CarsArgs) -> anyhow::Result<()> {
    let mut cars = config.cars;
    if let Some(text) = args.search_text {
        cars.search_text = text;
    }
    cars.headless |= args.headless;

    let search = CarSearch::new(Box::new(scraper), cars);
    let session = search.capture().await?;
    print!("{}", car_report::format_capture(&session, &search.config().target_url));

    if args.no_replay {
        return Ok(());
    }

    info!("Replaying captured search request");
    match search.replay(&session).await? {
        Some(outcome) => print!("{}", car_report::format_replay(&outcome)),
        None => println!("No search API request captured, nothing to replay."),
    }
    Ok(())
}

