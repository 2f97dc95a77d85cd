use super::models::{Hotel, SearchCriteria};
use super::HotelFilter;
use serde::Serialize;
use std::fmt;

const RULE_WIDTH: usize = 80;

/// Renders whole numbers without a fractional part ("4", not "4.0").
fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// The lines echoed back before the search starts.
pub struct CriteriaSummary<'a>(pub &'a SearchCriteria);

impl fmt::Display for CriteriaSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let criteria = self.0;
        writeln!(
            f,
            "Searching for hotels from {} to {}...",
            criteria.checkin_iso(),
            criteria.checkout_iso()
        )?;
        let filter = &criteria.filter;
        if let Some(max) = filter.max_price.filter(|&m| m > 0) {
            writeln!(f, "Max price per night: ${max}")?;
        }
        if let Some(min) = filter.min_stars.filter(|&m| m > 0) {
            writeln!(f, "Minimum stars: {min}")?;
        }
        if let Some(min) = filter.min_reviews.filter(|&m| m > 0) {
            writeln!(f, "Minimum reviews: {min}")?;
        }
        Ok(())
    }
}

/// One numbered hotel block, closed by a dashed rule.
pub struct HotelBlock<'a> {
    pub index: usize,
    pub hotel: &'a Hotel,
}

impl fmt::Display for HotelBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hotel = self.hotel;
        writeln!(f, "Hotel #{}: {}", self.index, hotel.name)?;
        writeln!(f, "Location: {}", hotel.location.full_address)?;

        if hotel.star_rating > 0.0 {
            writeln!(f, "Star Rating: {} stars", number(hotel.star_rating))?;
        } else {
            writeln!(f, "Star Rating: Not rated")?;
        }

        let rating = &hotel.guest_rating;
        if rating.score > 0.0 {
            writeln!(
                f,
                "Guest Rating: {}/10 ({}) - {} reviews",
                number(rating.score),
                rating.text,
                rating.review_count
            )?;
        } else {
            writeln!(f, "Guest Rating: No reviews")?;
        }

        if let Some(meals) = &hotel.meal_plan {
            writeln!(f, "Meals: {meals}")?;
        }
        writeln!(f, "Price per night: {}", hotel.pricing.price_per_night)?;
        writeln!(
            f,
            "Total price: {} {}",
            hotel.pricing.total_price, hotel.pricing.currency
        )?;
        if let Some(image) = &hotel.image_url {
            writeln!(f, "Image URL: {image}")?;
        }
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))
    }
}

pub struct Listing<'a> {
    /// Results the site returned before filtering
    pub found: usize,
    pub hotels: &'a [Hotel],
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nFound {} hotels:", self.found)?;
        writeln!(
            f,
            "Showing {} hotels matching your criteria:\n",
            self.hotels.len()
        )?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        for (i, hotel) in self.hotels.iter().enumerate() {
            write!(f, "{}", HotelBlock { index: i + 1, hotel })?;
        }
        Ok(())
    }
}

pub fn criteria_summary(criteria: &SearchCriteria) -> String {
    CriteriaSummary(criteria).to_string()
}

pub fn format_hotel(index: usize, hotel: &Hotel) -> String {
    HotelBlock { index, hotel }.to_string()
}

pub fn format_listing(found: usize, hotels: &[Hotel]) -> String {
    Listing { found, hotels }.to_string()
}

#[derive(Debug, Serialize)]
pub struct SearchParamsEcho<'a> {
    pub checkin_date: String,
    pub checkout_date: String,
    pub location: &'a str,
    pub adults: u32,
    pub rooms: u32,
    pub children: u32,
    pub filters: &'a HotelFilter,
}

/// Machine-readable result envelope for `--json`.
#[derive(Debug, Serialize)]
pub struct SearchReport<'a> {
    pub success: bool,
    pub search_params: SearchParamsEcho<'a>,
    pub results_count: usize,
    pub hotels: &'a [Hotel],
}

impl<'a> SearchReport<'a> {
    pub fn new(criteria: &'a SearchCriteria, hotels: &'a [Hotel]) -> Self {
        Self {
            success: true,
            search_params: SearchParamsEcho {
                checkin_date: criteria.checkin_iso(),
                checkout_date: criteria.checkout_iso(),
                location: &criteria.destination.search_string,
                adults: criteria.adults,
                rooms: criteria.rooms,
                children: criteria.children,
                filters: &criteria.filter,
            },
            results_count: hotels.len(),
            hotels,
        }
    }
}
