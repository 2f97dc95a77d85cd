use super::filter::{HotelFilter, SortOrder};
use crate::config::{Destination, HotelsConfig};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub location: HotelLocation,
    pub star_rating: f64,
    pub guest_rating: GuestRating,
    pub pricing: Pricing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelLocation {
    pub address: String,
    pub city: String,
    pub full_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestRating {
    pub score: f64,
    pub review_count: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pricing {
    pub total_price: String,
    pub currency: String,
    pub price_per_night: String,
    /// Numeric nightly price; `None` when the result carried no price.
    pub price_per_night_unformatted: Option<f64>,
}

/// Everything one search needs: stay, party, destination and what to keep.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub destination: Destination,
    pub adults: u32,
    pub rooms: u32,
    pub children: u32,
    pub filter: HotelFilter,
    pub sort: SortOrder,
}

impl SearchCriteria {
    pub fn new(checkin: NaiveDate, checkout: NaiveDate, config: &HotelsConfig) -> Self {
        Self {
            checkin,
            checkout,
            destination: config.destination.clone(),
            adults: config.adults,
            rooms: config.rooms,
            children: config.children,
            filter: HotelFilter::default(),
            sort: SortOrder::default(),
        }
    }

    pub fn with_filter(mut self, filter: HotelFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn checkin_iso(&self) -> String {
        self.checkin.format("%Y-%m-%d").to_string()
    }

    pub fn checkout_iso(&self) -> String {
        self.checkout.format("%Y-%m-%d").to_string()
    }
}

/// Checks a stay against `today`. Check-in must be tomorrow or later: a
/// date read as midnight is already past once the day has begun.
pub fn validate_stay(
    checkin: NaiveDate,
    checkout: NaiveDate,
    today: NaiveDate,
) -> Result<(), &'static str> {
    if checkout <= checkin {
        return Err("Check-out date must be after check-in date.");
    }
    if checkin <= today {
        return Err("Check-in date cannot be in the past.");
    }
    Ok(())
}
