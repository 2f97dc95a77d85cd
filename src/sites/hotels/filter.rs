use super::models::Hotel;
use clap::ValueEnum;
use serde::Serialize;

/// Thresholds a hotel must meet to be shown. `None` (or zero for the
/// numeric thresholds) disables a check.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HotelFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stars: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_reviews: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_guest_score: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl HotelFilter {
    pub fn matches(&self, hotel: &Hotel) -> bool {
        // A result without a price reads as free and passes the ceiling.
        if let Some(max) = self.max_price.filter(|&m| m > 0) {
            if hotel.pricing.price_per_night_unformatted.unwrap_or(0.0) > f64::from(max) {
                return false;
            }
        }

        if let Some(min) = self.min_stars.filter(|&m| m > 0) {
            if hotel.star_rating < f64::from(min) {
                return false;
            }
        }

        if let Some(min) = self.min_reviews.filter(|&m| m > 0) {
            if hotel.guest_rating.review_count < u64::from(min) {
                return false;
            }
        }

        if let Some(min) = self.min_guest_score {
            if hotel.guest_rating.score < min {
                return false;
            }
        }

        if !self.cities.is_empty() && !self.cities.contains(&hotel.location.city) {
            return false;
        }

        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            let haystack = format!("{} {}", hotel.name, hotel.location.full_address).to_lowercase();
            if !haystack.contains(&query.to_lowercase()) {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, hotels: Vec<Hotel>) -> Vec<Hotel> {
        hotels.into_iter().filter(|h| self.matches(h)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Keep the order the site returned
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    RatingAsc,
    StarsDesc,
    StarsAsc,
    ReviewsDesc,
    NameAsc,
    NameDesc,
}

fn nightly(hotel: &Hotel) -> f64 {
    hotel.pricing.price_per_night_unformatted.unwrap_or(0.0)
}

/// Stable sort, so ties keep the site's relevance order.
pub fn sort_hotels(hotels: &mut [Hotel], order: SortOrder) {
    match order {
        SortOrder::Relevance => {}
        SortOrder::PriceAsc => hotels.sort_by(|a, b| nightly(a).total_cmp(&nightly(b))),
        SortOrder::PriceDesc => hotels.sort_by(|a, b| nightly(b).total_cmp(&nightly(a))),
        SortOrder::RatingDesc => {
            hotels.sort_by(|a, b| b.guest_rating.score.total_cmp(&a.guest_rating.score))
        }
        SortOrder::RatingAsc => {
            hotels.sort_by(|a, b| a.guest_rating.score.total_cmp(&b.guest_rating.score))
        }
        SortOrder::StarsDesc => hotels.sort_by(|a, b| b.star_rating.total_cmp(&a.star_rating)),
        SortOrder::StarsAsc => hotels.sort_by(|a, b| a.star_rating.total_cmp(&b.star_rating)),
        SortOrder::ReviewsDesc => {
            hotels.sort_by(|a, b| b.guest_rating.review_count.cmp(&a.guest_rating.review_count))
        }
        SortOrder::NameAsc => hotels.sort_by_key(|h| h.name.to_lowercase()),
        SortOrder::NameDesc => {
            hotels.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::hotels::models::{GuestRating, HotelLocation, Pricing};

    fn hotel(name: &str, price: Option<f64>, stars: f64, score: f64, reviews: u64) -> Hotel {
        Hotel {
            id: name.to_lowercase(),
            name: name.to_string(),
            location: HotelLocation {
                address: "1 Main St".to_string(),
                city: "Seattle".to_string(),
                full_address: "1 Main St, Seattle".to_string(),
            },
            star_rating: stars,
            guest_rating: GuestRating {
                score,
                review_count: reviews,
                text: String::new(),
            },
            pricing: Pricing {
                total_price: "Price not available".to_string(),
                currency: String::new(),
                price_per_night: "N/A".to_string(),
                price_per_night_unformatted: price,
            },
            meal_plan: None,
            image_url: None,
        }
    }

    #[test]
    fn missing_price_is_kept_without_price_filter() {
        let filter = HotelFilter::default();
        assert!(filter.matches(&hotel("No Price Inn", None, 3.0, 8.0, 10)));
    }

    #[test]
    fn missing_price_passes_price_ceiling() {
        let filter = HotelFilter {
            max_price: Some(150),
            ..HotelFilter::default()
        };
        assert!(filter.matches(&hotel("No Price Inn", None, 3.0, 8.0, 10)));
        assert!(filter.matches(&hotel("Budget", Some(150.0), 3.0, 8.0, 10)));
        assert!(!filter.matches(&hotel("Luxury", Some(150.5), 5.0, 9.0, 10)));
    }

    #[test]
    fn star_and_review_thresholds() {
        let filter = HotelFilter {
            min_stars: Some(4),
            min_reviews: Some(100),
            ..HotelFilter::default()
        };
        assert!(filter.matches(&hotel("Good", Some(200.0), 4.0, 8.0, 100)));
        assert!(!filter.matches(&hotel("Three Star", Some(200.0), 3.5, 8.0, 500)));
        assert!(!filter.matches(&hotel("New", Some(200.0), 5.0, 8.0, 99)));
    }

    #[test]
    fn zero_min_reviews_disables_check() {
        let filter = HotelFilter {
            min_reviews: Some(0),
            ..HotelFilter::default()
        };
        assert!(filter.matches(&hotel("Unreviewed", None, 0.0, 0.0, 0)));
    }

    #[test]
    fn query_and_city_filters() {
        let filter = HotelFilter {
            cities: vec!["Seattle".to_string()],
            query: Some("MAIN st".to_string()),
            ..HotelFilter::default()
        };
        assert!(filter.matches(&hotel("Anything", None, 0.0, 0.0, 0)));

        let elsewhere = HotelFilter {
            cities: vec!["Tacoma".to_string()],
            ..HotelFilter::default()
        };
        assert!(!elsewhere.matches(&hotel("Anything", None, 0.0, 0.0, 0)));
    }

    #[test]
    fn min_guest_score() {
        let filter = HotelFilter {
            min_guest_score: Some(8.5),
            ..HotelFilter::default()
        };
        assert!(filter.matches(&hotel("A", None, 0.0, 8.5, 0)));
        assert!(!filter.matches(&hotel("B", None, 0.0, 8.4, 0)));
    }

    #[test]
    fn sorts() {
        let mut hotels = vec![
            hotel("bravo", Some(200.0), 3.0, 9.1, 10),
            hotel("Alpha", None, 5.0, 7.0, 300),
            hotel("charlie", Some(120.0), 4.0, 8.0, 50),
        ];

        sort_hotels(&mut hotels, SortOrder::PriceAsc);
        let names: Vec<_> = hotels.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "charlie", "bravo"]);

        sort_hotels(&mut hotels, SortOrder::RatingDesc);
        assert_eq!(hotels[0].name, "bravo");

        sort_hotels(&mut hotels, SortOrder::ReviewsDesc);
        assert_eq!(hotels[0].name, "Alpha");

        sort_hotels(&mut hotels, SortOrder::StarsAsc);
        assert_eq!(hotels[0].name, "bravo");

        sort_hotels(&mut hotels, SortOrder::NameDesc);
        let names: Vec<_> = hotels.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["charlie", "bravo", "Alpha"]);

        sort_hotels(&mut hotels, SortOrder::Relevance);
        assert_eq!(hotels[0].name, "charlie");
    }
}
