use super::models::{GuestRating, Hotel, HotelLocation, Pricing};
use serde_json::{Map, Value};

const IMAGE_CDN: &str = "https://cf.bstatic.com";

/// Preferred first.
const PHOTO_VARIANTS: [&str; 4] = ["highResJpegUrl", "highResUrl", "lowResJpegUrl", "lowResUrl"];

/// `data.searchQueries.search.results`, or nothing if any step is missing.
pub fn extract_results(json: &Value) -> &[Value] {
    json.pointer("/data/searchQueries/search/results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Absolute CDN URL for a photo's relative path.
pub fn format_image_url(relative_url: &str) -> Option<String> {
    if relative_url.is_empty() {
        None
    } else {
        Some(format!("{IMAGE_CDN}{relative_url}"))
    }
}

/// Nested object lookup where a missing key, a `null`, or a non-object all
/// read as "absent".
fn object<'a>(parent: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a Map<String, Value>> {
    parent?.get(key)?.as_object()
}

fn string(parent: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    match parent?.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn number(parent: Option<&Map<String, Value>>, key: &str) -> Option<f64> {
    match parent?.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Hotel {
    /// Reads one search result. Only a result that is not an object at all
    /// is rejected; every missing field falls back to a default.
    pub fn from_result(result: &Value) -> Result<Hotel, String> {
        let result = Some(
            result
                .as_object()
                .ok_or_else(|| "search result is not an object".to_string())?,
        );

        let basic = object(result, "basicPropertyData");
        let id = string(basic, "id").unwrap_or_default();
        let name = string(object(result, "displayName"), "text")
            .unwrap_or_else(|| "No name available".to_string());

        let place = object(basic, "location");
        let address = string(place, "address").unwrap_or_default();
        let city = string(place, "city").unwrap_or_default();
        let full_address = match (address.is_empty(), city.is_empty()) {
            (false, false) => format!("{address}, {city}"),
            (true, false) => city.clone(),
            (false, true) => address.clone(),
            (true, true) => "Location not available".to_string(),
        };

        let reviews = object(basic, "reviewScore");
        let guest_rating = GuestRating {
            score: number(reviews, "score").unwrap_or(0.0),
            review_count: number(reviews, "reviewCount").unwrap_or(0.0).max(0.0) as u64,
            text: string(object(reviews, "totalScoreTextTag"), "translation").unwrap_or_default(),
        };
        let star_rating = number(object(basic, "starRating"), "value").unwrap_or(0.0);

        let price_info = object(result, "priceDisplayInfoIrene");
        let per_stay = object(object(price_info, "displayPrice"), "amountPerStay");
        let per_night = object(price_info, "averagePricePerNight");
        let pricing = Pricing {
            total_price: string(per_stay, "amount")
                .unwrap_or_else(|| "Price not available".to_string()),
            currency: string(per_stay, "currency").unwrap_or_default(),
            price_per_night: string(per_night, "amount").unwrap_or_else(|| "N/A".to_string()),
            price_per_night_unformatted: number(per_night, "amountUnformatted"),
        };

        let meal_plan = string(object(result, "mealPlanIncluded"), "text")
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        let main_photo = object(object(basic, "photos"), "main");
        let image_url = PHOTO_VARIANTS.iter().find_map(|variant| {
            string(object(main_photo, variant), "relativeUrl")
                .and_then(|relative| format_image_url(&relative))
        });

        Ok(Hotel {
            id,
            name,
            location: HotelLocation {
                address,
                city,
                full_address,
            },
            star_rating,
            guest_rating,
            pricing,
            meal_plan,
            image_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_result() -> Value {
        json!({
            "basicPropertyData": {
                "id": 1234567,
                "location": {"address": "1415 5th Avenue", "city": "Seattle", "countryCode": "us"},
                "photos": {"main": {
                    "highResUrl": {"relativeUrl": "/xdata/images/hotel/max1024x768/1.jpg?k=a"},
                    "lowResUrl": {"relativeUrl": "/xdata/images/hotel/square60/1.jpg?k=b"},
                    "highResJpegUrl": null
                }},
                "reviewScore": {"score": 8.6, "reviewCount": 2311, "totalScoreTextTag": {"translation": "Excellent"}},
                "starRating": {"value": 4, "symbol": "STARS"}
            },
            "displayName": {"text": "Motif Seattle"},
            "mealPlanIncluded": {"mealPlanType": "BREAKFAST", "text": "  Breakfast included "},
            "priceDisplayInfoIrene": {
                "displayPrice": {"amountPerStay": {"amount": "US$1,032", "amountUnformatted": 1032.4, "currency": "USD"}},
                "averagePricePerNight": {"amount": "US$344", "amountUnformatted": 344.13, "currency": "USD"}
            }
        })
    }

    #[test]
    fn reads_complete_result() {
        let hotel = Hotel::from_result(&full_result()).unwrap();

        assert_eq!(hotel.id, "1234567");
        assert_eq!(hotel.name, "Motif Seattle");
        assert_eq!(hotel.location.full_address, "1415 5th Avenue, Seattle");
        assert_eq!(hotel.star_rating, 4.0);
        assert_eq!(hotel.guest_rating.score, 8.6);
        assert_eq!(hotel.guest_rating.review_count, 2311);
        assert_eq!(hotel.guest_rating.text, "Excellent");
        assert_eq!(hotel.pricing.total_price, "US$1,032");
        assert_eq!(hotel.pricing.currency, "USD");
        assert_eq!(hotel.pricing.price_per_night, "US$344");
        assert_eq!(hotel.pricing.price_per_night_unformatted, Some(344.13));
        assert_eq!(hotel.meal_plan.as_deref(), Some("Breakfast included"));
        // highResJpegUrl is null, so highResUrl wins.
        assert_eq!(
            hotel.image_url.as_deref(),
            Some("https://cf.bstatic.com/xdata/images/hotel/max1024x768/1.jpg?k=a")
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let hotel = Hotel::from_result(&json!({"basicPropertyData": null})).unwrap();

        assert_eq!(hotel.name, "No name available");
        assert_eq!(hotel.location.full_address, "Location not available");
        assert_eq!(hotel.star_rating, 0.0);
        assert_eq!(hotel.guest_rating.review_count, 0);
        assert_eq!(hotel.pricing.total_price, "Price not available");
        assert_eq!(hotel.pricing.price_per_night, "N/A");
        assert_eq!(hotel.pricing.price_per_night_unformatted, None);
        assert!(hotel.meal_plan.is_none());
        assert!(hotel.image_url.is_none());
    }

    #[test]
    fn location_uses_whichever_part_exists() {
        let city_only = json!({"basicPropertyData": {"location": {"city": "Seattle", "address": ""}}});
        assert_eq!(
            Hotel::from_result(&city_only).unwrap().location.full_address,
            "Seattle"
        );

        let address_only = json!({"basicPropertyData": {"location": {"address": "1 Pike St"}}});
        assert_eq!(
            Hotel::from_result(&address_only).unwrap().location.full_address,
            "1 Pike St"
        );
    }

    #[test]
    fn blank_meal_plan_is_dropped() {
        let result = json!({"mealPlanIncluded": {"text": "   "}});
        assert!(Hotel::from_result(&result).unwrap().meal_plan.is_none());
    }

    #[test]
    fn non_object_result_is_rejected() {
        assert!(Hotel::from_result(&json!("oops")).is_err());
    }

    #[test]
    fn extracts_results_path() {
        let json = json!({"data": {"searchQueries": {"search": {"results": [{}, {}]}}}});
        assert_eq!(extract_results(&json).len(), 2);
        assert!(extract_results(&json!({"errors": []})).is_empty());
    }

    #[test]
    fn empty_relative_url_has_no_image() {
        assert_eq!(format_image_url(""), None);
    }
}
