// Upstream payload normalization: the inventory backends disagree on field
// casing and nesting, so every logical field resolves through an ordered
// alias table. First hit wins; the table order is the precedence contract.
use crate::model::{BoardingOption, Hotel, Room};
use chrono::NaiveDate;
use serde_json::Value;

const ID_PATHS: &[&[&str]] = &[&["id"], &["hotelId"], &["Id"]];
const NAME_PATHS: &[&[&str]] = &[&["name"], &["Name"], &["hotelName"], &["title"]];
const LOCATION_PATHS: &[&[&str]] = &[
    &["region"],
    &["city"],
    &["cityName"],
    &["location", "city"],
    &["location", "region"],
];
const STARS_PATHS: &[&[&str]] = &[&["stars"], &["Stars"], &["starRating"], &["category"]];
const RATING_PATHS: &[&[&str]] = &[&["rating"], &["Rating"], &["reviewScore"]];
const REVIEW_COUNT_PATHS: &[&[&str]] = &[&["reviewCount"], &["reviewsCount"], &["numReviews"]];
const DESCRIPTION_PATHS: &[&[&str]] = &[&["description"], &["Description"], &["shortDescription"]];
const IMAGE_PATHS: &[&[&str]] = &[&["image"], &["mainImage"]];

const ROOM_ID_PATHS: &[&[&str]] = &[&["id"], &["roomId"], &["Id"]];
const ROOM_NAME_PATHS: &[&[&str]] = &[&["name"], &["Name"], &["roomName"], &["title"]];
const ROOM_BEDS_PATHS: &[&[&str]] = &[&["beds"], &["bedding"], &["bedConfiguration"]];
const ROOM_OCCUPANCY_PATHS: &[&[&str]] = &[&["maxOccupancy"], &["max_occupancy"], &["capacity"]];
const ROOM_SIZE_PATHS: &[&[&str]] = &[&["size"], &["roomSize"], &["surface"]];
const ROOM_PRICE_PATHS: &[&[&str]] = &[&["pricePerNight"], &["price_per_night"], &["price"]];
const ROOM_BOARDING_PATHS: &[&[&str]] = &[&["defaultBoarding"], &["default_boarding"], &["boarding"]];
const ROOM_CANCEL_POLICY_PATHS: &[&[&str]] = &[&["cancellationPolicy"], &["cancellation_policy"]];
const ROOM_CANCEL_DEADLINE_PATHS: &[&[&str]] = &[&["cancellationDeadline"], &["cancellation_deadline"]];

const BOARDING_TYPE_PATHS: &[&[&str]] = &[&["type"], &["boardingType"], &["name"]];
const BOARDING_PRICE_PATHS: &[&[&str]] = &[&["pricePerNight"], &["price_per_night"], &["price"]];
const BOARDING_TOTAL_PATHS: &[&[&str]] = &[&["totalPrice"], &["total_price"], &["total"]];

const AMENITY_KEYS: &[&str] = &["amenities", "Amenities"];
const BOARDING_LIST_KEYS: &[&str] = &["boardingTypes", "boarding_types"];
const BOARDING_OPTION_KEYS: &[&str] = &["boardingOptions", "boarding_options", "boardings"];
const IMAGE_LIST_KEYS: &[&str] = &["images", "Images"];

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

fn first_string(value: &Value, paths: &[&[&str]]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| lookup(value, path))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_number(value: &Value, paths: &[&[&str]]) -> Option<f64> {
    paths
        .iter()
        .filter_map(|path| lookup(value, path))
        .filter_map(Value::as_f64)
        .find(|n| n.is_finite())
}

/// First of `keys` holding an array, filtered down to its non-empty strings.
/// Absent or malformed (non-array) fields yield an empty list, never an error.
fn string_list(value: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn object_list<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn resolve_id(value: &Value, paths: &[&[&str]]) -> i64 {
    if let Some(n) = first_number(value, paths) {
        return n as i64;
    }
    first_string(value, paths)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

pub fn normalize_all(raw_hotels: &[Value]) -> Vec<Hotel> {
    raw_hotels.iter().map(normalize_hotel).collect()
}

/// Maps one upstream hotel object to the canonical record. Pure; tolerates
/// absent fields and inconsistent casing.
pub fn normalize_hotel(raw: &Value) -> Hotel {
    let id = resolve_id(raw, ID_PATHS);
    let name = first_string(raw, NAME_PATHS).unwrap_or_else(|| id.to_string());
    // One resolved location serves both display fields; the backends never
    // distinguish city from street address.
    let location = first_string(raw, LOCATION_PATHS).unwrap_or_default();

    let stars = first_number(raw, STARS_PATHS)
        .map(|s| s.round().clamp(0.0, 5.0) as u8)
        .unwrap_or(0);
    let rating = first_number(raw, RATING_PATHS).unwrap_or(0.0);
    let review_count = first_number(raw, REVIEW_COUNT_PATHS)
        .map(|n| n.max(0.0) as u32)
        .unwrap_or(0);

    let rooms = raw
        .get("rooms")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let min_price = rooms
        .iter()
        .filter_map(|room| room.get("price").and_then(Value::as_f64))
        .filter(|p| p.is_finite())
        .reduce(f64::min);
    let on_request_only = !rooms.is_empty()
        && rooms
            .iter()
            .all(|room| room.get("onRequest").and_then(Value::as_bool) == Some(true));

    let mut images = string_list(raw, IMAGE_LIST_KEYS);
    let image = first_string(raw, IMAGE_PATHS).or_else(|| images.first().cloned());
    if images.is_empty() {
        if let Some(primary) = &image {
            images.push(primary.clone());
        }
    }

    Hotel {
        id,
        name,
        city: location.clone(),
        address: location,
        stars,
        rating,
        review_count,
        description: first_string(raw, DESCRIPTION_PATHS).unwrap_or_default(),
        image: image.unwrap_or_default(),
        images,
        price: min_price.unwrap_or(0.0),
        has_price: min_price.is_some(),
        on_request_only,
        amenities: string_list(raw, AMENITY_KEYS),
        boarding_types: string_list(raw, BOARDING_LIST_KEYS),
    }
}

pub fn normalize_rooms(raw: &Value) -> Vec<Room> {
    raw.get("rooms")
        .and_then(Value::as_array)
        .map(|rooms| rooms.iter().map(normalize_room).collect())
        .unwrap_or_default()
}

pub fn normalize_room(raw: &Value) -> Room {
    let id = resolve_id(raw, ROOM_ID_PATHS);
    let name = first_string(raw, ROOM_NAME_PATHS).unwrap_or_else(|| id.to_string());
    let cancellation_deadline = first_string(raw, ROOM_CANCEL_DEADLINE_PATHS)
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());

    Room {
        id,
        name,
        beds: first_string(raw, ROOM_BEDS_PATHS).unwrap_or_default(),
        max_occupancy: first_number(raw, ROOM_OCCUPANCY_PATHS)
            .map(|n| n.max(0.0) as u32)
            .unwrap_or(0),
        size: first_string(raw, ROOM_SIZE_PATHS).unwrap_or_default(),
        price_per_night: first_number(raw, ROOM_PRICE_PATHS).unwrap_or(0.0),
        default_boarding: first_string(raw, ROOM_BOARDING_PATHS).unwrap_or_default(),
        boarding_options: object_list(raw, BOARDING_OPTION_KEYS)
            .iter()
            .filter_map(normalize_boarding_option)
            .collect(),
        amenities: string_list(raw, AMENITY_KEYS),
        cancellation_policy: first_string(raw, ROOM_CANCEL_POLICY_PATHS).unwrap_or_default(),
        cancellation_deadline,
        on_request: raw
            .get("onRequest")
            .or_else(|| raw.get("on_request"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

// Entries without a usable type name are dropped.
fn normalize_boarding_option(raw: &Value) -> Option<BoardingOption> {
    let boarding_type = first_string(raw, BOARDING_TYPE_PATHS)?;
    Some(BoardingOption {
        boarding_type,
        price_per_night: first_number(raw, BOARDING_PRICE_PATHS).unwrap_or(0.0),
        total_price: first_number(raw, BOARDING_TOTAL_PATHS).unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_falls_back_to_stringified_id() {
        let hotel = normalize_hotel(&json!({ "id": 42 }));
        assert_eq!(hotel.name, "42");
    }

    #[test]
    fn name_ignores_empty_aliases() {
        let hotel = normalize_hotel(&json!({ "id": 7, "name": "  ", "Name": "Dar El Medina" }));
        assert_eq!(hotel.name, "Dar El Medina");
    }

    #[test]
    fn every_location_alias_resolves_in_priority_order() {
        let shapes = [
            (json!({ "region": "Sousse" }), "Sousse"),
            (json!({ "city": "Hammamet" }), "Hammamet"),
            (json!({ "cityName": "Djerba" }), "Djerba"),
            (json!({ "location": { "city": "Tunis" } }), "Tunis"),
            (json!({ "location": { "region": "Cap Bon" } }), "Cap Bon"),
        ];
        for (raw, expected) in &shapes {
            let hotel = normalize_hotel(raw);
            assert_eq!(hotel.city, *expected);
            assert_eq!(hotel.address, *expected);
        }
        // Explicit region outranks everything else.
        let hotel = normalize_hotel(&json!({
            "region": "Nabeul",
            "city": "Hammamet",
            "location": { "city": "Tunis" }
        }));
        assert_eq!(hotel.city, "Nabeul");
    }

    #[test]
    fn price_is_minimum_of_priced_rooms() {
        let hotel = normalize_hotel(&json!({
            "id": 1,
            "rooms": [
                { "price": 210.0 },
                { "price": 180.5 },
                { "onRequest": true }
            ]
        }));
        assert!(hotel.has_price);
        assert_eq!(hotel.price, 180.5);
    }

    #[test]
    fn unpriced_room_list_yields_no_price() {
        let hotel = normalize_hotel(&json!({
            "id": 1,
            "rooms": [ { "onRequest": true }, { "name": "Twin" } ]
        }));
        assert!(!hotel.has_price);
        assert_eq!(hotel.price, 0.0);
    }

    #[test]
    fn on_request_only_requires_every_room_flagged() {
        let all_flagged = normalize_hotel(&json!({
            "rooms": [ { "onRequest": true }, { "onRequest": true } ]
        }));
        assert!(all_flagged.on_request_only);

        let mixed = normalize_hotel(&json!({
            "rooms": [ { "onRequest": true }, { "price": 90.0 } ]
        }));
        assert!(!mixed.on_request_only);

        let empty = normalize_hotel(&json!({ "rooms": [] }));
        assert!(!empty.on_request_only);
    }

    #[test]
    fn primary_image_backfills_empty_image_list() {
        let hotel = normalize_hotel(&json!({ "image": "https://img.example/front.jpg" }));
        assert_eq!(hotel.image, "https://img.example/front.jpg");
        assert_eq!(hotel.images, vec!["https://img.example/front.jpg"]);
    }

    #[test]
    fn image_list_is_filtered_and_feeds_primary() {
        let hotel = normalize_hotel(&json!({
            "images": ["", "https://img.example/a.jpg", "https://img.example/b.jpg"]
        }));
        assert_eq!(hotel.image, "https://img.example/a.jpg");
        assert_eq!(hotel.images.len(), 2);
    }

    #[test]
    fn malformed_collections_are_treated_as_absent() {
        let hotel = normalize_hotel(&json!({
            "id": 3,
            "rooms": "oops",
            "images": 17,
            "amenities": { "pool": true }
        }));
        assert!(!hotel.has_price);
        assert!(!hotel.on_request_only);
        assert!(hotel.images.is_empty());
        assert!(hotel.amenities.is_empty());
    }

    #[test]
    fn stars_are_rounded_and_clamped() {
        assert_eq!(normalize_hotel(&json!({ "stars": 3.6 })).stars, 4);
        assert_eq!(normalize_hotel(&json!({ "stars": 9 })).stars, 5);
        assert_eq!(normalize_hotel(&json!({ "stars": -2 })).stars, 0);
        assert_eq!(normalize_hotel(&json!({})).stars, 0);
    }

    #[test]
    fn numeric_aliases_take_first_finite_value() {
        let hotel = normalize_hotel(&json!({
            "rating": "high",
            "reviewScore": 4.3,
            "reviewsCount": 211
        }));
        assert_eq!(hotel.rating, 4.3);
        assert_eq!(hotel.review_count, 211);
    }

    #[test]
    fn room_boarding_options_keep_only_typed_entries() {
        let room = normalize_room(&json!({
            "roomId": 5,
            "roomName": "Double vue mer",
            "pricePerNight": 140.0,
            "boardingOptions": [
                { "type": "BB", "pricePerNight": 120.0, "totalPrice": 360.0 },
                { "pricePerNight": 150.0 },
                { "boardingType": "HB", "price": 150.0 }
            ]
        }));
        assert_eq!(room.id, 5);
        assert_eq!(room.price_per_night, 140.0);
        assert_eq!(room.boarding_options.len(), 2);
        assert_eq!(room.boarding_options[0].boarding_type, "BB");
        assert_eq!(room.boarding_options[1].boarding_type, "HB");
        assert_eq!(room.boarding_options[1].price_per_night, 150.0);
    }

    #[test]
    fn room_cancellation_deadline_parses_iso_date() {
        let room = normalize_room(&json!({
            "id": 1,
            "cancellationDeadline": "2026-09-14",
            "cancellationPolicy": "Annulation gratuite avant le 14/09"
        }));
        assert_eq!(
            room.cancellation_deadline,
            NaiveDate::from_ymd_opt(2026, 9, 14)
        );
        assert!(!room.cancellation_policy.is_empty());
    }
}
