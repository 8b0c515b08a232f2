//! The cumulative extraction pipeline turning raw wire records into typed
//! entities.
//!
//! Three stages mirror the entity hierarchy: the base stage builds the
//! [`GeocoderResult`] fields, the place stage adds name and photos, the
//! detail stage adds contact, reviews and opening hours. Each stage consumes
//! only the keys it owns from an owned working copy of the record (see
//! [`crate::extract`]), so stage boundaries are enforced by construction.
//!
//! A record that already carries the serialized entity shape — probed by the
//! `addressComponents` marker key, which the raw wire format never uses —
//! bypasses the pipeline and deserializes directly. This is the rehydration
//! path for entities persisted by an earlier run.
//!
//! Opening-hours policy: a period endpoint's day + time is read as UTC,
//! anchored to the next occurrence of that weekday, then shifted by
//! `-utc_offset` minutes. The resulting [`DateTime<Utc>`] is the
//! timezone-correct instant; converting it to a display zone is left to the
//! caller.

use chrono::{DateTime, Datelike, Days, Duration, Utc};
use serde_json::{Map, Value};

use crate::error::PlacesError;
use crate::extract::{extract, peek};
use crate::types::{
    AddressComponent, Bounds, Coordinate, GeocoderResult, Geometry, OpeningHoursPeriod, Photo,
    Place, PlaceDetail, Review,
};

/// Marker key unique to the serialized entity shape; raw wire records carry
/// `address_components` instead.
const SERIALIZED_MARKER: &str = "addressComponents";

/// Maps a raw geocoding record (or rehydrates a serialized one) into a
/// [`GeocoderResult`].
///
/// # Errors
///
/// [`PlacesError::MalformedResponse`] when the record is not an object or is
/// missing `geometry/location`; [`PlacesError::Deserialize`] when a
/// serialized-shape record does not match the entity type.
pub fn parse_geocoder_result(value: Value) -> Result<GeocoderResult, PlacesError> {
    if is_serialized(&value) {
        return from_serialized(value, "GeocoderResult");
    }
    let mut record = into_record(value)?;
    map_geocoder_result(&mut record)
}

/// Maps a raw search-result record (or rehydrates a serialized one) into a
/// [`Place`].
///
/// # Errors
///
/// Same conditions as [`parse_geocoder_result`].
pub fn parse_place(value: Value) -> Result<Place, PlacesError> {
    if is_serialized(&value) {
        return from_serialized(value, "Place");
    }
    let mut record = into_record(value)?;
    map_place(&mut record)
}

/// Maps a raw detail record (or rehydrates a serialized one) into a
/// [`PlaceDetail`].
///
/// # Errors
///
/// Same conditions as [`parse_geocoder_result`].
pub fn parse_place_detail(value: Value) -> Result<PlaceDetail, PlacesError> {
    if is_serialized(&value) {
        return from_serialized(value, "PlaceDetail");
    }
    let mut record = into_record(value)?;
    map_place_detail(&mut record)
}

fn is_serialized(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key(SERIALIZED_MARKER))
}

fn from_serialized<T>(value: Value, context: &str) -> Result<T, PlacesError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value).map_err(|e| PlacesError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

fn into_record(value: Value) -> Result<Map<String, Value>, PlacesError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(PlacesError::MalformedResponse(
            "result record is not a JSON object".to_string(),
        )),
    }
}

fn extract_string(record: &mut Map<String, Value>, path: &str) -> Option<String> {
    match extract(record, path) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn extract_string_list(record: &mut Map<String, Value>, path: &str) -> Vec<String> {
    match extract(record, path) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn extract_f64(record: &mut Map<String, Value>, path: &str) -> Option<f64> {
    extract(record, path)?.as_f64()
}

fn extract_u32(record: &mut Map<String, Value>, path: &str) -> Option<u32> {
    extract(record, path)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
}

// ---------------------------------------------------------------------------
// Base stage
// ---------------------------------------------------------------------------

fn map_geocoder_result(record: &mut Map<String, Value>) -> Result<GeocoderResult, PlacesError> {
    let address_components = match extract(record, "address_components") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(map_address_component)
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    let geometry = map_geometry(record)?;

    Ok(GeocoderResult {
        address_components,
        formatted_address: extract_string(record, "formatted_address"),
        geometry,
        place_id: extract_string(record, "place_id"),
        types: extract_string_list(record, "types"),
        scope: extract_string(record, "scope"),
        url: extract_string(record, "url"),
        utc_offset: extract(record, "utc_offset")
            .and_then(|v| v.as_i64())
            .and_then(|n| i32::try_from(n).ok()),
    })
}

fn map_address_component(value: Value) -> Result<AddressComponent, PlacesError> {
    let mut record = into_record(value)?;
    let long_name = extract_string(&mut record, "long_name").ok_or_else(|| {
        PlacesError::MalformedResponse("address component is missing `long_name`".to_string())
    })?;
    let short_name = extract_string(&mut record, "short_name").ok_or_else(|| {
        PlacesError::MalformedResponse("address component is missing `short_name`".to_string())
    })?;
    let types = match extract(&mut record, "types") {
        Some(value) => serde_json::from_value(value).map_err(|e| PlacesError::Deserialize {
            context: "address component types".to_string(),
            source: e,
        })?,
        None => Vec::new(),
    };
    Ok(AddressComponent {
        long_name,
        short_name,
        types,
    })
}

fn map_geometry(record: &mut Map<String, Value>) -> Result<Geometry, PlacesError> {
    let viewport = map_bounds(record, "geometry/viewport");
    let bounds = map_bounds(record, "geometry/bounds");

    let latitude = extract_f64(record, "geometry/location/lat");
    let longitude = extract_f64(record, "geometry/location/lng");
    let location = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Coordinate {
            latitude,
            longitude,
        },
        _ => {
            return Err(PlacesError::MalformedResponse(
                "result is missing `geometry/location`".to_string(),
            ))
        }
    };

    let location_type =
        extract(record, "geometry/location_type").and_then(|v| serde_json::from_value(v).ok());

    Ok(Geometry {
        location,
        location_type,
        viewport,
        bounds,
    })
}

/// Reads the bounds block under `path`, accepting either the nested
/// `{northeast: {lat, lng}, southwest: {lat, lng}}` shape or the flat
/// `{north, east, south, west}` fallback. A partially specified block maps
/// to `None`, keeping the both-corners-or-nothing invariant.
fn map_bounds(record: &mut Map<String, Value>, path: &str) -> Option<Bounds> {
    if peek(record, &format!("{path}/northeast")).is_some() {
        return Some(Bounds {
            north_east: Coordinate {
                latitude: extract_f64(record, &format!("{path}/northeast/lat"))?,
                longitude: extract_f64(record, &format!("{path}/northeast/lng"))?,
            },
            south_west: Coordinate {
                latitude: extract_f64(record, &format!("{path}/southwest/lat"))?,
                longitude: extract_f64(record, &format!("{path}/southwest/lng"))?,
            },
        });
    }
    if peek(record, path).is_some() {
        return Some(Bounds {
            north_east: Coordinate {
                latitude: extract_f64(record, &format!("{path}/north"))?,
                longitude: extract_f64(record, &format!("{path}/east"))?,
            },
            south_west: Coordinate {
                latitude: extract_f64(record, &format!("{path}/south"))?,
                longitude: extract_f64(record, &format!("{path}/west"))?,
            },
        });
    }
    None
}

// ---------------------------------------------------------------------------
// Place stage
// ---------------------------------------------------------------------------

fn map_place(record: &mut Map<String, Value>) -> Result<Place, PlacesError> {
    let result = map_geocoder_result(record)?;
    let name = extract_string(record, "name");
    let photos = match extract(record, "photos") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(map_photo)
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };
    Ok(Place {
        result,
        name,
        photos,
    })
}

fn map_photo(value: Value) -> Result<Photo, PlacesError> {
    let mut record = into_record(value)?;
    let width = extract_u32(&mut record, "width").ok_or_else(|| {
        PlacesError::MalformedResponse("photo is missing `width`".to_string())
    })?;
    let height = extract_u32(&mut record, "height").ok_or_else(|| {
        PlacesError::MalformedResponse("photo is missing `height`".to_string())
    })?;
    Ok(Photo {
        width,
        height,
        attributions: extract_string_list(&mut record, "html_attributions"),
        reference: extract_string(&mut record, "photo_reference"),
    })
}

// ---------------------------------------------------------------------------
// Detail stage
// ---------------------------------------------------------------------------

fn map_place_detail(record: &mut Map<String, Value>) -> Result<PlaceDetail, PlacesError> {
    let place = map_place(record)?;
    let utc_offset = place.result.utc_offset.unwrap_or(0);

    let phone = extract_string(record, "international_phone_number");
    let website = extract_string(record, "website");
    let rating = extract_f64(record, "rating");

    let reviews = match extract(record, "reviews") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(map_review)
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    let opening_hours = match extract(record, "opening_hours/periods") {
        Some(Value::Array(items)) => map_opening_hours(items, utc_offset, Utc::now())?,
        _ => Vec::new(),
    };

    Ok(PlaceDetail {
        place,
        phone,
        website,
        rating,
        reviews,
        opening_hours,
    })
}

/// `author_name`, `rating` and `time` are required; `language` and `text`
/// default to empty, which the wire format produces for untranslated or
/// rating-only reviews.
fn map_review(value: Value) -> Result<Review, PlacesError> {
    let mut record = into_record(value)?;
    let author_name = extract_string(&mut record, "author_name").ok_or_else(|| {
        PlacesError::MalformedResponse("review is missing `author_name`".to_string())
    })?;
    let rating = extract(&mut record, "rating")
        .and_then(|v| v.as_i64())
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| PlacesError::MalformedResponse("review is missing `rating`".to_string()))?;
    let time = extract(&mut record, "time")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| PlacesError::MalformedResponse("review is missing `time`".to_string()))?;
    let date = DateTime::from_timestamp(time, 0).ok_or_else(|| {
        PlacesError::MalformedResponse(format!("review timestamp {time} is out of range"))
    })?;
    Ok(Review {
        author_name,
        author_url: extract_string(&mut record, "author_url"),
        language: extract_string(&mut record, "language").unwrap_or_default(),
        rating,
        text: extract_string(&mut record, "text").unwrap_or_default(),
        date,
    })
}

fn map_opening_hours(
    items: Vec<Value>,
    utc_offset: i32,
    anchor: DateTime<Utc>,
) -> Result<Vec<OpeningHoursPeriod>, PlacesError> {
    let mut periods = Vec::with_capacity(items.len());
    for item in items {
        let mut record = into_record(item)?;
        // A period without both endpoints (e.g. the always-open sentinel) is
        // skipped rather than mapped one-sided.
        let (Some(open), Some(close)) = (record.remove("open"), record.remove("close")) else {
            continue;
        };
        periods.push(OpeningHoursPeriod {
            open: map_period_endpoint(open, utc_offset, anchor)?,
            close: map_period_endpoint(close, utc_offset, anchor)?,
        });
    }
    Ok(periods)
}

fn map_period_endpoint(
    value: Value,
    utc_offset: i32,
    anchor: DateTime<Utc>,
) -> Result<DateTime<Utc>, PlacesError> {
    let mut record = into_record(value)?;
    let day = extract(&mut record, "day")
        .and_then(|v| v.as_u64())
        .and_then(|d| u32::try_from(d).ok())
        .filter(|d| *d <= 6)
        .ok_or_else(|| {
            PlacesError::MalformedResponse(
                "opening-hours endpoint is missing a valid `day`".to_string(),
            )
        })?;
    let (hour, minute) = extract_hour_minute(&mut record)?;
    let in_utc = next_weekday_time(anchor, day, hour, minute).ok_or_else(|| {
        PlacesError::MalformedResponse(format!(
            "opening-hours time {hour:02}:{minute:02} is out of range"
        ))
    })?;
    Ok(in_utc - Duration::minutes(i64::from(utc_offset)))
}

/// Accepts both time-of-day wire variants: split `hours`/`minutes` fields or
/// a packed 4-digit string (`"0900"` = 09:00). A packed string under the
/// `hours` key is tolerated as well.
fn extract_hour_minute(record: &mut Map<String, Value>) -> Result<(u32, u32), PlacesError> {
    match extract(record, "hours") {
        Some(Value::Number(hours)) => {
            let hour = hours
                .as_u64()
                .and_then(|h| u32::try_from(h).ok())
                .ok_or_else(|| {
                    PlacesError::MalformedResponse(format!("invalid `hours` value {hours}"))
                })?;
            let minute = extract(record, "minutes")
                .and_then(|v| v.as_u64())
                .and_then(|m| u32::try_from(m).ok())
                .unwrap_or(0);
            Ok((hour, minute))
        }
        Some(Value::String(packed)) => parse_packed_time(&packed),
        _ => {
            let packed = extract_string(record, "time").ok_or_else(|| {
                PlacesError::MalformedResponse(
                    "opening-hours endpoint has neither `hours` nor `time`".to_string(),
                )
            })?;
            parse_packed_time(&packed)
        }
    }
}

fn parse_packed_time(packed: &str) -> Result<(u32, u32), PlacesError> {
    if packed.len() != 4 || !packed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PlacesError::MalformedResponse(format!(
            "invalid packed time {packed:?}"
        )));
    }
    let hour = packed[..2].parse::<u32>().map_err(|e| {
        PlacesError::MalformedResponse(format!("invalid packed time {packed:?}: {e}"))
    })?;
    let minute = packed[2..].parse::<u32>().map_err(|e| {
        PlacesError::MalformedResponse(format!("invalid packed time {packed:?}: {e}"))
    })?;
    Ok((hour, minute))
}

/// The next occurrence of `day` (0 = Sunday … 6 = Saturday) strictly after
/// `anchor`'s date, at `hour:minute` UTC.
fn next_weekday_time(
    anchor: DateTime<Utc>,
    day: u32,
    hour: u32,
    minute: u32,
) -> Option<DateTime<Utc>> {
    let today = anchor.weekday().num_days_from_sunday();
    let mut ahead = (day + 7 - today) % 7;
    if ahead == 0 {
        ahead = 7;
    }
    let date = anchor
        .date_naive()
        .checked_add_days(Days::new(u64::from(ahead)))?;
    Some(date.and_hms_opt(hour, minute, 0)?.and_utc())
}
