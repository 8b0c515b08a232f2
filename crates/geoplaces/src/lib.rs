//! Typed async client for the Google Maps geocoding and places web services.
//!
//! Wraps the JSON endpoints (`geocode/json`, `place/nearbysearch/json`,
//! `place/textsearch/json`, `place/details/json`) behind [`PlacesClient`],
//! mapping the service's nested wire records into immutable domain entities
//! and carrying the server-issued continuation token across result pages via
//! [`PageCursor`].

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod mapper;
pub mod pagination;
pub mod params;
pub mod types;

mod extract;

pub use client::{PlacesClient, SearchPage};
pub use config::{load_config, load_config_from_env, ClientConfig};
pub use envelope::ResponseEnvelope;
pub use error::PlacesError;
pub use mapper::{parse_geocoder_result, parse_place, parse_place_detail};
pub use pagination::{CursorState, EndpointFamily, PageCursor, PAGE_TOKEN_DELAY};
pub use types::{
    AddressComponent, AddressComponentType, Bounds, Coordinate, GeocoderResult, Geometry,
    LocationType, OpeningHoursPeriod, Photo, Place, PlaceDetail, Review,
};
