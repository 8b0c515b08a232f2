//! Domain entities produced by the result-mapping pipeline.
//!
//! Entities are immutable once constructed; mutation only happens inside the
//! mapping pass that builds them. All types serialize to a stable camelCase
//! form that round-trips through the direct-construction path in
//! [`crate::mapper`], which is how a previously persisted entity is
//! rehydrated without re-deriving it from a raw wire record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The place id is recognised by the owning application only (the place has
/// not yet passed moderation).
pub const SCOPE_APP: &str = "APP";

/// The place id is available to other applications and on the public map.
pub const SCOPE_GOOGLE: &str = "GOOGLE";

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A rectangle on the map. Both corners are always present; a partially
/// specified bounds block on the wire is treated as absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub north_east: Coordinate,
    pub south_west: Coordinate,
}

/// Precision of a geocoded location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    /// The result is approximate.
    Approximate,
    /// Geometric center of a line (e.g. street) or polygon (region) result.
    GeometricCenter,
    /// Interpolated between two precise points, usually on a road.
    RangeInterpolated,
    /// A precise rooftop geocode.
    Rooftop,
}

/// Location, precision and the optional recommended/covering rectangles of a
/// result. `location` is always present — a record without one never maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub location: Coordinate,
    #[serde(default)]
    pub location_type: Option<LocationType>,
    #[serde(default)]
    pub viewport: Option<Bounds>,
    #[serde(default)]
    pub bounds: Option<Bounds>,
}

/// The fixed address-component vocabulary. Values the server introduces after
/// this client was written deserialize as [`AddressComponentType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressComponentType {
    /// A precise street address.
    StreetAddress,
    /// A named route (such as "US 101").
    Route,
    /// A major intersection, usually of two major roads.
    Intersection,
    /// A political entity, usually a polygon of some civil administration.
    Political,
    /// The national political entity, typically the highest order type
    /// returned for an address.
    Country,
    /// First-order civil entity below the country level (states in the US).
    #[serde(rename = "administrative_area_level_1")]
    AdministrativeAreaLevel1,
    /// Second-order civil entity below the country level (counties in the US).
    #[serde(rename = "administrative_area_level_2")]
    AdministrativeAreaLevel2,
    #[serde(rename = "administrative_area_level_3")]
    AdministrativeAreaLevel3,
    #[serde(rename = "administrative_area_level_4")]
    AdministrativeAreaLevel4,
    #[serde(rename = "administrative_area_level_5")]
    AdministrativeAreaLevel5,
    /// A commonly used alternative name for the entity.
    ColloquialArea,
    /// An incorporated city or town political entity.
    Locality,
    /// First-order civil entity below a locality.
    Sublocality,
    #[serde(rename = "sublocality_level_1")]
    SublocalityLevel1,
    #[serde(rename = "sublocality_level_2")]
    SublocalityLevel2,
    #[serde(rename = "sublocality_level_3")]
    SublocalityLevel3,
    #[serde(rename = "sublocality_level_4")]
    SublocalityLevel4,
    #[serde(rename = "sublocality_level_5")]
    SublocalityLevel5,
    /// A named neighborhood.
    Neighborhood,
    /// A named location, usually a building or collection of buildings.
    Premise,
    /// A first-order entity below a named location, usually a single building.
    Subpremise,
    /// A postal code as used for postal mail within the country.
    PostalCode,
    PostalCodePrefix,
    PostalCodeSuffix,
    /// A prominent natural feature.
    NaturalFeature,
    Airport,
    /// A named park.
    Park,
    /// A prominent named point of interest.
    PointOfInterest,
    /// The floor of a building address.
    Floor,
    /// A place that has not yet been categorized.
    Establishment,
    /// A parking lot or structure.
    Parking,
    /// A specific postal box.
    PostBox,
    /// A grouping of geographic areas used for mailing addresses in some
    /// countries.
    PostalTown,
    /// The room of a building address.
    Room,
    /// The precise street number.
    StreetNumber,
    BusStation,
    TrainStation,
    SubwayStation,
    TransitStation,
    /// A Japanese ward, distinguishing locality components within an address.
    Ward,
    /// An address component type this client does not know about.
    #[serde(other)]
    Unknown,
}

/// One component of a structured address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<AddressComponentType>,
}

/// A place photo descriptor. The `reference` identifies the image for the
/// photo endpoint (see [`crate::client::PlacesClient::photo_url`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub width: u32,
    pub height: u32,
    /// Required attributions, in the order the server returned them.
    #[serde(default)]
    pub attributions: Vec<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

/// A user review attached to a place detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author_name: String,
    #[serde(default)]
    pub author_url: Option<String>,
    pub language: String,
    pub rating: i32,
    pub text: String,
    /// Submission time, derived from the epoch-seconds `time` wire field.
    pub date: DateTime<Utc>,
}

/// One open/close interval of a place's weekly opening hours, normalized to
/// UTC instants (see the policy note on [`crate::mapper`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningHoursPeriod {
    pub open: DateTime<Utc>,
    pub close: DateTime<Utc>,
}

/// Base entity shared by every mapped result: structured address, geometry
/// and identity fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocoderResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub place_id: Option<String>,
    /// Types of the returned element (place types, not address-component
    /// types), kept as raw strings.
    #[serde(default)]
    pub types: Vec<String>,
    /// [`SCOPE_APP`] or [`SCOPE_GOOGLE`].
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Offset of the place's local zone from UTC, in minutes.
    #[serde(default)]
    pub utc_offset: Option<i32>,
}

impl GeocoderResult {
    /// Returns the first address component carrying the given type.
    #[must_use]
    pub fn address_component(&self, kind: AddressComponentType) -> Option<&AddressComponent> {
        self.address_components
            .iter()
            .find(|component| component.types.contains(&kind))
    }
}

/// A search result: the base geocoder fields plus a name and photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(flatten)]
    pub result: GeocoderResult,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// The most specialized entity, returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetail {
    #[serde(flatten)]
    pub place: Place,
    /// International-format phone number.
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub opening_hours: Vec<OpeningHoursPeriod>,
}
