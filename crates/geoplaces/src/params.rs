//! Query-parameter names accepted by the geocoding and places endpoints.
//!
//! Kept as constants so call sites and tests agree on spelling; the service
//! is case-sensitive and several names are single words with no separator.

/// API key, appended automatically by the client unless the caller already
/// supplied one.
pub const KEY: &str = "key";

/// Free-form address for forward geocoding.
pub const ADDRESS: &str = "address";

/// `lat,lng` pair for reverse geocoding.
pub const LATLNG: &str = "latlng";

/// `lat,lng` center of a nearby search.
pub const LOCATION: &str = "location";

/// Search radius in meters.
pub const RADIUS: &str = "radius";

/// Term matched against all content indexed for a place.
pub const KEYWORD: &str = "keyword";

/// Language code for returned content.
pub const LANGUAGE: &str = "language";

/// Minimum price level (0 to 4).
pub const MINPRICE: &str = "minprice";

/// Maximum price level (0 to 4).
pub const MAXPRICE: &str = "maxprice";

/// Term matched against place names.
pub const NAME: &str = "name";

/// Restricts results to places open at request time.
pub const OPENNOW: &str = "opennow";

/// Result ordering (`prominence` or `distance`).
pub const RANKBY: &str = "rankby";

/// Restricts results to a single place type.
pub const TYPE: &str = "type";

/// Free-form query for text search.
pub const QUERY: &str = "query";

/// Place identifier for the detail endpoint.
pub const PLACEID: &str = "placeid";

/// Legacy place identifier for the detail endpoint, superseded by `placeid`.
pub const REFERENCE: &str = "reference";

/// Continuation token for the next page of a search.
pub const PAGETOKEN: &str = "pagetoken";

/// Photo identifier for the photo endpoint.
pub const PHOTOREFERENCE: &str = "photoreference";

/// Maximum width, in pixels, of a served photo.
pub const MAXWIDTH: &str = "maxwidth";

/// Maximum height, in pixels, of a served photo.
pub const MAXHEIGHT: &str = "maxheight";
