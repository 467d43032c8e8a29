/// Store-assigned document identifiers are opaque strings (UUID v4).
pub type EntityId = String;

/// Stable identifier of an authenticated principal, as issued by the
/// external identity provider.
pub type OwnerId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
