// crates/govtalk-core/src/core/routing.rs
// ============================================================================
// Module: GovTalk Details Collections
// Description: Keys, target organisations, and channel routing entries.
// Purpose: Model the `GovTalkDetails` collections with their dedup semantics.
// Dependencies: crate::core::message, time
// ============================================================================

//! ## Overview
//! The `GovTalkDetails` section of an envelope carries three caller-owned
//! collections: message keys, target organisations, and the channel-routing
//! audit trail. Each collection preserves insertion order; deduplication
//! rules differ per collection and can be bypassed with an explicit `force`.
//! The engine itself appends exactly one trailing self-identifying route at
//! build time, after all caller-added routes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::message::FieldError;

// ============================================================================
// SECTION: Message Keys
// ============================================================================

/// One `Key` entry under `GovTalkDetails.Keys`.
///
/// # Invariants
/// - Type and value are both non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageKey {
    /// Key type, emitted as the `Type` attribute.
    key_type: String,
    /// Key value, emitted as element text.
    value: String,
}

impl MessageKey {
    /// Creates a key after checking both parts are non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::KeyEmpty`] when either part is empty.
    pub fn new(key_type: impl Into<String>, value: impl Into<String>) -> Result<Self, FieldError> {
        let key_type = key_type.into();
        let value = value.into();
        if key_type.is_empty() || value.is_empty() {
            return Err(FieldError::KeyEmpty);
        }
        Ok(Self {
            key_type,
            value,
        })
    }

    /// Returns the key type.
    #[must_use]
    pub fn key_type(&self) -> &str {
        &self.key_type
    }

    /// Returns the key value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Ordered collection of message keys.
///
/// # Invariants
/// - Duplicates are allowed; entries only leave through explicit deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageKeys(Vec<MessageKey>);

impl MessageKeys {
    /// Creates an empty key collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a key. Duplicates are allowed.
    pub fn add(&mut self, key: MessageKey) {
        self.0.push(key);
    }

    /// Deletes every key with the given type, optionally narrowed to a value.
    ///
    /// Returns the number of keys removed.
    pub fn delete(&mut self, key_type: &str, value: Option<&str>) -> usize {
        let before = self.0.len();
        self.0.retain(|key| {
            key.key_type() != key_type || value.is_some_and(|wanted| wanted != key.value())
        });
        before - self.0.len()
    }

    /// Removes every key.
    pub fn reset(&mut self) {
        self.0.clear();
    }

    /// Returns the keys in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[MessageKey] {
        &self.0
    }

    /// Returns true when no keys are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// SECTION: Target Organisations
// ============================================================================

/// One `Organisation` entry under `GovTalkDetails.TargetDetails`.
///
/// # Invariants
/// - Non-empty and shorter than 65 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOrganisation(String);

impl TargetOrganisation {
    /// Creates a target organisation after checking its length.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TargetOrganisationLength`] when empty or 65
    /// characters or longer.
    pub fn new(organisation: impl Into<String>) -> Result<Self, FieldError> {
        let organisation = organisation.into();
        if organisation.is_empty() || organisation.chars().count() >= 65 {
            return Err(FieldError::TargetOrganisationLength);
        }
        Ok(Self(organisation))
    }

    /// Returns the organisation as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Insertion-ordered set of target organisations.
///
/// # Invariants
/// - Deduplicated by default; `force` stores duplicates regardless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetOrganisations(Vec<TargetOrganisation>);

impl TargetOrganisations {
    /// Creates an empty organisation set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds an organisation, skipping duplicates unless `force` is set.
    pub fn add(&mut self, organisation: TargetOrganisation, force: bool) {
        if force || !self.0.contains(&organisation) {
            self.0.push(organisation);
        }
    }

    /// Deletes every entry matching the given organisation name.
    ///
    /// Returns the number of entries removed.
    pub fn delete(&mut self, organisation: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|entry| entry.as_str() != organisation);
        before - self.0.len()
    }

    /// Removes every organisation.
    pub fn reset(&mut self) {
        self.0.clear();
    }

    /// Returns the organisations in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[TargetOrganisation] {
        &self.0
    }

    /// Returns true when no organisations are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// SECTION: Channel Routing
// ============================================================================

/// One `ID` entry inside a `ChannelRouting` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRouteId {
    /// Id type, emitted as the `type` attribute.
    pub id_type: String,
    /// Id value, emitted as element text.
    pub value: String,
}

/// One `ChannelRouting` entry: a hop in the processing audit trail.
///
/// # Invariants
/// - The URI is non-empty; the timestamp is an RFC 3339 instant fixed when
///   the route is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRoute {
    /// URI of the owner of the process that handled the message.
    uri: String,
    /// Software product name, if declared.
    product: Option<String>,
    /// Software product version, if declared.
    version: Option<String>,
    /// Route-scoped identifiers.
    ids: Vec<ChannelRouteId>,
    /// Moment the route processed the message, RFC 3339.
    timestamp: String,
}

impl ChannelRoute {
    /// Creates a route entry, stamping it with the supplied instant.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::RouteUriEmpty`] when the URI is empty, or
    /// [`FieldError::RouteTimestamp`] when the instant cannot be rendered as
    /// RFC 3339.
    pub fn new(
        uri: impl Into<String>,
        product: Option<String>,
        version: Option<String>,
        ids: Vec<ChannelRouteId>,
        timestamp: OffsetDateTime,
    ) -> Result<Self, FieldError> {
        let uri = uri.into();
        if uri.is_empty() {
            return Err(FieldError::RouteUriEmpty);
        }
        let timestamp = timestamp.format(&Rfc3339).map_err(|_| FieldError::RouteTimestamp)?;
        Ok(Self {
            uri,
            product,
            version,
            ids,
            timestamp,
        })
    }

    /// Returns the route URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the product name, if declared.
    #[must_use]
    pub fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }

    /// Returns the product version, if declared.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the route-scoped identifiers.
    #[must_use]
    pub fn ids(&self) -> &[ChannelRouteId] {
        &self.ids
    }

    /// Returns the RFC 3339 timestamp.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Returns true when this route matches another by (product, version).
    #[must_use]
    fn same_software(&self, other: &Self) -> bool {
        self.product == other.product && self.version == other.version
    }
}

/// Append-only list of caller-added channel routes.
///
/// # Invariants
/// - Deduplicated by (product, version) unless `force`; never mutated in
///   place except wholesale reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelRoutes(Vec<ChannelRoute>);

impl ChannelRoutes {
    /// Creates an empty route list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a route, skipping (product, version) duplicates unless `force`.
    pub fn add(&mut self, route: ChannelRoute, force: bool) {
        if force || !self.0.iter().any(|existing| existing.same_software(&route)) {
            self.0.push(route);
        }
    }

    /// Removes every route.
    pub fn reset(&mut self) {
        self.0.clear();
    }

    /// Returns the routes in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[ChannelRoute] {
        &self.0
    }

    /// Returns the number of stored routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no routes are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
