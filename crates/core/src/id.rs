//! Unique identifiers for Blinks entities.
//!
//! Strongly-typed UUID identifiers via [`domain-key`](https://crates.io/crates/domain-key)
//! `Uuid<D>` wrappers. Each type is parameterized by a unique domain marker,
//! so an [`InstanceId`] can never be confused with another id at compile
//! time. All ids are `Copy` (16 bytes), support `v4()`, `nil()`,
//! `parse(&str)`, and serialize as UUID strings.

use domain_key::define_uuid;

// Re-export for downstream parse error handling
pub use domain_key::UuidParseError;

// Every fetched or chained blink gets a fresh instance id; the render layer
// keys off it to know when the model underneath it was swapped.
define_uuid!(pub InstanceIdDomain => InstanceId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_id_v4_creates_non_nil_uuid() {
        let id = InstanceId::v4();
        assert!(!id.is_nil());
    }

    #[test]
    fn instance_id_roundtrips_through_string() {
        let id = InstanceId::v4();
        let parsed = InstanceId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }
}
