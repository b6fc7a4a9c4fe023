//! Channel naming conventions.
//!
//! Channel names follow
//! `org.chicago.cta.<entity-type>.<normalized-entity-name>.<event-type>.v<version>`.
//! The version suffix routes incompatible schema changes to a new channel
//! instead of mutating an existing one in place.

/// Namespace prefix shared by every channel in the system.
pub const NAMESPACE: &str = "org.chicago.cta";

/// Normalize a human-readable entity name into a broker-legal identifier.
///
/// Lowercases the name, replaces `/` with `_and_`, spaces and `-` with `_`,
/// and strips apostrophes. The result is a pure function of the input, so the
/// same entity always maps to the same channel.
pub fn normalize_entity_name(name: &str) -> String {
    name.to_lowercase()
        .replace('/', "_and_")
        .replace(' ', "_")
        .replace('-', "_")
        .replace('\'', "")
}

/// Build the full channel name for an entity-scoped event stream.
pub fn channel_name(entity_type: &str, entity_name: &str, event_type: &str, version: u32) -> String {
    format!(
        "{NAMESPACE}.{entity_type}.{}.{event_type}.v{version}",
        normalize_entity_name(entity_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_illegal_characters() {
        assert_eq!(
            normalize_entity_name("Belmont-Wilson's/North"),
            "belmont_wilsons_and_north"
        );
        assert_eq!(normalize_entity_name("Bryn Mawr"), "bryn_mawr");
        assert_eq!(normalize_entity_name("Howard"), "howard");
    }

    #[test]
    fn test_normalize_output_is_broker_legal() {
        let names = ["Belmont-Wilson's/North", "O'Hare", "Irving Park", "35th/Archer"];
        for name in names {
            let normalized = normalize_entity_name(name);
            assert!(!normalized.contains('/'), "slash in {normalized}");
            assert!(!normalized.contains(' '), "space in {normalized}");
            assert!(!normalized.contains('-'), "dash in {normalized}");
            assert!(!normalized.contains('\''), "apostrophe in {normalized}");
        }
    }

    #[test]
    fn test_normalize_is_deterministic() {
        assert_eq!(
            normalize_entity_name("Belmont-Wilson's/North"),
            normalize_entity_name("Belmont-Wilson's/North")
        );
    }

    #[test]
    fn test_channel_name_convention() {
        assert_eq!(
            channel_name("station", "Bryn Mawr", "arrival", 1),
            "org.chicago.cta.station.bryn_mawr.arrival.v1"
        );
    }
}
