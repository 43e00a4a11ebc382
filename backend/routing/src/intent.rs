//! Intent resolution.
//!
//! The upstream NLU layer tags each request with an intent display name of
//! the form `"<domain>.<action> - context: <context-name>"`. The four
//! routable combinations form a closed enumeration; anything else is rejected
//! with a typed error instead of an unhandled lookup fault.

use mealflow_core::FulfillError;

/// The closed set of routable intent/context combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    AddToOrder,
    RemoveFromOrder,
    CompleteOrder,
    TrackOrder,
}

impl Intent {
    /// Resolve an upstream display name to an intent.
    ///
    /// Matching is exact, whitespace included. The complete-order key has no
    /// space after `context:` — that inconsistency is what the live upstream
    /// agent configuration sends, so it must be matched as-is.
    pub fn parse(display_name: &str) -> Result<Self, FulfillError> {
        match display_name {
            "order.add - context: ongoing-order" => Ok(Intent::AddToOrder),
            "order.remove - context: ongoing-order" => Ok(Intent::RemoveFromOrder),
            "order.complete - context:ongoing-order" => Ok(Intent::CompleteOrder),
            "track.order - context: ongoing-tracking" => Ok(Intent::TrackOrder),
            other => Err(FulfillError::UnknownIntent(other.to_string())),
        }
    }

    /// The upstream display name this intent was resolved from.
    pub fn display_name(&self) -> &'static str {
        match self {
            Intent::AddToOrder => "order.add - context: ongoing-order",
            Intent::RemoveFromOrder => "order.remove - context: ongoing-order",
            Intent::CompleteOrder => "order.complete - context:ongoing-order",
            Intent::TrackOrder => "track.order - context: ongoing-tracking",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_four_routable_keys() {
        assert_eq!(
            Intent::parse("order.add - context: ongoing-order").unwrap(),
            Intent::AddToOrder
        );
        assert_eq!(
            Intent::parse("order.remove - context: ongoing-order").unwrap(),
            Intent::RemoveFromOrder
        );
        assert_eq!(
            Intent::parse("order.complete - context:ongoing-order").unwrap(),
            Intent::CompleteOrder
        );
        assert_eq!(
            Intent::parse("track.order - context: ongoing-tracking").unwrap(),
            Intent::TrackOrder
        );
    }

    #[test]
    fn matching_is_whitespace_exact() {
        // The complete-order key has no space after the colon; the spaced
        // variant must not match, and vice versa for the others.
        assert!(Intent::parse("order.complete - context: ongoing-order").is_err());
        assert!(Intent::parse("order.add - context:ongoing-order").is_err());
    }

    #[test]
    fn unknown_names_are_typed_errors() {
        let err = Intent::parse("order.cancel - context: ongoing-order").unwrap_err();
        match err {
            FulfillError::UnknownIntent(name) => {
                assert_eq!(name, "order.cancel - context: ongoing-order");
            }
            other => panic!("expected UnknownIntent, got {other:?}"),
        }
    }

    #[test]
    fn display_name_round_trips() {
        for intent in [
            Intent::AddToOrder,
            Intent::RemoveFromOrder,
            Intent::CompleteOrder,
            Intent::TrackOrder,
        ] {
            assert_eq!(Intent::parse(intent.display_name()).unwrap(), intent);
        }
    }
}
