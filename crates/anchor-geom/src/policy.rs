//! Placement policy consumed by the solver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PolicyError;

/// Default gap between anchor and menu along the placement axis.
pub const DEFAULT_OFFSET: f64 = 8.0;

/// Default minimum distance between the menu and the viewport edges.
pub const DEFAULT_MARGIN: f64 = 8.0;

/// Preferred vertical side for the menu.
///
/// Unrecognized values deserialize as [`Placement::Auto`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Placement {
    /// Below the anchor when it fits, otherwise above.
    #[default]
    Auto,
    /// Above the anchor, falling back to below.
    Top,
    /// Below the anchor, falling back to above.
    Bottom,
}

impl Placement {
    /// Parse a placement name; anything unrecognized is `Auto`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            _ => Self::Auto,
        }
    }
}

impl From<String> for Placement {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Top => "top",
            Self::Bottom => "bottom",
        })
    }
}

/// Horizontal alignment of the menu relative to the anchor.
///
/// Unrecognized values deserialize as [`Align::Start`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Align {
    /// Leading edges line up (left in LTR).
    #[default]
    Start,
    /// Centers line up.
    Center,
    /// Trailing edges line up (right in LTR).
    End,
}

impl Align {
    /// Parse an alignment name; anything unrecognized is `Start`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" => Self::Center,
            "end" => Self::End,
            _ => Self::Start,
        }
    }

    /// Effective alignment once writing direction is taken into account.
    ///
    /// In right-to-left layouts `Start` and `End` trade places; `Center` is
    /// unaffected.
    #[must_use]
    pub const fn resolve(self, direction: LayoutDirection, rtl_aware: bool) -> Self {
        match (self, direction, rtl_aware) {
            (Self::Start, LayoutDirection::Rtl, true) => Self::End,
            (Self::End, LayoutDirection::Rtl, true) => Self::Start,
            (a, _, _) => a,
        }
    }
}

impl From<String> for Align {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        })
    }
}

/// Writing direction of the hosting UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Left-to-right.
    #[default]
    Ltr,
    /// Right-to-left.
    Rtl,
}

/// Everything the solver needs besides geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementPolicy {
    /// Preferred vertical side.
    pub placement: Placement,
    /// Horizontal alignment.
    pub align: Align,
    /// Gap between anchor and menu.
    pub offset: f64,
    /// Minimum distance from the viewport edges.
    pub margin: f64,
    /// Swap start/end alignment in right-to-left layouts.
    pub rtl_aware: bool,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            placement: Placement::Auto,
            align: Align::Start,
            offset: DEFAULT_OFFSET,
            margin: DEFAULT_MARGIN,
            rtl_aware: true,
        }
    }
}

impl PlacementPolicy {
    /// Set the preferred side.
    #[must_use]
    pub const fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the horizontal alignment.
    #[must_use]
    pub const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set the anchor/menu gap.
    #[must_use]
    pub const fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the viewport edge margin.
    #[must_use]
    pub const fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Enable or disable the right-to-left alignment swap.
    #[must_use]
    pub const fn rtl_aware(mut self, rtl_aware: bool) -> Self {
        self.rtl_aware = rtl_aware;
        self
    }

    /// Reject numeric settings the solver cannot interpret.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.offset.is_finite() || self.offset < 0.0 {
            return Err(PolicyError::Offset(self.offset));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(PolicyError::Margin(self.margin));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_placement_is_auto() {
        assert_eq!(Placement::parse("sideways"), Placement::Auto);
        assert_eq!(Placement::parse(" TOP "), Placement::Top);
        let p: Placement = serde_json::from_str("\"left\"").expect("placement");
        assert_eq!(p, Placement::Auto);
        let p: Placement = serde_json::from_str("\"bottom\"").expect("placement");
        assert_eq!(p, Placement::Bottom);
    }

    #[test]
    fn placement_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Placement::Top).expect("serialize"),
            "\"top\""
        );
        assert_eq!(Align::End.to_string(), "end");
    }

    #[test]
    fn rtl_swaps_start_and_end_only() {
        let rtl = LayoutDirection::Rtl;
        assert_eq!(Align::Start.resolve(rtl, true), Align::End);
        assert_eq!(Align::End.resolve(rtl, true), Align::Start);
        assert_eq!(Align::Center.resolve(rtl, true), Align::Center);
        assert_eq!(Align::Start.resolve(rtl, false), Align::Start);
        assert_eq!(Align::End.resolve(LayoutDirection::Ltr, true), Align::End);
    }

    #[test]
    fn defaults_match_documented_values() {
        let p = PlacementPolicy::default();
        assert_eq!(p.placement, Placement::Auto);
        assert_eq!(p.align, Align::Start);
        assert_eq!(p.offset, 8.0);
        assert_eq!(p.margin, 8.0);
        assert!(p.rtl_aware);
        let parsed: PlacementPolicy = serde_json::from_str("{}").expect("policy");
        assert_eq!(parsed, p);
    }

    #[test]
    fn validate_rejects_negative_and_nan() {
        assert!(PlacementPolicy::default().validate().is_ok());
        assert_eq!(
            PlacementPolicy::default().offset(-1.0).validate(),
            Err(PolicyError::Offset(-1.0))
        );
        assert!(matches!(
            PlacementPolicy::default().margin(f64::NAN).validate(),
            Err(PolicyError::Margin(_))
        ));
    }
}
