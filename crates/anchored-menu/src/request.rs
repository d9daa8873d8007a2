//! Open requests.

use std::fmt;

use anchor_geom::{
    Align, DEFAULT_MARGIN, DEFAULT_OFFSET, Placement, PlacementPolicy, PolicyError,
};
use anchor_measure::{DEFAULT_TRIES, Strategy};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Which rendering layer hosts the open menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    /// Overlay rendered inside the provider's view tree.
    #[default]
    View,
    /// Overlay presented in a separate modal layer.
    Modal,
}

impl HostKind {
    /// Parse a host name. Returns `None` for anything unrecognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Some(Self::View),
            "modal" => Some(Self::Modal),
            _ => None,
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::View => "view",
            Self::Modal => "modal",
        })
    }
}

/// Options accepted by `open`.
///
/// Deserializes from camelCase JSON; every key but `id` is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenMenuOptions {
    /// Id of the registered anchor to open against.
    pub id: String,
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
    /// Requested host layer. Kept as a string so unknown values can be
    /// reported before falling back.
    pub host: Option<String>,
    /// Measurement strategy.
    pub measurement: Strategy,
    /// Stable-mode attempt budget.
    pub measurement_tries: u32,
    /// Commit right away instead of on the next frame.
    pub immediate: bool,
}

/// An accepted open request, as carried by the menu store.
pub type MenuRequest = OpenMenuOptions;

impl Default for OpenMenuOptions {
    fn default() -> Self {
        Self {
            id: String::new(),
            placement: Placement::Auto,
            align: Align::Start,
            offset: DEFAULT_OFFSET,
            margin: DEFAULT_MARGIN,
            rtl_aware: true,
            host: None,
            measurement: Strategy::Stable,
            measurement_tries: DEFAULT_TRIES,
            immediate: false,
        }
    }
}

impl OpenMenuOptions {
    /// Options for `id` with every other setting at its default.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Decode options from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// The solver policy described by these options.
    #[must_use]
    pub fn policy(&self) -> PlacementPolicy {
        PlacementPolicy {
            placement: self.placement,
            align: self.align,
            offset: self.offset,
            margin: self.margin,
            rtl_aware: self.rtl_aware,
        }
    }

    /// Check the numeric settings.
    pub fn validate(&self) -> Result<()> {
        self.policy().validate()?;
        if self.measurement == Strategy::Stable && self.measurement_tries == 0 {
            return Err(PolicyError::ZeroTries.into());
        }
        Ok(())
    }

    /// Set the host layer by name.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Commit on the calling turn rather than the next frame.
    #[must_use]
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Set the measurement strategy and attempt budget.
    #[must_use]
    pub fn measurement(mut self, strategy: Strategy, tries: u32) -> Self {
        self.measurement = strategy;
        self.measurement_tries = tries;
        self
    }
}
