//! Anchored menus: providers, routing, and the host positioning pipeline.
//!
//! The pieces fit together as follows:
//! - [`MenuProvider`] owns an [`AnchorRegistry`] and a [`MenuStore`]. Calling
//!   [`MenuProvider::open`] commits a [`MenuRequest`] to the store, routing it
//!   through the shared [`ProviderRegistry`] when the anchor lives under a
//!   different provider.
//! - [`MenuHost`] follows a store, measures the anchor and its own container
//!   with [`anchor_measure::Stabilizer`], and solves the menu position with
//!   [`anchor_geom::solve`].
//!
//! Geometry uncertainty is reported as `None` rather than as an error; the
//! [`Error`] type covers caller contract violations only.

mod error;
mod host;
mod provider;
mod registry;
mod request;
mod store;

pub use error::{Error, Result};
pub use host::{HostConfig, MOUNT_FRAMES, MenuHost, REMEASURE_DEBOUNCE};
pub use provider::{MenuProvider, ProviderConfig};
pub use registry::{
    AnchorEntry, AnchorRegistry, ProviderEntry, ProviderId, ProviderRegistration,
    ProviderRegistry,
};
pub use request::{HostKind, MenuRequest, OpenMenuOptions};
pub use store::{MenuState, MenuStore, Store, Subscription};
