//! Local persistence: key/value state, the daily search counter and
//! export/import bundles.

pub mod bundle;
pub mod counter;
pub mod state_store;

pub use bundle::{export_bundle, import_bundle, BundleKind};
pub use counter::SearchCounter;
pub use state_store::{keys, StateStore};
