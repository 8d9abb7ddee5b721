//! Top-level facade crate for runbeacon.
//!
//! Re-exports the core registry types and the exporter library so users can
//! depend on a single crate.

pub mod core {
    pub use runbeacon_core::*;
}

pub mod exporter {
    pub use runbeacon_exporter::*;
}
