//! Shared type definitions for the Quire post service.
//!
//! Records returned by the data layer and payloads accepted by it live
//! here so the API and the data layer agree on one shape. Types flow to
//! `TypeScript` via `ts-rs` for API clients.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for post and analytics identifiers
//! - [`enums`] -- Analytics event kinds
//! - [`structs`] -- Post and analytics records plus create/update payloads

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::AnalyticsEventType;
pub use ids::{AnalyticsId, PostId};
pub use structs::{AnalyticsEvent, CreateAnalyticsEvent, CreatePost, Post, UpdatePost};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Exporting writes the `.ts` files to `bindings/` relative to the
        // crate root.
        use ts_rs::TS;

        let _ = crate::ids::PostId::export_all();
        let _ = crate::ids::AnalyticsId::export_all();
        let _ = crate::enums::AnalyticsEventType::export_all();
        let _ = crate::structs::Post::export_all();
        let _ = crate::structs::CreatePost::export_all();
        let _ = crate::structs::UpdatePost::export_all();
        let _ = crate::structs::AnalyticsEvent::export_all();
        let _ = crate::structs::CreateAnalyticsEvent::export_all();
    }
}
