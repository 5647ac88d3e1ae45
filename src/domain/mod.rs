//! Pure storefront model: no storage, no runtime.
pub mod aggregates;
pub mod events;
pub mod value_objects;
