pub mod budget;
pub mod places;
pub mod reconciler;
pub mod store;
