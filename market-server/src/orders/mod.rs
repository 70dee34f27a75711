//! Order domain
//!
//! Placement (cart to priced order) and the status state machine that
//! moves an order through its delivery leg.

pub mod placement;
pub mod status;
pub mod transition;

pub use placement::OrderPlacement;
pub use status::{driver_can, driver_transitions};
pub use transition::OrderTransitions;
