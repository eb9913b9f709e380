pub mod generation;
pub mod itinerary;
pub mod plan_request;
