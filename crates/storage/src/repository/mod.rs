pub mod event;
pub mod event_match;
pub mod match_request;
pub mod profile;
