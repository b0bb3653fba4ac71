pub mod events;
pub mod matches;
pub mod profiles;
pub mod requests;
pub mod videos;
