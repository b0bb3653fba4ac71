pub mod competitor;
pub mod event;
pub mod event_match;
pub mod match_request;
pub mod profile;

pub use competitor::{Competitor, CompetitorType, SlotPosition};
pub use event::Event;
pub use event_match::{EventMatch, MatchContext, MatchFormat, MatchStatus};
pub use match_request::{
    MatchRequest, NewMatchRequest, RequestKind, RequestStatus, RequestTransition,
};
pub use profile::Profile;
