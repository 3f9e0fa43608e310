//! Business logic services.

pub mod event_publisher;
pub mod following;
pub mod request;

pub use event_publisher::{
    EventPublisher, EventPublisherService, NoOpEventPublisher, RelationshipEvent,
};
pub use following::FollowingService;
pub use request::Request;
