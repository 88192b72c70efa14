pub use cities::City;
pub use commands::{CreateEventCmd, EventQuery, UpdateEventCmd, UpdateProfileCmd};
pub use error::EngineError;
pub use events::{Event, EventDetail, EventStatus, EventType};
pub use lifecycle::EventState;
pub use ops::{Engine, EngineBuilder};
pub use policy::{Action, Principal, Role};
pub use registrations::Registration;
pub use users::User;

mod cities;
mod commands;
mod error;
mod events;
pub mod lifecycle;
mod ops;
pub mod policy;
mod registrations;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
