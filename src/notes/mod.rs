// Note stream data model: events, collections and difficulty levels

pub mod event;
pub mod collection;
pub mod difficulty;

pub use event::*;
pub use collection::*;
pub use difficulty::*;
