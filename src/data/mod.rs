mod activity;
mod event;

pub use activity::*;
pub use event::*;
