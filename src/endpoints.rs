mod github;
pub mod utils;

pub use github::*;
