#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod replay;
mod route;
pub mod speed;

pub use self::replay::{ReplayController, ReplayState};
pub use self::route::{Route, Sample};
