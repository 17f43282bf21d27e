//! Course schedule builder.
//!
//! Takes a catalog of course sections and a [`rules::RuleSet`], enumerates the
//! course combinations the rules allow, finds one conflict-free section
//! assignment per combination, and draws each result as a weekly grid image.

pub mod color;
pub mod data;
pub mod error;
pub mod planner;
pub mod render;
pub mod rules;
pub mod schedule;

pub use data::model::{Catalog, Course, Section, Weekday};
pub use error::{ConfigError, RenderError};
pub use planner::Planner;
pub use rules::RuleSet;
pub use schedule::Schedule;
