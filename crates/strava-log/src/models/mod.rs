pub mod activity;

pub use activity::{Activity, ActivityKind, METERS_PER_MILE};
