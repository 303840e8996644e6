pub mod status;
pub mod sync;
pub mod week;

pub use status::status;
pub use sync::run as sync_run;
pub use week::show as show_week;
