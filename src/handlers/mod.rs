pub mod dashboard_handler;
pub mod health;
pub mod notification_handler;
pub mod registration_handler;
pub mod status_handler;

pub use dashboard_handler::*;
pub use health::*;
pub use notification_handler::*;
pub use registration_handler::*;
pub use status_handler::*;
