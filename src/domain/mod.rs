pub mod cache;
pub mod country;
pub mod currency;
pub mod dashboard;
pub mod registration;
pub mod weather;
pub mod webhook;

pub use cache::*;
pub use country::*;
pub use currency::*;
pub use dashboard::*;
pub use registration::*;
pub use weather::*;
pub use webhook::*;
