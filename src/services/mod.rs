pub mod cache;
pub mod country_service;
pub mod currency_service;
pub mod dashboard_service;
pub mod purge;
pub mod scheduler;
pub mod weather_service;
pub mod webhook_service;

pub use cache::{Cache, Fetched};
pub use country_service::CountryService;
pub use currency_service::CurrencyService;
pub use dashboard_service::DashboardService;
pub use purge::{purge_expired, PurgeReport};
pub use scheduler::start_background_tasks;
pub use weather_service::WeatherService;
pub use webhook_service::{NotificationSink, WebhookDispatcher};
