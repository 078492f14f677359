pub mod api_error;
pub mod fetch_error;
pub mod store_error;

pub use api_error::ApiError;
pub use fetch_error::FetchError;
pub use store_error::StoreError;
