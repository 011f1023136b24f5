//! HTTP surface for the tariff widget
//!
//! Serves the single-page widget at `/` and a JSON API under `/api` that
//! drives one [`TariffSession`](crate::session::TariffSession) per browser.

mod error;
mod routes;
mod session;

pub use error::{ApiError, ErrorResponse};
pub use routes::{build_router, ApiResponse, CountryView, SelectRequest, SessionView, TierView};
pub use session::{create_session_store, evict_sessions, AppState, SessionFactory, SessionStore};
