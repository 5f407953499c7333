//! Support for library configuration options

use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;

/// The timeout applied to every HTTP request.
/// Every network call this crate makes is bounded by it; there is no unbounded wait.
/// Feel free to override it when initing this library.
pub static REQUEST_TIMEOUT: Lazy<Arc<Mutex<Duration>>> =
    Lazy::new(|| Arc::new(Mutex::new(Duration::from_secs(10))));

/// The server a [`Client`](crate::client::Client) connects to when none is given explicitly.
/// Feel free to override it when initing this library.
pub static DEFAULT_BASE_URL: Lazy<Arc<Mutex<String>>> =
    Lazy::new(|| Arc::new(Mutex::new("https://canvas.beta.instructure.com/".to_string())));

/// The currently configured request timeout
pub fn request_timeout() -> Duration {
    *REQUEST_TIMEOUT.lock().unwrap()
}
