pub mod timeout;
pub mod tracing;

pub use self::timeout::handle_timeout_error;
pub use self::tracing::{REQUEST_ID_HEADER, request_id_middleware};
