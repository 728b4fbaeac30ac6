pub mod guard;
pub mod metrics;
pub mod request_id;
