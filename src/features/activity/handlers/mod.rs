pub mod activity_handler;

pub use activity_handler::list_activity;
