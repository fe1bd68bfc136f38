//! Custom Yew hooks for the frontend application.

mod use_local_storage;

pub use use_local_storage::use_local_storage;
