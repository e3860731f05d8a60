pub mod client;
pub mod connect;
pub mod entities;
pub mod events;
pub mod store;
