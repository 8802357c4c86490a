pub mod conversions;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

pub use builder::{build_connector, PhemexBuilder};
pub use connector::{Account, Connection, PhemexConnector, Trading};
pub use signer::PhemexSigner;
