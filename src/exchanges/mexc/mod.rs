pub mod conversions;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

pub use builder::{build_connector, MexcBuilder};
pub use connector::{Account, Connection, MexcConnector, Trading};
pub use signer::MexcSigner;
