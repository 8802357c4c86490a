pub mod conversions;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

pub use builder::{build_connector, KucoinBuilder};
pub use connector::{Account, Connection, KucoinConnector, Trading};
pub use signer::KucoinSigner;
