pub mod fixture;
pub mod icanhaz;

pub use fixture::FixtureSource;
pub use icanhaz::IcanhazSource;
