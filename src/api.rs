pub mod client;
pub mod plants;
pub mod source;

pub use self::{plants::Api as Plants, source::PlantDataSource};
