pub mod assets;
pub mod bootstrap;
pub mod errors;
pub mod initializer;
pub mod models;

pub use assets::*;
pub use bootstrap::*;
pub use errors::*;
pub use initializer::*;
pub use models::*;
