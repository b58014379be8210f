mod download;
mod health;
mod upload;

pub use download::download;
pub use health::health;
pub use upload::upload;
