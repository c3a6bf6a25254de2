pub mod analysis;
pub mod error;
pub mod score;
pub mod traits;
pub mod types;

pub use analysis::*;
pub use error::*;
pub use score::*;
pub use traits::*;
pub use types::*;
