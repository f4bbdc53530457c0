pub mod error;
pub mod handle;
pub mod settings;
pub mod tolerance;
pub mod traits;

pub use error::{NurbsError, Result};
pub use handle::ControlPointHandle;
pub use settings::EvalSettings;
pub use tolerance::Tolerance;
