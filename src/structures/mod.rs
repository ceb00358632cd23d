pub mod error;
pub use error::Error;

pub mod registry;
pub use registry::Registry;
pub use registry::ResourceEntry;

pub mod options;
pub use options::FetchOptions;

pub mod attempt;
pub(crate) use attempt::AttemptFailure;
pub(crate) use attempt::AttemptOutcome;
