//! DGA Domain Model
//!
//! Value objects for dissolved-gas analysis of oil-filled power transformers:
//! gas readings, the fault taxonomy, per-method diagnostic results, and the
//! oil sample entity. All types are immutable once constructed.

mod error;
mod fault;
mod reading;
mod repository;
mod result;
mod sample;
mod util;

pub use error::DomainError;
pub use fault::FaultType;
pub use reading::GasReading;
pub use repository::SampleRepository;
pub use result::MethodResult;
pub use sample::Sample;
pub use util::round_to;
