//! Normative DGA Diagnostic Engine
//!
//! Six independent rule-based fault classifiers (IEEE C57.104-2019,
//! IEC 60599:2022, Rogers, Dornenburg, Duval Triangle 1, Duval Pentagon 1)
//! plus a majority-vote consensus over their results. Every method is a pure
//! function from a [`dga_domain::GasReading`] to a [`dga_domain::MethodResult`].

mod consensus;
mod dornenburg;
mod duval_pentagon;
mod duval_triangle;
mod iec_60599;
mod ieee_c57_104;
pub mod ratios;
mod rogers;

pub use consensus::{NormativeDiagnosisResult, NormativeDiagnosisService};
pub use dornenburg::DORNENBURG;
pub use duval_pentagon::DUVAL_PENTAGON;
pub use duval_triangle::DUVAL_TRIANGLE;
pub use iec_60599::IEC_60599;
pub use ieee_c57_104::IEEE_C57_104;
pub use rogers::ROGERS;
