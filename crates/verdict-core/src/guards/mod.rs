//! Evidence guards: independent validators over a synthesized answer.
//!
//! Each guard inspects the answer and its evidence and returns a
//! [`GuardOutcome`]; none depends on another's result and none propagates an
//! internal error (fail-closed: an error becomes a failed outcome carrying
//! the error text). Citation, numeric, temporal, and staleness are fatal;
//! disambiguation and language are advisory.

pub mod citation;
pub mod disambiguation;
pub mod language;
pub mod numeric;
pub mod outcome;
pub mod runner;
pub mod staleness;
pub mod temporal;


pub use citation::require_citation;
pub use disambiguation::{DEFAULT_MIN_CONFIDENCE, disambiguation_guard, disambiguation_options};
pub use language::language_guard;
pub use numeric::numeric_consistency;
pub use outcome::{GuardName, GuardOutcome};
pub use runner::GuardSet;
pub use staleness::staleness_guard;
pub use temporal::temporal_guard;
