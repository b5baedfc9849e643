//! The analysis session that ties the KINAI workflow together.
//!
//! An [`AnalysisSession`] owns everything about one upload: the selected
//! analysis mode and its registry, the parsed table, the column mappings,
//! the confirmed rows and the last prediction outcome.
//!
//! ```
//! use kinai_core::{AnalysisSession, SessionPhase};
//! use kinai_model::AnalysisMode;
//!
//! let mut session = AnalysisSession::new(AnalysisMode::Simple);
//! session.load_text("TIME,FLUX\n1,0.99\n").unwrap();
//! session.update_mapping("time", "TIME").unwrap();
//! assert_eq!(session.phase(), SessionPhase::MappingIncomplete);
//! ```

mod error;
mod session;

pub use error::{Result, SessionError};
pub use session::{AnalysisSession, LoadTicket, PredictionState, SessionPhase};
