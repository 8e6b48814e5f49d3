//! Shared API Types for the Council
//!
//! This crate is the SINGLE SOURCE OF TRUTH for every type crossing the
//! collaborator boundary (the LLM-backed analysis endpoint).
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────┐
//! │  council-ui      │  JSON   │  Analysis        │
//! │  (headless)      │ ◄─────► │  collaborator    │
//! └──────────────────┘         └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. All wire types live here, camelCase on the wire
//! 2. Requests are validated locally before they are sent
//! 3. Responses are shape-checked before they are accepted, never patched

pub mod analysis;
pub mod debate;
pub mod request;
pub mod style;
pub mod validation;

pub use analysis::{
    AnalysisResult, CounselorInsight, Criterion, DecisionMatrix, DialogueTurn, Tension,
    TensionKind, USER_SPEAKER,
};
pub use debate::{
    AdvisorDescriptor, DebateInjectionRequest, DebateInjectionResponse, MatrixUpdate,
    TensionContext,
};
pub use request::AnalysisRequest;
pub use style::{CognitiveStyle, ReflectionFocus, COGNITIVE_STYLES};
pub use validation::{ShapeError, ValidationError};

/// Stable role id of a counselor ("mirror", "alterego", ...).
pub type CounselorId = String;
