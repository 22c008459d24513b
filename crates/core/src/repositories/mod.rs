//! Repository management modules.
//!
//! Services that orchestrate validation, persistence and derived-field computation
//! for each kind of stored record.

pub mod patients;
