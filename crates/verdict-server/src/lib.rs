//! Verdict HTTP gateway library (used by the server binary and its tests).

pub mod gateway;
