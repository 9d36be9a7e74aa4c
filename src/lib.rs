//! Process wiring shared by the `hp-rag` and `hp-rag-diagnose` binaries.

pub mod bootstrap;
