/// The checker itself: kind inference and the diagnostics it produces.
pub mod core;

/// Diagnostic severity, stable codes, and the diagnostic record.
pub mod diagnostic;
