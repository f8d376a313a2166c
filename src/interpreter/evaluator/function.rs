/// Averages and sums.
pub mod aggregate;
/// Rounding helpers shared by several builtins.
pub mod builtin;
/// Capacity-planning helpers: `accumulate`, `downtime`, `rtt`,
/// `throughput` and `transfer_time`. Durations they compute are shown in the
/// largest unit that keeps the amount at or above one.
pub mod capacity;
/// The builtin table, arity checks and keyword arguments.
pub mod core;
/// `min` and `max` function implementations.
///
/// Returns the minimum or maximum value from a list of arguments.
pub mod min_max;
/// The `sqrt` (square root) function implementation.
pub mod sqrt;
