pub mod counters;

pub use counters::AtomicErrorCounters;
