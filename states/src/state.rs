use std::any::Any;

/// A state value driven by a closed set of events.
///
/// `reduce` must be pure: no IO, no clocks, no randomness. Everything that
/// varies between runs is carried in the event payload, which keeps every
/// transition testable with literal values.
pub trait State: Any + Default + Send {
    /// The tagged event type that drives this state.
    type Event: Send + 'static;

    /// Human readable name used in log lines.
    const TYPE: &'static str = "state";

    /// Produce the next state from the current one and an event.
    fn reduce(self, event: Self::Event) -> Self;
}
