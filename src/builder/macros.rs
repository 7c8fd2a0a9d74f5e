//! Macros for ergonomic tree declaration.

/// Declare one or more empty marker states.
///
/// Region heads and plain leaves often carry no behavior of their own; this
/// generates a unit struct with a default [`State`](crate::State)
/// implementation for any context and event type.
///
/// # Example
///
/// ```
/// canopy::bare_state! {
///     pub struct Root;
///     struct Idle;
/// }
/// ```
#[macro_export]
macro_rules! bare_state {
    (
        $(
            $(#[$meta:meta])*
            $vis:vis struct $name:ident;
        )+
    ) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
            $vis struct $name;

            impl<C, E> $crate::State<C, E> for $name {}
        )+
    };
}
