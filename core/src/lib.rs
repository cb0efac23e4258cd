//! # Formflow Core
//!
//! Core traits and types for the formflow request lifecycle.
//!
//! A submission is modelled as a small state machine driven by a reducer:
//!
//! - **State**: what the UI currently shows for one form
//! - **Action**: every input to the reducer (user submits, request outcomes)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of side effects, executed by the runtime
//! - **Environment**: injected dependencies (clock, presentation port, transport)
//!
//! ## Example
//!
//! ```ignore
//! use formflow_core::*;
//!
//! impl Reducer for FormReducer {
//!     type State = FormState;
//!     type Action = FormAction;
//!     type Environment = FormEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut FormState,
//!         action: FormAction,
//!         env: &FormEnvironment,
//!     ) -> SmallVec<[Effect<FormAction>; 4]> {
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

/// Declarative macros for building effects
pub mod effect_macros;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// All I/O is returned as [`Effect`](crate::effect::Effect) descriptions.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates state in place and returns effect descriptions for the
        /// runtime to execute. Must not perform I/O itself.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values returned from reducers. The runtime executes them and
/// feeds any produced action back into the reducer.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::None => write!(f, "Effect::None"),
                Self::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Whether this effect does nothing
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Self::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// Everything the lifecycle touches outside of its own state is reached
/// through one of these traits, so reducers stay testable without a UI
/// toolkit or a network.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock used in production
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// The event that triggered a submission (a form submit, a button click)
    pub trait TriggerEvent {
        /// Suppress the event's default action, e.g. a page reload on submit
        fn prevent_default(&mut self);
    }

    /// Presentation port - the UI surface a submission drives
    ///
    /// Implementations own the triggering control, the message area and the
    /// originating form. Calls arrive in lifecycle order:
    /// `set_pending`, then `set_succeeded` + `reset` or `set_failed`, then
    /// `release`. `release` is called exactly once per pending submission,
    /// including when the request future panics.
    pub trait PresentationPort: Send + Sync {
        /// Disable the control, show `busy_label` on it and clear any message
        fn set_pending(&self, busy_label: &str);

        /// Show a success message
        fn set_succeeded(&self, message: &str);

        /// Show an error message
        fn set_failed(&self, message: &str);

        /// Clear the originating form
        fn reset(&self);

        /// Re-enable the control and restore its original label
        fn release(&self);
    }
}
