//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// The block must evaluate to `Option<Action>`; a `Some` value is fed back
/// into the reducer by the runtime.
///
/// # Example
///
/// ```rust,ignore
/// use formflow_core::async_effect;
///
/// async_effect! {
///     let result = transport.post_json(&request).await;
///     Some(FormAction::Settled { id, result: result.into() })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
