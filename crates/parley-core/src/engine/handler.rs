//! Handler system for the reaction engine.
//!
//! Handlers are plain async functions. The [`Handler`] trait is implemented
//! via blanket implementations for functions whose parameters implement
//! [`FromContext`](crate::engine::extract::FromContext), similar to Axum's
//! handler system.
//!
//! # Example
//!
//! ```rust,ignore
//! // Simple handler with no parameters
//! async fn heartbeat() {}
//!
//! // Handler with an event extractor
//! async fn log_message(event: EventContext<DialogMessageEvent>) {
//!     println!("message: {}", event.text);
//! }
//!
//! // Handler with event and messenger
//! async fn greet(event: EventContext<DialogOpenEvent>, messenger: BoxedMessenger) {
//!     messenger.send_text(&event.dialog_token, "hello").await.ok();
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::engine::extract::FromContext;
use crate::foundation::context::EngineContext;

/// A type alias for a boxed, pinned future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core trait for reaction handlers.
///
/// Handlers process events; whether dispatch continues past the owning rule
/// is the rule's concern, not the handler's. The trait is automatically
/// implemented for async functions taking 0-8 parameters that implement
/// `FromContext` and returning `()`.
pub trait Handler<T>: Clone + Send + Sync + 'static {
    /// The future returned when calling this handler.
    type Future: Future<Output = ()> + Send + 'static;

    /// Calls the handler with the given context.
    fn call(self, ctx: Arc<EngineContext>) -> Self::Future;
}

/// A type-erased handler, ready to be stored in a rule.
///
/// Calling it clones the captured handler and runs one execution against
/// the given context.
pub type BoxedHandler = Arc<dyn Fn(Arc<EngineContext>) -> BoxFuture<'static, ()> + Send + Sync>;

/// Erases a handler's parameter types so rules can hold it.
pub fn into_handler<F, T>(f: F) -> BoxedHandler
where
    F: Handler<T>,
    T: 'static,
{
    Arc::new(move |ctx| {
        let f = f.clone();
        Box::pin(f.call(ctx))
    })
}

/// Generates `Handler` implementations for each parameter arity.
///
/// Each parameter is extracted in declaration order; the first extraction
/// failure skips the handler for this event.
macro_rules! impl_handler {
    (
        $($ty:ident),*
    ) => {
        #[allow(non_snake_case, unused_variables)]
        impl<F, Fut, $($ty,)*> Handler<($($ty,)*)> for F
        where
            F: FnOnce($($ty,)*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = ()> + Send + 'static,
            $( $ty: FromContext + Send + 'static, )*
        {
            type Future = BoxFuture<'static, ()>;

            fn call(self, ctx: Arc<EngineContext>) -> Self::Future {
                Box::pin(async move {
                    $(
                        let Ok($ty) = $ty::from_context(&ctx) else { return };
                    )*

                    (self)($($ty,)*).await;
                })
            }
        }
    };
}

impl_handler!();
impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::event::{
        BoxedEvent, DialogMessageEvent, DialogOpenEvent, DialogToken, EventContext,
        PersonDescriptor, PersonType,
    };
    use crate::foundation::messenger::BoxedMessenger;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn open_ctx() -> Arc<EngineContext> {
        Arc::new(EngineContext::new(BoxedEvent::new(DialogOpenEvent {
            dialog_token: DialogToken::new("d1"),
        })))
    }

    #[tokio::test]
    async fn zero_param_handler_runs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        let handler = into_handler(move || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        handler(open_ctx()).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn erased_handler_is_reusable() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        let handler = into_handler(move |_event: EventContext<DialogOpenEvent>| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        handler(open_ctx()).await;
        handler(open_ctx()).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn extraction_failure_skips_handler() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        // Wants a DialogMessageEvent, gets a DialogOpenEvent.
        let handler = into_handler(move |_event: EventContext<DialogMessageEvent>| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        handler(open_ctx()).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn multi_param_handler_extracts_in_order() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        let handler = into_handler(
            move |event: EventContext<DialogMessageEvent>, _messenger: Option<BoxedMessenger>| {
                let c = Arc::clone(&c);
                async move {
                    assert_eq!(event.text, "hi");
                    c.fetch_add(1, Ordering::SeqCst);
                }
            },
        );

        let ctx = Arc::new(EngineContext::new(BoxedEvent::new(DialogMessageEvent {
            dialog_token: DialogToken::new("d1"),
            sender: PersonDescriptor::of(PersonType::Visitor),
            text: "hi".into(),
        })));

        handler(ctx).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
