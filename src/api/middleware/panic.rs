//! Handler panics, reported like any other internal failure

use anyhow::anyhow;
use axum::response::{IntoResponse, Response};
use std::any::Any;
use std::cell::RefCell;
use std::panic;
use std::sync::Once;

use crate::errors::Failure;

thread_local! {
    static LAST_PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static LOCATION_HOOK: Once = Once::new();

/// Chain a panic hook that remembers where the current thread last panicked.
///
/// The previously installed hook still runs afterwards.
pub fn record_panic_locations() {
    LOCATION_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let location = info.location().map(ToString::to_string);
            LAST_PANIC_LOCATION.with(|slot| *slot.borrow_mut() = location);
            previous(info);
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Response for a caught panic, for `CatchPanicLayer::custom`.
///
/// The panic becomes [`Failure::Internal`] at the panic site, so the
/// translation middleware reports it with the request's trace id.
pub fn panic_to_failure(payload: Box<dyn Any + Send + 'static>) -> Response {
    let location = LAST_PANIC_LOCATION
        .with(|slot| slot.borrow_mut().take())
        .unwrap_or_else(|| "unknown".to_string());

    Failure::Internal {
        error: anyhow!("handler panicked: {}", panic_message(payload.as_ref())),
        location,
    }
    .into_response()
}
