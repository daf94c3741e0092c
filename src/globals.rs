//! Provide per-thread global state: error handlers and the last reported error.

use std::{cell::RefCell, io::Write};

use const_format::concatcp;

use crate::error::{XmlError, generic_error_default};

pub type GenericError = fn(Option<&mut dyn Write>, &str);
pub type StructuredError = fn(&XmlError);

/// Version of this library, as `MMmmpp`.
pub const XSDTYPES_VERSION: &str = concatcp!(
    "{:0>2}{:0>2}{:0>2}",
    env!("CARGO_PKG_VERSION_MAJOR"),
    env!("CARGO_PKG_VERSION_MINOR"),
    env!("CARGO_PKG_VERSION_PATCH")
);

pub struct XmlGlobalState {
    pub(crate) generic_error: GenericError,
    pub(crate) generic_error_context: Option<Box<dyn Write>>,
    pub(crate) structured_error: Option<StructuredError>,
    pub(crate) last_error: XmlError,
}

impl XmlGlobalState {
    fn new() -> Self {
        Self {
            generic_error: generic_error_default,
            generic_error_context: None,
            structured_error: None,
            last_error: XmlError::default(),
        }
    }
}

thread_local! {
    pub static GLOBAL_STATE: RefCell<XmlGlobalState> = RefCell::new(XmlGlobalState::new());
}

/// Set new generic error function and generic error context.
///
/// If `func` is `None`, set `generic_error_default`.
/// If `context` is `None`, current context is clear and no context is set.
pub fn set_generic_error(func: Option<GenericError>, context: Option<impl Write + 'static>) {
    GLOBAL_STATE.with_borrow_mut(|state| {
        state.generic_error = func.unwrap_or(generic_error_default);
        state.generic_error_context = context.map(|context| {
            let boxed: Box<dyn Write + 'static> = Box::new(context);
            boxed
        });
    });
}

/// Set the structured error handler.
///
/// While a structured handler is set, the generic handler is not called.
#[doc(alias = "xmlSetStructuredErrorFunc")]
pub fn set_structured_error(func: Option<StructuredError>) {
    GLOBAL_STATE.with_borrow_mut(|state| state.structured_error = func);
}

/// Get a copy of the last reported error on this thread.
#[doc(alias = "xmlGetLastError")]
pub fn get_last_error() -> XmlError {
    GLOBAL_STATE.with_borrow(|state| state.last_error.clone())
}

/// Clear the last reported error on this thread.
#[doc(alias = "xmlResetLastError")]
pub fn reset_last_error() {
    GLOBAL_STATE.with_borrow_mut(|state| state.last_error.reset());
}
