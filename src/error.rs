//! Provide methods and data structures for error handling.
//!
//! Two kinds of errors live here.
//! - [`XmlSchemaTypeError`] is returned by every fallible constructor and validator.
//! - [`XmlError`] is the diagnostic record that is forwarded to the generic or
//!   structured error handler registered in [`crate::globals`].

use std::{
    borrow::Cow,
    fmt::Display,
    io::{Write, stderr},
};

use crate::{
    globals::GLOBAL_STATE,
    xmlschemastypes::{XmlSchemaValType, facets::XmlSchemaFacetType},
};

macro_rules! impl_xml_schema_error_codes {
    ( $( $variant:ident $( = $default:literal )? ),* ) => {
        /// Numeric error codes, compatible with the schema related part of `xmlParserErrors`.
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum XmlSchemaErrorCode {
            $(
                $variant $( = $default )?
            ),*
        }

        impl TryFrom<i32> for XmlSchemaErrorCode {
            type Error = anyhow::Error;
            fn try_from(value: i32) -> Result<Self, Self::Error> {
                $(
                    if value == Self:: $variant as i32 {
                        return Ok(Self:: $variant);
                    }
                )*
                Err(anyhow::anyhow!("Invalid convert from value '{value}' to {}", std::any::type_name::<Self>()))
            }
        }

        impl Default for XmlSchemaErrorCode {
            fn default() -> Self {
                Self::XmlErrOK
            }
        }
    };
}
impl_xml_schema_error_codes!(
    XmlErrOK = 0,
    XmlSchemapInvalidFacet = 1716,
    XmlSchemapInvalidFacetValue,          /* 1717 */
    XmlSchemapUnknownFacetType = 1741,
    XmlSchemapSrcResolve = 1763,
    XmlSchemavCvcDatatypeValid1_2_1 = 1824,
    XmlSchemavCvcFacetValid = 1829,
    XmlSchemavCvcLengthValid,             /* 1830 */
    XmlSchemavCvcMinLengthValid,          /* 1831 */
    XmlSchemavCvcMaxLengthValid,          /* 1832 */
    XmlSchemavCvcMinInclusiveValid,       /* 1833 */
    XmlSchemavCvcMaxInclusiveValid,       /* 1834 */
    XmlSchemavCvcMinExclusiveValid,       /* 1835 */
    XmlSchemavCvcMaxExclusiveValid,       /* 1836 */
    XmlSchemavCvcTotalDigitsValid,        /* 1837 */
    XmlSchemavCvcFractionDigitsValid,     /* 1838 */
    XmlSchemavCvcPatternValid,            /* 1839 */
    XmlSchemavCvcEnumerationValid,        /* 1840 */
    XmlI18NConvFailed = 6003,
    XmlIOEIO = 1516
);

impl XmlSchemaErrorCode {
    pub fn is_ok(&self) -> bool {
        *self == Self::XmlErrOK
    }

    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }
}

/// Why a facet was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlSchemaFacetErrorKind {
    /// The facet does not apply to the base type.
    NotApplicable,
    /// The facet value is malformed, or not in the base type's lexical space.
    InvalidValue,
    /// The facet contradicts another facet of the same type.
    Conflict,
}

/// Error returned when a value is not in the lexical space of its type, or
/// violates a constraining facet.
///
/// Every variant carries the offending value so that callers can produce
/// diagnostics without keeping the input around.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlSchemaTypeError {
    /// The input does not match the grammar of `typ`.
    Lexical {
        typ: XmlSchemaValType,
        value: String,
    },
    /// The input is lexically valid but violates `facet`.
    FacetViolation {
        facet: XmlSchemaFacetType,
        value: String,
        constraint: String,
    },
    /// The facet itself cannot be built, is not applicable to its base type,
    /// or contradicts another facet.
    InvalidFacet {
        facet: XmlSchemaFacetType,
        kind: XmlSchemaFacetErrorKind,
        value: String,
        reason: Cow<'static, str>,
    },
}

impl XmlSchemaTypeError {
    pub(crate) fn lexical(typ: XmlSchemaValType, value: &str) -> Self {
        Self::Lexical {
            typ,
            value: value.to_owned(),
        }
    }

    pub(crate) fn invalid_facet(
        facet: XmlSchemaFacetType,
        value: &str,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::facet_error(facet, XmlSchemaFacetErrorKind::InvalidValue, value, reason)
    }

    pub(crate) fn facet_error(
        facet: XmlSchemaFacetType,
        kind: XmlSchemaFacetErrorKind,
        value: &str,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidFacet {
            facet,
            kind,
            value: value.to_owned(),
            reason: reason.into(),
        }
    }

    /// The offending value.
    pub fn value(&self) -> &str {
        match self {
            Self::Lexical { value, .. }
            | Self::FacetViolation { value, .. }
            | Self::InvalidFacet { value, .. } => value,
        }
    }

    /// Map this error to its numeric code.
    #[doc(alias = "xmlSchemaValidateFacet")]
    pub fn code(&self) -> XmlSchemaErrorCode {
        match self {
            Self::Lexical { .. } => XmlSchemaErrorCode::XmlSchemavCvcDatatypeValid1_2_1,
            Self::FacetViolation { facet, .. } => match facet {
                XmlSchemaFacetType::Length => XmlSchemaErrorCode::XmlSchemavCvcLengthValid,
                XmlSchemaFacetType::MinLength => XmlSchemaErrorCode::XmlSchemavCvcMinLengthValid,
                XmlSchemaFacetType::MaxLength => XmlSchemaErrorCode::XmlSchemavCvcMaxLengthValid,
                XmlSchemaFacetType::Pattern => XmlSchemaErrorCode::XmlSchemavCvcPatternValid,
                XmlSchemaFacetType::Enumeration => {
                    XmlSchemaErrorCode::XmlSchemavCvcEnumerationValid
                }
                XmlSchemaFacetType::MaxInclusive => {
                    XmlSchemaErrorCode::XmlSchemavCvcMaxInclusiveValid
                }
                XmlSchemaFacetType::MaxExclusive => {
                    XmlSchemaErrorCode::XmlSchemavCvcMaxExclusiveValid
                }
                XmlSchemaFacetType::MinInclusive => {
                    XmlSchemaErrorCode::XmlSchemavCvcMinInclusiveValid
                }
                XmlSchemaFacetType::MinExclusive => {
                    XmlSchemaErrorCode::XmlSchemavCvcMinExclusiveValid
                }
                XmlSchemaFacetType::TotalDigits => {
                    XmlSchemaErrorCode::XmlSchemavCvcTotalDigitsValid
                }
                XmlSchemaFacetType::FractionDigits => {
                    XmlSchemaErrorCode::XmlSchemavCvcFractionDigitsValid
                }
                XmlSchemaFacetType::WhiteSpace => XmlSchemaErrorCode::XmlSchemavCvcFacetValid,
            },
            Self::InvalidFacet { kind, .. } => match kind {
                XmlSchemaFacetErrorKind::NotApplicable => {
                    XmlSchemaErrorCode::XmlSchemapUnknownFacetType
                }
                XmlSchemaFacetErrorKind::InvalidValue => {
                    XmlSchemaErrorCode::XmlSchemapInvalidFacetValue
                }
                XmlSchemaFacetErrorKind::Conflict => XmlSchemaErrorCode::XmlSchemapInvalidFacet,
            },
        }
    }

    /// The domain this error is reported from.
    pub fn domain(&self) -> XmlErrorDomain {
        match self {
            Self::Lexical { .. } => XmlErrorDomain::XmlFromDatatype,
            Self::FacetViolation { .. } => XmlErrorDomain::XmlFromSchemasv,
            Self::InvalidFacet { .. } => XmlErrorDomain::XmlFromSchemasp,
        }
    }
}

impl Display for XmlSchemaTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexical { typ, value } => {
                write!(
                    f,
                    "'{value}' is not a valid value of the atomic type 'xs:{}'",
                    typ.name()
                )
            }
            Self::FacetViolation {
                facet,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "[facet '{}'] The value '{value}' {constraint}",
                    facet.name()
                )
            }
            Self::InvalidFacet {
                facet,
                value,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Facet '{}': the value '{value}' is invalid: {reason}",
                    facet.name()
                )
            }
        }
    }
}

impl std::error::Error for XmlSchemaTypeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XmlErrorLevel {
    #[default]
    XmlErrNone = 0,
    XmlErrError = 2,
    XmlErrFatal = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XmlErrorDomain {
    #[default]
    XmlFromNone = 0,
    XmlFromIO,
    XmlFromSchemasp,
    XmlFromSchemasv,
    XmlFromDatatype,
    XmlFromI18N,
}

impl XmlErrorDomain {
    fn prefix(&self) -> &'static str {
        match self {
            Self::XmlFromNone => "",
            Self::XmlFromIO => "I/O ",
            Self::XmlFromSchemasp => "Schemas parser ",
            Self::XmlFromSchemasv => "Schemas validity ",
            Self::XmlFromDatatype => "Datatype ",
            Self::XmlFromI18N => "encoding ",
        }
    }
}

/// A diagnostic forwarded to the error handlers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlError {
    pub domain: XmlErrorDomain,
    pub code: XmlSchemaErrorCode,
    pub level: XmlErrorLevel,
    pub message: Option<Cow<'static, str>>,
    // name of the simple type, if any
    pub str1: Option<Cow<'static, str>>,
    // the offending value
    pub str2: Option<Cow<'static, str>>,
}

impl XmlError {
    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }

    /// Reset all fields to the default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.level {
            XmlErrorLevel::XmlErrNone => "",
            XmlErrorLevel::XmlErrError => "error : ",
            XmlErrorLevel::XmlErrFatal => "fatal error : ",
        };
        write!(f, "{}{level}", self.domain.prefix())?;
        if let Some(name) = self.str1.as_deref() {
            write!(f, "Type '{name}': ")?;
        }
        writeln!(f, "{}", self.message.as_deref().unwrap_or(""))
    }
}

impl From<&XmlSchemaTypeError> for XmlError {
    fn from(err: &XmlSchemaTypeError) -> Self {
        Self {
            domain: err.domain(),
            code: err.code(),
            level: XmlErrorLevel::XmlErrError,
            message: Some(Cow::Owned(err.to_string())),
            str1: None,
            str2: Some(Cow::Owned(err.value().to_owned())),
        }
    }
}

pub fn generic_error_default(out: Option<&mut dyn Write>, msg: &str) {
    if let Some(out) = out {
        write!(out, "{msg}").ok();
    } else {
        write!(stderr(), "{msg}").ok();
    }
}

/// Update the last error, then forward it to the structured error handler if
/// one is registered, or to the generic error handler otherwise.
#[doc(alias = "__xmlRaiseError")]
pub fn report_error(error: XmlError) {
    let (structured, generic) = GLOBAL_STATE.with_borrow_mut(|state| {
        state.last_error = error.clone();
        (state.structured_error, state.generic_error)
    });
    if let Some(handler) = structured {
        handler(&error);
        return;
    }
    let msg = error.to_string();
    // The handler may call back into the global state, so the context is
    // taken out while it runs.
    let mut context = GLOBAL_STATE.with_borrow_mut(|state| state.generic_error_context.take());
    match context.as_deref_mut() {
        Some(out) => {
            let out: &mut dyn Write = out;
            generic(Some(out), &msg);
        }
        None => generic(None, &msg),
    }
    if context.is_some() {
        GLOBAL_STATE.with_borrow_mut(|state| {
            if state.generic_error_context.is_none() {
                state.generic_error_context = context;
            }
        });
    }
}
