use std::borrow::Cow;

use crate::{
    error::{XmlError, XmlSchemaTypeError, report_error},
    xmlschemastypes::XmlSchemaVal,
};

use super::items::XmlSchemaSimpleType;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlSchemaValidOption {
    XmlSchemaValStopOnFirstError = 1 << 0, /* refuse further values after a failure */
    XmlSchemaValQuiet = 1 << 1,            /* count failures without reporting them */
}

const XML_SCHEMA_VALID_OPTIONS_MASK: i32 = XmlSchemaValidOption::XmlSchemaValStopOnFirstError
    as i32
    | XmlSchemaValidOption::XmlSchemaValQuiet as i32;

/// Validates lexical values against simple types and keeps track of the
/// failures.
#[doc(alias = "xmlSchemaValidCtxt")]
#[derive(Debug, Default)]
pub struct XmlSchemaValidCtxt {
    options: i32,
    err_count: usize,
    last_error: Option<XmlSchemaTypeError>,
}

impl XmlSchemaValidCtxt {
    #[doc(alias = "xmlSchemaNewValidCtxt")]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the options to be used during validation.
    ///
    /// Returns 0 in case of success, -1 if `options` holds unknown bits.
    #[doc(alias = "xmlSchemaSetValidOptions")]
    pub fn set_options(&mut self, options: i32) -> i32 {
        if options & !XML_SCHEMA_VALID_OPTIONS_MASK != 0 {
            return -1;
        }
        self.options = options;
        0
    }

    #[doc(alias = "xmlSchemaValidCtxtGetOptions")]
    pub fn options(&self) -> i32 {
        self.options
    }

    fn has_option(&self, option: XmlSchemaValidOption) -> bool {
        self.options & option as i32 != 0
    }

    /// Validate `value` against `typ`.
    ///
    /// Failures are counted and reported through the error handlers. With
    /// [`XmlSchemaValidOption::XmlSchemaValStopOnFirstError`], a context that
    /// already failed returns the stored error without looking at `value`.
    #[doc(alias = "xmlSchemaValidateSimpleTypeValue")]
    pub fn validate_value(
        &mut self,
        typ: &XmlSchemaSimpleType,
        value: &str,
    ) -> Result<XmlSchemaVal, XmlSchemaTypeError> {
        if self.has_option(XmlSchemaValidOption::XmlSchemaValStopOnFirstError) {
            if let Some(err) = self.last_error.as_ref() {
                return Err(err.clone());
            }
        }

        typ.validate(value).inspect_err(|err| {
            self.err_count += 1;
            self.last_error = Some(err.clone());
            if !self.has_option(XmlSchemaValidOption::XmlSchemaValQuiet) {
                let mut error = XmlError::from(err);
                error.str1 = Some(Cow::Owned(typ.display_name().into_owned()));
                report_error(error);
            }
        })
    }

    /// Validate each of `values`, returning how many were rejected.
    pub fn validate_values<'a>(
        &mut self,
        typ: &XmlSchemaSimpleType,
        values: impl IntoIterator<Item = &'a str>,
    ) -> usize {
        let before = self.err_count;
        for value in values {
            if self.validate_value(typ, value).is_err()
                && self.has_option(XmlSchemaValidOption::XmlSchemaValStopOnFirstError)
            {
                break;
            }
        }
        self.err_count - before
    }

    pub fn err_count(&self) -> usize {
        self.err_count
    }

    pub fn last_error(&self) -> Option<&XmlSchemaTypeError> {
        self.last_error.as_ref()
    }

    /// Forget the failures seen so far. The options are kept.
    pub fn reset(&mut self) {
        self.err_count = 0;
        self.last_error = None;
    }
}
