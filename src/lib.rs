#![allow(clippy::needless_range_loop)]
#![warn(unused_assignments)]
#![warn(unused_mut)]
#![warn(unused_imports)]
#![warn(unused_parens)]
#![warn(unused_variables)]

//! XML Schema primitive datatypes.
//!
//! Every primitive wrapper in [`xmlschemastypes::primitives`] has a total
//! `new` constructor and a fallible `parse` constructor that checks the
//! lexical space. Values can be compared in their value space with
//! [`compare_values`], restricted by facets through
//! [`xmlschemas::XmlSchemaSimpleType`], and validated with diagnostics through
//! [`xmlschemas::XmlSchemaValidCtxt`].

pub mod error;
pub mod globals;
pub mod xmlschemas;
pub mod xmlschemastypes;

pub use error::{XmlError, XmlSchemaErrorCode, XmlSchemaFacetErrorKind, XmlSchemaTypeError};
pub use xmlschemastypes::{
    XmlSchemaVal, XmlSchemaValOrdering, XmlSchemaValType, XmlSchemaWhitespaceValueType,
    primitives::{
        XmlSchemaBoolean, XmlSchemaDateTime, XmlSchemaDecimal, XmlSchemaDouble, XmlSchemaDuration,
        XmlSchemaFloat, XmlSchemaString,
    },
    xml_schema_compare_values as compare_values,
};
