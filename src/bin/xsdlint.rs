//! Validate values against an XML Schema primitive type restricted by facets.
//!
//! This tool follows the conventions of xmllint: diagnostics go through the
//! error handlers, and the exit code tells what kind of failure happened.

use std::{
    borrow::Cow,
    fs::read,
    io::{Read, Write, stdin, stdout},
    process::exit,
    sync::LazyLock,
};

use clap::Parser;
use encoding_rs::{Encoding, UTF_8};
use xsdtypes::{
    error::{XmlError, XmlErrorDomain, XmlErrorLevel, XmlSchemaErrorCode, report_error},
    xmlschemas::{XmlSchemaSimpleType, XmlSchemaValidCtxt},
    xmlschemastypes::{XmlSchemaValType, facets::XmlSchemaFacet, facets::XmlSchemaFacetType},
};

// Error codes.
// These are similar to `xmllintReturnCode` in original xmllint.
const RETURN_OK: i32 = 0; // No error
const ERR_UNCLASS: i32 = 1; // Unclassified
const ERR_VALID: i32 = 3; // Validation error

#[derive(clap::Parser, Debug)]
#[command(
    version,
    name = "xsdlint",
    about = "Validate values against an XML Schema primitive type and facets.\nThis tool is based on xmllint."
)]
struct CmdArgs {
    /// the values to validate
    values: Vec<String>,
    /// the primitive base type, e.g. decimal or xs:dateTime
    #[arg(long = "type", value_name = "name")]
    typ: String,
    /// the exact number of characters
    #[arg(long, value_name = "n")]
    length: Option<usize>,
    /// the minimum number of characters
    #[arg(long, value_name = "n")]
    min_length: Option<usize>,
    /// the maximum number of characters
    #[arg(long, value_name = "n")]
    max_length: Option<usize>,
    /// a regular expression the value must match (repeatable, alternatives)
    #[arg(long, value_name = "re")]
    pattern: Vec<String>,
    /// an allowed value (repeatable)
    #[arg(long, value_name = "v")]
    enumeration: Vec<String>,
    /// preserve, replace or collapse
    #[arg(long, value_name = "mode")]
    whitespace: Option<String>,
    #[arg(long, value_name = "v")]
    min_inclusive: Option<String>,
    #[arg(long, value_name = "v")]
    max_inclusive: Option<String>,
    #[arg(long, value_name = "v")]
    min_exclusive: Option<String>,
    #[arg(long, value_name = "v")]
    max_exclusive: Option<String>,
    #[arg(long, value_name = "n")]
    total_digits: Option<usize>,
    #[arg(long, value_name = "n")]
    fraction_digits: Option<usize>,
    /// print the canonical representation of valid values
    #[arg(long)]
    canonical: bool,
    /// read one value per line from a file ("-" for stdin)
    #[arg(short, long, value_name = "file")]
    input: Option<String>,
    /// the encoding of the input file
    #[arg(long, value_name = "label")]
    encoding: Option<String>,
    /// only report failures
    #[arg(long)]
    quiet: bool,
}

static CMD_ARGS: LazyLock<CmdArgs> = LazyLock::new(CmdArgs::parse);

fn report_unclassified(domain: XmlErrorDomain, code: XmlSchemaErrorCode, message: String) {
    report_error(XmlError {
        domain,
        code,
        level: XmlErrorLevel::XmlErrFatal,
        message: Some(Cow::Owned(message)),
        ..Default::default()
    });
}

/// Collect the facets given on the command line, in the order they are
/// checked.
fn facets(cmd_args: &CmdArgs) -> Vec<(XmlSchemaFacetType, String)> {
    let counts = [
        (XmlSchemaFacetType::Length, cmd_args.length),
        (XmlSchemaFacetType::MinLength, cmd_args.min_length),
        (XmlSchemaFacetType::MaxLength, cmd_args.max_length),
    ];
    let bounds = [
        (XmlSchemaFacetType::MinInclusive, &cmd_args.min_inclusive),
        (XmlSchemaFacetType::MaxInclusive, &cmd_args.max_inclusive),
        (XmlSchemaFacetType::MinExclusive, &cmd_args.min_exclusive),
        (XmlSchemaFacetType::MaxExclusive, &cmd_args.max_exclusive),
    ];
    let digits = [
        (XmlSchemaFacetType::TotalDigits, cmd_args.total_digits),
        (XmlSchemaFacetType::FractionDigits, cmd_args.fraction_digits),
    ];

    let mut facets = vec![];
    if let Some(ws) = cmd_args.whitespace.as_ref() {
        facets.push((XmlSchemaFacetType::WhiteSpace, ws.clone()));
    }
    for (typ, count) in counts {
        facets.extend(count.map(|count| (typ, count.to_string())));
    }
    for pattern in &cmd_args.pattern {
        facets.push((XmlSchemaFacetType::Pattern, pattern.clone()));
    }
    for value in &cmd_args.enumeration {
        facets.push((XmlSchemaFacetType::Enumeration, value.clone()));
    }
    for (typ, bound) in bounds {
        facets.extend(bound.as_ref().map(|bound| (typ, bound.clone())));
    }
    for (typ, count) in digits {
        facets.extend(count.map(|count| (typ, count.to_string())));
    }
    facets
}

fn build_type(cmd_args: &CmdArgs) -> Option<XmlSchemaSimpleType> {
    let base = match XmlSchemaValType::try_from(cmd_args.typ.as_str()) {
        Ok(base) => base,
        Err(err) => {
            report_unclassified(
                XmlErrorDomain::XmlFromSchemasp,
                XmlSchemaErrorCode::XmlSchemapSrcResolve,
                err.to_string(),
            );
            return None;
        }
    };

    let mut typ = XmlSchemaSimpleType::new(base);
    for (facet, value) in facets(cmd_args) {
        let res = XmlSchemaFacet::new(facet, &value).and_then(|facet| {
            typ.add_facet(facet)?;
            Ok(())
        });
        if let Err(err) = res {
            let mut error = XmlError::from(&err);
            error.str1 = Some(Cow::Owned(typ.display_name().into_owned()));
            report_error(error);
            return None;
        }
    }
    Some(typ)
}

/// Read the input file and decode it.
///
/// A byte order mark overrides `label`. Without either, the input is UTF-8.
fn read_input(path: &str, label: Option<&str>) -> Option<String> {
    let bytes = if path == "-" {
        let mut buf = vec![];
        stdin().read_to_end(&mut buf).map(|_| buf)
    } else {
        read(path)
    };
    let bytes = match bytes {
        Ok(bytes) => bytes,
        Err(err) => {
            report_unclassified(
                XmlErrorDomain::XmlFromIO,
                XmlSchemaErrorCode::XmlIOEIO,
                format!("failed to load \"{path}\": {err}"),
            );
            return None;
        }
    };

    let encoding = match label {
        Some(label) => match Encoding::for_label(label.as_bytes()) {
            Some(encoding) => encoding,
            None => {
                report_unclassified(
                    XmlErrorDomain::XmlFromI18N,
                    XmlSchemaErrorCode::XmlI18NConvFailed,
                    format!("unsupported encoding '{label}'"),
                );
                return None;
            }
        },
        None => UTF_8,
    };
    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        report_unclassified(
            XmlErrorDomain::XmlFromI18N,
            XmlSchemaErrorCode::XmlI18NConvFailed,
            format!("input conversion failed due to input error, encoding '{}'", used.name()),
        );
        return None;
    }
    Some(text.into_owned())
}

fn main() {
    let cmd_args = &*CMD_ARGS;
    let Some(typ) = build_type(cmd_args) else {
        exit(ERR_UNCLASS);
    };

    let mut values = cmd_args.values.clone();
    if let Some(path) = cmd_args.input.as_deref() {
        let Some(text) = read_input(path, cmd_args.encoding.as_deref()) else {
            exit(ERR_UNCLASS);
        };
        values.extend(text.lines().map(str::to_owned));
    }

    let mut ctxt = XmlSchemaValidCtxt::new();
    let mut out = stdout().lock();
    for value in &values {
        match ctxt.validate_value(&typ, value) {
            Ok(val) if cmd_args.canonical => {
                let canon = val.canonical().unwrap_or_else(|| val.to_string());
                writeln!(out, "{canon}").ok();
            }
            Ok(_) if !cmd_args.quiet => {
                writeln!(out, "{value}: valid").ok();
            }
            Ok(_) | Err(_) => {}
        }
    }
    out.flush().ok();

    if ctxt.err_count() > 0 {
        exit(ERR_VALID);
    }
    exit(RETURN_OK);
}
