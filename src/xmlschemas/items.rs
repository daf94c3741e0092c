use std::{borrow::Cow, rc::Rc};

use crate::{
    error::{XmlSchemaFacetErrorKind, XmlSchemaTypeError},
    xmlschemastypes::{
        XmlSchemaVal, XmlSchemaValOrdering, XmlSchemaValType, XmlSchemaWhitespaceValueType,
        facets::{
            XmlSchemaFacet, XmlSchemaFacetType, xml_schema_enumeration_error,
            xml_schema_pattern_error,
        },
        xml_schema_compare_values, xml_schema_normalize,
    },
};

/// An atomic simple type: a primitive base restricted by constraining facets.
#[doc(alias = "xmlSchemaType")]
#[derive(Debug, Clone)]
pub struct XmlSchemaSimpleType {
    name: Option<Rc<str>>,
    base: XmlSchemaValType,
    facets: Vec<XmlSchemaFacet>,
    whitespace: XmlSchemaWhitespaceValueType,
}

impl XmlSchemaSimpleType {
    /// An anonymous type without facets, equivalent to `base`.
    pub fn new(base: XmlSchemaValType) -> Self {
        Self {
            name: None,
            base,
            facets: vec![],
            whitespace: base.whitespace(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The name used in diagnostics: the type name, or the qualified name of
    /// the base type for anonymous types.
    pub fn display_name(&self) -> Cow<'_, str> {
        match self.name.as_deref() {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("xs:{}", self.base.name())),
        }
    }

    pub fn base(&self) -> XmlSchemaValType {
        self.base
    }

    pub fn facets(&self) -> &[XmlSchemaFacet] {
        &self.facets
    }

    /// The effective value of the whiteSpace facet.
    pub fn whitespace(&self) -> XmlSchemaWhitespaceValueType {
        self.whitespace
    }

    fn find_facet(&self, typ: XmlSchemaFacetType) -> Option<&XmlSchemaFacet> {
        self.facets.iter().find(|facet| facet.typ() == typ)
    }

    /// Check `facet` against the base type and the facets already present,
    /// then add it.
    #[doc(alias = "xmlSchemaCheckFacetValues")]
    pub fn add_facet(
        &mut self,
        mut facet: XmlSchemaFacet,
    ) -> Result<&mut Self, XmlSchemaTypeError> {
        use XmlSchemaFacetType::*;

        facet.check(self.base)?;
        let typ = facet.typ();
        let conflict = |reason: String| {
            XmlSchemaTypeError::facet_error(
                typ,
                XmlSchemaFacetErrorKind::Conflict,
                facet.value(),
                reason,
            )
        };

        if !matches!(typ, Pattern | Enumeration) && self.find_facet(typ).is_some() {
            return Err(conflict("the facet is specified more than once".to_owned()));
        }
        match typ {
            Length if self.find_facet(MinLength).or(self.find_facet(MaxLength)).is_some() => {
                return Err(conflict("length cannot be used with minLength or maxLength".to_owned()));
            }
            MinLength | MaxLength if self.find_facet(Length).is_some() => {
                return Err(conflict("length cannot be used with minLength or maxLength".to_owned()));
            }
            MinInclusive | MinExclusive | MaxInclusive | MaxExclusive => {
                let twin = match typ {
                    MinInclusive => MinExclusive,
                    MinExclusive => MinInclusive,
                    MaxInclusive => MaxExclusive,
                    _ => MaxInclusive,
                };
                if self.find_facet(twin).is_some() {
                    return Err(conflict(format!("{typ} cannot be used with {twin}")));
                }
            }
            _ => {}
        }

        let count = |typ| self.find_facet(typ).and_then(XmlSchemaFacet::count);
        match (typ, facet.count()) {
            (MinLength, Some(min)) if count(MaxLength).is_some_and(|max| min > max) => {
                return Err(conflict("minLength is greater than maxLength".to_owned()));
            }
            (MaxLength, Some(max)) if count(MinLength).is_some_and(|min| min > max) => {
                return Err(conflict("maxLength is less than minLength".to_owned()));
            }
            (FractionDigits, Some(frac)) if count(TotalDigits).is_some_and(|total| frac > total) => {
                return Err(conflict("fractionDigits is greater than totalDigits".to_owned()));
            }
            (TotalDigits, Some(total)) if count(FractionDigits).is_some_and(|frac| frac > total) => {
                return Err(conflict("totalDigits is less than fractionDigits".to_owned()));
            }
            _ => {}
        }

        if let Some(val) = facet.val().filter(|_| typ != Enumeration) {
            let opposite = self.facets.iter().filter(|other| {
                matches!(
                    (typ, other.typ()),
                    (MinInclusive | MinExclusive, MaxInclusive | MaxExclusive)
                        | (MaxInclusive | MaxExclusive, MinInclusive | MinExclusive)
                )
            });
            for other in opposite {
                let Some(other_val) = other.val() else {
                    continue;
                };
                let (min, max) = if matches!(typ, MinInclusive | MinExclusive) {
                    (val, other_val)
                } else {
                    (other_val, val)
                };
                let inclusive = matches!(typ, MinInclusive | MaxInclusive)
                    && matches!(other.typ(), MinInclusive | MaxInclusive);
                match xml_schema_compare_values(min, max) {
                    XmlSchemaValOrdering::Greater => {
                        return Err(conflict(format!("the range with {} is empty", other.typ())));
                    }
                    XmlSchemaValOrdering::Equal if !inclusive => {
                        return Err(conflict(format!("the range with {} is empty", other.typ())));
                    }
                    _ => {}
                }
            }
        }

        if let Some(ws) = facet.whitespace() {
            self.whitespace = ws;
        }
        self.facets.push(facet);
        Ok(self)
    }

    /// Validate a lexical value against this type.
    ///
    /// The value is normalized with the effective whiteSpace, parsed in the
    /// base type, then checked against each facet in order. Patterns are
    /// alternatives of each other, and so are enumerations.
    #[doc(alias = "xmlSchemaValidateSimpleTypeValue")]
    pub fn validate(&self, value: &str) -> Result<XmlSchemaVal, XmlSchemaTypeError> {
        let normalized = xml_schema_normalize(value, self.whitespace);
        let val = XmlSchemaVal::parse(self.base, &normalized)?;

        let mut patterns_done = false;
        let mut enumerations_done = false;
        for facet in &self.facets {
            match facet.typ() {
                XmlSchemaFacetType::Pattern if !patterns_done => {
                    patterns_done = true;
                    let patterns = self.group(XmlSchemaFacetType::Pattern);
                    if !patterns.iter().any(|facet| facet.matches(&normalized)) {
                        return Err(xml_schema_pattern_error(&normalized, &patterns));
                    }
                }
                XmlSchemaFacetType::Enumeration if !enumerations_done => {
                    enumerations_done = true;
                    let values = self.group(XmlSchemaFacetType::Enumeration);
                    if !values.iter().any(|facet| facet.enumerates(&val)) {
                        return Err(xml_schema_enumeration_error(&normalized, &values));
                    }
                }
                XmlSchemaFacetType::Pattern | XmlSchemaFacetType::Enumeration => {}
                _ => facet.validate(self.base, &normalized, &val)?,
            }
        }
        Ok(val)
    }

    pub fn is_valid(&self, value: &str) -> bool {
        self.validate(value).is_ok()
    }

    fn group(&self, typ: XmlSchemaFacetType) -> Vec<&XmlSchemaFacet> {
        self.facets.iter().filter(|facet| facet.typ() == typ).collect()
    }
}

impl From<XmlSchemaValType> for XmlSchemaSimpleType {
    fn from(base: XmlSchemaValType) -> Self {
        Self::new(base)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::XmlSchemaErrorCode;

    use super::*;

    fn facet(typ: XmlSchemaFacetType, value: &str) -> XmlSchemaFacet {
        XmlSchemaFacet::new(typ, value).unwrap()
    }

    #[test]
    fn builtin_type_without_facets() {
        let typ = XmlSchemaSimpleType::new(XmlSchemaValType::Boolean);
        assert_eq!(typ.display_name(), "xs:boolean");
        assert!(typ.is_valid(" true "));
        assert!(!typ.is_valid("yes"));
    }

    #[test]
    fn whitespace_facet_changes_normalization() {
        let mut typ = XmlSchemaSimpleType::new(XmlSchemaValType::String).with_name("token");
        typ.add_facet(facet(XmlSchemaFacetType::WhiteSpace, "collapse"))
            .unwrap()
            .add_facet(facet(XmlSchemaFacetType::MaxLength, "3"))
            .unwrap();
        assert_eq!(typ.whitespace(), XmlSchemaWhitespaceValueType::Collapse);
        let val = typ.validate("  a  b ").unwrap();
        assert_eq!(val.to_string(), "a b");
        assert!(typ.validate("a  b  c").is_err());
    }

    #[test]
    fn patterns_are_alternatives() {
        let mut typ = XmlSchemaSimpleType::new(XmlSchemaValType::String);
        typ.add_facet(facet(XmlSchemaFacetType::Pattern, "[0-9]+"))
            .unwrap()
            .add_facet(facet(XmlSchemaFacetType::Pattern, "[a-z]+"))
            .unwrap();
        assert!(typ.is_valid("123"));
        assert!(typ.is_valid("abc"));
        let err = typ.validate("abc123").unwrap_err();
        assert_eq!(
            err.to_string(),
            "[facet 'pattern'] The value 'abc123' is not accepted by the pattern '[0-9]+|[a-z]+'."
        );
    }

    #[test]
    fn enumerations_compare_values() {
        let mut typ = XmlSchemaSimpleType::new(XmlSchemaValType::Decimal).with_name("coin");
        for v in ["0.01", "0.05", "0.10"] {
            typ.add_facet(facet(XmlSchemaFacetType::Enumeration, v)).unwrap();
        }
        assert!(typ.is_valid("0.1"));
        assert!(typ.is_valid(".050"));
        let err = typ.validate("0.2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "[facet 'enumeration'] The value '0.2' is not an element of the set {'0.01', '0.05', '0.10'}."
        );
    }

    #[test]
    fn first_failing_facet_wins() {
        let mut typ = XmlSchemaSimpleType::new(XmlSchemaValType::Decimal);
        typ.add_facet(facet(XmlSchemaFacetType::MaxInclusive, "100"))
            .unwrap()
            .add_facet(facet(XmlSchemaFacetType::FractionDigits, "2"))
            .unwrap();
        assert!(typ.is_valid("99.99"));
        let err = typ.validate("100.001").unwrap_err();
        assert!(matches!(
            err,
            XmlSchemaTypeError::FacetViolation {
                facet: XmlSchemaFacetType::MaxInclusive,
                ..
            }
        ));
        let err = typ.validate("abc").unwrap_err();
        assert!(matches!(err, XmlSchemaTypeError::Lexical { .. }));
    }

    #[test]
    fn inconsistent_facets() {
        let mut typ = XmlSchemaSimpleType::new(XmlSchemaValType::String);
        typ.add_facet(facet(XmlSchemaFacetType::MaxLength, "3")).unwrap();
        assert!(typ.add_facet(facet(XmlSchemaFacetType::MaxLength, "4")).is_err());
        assert!(typ.add_facet(facet(XmlSchemaFacetType::MinLength, "4")).is_err());
        assert!(typ.add_facet(facet(XmlSchemaFacetType::Length, "2")).is_err());
        let err = typ.add_facet(facet(XmlSchemaFacetType::TotalDigits, "2")).unwrap_err();
        assert_eq!(err.code(), XmlSchemaErrorCode::XmlSchemapUnknownFacetType);
        let err = typ.add_facet(facet(XmlSchemaFacetType::MinLength, "4")).unwrap_err();
        assert_eq!(err.code(), XmlSchemaErrorCode::XmlSchemapInvalidFacet);
        assert!(matches!(
            err,
            XmlSchemaTypeError::InvalidFacet {
                kind: XmlSchemaFacetErrorKind::Conflict,
                ..
            }
        ));
        assert_eq!(typ.facets().len(), 1);

        let mut typ = XmlSchemaSimpleType::new(XmlSchemaValType::DateTime);
        typ.add_facet(facet(XmlSchemaFacetType::MinInclusive, "2000-01-01T00:00:00Z"))
            .unwrap();
        assert!(typ
            .add_facet(facet(XmlSchemaFacetType::MinExclusive, "2000-01-01T00:00:00Z"))
            .is_err());
        assert!(typ
            .add_facet(facet(XmlSchemaFacetType::MaxExclusive, "2000-01-01T00:00:00Z"))
            .is_err());
        assert!(typ
            .add_facet(facet(XmlSchemaFacetType::MaxInclusive, "2000-01-01T00:00:00Z"))
            .is_ok());
        assert!(typ.is_valid("2000-01-01T01:00:00+01:00"));
        assert!(!typ.is_valid("2000-01-01T00:00:01Z"));
    }

    #[test]
    fn digits_consistency() {
        let mut typ = XmlSchemaSimpleType::new(XmlSchemaValType::Decimal);
        typ.add_facet(facet(XmlSchemaFacetType::TotalDigits, "3")).unwrap();
        assert!(typ.add_facet(facet(XmlSchemaFacetType::FractionDigits, "4")).is_err());
        assert!(typ.add_facet(facet(XmlSchemaFacetType::FractionDigits, "1")).is_ok());
        assert!(typ.is_valid("12.5"));
        assert!(!typ.is_valid("1.25"));
        assert!(!typ.is_valid("1234"));
    }
}
