// JSON-compatible value rules, implemented on the scanner
use crate::scanner::Scanner;
use crate::value::{Array, ScalarKind, Value};
use crate::{Error, Result};

impl<'a> Scanner<'a> {
    /// Parse a property value: string, number, boolean, null or array
    pub fn parse_value(&mut self) -> Result<Value> {
        match self.peek() {
            Some('[') => self.parse_array().map(Value::Array),
            Some('"') => self.parse_string().map(Value::String),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.parse_number(),
            Some('t') => {
                self.expect_str("true")?;
                Ok(Value::Boolean(true))
            }
            Some('f') => {
                self.expect_str("false")?;
                Ok(Value::Boolean(false))
            }
            Some('n') => {
                self.expect_str("null")?;
                Ok(Value::Null)
            }
            _ => Err(self.unexpected("a value")),
        }
    }

    /// Parse a homogeneous array literal.
    ///
    /// The first element fixes the kind for the rest of the array.
    pub fn parse_array(&mut self) -> Result<Array> {
        self.expect('[')?;
        self.skip_whitespace();
        if self.eat(']') {
            return Ok(Array::Empty);
        }

        let kind = self
            .peek_scalar_kind()
            .ok_or_else(|| self.unexpected("a string, number or boolean"))?;

        let mut items = Vec::new();
        loop {
            items.push(self.parse_element(kind)?);
            self.skip_whitespace();
            if self.eat(',') {
                self.skip_whitespace();
                continue;
            }
            self.expect(']')?;
            break;
        }

        Ok(collect_array(kind, items))
    }

    // Kind of the scalar starting at the cursor, judged by its lead character
    fn peek_scalar_kind(&self) -> Option<ScalarKind> {
        match self.peek()? {
            '"' => Some(ScalarKind::String),
            ch if ch == '-' || ch.is_ascii_digit() => Some(ScalarKind::Number),
            't' | 'f' => Some(ScalarKind::Boolean),
            _ => None,
        }
    }

    fn parse_element(&mut self, kind: ScalarKind) -> Result<Value> {
        if self.peek_scalar_kind() != Some(kind) {
            return Err(self.unexpected(&format!("a {} array element", kind)));
        }
        self.parse_value()
    }

    /// Parse a double-quoted JSON string and decode its escapes
    pub fn parse_string(&mut self) -> Result<String> {
        let start = self.position();
        self.expect('"')?;
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(Error::syntax("unterminated string", start));
                    }
                }
                Some(_) => {}
                None => return Err(Error::syntax("unterminated string", start)),
            }
        }
        let literal = self.slice_from(start);
        serde_json::from_str::<String>(literal)
            .map_err(|e| Error::syntax(format!("invalid string {}: {}", literal, e), start))
    }

    /// Parse a JSON number.
    ///
    /// Literals without fraction or exponent are integers, all others floats.
    pub fn parse_number(&mut self) -> Result<Value> {
        let start = self.position();
        self.eat('-');
        match self.peek() {
            Some('0') => {
                self.bump();
            }
            Some(ch) if ch.is_ascii_digit() => {
                self.scan_while(|c| c.is_ascii_digit());
            }
            _ => return Err(self.unexpected("a digit")),
        }

        let mut integral = true;
        if self.eat('.') {
            if self.scan_while(|c| c.is_ascii_digit()).is_empty() {
                return Err(self.unexpected("a fraction digit"));
            }
            integral = false;
        }
        if self.eat('e') || self.eat('E') {
            if !self.eat('+') {
                self.eat('-');
            }
            if self.scan_while(|c| c.is_ascii_digit()).is_empty() {
                return Err(self.unexpected("an exponent digit"));
            }
            integral = false;
        }

        let literal = self.slice_from(start);
        if integral {
            literal
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| Error::syntax(format!("integer out of range: {}", literal), start))
        } else {
            match literal.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f)),
                Ok(_) => Err(Error::syntax(format!("number out of range: {}", literal), start)),
                Err(_) => Err(Error::syntax(format!("invalid number: {}", literal), start)),
            }
        }
    }
}

// Element kinds were checked while scanning; numeric arrays widen to
// float as soon as one element is not integral.
fn collect_array(kind: ScalarKind, items: Vec<Value>) -> Array {
    match kind {
        ScalarKind::String => Array::String(
            items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        ScalarKind::Boolean => Array::Boolean(items.iter().filter_map(Value::as_bool).collect()),
        ScalarKind::Number => {
            if items.iter().all(|v| matches!(v, Value::Integer(_))) {
                Array::Integer(items.iter().filter_map(Value::as_i64).collect())
            } else {
                Array::Float(items.iter().filter_map(Value::as_f64).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str) -> Result<Value> {
        Scanner::new(text).parse_value()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(value("true").unwrap(), Value::Boolean(true));
        assert_eq!(value("false").unwrap(), Value::Boolean(false));
        assert_eq!(value("null").unwrap(), Value::Null);
        assert_eq!(value("42").unwrap(), Value::Integer(42));
        assert_eq!(value("-7").unwrap(), Value::Integer(-7));
        assert_eq!(value("0").unwrap(), Value::Integer(0));
        assert_eq!(value("2.5").unwrap(), Value::Float(2.5));
        assert_eq!(value("1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(value("-1.5E-1").unwrap(), Value::Float(-0.15));
    }

    #[test]
    fn test_number_stops_after_leading_zero() {
        let mut scanner = Scanner::new("0123");
        assert_eq!(scanner.parse_value().unwrap(), Value::Integer(0));
        assert_eq!(scanner.rest(), "123");
    }

    #[test]
    fn test_malformed_numbers() {
        assert!(value("-").unwrap_err().is_syntax());
        assert!(value("1.").is_err());
        assert!(value("1e").is_err());
        assert!(value("99999999999999999999").is_err());
        assert!(value("1e400").is_err());
        assert!(value("-1e400").unwrap_err().to_string().contains("out of range"));
        assert_eq!(value("1e-400").unwrap(), Value::Float(0.0));
    }

    #[test]
    fn test_strings() {
        assert_eq!(value(r#""hello""#).unwrap(), Value::from("hello"));
        assert_eq!(value(r#""say \"hi\"""#).unwrap(), Value::from("say \"hi\""));
        assert_eq!(value(r#""tab\there""#).unwrap(), Value::from("tab\there"));
        assert_eq!(value(r#""é""#).unwrap(), Value::from("é"));
        assert_eq!(value(r#""back\\""#).unwrap(), Value::from("back\\"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = value(r#""no end"#).unwrap_err();
        assert_eq!(err.position(), Some(0));
        assert!(err.to_string().contains("unterminated string"));

        assert!(value(r#""escape at end\"#).is_err());
    }

    #[test]
    fn test_integer_array() {
        assert_eq!(
            value("[1, 2, 3]").unwrap(),
            Value::Array(Array::Integer(vec![1, 2, 3]))
        );
    }

    #[test]
    fn test_mixed_numeric_array_widens_to_float() {
        assert_eq!(
            value("[1,2.5]").unwrap(),
            Value::Array(Array::Float(vec![1.0, 2.5]))
        );
        assert_eq!(
            value("[1.5, 2]").unwrap(),
            Value::Array(Array::Float(vec![1.5, 2.0]))
        );
    }

    #[test]
    fn test_string_and_boolean_arrays() {
        assert_eq!(
            value(r#"["x","y"]"#).unwrap(),
            Value::Array(Array::String(vec!["x".to_string(), "y".to_string()]))
        );
        assert_eq!(
            value("[true, false]").unwrap(),
            Value::Array(Array::Boolean(vec![true, false]))
        );
        assert_eq!(value("[ ]").unwrap(), Value::Array(Array::Empty));
    }

    #[test]
    fn test_heterogeneous_array_is_rejected() {
        let err = value(r#"[1,"x"]"#).unwrap_err();
        assert!(err.to_string().contains("number array element"));
        assert_eq!(err.position(), Some(3));

        assert!(value(r#"["x", true]"#).is_err());
        assert!(value("[null]").is_err());
        assert!(value("[[1]]").is_err());
    }

    #[test]
    fn test_unclosed_array() {
        assert!(value("[1, 2").is_err());
    }
}
