use regex::Regex;
use serde_json::Value;

use logwatch_types::ParsedRecord;

use crate::config::{DEFAULT_STATUS_INDEX, LineFormat};
use crate::error::{FormatError, ParseError};

/// Extracts the status code and upstream address from raw log lines
#[derive(Clone, Debug)]
pub struct LineParser {
    kind: ParserKind,
}

#[derive(Clone, Debug)]
enum ParserKind {
    Positional { status_index: usize },
    Pattern(Regex),
    Json { status_key: String, upstream_key: String },
}

impl LineParser {
    /// Build a parser for the given format, compiling any pattern
    pub fn new(format: &LineFormat) -> Result<Self, FormatError> {
        let kind = match format {
            LineFormat::Positional { status_index } => ParserKind::Positional {
                status_index: *status_index,
            },
            LineFormat::Pattern { regex } => {
                let re = Regex::new(regex)?;
                for group in ["status", "upstream"] {
                    if !re.capture_names().flatten().any(|name| name == group) {
                        return Err(FormatError::MissingGroup(group));
                    }
                }
                ParserKind::Pattern(re)
            }
            LineFormat::Json {
                status_key,
                upstream_key,
            } => ParserKind::Json {
                status_key: status_key.clone(),
                upstream_key: upstream_key.clone(),
            },
        };

        Ok(Self { kind })
    }

    /// Whitespace-positional parser with the status at `status_index`
    pub fn positional(status_index: usize) -> Self {
        Self {
            kind: ParserKind::Positional { status_index },
        }
    }

    /// Parse one raw line; the line terminator may still be attached
    pub fn parse(&self, raw: &str) -> Result<ParsedRecord, ParseError> {
        match &self.kind {
            ParserKind::Positional { status_index } => Self::parse_positional(raw, *status_index),
            ParserKind::Pattern(re) => Self::parse_pattern(raw, re),
            ParserKind::Json {
                status_key,
                upstream_key,
            } => Self::parse_json(raw, status_key, upstream_key),
        }
    }

    fn parse_positional(raw: &str, status_index: usize) -> Result<ParsedRecord, ParseError> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();

        let status = tokens.get(status_index).ok_or(ParseError::MissingField {
            index: status_index,
            found: tokens.len(),
        })?;
        // Non-empty, since the status token exists
        let upstream = tokens[tokens.len() - 1];

        Ok(ParsedRecord::new(*status, upstream))
    }

    fn parse_pattern(raw: &str, re: &Regex) -> Result<ParsedRecord, ParseError> {
        let line = raw.trim_end_matches(['\n', '\r']);
        let caps = re.captures(line).ok_or(ParseError::NoMatch)?;

        // Groups are checked at construction but may be optional in the pattern
        let status = caps.name("status").ok_or(ParseError::NoMatch)?;
        let upstream = caps.name("upstream").ok_or(ParseError::NoMatch)?;

        Ok(ParsedRecord::new(status.as_str(), upstream.as_str()))
    }

    fn parse_json(
        raw: &str,
        status_key: &str,
        upstream_key: &str,
    ) -> Result<ParsedRecord, ParseError> {
        let value: Value = serde_json::from_str(raw.trim())?;

        let field = |key: &str| -> Result<String, ParseError> {
            match value.get(key) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(Value::Null) | None => Err(ParseError::MissingKey(key.to_string())),
                Some(other) => Ok(other.to_string()),
            }
        };

        Ok(ParsedRecord::new(field(status_key)?, field(upstream_key)?))
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::positional(DEFAULT_STATUS_INDEX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NGINX_500: &str = "10.0.0.5 - - [15/Jan/2024:10:30:00 +0000] \"GET /api HTTP/1.1\" 500 512 10.0.0.1:8080\n";

    #[test]
    fn test_positional_status_and_upstream() {
        let record = LineParser::default().parse("a b c d e f g h 503 x\n").unwrap();
        assert_eq!(record.status_code, "503");
        assert_eq!(record.upstream_addr, "x");
        assert!(record.is_server_error());
    }

    #[test]
    fn test_positional_access_log_line() {
        let record = LineParser::default().parse(NGINX_500).unwrap();
        assert_eq!(record.status_code, "500");
        assert_eq!(record.upstream_addr, "10.0.0.1:8080");
    }

    #[test]
    fn test_positional_runs_of_whitespace() {
        let record = LineParser::default()
            .parse("a  b\tc d   e f g h 200 y\r\n")
            .unwrap();
        assert_eq!(record.status_code, "200");
        assert_eq!(record.upstream_addr, "y");
    }

    #[test]
    fn test_positional_too_few_tokens() {
        let err = LineParser::default().parse("a b c d e f g h\n").unwrap_err();
        match err {
            ParseError::MissingField { index, found } => {
                assert_eq!(index, 8);
                assert_eq!(found, 8);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(LineParser::default().parse("\n").is_err());
    }

    #[test]
    fn test_status_is_also_last_token() {
        // Exactly nine tokens: the status doubles as the upstream
        let record = LineParser::default().parse("a b c d e f g h 502").unwrap();
        assert_eq!(record.status_code, "502");
        assert_eq!(record.upstream_addr, "502");
    }

    #[test]
    fn test_pattern_format() {
        let parser = LineParser::new(&LineFormat::Pattern {
            regex: r#"" (?P<status>\d{3}) \d+ (?P<upstream>\S+)$"#.to_string(),
        })
        .unwrap();

        let record = parser.parse(NGINX_500).unwrap();
        assert_eq!(record.status_code, "500");
        assert_eq!(record.upstream_addr, "10.0.0.1:8080");

        assert!(matches!(parser.parse("garbage\n"), Err(ParseError::NoMatch)));
    }

    #[test]
    fn test_pattern_requires_named_groups() {
        let err = LineParser::new(&LineFormat::Pattern {
            regex: r"(?P<status>\d{3})".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, FormatError::MissingGroup("upstream")));

        let err = LineParser::new(&LineFormat::Pattern {
            regex: "(".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, FormatError::InvalidRegex(_)));
    }

    #[test]
    fn test_json_format() {
        let parser = LineParser::new(&LineFormat::Json {
            status_key: "status".to_string(),
            upstream_key: "upstream_addr".to_string(),
        })
        .unwrap();

        let record = parser
            .parse("{\"status\":504,\"upstream_addr\":\"10.0.0.2:80\"}\n")
            .unwrap();
        assert_eq!(record.status_code, "504");
        assert_eq!(record.upstream_addr, "10.0.0.2:80");
        assert!(record.is_server_error());

        let record = parser
            .parse(r#"{"status":"200","upstream_addr":"10.0.0.2:80"}"#)
            .unwrap();
        assert!(!record.is_server_error());
    }

    #[test]
    fn test_json_errors() {
        let parser = LineParser::new(&LineFormat::Json {
            status_key: "status".to_string(),
            upstream_key: "upstream_addr".to_string(),
        })
        .unwrap();

        assert!(matches!(parser.parse("not json"), Err(ParseError::Json(_))));
        assert!(matches!(
            parser.parse(r#"{"status":500}"#),
            Err(ParseError::MissingKey(key)) if key == "upstream_addr"
        ));
    }
}
