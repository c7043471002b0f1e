// src/server/protocol.rs

//! Request parsing and reply texts.
//!
//! A request is one unframed chunk of ASCII text, `REGISTER <program>` or
//! `FETCH <program>`, read with a single bounded read. Anything beyond
//! [`MAX_REQUEST_BYTES`] is not part of the request. The verb is
//! case-insensitive and `ADD` / `GET` are accepted as aliases. Trailing
//! whitespace, including a newline, is ignored.

use std::fmt;

use thiserror::Error;

use crate::registry::Rejection;

pub const MAX_REQUEST_BYTES: usize = 1024;

pub const PROGRAM_ADDED: &str = "Program added";
pub const PROGRAM_NOT_FOUND: &str = "Program not found";
pub const PROGRAM_NOT_EXECUTABLE: &str = "Program not executable";
pub const OUTPUT_NOT_FOUND: &str = "Output not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Register(String),
    Fetch(String),
}

impl Request {
    pub fn program(&self) -> &str {
        match self {
            Request::Register(p) | Request::Fetch(p) => p,
        }
    }
}

/// Wire form, as sent by the client.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Register(p) => write!(f, "REGISTER {p}"),
            Request::Fetch(p) => write!(f, "FETCH {p}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty request")]
    Empty,

    #[error("request is not valid UTF-8")]
    NotUtf8,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("command '{0}' needs a program argument")]
    MissingProgram(String),
}

pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    let text = std::str::from_utf8(buf).map_err(|_| ParseError::NotUtf8)?;
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let (verb, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let program = rest.trim();

    let make: fn(String) -> Request = match verb.to_ascii_uppercase().as_str() {
        "REGISTER" | "ADD" => Request::Register,
        "FETCH" | "GET" => Request::Fetch,
        _ => return Err(ParseError::UnknownCommand(verb.to_string())),
    };

    if program.is_empty() {
        return Err(ParseError::MissingProgram(verb.to_string()));
    }
    Ok(make(program.to_string()))
}

pub fn rejection_reply(reason: Rejection) -> &'static str {
    match reason {
        Rejection::NotFound => PROGRAM_NOT_FOUND,
        Rejection::NotExecutable => PROGRAM_NOT_EXECUTABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_verbs_and_legacy_aliases() {
        assert_eq!(
            parse_request(b"REGISTER ./job.sh"),
            Ok(Request::Register("./job.sh".to_string()))
        );
        assert_eq!(
            parse_request(b"fetch /opt/report\r\n"),
            Ok(Request::Fetch("/opt/report".to_string()))
        );
        assert_eq!(
            parse_request(b"ADD prog.py"),
            Ok(Request::Register("prog.py".to_string()))
        );
        assert_eq!(
            parse_request(b"GET prog.py"),
            Ok(Request::Fetch("prog.py".to_string()))
        );
    }

    #[test]
    fn program_may_contain_inner_spaces() {
        assert_eq!(
            parse_request(b"REGISTER   /srv/my jobs/run.sh  \n"),
            Ok(Request::Register("/srv/my jobs/run.sh".to_string()))
        );
    }

    #[test]
    fn malformed_requests_are_classified() {
        assert_eq!(parse_request(b"  \n"), Err(ParseError::Empty));
        assert_eq!(parse_request(&[0xff, 0xfe]), Err(ParseError::NotUtf8));
        assert_eq!(
            parse_request(b"DELETE x"),
            Err(ParseError::UnknownCommand("DELETE".to_string()))
        );
        assert_eq!(
            parse_request(b"FETCH"),
            Err(ParseError::MissingProgram("FETCH".to_string()))
        );
    }

    #[test]
    fn display_is_the_wire_form() {
        let req = Request::Fetch("./a.sh".to_string());
        assert_eq!(parse_request(req.to_string().as_bytes()), Ok(req));
    }
}
