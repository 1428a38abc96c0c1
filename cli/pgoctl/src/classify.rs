//! HTTP status classification.
//!
//! Runs before any body is read. A [`StatusClass::Success`] only means the
//! server handled the request; whether the operation was accepted is the
//! application status inside the body.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 200
    Success,
    /// 401
    AuthenticationFailed,
    /// Anything else, including other 2xx codes.
    UnexpectedStatus(u16),
}

impl StatusClass {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::AuthenticationFailed => f.write_str("authentication failed"),
            Self::UnexpectedStatus(code) => write!(f, "unexpected status {code}"),
        }
    }
}

pub fn classify(status: u16) -> StatusClass {
    match status {
        200 => StatusClass::Success,
        401 => StatusClass::AuthenticationFailed,
        other => StatusClass::UnexpectedStatus(other),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(200, StatusClass::Success)]
    #[case(401, StatusClass::AuthenticationFailed)]
    #[case(201, StatusClass::UnexpectedStatus(201))]
    #[case(204, StatusClass::UnexpectedStatus(204))]
    #[case(302, StatusClass::UnexpectedStatus(302))]
    #[case(400, StatusClass::UnexpectedStatus(400))]
    #[case(403, StatusClass::UnexpectedStatus(403))]
    #[case(404, StatusClass::UnexpectedStatus(404))]
    #[case(500, StatusClass::UnexpectedStatus(500))]
    #[case(503, StatusClass::UnexpectedStatus(503))]
    fn classifies_status(#[case] status: u16, #[case] expected: StatusClass) {
        assert_eq!(classify(status), expected);
    }

    #[test]
    fn only_200_is_success() {
        assert!((100..600)
            .filter(|code| classify(*code).is_success())
            .eq([200]));
    }
}
