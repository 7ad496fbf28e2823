use super::Error;
use crate::{resolver::Validated, Endpoint};
use std::fmt::{self, Debug};

/// What a single DNS query produced.
#[derive(Debug)]
pub enum Outcome<T, E: Debug> {
    /// The query returned at least one record.
    Found(Validated<Vec<T>>),
    /// The query produced nothing usable, and why.
    Empty(Error<E>),
}

impl<T, E: Debug> Outcome<T, E> {
    /// Whether the query produced records.
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    /// The records found, or an empty slice.
    pub fn answers(&self) -> &[T] {
        match self {
            Outcome::Found(found) => &found.answers,
            Outcome::Empty(_) => &[],
        }
    }

    /// Whether the records found were DNSSEC-validated. `false` when empty.
    pub fn is_authenticated(&self) -> bool {
        match self {
            Outcome::Found(found) => found.authentic_data,
            Outcome::Empty(_) => false,
        }
    }

    pub(crate) fn map<U>(self, f: impl FnMut(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Found(found) => Outcome::Found(Validated::new(
                found.answers.into_iter().map(f).collect(),
                found.authentic_data,
            )),
            Outcome::Empty(e) => Outcome::Empty(e),
        }
    }
}

impl<T, E: Debug> From<Result<Validated<Vec<T>>, E>> for Outcome<T, E> {
    fn from(result: Result<Validated<Vec<T>>, E>) -> Self {
        match result {
            Ok(found) if found.answers.is_empty() => Outcome::Empty(Error::NoRecords),
            Ok(found) => Outcome::Found(found),
            Err(e) => Outcome::Empty(Error::Lookup(e)),
        }
    }
}

/// Record type a query asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// SRV service discovery.
    Srv,
    /// IPv4 addresses.
    A,
    /// IPv6 addresses.
    Aaaa,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryKind::Srv => "SRV",
            QueryKind::A => "A",
            QueryKind::Aaaa => "AAAA",
        })
    }
}

/// A query that came back empty during a resolve.
#[derive(Debug)]
pub struct Failure<E: Debug> {
    /// The name that was queried.
    pub name: String,
    /// The record type that was queried.
    pub kind: QueryKind,
    /// Why nothing was returned.
    pub error: Error<E>,
}

/// Everything a resolve produced: the endpoints to try, in order, and the
/// queries that contributed nothing.
#[derive(Debug)]
pub struct Resolution<E: Debug> {
    /// Connection candidates in attempt order.
    pub endpoints: Vec<Endpoint>,
    /// Queries that failed or returned no records.
    pub failures: Vec<Failure<E>>,
}

impl<E: Debug> Resolution<E> {
    pub(crate) fn failed(name: String, kind: QueryKind, error: Error<E>) -> Self {
        Self {
            endpoints: Vec::new(),
            failures: vec![Failure { name, kind, error }],
        }
    }

    pub(crate) fn merge(&mut self, other: Self) {
        self.endpoints.extend(other.endpoints);
        self.failures.extend(other.failures);
    }
}

impl<E: Debug> Default for Resolution<E> {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            failures: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Refused;

    #[test]
    fn empty_answer_is_no_records() {
        let outcome: Outcome<u16, Refused> = Ok(Validated::new(vec![], true)).into();
        assert!(matches!(outcome, Outcome::Empty(Error::NoRecords)));
        assert!(!outcome.is_authenticated());
    }

    #[test]
    fn lookup_error_keeps_cause() {
        let outcome: Outcome<u16, Refused> = Err(Refused).into();
        assert!(matches!(outcome, Outcome::Empty(Error::Lookup(Refused))));
        assert_eq!(outcome.answers(), &[] as &[u16]);
    }

    #[test]
    fn found_keeps_validation() {
        let outcome: Outcome<u16, Refused> = Ok(Validated::new(vec![1, 2], true)).into();
        assert!(outcome.is_found());
        assert!(outcome.is_authenticated());
        let doubled = outcome.map(|n| n * 2);
        assert_eq!(doubled.answers(), &[2, 4]);
        assert!(doubled.is_authenticated());
    }
}
