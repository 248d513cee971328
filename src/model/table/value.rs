//! Cell values and the `Record` trait rows implement

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A single field value as seen by the table
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing field; displays as blank
    Empty,
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Number(_) => 0,
            CellValue::Date(_) => 1,
            CellValue::Text(_) => 2,
            CellValue::Empty => 3,
        }
    }

    /// Natural ordering: numbers numerically, dates chronologically, text
    /// case-insensitively with digit runs compared as numbers.
    ///
    /// Values of different kinds order by kind so the result stays total.
    pub fn natural_cmp(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => natural_text_cmp(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(d: DateTime<Utc>) -> Self {
        CellValue::Date(d)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(v: Option<V>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// A row record: a bag of field values
///
/// `values` returns every field of the record (not just the ones shown in a
/// column); free-text search looks at all of them.
pub trait Record {
    fn values(&self) -> Vec<CellValue>;
}

impl Record for BTreeMap<String, CellValue> {
    fn values(&self) -> Vec<CellValue> {
        BTreeMap::values(self).cloned().collect()
    }
}

/// Compare strings case-insensitively, treating runs of ASCII digits as numbers
fn natural_text_cmp(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let na = take_digits(&mut ai);
                let nb = take_digits(&mut bi);
                // Compare by significant length first, then lexically
                let na_trim = na.trim_start_matches('0');
                let nb_trim = nb.trim_start_matches('0');
                let ord = na_trim
                    .len()
                    .cmp(&nb_trim.len())
                    .then_with(|| na_trim.cmp(nb_trim));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                if ca != cb {
                    return ca.cmp(&cb);
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(c) = it.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        out.push(c);
        it.next();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_natural_text_orders_digit_runs_numerically() {
        let two = CellValue::from("2nd Floor");
        let eleven = CellValue::from("11th Floor");
        assert_eq!(two.natural_cmp(&eleven), Ordering::Less);
        assert_eq!(
            CellValue::from("floor 9").natural_cmp(&CellValue::from("Floor 10")),
            Ordering::Less
        );
    }

    #[test]
    fn test_natural_text_is_case_insensitive() {
        assert_eq!(
            CellValue::from("open").natural_cmp(&CellValue::from("Open")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_dates_compare_chronologically() {
        let early = CellValue::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let late = CellValue::from(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(early.natural_cmp(&late), Ordering::Less);
    }

    #[test]
    fn test_empty_displays_blank() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::from(None::<String>), CellValue::Empty);
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
    }
}
