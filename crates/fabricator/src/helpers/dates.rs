//! Date construction and date-range helpers.
//!
//! Free-text date bounds are parsed through a process-lifetime memoization
//! cache: template recipes tend to repeat the same handful of bound strings
//! across thousands of generated rows.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use chrono::{DateTime, Duration, NaiveDate};
use rand::Rng;

use crate::eval::{EvalContext, HelperError};
use crate::helpers::numbers::to_int;
use crate::types::Value;

/// The `date` helper: construct a calendar date from integer or
/// integer-like-string components.
pub fn date(year: &Value, month: &Value, day: &Value) -> Result<Value, HelperError> {
    let (y, m, d) = (to_int(year)?, to_int(month)?, to_int(day)?);
    Ok(Value::Date(ymd(y, m, d)?))
}

/// The `datetime` helper: construct a timestamp from integer or
/// integer-like-string components. Time components default to zero.
pub fn datetime(
    year: &Value,
    month: &Value,
    day: &Value,
    hour: &Value,
    minute: &Value,
    second: &Value,
    microsecond: &Value,
) -> Result<Value, HelperError> {
    let base = ymd(to_int(year)?, to_int(month)?, to_int(day)?)?;
    let (h, min, s, micro) =
        (to_int(hour)?, to_int(minute)?, to_int(second)?, to_int(microsecond)?);
    let time_err =
        || HelperError::InvalidTime { hour: h, minute: min, second: s, microsecond: micro };
    let hour = u32::try_from(h).map_err(|_| time_err())?;
    let minute = u32::try_from(min).map_err(|_| time_err())?;
    let second = u32::try_from(s).map_err(|_| time_err())?;
    let micro = u32::try_from(micro).map_err(|_| time_err())?;
    let timestamp = base.and_hms_micro_opt(hour, minute, second, micro).ok_or_else(time_err)?;
    Ok(Value::DateTime(timestamp))
}

fn ymd(y: i64, m: i64, d: i64) -> Result<NaiveDate, HelperError> {
    let err = || HelperError::InvalidDate { year: y, month: m, day: d };
    let year = i32::try_from(y).map_err(|_| err())?;
    let month = u32::try_from(m).map_err(|_| err())?;
    let day = u32::try_from(d).map_err(|_| err())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(err)
}

/// The `date_between` helper: a uniformly random date within inclusive
/// bounds.
///
/// Bounds accept typed dates or free-text strings (memoized parse). An
/// empty range (start after end) is the one recognized normal failure and
/// yields `Value::Null` instead of an error; unparseable bounds and every
/// other failure propagate.
pub fn date_between(ctx: &mut EvalContext, start: &Value, end: &Value) -> Result<Value, HelperError> {
    let start_date =
        parse_date(start).ok_or_else(|| HelperError::UnparseableDate { value: start.to_string() })?;
    let end_date =
        parse_date(end).ok_or_else(|| HelperError::UnparseableDate { value: end.to_string() })?;

    let span = (end_date - start_date).num_days();
    if span < 0 {
        return Ok(Value::Null);
    }
    let offset = ctx.rng_mut().gen_range(0..=span);
    Ok(Value::Date(start_date + Duration::days(offset)))
}

/// Resolve a value to a calendar date if possible.
///
/// Typed dates pass through; strings are parsed through the process-wide
/// memoization cache. Anything else is not a date.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::DateTime(dt) => Some(dt.date()),
        Value::String(s) => cached_parse(s),
        _ => None,
    }
}

/// Formats accepted for free-text date bounds, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    DATE_FORMATS.iter().find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

// ----------------------------------------------------------------------
// Memoization cache
// ----------------------------------------------------------------------

const DATE_CACHE_CAPACITY: usize = 512;

/// Process-wide parse cache. Mutex-guarded so a host that evaluates
/// templates on multiple threads cannot corrupt it.
static DATE_CACHE: LazyLock<Mutex<DateCache>> =
    LazyLock::new(|| Mutex::new(DateCache::new(DATE_CACHE_CAPACITY)));

fn cached_parse(raw: &str) -> Option<NaiveDate> {
    let mut cache = DATE_CACHE.lock().expect("date cache lock poisoned");
    cache.get_or_parse(raw, parse_date_str)
}

/// A bounded least-recently-used cache of parsed date strings.
///
/// Unparseable strings are cached too (as `None`) so repeated bad input is
/// not re-parsed. Lives for the process lifetime of the template run.
struct DateCache {
    capacity: usize,
    clock: u64,
    entries: HashMap<String, (u64, Option<NaiveDate>)>,
}

impl DateCache {
    fn new(capacity: usize) -> Self {
        Self { capacity, clock: 0, entries: HashMap::with_capacity(capacity) }
    }

    /// Return the memoized parse result for `raw`, parsing and caching it
    /// on a miss. A hit refreshes the entry's recency.
    fn get_or_parse(
        &mut self,
        raw: &str,
        mut parse: impl FnMut(&str) -> Option<NaiveDate>,
    ) -> Option<NaiveDate> {
        self.clock += 1;
        let clock = self.clock;
        if let Some(slot) = self.entries.get_mut(raw) {
            slot.0 = clock;
            return slot.1;
        }
        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        let parsed = parse(raw);
        self.entries.insert(raw.to_string(), (clock, parsed));
        parsed
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, (stamp, _))| *stamp)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }

    fn contains(&self, raw: &str) -> bool {
        self.entries.contains_key(raw)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
