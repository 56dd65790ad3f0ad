//! `time:` builtins (spec.md §4.4): lexical-part extraction only, no
//! timezone normalization and no calendar arithmetic beyond what a duration
//! literal's own lexical form already spells out.
//!
//! Grounded on spec.md §4.4's catalog and §1's non-goal ("full XSD calendar
//! arithmetic is out of scope — builtins operate on the lexical parts of
//! `xsd:dateTime`/`xsd:duration` values"). No `chrono` dependency: the one
//! piece of real calendar math this namespace needs — turning a Unix
//! timestamp into a civil `YYYY-MM-DDThh:mm:ss` for `time:localTime` — is
//! the well-known days-since-epoch/civil-date conversion, small enough to
//! hand-write rather than pull in a dependency unused anywhere else in this
//! crate.

use crate::builtins::unify_one;
use crate::env::Env;
use crate::subst::Subst;
use n3_model::{Term, Triple, Vocabulary};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn dispatch(local: &str, goal: &Triple, subst: &Subst, env: &Env<'_>) -> Vec<Subst> {
    match local {
        "localTime" => local_time(goal, subst, env),
        "year" => component(goal, subst, 0),
        "month" => component(goal, subst, 1),
        "day" => component(goal, subst, 2),
        "hour" => component(goal, subst, 3),
        "minute" => component(goal, subst, 4),
        "second" => component(goal, subst, 5),
        "timeZone" => time_zone(goal, subst),
        _ => Vec::new(),
    }
}

/// Bind the object to the run's "now", as an `xsd:dateTime` literal,
/// memoized so every call within one run sees the same instant.
fn local_time(goal: &Triple, subst: &Subst, env: &Env<'_>) -> Vec<Subst> {
    let now = {
        let mut cell = env.now.borrow_mut();
        if cell.is_none() {
            let secs = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or(0);
            *cell = Some(Term::literal_typed(Rc::from(format_datetime(secs)), Rc::from(Vocabulary::XSD_DATETIME)));
        }
        cell.clone().unwrap()
    };
    unify_one(now, &goal.object, subst)
}

/// `?dateTime time:<component> ?n` — the component at `index` (0=year .. 5=second)
/// of the subject's lexical `YYYY-MM-DDThh:mm:ss` prefix.
fn component(goal: &Triple, subst: &Subst, index: usize) -> Vec<Subst> {
    let subject = subst.apply(&goal.subject);
    let Some(lit) = subject.as_literal() else {
        return Vec::new();
    };
    let Some(parts) = parse_datetime_parts(&lit.lex) else {
        return Vec::new();
    };
    let value = parts[index];
    unify_one(
        Term::literal_typed(Rc::from(value.to_string()), Rc::from(Vocabulary::XSD_INTEGER)),
        &goal.object,
        subst,
    )
}

/// `?dateTime time:timeZone ?tz` — the lexical timezone designator
/// (`"Z"`, `"+02:00"`, `"-05:00"`, or `""` when the literal carries none),
/// as a plain string (spec.md §4.4).
fn time_zone(goal: &Triple, subst: &Subst) -> Vec<Subst> {
    let subject = subst.apply(&goal.subject);
    let Some(lit) = subject.as_literal() else {
        return Vec::new();
    };
    let Some(tz) = parse_timezone(&lit.lex) else {
        return Vec::new();
    };
    unify_one(Term::literal_str(Rc::from(tz)), &goal.object, subst)
}

/// Parse `YYYY-MM-DDThh:mm:ss[.fff][Z|+hh:mm]` down to its six integer
/// components, ignoring anything after the seconds field.
pub(crate) fn parse_datetime_parts(lex: &str) -> Option<[i64; 6]> {
    let (date, time) = lex.split_once('T')?;
    let mut date_parts = date.splitn(3, '-');
    let year: i64 = date_parts.next()?.parse().ok()?;
    let month: i64 = date_parts.next()?.parse().ok()?;
    let day: i64 = date_parts.next()?.parse().ok()?;
    let time_body = time.trim_end_matches('Z');
    let time_body = time_body.split(['+', '-']).next().unwrap_or(time_body);
    let mut time_parts = time_body.splitn(3, ':');
    let hour: i64 = time_parts.next()?.parse().ok()?;
    let minute: i64 = time_parts.next()?.parse().ok()?;
    let second_field = time_parts.next().unwrap_or("0");
    let second: i64 = second_field.split('.').next()?.parse().ok()?;
    Some([year, month, day, hour, minute, second])
}

/// Parse an `xsd:duration` lexical form's day/hour/minute/second fields.
pub(crate) fn parse_duration_seconds(lex: &str) -> Option<i64> {
    let body = lex.strip_prefix('P')?;
    let (date_part, time_part) = body.split_once('T').map(|(d, t)| (d, Some(t))).unwrap_or((body, None));

    if date_part.contains('Y') || date_part.contains('M') {
        return None;
    }
    let mut total = 0i64;
    if let Some(days) = date_part.strip_suffix('D') {
        total += days.parse::<i64>().ok()? * 86_400;
    } else if !date_part.is_empty() {
        return None;
    }
    if let Some(time_part) = time_part {
        let mut rest = time_part;
        if let Some(idx) = rest.find('H') {
            total += rest[..idx].parse::<i64>().ok()? * 3_600;
            rest = &rest[idx + 1..];
        }
        if let Some(idx) = rest.find('M') {
            total += rest[..idx].parse::<i64>().ok()? * 60;
            rest = &rest[idx + 1..];
        }
        if let Some(idx) = rest.find('S') {
            total += rest[..idx].parse::<i64>().ok()?;
        }
    }
    Some(total)
}

/// Extract the timezone designator suffix of the time portion of a lexical
/// `xsd:dateTime`: `"Z"`, a `+hh:mm`/`-hh:mm` offset, or `""` when absent.
fn parse_timezone(lex: &str) -> Option<String> {
    let (_, time) = lex.split_once('T')?;
    if time.ends_with('Z') {
        return Some("Z".to_string());
    }
    if let Some(idx) = time.find(['+', '-']) {
        return Some(time[idx..].to_string());
    }
    Some(String::new())
}

/// Inverse of [`civil_from_days`]: a proleptic Gregorian (year, month, day)
/// to days-since-epoch, Howard Hinnant's `days_from_civil`.
pub(crate) fn days_from_civil(y: i64, m: u32, d: u32) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = if m > 2 { m - 3 } else { m + 9 } as i64;
    let doy = (153 * mp + 2) / 5 + d as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Total seconds since the Unix epoch for a lexical `xsd:dateTime` or
/// `xsd:date` value (spec.md §4.4: used by `math:`'s dateTime/date
/// comparisons and `math:difference`'s duration-of-days result).
pub(crate) fn datetime_to_epoch_seconds(lex: &str) -> Option<i64> {
    if let Some([y, mo, d, h, mi, s]) = parse_datetime_parts(lex) {
        let days = days_from_civil(y, mo as u32, d as u32);
        return Some(days * 86_400 + h * 3_600 + mi * 60 + s);
    }
    let mut parts = lex.splitn(3, '-');
    let y: i64 = parts.next()?.parse().ok()?;
    let mo: i64 = parts.next()?.parse().ok()?;
    let day_field = parts.next()?;
    let day_field = day_field.trim_end_matches('Z');
    let day_field = day_field.split(['+', '-']).next()?;
    let d: i64 = day_field.parse().ok()?;
    Some(days_from_civil(y, mo as u32, d as u32) * 86_400)
}

/// Format a Unix timestamp as `YYYY-MM-DDThh:mm:ssZ`, civil calendar, UTC.
fn format_datetime(secs_since_epoch: i64) -> String {
    let days = secs_since_epoch.div_euclid(86_400);
    let time_of_day = secs_since_epoch.rem_euclid(86_400);
    let (y, m, d) = civil_from_days(days);
    let hh = time_of_day / 3600;
    let mm = (time_of_day % 3600) / 60;
    let ss = time_of_day % 60;
    format!("{y:04}-{m:02}-{d:02}T{hh:02}:{mm:02}:{ss:02}Z")
}

/// Howard Hinnant's `civil_from_days`: days-since-epoch to a proleptic
/// Gregorian (year, month, day), valid for the full `i64` range.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::index::{BackwardRuleIndex, FactStore};
    use crate::skolem::SkolemGenerator;

    #[test]
    fn civil_from_days_matches_known_epoch() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(19_723), (2023, 12, 25));
    }

    #[test]
    fn parse_datetime_parts_extracts_six_components() {
        let parts = parse_datetime_parts("2023-12-25T10:30:45Z").unwrap();
        assert_eq!(parts, [2023, 12, 25, 10, 30, 45]);
    }

    #[test]
    fn parse_duration_seconds_handles_day_hour_minute_second() {
        assert_eq!(parse_duration_seconds("P1DT2H3M4S"), Some(86_400 + 7200 + 180 + 4));
    }

    #[test]
    fn parse_duration_seconds_rejects_year_month_fields() {
        assert_eq!(parse_duration_seconds("P1Y2M3D"), None);
    }

    #[test]
    fn local_time_is_memoized_across_calls() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = Env::for_test(&facts, &rules, &config, &skolem);
        let goal = Triple::new(
            Term::Iri(Rc::from("http://example.org/this")),
            Term::Iri(Rc::from(format!("{}localTime", Vocabulary::TIME_NS))),
            Term::Variable(Rc::from("x")),
        );
        let first = dispatch("localTime", &goal, &Subst::new(), &env);
        let second = dispatch("localTime", &goal, &Subst::new(), &env);
        assert_eq!(
            first[0].resolve(&Term::Variable(Rc::from("x"))),
            second[0].resolve(&Term::Variable(Rc::from("x")))
        );
    }

    #[test]
    fn year_component_extracts_from_literal_subject() {
        let goal = Triple::new(
            Term::literal_typed(Rc::from("2023-12-25T10:30:45Z"), Rc::from(Vocabulary::XSD_DATETIME)),
            Term::Iri(Rc::from(format!("{}year", Vocabulary::TIME_NS))),
            Term::Variable(Rc::from("y")),
        );
        let solutions = component(&goal, &Subst::new(), 0);
        assert_eq!(
            solutions[0].resolve(&Term::Variable(Rc::from("y"))),
            Term::literal_typed(Rc::from("2023"), Rc::from(Vocabulary::XSD_INTEGER))
        );
    }

    #[test]
    fn time_zone_extracts_designator_or_empty_string() {
        let goal = triple_for_time_zone("2023-12-25T10:30:45+02:00");
        let solutions = time_zone(&goal, &Subst::new());
        assert_eq!(solutions[0].resolve(&Term::Variable(Rc::from("z"))), Term::literal_str(Rc::from("+02:00")));

        let goal = triple_for_time_zone("2023-12-25T10:30:45Z");
        let solutions = time_zone(&goal, &Subst::new());
        assert_eq!(solutions[0].resolve(&Term::Variable(Rc::from("z"))), Term::literal_str(Rc::from("Z")));

        let goal = triple_for_time_zone("2023-12-25T10:30:45");
        let solutions = time_zone(&goal, &Subst::new());
        assert_eq!(solutions[0].resolve(&Term::Variable(Rc::from("z"))), Term::literal_str(Rc::from("")));
    }

    fn triple_for_time_zone(lex: &str) -> Triple {
        Triple::new(
            Term::literal_typed(Rc::from(lex), Rc::from(Vocabulary::XSD_DATETIME)),
            Term::Iri(Rc::from(format!("{}timeZone", Vocabulary::TIME_NS))),
            Term::Variable(Rc::from("z")),
        )
    }

    #[test]
    fn days_from_civil_is_inverse_of_civil_from_days() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(2023, 12, 25), 19_723);
    }

    #[test]
    fn datetime_to_epoch_seconds_handles_date_only_literals() {
        assert_eq!(datetime_to_epoch_seconds("2023-12-25"), Some(19_723 * 86_400));
        assert_eq!(
            datetime_to_epoch_seconds("2023-12-26T00:00:00Z"),
            Some(19_723 * 86_400 + 86_400)
        );
    }
}
