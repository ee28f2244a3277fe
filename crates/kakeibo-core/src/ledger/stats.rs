//! Ledger aggregates: month filters, totals and the cumulative profit curve.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use super::record::LedgerRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    pub records: u64,
    pub frag_45: u64,
    pub frag_75: u64,
    pub core: u64,
    pub profit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyProfit {
    /// Monday of the week.
    pub week_start: NaiveDate,
    pub profit: i64,
    pub cumulative: i64,
}

/// Distinct `YYYY-MM` keys, newest first.
pub fn months(records: &[LedgerRecord]) -> Vec<String> {
    let mut keys: Vec<String> = records.iter().map(LedgerRecord::month_key).collect();
    keys.sort_unstable_by(|a, b| b.cmp(a));
    keys.dedup();
    keys
}

/// Records in `month` (`YYYY-MM`), or all of them for `None`.
pub fn filter_month<'a>(records: &'a [LedgerRecord], month: Option<&str>) -> Vec<&'a LedgerRecord> {
    records
        .iter()
        .filter(|r| month.map_or(true, |m| r.month_key() == m))
        .collect()
}

pub fn totals<'a>(records: impl IntoIterator<Item = &'a LedgerRecord>) -> LedgerTotals {
    records.into_iter().fold(LedgerTotals::default(), |mut t, r| {
        t.records += 1;
        t.frag_45 += r.frag_45 as u64;
        t.frag_75 += r.frag_75 as u64;
        t.core += r.core as u64;
        t.profit += r.profit;
        t
    })
}

/// Years that have records, newest first.
pub fn years(records: &[LedgerRecord]) -> Vec<i32> {
    let mut ys: Vec<i32> = records.iter().map(|r| r.date.year()).collect();
    ys.sort_unstable_by(|a, b| b.cmp(a));
    ys.dedup();
    ys
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Weekly profit for records dated in `year`, with empty weeks between the
/// first and last active week filled in as zero.
pub fn weekly_cumulative_profit(records: &[LedgerRecord], year: i32) -> Vec<WeeklyProfit> {
    let mut by_week: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for r in records.iter().filter(|r| r.date.year() == year) {
        *by_week.entry(week_start(r.date)).or_default() += r.profit;
    }
    let (Some(&first), Some(&last)) = (by_week.keys().next(), by_week.keys().next_back()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut cumulative = 0;
    let mut week = first;
    while week <= last {
        let profit = by_week.get(&week).copied().unwrap_or(0);
        cumulative += profit;
        out.push(WeeklyProfit {
            week_start: week,
            profit,
            cumulative,
        });
        week += Duration::weeks(1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::Counts;
    use crate::ledger::profit::ProfitInputs;
    use crate::ledger::record::NewRecord;
    use chrono::Utc;

    fn record(date: &str, profit: i64) -> LedgerRecord {
        let mut r = NewRecord {
            username: "alice".into(),
            date: date.parse().unwrap(),
            inputs: ProfitInputs {
                counts: Counts::new(1, 2, 3, 0),
                ..Default::default()
            },
        }
        .into_record(0.05, Utc::now())
        .unwrap();
        r.profit = profit;
        r
    }

    #[test]
    fn months_are_distinct_and_descending() {
        let rs = vec![record("2026-01-05", 1), record("2026-03-01", 1), record("2026-01-20", 1)];
        assert_eq!(months(&rs), vec!["2026-03", "2026-01"]);
        assert_eq!(filter_month(&rs, Some("2026-01")).len(), 2);
        assert_eq!(filter_month(&rs, None).len(), 3);
    }

    #[test]
    fn totals_sum_fields() {
        let rs = vec![record("2026-01-05", 100), record("2026-01-06", -30)];
        let t = totals(&rs);
        assert_eq!(t.records, 2);
        assert_eq!(t.frag_45, 2);
        assert_eq!(t.core, 6);
        assert_eq!(t.profit, 70);
    }

    #[test]
    fn weeks_start_on_monday() {
        // 2026-03-01 is a Sunday.
        let sunday: NaiveDate = "2026-03-01".parse().unwrap();
        assert_eq!(week_start(sunday), "2026-02-23".parse::<NaiveDate>().unwrap());
        let monday: NaiveDate = "2026-03-02".parse().unwrap();
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn weekly_curve_fills_gaps() {
        let rs = vec![
            record("2026-01-05", 100),
            record("2026-01-07", 50),
            record("2026-01-21", 25),
            record("2025-12-31", 999),
        ];
        let curve = weekly_cumulative_profit(&rs, 2026);
        let points: Vec<(String, i64, i64)> = curve
            .iter()
            .map(|w| (w.week_start.to_string(), w.profit, w.cumulative))
            .collect();
        assert_eq!(
            points,
            vec![
                ("2026-01-05".to_string(), 150, 150),
                ("2026-01-12".to_string(), 0, 150),
                ("2026-01-19".to_string(), 25, 175),
            ]
        );
        assert!(weekly_cumulative_profit(&rs, 2024).is_empty());
        assert_eq!(years(&rs), vec![2026, 2025]);
    }
}
