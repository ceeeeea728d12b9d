use crate::equity::chronological;
use chrono::{Datelike, Timelike};
use core_types::Trade;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Consecutive win/loss streak statistics plus mean P&L by time bucket.
///
/// Bucket maps only contain populated buckets, so best/worst selection is
/// never biased by hours or months that saw no trades. Selectors are `None`
/// on an empty history. Weekdays are numbered 0–6 with Sunday as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakMetrics {
    pub max_consecutive_wins: u32,
    pub max_consecutive_losses: u32,
    pub avg_consecutive_wins: f64,
    pub avg_consecutive_losses: f64,
    /// Mean total P&L per hour of day (0–23) of the effective timestamp.
    pub hourly_pnl: BTreeMap<u32, f64>,
    /// Mean total P&L per day of week (0 = Sunday).
    pub weekday_pnl: BTreeMap<u32, f64>,
    /// Mean total P&L per calendar month, keyed by short name.
    pub monthly_pnl: BTreeMap<String, f64>,
    pub best_hour: Option<u32>,
    pub worst_hour: Option<u32>,
    pub best_weekday: Option<u32>,
    pub worst_weekday: Option<u32>,
    pub best_month: Option<String>,
    pub worst_month: Option<String>,
}

/// Analyzes streaks and time buckets over the raw trade list.
///
/// Works on total P&L signs: a profit extends the win streak and closes any
/// open loss streak, a loss is symmetric, and an exact break-even resets
/// both counters without recording either.
pub fn analyze(trades: &[Trade]) -> StreakMetrics {
    let ordered = chronological(trades);

    let (max_wins, max_losses, avg_wins, avg_losses) = streaks(&ordered);

    // Two composable stages per bucket axis: aggregation into
    // bucket -> P&L lists, then mean-and-select. Months aggregate on their
    // numeric index so tie-breaking follows calendar order, not name order.
    let hourly = bucket_means(&ordered, |t| t.effective_time().hour());
    let weekday = bucket_means(&ordered, |t| t.effective_time().weekday().num_days_from_sunday());
    let monthly = bucket_means(&ordered, |t| t.effective_time().month0());

    let (best_hour, worst_hour) = select_extremes(&hourly);
    let (best_weekday, worst_weekday) = select_extremes(&weekday);
    let (best_month_idx, worst_month_idx) = select_extremes(&monthly);

    StreakMetrics {
        max_consecutive_wins: max_wins,
        max_consecutive_losses: max_losses,
        avg_consecutive_wins: avg_wins,
        avg_consecutive_losses: avg_losses,
        hourly_pnl: hourly,
        weekday_pnl: weekday,
        monthly_pnl: monthly
            .into_iter()
            .map(|(m, pnl)| (MONTH_NAMES[m as usize].to_string(), pnl))
            .collect(),
        best_hour,
        worst_hour,
        best_weekday,
        worst_weekday,
        best_month: best_month_idx.map(|m| MONTH_NAMES[m as usize].to_string()),
        worst_month: worst_month_idx.map(|m| MONTH_NAMES[m as usize].to_string()),
    }
}

fn streaks(ordered: &[&Trade]) -> (u32, u32, f64, f64) {
    let mut win_run = 0u32;
    let mut loss_run = 0u32;
    let mut max_wins = 0u32;
    let mut max_losses = 0u32;
    let mut win_streaks: Vec<u32> = Vec::new();
    let mut loss_streaks: Vec<u32> = Vec::new();

    for trade in ordered {
        let pnl = trade.total_pnl();
        if pnl > 0.0 {
            if loss_run > 0 {
                loss_streaks.push(loss_run);
                loss_run = 0;
            }
            win_run += 1;
            max_wins = max_wins.max(win_run);
        } else if pnl < 0.0 {
            if win_run > 0 {
                win_streaks.push(win_run);
                win_run = 0;
            }
            loss_run += 1;
            max_losses = max_losses.max(loss_run);
        } else {
            // Break-even: both counters reset, neither streak is recorded.
            win_run = 0;
            loss_run = 0;
        }
    }
    // A streak still open at the end of the series counts as complete.
    if win_run > 0 {
        win_streaks.push(win_run);
    }
    if loss_run > 0 {
        loss_streaks.push(loss_run);
    }

    (
        max_wins,
        max_losses,
        mean_u32(&win_streaks),
        mean_u32(&loss_streaks),
    )
}

fn mean_u32(values: &[u32]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64
    }
}

/// Stage 1 + 2: groups total P&L by a bucket key and reduces each populated
/// bucket to its mean.
fn bucket_means<F>(ordered: &[&Trade], key: F) -> BTreeMap<u32, f64>
where
    F: Fn(&Trade) -> u32,
{
    let mut buckets: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for trade in ordered {
        buckets.entry(key(trade)).or_default().push(trade.total_pnl());
    }
    buckets
        .into_iter()
        .map(|(k, pnls)| (k, pnls.iter().sum::<f64>() / pnls.len() as f64))
        .collect()
}

/// Picks the buckets with the highest and lowest mean. Iteration ascends the
/// key order and comparisons are strict, so ties deterministically resolve
/// to the first key.
fn select_extremes(means: &BTreeMap<u32, f64>) -> (Option<u32>, Option<u32>) {
    let mut best: Option<(u32, f64)> = None;
    let mut worst: Option<(u32, f64)> = None;
    for (&key, &mean) in means {
        match best {
            Some((_, value)) if mean <= value => {}
            _ => best = Some((key, mean)),
        }
        match worst {
            Some((_, value)) if mean >= value => {}
            _ => worst = Some((key, mean)),
        }
    }
    (best.map(|(k, _)| k), worst.map(|(k, _)| k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::OrderSide;
    use uuid::Uuid;

    fn trade(close: chrono::DateTime<Utc>, profit: f64) -> Trade {
        Trade {
            id: Uuid::new_v4(),
            symbol: "EURUSD".to_string(),
            side: OrderSide::Buy,
            size: 1.0,
            open_time: close - chrono::Duration::hours(1),
            close_time: Some(close),
            open_price: 1.0,
            close_price: 1.0,
            profit,
            commission: 0.0,
            swap: 0.0,
            duration_secs: None,
        }
    }

    fn sequence(pnls: &[f64]) -> Vec<Trade> {
        pnls.iter()
            .enumerate()
            .map(|(i, &p)| {
                trade(
                    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                        + chrono::Duration::hours(i as i64),
                    p,
                )
            })
            .collect()
    }

    #[test]
    fn counts_win_and_loss_streaks() {
        let trades = sequence(&[10.0, 20.0, 30.0, -5.0, -5.0, 15.0]);
        let metrics = analyze(&trades);
        assert_eq!(metrics.max_consecutive_wins, 3);
        assert_eq!(metrics.max_consecutive_losses, 2);
        // Win streaks: [3, 1] -> mean 2; loss streaks: [2] -> mean 2.
        assert!((metrics.avg_consecutive_wins - 2.0).abs() < 1e-9);
        assert!((metrics.avg_consecutive_losses - 2.0).abs() < 1e-9);
    }

    #[test]
    fn break_even_resets_without_recording() {
        let trades = sequence(&[10.0, 10.0, 0.0, 10.0]);
        let metrics = analyze(&trades);
        assert_eq!(metrics.max_consecutive_wins, 2);
        assert_eq!(metrics.max_consecutive_losses, 0);
        // The streak interrupted by break-even is discarded; only the final
        // open streak of length 1 is recorded.
        assert!((metrics.avg_consecutive_wins - 1.0).abs() < 1e-9);
    }

    #[test]
    fn streak_totals_never_exceed_trade_count() {
        let trades = sequence(&[1.0, -1.0, 2.0, -2.0, 3.0, 0.0, -4.0]);
        let metrics = analyze(&trades);
        assert!(
            (metrics.max_consecutive_wins + metrics.max_consecutive_losses) as usize
                <= trades.len()
        );
    }

    #[test]
    fn bucket_means_group_by_hour() {
        let trades = vec![
            trade(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(), 10.0),
            trade(Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(), 30.0),
            trade(Utc.with_ymd_and_hms(2024, 1, 2, 14, 0, 0).unwrap(), -5.0),
        ];
        let metrics = analyze(&trades);
        assert_eq!(metrics.hourly_pnl.len(), 2);
        assert!((metrics.hourly_pnl[&9] - 20.0).abs() < 1e-9);
        assert!((metrics.hourly_pnl[&14] + 5.0).abs() < 1e-9);
        assert_eq!(metrics.best_hour, Some(9));
        assert_eq!(metrics.worst_hour, Some(14));
    }

    #[test]
    fn unpopulated_buckets_are_absent() {
        let trades = vec![trade(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(), 10.0)];
        let metrics = analyze(&trades);
        assert_eq!(metrics.hourly_pnl.len(), 1);
        assert!(!metrics.hourly_pnl.contains_key(&0));
    }

    #[test]
    fn ties_resolve_to_the_first_bucket() {
        let mut means = BTreeMap::new();
        means.insert(3u32, 5.0);
        means.insert(7u32, 5.0);
        let (best, worst) = select_extremes(&means);
        assert_eq!(best, Some(3));
        assert_eq!(worst, Some(3));
    }

    #[test]
    fn month_and_weekday_buckets_use_calendar_names() {
        let trades = vec![
            // 2024-01-07 is a Sunday.
            trade(Utc.with_ymd_and_hms(2024, 1, 7, 10, 0, 0).unwrap(), 50.0),
            trade(Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(), -20.0),
        ];
        let metrics = analyze(&trades);
        assert!((metrics.monthly_pnl["Jan"] - 50.0).abs() < 1e-9);
        assert!((metrics.monthly_pnl["Mar"] + 20.0).abs() < 1e-9);
        assert_eq!(metrics.best_month.as_deref(), Some("Jan"));
        assert_eq!(metrics.worst_month.as_deref(), Some("Mar"));
        assert_eq!(metrics.weekday_pnl.get(&0), Some(&50.0));
    }

    #[test]
    fn empty_history_has_no_selections() {
        let metrics = analyze(&[]);
        assert_eq!(metrics, StreakMetrics::default());
        assert_eq!(metrics.best_hour, None);
        assert_eq!(metrics.worst_month, None);
    }
}
