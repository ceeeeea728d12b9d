use core_types::Trade;

/// Returns the trades in chronological order by effective time (close time,
/// falling back to open time). The sort is stable, so trades sharing a
/// timestamp keep their input order and the whole pipeline stays
/// deterministic.
pub fn chronological(trades: &[Trade]) -> Vec<&Trade> {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| t.effective_time());
    ordered
}

/// Normalizes a trade history into a per-trade return series and the running
/// equity curve. Trades may arrive in any order; they are sorted by
/// effective time first.
///
/// Returns are percentages of the account balance at the moment of each
/// trade: `total_pnl / running_balance * 100`. The curve is seeded with
/// `initial_balance`, so it always holds one more point than there are
/// trades. Balances are deliberately not clamped at zero; a strategy that
/// simulates insolvency must reproduce it.
pub fn build(trades: &[Trade], initial_balance: f64) -> (Vec<f64>, Vec<f64>) {
    let ordered = chronological(trades);
    let mut returns = Vec::with_capacity(ordered.len());
    let mut equity_curve = Vec::with_capacity(ordered.len() + 1);

    let mut running_balance = initial_balance;
    equity_curve.push(running_balance);

    for trade in ordered {
        let total_pnl = trade.total_pnl();
        // A zero balance has no meaningful percentage return; define it as 0
        // rather than letting the division produce an infinity.
        let return_pct = if running_balance == 0.0 {
            0.0
        } else {
            total_pnl / running_balance * 100.0
        };
        returns.push(return_pct);
        running_balance += total_pnl;
        equity_curve.push(running_balance);
    }

    (returns, equity_curve)
}
