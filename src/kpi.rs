//! KPI Calculator
//!
//! Ex-post economic interpretation of already-solved series. Pure and
//! stateless; a length mismatch between the inputs is a bug upstream, not a
//! recoverable condition.

/// Portion of PV output absorbed by battery charging instead of exported,
/// per period in MW: `max(0, min(p, pv))`. Bounded above by both the charge
/// rate and the available PV; zero whenever the battery is discharging.
pub fn pv_to_battery(power_mw: &[f64], pv_mw: &[f64]) -> Vec<f64> {
    assert_eq!(
        power_mw.len(),
        pv_mw.len(),
        "power and PV sequences must be index-aligned"
    );
    power_mw
        .iter()
        .zip(pv_mw)
        .map(|(&p, &pv)| p.min(pv).max(0.0))
        .collect()
}

/// Estimated trading-cost saving from internally matching PV generation
/// against battery charging, instead of executing both legs on the market
/// and paying the bid-ask spread on each.
pub fn prevented_slippage(average_bid_ask_spread_eur_mwh: f64, pv_to_battery_mw: &[f64]) -> Vec<f64> {
    pv_to_battery_mw
        .iter()
        .map(|flow| average_bid_ask_spread_eur_mwh * flow)
        .collect()
}
