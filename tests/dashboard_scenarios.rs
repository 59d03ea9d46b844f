mod common;

use std::str::FromStr;

use rust_decimal::Decimal;

use trustbridge::dashboard::{
    calculate_dashboard_metrics, calculate_percentage_change, fetch_dashboard_data,
    format_currency, ChangeType, DEFAULT_BORROW_HAIRCUT,
};
use trustbridge::models::Position;
use trustbridge::positions::MockPositionSource;

#[test]
fn test_format_currency() {
    assert_eq!(format_currency(Decimal::from_str("1234.56").unwrap()), "$1,235");
    assert_eq!(format_currency(Decimal::ZERO), "$0");
    assert_eq!(format_currency(Decimal::from(1_000_000)), "$1,000,000");
}

#[test]
fn test_metrics_for_mixed_positions() {
    let metrics = calculate_dashboard_metrics(&common::sample_positions());

    assert_eq!(metrics.total_supplied, Decimal::from(150_000));
    assert_eq!(metrics.total_borrowed, Decimal::from(25_000));
    assert_eq!(metrics.active_loans, 1);
    assert_eq!(metrics.available_balance, Decimal::from(130_000));
}

#[test]
fn test_metrics_for_empty_positions() {
    let metrics = calculate_dashboard_metrics(&[]);

    assert_eq!(metrics.total_supplied, Decimal::ZERO);
    assert_eq!(metrics.total_borrowed, Decimal::ZERO);
    assert_eq!(metrics.active_loans, 0);
    assert_eq!(metrics.available_balance, Decimal::ZERO);
}

#[test]
fn test_percentage_changes() {
    let cases = [
        (110, 100, "+10.0%", ChangeType::Positive),
        (90, 100, "-10.0%", ChangeType::Negative),
        (100, 0, "0%", ChangeType::Neutral),
        (100, 100, "+0.0%", ChangeType::Neutral),
    ];

    for (current, previous, value, change_type) in cases {
        let change = calculate_percentage_change(Decimal::from(current), Decimal::from(previous));
        assert_eq!(change.value, value, "{current} vs {previous}");
        assert_eq!(change.change_type, change_type, "{current} vs {previous}");
    }
}

#[test]
fn test_haircut_invariant_over_varied_lists() {
    let mut positions: Vec<Position> = Vec::new();

    for (supplied, borrowed) in [(0, 0), (10, 0), (5, 40), (1_000, 999), (0, 1_000_000)] {
        positions.push(Position {
            asset: format!("A{supplied}_{borrowed}"),
            symbol: "TKN".into(),
            supplied: Decimal::from(supplied),
            borrowed: Decimal::from(borrowed),
            collateral: borrowed % 2 == 0,
            apy: Decimal::ONE,
            usd_value: Decimal::from(supplied),
        });

        let metrics = calculate_dashboard_metrics(&positions);
        let expected = (metrics.total_supplied - metrics.total_borrowed * DEFAULT_BORROW_HAIRCUT)
            .max(Decimal::ZERO);

        assert_eq!(metrics.available_balance, expected);
        assert!(metrics.available_balance >= Decimal::ZERO);
        assert_eq!(
            metrics.active_loans as usize,
            positions.iter().filter(|p| p.borrowed > Decimal::ZERO).count()
        );
    }
}

#[tokio::test]
async fn test_assembler_end_to_end() {
    let source = MockPositionSource::with_positions(common::sample_positions());

    let data = fetch_dashboard_data(&source, "GWALLET", DEFAULT_BORROW_HAIRCUT)
        .await
        .unwrap();
    assert_eq!(data.metrics.available_balance, Decimal::from(130_000));
    assert_eq!(data.positions, common::sample_positions());

    let empty = fetch_dashboard_data(&source, "", DEFAULT_BORROW_HAIRCUT)
        .await
        .unwrap();
    assert!(empty.positions.is_empty());
    assert_eq!(empty.metrics.active_loans, 0);
}
