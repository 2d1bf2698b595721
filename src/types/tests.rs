use super::Money;
use anyhow::Result;

#[test]
fn test_money_converts_minor_units_to_major_display() {
    let test_cases = vec![
        (2500, "25.00"),
        (0, "0.00"),
        (1, "0.01"),
        (99, "0.99"),
        (100, "1.00"),
        (-150, "-1.50"),
        (1000000, "10000.00"),
    ];

    for (minor, expected) in test_cases {
        assert_eq!(Money::from_minor(minor).to_string(), expected);
    }
}

#[test]
fn test_money_supports_exact_accumulation() {
    let mut total = Money::zero();
    total += Money::from_minor(1050);
    total += Money::from_minor(25);

    assert_eq!(total.to_string(), "10.75");
    assert_eq!(total.minor_units(), 1075);
}

#[test]
fn test_money_sum_over_iterator_matches_total() {
    let amounts = vec![Money::from_minor(100), Money::from_minor(250), Money::from_minor(3)];
    let total: Money = amounts.into_iter().sum();

    assert_eq!(total.minor_units(), 353);
}

#[test]
fn test_money_checked_add_detects_overflow() {
    assert!(Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)).is_none());
    assert!(Money::from_minor(1).checked_add(Money::from_minor(2)).is_some());
}

#[test]
fn test_money_serializes_as_major_unit_number() -> Result<()> {
    let serialized = serde_json::to_value(Money::from_minor(2500))?;
    assert_eq!(serialized, serde_json::json!(25.0));

    let serialized = serde_json::to_value(Money::zero())?;
    assert_eq!(serialized, serde_json::json!(0.0));

    Ok(())
}
