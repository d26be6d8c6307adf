// ═══════════════════════════════════════════════════════════════════
// Model Tests — records, ledger, metadata snapshot, price correction
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use stock_tracker_core::models::ledger::{Ledger, PurchaseRecord, RoguePurchaseRecord};
use stock_tracker_core::models::metadata::{StockMetadata, ALLOWED_INFO_KEYS};
use stock_tracker_core::models::price::{correct_subunit_prices, OhlcBar};
use stock_tracker_core::models::settings::StockConfig;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn purchase(date: NaiveDate, price: f64, shares: f64, currency: &str) -> PurchaseRecord {
    PurchaseRecord {
        date,
        purchase_price: price,
        shares_purchased: shares,
        price_per_share: price / shares,
        currency: currency.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PurchaseRecord
// ═══════════════════════════════════════════════════════════════════

mod purchase_record {
    use super::*;

    #[test]
    fn price_per_share_invariant() {
        let r = purchase(d(2024, 3, 1), 1000.0, 10.0, "USD");
        assert!((r.price_per_share - r.purchase_price / r.shares_purchased).abs() < f64::EPSILON);
    }

    #[test]
    fn serde_date_uses_day_precision_iso_format() {
        let r = purchase(d(2024, 3, 1), 1000.0, 10.0, "USD");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["date"], "2024-03-01");
    }

    #[test]
    fn serde_round_trip() {
        let r = purchase(d(2023, 12, 31), 250.5, 2.5, "EUR");
        let json = serde_json::to_string(&r).unwrap();
        let back: PurchaseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn identical_records_are_equal_but_distinct_rows() {
        // No identity key: duplicates are legal and compare equal
        let a = purchase(d(2024, 1, 1), 100.0, 1.0, "USD");
        let b = purchase(d(2024, 1, 1), 100.0, 1.0, "USD");
        assert_eq!(a, b);
        let ledger = Ledger::new(vec![a, b], vec![]);
        assert_eq!(ledger.record_count(), 2);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Ledger
// ═══════════════════════════════════════════════════════════════════

mod ledger {
    use super::*;

    #[test]
    fn default_is_empty() {
        let ledger = Ledger::default();
        assert!(ledger.is_empty());
        assert_eq!(ledger.record_count(), 0);
    }

    #[test]
    fn counts_both_record_sets() {
        let rogue = RoguePurchaseRecord {
            purchase_price: 50.0,
            shares_purchased: 0.5,
            price_per_share: 100.0,
            currency: "USD".into(),
        };
        let ledger = Ledger::new(vec![purchase(d(2024, 1, 1), 100.0, 1.0, "USD")], vec![rogue]);
        assert!(!ledger.is_empty());
        assert_eq!(ledger.record_count(), 2);
    }

    #[test]
    fn rogue_only_ledger_is_not_empty() {
        let rogue = RoguePurchaseRecord {
            purchase_price: 50.0,
            shares_purchased: 0.5,
            price_per_share: 100.0,
            currency: "USD".into(),
        };
        let ledger = Ledger::new(vec![], vec![rogue]);
        assert!(!ledger.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  StockMetadata
// ═══════════════════════════════════════════════════════════════════

mod metadata {
    use super::*;

    fn raw_info() -> Map<String, Value> {
        let mut raw = Map::new();
        raw.insert("sector".into(), json!("Technology"));
        raw.insert("financialCurrency".into(), json!("USD"));
        raw.insert("symbol".into(), json!("TSLA"));
        raw.insert("shortName".into(), json!("Tesla, Inc."));
        raw.insert("exchange".into(), json!("NMS"));
        raw.insert("fullTimeEmployees".into(), json!(140473));
        raw
    }

    #[test]
    fn keeps_only_allow_listed_keys() {
        let mut raw = raw_info();
        raw.insert("regularMarketPrice".into(), json!(242.8));
        raw.insert("sharesOutstanding".into(), json!(3_178_920_000u64));

        let snapshot = StockMetadata::from_provider(&raw);
        assert_eq!(snapshot.field_count(), 6);
        assert!(snapshot.get("regularMarketPrice").is_none());
        assert!(snapshot.get("sharesOutstanding").is_none());
    }

    #[test]
    fn absent_keys_are_omitted_not_null_filled() {
        let snapshot = StockMetadata::from_provider(&raw_info());
        // No placeholder for keys the provider didn't return
        assert!(snapshot.get("logo_url").is_none());
        assert!(snapshot.get("website").is_none());
    }

    #[test]
    fn null_values_are_dropped() {
        let mut raw = raw_info();
        raw.insert("website".into(), Value::Null);
        let snapshot = StockMetadata::from_provider(&raw);
        assert!(snapshot.get("website").is_none());
    }

    #[test]
    fn typed_accessors() {
        let snapshot = StockMetadata::from_provider(&raw_info());
        assert_eq!(snapshot.financial_currency(), Some("USD"));
        assert_eq!(snapshot.symbol(), Some("TSLA"));
        assert_eq!(snapshot.exchange(), Some("NMS"));
        assert_eq!(snapshot.short_name(), Some("Tesla, Inc."));
    }

    #[test]
    fn from_stored_refilters_stale_keys() {
        let mut stored = raw_info();
        stored.insert("deprecatedField".into(), json!("junk"));
        let snapshot = StockMetadata::from_stored(&stored);
        assert!(snapshot.get("deprecatedField").is_none());
        assert_eq!(snapshot.field_count(), 6);
    }

    #[test]
    fn allow_list_covers_financial_currency() {
        assert!(ALLOWED_INFO_KEYS.contains(&"financialCurrency"));
        assert!(ALLOWED_INFO_KEYS.contains(&"symbol"));
    }

    #[test]
    fn empty_provider_response_gives_empty_snapshot() {
        let snapshot = StockMetadata::from_provider(&Map::new());
        assert_eq!(snapshot.field_count(), 0);
        assert!(snapshot.financial_currency().is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Sub-unit price correction
// ═══════════════════════════════════════════════════════════════════

mod price_correction {
    use super::*;

    fn bar(date: NaiveDate, close: f64) -> OhlcBar {
        OhlcBar {
            date,
            open: close,
            high: close * 1.1,
            low: close * 0.9,
            close,
        }
    }

    #[test]
    fn divides_close_by_one_hundred() {
        let mut bars = vec![bar(d(2024, 1, 1), 100.0), bar(d(2024, 1, 2), 200.0)];
        correct_subunit_prices(&mut bars);
        assert_eq!(bars[0].close, 1.0);
        assert_eq!(bars[1].close, 2.0);
    }

    #[test]
    fn applies_uniformly_to_all_ohlc_fields() {
        let mut bars = vec![OhlcBar {
            date: d(2024, 1, 1),
            open: 1000.0,
            high: 1200.0,
            low: 900.0,
            close: 1100.0,
        }];
        correct_subunit_prices(&mut bars);
        assert_eq!(bars[0].open, 10.0);
        assert_eq!(bars[0].high, 12.0);
        assert_eq!(bars[0].low, 9.0);
        assert_eq!(bars[0].close, 11.0);
    }

    #[test]
    fn empty_series_is_a_no_op() {
        let mut bars: Vec<OhlcBar> = vec![];
        correct_subunit_prices(&mut bars);
        assert!(bars.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  StockConfig
// ═══════════════════════════════════════════════════════════════════

mod config {
    use super::*;

    #[test]
    fn default_values() {
        let config = StockConfig::default();
        assert!(config.display_currency.is_none());
        assert!(config.base_dir.is_none());
        assert!(!config.subunit_quoted);
        assert!(!config.lenient_ledger_parse);
    }

    #[test]
    fn builder_chain() {
        let config = StockConfig::default()
            .with_display_currency("zar")
            .with_base_dir("/tmp/stocks")
            .subunit_quoted(true)
            .lenient_ledger_parse(true);
        assert_eq!(config.display_currency.as_deref(), Some("ZAR"));
        assert_eq!(
            config.base_dir.as_deref(),
            Some(std::path::Path::new("/tmp/stocks"))
        );
        assert!(config.subunit_quoted);
        assert!(config.lenient_ledger_parse);
    }
}
