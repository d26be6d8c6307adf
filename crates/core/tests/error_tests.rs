// ═══════════════════════════════════════════════════════════════════
// Error Tests — display formatting and conversions
// ═══════════════════════════════════════════════════════════════════

use std::path::PathBuf;

use stock_tracker_core::errors::CoreError;

mod display {
    use super::*;

    #[test]
    fn invalid_argument_carries_the_detail() {
        let err = CoreError::InvalidArgument("purchase_price must be positive".into());
        assert_eq!(
            err.to_string(),
            "Invalid argument: purchase_price must be positive"
        );
    }

    #[test]
    fn corrupt_ledger_names_the_file() {
        let err = CoreError::CorruptLedger {
            path: PathBuf::from("/data/TSLA/stockPurchaseHistory.json"),
            detail: "expected object at line 1".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("stockPurchaseHistory.json"));
        assert!(rendered.contains("expected object at line 1"));
    }

    #[test]
    fn missing_base_directory_is_self_describing() {
        let rendered = CoreError::MissingBaseDirectory.to_string();
        assert!(rendered.contains("base directory"));
    }

    #[test]
    fn conversion_names_both_currencies() {
        let err = CoreError::Conversion {
            from: "EUR".into(),
            to: "ZAR".into(),
            detail: "rate service unavailable".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("EUR"));
        assert!(rendered.contains("ZAR"));
        assert!(rendered.contains("rate service unavailable"));
    }

    #[test]
    fn price_not_available_names_symbol_and_date() {
        let err = CoreError::PriceNotAvailable {
            symbol: "SOL.JO".into(),
            date: "2024-01-15".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("SOL.JO"));
        assert!(rendered.contains("2024-01-15"));
    }

    #[test]
    fn api_error_names_the_provider() {
        let err = CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: "quoteSummary returned no modules".into(),
        };
        assert!(err.to_string().contains("Yahoo Finance"));
    }
}

mod conversions {
    use super::*;

    #[test]
    fn io_errors_become_file_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CoreError::from(io);
        assert!(matches!(err, CoreError::FileIO(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn serde_errors_become_serialization() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = CoreError::from(serde_err);
        assert!(matches!(err, CoreError::Serialization(_)));
    }
}
