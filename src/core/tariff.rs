//! Peak-day classification and local tariff resolution

use super::error::{PricingError, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeakKind {
    Holiday,
    Weekend,
    Weekday,
}

impl Display for PeakKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PeakKind::Holiday => "Holiday",
                PeakKind::Weekend => "Weekend",
                PeakKind::Weekday => "Weekday",
            }
        )
    }
}

/// What to do when a room type is not in the tariff table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownRoomTypePolicy {
    #[default]
    Fail,
    Fallback,
}

/// Tier prices as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierPrices {
    pub base_price: f64,
    pub weekend_price: f64,
    pub holiday_price: f64,
}

impl TierPrices {
    pub const fn new(base_price: f64, weekend_price: f64, holiday_price: f64) -> Self {
        Self {
            base_price,
            weekend_price,
            holiday_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomTariff {
    pub room_type_id: String,
    pub base_price: f64,
    pub weekend_price: f64,
    pub holiday_price: f64,
}

impl RoomTariff {
    pub fn price_for(&self, kind: PeakKind) -> f64 {
        match kind {
            PeakKind::Holiday => self.holiday_price,
            PeakKind::Weekend => self.weekend_price,
            PeakKind::Weekday => self.base_price,
        }
    }
}

/// Closed set of room tariffs keyed by room type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TariffTable {
    tariffs: BTreeMap<String, RoomTariff>,
}

impl TariffTable {
    pub fn from_tiers(tiers: &BTreeMap<String, TierPrices>) -> Self {
        let tariffs = tiers
            .iter()
            .map(|(id, tier)| {
                (
                    id.clone(),
                    RoomTariff {
                        room_type_id: id.clone(),
                        base_price: tier.base_price,
                        weekend_price: tier.weekend_price,
                        holiday_price: tier.holiday_price,
                    },
                )
            })
            .collect();
        Self { tariffs }
    }

    pub fn get(&self, room_type_id: &str) -> Option<&RoomTariff> {
        self.tariffs.get(room_type_id)
    }

    pub fn room_types(&self) -> impl Iterator<Item = &str> {
        self.tariffs.keys().map(String::as_str)
    }
}

/// Current rack rates per room type.
pub fn default_current_tiers() -> BTreeMap<String, TierPrices> {
    BTreeMap::from([
        ("standard".to_string(), TierPrices::new(120.0, 150.0, 180.0)),
        ("deluxe".to_string(), TierPrices::new(180.0, 220.0, 260.0)),
        ("suite".to_string(), TierPrices::new(250.0, 300.0, 350.0)),
        (
            "presidential".to_string(),
            TierPrices::new(450.0, 550.0, 650.0),
        ),
    ])
}

/// Offline predicted rates per room type.
pub fn default_predicted_tiers() -> BTreeMap<String, TierPrices> {
    BTreeMap::from([
        ("standard".to_string(), TierPrices::new(125.0, 160.0, 185.0)),
        ("deluxe".to_string(), TierPrices::new(190.0, 230.0, 270.0)),
        ("suite".to_string(), TierPrices::new(260.0, 310.0, 360.0)),
        (
            "presidential".to_string(),
            TierPrices::new(470.0, 570.0, 670.0),
        ),
    ])
}

pub fn default_holidays() -> Vec<NaiveDate> {
    [(2025, 1, 1), (2025, 7, 4), (2025, 12, 25)]
        .into_iter()
        .filter_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HolidaySet {
    days: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    pub fn new(days: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }
}

/// Resolves the applicable tariff tier for a day and room type.
#[derive(Debug, Clone)]
pub struct PriceResolver {
    tariffs: TariffTable,
    holidays: Arc<HolidaySet>,
    policy: UnknownRoomTypePolicy,
    fallback_room_type: String,
}

impl PriceResolver {
    pub fn new(tariffs: TariffTable, holidays: Arc<HolidaySet>) -> Self {
        Self {
            tariffs,
            holidays,
            policy: UnknownRoomTypePolicy::Fail,
            fallback_room_type: "standard".to_string(),
        }
    }

    pub fn with_policy(mut self, policy: UnknownRoomTypePolicy, fallback_room_type: &str) -> Self {
        self.policy = policy;
        self.fallback_room_type = fallback_room_type.to_string();
        self
    }

    pub fn tariffs(&self) -> &TariffTable {
        &self.tariffs
    }

    /// Holiday takes precedence over weekend, weekend over weekday.
    pub fn classify(&self, date: NaiveDate) -> PeakKind {
        if self.holidays.contains(date) {
            PeakKind::Holiday
        } else if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            PeakKind::Weekend
        } else {
            PeakKind::Weekday
        }
    }

    /// Looks up a room tariff, applying the unknown room type policy.
    pub fn tariff_for(&self, room_type_id: &str) -> Result<&RoomTariff> {
        if let Some(tariff) = self.tariffs.get(room_type_id) {
            return Ok(tariff);
        }
        match self.policy {
            UnknownRoomTypePolicy::Fail => {
                Err(PricingError::UnknownRoomType(room_type_id.to_string()))
            }
            UnknownRoomTypePolicy::Fallback => {
                warn!(
                    room_type = room_type_id,
                    fallback = %self.fallback_room_type,
                    "Unknown room type, using fallback tariff"
                );
                self.tariffs
                    .get(&self.fallback_room_type)
                    .ok_or_else(|| PricingError::UnknownRoomType(room_type_id.to_string()))
            }
        }
    }

    pub fn resolve_local_price(&self, date: NaiveDate, room_type_id: &str) -> Result<f64> {
        let tariff = self.tariff_for(room_type_id)?;
        Ok(tariff.price_for(self.classify(date)))
    }

    pub fn resolve_reason(&self, date: NaiveDate, room_type_id: &str) -> String {
        match self.classify(date) {
            PeakKind::Holiday => format!(
                "Increased pricing due to a holiday. High demand expected for {room_type_id}."
            ),
            PeakKind::Weekend => {
                format!("Weekend surge pricing applied. Higher demand for {room_type_id}.")
            }
            PeakKind::Weekday => {
                "Standard weekday pricing applied based on past trends and competitor rates."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolver() -> PriceResolver {
        PriceResolver::new(
            TariffTable::from_tiers(&default_current_tiers()),
            Arc::new(HolidaySet::new(default_holidays())),
        )
    }

    #[test]
    fn test_classify() {
        let resolver = resolver();

        // 2025-03-04 is a Tuesday
        assert_eq!(resolver.classify(day(2025, 3, 4)), PeakKind::Weekday);
        assert_eq!(resolver.classify(day(2025, 3, 8)), PeakKind::Weekend);
        assert_eq!(resolver.classify(day(2025, 3, 9)), PeakKind::Weekend);
        assert_eq!(resolver.classify(day(2025, 7, 4)), PeakKind::Holiday);
    }

    #[test]
    fn test_holiday_wins_over_weekend() {
        // 2026-07-04 is a Saturday
        let saturday = day(2026, 7, 4);
        let resolver = PriceResolver::new(
            TariffTable::from_tiers(&default_current_tiers()),
            Arc::new(HolidaySet::new([saturday])),
        );

        assert_eq!(resolver.classify(saturday), PeakKind::Holiday);
        assert_eq!(resolver.resolve_local_price(saturday, "deluxe").unwrap(), 260.0);
    }

    #[test]
    fn test_resolve_local_price_tiers() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve_local_price(day(2025, 3, 4), "standard").unwrap(),
            120.0
        );
        assert_eq!(
            resolver.resolve_local_price(day(2025, 3, 8), "standard").unwrap(),
            150.0
        );
        assert_eq!(
            resolver.resolve_local_price(day(2025, 7, 4), "standard").unwrap(),
            180.0
        );
        assert_eq!(
            resolver.resolve_local_price(day(2025, 12, 25), "presidential").unwrap(),
            650.0
        );
    }

    #[test]
    fn test_unknown_room_type_fails_by_default() {
        let resolver = resolver();
        let err = resolver
            .resolve_local_price(day(2025, 3, 4), "penthouse")
            .unwrap_err();

        assert_eq!(err, PricingError::UnknownRoomType("penthouse".to_string()));
    }

    #[test]
    fn test_unknown_room_type_fallback() {
        let resolver = resolver().with_policy(UnknownRoomTypePolicy::Fallback, "deluxe");

        assert_eq!(
            resolver.resolve_local_price(day(2025, 3, 4), "penthouse").unwrap(),
            180.0
        );
    }

    /// Counts WARN events emitted while it is the default subscriber.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_fallback_substitution_is_logged() {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        let resolver = resolver().with_policy(UnknownRoomTypePolicy::Fallback, "deluxe");

        tracing::subscriber::with_default(subscriber, || {
            resolver.resolve_local_price(day(2025, 3, 4), "suite").unwrap();
            assert_eq!(warnings.load(Ordering::SeqCst), 0);

            resolver.resolve_local_price(day(2025, 3, 4), "penthouse").unwrap();
            assert_eq!(warnings.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn test_fallback_to_missing_room_type_still_fails() {
        let resolver = resolver().with_policy(UnknownRoomTypePolicy::Fallback, "cabin");

        assert!(resolver.resolve_local_price(day(2025, 3, 4), "penthouse").is_err());
    }

    #[test]
    fn test_resolve_reason() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve_reason(day(2025, 7, 4), "suite"),
            "Increased pricing due to a holiday. High demand expected for suite."
        );
        assert_eq!(
            resolver.resolve_reason(day(2025, 3, 8), "suite"),
            "Weekend surge pricing applied. Higher demand for suite."
        );
        assert!(
            resolver
                .resolve_reason(day(2025, 3, 4), "suite")
                .starts_with("Standard weekday pricing")
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let resolver = resolver();
        let date = day(2025, 3, 8);

        assert_eq!(resolver.classify(date), resolver.classify(date));
        assert_eq!(
            resolver.resolve_local_price(date, "suite").unwrap(),
            resolver.resolve_local_price(date, "suite").unwrap()
        );
        assert_eq!(
            resolver.resolve_reason(date, "suite"),
            resolver.resolve_reason(date, "suite")
        );
    }
}
