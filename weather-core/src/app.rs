//! Application shell: owns the current record, the unit and the error flag.
//!
//! Every state transition is persisted immediately. Lookups are tagged with a
//! generation so that a response arriving after a newer lookup or a removal
//! is dropped instead of overwriting newer state.

use anyhow::Result;
use tracing::{info, warn};

use crate::{
    display::{render_card, toggle_label},
    model::{Unit, WeatherRecord},
    provider::{LookupError, WeatherProvider},
    storage::{SlotStore, WeatherStore},
    unit::UnitContext,
};

/// Handle for one in-flight lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    generation: u64,
    city: String,
}

impl LookupTicket {
    pub fn city(&self) -> &str {
        &self.city
    }
}

/// What happened to a finished lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The record replaced the current state.
    Applied,
    /// The lookup failed; the error flag is set and state is unchanged.
    Failed,
    /// A newer lookup or a removal happened meanwhile; the result was dropped.
    Discarded,
}

#[derive(Debug)]
pub struct WeatherApp<S> {
    store: WeatherStore<S>,
    record: Option<WeatherRecord>,
    units: UnitContext,
    error: bool,
    generation: u64,
}

impl<S: SlotStore> WeatherApp<S> {
    /// Restore the persisted record, falling back to the default one.
    pub fn start(slots: S) -> Result<Self> {
        Self::start_with_unit(slots, Unit::default())
    }

    pub fn start_with_unit(slots: S, unit: Unit) -> Result<Self> {
        let store = WeatherStore::new(slots);
        let record = match store.load()? {
            Some(record) => {
                info!(city = %record.city, "restored persisted weather record");
                record
            }
            None => WeatherRecord::default(),
        };

        Ok(Self {
            store,
            record: Some(record),
            units: UnitContext::new(unit),
            error: false,
            generation: 0,
        })
    }

    pub fn record(&self) -> Option<&WeatherRecord> {
        self.record.as_ref()
    }

    pub fn unit(&self) -> Unit {
        self.units.unit()
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn toggle_unit(&mut self) -> Unit {
        self.units.toggle()
    }

    /// Start a lookup. Any lookup started earlier becomes stale.
    pub fn begin_lookup(&mut self, city: &str) -> LookupTicket {
        self.generation += 1;
        LookupTicket { generation: self.generation, city: city.to_string() }
    }

    /// Apply the result of a lookup started with `begin_lookup`.
    pub fn finish_lookup(
        &mut self,
        ticket: LookupTicket,
        result: Result<WeatherRecord, LookupError>,
    ) -> Result<LookupOutcome> {
        if ticket.generation != self.generation {
            warn!(
                city = %ticket.city,
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale lookup response"
            );
            return Ok(LookupOutcome::Discarded);
        }

        match result {
            Ok(record) => {
                info!(city = %record.city, "showing new weather record");
                self.error = false;
                self.set_record(Some(record))?;
                Ok(LookupOutcome::Applied)
            }
            Err(e) => {
                warn!(city = %ticket.city, error = %e, "weather lookup failed");
                self.error = true;
                Ok(LookupOutcome::Failed)
            }
        }
    }

    /// Look up `city` and apply the result.
    pub async fn search<P>(&mut self, provider: &P, city: &str) -> Result<LookupOutcome>
    where
        P: WeatherProvider + ?Sized,
    {
        let ticket = self.begin_lookup(city);
        let result = provider.lookup(city).await;
        self.finish_lookup(ticket, result)
    }

    /// Drop the current record and clear the persisted slot.
    pub fn remove(&mut self) -> Result<()> {
        self.generation += 1;
        info!("removing weather record");
        self.set_record(None)
    }

    fn set_record(&mut self, record: Option<WeatherRecord>) -> Result<()> {
        self.record = record;
        self.store.save(self.record.as_ref())
    }

    /// Full screen: title, search hint, unit switch, error line and card.
    pub fn render(&self) -> String {
        let unit = self.unit();
        let mut lines = vec![
            "Weather App".to_string(),
            "City Name: <type a city to add it>".to_string(),
            format!("[{}]", toggle_label(unit)),
        ];

        if self.error {
            lines.push(LookupError::USER_MESSAGE.to_string());
        }

        if let Some(record) = &self.record {
            lines.push(String::new());
            lines.push(render_card(record, unit));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Classification, display::classify, storage::{MemorySlotStore, SLOT_KEY}};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FixedProvider(Option<WeatherRecord>);

    #[async_trait]
    impl WeatherProvider for FixedProvider {
        async fn lookup(&self, city: &str) -> Result<WeatherRecord, LookupError> {
            match &self.0 {
                Some(record) => Ok(WeatherRecord { city: city.to_string(), ..record.clone() }),
                None => Err(LookupError::Status { status: 404, body: "city not found".into() }),
            }
        }
    }

    fn cold() -> WeatherRecord {
        WeatherRecord {
            city: String::new(),
            temp: 10.0,
            temp_min: 9.0,
            temp_max: 11.0,
            feels_like: 8.0,
            humidity: 50.0,
            weather: "mist".into(),
        }
    }

    #[test]
    fn fresh_start_shows_default_record() {
        let app = WeatherApp::start(MemorySlotStore::new()).unwrap();

        assert_eq!(app.record(), Some(&WeatherRecord::default()));
        assert_eq!(app.unit(), Unit::Celsius);
        assert!(!app.has_error());
        assert!(app.render().contains("Temperature = 32.84°C"));
    }

    #[test]
    fn start_restores_persisted_record() {
        let slots = MemorySlotStore::new();
        let saved = WeatherRecord { city: "Oslo".into(), ..cold() };
        WeatherStore::new(&slots).save(Some(&saved)).unwrap();

        let app = WeatherApp::start(&slots).unwrap();
        assert_eq!(app.record(), Some(&saved));
    }

    #[tokio::test]
    async fn successful_search_replaces_and_persists() {
        let slots = MemorySlotStore::new();
        let mut app = WeatherApp::start(&slots).unwrap();

        let outcome = app.search(&FixedProvider(Some(cold())), "Paris").await.unwrap();

        assert_eq!(outcome, LookupOutcome::Applied);
        let record = app.record().unwrap();
        assert_eq!(record.city, "Paris");
        assert_eq!(classify(record.temp, record.humidity), Classification::Cold);
        assert_eq!(WeatherStore::new(&slots).load().unwrap().as_ref(), Some(record));
    }

    #[tokio::test]
    async fn failed_search_sets_flag_and_keeps_state() {
        let slots = MemorySlotStore::new();
        let mut app = WeatherApp::start(&slots).unwrap();

        let outcome = app.search(&FixedProvider(None), "Atlantis").await.unwrap();

        assert_eq!(outcome, LookupOutcome::Failed);
        assert!(app.has_error());
        assert_eq!(app.record(), Some(&WeatherRecord::default()));
        assert!(app.render().contains("No such place exists!"));
        assert_eq!(slots.read(SLOT_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn success_clears_previous_error() {
        let mut app = WeatherApp::start(MemorySlotStore::new()).unwrap();

        app.search(&FixedProvider(None), "Atlantis").await.unwrap();
        app.search(&FixedProvider(Some(cold())), "Paris").await.unwrap();

        assert!(!app.has_error());
        assert!(!app.render().contains("No such place exists!"));
    }

    #[test]
    fn remove_clears_state_and_slot() {
        let slots = MemorySlotStore::new();
        let mut app = WeatherApp::start(&slots).unwrap();
        let ticket = app.begin_lookup("Paris");
        app.finish_lookup(ticket, Ok(WeatherRecord { city: "Paris".into(), ..cold() })).unwrap();
        assert!(slots.read(SLOT_KEY).unwrap().is_some());

        app.remove().unwrap();

        assert_eq!(app.record(), None);
        assert_eq!(slots.read(SLOT_KEY).unwrap(), None);
        assert!(!app.render().contains("Temperature ="));
    }

    #[test]
    fn response_after_removal_is_discarded() {
        let mut app = WeatherApp::start(MemorySlotStore::new()).unwrap();

        let ticket = app.begin_lookup("Paris");
        app.remove().unwrap();
        let outcome = app.finish_lookup(ticket, Ok(cold())).unwrap();

        assert_eq!(outcome, LookupOutcome::Discarded);
        assert_eq!(app.record(), None);
    }

    #[test]
    fn only_latest_lookup_is_applied() {
        let mut app = WeatherApp::start(MemorySlotStore::new()).unwrap();

        let first = app.begin_lookup("Paris");
        let second = app.begin_lookup("Rome");
        assert_eq!(second.city(), "Rome");

        let rome = WeatherRecord { city: "Rome".into(), ..cold() };
        assert_eq!(app.finish_lookup(second, Ok(rome.clone())).unwrap(), LookupOutcome::Applied);

        let paris = WeatherRecord { city: "Paris".into(), ..cold() };
        assert_eq!(app.finish_lookup(first, Ok(paris)).unwrap(), LookupOutcome::Discarded);
        assert_eq!(app.record(), Some(&rome));
    }

    #[test]
    fn stale_failure_does_not_raise_error_flag() {
        let mut app = WeatherApp::start(MemorySlotStore::new()).unwrap();

        let ticket = app.begin_lookup("Atlantis");
        app.remove().unwrap();
        app.finish_lookup(ticket, Err(LookupError::EmptyCity)).unwrap();

        assert!(!app.has_error());
    }

    #[test]
    fn toggle_relabels_switch_and_converts_card() {
        let mut app = WeatherApp::start(MemorySlotStore::new()).unwrap();
        assert!(app.render().contains("[Switch to Fahrenheit]"));

        assert_eq!(app.toggle_unit(), Unit::Fahrenheit);
        let view = app.render();
        assert!(view.contains("[Switch to Celsius]"));
        assert!(view.contains("Temperature = 91.11°F"));
        // Stored record stays in Celsius.
        assert_eq!(app.record().unwrap().temp, 32.84);
    }

    #[test]
    fn render_without_record_lists_header_and_error() {
        let mut app = WeatherApp::start(MemorySlotStore::new()).unwrap();
        app.remove().unwrap();
        let ticket = app.begin_lookup("Atlantis");
        app.finish_lookup(ticket, Err(LookupError::EmptyCity)).unwrap();

        assert_eq!(
            app.render(),
            "Weather App\n\
             City Name: <type a city to add it>\n\
             [Switch to Fahrenheit]\n\
             No such place exists!\n"
        );
    }

    #[test]
    fn render_separates_card_with_blank_line() {
        let app = WeatherApp::start(MemorySlotStore::new()).unwrap();
        let view = app.render();

        assert!(view.contains("[Switch to Fahrenheit]\n\nDelhi ☀\n"));
        assert!(view.ends_with("feels like 39.84°C\n"));
    }
}
