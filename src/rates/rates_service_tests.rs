#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex, RwLock};

    use crate::channel::ChannelError;
    use crate::errors::{Error, Result as AppResult};
    use crate::provisioning::ProvisionerTrait;
    use crate::rates::rates_model::{
        AggregationOption, CurrencyPair, ObservationRow, RateView,
    };
    use crate::rates::rates_traits::{ObservationRepositoryTrait, RateServiceTrait};
    use crate::rates::{RateError, RateService};

    #[derive(Default)]
    struct MockRepository {
        pairs: RwLock<HashSet<String>>,
        rows: RwLock<Vec<ObservationRow>>,
    }

    impl MockRepository {
        fn with_pair(self, base: &str) -> Self {
            self.pairs.write().unwrap().insert(base.to_string());
            self
        }

        fn push_row(&self, base: &str, quote: &str, amount: f64, observed_at: NaiveDateTime) {
            self.rows.write().unwrap().push(ObservationRow {
                base_symbol: base.to_string(),
                quote_symbol: quote.to_string(),
                amount,
                observed_at,
            });
        }
    }

    impl ObservationRepositoryTrait for MockRepository {
        fn exists_pair(&self, symbol: &str) -> AppResult<bool> {
            Ok(self.pairs.read().unwrap().contains(symbol))
        }

        fn register_pair(&self, symbol: &str) -> AppResult<()> {
            self.pairs.write().unwrap().insert(symbol.to_string());
            Ok(())
        }

        fn list_tracked_pairs(&self) -> AppResult<Vec<CurrencyPair>> {
            unimplemented!()
        }

        fn list_quote_symbols(&self) -> AppResult<Vec<String>> {
            unimplemented!()
        }

        fn register_quote_symbol(&self, _symbol: &str) -> AppResult<()> {
            unimplemented!()
        }

        fn upsert_observations(
            &self,
            _base: &str,
            _prices: &[(String, f64)],
            _observed_at: NaiveDateTime,
        ) -> AppResult<()> {
            unimplemented!()
        }

        fn query_window(
            &self,
            currency: Option<&str>,
            start: NaiveDateTime,
            end: NaiveDateTime,
            _option: AggregationOption,
        ) -> AppResult<Vec<ObservationRow>> {
            let mut rows: Vec<ObservationRow> = self
                .rows
                .read()
                .unwrap()
                .iter()
                .filter(|r| currency.map_or(true, |c| r.base_symbol == c))
                .filter(|r| r.observed_at >= start && r.observed_at < end)
                .cloned()
                .collect();
            rows.sort_by(|a, b| {
                (&a.base_symbol, &a.quote_symbol).cmp(&(&b.base_symbol, &b.quote_symbol))
            });
            Ok(rows)
        }
    }

    enum ProvisionBehavior {
        /// Registers the pair and backfills one observation, then acks.
        Fulfill { amount: f64, at: NaiveDateTime },
        Timeout,
        Mismatch,
    }

    struct MockProvisioner {
        repository: Arc<MockRepository>,
        behavior: ProvisionBehavior,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ProvisionerTrait for MockProvisioner {
        async fn provision(&self, symbol: &str) -> Result<(), ChannelError> {
            self.calls.lock().unwrap().push(symbol.to_string());
            match &self.behavior {
                ProvisionBehavior::Fulfill { amount, at } => {
                    self.repository.register_pair(symbol).unwrap();
                    self.repository.push_row(symbol, "USD", *amount, *at);
                    Ok(())
                }
                ProvisionBehavior::Timeout => Err(ChannelError::AckTimeout(symbol.to_string())),
                ProvisionBehavior::Mismatch => Err(ChannelError::AckMismatch {
                    requested: symbol.to_string(),
                    received: "DOGE".to_string(),
                }),
            }
        }
    }

    const DATE: &str = "2025-03-14";

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn service_with(
        repository: Arc<MockRepository>,
        behavior: ProvisionBehavior,
    ) -> (RateService, Arc<MockProvisioner>) {
        let provisioner = Arc::new(MockProvisioner {
            repository: repository.clone(),
            behavior,
            calls: Mutex::new(Vec::new()),
        });
        (
            RateService::new(repository, provisioner.clone()),
            provisioner,
        )
    }

    #[tokio::test]
    async fn malformed_date_fails_before_any_store_access() {
        let repository = Arc::new(MockRepository::default());
        let (service, provisioner) = service_with(repository, ProvisionBehavior::Timeout);

        let err = service
            .get_rate("BTC", Some("14-03-2025"), AggregationOption::Last)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Rate(RateError::InvalidDate(_))));
        assert!(provisioner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn known_currency_with_empty_window_is_not_found() {
        let repository = Arc::new(MockRepository::default().with_pair("BTC"));
        let (service, provisioner) = service_with(repository, ProvisionBehavior::Timeout);

        let err = service
            .get_rate("BTC", Some(DATE), AggregationOption::Last)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Rate(RateError::NotFound(s)) if s == "BTC"));
        // No provisioning for an already tracked currency.
        assert!(provisioner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn known_currency_reads_without_handshake() {
        let repository = Arc::new(MockRepository::default().with_pair("BTC"));
        repository.push_row("BTC", "USD", 65000.0, at(12));
        let (service, provisioner) = service_with(repository, ProvisionBehavior::Timeout);

        let view = service
            .get_rate("btc", Some(DATE), AggregationOption::Last)
            .await
            .unwrap();

        assert_eq!(view.title, "BTC");
        assert_eq!(view.values.len(), 1);
        assert_eq!(view.values[0].amount, 65000.0);
        assert_eq!(view.as_of, at(12));
        assert!(provisioner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_currency_is_provisioned_then_read() {
        let repository = Arc::new(MockRepository::default());
        let (service, provisioner) = service_with(
            repository,
            ProvisionBehavior::Fulfill {
                amount: 0.52,
                at: at(12),
            },
        );

        let view = service
            .get_rate("XRP", Some(DATE), AggregationOption::Last)
            .await
            .unwrap();

        assert_eq!(view.title, "XRP");
        assert_eq!(view.values[0].amount, 0.52);
        assert_eq!(*provisioner.calls.lock().unwrap(), vec!["XRP".to_string()]);
    }

    #[tokio::test]
    async fn provisioning_timeout_surfaces_unavailable() {
        let repository = Arc::new(MockRepository::default());
        let (service, _provisioner) = service_with(repository, ProvisionBehavior::Timeout);

        let err = service
            .get_rate("XRP", Some(DATE), AggregationOption::Last)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Rate(RateError::Unavailable(s)) if s == "XRP"));
    }

    #[tokio::test]
    async fn provisioning_mismatch_surfaces_protocol_mismatch() {
        let repository = Arc::new(MockRepository::default());
        let (service, _provisioner) = service_with(repository, ProvisionBehavior::Mismatch);

        let err = service
            .get_rate("XRP", Some(DATE), AggregationOption::Last)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Rate(RateError::ProtocolMismatch(s)) if s == "DOGE"
        ));
    }

    #[tokio::test]
    async fn all_rates_group_per_base_with_latest_as_of() {
        let repository = Arc::new(MockRepository::default().with_pair("BTC").with_pair("ETH"));
        repository.push_row("ETH", "USD", 3500.0, at(9));
        repository.push_row("ETH", "EUR", 3200.0, at(15));
        repository.push_row("BTC", "USD", 65000.0, at(12));
        let (service, _provisioner) = service_with(repository, ProvisionBehavior::Timeout);

        let views: Vec<RateView> = service
            .get_all_rates(Some(DATE), AggregationOption::Last)
            .await
            .unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].title, "BTC");
        assert_eq!(views[1].title, "ETH");
        // Quote values ordered by symbol, as_of is the latest contribution.
        assert_eq!(views[1].values[0].symbol, "EUR");
        assert_eq!(views[1].values[1].symbol, "USD");
        assert_eq!(views[1].as_of, at(15));
    }

    #[tokio::test]
    async fn all_rates_with_no_data_is_an_empty_list() {
        let repository = Arc::new(MockRepository::default());
        let (service, _provisioner) = service_with(repository, ProvisionBehavior::Timeout);

        let views = service
            .get_all_rates(Some(DATE), AggregationOption::Average)
            .await
            .unwrap();
        assert!(views.is_empty());
    }
}
