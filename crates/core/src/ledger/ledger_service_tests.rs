#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::ledger::{BuyInput, LedgerError, LedgerService, LedgerServiceTrait, SellInput};
    use crate::lots::{
        LotDecrement, LotRepositoryTrait, NewPurchaseLot, NewSaleRecord, PurchaseLot, SaleRecord,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    // --- Mock LotRepository ---
    //
    // In-memory stand-in enforcing the same contracts as the SQLite
    // implementation: FIFO ordering on reads, all-or-nothing decrements
    // with an expected-remaining guard on record_sale.
    #[derive(Clone, Default)]
    struct MockLotRepository {
        lots: Arc<Mutex<Vec<PurchaseLot>>>,
        sales: Arc<Mutex<Vec<SaleRecord>>>,
    }

    impl MockLotRepository {
        fn new() -> Self {
            Self::default()
        }

        fn seed_lot(&self, lot: PurchaseLot) {
            self.lots.lock().unwrap().push(lot);
        }

        fn lot_snapshot(&self) -> Vec<PurchaseLot> {
            self.lots.lock().unwrap().clone()
        }

        fn sales_count(&self) -> usize {
            self.sales.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LotRepositoryTrait for MockLotRepository {
        fn get_lot(&self, lot_id: &str) -> Result<PurchaseLot> {
            self.lots
                .lock()
                .unwrap()
                .iter()
                .find(|lot| lot.id == lot_id)
                .cloned()
                .ok_or_else(|| Error::Repository(format!("Lot not found: {}", lot_id)))
        }

        fn get_open_lots(
            &self,
            owner_id: &str,
            account_id: &str,
            ticker: &str,
        ) -> Result<Vec<PurchaseLot>> {
            let mut open: Vec<PurchaseLot> = self
                .lots
                .lock()
                .unwrap()
                .iter()
                .filter(|lot| {
                    lot.owner_id == owner_id
                        && lot.account_id == account_id
                        && lot.ticker == ticker
                        && lot.remaining_quantity > 0
                })
                .cloned()
                .collect();
            open.sort_by(|a, b| {
                a.purchase_date
                    .cmp(&b.purchase_date)
                    .then(a.id.cmp(&b.id))
            });
            Ok(open)
        }

        fn get_lots(&self, _owner_id: &str, _account_id: Option<&str>) -> Result<Vec<PurchaseLot>> {
            unimplemented!("not needed for ledger tests")
        }

        fn get_sales(&self, _owner_id: &str, _account_id: Option<&str>) -> Result<Vec<SaleRecord>> {
            unimplemented!("not needed for ledger tests")
        }

        async fn create_lot(&self, new_lot: NewPurchaseLot) -> Result<PurchaseLot> {
            let now = Utc::now();
            let lot = PurchaseLot {
                id: new_lot.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                owner_id: new_lot.owner_id,
                account_id: new_lot.account_id,
                ticker: new_lot.ticker,
                purchase_date: new_lot.purchase_date,
                original_quantity: new_lot.quantity,
                price_per_share: new_lot.price_per_share,
                buy_fee: new_lot.buy_fee,
                total_cost: new_lot.total_cost,
                remaining_quantity: new_lot.quantity,
                created_at: now,
                updated_at: now,
            };
            self.lots.lock().unwrap().push(lot.clone());
            Ok(lot)
        }

        async fn record_sale(
            &self,
            decrements: Vec<LotDecrement>,
            sale: NewSaleRecord,
        ) -> Result<SaleRecord> {
            let mut lots = self.lots.lock().unwrap();
            // Validate every guard before mutating anything.
            for decrement in &decrements {
                let lot = lots
                    .iter()
                    .find(|lot| lot.id == decrement.lot_id)
                    .ok_or_else(|| Error::Repository("lot vanished".to_string()))?;
                if lot.remaining_quantity != decrement.expected_remaining {
                    return Err(LedgerError::ConcurrencyConflict(format!(
                        "lot {} moved underneath the sale",
                        decrement.lot_id
                    ))
                    .into());
                }
            }
            for decrement in &decrements {
                let lot = lots
                    .iter_mut()
                    .find(|lot| lot.id == decrement.lot_id)
                    .expect("checked above");
                lot.remaining_quantity = decrement.new_remaining;
            }
            let record = SaleRecord {
                id: Uuid::new_v4().to_string(),
                owner_id: sale.owner_id,
                account_id: sale.account_id,
                ticker: sale.ticker,
                sell_date: sale.sell_date,
                quantity: sale.quantity,
                price_per_share: sale.price_per_share,
                gross_sell_value: sale.gross_sell_value,
                selling_tax: sale.selling_tax,
                sell_fee: sale.sell_fee,
                net_proceeds: sale.net_proceeds,
                total_cogs: sale.total_cogs,
                profit_or_loss: sale.profit_or_loss,
                consumptions: sale.consumptions,
                created_at: Utc::now(),
            };
            self.sales.lock().unwrap().push(record.clone());
            Ok(record)
        }
    }

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn lot(id: &str, purchase_date: DateTime<Utc>, quantity: i64, price: Decimal) -> PurchaseLot {
        PurchaseLot {
            id: id.to_string(),
            owner_id: "owner-1".to_string(),
            account_id: "acct-1".to_string(),
            ticker: "TEST".to_string(),
            purchase_date,
            original_quantity: quantity,
            price_per_share: price,
            buy_fee: Decimal::ZERO,
            total_cost: Decimal::from(quantity) * price,
            remaining_quantity: quantity,
            created_at: purchase_date,
            updated_at: purchase_date,
        }
    }

    fn buy_input(quantity: i64, price: Decimal, fee: Decimal) -> BuyInput {
        BuyInput {
            owner_id: "owner-1".to_string(),
            account_id: "acct-1".to_string(),
            ticker: "test".to_string(),
            quantity,
            price_per_share: price,
            fee,
            purchase_date: date(2024, 1, 10),
        }
    }

    fn sell_input(quantity: i64, price: Decimal, fee: Decimal, tax: Decimal) -> SellInput {
        SellInput {
            owner_id: "owner-1".to_string(),
            account_id: "acct-1".to_string(),
            ticker: "TEST".to_string(),
            quantity,
            price_per_share: price,
            fee,
            tax_rate_percent: tax,
            sell_date: date(2024, 6, 1),
        }
    }

    #[tokio::test]
    async fn test_record_buy_capitalizes_fee_into_cost() {
        let repo = MockLotRepository::new();
        let service = LedgerService::new(Arc::new(repo.clone()));

        let lot = service
            .record_buy(buy_input(100, dec!(100000), dec!(10000)))
            .await
            .unwrap();

        assert_eq!(lot.original_quantity, 100);
        assert_eq!(lot.remaining_quantity, 100);
        assert_eq!(lot.total_cost, dec!(10010000));
        assert_eq!(lot.unit_cost(), dec!(100100));
        // Ticker was normalized on the way in.
        assert_eq!(lot.ticker, "TEST");
    }

    #[tokio::test]
    async fn test_record_buy_rejects_bad_input() {
        let repo = MockLotRepository::new();
        let service = LedgerService::new(Arc::new(repo.clone()));

        let zero_qty = service.record_buy(buy_input(0, dec!(100), dec!(0))).await;
        assert!(matches!(zero_qty, Err(Error::Validation(_))));

        let zero_price = service.record_buy(buy_input(10, dec!(0), dec!(0))).await;
        assert!(matches!(zero_price, Err(Error::Validation(_))));

        let negative_fee = service.record_buy(buy_input(10, dec!(100), dec!(-1))).await;
        assert!(matches!(negative_fee, Err(Error::Validation(_))));

        assert!(repo.lot_snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_record_sell_insufficient_lots_changes_nothing() {
        let repo = MockLotRepository::new();
        repo.seed_lot(lot("a", date(2024, 1, 1), 10, dec!(100)));
        let before = repo.lot_snapshot();
        let service = LedgerService::new(Arc::new(repo.clone()));

        let result = service
            .record_sell(sell_input(15, dec!(120), dec!(0), dec!(0)))
            .await;

        match result {
            Err(Error::Ledger(LedgerError::InsufficientLots {
                requested,
                available,
            })) => {
                assert_eq!(requested, 15);
                assert_eq!(available, 10);
            }
            other => panic!("expected InsufficientLots, got {:?}", other.map(|_| ())),
        }
        assert_eq!(repo.lot_snapshot(), before);
        assert_eq!(repo.sales_count(), 0);
    }

    #[tokio::test]
    async fn test_record_sell_on_empty_key_is_insufficient() {
        let repo = MockLotRepository::new();
        let service = LedgerService::new(Arc::new(repo.clone()));

        let result = service
            .record_sell(sell_input(1, dec!(120), dec!(0), dec!(0)))
            .await;

        assert!(matches!(
            result,
            Err(Error::Ledger(LedgerError::InsufficientLots {
                requested: 1,
                available: 0
            }))
        ));
    }

    #[tokio::test]
    async fn test_record_sell_consumes_oldest_lots_first() {
        let repo = MockLotRepository::new();
        repo.seed_lot(lot("t1", date(2024, 1, 1), 10, dec!(100)));
        repo.seed_lot(lot("t2", date(2024, 2, 1), 10, dec!(110)));
        repo.seed_lot(lot("t3", date(2024, 3, 1), 10, dec!(120)));
        let service = LedgerService::new(Arc::new(repo.clone()));

        let outcome = service
            .record_sell(sell_input(15, dec!(150), dec!(0), dec!(0)))
            .await
            .unwrap();

        assert_eq!(outcome.consumptions.len(), 2);
        assert_eq!(outcome.consumptions[0].lot_id, "t1");
        assert_eq!(outcome.consumptions[0].quantity, 10);
        assert_eq!(outcome.consumptions[1].lot_id, "t2");
        assert_eq!(outcome.consumptions[1].quantity, 5);

        let lots = repo.lot_snapshot();
        let remaining: Vec<(String, i64)> = lots
            .iter()
            .map(|l| (l.id.clone(), l.remaining_quantity))
            .collect();
        assert!(remaining.contains(&("t1".to_string(), 0)));
        assert!(remaining.contains(&("t2".to_string(), 5)));
        // The newest lot is untouched while an older one still has shares.
        assert!(remaining.contains(&("t3".to_string(), 10)));
    }

    #[tokio::test]
    async fn test_record_sell_breaks_date_ties_by_lot_id() {
        let repo = MockLotRepository::new();
        let same_day = date(2024, 1, 1);
        repo.seed_lot(lot("b", same_day, 10, dec!(110)));
        repo.seed_lot(lot("a", same_day, 10, dec!(100)));
        let service = LedgerService::new(Arc::new(repo.clone()));

        let outcome = service
            .record_sell(sell_input(10, dec!(150), dec!(0), dec!(0)))
            .await
            .unwrap();

        assert_eq!(outcome.consumptions.len(), 1);
        assert_eq!(outcome.consumptions[0].lot_id, "a");
        assert_eq!(outcome.total_cogs, dec!(1000));
    }

    #[tokio::test]
    async fn test_quantity_conservation_across_sales() {
        let repo = MockLotRepository::new();
        let service = LedgerService::new(Arc::new(repo.clone()));

        for (qty, price) in [(10i64, dec!(100)), (20, dec!(110)), (5, dec!(120))] {
            service
                .record_buy(buy_input(qty, price, dec!(0)))
                .await
                .unwrap();
        }
        service
            .record_sell(sell_input(12, dec!(150), dec!(0), dec!(0)))
            .await
            .unwrap();
        service
            .record_sell(sell_input(8, dec!(150), dec!(0), dec!(0)))
            .await
            .unwrap();

        let lots = repo.lot_snapshot();
        let original: i64 = lots.iter().map(|l| l.original_quantity).sum();
        let remaining: i64 = lots.iter().map(|l| l.remaining_quantity).sum();
        assert_eq!(original - remaining, 20);
        assert!(lots.iter().all(|l| l.remaining_quantity >= 0));
        assert!(lots
            .iter()
            .all(|l| l.remaining_quantity <= l.original_quantity));
    }

    #[tokio::test]
    async fn test_record_sell_end_to_end_profit() {
        let repo = MockLotRepository::new();
        let service = LedgerService::new(Arc::new(repo.clone()));

        let mut first = buy_input(100, dec!(100000), dec!(10000));
        first.purchase_date = date(2024, 1, 1);
        service.record_buy(first).await.unwrap();
        let mut second = buy_input(100, dec!(110000), dec!(10000));
        second.purchase_date = date(2024, 2, 1);
        service.record_buy(second).await.unwrap();

        let outcome = service
            .record_sell(sell_input(150, dec!(120000), dec!(15000), dec!(0)))
            .await
            .unwrap();

        // 100 x 100,100 + 50 x 110,100
        assert_eq!(outcome.total_cogs, dec!(15515000));
        assert_eq!(outcome.gross_sell_value, dec!(18000000));
        assert_eq!(outcome.selling_tax, dec!(0));
        assert_eq!(outcome.net_proceeds, dec!(17985000));
        assert_eq!(outcome.profit_or_loss, dec!(2470000));

        assert_eq!(outcome.consumptions[0].unit_cost, dec!(100100));
        assert_eq!(outcome.consumptions[1].unit_cost, dec!(110100));
        assert_eq!(repo.sales_count(), 1);
    }

    #[tokio::test]
    async fn test_record_sell_applies_tax_and_fee_to_proceeds_only() {
        let repo = MockLotRepository::new();
        repo.seed_lot(lot("a", date(2024, 1, 1), 10, dec!(1000)));
        let service = LedgerService::new(Arc::new(repo.clone()));

        let outcome = service
            .record_sell(sell_input(10, dec!(1000), dec!(50), dec!(10)))
            .await
            .unwrap();

        assert_eq!(outcome.gross_sell_value, dec!(10000));
        assert_eq!(outcome.selling_tax, dec!(1000));
        assert_eq!(outcome.net_proceeds, dec!(8950));
        // Sell fee and tax reduce proceeds, never the cost basis.
        assert_eq!(outcome.total_cogs, dec!(10000));
        assert_eq!(outcome.profit_or_loss, dec!(-1050));
    }

    #[tokio::test]
    async fn test_record_sell_rejects_bad_input() {
        let repo = MockLotRepository::new();
        repo.seed_lot(lot("a", date(2024, 1, 1), 10, dec!(100)));
        let service = LedgerService::new(Arc::new(repo.clone()));

        for input in [
            sell_input(0, dec!(100), dec!(0), dec!(0)),
            sell_input(5, dec!(0), dec!(0), dec!(0)),
            sell_input(5, dec!(100), dec!(-1), dec!(0)),
            sell_input(5, dec!(100), dec!(0), dec!(-1)),
        ] {
            let result = service.record_sell(input).await;
            assert!(matches!(result, Err(Error::Validation(_))));
        }
        assert_eq!(repo.sales_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrency_conflict_bubbles_up() {
        // Repository wrapper that simulates another writer slipping in
        // between the read and the decrement.
        #[derive(Clone)]
        struct RacingLotRepository {
            inner: MockLotRepository,
        }

        #[async_trait]
        impl LotRepositoryTrait for RacingLotRepository {
            fn get_lot(&self, lot_id: &str) -> Result<PurchaseLot> {
                self.inner.get_lot(lot_id)
            }
            fn get_open_lots(
                &self,
                owner_id: &str,
                account_id: &str,
                ticker: &str,
            ) -> Result<Vec<PurchaseLot>> {
                self.inner.get_open_lots(owner_id, account_id, ticker)
            }
            fn get_lots(
                &self,
                owner_id: &str,
                account_id: Option<&str>,
            ) -> Result<Vec<PurchaseLot>> {
                self.inner.get_lots(owner_id, account_id)
            }
            fn get_sales(
                &self,
                owner_id: &str,
                account_id: Option<&str>,
            ) -> Result<Vec<SaleRecord>> {
                self.inner.get_sales(owner_id, account_id)
            }
            async fn create_lot(&self, new_lot: NewPurchaseLot) -> Result<PurchaseLot> {
                self.inner.create_lot(new_lot).await
            }
            async fn record_sale(
                &self,
                decrements: Vec<LotDecrement>,
                sale: NewSaleRecord,
            ) -> Result<SaleRecord> {
                // Another sale consumed 4 shares of the first lot after the
                // service took its snapshot.
                {
                    let mut lots = self.inner.lots.lock().unwrap();
                    let lot = lots
                        .iter_mut()
                        .find(|l| l.id == decrements[0].lot_id)
                        .unwrap();
                    lot.remaining_quantity -= 4;
                }
                self.inner.record_sale(decrements, sale).await
            }
        }

        let inner = MockLotRepository::new();
        inner.seed_lot(lot("a", date(2024, 1, 1), 10, dec!(100)));
        let repo = RacingLotRepository {
            inner: inner.clone(),
        };
        let service = LedgerService::new(Arc::new(repo));

        let result = service
            .record_sell(sell_input(10, dec!(150), dec!(0), dec!(0)))
            .await;

        assert!(matches!(
            result,
            Err(Error::Ledger(LedgerError::ConcurrencyConflict(_)))
        ));
        assert_eq!(inner.sales_count(), 0);
    }
}
