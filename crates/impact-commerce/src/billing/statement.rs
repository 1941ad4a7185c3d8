//! Monthly statements.

use crate::billing::BillingPeriod;
use crate::ids::{MerchantId, PartnerId};
use crate::money::{Currency, Money};
use crate::settings::Settings;
use crate::wallet::{AcquisitionFlow, Transaction};
use crate::ImpactError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Who pays for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum BillingParty {
    Merchant(MerchantId),
    Partner(PartnerId),
}

impl fmt::Display for BillingParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingParty::Merchant(id) => write!(f, "merchant:{}", id),
            BillingParty::Partner(id) => write!(f, "partner:{}", id),
        }
    }
}

/// Invoice figures for one party and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatement {
    pub party: BillingParty,
    pub period: BillingPeriod,
    pub transaction_count: usize,
    pub impact_kg: f64,
    /// Sum of the billed transactions.
    pub fees: Money,
    /// Platform floor in force when the statement was produced.
    pub minimum: Money,
    /// Amount to invoice: the fees, raised to the floor.
    pub billed: Money,
}

impl MonthlyStatement {
    /// Whether the floor raised the invoice above the fees.
    pub fn minimum_applied(&self) -> bool {
        self.billed.amount_cents > self.fees.amount_cents
    }
}

/// The party billed for a transaction, if the flow is billable.
pub fn billing_party(tx: &Transaction) -> Option<BillingParty> {
    match tx.flow {
        AcquisitionFlow::MerchantClaim => tx.merchant_id.clone().map(BillingParty::Merchant),
        AcquisitionFlow::Allocation => tx.partner_id.clone().map(BillingParty::Partner),
        _ => None,
    }
}

#[derive(Default)]
struct Tally {
    count: usize,
    impact_kg: f64,
    fees: Money,
}

/// Produce one statement per party with fees in `period`, sorted by party.
pub fn generate_statements<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    period: BillingPeriod,
    settings: &Settings,
) -> Result<Vec<MonthlyStatement>, ImpactError> {
    let mut tallies: BTreeMap<BillingParty, Tally> = BTreeMap::new();

    for tx in transactions {
        if !period.contains(tx.created_at) {
            continue;
        }
        let Some(party) = billing_party(tx) else {
            if matches!(
                tx.flow,
                AcquisitionFlow::MerchantClaim | AcquisitionFlow::Allocation
            ) {
                warn!(transaction = %tx.id, flow = tx.flow.as_str(), "billable transaction has no party");
            }
            continue;
        };

        let tally = tallies.entry(party).or_default();
        tally.count += 1;
        tally.impact_kg += tx.impact_kg;
        tally.fees = tally
            .fees
            .try_add(&Money::from_decimal(tx.amount, Currency::EUR))?;
    }

    let minimum = Money::from_decimal(settings.monthly_billing_minimum(), Currency::EUR);
    let mut statements = Vec::with_capacity(tallies.len());

    for (party, tally) in tallies {
        if !tally.fees.is_positive() {
            debug!(party = %party, period = %period, "no fees, skipping statement");
            continue;
        }
        let billed = tally.fees.try_max(&minimum)?;
        statements.push(MonthlyStatement {
            party,
            period,
            transaction_count: tally.count,
            impact_kg: tally.impact_kg,
            fees: tally.fees,
            minimum,
            billed,
        });
    }

    debug!(period = %period, statements = statements.len(), "generated monthly statements");
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;

    const MARCH_10: i64 = 1_710_028_800;
    const APRIL_2: i64 = 1_712_016_000;
    const FEB_20: i64 = 1_708_387_200;

    fn claim(merchant: &str, amount: f64, at: i64) -> Transaction {
        Transaction::new(
            UserId::new("usr-1"),
            AcquisitionFlow::MerchantClaim,
            amount,
            amount / 0.11,
            at,
        )
        .with_merchant(merchant)
    }

    fn allocation(partner: &str, amount: f64, at: i64) -> Transaction {
        Transaction::new(
            UserId::new("usr-2"),
            AcquisitionFlow::Allocation,
            amount,
            amount / 0.11,
            at,
        )
        .with_partner(partner)
    }

    fn march() -> BillingPeriod {
        BillingPeriod::parse("2024-03").unwrap()
    }

    #[test]
    fn test_groups_by_party_within_period() {
        let history = vec![
            claim("acme", 0.55, MARCH_10),
            claim("acme", 0.275, MARCH_10 + 60),
            claim("acme", 5.0, APRIL_2),
            claim("acme", 5.0, FEB_20),
            allocation("shop-co", 2.0, MARCH_10),
            Transaction::new(UserId::new("usr-3"), AcquisitionFlow::DirectPayment, 11.0, 100.0, MARCH_10),
        ];

        let statements = generate_statements(&history, march(), &Settings::default()).unwrap();
        assert_eq!(statements.len(), 2);

        let acme = &statements[0];
        assert_eq!(acme.party, BillingParty::Merchant(MerchantId::new("acme")));
        assert_eq!(acme.transaction_count, 2);
        assert_eq!(acme.fees, Money::eur(83));
        assert_eq!(acme.billed, Money::eur(83));
        assert!(!acme.minimum_applied());

        let shop = &statements[1];
        assert_eq!(shop.party, BillingParty::Partner(PartnerId::new("shop-co")));
        assert_eq!(shop.billed, Money::eur(200));
    }

    #[test]
    fn test_minimum_raises_small_invoices() {
        let mut settings = Settings::default();
        settings.set("MONTHLY_BILLING_MINIMUM", "25").unwrap();

        let history = vec![claim("acme", 0.55, MARCH_10), allocation("big", 40.0, MARCH_10)];
        let statements = generate_statements(&history, march(), &settings).unwrap();

        assert_eq!(statements[0].billed, Money::eur(2500));
        assert!(statements[0].minimum_applied());
        assert_eq!(statements[1].billed, Money::eur(4000));
    }

    #[test]
    fn test_parties_without_fees_are_not_billed() {
        let mut settings = Settings::default();
        settings.set("MONTHLY_BILLING_MINIMUM", "25").unwrap();

        let history = vec![claim("acme", 0.0, MARCH_10)];
        let statements = generate_statements(&history, march(), &settings).unwrap();
        assert!(statements.is_empty());
    }

    #[test]
    fn test_claim_without_merchant_is_skipped() {
        let orphan = Transaction::new(
            UserId::new("usr-1"),
            AcquisitionFlow::MerchantClaim,
            1.0,
            9.0,
            MARCH_10,
        );
        assert_eq!(billing_party(&orphan), None);
        let statements = generate_statements([&orphan], march(), &Settings::default()).unwrap();
        assert!(statements.is_empty());
    }

    #[test]
    fn test_oversized_landing_amounts_fail_instead_of_overflowing() {
        use crate::catalog::{PaymentMode, Sku, SkuCatalog};
        use crate::landing::{resolve_landing, LandingParams};

        let catalog = SkuCatalog::from_skus([
            Sku::new("ALLOC-1", PaymentMode::Allocation).with_partner("shop")
        ])
        .unwrap();
        let settings = Settings::default();
        let history: Vec<Transaction> = (0..2)
            .map(|i| {
                let params =
                    LandingParams::from_query("sku=ALLOC-1&partner=shop&amount=60000000000000000");
                let resolution = resolve_landing(&catalog, &settings, params);
                Transaction::from_resolution(&resolution, UserId::new("usr-1"), MARCH_10 + i)
            })
            .collect();

        assert_eq!(
            generate_statements(&history, march(), &settings),
            Err(ImpactError::AmountOverflow)
        );
    }

    #[test]
    fn test_party_serialization() {
        let party = BillingParty::Partner(PartnerId::new("shop-co"));
        assert_eq!(
            serde_json::to_string(&party).unwrap(),
            r#"{"type":"partner","id":"shop-co"}"#
        );
        assert_eq!(party.to_string(), "partner:shop-co");
    }
}
