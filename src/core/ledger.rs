//! Budget ledger operations.
//!
//! Amounts are kept at full `Decimal` precision; the only rounding the
//! ledger performs is the 2-digit rounding of a converted amount at the
//! moment it is recorded.

use crate::core::currency::RateCache;
use crate::core::error::{ConversionError, LedgerError};
use crate::core::trip::{Budget, Expense, ExpenseCategory};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

impl Budget {
    /// Appends an expense already denominated in the budget's currency.
    pub fn add_expense(&mut self, expense: Expense) -> Result<(), LedgerError> {
        if expense.currency != self.currency {
            return Err(LedgerError::CurrencyMismatch {
                expense: expense.currency,
                budget: self.currency.clone(),
            });
        }
        self.expenses.push(expense);
        Ok(())
    }

    /// Appends an expense, converting into the budget's currency first when
    /// the currencies differ. On conversion failure nothing is appended.
    pub async fn add_expense_converted(
        &mut self,
        mut expense: Expense,
        rates: &RateCache,
    ) -> Result<(), ConversionError> {
        if expense.currency != self.currency {
            let rate = rates.get_rate(&expense.currency, &self.currency).await?;
            let rate =
                Decimal::from_f64(rate).ok_or_else(|| ConversionError::RateUnavailable {
                    base: expense.currency.clone(),
                    target: self.currency.clone(),
                })?;
            expense.converted_amount = Some((expense.amount * rate).round_dp(2));
            debug!(
                "Converted {} {} to {} {} at rate {}",
                expense.amount,
                expense.currency,
                expense.converted_amount.unwrap_or_default(),
                self.currency,
                rate
            );
        }
        self.expenses.push(expense);
        Ok(())
    }

    /// Sum of expense contributions, in the budget's currency.
    pub fn spent(&self) -> Decimal {
        self.expenses
            .iter()
            .filter_map(|e| e.contribution(&self.currency))
            .sum()
    }

    /// Budget left after all counted expenses.
    pub fn remaining(&self) -> Decimal {
        self.total - self.spent()
    }

    /// Contributions grouped by category. Categories with nothing spent do
    /// not appear in the result.
    pub fn category_totals(&self) -> HashMap<ExpenseCategory, Decimal> {
        let mut totals = HashMap::new();
        for expense in &self.expenses {
            if let Some(contribution) = expense.contribution(&self.currency) {
                *totals.entry(expense.category).or_insert(Decimal::ZERO) += contribution;
            }
        }
        totals
    }

    /// Removes an expense by identity. Unknown ids are a no-op.
    pub fn remove_expense(&mut self, expense_id: Uuid) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != expense_id);
        self.expenses.len() < before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::RateProvider;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    struct FixedRates(HashMap<String, f64>);

    #[async_trait]
    impl RateProvider for FixedRates {
        async fn fetch_rates(&self, _base: &str) -> Result<HashMap<String, f64>> {
            if self.0.is_empty() {
                return Err(anyhow!("no rates configured"));
            }
            Ok(self.0.clone())
        }
    }

    fn rates_with(target: &str, rate: f64) -> RateCache {
        RateCache::new(Arc::new(FixedRates(HashMap::from([(
            target.to_string(),
            rate,
        )]))))
    }

    fn budget() -> Budget {
        Budget::new(dec!(500), "EUR")
    }

    #[test]
    fn test_remaining_subtracts_contributions() {
        let mut budget = budget();
        budget
            .add_expense(Expense::new(dec!(120), "EUR", ExpenseCategory::Food, "dinner"))
            .unwrap();
        budget
            .add_expense(Expense::new(
                dec!(80.50),
                "EUR",
                ExpenseCategory::Shopping,
                "souvenirs",
            ))
            .unwrap();

        assert_eq!(budget.spent(), dec!(200.50));
        assert_eq!(budget.remaining(), dec!(299.50));
    }

    #[test]
    fn test_add_expense_rejects_foreign_currency() {
        let mut budget = budget();
        let err = budget
            .add_expense(Expense::new(dec!(10), "USD", ExpenseCategory::Food, ""))
            .unwrap_err();
        assert!(matches!(err, LedgerError::CurrencyMismatch { .. }));
        assert!(budget.expenses.is_empty());
    }

    #[tokio::test]
    async fn test_conversion_rounds_to_two_digits() {
        let mut budget = budget();
        let rates = rates_with("EUR", 0.92);

        budget
            .add_expense_converted(
                Expense::new(dec!(100), "USD", ExpenseCategory::Food, "lunch"),
                &rates,
            )
            .await
            .unwrap();

        let expense = &budget.expenses[0];
        assert_eq!(expense.converted_amount, Some(dec!(92.00)));
        assert_eq!(budget.spent(), dec!(92.00));
        assert_eq!(budget.remaining(), dec!(408.00));
    }

    #[tokio::test]
    async fn test_conversion_matching_currency_skips_rate_lookup() {
        let mut budget = budget();
        // No rates configured; a lookup would fail.
        let rates = RateCache::new(Arc::new(FixedRates(HashMap::new())));

        budget
            .add_expense_converted(
                Expense::new(dec!(25), "EUR", ExpenseCategory::Other, ""),
                &rates,
            )
            .await
            .unwrap();

        assert_eq!(budget.expenses[0].converted_amount, None);
        assert_eq!(budget.spent(), dec!(25));
    }

    #[tokio::test]
    async fn test_failed_conversion_appends_nothing() {
        let mut budget = budget();
        let rates = RateCache::new(Arc::new(FixedRates(HashMap::new())));

        let result = budget
            .add_expense_converted(
                Expense::new(dec!(100), "USD", ExpenseCategory::Food, ""),
                &rates,
            )
            .await;

        assert!(result.is_err());
        assert!(budget.expenses.is_empty());
        assert_eq!(budget.remaining(), dec!(500));
    }

    #[test]
    fn test_add_then_remove_restores_prior_state() {
        let mut budget = budget();
        let expense = Expense::new(dec!(60), "EUR", ExpenseCategory::Activities, "museum");
        let id = expense.id;

        budget.add_expense(expense).unwrap();
        assert_eq!(budget.remaining(), dec!(440));

        assert!(budget.remove_expense(id));
        assert_eq!(budget.remaining(), dec!(500));
        assert!(budget.expenses.is_empty());
    }

    #[test]
    fn test_remove_unknown_expense_is_a_noop() {
        let mut budget = budget();
        budget
            .add_expense(Expense::new(dec!(10), "EUR", ExpenseCategory::Food, ""))
            .unwrap();

        assert!(!budget.remove_expense(Uuid::new_v4()));
        assert_eq!(budget.expenses.len(), 1);
    }

    #[test]
    fn test_category_totals_omit_empty_categories() {
        let mut budget = budget();
        budget
            .add_expense(Expense::new(dec!(40), "EUR", ExpenseCategory::Food, ""))
            .unwrap();
        budget
            .add_expense(Expense::new(dec!(20), "EUR", ExpenseCategory::Food, ""))
            .unwrap();
        budget
            .add_expense(Expense::new(
                dec!(15),
                "EUR",
                ExpenseCategory::Transportation,
                "",
            ))
            .unwrap();

        let totals = budget.category_totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&ExpenseCategory::Food], dec!(60));
        assert_eq!(totals[&ExpenseCategory::Transportation], dec!(15));
        assert!(!totals.contains_key(&ExpenseCategory::Shopping));
    }
}
