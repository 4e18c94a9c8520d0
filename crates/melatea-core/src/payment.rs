//! # Payment Module
//!
//! Payment outcome calculation and the payment screen state machine.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────┐ select_method ┌────────────────┐ enter_amount ┌───────────┐ │
//! │   │ Idle │──────────────►│ MethodSelected │─────────────►│  Amount   │ │
//! │   └──────┘               └────────────────┘ quick_amount │  Entered  │ │
//! │      ▲  ▲                                                └─────┬─────┘ │
//! │      │  │ cancel (any stage except Processing)                 │       │
//! │      │  │                                              begin() │       │
//! │      │  │ fail()          ┌────────────┐   (paid ≥ total)      │       │
//! │      │  └─────────────────│ Processing │◄──────────────────────┘       │
//! │      │                    └─────┬──────┘                               │
//! │      │                          │ complete()                           │
//! │      │   cancel (new order)  ┌──▼──────┐                               │
//! │      └───────────────────────│ Success │                               │
//! │                              └─────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::settings::PaymentMethodSettings;
use crate::types::PaymentMethod;
use crate::validation::parse_amount_entry;

/// Preset cash amounts offered as buttons on the payment screen.
pub const QUICK_AMOUNTS: [Money; 6] = [
    Money::from_minor(80_000),
    Money::from_minor(85_000),
    Money::from_minor(90_000),
    Money::from_minor(95_000),
    Money::from_minor(100_000),
    Money::from_minor(150_000),
];

// =============================================================================
// Payment Outcome
// =============================================================================

/// Result of offering an amount against a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "camelCase")]
#[ts(export)]
pub enum PaymentOutcome {
    /// Amount covers the total.
    Completed { change: Money },
    /// Amount falls short by `shortfall`.
    InsufficientFunds { shortfall: Money },
}

/// Checks a payment against an order total. Never mutates anything.
///
/// Every method has to cover the full total, so the method does not change
/// the outcome.
///
/// ## Example
/// ```rust
/// use melatea_core::money::Money;
/// use melatea_core::payment::{pay, PaymentOutcome};
/// use melatea_core::types::PaymentMethod;
///
/// let total = Money::from_minor(78_000);
/// assert_eq!(
///     pay(total, PaymentMethod::Cash, Money::from_minor(50_000)),
///     PaymentOutcome::InsufficientFunds { shortfall: Money::from_minor(28_000) }
/// );
/// ```
pub fn pay(total: Money, _method: PaymentMethod, amount_paid: Money) -> PaymentOutcome {
    if amount_paid >= total {
        PaymentOutcome::Completed {
            change: amount_paid.saturating_diff(total),
        }
    } else {
        PaymentOutcome::InsufficientFunds {
            shortfall: total.saturating_diff(amount_paid),
        }
    }
}

/// Methods switched on in settings, in screen order.
pub fn available_methods(settings: &PaymentMethodSettings) -> Vec<PaymentMethod> {
    PaymentMethod::ALL
        .into_iter()
        .filter(|m| settings.is_enabled(*m))
        .collect()
}

// =============================================================================
// Payment Flow
// =============================================================================

/// Where the payment screen is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStage {
    Idle,
    MethodSelected,
    AmountEntered,
    Processing,
    Success,
}

impl PaymentStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStage::Idle => "idle",
            PaymentStage::MethodSelected => "method selected",
            PaymentStage::AmountEntered => "amount entered",
            PaymentStage::Processing => "processing",
            PaymentStage::Success => "completed",
        }
    }
}

/// A payment that went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CompletedPayment {
    pub method: PaymentMethod,
    pub total: Money,
    pub paid: Money,
    pub change: Money,
}

/// State of one payment screen for one order total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentFlow {
    total: Money,
    stage: PaymentStage,
    method: Option<PaymentMethod>,
    amount_paid: Option<Money>,
}

impl PaymentFlow {
    /// Opens the payment screen for an order total.
    pub fn new(total: Money) -> Self {
        PaymentFlow {
            total,
            stage: PaymentStage::Idle,
            method: None,
            amount_paid: None,
        }
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn stage(&self) -> PaymentStage {
        self.stage
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    pub fn amount_paid(&self) -> Option<Money> {
        self.amount_paid
    }

    fn invalid(&self, action: &str) -> CoreError {
        CoreError::InvalidPaymentState {
            current: self.stage.as_str().to_string(),
            action: action.to_string(),
        }
    }

    fn ensure_editable(&self, action: &str) -> CoreResult<()> {
        match self.stage {
            PaymentStage::Processing | PaymentStage::Success => Err(self.invalid(action)),
            _ => Ok(()),
        }
    }

    /// Picks a payment method. Only methods enabled in settings are accepted.
    ///
    /// ## Errors
    /// - `CoreError::PaymentMethodDisabled` if the method is switched off
    /// - `CoreError::InvalidPaymentState` while processing or after success
    pub fn select_method(
        &mut self,
        method: PaymentMethod,
        enabled: &PaymentMethodSettings,
    ) -> CoreResult<()> {
        self.ensure_editable("select a payment method")?;

        if !enabled.is_enabled(method) {
            return Err(CoreError::PaymentMethodDisabled(method.label().to_string()));
        }

        self.method = Some(method);
        self.stage = if self.amount_paid.is_some() {
            PaymentStage::AmountEntered
        } else {
            PaymentStage::MethodSelected
        };
        Ok(())
    }

    /// Sets the amount from keypad text. Digits only.
    ///
    /// ## Errors
    /// - `ValidationError` for empty or non-numeric input (amount unchanged)
    /// - `CoreError::InvalidPaymentState` before a method is chosen
    pub fn enter_amount(&mut self, input: &str) -> CoreResult<()> {
        self.ensure_method("enter an amount")?;
        let amount = parse_amount_entry(input)?;
        self.set_amount(amount);
        Ok(())
    }

    /// Sets the amount from a preset button.
    pub fn quick_amount(&mut self, amount: Money) -> CoreResult<()> {
        self.ensure_method("enter an amount")?;
        self.set_amount(amount);
        Ok(())
    }

    fn ensure_method(&self, action: &str) -> CoreResult<()> {
        self.ensure_editable(action)?;
        if self.method.is_none() {
            return Err(self.invalid(action));
        }
        Ok(())
    }

    fn set_amount(&mut self, amount: Money) {
        self.amount_paid = Some(amount);
        self.stage = PaymentStage::AmountEntered;
    }

    /// Change due for the current amount, zero when short.
    pub fn change(&self) -> Money {
        self.amount_paid
            .map(|paid| paid.saturating_diff(self.total))
            .unwrap_or_default()
    }

    /// True when a method is chosen and the amount covers the total.
    pub fn can_complete(&self) -> bool {
        self.stage == PaymentStage::AmountEntered
            && self.method.is_some()
            && self.amount_paid.is_some_and(|paid| paid >= self.total)
    }

    /// Starts processing.
    ///
    /// ## Errors
    /// - `CoreError::InsufficientFunds` if the amount is below the total
    /// - `CoreError::InvalidPaymentState` without a method and amount
    pub fn begin(&mut self) -> CoreResult<()> {
        if self.stage != PaymentStage::AmountEntered {
            return Err(self.invalid("start processing"));
        }

        let paid = self.amount_paid.unwrap_or_default();
        if paid < self.total {
            return Err(CoreError::InsufficientFunds {
                total: self.total,
                paid,
            });
        }

        self.stage = PaymentStage::Processing;
        Ok(())
    }

    /// Finishes processing successfully.
    pub fn complete(&mut self) -> CoreResult<CompletedPayment> {
        let (method, paid) = match (self.stage, self.method, self.amount_paid) {
            (PaymentStage::Processing, Some(method), Some(paid)) => (method, paid),
            _ => return Err(self.invalid("complete")),
        };

        self.stage = PaymentStage::Success;
        Ok(CompletedPayment {
            method,
            total: self.total,
            paid,
            change: paid.saturating_diff(self.total),
        })
    }

    /// Processing failed; back to a clean screen.
    pub fn fail(&mut self) -> CoreResult<()> {
        if self.stage != PaymentStage::Processing {
            return Err(self.invalid("fail"));
        }
        self.reset();
        Ok(())
    }

    /// Closes the screen. Not allowed while processing.
    pub fn cancel(&mut self) -> CoreResult<()> {
        if self.stage == PaymentStage::Processing {
            return Err(self.invalid("cancel"));
        }
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.stage = PaymentStage::Idle;
        self.method = None;
        self.amount_paid = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn total() -> Money {
        Money::from_minor(78_000)
    }

    #[test]
    fn test_pay_with_change() {
        assert_eq!(
            pay(total(), PaymentMethod::Cash, Money::from_minor(80_000)),
            PaymentOutcome::Completed {
                change: Money::from_minor(2_000)
            }
        );
    }

    #[test]
    fn test_pay_exact_amount_has_no_change() {
        assert_eq!(
            pay(total(), PaymentMethod::Qris, total()),
            PaymentOutcome::Completed {
                change: Money::zero()
            }
        );
    }

    #[test]
    fn test_pay_insufficient() {
        assert_eq!(
            pay(total(), PaymentMethod::Cash, Money::from_minor(50_000)),
            PaymentOutcome::InsufficientFunds {
                shortfall: Money::from_minor(28_000)
            }
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(PaymentOutcome::Completed {
            change: Money::from_minor(2_000),
        })
        .unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["change"], 2000);
    }

    #[test]
    fn test_available_methods_follow_settings() {
        let mut settings = PaymentMethodSettings::default();
        assert_eq!(
            available_methods(&settings),
            vec![PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Qris]
        );

        settings.card = false;
        settings.transfer = true;
        assert_eq!(
            available_methods(&settings),
            vec![PaymentMethod::Cash, PaymentMethod::Qris, PaymentMethod::Transfer]
        );
    }

    #[test]
    fn test_full_flow() {
        let settings = PaymentMethodSettings::default();
        let mut flow = PaymentFlow::new(total());
        assert!(!flow.can_complete());

        flow.select_method(PaymentMethod::Cash, &settings).unwrap();
        assert_eq!(flow.stage(), PaymentStage::MethodSelected);

        flow.enter_amount("80000").unwrap();
        assert_eq!(flow.stage(), PaymentStage::AmountEntered);
        assert_eq!(flow.change(), Money::from_minor(2_000));
        assert!(flow.can_complete());

        flow.begin().unwrap();
        assert_eq!(flow.stage(), PaymentStage::Processing);

        let payment = flow.complete().unwrap();
        assert_eq!(flow.stage(), PaymentStage::Success);
        assert_eq!(
            payment,
            CompletedPayment {
                method: PaymentMethod::Cash,
                total: total(),
                paid: Money::from_minor(80_000),
                change: Money::from_minor(2_000),
            }
        );
    }

    #[test]
    fn test_disabled_method_rejected() {
        let settings = PaymentMethodSettings::default();
        let mut flow = PaymentFlow::new(total());

        let err = flow
            .select_method(PaymentMethod::Transfer, &settings)
            .unwrap_err();
        assert!(matches!(err, CoreError::PaymentMethodDisabled(_)));
        assert_eq!(flow.stage(), PaymentStage::Idle);
    }

    #[test]
    fn test_amount_requires_method() {
        let mut flow = PaymentFlow::new(total());
        assert!(matches!(
            flow.quick_amount(QUICK_AMOUNTS[0]),
            Err(CoreError::InvalidPaymentState { .. })
        ));
    }

    #[test]
    fn test_non_numeric_amount_rejected() {
        let settings = PaymentMethodSettings::default();
        let mut flow = PaymentFlow::new(total());
        flow.select_method(PaymentMethod::Cash, &settings).unwrap();
        flow.enter_amount("80000").unwrap();

        let err = flow.enter_amount("80.000").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidFormat { .. })
        ));
        assert_eq!(flow.amount_paid(), Some(Money::from_minor(80_000)));
    }

    #[test]
    fn test_begin_with_short_amount() {
        let settings = PaymentMethodSettings::default();
        let mut flow = PaymentFlow::new(total());
        flow.select_method(PaymentMethod::Cash, &settings).unwrap();
        flow.enter_amount("50000").unwrap();

        assert!(!flow.can_complete());
        assert_eq!(flow.change(), Money::zero());
        assert!(matches!(
            flow.begin(),
            Err(CoreError::InsufficientFunds { .. })
        ));
        assert_eq!(flow.stage(), PaymentStage::AmountEntered);
    }

    #[test]
    fn test_switching_method_keeps_amount() {
        let settings = PaymentMethodSettings::default();
        let mut flow = PaymentFlow::new(total());
        flow.select_method(PaymentMethod::Cash, &settings).unwrap();
        flow.quick_amount(Money::from_minor(100_000)).unwrap();
        flow.select_method(PaymentMethod::Card, &settings).unwrap();

        assert_eq!(flow.stage(), PaymentStage::AmountEntered);
        assert_eq!(flow.method(), Some(PaymentMethod::Card));
    }

    #[test]
    fn test_cancel_not_allowed_while_processing() {
        let settings = PaymentMethodSettings::default();
        let mut flow = PaymentFlow::new(total());
        flow.select_method(PaymentMethod::Qris, &settings).unwrap();
        flow.quick_amount(total()).unwrap();
        flow.begin().unwrap();

        assert!(flow.cancel().is_err());
        assert!(flow.select_method(PaymentMethod::Cash, &settings).is_err());

        flow.fail().unwrap();
        assert_eq!(flow.stage(), PaymentStage::Idle);
        assert_eq!(flow.method(), None);
        assert_eq!(flow.amount_paid(), None);
    }

    #[test]
    fn test_complete_requires_processing() {
        let mut flow = PaymentFlow::new(total());
        assert!(flow.complete().is_err());
        assert!(flow.fail().is_err());
        flow.cancel().unwrap();
    }

    fn assert_clean(flow: &PaymentFlow) {
        assert_eq!(flow.stage(), PaymentStage::Idle);
        assert_eq!(flow.method(), None);
        assert_eq!(flow.amount_paid(), None);
        assert_eq!(flow.change(), Money::zero());
    }

    #[test]
    fn test_cancel_after_method_selected() {
        let settings = PaymentMethodSettings::default();
        let mut flow = PaymentFlow::new(total());
        flow.select_method(PaymentMethod::Card, &settings).unwrap();

        flow.cancel().unwrap();
        assert_clean(&flow);
    }

    #[test]
    fn test_cancel_after_amount_entered() {
        let settings = PaymentMethodSettings::default();
        let mut flow = PaymentFlow::new(total());
        flow.select_method(PaymentMethod::Cash, &settings).unwrap();
        flow.enter_amount("100000").unwrap();

        flow.cancel().unwrap();
        assert_clean(&flow);
        assert!(!flow.can_complete());
    }

    #[test]
    fn test_cancel_after_success_starts_new_order() {
        let settings = PaymentMethodSettings::default();
        let mut flow = PaymentFlow::new(total());
        flow.select_method(PaymentMethod::Qris, &settings).unwrap();
        flow.quick_amount(Money::from_minor(80_000)).unwrap();
        flow.begin().unwrap();
        flow.complete().unwrap();

        flow.cancel().unwrap();
        assert_clean(&flow);

        flow.select_method(PaymentMethod::Cash, &settings).unwrap();
        assert_eq!(flow.stage(), PaymentStage::MethodSelected);
    }
}
