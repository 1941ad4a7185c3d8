//! Landing page copy.

use crate::impact::{format_impact_grams, grams_per_euro};
use crate::landing::LandingCase;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Values interpolated into the landing copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageContext<'a> {
    pub name: Option<&'a str>,
    pub merchant: Option<&'a str>,
    pub partner: Option<&'a str>,
    /// Amount in EUR.
    pub amount: f64,
    /// Pre-rendered impact, e.g. "4.55 kg".
    pub impact_display: &'a str,
    pub price_per_kg: f64,
}

/// Rendered landing copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingMessage {
    pub title: String,
    pub body: String,
    pub cta: String,
}

impl LandingMessage {
    fn new(title: impl Into<String>, body: impl Into<String>, cta: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            cta: cta.into(),
        }
    }
}

/// Pick and fill the copy for a case.
pub fn get_landing_message(case: LandingCase, ctx: &MessageContext<'_>) -> LandingMessage {
    let amount = Money::from_decimal(ctx.amount, Currency::EUR).display();
    let impact = ctx.impact_display;
    let merchant = ctx.merchant.unwrap_or("Your merchant");

    match case {
        LandingCase::A => LandingMessage::new(
            thank(ctx.name),
            format!(
                "{merchant} has funded the recovery of {impact} of plastic with your purchase. \
                 Claim it to start your impact wallet."
            ),
            "Claim my impact",
        ),
        LandingCase::B => LandingMessage::new(
            thank(ctx.name),
            format!(
                "{merchant} has funded {amount} of plastic recovery for you, \
                 that is {impact} of plastic."
            ),
            "Claim my impact",
        ),
        LandingCase::C => LandingMessage::new(
            "Offset your plastic footprint",
            format!("Contribute {amount} to recover {impact} of plastic."),
            format!("Pay {amount}"),
        ),
        LandingCase::D => LandingMessage::new(
            "Redeem your gift card",
            format!("Enter your gift code to add {impact} of plastic recovery to your wallet."),
            "Redeem",
        ),
        LandingCase::E => LandingMessage::new(
            match ctx.name {
                Some(name) => format!("{name}, your order made an impact"),
                None => "Your order made an impact".to_string(),
            },
            format!(
                "{} has allocated {impact} of plastic recovery to you.",
                ctx.partner.unwrap_or("Our partner")
            ),
            "Add to my wallet",
        ),
        LandingCase::F if ctx.amount > 0.0 => LandingMessage::new(
            "Make an impact",
            format!("Contribute {amount} to recover {impact} of plastic."),
            format!("Contribute {amount}"),
        ),
        LandingCase::F => LandingMessage::new(
            "Make an impact",
            format!(
                "Every euro recovers {} of plastic. Choose how much you want to contribute.",
                format_impact_grams(grams_per_euro(ctx.price_per_kg))
            ),
            "Contribute",
        ),
        LandingCase::Admin => LandingMessage::new(
            "Administrative credit",
            format!("Credit {impact} of plastic recovery ({amount}) to a customer wallet."),
            "Credit wallet",
        ),
    }
}

fn thank(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("Thank you, {name}!"),
        None => "Thank you!".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(amount: f64, impact: &'a str) -> MessageContext<'a> {
        MessageContext {
            amount,
            impact_display: impact,
            price_per_kg: 0.11,
            ..MessageContext::default()
        }
    }

    #[test]
    fn test_claim_message_uses_merchant_and_name() {
        let context = MessageContext {
            name: Some("Ana"),
            merchant: Some("Acme"),
            ..ctx(0.55, "5.00 kg")
        };
        let message = get_landing_message(LandingCase::A, &context);
        assert_eq!(message.title, "Thank you, Ana!");
        assert!(message.body.starts_with("Acme has funded the recovery of 5.00 kg"));
        assert_eq!(message.cta, "Claim my impact");
    }

    #[test]
    fn test_amount_claim_formats_euros() {
        let message = get_landing_message(LandingCase::B, &ctx(2.0, "18.18 kg"));
        assert_eq!(message.title, "Thank you!");
        assert!(message.body.starts_with("Your merchant has funded \u{20ac}2.00"));
    }

    #[test]
    fn test_payment_cta() {
        let message = get_landing_message(LandingCase::C, &ctx(11.0, "100.00 kg"));
        assert_eq!(message.cta, "Pay \u{20ac}11.00");
        assert_eq!(message.body, "Contribute \u{20ac}11.00 to recover 100.00 kg of plastic.");
    }

    #[test]
    fn test_allocation_names_partner() {
        let context = MessageContext {
            partner: Some("Shop Co"),
            ..ctx(1.0, "9.09 kg")
        };
        let message = get_landing_message(LandingCase::E, &context);
        assert_eq!(message.body, "Shop Co has allocated 9.09 kg of plastic recovery to you.");
    }

    #[test]
    fn test_general_contribution_without_amount() {
        let message = get_landing_message(LandingCase::F, &ctx(0.0, "0g"));
        assert_eq!(
            message.body,
            "Every euro recovers 9.09 kg of plastic. Choose how much you want to contribute."
        );
        assert_eq!(message.cta, "Contribute");

        let message = get_landing_message(LandingCase::F, &ctx(5.0, "45.45 kg"));
        assert_eq!(message.cta, "Contribute \u{20ac}5.00");
    }

    #[test]
    fn test_gift_and_admin_titles() {
        assert_eq!(
            get_landing_message(LandingCase::D, &ctx(10.0, "90.91 kg")).title,
            "Redeem your gift card"
        );
        assert_eq!(
            get_landing_message(LandingCase::Admin, &ctx(10.0, "90.91 kg")).title,
            "Administrative credit"
        );
    }
}
