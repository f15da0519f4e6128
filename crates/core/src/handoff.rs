use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::rental::RentalWindow;
use crate::domain::vehicle::Vehicle;
use crate::errors::DomainError;
use crate::locale::Locale;
use crate::pricing::currency::DisplayCurrency;
use crate::pricing::quote::Quote;

const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Everything needed to prefill a booking request message.
#[derive(Clone, Debug)]
pub struct HandoffRequest<'a> {
    pub company_name: &'a str,
    pub whatsapp_number: &'a str,
    pub currency: DisplayCurrency,
    /// Picks the discount label; duration text and extra names arrive
    /// already rendered.
    pub locale: Locale,
    pub vehicle: &'a Vehicle,
    pub quote: &'a Quote,
    pub window: RentalWindow,
    /// Rendered duration, e.g. `2 Weeks`. Falls back to the day count.
    pub duration_text: Option<String>,
    pub extra_names: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handoff {
    pub message: String,
    pub link: String,
}

/// Builds the prefilled message and deep link for a rental request.
pub fn prepare(request: &HandoffRequest<'_>) -> Result<Handoff, DomainError> {
    let vehicle = request.vehicle;
    if !vehicle.is_available {
        return Err(DomainError::VehicleUnavailable(vehicle.id.clone()));
    }

    let message = render_message(request);
    let link = whatsapp_link(request.whatsapp_number, &message);
    Ok(Handoff { message, link })
}

pub fn render_message(request: &HandoffRequest<'_>) -> String {
    let vehicle = request.vehicle;
    let quote = request.quote;
    let code = request.currency.code();
    let duration = request
        .duration_text
        .clone()
        .unwrap_or_else(|| format!("{} days", quote.duration_days));
    let extras =
        if request.extra_names.is_empty() { "None".to_string() } else { request.extra_names.join(", ") };

    let mut lines = vec![
        format!(
            "Hello {}! I'm interested in renting the *{} {} {}*.",
            request.company_name, vehicle.year, vehicle.brand, vehicle.name
        ),
        String::new(),
        "🚗 *Booking Details:*".to_string(),
        format!("- Duration: {duration}"),
        format!("- Dates: {} to {}", request.window.start, request.window.end),
        String::new(),
        format!("✨ *Extras:* {extras}"),
        String::new(),
        "💰 *Price Estimate:*".to_string(),
        format!("- Rate: {} {code}/day", whole(request.currency.convert(quote.day_rate))),
    ];
    if quote.discount.is_applied() {
        lines.push(format!(
            "- Discount: {} ({}% OFF)",
            quote.discount.label(request.locale),
            quote.discount.whole_percent()
        ));
    }
    lines.push(format!("- Total: {} {code}", whole(request.currency.convert(quote.total))));
    lines.push(String::new());
    lines.push("Is this car available?".to_string());

    lines.join("\n")
}

/// Short enquiry used by catalog cards, without a quote.
pub fn inquiry_message(company_name: &str, vehicle: &Vehicle) -> String {
    format!(
        "Hello {company_name}! I'm interested in the {} {} {}. Is it available?",
        vehicle.year, vehicle.brand, vehicle.name
    )
}

pub fn whatsapp_link(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    format!("{WHATSAPP_BASE_URL}/{digits}?text={}", urlencoding::encode(message))
}

fn whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero).normalize()
}
