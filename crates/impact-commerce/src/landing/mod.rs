//! Landing-page routing.
//!
//! A landing URL carries a SKU code and optional overrides. From those the
//! page picks one of seven flows ([`LandingCase`]), the form to show, the
//! EUR amount at stake and the copy to render.

mod amount;
mod case;
mod form;
mod message;
mod params;
mod resolution;

pub use amount::calculate_amount;
pub use case::{determine_landing_case, LandingCase};
pub use form::{determine_form_type, FormType};
pub use message::{get_landing_message, LandingMessage, MessageContext};
pub use params::LandingParams;
pub use resolution::{resolve_landing, LandingResolution};
