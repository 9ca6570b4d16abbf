pub mod easter;
pub mod feasts;

pub use easter::compute_easter;
pub use feasts::{generate_liturgical_events, generate_liturgical_events_with, Feast, LiturgicalOptions};
