pub mod currency_rates;
pub mod notify_due;
pub mod send_push;
