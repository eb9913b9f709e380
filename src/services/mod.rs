pub mod budget_service;
pub mod currency_format;
pub mod day_service;
pub mod email_service;
pub mod generation_service;
pub mod itinerary_service;
pub mod markup_service;
pub mod rates_service;
pub mod title_service;
