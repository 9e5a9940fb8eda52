pub mod account;
pub mod admin;
pub mod notification;
pub mod onboarding;
pub mod partner;
pub mod review;
