pub mod auth;
pub mod dataset;
pub mod distill;
pub mod extract;
pub mod generator;
pub mod mastery;
pub mod navigation;
pub mod quiz;
pub mod recommender;
pub mod session;
pub mod tutor;
