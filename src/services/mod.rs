pub mod ai_service;
pub mod capture_service;
pub mod event_bodies;
pub mod generation_service;
pub mod seed_service;
pub mod webhook_service;
