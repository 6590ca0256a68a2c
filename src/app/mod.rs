pub mod dto;
pub mod sample_service;
