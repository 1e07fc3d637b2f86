#![allow(async_fn_in_trait)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(clippy::missing_const_for_fn)]

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod database;
pub mod password;
pub mod service;
