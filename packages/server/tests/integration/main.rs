mod common;

mod auth;
mod pagination;
mod resource;
