pub mod address;
pub mod attachment;
pub mod badge;
pub mod banner;
pub mod blog_category;
pub mod blog_post;
pub mod blog_tag;
pub mod board;
pub mod category;
pub mod comment;
pub mod company;
pub mod config;
pub mod fcm_alarm;
pub mod fcm_message;
pub mod fcm_token;
pub mod point;
pub mod popup;
pub mod setting;
pub mod shop_item;
pub mod shop_order;
pub mod shop_review;
pub mod user;
