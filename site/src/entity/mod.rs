pub mod about_content;
pub mod contact_info;
pub mod project;
pub mod project_image;
pub mod service;
pub mod team_member;
pub mod testimonial;
pub mod user;
